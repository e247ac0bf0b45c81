//! Declarative table definitions.
//!
//! ```json
//! { "pools": [ { "rolls": 2, "entries": [
//!     { "weight": 4, "value": "minecraft:stick" },
//!     { "weight": 1, "value": { "item": { "id": "minecraft:iron_sword", "damage": 10 } },
//!       "functions": [ { "function": "enchant_randomly" } ] },
//!     { "weight": 1, "value": { "loot_table": "chests/bonus" } },
//!     { "weight": 2, "value": "empty" }
//! ] } ] }
//! ```
//!
//! Every object rejects keys it does not know.

use hopper_util::math::number_range::NumberRange;
use serde::Deserialize;

use super::{
    LootEntry, LootPool, LootTable,
    function::{EnchantmentSpec, EntryFunctions, resolve_enchantment},
};
use crate::{
    error::LootError,
    item::{EnchantmentInstance, ItemRules, ItemStack, is_air},
};

#[derive(Deserialize, Debug)]
#[serde(deny_unknown_fields)]
pub struct TableDefinition {
    pub pools: Vec<PoolDefinition>,
}

fn default_rolls() -> u32 {
    1
}

#[derive(Deserialize, Debug)]
#[serde(deny_unknown_fields)]
pub struct PoolDefinition {
    #[serde(default = "default_rolls")]
    pub rolls: u32,
    pub entries: Vec<EntryDefinition>,
}

#[derive(Deserialize, Debug)]
#[serde(deny_unknown_fields)]
pub struct EntryDefinition {
    pub weight: f64,
    pub value: EntryValue,
    #[serde(default)]
    pub functions: Vec<FunctionDefinition>,
}

#[derive(Deserialize, Debug)]
#[serde(untagged)]
pub enum EntryValue {
    /// An item id, or `"empty"`.
    Id(String),
    Tagged(TaggedValue),
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "snake_case")]
pub enum TaggedValue {
    Item(ItemDefinition),
    LootTable(String),
}

#[derive(Deserialize, Debug)]
#[serde(deny_unknown_fields)]
pub struct ItemDefinition {
    pub id: String,
    #[serde(default)]
    pub count: Option<u8>,
    #[serde(default)]
    pub damage: Option<u32>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub lore: Vec<String>,
    #[serde(default)]
    pub enchantments: Vec<EnchantmentInstance>,
}

#[derive(Deserialize, Debug)]
#[serde(tag = "function", rename_all = "snake_case", deny_unknown_fields)]
pub enum FunctionDefinition {
    SetCount { count: NumberRange },
    SetDamage { damage: NumberRange },
    /// A single enchantment is always added, several means one of them at random.
    AddEnchantments { enchantments: Vec<EnchantmentSpec> },
    SetEnchantments { enchantments: Vec<EnchantmentSpec> },
    EnchantRandomly,
    SetName { name: String },
    SetLore { lore: Vec<String> },
}

impl TableDefinition {
    pub fn into_table(self, id: &str, rules: &dyn ItemRules) -> Result<LootTable, LootError> {
        let mut table = LootTable::new(id);
        for pool in self.pools {
            table.add_pool(pool.into_pool(rules)?);
        }
        Ok(table)
    }
}

impl PoolDefinition {
    fn into_pool(self, rules: &dyn ItemRules) -> Result<LootPool, LootError> {
        let mut pool = LootPool::new(self.rolls);
        for entry in self.entries {
            pool.add_entry(entry.into_entry(rules)?);
        }
        Ok(pool)
    }
}

impl EntryDefinition {
    fn into_entry(self, rules: &dyn ItemRules) -> Result<LootEntry, LootError> {
        let mut entry = match self.value {
            EntryValue::Id(id) => LootEntry::from_id(&id, self.weight, rules)?,
            EntryValue::Tagged(TaggedValue::Item(item)) => {
                LootEntry::item(item.into_stack(rules)?, self.weight)?
            }
            EntryValue::Tagged(TaggedValue::LootTable(id)) => LootEntry::table(id, self.weight)?,
        };

        if !self.functions.is_empty() {
            let mut functions = entry.functions()?;
            for function in self.functions {
                function.register(&mut functions)?;
            }
        }
        Ok(entry)
    }
}

impl ItemDefinition {
    fn into_stack(self, rules: &dyn ItemRules) -> Result<ItemStack, LootError> {
        if is_air(&self.id) {
            return Ok(ItemStack::air());
        }
        let item = rules
            .get_item(&self.id)
            .ok_or_else(|| LootError::UnknownItem(self.id.clone()))?;

        let count = self.count.unwrap_or(1).clamp(1, item.max_stack_size.max(1));
        let mut stack = ItemStack::new(count, item);

        if let Some(damage) = self.damage {
            if !stack.has_durability() {
                return Err(LootError::MissingDurability(self.id));
            }
            stack.set_damage(damage);
        }
        stack.custom_name = self.name;
        stack.lore = self.lore;

        for instance in self.enchantments {
            let enchantment = resolve_enchantment(rules, &instance.id)?;
            let level = instance.level.clamp(1, enchantment.max_level);
            if !rules.can_enchant(&stack, enchantment, level) {
                return Err(LootError::EnchantmentRejected {
                    enchantment: enchantment.id.clone(),
                    level,
                    item: stack.item.id.clone(),
                });
            }
            stack.add_enchantment(&enchantment.id, level);
        }
        Ok(stack)
    }
}

impl FunctionDefinition {
    fn register(self, functions: &mut EntryFunctions<'_>) -> Result<(), LootError> {
        match self {
            Self::SetCount { count } => {
                functions.count(count)?;
            }
            Self::SetDamage { damage } => {
                functions.damage(damage)?;
            }
            Self::AddEnchantments { mut enchantments } => {
                if enchantments.len() == 1 {
                    let spec = enchantments.remove(0);
                    functions.enchantments().add(spec.id, spec.level)?;
                } else {
                    functions.enchantments().add_one_of(enchantments)?;
                }
            }
            Self::SetEnchantments { enchantments } => {
                functions.enchantments().set(enchantments)?;
            }
            Self::EnchantRandomly => {
                functions.enchantments().random();
            }
            Self::SetName { name } => {
                functions.name(name);
            }
            Self::SetLore { lore } => {
                functions.lore(lore);
            }
        }
        Ok(())
    }
}
