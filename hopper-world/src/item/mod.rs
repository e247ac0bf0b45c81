use serde::{Deserialize, Serialize};

mod enchantment;
mod registry;

pub use enchantment::{Enchantment, EnchantmentInstance};
pub use registry::{ItemRegistry, ItemRules};

/// Strips the default namespace so `minecraft:apple` and `apple` name the same thing.
pub fn normalize_id(id: &str) -> &str {
    id.strip_prefix("minecraft:").unwrap_or(id)
}

pub fn is_air(id: &str) -> bool {
    normalize_id(id) == "air"
}

fn default_max_stack_size() -> u8 {
    64
}

/// Static type information for an item, as provided by the host.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct Item {
    pub id: String,
    #[serde(default = "default_max_stack_size")]
    pub max_stack_size: u8,
    /// `None` for items without durability.
    #[serde(default)]
    pub max_damage: Option<u32>,
    #[serde(default)]
    pub enchantable: bool,
}

impl Item {
    pub fn new(id: impl Into<String>, max_stack_size: u8) -> Self {
        Self {
            id: id.into(),
            max_stack_size,
            max_damage: None,
            enchantable: false,
        }
    }

    /// A single-stack item with durability that accepts enchantments, like tools and armor.
    pub fn tool(id: impl Into<String>, max_damage: u32) -> Self {
        Self {
            id: id.into(),
            max_stack_size: 1,
            max_damage: Some(max_damage),
            enchantable: true,
        }
    }

    pub fn air() -> Self {
        Self::new("minecraft:air", 0)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct ItemStack {
    pub item_count: u8,
    pub item: Item,
    /// Only meaningful when the item has durability.
    pub damage: u32,
    pub enchantments: Vec<EnchantmentInstance>,
    pub custom_name: Option<String>,
    pub lore: Vec<String>,
}

impl ItemStack {
    pub fn new(item_count: u8, item: Item) -> Self {
        Self {
            item_count,
            item,
            damage: 0,
            enchantments: Vec::new(),
            custom_name: None,
            lore: Vec::new(),
        }
    }

    pub fn air() -> Self {
        Self::new(0, Item::air())
    }

    pub fn is_empty(&self) -> bool {
        self.item_count == 0 || is_air(&self.item.id)
    }

    pub fn get_max_stack_size(&self) -> u8 {
        self.item.max_stack_size
    }

    pub fn has_durability(&self) -> bool {
        self.item.max_damage.is_some()
    }

    /// Clamped to the item's durability; ignored for items without one.
    pub fn set_damage(&mut self, damage: u32) {
        if let Some(max_damage) = self.item.max_damage {
            self.damage = damage.min(max_damage);
        }
    }

    /// Splits `amount` items off into a new stack, leaving the rest in `self`.
    pub fn split(&mut self, amount: u8) -> Self {
        let amount = amount.min(self.item_count);
        let mut stack = self.clone();
        stack.item_count = amount;
        self.item_count -= amount;
        stack
    }

    /// Same item and the same components; counts are not compared.
    pub fn is_stackable_with(&self, other: &Self) -> bool {
        self.item.id == other.item.id
            && self.damage == other.damage
            && self.enchantments == other.enchantments
            && self.custom_name == other.custom_name
            && self.lore == other.lore
    }

    pub fn get_enchantment_level(&self, id: &str) -> Option<u32> {
        self.enchantments
            .iter()
            .find(|enchantment| normalize_id(&enchantment.id) == normalize_id(id))
            .map(|enchantment| enchantment.level)
    }

    /// Adds an enchantment, replacing the level of one already present.
    pub fn add_enchantment(&mut self, id: &str, level: u32) {
        if let Some(existing) = self
            .enchantments
            .iter_mut()
            .find(|enchantment| normalize_id(&enchantment.id) == normalize_id(id))
        {
            existing.level = level;
        } else {
            self.enchantments.push(EnchantmentInstance {
                id: id.to_string(),
                level,
            });
        }
    }

    pub fn remove_enchantment(&mut self, id: &str) -> bool {
        let before = self.enchantments.len();
        self.enchantments
            .retain(|enchantment| normalize_id(&enchantment.id) != normalize_id(id));
        before != self.enchantments.len()
    }

    pub fn remove_all_enchantments(&mut self) {
        self.enchantments.clear();
    }
}
