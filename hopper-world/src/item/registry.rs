use indexmap::IndexMap;
use serde::Deserialize;

use super::{Enchantment, Item, ItemStack, normalize_id};
use crate::error::LootError;

/// Host-defined item semantics the loot engine consults instead of hardcoding game rules.
pub trait ItemRules: Send + Sync {
    fn get_item(&self, id: &str) -> Option<Item>;

    fn get_enchantment(&self, id: &str) -> Option<&Enchantment>;

    /// Every enchantment type the host knows, in a stable order.
    fn enchantments(&self) -> Vec<&Enchantment>;

    fn can_enchant(&self, stack: &ItemStack, enchantment: &Enchantment, level: u32) -> bool {
        if !stack.item.enchantable || level == 0 || level > enchantment.max_level {
            return false;
        }

        let item_id = normalize_id(&stack.item.id);
        if !enchantment.supported_items.is_empty()
            && !enchantment
                .supported_items
                .iter()
                .any(|supported| normalize_id(supported) == item_id)
        {
            return false;
        }

        let own_id = normalize_id(&enchantment.id);
        !stack.enchantments.iter().any(|present| {
            let present_id = normalize_id(&present.id);
            if present_id == own_id {
                return false;
            }
            let conflicts = |a: &Enchantment, other: &str| {
                a.exclusive_with
                    .iter()
                    .any(|exclusive| normalize_id(exclusive) == other)
            };
            conflicts(enchantment, present_id)
                || self
                    .get_enchantment(present_id)
                    .is_some_and(|present| conflicts(present, own_id))
        })
    }

    fn is_stackable(&self, a: &ItemStack, b: &ItemStack) -> bool {
        a.is_stackable_with(b)
    }
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct RegistryFile {
    #[serde(default)]
    items: Vec<Item>,
    #[serde(default)]
    enchantments: Vec<Enchantment>,
}

/// Data-driven [`ItemRules`], filled by hand or from a JSON document.
#[derive(Default, Debug, Clone)]
pub struct ItemRegistry {
    items: IndexMap<String, Item>,
    enchantments: IndexMap<String, Enchantment>,
}

impl ItemRegistry {
    /// Parses `{ "items": [...], "enchantments": [...] }`.
    pub fn from_json(json: &str) -> Result<Self, LootError> {
        let file: RegistryFile = serde_json::from_str(json)?;
        let mut registry = Self::default();
        for item in file.items {
            registry.register_item(item)?;
        }
        for enchantment in file.enchantments {
            registry.register_enchantment(enchantment)?;
        }
        log::debug!(
            "Loaded {} items and {} enchantments",
            registry.items.len(),
            registry.enchantments.len()
        );
        Ok(registry)
    }

    pub fn register_item(&mut self, item: Item) -> Result<(), LootError> {
        if item.max_stack_size == 0 {
            return Err(LootError::InvalidDefinition(format!(
                "item {:?} must stack to at least 1",
                item.id
            )));
        }
        self.items.insert(normalize_id(&item.id).to_string(), item);
        Ok(())
    }

    pub fn register_enchantment(&mut self, enchantment: Enchantment) -> Result<(), LootError> {
        if enchantment.max_level == 0 {
            return Err(LootError::InvalidDefinition(format!(
                "enchantment {:?} must allow at least level 1",
                enchantment.id
            )));
        }
        self.enchantments
            .insert(normalize_id(&enchantment.id).to_string(), enchantment);
        Ok(())
    }

    /// Builder-style [`Self::register_item`] for setups that cannot fail.
    #[must_use]
    pub fn with_item(mut self, item: Item) -> Self {
        if let Err(err) = self.register_item(item) {
            log::warn!("{err}");
        }
        self
    }

    #[must_use]
    pub fn with_enchantment(mut self, enchantment: Enchantment) -> Self {
        if let Err(err) = self.register_enchantment(enchantment) {
            log::warn!("{err}");
        }
        self
    }
}

impl ItemRules for ItemRegistry {
    fn get_item(&self, id: &str) -> Option<Item> {
        self.items.get(normalize_id(id)).cloned()
    }

    fn get_enchantment(&self, id: &str) -> Option<&Enchantment> {
        self.enchantments.get(normalize_id(id))
    }

    fn enchantments(&self) -> Vec<&Enchantment> {
        self.enchantments.values().collect()
    }
}
