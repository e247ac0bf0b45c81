use serde::{Deserialize, Serialize};

/// An enchantment type known to the host.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct Enchantment {
    pub id: String,
    pub max_level: u32,
    /// Item ids this enchantment applies to. Empty means any enchantable item.
    #[serde(default)]
    pub supported_items: Vec<String>,
    /// Enchantments that cannot share an item with this one.
    #[serde(default)]
    pub exclusive_with: Vec<String>,
}

impl Enchantment {
    pub fn new(id: impl Into<String>, max_level: u32) -> Self {
        Self {
            id: id.into(),
            max_level,
            supported_items: Vec::new(),
            exclusive_with: Vec::new(),
        }
    }

    pub fn supporting<I, S>(mut self, items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.supported_items = items.into_iter().map(Into::into).collect();
        self
    }

    pub fn exclusive_with<I, S>(mut self, others: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.exclusive_with = others.into_iter().map(Into::into).collect();
        self
    }
}

/// An enchantment applied to a stack.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct EnchantmentInstance {
    pub id: String,
    pub level: u32,
}
