use std::fmt;

use super::{
    LootContext, LootTable,
    function::{EntryFunctions, LootFunction},
};
use crate::{
    error::LootError,
    item::{ItemRules, ItemStack, is_air},
};

/// A reference to a table by id, resolved through the registry when rolled.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct LootTableRef {
    id: String,
}

impl LootTableRef {
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }

    pub fn id(&self) -> &str {
        &self.id
    }
}

impl From<&LootTable> for LootTableRef {
    fn from(table: &LootTable) -> Self {
        Self::new(table.id())
    }
}

impl From<&str> for LootTableRef {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for LootTableRef {
    fn from(id: String) -> Self {
        Self { id }
    }
}

#[derive(Clone, Debug)]
pub enum Payload {
    Item(ItemStack),
    Table(LootTableRef),
    Empty,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EntryKind {
    Item,
    Empty,
    LootTable,
}

impl fmt::Display for EntryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Item => "item",
            Self::Empty => "empty",
            Self::LootTable => "loot_table",
        })
    }
}

fn check_weight(weight: f64) -> Result<(), LootError> {
    if weight.is_finite() && weight > 0.0 {
        Ok(())
    } else {
        Err(LootError::InvalidWeight(weight))
    }
}

/// One weighted outcome of a pool.
#[derive(Clone, Debug)]
pub struct LootEntry {
    weight: f64,
    payload: Payload,
    functions: Vec<LootFunction>,
}

impl LootEntry {
    /// An item payload that is empty or air becomes [`Payload::Empty`].
    pub fn new(payload: Payload, weight: f64) -> Result<Self, LootError> {
        check_weight(weight)?;
        let payload = match payload {
            Payload::Item(stack) if stack.is_empty() => Payload::Empty,
            payload => payload,
        };
        Ok(Self {
            weight,
            payload,
            functions: Vec::new(),
        })
    }

    pub fn item(stack: ItemStack, weight: f64) -> Result<Self, LootError> {
        Self::new(Payload::Item(stack), weight)
    }

    pub fn table(table: impl Into<LootTableRef>, weight: f64) -> Result<Self, LootError> {
        Self::new(Payload::Table(table.into()), weight)
    }

    pub fn empty(weight: f64) -> Result<Self, LootError> {
        Self::new(Payload::Empty, weight)
    }

    /// Resolves an item id to a single-item template. `"empty"` and air ids give an empty entry.
    pub fn from_id(id: &str, weight: f64, rules: &dyn ItemRules) -> Result<Self, LootError> {
        if id == "empty" || is_air(id) {
            return Self::empty(weight);
        }
        let item = rules
            .get_item(id)
            .ok_or_else(|| LootError::UnknownItem(id.to_string()))?;
        Self::item(ItemStack::new(1, item), weight)
    }

    pub fn weight(&self) -> f64 {
        self.weight
    }

    pub fn set_weight(&mut self, weight: f64) -> Result<(), LootError> {
        check_weight(weight)?;
        self.weight = weight;
        Ok(())
    }

    pub fn kind(&self) -> EntryKind {
        match self.payload {
            Payload::Item(_) => EntryKind::Item,
            Payload::Table(_) => EntryKind::LootTable,
            Payload::Empty => EntryKind::Empty,
        }
    }

    pub fn payload(&self) -> &Payload {
        &self.payload
    }

    /// The item every roll of this entry starts from.
    pub fn template(&self) -> Option<&ItemStack> {
        match &self.payload {
            Payload::Item(stack) => Some(stack),
            _ => None,
        }
    }

    pub fn get_functions(&self) -> &[LootFunction] {
        &self.functions
    }

    /// Registers item functions. Only item entries take functions.
    pub fn functions(&mut self) -> Result<EntryFunctions<'_>, LootError> {
        match &self.payload {
            Payload::Item(template) => Ok(EntryFunctions {
                functions: &mut self.functions,
                template,
            }),
            _ => Err(LootError::NotAnItemEntry(self.kind())),
        }
    }

    /// Generates this entry's items.
    ///
    /// Item entries yield one fresh copy of the template with every function applied in
    /// registration order. Table entries yield the whole roll of the referenced table, without
    /// this entry's functions.
    pub fn get_item_stacks(&self, context: &mut LootContext<'_>) -> Result<Vec<ItemStack>, LootError> {
        match &self.payload {
            Payload::Empty => Ok(Vec::new()),
            Payload::Item(template) => {
                let mut stack = template.clone();
                for function in &self.functions {
                    function.apply(&mut stack, context)?;
                }
                Ok(vec![stack])
            }
            Payload::Table(reference) => {
                let table = context
                    .registry
                    .get(reference.id())
                    .ok_or_else(|| LootError::UnknownTable(reference.id().to_string()))?;
                table.roll(context)
            }
        }
    }
}
