use hopper_util::random::WeightError;
use thiserror::Error;

use crate::loot::EntryKind;

#[derive(Error, Debug)]
pub enum LootError {
    #[error("Weight must be a finite positive number, got {0}")]
    InvalidWeight(f64),
    #[error("Range {min}..={max} is not a finite range")]
    InvalidRange { min: f64, max: f64 },
    #[error("Invalid definition: {0}")]
    InvalidDefinition(String),
    #[error("Malformed loot table JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),
    #[error("A loot table with id {0:?} is already registered")]
    DuplicateTable(String),
    #[error("Item functions can only be attached to item entries, this entry is {0}")]
    NotAnItemEntry(EntryKind),
    #[error("Item {0:?} has no durability")]
    MissingDurability(String),
    #[error("Unknown item {0:?}")]
    UnknownItem(String),
    #[error("Cannot roll a pool without entries")]
    EmptyPool,
    #[error("Cannot roll a pool whose entry weights sum to zero")]
    ZeroWeightSum,
    #[error("Unknown loot table {0:?}")]
    UnknownTable(String),
    #[error("Unknown enchantment {0:?}")]
    UnknownEnchantment(String),
    #[error("Enchantment {enchantment:?} at level {level} cannot be applied to {item:?}")]
    EnchantmentRejected {
        enchantment: String,
        level: u32,
        item: String,
    },
    #[error("Loot table {table:?} nests deeper than the limit of {depth}; is the table graph cyclic?")]
    RecursionLimit { table: String, depth: u32 },
    #[error("Filling the container did not settle after {sweeps} sweeps")]
    FillOverflow { sweeps: u32 },
}

/// Broad class of a [`LootError`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LootErrorKind {
    /// Bad arguments or definitions, reported where they were given.
    Validation,
    /// Something referenced could not be resolved or applied.
    Resolution,
    /// A container fill hit its iteration ceiling.
    Overflow,
}

impl LootError {
    pub fn kind(&self) -> LootErrorKind {
        match self {
            Self::InvalidWeight(_)
            | Self::InvalidRange { .. }
            | Self::InvalidDefinition(_)
            | Self::InvalidJson(_)
            | Self::DuplicateTable(_)
            | Self::NotAnItemEntry(_)
            | Self::MissingDurability(_)
            | Self::UnknownItem(_)
            | Self::EmptyPool
            | Self::ZeroWeightSum => LootErrorKind::Validation,
            Self::UnknownTable(_)
            | Self::UnknownEnchantment(_)
            | Self::EnchantmentRejected { .. }
            | Self::RecursionLimit { .. } => LootErrorKind::Resolution,
            Self::FillOverflow { .. } => LootErrorKind::Overflow,
        }
    }
}

impl From<WeightError> for LootError {
    fn from(err: WeightError) -> Self {
        match err {
            WeightError::Empty => Self::EmptyPool,
            WeightError::ZeroSum => Self::ZeroWeightSum,
            WeightError::InvalidWeight { weight, .. } => Self::InvalidWeight(weight),
        }
    }
}
