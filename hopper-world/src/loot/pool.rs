use hopper_util::random::{RandomImpl, choose_by_weight};

use super::entry::LootEntry;
use crate::error::LootError;

/// A weighted bag of entries, drawn from `rolls` times per table roll.
#[derive(Clone, Debug)]
pub struct LootPool {
    rolls: u32,
    entries: Vec<LootEntry>,
}

impl Default for LootPool {
    fn default() -> Self {
        Self::new(1)
    }
}

impl LootPool {
    pub fn new(rolls: u32) -> Self {
        Self {
            rolls,
            entries: Vec::new(),
        }
    }

    pub fn rolls(&self) -> u32 {
        self.rolls
    }

    pub fn set_rolls(&mut self, rolls: u32) {
        self.rolls = rolls;
    }

    pub fn entries(&self) -> &[LootEntry] {
        &self.entries
    }

    pub fn add_entry(&mut self, entry: LootEntry) -> &mut Self {
        self.entries.push(entry);
        self
    }

    pub fn set_entries(&mut self, entries: Vec<LootEntry>) -> &mut Self {
        self.entries = entries;
        self
    }

    pub fn remove_entry(&mut self, index: usize) -> Option<LootEntry> {
        (index < self.entries.len()).then(|| self.entries.remove(index))
    }

    /// One weighted draw. Fails on a pool without entries.
    pub fn choose_entry(&self, random: &mut dyn RandomImpl) -> Result<&LootEntry, LootError> {
        let weights: Vec<f64> = self.entries.iter().map(LootEntry::weight).collect();
        let index = choose_by_weight(random, &weights)?;
        self.entries.get(index).ok_or(LootError::EmptyPool)
    }
}
