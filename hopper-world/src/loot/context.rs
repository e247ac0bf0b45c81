use hopper_config::LootConfig;
use hopper_util::random::RandomImpl;

use super::LootTableRegistry;
use crate::{error::LootError, item::ItemRules};

/// Everything a roll reads from or draws on.
pub struct LootContext<'a> {
    pub registry: &'a LootTableRegistry,
    pub rules: &'a dyn ItemRules,
    pub config: &'a LootConfig,
    pub random: &'a mut dyn RandomImpl,
    depth: u32,
}

impl<'a> LootContext<'a> {
    pub fn new(
        registry: &'a LootTableRegistry,
        rules: &'a dyn ItemRules,
        config: &'a LootConfig,
        random: &'a mut dyn RandomImpl,
    ) -> Self {
        Self {
            registry,
            rules,
            config,
            random,
            depth: 0,
        }
    }

    /// Number of tables currently being rolled, counting the outermost one.
    pub fn depth(&self) -> u32 {
        self.depth
    }

    /// Runs `roll` one table deeper, failing instead once the configured depth is reached.
    pub(crate) fn descend<T>(
        &mut self,
        table: &str,
        roll: impl FnOnce(&mut Self) -> Result<T, LootError>,
    ) -> Result<T, LootError> {
        let max_depth = self.config.roll.max_depth;
        if self.depth >= max_depth {
            log::warn!("Aborting roll of {table:?} at depth {max_depth}");
            return Err(LootError::RecursionLimit {
                table: table.to_string(),
                depth: max_depth,
            });
        }

        self.depth += 1;
        let result = roll(self);
        self.depth -= 1;
        result
    }
}
