use hopper_util::math::vector3::Vector3;

use crate::{
    error::LootError,
    inventory::Container,
    item::{ItemRules, ItemStack},
};

mod context;
mod entry;
mod fill;
mod function;
pub mod json;
mod pool;
mod registry;
mod spawn;
#[cfg(test)]
mod test;

pub use context::LootContext;
pub use entry::{EntryKind, LootEntry, LootTableRef, Payload};
pub use fill::{ContainerFiller, FillOutcome};
pub use function::{EnchantmentFunctions, EnchantmentSpec, EntryFunctions, LootFunction, ScriptFn};
pub use pool::LootPool;
pub use registry::LootTableRegistry;
pub use spawn::{Dimension, EntrySpawner, ItemEntity};

/// Ordered pools rolled together under one id.
#[derive(Clone, Debug)]
pub struct LootTable {
    id: String,
    pools: Vec<LootPool>,
}

impl LootTable {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            pools: Vec::new(),
        }
    }

    /// Parses a declarative definition, see [`json`].
    pub fn create(id: &str, json: &str, rules: &dyn ItemRules) -> Result<Self, LootError> {
        let definition: json::TableDefinition = serde_json::from_str(json)?;
        definition.into_table(id, rules)
    }

    pub fn from_value(
        id: &str,
        value: serde_json::Value,
        rules: &dyn ItemRules,
    ) -> Result<Self, LootError> {
        let definition: json::TableDefinition = serde_json::from_value(value)?;
        definition.into_table(id, rules)
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn pools(&self) -> &[LootPool] {
        &self.pools
    }

    pub fn add_pool(&mut self, pool: LootPool) -> &mut Self {
        self.pools.push(pool);
        self
    }

    pub fn set_pools(&mut self, pools: Vec<LootPool>) -> &mut Self {
        self.pools = pools;
        self
    }

    pub fn remove_pool(&mut self, index: usize) -> Option<LootPool> {
        (index < self.pools.len()).then(|| self.pools.remove(index))
    }

    /// Draws from every pool `rolls` times, in pool order, and concatenates what the chosen
    /// entries produce. Nested tables count against the context's depth limit.
    pub fn roll(&self, context: &mut LootContext<'_>) -> Result<Vec<ItemStack>, LootError> {
        context.descend(&self.id, |context| {
            let mut items = Vec::new();
            for pool in &self.pools {
                for _ in 0..pool.rolls() {
                    let entry = pool.choose_entry(context.random)?;
                    items.extend(entry.get_item_stacks(context)?);
                }
            }
            log::trace!(
                "Rolled {} stacks from {:?} at depth {}",
                items.len(),
                self.id,
                context.depth()
            );
            Ok(items)
        })
    }

    /// Rolls once and scatters the result over the emptied `container`.
    pub fn fill<'c, C: Container + ?Sized>(
        &self,
        container: &'c mut C,
        context: &mut LootContext<'_>,
    ) -> Result<&'c mut C, LootError> {
        let items = self.roll(context)?;
        ContainerFiller::new(&context.config.fill).fill(
            items,
            container,
            context.random,
            context.rules,
        )?;
        Ok(container)
    }

    /// Rolls once and drops the result into `dimension` at `location`.
    pub fn spawn<D: Dimension + ?Sized>(
        &self,
        dimension: &mut D,
        location: Vector3<f64>,
        context: &mut LootContext<'_>,
    ) -> Result<Vec<D::Entity>, LootError> {
        let items = self.roll(context)?;
        Ok(EntrySpawner::new(&context.config.spawn).spawn(
            items,
            dimension,
            location,
            context.random,
        ))
    }
}
