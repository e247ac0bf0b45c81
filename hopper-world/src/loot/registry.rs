use std::{collections::HashMap, sync::Arc};

use parking_lot::RwLock;

use super::LootTable;
use crate::{error::LootError, item::ItemRules};

/// Id to table lookup shared by everything that rolls.
///
/// Tables are never removed once registered, and the first table registered under an id keeps it.
#[derive(Default, Debug)]
pub struct LootTableRegistry {
    tables: RwLock<HashMap<String, Arc<LootTable>>>,
}

impl LootTableRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&self, table: LootTable) -> Result<Arc<LootTable>, LootError> {
        let mut tables = self.tables.write();
        if tables.contains_key(table.id()) {
            return Err(LootError::DuplicateTable(table.id().to_string()));
        }
        let table = Arc::new(table);
        tables.insert(table.id().to_string(), table.clone());
        log::debug!(
            "Registered loot table {:?} with {} pools",
            table.id(),
            table.pools().len()
        );
        Ok(table)
    }

    /// Parses a declarative definition and registers the result.
    pub fn create(
        &self,
        id: &str,
        json: &str,
        rules: &dyn ItemRules,
    ) -> Result<Arc<LootTable>, LootError> {
        if self.contains(id) {
            return Err(LootError::DuplicateTable(id.to_string()));
        }
        self.register(LootTable::create(id, json, rules)?)
    }

    pub fn get(&self, id: &str) -> Option<Arc<LootTable>> {
        self.tables.read().get(id).cloned()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.tables.read().contains_key(id)
    }

    /// Registered ids, sorted.
    pub fn ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.tables.read().keys().cloned().collect();
        ids.sort_unstable();
        ids
    }

    pub fn len(&self) -> usize {
        self.tables.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.read().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::LootTableRegistry;
    use crate::{
        error::{LootError, LootErrorKind},
        loot::{LootPool, LootTable, test::item_rules},
    };

    #[test]
    fn duplicate_ids_keep_the_first_table() {
        let registry = LootTableRegistry::new();
        let first = registry.register(LootTable::new("dup")).unwrap();

        let mut second = LootTable::new("dup");
        second.add_pool(LootPool::default());
        let err = registry.register(second).unwrap_err();
        assert!(matches!(&err, LootError::DuplicateTable(id) if id == "dup"));
        assert_eq!(err.kind(), LootErrorKind::Validation);

        let stored = registry.get("dup").unwrap();
        assert!(Arc::ptr_eq(&first, &stored));
        assert!(stored.pools().is_empty());
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn registries_are_independent() {
        let a = LootTableRegistry::new();
        let b = LootTableRegistry::new();
        a.register(LootTable::new("chests/village")).unwrap();
        assert!(a.contains("chests/village"));
        assert!(!b.contains("chests/village"));
        assert!(b.is_empty());
    }

    #[test]
    fn create_parses_and_registers() {
        let registry = LootTableRegistry::new();
        let rules = item_rules();
        registry
            .create(
                "chests/b",
                r#"{ "pools": [ { "rolls": 1, "entries": [ { "weight": 1, "value": "apple" } ] } ] }"#,
                &rules,
            )
            .unwrap();
        registry
            .create("chests/a", r#"{ "pools": [] }"#, &rules)
            .unwrap();
        assert_eq!(registry.ids(), ["chests/a", "chests/b"]);
        assert!(matches!(
            registry.create("chests/a", r#"{ "pools": [] }"#, &rules),
            Err(LootError::DuplicateTable(_))
        ));
    }
}
