use std::collections::HashMap;

use hopper_config::LootConfig;
use hopper_util::{
    math::vector3::Vector3,
    random::{RandomGenerator, RandomImpl},
};

use super::{
    Dimension, EnchantmentSpec, ItemEntity, LootContext, LootEntry, LootPool, LootTable,
    LootTableRegistry,
};
use crate::{
    error::{LootError, LootErrorKind},
    inventory::{Container, SimpleContainer},
    item::{Enchantment, Item, ItemRegistry, ItemRules, ItemStack, normalize_id},
};

pub(crate) fn item_rules() -> ItemRegistry {
    ItemRegistry::default()
        .with_item(Item::new("minecraft:apple", 64))
        .with_item(Item::new("minecraft:stick", 64))
        .with_item(Item::new("minecraft:ender_pearl", 16))
        .with_item(Item::tool("minecraft:iron_sword", 250))
        .with_enchantment(
            Enchantment::new("minecraft:sharpness", 5)
                .supporting(["minecraft:iron_sword"])
                .exclusive_with(["minecraft:smite"]),
        )
        .with_enchantment(Enchantment::new("minecraft:smite", 5))
        .with_enchantment(Enchantment::new("minecraft:unbreaking", 3))
        .with_enchantment(Enchantment::new("minecraft:mending", 1))
}

struct Fixture {
    registry: LootTableRegistry,
    rules: ItemRegistry,
    config: LootConfig,
    random: RandomGenerator,
}

impl Fixture {
    fn new(seed: u64) -> Self {
        let _ = env_logger::builder().is_test(true).try_init();
        Self {
            registry: LootTableRegistry::new(),
            rules: item_rules(),
            config: LootConfig::default(),
            random: RandomGenerator::seeded(seed),
        }
    }

    fn context(&mut self) -> LootContext<'_> {
        LootContext::new(&self.registry, &self.rules, &self.config, &mut self.random)
    }

    fn entry(&self, id: &str, weight: f64) -> LootEntry {
        LootEntry::from_id(id, weight, &self.rules).unwrap()
    }

    fn single_pool_table(&self, id: &str, rolls: u32, entries: Vec<LootEntry>) -> LootTable {
        let mut pool = LootPool::new(rolls);
        pool.set_entries(entries);
        let mut table = LootTable::new(id);
        table.add_pool(pool);
        table
    }
}

fn ids(items: &[ItemStack]) -> Vec<&str> {
    items.iter().map(|item| item.item.id.as_str()).collect()
}

#[test]
fn weighted_draws_converge() {
    let mut fixture = Fixture::new(1);
    let mut pool = LootPool::new(1);
    pool.add_entry(fixture.entry("apple", 1.0))
        .add_entry(fixture.entry("stick", 4.0));

    let draws = 10_000;
    let mut sticks = 0;
    for _ in 0..draws {
        let entry = pool.choose_entry(&mut fixture.random).unwrap();
        if entry.template().unwrap().item.id == "minecraft:stick" {
            sticks += 1;
        }
    }
    let share = sticks as f64 / draws as f64;
    assert!((0.78..=0.82).contains(&share), "stick share {share}");
}

#[test]
fn every_pool_is_drawn_rolls_times() {
    let mut fixture = Fixture::new(2);
    let mut table = LootTable::new("chests/rolls");
    for rolls in [2, 0, 3] {
        let mut pool = LootPool::new(rolls);
        pool.add_entry(fixture.entry("apple", 1.0));
        table.add_pool(pool);
    }
    // A pool that is never drawn from may stay empty
    table.add_pool(LootPool::new(0));

    let items = table.roll(&mut fixture.context()).unwrap();
    assert_eq!(items.len(), 5);
}

#[test]
fn empty_pool_with_rolls_fails() {
    let mut fixture = Fixture::new(2);
    let mut table = LootTable::new("chests/empty");
    table.add_pool(LootPool::new(1));
    let err = table.roll(&mut fixture.context()).unwrap_err();
    assert!(matches!(err, LootError::EmptyPool));
    assert_eq!(err.kind(), LootErrorKind::Validation);
}

#[test]
fn results_follow_pool_order() {
    let mut fixture = Fixture::new(3);
    let mut table = LootTable::new("chests/ordered");
    for id in ["stick", "apple", "ender_pearl"] {
        let mut pool = LootPool::default();
        pool.add_entry(fixture.entry(id, 1.0));
        table.add_pool(pool);
    }
    let items = table.roll(&mut fixture.context()).unwrap();
    assert_eq!(
        ids(&items),
        ["minecraft:stick", "minecraft:apple", "minecraft:ender_pearl"]
    );

    let removed = table.remove_pool(0).unwrap();
    assert_eq!(removed.entries().len(), 1);
    let items = table.roll(&mut fixture.context()).unwrap();
    assert_eq!(ids(&items), ["minecraft:apple", "minecraft:ender_pearl"]);

    table.set_pools(Vec::new());
    assert!(table.roll(&mut fixture.context()).unwrap().is_empty());
}

#[test]
fn rolling_never_touches_the_template() {
    let mut fixture = Fixture::new(4);
    let mut entry = fixture.entry("apple", 1.0);
    entry.functions().unwrap().count(1..=64).unwrap().name("Shiny");
    let table = fixture.single_pool_table("chests/apples", 1, vec![entry]);

    let mut first = table.roll(&mut fixture.context()).unwrap();
    let second = table.roll(&mut fixture.context()).unwrap();
    let second_count = second[0].item_count;
    first[0].item_count = 0;
    first[0].custom_name = None;
    assert_eq!(second[0].item_count, second_count);
    assert_eq!(second[0].custom_name.as_deref(), Some("Shiny"));

    let template = table.pools()[0].entries()[0].template().unwrap();
    assert_eq!(template.item_count, 1);
    assert_eq!(template.custom_name, None);
}

#[test]
fn count_is_clamped_to_the_stack_size() {
    let mut fixture = Fixture::new(5);
    let mut entry = fixture.entry("apple", 1.0);
    entry.functions().unwrap().count(1..=1000).unwrap();
    let mut pearl = fixture.entry("ender_pearl", 1.0);
    pearl.functions().unwrap().count(20..=30).unwrap();
    let table = fixture.single_pool_table("chests/clamp", 1, vec![entry, pearl]);

    let mut seen_large = false;
    for _ in 0..500 {
        for item in table.roll(&mut fixture.context()).unwrap() {
            assert!((1..=item.get_max_stack_size()).contains(&item.item_count));
            if item.item.id == "minecraft:ender_pearl" {
                assert_eq!(item.item_count, 16);
            }
            seen_large |= item.item_count > 32;
        }
    }
    assert!(seen_large);
}

#[test]
fn nested_table_rolls_inline() {
    let mut fixture = Fixture::new(6);
    let inner = fixture.single_pool_table("b", 1, vec![fixture.entry("apple", 1.0)]);
    let mut reference = LootEntry::table(&inner, 1.0).unwrap();
    assert!(reference.functions().is_err());
    let outer = fixture.single_pool_table("a", 1, vec![reference]);
    fixture.registry.register(inner).unwrap();
    fixture.registry.register(outer).unwrap();

    let outer = fixture.registry.get("a").unwrap();
    let inner = fixture.registry.get("b").unwrap();
    let from_outer = outer.roll(&mut fixture.context()).unwrap();
    let from_inner = inner.roll(&mut fixture.context()).unwrap();

    assert_eq!(from_outer, from_inner);
    assert_eq!(ids(&from_outer), ["minecraft:apple"]);
    assert_eq!(from_outer[0].item_count, 1);
}

#[test]
fn nested_tables_apply_their_own_functions() {
    let mut fixture = Fixture::new(6);
    let mut named = fixture.entry("stick", 1.0);
    named.functions().unwrap().name("Inner");
    fixture
        .registry
        .register(fixture.single_pool_table("inner", 2, vec![named]))
        .unwrap();
    let outer = fixture.single_pool_table(
        "outer",
        1,
        vec![LootEntry::table("inner", 1.0).unwrap()],
    );

    let items = outer.roll(&mut fixture.context()).unwrap();
    assert_eq!(items.len(), 2);
    assert!(items
        .iter()
        .all(|item| item.custom_name.as_deref() == Some("Inner")));
}

#[test]
fn cyclic_tables_hit_the_depth_limit() {
    let mut fixture = Fixture::new(7);
    fixture
        .registry
        .register(fixture.single_pool_table(
            "loop",
            1,
            vec![LootEntry::table("loop", 1.0).unwrap()],
        ))
        .unwrap();
    fixture
        .registry
        .register(fixture.single_pool_table("ping", 1, vec![LootEntry::table("pong", 1.0).unwrap()]))
        .unwrap();
    fixture
        .registry
        .register(fixture.single_pool_table("pong", 1, vec![LootEntry::table("ping", 1.0).unwrap()]))
        .unwrap();

    for id in ["loop", "ping"] {
        let table = fixture.registry.get(id).unwrap();
        let err = table.roll(&mut fixture.context()).unwrap_err();
        assert!(matches!(err, LootError::RecursionLimit { depth: 32, .. }), "{err}");
        assert_eq!(err.kind(), LootErrorKind::Resolution);
    }

    // The context unwinds, so it stays usable for the next roll
    let looping = fixture.registry.get("loop").unwrap();
    let plain = fixture.single_pool_table("plain", 1, vec![fixture.entry("apple", 1.0)]);
    let mut context = fixture.context();
    assert!(looping.roll(&mut context).is_err());
    assert_eq!(context.depth(), 0);
    assert_eq!(plain.roll(&mut context).unwrap().len(), 1);
}

#[test]
fn depth_limit_counts_every_level() {
    let mut fixture = Fixture::new(8);
    fixture
        .registry
        .register(fixture.single_pool_table("t3", 1, vec![fixture.entry("apple", 1.0)]))
        .unwrap();
    for (id, next) in [("t2", "t3"), ("t1", "t2")] {
        fixture
            .registry
            .register(fixture.single_pool_table(id, 1, vec![LootEntry::table(next, 1.0).unwrap()]))
            .unwrap();
    }
    let top = fixture.registry.get("t1").unwrap();

    fixture.config.roll.max_depth = 3;
    assert_eq!(top.roll(&mut fixture.context()).unwrap().len(), 1);

    fixture.config.roll.max_depth = 2;
    assert!(matches!(
        top.roll(&mut fixture.context()),
        Err(LootError::RecursionLimit { table, depth: 2 }) if table == "t3"
    ));
}

#[test]
fn enchantment_functions() {
    let mut fixture = Fixture::new(9);

    let mut set = fixture.entry("iron_sword", 1.0);
    set.functions()
        .unwrap()
        .script(|stack| stack.add_enchantment("minecraft:unbreaking", 3))
        .enchantments()
        .set(vec![EnchantmentSpec::new("sharpness", 2..=9)])
        .unwrap();

    let mut one_of = fixture.entry("iron_sword", 1.0);
    one_of
        .functions()
        .unwrap()
        .enchantments()
        .add_one_of(vec![
            EnchantmentSpec::new("minecraft:unbreaking", 1),
            EnchantmentSpec::new("minecraft:mending", 1),
        ])
        .unwrap();

    for _ in 0..50 {
        let stack = set.get_item_stacks(&mut fixture.context()).unwrap().remove(0);
        assert_eq!(stack.enchantments.len(), 1);
        let level = stack.get_enchantment_level("sharpness").unwrap();
        assert!((2..=5).contains(&level));

        let stack = one_of.get_item_stacks(&mut fixture.context()).unwrap().remove(0);
        assert_eq!(stack.enchantments.len(), 1);
        assert!(
            stack.get_enchantment_level("unbreaking") == Some(1)
                || stack.get_enchantment_level("mending") == Some(1)
        );
    }
}

#[test]
fn enchantment_failures_surface() {
    let mut fixture = Fixture::new(10);

    let mut unknown = fixture.entry("iron_sword", 1.0);
    unknown
        .functions()
        .unwrap()
        .enchantments()
        .add("minecraft:fortune", 1)
        .unwrap();
    let err = unknown.get_item_stacks(&mut fixture.context()).unwrap_err();
    assert!(matches!(&err, LootError::UnknownEnchantment(id) if id == "minecraft:fortune"));
    assert_eq!(err.kind(), LootErrorKind::Resolution);

    let mut conflicting = fixture.entry("iron_sword", 1.0);
    conflicting
        .functions()
        .unwrap()
        .enchantments()
        .add("sharpness", 1)
        .unwrap()
        .add("smite", 1)
        .unwrap();
    assert!(matches!(
        conflicting.get_item_stacks(&mut fixture.context()),
        Err(LootError::EnchantmentRejected { .. })
    ));

    let mut on_food = fixture.entry("apple", 1.0);
    on_food
        .functions()
        .unwrap()
        .enchantments()
        .add("unbreaking", 1)
        .unwrap();
    assert!(on_food.get_item_stacks(&mut fixture.context()).is_err());
}

#[test]
fn random_enchanting_picks_a_legal_subset() {
    let mut fixture = Fixture::new(11);
    let mut sword = fixture.entry("iron_sword", 1.0);
    sword.functions().unwrap().enchantments().random();
    let mut apple = fixture.entry("apple", 1.0);
    apple.functions().unwrap().enchantments().random();

    let applicable = fixture.rules.enchantments().len();
    for _ in 0..200 {
        let stack = sword.get_item_stacks(&mut fixture.context()).unwrap().remove(0);
        assert!((1..applicable).contains(&stack.enchantments.len()));
        assert!(!(stack.get_enchantment_level("sharpness").is_some()
            && stack.get_enchantment_level("smite").is_some()));
        for instance in &stack.enchantments {
            let enchantment = fixture.rules.get_enchantment(&instance.id).unwrap();
            assert!((1..=enchantment.max_level).contains(&instance.level));
        }

        let stack = apple.get_item_stacks(&mut fixture.context()).unwrap().remove(0);
        assert!(stack.enchantments.is_empty());
    }
}

/// Item rules that accept every enchantment, including one that allows no level.
struct PermissiveRules {
    inner: ItemRegistry,
    curse: Enchantment,
}

impl ItemRules for PermissiveRules {
    fn get_item(&self, id: &str) -> Option<Item> {
        self.inner.get_item(id)
    }

    fn get_enchantment(&self, id: &str) -> Option<&Enchantment> {
        if normalize_id(id) == "curse" {
            Some(&self.curse)
        } else {
            self.inner.get_enchantment(id)
        }
    }

    fn enchantments(&self) -> Vec<&Enchantment> {
        let mut enchantments = self.inner.enchantments();
        enchantments.push(&self.curse);
        enchantments
    }

    fn can_enchant(&self, _stack: &ItemStack, _enchantment: &Enchantment, _level: u32) -> bool {
        true
    }
}

#[test]
fn levelless_enchantments_are_refused() {
    let registry = LootTableRegistry::new();
    let rules = PermissiveRules {
        inner: item_rules(),
        curse: Enchantment::new("minecraft:curse", 0),
    };
    let config = LootConfig::default();
    let mut random = RandomGenerator::seeded(12);

    let mut cursed = LootEntry::from_id("iron_sword", 1.0, &rules).unwrap();
    cursed
        .functions()
        .unwrap()
        .enchantments()
        .add("curse", 1)
        .unwrap();
    let err = cursed
        .get_item_stacks(&mut LootContext::new(&registry, &rules, &config, &mut random))
        .unwrap_err();
    assert!(matches!(err, LootError::InvalidDefinition(_)));
    assert_eq!(err.kind(), LootErrorKind::Validation);

    let mut random_sword = LootEntry::from_id("iron_sword", 1.0, &rules).unwrap();
    random_sword.functions().unwrap().enchantments().random();
    for _ in 0..100 {
        let stack = random_sword
            .get_item_stacks(&mut LootContext::new(&registry, &rules, &config, &mut random))
            .unwrap()
            .remove(0);
        assert!(!stack.enchantments.is_empty());
        assert!(stack.get_enchantment_level("curse").is_none());
    }

    let declared = LootTable::create(
        "chests/cursed",
        r#"{ "pools": [ { "entries": [ { "weight": 1, "value": { "item": {
            "id": "minecraft:iron_sword",
            "enchantments": [ { "id": "minecraft:curse", "level": 1 } ]
        } } } ] } ] }"#,
        &rules,
    );
    assert!(matches!(declared, Err(LootError::InvalidDefinition(_))));
}

fn loaded_table(fixture: &Fixture, id: &str) -> LootTable {
    let mut pearls = fixture.entry("ender_pearl", 1.0);
    pearls.functions().unwrap().count(1..=16).unwrap();
    let mut apples = fixture.entry("apple", 2.0);
    apples.functions().unwrap().count(1..=64).unwrap();
    let mut named_sticks = fixture.entry("stick", 1.0);
    named_sticks.functions().unwrap().count(8..=64).unwrap().name("Kindling");
    let sword = fixture.entry("iron_sword", 1.0);
    fixture.single_pool_table(
        id,
        12,
        vec![pearls, apples, named_sticks, sword, LootEntry::empty(1.0).unwrap()],
    )
}

fn totals(items: impl IntoIterator<Item = ItemStack>) -> HashMap<String, u32> {
    let mut totals = HashMap::new();
    for item in items {
        *totals.entry(item.item.id).or_default() += item.item_count as u32;
    }
    totals
}

#[test]
fn fill_conserves_items() {
    let mut fixture = Fixture::new(12);
    let table = loaded_table(&fixture, "chests/loaded");

    for size in [1, 5, 27, 54] {
        for _ in 0..20 {
            let rolled = table.roll(&mut fixture.context()).unwrap();
            let rolled_totals = totals(rolled.iter().cloned());

            let mut container = SimpleContainer::new(size);
            let mut random = RandomGenerator::seeded(size as u64);
            super::ContainerFiller::default()
                .fill(rolled, &mut container, &mut random, &fixture.rules)
                .unwrap();

            for stack in container.slots().iter().flatten() {
                assert!(stack.item_count >= 1);
                assert!(stack.item_count <= container.get_max_count_for(stack));
            }
            let placed = totals(container.slots().iter().flatten().cloned());
            for (id, count) in placed {
                assert!(count <= rolled_totals[&id], "{id}: {count} > {}", rolled_totals[&id]);
            }
        }
    }
}

#[test]
fn fill_loses_nothing_with_room_to_spare() {
    let mut fixture = Fixture::new(13);
    let table = loaded_table(&fixture, "chests/roomy");
    for seed in 0..20 {
        // The same seed makes `fill` roll exactly what was rolled here
        fixture.random = RandomGenerator::seeded(seed);
        let expected = totals(table.roll(&mut fixture.context()).unwrap());

        fixture.random = RandomGenerator::seeded(seed);
        let mut container = SimpleContainer::new(100);
        table.fill(&mut container, &mut fixture.context()).unwrap();
        assert_eq!(totals(container.slots().iter().flatten().cloned()), expected);
    }
}

#[test]
fn fill_always_terminates() {
    let mut fixture = Fixture::new(14);
    let ids = ["apple", "stick", "ender_pearl", "iron_sword"];
    for size in [1, 2, 9, 27, 64, 100] {
        for count in [0, 1, 50, 1000] {
            let items: Vec<ItemStack> = (0..count)
                .map(|index| {
                    let item = fixture.rules.get_item(ids[index % ids.len()]).unwrap();
                    let amount = fixture
                        .random
                        .next_inbetween_i32(1, item.max_stack_size as i32) as u8;
                    let mut stack = ItemStack::new(amount, item);
                    // Distinct names keep some stacks from merging
                    if index % 3 == 0 {
                        stack.custom_name = Some(format!("#{}", index % 7));
                    }
                    stack
                })
                .collect();
            let rolled: u32 = items.iter().map(|item| item.item_count as u32).sum();

            let mut container = SimpleContainer::new(size);
            let outcome = super::ContainerFiller::new(&fixture.config.fill)
                .fill(items, &mut container, &mut fixture.random, &fixture.rules)
                .unwrap();
            assert_eq!(outcome.placed + outcome.dropped, rolled);
            if outcome.dropped > 0 {
                assert_eq!(container.empty_slots(), 0);
            }
        }
    }
}

#[test]
fn fill_returns_the_same_container() {
    let mut fixture = Fixture::new(15);
    let table = fixture.single_pool_table("chests/one", 1, vec![fixture.entry("stick", 1.0)]);
    let mut container = SimpleContainer::new(9);
    let filled = table.fill(&mut container, &mut fixture.context()).unwrap();
    let free = (0..filled.size()).find(|slot| !filled.has_stack(*slot)).unwrap();
    filled.set_stack(free, Some(ItemStack::new(1, Item::new("minecraft:apple", 64))));
    assert_eq!(container.count("minecraft:stick"), 1);
    assert_eq!(container.count("minecraft:apple"), 1);
}

#[derive(Debug)]
struct RecordedEntity {
    stack: ItemStack,
    location: Vector3<f64>,
    impulses: Vec<Vector3<f64>>,
}

impl ItemEntity for RecordedEntity {
    fn apply_impulse(&mut self, impulse: Vector3<f64>) {
        self.impulses.push(impulse);
    }
}

#[derive(Default)]
struct RecordingDimension {
    spawned: usize,
}

impl Dimension for RecordingDimension {
    type Entity = RecordedEntity;

    fn spawn_item(&mut self, stack: ItemStack, location: Vector3<f64>) -> RecordedEntity {
        self.spawned += 1;
        RecordedEntity {
            stack,
            location,
            impulses: Vec::new(),
        }
    }
}

#[test]
fn spawn_pushes_every_item_once() {
    let mut fixture = Fixture::new(16);
    let table = fixture.single_pool_table(
        "chests/spawned",
        6,
        vec![fixture.entry("apple", 1.0), fixture.entry("stick", 1.0)],
    );
    let mut dimension = RecordingDimension::default();
    let location = Vector3::new(4.5, 64.0, -2.5);

    let entities = table
        .spawn(&mut dimension, location, &mut fixture.context())
        .unwrap();
    assert_eq!(entities.len(), 6);
    assert_eq!(dimension.spawned, 6);
    for entity in entities {
        assert!(!entity.stack.is_empty());
        assert_eq!(entity.location, location);
        assert_eq!(entity.impulses.len(), 1);
        let impulse = entity.impulses[0];
        assert!((impulse.length() - fixture.config.spawn.impulse).abs() < 1e-9);
        assert!(impulse.y > 0.0);
    }
}
