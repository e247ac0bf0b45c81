use std::{fmt, sync::Arc};

use hopper_util::{
    math::number_range::NumberRange,
    random::{choose, shuffle},
};
use serde::Deserialize;

use super::LootContext;
use crate::{
    error::LootError,
    item::{Enchantment, ItemRules, ItemStack},
};

pub type ScriptFn = Arc<dyn Fn(&mut ItemStack) + Send + Sync>;

/// An enchantment id with a level or level range.
#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct EnchantmentSpec {
    pub id: String,
    pub level: NumberRange,
}

impl EnchantmentSpec {
    pub fn new(id: impl Into<String>, level: impl Into<NumberRange>) -> Self {
        Self {
            id: id.into(),
            level: level.into(),
        }
    }

    fn validate(&self) -> Result<(), LootError> {
        if self.id.is_empty() {
            return Err(LootError::InvalidDefinition(
                "enchantment id must not be empty".to_string(),
            ));
        }
        check_range(&self.level)
    }
}

/// A modification applied to a freshly cloned item before an entry hands it out.
#[derive(Clone)]
pub enum LootFunction {
    /// Range already clamped to `[1, max_stack_size]`.
    SetCount(NumberRange),
    /// Range already clamped to `[0, max_damage]`.
    SetDamage(NumberRange),
    AddEnchantment(EnchantmentSpec),
    /// Adds one enchantment picked at random from the list.
    AddEnchantmentOf(Vec<EnchantmentSpec>),
    /// Removes existing enchantments first.
    SetEnchantments(Vec<EnchantmentSpec>),
    EnchantRandomly,
    SetName(String),
    SetLore(Vec<String>),
    Script(ScriptFn),
}

impl fmt::Debug for LootFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SetCount(range) => f.debug_tuple("SetCount").field(range).finish(),
            Self::SetDamage(range) => f.debug_tuple("SetDamage").field(range).finish(),
            Self::AddEnchantment(spec) => f.debug_tuple("AddEnchantment").field(spec).finish(),
            Self::AddEnchantmentOf(specs) => {
                f.debug_tuple("AddEnchantmentOf").field(specs).finish()
            }
            Self::SetEnchantments(specs) => f.debug_tuple("SetEnchantments").field(specs).finish(),
            Self::EnchantRandomly => f.write_str("EnchantRandomly"),
            Self::SetName(name) => f.debug_tuple("SetName").field(name).finish(),
            Self::SetLore(lore) => f.debug_tuple("SetLore").field(lore).finish(),
            Self::Script(_) => f.write_str("Script(..)"),
        }
    }
}

impl LootFunction {
    pub fn apply(&self, stack: &mut ItemStack, context: &mut LootContext<'_>) -> Result<(), LootError> {
        match self {
            Self::SetCount(range) => {
                let count = range
                    .generate_u32(context.random)
                    .clamp(1, stack.get_max_stack_size().max(1) as u32);
                stack.item_count = count as u8;
            }
            Self::SetDamage(range) => {
                if !stack.has_durability() {
                    return Err(LootError::MissingDurability(stack.item.id.clone()));
                }
                stack.set_damage(range.generate_u32(context.random));
            }
            Self::AddEnchantment(spec) => add_enchantment(stack, spec, context)?,
            Self::AddEnchantmentOf(specs) => {
                if let Some(spec) = choose(context.random, specs) {
                    add_enchantment(stack, spec, context)?;
                }
            }
            Self::SetEnchantments(specs) => {
                stack.remove_all_enchantments();
                for spec in specs {
                    add_enchantment(stack, spec, context)?;
                }
            }
            Self::EnchantRandomly => enchant_randomly(stack, context),
            Self::SetName(name) => stack.custom_name = Some(name.clone()),
            Self::SetLore(lore) => stack.lore = lore.clone(),
            Self::Script(script) => script(stack),
        }
        Ok(())
    }
}

/// Looks up an enchantment, refusing one that allows no level at all.
pub(super) fn resolve_enchantment<'r>(
    rules: &'r dyn ItemRules,
    id: &str,
) -> Result<&'r Enchantment, LootError> {
    let enchantment = rules
        .get_enchantment(id)
        .ok_or_else(|| LootError::UnknownEnchantment(id.to_string()))?;
    if enchantment.max_level == 0 {
        return Err(LootError::InvalidDefinition(format!(
            "enchantment {:?} must allow at least level 1",
            enchantment.id
        )));
    }
    Ok(enchantment)
}

fn add_enchantment(
    stack: &mut ItemStack,
    spec: &EnchantmentSpec,
    context: &mut LootContext<'_>,
) -> Result<(), LootError> {
    let rules = context.rules;
    let enchantment = resolve_enchantment(rules, &spec.id)?;

    let level = spec
        .level
        .clamp(1.0, enchantment.max_level as f64)
        .generate_u32(context.random)
        .clamp(1, enchantment.max_level);

    if !rules.can_enchant(stack, enchantment, level) {
        return Err(LootError::EnchantmentRejected {
            enchantment: enchantment.id.clone(),
            level,
            item: stack.item.id.clone(),
        });
    }
    stack.add_enchantment(&enchantment.id, level);
    Ok(())
}

/// Applies a random, non-empty subset of the enchantments the item can take at level 1.
///
/// With `n` applicable enchantments the subset size is uniform in `[1, n - 1]` (or exactly 1 when
/// `n == 1`). Levels are drawn independently. Combinations the item rules refuse once earlier picks
/// are in place are skipped.
fn enchant_randomly(stack: &mut ItemStack, context: &mut LootContext<'_>) {
    let rules = context.rules;
    let applicable: Vec<&Enchantment> = rules
        .enchantments()
        .into_iter()
        .filter(|enchantment| {
            enchantment.max_level > 0 && rules.can_enchant(stack, enchantment, 1)
        })
        .collect();

    let count = match applicable.len() {
        0 => return,
        1 => 1,
        n => context.random.next_inbetween_i32(1, n as i32 - 1) as usize,
    };

    let mut picked = shuffle(context.random, applicable);
    picked.truncate(count);

    for enchantment in picked {
        let level = context
            .random
            .next_inbetween_i32(1, enchantment.max_level as i32) as u32;
        stack.remove_enchantment(&enchantment.id);
        if rules.can_enchant(stack, enchantment, level) {
            stack.add_enchantment(&enchantment.id, level);
        } else {
            log::debug!(
                "Skipping {} {} on {}, rejected by the item rules",
                enchantment.id,
                level,
                stack.item.id
            );
        }
    }
}

fn check_range(range: &NumberRange) -> Result<(), LootError> {
    if range.is_finite() {
        Ok(())
    } else {
        Err(LootError::InvalidRange {
            min: range.get_min(),
            max: range.get_max(),
        })
    }
}

/// Fluent registration of [`LootFunction`]s on an item entry.
///
/// Numeric ranges are clamped against the entry's item here, once, so a count of
/// `1..=1000` on an item stacking to 64 only ever yields `1..=64`.
pub struct EntryFunctions<'a> {
    pub(super) functions: &'a mut Vec<LootFunction>,
    pub(super) template: &'a ItemStack,
}

impl<'a> EntryFunctions<'a> {
    pub fn count(&mut self, count: impl Into<NumberRange>) -> Result<&mut Self, LootError> {
        let range = count.into();
        check_range(&range)?;
        let max = self.template.get_max_stack_size().max(1) as f64;
        self.functions
            .push(LootFunction::SetCount(range.clamp(1.0, max)));
        Ok(self)
    }

    pub fn damage(&mut self, damage: impl Into<NumberRange>) -> Result<&mut Self, LootError> {
        let range = damage.into();
        check_range(&range)?;
        let Some(max_damage) = self.template.item.max_damage else {
            return Err(LootError::MissingDurability(self.template.item.id.clone()));
        };
        self.functions
            .push(LootFunction::SetDamage(range.clamp(0.0, max_damage as f64)));
        Ok(self)
    }

    pub fn enchantments(&mut self) -> EnchantmentFunctions<'_> {
        EnchantmentFunctions {
            functions: &mut *self.functions,
        }
    }

    pub fn name(&mut self, name: impl Into<String>) -> &mut Self {
        self.functions.push(LootFunction::SetName(name.into()));
        self
    }

    pub fn lore<I, S>(&mut self, lines: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.functions.push(LootFunction::SetLore(
            lines.into_iter().map(Into::into).collect(),
        ));
        self
    }

    /// Arbitrary code run against every generated clone.
    pub fn script<F>(&mut self, script: F) -> &mut Self
    where
        F: Fn(&mut ItemStack) + Send + Sync + 'static,
    {
        self.functions.push(LootFunction::Script(Arc::new(script)));
        self
    }
}

/// Enchantment functions for an item entry. Enchantment ids are resolved when items are generated.
pub struct EnchantmentFunctions<'a> {
    functions: &'a mut Vec<LootFunction>,
}

impl EnchantmentFunctions<'_> {
    pub fn add(
        &mut self,
        id: impl Into<String>,
        level: impl Into<NumberRange>,
    ) -> Result<&mut Self, LootError> {
        let spec = EnchantmentSpec::new(id, level);
        spec.validate()?;
        self.functions.push(LootFunction::AddEnchantment(spec));
        Ok(self)
    }

    /// Each generated item gets one of `specs`, chosen uniformly.
    pub fn add_one_of(&mut self, specs: Vec<EnchantmentSpec>) -> Result<&mut Self, LootError> {
        if specs.is_empty() {
            return Err(LootError::InvalidDefinition(
                "at least one enchantment is required".to_string(),
            ));
        }
        specs.iter().try_for_each(EnchantmentSpec::validate)?;
        self.functions.push(LootFunction::AddEnchantmentOf(specs));
        Ok(self)
    }

    pub fn set(&mut self, specs: Vec<EnchantmentSpec>) -> Result<&mut Self, LootError> {
        specs.iter().try_for_each(EnchantmentSpec::validate)?;
        self.functions.push(LootFunction::SetEnchantments(specs));
        Ok(self)
    }

    pub fn random(&mut self) -> &mut Self {
        self.functions.push(LootFunction::EnchantRandomly);
        self
    }
}
