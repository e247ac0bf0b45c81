use hopper_config::FillConfig;
use hopper_util::random::{RandomImpl, shuffle};

use crate::{
    error::LootError,
    inventory::Container,
    item::{ItemRules, ItemStack},
};

/// What became of the items handed to [`ContainerFiller::fill`], counted in single items.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FillOutcome {
    pub placed: u32,
    pub dropped: u32,
}

/// Scatters rolled items over a container's slots.
///
/// Items and slots are shuffled, then the slots are swept in that fixed order over and over. A
/// sweep passes over each slot with `skip_chance`, otherwise moves a random part of a pending item
/// into it, either onto a matching stack with room left or into the empty slot. Pending items are
/// reshuffled after every move. Sweeping stops once nothing is pending or nothing pending can go
/// anywhere; what is left then is dropped.
#[derive(Clone, Debug)]
pub struct ContainerFiller {
    skip_chance: f64,
    max_sweeps: u32,
}

impl Default for ContainerFiller {
    fn default() -> Self {
        Self::new(&FillConfig::default())
    }
}

impl ContainerFiller {
    pub fn new(config: &FillConfig) -> Self {
        Self {
            skip_chance: config.skip_chance,
            max_sweeps: config.max_sweeps,
        }
    }

    /// Clears `container` and fills it with `items`.
    pub fn fill<C: Container + ?Sized>(
        &self,
        items: Vec<ItemStack>,
        container: &mut C,
        random: &mut dyn RandomImpl,
        rules: &dyn ItemRules,
    ) -> Result<FillOutcome, LootError> {
        container.clear();

        let items: Vec<ItemStack> = items.into_iter().filter(|item| !item.is_empty()).collect();
        let total = count_items(&items);
        let mut pending = shuffle(random, items);
        let slots: Vec<usize> = shuffle(random, (0..container.size()).collect());

        let mut sweeps = 0;
        while !pending.is_empty() && !is_settled(&pending, container, rules) {
            if sweeps >= self.max_sweeps {
                log::warn!(
                    "Container fill gave up after {sweeps} sweeps with {} stacks pending",
                    pending.len()
                );
                return Err(LootError::FillOverflow { sweeps });
            }
            sweeps += 1;

            for &slot in &slots {
                if pending.is_empty() {
                    break;
                }
                if random.chance(self.skip_chance) {
                    continue;
                }
                if place(&mut pending, slot, container, random, rules) {
                    pending = shuffle(random, pending);
                }
            }
        }

        let dropped = count_items(&pending);
        if dropped > 0 {
            log::debug!(
                "Dropped {dropped} items in {} stacks that did not fit the container",
                pending.len()
            );
        }
        Ok(FillOutcome {
            placed: total - dropped,
            dropped,
        })
    }
}

fn count_items(items: &[ItemStack]) -> u32 {
    items.iter().map(|item| item.item_count as u32).sum()
}

fn occupant<C: Container + ?Sized>(container: &C, slot: usize) -> Option<&ItemStack> {
    container.get_stack(slot).filter(|stack| !stack.is_empty())
}

/// Index of the first pending item `slot` can take, and how many of it fit.
fn accepted<C: Container + ?Sized>(
    pending: &[ItemStack],
    slot: usize,
    container: &C,
    rules: &dyn ItemRules,
) -> Option<(usize, u8)> {
    match occupant(container, slot) {
        None => pending.iter().enumerate().find_map(|(index, item)| {
            let room = container.get_max_count_for(item);
            (room > 0).then_some((index, room))
        }),
        Some(stack) => {
            let room = container
                .get_max_count_for(stack)
                .saturating_sub(stack.item_count);
            if room == 0 {
                return None;
            }
            pending
                .iter()
                .position(|item| rules.is_stackable(stack, item))
                .map(|index| (index, room))
        }
    }
}

/// Moves part of one pending item into `slot`. Returns whether anything moved.
fn place<C: Container + ?Sized>(
    pending: &mut Vec<ItemStack>,
    slot: usize,
    container: &mut C,
    random: &mut dyn RandomImpl,
    rules: &dyn ItemRules,
) -> bool {
    let Some((index, room)) = accepted(pending, slot, container, rules) else {
        return false;
    };

    let source = &mut pending[index];
    let amount = (random.next_inbetween_i32(1, source.item_count as i32) as u8).min(room);
    let moved = source.split(amount);
    let exhausted = source.is_empty();

    match container.get_stack_mut(slot).filter(|stack| !stack.is_empty()) {
        Some(stack) => stack.item_count += moved.item_count,
        None => container.set_stack(slot, Some(moved)),
    }

    if exhausted {
        pending.remove(index);
    }
    true
}

/// No pending item fits an empty slot or tops up a stack with room left.
fn is_settled<C: Container + ?Sized>(
    pending: &[ItemStack],
    container: &C,
    rules: &dyn ItemRules,
) -> bool {
    (0..container.size()).all(|slot| accepted(pending, slot, container, rules).is_none())
}
