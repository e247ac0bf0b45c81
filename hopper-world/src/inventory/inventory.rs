use std::fmt::Debug;

use crate::item::ItemStack;

/// A fixed number of slots, each holding at most one stack.
pub trait Container: Debug {
    fn size(&self) -> usize;

    fn get_stack(&self, slot: usize) -> Option<&ItemStack>;

    fn get_stack_mut(&mut self, slot: usize) -> Option<&mut ItemStack>;

    /// Writes to a slot outside the container are ignored.
    fn set_stack(&mut self, slot: usize, stack: Option<ItemStack>);

    fn remove_stack(&mut self, slot: usize) -> Option<ItemStack> {
        let stack = self.get_stack(slot).cloned();
        self.set_stack(slot, None);
        stack
    }

    fn get_max_count_per_stack(&self) -> u8 {
        64
    }

    /// How many of `stack` one slot can hold.
    fn get_max_count_for(&self, stack: &ItemStack) -> u8 {
        self.get_max_count_per_stack().min(stack.get_max_stack_size())
    }

    fn has_stack(&self, slot: usize) -> bool {
        self.get_stack(slot).is_some_and(|stack| !stack.is_empty())
    }

    fn empty_slots(&self) -> usize {
        (0..self.size()).filter(|slot| !self.has_stack(*slot)).count()
    }

    fn is_empty(&self) -> bool {
        self.empty_slots() == self.size()
    }

    fn clear(&mut self) {
        for slot in 0..self.size() {
            self.set_stack(slot, None);
        }
    }

    /// Total count of an item id across all slots.
    fn count(&self, item_id: &str) -> u32 {
        (0..self.size())
            .filter_map(|slot| self.get_stack(slot))
            .filter(|stack| stack.item.id == item_id)
            .map(|stack| stack.item_count as u32)
            .sum()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SimpleContainer {
    slots: Vec<Option<ItemStack>>,
    max_count_per_stack: u8,
}

impl SimpleContainer {
    pub fn new(size: usize) -> Self {
        Self {
            slots: vec![None; size],
            max_count_per_stack: 64,
        }
    }

    #[must_use]
    pub fn with_max_count_per_stack(mut self, max_count_per_stack: u8) -> Self {
        self.max_count_per_stack = max_count_per_stack;
        self
    }

    pub fn slots(&self) -> &[Option<ItemStack>] {
        &self.slots
    }
}

impl Container for SimpleContainer {
    fn size(&self) -> usize {
        self.slots.len()
    }

    fn get_stack(&self, slot: usize) -> Option<&ItemStack> {
        self.slots.get(slot)?.as_ref()
    }

    fn get_stack_mut(&mut self, slot: usize) -> Option<&mut ItemStack> {
        self.slots.get_mut(slot)?.as_mut()
    }

    fn set_stack(&mut self, slot: usize, stack: Option<ItemStack>) {
        if let Some(current) = self.slots.get_mut(slot) {
            *current = stack.filter(|stack| !stack.is_empty());
        }
    }

    fn get_max_count_per_stack(&self) -> u8 {
        self.max_count_per_stack
    }
}
