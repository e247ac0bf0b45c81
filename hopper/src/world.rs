use hopper_util::math::vector3::Vector3;
use hopper_world::{
    item::ItemStack,
    loot::{Dimension, ItemEntity},
};

use crate::describe_stack;

/// Stand-in world that logs every item entity instead of simulating it.
#[derive(Default)]
pub struct LoggingWorld {
    next_entity_id: u32,
}

pub struct LoggedItem {
    pub entity_id: u32,
    pub stack: ItemStack,
    pub velocity: Vector3<f64>,
}

impl ItemEntity for LoggedItem {
    fn apply_impulse(&mut self, impulse: Vector3<f64>) {
        self.velocity += impulse;
        log::info!(
            "Entity #{} ({}) pushed by ({:.3}, {:.3}, {:.3})",
            self.entity_id,
            describe_stack(&self.stack),
            impulse.x,
            impulse.y,
            impulse.z
        );
    }
}

impl Dimension for LoggingWorld {
    type Entity = LoggedItem;

    fn spawn_item(&mut self, stack: ItemStack, location: Vector3<f64>) -> LoggedItem {
        self.next_entity_id += 1;
        log::debug!(
            "Spawning entity #{} at ({}, {}, {})",
            self.next_entity_id,
            location.x,
            location.y,
            location.z
        );
        LoggedItem {
            entity_id: self.next_entity_id,
            stack,
            velocity: Vector3::default(),
        }
    }
}
