use hopper_config::SpawnConfig;
use hopper_util::{
    math::{direction_from_rotation, number_range::NumberRange, vector3::Vector3},
    random::RandomImpl,
};

use crate::item::ItemStack;

/// A dropped item living in the host world.
pub trait ItemEntity {
    fn apply_impulse(&mut self, impulse: Vector3<f64>);
}

/// The part of a host world loot can be spawned into.
pub trait Dimension {
    type Entity: ItemEntity;

    fn spawn_item(&mut self, stack: ItemStack, location: Vector3<f64>) -> Self::Entity;
}

/// Drops items into a [`Dimension`], each pushed in a random upward-and-outward direction.
#[derive(Clone, Debug)]
pub struct EntrySpawner {
    pitch: NumberRange,
    yaw: NumberRange,
    impulse: f64,
}

impl Default for EntrySpawner {
    fn default() -> Self {
        Self::new(&SpawnConfig::default())
    }
}

impl EntrySpawner {
    pub fn new(config: &SpawnConfig) -> Self {
        Self {
            pitch: NumberRange::new(config.min_pitch, config.max_pitch),
            yaw: NumberRange::new(config.min_yaw, config.max_yaw),
            impulse: config.impulse,
        }
    }

    /// A push of the configured magnitude along a random rotation.
    pub fn random_impulse(&self, random: &mut dyn RandomImpl) -> Vector3<f64> {
        let pitch = self.pitch.generate(random);
        let yaw = self.yaw.generate(random);
        direction_from_rotation(yaw, pitch) * self.impulse
    }

    pub fn spawn<D: Dimension + ?Sized>(
        &self,
        items: Vec<ItemStack>,
        dimension: &mut D,
        location: Vector3<f64>,
        random: &mut dyn RandomImpl,
    ) -> Vec<D::Entity> {
        items
            .into_iter()
            .filter(|stack| !stack.is_empty())
            .map(|stack| {
                let mut entity = dimension.spawn_item(stack, location);
                entity.apply_impulse(self.random_impulse(random));
                entity
            })
            .collect()
    }
}
