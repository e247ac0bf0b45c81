use std::{
    sync::atomic::{AtomicU64, Ordering},
    time,
};

use enum_dispatch::enum_dispatch;
use seeded::{SeededRandom, ThreadRandom};
use thiserror::Error;

pub mod seeded;

static SEED_UNIQUIFIER: AtomicU64 = AtomicU64::new(8682522807148012u64);

pub fn get_seed() -> u64 {
    let seed = SEED_UNIQUIFIER
        .fetch_update(Ordering::Relaxed, Ordering::Relaxed, |val| {
            Some(val.wrapping_mul(1181783497276652981u64))
        })
        .unwrap_or_else(|val| val);

    let nanos = time::SystemTime::now()
        .duration_since(time::SystemTime::UNIX_EPOCH)
        .map(|duration| duration.as_nanos())
        .unwrap_or_default();

    let nano_upper = (nanos >> 8) as u64;
    let nano_lower = nanos as u64;
    seed ^ nano_upper ^ nano_lower
}

#[enum_dispatch(RandomImpl)]
pub enum RandomGenerator {
    Seeded(SeededRandom),
    Thread(ThreadRandom),
}

impl RandomGenerator {
    pub fn seeded(seed: u64) -> Self {
        Self::Seeded(SeededRandom::from_seed(seed))
    }

    /// Seeded from [`get_seed`], so two generators made back to back still differ.
    pub fn fresh() -> Self {
        Self::seeded(get_seed())
    }

    pub fn thread() -> Self {
        Self::Thread(ThreadRandom)
    }
}

#[enum_dispatch]
pub trait RandomImpl {
    fn next_i32(&mut self) -> i32;

    /// Uniform in `[0, bound)`. `bound` must be positive.
    fn next_bounded_i32(&mut self, bound: i32) -> i32;

    /// Uniform in `[min, max]`.
    fn next_inbetween_i32(&mut self, min: i32, max: i32) -> i32 {
        self.next_bounded_i32(max - min + 1) + min
    }

    /// Uniform in `[0, bound)`. `bound` must be positive.
    fn next_bounded_usize(&mut self, bound: usize) -> usize;

    fn next_bool(&mut self) -> bool;

    /// Uniform in `[0, 1)`.
    fn next_f64(&mut self) -> f64;

    /// `true` with probability `chance`.
    fn chance(&mut self, chance: f64) -> bool {
        self.next_f64() < chance
    }
}

#[derive(Error, Debug, PartialEq)]
pub enum WeightError {
    #[error("Cannot choose from an empty list of weights")]
    Empty,
    #[error("Weight at index {index} is not a finite non-negative number ({weight})")]
    InvalidWeight { index: usize, weight: f64 },
    #[error("Weights sum to zero")]
    ZeroSum,
}

/// Picks an index with probability proportional to its weight.
///
/// Draws `r` uniformly in `[0, sum)` and walks the list accumulating weight; the first index whose
/// running total exceeds `r` wins. For whole-number weights this is the same as drawing an integer
/// in `[1, sum]` and taking the first running total `>=` the draw, with earlier entries winning at
/// the boundary.
pub fn choose_by_weight<R: RandomImpl + ?Sized>(
    random: &mut R,
    weights: &[f64],
) -> Result<usize, WeightError> {
    if weights.is_empty() {
        return Err(WeightError::Empty);
    }
    if let Some((index, weight)) = weights
        .iter()
        .enumerate()
        .find(|(_, weight)| !weight.is_finite() || **weight < 0.0)
    {
        return Err(WeightError::InvalidWeight {
            index,
            weight: *weight,
        });
    }

    let sum: f64 = weights.iter().sum();
    if sum <= 0.0 {
        return Err(WeightError::ZeroSum);
    }

    let draw = random.next_f64() * sum;
    let mut total = 0.0;
    for (index, weight) in weights.iter().enumerate() {
        total += weight;
        if total > draw {
            return Ok(index);
        }
    }

    // Float rounding can leave `total` a hair under `draw`; fall back to the last weighted entry.
    Ok(weights
        .iter()
        .rposition(|weight| *weight > 0.0)
        .unwrap_or(weights.len() - 1))
}

/// Fisher-Yates shuffle into a new `Vec`.
pub fn shuffle<T, R: RandomImpl + ?Sized>(random: &mut R, items: Vec<T>) -> Vec<T> {
    let mut items = items;
    for i in (1..items.len()).rev() {
        let j = random.next_bounded_usize(i + 1);
        items.swap(i, j);
    }
    items
}

/// Uniform pick from a slice; `None` when it is empty.
pub fn choose<'a, T, R: RandomImpl + ?Sized>(random: &mut R, items: &'a [T]) -> Option<&'a T> {
    if items.is_empty() {
        None
    } else {
        items.get(random.next_bounded_usize(items.len()))
    }
}
