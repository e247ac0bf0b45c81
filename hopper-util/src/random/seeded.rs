use rand::{Rng, SeedableRng, rngs::StdRng};

use super::RandomImpl;

/// Deterministic generator; the same seed always yields the same sequence.
pub struct SeededRandom {
    rng: StdRng,
}

impl SeededRandom {
    pub fn from_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl RandomImpl for SeededRandom {
    fn next_i32(&mut self) -> i32 {
        self.rng.random()
    }

    fn next_bounded_i32(&mut self, bound: i32) -> i32 {
        self.rng.random_range(0..bound)
    }

    fn next_bounded_usize(&mut self, bound: usize) -> usize {
        self.rng.random_range(0..bound)
    }

    fn next_bool(&mut self) -> bool {
        self.rng.random()
    }

    fn next_f64(&mut self) -> f64 {
        self.rng.random()
    }
}

/// Backed by the thread-local generator.
pub struct ThreadRandom;

impl RandomImpl for ThreadRandom {
    fn next_i32(&mut self) -> i32 {
        rand::rng().random()
    }

    fn next_bounded_i32(&mut self, bound: i32) -> i32 {
        rand::rng().random_range(0..bound)
    }

    fn next_bounded_usize(&mut self, bound: usize) -> usize {
        rand::rng().random_range(0..bound)
    }

    fn next_bool(&mut self) -> bool {
        rand::rng().random()
    }

    fn next_f64(&mut self) -> f64 {
        rand::rng().random()
    }
}
