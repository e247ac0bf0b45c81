use std::ops::RangeInclusive;

use serde::Deserialize;

use crate::random::RandomImpl;

/// Maximum number of decimal scale-ups tried before drawing from a range with fractional bounds.
const MAX_SCALE_STEPS: u32 = 20;

/// An inclusive numeric range. A single value is a range whose bounds are equal.
///
/// Deserializes from either a bare number or a `{ "min": .., "max": .. }` object.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct NumberRange {
    min: f64,
    max: f64,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct MinMax {
    min: f64,
    max: f64,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawNumberRange {
    Constant(f64),
    Object(MinMax),
}

impl<'de> Deserialize<'de> for NumberRange {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        match RawNumberRange::deserialize(deserializer)? {
            RawNumberRange::Constant(value) => Ok(Self::constant(value)),
            RawNumberRange::Object(MinMax { min, max }) => Ok(Self::new(min, max)),
        }
    }
}

impl NumberRange {
    /// Bounds are normalized so `min <= max`.
    pub fn new(a: f64, b: f64) -> Self {
        Self {
            min: a.min(b),
            max: a.max(b),
        }
    }

    pub const fn constant(value: f64) -> Self {
        Self {
            min: value,
            max: value,
        }
    }

    pub fn get_min(&self) -> f64 {
        self.min
    }

    pub fn get_max(&self) -> f64 {
        self.max
    }

    pub fn is_finite(&self) -> bool {
        self.min.is_finite() && self.max.is_finite()
    }

    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }

    /// Pulls both bounds into `[lower, upper]`.
    pub fn clamp(&self, lower: f64, upper: f64) -> Self {
        Self {
            min: self.min.clamp(lower, upper),
            max: self.max.clamp(lower, upper),
        }
    }

    /// Uniform draw from the range.
    ///
    /// Fractional bounds are scaled by powers of ten until both are whole, the draw is taken over
    /// the scaled integers and the result is scaled back, so `{ min: 0.5, max: 1.5 }` yields one of
    /// `0.5, 0.6, ..., 1.5`.
    pub fn generate<R: RandomImpl + ?Sized>(&self, random: &mut R) -> f64 {
        let (mut min, mut max) = (self.min, self.max);
        let mut digit = 1.0;
        let mut steps = 0;
        while steps < MAX_SCALE_STEPS && (min.fract() != 0.0 || max.fract() != 0.0) {
            min *= 10.0;
            max *= 10.0;
            digit *= 10.0;
            steps += 1;
        }

        let value = (random.next_f64() * (max + 1.0 - min) + min).floor() / digit;
        value.clamp(self.min, self.max)
    }

    /// Draws a whole number, rounding a fractional draw down.
    pub fn generate_u32<R: RandomImpl + ?Sized>(&self, random: &mut R) -> u32 {
        self.generate(random).floor().max(0.0) as u32
    }
}

impl From<f64> for NumberRange {
    fn from(value: f64) -> Self {
        Self::constant(value)
    }
}

impl From<u32> for NumberRange {
    fn from(value: u32) -> Self {
        Self::constant(value as f64)
    }
}

impl From<i32> for NumberRange {
    fn from(value: i32) -> Self {
        Self::constant(value as f64)
    }
}

impl From<RangeInclusive<i32>> for NumberRange {
    fn from(range: RangeInclusive<i32>) -> Self {
        Self::new(*range.start() as f64, *range.end() as f64)
    }
}

impl From<RangeInclusive<f64>> for NumberRange {
    fn from(range: RangeInclusive<f64>) -> Self {
        Self::new(*range.start(), *range.end())
    }
}
