//! # random.rs
//!
//! Source of the values inserted by the `rand` key.
//!
//! The engine only asks for "the next value in `[0, 1)`"; tests plug in
//! [`FixedRandom`] to make `rand` deterministic.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Produces uniformly distributed values in `[0, 1)`.
pub trait RandomSource {
    /// Returns the next value. Must be in `[0, 1)`.
    fn next_f64(&mut self) -> f64;
}

impl<R: RandomSource + ?Sized> RandomSource for Box<R> {
    fn next_f64(&mut self) -> f64 {
        (**self).next_f64()
    }
}

/// Non-reproducible source backed by an entropy-seeded [`StdRng`].
#[derive(Debug, Clone)]
pub struct SystemRandom {
    rng: StdRng,
}

impl SystemRandom {
    /// Creates a source seeded from the operating system.
    pub fn new() -> Self {
        Self { rng: StdRng::from_entropy() }
    }
}

impl Default for SystemRandom {
    fn default() -> Self {
        Self::new()
    }
}

impl RandomSource for SystemRandom {
    fn next_f64(&mut self) -> f64 {
        self.rng.gen::<f64>()
    }
}

/// Always returns the same value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixedRandom(pub f64);

impl RandomSource for FixedRandom {
    fn next_f64(&mut self) -> f64 {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_system_random_range() {
        let mut random = SystemRandom::new();
        for _ in 0..10_000 {
            let val = random.next_f64();
            assert!((0.0..1.0).contains(&val), "out of range: {}", val);
        }
    }

    #[test]
    fn test_system_random_varies() {
        let mut random = SystemRandom::new();
        let first = random.next_f64();
        assert!((0..100).any(|_| random.next_f64() != first));
    }

    #[test]
    fn test_fixed_random() {
        let mut random = FixedRandom(0.25);
        assert_eq!(random.next_f64(), 0.25);
        assert_eq!(random.next_f64(), 0.25);

        let mut boxed: Box<dyn RandomSource> = Box::new(FixedRandom(0.5));
        assert_eq!(boxed.next_f64(), 0.5);
    }
}
