//! Injectable randomness for expression generation.

use std::collections::VecDeque;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// A source of uniform draws in `[0, 1)`.
///
/// Generation scales these draws itself, so a scripted source can pin down
/// exact operands and operators in tests.
pub trait RandomSource {
    /// Next uniform draw in `[0, 1)`.
    fn unit(&mut self) -> f64;
}

/// Pseudo-random source backed by [`StdRng`].
#[derive(Debug, Clone)]
pub struct SeededSource {
    rng: StdRng,
}

impl SeededSource {
    /// Deterministic source for a given seed.
    pub fn from_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Source seeded from operating system entropy.
    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_os_rng(),
        }
    }

    /// Seeded when a seed is given, entropy otherwise.
    pub fn new(seed: Option<u64>) -> Self {
        match seed {
            Some(seed) => Self::from_seed(seed),
            None => Self::from_entropy(),
        }
    }
}

impl RandomSource for SeededSource {
    fn unit(&mut self) -> f64 {
        self.rng.random::<f64>()
    }
}

/// Replays a fixed sequence of draws, cycling when exhausted.
#[derive(Debug, Clone, Default)]
pub struct ScriptedSource {
    draws: VecDeque<f64>,
}

impl ScriptedSource {
    /// Build a source from draws in `[0, 1)`. Out-of-range values are clamped.
    pub fn new(draws: impl IntoIterator<Item = f64>) -> Self {
        Self {
            draws: draws
                .into_iter()
                .map(|d| d.clamp(0.0, 1.0 - f64::EPSILON))
                .collect(),
        }
    }
}

impl RandomSource for ScriptedSource {
    fn unit(&mut self) -> f64 {
        match self.draws.pop_front() {
            Some(d) => {
                self.draws.push_back(d);
                d
            }
            None => 0.0,
        }
    }
}
