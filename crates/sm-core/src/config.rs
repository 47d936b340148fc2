//! Configuration for a drill session.

use std::ops::RangeInclusive;

use crate::error::{DrillError, DrillResult};

/// Number of expressions in a session unless overridden.
pub const DEFAULT_TOTAL: u32 = 10;

/// Seconds counted down before the first expression.
pub const DEFAULT_COUNTDOWN: u32 = 3;

/// Smallest operand drawn unless overridden.
pub const DEFAULT_MIN_OPERAND: i64 = 0;

/// Largest operand drawn unless overridden.
pub const DEFAULT_MAX_OPERAND: i64 = 10;

/// Largest operand magnitude accepted, keeping every product within `i64`.
pub const MAX_OPERAND_MAGNITUDE: i64 = 1_000_000;

/// Configuration for a drill session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DrillConfig {
    /// Expressions answered per session.
    pub total: u32,
    /// Countdown length in one-second ticks.
    pub countdown: u32,
    /// Smallest operand (inclusive).
    pub min_operand: i64,
    /// Largest operand (inclusive).
    pub max_operand: i64,
    /// RNG seed for reproducible expressions. `None` seeds from the OS.
    pub seed: Option<u64>,
}

impl Default for DrillConfig {
    fn default() -> Self {
        Self {
            total: DEFAULT_TOTAL,
            countdown: DEFAULT_COUNTDOWN,
            min_operand: DEFAULT_MIN_OPERAND,
            max_operand: DEFAULT_MAX_OPERAND,
            seed: None,
        }
    }
}

impl DrillConfig {
    /// Set the number of expressions per session.
    pub fn with_total(mut self, total: u32) -> Self {
        self.total = total;
        self
    }

    /// Set the countdown length in ticks.
    pub fn with_countdown(mut self, countdown: u32) -> Self {
        self.countdown = countdown;
        self
    }

    /// Set the inclusive operand range.
    pub fn with_operands(mut self, min: i64, max: i64) -> Self {
        self.min_operand = min;
        self.max_operand = max;
        self
    }

    /// Set the RNG seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// The inclusive range operands are drawn from.
    pub fn operand_range(&self) -> RangeInclusive<i64> {
        self.min_operand..=self.max_operand
    }

    /// Check that the configuration can produce a playable session.
    pub fn validate(&self) -> DrillResult<()> {
        if self.total == 0 {
            return Err(DrillError::InvalidConfig(
                "a session needs at least one expression".to_string(),
            ));
        }
        if self.min_operand > self.max_operand {
            return Err(DrillError::InvalidConfig(format!(
                "operand range {}..={} is empty",
                self.min_operand, self.max_operand
            )));
        }
        let allowed = -MAX_OPERAND_MAGNITUDE..=MAX_OPERAND_MAGNITUDE;
        if !allowed.contains(&self.min_operand) || !allowed.contains(&self.max_operand) {
            return Err(DrillError::InvalidConfig(format!(
                "operands must lie within -{MAX_OPERAND_MAGNITUDE}..={MAX_OPERAND_MAGNITUDE}"
            )));
        }
        Ok(())
    }
}
