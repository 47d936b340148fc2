//! Subcommand implementations and the session flags they share.

pub mod drill;
pub mod play;

use clap::Args;

use sm_core::DrillConfig;
use sm_core::config::{
    DEFAULT_COUNTDOWN, DEFAULT_MAX_OPERAND, DEFAULT_MIN_OPERAND, DEFAULT_TOTAL,
};

/// Session settings accepted by every subcommand.
#[derive(Debug, Clone, Args)]
pub struct SessionArgs {
    /// Number of expressions per session
    #[arg(short = 'n', long, default_value_t = DEFAULT_TOTAL)]
    pub count: u32,

    /// Seconds to count down before the first expression
    #[arg(short, long, default_value_t = DEFAULT_COUNTDOWN)]
    pub countdown: u32,

    /// Smallest operand
    #[arg(long, default_value_t = DEFAULT_MIN_OPERAND, allow_negative_numbers = true)]
    pub min: i64,

    /// Largest operand
    #[arg(long, default_value_t = DEFAULT_MAX_OPERAND, allow_negative_numbers = true)]
    pub max: i64,

    /// RNG seed for a reproducible sequence of expressions
    #[arg(short, long)]
    pub seed: Option<u64>,
}

impl SessionArgs {
    /// Build and validate the drill configuration.
    pub fn to_config(&self) -> Result<DrillConfig, String> {
        let mut config = DrillConfig::default()
            .with_total(self.count)
            .with_countdown(self.countdown)
            .with_operands(self.min, self.max);
        if let Some(seed) = self.seed {
            config = config.with_seed(seed);
        }
        config.validate().map_err(|e| e.to_string())?;
        Ok(config)
    }
}
