//! End-of-session report.

use serde::Serialize;

use crate::attempt::Attempt;
use crate::error::DrillResult;

/// What the player sees once a session is done.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summary {
    /// Expressions in the session.
    pub total: u32,
    /// Wrong or unparsable answers, in the order given.
    pub mistakes: Vec<Attempt>,
    /// Seconds from the first expression to the last answer.
    pub elapsed_secs: f64,
}

impl Summary {
    /// Number of missed expressions.
    pub fn missed(&self) -> u32 {
        self.mistakes.len() as u32
    }

    /// Number of correct answers.
    pub fn correct(&self) -> u32 {
        self.total.saturating_sub(self.missed())
    }

    /// Share of correct answers in `0.0..=1.0`.
    pub fn accuracy(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        f64::from(self.correct()) / f64::from(self.total)
    }

    /// Pretty-printed JSON.
    pub fn to_json(&self) -> DrillResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

impl std::fmt::Display for Summary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Missed {} out of {}", self.missed(), self.total)?;
        write!(f, "Total time {}", self.elapsed_secs)?;
        for attempt in &self.mistakes {
            write!(f, "\n{attempt}")?;
        }
        Ok(())
    }
}
