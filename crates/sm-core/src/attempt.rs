//! Submitted answers and the mistakes recorded from them.

use serde::Serialize;

use crate::expression::Expression;

/// What the player submitted for an expression.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Answer {
    /// A parsed integer.
    Value(i64),
    /// Input that is not an integer, kept verbatim (trimmed).
    Invalid(String),
}

impl Answer {
    /// Parse raw input. Surrounding whitespace is ignored, so a trailing
    /// space from the confirm key does not spoil the answer.
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        match trimmed.parse::<i64>() {
            Ok(value) => Self::Value(value),
            Err(_) => Self::Invalid(trimmed.to_string()),
        }
    }

    /// Whether this answer equals `expected`. Invalid input never matches.
    pub fn matches(&self, expected: i64) -> bool {
        matches!(self, Self::Value(v) if *v == expected)
    }

    /// Whether the input failed to parse.
    pub fn is_invalid(&self) -> bool {
        matches!(self, Self::Invalid(_))
    }
}

impl std::fmt::Display for Answer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Value(v) => write!(f, "{v}"),
            Self::Invalid(raw) if raw.is_empty() => f.write_str("(blank)"),
            Self::Invalid(raw) => f.write_str(raw),
        }
    }
}

/// An expression the player got wrong.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Attempt {
    /// The prompt that was shown.
    pub expression: Expression,
    /// What was submitted.
    pub answer: Answer,
}

impl std::fmt::Display for Attempt {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} != {}, correct {}",
            self.expression,
            self.answer,
            self.expression.result()
        )
    }
}
