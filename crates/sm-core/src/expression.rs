//! Arithmetic expressions and their generation.

use std::ops::RangeInclusive;

use serde::{Deserialize, Serialize};

use crate::random::RandomSource;

/// A binary arithmetic operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Operator {
    /// Addition.
    #[serde(rename = "+")]
    Add,
    /// Subtraction. Results may be negative.
    #[serde(rename = "-")]
    Sub,
    /// Multiplication.
    #[serde(rename = "*")]
    Mul,
}

impl Operator {
    /// Operators in draw order: a draw's third picks one of these.
    pub const DRAW_ORDER: [Operator; 3] = [Operator::Add, Operator::Mul, Operator::Sub];

    /// The symbol shown to the player.
    pub fn symbol(self) -> char {
        match self {
            Self::Add => '+',
            Self::Sub => '-',
            Self::Mul => '*',
        }
    }

    /// Apply the operator.
    pub fn apply(self, lhs: i64, rhs: i64) -> i64 {
        match self {
            Self::Add => lhs + rhs,
            Self::Sub => lhs - rhs,
            Self::Mul => lhs * rhs,
        }
    }

    /// Pick an operator from a uniform draw in `[0, 1)`.
    ///
    /// # Panics
    ///
    /// Panics if the draw lies outside `[0, 1)`, which no [`RandomSource`]
    /// may produce.
    pub fn from_draw(draw: f64) -> Self {
        let choice = (draw * Self::DRAW_ORDER.len() as f64).floor() as usize;
        match Self::DRAW_ORDER.get(choice) {
            Some(op) => *op,
            None => unreachable!("operator draw {draw} outside [0, 1)"),
        }
    }
}

impl std::fmt::Display for Operator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

/// One arithmetic prompt with its precomputed answer.
///
/// Fields are private so `result` can never drift from the operands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Expression {
    lhs: i64,
    rhs: i64,
    operator: Operator,
    result: i64,
}

impl Expression {
    /// Build an expression, computing its result.
    pub fn new(lhs: i64, operator: Operator, rhs: i64) -> Self {
        Self {
            lhs,
            rhs,
            operator,
            result: operator.apply(lhs, rhs),
        }
    }

    /// Draw a fresh expression: left operand, right operand, then operator.
    pub fn generate<R: RandomSource + ?Sized>(rng: &mut R, range: &RangeInclusive<i64>) -> Self {
        let lhs = draw_operand(rng, range);
        let rhs = draw_operand(rng, range);
        let operator = Operator::from_draw(rng.unit());
        Self::new(lhs, operator, rhs)
    }

    /// Left operand.
    pub fn lhs(&self) -> i64 {
        self.lhs
    }

    /// Right operand.
    pub fn rhs(&self) -> i64 {
        self.rhs
    }

    /// The operator.
    pub fn operator(&self) -> Operator {
        self.operator
    }

    /// The correct answer.
    pub fn result(&self) -> i64 {
        self.result
    }
}

impl std::fmt::Display for Expression {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {} {}", self.lhs, self.operator, self.rhs)
    }
}

/// Scale a uniform draw onto the range and round to the nearest integer.
/// Halves round up, towards positive infinity, on either side of zero.
fn draw_operand<R: RandomSource + ?Sized>(rng: &mut R, range: &RangeInclusive<i64>) -> i64 {
    let (min, max) = (*range.start(), *range.end());
    let span = (max - min) as f64;
    let value = (rng.unit() * span + min as f64 + 0.5).floor() as i64;
    value.clamp(min, max)
}
