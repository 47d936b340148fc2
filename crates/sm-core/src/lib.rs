//! Arithmetic drill engine.
//!
//! Provides the session state machine (waiting, countdown, active, done),
//! a random expression generator behind an injectable source, answer
//! scoring, a cancellable countdown schedule, and the end-of-session summary.

pub mod attempt;
pub mod clock;
pub mod config;
pub mod error;
pub mod expression;
pub mod random;
pub mod session;
pub mod summary;
pub mod ticker;

pub use attempt::{Answer, Attempt};
pub use clock::{Clock, ManualClock, SystemClock};
pub use config::DrillConfig;
pub use error::{DrillError, DrillResult};
pub use expression::{Expression, Operator};
pub use random::{RandomSource, ScriptedSource, SeededSource};
pub use session::{Phase, Session, Snapshot, Submission};
pub use summary::Summary;
pub use ticker::Ticker;
