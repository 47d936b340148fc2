//! The drill session state machine.
//!
//! `Session` owns the phase, the countdown, the current expression and the
//! mistake list. Front-ends feed it intents (start/reset, typed characters,
//! submit) and countdown ticks, and render a [`Snapshot`] of the result.
//!
//! ```text
//! Waiting --start--> CountingDown --ticks reach 0--> Active --last submit--> Done
//!    ^                    |                            |                      |
//!    +-------reset--------+------------reset-----------+                      |
//!                         ^----------------------start------------------------+
//! ```

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, info};

use crate::attempt::{Answer, Attempt};
use crate::clock::{Clock, SystemClock, elapsed_secs};
use crate::config::DrillConfig;
use crate::error::DrillResult;
use crate::expression::Expression;
use crate::random::{RandomSource, SeededSource};
use crate::summary::Summary;
use crate::ticker::Ticker;

/// Where a session is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    /// Nothing running; waiting for a start.
    Waiting,
    /// Counting down before the first expression.
    CountingDown,
    /// Expressions are being answered.
    Active,
    /// Every expression answered; a summary is available.
    Done,
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Waiting => write!(f, "waiting"),
            Self::CountingDown => write!(f, "counting down"),
            Self::Active => write!(f, "active"),
            Self::Done => write!(f, "done"),
        }
    }
}

/// Outcome of one submitted answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Submission {
    /// The expression that was answered.
    pub expression: Expression,
    /// The parsed answer.
    pub answer: Answer,
    /// Whether the answer was right.
    pub correct: bool,
    /// Whether this answer finished the session.
    pub finished: bool,
}

/// Read-only view of a session for rendering.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Snapshot {
    /// Current phase.
    pub phase: Phase,
    /// Ticks left before the first expression.
    pub countdown: u32,
    /// Expressions still to answer, including the current one.
    pub remaining: u32,
    /// Expressions per session.
    pub total: u32,
    /// The expression on screen, only while active.
    pub current: Option<Expression>,
    /// Pending typed input.
    pub input: String,
    /// Mistakes so far.
    pub mistakes: Vec<Attempt>,
    /// Seconds taken, only once done.
    pub elapsed_secs: Option<f64>,
}

/// A single-player arithmetic drill.
pub struct Session<R = SeededSource, C = SystemClock> {
    config: DrillConfig,
    rng: R,
    clock: C,
    ticker: Ticker,
    phase: Phase,
    countdown: u32,
    remaining: u32,
    current: Option<Expression>,
    mistakes: Vec<Attempt>,
    evaluations: u32,
    input: String,
    started_at: Option<DateTime<Utc>>,
    ended_at: Option<DateTime<Utc>>,
}

impl Session {
    /// Create a session using the configured seed and the system clock.
    pub fn new(config: DrillConfig) -> DrillResult<Self> {
        let rng = SeededSource::new(config.seed);
        Self::with_sources(config, rng, SystemClock)
    }
}

impl<R: RandomSource, C: Clock> Session<R, C> {
    /// Create a session with explicit randomness and time sources.
    pub fn with_sources(config: DrillConfig, rng: R, clock: C) -> DrillResult<Self> {
        config.validate()?;
        Ok(Self {
            config,
            rng,
            clock,
            ticker: Ticker::default(),
            phase: Phase::Waiting,
            countdown: 0,
            remaining: 0,
            current: None,
            mistakes: Vec::new(),
            evaluations: 0,
            input: String::new(),
            started_at: None,
            ended_at: None,
        })
    }

    /// The configuration in use.
    pub fn config(&self) -> &DrillConfig {
        &self.config
    }

    /// Current phase.
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Ticks left in the countdown.
    pub fn countdown(&self) -> u32 {
        self.countdown
    }

    /// Expressions left, including the one on screen.
    pub fn remaining(&self) -> u32 {
        self.remaining
    }

    /// The expression on screen.
    pub fn current(&self) -> Option<&Expression> {
        self.current.as_ref()
    }

    /// Mistakes recorded in this session.
    pub fn mistakes(&self) -> &[Attempt] {
        &self.mistakes
    }

    /// Answers evaluated in this session.
    pub fn evaluations(&self) -> u32 {
        self.evaluations
    }

    /// Pending typed input.
    pub fn input(&self) -> &str {
        &self.input
    }

    /// When the first expression was shown.
    pub fn started_at(&self) -> Option<DateTime<Utc>> {
        self.started_at
    }

    /// When the last expression was answered.
    pub fn ended_at(&self) -> Option<DateTime<Utc>> {
        self.ended_at
    }

    /// The countdown schedule.
    pub fn ticker(&self) -> &Ticker {
        &self.ticker
    }

    /// Seconds between the first expression and the last answer.
    pub fn elapsed_secs(&self) -> Option<f64> {
        match (self.started_at, self.ended_at) {
            (Some(start), Some(end)) => Some(elapsed_secs(start, end)),
            _ => None,
        }
    }

    /// The start/reset control: starts from `Waiting` or `Done`, resets
    /// otherwise. Returns the resulting phase.
    pub fn start_or_reset(&mut self) -> Phase {
        match self.phase {
            Phase::Waiting | Phase::Done => {
                self.start();
            }
            Phase::CountingDown | Phase::Active => {
                self.reset();
            }
        }
        self.phase
    }

    /// Begin a countdown. Ignored unless `Waiting` or `Done`.
    pub fn start(&mut self) -> bool {
        if !matches!(self.phase, Phase::Waiting | Phase::Done) {
            debug!(phase = %self.phase, "start ignored");
            return false;
        }
        self.discard();
        self.phase = Phase::CountingDown;
        self.countdown = self.config.countdown;
        debug!(countdown = self.countdown, "countdown started");

        if self.countdown == 0 {
            self.activate();
        } else {
            self.ticker.arm(self.clock.now());
        }
        true
    }

    /// Abandon a countdown or running session. Ignored unless
    /// `CountingDown` or `Active`. The unanswered expression is not scored.
    pub fn reset(&mut self) -> bool {
        if !matches!(self.phase, Phase::CountingDown | Phase::Active) {
            debug!(phase = %self.phase, "reset ignored");
            return false;
        }
        info!(
            phase = %self.phase,
            answered = self.evaluations,
            "session abandoned"
        );
        self.discard();
        self.phase = Phase::Waiting;
        true
    }

    /// Apply one countdown tick. Ignored unless `CountingDown`.
    pub fn tick(&mut self) -> bool {
        if self.phase != Phase::CountingDown {
            return false;
        }
        self.countdown = self.countdown.saturating_sub(1);
        debug!(countdown = self.countdown, "tick");
        if self.countdown == 0 {
            self.activate();
        }
        true
    }

    /// Apply every tick that fell due on the clock. Returns how many were
    /// applied.
    pub fn poll_ticks(&mut self) -> u32 {
        let due = self.ticker.poll(self.clock.now());
        let mut applied = 0;
        for _ in 0..due {
            if !self.tick() {
                break;
            }
            applied += 1;
        }
        applied
    }

    /// Time until the next countdown tick, if one is pending.
    pub fn until_next_tick(&self) -> Option<std::time::Duration> {
        self.ticker.until_next(self.clock.now())
    }

    /// Append a typed character to the input buffer.
    pub fn push_input(&mut self, c: char) {
        self.input.push(c);
    }

    /// Remove the last typed character.
    pub fn pop_input(&mut self) {
        self.input.pop();
    }

    /// Submit the input buffer. See [`Session::submit`].
    pub fn submit_input(&mut self) -> Option<Submission> {
        let raw = std::mem::take(&mut self.input);
        let outcome = self.submit(&raw);
        if outcome.is_none() {
            self.input = raw;
        }
        outcome
    }

    /// Score `raw` against the current expression and advance.
    ///
    /// Returns `None` when no expression is active. Anything that is not
    /// exactly the correct integer is recorded as a mistake.
    pub fn submit(&mut self, raw: &str) -> Option<Submission> {
        if self.phase != Phase::Active {
            debug!(phase = %self.phase, "submit ignored");
            return None;
        }
        let expression = self.current?;

        let answer = Answer::parse(raw);
        let correct = answer.matches(expression.result());
        self.evaluations += 1;
        if !correct {
            self.mistakes.push(Attempt {
                expression,
                answer: answer.clone(),
            });
        }
        debug!(%expression, %answer, correct, "answer evaluated");

        let finished = self.remaining <= 1;
        if finished {
            self.finish();
        } else {
            self.remaining -= 1;
            self.current = Some(self.next_expression());
        }
        self.input.clear();

        Some(Submission {
            expression,
            answer,
            correct,
            finished,
        })
    }

    /// The end-of-session report, once done.
    pub fn summary(&self) -> Option<Summary> {
        if self.phase != Phase::Done {
            return None;
        }
        Some(Summary {
            total: self.config.total,
            mistakes: self.mistakes.clone(),
            elapsed_secs: self.elapsed_secs().unwrap_or(0.0),
        })
    }

    /// Owned view of the session for rendering.
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            phase: self.phase,
            countdown: self.countdown,
            remaining: self.remaining,
            total: self.config.total,
            current: if self.phase == Phase::Active {
                self.current
            } else {
                None
            },
            input: self.input.clone(),
            mistakes: self.mistakes.clone(),
            elapsed_secs: self.elapsed_secs(),
        }
    }

    fn activate(&mut self) {
        self.ticker.cancel();
        self.phase = Phase::Active;
        self.countdown = 0;
        self.mistakes.clear();
        self.evaluations = 0;
        self.remaining = self.config.total;
        self.current = Some(self.next_expression());
        self.started_at = Some(self.clock.now());
        self.ended_at = None;
        self.input.clear();
        info!(total = self.remaining, "session started");
    }

    fn finish(&mut self) {
        self.phase = Phase::Done;
        self.remaining = 0;
        self.current = None;
        self.ended_at = Some(self.clock.now());
        info!(
            missed = self.mistakes.len(),
            total = self.config.total,
            elapsed_secs = self.elapsed_secs().unwrap_or(0.0),
            "session finished"
        );
    }

    fn discard(&mut self) {
        self.ticker.cancel();
        self.countdown = 0;
        self.remaining = 0;
        self.current = None;
        self.mistakes.clear();
        self.evaluations = 0;
        self.input.clear();
        self.started_at = None;
        self.ended_at = None;
    }

    fn next_expression(&mut self) -> Expression {
        Expression::generate(&mut self.rng, &self.config.operand_range())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::expression::Operator;
    use crate::random::ScriptedSource;

    /// Every expression drawn from these is `2 + 3`.
    const TWO_PLUS_THREE: [f64; 3] = [0.2, 0.3, 0.0];

    fn session_with(
        config: DrillConfig,
        draws: &[f64],
    ) -> (Session<ScriptedSource, ManualClock>, ManualClock) {
        let clock = ManualClock::default();
        let session = Session::with_sources(
            config,
            ScriptedSource::new(draws.iter().copied()),
            clock.clone(),
        )
        .unwrap();
        (session, clock)
    }

    fn active_session(total: u32) -> (Session<ScriptedSource, ManualClock>, ManualClock) {
        let config = DrillConfig::default().with_total(total).with_countdown(0);
        let (mut s, clock) = session_with(config, &TWO_PLUS_THREE);
        assert!(s.start());
        assert_eq!(s.phase(), Phase::Active);
        (s, clock)
    }

    #[test]
    fn new_session_waits() {
        let (s, _) = session_with(DrillConfig::default(), &TWO_PLUS_THREE);
        assert_eq!(s.phase(), Phase::Waiting);
        assert!(s.current().is_none());
        assert!(s.mistakes().is_empty());
        assert!(s.summary().is_none());
    }

    #[test]
    fn invalid_config_rejected() {
        let result = Session::with_sources(
            DrillConfig::default().with_total(0),
            ScriptedSource::default(),
            ManualClock::default(),
        );
        assert!(result.is_err());
    }

    #[test]
    fn countdown_then_active() {
        let (mut s, _) = session_with(DrillConfig::default(), &TWO_PLUS_THREE);
        assert_eq!(s.start_or_reset(), Phase::CountingDown);
        assert_eq!(s.countdown(), 3);
        assert!(s.ticker().is_armed());

        assert!(s.tick());
        assert_eq!(s.countdown(), 2);
        assert!(s.tick());
        assert_eq!(s.countdown(), 1);
        assert_eq!(s.phase(), Phase::CountingDown);

        assert!(s.tick());
        assert_eq!(s.phase(), Phase::Active);
        assert_eq!(s.remaining(), 10);
        assert_eq!(s.current(), Some(&Expression::new(2, Operator::Add, 3)));
        assert!(s.started_at().is_some());
        assert!(!s.ticker().is_armed());
    }

    #[test]
    fn clock_driven_countdown() {
        let (mut s, clock) = session_with(DrillConfig::default(), &TWO_PLUS_THREE);
        s.start();
        clock.advance_millis(999);
        assert_eq!(s.poll_ticks(), 0);
        assert_eq!(s.until_next_tick(), Some(std::time::Duration::from_millis(1)));

        clock.advance_millis(1);
        assert_eq!(s.poll_ticks(), 1);
        assert_eq!(s.countdown(), 2);

        clock.advance_millis(5000);
        assert_eq!(s.poll_ticks(), 2);
        assert_eq!(s.phase(), Phase::Active);
        assert_eq!(s.until_next_tick(), None);
    }

    #[test]
    fn zero_countdown_activates_immediately() {
        let (s, _) = active_session(3);
        assert_eq!(s.remaining(), 3);
        assert!(!s.ticker().is_armed());
    }

    #[test]
    fn correct_answer_advances_without_mistake() {
        let (mut s, _) = active_session(10);
        let outcome = s.submit("5").unwrap();
        assert!(outcome.correct);
        assert!(!outcome.finished);
        assert!(s.mistakes().is_empty());
        assert_eq!(s.remaining(), 9);
        assert!(s.current().is_some());
        assert_eq!(s.evaluations(), 1);
    }

    #[test]
    fn wrong_answer_records_attempt() {
        let (mut s, _) = active_session(10);
        let outcome = s.submit("6").unwrap();
        assert!(!outcome.correct);
        assert_eq!(s.mistakes().len(), 1);
        assert_eq!(s.mistakes()[0].answer, Answer::Value(6));
        assert_eq!(s.mistakes()[0].expression.result(), 5);
    }

    #[test]
    fn unparsable_answer_records_invalid_attempt() {
        let (mut s, _) = active_session(10);
        s.submit("abc").unwrap();
        assert_eq!(s.mistakes().len(), 1);
        assert!(s.mistakes()[0].answer.is_invalid());
        assert_eq!(s.phase(), Phase::Active);
        assert_eq!(s.remaining(), 9);
    }

    #[test]
    fn last_wrong_answer_finishes() {
        let (mut s, clock) = active_session(2);
        s.submit("5").unwrap();
        let before = s.mistakes().len();
        clock.advance_millis(4200);

        let outcome = s.submit("0").unwrap();
        assert!(outcome.finished);
        assert_eq!(s.phase(), Phase::Done);
        assert_eq!(s.mistakes().len(), before + 1);
        assert!(s.ended_at().is_some());
        assert!(s.current().is_none());
        assert_eq!(s.elapsed_secs(), Some(4.2));
    }

    #[test]
    fn full_session_evaluates_each_expression_once() {
        let (mut s, _) = active_session(5);
        let answers = ["5", "x", "5", "7", ""];
        for (i, answer) in answers.iter().enumerate() {
            let outcome = s.submit(answer).unwrap();
            assert_eq!(outcome.finished, i == answers.len() - 1);
        }
        assert_eq!(s.evaluations(), 5);
        assert_eq!(s.mistakes().len(), 3);
        assert!(s.submit("5").is_none());
        assert_eq!(s.evaluations(), 5);

        let summary = s.summary().unwrap();
        assert_eq!(summary.total, 5);
        assert_eq!(summary.missed(), 3);
        assert!(summary.elapsed_secs >= 0.0);
    }

    #[test]
    fn submit_ignored_outside_active() {
        let (mut s, _) = session_with(DrillConfig::default(), &TWO_PLUS_THREE);
        assert!(s.submit("5").is_none());
        s.start();
        assert!(s.submit("5").is_none());
        assert!(s.mistakes().is_empty());
    }

    #[test]
    fn tick_ignored_outside_countdown() {
        let (mut s, _) = session_with(DrillConfig::default(), &TWO_PLUS_THREE);
        assert!(!s.tick());
        let (mut s, _) = active_session(3);
        assert!(!s.tick());
        assert_eq!(s.phase(), Phase::Active);
    }

    #[test]
    fn reset_during_countdown_cancels_ticks() {
        let (mut s, clock) = session_with(DrillConfig::default(), &TWO_PLUS_THREE);
        s.start();
        s.tick();
        assert_eq!(s.start_or_reset(), Phase::Waiting);
        assert!(!s.ticker().is_armed());

        clock.advance_millis(10_000);
        assert_eq!(s.poll_ticks(), 0);
        assert_eq!(s.phase(), Phase::Waiting);

        s.start();
        assert_eq!(s.countdown(), 3);
    }

    #[test]
    fn reset_during_active_discards_session() {
        let (mut s, _) = active_session(10);
        s.submit("1").unwrap();
        s.push_input('4');
        assert!(s.reset());
        assert_eq!(s.phase(), Phase::Waiting);
        assert!(s.mistakes().is_empty());
        assert_eq!(s.remaining(), 0);
        assert!(s.current().is_none());
        assert_eq!(s.input(), "");

        s.start();
        assert_eq!(s.phase(), Phase::Active);
        assert!(s.mistakes().is_empty());
        assert_eq!(s.remaining(), 10);
        assert_eq!(s.evaluations(), 0);
    }

    #[test]
    fn reset_ignored_when_idle() {
        let (mut s, _) = session_with(DrillConfig::default(), &TWO_PLUS_THREE);
        assert!(!s.reset());
        assert_eq!(s.phase(), Phase::Waiting);
    }

    #[test]
    fn restart_after_done_is_fresh() {
        let config = DrillConfig::default().with_total(1);
        let (mut s, _) = session_with(config, &TWO_PLUS_THREE);
        s.start();
        for _ in 0..3 {
            s.tick();
        }
        s.submit("nope").unwrap();
        assert_eq!(s.phase(), Phase::Done);
        assert_eq!(s.mistakes().len(), 1);

        assert_eq!(s.start_or_reset(), Phase::CountingDown);
        assert!(s.mistakes().is_empty());
        assert!(s.summary().is_none());
        assert_eq!(s.elapsed_secs(), None);
        assert!(!s.start());
    }

    #[test]
    fn input_buffer_lifecycle() {
        let (mut s, _) = active_session(3);
        s.push_input('5');
        s.push_input('9');
        s.pop_input();
        assert_eq!(s.input(), "5");

        let outcome = s.submit_input().unwrap();
        assert!(outcome.correct);
        assert_eq!(s.input(), "");
    }

    #[test]
    fn input_kept_when_submit_ignored() {
        let (mut s, _) = session_with(DrillConfig::default(), &TWO_PLUS_THREE);
        s.push_input('7');
        assert!(s.submit_input().is_none());
        assert_eq!(s.input(), "7");
        s.start();
        assert_eq!(s.input(), "");
    }

    #[test]
    fn snapshot_hides_expression_unless_active() {
        let (mut s, _) = active_session(1);
        let snap = s.snapshot();
        assert_eq!(snap.phase, Phase::Active);
        assert_eq!(snap.current, Some(Expression::new(2, Operator::Add, 3)));
        assert_eq!(snap.elapsed_secs, None);

        s.submit("5").unwrap();
        let snap = s.snapshot();
        assert_eq!(snap.phase, Phase::Done);
        assert_eq!(snap.current, None);
        assert_eq!(snap.total, 1);
        assert_eq!(snap.elapsed_secs, Some(0.0));
    }

    #[test]
    fn seeded_sessions_repeat() {
        let config = DrillConfig::default().with_countdown(0).with_seed(11);
        let mut a = Session::new(config.clone()).unwrap();
        let mut b = Session::new(config).unwrap();
        a.start();
        b.start();
        for _ in 0..10 {
            assert_eq!(a.current(), b.current());
            a.submit("0");
            b.submit("0");
        }
        assert_eq!(a.mistakes(), b.mistakes());
    }
}
