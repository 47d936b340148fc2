//! A cancellable repeating schedule that drives the countdown.
//!
//! The ticker does not own a thread or a timer. Front-ends poll it with the
//! current time from a [`Clock`](crate::clock::Clock) and feed each reported
//! tick into the session, so tests can drive it with a manual clock.

use chrono::{DateTime, Duration, Utc};

/// Default interval between ticks.
pub const DEFAULT_PERIOD_MS: i64 = 1000;

/// A repeating schedule that can be armed and cancelled.
#[derive(Debug, Clone)]
pub struct Ticker {
    period: Duration,
    next_due: Option<DateTime<Utc>>,
}

impl Default for Ticker {
    fn default() -> Self {
        Self::new(Duration::milliseconds(DEFAULT_PERIOD_MS))
    }
}

impl Ticker {
    /// A disarmed ticker with the given period. Non-positive periods fall
    /// back to the default.
    pub fn new(period: Duration) -> Self {
        let period = if period > Duration::zero() {
            period
        } else {
            Duration::milliseconds(DEFAULT_PERIOD_MS)
        };
        Self {
            period,
            next_due: None,
        }
    }

    /// Schedule the first tick one period after `now`.
    pub fn arm(&mut self, now: DateTime<Utc>) {
        self.next_due = Some(now + self.period);
    }

    /// Drop any pending tick.
    pub fn cancel(&mut self) {
        self.next_due = None;
    }

    /// Whether a tick is pending.
    pub fn is_armed(&self) -> bool {
        self.next_due.is_some()
    }

    /// Number of ticks that fell due up to `now`. Each reported tick is
    /// consumed and the next one rescheduled.
    pub fn poll(&mut self, now: DateTime<Utc>) -> u32 {
        let mut fired = 0;
        while let Some(due) = self.next_due {
            if due > now {
                break;
            }
            fired += 1;
            self.next_due = Some(due + self.period);
        }
        fired
    }

    /// Time left before the next tick, if one is pending.
    pub fn until_next(&self, now: DateTime<Utc>) -> Option<std::time::Duration> {
        self.next_due
            .map(|due| (due - now).to_std().unwrap_or(std::time::Duration::ZERO))
    }
}
