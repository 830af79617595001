//! Reconnection policy and attempt tracking.

use std::time::Duration;

/// Backoff schedule for reconnect attempts.
#[derive(Debug, Clone, PartialEq)]
pub struct ReconnectPolicy {
    /// Delay before the first retry
    pub base_delay: Duration,
    /// Factor applied to the delay on every further retry
    pub growth: f64,
    /// Upper bound on the delay
    pub max_delay: Duration,
    /// Retries before giving up
    pub max_attempts: u32,
}

impl Default for ReconnectPolicy {
    fn default() -> Self {
        Self {
            base_delay: Duration::from_millis(1000),
            growth: 1.5,
            max_delay: Duration::from_millis(10000),
            max_attempts: 5,
        }
    }
}

impl ReconnectPolicy {
    /// Delay before the given 1-based attempt: `base_delay` for the
    /// first, grown by `growth` for each one after, capped at `max_delay`.
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let grown =
            self.base_delay.as_secs_f64() * self.growth.powi(attempt.saturating_sub(1) as i32);
        Duration::from_secs_f64(grown.min(self.max_delay.as_secs_f64()))
    }
}

/// Where the connection currently stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionPhase {
    Idle,
    Connecting,
    Open,
    WaitingRetry(u32),
    GivenUp,
}

/// What to do after a connection closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryDecision {
    Retry { attempt: u32, delay: Duration },
    GiveUp,
}

/// Tracks reconnect attempts across sessions.
///
/// The attempt counter resets only when a connection actually opens, so
/// failed connect attempts keep counting toward the limit. Once the
/// limit is reached the controller is in [`ConnectionPhase::GivenUp`]
/// and never leaves it.
pub struct ReconnectController {
    policy: ReconnectPolicy,
    phase: ConnectionPhase,
    attempt: u32,
}

impl ReconnectController {
    pub fn new(policy: ReconnectPolicy) -> Self {
        Self {
            policy,
            phase: ConnectionPhase::Idle,
            attempt: 0,
        }
    }

    pub fn phase(&self) -> ConnectionPhase {
        self.phase
    }

    pub fn max_attempts(&self) -> u32 {
        self.policy.max_attempts
    }

    /// A connection attempt is starting.
    pub fn on_connecting(&mut self) {
        if self.phase != ConnectionPhase::GivenUp {
            self.phase = ConnectionPhase::Connecting;
        }
    }

    /// The connection opened; the attempt counter starts over.
    pub fn on_open(&mut self) {
        if self.phase == ConnectionPhase::GivenUp {
            return;
        }
        self.phase = ConnectionPhase::Open;
        self.attempt = 0;
    }

    /// The connection closed or the connect attempt failed.
    pub fn on_closed(&mut self) -> RetryDecision {
        if self.phase == ConnectionPhase::GivenUp {
            return RetryDecision::GiveUp;
        }
        self.attempt += 1;
        if self.attempt > self.policy.max_attempts {
            self.phase = ConnectionPhase::GivenUp;
            return RetryDecision::GiveUp;
        }
        self.phase = ConnectionPhase::WaitingRetry(self.attempt);
        RetryDecision::Retry {
            attempt: self.attempt,
            delay: self.policy.delay_for(self.attempt),
        }
    }
}
