//! Throttle state machine: `clear -> suspended -> banned`.
//!
//! Suspension is time-bounded; once the window has elapsed the record
//! reverts to `clear` and the failure counter starts over. Ban is terminal.

use chrono::{DateTime, TimeDelta, Utc};
use serde::Deserialize;
use thiserror::Error;

use crate::domain::account::AccountId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ThrottleError {
    #[error("Account is already suspended for {minutes_remaining} minutes")]
    AlreadySuspended { minutes_remaining: i64 },
    #[error("Account has already been banned")]
    AlreadyBanned,
    #[error("Account is suspended for another {minutes_remaining} minutes")]
    Suspended { minutes_remaining: i64 },
    #[error("Account has been banned")]
    Banned,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThrottleState {
    Clear,
    Suspended { until: DateTime<Utc> },
    Banned,
}

/// Thresholds and backoff for automatic suspension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ThrottlePolicy {
    pub attempt_limit: u32,
    pub suspension_minutes: i64,
    pub max_suspension_minutes: i64,
}

impl Default for ThrottlePolicy {
    fn default() -> Self {
        Self {
            attempt_limit: 5,
            suspension_minutes: 15,
            max_suspension_minutes: 24 * 60,
        }
    }
}

impl ThrottlePolicy {
    /// Suspension length for the `offense`-th suspension (1-based), doubling
    /// each time up to the configured maximum. Saturates at `TimeDelta::MAX`
    /// for configured values beyond what a duration can hold.
    pub fn suspension_window(&self, offense: u32) -> TimeDelta {
        let factor = 1_i64
            .checked_shl(offense.saturating_sub(1))
            .filter(|f| *f > 0)
            .unwrap_or(i64::MAX);
        let minutes = self
            .suspension_minutes
            .saturating_mul(factor)
            .min(self.max_suspension_minutes)
            .max(1);
        TimeDelta::try_minutes(minutes).unwrap_or(TimeDelta::MAX)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThrottleRecord {
    account_id: AccountId,
    attempts: u32,
    offenses: u32,
    last_attempt_at: Option<DateTime<Utc>>,
    suspended_until: Option<DateTime<Utc>>,
    banned_at: Option<DateTime<Utc>>,
}

impl ThrottleRecord {
    pub fn new(account_id: AccountId) -> Self {
        Self {
            account_id,
            attempts: 0,
            offenses: 0,
            last_attempt_at: None,
            suspended_until: None,
            banned_at: None,
        }
    }

    pub fn account_id(&self) -> AccountId {
        self.account_id
    }

    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    pub fn offenses(&self) -> u32 {
        self.offenses
    }

    pub fn last_attempt_at(&self) -> Option<DateTime<Utc>> {
        self.last_attempt_at
    }

    pub fn state(&self, now: DateTime<Utc>) -> ThrottleState {
        if self.banned_at.is_some() {
            return ThrottleState::Banned;
        }
        match self.suspended_until {
            Some(until) if now < until => ThrottleState::Suspended { until },
            _ => ThrottleState::Clear,
        }
    }

    pub fn is_suspended(&self, now: DateTime<Utc>) -> bool {
        matches!(self.state(now), ThrottleState::Suspended { .. })
    }

    pub fn is_banned(&self) -> bool {
        self.banned_at.is_some()
    }

    /// Counts a failed login. Reaching the attempt limit suspends the
    /// account; failures while suspended or banned are not counted.
    pub fn record_failure(&mut self, policy: &ThrottlePolicy, now: DateTime<Utc>) -> ThrottleState {
        self.expire_suspension(now);

        let state = self.state(now);
        if state != ThrottleState::Clear {
            return state;
        }

        self.attempts = self.attempts.saturating_add(1);
        self.last_attempt_at = Some(now);

        if self.attempts >= policy.attempt_limit {
            self.start_suspension(policy, now);
        }
        self.state(now)
    }

    /// Administrative suspension.
    pub fn suspend(
        &mut self,
        policy: &ThrottlePolicy,
        now: DateTime<Utc>,
    ) -> Result<DateTime<Utc>, ThrottleError> {
        self.expire_suspension(now);

        match self.state(now) {
            ThrottleState::Banned => Err(ThrottleError::AlreadyBanned),
            ThrottleState::Suspended { until } => Err(ThrottleError::AlreadySuspended {
                minutes_remaining: minutes_until(until, now),
            }),
            ThrottleState::Clear => Ok(self.start_suspension(policy, now)),
        }
    }

    pub fn ban(&mut self, now: DateTime<Utc>) {
        if self.banned_at.is_none() {
            self.banned_at = Some(now);
        }
    }

    /// Fails if a login must currently be refused.
    pub fn check(&mut self, now: DateTime<Utc>) -> Result<(), ThrottleError> {
        self.expire_suspension(now);

        match self.state(now) {
            ThrottleState::Banned => Err(ThrottleError::Banned),
            ThrottleState::Suspended { until } => Err(ThrottleError::Suspended {
                minutes_remaining: minutes_until(until, now),
            }),
            ThrottleState::Clear => Ok(()),
        }
    }

    pub fn clear_attempts(&mut self) {
        self.attempts = 0;
    }

    pub fn minutes_remaining(&self, now: DateTime<Utc>) -> Option<i64> {
        match self.state(now) {
            ThrottleState::Suspended { until } => Some(minutes_until(until, now)),
            _ => None,
        }
    }

    fn start_suspension(&mut self, policy: &ThrottlePolicy, now: DateTime<Utc>) -> DateTime<Utc> {
        self.offenses = self.offenses.saturating_add(1);
        let until = now
            .checked_add_signed(policy.suspension_window(self.offenses))
            .unwrap_or(DateTime::<Utc>::MAX_UTC);
        self.suspended_until = Some(until);
        until
    }

    fn expire_suspension(&mut self, now: DateTime<Utc>) {
        if matches!(self.suspended_until, Some(until) if until <= now) {
            self.suspended_until = None;
            self.attempts = 0;
        }
    }
}

/// Whole minutes left, rounded up. Never zero for a future instant.
pub fn minutes_until(until: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
    let seconds = (until - now).num_seconds().max(0);
    ((seconds + 59) / 60).max(1)
}
