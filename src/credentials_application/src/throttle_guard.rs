use std::sync::Arc;

use chrono::{DateTime, Utc};

use credentials_core::{
    AccountId, AccountStore, AccountStoreError, Clock, ThrottleError, ThrottlePolicy,
    ThrottleRecord, ThrottleState, ThrottleStore, ThrottleStoreError,
};

#[derive(Debug, thiserror::Error)]
pub enum ThrottleGuardError {
    #[error("Account not found")]
    AccountNotFound,
    #[error(transparent)]
    Throttle(#[from] ThrottleError),
    #[error("Account store error: {0}")]
    AccountStoreError(AccountStoreError),
    #[error("Throttle store error: {0}")]
    ThrottleStoreError(#[from] ThrottleStoreError),
}

impl From<AccountStoreError> for ThrottleGuardError {
    fn from(error: AccountStoreError) -> Self {
        match error {
            AccountStoreError::NotFound => Self::AccountNotFound,
            other => Self::AccountStoreError(other),
        }
    }
}

/// Failed-login accounting and administrative suspension or ban of accounts.
///
/// Every operation first confirms the account is live, so throttle records are
/// never created for unknown or deleted accounts.
#[derive(Clone)]
pub struct ThrottleGuard<A, T>
where
    A: AccountStore,
    T: ThrottleStore,
{
    accounts: A,
    throttles: T,
    policy: ThrottlePolicy,
    clock: Arc<dyn Clock>,
}

impl<A, T> ThrottleGuard<A, T>
where
    A: AccountStore,
    T: ThrottleStore,
{
    pub fn new(accounts: A, throttles: T, policy: ThrottlePolicy, clock: Arc<dyn Clock>) -> Self {
        Self {
            accounts,
            throttles,
            policy,
            clock,
        }
    }

    async fn ensure_account(&self, account_id: AccountId) -> Result<(), ThrottleGuardError> {
        self.accounts.find(account_id).await?;
        Ok(())
    }

    /// Counts one failed login and returns the resulting state.
    #[tracing::instrument(name = "ThrottleGuard::record_failure", skip(self))]
    pub async fn record_failure(
        &self,
        account_id: AccountId,
    ) -> Result<ThrottleState, ThrottleGuardError> {
        self.ensure_account(account_id).await?;
        let policy = self.policy;
        let now = self.clock.now();

        let state = self
            .throttles
            .modify(account_id, move |record| record.record_failure(&policy, now))
            .await?;

        if let ThrottleState::Suspended { until } = state {
            tracing::warn!(%until, "Too many failed logins, account suspended");
        }
        Ok(state)
    }

    #[tracing::instrument(name = "ThrottleGuard::suspend", skip(self))]
    pub async fn suspend(&self, account_id: AccountId) -> Result<DateTime<Utc>, ThrottleGuardError> {
        self.ensure_account(account_id).await?;
        let policy = self.policy;
        let now = self.clock.now();

        let until = self
            .throttles
            .modify(account_id, move |record| record.suspend(&policy, now))
            .await??;
        Ok(until)
    }

    pub async fn is_suspended(&self, account_id: AccountId) -> Result<bool, ThrottleGuardError> {
        Ok(matches!(
            self.status(account_id).await?,
            ThrottleState::Suspended { .. }
        ))
    }

    /// Forces the record to banned from any state. Banning twice keeps the
    /// first ban time.
    #[tracing::instrument(name = "ThrottleGuard::ban", skip(self))]
    pub async fn ban(&self, account_id: AccountId) -> Result<(), ThrottleGuardError> {
        self.ensure_account(account_id).await?;
        let now = self.clock.now();

        self.throttles
            .modify(account_id, move |record| record.ban(now))
            .await?;
        Ok(())
    }

    /// Fails with `Suspended` or `Banned` if a login must be refused now.
    pub async fn check(&self, account_id: AccountId) -> Result<(), ThrottleGuardError> {
        self.ensure_account(account_id).await?;
        let now = self.clock.now();

        self.throttles
            .modify(account_id, move |record| record.check(now))
            .await??;
        Ok(())
    }

    pub async fn clear_attempts(&self, account_id: AccountId) -> Result<(), ThrottleGuardError> {
        self.ensure_account(account_id).await?;
        self.throttles
            .modify(account_id, |record| record.clear_attempts())
            .await?;
        Ok(())
    }

    /// Current state, with an elapsed suspension reported as `Clear`.
    pub async fn status(&self, account_id: AccountId) -> Result<ThrottleState, ThrottleGuardError> {
        let record = self.record(account_id).await?;
        Ok(record.state(self.clock.now()))
    }

    pub async fn record(&self, account_id: AccountId) -> Result<ThrottleRecord, ThrottleGuardError> {
        self.ensure_account(account_id).await?;
        Ok(self.throttles.get(account_id).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::Fixture;
    use chrono::TimeDelta;
    use credentials_adapters::persistence::{DashMapThrottleStore, HashMapAccountStore};

    fn guard(fixture: &Fixture) -> ThrottleGuard<HashMapAccountStore, DashMapThrottleStore> {
        ThrottleGuard::new(
            fixture.accounts.clone(),
            fixture.throttles.clone(),
            ThrottlePolicy::default(),
            fixture.clock(),
        )
    }

    #[tokio::test]
    async fn fifth_failure_suspends_for_fifteen_minutes() {
        let fixture = Fixture::new();
        let account = fixture.seed("jane@example.com", true).await;
        let guard = guard(&fixture);

        for _ in 0..4 {
            assert_eq!(
                guard.record_failure(account.id()).await.unwrap(),
                ThrottleState::Clear
            );
        }
        let state = guard.record_failure(account.id()).await.unwrap();

        let expected = fixture.clock.now() + TimeDelta::minutes(15);
        assert_eq!(state, ThrottleState::Suspended { until: expected });
        assert!(guard.is_suspended(account.id()).await.unwrap());
    }

    #[tokio::test]
    async fn suspension_lapses_and_counter_restarts() {
        let fixture = Fixture::new();
        let account = fixture.seed("jane@example.com", true).await;
        let guard = guard(&fixture);

        guard.suspend(account.id()).await.unwrap();
        fixture.clock.advance(TimeDelta::minutes(15));

        assert!(!guard.is_suspended(account.id()).await.unwrap());
        assert!(guard.check(account.id()).await.is_ok());
        assert_eq!(
            guard.record_failure(account.id()).await.unwrap(),
            ThrottleState::Clear
        );
    }

    #[tokio::test]
    async fn repeat_offenses_double_the_window() {
        let fixture = Fixture::new();
        let account = fixture.seed("jane@example.com", true).await;
        let guard = guard(&fixture);

        let first = guard.suspend(account.id()).await.unwrap();
        fixture.clock.set(first);
        let second = guard.suspend(account.id()).await.unwrap();

        assert_eq!(second - first, TimeDelta::minutes(30));
    }

    #[tokio::test]
    async fn suspending_twice_reports_minutes_remaining() {
        let fixture = Fixture::new();
        let account = fixture.seed("jane@example.com", true).await;
        let guard = guard(&fixture);

        guard.suspend(account.id()).await.unwrap();
        fixture.clock.advance(TimeDelta::seconds(61));

        let error = guard.suspend(account.id()).await.unwrap_err();
        assert!(matches!(
            error,
            ThrottleGuardError::Throttle(ThrottleError::AlreadySuspended {
                minutes_remaining: 14
            })
        ));
    }

    #[tokio::test]
    async fn ban_is_terminal() {
        let fixture = Fixture::new();
        let account = fixture.seed("jane@example.com", true).await;
        let guard = guard(&fixture);

        guard.ban(account.id()).await.unwrap();
        fixture.clock.advance(TimeDelta::days(365));

        assert!(matches!(
            guard.check(account.id()).await,
            Err(ThrottleGuardError::Throttle(ThrottleError::Banned))
        ));
        assert!(matches!(
            guard.suspend(account.id()).await,
            Err(ThrottleGuardError::Throttle(ThrottleError::AlreadyBanned))
        ));
    }

    #[tokio::test]
    async fn ban_overrides_suspension_and_repeats_quietly() {
        let fixture = Fixture::new();
        let account = fixture.seed("jane@example.com", true).await;
        let guard = guard(&fixture);

        guard.suspend(account.id()).await.unwrap();
        guard.ban(account.id()).await.unwrap();
        assert_eq!(guard.status(account.id()).await.unwrap(), ThrottleState::Banned);

        fixture.clock.advance(TimeDelta::minutes(1));
        guard.ban(account.id()).await.unwrap();
        assert_eq!(guard.status(account.id()).await.unwrap(), ThrottleState::Banned);
        assert!(!guard.is_suspended(account.id()).await.unwrap());
    }

    #[tokio::test]
    async fn unknown_accounts_are_rejected() {
        let fixture = Fixture::new();
        let guard = guard(&fixture);

        assert!(matches!(
            guard.suspend(AccountId::new()).await,
            Err(ThrottleGuardError::AccountNotFound)
        ));
        assert!(matches!(
            guard.record_failure(AccountId::new()).await,
            Err(ThrottleGuardError::AccountNotFound)
        ));
    }

    #[tokio::test]
    async fn clearing_attempts_resets_the_counter() {
        let fixture = Fixture::new();
        let account = fixture.seed("jane@example.com", true).await;
        let guard = guard(&fixture);

        for _ in 0..4 {
            guard.record_failure(account.id()).await.unwrap();
        }
        guard.clear_attempts(account.id()).await.unwrap();

        assert_eq!(
            guard.record_failure(account.id()).await.unwrap(),
            ThrottleState::Clear
        );
        assert_eq!(fixture.throttles.get(account.id()).await.unwrap().attempts(), 1);
    }
}
