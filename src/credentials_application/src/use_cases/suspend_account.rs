use chrono::{DateTime, Utc};

use credentials_core::{AccountId, AccountStore, ThrottleStore};

use crate::error::AccountServiceError;
use crate::throttle_guard::ThrottleGuard;

/// Suspend account use case - administrative suspension through the throttle
/// guard
pub struct SuspendAccountUseCase<A, T>
where
    A: AccountStore,
    T: ThrottleStore,
{
    throttle: ThrottleGuard<A, T>,
}

impl<A, T> SuspendAccountUseCase<A, T>
where
    A: AccountStore,
    T: ThrottleStore,
{
    pub fn new(throttle: ThrottleGuard<A, T>) -> Self {
        Self { throttle }
    }

    /// Returns the instant the suspension ends.
    #[tracing::instrument(name = "SuspendAccountUseCase::execute", skip(self))]
    pub async fn execute(&self, account_id: AccountId) -> Result<DateTime<Utc>, AccountServiceError> {
        let until = self.throttle.suspend(account_id).await?;
        tracing::info!(%until, "Account suspended");
        Ok(until)
    }
}
