use credentials_core::{AccountId, AccountStore, Notification, NotificationDispatcher};

use super::notify;
use crate::activation_manager::ActivationManager;
use crate::error::AccountServiceError;

/// Resend activation use case - issues a fresh code to a pending account
pub struct ResendActivationUseCase<A, N>
where
    A: AccountStore,
    N: NotificationDispatcher,
{
    activation: ActivationManager<A>,
    notifier: N,
}

impl<A, N> ResendActivationUseCase<A, N>
where
    A: AccountStore,
    N: NotificationDispatcher,
{
    pub fn new(activation: ActivationManager<A>, notifier: N) -> Self {
        Self {
            activation,
            notifier,
        }
    }

    #[tracing::instrument(name = "ResendActivationUseCase::execute", skip(self))]
    pub async fn execute(&self, account_id: AccountId) -> Result<(), AccountServiceError> {
        let (account, code) = self.activation.resend(account_id).await?;

        notify(
            &self.notifier,
            Notification::ActivationRequested {
                recipient: account.email().clone(),
                account_id: account.id(),
                code,
            },
        );
        Ok(())
    }
}
