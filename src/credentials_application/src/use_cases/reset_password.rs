use std::sync::Arc;

use credentials_core::{
    AccountId, AccountStore, Clock, Notification, NotificationDispatcher, PasswordHasher,
};

use super::{TemporaryPasswords, notify};
use crate::error::AccountServiceError;

/// Reset password use case - replaces the credential with a new temporary
/// one and mails it to the owner
pub struct ResetPasswordUseCase<A, H, N>
where
    A: AccountStore,
    H: PasswordHasher,
    N: NotificationDispatcher,
{
    accounts: A,
    hasher: H,
    notifier: N,
    passwords: TemporaryPasswords,
    clock: Arc<dyn Clock>,
}

impl<A, H, N> ResetPasswordUseCase<A, H, N>
where
    A: AccountStore,
    H: PasswordHasher,
    N: NotificationDispatcher,
{
    pub fn new(
        accounts: A,
        hasher: H,
        notifier: N,
        passwords: TemporaryPasswords,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            accounts,
            hasher,
            notifier,
            passwords,
            clock,
        }
    }

    #[tracing::instrument(name = "ResetPasswordUseCase::execute", skip(self))]
    pub async fn execute(&self, account_id: AccountId) -> Result<(), AccountServiceError> {
        let password = self.passwords.generate()?;
        self.accounts.find(account_id).await?;

        let password_hash = self.hasher.hash(&password).await?;
        let now = self.clock.now();
        let recipient = self
            .accounts
            .update(account_id, |account| {
                account.set_password_hash(password_hash, now);
                Ok::<_, AccountServiceError>(account.email().clone())
            })
            .await?;

        tracing::info!("Password reset");
        notify(
            &self.notifier,
            Notification::PasswordReset {
                recipient,
                temporary_password: password,
            },
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{Fixture, email};
    use credentials_adapters::hashing::Argon2PasswordHasher;
    use credentials_adapters::notification::RecordingNotificationDispatcher;
    use credentials_adapters::persistence::HashMapAccountStore;

    fn use_case(
        fixture: &Fixture,
        length: usize,
    ) -> ResetPasswordUseCase<HashMapAccountStore, Argon2PasswordHasher, RecordingNotificationDispatcher>
    {
        ResetPasswordUseCase::new(
            fixture.accounts.clone(),
            fixture.hasher.clone(),
            fixture.notifier.clone(),
            TemporaryPasswords::new(fixture.tokens(), length),
            fixture.clock(),
        )
    }

    #[tokio::test]
    async fn new_password_is_stored_and_mailed() {
        let fixture = Fixture::new();
        let account = fixture.seed("jane@example.com", true).await;

        use_case(&fixture, 16).execute(account.id()).await.unwrap();

        let sent = fixture.notifier.dispatched();
        let [Notification::PasswordReset {
            recipient,
            temporary_password,
        }] = sent.as_slice()
        else {
            panic!("expected one password reset notification");
        };
        assert_eq!(recipient, &email("jane@example.com"));

        let stored = fixture.accounts.find(account.id()).await.unwrap();
        assert!(fixture
            .hasher
            .verify(temporary_password, stored.password_hash())
            .await
            .unwrap());
    }

    #[tokio::test]
    async fn unknown_account_is_not_found() {
        let fixture = Fixture::new();

        assert!(matches!(
            use_case(&fixture, 16).execute(AccountId::new()).await,
            Err(AccountServiceError::NotFound)
        ));
        assert!(fixture.notifier.dispatched().is_empty());
    }

    #[tokio::test]
    async fn too_short_temporary_password_is_rejected() {
        let fixture = Fixture::new();
        let account = fixture.seed("jane@example.com", true).await;

        let outcome = use_case(&fixture, 4).execute(account.id()).await;

        assert!(matches!(
            outcome,
            Err(AccountServiceError::Validation(errors)) if errors.has_violation("password")
        ));
    }
}
