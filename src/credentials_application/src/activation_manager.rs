use std::sync::Arc;

use credentials_core::{
    Account, AccountId, AccountStore, AccountStoreError, ActivationCode, ActivationError, Clock,
    TokenGenerator,
};

#[derive(Debug, thiserror::Error)]
pub enum ActivationManagerError {
    #[error("Account not found")]
    AccountNotFound,
    #[error("Account is already activated")]
    AlreadyActivated,
    #[error("Invalid activation code")]
    InvalidCode,
    #[error("Account store error: {0}")]
    AccountStoreError(AccountStoreError),
}

impl From<AccountStoreError> for ActivationManagerError {
    fn from(error: AccountStoreError) -> Self {
        match error {
            AccountStoreError::NotFound => Self::AccountNotFound,
            other => Self::AccountStoreError(other),
        }
    }
}

impl From<ActivationError> for ActivationManagerError {
    fn from(error: ActivationError) -> Self {
        match error {
            ActivationError::AlreadyActivated => Self::AlreadyActivated,
            ActivationError::InvalidCode => Self::InvalidCode,
        }
    }
}

/// Issues and consumes single-use activation codes. A newly issued code
/// replaces any code the account still holds.
#[derive(Clone)]
pub struct ActivationManager<A>
where
    A: AccountStore,
{
    accounts: A,
    tokens: Arc<dyn TokenGenerator>,
    clock: Arc<dyn Clock>,
    code_length: usize,
}

impl<A> ActivationManager<A>
where
    A: AccountStore,
{
    pub fn new(
        accounts: A,
        tokens: Arc<dyn TokenGenerator>,
        clock: Arc<dyn Clock>,
        code_length: usize,
    ) -> Self {
        Self {
            accounts,
            tokens,
            clock,
            code_length,
        }
    }

    /// A fresh code not yet attached to any account.
    pub fn new_code(&self) -> ActivationCode {
        ActivationCode::new(self.tokens.generate(self.code_length))
    }

    /// Stores a fresh code on a pending account and returns it together with
    /// the updated account.
    #[tracing::instrument(name = "ActivationManager::issue", skip(self))]
    pub async fn issue(
        &self,
        account_id: AccountId,
    ) -> Result<(Account, ActivationCode), ActivationManagerError> {
        let code = self.new_code();
        let now = self.clock.now();

        self.accounts
            .update(account_id, |account| {
                account.issue_activation_code(code.clone(), now)?;
                Ok::<_, ActivationManagerError>((account.clone(), code))
            })
            .await
    }

    /// Activates the account if `code` is the one it currently holds.
    #[tracing::instrument(name = "ActivationManager::verify", skip(self, code))]
    pub async fn verify(
        &self,
        account_id: AccountId,
        code: &ActivationCode,
    ) -> Result<Account, ActivationManagerError> {
        let now = self.clock.now();

        self.accounts
            .update(account_id, |account| {
                account.activate(code, now)?;
                Ok::<_, ActivationManagerError>(account.clone())
            })
            .await
    }

    pub async fn resend(
        &self,
        account_id: AccountId,
    ) -> Result<(Account, ActivationCode), ActivationManagerError> {
        self.issue(account_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::Fixture;
    use credentials_adapters::persistence::HashMapAccountStore;

    fn manager(fixture: &Fixture) -> ActivationManager<HashMapAccountStore> {
        ActivationManager::new(fixture.accounts.clone(), fixture.tokens(), fixture.clock(), 42)
    }

    #[tokio::test]
    async fn issued_code_activates_the_account() {
        let fixture = Fixture::new();
        let account = fixture.seed("jane@example.com", false).await;
        let manager = manager(&fixture);

        let (pending, code) = manager.issue(account.id()).await.unwrap();
        assert_eq!(code.as_str().len(), 42);
        assert_eq!(pending.pending_activation_code(), Some(&code));

        let activated = manager.verify(account.id(), &code).await.unwrap();
        assert!(activated.is_activated());
        assert_eq!(activated.activated_at(), Some(fixture.clock.now()));
        assert!(activated.pending_activation_code().is_none());
    }

    #[tokio::test]
    async fn resend_invalidates_the_previous_code() {
        let fixture = Fixture::new();
        let account = fixture.seed("jane@example.com", false).await;
        let manager = manager(&fixture);

        let (_, first) = manager.issue(account.id()).await.unwrap();
        let (_, second) = manager.resend(account.id()).await.unwrap();

        assert!(matches!(
            manager.verify(account.id(), &first).await,
            Err(ActivationManagerError::InvalidCode)
        ));
        assert!(manager.verify(account.id(), &second).await.is_ok());
    }

    #[tokio::test]
    async fn wrong_code_leaves_account_pending() {
        let fixture = Fixture::new();
        let account = fixture.seed("jane@example.com", false).await;
        let manager = manager(&fixture);
        manager.issue(account.id()).await.unwrap();

        let outcome = manager
            .verify(account.id(), &ActivationCode::new("wrong"))
            .await;

        assert!(matches!(outcome, Err(ActivationManagerError::InvalidCode)));
        let stored = fixture.accounts.find(account.id()).await.unwrap();
        assert!(!stored.is_activated());
        assert!(stored.pending_activation_code().is_some());
    }

    #[tokio::test]
    async fn activated_accounts_reject_new_codes() {
        let fixture = Fixture::new();
        let account = fixture.seed("jane@example.com", true).await;
        let manager = manager(&fixture);

        assert!(matches!(
            manager.issue(account.id()).await,
            Err(ActivationManagerError::AlreadyActivated)
        ));
        assert!(matches!(
            manager.verify(account.id(), &ActivationCode::new("any")).await,
            Err(ActivationManagerError::AlreadyActivated)
        ));
    }

    #[tokio::test]
    async fn unknown_account_is_not_found() {
        let fixture = Fixture::new();

        assert!(matches!(
            manager(&fixture).issue(AccountId::new()).await,
            Err(ActivationManagerError::AccountNotFound)
        ));
    }
}
