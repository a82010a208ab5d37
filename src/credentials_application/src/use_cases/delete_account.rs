use std::sync::Arc;

use credentials_core::{AccountId, AccountStore, AccountStoreError, Clock};

use crate::error::AccountServiceError;

/// Delete account use case - soft deletes a live account
pub struct DeleteAccountUseCase<A>
where
    A: AccountStore,
{
    accounts: A,
    clock: Arc<dyn Clock>,
}

impl<A> DeleteAccountUseCase<A>
where
    A: AccountStore,
{
    pub fn new(accounts: A, clock: Arc<dyn Clock>) -> Self {
        Self { accounts, clock }
    }

    /// Deleting an already deleted account fails with `NotFound`.
    #[tracing::instrument(name = "DeleteAccountUseCase::execute", skip(self))]
    pub async fn execute(&self, account_id: AccountId) -> Result<(), AccountServiceError> {
        match self.accounts.soft_delete(account_id, self.clock.now()).await {
            Ok(()) => {
                tracing::info!("Account deleted");
                Ok(())
            }
            Err(AccountStoreError::NotFound) => Err(AccountServiceError::NotFound),
            Err(e) => {
                tracing::error!(error = %e, "Failed to delete account");
                Err(AccountServiceError::DeletionFailed)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::Fixture;
    use chrono::{DateTime, Utc};
    use credentials_adapters::persistence::HashMapAccountStore;
    use credentials_core::{Account, AccountPage, Email, ListOrder, NewAccount, PageRequest};

    #[derive(Clone)]
    struct BrokenDeleteStore {
        inner: HashMapAccountStore,
    }

    #[async_trait::async_trait]
    impl AccountStore for BrokenDeleteStore {
        async fn create(&self, account: NewAccount) -> Result<Account, AccountStoreError> {
            self.inner.create(account).await
        }

        async fn find(&self, id: AccountId) -> Result<Account, AccountStoreError> {
            self.inner.find(id).await
        }

        async fn find_by_login(&self, email: &Email) -> Result<Account, AccountStoreError> {
            self.inner.find_by_login(email).await
        }

        async fn update<F, T, E>(&self, id: AccountId, mutate: F) -> Result<T, E>
        where
            F: FnOnce(&mut Account) -> Result<T, E> + Send,
            T: Send,
            E: From<AccountStoreError> + Send,
        {
            self.inner.update(id, mutate).await
        }

        async fn soft_delete(&self, _: AccountId, _: DateTime<Utc>) -> Result<(), AccountStoreError> {
            Err(AccountStoreError::UnexpectedError("disk full".to_string()))
        }

        async fn list(
            &self,
            page: PageRequest,
            order: ListOrder,
        ) -> Result<AccountPage, AccountStoreError> {
            self.inner.list(page, order).await
        }
    }

    #[tokio::test]
    async fn second_delete_is_not_found() {
        let fixture = Fixture::new();
        let account = fixture.seed("jane@example.com", true).await;
        let use_case = DeleteAccountUseCase::new(fixture.accounts.clone(), fixture.clock());

        use_case.execute(account.id()).await.unwrap();

        assert!(matches!(
            fixture.accounts.find(account.id()).await,
            Err(AccountStoreError::NotFound)
        ));
        assert!(matches!(
            use_case.execute(account.id()).await,
            Err(AccountServiceError::NotFound)
        ));
    }

    #[tokio::test]
    async fn store_failure_leaves_the_record_alone() {
        let fixture = Fixture::new();
        let account = fixture.seed("jane@example.com", true).await;
        let store = BrokenDeleteStore {
            inner: fixture.accounts.clone(),
        };

        let outcome = DeleteAccountUseCase::new(store, fixture.clock())
            .execute(account.id())
            .await;

        assert!(matches!(outcome, Err(AccountServiceError::DeletionFailed)));
        assert!(fixture.accounts.find(account.id()).await.is_ok());
    }
}
