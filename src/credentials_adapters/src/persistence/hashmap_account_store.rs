use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use credentials_core::{
    Account, AccountId, AccountPage, AccountStore, AccountStoreError, Email, ListOrder,
    NewAccount, PageRequest,
};

/// In-memory account store. The write lock is held across every
/// read-modify-write so concurrent updates of one account serialize.
#[derive(Default, Clone)]
pub struct HashMapAccountStore {
    accounts: Arc<RwLock<HashMap<AccountId, Account>>>,
}

impl HashMapAccountStore {
    pub fn new() -> Self {
        Self {
            accounts: Arc::new(RwLock::new(HashMap::new())),
        }
    }
}

fn login_taken(accounts: &HashMap<AccountId, Account>, email: &Email, except: Option<AccountId>) -> bool {
    accounts
        .values()
        .any(|a| !a.is_deleted() && a.email() == email && Some(a.id()) != except)
}

fn live(accounts: &HashMap<AccountId, Account>, id: AccountId) -> Result<&Account, AccountStoreError> {
    accounts
        .get(&id)
        .filter(|a| !a.is_deleted())
        .ok_or(AccountStoreError::NotFound)
}

#[async_trait::async_trait]
impl AccountStore for HashMapAccountStore {
    #[tracing::instrument(name = "Adding account to memory store", skip_all)]
    async fn create(&self, account: NewAccount) -> Result<Account, AccountStoreError> {
        let mut accounts = self.accounts.write().await;
        if login_taken(&accounts, &account.details.email, None) {
            return Err(AccountStoreError::DuplicateLogin);
        }

        let id = AccountId::new();
        let account = Account::create(id, account);
        accounts.insert(id, account.clone());
        Ok(account)
    }

    async fn find(&self, id: AccountId) -> Result<Account, AccountStoreError> {
        let accounts = self.accounts.read().await;
        live(&accounts, id).cloned()
    }

    async fn find_by_login(&self, email: &Email) -> Result<Account, AccountStoreError> {
        let accounts = self.accounts.read().await;
        accounts
            .values()
            .find(|a| !a.is_deleted() && a.email() == email)
            .cloned()
            .ok_or(AccountStoreError::NotFound)
    }

    #[tracing::instrument(name = "Updating account in memory store", skip_all, fields(account_id = %id))]
    async fn update<F, T, E>(&self, id: AccountId, mutate: F) -> Result<T, E>
    where
        F: FnOnce(&mut Account) -> Result<T, E> + Send,
        T: Send,
        E: From<AccountStoreError> + Send,
    {
        let mut accounts = self.accounts.write().await;
        let mut draft = live(&accounts, id)?.clone();
        let output = mutate(&mut draft)?;

        if login_taken(&accounts, draft.email(), Some(id)) {
            return Err(AccountStoreError::DuplicateLogin.into());
        }

        draft.forget_access();
        accounts.insert(id, draft);
        Ok(output)
    }

    #[tracing::instrument(name = "Soft deleting account", skip(self))]
    async fn soft_delete(&self, id: AccountId, at: DateTime<Utc>) -> Result<(), AccountStoreError> {
        let mut accounts = self.accounts.write().await;
        let account = accounts
            .get_mut(&id)
            .filter(|a| !a.is_deleted())
            .ok_or(AccountStoreError::NotFound)?;

        account.mark_deleted(at);
        Ok(())
    }

    async fn list(
        &self,
        page: PageRequest,
        order: ListOrder,
    ) -> Result<AccountPage, AccountStoreError> {
        let accounts = self.accounts.read().await;
        let mut live: Vec<&Account> = accounts.values().filter(|a| !a.is_deleted()).collect();
        live.sort_by(|a, b| order.compare(a, b));

        let total = live.len();
        let accounts = live
            .into_iter()
            .skip(page.offset())
            .take(page.size)
            .cloned()
            .collect();

        Ok(AccountPage {
            accounts,
            page,
            total,
        })
    }
}
