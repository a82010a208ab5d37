use std::collections::BTreeSet;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::domain::{
    account::{Account, AccountId, NewAccount},
    email::Email,
    group::{Group, GroupId},
    listing::{AccountPage, ListOrder, PageRequest},
    throttle::ThrottleRecord,
};

// AccountStore port trait and errors
#[derive(Debug, Error)]
pub enum AccountStoreError {
    #[error("That email address is taken")]
    DuplicateLogin,
    #[error("Account not found")]
    NotFound,
    #[error("Unexpected error {0}")]
    UnexpectedError(String),
}

impl PartialEq for AccountStoreError {
    fn eq(&self, other: &Self) -> bool {
        matches!(
            (self, other),
            (Self::DuplicateLogin, Self::DuplicateLogin)
                | (Self::NotFound, Self::NotFound)
                | (Self::UnexpectedError(_), Self::UnexpectedError(_))
        )
    }
}

/// Persistence for accounts. Soft-deleted records are retained but behave as
/// missing for every operation.
#[async_trait]
pub trait AccountStore: Send + Sync {
    /// Fails with `DuplicateLogin` without writing anything if a live account
    /// already uses the email.
    async fn create(&self, account: NewAccount) -> Result<Account, AccountStoreError>;

    async fn find(&self, id: AccountId) -> Result<Account, AccountStoreError>;

    async fn find_by_login(&self, email: &Email) -> Result<Account, AccountStoreError>;

    /// Atomic read-modify-write. `mutate` runs against a draft of the stored
    /// record which is committed only if it returns `Ok` and its email is
    /// still unique.
    async fn update<F, T, E>(&self, id: AccountId, mutate: F) -> Result<T, E>
    where
        F: FnOnce(&mut Account) -> Result<T, E> + Send,
        T: Send,
        E: From<AccountStoreError> + Send;

    async fn soft_delete(&self, id: AccountId, at: DateTime<Utc>) -> Result<(), AccountStoreError>;

    async fn list(
        &self,
        page: PageRequest,
        order: ListOrder,
    ) -> Result<AccountPage, AccountStoreError>;
}

// GroupRegistry port trait and errors
#[derive(Debug, Error)]
pub enum GroupRegistryError {
    #[error("Unexpected error {0}")]
    UnexpectedError(String),
}

#[async_trait]
pub trait GroupRegistry: Send + Sync {
    async fn all(&self) -> Result<Vec<Group>, GroupRegistryError>;

    /// Registered groups among `ids`; unknown ids are skipped.
    async fn find_many(&self, ids: &BTreeSet<GroupId>) -> Result<Vec<Group>, GroupRegistryError>;
}

// ThrottleStore port trait and errors
#[derive(Debug, Error)]
pub enum ThrottleStoreError {
    #[error("Unexpected error {0}")]
    UnexpectedError(String),
}

/// One throttle record per account, created on first access.
#[async_trait]
pub trait ThrottleStore: Send + Sync {
    async fn get(&self, account_id: AccountId) -> Result<ThrottleRecord, ThrottleStoreError>;

    /// Runs `mutate` while holding the record exclusively.
    async fn modify<F, T>(&self, account_id: AccountId, mutate: F) -> Result<T, ThrottleStoreError>
    where
        F: FnOnce(&mut ThrottleRecord) -> T + Send,
        T: Send;
}
