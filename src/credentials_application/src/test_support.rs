use std::collections::BTreeSet;
use std::sync::Arc;

use chrono::{TimeZone, Utc};
use secrecy::Secret;

use credentials_adapters::clock::ManualClock;
use credentials_adapters::hashing::Argon2PasswordHasher;
use credentials_adapters::notification::RecordingNotificationDispatcher;
use credentials_adapters::persistence::{
    DashMapThrottleStore, HashMapAccountStore, HashMapGroupRegistry,
};
use credentials_adapters::tokens::RandomTokenGenerator;
use credentials_core::{
    Account, AccountForm, AccountStore, Clock, Email, Group, GroupId, NewAccount, PasswordHash,
    Permission, TokenGenerator,
};

pub(crate) struct Fixture {
    pub accounts: HashMapAccountStore,
    pub groups: HashMapGroupRegistry,
    pub throttles: DashMapThrottleStore,
    pub notifier: RecordingNotificationDispatcher,
    pub hasher: Argon2PasswordHasher,
    pub clock: ManualClock,
}

impl Fixture {
    pub fn new() -> Self {
        Self {
            accounts: HashMapAccountStore::new(),
            groups: HashMapGroupRegistry::new(),
            throttles: DashMapThrottleStore::new(),
            notifier: RecordingNotificationDispatcher::new(),
            hasher: Argon2PasswordHasher::with_params(1024, 1, 1).unwrap(),
            clock: ManualClock::new(Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap()),
        }
    }

    pub fn clock(&self) -> Arc<dyn Clock> {
        Arc::new(self.clock.clone())
    }

    pub fn tokens(&self) -> Arc<dyn TokenGenerator> {
        Arc::new(RandomTokenGenerator)
    }

    /// Stores an account directly, bypassing hashing and notifications.
    pub async fn seed(&self, email: &str, activated: bool) -> Account {
        let details = form("Jane", "Doe", email).validate().unwrap();
        let now = self.clock.now();
        self.accounts
            .create(NewAccount {
                details,
                password_hash: PasswordHash::new(Secret::new("not-a-real-hash".to_string())),
                activated_at: activated.then_some(now),
                activation_code: None,
                groups: BTreeSet::new(),
                created_at: now,
            })
            .await
            .unwrap()
    }

    pub async fn group(&self, name: &str, permissions: &[&'static str]) -> GroupId {
        let group = Group::new(
            GroupId::new(),
            name,
            permissions.iter().copied().map(Permission::from),
        );
        let id = group.id();
        self.groups.register(group).await;
        id
    }
}

pub(crate) fn form(first_name: &str, last_name: &str, email: &str) -> AccountForm {
    AccountForm {
        first_name: first_name.to_string(),
        last_name: last_name.to_string(),
        email: email.to_string(),
    }
}

pub(crate) fn email(raw: &str) -> Email {
    Email::parse(raw).unwrap()
}
