//! Account aggregate.
//!
//! An [`Account`] is a plain value: persistence, hashing, throttling and
//! authorization are handled by ports and components that operate on it.

use std::collections::BTreeSet;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{
    access::{AccessCache, AccessKey},
    activation::{ActivationCode, ActivationError},
    email::Email,
    group::{GroupId, MembershipDiff},
    password::PasswordHash,
    person_name::PersonName,
    validation::AccountDetails,
};

#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccountId(Uuid);

impl AccountId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for AccountId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<Uuid> for AccountId {
    fn from(value: Uuid) -> Self {
        Self(value)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivationState {
    Pending,
    Activated,
}

#[derive(Debug, Clone)]
enum Activation {
    Pending { code: Option<ActivationCode> },
    Activated { at: DateTime<Utc> },
}

/// Everything the store needs to persist a new account.
#[derive(Debug, Clone)]
pub struct NewAccount {
    pub details: AccountDetails,
    pub password_hash: PasswordHash,
    /// `Some` creates the account already activated at that instant.
    pub activated_at: Option<DateTime<Utc>>,
    /// Code a pending account starts out with. Ignored when `activated_at`
    /// is set.
    pub activation_code: Option<ActivationCode>,
    pub groups: BTreeSet<GroupId>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct Account {
    id: AccountId,
    email: Email,
    first_name: PersonName,
    last_name: PersonName,
    password_hash: PasswordHash,
    activation: Activation,
    groups: BTreeSet<GroupId>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    last_login_at: Option<DateTime<Utc>>,
    deleted_at: Option<DateTime<Utc>>,
    access: AccessCache,
}

impl Account {
    pub fn create(id: AccountId, new: NewAccount) -> Self {
        let activation = match new.activated_at {
            Some(at) => Activation::Activated { at },
            None => Activation::Pending {
                code: new.activation_code,
            },
        };

        Self {
            id,
            email: new.details.email,
            first_name: new.details.first_name,
            last_name: new.details.last_name,
            password_hash: new.password_hash,
            activation,
            groups: new.groups,
            created_at: new.created_at,
            updated_at: new.created_at,
            last_login_at: None,
            deleted_at: None,
            access: AccessCache::default(),
        }
    }

    pub fn id(&self) -> AccountId {
        self.id
    }

    pub fn email(&self) -> &Email {
        &self.email
    }

    pub fn first_name(&self) -> &PersonName {
        &self.first_name
    }

    pub fn last_name(&self) -> &PersonName {
        &self.last_name
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    pub fn password_hash(&self) -> &PasswordHash {
        &self.password_hash
    }

    pub fn activation_state(&self) -> ActivationState {
        match self.activation {
            Activation::Pending { .. } => ActivationState::Pending,
            Activation::Activated { .. } => ActivationState::Activated,
        }
    }

    pub fn is_activated(&self) -> bool {
        self.activation_state() == ActivationState::Activated
    }

    pub fn activated_at(&self) -> Option<DateTime<Utc>> {
        match self.activation {
            Activation::Activated { at } => Some(at),
            Activation::Pending { .. } => None,
        }
    }

    pub fn pending_activation_code(&self) -> Option<&ActivationCode> {
        match &self.activation {
            Activation::Pending { code } => code.as_ref(),
            Activation::Activated { .. } => None,
        }
    }

    pub fn groups(&self) -> &BTreeSet<GroupId> {
        &self.groups
    }

    pub fn in_group(&self, group: GroupId) -> bool {
        self.groups.contains(&group)
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    pub fn last_login_at(&self) -> Option<DateTime<Utc>> {
        self.last_login_at
    }

    pub fn deleted_at(&self) -> Option<DateTime<Utc>> {
        self.deleted_at
    }

    pub fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }

    pub fn set_details(&mut self, details: AccountDetails, now: DateTime<Utc>) {
        self.email = details.email;
        self.first_name = details.first_name;
        self.last_name = details.last_name;
        self.updated_at = now;
    }

    pub fn set_password_hash(&mut self, password_hash: PasswordHash, now: DateTime<Utc>) {
        self.password_hash = password_hash;
        self.updated_at = now;
    }

    /// Brings memberships in line with `desired` and returns what changed.
    /// Any change drops cached access decisions.
    pub fn reconcile_groups(
        &mut self,
        desired: &BTreeSet<GroupId>,
        now: DateTime<Utc>,
    ) -> MembershipDiff {
        let diff = MembershipDiff::between(&self.groups, desired);
        if !diff.is_empty() {
            diff.apply_to(&mut self.groups);
            self.access.clear();
            self.updated_at = now;
        }
        diff
    }

    /// Stores `code` as the only valid activation code, replacing any
    /// unconsumed one.
    pub fn issue_activation_code(
        &mut self,
        code: ActivationCode,
        now: DateTime<Utc>,
    ) -> Result<(), ActivationError> {
        match &mut self.activation {
            Activation::Activated { .. } => Err(ActivationError::AlreadyActivated),
            Activation::Pending { code: pending } => {
                *pending = Some(code);
                self.updated_at = now;
                Ok(())
            }
        }
    }

    pub fn activate(
        &mut self,
        code: &ActivationCode,
        now: DateTime<Utc>,
    ) -> Result<(), ActivationError> {
        let matches = match &self.activation {
            Activation::Activated { .. } => return Err(ActivationError::AlreadyActivated),
            Activation::Pending { code: pending } => pending.as_ref() == Some(code),
        };
        if !matches {
            return Err(ActivationError::InvalidCode);
        }

        self.activation = Activation::Activated { at: now };
        self.updated_at = now;
        Ok(())
    }

    pub fn record_login(&mut self, now: DateTime<Utc>) {
        self.last_login_at = Some(now);
    }

    pub fn mark_deleted(&mut self, now: DateTime<Utc>) {
        self.deleted_at = Some(now);
        self.updated_at = now;
    }

    pub fn cached_access(&self, key: &AccessKey) -> Option<bool> {
        self.access.get(key)
    }

    pub fn remember_access(&mut self, key: AccessKey, granted: bool) {
        self.access.insert(key, granted);
    }

    pub fn forget_access(&mut self) {
        self.access.clear();
    }

    pub fn access_cache(&self) -> &AccessCache {
        &self.access
    }
}
