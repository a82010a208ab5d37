use std::collections::{BTreeMap, BTreeSet};

use crate::domain::group::Permission;

/// One permission name or a set of them.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord)]
pub struct PermissionQuery(BTreeSet<Permission>);

impl PermissionQuery {
    pub fn permissions(&self) -> &BTreeSet<Permission> {
        &self.0
    }

    /// `require_all` needs every queried permission in `grants`, otherwise
    /// any one of them is enough.
    pub fn is_satisfied_by(&self, grants: &BTreeSet<Permission>, require_all: bool) -> bool {
        if require_all {
            self.0.iter().all(|permission| grants.contains(permission))
        } else {
            self.0.iter().any(|permission| grants.contains(permission))
        }
    }
}

impl From<Permission> for PermissionQuery {
    fn from(value: Permission) -> Self {
        Self(BTreeSet::from([value]))
    }
}

impl From<&'static str> for PermissionQuery {
    fn from(value: &'static str) -> Self {
        Permission::from(value).into()
    }
}

impl<const N: usize> From<[&'static str; N]> for PermissionQuery {
    fn from(value: [&'static str; N]) -> Self {
        value.into_iter().map(Permission::from).collect()
    }
}

impl FromIterator<Permission> for PermissionQuery {
    fn from_iter<I: IntoIterator<Item = Permission>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Structural cache key: the sorted permission names plus the `require_all` flag.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct AccessKey {
    query: PermissionQuery,
    require_all: bool,
}

impl AccessKey {
    pub fn new(query: PermissionQuery, require_all: bool) -> Self {
        Self { query, require_all }
    }

    pub fn query(&self) -> &PermissionQuery {
        &self.query
    }

    pub fn require_all(&self) -> bool {
        self.require_all
    }
}

/// Memoised access decisions for a single in-memory account value.
#[derive(Debug, Clone, Default)]
pub struct AccessCache(BTreeMap<AccessKey, bool>);

impl AccessCache {
    pub fn get(&self, key: &AccessKey) -> Option<bool> {
        self.0.get(key).copied()
    }

    pub fn insert(&mut self, key: AccessKey, granted: bool) {
        self.0.insert(key, granted);
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
