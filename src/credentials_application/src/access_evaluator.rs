use std::collections::BTreeSet;

use credentials_core::{
    AccessKey, Account, GroupRegistry, GroupRegistryError, Permission, PermissionQuery,
};

/// Answers permission queries from an account's group memberships.
///
/// Decisions are memoized on the `Account` value under a key built from the
/// sorted permission names and the `require_all` flag. The memo is dropped
/// whenever the account's memberships change.
#[derive(Clone)]
pub struct AccessEvaluator<G>
where
    G: GroupRegistry,
{
    groups: G,
}

impl<G> AccessEvaluator<G>
where
    G: GroupRegistry,
{
    pub fn new(groups: G) -> Self {
        Self { groups }
    }

    /// Union of the permissions granted by every group the account is in.
    pub async fn grants(&self, account: &Account) -> Result<BTreeSet<Permission>, GroupRegistryError> {
        let groups = self.groups.find_many(account.groups()).await?;
        Ok(groups
            .into_iter()
            .flat_map(|group| group.permissions().clone())
            .collect())
    }

    /// With `use_cache` unset the decision is recomputed, then stored.
    #[tracing::instrument(name = "AccessEvaluator::has_access", skip_all, fields(account_id = %account.id()))]
    pub async fn has_access(
        &self,
        account: &mut Account,
        query: impl Into<PermissionQuery> + Send,
        require_all: bool,
        use_cache: bool,
    ) -> Result<bool, GroupRegistryError> {
        let key = AccessKey::new(query.into(), require_all);

        if use_cache {
            if let Some(granted) = account.cached_access(&key) {
                return Ok(granted);
            }
        }

        let granted = key
            .query()
            .is_satisfied_by(&self.grants(account).await?, require_all);
        account.remember_access(key, granted);
        Ok(granted)
    }

    pub async fn has_any_access(
        &self,
        account: &mut Account,
        query: impl Into<PermissionQuery> + Send,
        use_cache: bool,
    ) -> Result<bool, GroupRegistryError> {
        self.has_access(account, query, false, use_cache).await
    }
}
