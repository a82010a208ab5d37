use std::collections::BTreeSet;
use std::sync::Arc;

use credentials_core::{Account, AccountForm, AccountId, AccountStore, Clock, GroupId, GroupRegistry};

use super::registered_groups;
use crate::error::AccountServiceError;

/// Update account use case - replaces profile fields and reconciles group
/// memberships in one atomic store update
pub struct UpdateAccountUseCase<A, G>
where
    A: AccountStore,
    G: GroupRegistry,
{
    accounts: A,
    groups: G,
    clock: Arc<dyn Clock>,
}

impl<A, G> UpdateAccountUseCase<A, G>
where
    A: AccountStore,
    G: GroupRegistry,
{
    pub fn new(accounts: A, groups: G, clock: Arc<dyn Clock>) -> Self {
        Self {
            accounts,
            groups,
            clock,
        }
    }

    /// Memberships end up equal to the registered groups among `group_ids`.
    #[tracing::instrument(name = "UpdateAccountUseCase::execute", skip(self, form, group_ids))]
    pub async fn execute(
        &self,
        account_id: AccountId,
        form: &AccountForm,
        group_ids: &BTreeSet<GroupId>,
    ) -> Result<Account, AccountServiceError> {
        let details = form.validate()?;
        let desired = registered_groups(&self.groups, group_ids).await?;
        let now = self.clock.now();

        let (account, diff) = self
            .accounts
            .update(account_id, |account| {
                account.set_details(details, now);
                let diff = account.reconcile_groups(&desired, now);
                Ok::<_, AccountServiceError>((account.clone(), diff))
            })
            .await?;

        tracing::info!(
            added = diff.added.len(),
            removed = diff.removed.len(),
            "Account updated"
        );
        Ok(account)
    }
}
