use std::collections::BTreeSet;
use std::sync::Arc;

use credentials_core::{
    Account, AccountForm, AccountStore, AccountStoreError, Clock, GroupId, GroupRegistry,
    NewAccount, Notification, NotificationDispatcher, PasswordHasher, ValidationErrors,
};

use super::{TemporaryPasswords, notify, registered_groups};
use crate::activation_manager::ActivationManager;
use crate::error::AccountServiceError;

/// Create account use case - registers an account with a temporary password
/// and tells its owner how to log in
pub struct CreateAccountUseCase<A, G, H, N>
where
    A: AccountStore,
    G: GroupRegistry,
    H: PasswordHasher,
    N: NotificationDispatcher,
{
    accounts: A,
    groups: G,
    hasher: H,
    notifier: N,
    passwords: TemporaryPasswords,
    /// `None` creates accounts already activated.
    activation: Option<ActivationManager<A>>,
    clock: Arc<dyn Clock>,
}

impl<A, G, H, N> CreateAccountUseCase<A, G, H, N>
where
    A: AccountStore,
    G: GroupRegistry,
    H: PasswordHasher,
    N: NotificationDispatcher,
{
    pub fn new(
        accounts: A,
        groups: G,
        hasher: H,
        notifier: N,
        passwords: TemporaryPasswords,
        activation: Option<ActivationManager<A>>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            accounts,
            groups,
            hasher,
            notifier,
            passwords,
            activation,
            clock,
        }
    }

    #[tracing::instrument(name = "CreateAccountUseCase::execute", skip_all)]
    pub async fn execute(
        &self,
        form: &AccountForm,
        group_ids: &BTreeSet<GroupId>,
    ) -> Result<Account, AccountServiceError> {
        let mut errors = ValidationErrors::default();
        let details = form.validate().map_err(|e| errors.merge(e)).ok();
        let password = self.passwords.generate().map_err(|e| errors.merge(e)).ok();
        let (Some(details), Some(password)) = (details, password) else {
            return Err(errors.into());
        };

        // Checked up front to skip hashing; the store enforces it again.
        match self.accounts.find_by_login(&details.email).await {
            Ok(_) => return Err(AccountServiceError::DuplicateLogin),
            Err(AccountStoreError::NotFound) => {}
            Err(e) => return Err(e.into()),
        }

        let password_hash = self.hasher.hash(&password).await?;
        let groups = registered_groups(&self.groups, group_ids).await?;
        let now = self.clock.now();
        let code = self.activation.as_ref().map(ActivationManager::new_code);

        let account = self
            .accounts
            .create(NewAccount {
                details,
                password_hash,
                activated_at: code.is_none().then_some(now),
                activation_code: code.clone(),
                groups,
                created_at: now,
            })
            .await?;
        let activation = code.map(|code| (account.id(), code));

        tracing::info!(account_id = %account.id(), "Account created");
        notify(
            &self.notifier,
            Notification::NewAccount {
                recipient: account.email().clone(),
                temporary_password: password,
                activation,
            },
        );

        Ok(account)
    }
}
