use std::collections::BTreeSet;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use secrecy::Secret;

use credentials_core::{
    Account, AccountForm, AccountId, AccountPage, AccountStore, ActivationCode, Clock, Group,
    GroupId, GroupRegistry, ListOrder, NotificationDispatcher, PageRequest, PasswordHasher,
    PermissionQuery, ThrottlePolicy, ThrottleState, ThrottleStore, TokenGenerator,
};

use crate::access_evaluator::AccessEvaluator;
use crate::activation_manager::ActivationManager;
use crate::admin_action::AdminAction;
use crate::error::AccountServiceError;
use crate::throttle_guard::ThrottleGuard;
use crate::use_cases::{
    AuthenticateUseCase, CreateAccountUseCase, DeleteAccountUseCase, ResendActivationUseCase,
    ResetPasswordUseCase, SuspendAccountUseCase, TemporaryPasswords, UpdateAccountUseCase,
};

#[derive(Debug, Clone)]
pub struct AccountServiceOptions {
    pub require_activation: bool,
    pub temporary_password_length: usize,
    pub activation_code_length: usize,
    pub page_size: usize,
    pub order: ListOrder,
    pub throttle: ThrottlePolicy,
}

impl Default for AccountServiceOptions {
    fn default() -> Self {
        Self {
            require_activation: true,
            temporary_password_length: 16,
            activation_code_length: 42,
            page_size: 20,
            order: ListOrder::default(),
            throttle: ThrottlePolicy::default(),
        }
    }
}

/// Everything an account detail view shows.
#[derive(Debug, Clone)]
pub struct AccountOverview {
    pub account: Account,
    pub group_names: Vec<String>,
    pub throttle: ThrottleState,
    /// Rounded up; `None` unless suspended.
    pub minutes_remaining: Option<i64>,
    pub failed_attempts: u32,
    pub suspensions: u32,
    pub last_failed_attempt_at: Option<DateTime<Utc>>,
}

impl AccountOverview {
    pub fn groups_label(&self) -> String {
        if self.group_names.is_empty() {
            "No Group Memberships".to_string()
        } else {
            self.group_names.join(", ")
        }
    }

    pub fn is_suspended(&self) -> bool {
        matches!(self.throttle, ThrottleState::Suspended { .. })
    }

    pub fn is_banned(&self) -> bool {
        self.throttle == ThrottleState::Banned
    }
}

/// Entry point for account administration and login.
///
/// Stores and adapters are cheap handles; each call builds the use case it
/// needs from clones of them.
pub struct AccountService<A, G, T, H, N>
where
    A: AccountStore + Clone,
    G: GroupRegistry + Clone,
    T: ThrottleStore + Clone,
    H: PasswordHasher + Clone,
    N: NotificationDispatcher + Clone,
{
    accounts: A,
    groups: G,
    hasher: H,
    notifier: N,
    throttle: ThrottleGuard<A, T>,
    activation: ActivationManager<A>,
    access: AccessEvaluator<G>,
    passwords: TemporaryPasswords,
    clock: Arc<dyn Clock>,
    options: AccountServiceOptions,
}

impl<A, G, T, H, N> AccountService<A, G, T, H, N>
where
    A: AccountStore + Clone,
    G: GroupRegistry + Clone,
    T: ThrottleStore + Clone,
    H: PasswordHasher + Clone,
    N: NotificationDispatcher + Clone,
{
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        accounts: A,
        groups: G,
        throttles: T,
        hasher: H,
        notifier: N,
        tokens: Arc<dyn TokenGenerator>,
        clock: Arc<dyn Clock>,
        options: AccountServiceOptions,
    ) -> Self {
        let throttle =
            ThrottleGuard::new(accounts.clone(), throttles, options.throttle, clock.clone());
        let activation = ActivationManager::new(
            accounts.clone(),
            tokens.clone(),
            clock.clone(),
            options.activation_code_length,
        );

        Self {
            access: AccessEvaluator::new(groups.clone()),
            passwords: TemporaryPasswords::new(tokens, options.temporary_password_length),
            accounts,
            groups,
            hasher,
            notifier,
            throttle,
            activation,
            clock,
            options,
        }
    }

    pub fn options(&self) -> &AccountServiceOptions {
        &self.options
    }

    pub fn throttle(&self) -> &ThrottleGuard<A, T> {
        &self.throttle
    }

    pub fn activation(&self) -> &ActivationManager<A> {
        &self.activation
    }

    pub fn access(&self) -> &AccessEvaluator<G> {
        &self.access
    }

    pub async fn create_account(
        &self,
        form: &AccountForm,
        group_ids: &BTreeSet<GroupId>,
    ) -> Result<Account, AccountServiceError> {
        let activation = self
            .options
            .require_activation
            .then(|| self.activation.clone());

        CreateAccountUseCase::new(
            self.accounts.clone(),
            self.groups.clone(),
            self.hasher.clone(),
            self.notifier.clone(),
            self.passwords.clone(),
            activation,
            self.clock.clone(),
        )
        .execute(form, group_ids)
        .await
    }

    pub async fn update_account(
        &self,
        account_id: AccountId,
        form: &AccountForm,
        group_ids: &BTreeSet<GroupId>,
    ) -> Result<Account, AccountServiceError> {
        UpdateAccountUseCase::new(self.accounts.clone(), self.groups.clone(), self.clock.clone())
            .execute(account_id, form, group_ids)
            .await
    }

    pub async fn suspend_account(
        &self,
        account_id: AccountId,
    ) -> Result<DateTime<Utc>, AccountServiceError> {
        SuspendAccountUseCase::new(self.throttle.clone())
            .execute(account_id)
            .await
    }

    #[tracing::instrument(name = "AccountService::ban_account", skip(self))]
    pub async fn ban_account(&self, account_id: AccountId) -> Result<(), AccountServiceError> {
        self.throttle.ban(account_id).await?;
        tracing::info!("Account banned");
        Ok(())
    }

    pub async fn reset_password(&self, account_id: AccountId) -> Result<(), AccountServiceError> {
        ResetPasswordUseCase::new(
            self.accounts.clone(),
            self.hasher.clone(),
            self.notifier.clone(),
            self.passwords.clone(),
            self.clock.clone(),
        )
        .execute(account_id)
        .await
    }

    pub async fn resend_activation(&self, account_id: AccountId) -> Result<(), AccountServiceError> {
        ResendActivationUseCase::new(self.activation.clone(), self.notifier.clone())
            .execute(account_id)
            .await
    }

    pub async fn delete_account(&self, account_id: AccountId) -> Result<(), AccountServiceError> {
        DeleteAccountUseCase::new(self.accounts.clone(), self.clock.clone())
            .execute(account_id)
            .await
    }

    pub async fn activate_account(
        &self,
        account_id: AccountId,
        code: &ActivationCode,
    ) -> Result<Account, AccountServiceError> {
        let account = self.activation.verify(account_id, code).await?;
        tracing::info!(%account_id, "Account activated");
        Ok(account)
    }

    pub async fn authenticate(
        &self,
        login: &str,
        password: Secret<String>,
    ) -> Result<Account, AccountServiceError> {
        AuthenticateUseCase::new(
            self.accounts.clone(),
            self.throttle.clone(),
            self.hasher.clone(),
            self.clock.clone(),
        )
        .execute(login, password)
        .await
    }

    pub async fn find_account(&self, account_id: AccountId) -> Result<Account, AccountServiceError> {
        Ok(self.accounts.find(account_id).await?)
    }

    /// `page` is zero-based; size and order come from the options.
    pub async fn list_accounts(&self, page: usize) -> Result<AccountPage, AccountServiceError> {
        let request = PageRequest::new(page, self.options.page_size);
        Ok(self.accounts.list(request, self.options.order).await?)
    }

    pub async fn describe_account(
        &self,
        account_id: AccountId,
    ) -> Result<AccountOverview, AccountServiceError> {
        let account = self.accounts.find(account_id).await?;
        let group_names = self
            .groups
            .find_many(account.groups())
            .await?
            .into_iter()
            .map(|group| group.name().to_string())
            .collect();
        let record = self.throttle.record(account_id).await?;
        let now = self.clock.now();

        Ok(AccountOverview {
            account,
            group_names,
            throttle: record.state(now),
            minutes_remaining: record.minutes_remaining(now),
            failed_attempts: record.attempts(),
            suspensions: record.offenses(),
            last_failed_attempt_at: record.last_attempt_at(),
        })
    }

    pub async fn groups(&self) -> Result<Vec<Group>, AccountServiceError> {
        Ok(self.groups.all().await?)
    }

    pub async fn has_access(
        &self,
        account: &mut Account,
        query: impl Into<PermissionQuery> + Send,
        require_all: bool,
        use_cache: bool,
    ) -> Result<bool, AccountServiceError> {
        Ok(self
            .access
            .has_access(account, query, require_all, use_cache)
            .await?)
    }

    /// Fails with `Forbidden` unless `actor` holds the permission `action`
    /// requires.
    pub async fn authorize(
        &self,
        actor: &mut Account,
        action: AdminAction,
    ) -> Result<(), AccountServiceError> {
        let permission = action.required_permission();
        if self
            .access
            .has_access(actor, permission.clone(), true, true)
            .await?
        {
            Ok(())
        } else {
            tracing::warn!(actor = %actor.id(), ?action, "Administrative action refused");
            Err(AccountServiceError::Forbidden(permission))
        }
    }
}
