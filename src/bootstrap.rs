use std::collections::BTreeSet;
use std::sync::Arc;

use credentials_adapters::config::{BootstrapSettings, CredentialsSettings, GroupSettings};
use credentials_adapters::hashing::Argon2PasswordHasher;
use credentials_adapters::persistence::{
    DashMapThrottleStore, HashMapAccountStore, HashMapGroupRegistry,
};
use credentials_adapters::tokens::RandomTokenGenerator;
use credentials_application::{AccountService, AccountServiceError, AccountServiceOptions};
use credentials_core::{
    Account, AccountForm, Clock, Group, GroupId, NotificationDispatcher, Permission,
};

/// Account service backed entirely by in-memory adapters.
pub type InMemoryAccountService<N> = AccountService<
    HashMapAccountStore,
    HashMapGroupRegistry,
    DashMapThrottleStore,
    Argon2PasswordHasher,
    N,
>;

pub fn service_options(settings: &CredentialsSettings) -> AccountServiceOptions {
    AccountServiceOptions {
        require_activation: settings.activation.required,
        temporary_password_length: settings.password.temporary_length,
        activation_code_length: settings.activation.code_length,
        page_size: settings.listing.page_size,
        order: settings.listing.order,
        throttle: settings.throttle,
    }
}

/// Registers one group per entry, each under a fresh id.
pub async fn register_groups(registry: &HashMapGroupRegistry, groups: &[GroupSettings]) -> Vec<Group> {
    let mut registered = Vec::with_capacity(groups.len());
    for settings in groups {
        let group = Group::new(
            GroupId::new(),
            settings.name.clone(),
            settings.permissions.iter().cloned().map(Permission::from),
        );
        registry.register(group.clone()).await;
        tracing::debug!(name = group.name(), "Group registered");
        registered.push(group);
    }
    registered
}

pub fn in_memory_service<N>(
    settings: &CredentialsSettings,
    groups: HashMapGroupRegistry,
    notifier: N,
    clock: Arc<dyn Clock>,
) -> InMemoryAccountService<N>
where
    N: NotificationDispatcher + Clone,
{
    AccountService::new(
        HashMapAccountStore::new(),
        groups,
        DashMapThrottleStore::new(),
        Argon2PasswordHasher::new(),
        notifier,
        Arc::new(RandomTokenGenerator),
        clock,
        service_options(settings),
    )
}

/// Creates the configured administrator. Group names that match no
/// registered group are skipped. Returns `None` if the login already exists.
pub async fn bootstrap_admin<N>(
    service: &InMemoryAccountService<N>,
    admin: &BootstrapSettings,
    groups: &[Group],
) -> Result<Option<Account>, AccountServiceError>
where
    N: NotificationDispatcher + Clone,
{
    let group_ids: BTreeSet<GroupId> = groups
        .iter()
        .filter(|group| admin.groups.iter().any(|name| name == group.name()))
        .map(Group::id)
        .collect();

    let form = AccountForm {
        first_name: admin.first_name.clone(),
        last_name: admin.last_name.clone(),
        email: admin.email.clone(),
    };

    match service.create_account(&form, &group_ids).await {
        Ok(account) => {
            tracing::info!(account_id = %account.id(), "Bootstrap administrator created");
            Ok(Some(account))
        }
        Err(AccountServiceError::DuplicateLogin) => {
            tracing::info!("Bootstrap administrator already exists");
            Ok(None)
        }
        Err(e) => Err(e),
    }
}
