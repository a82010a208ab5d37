use std::collections::BTreeSet;
use std::sync::Arc;

use secrecy::Secret;

use credentials_core::{
    Group, GroupId, GroupRegistry, GroupRegistryError, Notification, NotificationDispatcher,
    Password, TokenGenerator, ValidationErrors, validate_password,
};

pub mod authenticate;
pub mod create_account;
pub mod delete_account;
pub mod resend_activation;
pub mod reset_password;
pub mod suspend_account;
pub mod update_account;

pub use authenticate::AuthenticateUseCase;
pub use create_account::CreateAccountUseCase;
pub use delete_account::DeleteAccountUseCase;
pub use resend_activation::ResendActivationUseCase;
pub use reset_password::ResetPasswordUseCase;
pub use suspend_account::SuspendAccountUseCase;
pub use update_account::UpdateAccountUseCase;

/// Source of random temporary passwords handed out on creation and reset.
#[derive(Clone)]
pub struct TemporaryPasswords {
    tokens: Arc<dyn TokenGenerator>,
    length: usize,
}

impl TemporaryPasswords {
    pub fn new(tokens: Arc<dyn TokenGenerator>, length: usize) -> Self {
        Self { tokens, length }
    }

    /// The generated value still goes through the password rules, so a
    /// misconfigured length surfaces as a `password` violation.
    pub fn generate(&self) -> Result<Password, ValidationErrors> {
        validate_password(Secret::new(self.tokens.generate(self.length)))
    }
}

/// Ids among `requested` that name a registered group.
pub(crate) async fn registered_groups<G>(
    groups: &G,
    requested: &BTreeSet<GroupId>,
) -> Result<BTreeSet<GroupId>, GroupRegistryError>
where
    G: GroupRegistry,
{
    Ok(groups
        .find_many(requested)
        .await?
        .iter()
        .map(Group::id)
        .collect())
}

/// Hands a notification to the dispatcher. A refused hand-off is logged and
/// never undoes the state change that produced it.
pub(crate) fn notify<N>(notifier: &N, notification: Notification)
where
    N: NotificationDispatcher,
{
    let kind = notification.kind();
    if let Err(e) = notifier.dispatch(notification) {
        tracing::warn!(kind, error = %e, "Notification was not queued");
    }
}
