use credentials_core::{
    AccountStoreError, GroupRegistryError, HashingError, Permission, ThrottleError,
    ThrottleStoreError, ValidationErrors,
};

use crate::activation_manager::ActivationManagerError;
use crate::throttle_guard::ThrottleGuardError;

/// Errors surfaced by the account service. Store, registry and hashing
/// failures the caller cannot act on collapse into `Unexpected`.
#[derive(Debug, thiserror::Error)]
pub enum AccountServiceError {
    #[error(transparent)]
    Validation(#[from] ValidationErrors),
    #[error("That email address is taken")]
    DuplicateLogin,
    #[error("Account not found")]
    NotFound,
    #[error("Account is already activated")]
    AlreadyActivated,
    #[error("Account is already suspended for {minutes_remaining} minutes")]
    AlreadySuspended { minutes_remaining: i64 },
    #[error("Account has already been banned")]
    AlreadyBanned,
    #[error("Invalid activation code")]
    InvalidCode,
    #[error("Account could not be deleted")]
    DeletionFailed,
    #[error("Invalid login or password")]
    InvalidCredentials,
    #[error("Account is suspended for another {minutes_remaining} minutes")]
    Suspended { minutes_remaining: i64 },
    #[error("Account has been banned")]
    Banned,
    #[error("Account has not been activated")]
    NotActivated,
    #[error("Missing permission {0}")]
    Forbidden(Permission),
    #[error("Unexpected error: {0}")]
    Unexpected(String),
}

impl From<AccountStoreError> for AccountServiceError {
    fn from(error: AccountStoreError) -> Self {
        match error {
            AccountStoreError::DuplicateLogin => Self::DuplicateLogin,
            AccountStoreError::NotFound => Self::NotFound,
            AccountStoreError::UnexpectedError(e) => Self::Unexpected(e),
        }
    }
}

impl From<ThrottleError> for AccountServiceError {
    fn from(error: ThrottleError) -> Self {
        match error {
            ThrottleError::AlreadySuspended { minutes_remaining } => {
                Self::AlreadySuspended { minutes_remaining }
            }
            ThrottleError::AlreadyBanned => Self::AlreadyBanned,
            ThrottleError::Suspended { minutes_remaining } => Self::Suspended { minutes_remaining },
            ThrottleError::Banned => Self::Banned,
        }
    }
}

impl From<ThrottleGuardError> for AccountServiceError {
    fn from(error: ThrottleGuardError) -> Self {
        match error {
            ThrottleGuardError::AccountNotFound => Self::NotFound,
            ThrottleGuardError::Throttle(e) => e.into(),
            ThrottleGuardError::AccountStoreError(e) => e.into(),
            ThrottleGuardError::ThrottleStoreError(e) => e.into(),
        }
    }
}

impl From<ActivationManagerError> for AccountServiceError {
    fn from(error: ActivationManagerError) -> Self {
        match error {
            ActivationManagerError::AccountNotFound => Self::NotFound,
            ActivationManagerError::AlreadyActivated => Self::AlreadyActivated,
            ActivationManagerError::InvalidCode => Self::InvalidCode,
            ActivationManagerError::AccountStoreError(e) => e.into(),
        }
    }
}

impl From<ThrottleStoreError> for AccountServiceError {
    fn from(error: ThrottleStoreError) -> Self {
        Self::Unexpected(error.to_string())
    }
}

impl From<GroupRegistryError> for AccountServiceError {
    fn from(error: GroupRegistryError) -> Self {
        Self::Unexpected(error.to_string())
    }
}

impl From<HashingError> for AccountServiceError {
    fn from(error: HashingError) -> Self {
        Self::Unexpected(error.to_string())
    }
}
