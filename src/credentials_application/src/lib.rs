pub mod access_evaluator;
pub mod account_service;
pub mod activation_manager;
pub mod admin_action;
pub mod error;
pub mod throttle_guard;
pub mod use_cases;

#[cfg(test)]
pub(crate) mod test_support;

pub use access_evaluator::AccessEvaluator;
pub use account_service::{AccountOverview, AccountService, AccountServiceOptions};
pub use activation_manager::{ActivationManager, ActivationManagerError};
pub use admin_action::AdminAction;
pub use error::AccountServiceError;
pub use throttle_guard::{ThrottleGuard, ThrottleGuardError};
pub use use_cases::{
    AuthenticateUseCase, CreateAccountUseCase, DeleteAccountUseCase, ResendActivationUseCase,
    ResetPasswordUseCase, SuspendAccountUseCase, TemporaryPasswords, UpdateAccountUseCase,
};
