use crate::domain::{
    account::AccountId, activation::ActivationCode, email::Email, password::Password,
};

/// Out-of-band messages emitted by account use cases.
#[derive(Debug, Clone)]
pub enum Notification {
    NewAccount {
        recipient: Email,
        temporary_password: Password,
        /// Present when the account still has to be activated.
        activation: Option<(AccountId, ActivationCode)>,
    },
    PasswordReset {
        recipient: Email,
        temporary_password: Password,
    },
    ActivationRequested {
        recipient: Email,
        account_id: AccountId,
        code: ActivationCode,
    },
}

impl Notification {
    pub fn recipient(&self) -> &Email {
        match self {
            Notification::NewAccount { recipient, .. }
            | Notification::PasswordReset { recipient, .. }
            | Notification::ActivationRequested { recipient, .. } => recipient,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Notification::NewAccount { .. } => "new_account",
            Notification::PasswordReset { .. } => "password_reset",
            Notification::ActivationRequested { .. } => "activation",
        }
    }
}
