use secrecy::{ExposeSecret, Secret};
use thiserror::Error;

pub const PASSWORD_MIN_LENGTH: usize = 6;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PasswordError {
    #[error("The password must be at least {PASSWORD_MIN_LENGTH} characters.")]
    TooShort,
}

/// A plaintext credential. Only ever held long enough to hash it or hand it
/// to the notification channel.
#[derive(Debug, Clone)]
pub struct Password(Secret<String>);

impl Password {
    pub fn parse(raw: Secret<String>) -> Result<Self, PasswordError> {
        if raw.expose_secret().chars().count() < PASSWORD_MIN_LENGTH {
            return Err(PasswordError::TooShort);
        }
        Ok(Self(raw))
    }
}

impl TryFrom<Secret<String>> for Password {
    type Error = PasswordError;

    fn try_from(value: Secret<String>) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl AsRef<Secret<String>> for Password {
    fn as_ref(&self) -> &Secret<String> {
        &self.0
    }
}

/// Encoded hash of a [`Password`], as produced by a `PasswordHasher`.
#[derive(Debug, Clone)]
pub struct PasswordHash(Secret<String>);

impl PasswordHash {
    pub fn new(encoded: Secret<String>) -> Self {
        Self(encoded)
    }
}

impl AsRef<Secret<String>> for PasswordHash {
    fn as_ref(&self) -> &Secret<String> {
        &self.0
    }
}
