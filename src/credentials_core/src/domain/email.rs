use std::cmp::Ordering;
use std::hash::{Hash, Hasher};
use std::sync::LazyLock;

use regex::Regex;
use secrecy::{ExposeSecret, Secret};
use thiserror::Error;

pub const EMAIL_MIN_LENGTH: usize = 4;
pub const EMAIL_MAX_LENGTH: usize = 32;

static EMAIL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern is a valid regex")
});

#[derive(Debug, Error, PartialEq, Eq)]
pub enum EmailError {
    #[error("The email must be at least {EMAIL_MIN_LENGTH} characters.")]
    TooShort,
    #[error("The email may not be greater than {EMAIL_MAX_LENGTH} characters.")]
    TooLong,
    #[error("The email must be a valid email address.")]
    Malformed,
}

/// Login identifier of an account.
#[derive(Debug, Clone)]
pub struct Email(Secret<String>);

impl Email {
    pub fn parse(raw: &str) -> Result<Self, EmailError> {
        let raw = raw.trim();
        let length = raw.chars().count();

        if length < EMAIL_MIN_LENGTH {
            return Err(EmailError::TooShort);
        }
        if length > EMAIL_MAX_LENGTH {
            return Err(EmailError::TooLong);
        }
        if !EMAIL_PATTERN.is_match(raw) {
            return Err(EmailError::Malformed);
        }

        Ok(Self(Secret::new(raw.to_owned())))
    }

    pub fn as_str(&self) -> &str {
        self.0.expose_secret()
    }
}

impl TryFrom<Secret<String>> for Email {
    type Error = EmailError;

    fn try_from(value: Secret<String>) -> Result<Self, Self::Error> {
        Self::parse(value.expose_secret())
    }
}

impl AsRef<Secret<String>> for Email {
    fn as_ref(&self) -> &Secret<String> {
        &self.0
    }
}

impl PartialEq for Email {
    fn eq(&self, other: &Self) -> bool {
        self.as_str() == other.as_str()
    }
}

impl Eq for Email {}

impl Hash for Email {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.as_str().hash(state);
    }
}

impl PartialOrd for Email {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Email {
    fn cmp(&self, other: &Self) -> Ordering {
        self.as_str().cmp(other.as_str())
    }
}
