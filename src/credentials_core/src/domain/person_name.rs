use std::fmt;

use thiserror::Error;

pub const NAME_MIN_LENGTH: usize = 2;
pub const NAME_MAX_LENGTH: usize = 32;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PersonNameError {
    #[error("must be at least {NAME_MIN_LENGTH} characters.")]
    TooShort,
    #[error("may not be greater than {NAME_MAX_LENGTH} characters.")]
    TooLong,
}

/// First or last name of an account holder.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PersonName(String);

impl PersonName {
    pub fn parse(raw: &str) -> Result<Self, PersonNameError> {
        let raw = raw.trim();
        let length = raw.chars().count();

        if length < NAME_MIN_LENGTH {
            return Err(PersonNameError::TooShort);
        }
        if length > NAME_MAX_LENGTH {
            return Err(PersonNameError::TooLong);
        }

        Ok(Self(raw.to_owned()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for PersonName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PersonName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
