use std::fmt;

use secrecy::Secret;
use serde::{Deserialize, Serialize};

use crate::domain::{
    email::Email,
    password::Password,
    person_name::{PersonName, PersonNameError},
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldViolation {
    pub field: &'static str,
    pub message: String,
}

/// Every field-level violation found while validating one input.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ValidationErrors {
    violations: Vec<FieldViolation>,
}

impl ValidationErrors {
    pub fn push(&mut self, field: &'static str, message: impl Into<String>) {
        self.violations.push(FieldViolation {
            field,
            message: message.into(),
        });
    }

    pub fn violations(&self) -> &[FieldViolation] {
        &self.violations
    }

    pub fn is_empty(&self) -> bool {
        self.violations.is_empty()
    }

    pub fn has_violation(&self, field: &str) -> bool {
        self.violations.iter().any(|v| v.field == field)
    }

    pub fn merge(&mut self, other: ValidationErrors) {
        self.violations.extend(other.violations);
    }

    pub fn single(field: &'static str, message: impl Into<String>) -> Self {
        let mut errors = Self::default();
        errors.push(field, message);
        errors
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("validation failed")?;
        for (i, violation) in self.violations.iter().enumerate() {
            let separator = if i == 0 { ": " } else { "; " };
            write!(f, "{separator}{} {}", violation.field, violation.message)?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

/// Raw administrative input for an account's profile.
#[derive(Debug, Clone, Deserialize)]
pub struct AccountForm {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
}

/// Validated profile fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountDetails {
    pub first_name: PersonName,
    pub last_name: PersonName,
    pub email: Email,
}

impl AccountForm {
    pub fn validate(&self) -> Result<AccountDetails, ValidationErrors> {
        let mut errors = ValidationErrors::default();

        let first_name = PersonName::parse(&self.first_name)
            .map_err(|e| errors.push("first_name", name_message("first name", &e)))
            .ok();
        let last_name = PersonName::parse(&self.last_name)
            .map_err(|e| errors.push("last_name", name_message("last name", &e)))
            .ok();
        let email = Email::parse(&self.email)
            .map_err(|e| errors.push("email", e.to_string()))
            .ok();

        match (first_name, last_name, email) {
            (Some(first_name), Some(last_name), Some(email)) if errors.is_empty() => {
                Ok(AccountDetails {
                    first_name,
                    last_name,
                    email,
                })
            }
            _ => Err(errors),
        }
    }
}

/// Validates a generated credential against the password rules.
pub fn validate_password(raw: Secret<String>) -> Result<Password, ValidationErrors> {
    Password::parse(raw).map_err(|e| ValidationErrors::single("password", e.to_string()))
}

fn name_message(label: &str, error: &PersonNameError) -> String {
    format!("The {label} {error}")
}
