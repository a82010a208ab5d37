use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::domain::{
    email::Email,
    notification::Notification,
    password::{Password, PasswordHash},
};

/// Port trait for email sending service
#[async_trait]
pub trait EmailClient: Send + Sync {
    async fn send_email(
        &self,
        recipient: &Email,
        subject: &str,
        content: &str,
    ) -> Result<(), String>;
}

#[derive(Debug, Error)]
pub enum NotificationError {
    #[error("Notification channel closed")]
    ChannelClosed,
    #[error("Failed to render notification: {0}")]
    Render(String),
    #[error("Failed to deliver notification: {0}")]
    Delivery(String),
}

/// Fire-and-forget hand-off of notifications. Implementations must not wait
/// for delivery.
pub trait NotificationDispatcher: Send + Sync {
    fn dispatch(&self, notification: Notification) -> Result<(), NotificationError>;
}

#[derive(Debug, Error)]
pub enum HashingError {
    #[error("Failed to hash password: {0}")]
    Hash(String),
    #[error("Stored password hash is invalid: {0}")]
    InvalidHash(String),
}

#[async_trait]
pub trait PasswordHasher: Send + Sync {
    async fn hash(&self, password: &Password) -> Result<PasswordHash, HashingError>;

    /// `Ok(false)` on mismatch; errors are reserved for unusable hashes.
    async fn verify(&self, password: &Password, hash: &PasswordHash)
    -> Result<bool, HashingError>;
}

pub trait TokenGenerator: Send + Sync {
    fn generate(&self, length: usize) -> String;
}

pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}
