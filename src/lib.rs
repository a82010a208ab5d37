//! # Credentials - Account Lifecycle Library
//!
//! Facade crate that re-exports the public APIs of the credentials
//! components: account creation and update, activation, throttled login,
//! suspension, soft deletion and group-based permission checks.
//!
//! ## Structure
//!
//! - **Core domain types**: `Account`, `Email`, `Group`, `ThrottleRecord`, etc.
//! - **Ports**: `AccountStore`, `GroupRegistry`, `ThrottleStore`, `PasswordHasher`, ...
//! - **Application**: `AccountService` and the use cases behind it
//! - **Adapters**: in-memory stores, Argon2 hashing, Postmark email, settings
//! - **Bootstrap**: wiring of an in-memory service from `CredentialsSettings`

pub mod bootstrap;

// ============================================================================
// Core Domain Types
// ============================================================================

/// Core domain types and value objects
pub mod core {
    pub use credentials_core::*;
}

pub use credentials_core::{
    AccessKey, Account, AccountDetails, AccountForm, AccountId, AccountPage, ActivationCode,
    ActivationState, Email, Group, GroupId, ListOrder, MembershipDiff, Notification, PageRequest,
    Password, Permission, PermissionQuery, SortDirection, SortField, ThrottlePolicy,
    ThrottleState, ValidationErrors,
};

// ============================================================================
// Repository and Service Traits (Ports)
// ============================================================================

pub use credentials_core::{
    AccountStore, AccountStoreError, Clock, EmailClient, GroupRegistry, GroupRegistryError,
    NotificationDispatcher, PasswordHasher, ThrottleStore, ThrottleStoreError, TokenGenerator,
};

// ============================================================================
// Application Layer
// ============================================================================

/// Components and use cases
pub mod application {
    pub use credentials_application::*;
}

pub use credentials_application::{
    AccessEvaluator, AccountOverview, AccountService, AccountServiceError, AccountServiceOptions,
    ActivationManager, AdminAction, ThrottleGuard,
};

// ============================================================================
// Adapters (Infrastructure)
// ============================================================================

/// Infrastructure adapters
pub mod adapters {
    pub use credentials_adapters::{
        clock, config, email, hashing, notification, persistence, telemetry, tokens,
    };
}

pub use credentials_adapters::{
    clock::{ManualClock, SystemClock},
    config::CredentialsSettings,
    email::{MockEmailClient, NotificationRenderer, PostmarkEmailClient},
    hashing::Argon2PasswordHasher,
    notification::{QueuedNotificationDispatcher, RecordingNotificationDispatcher},
    persistence::{DashMapThrottleStore, HashMapAccountStore, HashMapGroupRegistry},
    tokens::RandomTokenGenerator,
};

pub use bootstrap::{
    InMemoryAccountService, bootstrap_admin, in_memory_service, register_groups, service_options,
};

// ============================================================================
// Re-export common external dependencies
// ============================================================================

/// Re-export async-trait for implementing port traits
pub use async_trait::async_trait;

/// Re-export secrecy for working with secrets
pub use secrecy::{ExposeSecret, Secret};
