pub mod domain;
pub mod ports;

// Re-export commonly used types for convenience
pub use domain::{
    access::{AccessCache, AccessKey, PermissionQuery},
    account::{Account, AccountId, ActivationState, NewAccount},
    activation::{ActivationCode, ActivationError},
    email::{Email, EmailError},
    group::{Group, GroupId, MembershipDiff, Permission},
    listing::{AccountPage, ListOrder, PageRequest, SortDirection, SortField},
    notification::Notification,
    password::{Password, PasswordError, PasswordHash},
    person_name::{PersonName, PersonNameError},
    throttle::{ThrottleError, ThrottlePolicy, ThrottleRecord, ThrottleState, minutes_until},
    validation::{
        AccountDetails, AccountForm, FieldViolation, ValidationErrors, validate_password,
    },
};

pub use ports::{
    repositories::{
        AccountStore, AccountStoreError, GroupRegistry, GroupRegistryError, ThrottleStore,
        ThrottleStoreError,
    },
    services::{
        Clock, EmailClient, HashingError, NotificationDispatcher, NotificationError,
        PasswordHasher, TokenGenerator,
    },
};
