pub mod constants;
pub mod settings;

pub use constants::*;
pub use settings::{
    ActivationSettings, BootstrapSettings, CredentialsSettings, EmailClientSettings,
    GroupSettings, ListingSettings, PasswordSettings, PlatformSettings,
};
