use std::time::Duration;

use config::{Config, ConfigError, Environment, File, FileFormat};
use secrecy::Secret;
use serde::Deserialize;

use credentials_core::{ListOrder, ThrottlePolicy};

use super::constants::{CONFIG_FILE, defaults, env};

/// Service settings, layered from defaults, an optional `credentials.json`
/// and `CREDENTIALS__*` environment variables (e.g.
/// `CREDENTIALS__THROTTLE__ATTEMPT_LIMIT=3`).
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CredentialsSettings {
    pub platform: PlatformSettings,
    pub throttle: ThrottlePolicy,
    pub activation: ActivationSettings,
    pub password: PasswordSettings,
    pub listing: ListingSettings,
    pub email_client: EmailClientSettings,
    pub groups: Vec<GroupSettings>,
    pub bootstrap: Option<BootstrapSettings>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PlatformSettings {
    pub name: String,
    pub home_url: String,
}

impl Default for PlatformSettings {
    fn default() -> Self {
        Self {
            name: defaults::PLATFORM_NAME.to_string(),
            home_url: defaults::HOME_URL.to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ActivationSettings {
    /// New accounts start pending and receive an activation code.
    pub required: bool,
    pub code_length: usize,
}

impl Default for ActivationSettings {
    fn default() -> Self {
        Self {
            required: true,
            code_length: defaults::ACTIVATION_CODE_LENGTH,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PasswordSettings {
    pub temporary_length: usize,
}

impl Default for PasswordSettings {
    fn default() -> Self {
        Self {
            temporary_length: defaults::TEMPORARY_PASSWORD_LENGTH,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ListingSettings {
    pub page_size: usize,
    pub order: ListOrder,
}

impl Default for ListingSettings {
    fn default() -> Self {
        Self {
            page_size: defaults::PAGE_SIZE,
            order: ListOrder::default(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct EmailClientSettings {
    pub base_url: String,
    pub sender: String,
    /// Without a token, mail is only recorded in memory.
    pub auth_token: Option<Secret<String>>,
    pub timeout_in_millis: u64,
}

impl EmailClientSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_in_millis)
    }
}

impl Default for EmailClientSettings {
    fn default() -> Self {
        Self {
            base_url: defaults::email_client::BASE_URL.to_string(),
            sender: defaults::email_client::SENDER.to_string(),
            auth_token: None,
            timeout_in_millis: defaults::email_client::TIMEOUT_IN_MILLIS,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct GroupSettings {
    pub name: String,
    #[serde(default)]
    pub permissions: Vec<String>,
}

/// Administrator account created by the bootstrap binary.
#[derive(Debug, Clone, Deserialize)]
pub struct BootstrapSettings {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    #[serde(default)]
    pub groups: Vec<String>,
}

impl CredentialsSettings {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        Config::builder()
            .add_source(File::with_name(CONFIG_FILE).required(false))
            .add_source(
                Environment::with_prefix(env::ENV_PREFIX)
                    .prefix_separator(env::ENV_SEPARATOR)
                    .separator(env::ENV_SEPARATOR)
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()
    }

    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Config::builder()
            .add_source(File::from_str(json, FileFormat::Json))
            .build()?
            .try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use credentials_core::{SortDirection, SortField};
    use secrecy::ExposeSecret;

    #[test]
    fn empty_source_yields_defaults() {
        let settings = CredentialsSettings::from_json("{}").unwrap();

        assert_eq!(settings.throttle, ThrottlePolicy::default());
        assert_eq!(settings.listing.page_size, 20);
        assert!(settings.activation.required);
        assert_eq!(settings.password.temporary_length, 16);
        assert!(settings.email_client.auth_token.is_none());
        assert!(settings.bootstrap.is_none());
    }

    #[test]
    fn nested_sections_override_defaults() {
        let settings = CredentialsSettings::from_json(
            r#"{
                "platform": { "name": "Acme" },
                "throttle": { "attempt_limit": 3 },
                "listing": { "order": { "field": "last_name", "direction": "desc" } },
                "email_client": { "auth_token": "postmark-token" },
                "groups": [{ "name": "Admins", "permissions": ["admin", "mod"] }],
                "bootstrap": { "first_name": "Root", "last_name": "Admin", "email": "root@acme.test", "groups": ["Admins"] }
            }"#,
        )
        .unwrap();

        assert_eq!(settings.platform.name, "Acme");
        assert_eq!(settings.platform.home_url, defaults::HOME_URL);
        assert_eq!(settings.throttle.attempt_limit, 3);
        assert_eq!(settings.throttle.suspension_minutes, 15);
        assert_eq!(settings.listing.order.field, SortField::LastName);
        assert_eq!(settings.listing.order.direction, SortDirection::Desc);
        assert_eq!(
            settings
                .email_client
                .auth_token
                .as_ref()
                .map(|t| t.expose_secret().as_str()),
            Some("postmark-token")
        );
        assert_eq!(settings.groups[0].permissions, ["admin", "mod"]);
        assert_eq!(settings.bootstrap.unwrap().groups, ["Admins"]);
    }
}
