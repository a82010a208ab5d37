use askama::Template;
use secrecy::ExposeSecret;

use credentials_core::{AccountId, ActivationCode, Notification, NotificationError};

#[derive(Template)]
#[template(
    ext = "html",
    source = r#"<p>An administrator of <a href="{{ url }}">{{ platform }}</a> has created an account for you.</p>
<p>Your login is {{ email }} and your temporary password is <b>{{ password }}</b>.</p>
{% if let Some(link) = link %}<p>To activate your account, <a href="{{ link }}">click here</a>.</p>
{% else %}<p>No account activation is required.</p>
{% endif %}<p>Please change your password after you log in.</p>"#
)]
struct NewAccountEmail<'a> {
    platform: &'a str,
    url: &'a str,
    email: &'a str,
    password: &'a str,
    link: Option<String>,
}

#[derive(Template)]
#[template(
    ext = "html",
    source = r#"<p>The password of your account on <a href="{{ url }}">{{ platform }}</a> has been reset.</p>
<p>Your new temporary password is <b>{{ password }}</b>.</p>
<p>Please change your password after you log in.</p>"#
)]
struct PasswordResetEmail<'a> {
    platform: &'a str,
    url: &'a str,
    password: &'a str,
}

#[derive(Template)]
#[template(
    ext = "html",
    source = r#"<p>Thank you for creating an account on <a href="{{ url }}">{{ platform }}</a>.</p>
<p>To activate your account, <a href="{{ link }}">click here</a>.</p>"#
)]
struct ActivationEmail<'a> {
    platform: &'a str,
    url: &'a str,
    link: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedEmail {
    pub subject: String,
    pub body: String,
}

/// Turns notifications into email subjects and bodies for one platform.
#[derive(Debug, Clone)]
pub struct NotificationRenderer {
    platform_name: String,
    home_url: String,
}

impl NotificationRenderer {
    pub fn new(platform_name: impl Into<String>, home_url: impl Into<String>) -> Self {
        Self {
            platform_name: platform_name.into(),
            home_url: home_url.into(),
        }
    }

    pub fn activation_link(&self, account_id: AccountId, code: &ActivationCode) -> String {
        format!(
            "{}/account/activate/{}/{}",
            self.home_url.trim_end_matches('/'),
            account_id,
            code.as_str()
        )
    }

    pub fn render(&self, notification: &Notification) -> Result<RenderedEmail, NotificationError> {
        let platform = self.platform_name.as_str();
        let url = self.home_url.as_str();

        let (subject, body) = match notification {
            Notification::NewAccount {
                recipient,
                temporary_password,
                activation,
            } => (
                "New Account Information",
                NewAccountEmail {
                    platform,
                    url,
                    email: recipient.as_str(),
                    password: temporary_password.as_ref().expose_secret(),
                    link: activation
                        .as_ref()
                        .map(|(id, code)| self.activation_link(*id, code)),
                }
                .render(),
            ),
            Notification::PasswordReset {
                temporary_password,
                ..
            } => (
                "New Password Information",
                PasswordResetEmail {
                    platform,
                    url,
                    password: temporary_password.as_ref().expose_secret(),
                }
                .render(),
            ),
            Notification::ActivationRequested {
                account_id, code, ..
            } => (
                "Activation",
                ActivationEmail {
                    platform,
                    url,
                    link: self.activation_link(*account_id, code),
                }
                .render(),
            ),
        };

        Ok(RenderedEmail {
            subject: format!("{platform} - {subject}"),
            body: body.map_err(|e| NotificationError::Render(e.to_string()))?,
        })
    }
}
