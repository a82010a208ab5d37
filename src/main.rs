use std::sync::Arc;

use color_eyre::eyre::Result;
use credentials::{
    CredentialsSettings, Email, HashMapGroupRegistry, MockEmailClient, NotificationRenderer,
    PostmarkEmailClient, QueuedNotificationDispatcher, Secret, SystemClock, adapters::telemetry::init_tracing,
    bootstrap_admin, in_memory_service, register_groups,
};
use reqwest::Client as HttpClient;

/// Loads settings, registers the configured groups and creates the bootstrap
/// administrator, then waits for queued mail to be delivered.
#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    init_tracing()?;

    // Load configuration
    let settings = CredentialsSettings::load()?;

    let renderer = NotificationRenderer::new(
        settings.platform.name.clone(),
        settings.platform.home_url.clone(),
    );

    // Create email client and notification worker
    let (notifier, worker) = match &settings.email_client.auth_token {
        Some(token) => {
            let http_client = HttpClient::builder()
                .timeout(settings.email_client.timeout())
                .build()?;

            let email_client = PostmarkEmailClient::new(
                settings.email_client.base_url.clone(),
                Email::try_from(Secret::new(settings.email_client.sender.clone()))?,
                token.clone(),
                http_client,
            );
            QueuedNotificationDispatcher::spawn(email_client, renderer)
        }
        None => {
            tracing::warn!("No email auth token configured, mail is kept in memory");
            QueuedNotificationDispatcher::spawn(MockEmailClient::new(), renderer)
        }
    };

    let groups = HashMapGroupRegistry::new();
    let registered = register_groups(&groups, &settings.groups).await;

    let service = in_memory_service(&settings, groups, notifier, Arc::new(SystemClock));

    if let Some(admin) = &settings.bootstrap {
        bootstrap_admin(&service, admin, &registered).await?;
    }

    let page = service.list_accounts(0).await?;
    tracing::info!(
        groups = registered.len(),
        accounts = page.total,
        "Credentials bootstrap complete"
    );

    // Dropping the service closes the queue so the worker can drain it
    drop(service);
    worker.await?;

    Ok(())
}
