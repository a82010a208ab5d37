use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use credentials_core::{EmailClient, Notification, NotificationDispatcher, NotificationError};

use crate::email::NotificationRenderer;

/// Enqueues notifications for a background task that renders and emails
/// them. Dispatch never waits for delivery; delivery failures are logged.
///
/// The worker stops once every clone of the dispatcher has been dropped and
/// the queue is drained.
#[derive(Debug, Clone)]
pub struct QueuedNotificationDispatcher {
    sender: mpsc::UnboundedSender<Notification>,
}

impl QueuedNotificationDispatcher {
    pub fn spawn<E>(email_client: E, renderer: NotificationRenderer) -> (Self, JoinHandle<()>)
    where
        E: EmailClient + 'static,
    {
        let (sender, receiver) = mpsc::unbounded_channel();
        let worker = tokio::spawn(deliver(receiver, email_client, renderer));
        (Self { sender }, worker)
    }
}

impl NotificationDispatcher for QueuedNotificationDispatcher {
    fn dispatch(&self, notification: Notification) -> Result<(), NotificationError> {
        tracing::debug!(kind = notification.kind(), "Queueing notification");
        self.sender
            .send(notification)
            .map_err(|_| NotificationError::ChannelClosed)
    }
}

async fn deliver<E>(
    mut receiver: mpsc::UnboundedReceiver<Notification>,
    email_client: E,
    renderer: NotificationRenderer,
) where
    E: EmailClient,
{
    while let Some(notification) = receiver.recv().await {
        let email = match renderer.render(&notification) {
            Ok(email) => email,
            Err(e) => {
                tracing::error!(kind = notification.kind(), error = %e, "Dropping notification");
                continue;
            }
        };

        if let Err(e) = email_client
            .send_email(notification.recipient(), &email.subject, &email.body)
            .await
        {
            tracing::warn!(
                kind = notification.kind(),
                error = %NotificationError::Delivery(e),
                "Notification was not delivered"
            );
        }
    }
    tracing::debug!("Notification queue closed");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::email::MockEmailClient;
    use credentials_core::{Email, Password};
    use secrecy::Secret;

    struct FailingEmailClient;

    #[async_trait::async_trait]
    impl EmailClient for FailingEmailClient {
        async fn send_email(&self, _: &Email, _: &str, _: &str) -> Result<(), String> {
            Err("smtp is down".to_string())
        }
    }

    fn reset_for(email: &str) -> Notification {
        Notification::PasswordReset {
            recipient: Email::parse(email).unwrap(),
            temporary_password: Password::parse(Secret::new("Secret123".to_string())).unwrap(),
        }
    }

    #[tokio::test]
    async fn delivers_queued_notifications_in_order() {
        let client = MockEmailClient::new();
        let (dispatcher, worker) =
            QueuedNotificationDispatcher::spawn(client.clone(), NotificationRenderer::new("Acme", "https://acme.test"));

        dispatcher.dispatch(reset_for("a@example.com")).unwrap();
        dispatcher.dispatch(reset_for("b@example.com")).unwrap();
        drop(dispatcher);
        worker.await.unwrap();

        let sent = client.sent();
        assert_eq!(sent.len(), 2);
        assert_eq!(sent[0].recipient, "a@example.com");
        assert_eq!(sent[1].recipient, "b@example.com");
        assert_eq!(sent[0].subject, "Acme - New Password Information");
    }

    #[tokio::test]
    async fn delivery_failures_do_not_stop_the_worker() {
        let (dispatcher, worker) =
            QueuedNotificationDispatcher::spawn(FailingEmailClient, NotificationRenderer::new("Acme", "https://acme.test"));

        assert!(dispatcher.dispatch(reset_for("a@example.com")).is_ok());
        assert!(dispatcher.dispatch(reset_for("b@example.com")).is_ok());
        drop(dispatcher);

        worker.await.unwrap();
    }
}
