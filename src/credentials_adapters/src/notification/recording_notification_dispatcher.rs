use std::sync::{Arc, Mutex};

use credentials_core::{Notification, NotificationDispatcher, NotificationError};

/// Keeps dispatched notifications in memory. Can be switched into a failing
/// mode to exercise delivery errors.
#[derive(Debug, Clone, Default)]
pub struct RecordingNotificationDispatcher {
    dispatched: Arc<Mutex<Vec<Notification>>>,
    closed: Arc<Mutex<bool>>,
}

impl RecordingNotificationDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn dispatched(&self) -> Vec<Notification> {
        self.dispatched
            .lock()
            .map(|d| d.clone())
            .unwrap_or_default()
    }

    pub fn close(&self) {
        if let Ok(mut closed) = self.closed.lock() {
            *closed = true;
        }
    }
}

impl NotificationDispatcher for RecordingNotificationDispatcher {
    fn dispatch(&self, notification: Notification) -> Result<(), NotificationError> {
        if self.closed.lock().map(|c| *c).unwrap_or(true) {
            return Err(NotificationError::ChannelClosed);
        }
        self.dispatched
            .lock()
            .map_err(|e| NotificationError::Delivery(e.to_string()))?
            .push(notification);
        Ok(())
    }
}
