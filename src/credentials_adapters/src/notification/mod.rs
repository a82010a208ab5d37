pub mod queued_notification_dispatcher;
pub mod recording_notification_dispatcher;

pub use queued_notification_dispatcher::QueuedNotificationDispatcher;
pub use recording_notification_dispatcher::RecordingNotificationDispatcher;
