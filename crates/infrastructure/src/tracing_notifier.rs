use tourguard_application::{Notification, NotificationLevel, Notifier};
use tracing::{info, warn};

/// Notifier that writes notifications to the tracing output.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, notification: Notification) {
        match notification.level {
            NotificationLevel::Destructive => warn!(
                title = %notification.title,
                description = %notification.description,
                "notification"
            ),
            NotificationLevel::Info | NotificationLevel::Success => info!(
                level = notification.level.as_str(),
                title = %notification.title,
                description = %notification.description,
                "notification"
            ),
        }
    }
}
