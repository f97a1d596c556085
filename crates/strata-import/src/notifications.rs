//! Transient notifications and host view callbacks

use serde::{Deserialize, Serialize};
use std::sync::Mutex;
use std::time::Duration;
use tracing::{error, info, warn};

/// Severity of a notification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationLevel {
    Info,
    Success,
    Warning,
    Error,
}

/// Auto-dismissing message shown to the user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub title: String,
    pub description: String,
    pub level: NotificationLevel,
    /// How long the notification stays visible
    pub duration: Duration,
}

impl Notification {
    pub fn warning(description: impl Into<String>, duration: Duration) -> Self {
        Self {
            title: "Warning".to_string(),
            description: description.into(),
            level: NotificationLevel::Warning,
            duration,
        }
    }

    pub fn error(
        title: impl Into<String>,
        description: impl Into<String>,
        duration: Duration,
    ) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            level: NotificationLevel::Error,
            duration,
        }
    }
}

/// Sink for notifications; must not block
pub trait Notifier: Send + Sync {
    fn notify(&self, notification: Notification);
}

/// Writes notifications to the log
#[derive(Debug, Default)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, notification: Notification) {
        match notification.level {
            NotificationLevel::Info | NotificationLevel::Success => {
                info!(title = %notification.title, "{}", notification.description)
            }
            NotificationLevel::Warning => {
                warn!(title = %notification.title, "{}", notification.description)
            }
            NotificationLevel::Error => {
                error!(title = %notification.title, "{}", notification.description)
            }
        }
    }
}

/// Keeps every notification it receives
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    notifications: Mutex<Vec<Notification>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the notifications received so far
    pub fn notifications(&self) -> Vec<Notification> {
        self.notifications
            .lock()
            .map(|notifications| notifications.clone())
            .unwrap_or_default()
    }

    pub fn count(&self, level: NotificationLevel) -> usize {
        self.notifications()
            .iter()
            .filter(|n| n.level == level)
            .count()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, notification: Notification) {
        if let Ok(mut notifications) = self.notifications.lock() {
            notifications.push(notification);
        }
    }
}

/// View hosting the import surface
pub trait HostView: Send + Sync {
    /// Dismiss the import surface
    fn close(&self);

    /// Reload all data shown by the host so imported records appear
    fn reload(&self);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recording_notifier_counts_by_level() {
        let notifier = RecordingNotifier::new();
        notifier.notify(Notification::warning(
            "Please upload a JSON file",
            Duration::from_secs(2),
        ));
        notifier.notify(Notification::error(
            "CSV Import Error",
            "Error while preparing CSV file",
            Duration::from_secs(4),
        ));

        assert_eq!(notifier.notifications().len(), 2);
        assert_eq!(notifier.count(NotificationLevel::Warning), 1);
        assert_eq!(notifier.count(NotificationLevel::Error), 1);
        assert_eq!(notifier.count(NotificationLevel::Success), 0);
    }
}
