//! # Notification Port
//!
//! Fire-and-forget user notifications.
//!
//! The catalog layer never talks to a UI directly; it hands completed
//! [`Notification`]s to an injected sink. Delivery (toast, status bar,
//! nothing at all) is the host's concern, and no return value is consulted.

use tracing::warn;

// =============================================================================
// Notification
// =============================================================================

/// Severity of a user-facing notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Informational message.
    Default,
    /// Something went wrong and the user should know.
    Destructive,
}

/// A user-facing notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    /// Short headline, e.g. "Sync failed".
    pub title: String,

    /// One-line description of what happened.
    pub description: String,

    /// Display severity.
    pub severity: Severity,
}

impl Notification {
    /// The single notification emitted when a background sync fails.
    pub fn sync_failed() -> Self {
        Notification {
            title: "Sync failed".to_string(),
            description: "Could not refresh catalog data from the server.".to_string(),
            severity: Severity::Destructive,
        }
    }
}

// =============================================================================
// Sink Port
// =============================================================================

/// Trait for delivering notifications (implemented by the host UI).
pub trait NotificationSink: Send + Sync {
    /// Delivers a notification. Fire-and-forget.
    fn notify(&self, notification: Notification);
}

/// No-op sink for tests and headless operation.
pub struct NoOpSink;

impl NotificationSink for NoOpSink {
    fn notify(&self, _notification: Notification) {}
}

/// Sink that forwards notifications to the log (used by the demo binary).
pub struct LogSink;

impl NotificationSink for LogSink {
    fn notify(&self, notification: Notification) {
        warn!(
            title = %notification.title,
            description = %notification.description,
            severity = ?notification.severity,
            "notification"
        );
    }
}
