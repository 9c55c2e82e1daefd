use tracing::{error, info};

/// Severity of a user-facing notification.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum NotificationKind {
    Error,
    Success,
    Info,
}

/// Capability for surfacing transient user-facing messages.
///
/// The client fires exactly one notification per terminal failure; how it is
/// rendered (toast, status bar, log line) belongs to the embedding
/// application.
pub trait Notifier: Send + Sync {
    fn notify(&self, kind: NotificationKind, message: &str);
}

/// Default notifier that routes messages through `tracing`.
#[derive(Debug, Default)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, kind: NotificationKind, message: &str) {
        match kind {
            NotificationKind::Error => error!(%message, "notification"),
            NotificationKind::Success | NotificationKind::Info => info!(%message, "notification"),
        }
    }
}
