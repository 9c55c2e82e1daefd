pub mod api;
pub mod client;
pub mod config;
pub mod error;
pub mod listing;
pub mod notify;
pub mod session;
pub mod uploads;

pub use client::PortalClient;
pub use config::ClientConfig;
pub use error::{ApiError, Result};
pub use notify::{NotificationKind, Notifier, TracingNotifier};
pub use session::{FileSessionStore, MemorySessionStore, SessionCredentials, SessionStore};
