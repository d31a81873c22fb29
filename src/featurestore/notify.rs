// featurestore/notify.rs
//
// Transient user notifications. The dashboard never escalates backend
// failures; they are turned into one of these and swallowed.

use tracing::{error, info};

/// Seam for the notification system: short-lived success / info / error
/// messages with a title.
pub trait Notifier: Send + Sync {
    fn success(&self, title: &str, message: &str);
    fn info(&self, title: &str, message: &str);
    fn error(&self, title: &str, message: &str);
}

/// Notifier that writes to the log instead of a UI.
#[derive(Default)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn success(&self, title: &str, message: &str) {
        info!(%title, "{message}");
    }

    fn info(&self, title: &str, message: &str) {
        info!(%title, "{message}");
    }

    fn error(&self, title: &str, message: &str) {
        error!(%title, "{message}");
    }
}
