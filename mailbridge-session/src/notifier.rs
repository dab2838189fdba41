//! Seams for the UI layer: blocking dialogs and navigation.

use tracing::{error, info};

/// User-facing notices raised by the orchestrator.
///
/// The UI layer renders these however it wants (dialogs, toasts); the
/// default [`LogNotifier`] just writes them to the log.
pub trait Notifier: Send + Sync {
    /// Open a blocking progress indicator.
    fn progress(&self, title: &str, text: &str);

    /// Close the progress indicator, if one is open.
    fn close_progress(&self);

    fn success(&self, title: &str, text: &str);

    fn error(&self, title: &str, text: &str);
}

/// Full navigations requested by the orchestrator after login and logout.
pub trait Navigator: Send + Sync {
    fn navigate(&self, path: &str);
}

/// Default [`Notifier`] writing through `tracing`.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn progress(&self, title: &str, text: &str) {
        info!(title, text, "progress");
    }

    fn close_progress(&self) {}

    fn success(&self, title: &str, text: &str) {
        info!(title, text, "notice");
    }

    fn error(&self, title: &str, text: &str) {
        error!(title, text, "notice");
    }
}

/// Default [`Navigator`] that only records the requested target.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNavigator;

impl Navigator for LogNavigator {
    fn navigate(&self, path: &str) {
        info!(path, "navigate");
    }
}
