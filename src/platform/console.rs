use crate::app_lib::Notifier;
use tracing::warn;

/// Prints alerts to stderr for the operator binary.
#[derive(Clone, Copy, Debug, Default)]
pub struct StderrNotifier;

impl Notifier for StderrNotifier {
    fn alert(&self, message: &str) {
        warn!("{message}");
        eprintln!("{message}");
    }
}
