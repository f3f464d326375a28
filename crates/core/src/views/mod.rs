pub mod create;
pub mod history;

pub use create::{CreateView, SubmitOutcome};
pub use history::{
    DeleteOutcome, DeletePolicy, HistoryView, LoadOutcome, RecordFilter, filter_records,
};

/// Blocking, user-visible notice (an alert in a browser, a styled line in a terminal).
pub trait Notifier: Send + Sync {
    fn notice(&self, message: &str);
}

/// Notifier for headless use: notices only reach the log.
#[derive(Clone, Copy, Debug, Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notice(&self, message: &str) {
        tracing::warn!(notice = message);
    }
}
