//! Meeting Bot Core Library
//!
//! Client for the meeting summarization service: submit a meeting (transcript
//! or recording), browse and filter past meetings, and hand reports to the
//! result screen.

pub mod api;
pub mod bridge;
pub mod config;
pub mod error;
pub mod format;
pub mod types;
pub mod views;

// Re-export commonly used items at crate root
pub use api::{DeleteResponse, HttpMeetingApi, ListQuery, MeetingApi};
pub use bridge::{LocalStore, NavigationBridge, RESULT_KEY, ResultSlot, Route};
pub use config::{ApiConfig, get_data_dir, normalize_base_url};
pub use error::{MeetingBotError, Result};
pub use format::{format_record_row, format_report_readable};
pub use types::{
    ActionItem, Attachment, CreateMeetingResponse, MeetingDraft, MeetingRecord, MeetingReport,
    MeetingType, decode_ai_output,
};
pub use views::{
    CreateView, DeleteOutcome, DeletePolicy, HistoryView, LoadOutcome, LogNotifier, Notifier,
    SubmitOutcome,
};
