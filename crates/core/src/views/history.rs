//! Meeting history screen state.
//!
//! Holds the last fetched list plus the two filters, and mediates delete and
//! view actions. Methods take `&self` so a front end may fire actions while an
//! earlier one is still awaiting the network.

use std::{
    collections::HashSet,
    sync::{
        Arc, Mutex,
        atomic::{AtomicU64, Ordering},
    },
};

use tracing::{debug, error, warn};

use crate::{
    api::MeetingApi,
    bridge::{NavigationBridge, Route},
    error::{MeetingBotError, Result},
    types::{MeetingRecord, decode_ai_output},
    views::Notifier,
};

pub const DELETE_FAILED_NOTICE: &str = "Failed to delete meeting";
pub const VIEW_FAILED_NOTICE: &str = "Could not load meeting details.";

/// How `delete` treats a response that arrived but carries an error status.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DeletePolicy {
    /// Drop the row once the request completes, whatever the status.
    #[default]
    Optimistic,
    /// Drop the row only on a 2xx status.
    ConfirmStatus,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LoadOutcome {
    Loaded(usize),
    Failed,
    /// A newer `load` started while this one was in flight; its result was dropped.
    Stale,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DeleteOutcome {
    Removed { status: u16, was_present: bool },
    /// Only under [`DeletePolicy::ConfirmStatus`].
    Rejected { status: u16 },
    /// A delete for this id is still in flight.
    AlreadyPending,
}

/// Title search (case-insensitive substring) AND exact type match.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RecordFilter {
    search_lower: String,
    filter_type: String,
}

impl RecordFilter {
    pub fn new(search_term: &str, filter_type: &str) -> Self {
        Self {
            search_lower: search_term.to_lowercase(),
            filter_type: filter_type.to_string(),
        }
    }

    pub fn matches(&self, record: &MeetingRecord) -> bool {
        let matches_search = record.title.to_lowercase().contains(&self.search_lower);
        let matches_type =
            self.filter_type.is_empty() || record.meeting_type.label() == self.filter_type;
        matches_search && matches_type
    }
}

/// Lazily filter `records`, preserving order. Clone the iterator to restart it.
pub fn filter_records<'a>(
    records: &'a [MeetingRecord],
    search_term: &str,
    filter_type: &str,
) -> impl Iterator<Item = &'a MeetingRecord> + Clone + use<'a> {
    let filter = RecordFilter::new(search_term, filter_type);
    records.iter().filter(move |r| filter.matches(r))
}

struct HistoryState {
    records: Vec<MeetingRecord>,
    loading: bool,
    search_term: String,
    filter_type: String,
    pending_deletes: HashSet<i64>,
}

pub struct HistoryView {
    api: Arc<dyn MeetingApi>,
    bridge: Arc<NavigationBridge>,
    notifier: Arc<dyn Notifier>,
    delete_policy: DeletePolicy,
    state: Mutex<HistoryState>,
    generation: AtomicU64,
}

impl HistoryView {
    pub fn new(
        api: Arc<dyn MeetingApi>,
        bridge: Arc<NavigationBridge>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            api,
            bridge,
            notifier,
            delete_policy: DeletePolicy::default(),
            state: Mutex::new(HistoryState {
                records: Vec::new(),
                loading: true,
                search_term: String::new(),
                filter_type: String::new(),
                pending_deletes: HashSet::new(),
            }),
            generation: AtomicU64::new(0),
        }
    }

    pub fn with_delete_policy(mut self, policy: DeletePolicy) -> Self {
        self.delete_policy = policy;
        self
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HistoryState> {
        self.state.lock().expect("HistoryView state poisoned")
    }

    /// Fetch the full list. Failures are logged and leave an empty-state screen
    /// rather than an error screen; `loading` is cleared either way.
    pub async fn load(&self) -> LoadOutcome {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        self.lock().loading = true;

        let result = self.api.list_meetings().await;

        let mut state = self.lock();
        if self.generation.load(Ordering::SeqCst) != generation {
            debug!(generation, "discarding stale meeting list");
            return LoadOutcome::Stale;
        }
        state.loading = false;

        match result {
            Ok(records) => {
                let count = records.len();
                state.records = records;
                debug!(count, "meeting list loaded");
                LoadOutcome::Loaded(count)
            }
            Err(e) => {
                error!(error = %e, "Failed to load meetings");
                LoadOutcome::Failed
            }
        }
    }

    pub fn is_loading(&self) -> bool {
        self.lock().loading
    }

    pub fn records(&self) -> Vec<MeetingRecord> {
        self.lock().records.clone()
    }

    /// No meetings at all, as opposed to none matching the filters.
    pub fn is_empty_history(&self) -> bool {
        self.lock().records.is_empty()
    }

    pub fn find(&self, id: i64) -> Option<MeetingRecord> {
        self.lock().records.iter().find(|r| r.id == id).cloned()
    }

    pub fn search_term(&self) -> String {
        self.lock().search_term.clone()
    }

    pub fn set_search_term(&self, term: impl Into<String>) {
        self.lock().search_term = term.into();
    }

    pub fn filter_type(&self) -> String {
        self.lock().filter_type.clone()
    }

    /// Empty string means "all types".
    pub fn set_filter_type(&self, kind: impl Into<String>) {
        self.lock().filter_type = kind.into();
    }

    /// Records passing both filters, recomputed from current state on each call.
    pub fn visible_records(&self) -> Vec<MeetingRecord> {
        let state = self.lock();
        filter_records(&state.records, &state.search_term, &state.filter_type)
            .cloned()
            .collect()
    }

    /// Delete on the server, then drop the row locally.
    ///
    /// Transport failures leave the list untouched, notify the user and return the
    /// error. Under [`DeletePolicy::Optimistic`] an error status still removes the row.
    pub async fn delete(&self, id: i64) -> Result<DeleteOutcome> {
        if !self.lock().pending_deletes.insert(id) {
            debug!(id, "delete already in flight");
            return Ok(DeleteOutcome::AlreadyPending);
        }
        let _pending = PendingDelete { view: self, id };

        let response = match self.api.delete_meeting(id).await {
            Ok(response) => response,
            Err(e) => {
                error!(id, error = %e, "Failed to delete");
                self.notifier.notice(DELETE_FAILED_NOTICE);
                return Err(e);
            }
        };

        if self.delete_policy == DeletePolicy::ConfirmStatus && !response.is_success() {
            warn!(id, status = response.status, "delete rejected by server");
            self.notifier.notice(DELETE_FAILED_NOTICE);
            return Ok(DeleteOutcome::Rejected {
                status: response.status,
            });
        }

        let mut state = self.lock();
        let was_present = match state.records.iter().position(|r| r.id == id) {
            Some(pos) => {
                state.records.remove(pos);
                true
            }
            None => false,
        };

        Ok(DeleteOutcome::Removed {
            status: response.status,
            was_present,
        })
    }

    /// Decode the record's stored report, hand it to the result screen and ask
    /// for navigation. Text that is not JSON notifies the user and writes nothing.
    pub async fn view(&self, record: &MeetingRecord) -> Result<Route> {
        let payload = decode_ai_output(&record.ai_output).map_err(|source| {
            error!(id = record.id, error = %source, "Error parsing meeting data");
            self.notifier.notice(VIEW_FAILED_NOTICE);
            MeetingBotError::MalformedStoredPayload {
                id: record.id,
                source,
            }
        })?;

        if let Err(e) = self.bridge.publish(payload).await {
            error!(id = record.id, error = %e, "Failed to store meeting result");
            self.notifier.notice(VIEW_FAILED_NOTICE);
            return Err(e);
        }

        Ok(Route::Result)
    }
}

/// Clears the in-flight marker for `id` on every exit path.
struct PendingDelete<'a> {
    view: &'a HistoryView,
    id: i64,
}

impl Drop for PendingDelete<'_> {
    fn drop(&mut self) {
        if let Ok(mut state) = self.view.state.lock() {
            state.pending_deletes.remove(&self.id);
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::types::MeetingType;

    fn record(id: i64, title: &str, kind: &str) -> MeetingRecord {
        MeetingRecord {
            id,
            title: title.to_string(),
            meeting_type: MeetingType::from(kind),
            ai_output: json!("{}"),
            transcript: None,
            file_path: None,
            created_at: None,
        }
    }

    fn sample() -> Vec<MeetingRecord> {
        vec![
            record(1, "Weekly Sync", "Team Meeting"),
            record(2, "Candidate: Jane", "Interview"),
            record(3, "ACME kickoff", "Client Call"),
            record(4, "Daily sync", "Standup"),
            record(5, "Retro", "Retrospective"),
        ]
    }

    fn ids<'a>(it: impl Iterator<Item = &'a MeetingRecord>) -> Vec<i64> {
        it.map(|r| r.id).collect()
    }

    #[test]
    fn empty_search_keeps_everything_in_order() {
        let records = sample();
        assert_eq!(ids(filter_records(&records, "", "")), vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn search_is_case_insensitive_substring() {
        let records = sample();
        assert_eq!(ids(filter_records(&records, "SYNC", "")), vec![1, 4]);
        assert_eq!(ids(filter_records(&records, "acme", "")), vec![3]);
        assert!(filter_records(&records, "nothing", "").next().is_none());
    }

    #[test]
    fn type_filter_is_exact_and_case_sensitive() {
        let records = sample();
        assert_eq!(ids(filter_records(&records, "", "Standup")), vec![4]);
        assert!(filter_records(&records, "", "standup").next().is_none());
        assert_eq!(ids(filter_records(&records, "", "Retrospective")), vec![5]);
    }

    #[test]
    fn search_and_type_are_intersected() {
        let records = sample();
        assert_eq!(ids(filter_records(&records, "sync", "Standup")), vec![4]);
        assert!(filter_records(&records, "acme", "Standup").next().is_none());
    }

    #[test]
    fn filtered_iterator_restarts_when_cloned() {
        let records = sample();
        let visible = filter_records(&records, "sync", "");
        let first: Vec<_> = visible.clone().collect();
        let second: Vec<_> = visible.collect();
        assert_eq!(first, second);
    }
}
