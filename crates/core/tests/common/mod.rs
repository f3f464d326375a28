#![allow(dead_code)]

use std::sync::{
    Arc, Mutex,
    atomic::{AtomicUsize, Ordering},
};

use async_trait::async_trait;
use meeting_bot_core::{
    CreateMeetingResponse, DeleteResponse, MeetingApi, MeetingBotError, MeetingDraft,
    MeetingRecord, MeetingType, Notifier, Result,
};
use serde_json::{Value, json};
use tokio::sync::Semaphore;

pub fn record(id: i64, title: &str, kind: &str, ai_output: Value) -> MeetingRecord {
    MeetingRecord {
        id,
        title: title.to_string(),
        meeting_type: MeetingType::from(kind),
        ai_output,
        transcript: None,
        file_path: None,
        created_at: None,
    }
}

pub fn sample_records() -> Vec<MeetingRecord> {
    vec![
        record(1, "Weekly Sync", "Team Meeting", json!("{\"summary\":\"w\"}")),
        record(2, "Jane interview", "Interview", json!("{\"summary\":\"i\"}")),
        record(5, "ACME kickoff", "Client Call", json!("{\"summary\":\"ok\"}")),
        record(9, "Daily sync", "Standup", json!("not json")),
    ]
}

pub fn connection_refused() -> MeetingBotError {
    MeetingBotError::IoError(std::io::Error::new(
        std::io::ErrorKind::ConnectionRefused,
        "connection refused",
    ))
}

pub enum Reply<T> {
    Ok(T),
    Fail,
}

/// In-process stand-in for the meeting service.
///
/// Calls block on `gate` until the test releases permits, so concurrent actions
/// can be observed mid-flight.
pub struct FakeApi {
    pub list: Mutex<Vec<Reply<Vec<MeetingRecord>>>>,
    pub create: Mutex<Vec<Reply<Value>>>,
    pub delete_status: Mutex<Option<u16>>,
    pub gate: Option<Arc<Semaphore>>,
    pub created: Mutex<Vec<MeetingDraft>>,
    pub list_calls: AtomicUsize,
    pub delete_calls: AtomicUsize,
}

impl FakeApi {
    pub fn new() -> Self {
        Self {
            list: Mutex::new(Vec::new()),
            create: Mutex::new(Vec::new()),
            delete_status: Mutex::new(Some(200)),
            gate: None,
            created: Mutex::new(Vec::new()),
            list_calls: AtomicUsize::new(0),
            delete_calls: AtomicUsize::new(0),
        }
    }

    pub fn gated(mut self, gate: Arc<Semaphore>) -> Self {
        self.gate = Some(gate);
        self
    }

    pub fn push_list(self, reply: Reply<Vec<MeetingRecord>>) -> Self {
        self.list.lock().unwrap().push(reply);
        self
    }

    pub fn push_create(self, reply: Reply<Value>) -> Self {
        self.create.lock().unwrap().push(reply);
        self
    }

    /// `None` makes delete fail at the transport level.
    pub fn delete_status(self, status: Option<u16>) -> Self {
        *self.delete_status.lock().unwrap() = status;
        self
    }

    async fn wait_gate(&self) {
        if let Some(gate) = &self.gate {
            gate.acquire().await.unwrap().forget();
        }
    }
}

#[async_trait]
impl MeetingApi for FakeApi {
    async fn create_meeting(&self, draft: &MeetingDraft) -> Result<CreateMeetingResponse> {
        self.created.lock().unwrap().push(draft.clone());
        self.wait_gate().await;
        let reply = self.create.lock().unwrap().remove(0);
        match reply {
            Reply::Ok(body) => serde_json::from_value(body).map_err(|e| {
                MeetingBotError::MalformedResponse {
                    endpoint: "/meeting/create".into(),
                    status: 200,
                    reason: e.to_string(),
                }
            }),
            Reply::Fail => Err(connection_refused()),
        }
    }

    async fn list_meetings(&self) -> Result<Vec<MeetingRecord>> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        let reply = self.list.lock().unwrap().remove(0);
        self.wait_gate().await;
        match reply {
            Reply::Ok(records) => Ok(records),
            Reply::Fail => Err(connection_refused()),
        }
    }

    async fn delete_meeting(&self, _id: i64) -> Result<DeleteResponse> {
        self.delete_calls.fetch_add(1, Ordering::SeqCst);
        self.wait_gate().await;
        let status = *self.delete_status.lock().unwrap();
        match status {
            Some(status) => Ok(DeleteResponse { status }),
            None => Err(connection_refused()),
        }
    }

    async fn get_meeting(&self, id: i64) -> Result<MeetingRecord> {
        sample_records()
            .into_iter()
            .find(|r| r.id == id)
            .ok_or(MeetingBotError::Status {
                endpoint: format!("/meetings/{}", id),
                status: 404,
            })
    }
}

#[derive(Default)]
pub struct RecordingNotifier {
    pub notices: Mutex<Vec<String>>,
}

impl RecordingNotifier {
    pub fn notices(&self) -> Vec<String> {
        self.notices.lock().unwrap().clone()
    }
}

impl Notifier for RecordingNotifier {
    fn notice(&self, message: &str) {
        self.notices.lock().unwrap().push(message.to_string());
    }
}
