use std::{fmt, path::Path};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tokio::fs;

use crate::error::{MeetingBotError, Result};

/// Meeting category. Stored data may carry labels the form never offered, so
/// unknown values survive as `Other`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum MeetingType {
    #[default]
    TeamMeeting,
    Interview,
    ClientCall,
    Standup,
    Other(String),
}

impl MeetingType {
    /// The values offered by the create form, in form order.
    pub const ALL: [MeetingType; 4] = [
        MeetingType::TeamMeeting,
        MeetingType::Interview,
        MeetingType::ClientCall,
        MeetingType::Standup,
    ];

    pub fn label(&self) -> &str {
        match self {
            MeetingType::TeamMeeting => "Team Meeting",
            MeetingType::Interview => "Interview",
            MeetingType::ClientCall => "Client Call",
            MeetingType::Standup => "Standup",
            MeetingType::Other(label) => label,
        }
    }
}

impl From<String> for MeetingType {
    fn from(label: String) -> Self {
        match label.as_str() {
            "Team Meeting" => MeetingType::TeamMeeting,
            "Interview" => MeetingType::Interview,
            "Client Call" => MeetingType::ClientCall,
            "Standup" => MeetingType::Standup,
            _ => MeetingType::Other(label),
        }
    }
}

impl From<&str> for MeetingType {
    fn from(label: &str) -> Self {
        MeetingType::from(label.to_string())
    }
}

impl From<MeetingType> for String {
    fn from(kind: MeetingType) -> Self {
        match kind {
            MeetingType::Other(label) => label,
            known => known.label().to_string(),
        }
    }
}

impl fmt::Display for MeetingType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A meeting as persisted by the backend.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MeetingRecord {
    pub id: i64,
    pub title: String,
    pub meeting_type: MeetingType,
    /// JSON-encoded report text; decode with [`decode_ai_output`].
    #[serde(default)]
    pub ai_output: Value,
    #[serde(default)]
    pub transcript: Option<String>,
    #[serde(default)]
    pub file_path: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
}

/// Decode a record's `ai_output` into the report handed to the result screen.
/// Text is parsed as JSON; any other value already is the report. Only text
/// that is not JSON fails; the shape of the report is not checked.
pub fn decode_ai_output(ai_output: &Value) -> serde_json::Result<Value> {
    match ai_output {
        Value::String(text) => serde_json::from_str(text),
        other => Ok(other.clone()),
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ActionItem {
    Task {
        task: String,
        #[serde(default)]
        owner: Option<String>,
        #[serde(default)]
        due_date: Option<String>,
    },
    /// Plain text or any other shape the model produced.
    Other(Value),
}

/// Typed reading of a report for display. The model decides the shape, so
/// list entries stay as raw JSON and unknown fields land in `extra`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct MeetingReport {
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub key_points: Vec<Value>,
    #[serde(default)]
    pub decisions: Vec<Value>,
    #[serde(default)]
    pub action_items: Vec<ActionItem>,
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub agenda: Value,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl MeetingReport {
    /// `None` when the payload is not an object or its known fields have an
    /// unexpected shape; callers then show the raw JSON.
    pub fn from_payload(payload: &Value) -> Option<Self> {
        if !payload.is_object() {
            return None;
        }
        serde_json::from_value(payload.clone()).ok()
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct CreateMeetingResponse {
    #[serde(default)]
    pub id: Option<i64>,
    /// Whatever the backend returned as the report, passed on untouched.
    pub result: Value,
}

/// An uploaded audio or video recording.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Attachment {
    pub file_name: String,
    pub mime: Option<String>,
    pub bytes: Vec<u8>,
}

impl Attachment {
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            mime: None,
            bytes,
        }
    }

    pub async fn from_path(path: &Path) -> Result<Self> {
        let bytes = fs::read(path).await?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "upload".to_string());
        let mime = guess_mime(path).map(str::to_string);

        Ok(Self {
            file_name,
            mime,
            bytes,
        })
    }
}

fn guess_mime(path: &Path) -> Option<&'static str> {
    let ext = path.extension()?.to_string_lossy().to_lowercase();
    let mime = match ext.as_str() {
        "mp3" => "audio/mpeg",
        "wav" => "audio/wav",
        "m4a" => "audio/mp4",
        "ogg" => "audio/ogg",
        "flac" => "audio/flac",
        "webm" => "video/webm",
        "mp4" => "video/mp4",
        "mov" => "video/quicktime",
        "mkv" => "video/x-matroska",
        "txt" => "text/plain",
        _ => return None,
    };
    Some(mime)
}

/// Submission-only form contents.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MeetingDraft {
    pub title: String,
    pub meeting_type: MeetingType,
    pub transcript: Option<String>,
    pub file: Option<Attachment>,
}

impl MeetingDraft {
    pub fn new(title: impl Into<String>, meeting_type: MeetingType) -> Self {
        Self {
            title: title.into(),
            meeting_type,
            transcript: None,
            file: None,
        }
    }

    pub fn with_transcript(mut self, transcript: impl Into<String>) -> Self {
        self.transcript = Some(transcript.into());
        self
    }

    pub fn with_file(mut self, file: Attachment) -> Self {
        self.file = Some(file);
        self
    }

    /// Title is the only required field.
    pub fn validate(&self) -> Result<()> {
        if self.title.trim().is_empty() {
            return Err(MeetingBotError::InvalidDraft {
                reason: "title is required".to_string(),
            });
        }
        Ok(())
    }

    pub fn has_content(&self) -> bool {
        self.transcript
            .as_deref()
            .is_some_and(|t| !t.trim().is_empty())
            || self.file.is_some()
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn meeting_type_round_trips_labels() {
        let kind: MeetingType = serde_json::from_value(json!("Client Call")).unwrap();
        assert_eq!(kind, MeetingType::ClientCall);
        assert_eq!(serde_json::to_value(&kind).unwrap(), json!("Client Call"));
    }

    #[test]
    fn unknown_meeting_type_is_tolerated() {
        let record: MeetingRecord = serde_json::from_value(json!({
            "id": 3,
            "title": "Offsite",
            "meeting_type": "Retro",
            "ai_output": "{}"
        }))
        .unwrap();
        assert_eq!(record.meeting_type, MeetingType::Other("Retro".into()));
        assert_eq!(record.meeting_type.label(), "Retro");
    }

    #[test]
    fn decodes_text_ai_output() {
        let payload = decode_ai_output(&json!("{\"summary\":\"ok\"}")).unwrap();
        assert_eq!(payload, json!({"summary": "ok"}));
    }

    #[test]
    fn decoding_keeps_any_json_shape() {
        let object = json!({"decisions": [{"decision": "ship", "owner": "Sam"}]});
        assert_eq!(decode_ai_output(&object).unwrap(), object);
        assert_eq!(
            decode_ai_output(&json!("\"plain text\"")).unwrap(),
            json!("plain text")
        );
        assert_eq!(decode_ai_output(&json!("null")).unwrap(), Value::Null);
        assert_eq!(decode_ai_output(&Value::Null).unwrap(), Value::Null);
    }

    #[test]
    fn rejects_non_json_text() {
        assert!(decode_ai_output(&json!("not json")).is_err());
    }

    #[test]
    fn report_tolerates_loose_list_entries() {
        let report = MeetingReport::from_payload(&json!({
            "summary": "s",
            "decisions": [{"decision": "ship"}],
            "action_items": [
                {"task": "ship", "owner": null, "due_date": "Friday"},
                "call Bob"
            ],
            "sentiment": "positive"
        }))
        .unwrap();
        assert_eq!(report.decisions, vec![json!({"decision": "ship"})]);
        assert_eq!(
            report.action_items[0],
            ActionItem::Task {
                task: "ship".into(),
                owner: None,
                due_date: Some("Friday".into()),
            }
        );
        assert_eq!(report.action_items[1], ActionItem::Other(json!("call Bob")));
        assert_eq!(report.extra.get("sentiment"), Some(&json!("positive")));
    }

    #[test]
    fn report_needs_an_object_with_known_shapes() {
        assert!(MeetingReport::from_payload(&json!("plain text")).is_none());
        assert!(MeetingReport::from_payload(&Value::Null).is_none());
        assert!(MeetingReport::from_payload(&json!({"summary": {"short": "x"}})).is_none());
    }

    #[test]
    fn create_response_requires_result() {
        let response: CreateMeetingResponse =
            serde_json::from_value(json!({"id": 4, "result": {"decisions": [{"d": 1}]}})).unwrap();
        assert_eq!(response.result, json!({"decisions": [{"d": 1}]}));
        assert!(serde_json::from_value::<CreateMeetingResponse>(json!({"id": 4})).is_err());
    }

    #[test]
    fn draft_requires_title() {
        let draft = MeetingDraft::new("   ", MeetingType::Standup);
        assert!(matches!(
            draft.validate(),
            Err(MeetingBotError::InvalidDraft { .. })
        ));
        assert!(!draft.has_content());
        assert!(
            MeetingDraft::new("Sync", MeetingType::Standup)
                .with_transcript("hello")
                .has_content()
        );
    }
}
