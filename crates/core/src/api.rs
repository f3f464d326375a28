//! HTTP client for the meeting service.
//!
//! Endpoints:
//! - `POST /meeting/create` (multipart) -> `{ id, result }`
//! - `GET /meetings` -> `[MeetingRecord]`
//! - `GET /meetings/{id}` -> `MeetingRecord`
//! - `DELETE /meetings/{id}` -> status only
//!
//! No retries and no request timeout.

use async_trait::async_trait;
use reqwest::{
    Client, Response,
    multipart::{Form, Part},
};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::{
    config::ApiConfig,
    error::{MeetingBotError, Result},
    types::{CreateMeetingResponse, MeetingDraft, MeetingRecord},
};

/// Raw outcome of a delete call. The body is never read.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DeleteResponse {
    pub status: u16,
}

impl DeleteResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Server-side filters accepted by `GET /meetings`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ListQuery {
    pub search: Option<String>,
    pub meeting_type: Option<String>,
}

#[async_trait]
pub trait MeetingApi: Send + Sync {
    async fn create_meeting(&self, draft: &MeetingDraft) -> Result<CreateMeetingResponse>;

    async fn list_meetings(&self) -> Result<Vec<MeetingRecord>>;

    async fn delete_meeting(&self, id: i64) -> Result<DeleteResponse>;

    async fn get_meeting(&self, id: i64) -> Result<MeetingRecord>;
}

#[derive(Clone, Debug)]
pub struct HttpMeetingApi {
    client: Client,
    config: ApiConfig,
}

impl HttpMeetingApi {
    pub fn new(config: ApiConfig) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }

    pub fn with_client(config: ApiConfig, client: Client) -> Self {
        Self { client, config }
    }

    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    /// `GET /meetings` with the backend's own `search` / `type` filters applied.
    pub async fn list_meetings_matching(&self, query: &ListQuery) -> Result<Vec<MeetingRecord>> {
        let url = self.config.endpoint("/meetings");
        let mut params: Vec<(&str, &str)> = Vec::new();
        if let Some(search) = query.search.as_deref().filter(|s| !s.is_empty()) {
            params.push(("search", search));
        }
        if let Some(kind) = query.meeting_type.as_deref().filter(|s| !s.is_empty()) {
            params.push(("type", kind));
        }

        debug!(%url, ?params, "listing meetings");
        let response = self.client.get(&url).query(&params).send().await?;
        decode_json(&url, response).await
    }
}

#[async_trait]
impl MeetingApi for HttpMeetingApi {
    async fn create_meeting(&self, draft: &MeetingDraft) -> Result<CreateMeetingResponse> {
        let url = self.config.endpoint("/meeting/create");
        let form = build_form(draft)?;

        debug!(%url, title = %draft.title, has_file = draft.file.is_some(), "creating meeting");
        let response = self.client.post(&url).multipart(form).send().await?;

        // The status is not checked: whatever comes back is decoded as the result.
        decode_json(&url, response).await
    }

    async fn list_meetings(&self) -> Result<Vec<MeetingRecord>> {
        self.list_meetings_matching(&ListQuery::default()).await
    }

    async fn delete_meeting(&self, id: i64) -> Result<DeleteResponse> {
        let url = self.config.endpoint(&format!("/meetings/{}", id));

        debug!(%url, "deleting meeting");
        let response = self.client.delete(&url).send().await?;
        let status = response.status();
        if !status.is_success() {
            warn!(%url, status = status.as_u16(), "delete returned non-success status");
        }

        Ok(DeleteResponse {
            status: status.as_u16(),
        })
    }

    async fn get_meeting(&self, id: i64) -> Result<MeetingRecord> {
        let url = self.config.endpoint(&format!("/meetings/{}", id));

        debug!(%url, "fetching meeting");
        let response = self.client.get(&url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(MeetingBotError::Status {
                endpoint: url,
                status: status.as_u16(),
            });
        }
        decode_json(&url, response).await
    }
}

fn build_form(draft: &MeetingDraft) -> Result<Form> {
    let mut form = Form::new()
        .text("title", draft.title.clone())
        .text("meeting_type", draft.meeting_type.label().to_string());

    if let Some(transcript) = &draft.transcript {
        form = form.text("transcript", transcript.clone());
    }

    if let Some(file) = &draft.file {
        let mut part = Part::bytes(file.bytes.clone()).file_name(file.file_name.clone());
        if let Some(mime) = &file.mime {
            part = part.mime_str(mime)?;
        }
        form = form.part("file", part);
    }

    Ok(form)
}

async fn decode_json<T: DeserializeOwned>(url: &str, response: Response) -> Result<T> {
    let status = response.status().as_u16();
    let body = response.text().await?;

    serde_json::from_str(&body).map_err(|e| MeetingBotError::MalformedResponse {
        endpoint: url.to_string(),
        status,
        reason: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn delete_response_success_range() {
        assert!(DeleteResponse { status: 200 }.is_success());
        assert!(DeleteResponse { status: 204 }.is_success());
        assert!(!DeleteResponse { status: 404 }.is_success());
        assert!(!DeleteResponse { status: 500 }.is_success());
    }

    #[test]
    fn client_targets_normalized_host() {
        let api = HttpMeetingApi::new(ApiConfig::new("api.example.com").unwrap());
        assert_eq!(
            api.config().endpoint("/meetings"),
            "https://api.example.com/meetings"
        );
    }
}
