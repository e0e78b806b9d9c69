//! Action client seam.
//!
//! Controllers talk to actions through [`ActionClient`]. The in-process
//! implementation calls [`Actions`] directly; [`HttpActionClient`] goes
//! through the HTTP surface. Either way an action failure comes back as a
//! failed [`ActionResult`]; `Err` is reserved for transport problems.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde_json::json;
use thiserror::Error;
use tracing::debug;
use uuid::Uuid;

use noteboard_api::actions::{CreateNoteInput, UpdateNoteInput};
use noteboard_api::{ActionResult, Actions};
use noteboard_core::{Category, Note};

/// Default timeout for HTTP action calls.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Server returned {status}: {message}")]
    Status { status: u16, message: String },

    #[error("{0}")]
    Action(String),

    #[error("No signed-in user")]
    MissingIdentity,

    #[error("Configuration error: {0}")]
    Config(String),
}

pub type ClientResult<T> = std::result::Result<T, ClientError>;

/// Payload of a successful envelope, or [`ClientError::Action`] with its message.
pub fn action_data<T>(result: ActionResult<T>) -> ClientResult<T> {
    result.into_result().map_err(ClientError::Action)
}

/// The actions the controllers need.
#[async_trait]
pub trait ActionClient: Send + Sync {
    async fn get_categories(&self, user_id: &str) -> ClientResult<ActionResult<Vec<Category>>>;

    async fn get_notes_by_category_id(
        &self,
        category_id: Uuid,
        user_id: &str,
    ) -> ClientResult<ActionResult<Vec<Note>>>;

    async fn get_note_by_id(&self, id: Uuid, user_id: &str) -> ClientResult<ActionResult<Note>>;

    async fn create_note(
        &self,
        user_id: &str,
        input: CreateNoteInput,
    ) -> ClientResult<ActionResult<Note>>;

    async fn create_quick_note(
        &self,
        category_id: Option<Uuid>,
        user_id: &str,
        title: Option<String>,
    ) -> ClientResult<ActionResult<Note>>;

    async fn update_note(
        &self,
        id: Uuid,
        user_id: &str,
        input: UpdateNoteInput,
    ) -> ClientResult<ActionResult<Note>>;
}

#[async_trait]
impl ActionClient for Actions {
    async fn get_categories(&self, user_id: &str) -> ClientResult<ActionResult<Vec<Category>>> {
        Ok(Actions::get_categories(self, user_id).await)
    }

    async fn get_notes_by_category_id(
        &self,
        category_id: Uuid,
        user_id: &str,
    ) -> ClientResult<ActionResult<Vec<Note>>> {
        Ok(Actions::get_notes_by_category_id(self, category_id, user_id).await)
    }

    async fn get_note_by_id(&self, id: Uuid, user_id: &str) -> ClientResult<ActionResult<Note>> {
        Ok(Actions::get_note_by_id(self, id, user_id).await)
    }

    async fn create_note(
        &self,
        user_id: &str,
        input: CreateNoteInput,
    ) -> ClientResult<ActionResult<Note>> {
        Ok(Actions::create_note(self, user_id, input).await)
    }

    async fn create_quick_note(
        &self,
        category_id: Option<Uuid>,
        user_id: &str,
        title: Option<String>,
    ) -> ClientResult<ActionResult<Note>> {
        Ok(Actions::create_quick_note(self, category_id, user_id, title).await)
    }

    async fn update_note(
        &self,
        id: Uuid,
        user_id: &str,
        input: UpdateNoteInput,
    ) -> ClientResult<ActionResult<Note>> {
        Ok(Actions::update_note(self, id, user_id, input).await)
    }
}

// =============================================================================
// HTTP
// =============================================================================

/// Action client for a remote noteboard-api server.
#[derive(Debug, Clone)]
pub struct HttpActionClient {
    http: Client,
    base_url: String,
    identity_header: String,
}

impl HttpActionClient {
    pub fn new(base_url: impl Into<String>, identity_header: impl Into<String>) -> ClientResult<Self> {
        Self::with_timeout(
            base_url,
            identity_header,
            Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        )
    }

    pub fn with_timeout(
        base_url: impl Into<String>,
        identity_header: impl Into<String>,
        timeout: Duration,
    ) -> ClientResult<Self> {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        if base_url.is_empty() {
            return Err(ClientError::Config("base URL is empty".into()));
        }
        let identity_header = identity_header.into().trim().to_ascii_lowercase();
        if identity_header.is_empty() {
            return Err(ClientError::Config("identity header is empty".into()));
        }
        let http = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            base_url,
            identity_header,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn call<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        user_id: &str,
    ) -> ClientResult<ActionResult<T>> {
        let response = request
            .header(self.identity_header.as_str(), user_id)
            .send()
            .await?;
        decode(response).await
    }
}

async fn decode<T: DeserializeOwned>(response: Response) -> ClientResult<ActionResult<T>> {
    let status = response.status();
    if !status.is_success() {
        let message = response
            .json::<serde_json::Value>()
            .await
            .ok()
            .and_then(|body| body.get("error").and_then(|e| e.as_str()).map(String::from))
            .unwrap_or_else(|| status.to_string());
        debug!(
            subsystem = "client",
            component = "http",
            status = status.as_u16(),
            message = %message,
            "Action call rejected"
        );
        return Err(ClientError::Status {
            status: status.as_u16(),
            message,
        });
    }
    Ok(response.json().await?)
}

#[async_trait]
impl ActionClient for HttpActionClient {
    async fn get_categories(&self, user_id: &str) -> ClientResult<ActionResult<Vec<Category>>> {
        self.call(self.http.get(self.url("/api/categories")), user_id)
            .await
    }

    async fn get_notes_by_category_id(
        &self,
        category_id: Uuid,
        user_id: &str,
    ) -> ClientResult<ActionResult<Vec<Note>>> {
        let url = self.url(&format!("/api/categories/{category_id}/notes"));
        self.call(self.http.get(url), user_id).await
    }

    async fn get_note_by_id(&self, id: Uuid, user_id: &str) -> ClientResult<ActionResult<Note>> {
        let url = self.url(&format!("/api/notes/{id}"));
        self.call(self.http.get(url), user_id).await
    }

    async fn create_note(
        &self,
        user_id: &str,
        input: CreateNoteInput,
    ) -> ClientResult<ActionResult<Note>> {
        let request = self.http.post(self.url("/api/notes")).json(&input);
        self.call(request, user_id).await
    }

    async fn create_quick_note(
        &self,
        category_id: Option<Uuid>,
        user_id: &str,
        title: Option<String>,
    ) -> ClientResult<ActionResult<Note>> {
        let request = self
            .http
            .post(self.url("/api/notes/quick"))
            .json(&json!({ "category_id": category_id, "title": title }));
        self.call(request, user_id).await
    }

    async fn update_note(
        &self,
        id: Uuid,
        user_id: &str,
        input: UpdateNoteInput,
    ) -> ClientResult<ActionResult<Note>> {
        let request = self
            .http
            .patch(self.url(&format!("/api/notes/{id}")))
            .json(&input);
        self.call(request, user_id).await
    }
}
