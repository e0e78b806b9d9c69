//! Action layer.
//!
//! Every action takes the caller's user identifier explicitly, runs the
//! query-layer calls it needs, revalidates the views a successful mutation
//! made stale, and reports the outcome as an [`ActionResult`]. Actions never
//! return `Err`; failures travel in the envelope.

mod categories;
mod notes;

pub use categories::{CreateCategoryInput, UpdateCategoryInput};
pub use notes::{CreateNoteInput, UpdateNoteInput};

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use uuid::Uuid;

use noteboard_core::{messages, CategoryRepository, Error, NoteRepository, Result};

use crate::revalidate::{Revalidator, ViewPath};

/// Uniform result envelope returned by every action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionResult<T> {
    pub is_success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T> ActionResult<T> {
    pub fn success(message: impl Into<String>, data: T) -> Self {
        Self {
            is_success: true,
            message: message.into(),
            data: Some(data),
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            is_success: false,
            message: message.into(),
            data: None,
        }
    }

    /// Convert a fallible outcome into the envelope, logging failures.
    fn from_outcome(op: &'static str, outcome: Result<T>, success_message: &str) -> Self {
        match outcome {
            Ok(data) => {
                debug!(subsystem = "actions", op, "Action succeeded");
                Self::success(success_message, data)
            }
            Err(err) => {
                warn!(
                    subsystem = "actions",
                    op,
                    error = %err,
                    "Action failed"
                );
                Self::failure(err.user_message())
            }
        }
    }

    /// Borrow the payload of a successful result.
    pub fn data(&self) -> Option<&T> {
        self.data.as_ref()
    }

    /// Payload on success, message on failure.
    pub fn into_result(self) -> std::result::Result<T, String> {
        match self.data {
            Some(data) if self.is_success => Ok(data),
            _ => Err(self.message),
        }
    }
}

/// Entry points invoked by the UI runtime and the HTTP surface.
#[derive(Clone)]
pub struct Actions {
    categories: Arc<dyn CategoryRepository>,
    notes: Arc<dyn NoteRepository>,
    revalidator: Arc<dyn Revalidator>,
}

impl Actions {
    pub fn new(
        categories: Arc<dyn CategoryRepository>,
        notes: Arc<dyn NoteRepository>,
        revalidator: Arc<dyn Revalidator>,
    ) -> Self {
        Self {
            categories,
            notes,
            revalidator,
        }
    }

    async fn revalidate(&self, paths: &[ViewPath]) {
        for path in paths {
            self.revalidator.revalidate(path).await;
        }
    }
}

/// Reject a blank caller identity before any storage call.
fn require_user(user_id: &str) -> Result<&str> {
    let user_id = user_id.trim();
    if user_id.is_empty() {
        return Err(Error::Unauthorized(messages::USER_ID_REQUIRED.to_string()));
    }
    Ok(user_id)
}

fn require_category_id(category_id: Option<Uuid>) -> Result<Uuid> {
    category_id.ok_or_else(|| Error::InvalidInput(messages::CATEGORY_ID_REQUIRED.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn envelope_serializes_camel_case_and_omits_missing_data() {
        let failed: ActionResult<u64> = ActionResult::failure("Note not found");
        let json = serde_json::to_value(&failed).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"isSuccess": false, "message": "Note not found"})
        );

        let ok = ActionResult::success("Deleted", 2u64);
        let json = serde_json::to_value(&ok).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"isSuccess": true, "message": "Deleted", "data": 2})
        );
    }

    #[test]
    fn envelope_deserializes_without_data() {
        let parsed: ActionResult<u64> =
            serde_json::from_str(r#"{"isSuccess":false,"message":"nope"}"#).unwrap();
        assert!(!parsed.is_success);
        assert!(parsed.data().is_none());
        assert_eq!(parsed.into_result(), Err("nope".to_string()));
    }

    #[test]
    fn envelope_deserializes_payload_without_default() {
        #[derive(Debug, PartialEq, Deserialize)]
        struct Payload {
            id: Uuid,
        }

        let id = Uuid::now_v7();
        let json = format!(r#"{{"isSuccess":true,"message":"ok","data":{{"id":"{id}"}}}}"#);
        let parsed: ActionResult<Payload> = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.into_result(), Ok(Payload { id }));

        let missing: ActionResult<Payload> =
            serde_json::from_str(r#"{"isSuccess":false,"message":"Note not found"}"#).unwrap();
        assert!(missing.data.is_none());
    }

    #[test]
    fn blank_user_is_rejected() {
        let err = require_user("   ").unwrap_err();
        assert_eq!(err.user_message(), messages::USER_ID_REQUIRED);
        assert_eq!(require_user(" u1 ").unwrap(), "u1");
    }

    #[test]
    fn missing_category_id_is_rejected() {
        let err = require_category_id(None).unwrap_err();
        assert_eq!(err.user_message(), messages::CATEGORY_ID_REQUIRED);
    }
}
