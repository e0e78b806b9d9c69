//! # noteboard-api
//!
//! Action layer and HTTP surface for noteboard.
//!
//! - [`actions`]: the uniform-envelope entry points used by the UI runtime
//! - [`revalidate`]: view cache and revalidation after mutations
//! - [`config`]: environment-driven server configuration
//! - [`logging`]: tracing subscriber setup for the binary
//! - [`router`]: axum routes exposing actions and cached views

pub mod actions;
pub mod config;
pub mod handlers;
pub mod logging;
pub mod revalidate;

use std::sync::Arc;
use std::time::Duration;

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header, request::Parts, HeaderName, HeaderValue, Method, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    request_id::{MakeRequestId, PropagateRequestIdLayer, RequestId, SetRequestIdLayer},
    trace::TraceLayer,
};
use uuid::Uuid;

use noteboard_core::messages;

pub use actions::{ActionResult, Actions};
pub use config::ServerConfig;
pub use revalidate::{RecordingRevalidator, Revalidator, ViewCache, ViewPath};

// =============================================================================
// REQUEST ID (UUIDv7)
// =============================================================================

/// Generates time-ordered UUIDv7 request correlation IDs.
#[derive(Clone, Default)]
pub struct MakeRequestUuidV7;

impl MakeRequestId for MakeRequestUuidV7 {
    fn make_request_id<B>(&mut self, _request: &axum::http::Request<B>) -> Option<RequestId> {
        let id = Uuid::now_v7().to_string().parse().ok()?;
        Some(RequestId::new(id))
    }
}

// =============================================================================
// STATE
// =============================================================================

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub actions: Actions,
    /// Views computed by the `/views` routes; also the actions' revalidator.
    pub views: ViewCache,
    /// Header carrying the caller's identity.
    pub identity_header: HeaderName,
}

impl AppState {
    /// Wire actions to the view cache so mutations invalidate cached views.
    pub fn new(
        categories: Arc<dyn noteboard_core::CategoryRepository>,
        notes: Arc<dyn noteboard_core::NoteRepository>,
        config: &ServerConfig,
    ) -> noteboard_core::Result<Self> {
        let views = ViewCache::new(config.view_cache_capacity);
        let identity_header = HeaderName::try_from(config.identity_header.as_str())
            .map_err(|e| noteboard_core::Error::Config(format!("IDENTITY_HEADER: {e}")))?;
        let actions = Actions::new(categories, notes, Arc::new(views.clone()));
        Ok(Self {
            actions,
            views,
            identity_header,
        })
    }
}

// =============================================================================
// ERROR HANDLING
// =============================================================================

/// Transport-level failures. Action failures are reported in the envelope.
#[derive(Debug)]
pub enum ApiError {
    Unauthorized(String),
    BadRequest(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let (status, message) = match self {
            ApiError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
        };

        let body = Json(serde_json::json!({
            "error": message,
        }));

        (status, body).into_response()
    }
}

/// Parse a path segment as a UUID.
pub(crate) fn parse_id(raw: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(raw).map_err(|_| ApiError::BadRequest(format!("Invalid id: {raw}")))
}

// =============================================================================
// IDENTITY
// =============================================================================

/// Caller identity, read from the configured header.
///
/// The external identity provider's gateway sets the header; a request
/// without it is rejected with 401 before any handler runs.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub String);

#[async_trait]
impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user_id = parts
            .headers
            .get(&state.identity_header)
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
            .filter(|v| !v.is_empty());

        match user_id {
            Some(user_id) => Ok(CurrentUser(user_id.to_string())),
            None => Err(ApiError::Unauthorized(
                messages::USER_ID_REQUIRED.to_string(),
            )),
        }
    }
}

// =============================================================================
// ROUTER
// =============================================================================

async fn health_check() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// Parse configured CORS origins, skipping invalid ones.
pub fn parse_allowed_origins(origins: &[String]) -> Vec<HeaderValue> {
    origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(v) => Some(v),
            Err(e) => {
                tracing::warn!("Invalid CORS origin '{}': {}", origin, e);
                None
            }
        })
        .collect()
}

/// Build the full application router.
pub fn router(state: AppState, allowed_origins: &[String]) -> Router {
    use handlers::{categories, notes, views};

    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::list(parse_allowed_origins(allowed_origins)))
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([
            header::CONTENT_TYPE,
            header::ACCEPT,
            state.identity_header.clone(),
        ])
        .max_age(Duration::from_secs(3600));

    Router::new()
        .route("/health", get(health_check))
        // Categories
        .route(
            "/api/categories",
            get(categories::list_categories).post(categories::create_category),
        )
        .route(
            "/api/categories/:id",
            get(categories::get_category)
                .patch(categories::update_category)
                .delete(categories::delete_category),
        )
        .route(
            "/api/categories/:id/notes",
            get(notes::list_notes_by_category),
        )
        // Notes
        .route("/api/notes", get(notes::list_notes).post(notes::create_note))
        .route("/api/notes/quick", post(notes::create_quick_note))
        .route("/api/notes/bulk-delete", post(notes::delete_notes))
        .route(
            "/api/notes/:id",
            get(notes::get_note)
                .patch(notes::update_note)
                .delete(notes::delete_note),
        )
        .route("/api/notes/:id/move", post(notes::move_note))
        // Cached views
        .route("/views/board", get(views::board_view))
        .route("/views/categories/:id", get(views::category_view))
        .route("/views/notes/:id", get(views::note_view))
        // Middleware
        .layer(TraceLayer::new_for_http())
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuidV7))
        .layer(cors)
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_origins_are_skipped() {
        let origins = vec![
            "https://a.example".to_string(),
            "bad\norigin".to_string(),
        ];
        let parsed = parse_allowed_origins(&origins);
        assert_eq!(parsed, vec![HeaderValue::from_static("https://a.example")]);
    }

    #[test]
    fn parse_id_rejects_garbage() {
        assert!(parse_id("not-a-uuid").is_err());
        let id = Uuid::now_v7();
        assert_eq!(parse_id(&id.to_string()).unwrap(), id);
    }

    #[test]
    fn request_ids_are_uuid_v7() {
        let mut make = MakeRequestUuidV7;
        let request = axum::http::Request::new(());
        let id = make.make_request_id(&request).unwrap();
        let parsed = Uuid::parse_str(id.header_value().to_str().unwrap()).unwrap();
        assert_eq!(parsed.get_version_num(), 7);
    }
}
