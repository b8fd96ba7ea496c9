//! Router and shared state for the proxy server.
//!
//! - `GET /health`: liveness check
//! - `POST /api/ai` (also `/api/aiHandler`): run an AI action
//! - `GET /api/bible?book=&chap=`: fetch one chapter

mod ai;
mod bible;

use std::sync::Arc;

use abide_core::{AiService, ScriptureProvider, TextGenerator};
use axum::{
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use tower_http::trace::TraceLayer;

pub use ai::ai_handler;
pub use bible::{bible_handler, BibleQuery};

/// Application state shared across handlers
pub struct AppState<G, P> {
    pub ai: Arc<AiService<G>>,
    pub scripture: Arc<P>,
}

impl<G, P> AppState<G, P> {
    pub fn new(ai: AiService<G>, scripture: P) -> Self {
        Self {
            ai: Arc::new(ai),
            scripture: Arc::new(scripture),
        }
    }
}

impl<G, P> Clone for AppState<G, P> {
    fn clone(&self) -> Self {
        Self {
            ai: Arc::clone(&self.ai),
            scripture: Arc::clone(&self.scripture),
        }
    }
}

/// Error body shared by every endpoint
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
}

impl ErrorBody {
    pub fn new(error: impl ToString) -> Json<Self> {
        Json(Self {
            error: error.to_string(),
        })
    }
}

/// Health check response
#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// Builds the application router.
pub fn router<G, P>(state: AppState<G, P>) -> Router
where
    G: TextGenerator + 'static,
    P: ScriptureProvider + 'static,
{
    Router::new()
        .route("/health", get(health))
        .route("/api/ai", post(ai_handler::<G, P>))
        .route("/api/aiHandler", post(ai_handler::<G, P>))
        .route("/api/bible", get(bible_handler::<G, P>))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

#[cfg(test)]
pub(crate) mod testing {
    use std::collections::HashMap;

    use abide_core::ai::{AiError, ResponseFormat};
    use abide_core::scripture::resolve;
    use abide_core::{ScriptureError, ScriptureProvider, TextGenerator, Verse};
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use axum::Router;
    use serde_json::Value;
    use tower::ServiceExt;

    /// Returns a fixed reply, or fails when `reply` is `None`.
    #[derive(Clone)]
    pub struct FakeGenerator {
        pub reply: Option<String>,
    }

    impl TextGenerator for FakeGenerator {
        async fn generate(&self, _prompt: &str, _format: ResponseFormat) -> Result<String, AiError> {
            self.reply.clone().ok_or(AiError::Api {
                status: 503,
                message: "model overloaded".to_string(),
            })
        }
    }

    /// Serves chapters from memory; `fail_upstream` simulates FHL being down.
    #[derive(Default)]
    pub struct FakeScripture {
        pub chapters: HashMap<(String, u32), Vec<Verse>>,
        pub fail_upstream: bool,
    }

    impl ScriptureProvider for FakeScripture {
        async fn fetch_chapter(&self, book: &str, chapter: u32) -> Result<Vec<Verse>, ScriptureError> {
            let found = resolve(book, chapter)?;
            if self.fail_upstream {
                return Err(ScriptureError::Upstream(500));
            }
            self.chapters
                .get(&(found.name.to_string(), chapter))
                .cloned()
                .ok_or(ScriptureError::NotFound {
                    book: found.name,
                    chapter,
                })
        }
    }

    pub async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }
}
