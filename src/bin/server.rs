//! Abide proxy server
//!
//! Forwards AI actions to Gemini and Bible lookups to FHL.
//!
//! # Configuration
//!
//! Environment variables:
//! - `ABIDE_PORT`: Port to listen on (default: 8080)
//! - `GEMINI_API_KEY`: Gemini API key; AI actions answer with the
//!   unavailable message when unset
//! - `GEMINI_MODEL`: Gemini model (default: gemini-2.5-flash)
//! - `ABIDE_BIBLE_VERSION`: FHL version code (default: nstrunv)
//! - `ABIDE_BIBLE_URL`: FHL endpoint (default: https://bible.fhl.net/qb.php)
//!
//! # Endpoints
//!
//! - `GET /health`: Health check
//! - `POST /api/ai`, `POST /api/aiHandler`: Run an AI action
//! - `GET /api/bible?book=&chap=`: Fetch one chapter

use abide::server::{router, AppState};
use abide_core::ai::DEFAULT_MODEL;
use abide_core::scripture::{DEFAULT_FHL_URL, DEFAULT_VERSION};
use abide_core::{AiService, FhlClient, GeminiClient};
use std::net::SocketAddr;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Server configuration
#[derive(Debug, Clone)]
struct Config {
    /// Port to listen on
    port: u16,
    api_key: Option<String>,
    model: String,
    bible_version: String,
    bible_url: String,
}

impl Config {
    /// Load configuration from environment variables
    fn from_env() -> Self {
        let port = std::env::var("ABIDE_PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(8080);

        let api_key = std::env::var("GEMINI_API_KEY")
            .ok()
            .filter(|key| !key.trim().is_empty());

        Self {
            port,
            api_key,
            model: std::env::var("GEMINI_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string()),
            bible_version: std::env::var("ABIDE_BIBLE_VERSION")
                .unwrap_or_else(|_| DEFAULT_VERSION.to_string()),
            bible_url: std::env::var("ABIDE_BIBLE_URL")
                .unwrap_or_else(|_| DEFAULT_FHL_URL.to_string()),
        }
    }
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "abide=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env();

    let ai = match &config.api_key {
        Some(key) => {
            tracing::info!("AI enabled with model {}", config.model);
            AiService::new(GeminiClient::new(key.clone(), config.model.clone()))
        }
        None => {
            tracing::warn!("GEMINI_API_KEY not set; AI actions will report unavailable");
            AiService::unavailable()
        }
    };
    let scripture = FhlClient::new(config.bible_url.clone(), config.bible_version.clone());
    tracing::info!("Bible lookups via {} ({})", config.bible_url, config.bible_version);

    let app = router(AppState::new(ai, scripture));

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("Starting server on {}", addr);

    let listener = match tokio::net::TcpListener::bind(addr).await {
        Ok(listener) => listener,
        Err(e) => {
            tracing::error!("Failed to bind {}: {}", addr, e);
            std::process::exit(1);
        }
    };
    if let Err(e) = axum::serve(listener, app).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}
