//! HTTP adapter - JSON API over the application services.
//!
//! - `chat` - assistant conversations
//! - `processing` - stage runs and their WebSocket progress stream
//! - `recordings` - recording sessions
//! - `projects` - dashboard projects, stats and guides

pub mod chat;
pub mod error;
pub mod processing;
pub mod projects;
pub mod recordings;
pub mod state;

pub use error::{ApiError, ErrorResponse};
pub use state::AppState;

use axum::http::HeaderValue;
use axum::{middleware, Router};
use tower_http::cors::{Any, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::config::AppConfig;

/// All API routes with state applied.
pub fn api_router(state: AppState) -> Router {
    Router::new()
        .merge(chat::chat_routes())
        .merge(processing::processing_routes())
        .merge(recordings::recording_routes())
        .merge(projects::project_routes())
        .with_state(state)
}

/// The API router with the cross-cutting layers the config asks for.
pub fn app(state: AppState, config: &AppConfig) -> Router {
    let mut router = api_router(state)
        .layer(TimeoutLayer::new(config.server.request_timeout()))
        .layer(cors_layer(&config.server.cors_origins_list()));

    if config.features.verbose_errors {
        router = router.layer(middleware::map_response(error::expose_error_details));
    }
    if config.features.enable_tracing {
        router = router.layer(TraceLayer::new_for_http());
    }
    router
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    if origins.is_empty() {
        return CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any);
    }

    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(%origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(allowed)
        .allow_methods(Any)
        .allow_headers(Any)
}
