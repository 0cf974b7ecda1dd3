//! HTTP adapters - REST API implementations.
//!
//! The template adapter owns every endpoint; this module adds the
//! cross-cutting layers (request tracing, CORS) around it.

pub mod templates;

use axum::http::{HeaderValue, Method};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

// Re-export key types for convenience
pub use templates::templates_router;
pub use templates::TemplatesAppState;

/// Builds the complete application router.
///
/// `cors_origins` lists the browser origins allowed to call the API; an
/// empty list allows any origin.
pub fn app_router(state: TemplatesAppState, cors_origins: &[String]) -> Router {
    templates_router()
        .with_state(state)
        .layer(cors_layer(cors_origins))
        .layer(TraceLayer::new_for_http())
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers(Any);

    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    if allowed.is_empty() {
        layer.allow_origin(Any)
    } else {
        layer.allow_origin(allowed)
    }
}
