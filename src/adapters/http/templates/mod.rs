//! HTTP adapter for the template module.
//!
//! Exposes template editing, rendering, test data and the stylesheet via
//! REST endpoints. See [`routes::templates_router`] for the route table.

pub mod dto;
pub mod handlers;
pub mod routes;

// Re-export commonly used types
pub use handlers::{TemplatesApiError, TemplatesAppState};
pub use routes::templates_router;
