//! Foundation module - Shared domain primitives.
//!
//! Contains the validated names and error types that form the vocabulary
//! of the letterpress domain.

mod errors;
mod names;

pub use errors::ValidationError;
pub use names::{TemplateName, Variation, DEFAULT_VARIATION};
pub(crate) use names::validate_segment;
