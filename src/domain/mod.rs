//! Domain layer containing the rendering rules and domain types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared domain primitives (names, validation errors)
//! - `template` - Placeholder compiler, data context binding and renderer
//! - `rendering` - Output formats and rendered document values

pub mod foundation;
pub mod rendering;
pub mod template;
