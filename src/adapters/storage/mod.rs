//! Storage adapters - filesystem-backed templates, test data and styles.

mod local_style_source;
mod local_template_store;

pub use local_style_source::LocalStyleSource;
pub use local_template_store::{LocalTemplateStore, MAX_TEMPLATE_SIZE_BYTES};
