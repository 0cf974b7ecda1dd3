//! Name value objects for stored templates and their variations.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::ValidationError;

/// Name of the variation used when none is requested.
pub const DEFAULT_VARIATION: &str = "template";

/// Name of a stored template.
///
/// Names are `/`-separated segments so templates can be grouped in nested
/// folders (`letters/welcome`). Every segment must be filesystem-safe.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TemplateName(String);

impl TemplateName {
    /// Creates a template name, rejecting anything that could escape the store root.
    pub fn new(name: impl Into<String>) -> Result<Self, ValidationError> {
        let name = name.into();
        if name.is_empty() {
            return Err(ValidationError::empty_field("template_name"));
        }
        if name.starts_with('/') {
            return Err(ValidationError::invalid_format(
                "template_name",
                "must be a relative name",
            ));
        }
        for segment in name.split('/') {
            validate_segment("template_name", segment)?;
        }
        Ok(Self(name))
    }

    /// Returns the inner string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Path segments of the name.
    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.0.split('/')
    }
}

impl fmt::Display for TemplateName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for TemplateName {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for TemplateName {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<TemplateName> for String {
    fn from(name: TemplateName) -> Self {
        name.0
    }
}

/// Name of a template variation (`template`, `template_NN`, ...).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Variation(String);

impl Variation {
    pub fn new(variation: impl Into<String>) -> Result<Self, ValidationError> {
        let variation = variation.into();
        validate_segment("variation", &variation)?;
        Ok(Self(variation))
    }

    /// Resolves an optional requested variation, falling back to the default.
    pub fn or_default(requested: Option<&str>) -> Result<Self, ValidationError> {
        match requested {
            Some(v) if !v.is_empty() => Self::new(v),
            _ => Ok(Self::default()),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for Variation {
    fn default() -> Self {
        Self(DEFAULT_VARIATION.to_string())
    }
}

impl fmt::Display for Variation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A single filesystem-safe path segment: `[A-Za-z0-9_.-]+`, not starting
/// with `.` and not ending in `.tmp` (hidden and in-flight files on disk).
pub(crate) fn validate_segment(field: &str, segment: &str) -> Result<(), ValidationError> {
    if segment.is_empty() {
        return Err(ValidationError::invalid_format(field, "empty path segment"));
    }
    if segment.starts_with('.') {
        return Err(ValidationError::invalid_format(
            field,
            "segments may not start with '.'",
        ));
    }
    if segment.ends_with(".tmp") {
        return Err(ValidationError::invalid_format(
            field,
            "the '.tmp' suffix is reserved",
        ));
    }
    if let Some(c) = segment
        .chars()
        .find(|c| !(c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.')))
    {
        return Err(ValidationError::invalid_format(
            field,
            format!("character '{}' is not allowed", c),
        ));
    }
    Ok(())
}
