//! Data context binding for placeholders.
//!
//! A render call receives one JSON document. Placeholders are resolved
//! against it by an ordered chain of [`ValueResolver`] strategies; the first
//! strategy returning a value wins, and a placeholder nobody resolves renders
//! as empty text.

use serde_json::{Map, Value};

/// The JSON data bound to a template for a single render.
#[derive(Debug, Clone, PartialEq)]
pub struct DataContext(Value);

impl DataContext {
    pub fn new(value: Value) -> Self {
        Self(value)
    }

    /// An empty object, used when a request carries no data.
    pub fn empty() -> Self {
        Self(Value::Object(Map::new()))
    }

    /// Parses a JSON document into a context.
    pub fn from_json_str(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json).map(Self)
    }

    pub fn as_value(&self) -> &Value {
        &self.0
    }

    pub fn into_value(self) -> Value {
        self.0
    }
}

impl Default for DataContext {
    fn default() -> Self {
        Self::empty()
    }
}

impl From<Value> for DataContext {
    fn from(value: Value) -> Self {
        Self(value)
    }
}

/// One strategy for turning a placeholder key into a value.
pub trait ValueResolver: Send + Sync {
    /// Looks `key` up in `context`, returning `None` when this strategy has no answer.
    fn resolve<'v>(&self, context: &'v Value, key: &str) -> Option<&'v Value>;
}

/// Matches the whole key against a property of the current object.
///
/// Lets data such as `{"a.b": 1}` answer `{{a.b}}` before member traversal.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExactKeyResolver;

impl ValueResolver for ExactKeyResolver {
    fn resolve<'v>(&self, context: &'v Value, key: &str) -> Option<&'v Value> {
        context.as_object()?.get(key)
    }
}

/// Walks `.` or `/` separated segments through nested objects and arrays.
#[derive(Debug, Clone, Copy, Default)]
pub struct MemberPathResolver;

impl ValueResolver for MemberPathResolver {
    fn resolve<'v>(&self, context: &'v Value, key: &str) -> Option<&'v Value> {
        key.split(['.', '/']).try_fold(context, |current, segment| match current {
            Value::Object(map) => map.get(segment),
            Value::Array(items) => segment.parse::<usize>().ok().and_then(|i| items.get(i)),
            _ => None,
        })
    }
}

/// Ordered list of resolver strategies.
pub struct ResolverChain {
    resolvers: Vec<Box<dyn ValueResolver>>,
}

impl ResolverChain {
    pub fn new(resolvers: Vec<Box<dyn ValueResolver>>) -> Self {
        Self { resolvers }
    }

    /// Exact key match, then member traversal.
    pub fn standard() -> Self {
        Self::new(vec![Box::new(ExactKeyResolver), Box::new(MemberPathResolver)])
    }

    pub fn resolve<'v>(&self, context: &'v Value, key: &str) -> Option<&'v Value> {
        self.resolvers
            .iter()
            .find_map(|resolver| resolver.resolve(context, key))
    }
}

impl Default for ResolverChain {
    fn default() -> Self {
        Self::standard()
    }
}

impl std::fmt::Debug for ResolverChain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResolverChain")
            .field("resolvers", &self.resolvers.len())
            .finish()
    }
}

/// Handlebars truthiness: `false`, `null`, `""`, `0` and `[]` are falsy.
pub(crate) fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map(|f| f != 0.0).unwrap_or(true),
        Value::String(s) => !s.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(_) => true,
    }
}

/// Text form of a value when interpolated.
pub(crate) fn display_value(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::Array(items) => items
            .iter()
            .map(display_value)
            .collect::<Vec<_>>()
            .join(","),
        Value::Object(_) => value.to_string(),
    }
}
