//! Template engine - compiles handlebars-style placeholders in markdown.
//!
//! Supported syntax:
//! - `{{path}}` (HTML-escaped) and `{{{path}}}` / `{{& path}}` (raw) interpolation
//! - `{{#if}}`, `{{#unless}}`, `{{#each}}` and `{{#with}}` blocks with `{{else}}`
//! - member access (`a.b`, `a/b`, `this.a`, `../a`) and `@index`, `@key`, `@first`, `@last`, `@root`
//! - `{{> partial}}`, `{{! comments }}` and `~` whitespace control
//!
//! Text outside placeholders is copied verbatim. Compilation rejects
//! malformed syntax; rendering never fails on missing data.

mod context;
mod error;
mod lexer;
mod parser;
mod render;

pub use context::{DataContext, ExactKeyResolver, MemberPathResolver, ResolverChain, ValueResolver};
pub use error::{CompileError, Position, RenderFailure};
pub use render::MAX_PARTIAL_DEPTH;

use std::collections::{BTreeSet, HashMap};

use parser::Node;
use render::Renderer;

/// A template ready to be applied to data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledTemplate {
    nodes: Vec<Node>,
    partials: BTreeSet<String>,
}

impl CompiledTemplate {
    /// Names of the partials this template includes directly.
    pub fn partial_names(&self) -> impl Iterator<Item = &str> {
        self.partials.iter().map(String::as_str)
    }

    pub(crate) fn nodes(&self) -> &[Node] {
        &self.nodes
    }
}

/// Compiled partials available to a render, keyed by name.
#[derive(Debug, Clone, Default)]
pub struct Partials {
    templates: HashMap<String, CompiledTemplate>,
}

impl Partials {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, template: CompiledTemplate) {
        self.templates.insert(name.into(), template);
    }

    pub fn get(&self, name: &str) -> Option<&CompiledTemplate> {
        self.templates.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.templates.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }
}

/// Compiles and applies templates using a configurable resolver chain.
#[derive(Debug, Default)]
pub struct TemplateEngine {
    resolvers: ResolverChain,
}

impl TemplateEngine {
    /// Engine with the standard resolver chain.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_resolvers(resolvers: ResolverChain) -> Self {
        Self { resolvers }
    }

    pub fn compile(&self, source: &str) -> Result<CompiledTemplate, CompileError> {
        let parsed = parser::parse(source)?;
        Ok(CompiledTemplate {
            nodes: parsed.nodes,
            partials: parsed.partials,
        })
    }

    /// Renders `template` against `context`. Pure apart from resolver lookups.
    pub fn apply(
        &self,
        template: &CompiledTemplate,
        context: &DataContext,
        partials: &Partials,
    ) -> Result<String, RenderFailure> {
        Renderer::new(&self.resolvers, partials, context.as_value()).render(template.nodes())
    }
}
