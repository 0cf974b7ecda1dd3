//! Applies a compiled template to a data context.

use serde_json::Value;
use std::borrow::Cow;

use super::context::{display_value, is_truthy, ResolverChain};
use super::error::RenderFailure;
use super::parser::{Block, Helper, Node, PathExpr};
use super::Partials;

/// Maximum nesting of `{{> partial}}` inclusions.
pub const MAX_PARTIAL_DEPTH: usize = 32;

#[derive(Debug, Clone, Copy)]
struct IterationData<'v> {
    index: usize,
    key: Option<&'v str>,
    first: bool,
    last: bool,
}

#[derive(Debug, Clone, Copy)]
struct Scope<'v> {
    value: &'v Value,
    data: Option<IterationData<'v>>,
}

pub(crate) struct Renderer<'a, 'v> {
    resolvers: &'a ResolverChain,
    partials: &'a Partials,
    root: &'v Value,
    out: String,
    depth: usize,
}

impl<'a, 'v> Renderer<'a, 'v> {
    pub(crate) fn new(resolvers: &'a ResolverChain, partials: &'a Partials, root: &'v Value) -> Self {
        Self {
            resolvers,
            partials,
            root,
            out: String::new(),
            depth: 0,
        }
    }

    pub(crate) fn render(mut self, nodes: &[Node]) -> Result<String, RenderFailure> {
        let mut stack = vec![Scope {
            value: self.root,
            data: None,
        }];
        self.render_nodes(nodes, &mut stack)?;
        Ok(self.out)
    }

    fn render_nodes(&mut self, nodes: &[Node], stack: &mut Vec<Scope<'v>>) -> Result<(), RenderFailure> {
        for node in nodes {
            match node {
                Node::Text(text) => self.out.push_str(text),
                Node::Value { path, escape } => {
                    if let Some(value) = self.lookup(path, stack) {
                        let text = display_value(&value);
                        if *escape {
                            escape_html_into(&mut self.out, &text);
                        } else {
                            self.out.push_str(&text);
                        }
                    }
                }
                Node::Block(block) => self.render_block(block, stack)?,
                Node::Partial(name) => self.render_partial(name, stack)?,
            }
        }
        Ok(())
    }

    fn lookup(&self, path: &PathExpr, stack: &[Scope<'v>]) -> Option<Cow<'v, Value>> {
        match path {
            PathExpr::This { depth } => scope_at(stack, *depth).map(|s| Cow::Borrowed(s.value)),
            PathExpr::Key {
                depth,
                key,
                local: true,
            } => {
                let scope = scope_at(stack, *depth)?;
                self.resolvers.resolve(scope.value, key).map(Cow::Borrowed)
            }
            // Innermost scope first, then each enclosing scope up to the root.
            PathExpr::Key { key, local: false, .. } => stack
                .iter()
                .rev()
                .find_map(|scope| self.resolvers.resolve(scope.value, key))
                .map(Cow::Borrowed),
            PathExpr::Data { name } => {
                if name == "root" {
                    return Some(Cow::Borrowed(self.root));
                }
                let data = stack.iter().rev().find_map(|s| s.data)?;
                match name.as_str() {
                    "index" => Some(Cow::Owned(Value::from(data.index))),
                    "key" => data.key.map(|k| Cow::Owned(Value::from(k))),
                    "first" => Some(Cow::Owned(Value::Bool(data.first))),
                    "last" => Some(Cow::Owned(Value::Bool(data.last))),
                    _ => None,
                }
            }
        }
    }

    fn render_block(&mut self, block: &Block, stack: &mut Vec<Scope<'v>>) -> Result<(), RenderFailure> {
        let target = self.lookup(&block.target, stack);
        match block.helper {
            Helper::If | Helper::Unless => {
                let truthy = target.as_deref().map(is_truthy).unwrap_or(false);
                let branch = if truthy == (block.helper == Helper::If) {
                    &block.body
                } else {
                    &block.inverse
                };
                self.render_nodes(branch, stack)
            }
            Helper::With => match target {
                Some(Cow::Borrowed(value)) if is_truthy(value) => {
                    self.with_scope(stack, Scope { value, data: None }, &block.body)
                }
                // Iteration data is not addressable as a scope; keep the current one.
                Some(Cow::Owned(value)) if is_truthy(&value) => self.render_nodes(&block.body, stack),
                _ => self.render_nodes(&block.inverse, stack),
            },
            Helper::Each => {
                let rendered = match target {
                    Some(Cow::Borrowed(value)) => self.render_each(value, &block.body, stack)?,
                    _ => false,
                };
                if !rendered {
                    self.render_nodes(&block.inverse, stack)?;
                }
                Ok(())
            }
        }
    }

    /// Renders `body` once per element; returns whether anything was iterated.
    fn render_each(
        &mut self,
        value: &'v Value,
        body: &[Node],
        stack: &mut Vec<Scope<'v>>,
    ) -> Result<bool, RenderFailure> {
        match value {
            Value::Array(items) => {
                let last = items.len().saturating_sub(1);
                for (index, item) in items.iter().enumerate() {
                    let data = IterationData {
                        index,
                        key: None,
                        first: index == 0,
                        last: index == last,
                    };
                    self.with_scope(stack, Scope { value: item, data: Some(data) }, body)?;
                }
                Ok(!items.is_empty())
            }
            Value::Object(map) => {
                let last = map.len().saturating_sub(1);
                for (index, (key, item)) in map.iter().enumerate() {
                    let data = IterationData {
                        index,
                        key: Some(key.as_str()),
                        first: index == 0,
                        last: index == last,
                    };
                    self.with_scope(stack, Scope { value: item, data: Some(data) }, body)?;
                }
                Ok(!map.is_empty())
            }
            _ => Ok(false),
        }
    }

    fn with_scope(
        &mut self,
        stack: &mut Vec<Scope<'v>>,
        scope: Scope<'v>,
        body: &[Node],
    ) -> Result<(), RenderFailure> {
        stack.push(scope);
        let result = self.render_nodes(body, stack);
        stack.pop();
        result
    }

    fn render_partial(&mut self, name: &str, stack: &mut Vec<Scope<'v>>) -> Result<(), RenderFailure> {
        let partials = self.partials;
        let partial = partials
            .get(name)
            .ok_or_else(|| RenderFailure::MissingPartial(name.to_string()))?;
        if self.depth >= MAX_PARTIAL_DEPTH {
            return Err(RenderFailure::PartialDepthExceeded(MAX_PARTIAL_DEPTH));
        }
        self.depth += 1;
        let result = self.render_nodes(partial.nodes(), stack);
        self.depth -= 1;
        result
    }
}

fn scope_at<'s, 'v>(stack: &'s [Scope<'v>], depth: usize) -> Option<&'s Scope<'v>> {
    stack.len().checked_sub(depth + 1).map(|i| &stack[i])
}

fn escape_html_into(out: &mut String, text: &str) {
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            '`' => out.push_str("&#x60;"),
            '=' => out.push_str("&#x3D;"),
            _ => out.push(c),
        }
    }
}
