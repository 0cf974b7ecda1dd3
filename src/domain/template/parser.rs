//! Builds the placeholder tree from lexer tokens.

use std::collections::BTreeSet;

use super::error::{CompileError, Position};
use super::lexer::{tokenize, Tag, TagKind, Token};
use crate::domain::foundation::TemplateName;

/// A placeholder path such as `name`, `address.city`, `../title`, `this` or `@index`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum PathExpr {
    /// The current scope (`this`, `.`), optionally `depth` scopes up.
    This { depth: usize },
    /// Iteration data (`@index`, `@key`, `@first`, `@last`, `@root`).
    Data { name: String },
    /// A key resolved against the scope `depth` levels up. Bare keys
    /// (`local == false`) fall back to enclosing scopes when unresolved.
    Key {
        depth: usize,
        key: String,
        local: bool,
    },
}

impl PathExpr {
    pub(crate) fn parse(raw: &str, position: Position) -> Result<Self, CompileError> {
        let invalid = || CompileError::InvalidPath {
            path: raw.to_string(),
            position,
        };

        if let Some(name) = raw.strip_prefix('@') {
            if name.is_empty() || !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
                return Err(invalid());
            }
            return Ok(PathExpr::Data {
                name: name.to_string(),
            });
        }

        let mut rest = raw;
        let mut depth = 0;
        while let Some(parent) = rest.strip_prefix("../") {
            depth += 1;
            rest = parent;
        }
        if rest == ".." {
            return Ok(PathExpr::This { depth: depth + 1 });
        }
        let explicit = rest
            .strip_prefix("this.")
            .or_else(|| rest.strip_prefix("this/"))
            .or_else(|| rest.strip_prefix("./"));
        let local = depth > 0 || explicit.is_some();
        let rest = explicit.unwrap_or(rest);

        if rest.is_empty() || rest == "this" || rest == "." {
            return Ok(PathExpr::This { depth });
        }
        if rest.starts_with(['.', '/'])
            || rest.ends_with(['.', '/'])
            || rest.contains("..")
            || rest.contains(['{', '}', '"', '\'', '(', ')', '=', '@', '^', '#'])
        {
            return Err(invalid());
        }
        Ok(PathExpr::Key {
            depth,
            key: rest.to_string(),
            local,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Helper {
    If,
    Unless,
    Each,
    With,
}

impl Helper {
    fn from_name(name: &str) -> Option<Self> {
        match name {
            "if" => Some(Helper::If),
            "unless" => Some(Helper::Unless),
            "each" => Some(Helper::Each),
            "with" => Some(Helper::With),
            _ => None,
        }
    }

    pub(crate) fn name(self) -> &'static str {
        match self {
            Helper::If => "if",
            Helper::Unless => "unless",
            Helper::Each => "each",
            Helper::With => "with",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Block {
    pub helper: Helper,
    pub target: PathExpr,
    pub body: Vec<Node>,
    pub inverse: Vec<Node>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Node {
    Text(String),
    Value { path: PathExpr, escape: bool },
    Block(Block),
    Partial(String),
}

pub(crate) struct Parsed {
    pub nodes: Vec<Node>,
    pub partials: BTreeSet<String>,
}

struct OpenBlock {
    helper: Helper,
    target: PathExpr,
    position: Position,
    body: Vec<Node>,
    inverse: Option<Vec<Node>>,
}

impl OpenBlock {
    fn current(&mut self) -> &mut Vec<Node> {
        match &mut self.inverse {
            Some(inverse) => inverse,
            None => &mut self.body,
        }
    }
}

pub(crate) fn parse(source: &str) -> Result<Parsed, CompileError> {
    let mut root = Vec::new();
    let mut stack: Vec<OpenBlock> = Vec::new();
    let mut partials = BTreeSet::new();

    for token in tokenize(source)? {
        let node = match token {
            Token::Text(text) if text.is_empty() => continue,
            Token::Text(text) => Node::Text(text),
            Token::Tag(tag) => match tag.kind {
                TagKind::Comment => continue,
                TagKind::Escaped | TagKind::Raw => Node::Value {
                    path: value_path(&tag)?,
                    escape: tag.kind == TagKind::Escaped,
                },
                TagKind::Partial => {
                    let name = partial_name(&tag)?;
                    partials.insert(name.clone());
                    Node::Partial(name)
                }
                TagKind::Open => {
                    stack.push(open_block(&tag)?);
                    continue;
                }
                TagKind::Else => {
                    let unexpected = CompileError::UnexpectedElse {
                        position: tag.position,
                    };
                    let block = stack.last_mut().ok_or(unexpected.clone())?;
                    if block.inverse.is_some() {
                        return Err(unexpected);
                    }
                    block.inverse = Some(Vec::new());
                    continue;
                }
                TagKind::Close => {
                    let block = stack.pop().ok_or_else(|| CompileError::UnexpectedClose {
                        found: tag.body.clone(),
                        position: tag.position,
                    })?;
                    if block.helper.name() != tag.body {
                        return Err(CompileError::MismatchedClose {
                            expected: block.helper.name().to_string(),
                            found: tag.body,
                            position: tag.position,
                        });
                    }
                    Node::Block(Block {
                        helper: block.helper,
                        target: block.target,
                        body: block.body,
                        inverse: block.inverse.unwrap_or_default(),
                    })
                }
            },
        };

        match stack.last_mut() {
            Some(block) => block.current().push(node),
            None => root.push(node),
        }
    }

    if let Some(block) = stack.pop() {
        return Err(CompileError::UnclosedBlock {
            helper: block.helper.name().to_string(),
            position: block.position,
        });
    }

    Ok(Parsed {
        nodes: root,
        partials,
    })
}

fn value_path(tag: &Tag) -> Result<PathExpr, CompileError> {
    let mut words = tag.body.split_whitespace();
    let first = words.next().unwrap_or_default();
    if words.next().is_some() {
        // `{{helper arg}}`: only the four block helpers exist.
        return Err(CompileError::UnknownHelper {
            helper: first.to_string(),
            position: tag.position,
        });
    }
    PathExpr::parse(first, tag.position)
}

fn open_block(tag: &Tag) -> Result<OpenBlock, CompileError> {
    let mut words = tag.body.split_whitespace();
    let name = words.next().unwrap_or_default();
    let helper = Helper::from_name(name).ok_or_else(|| CompileError::UnknownHelper {
        helper: name.to_string(),
        position: tag.position,
    })?;
    let args: Vec<&str> = words.collect();
    let [arg] = args.as_slice() else {
        return Err(CompileError::InvalidArguments {
            helper: name.to_string(),
            position: tag.position,
        });
    };

    Ok(OpenBlock {
        helper,
        target: PathExpr::parse(arg, tag.position)?,
        position: tag.position,
        body: Vec::new(),
        inverse: None,
    })
}

fn partial_name(tag: &Tag) -> Result<String, CompileError> {
    let mut words = tag.body.split_whitespace();
    let name = words.next().unwrap_or_default();
    if words.next().is_some() {
        return Err(CompileError::InvalidArguments {
            helper: ">".to_string(),
            position: tag.position,
        });
    }
    TemplateName::new(name)
        .map(String::from)
        .map_err(|_| CompileError::InvalidPath {
            path: name.to_string(),
            position: tag.position,
        })
}
