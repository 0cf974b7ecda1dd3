//! Splits template source into literal text and `{{ }}` tags.
//!
//! Text outside tags is kept verbatim except for two handlebars rules:
//! block, comment and partial tags that sit alone on a line take the whole
//! line with them, and `~` inside a delimiter trims adjacent whitespace.

use super::error::{CompileError, Position};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum TagKind {
    /// `{{path}}`
    Escaped,
    /// `{{{path}}}` or `{{& path}}`
    Raw,
    /// `{{! ... }}` or `{{!-- ... --}}`
    Comment,
    /// `{{#helper arg}}`
    Open,
    /// `{{/helper}}`
    Close,
    /// `{{else}}` or `{{^}}`
    Else,
    /// `{{> name}}`
    Partial,
}

impl TagKind {
    fn can_stand_alone(self) -> bool {
        matches!(
            self,
            TagKind::Open | TagKind::Close | TagKind::Else | TagKind::Comment | TagKind::Partial
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Tag {
    pub kind: TagKind,
    pub body: String,
    pub position: Position,
    strip_before: bool,
    strip_after: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Token {
    Text(String),
    Tag(Tag),
}

struct LineIndex {
    starts: Vec<usize>,
}

impl LineIndex {
    fn new(source: &str) -> Self {
        let mut starts = vec![0];
        starts.extend(source.match_indices('\n').map(|(i, _)| i + 1));
        Self { starts }
    }

    fn position(&self, source: &str, offset: usize) -> Position {
        let line = match self.starts.binary_search(&offset) {
            Ok(i) => i,
            Err(i) => i - 1,
        };
        let column = source[self.starts[line]..offset].chars().count() + 1;
        Position {
            line: line + 1,
            column,
        }
    }
}

pub(crate) fn tokenize(source: &str) -> Result<Vec<Token>, CompileError> {
    let index = LineIndex::new(source);
    let mut tokens = Vec::new();
    let mut cursor = 0;

    while let Some(found) = source[cursor..].find("{{") {
        let start = cursor + found;
        if start > cursor {
            tokens.push(Token::Text(source[cursor..start].to_string()));
        }
        let position = index.position(source, start);
        let (tag, end) = read_tag(source, start, position)?;
        tokens.push(Token::Tag(tag));
        cursor = end;
    }
    if cursor < source.len() {
        tokens.push(Token::Text(source[cursor..].to_string()));
    }

    strip_standalone_lines(&mut tokens);
    apply_whitespace_control(&mut tokens);
    Ok(tokens)
}

/// Reads one tag starting at `start` and returns it with the offset just past it.
fn read_tag(source: &str, start: usize, position: Position) -> Result<(Tag, usize), CompileError> {
    let triple = source[start..].starts_with("{{{");
    let mut inner_start = start + if triple { 3 } else { 2 };
    let strip_before = source[inner_start..].starts_with('~');
    if strip_before {
        inner_start += 1;
    }

    let unclosed = || CompileError::UnclosedExpression { position };

    if !triple && source[inner_start..].starts_with("!--") {
        let (end, strip_after) = find_long_comment_end(source, inner_start + 3).ok_or_else(unclosed)?;
        let tag = Tag {
            kind: TagKind::Comment,
            body: String::new(),
            position,
            strip_before,
            strip_after,
        };
        return Ok((tag, end));
    }

    let close = if triple { "}}}" } else { "}}" };
    let close_at = source[inner_start..]
        .find(close)
        .map(|rel| inner_start + rel)
        .ok_or_else(unclosed)?;
    let mut inner = &source[inner_start..close_at];
    if inner.contains("{{") {
        return Err(unclosed());
    }
    let strip_after = inner.ends_with('~');
    if strip_after {
        inner = &inner[..inner.len() - 1];
    }

    let body = inner.trim();
    let (kind, body) = if triple {
        (TagKind::Raw, body)
    } else if body.starts_with('!') {
        (TagKind::Comment, "")
    } else if let Some(rest) = body.strip_prefix('#') {
        (TagKind::Open, rest.trim())
    } else if let Some(rest) = body.strip_prefix('/') {
        (TagKind::Close, rest.trim())
    } else if let Some(rest) = body.strip_prefix('>') {
        (TagKind::Partial, rest.trim())
    } else if let Some(rest) = body.strip_prefix('&') {
        (TagKind::Raw, rest.trim())
    } else if body == "else" || body == "^" {
        (TagKind::Else, "")
    } else {
        (TagKind::Escaped, body)
    };

    if body.is_empty() && !matches!(kind, TagKind::Comment | TagKind::Else) {
        return Err(CompileError::EmptyExpression { position });
    }

    let tag = Tag {
        kind,
        body: body.to_string(),
        position,
        strip_before,
        strip_after,
    };
    Ok((tag, close_at + close.len()))
}

/// Finds `--}}` or `--~}}`, returning the end offset and whether `~` was present.
fn find_long_comment_end(source: &str, from: usize) -> Option<(usize, bool)> {
    let mut search = from;
    while let Some(rel) = source[search..].find("--") {
        let at = search + rel;
        let rest = &source[at + 2..];
        if rest.starts_with("}}") {
            return Some((at + 4, false));
        }
        if rest.starts_with("~}}") {
            return Some((at + 5, true));
        }
        search = at + 1;
    }
    None
}

fn is_blank(s: &str) -> bool {
    s.chars().all(|c| c == ' ' || c == '\t')
}

fn line_tail_is_blank(text: &str, first_token: bool) -> bool {
    match text.rfind('\n') {
        Some(nl) => is_blank(&text[nl + 1..]),
        None => first_token && is_blank(text),
    }
}

fn line_head_is_blank(text: &str, last_token: bool) -> bool {
    match text.find('\n') {
        Some(nl) => is_blank(text[..nl].trim_end_matches('\r')),
        None => last_token && is_blank(text),
    }
}

fn strip_standalone_lines(tokens: &mut [Token]) {
    // Decide on the untouched text first; trimming one tag's line must not
    // change whether its neighbour counts as standalone.
    let standalone: Vec<usize> = (0..tokens.len())
        .filter(|&i| {
            let Token::Tag(tag) = &tokens[i] else {
                return false;
            };
            if !tag.kind.can_stand_alone() {
                return false;
            }
            let before = match i.checked_sub(1).map(|p| &tokens[p]) {
                None => true,
                Some(Token::Text(text)) => line_tail_is_blank(text, i == 1),
                Some(Token::Tag(_)) => false,
            };
            let after = match tokens.get(i + 1) {
                None => true,
                Some(Token::Text(text)) => line_head_is_blank(text, i + 2 == tokens.len()),
                Some(Token::Tag(_)) => false,
            };
            before && after
        })
        .collect();

    for i in standalone {
        if i > 0 {
            if let Token::Text(text) = &mut tokens[i - 1] {
                match text.rfind('\n') {
                    Some(nl) => text.truncate(nl + 1),
                    None => text.clear(),
                }
            }
        }
        if let Some(Token::Text(text)) = tokens.get_mut(i + 1) {
            match text.find('\n') {
                Some(nl) => {
                    text.drain(..=nl);
                }
                None => text.clear(),
            }
        }
    }
}

fn apply_whitespace_control(tokens: &mut [Token]) {
    for i in 0..tokens.len() {
        let (strip_before, strip_after) = match &tokens[i] {
            Token::Tag(tag) => (tag.strip_before, tag.strip_after),
            Token::Text(_) => continue,
        };
        if strip_before && i > 0 {
            if let Token::Text(text) = &mut tokens[i - 1] {
                let kept = text.trim_end().len();
                text.truncate(kept);
            }
        }
        if strip_after {
            if let Some(Token::Text(text)) = tokens.get_mut(i + 1) {
                *text = text.trim_start().to_string();
            }
        }
    }
}
