//! html5ever based post-processor adapter.
//!
//! Parses converted markdown into a full document tree, then appends the
//! charset declaration and the stylesheet to `head`.

use html5ever::parse_document;
use html5ever::serialize::{serialize, SerializeOpts, TraversalScope};
use html5ever::tendril::{StrTendril, TendrilSink};
use markup5ever::{Attribute, LocalName, Namespace, QualName};
use markup5ever_rcdom::{Handle, Node, NodeData, RcDom, SerializableHandle};
use std::cell::RefCell;
use std::rc::Rc;

use crate::domain::rendering::StylesheetMode;
use crate::ports::{HtmlError, HtmlPostProcessor};

const XHTML_NAMESPACE: &str = "http://www.w3.org/1999/xhtml";

/// Adds `<meta charset>` and stylesheet elements using html5ever.
#[derive(Debug, Clone, Copy, Default)]
pub struct Html5everPostProcessor;

impl Html5everPostProcessor {
    pub fn new() -> Self {
        Self
    }
}

impl HtmlPostProcessor for Html5everPostProcessor {
    fn add_metadata(&self, html: &str, stylesheet: &StylesheetMode) -> Result<String, HtmlError> {
        let dom = parse_document(RcDom::default(), Default::default())
            .from_utf8()
            .read_from(&mut html.as_bytes())
            .map_err(|e| HtmlError(e.to_string()))?;

        let head = ensure_head(&dom.document)?;
        append_child(&head, element("meta", &[("charset", "UTF-8")]));
        match stylesheet {
            StylesheetMode::Inline(css) => {
                let style = element("style", &[]);
                append_child(&style, text(css));
                append_child(&head, style);
            }
            StylesheetMode::Linked(href) => {
                append_child(&head, element("link", &[("rel", "stylesheet"), ("href", href)]));
            }
            StylesheetMode::None => {}
        }

        let mut bytes = Vec::new();
        let document: SerializableHandle = dom.document.clone().into();
        serialize(
            &mut bytes,
            &document,
            SerializeOpts {
                traversal_scope: TraversalScope::ChildrenOnly(None),
                ..Default::default()
            },
        )
        .map_err(|e| HtmlError(e.to_string()))?;

        String::from_utf8(bytes).map_err(|e| HtmlError(e.to_string()))
    }
}

fn is_element(handle: &Handle, tag: &str) -> bool {
    matches!(&handle.data, NodeData::Element { name, .. } if name.local.as_ref() == tag)
}

fn find_child(parent: &Handle, tag: &str) -> Option<Handle> {
    parent
        .children
        .borrow()
        .iter()
        .find(|child| is_element(child, tag))
        .cloned()
}

/// Returns the document's `head`, creating it as the first child of `html` if missing.
fn ensure_head(document: &Handle) -> Result<Handle, HtmlError> {
    let html = find_child(document, "html")
        .ok_or_else(|| HtmlError("document has no html element".to_string()))?;
    if let Some(head) = find_child(&html, "head") {
        return Ok(head);
    }
    let head = element("head", &[]);
    head.parent.set(Some(Rc::downgrade(&html)));
    html.children.borrow_mut().insert(0, head.clone());
    Ok(head)
}

fn html_name(local: &str) -> QualName {
    QualName::new(None, Namespace::from(XHTML_NAMESPACE), LocalName::from(local))
}

fn element(tag: &str, attributes: &[(&str, &str)]) -> Handle {
    let attrs = attributes
        .iter()
        .map(|(name, value)| Attribute {
            name: QualName::new(None, Namespace::from(""), LocalName::from(*name)),
            value: StrTendril::from_slice(value),
        })
        .collect();
    Node::new(NodeData::Element {
        name: html_name(tag),
        attrs: RefCell::new(attrs),
        template_contents: RefCell::new(None),
        mathml_annotation_xml_integration_point: false,
    })
}

fn text(contents: &str) -> Handle {
    Node::new(NodeData::Text {
        contents: RefCell::new(StrTendril::from_slice(contents)),
    })
}

fn append_child(parent: &Handle, child: Handle) {
    child.parent.set(Some(Rc::downgrade(parent)));
    parent.children.borrow_mut().push(child);
}

// ════════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════════
