//! HTML-to-tree coercion and serialisation.
//!
//! Raw page content is handed to html5ever (through `scraper`), which never
//! rejects input: unbalanced or invalid markup is repaired the way browsers
//! repair it. The resulting DOM is then copied into an owned [`ElementNode`]
//! tree so handlers work against plain data with no borrowed parser state.

use ego_tree::iter::Edge;
use scraper::{Html, Node};

/// Tag name of the synthetic node every coerced tree is rooted at.
pub const DOCUMENT_TAG: &str = "#document";

const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param", "source",
    "track", "wbr",
];

const RAW_TEXT_ELEMENTS: &[&str] = &["script", "style"];

/// An element with its attributes and ordered children.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementNode {
    pub tag_name: String,
    /// Attributes in source order.
    pub attributes: Vec<(String, String)>,
    pub children: Vec<Child>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Child {
    Element(ElementNode),
    Text(String),
}

impl ElementNode {
    pub fn new(tag_name: impl Into<String>) -> Self {
        Self {
            tag_name: tag_name.into(),
            attributes: Vec::new(),
            children: Vec::new(),
        }
    }

    pub fn with_attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.push((name.into(), value.into()));
        self
    }

    pub fn with_child(mut self, child: ElementNode) -> Self {
        self.children.push(Child::Element(child));
        self
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.children.push(Child::Text(text.into()));
        self
    }

    pub fn is_document(&self) -> bool {
        self.tag_name == DOCUMENT_TAG
    }

    /// Child elements, skipping text.
    pub fn elements(&self) -> impl DoubleEndedIterator<Item = &ElementNode> {
        self.children.iter().filter_map(|child| match child {
            Child::Element(el) => Some(el),
            Child::Text(_) => None,
        })
    }

    /// Concatenated text of every descendant text node, in document order.
    pub fn text(&self) -> String {
        let mut out = String::new();
        let mut stack: Vec<&Child> = self.children.iter().rev().collect();

        while let Some(child) = stack.pop() {
            match child {
                Child::Text(text) => out.push_str(text),
                Child::Element(el) => stack.extend(el.children.iter().rev()),
            }
        }

        out
    }

    /// Serialises the subtree back to markup.
    ///
    /// The synthetic document root contributes no tags of its own.
    pub fn to_markup(&self) -> String {
        enum Step<'a> {
            Open(&'a ElementNode),
            Close(&'a str),
            Text(&'a str, bool),
        }

        let mut out = String::new();
        let mut stack = vec![Step::Open(self)];

        while let Some(step) = stack.pop() {
            match step {
                Step::Text(text, raw) => {
                    if raw {
                        out.push_str(text);
                    } else {
                        escape_into(&mut out, text, false);
                    }
                }
                Step::Close(tag) => {
                    out.push_str("</");
                    out.push_str(tag);
                    out.push('>');
                }
                Step::Open(el) => {
                    let is_root = el.is_document();
                    if !is_root {
                        out.push('<');
                        out.push_str(&el.tag_name);
                        for (name, value) in &el.attributes {
                            out.push(' ');
                            out.push_str(name);
                            out.push_str("=\"");
                            escape_into(&mut out, value, true);
                            out.push('"');
                        }
                        out.push('>');

                        if VOID_ELEMENTS.contains(&el.tag_name.as_str()) {
                            continue;
                        }
                        stack.push(Step::Close(&el.tag_name));
                    }

                    let raw = RAW_TEXT_ELEMENTS.contains(&el.tag_name.as_str());
                    for child in el.children.iter().rev() {
                        stack.push(match child {
                            Child::Element(child) => Step::Open(child),
                            Child::Text(text) => Step::Text(text, raw),
                        });
                    }
                }
            }
        }

        out
    }
}

fn escape_into(out: &mut String, text: &str, attribute: bool) {
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '"' if attribute => out.push_str("&quot;"),
            '<' if !attribute => out.push_str("&lt;"),
            '>' if !attribute => out.push_str("&gt;"),
            '\u{a0}' => out.push_str("&nbsp;"),
            c => out.push(c),
        }
    }
}

/// Coerces raw markup into an element tree rooted at [`DOCUMENT_TAG`].
///
/// Never fails. Whatever html5ever recovers from broken input is what the
/// tree contains; comments, doctypes and processing instructions are dropped.
/// The walk keeps an explicit stack so deeply nested pages cannot exhaust the
/// call stack.
pub fn parse_tree(raw: &str) -> ElementNode {
    let document = Html::parse_document(raw);

    if !document.errors.is_empty() {
        log::debug!(
            "Coerced malformed markup ({} parse errors)",
            document.errors.len()
        );
    }

    let mut stack = vec![ElementNode::new(DOCUMENT_TAG)];

    for edge in document.tree.root().traverse() {
        match edge {
            Edge::Open(node) => match node.value() {
                Node::Element(el) => {
                    let mut element = ElementNode::new(el.name());
                    element.attributes = el
                        .attrs()
                        .map(|(name, value)| (name.to_string(), value.to_string()))
                        .collect();
                    stack.push(element);
                }
                Node::Text(text) => {
                    if let Some(parent) = stack.last_mut() {
                        parent.children.push(Child::Text(String::from(&**text)));
                    }
                }
                _ => {}
            },
            Edge::Close(node) => {
                if node.value().is_element() && stack.len() > 1 {
                    if let Some(done) = stack.pop() {
                        if let Some(parent) = stack.last_mut() {
                            parent.children.push(Child::Element(done));
                        }
                    }
                }
            }
        }
    }

    // Only the synthetic root can remain once every open edge has closed.
    stack.truncate(1);
    stack.pop().unwrap_or_else(|| ElementNode::new(DOCUMENT_TAG))
}
