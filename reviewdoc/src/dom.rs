//! HTML tree helpers
//!
//! Thin layer over html5ever's reference-counted DOM: parsing, element
//! lookup, text extraction, and the serializer used to produce each
//! section's markup. Walks use explicit stacks so deeply nested input
//! cannot exhaust the call stack.

use html5ever::parse_document;
use html5ever::serialize::{
    AttrRef, HtmlSerializer, Serialize, SerializeOpts, Serializer, TraversalScope,
};
use html5ever::tendril::TendrilSink;
use html5ever::QualName;
use markup5ever_rcdom::{Handle, NodeData, RcDom, SerializableHandle};
use std::io::{self, Write};

/// Elements whose first newline is dropped by the parser
const LEADING_NEWLINE_ELEMENTS: &[&str] = &["pre", "textarea", "listing"];

/// Parse an HTML document or fragment into a DOM
///
/// html5ever always synthesizes `<html>`, `<head>` and `<body>` around a
/// fragment, so [`body`] can be used on the result of any input. Handles
/// taken from the result are only populated while the returned `RcDom` is
/// alive.
pub fn parse_html(html: &str) -> RcDom {
    parse_document(RcDom::default(), Default::default()).one(html)
}

/// Find the `<body>` element of a parsed document
pub fn body(dom: &RcDom) -> Option<Handle> {
    find_element(&dom.document, "body")
}

/// Depth-first search for the first element with the given tag name
pub fn find_element(node: &Handle, name: &str) -> Option<Handle> {
    let mut stack = vec![node.clone()];
    while let Some(current) = stack.pop() {
        if tag_name(&current).is_some_and(|tag| tag.eq_ignore_ascii_case(name)) {
            return Some(current);
        }
        stack.extend(current.children.borrow().iter().rev().cloned());
    }
    None
}

/// Lower-case local tag name of an element, `None` for other node types
pub fn tag_name(node: &Handle) -> Option<String> {
    match &node.data {
        NodeData::Element { name, .. } => Some(str::to_ascii_lowercase(&name.local)),
        _ => None,
    }
}

/// Element children of a node, in document order
pub fn element_children(node: &Handle) -> Vec<Handle> {
    node.children
        .borrow()
        .iter()
        .filter(|child| matches!(child.data, NodeData::Element { .. }))
        .cloned()
        .collect()
}

/// All descendant elements with the given tag name, in document order
///
/// Matches nested elements too, the way `querySelectorAll` does.
pub fn descendants_named(node: &Handle, name: &str) -> Vec<Handle> {
    let mut out = Vec::new();
    let mut stack: Vec<Handle> = node.children.borrow().iter().rev().cloned().collect();
    while let Some(current) = stack.pop() {
        if tag_name(&current).is_some_and(|tag| tag == name) {
            out.push(current.clone());
        }
        stack.extend(current.children.borrow().iter().rev().cloned());
    }
    out
}

/// Concatenated text of all descendant text nodes (`textContent`)
pub fn text_content(node: &Handle) -> String {
    let mut out = String::new();
    let mut stack = vec![node.clone()];
    while let Some(current) = stack.pop() {
        match &current.data {
            NodeData::Text { contents } => out.push_str(&contents.borrow()),
            _ => stack.extend(current.children.borrow().iter().rev().cloned()),
        }
    }
    out
}

/// Serialize a node including its own tag (`outerHTML`)
///
/// Re-parsing the result and serializing the same element again yields the
/// same string.
pub fn outer_html(node: &Handle) -> String {
    let mut bytes = Vec::new();
    let opts = SerializeOpts {
        traversal_scope: TraversalScope::IncludeNode,
        ..SerializeOpts::default()
    };
    let mut serializer = MarkupSerializer::new(&mut bytes, opts.clone());
    if let Err(e) =
        SerializableHandle::from(node.clone()).serialize(&mut serializer, opts.traversal_scope)
    {
        log::warn!("Failed to serialize element: {}", e);
    }
    String::from_utf8_lossy(&bytes).into_owned()
}

/// html5ever's serializer, restoring the newline the parser strips after
/// `<pre>`, `<textarea>` and `<listing>`
struct MarkupSerializer<Wr: Write> {
    inner: HtmlSerializer<Wr>,
    after_newline_element: bool,
}

impl<Wr: Write> MarkupSerializer<Wr> {
    fn new(writer: Wr, opts: SerializeOpts) -> Self {
        Self {
            inner: HtmlSerializer::new(writer, opts),
            after_newline_element: false,
        }
    }
}

impl<Wr: Write> Serializer for MarkupSerializer<Wr> {
    fn start_elem<'a, AttrIter>(&mut self, name: QualName, attrs: AttrIter) -> io::Result<()>
    where
        AttrIter: Iterator<Item = AttrRef<'a>>,
    {
        self.after_newline_element = LEADING_NEWLINE_ELEMENTS.contains(&&*name.local);
        self.inner.start_elem(name, attrs)
    }

    fn end_elem(&mut self, name: QualName) -> io::Result<()> {
        self.after_newline_element = false;
        self.inner.end_elem(name)
    }

    fn write_text(&mut self, text: &str) -> io::Result<()> {
        if std::mem::take(&mut self.after_newline_element) && text.starts_with('\n') {
            self.inner.write_text("\n")?;
        }
        self.inner.write_text(text)
    }

    fn write_comment(&mut self, text: &str) -> io::Result<()> {
        self.after_newline_element = false;
        self.inner.write_comment(text)
    }

    fn write_doctype(&mut self, name: &str) -> io::Result<()> {
        self.after_newline_element = false;
        self.inner.write_doctype(name)
    }

    fn write_processing_instruction(&mut self, target: &str, data: &str) -> io::Result<()> {
        self.after_newline_element = false;
        self.inner.write_processing_instruction(target, data)
    }
}

/// Escape text for use between tags
pub fn escape_text(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

/// Escape text for use inside a double-quoted attribute value
pub fn escape_attr(text: &str) -> String {
    text.replace('&', "&amp;").replace('"', "&quot;")
}

/// Escape text for interpolation into arbitrary HTML positions
pub fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}
