//! The generic node type produced by the reader.

use std::collections::HashMap;

/// Tag of the `<?xml ...?>` declaration, which must be the document root.
pub const DECLARATION: &str = "?xml";

/// One element of the document.
///
/// `payload` holds whatever the visitor attached: first the value returned
/// by [`TreeVisitor::open`](crate::TreeVisitor::open), then the value
/// returned by [`TreeVisitor::close`](crate::TreeVisitor::close).
#[derive(Debug, Clone, PartialEq)]
pub struct Node<P> {
    /// Tag name as written (`module`, `var`, `?xml`).
    pub tag: String,
    /// Trimmed, unescaped text content, if any. Later text replaces earlier text.
    pub text: Option<String>,
    /// Unescaped attribute values by name.
    pub attrs: HashMap<String, String>,
    /// Closed children in document order.
    pub children: Vec<Node<P>>,
    /// The visitor's value for this node.
    pub payload: Option<P>,
    /// Byte offset of the opening `<`.
    pub offset: usize,
}

impl<P> Node<P> {
    /// Creates an element with no attributes, children, or payload.
    pub fn new(tag: impl Into<String>, offset: usize) -> Self {
        Self {
            tag: tag.into(),
            text: None,
            attrs: HashMap::new(),
            children: Vec::new(),
            payload: None,
            offset,
        }
    }

    /// Returns the value of attribute `name`.
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs.get(name).map(String::as_str)
    }

    /// Iterates over the children whose tag is `tag`.
    pub fn children_tagged<'a>(&'a self, tag: &'a str) -> impl Iterator<Item = &'a Node<P>> {
        self.children.iter().filter(move |c| c.tag == tag)
    }

    /// Returns `true` for the `<?xml ...?>` declaration node.
    pub fn is_declaration(&self) -> bool {
        self.tag == DECLARATION
    }
}
