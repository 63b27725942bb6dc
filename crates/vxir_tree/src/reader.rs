//! The tag scanner and visitor protocol.
//!
//! The scanner walks the document bytes once, keeping a stack of open
//! elements. Comments and `<!...>` markup are skipped; text between tags is
//! trimmed and attached to the innermost open element.

use std::borrow::Cow;

use crate::error::TreeError;
use crate::node::{Node, DECLARATION};

/// Callbacks invoked while a document is read.
pub trait TreeVisitor {
    /// The value attached to each node.
    type Payload;
    /// The error type; structural errors convert into it.
    type Error: From<TreeError>;

    /// Called when a start tag has been read, before any children.
    fn open(&mut self, node: &Node<Self::Payload>) -> Result<Option<Self::Payload>, Self::Error> {
        let _ = node;
        Ok(None)
    }

    /// Called when a node's end tag has been read, after all of its children
    /// were closed. The returned value replaces the node's payload.
    fn close(&mut self, node: &Node<Self::Payload>) -> Result<Option<Self::Payload>, Self::Error>;
}

/// Reads `source`, driving `visitor`, and returns the declaration root.
pub fn read_tree<V: TreeVisitor>(
    source: &str,
    visitor: &mut V,
) -> Result<Node<V::Payload>, V::Error> {
    let reader = Reader {
        source,
        pos: 0,
        stack: Vec::new(),
    };
    reader.run(visitor)
}

/// Reads `source` into a bare tree with no payloads.
pub fn read_plain(source: &str) -> Result<Node<()>, TreeError> {
    struct Plain;

    impl TreeVisitor for Plain {
        type Payload = ();
        type Error = TreeError;

        fn close(&mut self, _node: &Node<()>) -> Result<Option<()>, TreeError> {
            Ok(None)
        }
    }

    read_tree(source, &mut Plain)
}

/// Replaces the five predefined XML entities. Unknown entities are kept as-is.
pub fn unescape(text: &str) -> Cow<'_, str> {
    if !text.contains('&') {
        return Cow::Borrowed(text);
    }
    const ENTITIES: [(&str, char); 5] = [
        ("&amp;", '&'),
        ("&lt;", '<'),
        ("&gt;", '>'),
        ("&quot;", '"'),
        ("&apos;", '\''),
    ];
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        rest = &rest[amp..];
        match ENTITIES.iter().find(|(entity, _)| rest.starts_with(entity)) {
            Some((entity, c)) => {
                out.push(*c);
                rest = &rest[entity.len()..];
            }
            None => {
                out.push('&');
                rest = &rest[1..];
            }
        }
    }
    out.push_str(rest);
    Cow::Owned(out)
}

fn is_name_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || matches!(b, b'_' | b'-' | b':' | b'.')
}

struct Reader<'a, P> {
    source: &'a str,
    pos: usize,
    stack: Vec<Node<P>>,
}

impl<'a, P> Reader<'a, P> {
    fn run<V>(mut self, visitor: &mut V) -> Result<Node<P>, V::Error>
    where
        V: TreeVisitor<Payload = P>,
    {
        while self.pos < self.source.len() {
            let rest = self.rest();
            if rest.starts_with("<!--") {
                self.skip_past("-->")?;
            } else if rest.starts_with("<!") {
                self.skip_past(">")?;
            } else if rest.starts_with("</") {
                let start = self.pos;
                let name = self.close_tag()?;
                self.close_top(Some(name), start, visitor)?;
            } else if rest.starts_with('<') {
                self.open_tag(visitor)?;
            } else {
                self.text()?;
            }
        }
        Ok(self.finish()?)
    }

    fn rest(&self) -> &'a str {
        &self.source[self.pos..]
    }

    fn peek(&self) -> Option<u8> {
        self.source.as_bytes().get(self.pos).copied()
    }

    fn peek_at(&self, offset: usize) -> Option<u8> {
        self.source.as_bytes().get(self.pos + offset).copied()
    }

    fn line_at(&self, offset: usize) -> usize {
        self.source[..offset].bytes().filter(|&b| b == b'\n').count() + 1
    }

    fn malformed(&self, message: impl Into<String>, offset: usize) -> TreeError {
        TreeError::Malformed {
            message: message.into(),
            line: self.line_at(offset),
        }
    }

    fn skip_whitespace(&mut self) {
        while self.peek().is_some_and(|b| b.is_ascii_whitespace()) {
            self.pos += 1;
        }
    }

    fn skip_past(&mut self, terminator: &str) -> Result<(), TreeError> {
        let start = self.pos;
        match self.rest().find(terminator) {
            Some(idx) => {
                self.pos += idx + terminator.len();
                Ok(())
            }
            None => Err(self.malformed(format!("unterminated markup, expected `{terminator}`"), start)),
        }
    }

    /// Reads a tag or attribute name. `?` is accepted only as the first byte.
    fn name(&mut self) -> &'a str {
        let start = self.pos;
        if self.peek() == Some(b'?') {
            self.pos += 1;
        }
        while self.peek().is_some_and(is_name_byte) {
            self.pos += 1;
        }
        &self.source[start..self.pos]
    }

    fn open_tag<V>(&mut self, visitor: &mut V) -> Result<(), V::Error>
    where
        V: TreeVisitor<Payload = P>,
    {
        let start = self.pos;
        self.pos += 1;
        let tag = self.name();
        if tag.is_empty() || tag == "?" {
            return Err(self.malformed("expected a tag name after `<`", start).into());
        }

        let mut node = Node::new(tag, start);
        let self_closing = loop {
            self.skip_whitespace();
            match (self.peek(), self.peek_at(1)) {
                (None, _) => return Err(self.malformed(format!("unterminated tag <{tag}>"), start).into()),
                (Some(b'>'), _) => {
                    self.pos += 1;
                    break false;
                }
                (Some(b'/'), Some(b'>')) => {
                    self.pos += 2;
                    break true;
                }
                (Some(b'?'), Some(b'>')) => {
                    self.pos += 2;
                    break false;
                }
                _ => {
                    let (name, value) = self.attribute(tag)?;
                    node.attrs.insert(name.to_string(), value);
                }
            }
        };

        node.payload = visitor.open(&node)?;
        self.stack.push(node);
        if self_closing {
            self.close_top(None, start, visitor)?;
        }
        Ok(())
    }

    fn attribute(&mut self, tag: &str) -> Result<(&'a str, String), TreeError> {
        let start = self.pos;
        let name = self.name();
        if name.is_empty() || name.starts_with('?') {
            return Err(self.malformed(format!("unexpected character in <{tag}>"), start));
        }
        self.skip_whitespace();
        if self.peek() != Some(b'=') {
            return Err(self.malformed(format!("expected `=` after attribute `{name}`"), start));
        }
        self.pos += 1;
        self.skip_whitespace();
        let quote = match self.peek() {
            Some(q @ (b'"' | b'\'')) => q,
            _ => return Err(self.malformed(format!("expected a quoted value for `{name}`"), start)),
        };
        self.pos += 1;
        let value_start = self.pos;
        let Some(len) = self.rest().bytes().position(|b| b == quote) else {
            return Err(self.malformed(format!("unterminated value for `{name}`"), start));
        };
        let value = unescape(&self.source[value_start..value_start + len]).into_owned();
        self.pos = value_start + len + 1;
        Ok((name, value))
    }

    fn close_tag(&mut self) -> Result<&'a str, TreeError> {
        let start = self.pos;
        self.pos += 2;
        let name = self.name();
        self.skip_whitespace();
        if name.is_empty() || self.peek() != Some(b'>') {
            return Err(self.malformed("malformed close tag", start));
        }
        self.pos += 1;
        Ok(name)
    }

    /// Pops the innermost element, runs the close hook, and attaches the node
    /// to its parent. `name` is `None` for self-closing tags.
    fn close_top<V>(&mut self, name: Option<&str>, start: usize, visitor: &mut V) -> Result<(), V::Error>
    where
        V: TreeVisitor<Payload = P>,
    {
        let line = self.line_at(start);
        let Some(mut node) = self.stack.pop() else {
            return Err(TreeError::UnexpectedClose {
                tag: name.unwrap_or_default().to_string(),
                line,
            }
            .into());
        };
        if let Some(name) = name {
            if node.tag != name {
                return Err(TreeError::MismatchedClose {
                    open: node.tag,
                    close: name.to_string(),
                    line,
                }
                .into());
            }
        }
        if self.stack.is_empty() {
            return Err(TreeError::UnexpectedClose { tag: node.tag, line }.into());
        }

        node.payload = visitor.close(&node)?;
        if let Some(parent) = self.stack.last_mut() {
            parent.children.push(node);
        }
        Ok(())
    }

    fn text(&mut self) -> Result<(), TreeError> {
        let start = self.pos;
        let len = self.rest().find('<').unwrap_or(self.rest().len());
        self.pos += len;
        let raw = self.source[start..self.pos].trim();
        if raw.is_empty() {
            return Ok(());
        }
        match self.stack.last_mut() {
            Some(top) => {
                top.text = Some(unescape(raw).into_owned());
                Ok(())
            }
            None => Err(self.malformed("text outside of any element", start)),
        }
    }

    fn finish(mut self) -> Result<Node<P>, TreeError> {
        if self.stack.len() > 1 {
            return Err(TreeError::Unclosed {
                open: self.stack.drain(1..).map(|n| n.tag).collect(),
            });
        }
        let root = self.stack.pop().ok_or(TreeError::Empty)?;
        if root.tag != DECLARATION {
            return Err(TreeError::MissingDeclaration { found: root.tag });
        }
        Ok(root)
    }
}
