//! Generic tag-tree reader for Verilator's XML netlist dump.
//!
//! The reader turns document text into a tree of [`Node`]s without
//! interpreting tag semantics. A [`TreeVisitor`] receives an `open` call when
//! each tag starts and a `close` call once all of its children are closed;
//! the value returned by `close` becomes the node's payload, so a parent's
//! `close` sees every child already built.
//!
//! The document must consist of a `<?xml ...?>` declaration, which stays
//! open as the root, followed by balanced elements.

#![warn(missing_docs)]

pub mod error;
pub mod node;
pub mod reader;

pub use error::TreeError;
pub use node::{Node, DECLARATION};
pub use reader::{read_plain, read_tree, unescape, TreeVisitor};
