//! Build errors.
//!
//! Every failure aborts the parse. A [`BuildError`] carries the failure kind
//! together with the tag and source position of the node being built when
//! it happened, if there was one.

use std::fmt;

use vxir_common::LiteralError;
use vxir_source::{LocError, SourceLoc};
use vxir_tree::TreeError;

/// What went wrong.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ErrorKind {
    /// The document is not structurally well formed.
    #[error(transparent)]
    Tree(#[from] TreeError),

    /// A tag with no construction rule.
    #[error("unknown tag <{0}>")]
    UnknownTag(String),

    /// A node has the wrong number of children.
    #[error("<{tag}> expected {expected} children, found {found}")]
    Arity {
        /// The node's tag.
        tag: String,
        /// Accepted child counts, e.g. `"2 or 3"`.
        expected: &'static str,
        /// Actual child count.
        found: usize,
    },

    /// A child did not produce the kind of value its parent needs.
    #[error("<{tag}> child {index} is not {expected}")]
    UnexpectedPayload {
        /// The parent's tag.
        tag: String,
        /// Position of the child.
        index: usize,
        /// What the parent needed.
        expected: &'static str,
    },

    /// A required attribute is absent.
    #[error("<{tag}> is missing attribute `{attr}`")]
    MissingAttr {
        /// The node's tag.
        tag: String,
        /// The attribute name.
        attr: &'static str,
    },

    /// An integer attribute does not parse.
    #[error("<{tag}> attribute `{attr}` is not an integer: \"{value}\"")]
    BadInt {
        /// The node's tag.
        tag: String,
        /// The attribute name.
        attr: &'static str,
        /// The attribute value.
        value: String,
    },

    /// A `const` name is not a sized hexadecimal literal.
    #[error(transparent)]
    Literal(#[from] LiteralError),

    /// A `loc` attribute is malformed.
    #[error(transparent)]
    Location(#[from] LocError),

    /// A sensitivity item's `edgeType` is not `POS` or `NEG`.
    #[error("edgeType must be POS or NEG, found \"{0}\"")]
    BadEdge(String),

    /// An extension to a width other than 32 bits.
    #[error("<{tag}> width {width} != 32")]
    ExtendWidth {
        /// `extend` or `extends`.
        tag: String,
        /// The `width` attribute.
        width: i64,
    },

    /// A `dtype_id` or `sub_dtype_id` names no registered type.
    #[error("unknown data type {key} for <{tag}>")]
    UnknownDataType {
        /// The referenced type key.
        key: String,
        /// The tag of the referencing node.
        tag: String,
    },

    /// A `basicdtype` names a base type that is neither built in nor registered.
    #[error("unknown data type {0}")]
    UnknownTypeName(String),

    /// An array range whose bounds are not both constants.
    #[error("could not parse constant exprs in array")]
    NonConstRange,

    /// An `instance` or `cell` names a module that was never defined.
    #[error("could not resolve module \"{name}\" for <{tag}>")]
    UnknownModule {
        /// The module name.
        name: String,
        /// The tag of the referencing node.
        tag: String,
    },

    /// A variable reference names no variable of its module.
    #[error("could not resolve variable \"{0}\"")]
    UnresolvedVariable(String),

    /// A tag that must appear inside a module appeared outside one.
    #[error("<{0}> outside of a module")]
    OutsideModule(String),

    /// A module started before the previous one ended.
    #[error("module \"{0}\" opened inside another module")]
    NestedModule(String),
}

/// A failed build, with the position of the offending node when known.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildError {
    /// What went wrong.
    pub kind: ErrorKind,
    /// Tag of the node being built.
    pub tag: Option<String>,
    /// Position of the node being built.
    pub loc: Option<SourceLoc>,
    /// File name of `loc`, resolved through the unit's file table.
    pub file: Option<String>,
}

impl BuildError {
    /// An error with no node context.
    pub fn new(kind: ErrorKind) -> Self {
        Self {
            kind,
            tag: None,
            loc: None,
            file: None,
        }
    }
}

impl fmt::Display for BuildError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.file, &self.loc) {
            (Some(file), Some(loc)) => write!(f, "{file}:{loc}: {}", self.kind),
            (None, Some(loc)) => write!(f, "{loc}: {}", self.kind),
            _ => write!(f, "{}", self.kind),
        }
    }
}

impl std::error::Error for BuildError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        std::error::Error::source(&self.kind)
    }
}

impl From<ErrorKind> for BuildError {
    fn from(kind: ErrorKind) -> Self {
        Self::new(kind)
    }
}

impl From<TreeError> for BuildError {
    fn from(err: TreeError) -> Self {
        Self::new(ErrorKind::Tree(err))
    }
}
