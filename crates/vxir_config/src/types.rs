//! Configuration data types deserialized from `vxir.toml`.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParserConfig {
    /// Builder switches.
    pub parser: ParserOptions,
    /// Logic types registered before the document is read, keyed by the
    /// name `dtype_id` attributes and `basicdtype` names refer to them by.
    pub types: BTreeMap<String, BuiltinType>,
}

/// Optional builder behaviour, all off by default.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParserOptions {
    /// Point each variable reference at the variable of the same name in its
    /// enclosing module once every other reference is resolved.
    pub resolve_varrefs: bool,
    /// Keep the signal expression of each sensitivity item.
    pub sensitivity_operands: bool,
}

/// A pre-registered `[left:right]` logic type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuiltinType {
    /// Left bound.
    pub left: i64,
    /// Right bound.
    #[serde(default)]
    pub right: i64,
}
