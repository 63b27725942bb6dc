//! File records from the document's file tables.

use serde::{Deserialize, Serialize};

/// One entry of the document's `files` or `module_files` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceFile {
    /// The key used by `loc` attributes (`a`, `b`, ...).
    pub key: String,
    /// Path of the source file as recorded by Verilator.
    pub filename: String,
    /// Set when the file is listed under `module_files`, i.e. it holds
    /// design modules rather than built-ins or includes.
    pub is_module: bool,
}
