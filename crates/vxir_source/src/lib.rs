//! Source positions carried by IR entities.
//!
//! Verilator annotates nodes with a `loc="<file>,<line>,<col>,<end_line>,<end_col>"`
//! attribute whose file component is a key into the document's file table.
//! This crate provides the [`FileId`] handle for resolved file records, the
//! [`SourceLoc`] value stored on IR entities, and [`RawLoc`] for splitting the
//! attribute before its file key is resolved.

#![warn(missing_docs)]

pub mod file_id;
pub mod location;

pub use file_id::FileId;
pub use location::{LocError, RawLoc, SourceLoc};
