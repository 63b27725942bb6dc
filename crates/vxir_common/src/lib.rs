//! Shared foundational types for the vxir front-end.
//!
//! This crate provides interned identifiers, the name sanitization rule
//! applied to every HDL identifier that enters the IR, and the parser for
//! Verilator's sized hexadecimal constant literals.

#![warn(missing_docs)]

pub mod ident;
pub mod literal;
pub mod name;

pub use ident::{Ident, Interner};
pub use literal::{parse_hex_literal, ConstValue, LiteralError};
pub use name::{is_sanitized, sanitize};
