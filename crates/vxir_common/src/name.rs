//! Identifier sanitization.
//!
//! Verilator emits hierarchical and escaped names (`cpu.alu`, `mem[3]`,
//! `\bus$x `) that downstream code generators cannot use as identifiers.
//! Every name that enters the IR as a variable or reference name is mapped
//! through [`sanitize`], which replaces each character outside
//! `[A-Za-z0-9_]` with `$`.

/// Replacement for every character outside `[A-Za-z0-9_]`.
pub const REPLACEMENT: char = '$';

fn is_plain(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// Returns `name` with every character outside `[A-Za-z0-9_]` replaced by `$`.
///
/// The mapping is total and idempotent: `$` itself maps to `$`.
pub fn sanitize(name: &str) -> String {
    name.chars()
        .map(|c| if is_plain(c) { c } else { REPLACEMENT })
        .collect()
}

/// Returns `true` if [`sanitize`] would leave `name` unchanged.
pub fn is_sanitized(name: &str) -> bool {
    name.chars().all(|c| is_plain(c) || c == REPLACEMENT)
}
