//! Parsing of Verilator constant names.
//!
//! Verilator names every `const` node after its value, e.g. `32'h0000002a`
//! or `8'sh1f`. Only the hexadecimal form is accepted: the width and the
//! optional signedness marker are checked syntactically and then dropped.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Number of hex digits per storage word.
const DIGITS_PER_WORD: usize = 16;

/// The magnitude of a constant literal, of any width.
///
/// Stored as little-endian `u64` words with high zero words trimmed, so two
/// literals with the same magnitude compare equal whatever their width.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ConstValue {
    words: Vec<u64>,
}

impl ConstValue {
    /// A value that fits in one word.
    pub fn from_u64(value: u64) -> Self {
        Self { words: vec![value] }
    }

    /// The storage words, least significant first. Never empty.
    pub fn words(&self) -> &[u64] {
        &self.words
    }

    /// The value as a `u64`, if it fits.
    pub fn to_u64(&self) -> Option<u64> {
        match self.words.as_slice() {
            [word] => Some(*word),
            _ => None,
        }
    }

    /// Number of significant bits; zero for a zero value.
    pub fn bit_len(&self) -> u32 {
        match self.words.iter().rposition(|&w| w != 0) {
            Some(top) => top as u32 * 64 + (64 - self.words[top].leading_zeros()),
            None => 0,
        }
    }

    fn trimmed(mut words: Vec<u64>) -> Self {
        while words.len() > 1 && words.last() == Some(&0) {
            words.pop();
        }
        if words.is_empty() {
            words.push(0);
        }
        Self { words }
    }
}

impl From<u64> for ConstValue {
    fn from(value: u64) -> Self {
        Self::from_u64(value)
    }
}

/// Decimal when the value fits in 64 bits, `0x`-prefixed hex otherwise.
impl fmt::Display for ConstValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(value) = self.to_u64() {
            return write!(f, "{value}");
        }
        let mut words = self.words.iter().rev();
        if let Some(high) = words.next() {
            write!(f, "0x{high:x}")?;
        }
        for word in words {
            write!(f, "{word:016x}")?;
        }
        Ok(())
    }
}

/// Errors from [`parse_hex_literal`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LiteralError {
    /// The text is not of the form `<width>'[s]h<hexdigits>`.
    #[error("could not parse constant \"{0}\"")]
    Malformed(String),
}

/// Parses `<width>'[s]h<hexdigits>` and returns the hexadecimal magnitude.
///
/// `s` and `h` are case-insensitive. Any other base (`'b`, `'d`, `'o`),
/// an unsized literal, or trailing text is rejected. The magnitude is not
/// limited by the width or by 64 bits.
pub fn parse_hex_literal(text: &str) -> Result<ConstValue, LiteralError> {
    let malformed = || LiteralError::Malformed(text.to_string());

    let (width, rest) = text.split_once('\'').ok_or_else(malformed)?;
    if width.is_empty() || !width.bytes().all(|b| b.is_ascii_digit()) {
        return Err(malformed());
    }

    let rest = rest.strip_prefix(|c: char| c == 's' || c == 'S').unwrap_or(rest);
    let digits = rest
        .strip_prefix(|c: char| c == 'h' || c == 'H')
        .ok_or_else(malformed)?;
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(malformed());
    }

    let mut words = Vec::with_capacity(digits.len().div_ceil(DIGITS_PER_WORD));
    let mut end = digits.len();
    while end > 0 {
        let start = end.saturating_sub(DIGITS_PER_WORD);
        let word = u64::from_str_radix(&digits[start..end], 16).map_err(|_| malformed())?;
        words.push(word);
        end = start;
    }
    Ok(ConstValue::trimmed(words))
}
