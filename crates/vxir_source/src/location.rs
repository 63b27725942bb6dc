//! Line/column locations and the `loc` attribute format.

use std::fmt;

use crate::file_id::FileId;
use serde::{Deserialize, Serialize};

/// Errors from splitting a `loc` attribute.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LocError {
    /// Fewer than three comma-separated fields.
    #[error("malformed location \"{0}\"")]
    Malformed(String),

    /// The line or column field is not an unsigned integer.
    #[error("invalid {field} in location \"{text}\"")]
    BadNumber {
        /// Which field failed (`line` or `column`).
        field: &'static str,
        /// The whole attribute value.
        text: String,
    },
}

/// A `loc` attribute split into its file key and start position.
///
/// The end line and end column fields are not read: the IR stores the start
/// position in both slots of [`SourceLoc`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawLoc<'a> {
    /// The file key, resolved against the file table by the caller.
    pub file_key: &'a str,
    /// 1-based start line.
    pub line: u32,
    /// 1-based start column.
    pub col: u32,
}

impl<'a> RawLoc<'a> {
    /// Splits `text` (`"<file>,<line>,<col>[,...]"`).
    pub fn parse(text: &'a str) -> Result<Self, LocError> {
        let mut fields = text.split(',');
        let (Some(file_key), Some(line), Some(col)) = (fields.next(), fields.next(), fields.next())
        else {
            return Err(LocError::Malformed(text.to_string()));
        };
        let number = |field: &'static str, value: &str| {
            value.trim().parse::<u32>().map_err(|_| LocError::BadNumber {
                field,
                text: text.to_string(),
            })
        };
        Ok(Self {
            file_key,
            line: number("line", line)?,
            col: number("column", col)?,
        })
    }
}

/// A source position attached to an IR entity.
///
/// `end_line`/`end_col` always equal `line`/`col`; the document carries an
/// end position but it is not read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SourceLoc {
    /// The file record, if the file key was registered when the node was built.
    pub file: Option<FileId>,
    /// 1-based line.
    pub line: u32,
    /// 1-based column.
    pub col: u32,
    /// Same as `line`.
    pub end_line: u32,
    /// Same as `col`.
    pub end_col: u32,
}

impl SourceLoc {
    /// Creates a location whose end position duplicates the start.
    pub fn new(file: Option<FileId>, line: u32, col: u32) -> Self {
        Self {
            file,
            line,
            col,
            end_line: line,
            end_col: col,
        }
    }
}

impl fmt::Display for SourceLoc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.col)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_full_attribute() {
        let raw = RawLoc::parse("e,12,5,12,18").unwrap();
        assert_eq!(raw.file_key, "e");
        assert_eq!(raw.line, 12);
        assert_eq!(raw.col, 5);
    }

    #[test]
    fn end_fields_are_optional() {
        let raw = RawLoc::parse("a,1,1").unwrap();
        assert_eq!((raw.line, raw.col), (1, 1));
    }

    #[test]
    fn too_few_fields() {
        assert_eq!(
            RawLoc::parse("e,12"),
            Err(LocError::Malformed("e,12".to_string()))
        );
    }

    #[test]
    fn non_numeric_line() {
        let err = RawLoc::parse("e,x,5,12,18").unwrap_err();
        assert!(matches!(err, LocError::BadNumber { field: "line", .. }));
        assert!(err.to_string().contains("e,x,5,12,18"));
    }

    #[test]
    fn end_duplicates_start() {
        let loc = SourceLoc::new(Some(FileId::from_raw(0)), 7, 3);
        assert_eq!(loc.end_line, 7);
        assert_eq!(loc.end_col, 3);
        assert_eq!(loc.to_string(), "7:3");
    }
}
