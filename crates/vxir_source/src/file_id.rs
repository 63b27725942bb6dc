//! Opaque handle for a file record registered during a parse.

use serde::{Deserialize, Serialize};

/// Handle for a file record in the IR's file table.
///
/// Each `file` node of the document yields one record; its `FileId` is what
/// [`SourceLoc`](crate::SourceLoc) stores instead of the raw file key.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub struct FileId(u32);

impl FileId {
    /// Creates a `FileId` from a raw index.
    pub fn from_raw(raw: u32) -> Self {
        Self(raw)
    }

    /// Returns the raw index.
    pub fn as_raw(self) -> u32 {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn raw_roundtrip() {
        assert_eq!(FileId::from_raw(3).as_raw(), 3);
    }

    #[test]
    fn serde_as_number() {
        let json = serde_json::to_string(&FileId::from_raw(5)).unwrap();
        assert_eq!(json, "5");
    }
}
