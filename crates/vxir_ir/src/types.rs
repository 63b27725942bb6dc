//! Data types referenced by `dtype_id` attributes.

use crate::ids::{DataTypeId, ExprId};
use serde::{Deserialize, Serialize};
use vxir_source::SourceLoc;

/// A packed bit vector `[left:right]`.
///
/// `left >= right` is not enforced; a reversed range is stored as written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogicType {
    /// Left (usually most significant) bound.
    pub left: i64,
    /// Right (usually least significant) bound.
    pub right: i64,
}

impl LogicType {
    /// Number of bits covered by the range, regardless of its direction.
    ///
    /// Saturates at `u64::MAX` for the full `i64` range.
    pub fn width(&self) -> u64 {
        self.left.abs_diff(self.right).saturating_add(1)
    }

    /// Returns `true` if `left < right`.
    pub fn is_ascending(&self) -> bool {
        self.left < self.right
    }
}

/// A data type in the unit's type table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum DataType {
    /// `logic`, `bit` or `integer` with a bit range.
    Logic {
        /// The bit range.
        range: LogicType,
        /// Where the type was declared, if known.
        loc: Option<SourceLoc>,
    },
    /// A scalar with no further structure, named by its host type (`string`).
    Native {
        /// The host type name.
        name: String,
        /// Where the type was declared, if known.
        loc: Option<SourceLoc>,
    },
    /// An unpacked array of `subtype` indexed `low..high`.
    UnpackedArray {
        /// The element type, filled in by deferred resolution.
        subtype: Option<DataTypeId>,
        /// The constant expression of the range's left bound.
        low: ExprId,
        /// The constant expression of the range's right bound.
        high: ExprId,
        /// Where the type was declared, if known.
        loc: Option<SourceLoc>,
    },
}

impl DataType {
    /// A logic type with no source location.
    pub fn logic(left: i64, right: i64) -> Self {
        DataType::Logic {
            range: LogicType { left, right },
            loc: None,
        }
    }

    /// Returns the bit range of a logic type.
    pub fn as_logic(&self) -> Option<LogicType> {
        match self {
            DataType::Logic { range, .. } => Some(*range),
            _ => None,
        }
    }

    /// Where the type was declared, if known.
    pub fn loc(&self) -> Option<SourceLoc> {
        match self {
            DataType::Logic { loc, .. }
            | DataType::Native { loc, .. }
            | DataType::UnpackedArray { loc, .. } => *loc,
        }
    }
}
