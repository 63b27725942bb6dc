//! Typed ids for IR entities.
//!
//! Each id is a `u32` slot index into one of the [`Unit`](crate::Unit)'s
//! arenas. [`FileId`] is defined in `vxir_source` so that source locations
//! can name files without depending on the IR.

use crate::arena::ArenaId;
use serde::{Deserialize, Serialize};
use vxir_source::FileId;

macro_rules! define_id {
    ($($(#[$meta:meta])* $name:ident;)*) => {$(
        $(#[$meta])*
        #[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
        pub struct $name(u32);

        impl ArenaId for $name {
            fn from_raw(index: u32) -> Self {
                Self(index)
            }

            fn as_raw(self) -> u32 {
                self.0
            }
        }
    )*};
}

define_id! {
    /// Id of a [`DataType`](crate::DataType).
    DataTypeId;
    /// Id of an [`Expr`](crate::Expr).
    ExprId;
    /// Id of a [`Block`](crate::Block).
    BlockId;
    /// Id of a [`Variable`](crate::Variable).
    VarId;
    /// Id of a [`Module`](crate::Module).
    ModuleId;
    /// Id of an [`Instance`](crate::Instance).
    InstanceId;
    /// Id of a [`HierCell`](crate::HierCell).
    CellId;
}

impl ArenaId for FileId {
    fn from_raw(index: u32) -> Self {
        FileId::from_raw(index)
    }

    fn as_raw(self) -> u32 {
        FileId::as_raw(self)
    }
}
