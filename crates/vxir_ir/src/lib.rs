//! The vxir intermediate representation.
//!
//! A [`Unit`] is the result of reading one Verilator XML dump: arenas holding
//! every file record, data type, expression, block, variable, module,
//! instance and hierarchy cell, plus the string-keyed registries downstream
//! code generators look things up in. Entities refer to each other by the
//! typed ids in [`ids`].

#![warn(missing_docs)]

pub mod arena;
pub mod expr;
pub mod file;
pub mod hierarchy;
pub mod ids;
pub mod module;
pub mod types;
pub mod unit;

pub use arena::{Arena, ArenaId};
pub use expr::{
    BinaryOp, Block, BlockKind, Constant, Edge, Expr, ExtendOp, SensItem, TernaryOp, UnaryOp,
    VarRef,
};
pub use file::SourceFile;
pub use hierarchy::HierCell;
pub use ids::{BlockId, CellId, DataTypeId, ExprId, InstanceId, ModuleId, VarId};
pub use module::{Instance, Module, Port, Variable};
pub use types::{DataType, LogicType};
pub use unit::Unit;
pub use vxir_source::{FileId, SourceLoc};
