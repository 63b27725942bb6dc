//! Values attached to document nodes while the IR is built.

use vxir_ir::{BlockId, CellId, DataTypeId, ExprId, FileId, InstanceId, ModuleId, Port, SensItem, VarId};

/// What a node produced. Parents read their children's payloads.
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    /// An expression or statement.
    Expr(ExprId),
    /// A block already attached to its module (`always`, `cfunc`).
    Process(BlockId),
    /// A variable declaration.
    Var(VarId),
    /// A data type declaration.
    DataType(DataTypeId),
    /// A file record.
    File(FileId),
    /// A module, set when the module opens.
    Module(ModuleId),
    /// A module instance.
    Instance(InstanceId),
    /// A port connection, owned by the enclosing instance once it closes.
    Port(Port),
    /// A hierarchy cell.
    Cell(CellId),
    /// One sensitivity item.
    Sens(SensItem),
    /// A sensitivity list.
    SensList(Vec<SensItem>),
}
