//! Expressions, statement blocks and sensitivity items.
//!
//! Verilator does not distinguish statements from expressions in its dump,
//! and neither does the IR: an assignment is a [`BinaryOp`] node and a
//! `begin` group is an [`Expr::Block`]. Operands are [`ExprId`]s into the
//! unit's expression arena.

use crate::ids::{BlockId, DataTypeId, ExprId, VarId};
use serde::{Deserialize, Serialize};
use vxir_common::{ConstValue, Ident};
use vxir_source::SourceLoc;

macro_rules! tagged_kind {
    (
        $(#[$meta:meta])*
        $name:ident {
            $($(#[$vmeta:meta])* $variant:ident => $tag:literal,)*
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $($(#[$vmeta])* $variant,)*
        }

        impl $name {
            /// Every variant, in declaration order.
            pub const ALL: &'static [$name] = &[$($name::$variant,)*];

            /// The tag name this kind is read from.
            pub fn tag(self) -> &'static str {
                match self {
                    $($name::$variant => $tag,)*
                }
            }
        }
    };
}

tagged_kind! {
    /// Single-operand operators.
    UnaryOp {
        /// Bitwise NOT.
        Not => "not",
        /// Arithmetic negation.
        Negate => "negate",
        /// Reduction AND.
        RedAnd => "redand",
        /// Reduction OR.
        RedOr => "redor",
        /// Reduction XOR.
        RedXor => "redxor",
        /// `initial` statement wrapper.
        Initial => "initial",
        /// C-level cast.
        CCast => "ccast",
        /// Variable reset at power-up.
        CReset => "creset",
        /// Function return.
        CReturn => "creturn",
    }
}

tagged_kind! {
    /// Width extension operators.
    ExtendOp {
        /// Zero extension.
        Extend => "extend",
        /// Sign extension.
        ExtendS => "extends",
    }
}

tagged_kind! {
    /// Two-operand operators, including every assignment form.
    BinaryOp {
        /// Continuous assignment.
        ContAssign => "contassign",
        /// Non-blocking assignment.
        AssignDly => "assigndly",
        /// Pre-scheduled assignment.
        AssignPre => "assignpre",
        /// Post-scheduled assignment.
        AssignPost => "assignpost",
        /// Blocking assignment.
        Assign => "assign",
        /// Array element select.
        ArraySel => "arraysel",
        /// Word select within a wide value.
        WordSel => "wordsel",
        /// Equality.
        Eq => "eq",
        /// Inequality.
        Neq => "neq",
        /// Unsigned less-or-equal.
        Lte => "lte",
        /// Unsigned greater-or-equal.
        Gte => "gte",
        /// Unsigned less-than.
        Lt => "lt",
        /// Unsigned greater-than.
        Gt => "gt",
        /// Bitwise AND.
        And => "and",
        /// Bitwise OR.
        Or => "or",
        /// Bitwise XOR.
        Xor => "xor",
        /// Addition.
        Add => "add",
        /// Subtraction.
        Sub => "sub",
        /// Concatenation.
        Concat => "concat",
        /// Left shift.
        ShiftL => "shiftl",
        /// Logical right shift.
        ShiftR => "shiftr",
        /// Unsigned multiplication.
        Mul => "mul",
        /// Unsigned division.
        Div => "div",
        /// Unsigned modulus.
        ModDiv => "moddiv",
        /// Signed multiplication.
        MulS => "muls",
        /// Signed division.
        DivS => "divs",
        /// Signed modulus.
        ModDivS => "moddivs",
        /// Signed greater-than.
        GtS => "gts",
        /// Signed less-than.
        LtS => "lts",
        /// Signed greater-or-equal.
        GteS => "gtes",
        /// Signed less-or-equal.
        LteS => "ltes",
        /// Array range bounds.
        Range => "range",
        /// Change detection between a value and its previous copy.
        ChangeDet => "changedet",
    }
}

tagged_kind! {
    /// Three-operand selection operators.
    TernaryOp {
        /// `cond ? lhs : rhs`.
        Cond => "cond",
        /// Conditional with bounds check.
        CondBound => "condbound",
        /// Bit-field select.
        Sel => "sel",
    }
}

tagged_kind! {
    /// What produced a [`Block`].
    BlockKind {
        /// A `begin`/`end` group.
        Begin => "begin",
        /// An initial-value array for a variable.
        InitArray => "initarray",
        /// A generated C function body.
        CFunc => "cfunc",
        /// Formatted-output arguments.
        SFormatF => "sformatf",
        /// An `always` process.
        Always => "always",
        /// Statements written directly inside a module.
        Module => "module",
    }
}

tagged_kind! {
    /// Clock edge of a sensitivity item.
    Edge {
        /// Rising edge.
        Pos => "POS",
        /// Falling edge.
        Neg => "NEG",
    }
}

impl Edge {
    /// Parses an `edgeType` attribute. Only `POS` and `NEG` are accepted.
    pub fn from_attr(value: &str) -> Option<Self> {
        Edge::ALL.iter().copied().find(|e| e.tag() == value)
    }
}

/// A literal value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Constant {
    /// The hexadecimal magnitude of the literal.
    pub value: ConstValue,
    /// Filled in by deferred resolution when the node has a `dtype_id`.
    pub dtype: Option<DataTypeId>,
    /// Source position.
    pub loc: Option<SourceLoc>,
}

/// A use of a variable by name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VarRef {
    /// Sanitized variable name.
    pub name: Ident,
    /// Filled in by deferred resolution when the node has a `dtype_id`.
    pub dtype: Option<DataTypeId>,
    /// The variable in the enclosing module. Only set when the builder is
    /// configured to resolve references.
    pub var: Option<VarId>,
    /// Source position.
    pub loc: Option<SourceLoc>,
}

/// One entry of a sensitivity list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SensItem {
    /// The triggering edge.
    pub edge: Edge,
    /// The signal the edge applies to. Unset unless the builder is
    /// configured to capture it.
    pub expr: Option<ExprId>,
    /// Source position.
    pub loc: Option<SourceLoc>,
}

/// An ordered group of expressions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Block {
    /// The tag that produced the block.
    pub kind: BlockKind,
    /// The block's `name` attribute, if any.
    pub name: Option<Ident>,
    /// Sensitivity list of an `always` block with an explicit one.
    pub senses: Option<Vec<SensItem>>,
    /// Member expressions in document order.
    pub exprs: Vec<ExprId>,
    /// Source position.
    pub loc: Option<SourceLoc>,
}

/// An expression node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Expr {
    /// A literal.
    Const(Constant),
    /// A variable use.
    VarRef(VarRef),
    /// A variable declared inside a block, such as a function local.
    Decl(VarId),
    /// A single-operand operation.
    Unary {
        /// The operator.
        op: UnaryOp,
        /// The operand.
        operand: ExprId,
        /// Result type, if the node named one.
        dtype: Option<DataTypeId>,
        /// Source position.
        loc: Option<SourceLoc>,
    },
    /// A width extension to 32 bits.
    Extend {
        /// Zero or sign extension.
        op: ExtendOp,
        /// The operand.
        operand: ExprId,
        /// Target width; always 32.
        width: u32,
        /// Minimum width of the operand.
        width_min: u32,
        /// Result type, if the node named one.
        dtype: Option<DataTypeId>,
        /// Source position.
        loc: Option<SourceLoc>,
    },
    /// A two-operand operation or assignment (`lhs` is the value, `rhs` the
    /// target for assignments, as Verilator orders them).
    Binary {
        /// The operator.
        op: BinaryOp,
        /// First operand.
        lhs: ExprId,
        /// Second operand.
        rhs: ExprId,
        /// Result type, if the node named one.
        dtype: Option<DataTypeId>,
        /// Source position.
        loc: Option<SourceLoc>,
    },
    /// An `if` statement.
    If {
        /// The condition.
        cond: ExprId,
        /// Taken when the condition holds.
        then_branch: ExprId,
        /// Taken otherwise.
        else_branch: Option<ExprId>,
        /// Source position.
        loc: Option<SourceLoc>,
    },
    /// A three-operand selection.
    Ternary {
        /// The operator.
        op: TernaryOp,
        /// Condition or selector.
        cond: ExprId,
        /// Second operand.
        lhs: ExprId,
        /// Third operand.
        rhs: ExprId,
        /// Result type, if the node named one.
        dtype: Option<DataTypeId>,
        /// Source position.
        loc: Option<SourceLoc>,
    },
    /// A `while` loop; `for` loops arrive in this form too.
    Loop {
        /// Statements run once before the loop.
        precond: ExprId,
        /// The loop condition.
        cond: ExprId,
        /// The loop body.
        body: Option<ExprId>,
        /// Statements run after each iteration.
        incr: Option<ExprId>,
        /// Source position.
        loc: Option<SourceLoc>,
    },
    /// A call of a generated function or a system task.
    Call {
        /// Function name; system tasks are named `$<tag>`.
        func: Ident,
        /// Arguments in order.
        args: Vec<ExprId>,
        /// Source position.
        loc: Option<SourceLoc>,
    },
    /// A nested block.
    Block(BlockId),
    /// One element of an initial-value array.
    ArrayItem {
        /// Element index.
        index: u32,
        /// Element value.
        value: ExprId,
    },
}

impl Expr {
    /// The data type slot of this node, if it has one and it is set.
    pub fn dtype(&self) -> Option<DataTypeId> {
        match self {
            Expr::Const(c) => c.dtype,
            Expr::VarRef(r) => r.dtype,
            Expr::Unary { dtype, .. }
            | Expr::Extend { dtype, .. }
            | Expr::Binary { dtype, .. }
            | Expr::Ternary { dtype, .. } => *dtype,
            Expr::Decl(_)
            | Expr::If { .. }
            | Expr::Loop { .. }
            | Expr::Call { .. }
            | Expr::Block(_)
            | Expr::ArrayItem { .. } => None,
        }
    }

    /// Fills the data type slot. Returns `false` for nodes without one.
    pub fn set_dtype(&mut self, id: DataTypeId) -> bool {
        let slot = match self {
            Expr::Const(c) => &mut c.dtype,
            Expr::VarRef(r) => &mut r.dtype,
            Expr::Unary { dtype, .. }
            | Expr::Extend { dtype, .. }
            | Expr::Binary { dtype, .. }
            | Expr::Ternary { dtype, .. } => dtype,
            Expr::Decl(_)
            | Expr::If { .. }
            | Expr::Loop { .. }
            | Expr::Call { .. }
            | Expr::Block(_)
            | Expr::ArrayItem { .. } => return false,
        };
        *slot = Some(id);
        true
    }

    /// Source position, for nodes that carry one directly.
    pub fn loc(&self) -> Option<SourceLoc> {
        match self {
            Expr::Const(c) => c.loc,
            Expr::VarRef(r) => r.loc,
            Expr::Unary { loc, .. }
            | Expr::Extend { loc, .. }
            | Expr::Binary { loc, .. }
            | Expr::If { loc, .. }
            | Expr::Ternary { loc, .. }
            | Expr::Loop { loc, .. }
            | Expr::Call { loc, .. } => *loc,
            Expr::Decl(_) | Expr::Block(_) | Expr::ArrayItem { .. } => None,
        }
    }

    /// Returns `true` for literals.
    pub fn is_const(&self) -> bool {
        matches!(self, Expr::Const(_))
    }

    /// Direct operand ids in order. Block members are not included.
    pub fn operands(&self) -> Vec<ExprId> {
        match self {
            Expr::Const(_) | Expr::VarRef(_) | Expr::Decl(_) | Expr::Block(_) => Vec::new(),
            Expr::Unary { operand, .. } | Expr::Extend { operand, .. } => vec![*operand],
            Expr::Binary { lhs, rhs, .. } => vec![*lhs, *rhs],
            Expr::If {
                cond,
                then_branch,
                else_branch,
                ..
            } => [Some(*cond), Some(*then_branch), *else_branch]
                .into_iter()
                .flatten()
                .collect(),
            Expr::Ternary { cond, lhs, rhs, .. } => vec![*cond, *lhs, *rhs],
            Expr::Loop {
                precond,
                cond,
                body,
                incr,
                ..
            } => [Some(*precond), Some(*cond), *body, *incr]
                .into_iter()
                .flatten()
                .collect(),
            Expr::Call { args, .. } => args.clone(),
            Expr::ArrayItem { value, .. } => vec![*value],
        }
    }
}
