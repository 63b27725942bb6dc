//! Cross-references resolved after the whole document has been read.
//!
//! Constructors record a [`Fixup`] whenever a node names something that may
//! be declared later in the document. The queue is drained exactly once,
//! front to back, after the last node closes.

use std::collections::VecDeque;

use vxir_ir::{CellId, DataType, DataTypeId, Expr, ExprId, InstanceId, ModuleId, SourceLoc, Unit, VarId};

use crate::error::{BuildError, ErrorKind};

/// The entity whose data type slot a [`Fixup::DataType`] fills.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeTarget {
    /// An expression node.
    Expr(ExprId),
    /// A variable.
    Var(VarId),
}

/// One pending reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Fixup {
    /// Fill a `dtype` slot from a `dtype_id` attribute.
    DataType {
        /// The entity to update.
        target: TypeTarget,
        /// The `dtype_id` value.
        key: String,
        /// Tag of the referencing node.
        tag: &'static str,
        /// Position of the referencing node.
        loc: Option<SourceLoc>,
    },
    /// Fill an unpacked array's element type from `sub_dtype_id`.
    ArraySubtype {
        /// The array type.
        dtype: DataTypeId,
        /// The `sub_dtype_id` value.
        key: String,
        /// Position of the array declaration.
        loc: Option<SourceLoc>,
    },
    /// Point an instance at its module definition.
    InstanceModule {
        /// The instance.
        instance: InstanceId,
        /// The `defName` value.
        name: String,
        /// Position of the instance.
        loc: Option<SourceLoc>,
    },
    /// Point a hierarchy cell at its module definition.
    CellModule {
        /// The cell.
        cell: CellId,
        /// The `submodname` value.
        name: String,
        /// Position of the cell.
        loc: Option<SourceLoc>,
    },
    /// Point a variable reference at the variable it names.
    VarRef {
        /// The `VarRef` expression.
        expr: ExprId,
        /// The module the reference appeared in.
        module: ModuleId,
        /// Position of the reference.
        loc: Option<SourceLoc>,
    },
}

impl Fixup {
    fn loc(&self) -> Option<SourceLoc> {
        match self {
            Fixup::DataType { loc, .. }
            | Fixup::ArraySubtype { loc, .. }
            | Fixup::InstanceModule { loc, .. }
            | Fixup::CellModule { loc, .. }
            | Fixup::VarRef { loc, .. } => *loc,
        }
    }

    fn tag(&self) -> &'static str {
        match self {
            Fixup::DataType { tag, .. } => tag,
            Fixup::ArraySubtype { .. } => "unpackarraydtype",
            Fixup::InstanceModule { .. } => "instance",
            Fixup::CellModule { .. } => "cell",
            Fixup::VarRef { .. } => "varref",
        }
    }

    /// Resolves the reference and stores the result in `unit`.
    pub fn apply(&self, unit: &mut Unit) -> Result<(), ErrorKind> {
        match self {
            Fixup::DataType {
                target,
                key,
                tag,
                ..
            } => {
                let id = unit
                    .data_type_by_key(key)
                    .ok_or_else(|| ErrorKind::UnknownDataType {
                        key: key.clone(),
                        tag: tag.to_string(),
                    })?;
                match *target {
                    TypeTarget::Expr(expr) => {
                        unit.exprs[expr].set_dtype(id);
                    }
                    TypeTarget::Var(var) => unit.vars[var].dtype = Some(id),
                }
            }
            Fixup::ArraySubtype { dtype, key, .. } => {
                let id = unit
                    .data_type_by_key(key)
                    .ok_or_else(|| ErrorKind::UnknownDataType {
                        key: key.clone(),
                        tag: "unpackarraydtype".to_string(),
                    })?;
                if let DataType::UnpackedArray { subtype, .. } = &mut unit.dtypes[*dtype] {
                    *subtype = Some(id);
                }
            }
            Fixup::InstanceModule { instance, name, .. } => {
                let id = resolve_module(unit, name, "instance")?;
                unit.instances[*instance].module = Some(id);
            }
            Fixup::CellModule { cell, name, .. } => {
                let id = resolve_module(unit, name, "cell")?;
                unit.cells[*cell].module = Some(id);
            }
            Fixup::VarRef { expr, module, .. } => {
                let Expr::VarRef(var_ref) = &unit.exprs[*expr] else {
                    return Ok(());
                };
                let name = var_ref.name;
                let var = unit.modules[*module]
                    .var(name)
                    .ok_or_else(|| ErrorKind::UnresolvedVariable(unit.resolve(name).to_string()))?;
                if let Expr::VarRef(var_ref) = &mut unit.exprs[*expr] {
                    var_ref.var = Some(var);
                }
            }
        }
        Ok(())
    }
}

fn resolve_module(unit: &Unit, name: &str, tag: &str) -> Result<ModuleId, ErrorKind> {
    unit.module_named(name).ok_or_else(|| ErrorKind::UnknownModule {
        name: name.to_string(),
        tag: tag.to_string(),
    })
}

/// Ordered queue of pending references.
#[derive(Debug, Default)]
pub struct DeferredQueue {
    items: VecDeque<Fixup>,
}

impl DeferredQueue {
    /// Creates an empty queue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues `fixup` ahead of everything already queued.
    pub fn defer_front(&mut self, fixup: Fixup) {
        self.items.push_front(fixup);
    }

    /// Queues `fixup` behind everything already queued.
    pub fn defer_back(&mut self, fixup: Fixup) {
        self.items.push_back(fixup);
    }

    /// Number of pending fixups.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns `true` if nothing is pending.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Iterates pending fixups in the order they will run.
    pub fn iter(&self) -> impl Iterator<Item = &Fixup> + '_ {
        self.items.iter()
    }

    /// Applies every fixup in queue order and empties the queue.
    ///
    /// Stops at the first reference that cannot be resolved; the queue is
    /// empty afterwards either way.
    pub fn run(&mut self, unit: &mut Unit) -> Result<usize, BuildError> {
        let items = std::mem::take(&mut self.items);
        let count = items.len();
        tracing::debug!(count, "resolving deferred references");
        for fixup in &items {
            tracing::trace!(?fixup, "applying fixup");
            fixup.apply(unit).map_err(|kind| {
                let loc = fixup.loc();
                BuildError {
                    kind,
                    tag: Some(fixup.tag().to_string()),
                    file: loc
                        .and_then(|l| l.file)
                        .and_then(|f| unit.files.get(f))
                        .map(|f| f.filename.clone()),
                    loc,
                }
            })?;
        }
        Ok(count)
    }
}
