//! The instance hierarchy from the document's `cells` section.

use crate::ids::{CellId, ModuleId};
use serde::{Deserialize, Serialize};
use vxir_common::Ident;
use vxir_source::SourceLoc;

/// One node of an instance hierarchy tree.
///
/// Roots have no parent and are registered in the unit by name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HierCell {
    /// Cell name as written in the document.
    pub name: Ident,
    /// Name of the module this cell instantiates.
    pub submodule: Ident,
    /// The module itself, filled in by deferred resolution.
    pub module: Option<ModuleId>,
    /// The enclosing cell.
    pub parent: Option<CellId>,
    /// Nested cells in document order.
    pub children: Vec<CellId>,
    /// Source position.
    pub loc: Option<SourceLoc>,
}

impl HierCell {
    /// Returns `true` if the cell has no parent.
    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }
}
