//! The parse result container.

use crate::arena::Arena;
use crate::expr::{Block, Expr};
use crate::file::SourceFile;
use crate::hierarchy::HierCell;
use crate::ids::{BlockId, CellId, DataTypeId, ExprId, InstanceId, ModuleId, VarId};
use crate::module::{Instance, Module, Variable};
use crate::types::DataType;
use std::collections::HashMap;
use vxir_common::{Ident, Interner};
use vxir_source::FileId;

/// Everything read from one Verilator XML document.
///
/// Entities live in arenas and are never removed. The string-keyed
/// registries map document keys (`dtype_id`, file keys, module names) to
/// ids; registering a key twice points it at the newer entity.
#[derive(Debug, Default)]
pub struct Unit {
    /// Names of every module, variable, instance and cell.
    pub interner: Interner,
    /// File records.
    pub files: Arena<FileId, SourceFile>,
    /// Data types, including the built-in ones.
    pub dtypes: Arena<DataTypeId, DataType>,
    /// Every expression node.
    pub exprs: Arena<ExprId, Expr>,
    /// Statement blocks and processes.
    pub blocks: Arena<BlockId, Block>,
    /// Variables of all modules and blocks.
    pub vars: Arena<VarId, Variable>,
    /// Module definitions, including ones later shadowed by a duplicate name.
    pub modules: Arena<ModuleId, Module>,
    /// Instances of all modules.
    pub instances: Arena<InstanceId, Instance>,
    /// Hierarchy cells of all trees.
    pub cells: Arena<CellId, HierCell>,
    file_keys: HashMap<String, FileId>,
    dtype_keys: HashMap<String, DataTypeId>,
    module_names: HashMap<Ident, ModuleId>,
    hierarchies: HashMap<Ident, CellId>,
}

impl Unit {
    /// Creates an empty unit.
    pub fn new() -> Self {
        Self::default()
    }

    /// Interns a name.
    pub fn intern(&mut self, s: &str) -> Ident {
        self.interner.intern(s)
    }

    /// Returns the string for a name interned in this unit.
    pub fn resolve(&self, ident: Ident) -> &str {
        self.interner.resolve(ident)
    }

    /// Records a file, replacing an earlier record with the same key.
    pub fn upsert_file(&mut self, file: SourceFile) -> FileId {
        if let Some(&id) = self.file_keys.get(&file.key) {
            self.files[id] = file;
            return id;
        }
        let key = file.key.clone();
        let id = self.files.alloc(file);
        self.file_keys.insert(key, id);
        id
    }

    /// Looks up a file by its `loc` key.
    pub fn file_by_key(&self, key: &str) -> Option<FileId> {
        self.file_keys.get(key).copied()
    }

    /// Stores a data type under `key` and returns its id.
    pub fn register_data_type(&mut self, key: &str, dtype: DataType) -> DataTypeId {
        let id = self.dtypes.alloc(dtype);
        self.dtype_keys.insert(key.to_string(), id);
        id
    }

    /// Registers `key` as another name for an existing data type.
    pub fn alias_data_type(&mut self, key: &str, id: DataTypeId) {
        self.dtype_keys.insert(key.to_string(), id);
    }

    /// Looks up a data type by its `id` attribute or built-in name.
    pub fn data_type_by_key(&self, key: &str) -> Option<DataTypeId> {
        self.dtype_keys.get(key).copied()
    }

    /// Makes `id` the module registered under its name.
    pub fn register_module(&mut self, id: ModuleId) {
        let name = self.modules[id].name;
        self.module_names.insert(name, id);
    }

    /// Looks up a registered module by name.
    pub fn module_named(&self, name: &str) -> Option<ModuleId> {
        let ident = self.interner.get(name)?;
        self.module_id(ident)
    }

    /// Looks up a registered module by interned name.
    pub fn module_id(&self, name: Ident) -> Option<ModuleId> {
        self.module_names.get(&name).copied()
    }

    /// Registered modules, sorted by name.
    pub fn registered_modules(&self) -> Vec<(&str, ModuleId)> {
        let mut out: Vec<(&str, ModuleId)> = self
            .module_names
            .iter()
            .map(|(&name, &id)| (self.resolve(name), id))
            .collect();
        out.sort_unstable_by(|a, b| a.0.cmp(b.0));
        out
    }

    /// Registers `cell` as the root of a hierarchy tree.
    pub fn register_hierarchy(&mut self, cell: CellId) {
        let name = self.cells[cell].name;
        self.hierarchies.insert(name, cell);
    }

    /// Looks up a hierarchy root by cell name.
    pub fn hierarchy_named(&self, name: &str) -> Option<CellId> {
        let ident = self.interner.get(name)?;
        self.hierarchies.get(&ident).copied()
    }

    /// Hierarchy roots, sorted by name.
    pub fn hierarchy_roots(&self) -> Vec<(&str, CellId)> {
        let mut out: Vec<(&str, CellId)> = self
            .hierarchies
            .iter()
            .map(|(&name, &id)| (self.resolve(name), id))
            .collect();
        out.sort_unstable_by(|a, b| a.0.cmp(b.0));
        out
    }

    /// Looks up the variable `name` declared directly in `module`.
    pub fn module_var(&self, module: ModuleId, name: &str) -> Option<VarId> {
        let ident = self.interner.get(name)?;
        self.modules.get(module)?.var(ident)
    }
}
