//! Modules, their variables and their instances.

use crate::ids::{BlockId, DataTypeId, ExprId, InstanceId, ModuleId, VarId};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use vxir_common::Ident;
use vxir_source::SourceLoc;

/// A declared variable, port or parameter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Variable {
    /// Sanitized name.
    pub name: Ident,
    /// The `origName` attribute, if present.
    pub orig_name: Option<Ident>,
    /// Declared with `dir="input"`.
    pub is_input: bool,
    /// Declared with `dir="output"`.
    pub is_output: bool,
    /// Declared with `param="true"`.
    pub is_param: bool,
    /// Filled in by deferred resolution.
    pub dtype: Option<DataTypeId>,
    /// Value of a parameter; the variable's only child.
    pub const_value: Option<ExprId>,
    /// Initial value of a non-parameter with a child.
    pub init_value: Option<ExprId>,
    /// Source position.
    pub loc: Option<SourceLoc>,
}

impl Variable {
    /// A variable with no direction, type or value.
    pub fn new(name: Ident) -> Self {
        Self {
            name,
            orig_name: None,
            is_input: false,
            is_output: false,
            is_param: false,
            dtype: None,
            const_value: None,
            init_value: None,
            loc: None,
        }
    }

    /// Returns `true` for inputs and outputs.
    pub fn is_port(&self) -> bool {
        self.is_input || self.is_output
    }
}

/// A module definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Module {
    /// Sanitized module name.
    pub name: Ident,
    /// The `origName` attribute, if present.
    pub orig_name: Option<Ident>,
    /// Processes, functions and the implicit block of module-level statements.
    pub blocks: Vec<BlockId>,
    /// Child instances in document order.
    pub instances: Vec<InstanceId>,
    /// Variables declared directly in the module, by name.
    pub vars: HashMap<Ident, VarId>,
    /// Source position.
    pub loc: Option<SourceLoc>,
}

impl Module {
    /// An empty module named `name`.
    pub fn new(name: Ident) -> Self {
        Self {
            name,
            orig_name: None,
            blocks: Vec::new(),
            instances: Vec::new(),
            vars: HashMap::new(),
            loc: None,
        }
    }

    /// Looks up a directly declared variable.
    pub fn var(&self, name: Ident) -> Option<VarId> {
        self.vars.get(&name).copied()
    }
}

/// An instantiation of one module inside another.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Instance {
    /// Sanitized instance name.
    pub name: Ident,
    /// The `origName` attribute, if present.
    pub orig_name: Option<Ident>,
    /// Name of the instantiated module.
    pub def_name: Ident,
    /// Port connections in document order.
    pub ports: Vec<Port>,
    /// The instantiated module, filled in by deferred resolution.
    pub module: Option<ModuleId>,
    /// Source position.
    pub loc: Option<SourceLoc>,
}

/// A port connection of an [`Instance`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Port {
    /// Sanitized port name.
    pub name: Ident,
    /// The connected expression.
    pub expr: ExprId,
    /// Source position.
    pub loc: Option<SourceLoc>,
}
