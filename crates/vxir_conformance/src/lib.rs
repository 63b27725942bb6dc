//! Conformance test helpers for the vxir front-end.
//!
//! Wraps document fragments in the envelope Verilator writes, runs them
//! through the builder, and offers lookups that keep the integration tests
//! short.

#![warn(missing_docs)]

use vxir_builder::{build_unit, BuildError};
use vxir_config::ParserConfig;
use vxir_ir::{Block, BlockKind, Expr, ExprId, ModuleId, Unit, VarId};

/// Parses a `vxir.toml` snippet into a configuration.
pub fn make_config(toml_str: &str) -> ParserConfig {
    toml::from_str(toml_str).unwrap()
}

/// Wraps `files` and `netlist` in a complete document.
pub fn document(files: &str, netlist: &str) -> String {
    format!(
        r#"<?xml version="1.0" ?>
<!-- DESCRIPTION: Verilator output: XML representation of netlist -->
<verilator_xml>
  <files>
    <file id="a" filename="&lt;built-in&gt;" language="1800-2017"/>
    <file id="b" filename="&lt;command-line&gt;" language="1800-2017"/>
{files}
  </files>
  <netlist>
{netlist}
  </netlist>
</verilator_xml>
"#
    )
}

/// Builds `source` with the default configuration.
pub fn build(source: &str) -> Result<Unit, BuildError> {
    build_unit(source, &ParserConfig::default())
}

/// Builds `source` with `config`.
pub fn build_with(source: &str, config: &ParserConfig) -> Result<Unit, BuildError> {
    build_unit(source, config)
}

/// The registered module `name`. Panics if absent.
pub fn module(unit: &Unit, name: &str) -> ModuleId {
    unit.module_named(name)
        .unwrap_or_else(|| panic!("module {name} not registered"))
}

/// The variable `name` of module `module`. Panics if absent.
pub fn var(unit: &Unit, module: &str, name: &str) -> VarId {
    let id = self::module(unit, module);
    unit.module_var(id, name)
        .unwrap_or_else(|| panic!("variable {name} not declared in {module}"))
}

/// Blocks of `module` of the given kind, in order.
pub fn blocks_of<'a>(unit: &'a Unit, module: &str, kind: BlockKind) -> Vec<&'a Block> {
    unit.modules[self::module(unit, module)]
        .blocks
        .iter()
        .map(|&b| &unit.blocks[b])
        .filter(|b| b.kind == kind)
        .collect()
}

/// The name of a `VarRef` expression. Panics for other expressions.
pub fn var_ref_name(unit: &Unit, id: ExprId) -> &str {
    match &unit.exprs[id] {
        Expr::VarRef(r) => unit.resolve(r.name),
        other => panic!("expected a varref, got {other:?}"),
    }
}

/// The value of a `Const` expression. Panics for other expressions and for
/// values wider than 64 bits.
pub fn const_value(unit: &Unit, id: ExprId) -> u64 {
    match &unit.exprs[id] {
        Expr::Const(c) => c
            .value
            .to_u64()
            .unwrap_or_else(|| panic!("constant {} is wider than 64 bits", c.value)),
        other => panic!("expected a constant, got {other:?}"),
    }
}
