//! Builds the vxir IR from Verilator's XML netlist dump.
//!
//! The tree reader calls back into an [`IrBuilder`] for every element. Each
//! closing tag is mapped to a [`Tag`] and built by the constructor for that
//! tag from the node's attributes and its children's [`Payload`]s. Names
//! that may be declared later in the document (data type ids, module names)
//! are queued as [`Fixup`]s and resolved once the whole document is read.
//!
//! # Usage
//!
//! ```ignore
//! let unit = build_unit(&xml, &ParserConfig::default())?;
//! let top = unit.module_named("top");
//! ```

#![warn(missing_docs)]

mod block;
pub mod context;
mod decl;
pub mod deferred;
pub mod error;
mod expr;
pub mod payload;
pub mod tag;
mod types;

pub use context::{IrBuilder, NodeTrace};
pub use deferred::{DeferredQueue, Fixup, TypeTarget};
pub use error::{BuildError, ErrorKind};
pub use payload::Payload;
pub use tag::Tag;

use vxir_config::ParserConfig;
use vxir_ir::Unit;

/// Builds a [`Unit`] from a complete document.
pub fn build_unit(source: &str, config: &ParserConfig) -> Result<Unit, BuildError> {
    let mut builder = IrBuilder::new(config);
    builder.parse(source)?;
    Ok(builder.finish())
}

#[cfg(test)]
mod tests {
    use super::*;
    use vxir_ir::{BinaryOp, BlockKind, DataType, Edge, Expr, ExprId, ModuleId, Unit, UnaryOp};
    use vxir_tree::TreeError;

    fn doc(body: &str) -> String {
        format!("<?xml version=\"1.0\" ?>\n<verilator_xml>\n{body}\n</verilator_xml>\n")
    }

    fn build(body: &str) -> Result<Unit, BuildError> {
        build_unit(&doc(body), &ParserConfig::default())
    }

    fn make_config(text: &str) -> ParserConfig {
        toml::from_str(text).unwrap()
    }

    fn module(unit: &Unit, name: &str) -> ModuleId {
        unit.module_named(name).unwrap()
    }

    fn var_ref_name<'u>(unit: &'u Unit, id: ExprId) -> &'u str {
        match &unit.exprs[id] {
            Expr::VarRef(r) => unit.resolve(r.name),
            other => panic!("expected a varref, got {other:?}"),
        }
    }

    const MINIMAL: &str = r#"
<files>
  <file id="a" filename="top.v" language="1800-2017"/>
</files>
<netlist>
  <module loc="a,1,8,1,11" name="top" origName="top">
    <var loc="a,1,18,1,19" name="a" dtype_id="1" dir="input" vartype="logic" origName="a"/>
    <var loc="a,1,28,1,29" name="b" dtype_id="1" dir="output" vartype="logic" origName="b"/>
    <contassign loc="a,2,12,2,13" dtype_id="1">
      <varref loc="a,2,14,2,15" name="a" dtype_id="1"/>
      <varref loc="a,2,10,2,11" name="b" dtype_id="1"/>
    </contassign>
  </module>
  <typetable loc="a,0,0,0,0">
    <basicdtype loc="a,1,18,1,19" id="1" name="logic" left="31" right="0"/>
  </typetable>
</netlist>
"#;

    #[test]
    fn minimal_design() {
        let unit = build(MINIMAL).unwrap();
        assert_eq!(unit.files.len(), 1);
        let top = &unit.modules[module(&unit, "top")];
        assert_eq!(top.vars.len(), 2);

        let a = unit.module_var(module(&unit, "top"), "a").unwrap();
        let b = unit.module_var(module(&unit, "top"), "b").unwrap();
        assert!(unit.vars[a].is_input && !unit.vars[a].is_output);
        assert!(unit.vars[b].is_output && !unit.vars[b].is_input);

        assert_eq!(top.blocks.len(), 1);
        let block = &unit.blocks[top.blocks[0]];
        assert_eq!(block.kind, BlockKind::Module);
        assert_eq!(block.exprs.len(), 1);
        match &unit.exprs[block.exprs[0]] {
            Expr::Binary {
                op: BinaryOp::ContAssign,
                lhs,
                rhs,
                ..
            } => {
                assert_eq!(var_ref_name(&unit, *lhs), "a");
                assert_eq!(var_ref_name(&unit, *rhs), "b");
            }
            other => panic!("expected an assignment, got {other:?}"),
        }
    }

    #[test]
    fn forward_type_references_resolve() {
        let unit = build(MINIMAL).unwrap();
        let logic = unit.data_type_by_key("1").unwrap();
        let a = unit.module_var(module(&unit, "top"), "a").unwrap();
        assert_eq!(unit.vars[a].dtype, Some(logic));
        assert_eq!(unit.dtypes[logic].as_logic().map(|r| r.width()), Some(32));
        for (_, expr) in unit.exprs.iter() {
            assert_eq!(expr.dtype(), Some(logic));
        }
    }

    #[test]
    fn locations_resolve_files() {
        let unit = build(MINIMAL).unwrap();
        let top = &unit.modules[module(&unit, "top")];
        let loc = top.loc.unwrap();
        assert_eq!(loc.file, unit.file_by_key("a"));
        assert_eq!((loc.line, loc.col), (1, 8));
        assert_eq!((loc.end_line, loc.end_col), (1, 8));
    }

    #[test]
    fn idata_is_preregistered() {
        let unit = build("<module name=\"m\"><var name=\"x\" dtype_id=\"IData\"/></module>").unwrap();
        let x = unit.module_var(module(&unit, "m"), "x").unwrap();
        let idata = unit.data_type_by_key("IData").unwrap();
        assert_eq!(unit.vars[x].dtype, Some(idata));
        assert_eq!(unit.dtypes[idata], DataType::logic(31, 0));
    }

    #[test]
    fn unknown_dtype_names_the_key() {
        let err = build("<module name=\"m\"><var name=\"x\" dtype_id=\"99\"/></module>").unwrap_err();
        assert_eq!(
            err.kind,
            ErrorKind::UnknownDataType {
                key: "99".to_string(),
                tag: "var".to_string(),
            }
        );
        assert!(err.to_string().contains("99"));
    }

    #[test]
    fn unknown_module_names_the_module() {
        let err = build("<module name=\"top\"><instance name=\"u\" defName=\"sub\"/></module>").unwrap_err();
        assert!(matches!(err.kind, ErrorKind::UnknownModule { ref name, .. } if name == "sub"));
    }

    #[test]
    fn instances_resolve_forward() {
        let unit = build(
            r#"<module name="top">
                 <var name="x" dtype_id="IData"/>
                 <instance name="u0" defName="sub" origName="u0">
                   <port name="p"><varref name="x"/></port>
                 </instance>
               </module>
               <module name="sub"/>"#,
        )
        .unwrap();
        let top = &unit.modules[module(&unit, "top")];
        assert_eq!(top.instances.len(), 1);
        let inst = &unit.instances[top.instances[0]];
        assert_eq!(inst.module, unit.module_named("sub"));
        assert_eq!(inst.ports.len(), 1);
        assert_eq!(unit.resolve(inst.ports[0].name), "p");
        assert_eq!(var_ref_name(&unit, inst.ports[0].expr), "x");
    }

    #[test]
    fn names_are_sanitized() {
        let unit = build("<module name=\"m\"><var name=\"a.b[0]\"/></module>").unwrap();
        assert!(unit.module_var(module(&unit, "m"), "a$b$0$").is_some());
    }

    #[test]
    fn unary_arity() {
        let err = build("<module name=\"m\"><not><const name=\"1'h1\"/><const name=\"1'h0\"/></not></module>")
            .unwrap_err();
        assert_eq!(
            err.kind,
            ErrorKind::Arity {
                tag: "not".to_string(),
                expected: "1",
                found: 2,
            }
        );
    }

    #[test]
    fn assignment_arity() {
        let err = build("<module name=\"m\"><assign><const name=\"1'h1\"/></assign></module>").unwrap_err();
        assert!(matches!(err.kind, ErrorKind::Arity { found: 1, .. }));
    }

    #[test]
    fn if_arity() {
        let err = build("<module name=\"m\"><if><const name=\"1'h1\"/></if></module>").unwrap_err();
        assert!(matches!(err.kind, ErrorKind::Arity { expected: "2 or 3", .. }));

        let unit = build(
            "<module name=\"m\"><if><const name=\"1'h1\"/><begin/><begin/></if></module>",
        )
        .unwrap();
        let found = unit
            .exprs
            .values()
            .any(|e| matches!(e, Expr::If { else_branch: Some(_), .. }));
        assert!(found);
    }

    #[test]
    fn loop_arity() {
        let err = build("<module name=\"m\"><while><begin/></while></module>").unwrap_err();
        assert!(matches!(err.kind, ErrorKind::Arity { expected: "2 to 4", found: 1, .. }));

        let unit = build(
            "<module name=\"m\"><while><begin/><const name=\"1'h0\"/><begin/></while></module>",
        )
        .unwrap();
        let found = unit.exprs.values().any(|e| {
            matches!(
                e,
                Expr::Loop {
                    body: Some(_),
                    incr: None,
                    ..
                }
            )
        });
        assert!(found);
    }

    #[test]
    fn bad_edge_type() {
        let body = r#"<module name="m">
            <always><sentree><senitem edgeType="BOTH"><varref name="clk"/></senitem></sentree><begin/></always>
        </module>"#;
        let err = build(body).unwrap_err();
        assert_eq!(err.kind, ErrorKind::BadEdge("BOTH".to_string()));
        assert_eq!(err.tag.as_deref(), Some("senitem"));
    }

    #[test]
    fn extend_width() {
        let err = build(
            "<module name=\"m\"><extend width=\"16\" widthminv=\"8\"><const name=\"8'h1\"/></extend></module>",
        )
        .unwrap_err();
        assert!(matches!(err.kind, ErrorKind::ExtendWidth { width: 16, .. }));

        let unit = build(
            "<module name=\"m\"><extends width=\"32\" widthminv=\"8\"><const name=\"8'h1\"/></extends></module>",
        )
        .unwrap();
        let found = unit
            .exprs
            .values()
            .any(|e| matches!(e, Expr::Extend { width: 32, width_min: 8, .. }));
        assert!(found);
    }

    #[test]
    fn malformed_constant() {
        let err = build("<module name=\"m\"><var name=\"p\"><const name=\"8'b1010\"/></var></module>")
            .unwrap_err();
        assert_eq!(err.to_string(), "could not parse constant \"8'b1010\"");
    }

    #[test]
    fn parameter_value() {
        let unit = build(
            "<module name=\"m\"><var name=\"W\" param=\"true\"><const name=\"32'h8\"/></var></module>",
        )
        .unwrap();
        let w = unit.module_var(module(&unit, "m"), "W").unwrap();
        assert!(unit.vars[w].is_param);
        let value = unit.vars[w].const_value.unwrap();
        assert!(matches!(&unit.exprs[value], Expr::Const(c) if c.value.to_u64() == Some(8)));
    }

    #[test]
    fn unknown_tag() {
        let err = build("<module name=\"m\"><typedef/></module>").unwrap_err();
        assert_eq!(err.kind, ErrorKind::UnknownTag("typedef".to_string()));
    }

    #[test]
    fn nested_module() {
        let err = build("<module name=\"a\"><module name=\"b\"/></module>").unwrap_err();
        assert_eq!(err.kind, ErrorKind::NestedModule("b".to_string()));
    }

    #[test]
    fn always_outside_module() {
        let err = build("<always><begin/></always>").unwrap_err();
        assert_eq!(err.kind, ErrorKind::OutsideModule("always".to_string()));
    }

    #[test]
    fn always_with_sensitivity_list() {
        let body = r#"<module name="m">
            <always loc="a,3,1,3,7">
              <sentree><senitem edgeType="POS"><varref name="clk"/></senitem></sentree>
              <begin><assigndly><const name="1'h1"/><varref name="q"/></assigndly></begin>
            </always>
            <always><begin/></always>
            <always><begin/><begin/><begin/></always>
        </module>"#;
        let err = build(body).unwrap_err();
        assert!(matches!(err.kind, ErrorKind::Arity { expected: "1 or 2", found: 3, .. }));

        let unit = build(&body.replace("<always><begin/><begin/><begin/></always>", "")).unwrap();
        let m = &unit.modules[module(&unit, "m")];
        assert_eq!(m.blocks.len(), 2);
        let first = &unit.blocks[m.blocks[0]];
        assert_eq!(first.kind, BlockKind::Always);
        let senses = first.senses.as_ref().unwrap();
        assert_eq!(senses.len(), 1);
        assert_eq!(senses[0].edge, Edge::Pos);
        assert_eq!(senses[0].expr, None);
        assert_eq!(first.exprs.len(), 1);
        assert!(unit.blocks[m.blocks[1]].senses.is_none());
    }

    #[test]
    fn sensitivity_operands_when_configured() {
        let config = make_config("[parser]\nsensitivity_operands = true\n");
        let body = r#"<module name="m">
            <always><sentree><senitem edgeType="NEG"><varref name="rst"/></senitem></sentree><begin/></always>
        </module>"#;
        let unit = build_unit(&doc(body), &config).unwrap();
        let m = &unit.modules[module(&unit, "m")];
        let item = &unit.blocks[m.blocks[0]].senses.as_ref().unwrap()[0];
        assert_eq!(item.edge, Edge::Neg);
        assert_eq!(var_ref_name(&unit, item.expr.unwrap()), "rst");
    }

    #[test]
    fn var_refs_stay_unresolved_by_default() {
        let unit = build(MINIMAL).unwrap();
        for expr in unit.exprs.values() {
            if let Expr::VarRef(r) = expr {
                assert_eq!(r.var, None);
            }
        }
    }

    #[test]
    fn var_refs_resolve_when_configured() {
        let config = make_config("[parser]\nresolve_varrefs = true\n");
        let unit = build_unit(&doc(MINIMAL), &config).unwrap();
        let top = module(&unit, "top");
        let a = unit.module_var(top, "a").unwrap();
        let resolved = unit
            .exprs
            .values()
            .any(|e| matches!(e, Expr::VarRef(r) if r.var == Some(a)));
        assert!(resolved);

        let err = build_unit(
            &doc("<module name=\"m\"><contassign><varref name=\"x\"/><varref name=\"y\"/></contassign></module>"),
            &config,
        )
        .unwrap_err();
        assert_eq!(err.kind, ErrorKind::UnresolvedVariable("x".to_string()));
    }

    #[test]
    fn configured_types_are_registered() {
        let config = make_config("[types.QData]\nleft = 63\nright = 0\n");
        let unit = build_unit(
            &doc("<module name=\"m\"><var name=\"w\" dtype_id=\"QData\"/></module>"),
            &config,
        )
        .unwrap();
        let qdata = unit.data_type_by_key("QData").unwrap();
        assert_eq!(unit.dtypes[qdata].as_logic().map(|r| r.width()), Some(64));
    }

    #[test]
    fn basic_type_aliases() {
        let unit = build(
            r#"<typetable>
                 <basicdtype id="5" name="IData"/>
                 <basicdtype id="6" name="string"/>
                 <basicdtype id="7" name="integer" left="31"/>
               </typetable>"#,
        )
        .unwrap();
        assert_eq!(unit.data_type_by_key("5"), unit.data_type_by_key("IData"));
        let native = unit.data_type_by_key("6").unwrap();
        assert!(matches!(&unit.dtypes[native], DataType::Native { name, .. } if name == "string"));
        let integer = unit.data_type_by_key("7").unwrap();
        assert_eq!(unit.dtypes[integer], DataType::logic(31, 0));

        let err = build("<typetable><basicdtype id=\"8\" name=\"QData\"/></typetable>").unwrap_err();
        assert_eq!(err.kind, ErrorKind::UnknownTypeName("QData".to_string()));
    }

    #[test]
    fn unpacked_arrays() {
        let unit = build(
            r#"<typetable>
                 <unpackarraydtype id="3" sub_dtype_id="1">
                   <range><const name="32'h0"/><const name="32'hf"/></range>
                 </unpackarraydtype>
                 <basicdtype id="1" name="logic" left="7"/>
               </typetable>"#,
        )
        .unwrap();
        let array = unit.data_type_by_key("3").unwrap();
        match &unit.dtypes[array] {
            DataType::UnpackedArray { subtype, low, high, .. } => {
                assert_eq!(*subtype, unit.data_type_by_key("1"));
                assert!(matches!(&unit.exprs[*low], Expr::Const(c) if c.value.to_u64() == Some(0)));
                assert!(matches!(&unit.exprs[*high], Expr::Const(c) if c.value.to_u64() == Some(15)));
            }
            other => panic!("expected an array, got {other:?}"),
        }

        let err = build(
            r#"<typetable><unpackarraydtype id="3" sub_dtype_id="IData">
                 <range><varref name="n"/><const name="32'hf"/></range>
               </unpackarraydtype></typetable>"#,
        )
        .unwrap_err();
        assert_eq!(err.kind, ErrorKind::NonConstRange);
    }

    #[test]
    fn hierarchy_cells() {
        let unit = build(
            r#"<module name="top"/><module name="sub"/>
               <cells>
                 <cell name="top" submodname="top" hier="top">
                   <cell name="u0" submodname="sub" hier="top.u0"/>
                   <cell name="u1" submodname="sub" hier="top.u1"/>
                 </cell>
               </cells>"#,
        )
        .unwrap();
        let root = unit.hierarchy_named("top").unwrap();
        let cell = &unit.cells[root];
        assert!(cell.is_root());
        assert_eq!(cell.module, unit.module_named("top"));
        assert_eq!(cell.children.len(), 2);
        for &child in &cell.children {
            assert_eq!(unit.cells[child].parent, Some(root));
            assert_eq!(unit.cells[child].module, unit.module_named("sub"));
        }
        assert_eq!(unit.resolve(unit.cells[cell.children[1]].name), "u1");
    }

    #[test]
    fn module_files_are_marked() {
        let unit = build(
            r#"<files><file id="a" filename="&lt;built-in&gt;"/><file id="b" filename="top.v"/></files>
               <module_files><file id="b" filename="top.v"/></module_files>"#,
        )
        .unwrap();
        assert_eq!(unit.files.len(), 2);
        let a = unit.file_by_key("a").unwrap();
        let b = unit.file_by_key("b").unwrap();
        assert_eq!(unit.files[a].filename, "<built-in>");
        assert!(!unit.files[a].is_module);
        assert!(unit.files[b].is_module);
    }

    #[test]
    fn cfunc_blocks_and_calls() {
        let unit = build(
            r#"<module name="m">
                 <cfunc name="_eval">
                   <var name="__Vtemp"/>
                   <cstmt/>
                   <display><sformatf name="fmt"><text/><const name="32'h1"/></sformatf></display>
                   <ccall func="_sub"/>
                   <finish/>
                 </cfunc>
               </module>"#,
        )
        .unwrap();
        let m = &unit.modules[module(&unit, "m")];
        assert_eq!(m.blocks.len(), 1);
        let cfunc = &unit.blocks[m.blocks[0]];
        assert_eq!(cfunc.kind, BlockKind::CFunc);
        assert_eq!(cfunc.name.map(|n| unit.resolve(n)), Some("_eval"));
        assert_eq!(cfunc.exprs.len(), 4);
        assert!(matches!(unit.exprs[cfunc.exprs[0]], Expr::Decl(_)));

        let names: Vec<&str> = cfunc.exprs[1..]
            .iter()
            .map(|&e| match &unit.exprs[e] {
                Expr::Call { func, .. } => unit.resolve(*func),
                other => panic!("expected a call, got {other:?}"),
            })
            .collect();
        assert_eq!(names, vec!["$display", "_sub", "$finish"]);
    }

    #[test]
    fn empty_changedet_is_dropped() {
        let unit = build(
            r#"<module name="m"><cfunc name="f"><changedet/><changedet><varref name="a"/><varref name="b"/></changedet></cfunc></module>"#,
        )
        .unwrap();
        let m = &unit.modules[module(&unit, "m")];
        let block = &unit.blocks[m.blocks[0]];
        assert_eq!(block.exprs.len(), 1);
        assert!(matches!(
            unit.exprs[block.exprs[0]],
            Expr::Binary { op: BinaryOp::ChangeDet, .. }
        ));
    }

    #[test]
    fn init_arrays() {
        let unit = build(
            r#"<module name="m">
                 <var name="rom">
                   <initarray><inititem index="2"><const name="8'h41"/></inititem></initarray>
                 </var>
                 <initial><begin/></initial>
               </module>"#,
        )
        .unwrap();
        let m = module(&unit, "m");
        let rom = unit.module_var(m, "rom").unwrap();
        let init = unit.vars[rom].init_value.unwrap();
        let Expr::Block(block) = unit.exprs[init] else {
            panic!("expected a block");
        };
        let block = &unit.blocks[block];
        assert_eq!(block.kind, BlockKind::InitArray);
        assert!(matches!(unit.exprs[block.exprs[0]], Expr::ArrayItem { index: 2, .. }));

        let statements = &unit.blocks[unit.modules[m].blocks[0]];
        assert!(matches!(
            unit.exprs[statements.exprs[0]],
            Expr::Unary { op: UnaryOp::Initial, .. }
        ));
    }

    #[test]
    fn duplicate_module_replaces_registration() {
        let unit = build("<module name=\"m\"/><module name=\"m\"><var name=\"x\"/></module>").unwrap();
        assert_eq!(unit.modules.len(), 2);
        let m = module(&unit, "m");
        assert!(unit.module_var(m, "x").is_some());
    }

    #[test]
    fn structural_errors_surface() {
        let err = build_unit("</a>", &ParserConfig::default()).unwrap_err();
        assert!(matches!(err.kind, ErrorKind::Tree(TreeError::UnexpectedClose { .. })));

        let err = build_unit("<?xml?><a><b></a>", &ParserConfig::default()).unwrap_err();
        assert!(matches!(err.kind, ErrorKind::Tree(TreeError::MismatchedClose { .. })));
    }

    #[test]
    fn errors_carry_file_and_position() {
        let err = build(
            r#"<files><file id="a" filename="top.v"/></files>
               <module name="m"><not loc="a,7,3,7,9"/></module>"#,
        )
        .unwrap_err();
        assert_eq!(err.file.as_deref(), Some("top.v"));
        assert_eq!(err.loc.map(|l| (l.line, l.col)), Some((7, 3)));
        assert!(err.to_string().starts_with("top.v:7:3: <not> expected 1 children"));
    }

    #[test]
    fn bad_location_fails() {
        let err = build("<module name=\"m\" loc=\"a,x,1,1,1\"/>").unwrap_err();
        assert!(matches!(err.kind, ErrorKind::Location(_)));
    }

    #[test]
    fn last_node_tracks_failure() {
        let mut builder = IrBuilder::new(&ParserConfig::default());
        let result = builder.parse(&doc("<module name=\"m\"><bogus loc=\"a,4,2,4,2\"/></module>"));
        assert!(result.is_err());
        let last = builder.last_node().unwrap();
        assert_eq!(last.tag, "bogus");
        assert_eq!(last.loc.as_deref(), Some("a,4,2,4,2"));
    }

    #[test]
    fn queue_is_drained_after_parse() {
        let mut builder = IrBuilder::new(&ParserConfig::default());
        builder.parse(&doc(MINIMAL)).unwrap();
        assert_eq!(builder.pending(), 0);
        assert_eq!(builder.unit().modules.len(), 1);
    }
}
