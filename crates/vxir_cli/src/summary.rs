//! Text and JSON renderings of a built unit.

use serde_json::{json, Value};
use vxir_ir::{CellId, DataType, DataTypeId, Expr, ExprId, Module, Unit, Variable};

/// Describes a data type the way a declaration would read.
pub fn describe_dtype(unit: &Unit, id: DataTypeId) -> String {
    match &unit.dtypes[id] {
        DataType::Logic { range, .. } => format!("logic[{}:{}]", range.left, range.right),
        DataType::Native { name, .. } => name.clone(),
        DataType::UnpackedArray {
            subtype, low, high, ..
        } => {
            let element = subtype.map_or_else(|| "?".to_string(), |s| describe_dtype(unit, s));
            format!("{element}[{}:{}]", const_text(unit, *low), const_text(unit, *high))
        }
    }
}

fn const_text(unit: &Unit, id: ExprId) -> String {
    match &unit.exprs[id] {
        Expr::Const(c) => c.value.to_string(),
        _ => "?".to_string(),
    }
}

fn direction(var: &Variable) -> &'static str {
    match (var.is_input, var.is_output) {
        (true, true) => "inout",
        (true, false) => "input",
        (false, true) => "output",
        (false, false) if var.is_param => "param",
        (false, false) => "var",
    }
}

/// Variables of `module`, sorted by name.
fn sorted_vars<'u>(unit: &'u Unit, module: &Module) -> Vec<(&'u str, &'u Variable)> {
    let mut vars: Vec<(&str, &Variable)> = module
        .vars
        .iter()
        .map(|(&name, &id)| (unit.resolve(name), &unit.vars[id]))
        .collect();
    vars.sort_unstable_by(|a, b| a.0.cmp(b.0));
    vars
}

/// Renders the summary printed by `vxir parse`.
pub fn render_text(unit: &Unit) -> String {
    let mut out = String::new();
    out.push_str(&format!("files: {}\n", unit.files.len()));
    for file in unit.files.values() {
        let marker = if file.is_module { " (module)" } else { "" };
        out.push_str(&format!("  {} {}{}\n", file.key, file.filename, marker));
    }
    out.push_str(&format!("data types: {}\n", unit.dtypes.len()));

    let modules = unit.registered_modules();
    out.push_str(&format!("modules: {}\n", modules.len()));
    for (name, id) in modules {
        let module = &unit.modules[id];
        out.push_str(&format!(
            "  {name}: {} vars, {} blocks, {} instances\n",
            module.vars.len(),
            module.blocks.len(),
            module.instances.len()
        ));
        for (var_name, var) in sorted_vars(unit, module) {
            let dtype = var
                .dtype
                .map_or_else(|| "?".to_string(), |d| describe_dtype(unit, d));
            out.push_str(&format!("    {} {var_name}: {dtype}\n", direction(var)));
        }
        for &block in &module.blocks {
            let block = &unit.blocks[block];
            let label = block.name.map(|n| unit.resolve(n)).unwrap_or("-");
            out.push_str(&format!(
                "    {} {label}: {} exprs\n",
                block.kind.tag(),
                block.exprs.len()
            ));
        }
        for &instance in &module.instances {
            let instance = &unit.instances[instance];
            out.push_str(&format!(
                "    instance {}: {}\n",
                unit.resolve(instance.name),
                unit.resolve(instance.def_name)
            ));
        }
    }

    let roots = unit.hierarchy_roots();
    out.push_str(&format!("hierarchies: {}\n", roots.len()));
    for (name, _) in roots {
        out.push_str(&format!("  {name}\n"));
    }
    out
}

/// Builds the JSON document printed by `vxir parse --format json`.
pub fn to_json(unit: &Unit) -> Value {
    let files: Vec<Value> = unit
        .files
        .values()
        .map(|f| json!({ "key": f.key, "filename": f.filename, "is_module": f.is_module }))
        .collect();

    let modules: Vec<Value> = unit
        .registered_modules()
        .into_iter()
        .map(|(name, id)| {
            let module = &unit.modules[id];
            let vars: Vec<Value> = sorted_vars(unit, module)
                .into_iter()
                .map(|(var_name, var)| {
                    json!({
                        "name": var_name,
                        "direction": direction(var),
                        "dtype": var.dtype.map(|d| describe_dtype(unit, d)),
                    })
                })
                .collect();
            let blocks: Vec<Value> = module
                .blocks
                .iter()
                .map(|&b| {
                    let block = &unit.blocks[b];
                    json!({
                        "kind": block.kind.tag(),
                        "name": block.name.map(|n| unit.resolve(n)),
                        "exprs": block.exprs.len(),
                        "senses": block.senses.as_ref().map(|s| s.iter().map(|i| i.edge.tag()).collect::<Vec<_>>()),
                    })
                })
                .collect();
            let instances: Vec<Value> = module
                .instances
                .iter()
                .map(|&i| {
                    let instance = &unit.instances[i];
                    json!({
                        "name": unit.resolve(instance.name),
                        "module": unit.resolve(instance.def_name),
                        "ports": instance.ports.iter().map(|p| unit.resolve(p.name)).collect::<Vec<_>>(),
                    })
                })
                .collect();
            json!({
                "name": name,
                "orig_name": module.orig_name.map(|n| unit.resolve(n)),
                "vars": vars,
                "blocks": blocks,
                "instances": instances,
            })
        })
        .collect();

    let hierarchies: Vec<Value> = unit
        .hierarchy_roots()
        .into_iter()
        .map(|(_, root)| cell_json(unit, root))
        .collect();

    json!({
        "files": files,
        "data_types": unit.dtypes.len(),
        "modules": modules,
        "hierarchies": hierarchies,
    })
}

fn cell_json(unit: &Unit, id: CellId) -> Value {
    let cell = &unit.cells[id];
    json!({
        "name": unit.resolve(cell.name),
        "module": unit.resolve(cell.submodule),
        "children": cell.children.iter().map(|&c| cell_json(unit, c)).collect::<Vec<_>>(),
    })
}

/// Renders the cell tree under `root`, two spaces per level.
pub fn render_hierarchy(unit: &Unit, root: CellId) -> String {
    let mut out = String::new();
    let mut stack = vec![(root, 0usize)];
    while let Some((id, depth)) = stack.pop() {
        let cell = &unit.cells[id];
        let module = cell
            .module
            .map(|m| unit.resolve(unit.modules[m].name))
            .unwrap_or("?");
        out.push_str(&format!(
            "{:indent$}{} ({module})\n",
            "",
            unit.resolve(cell.name),
            indent = depth * 2
        ));
        for &child in cell.children.iter().rev() {
            stack.push((child, depth + 1));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use vxir_builder::build_unit;
    use vxir_config::ParserConfig;

    const DOC: &str = r#"<?xml version="1.0" ?>
<verilator_xml>
  <files>
    <file id="a" filename="top.v"/>
  </files>
  <module_files>
    <file id="a" filename="top.v"/>
  </module_files>
  <netlist>
    <module name="top" origName="top">
      <var name="clk" dtype_id="1" dir="input"/>
      <var name="q" dtype_id="1" dir="output"/>
      <var name="mem" dtype_id="3"/>
      <always>
        <sentree><senitem edgeType="POS"><varref name="clk"/></senitem></sentree>
        <begin><assigndly><varref name="clk"/><varref name="q"/></assigndly></begin>
      </always>
      <instance name="u0" defName="leaf"><port name="d"><varref name="q"/></port></instance>
    </module>
    <module name="leaf"/>
    <typetable>
      <basicdtype id="1" name="logic"/>
      <unpackarraydtype id="3" sub_dtype_id="1">
        <range><const name="32'h0"/><const name="32'h3"/></range>
      </unpackarraydtype>
    </typetable>
    <cells>
      <cell name="top" submodname="top"><cell name="u0" submodname="leaf"/></cell>
    </cells>
  </netlist>
</verilator_xml>
"#;

    fn unit() -> Unit {
        build_unit(DOC, &ParserConfig::default()).unwrap()
    }

    #[test]
    fn text_summary() {
        let text = render_text(&unit());
        assert!(text.contains("files: 1\n  a top.v (module)\n"));
        assert!(text.contains("modules: 2\n"));
        assert!(text.contains("  top: 3 vars, 1 blocks, 1 instances\n"));
        assert!(text.contains("    input clk: logic[0:0]\n"));
        assert!(text.contains("    var mem: logic[0:0][0:3]\n"));
        assert!(text.contains("    always -: 1 exprs\n"));
        assert!(text.contains("    instance u0: leaf\n"));
        assert!(text.ends_with("hierarchies: 1\n  top\n"));
    }

    #[test]
    fn json_summary() {
        let value = to_json(&unit());
        assert_eq!(value["files"][0]["is_module"], true);
        assert_eq!(value["modules"][0]["name"], "leaf");
        let top = &value["modules"][1];
        assert_eq!(top["vars"][1]["name"], "mem");
        assert_eq!(top["blocks"][0]["senses"][0], "POS");
        assert_eq!(top["instances"][0]["ports"][0], "d");
        assert_eq!(value["hierarchies"][0]["children"][0]["module"], "leaf");
    }

    #[test]
    fn hierarchy_tree() {
        let unit = unit();
        let root = unit.hierarchy_named("top").unwrap();
        assert_eq!(render_hierarchy(&unit, root), "top (top)\n  u0 (leaf)\n");
    }
}
