//! Constructors for files, modules, variables, instances and the cell tree.

use vxir_common::sanitize;
use vxir_ir::{Block, BlockKind, HierCell, Instance, Module, Port, SourceFile, Variable};
use vxir_tree::Node;

use crate::context::{attr, child_expr, expect_children, IrBuilder};
use crate::deferred::{Fixup, TypeTarget};
use crate::error::ErrorKind;
use crate::payload::Payload;
use crate::tag::Tag;

impl IrBuilder {
    pub(crate) fn build_file(&mut self, node: &Node<Payload>) -> Result<Payload, ErrorKind> {
        let key = attr(node, "id")?;
        let filename = attr(node, "filename")?;
        let id = self.unit.upsert_file(SourceFile {
            key: key.to_string(),
            filename: filename.to_string(),
            is_module: false,
        });
        tracing::debug!(key, filename, "file registered");
        Ok(Payload::File(id))
    }

    pub(crate) fn mark_module_files(&mut self, node: &Node<Payload>) {
        for child in &node.children {
            if let Some(Payload::File(id)) = child.payload {
                self.unit.files[id].is_module = true;
            }
        }
    }

    /// Starts a module. Everything until the matching close belongs to it.
    pub(crate) fn open_module(&mut self, node: &Node<Payload>) -> Result<Payload, ErrorKind> {
        let name = attr(node, "name")?;
        if self.current_module.is_some() {
            return Err(ErrorKind::NestedModule(name.to_string()));
        }
        let loc = self.location(node)?;
        let mut module = Module::new(self.unit.intern(name));
        module.orig_name = node.attr("origName").map(|n| self.unit.intern(n));
        module.loc = loc;
        let id = self.unit.modules.alloc(module);
        self.current_module = Some(id);
        tracing::debug!(name, "module opened");
        Ok(Payload::Module(id))
    }

    /// Finishes the current module: collects its variables, wraps its direct
    /// statements in an implicit block, and registers it by name.
    pub(crate) fn close_module(&mut self, node: &Node<Payload>) -> Result<Payload, ErrorKind> {
        let id = self.require_module(Tag::Module)?;
        let mut statements = Vec::new();
        for child in &node.children {
            match child.payload {
                Some(Payload::Var(var)) => {
                    let name = self.unit.vars[var].name;
                    self.unit.modules[id].vars.insert(name, var);
                }
                Some(Payload::Expr(expr)) => statements.push(expr),
                _ => {}
            }
        }
        if !statements.is_empty() {
            let loc = self.unit.modules[id].loc;
            let block = self.unit.blocks.alloc(Block {
                kind: BlockKind::Module,
                name: None,
                senses: None,
                exprs: statements,
                loc,
            });
            self.unit.modules[id].blocks.push(block);
        }
        self.unit.register_module(id);
        self.current_module = None;
        let module = &self.unit.modules[id];
        tracing::debug!(
            name = self.unit.resolve(module.name),
            vars = module.vars.len(),
            blocks = module.blocks.len(),
            instances = module.instances.len(),
            "module closed"
        );
        Ok(Payload::Module(id))
    }

    pub(crate) fn build_var(&mut self, node: &Node<Payload>) -> Result<Payload, ErrorKind> {
        let loc = self.location(node)?;
        let mut var = Variable::new(self.unit.intern(&sanitize(attr(node, "name")?)));
        var.orig_name = node.attr("origName").map(|n| self.unit.intern(n));
        var.is_input = node.attr("dir") == Some("input");
        var.is_output = node.attr("dir") == Some("output");
        var.is_param = node.attr("param") == Some("true");
        var.const_value = first_expr_tagged(node, Tag::Const);
        var.init_value = first_expr_tagged(node, Tag::InitArray);
        var.loc = loc;
        let id = self.unit.vars.alloc(var);
        self.defer_type(Tag::Var, node, TypeTarget::Var(id), loc);
        Ok(Payload::Var(id))
    }

    pub(crate) fn build_instance(&mut self, node: &Node<Payload>) -> Result<Payload, ErrorKind> {
        let module = self.require_module(Tag::Instance)?;
        let loc = self.location(node)?;
        let def_name = attr(node, "defName")?;
        let mut ports = Vec::with_capacity(node.children.len());
        for (index, child) in node.children.iter().enumerate() {
            match &child.payload {
                Some(Payload::Port(port)) => ports.push(port.clone()),
                None => {}
                Some(_) => {
                    return Err(ErrorKind::UnexpectedPayload {
                        tag: node.tag.clone(),
                        index,
                        expected: "a port",
                    })
                }
            }
        }
        let instance = Instance {
            name: self.unit.intern(attr(node, "name")?),
            orig_name: node.attr("origName").map(|n| self.unit.intern(n)),
            def_name: self.unit.intern(def_name),
            ports,
            module: None,
            loc,
        };
        let id = self.unit.instances.alloc(instance);
        self.unit.modules[module].instances.push(id);
        self.deferred.defer_front(Fixup::InstanceModule {
            instance: id,
            name: def_name.to_string(),
            loc,
        });
        Ok(Payload::Instance(id))
    }

    pub(crate) fn build_port(&mut self, node: &Node<Payload>) -> Result<Payload, ErrorKind> {
        expect_children(node, 1, 1, "1")?;
        let loc = self.location(node)?;
        let expr = child_expr(node, 0)?;
        let name = self.unit.intern(attr(node, "name")?);
        Ok(Payload::Port(Port { name, expr, loc }))
    }

    /// Registers the first child cell as a hierarchy root.
    pub(crate) fn register_cells(&mut self, node: &Node<Payload>) -> Result<(), ErrorKind> {
        if node.children.is_empty() {
            return Err(ErrorKind::Arity {
                tag: node.tag.clone(),
                expected: "at least 1",
                found: 0,
            });
        }
        match node.children[0].payload {
            Some(Payload::Cell(root)) => {
                self.unit.register_hierarchy(root);
                tracing::debug!(root = self.unit.resolve(self.unit.cells[root].name), "hierarchy registered");
                Ok(())
            }
            _ => Err(ErrorKind::UnexpectedPayload {
                tag: node.tag.clone(),
                index: 0,
                expected: "a cell",
            }),
        }
    }

    pub(crate) fn build_cell(&mut self, node: &Node<Payload>) -> Result<Payload, ErrorKind> {
        let loc = self.location(node)?;
        let submodule = attr(node, "submodname")?;
        let mut children = Vec::with_capacity(node.children.len());
        for (index, child) in node.children.iter().enumerate() {
            match child.payload {
                Some(Payload::Cell(cell)) => children.push(cell),
                _ => {
                    return Err(ErrorKind::UnexpectedPayload {
                        tag: node.tag.clone(),
                        index,
                        expected: "a cell",
                    })
                }
            }
        }
        let cell = HierCell {
            name: self.unit.intern(attr(node, "name")?),
            submodule: self.unit.intern(submodule),
            module: None,
            parent: None,
            children,
            loc,
        };
        let id = self.unit.cells.alloc(cell);
        for child in self.unit.cells[id].children.clone() {
            self.unit.cells[child].parent = Some(id);
        }
        self.deferred.defer_front(Fixup::CellModule {
            cell: id,
            name: submodule.to_string(),
            loc,
        });
        Ok(Payload::Cell(id))
    }
}

fn first_expr_tagged(node: &Node<Payload>, tag: Tag) -> Option<vxir_ir::ExprId> {
    node.children_tagged(tag.as_str())
        .next()
        .and_then(|child| match child.payload {
            Some(Payload::Expr(id)) => Some(id),
            _ => None,
        })
}
