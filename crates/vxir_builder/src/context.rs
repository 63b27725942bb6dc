//! Builder state and tag dispatch.
//!
//! [`IrBuilder`] is the [`TreeVisitor`] driven by the tree reader. It owns
//! the [`Unit`] under construction, the current-module context, the deferred
//! queue, and a trace of the last node seen. The per-tag constructors live in
//! the sibling modules as further `impl IrBuilder` blocks.

use vxir_config::{ParserConfig, ParserOptions};
use vxir_ir::{BlockKind, DataType, ExprId, ModuleId, SourceLoc, Unit};
use vxir_source::RawLoc;
use vxir_tree::{Node, TreeVisitor};

use crate::deferred::{DeferredQueue, Fixup, TypeTarget};
use crate::error::{BuildError, ErrorKind};
use crate::payload::Payload;
use crate::tag::Tag;

/// The last node the builder opened or closed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeTrace {
    /// Tag name as written.
    pub tag: String,
    /// Raw `loc` attribute, if any.
    pub loc: Option<String>,
    /// Byte offset of the node in the document.
    pub offset: usize,
}

/// Builds a [`Unit`] from one Verilator XML document.
///
/// A builder reads a single document. After [`parse`](Self::parse) fails the
/// builder holds a partial unit and should be dropped;
/// [`last_node`](Self::last_node) still reports where the failure happened.
#[derive(Debug)]
pub struct IrBuilder {
    pub(crate) unit: Unit,
    pub(crate) options: ParserOptions,
    pub(crate) current_module: Option<ModuleId>,
    pub(crate) deferred: DeferredQueue,
    last_node: Option<NodeTrace>,
}

impl IrBuilder {
    /// Creates a builder with `IData` and the configured types pre-registered.
    pub fn new(config: &ParserConfig) -> Self {
        let mut unit = Unit::new();
        unit.register_data_type("IData", DataType::logic(31, 0));
        for (name, builtin) in &config.types {
            tracing::debug!(name = %name, left = builtin.left, right = builtin.right, "registering configured type");
            unit.register_data_type(name, DataType::logic(builtin.left, builtin.right));
        }
        Self {
            unit,
            options: config.parser,
            current_module: None,
            deferred: DeferredQueue::new(),
            last_node: None,
        }
    }

    /// Reads `source` and resolves every deferred reference.
    #[tracing::instrument(level = "debug", skip_all, fields(bytes = source.len()))]
    pub fn parse(&mut self, source: &str) -> Result<(), BuildError> {
        vxir_tree::read_tree(source, self)?;
        self.deferred.run(&mut self.unit)?;
        tracing::debug!(
            modules = self.unit.modules.len(),
            exprs = self.unit.exprs.len(),
            "document built"
        );
        Ok(())
    }

    /// The unit built so far.
    pub fn unit(&self) -> &Unit {
        &self.unit
    }

    /// Consumes the builder and returns the unit.
    pub fn finish(self) -> Unit {
        self.unit
    }

    /// The last node opened or closed, for error reporting.
    pub fn last_node(&self) -> Option<&NodeTrace> {
        self.last_node.as_ref()
    }

    /// Number of references waiting for resolution.
    pub fn pending(&self) -> usize {
        self.deferred.len()
    }

    fn trace(&mut self, node: &Node<Payload>) {
        self.last_node = Some(NodeTrace {
            tag: node.tag.clone(),
            loc: node.attr("loc").map(str::to_string),
            offset: node.offset,
        });
    }

    fn fail(&self, node: &Node<Payload>, kind: ErrorKind) -> BuildError {
        let loc = self.location(node).ok().flatten();
        BuildError {
            kind,
            tag: Some(node.tag.clone()),
            file: loc
                .and_then(|l| l.file)
                .and_then(|f| self.unit.files.get(f))
                .map(|f| f.filename.clone()),
            loc,
        }
    }

    /// Parses the node's `loc` attribute against the files registered so far.
    pub(crate) fn location(&self, node: &Node<Payload>) -> Result<Option<SourceLoc>, ErrorKind> {
        let Some(text) = node.attr("loc") else {
            return Ok(None);
        };
        let raw = RawLoc::parse(text)?;
        let file = self.unit.file_by_key(raw.file_key);
        Ok(Some(SourceLoc::new(file, raw.line, raw.col)))
    }

    /// Queues resolution of the node's `dtype_id`, if it has one.
    pub(crate) fn defer_type(
        &mut self,
        tag: Tag,
        node: &Node<Payload>,
        target: TypeTarget,
        loc: Option<SourceLoc>,
    ) {
        if let Some(key) = node.attr("dtype_id") {
            self.deferred.defer_front(Fixup::DataType {
                target,
                key: key.to_string(),
                tag: tag.as_str(),
                loc,
            });
        }
    }

    /// The module being built, or an error naming `tag`.
    pub(crate) fn require_module(&self, tag: Tag) -> Result<ModuleId, ErrorKind> {
        self.current_module
            .ok_or_else(|| ErrorKind::OutsideModule(tag.as_str().to_string()))
    }

    fn dispatch(&mut self, tag: Tag, node: &Node<Payload>) -> Result<Option<Payload>, ErrorKind> {
        let payload = match tag {
            Tag::VerilatorXml
            | Tag::Netlist
            | Tag::Files
            | Tag::TypeTable
            | Tag::ConstPool
            | Tag::Scope
            | Tag::TopScope
            | Tag::Text
            | Tag::CStmt
            | Tag::CFile => None,
            Tag::File => Some(self.build_file(node)?),
            Tag::ModuleFiles => {
                self.mark_module_files(node);
                None
            }
            Tag::Module => Some(self.close_module(node)?),
            Tag::Var => Some(self.build_var(node)?),
            Tag::Const => Some(self.build_const(node)?),
            Tag::VarRef => Some(self.build_var_ref(node)?),
            Tag::Always => Some(self.build_always(node)?),
            Tag::SenTree => Some(self.build_sen_tree(node)?),
            Tag::SenItem => Some(self.build_sen_item(node)?),
            Tag::Begin => Some(self.build_block(tag, node, BlockKind::Begin)?),
            Tag::InitArray => Some(self.build_block(tag, node, BlockKind::InitArray)?),
            Tag::SFormatF => Some(self.build_block(tag, node, BlockKind::SFormatF)?),
            Tag::InitItem => Some(self.build_init_item(node)?),
            Tag::CFunc => Some(self.build_cfunc(node)?),
            Tag::Instance => Some(self.build_instance(node)?),
            Tag::Port => Some(self.build_port(node)?),
            Tag::Cells => {
                self.register_cells(node)?;
                None
            }
            Tag::Cell => Some(self.build_cell(node)?),
            Tag::BasicDType => Some(self.build_basic_dtype(node)?),
            Tag::UnpackArrayDType => Some(self.build_unpack_array_dtype(node)?),
            Tag::ChangeDet => self.build_change_det(node)?,
            Tag::If => Some(self.build_if(node)?),
            Tag::While => Some(self.build_while(node)?),
            Tag::CCall
            | Tag::Finish
            | Tag::Stop
            | Tag::Rand
            | Tag::Time
            | Tag::Display
            | Tag::ReadMem => Some(self.build_call(tag, node)?),
            Tag::Unary(op) => Some(self.build_unary(tag, node, op)?),
            Tag::Extend(op) => Some(self.build_extend(tag, node, op)?),
            Tag::Binary(op) => Some(self.build_binary(tag, node, op)?),
            Tag::Ternary(op) => Some(self.build_ternary(tag, node, op)?),
        };
        Ok(payload)
    }
}

impl TreeVisitor for IrBuilder {
    type Payload = Payload;
    type Error = BuildError;

    fn open(&mut self, node: &Node<Payload>) -> Result<Option<Payload>, BuildError> {
        self.trace(node);
        if node.tag != Tag::Module.as_str() {
            return Ok(None);
        }
        self.open_module(node)
            .map(Some)
            .map_err(|kind| self.fail(node, kind))
    }

    fn close(&mut self, node: &Node<Payload>) -> Result<Option<Payload>, BuildError> {
        self.trace(node);
        let result = match Tag::from_name(&node.tag) {
            Some(tag) => self.dispatch(tag, node),
            None => Err(ErrorKind::UnknownTag(node.tag.clone())),
        };
        result.map_err(|kind| self.fail(node, kind))
    }
}

/// Returns a required attribute.
pub(crate) fn attr<'n>(node: &'n Node<Payload>, name: &'static str) -> Result<&'n str, ErrorKind> {
    node.attr(name).ok_or_else(|| ErrorKind::MissingAttr {
        tag: node.tag.clone(),
        attr: name,
    })
}

/// Parses a required integer attribute.
pub(crate) fn int_attr(node: &Node<Payload>, name: &'static str) -> Result<i64, ErrorKind> {
    parse_int(node, name, attr(node, name)?)
}

/// Parses an optional integer attribute, defaulting when absent.
pub(crate) fn int_attr_or(node: &Node<Payload>, name: &'static str, default: i64) -> Result<i64, ErrorKind> {
    match node.attr(name) {
        Some(value) => parse_int(node, name, value),
        None => Ok(default),
    }
}

fn parse_int(node: &Node<Payload>, name: &'static str, value: &str) -> Result<i64, ErrorKind> {
    value.trim().parse().map_err(|_| ErrorKind::BadInt {
        tag: node.tag.clone(),
        attr: name,
        value: value.to_string(),
    })
}

/// Checks the child count against `min..=max`.
pub(crate) fn expect_children(
    node: &Node<Payload>,
    min: usize,
    max: usize,
    expected: &'static str,
) -> Result<(), ErrorKind> {
    let found = node.children.len();
    if found < min || found > max {
        return Err(ErrorKind::Arity {
            tag: node.tag.clone(),
            expected,
            found,
        });
    }
    Ok(())
}

/// The expression produced by child `index`.
pub(crate) fn child_expr(node: &Node<Payload>, index: usize) -> Result<ExprId, ErrorKind> {
    match node.children.get(index).and_then(|c| c.payload.as_ref()) {
        Some(Payload::Expr(id)) => Ok(*id),
        _ => Err(ErrorKind::UnexpectedPayload {
            tag: node.tag.clone(),
            index,
            expected: "an expression",
        }),
    }
}

/// Like [`child_expr`], but `None` when there is no child at `index`.
pub(crate) fn optional_child_expr(node: &Node<Payload>, index: usize) -> Result<Option<ExprId>, ErrorKind> {
    if index >= node.children.len() {
        return Ok(None);
    }
    child_expr(node, index).map(Some)
}
