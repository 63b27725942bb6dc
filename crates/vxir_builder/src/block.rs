//! Constructors for statement blocks, processes and sensitivity lists.

use vxir_ir::{Block, BlockKind, Edge, Expr, ExprId, SensItem};
use vxir_tree::Node;

use crate::context::{child_expr, IrBuilder};
use crate::error::ErrorKind;
use crate::payload::Payload;
use crate::tag::Tag;

impl IrBuilder {
    /// Collects the statements produced by `node`'s children.
    ///
    /// Children without a payload (`text`, `cstmt`, empty `changedet`) are
    /// skipped; local variable declarations become [`Expr::Decl`].
    pub(crate) fn member_exprs(&mut self, node: &Node<Payload>) -> Result<Vec<ExprId>, ErrorKind> {
        let mut exprs = Vec::with_capacity(node.children.len());
        for (index, child) in node.children.iter().enumerate() {
            let id = match &child.payload {
                None => continue,
                Some(Payload::Expr(id)) => *id,
                Some(Payload::Var(var)) => self.unit.exprs.alloc(Expr::Decl(*var)),
                Some(Payload::Process(block)) => self.unit.exprs.alloc(Expr::Block(*block)),
                Some(_) => {
                    return Err(ErrorKind::UnexpectedPayload {
                        tag: node.tag.clone(),
                        index,
                        expected: "a statement",
                    })
                }
            };
            exprs.push(id);
        }
        Ok(exprs)
    }

    fn new_block(&mut self, node: &Node<Payload>, kind: BlockKind) -> Result<Block, ErrorKind> {
        let loc = self.location(node)?;
        let name = node.attr("name").map(|n| self.unit.intern(n));
        let exprs = self.member_exprs(node)?;
        Ok(Block {
            kind,
            name,
            senses: None,
            exprs,
            loc,
        })
    }

    /// `begin`, `initarray` and `sformatf` become block expressions.
    pub(crate) fn build_block(
        &mut self,
        tag: Tag,
        node: &Node<Payload>,
        kind: BlockKind,
    ) -> Result<Payload, ErrorKind> {
        let block = self.new_block(node, kind)?;
        let block = self.unit.blocks.alloc(block);
        let id = self.unit.exprs.alloc(Expr::Block(block));
        tracing::trace!(tag = tag.as_str(), ?block, "block built");
        Ok(Payload::Expr(id))
    }

    pub(crate) fn build_cfunc(&mut self, node: &Node<Payload>) -> Result<Payload, ErrorKind> {
        let module = self.require_module(Tag::CFunc)?;
        let block = self.new_block(node, BlockKind::CFunc)?;
        let block = self.unit.blocks.alloc(block);
        self.unit.modules[module].blocks.push(block);
        Ok(Payload::Process(block))
    }

    /// `always` has either a sensitivity list and a body, or only a body.
    pub(crate) fn build_always(&mut self, node: &Node<Payload>) -> Result<Payload, ErrorKind> {
        let module = self.require_module(Tag::Always)?;
        let loc = self.location(node)?;
        let (senses, body) = match node.children.len() {
            2 => {
                let senses = match &node.children[0].payload {
                    Some(Payload::SensList(items)) => items.clone(),
                    _ => {
                        return Err(ErrorKind::UnexpectedPayload {
                            tag: node.tag.clone(),
                            index: 0,
                            expected: "a sensitivity list",
                        })
                    }
                };
                (Some(senses), child_expr(node, 1)?)
            }
            1 => (None, child_expr(node, 0)?),
            found => {
                return Err(ErrorKind::Arity {
                    tag: node.tag.clone(),
                    expected: "1 or 2",
                    found,
                })
            }
        };
        let block = self.unit.blocks.alloc(Block {
            kind: BlockKind::Always,
            name: None,
            senses,
            exprs: vec![body],
            loc,
        });
        self.unit.modules[module].blocks.push(block);
        Ok(Payload::Process(block))
    }

    pub(crate) fn build_sen_tree(&mut self, node: &Node<Payload>) -> Result<Payload, ErrorKind> {
        let mut items = Vec::with_capacity(node.children.len());
        for (index, child) in node.children.iter().enumerate() {
            match &child.payload {
                Some(Payload::Sens(item)) => items.push(item.clone()),
                _ => {
                    return Err(ErrorKind::UnexpectedPayload {
                        tag: node.tag.clone(),
                        index,
                        expected: "a sensitivity item",
                    })
                }
            }
        }
        Ok(Payload::SensList(items))
    }

    /// The item's signal is only kept when `sensitivity_operands` is set.
    pub(crate) fn build_sen_item(&mut self, node: &Node<Payload>) -> Result<Payload, ErrorKind> {
        let value = node.attr("edgeType").unwrap_or_default();
        let edge = Edge::from_attr(value).ok_or_else(|| ErrorKind::BadEdge(value.to_string()))?;
        let loc = self.location(node)?;
        let expr = if self.options.sensitivity_operands && !node.children.is_empty() {
            Some(child_expr(node, 0)?)
        } else {
            None
        };
        Ok(Payload::Sens(SensItem { edge, expr, loc }))
    }
}
