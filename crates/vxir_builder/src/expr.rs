//! Constructors for literals, references, operators and calls.

use vxir_common::{parse_hex_literal, sanitize};
use vxir_ir::{BinaryOp, Constant, Expr, ExtendOp, TernaryOp, UnaryOp, VarRef};
use vxir_tree::Node;

use crate::context::{attr, child_expr, expect_children, int_attr, optional_child_expr, IrBuilder};
use crate::deferred::{Fixup, TypeTarget};
use crate::error::ErrorKind;
use crate::payload::Payload;
use crate::tag::Tag;

impl IrBuilder {
    pub(crate) fn build_const(&mut self, node: &Node<Payload>) -> Result<Payload, ErrorKind> {
        let loc = self.location(node)?;
        let value = parse_hex_literal(attr(node, "name")?)?;
        let id = self.unit.exprs.alloc(Expr::Const(Constant {
            value,
            dtype: None,
            loc,
        }));
        self.defer_type(Tag::Const, node, TypeTarget::Expr(id), loc);
        Ok(Payload::Expr(id))
    }

    pub(crate) fn build_var_ref(&mut self, node: &Node<Payload>) -> Result<Payload, ErrorKind> {
        let loc = self.location(node)?;
        let name = self.unit.intern(&sanitize(attr(node, "name")?));
        let id = self.unit.exprs.alloc(Expr::VarRef(VarRef {
            name,
            dtype: None,
            var: None,
            loc,
        }));
        self.defer_type(Tag::VarRef, node, TypeTarget::Expr(id), loc);
        if self.options.resolve_varrefs {
            if let Some(module) = self.current_module {
                self.deferred.defer_back(Fixup::VarRef {
                    expr: id,
                    module,
                    loc,
                });
            }
        }
        Ok(Payload::Expr(id))
    }

    pub(crate) fn build_unary(
        &mut self,
        tag: Tag,
        node: &Node<Payload>,
        op: UnaryOp,
    ) -> Result<Payload, ErrorKind> {
        expect_children(node, 1, 1, "1")?;
        let loc = self.location(node)?;
        let operand = child_expr(node, 0)?;
        let id = self.unit.exprs.alloc(Expr::Unary {
            op,
            operand,
            dtype: None,
            loc,
        });
        self.defer_type(tag, node, TypeTarget::Expr(id), loc);
        Ok(Payload::Expr(id))
    }

    pub(crate) fn build_extend(
        &mut self,
        tag: Tag,
        node: &Node<Payload>,
        op: ExtendOp,
    ) -> Result<Payload, ErrorKind> {
        expect_children(node, 1, 1, "1")?;
        let loc = self.location(node)?;
        let operand = child_expr(node, 0)?;
        let width = int_attr(node, "width")?;
        let width_min = int_attr(node, "widthminv")?;
        if width != 32 {
            return Err(ErrorKind::ExtendWidth {
                tag: node.tag.clone(),
                width,
            });
        }
        let width_min = u32::try_from(width_min).map_err(|_| ErrorKind::BadInt {
            tag: node.tag.clone(),
            attr: "widthminv",
            value: width_min.to_string(),
        })?;
        let id = self.unit.exprs.alloc(Expr::Extend {
            op,
            operand,
            width: 32,
            width_min,
            dtype: None,
            loc,
        });
        self.defer_type(tag, node, TypeTarget::Expr(id), loc);
        Ok(Payload::Expr(id))
    }

    pub(crate) fn build_binary(
        &mut self,
        tag: Tag,
        node: &Node<Payload>,
        op: BinaryOp,
    ) -> Result<Payload, ErrorKind> {
        expect_children(node, 2, 2, "2")?;
        let loc = self.location(node)?;
        let lhs = child_expr(node, 0)?;
        let rhs = child_expr(node, 1)?;
        let id = self.unit.exprs.alloc(Expr::Binary {
            op,
            lhs,
            rhs,
            dtype: None,
            loc,
        });
        self.defer_type(tag, node, TypeTarget::Expr(id), loc);
        Ok(Payload::Expr(id))
    }

    /// An empty `changedet` produces nothing.
    pub(crate) fn build_change_det(&mut self, node: &Node<Payload>) -> Result<Option<Payload>, ErrorKind> {
        if node.children.is_empty() {
            return Ok(None);
        }
        self.build_binary(Tag::ChangeDet, node, BinaryOp::ChangeDet)
            .map(Some)
    }

    pub(crate) fn build_ternary(
        &mut self,
        tag: Tag,
        node: &Node<Payload>,
        op: TernaryOp,
    ) -> Result<Payload, ErrorKind> {
        expect_children(node, 3, 3, "3")?;
        let loc = self.location(node)?;
        let cond = child_expr(node, 0)?;
        let lhs = child_expr(node, 1)?;
        let rhs = child_expr(node, 2)?;
        let id = self.unit.exprs.alloc(Expr::Ternary {
            op,
            cond,
            lhs,
            rhs,
            dtype: None,
            loc,
        });
        self.defer_type(tag, node, TypeTarget::Expr(id), loc);
        Ok(Payload::Expr(id))
    }

    pub(crate) fn build_if(&mut self, node: &Node<Payload>) -> Result<Payload, ErrorKind> {
        expect_children(node, 2, 3, "2 or 3")?;
        let loc = self.location(node)?;
        let cond = child_expr(node, 0)?;
        let then_branch = child_expr(node, 1)?;
        let else_branch = optional_child_expr(node, 2)?;
        let id = self.unit.exprs.alloc(Expr::If {
            cond,
            then_branch,
            else_branch,
            loc,
        });
        Ok(Payload::Expr(id))
    }

    /// `while` and `for` loops: precondition, condition, body, increment.
    pub(crate) fn build_while(&mut self, node: &Node<Payload>) -> Result<Payload, ErrorKind> {
        expect_children(node, 2, 4, "2 to 4")?;
        let loc = self.location(node)?;
        let precond = child_expr(node, 0)?;
        let cond = child_expr(node, 1)?;
        let body = optional_child_expr(node, 2)?;
        let incr = optional_child_expr(node, 3)?;
        let id = self.unit.exprs.alloc(Expr::Loop {
            precond,
            cond,
            body,
            incr,
            loc,
        });
        Ok(Payload::Expr(id))
    }

    /// System tasks without a `func` attribute are named `$<tag>`.
    pub(crate) fn build_call(&mut self, tag: Tag, node: &Node<Payload>) -> Result<Payload, ErrorKind> {
        let loc = self.location(node)?;
        let func = match node.attr("func") {
            Some(name) if !name.is_empty() => self.unit.intern(name),
            _ => self.unit.intern(&format!("${}", tag.as_str())),
        };
        let args = self.member_exprs(node)?;
        let id = self.unit.exprs.alloc(Expr::Call { func, args, loc });
        Ok(Payload::Expr(id))
    }

    pub(crate) fn build_init_item(&mut self, node: &Node<Payload>) -> Result<Payload, ErrorKind> {
        expect_children(node, 1, 1, "1")?;
        let value = child_expr(node, 0)?;
        let index = int_attr(node, "index")?;
        let index = u32::try_from(index).map_err(|_| ErrorKind::BadInt {
            tag: node.tag.clone(),
            attr: "index",
            value: index.to_string(),
        })?;
        let id = self.unit.exprs.alloc(Expr::ArrayItem { index, value });
        Ok(Payload::Expr(id))
    }
}
