//! Constructors for the type table.

use vxir_ir::{BinaryOp, DataType, Expr, LogicType};
use vxir_tree::Node;

use crate::context::{attr, child_expr, expect_children, int_attr_or, IrBuilder};
use crate::deferred::Fixup;
use crate::error::ErrorKind;
use crate::payload::Payload;

impl IrBuilder {
    /// `logic`, `bit` and `integer` become logic types and `string` a native
    /// type. Any other name must already be registered and is aliased.
    pub(crate) fn build_basic_dtype(&mut self, node: &Node<Payload>) -> Result<Payload, ErrorKind> {
        let loc = self.location(node)?;
        let key = node.attr("id");
        let name = attr(node, "name")?;
        let dtype = match name {
            "logic" | "bit" | "integer" => DataType::Logic {
                range: LogicType {
                    left: int_attr_or(node, "left", 0)?,
                    right: int_attr_or(node, "right", 0)?,
                },
                loc,
            },
            "string" => DataType::Native {
                name: name.to_string(),
                loc,
            },
            other => {
                let existing = self
                    .unit
                    .data_type_by_key(other)
                    .ok_or_else(|| ErrorKind::UnknownTypeName(other.to_string()))?;
                if let Some(key) = key {
                    self.unit.alias_data_type(key, existing);
                    tracing::trace!(key, base = other, "data type aliased");
                }
                return Ok(Payload::DataType(existing));
            }
        };
        let id = match key {
            Some(key) => self.unit.register_data_type(key, dtype),
            None => self.unit.dtypes.alloc(dtype),
        };
        tracing::trace!(key, name, "data type registered");
        Ok(Payload::DataType(id))
    }

    /// The single `range` child must have two constant bounds.
    pub(crate) fn build_unpack_array_dtype(&mut self, node: &Node<Payload>) -> Result<Payload, ErrorKind> {
        expect_children(node, 1, 1, "1")?;
        let loc = self.location(node)?;
        let sub_key = attr(node, "sub_dtype_id")?;
        let range = child_expr(node, 0)?;
        let (low, high) = match &self.unit.exprs[range] {
            Expr::Binary {
                op: BinaryOp::Range,
                lhs,
                rhs,
                ..
            } if self.unit.exprs[*lhs].is_const() && self.unit.exprs[*rhs].is_const() => (*lhs, *rhs),
            _ => return Err(ErrorKind::NonConstRange),
        };
        let dtype = DataType::UnpackedArray {
            subtype: None,
            low,
            high,
            loc,
        };
        let id = match node.attr("id") {
            Some(key) => self.unit.register_data_type(key, dtype),
            None => self.unit.dtypes.alloc(dtype),
        };
        self.deferred.defer_front(Fixup::ArraySubtype {
            dtype: id,
            key: sub_key.to_string(),
            loc,
        });
        Ok(Payload::DataType(id))
    }
}
