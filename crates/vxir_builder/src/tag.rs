//! The closed set of tags the builder understands.

use vxir_ir::{BinaryOp, ExtendOp, TernaryOp, UnaryOp};

macro_rules! define_tags {
    ($($variant:ident => $name:literal,)*) => {
        /// A recognized element tag.
        ///
        /// Operator tags carry the operator they build; every other tag has
        /// its own variant.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum Tag {
            $(
                #[doc = concat!("`<", $name, ">`")]
                $variant,
            )*
            /// A single-operand operator.
            Unary(UnaryOp),
            /// `extend` or `extends`.
            Extend(ExtendOp),
            /// A two-operand operator or assignment.
            Binary(BinaryOp),
            /// A three-operand selection.
            Ternary(TernaryOp),
        }

        const NAMED: &[(&str, Tag)] = &[$(($name, Tag::$variant),)*];

        impl Tag {
            /// Looks up a tag by name. Names are case-sensitive.
            pub fn from_name(name: &str) -> Option<Tag> {
                if let Some((_, tag)) = NAMED.iter().find(|(n, _)| *n == name) {
                    return Some(*tag);
                }
                if let Some(op) = UnaryOp::ALL.iter().find(|op| op.tag() == name) {
                    return Some(Tag::Unary(*op));
                }
                if let Some(op) = ExtendOp::ALL.iter().find(|op| op.tag() == name) {
                    return Some(Tag::Extend(*op));
                }
                if let Some(op) = BinaryOp::ALL.iter().find(|op| op.tag() == name) {
                    return Some(Tag::Binary(*op));
                }
                TernaryOp::ALL
                    .iter()
                    .find(|op| op.tag() == name)
                    .map(|op| Tag::Ternary(*op))
            }

            /// The tag name.
            pub fn as_str(self) -> &'static str {
                match self {
                    $(Tag::$variant => $name,)*
                    Tag::Unary(op) => op.tag(),
                    Tag::Extend(op) => op.tag(),
                    Tag::Binary(op) => op.tag(),
                    Tag::Ternary(op) => op.tag(),
                }
            }
        }
    };
}

define_tags! {
    VerilatorXml => "verilator_xml",
    Netlist => "netlist",
    Files => "files",
    TypeTable => "typetable",
    ConstPool => "constpool",
    Scope => "scope",
    TopScope => "topscope",
    Text => "text",
    CStmt => "cstmt",
    CFile => "cfile",
    File => "file",
    ModuleFiles => "module_files",
    Module => "module",
    Var => "var",
    Const => "const",
    VarRef => "varref",
    Always => "always",
    SenTree => "sentree",
    SenItem => "senitem",
    Begin => "begin",
    InitArray => "initarray",
    InitItem => "inititem",
    CFunc => "cfunc",
    SFormatF => "sformatf",
    Instance => "instance",
    Port => "port",
    Cells => "cells",
    Cell => "cell",
    BasicDType => "basicdtype",
    UnpackArrayDType => "unpackarraydtype",
    ChangeDet => "changedet",
    If => "if",
    While => "while",
    CCall => "ccall",
    Finish => "finish",
    Stop => "stop",
    Rand => "rand",
    Time => "time",
    Display => "display",
    ReadMem => "readmem",
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn named_tags() {
        assert_eq!(Tag::from_name("module"), Some(Tag::Module));
        assert_eq!(Tag::from_name("unpackarraydtype"), Some(Tag::UnpackArrayDType));
        assert_eq!(Tag::from_name("readmem"), Some(Tag::ReadMem));
    }

    #[test]
    fn operator_tags() {
        assert_eq!(Tag::from_name("redxor"), Some(Tag::Unary(UnaryOp::RedXor)));
        assert_eq!(Tag::from_name("extends"), Some(Tag::Extend(ExtendOp::ExtendS)));
        assert_eq!(Tag::from_name("assigndly"), Some(Tag::Binary(BinaryOp::AssignDly)));
        assert_eq!(Tag::from_name("sel"), Some(Tag::Ternary(TernaryOp::Sel)));
    }

    #[test]
    fn changedet_has_its_own_rule() {
        assert_eq!(Tag::from_name("changedet"), Some(Tag::ChangeDet));
    }

    #[test]
    fn unknown_and_case_mismatched_names() {
        assert_eq!(Tag::from_name("typedef"), None);
        assert_eq!(Tag::from_name("Module"), None);
        assert_eq!(Tag::from_name(""), None);
        assert_eq!(Tag::from_name("?xml"), None);
    }

    #[test]
    fn names_round_trip() {
        for name in ["cells", "ccall", "if", "not", "extend", "range", "condbound"] {
            let tag = Tag::from_name(name).unwrap();
            assert_eq!(tag.as_str(), name);
        }
    }
}
