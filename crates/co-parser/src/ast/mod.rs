//! The raw (lossless) CO syntax tree.
//!
//! Nodes are arena-allocated and `Copy` where possible; child lists are
//! arena slices. The tree deliberately stays close to the source text: the
//! analyser, not the parser, decides what a name means, and absent operands
//! survive as [`expr::Expr::Missing`] placeholders.

pub mod decl;
pub mod expr;
pub mod ops;
pub mod stmt;

pub use decl::{
    ConstructorDef, FunctionDef, GlobalDef, Member, Param, Program, TypeDef, TypeExpr,
    VariableDecl, VariablesDef,
};
pub use expr::{CallExpr, Expr, InfixExpr, LiteralExpr, MemberExpr, ParenExpr, PrefixExpr};
pub use ops::{InfixOp, PrefixOp};
pub use stmt::{CodeBlock, IfElseStmt, ReturnStmt, Stmt, WhileStmt};

use co_core::Span;

/// An identifier with its location.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ident<'ast> {
    pub name: &'ast str,
    pub span: Span,
}

impl<'ast> Ident<'ast> {
    #[inline]
    pub fn new(name: &'ast str, span: Span) -> Self {
        Self { name, span }
    }
}
