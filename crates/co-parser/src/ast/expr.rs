//! Expression nodes.

use co_core::Span;

use crate::ast::ops::{InfixOp, PrefixOp};
use crate::ast::Ident;

/// An expression.
#[derive(Debug, Clone, Copy)]
pub enum Expr<'ast> {
    /// `( e )`
    Paren(&'ast ParenExpr<'ast>),
    /// `42` — the lexeme is kept verbatim so the analyser can bounds-check
    /// against the target type.
    IntLiteral(LiteralExpr<'ast>),
    /// `3.25`, `1e9`
    DoubleLiteral(LiteralExpr<'ast>),
    /// `true` / `false`
    BoolLiteral(bool, Span),
    /// A bare name; the analyser decides whether it is a variable, a
    /// function, a type (cast target / static access) or unknown.
    Symbol(Ident<'ast>),
    /// `this`
    This(Span),
    /// `callee(args)`
    Call(&'ast CallExpr<'ast>),
    /// `object.name`
    Member(&'ast MemberExpr<'ast>),
    /// `left op right`
    Infix(&'ast InfixExpr<'ast>),
    /// `op operand`
    Prefix(&'ast PrefixExpr<'ast>),
    /// An operand the source does not contain; the analyser reports it.
    Missing(Span),
}

impl Expr<'_> {
    pub fn span(&self) -> Span {
        match self {
            Expr::Paren(e) => e.span,
            Expr::IntLiteral(e) | Expr::DoubleLiteral(e) => e.span,
            Expr::BoolLiteral(_, span) => *span,
            Expr::Symbol(ident) => ident.span,
            Expr::This(span) => *span,
            Expr::Call(e) => e.span,
            Expr::Member(e) => e.span,
            Expr::Infix(e) => e.span,
            Expr::Prefix(e) => e.span,
            Expr::Missing(span) => *span,
        }
    }
}

/// A parenthesized expression; kept as a node so the tree stays lossless.
#[derive(Debug, Clone, Copy)]
pub struct ParenExpr<'ast> {
    pub inner: &'ast Expr<'ast>,
    pub span: Span,
}

/// A numeric literal, stored as source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LiteralExpr<'ast> {
    pub text: &'ast str,
    pub span: Span,
}

/// A call; the callee is an arbitrary expression.
#[derive(Debug, Clone, Copy)]
pub struct CallExpr<'ast> {
    pub callee: &'ast Expr<'ast>,
    pub args: &'ast [Expr<'ast>],
    pub span: Span,
}

/// Member access `object.name`.
#[derive(Debug, Clone, Copy)]
pub struct MemberExpr<'ast> {
    pub object: &'ast Expr<'ast>,
    pub name: Ident<'ast>,
    pub span: Span,
}

/// An infix application.
#[derive(Debug, Clone, Copy)]
pub struct InfixExpr<'ast> {
    pub left: &'ast Expr<'ast>,
    pub op: InfixOp,
    pub op_span: Span,
    pub right: &'ast Expr<'ast>,
    pub span: Span,
}

/// A prefix application.
#[derive(Debug, Clone, Copy)]
pub struct PrefixExpr<'ast> {
    pub op: PrefixOp,
    pub operand: &'ast Expr<'ast>,
    pub span: Span,
}
