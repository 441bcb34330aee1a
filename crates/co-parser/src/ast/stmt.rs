//! Statement nodes.

use co_core::Span;

use crate::ast::decl::VariablesDef;
use crate::ast::expr::Expr;

/// `{ statements }` plus its braces' span.
#[derive(Debug, Clone, Copy)]
pub struct CodeBlock<'ast> {
    pub statements: &'ast [Stmt<'ast>],
    pub span: Span,
}

/// A statement.
#[derive(Debug, Clone, Copy)]
pub enum Stmt<'ast> {
    /// `expr;`
    Expr(&'ast Expr<'ast>),
    /// A nested block.
    Block(CodeBlock<'ast>),
    /// `type a = e, b;`
    Variables(&'ast VariablesDef<'ast>),
    /// `if (cond) stmt [else stmt]`
    IfElse(&'ast IfElseStmt<'ast>),
    /// `while (cond) stmt`
    While(&'ast WhileStmt<'ast>),
    /// `return [expr];`
    Return(&'ast ReturnStmt<'ast>),
}

impl Stmt<'_> {
    pub fn span(&self) -> Span {
        match self {
            Stmt::Expr(e) => e.span(),
            Stmt::Block(block) => block.span,
            Stmt::Variables(def) => def.span,
            Stmt::IfElse(stmt) => stmt.span,
            Stmt::While(stmt) => stmt.span,
            Stmt::Return(stmt) => stmt.span,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct IfElseStmt<'ast> {
    pub condition: &'ast Expr<'ast>,
    pub then_branch: &'ast Stmt<'ast>,
    pub else_branch: Option<&'ast Stmt<'ast>>,
    pub span: Span,
}

#[derive(Debug, Clone, Copy)]
pub struct WhileStmt<'ast> {
    pub condition: &'ast Expr<'ast>,
    pub body: &'ast Stmt<'ast>,
    pub span: Span,
}

#[derive(Debug, Clone, Copy)]
pub struct ReturnStmt<'ast> {
    pub value: Option<&'ast Expr<'ast>>,
    pub span: Span,
}
