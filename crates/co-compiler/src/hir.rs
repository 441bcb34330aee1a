//! The typed tree produced by body analysis and consumed by the backend.
//!
//! Every expression carries its resolved [`TypeId`]. Reference semantics are
//! explicit: reading a variable yields its reference type, and the analyser
//! inserts [`Expr::ImplicitDereferencing`] wherever a value is required, so
//! the backend never reasons about coercions. Analysis failures become
//! [`Expr::Invalid`] nodes typed `unknownType`, which propagate silently.

use co_core::Span;

use crate::ids::{FuncId, ScopeId, TypeId, VarId};

/// A typed expression.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    IntLiteral {
        value: i32,
        ty: TypeId,
        span: Span,
    },
    DoubleLiteral {
        value: f64,
        ty: TypeId,
        span: Span,
    },
    BoolLiteral {
        value: bool,
        ty: TypeId,
        span: Span,
    },
    /// Reading a value-typed variable produces a reference to its storage.
    VariableReference {
        variable: VarId,
        /// Always `var.ty`'s reference type.
        ty: TypeId,
        span: Span,
    },
    /// Reading a reference-typed variable adds no further indirection.
    ReferenceVariableReference {
        variable: VarId,
        /// Equals `var.ty`.
        ty: TypeId,
        span: Span,
    },
    /// A named callable in callee position; consumed by call analysis.
    FunctionReference {
        function: FuncId,
        span: Span,
    },
    /// An overload set in callee position; consumed by call analysis.
    OverloadedFunctionReference {
        functions: Vec<FuncId>,
        span: Span,
    },
    FunctionCall {
        function: FuncId,
        args: Vec<Expr>,
        ty: TypeId,
        span: Span,
    },
    MethodCall {
        method: FuncId,
        instance: Box<Expr>,
        args: Vec<Expr>,
        ty: TypeId,
        span: Span,
    },
    FieldAccess {
        instance: Box<Expr>,
        field: VarId,
        /// The field type, or its reference when the instance is a
        /// reference.
        ty: TypeId,
        span: Span,
    },
    /// Drops one level of reference to produce an rvalue.
    ImplicitDereferencing {
        inner: Box<Expr>,
        ty: TypeId,
        span: Span,
    },
    /// The silent placeholder for failed analysis; typed `unknownType`.
    Invalid {
        ty: TypeId,
        span: Span,
    },
}

impl Expr {
    /// The resolved type. Callee references have no value type and answer
    /// `None`; they never survive into a finished tree.
    pub fn ty(&self) -> Option<TypeId> {
        match self {
            Expr::IntLiteral { ty, .. }
            | Expr::DoubleLiteral { ty, .. }
            | Expr::BoolLiteral { ty, .. }
            | Expr::VariableReference { ty, .. }
            | Expr::ReferenceVariableReference { ty, .. }
            | Expr::FunctionCall { ty, .. }
            | Expr::MethodCall { ty, .. }
            | Expr::FieldAccess { ty, .. }
            | Expr::ImplicitDereferencing { ty, .. }
            | Expr::Invalid { ty, .. } => Some(*ty),
            Expr::FunctionReference { .. } | Expr::OverloadedFunctionReference { .. } => None,
        }
    }

    pub fn span(&self) -> Span {
        match self {
            Expr::IntLiteral { span, .. }
            | Expr::DoubleLiteral { span, .. }
            | Expr::BoolLiteral { span, .. }
            | Expr::VariableReference { span, .. }
            | Expr::ReferenceVariableReference { span, .. }
            | Expr::FunctionReference { span, .. }
            | Expr::OverloadedFunctionReference { span, .. }
            | Expr::FunctionCall { span, .. }
            | Expr::MethodCall { span, .. }
            | Expr::FieldAccess { span, .. }
            | Expr::ImplicitDereferencing { span, .. }
            | Expr::Invalid { span, .. } => *span,
        }
    }

    pub fn is_invalid(&self) -> bool {
        matches!(self, Expr::Invalid { .. })
    }
}

/// An inner scope plus its ordered statements.
#[derive(Debug, Clone, PartialEq)]
pub struct CodeBlock {
    pub scope: ScopeId,
    pub statements: Vec<Stmt>,
}

/// A typed statement.
#[derive(Debug, Clone, PartialEq)]
pub enum Stmt {
    Expr(Expr),
    Block(CodeBlock),
    /// Synthesised at a variable-definition site: run `constructor` with
    /// `args` to produce the variable's initial value.
    VariableInit(VariableInit),
    IfElse {
        condition: Expr,
        then_block: CodeBlock,
        else_block: Option<CodeBlock>,
        span: Span,
    },
    While {
        condition: Expr,
        body: CodeBlock,
        span: Span,
    },
    Return {
        value: Option<Expr>,
        span: Span,
    },
}

/// The `VariableConstructorCall` of a definition site.
///
/// `constructor` is `None` for reference-typed variables, which bind to an
/// existing storage location instead of constructing one; `args` then holds
/// the single reference expression being bound.
#[derive(Debug, Clone, PartialEq)]
pub struct VariableInit {
    pub variable: VarId,
    pub constructor: Option<FuncId>,
    pub args: Vec<Expr>,
    pub span: Span,
}
