//! Body analysis: turning raw statements and expressions into the typed
//! tree.
//!
//! One [`BodyAnalyzer`] instance handles one callable body (or the global
//! initialiser sequence). It owns the local analysis context — which flavour
//! of callable is being analysed, its expected return type, the implicit
//! `this` — and pushes issues instead of failing.
//!
//! Split across submodules the way the work splits: expression analysis in
//! [`expr`], statement analysis and reachability in [`stmt`].

mod expr;
mod stmt;

use co_core::{ApplicableKind, Issue, IssueKind, Span};

use crate::builtins::Builtins;
use crate::hir;
use crate::ids::{FuncId, ScopeId, TypeId, VarId};
use crate::registry::{FunctionKind, SymbolRegistry};

/// Analysis state for a single body.
pub struct BodyAnalyzer<'a> {
    pub(crate) registry: &'a mut SymbolRegistry,
    pub(crate) builtins: Builtins,
    pub(crate) issues: &'a mut Vec<Issue>,
    pub(crate) applicable: ApplicableKind,
    pub(crate) applicable_name: String,
    pub(crate) expected_return: TypeId,
    pub(crate) this_var: Option<VarId>,
}

impl<'a> BodyAnalyzer<'a> {
    /// Analyser for a registered callable's body.
    pub fn for_function(
        registry: &'a mut SymbolRegistry,
        builtins: Builtins,
        issues: &'a mut Vec<Issue>,
        func: FuncId,
    ) -> Self {
        let function = registry.func(func);
        let applicable = match function.kind {
            FunctionKind::Function => ApplicableKind::Function,
            FunctionKind::Method => ApplicableKind::Method,
            FunctionKind::Constructor => ApplicableKind::Constructor,
        };
        let applicable_name = function.name.clone();
        let expected_return = function.return_type;
        let this_var = function.this_var;
        Self {
            registry,
            builtins,
            issues,
            applicable,
            applicable_name,
            expected_return,
            this_var,
        }
    }

    /// Analyser for global variable initialisers, which run in the root
    /// scope with no surrounding callable.
    pub fn for_globals(
        registry: &'a mut SymbolRegistry,
        builtins: Builtins,
        issues: &'a mut Vec<Issue>,
    ) -> Self {
        let void_type = builtins.void_type;
        Self {
            registry,
            builtins,
            issues,
            applicable: ApplicableKind::Function,
            applicable_name: String::new(),
            expected_return: void_type,
            this_var: None,
        }
    }

    /// Analyse a callable's body and attach the typed block. For non-void
    /// functions and methods, every control-flow path must end in a return.
    pub fn run(mut self, func: FuncId, body: &co_parser::ast::CodeBlock<'_>) {
        let parent = self.registry.func(func).scope;
        let (block, returns) = self.analyse_block(body, parent);

        let function = self.registry.func(func);
        let needs_return = function.kind != FunctionKind::Constructor
            && function.return_type != self.builtins.void_type
            && function.return_type != self.registry.unknown_type;
        if needs_return && !returns {
            let span = function.definition.unwrap_or_default();
            self.issues.push(Issue::new(
                IssueKind::MissingReturnStatement {
                    applicable: self.applicable,
                    name: self.applicable_name.clone(),
                },
                span,
            ));
        }

        self.registry.func_mut(func).body = Some(block);
    }

    pub(crate) fn issue(&mut self, kind: IssueKind, span: Span) {
        self.issues.push(Issue::new(kind, span));
    }

    /// A reference to the implicit `this`, if one is in scope.
    pub(crate) fn this_expr(&self, span: Span) -> Option<hir::Expr> {
        let this_var = self.this_var?;
        Some(hir::Expr::ReferenceVariableReference {
            variable: this_var,
            ty: self.registry.var(this_var).ty,
            span,
        })
    }

    pub(crate) fn invalid(&self, span: Span) -> hir::Expr {
        hir::Expr::Invalid {
            ty: self.registry.unknown_type,
            span,
        }
    }

    /// Adapt `expr` to `target`, inserting an implicit dereference when the
    /// expression is the target's reference type. The caller has already
    /// established convertibility; `unknownType` passes through untouched.
    pub(crate) fn coerce(&mut self, expr: hir::Expr, target: TypeId) -> hir::Expr {
        let Some(ty) = expr.ty() else { return expr };
        if ty == target || ty == self.registry.unknown_type || target == self.registry.unknown_type
        {
            return expr;
        }
        if self.registry.referenced(ty) == Some(target) {
            let span = expr.span();
            return hir::Expr::ImplicitDereferencing {
                inner: Box::new(expr),
                ty: target,
                span,
            };
        }
        expr
    }

    /// Nested scope helper used by blocks and synthetic branch blocks.
    pub(crate) fn child_scope(&mut self, parent: ScopeId) -> ScopeId {
        self.registry.alloc_scope(Some(parent))
    }
}
