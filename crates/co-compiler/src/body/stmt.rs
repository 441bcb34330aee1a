//! Statement analysis, reachability and variable-definition sites.

use co_core::{ConditionContext, IssueKind, Span};
use co_parser::ast::{self, Stmt as RawStmt};

use crate::hir;
use crate::ids::ScopeId;
use crate::overload;
use crate::registry::{Symbol, Variable, VarOwner};
use crate::type_resolver::resolve_type;

use super::BodyAnalyzer;

impl BodyAnalyzer<'_> {
    /// Analyse a raw block into a typed one.
    ///
    /// The boolean says whether the block definitely returns. Statements
    /// after the first returning one are dead: the first of them gets an
    /// `UnreachableCode` warning, and all of them are still analysed so
    /// their own errors surface.
    pub(crate) fn analyse_block(
        &mut self,
        raw: &ast::CodeBlock<'_>,
        parent: ScopeId,
    ) -> (hir::CodeBlock, bool) {
        let scope = self.child_scope(parent);
        let mut statements = Vec::new();
        let mut terminated = false;
        let mut reported_dead = false;

        for stmt in raw.statements {
            if terminated && !reported_dead {
                self.issue(IssueKind::UnreachableCode, stmt.span());
                reported_dead = true;
            }
            let returns = self.analyse_stmt(stmt, scope, &mut statements);
            if !terminated {
                terminated = returns;
            }
        }

        (hir::CodeBlock { scope, statements }, terminated)
    }

    /// Analyse one statement, appending the typed result(s) to `out` (a
    /// multi-declarator definition yields one statement per variable).
    /// Returns whether the statement definitely returns.
    fn analyse_stmt(
        &mut self,
        raw: &RawStmt<'_>,
        scope: ScopeId,
        out: &mut Vec<hir::Stmt>,
    ) -> bool {
        match raw {
            RawStmt::Expr(expr) => {
                let expr = self.analyse_expr(expr, scope);
                out.push(hir::Stmt::Expr(expr));
                false
            }
            RawStmt::Block(block) => {
                let (block, returns) = self.analyse_block(block, scope);
                out.push(hir::Stmt::Block(block));
                returns
            }
            RawStmt::Variables(def) => {
                self.analyse_variables(def, scope, out);
                false
            }
            RawStmt::IfElse(stmt) => {
                let condition = self.analyse_condition(stmt.condition, ConditionContext::If, scope);
                let (then_block, then_returns) = self.analyse_branch(stmt.then_branch, scope);
                let (else_block, else_returns) = match stmt.else_branch {
                    Some(branch) => {
                        let (block, returns) = self.analyse_branch(branch, scope);
                        (Some(block), returns)
                    }
                    None => (None, false),
                };
                out.push(hir::Stmt::IfElse {
                    condition,
                    then_block,
                    else_block,
                    span: stmt.span,
                });
                then_returns && else_returns
            }
            RawStmt::While(stmt) => {
                let condition =
                    self.analyse_condition(stmt.condition, ConditionContext::While, scope);
                let (body, _) = self.analyse_branch(stmt.body, scope);
                out.push(hir::Stmt::While {
                    condition,
                    body,
                    span: stmt.span,
                });
                // A while body may never run; it proves nothing about
                // return paths.
                false
            }
            RawStmt::Return(stmt) => {
                self.analyse_return(stmt, scope, out);
                true
            }
        }
    }

    /// A branch of `if`/`while` analyses as a nested code block even when
    /// the source has a single statement.
    fn analyse_branch(&mut self, raw: &RawStmt<'_>, parent: ScopeId) -> (hir::CodeBlock, bool) {
        if let RawStmt::Block(block) = raw {
            return self.analyse_block(block, parent);
        }
        let scope = self.child_scope(parent);
        let mut statements = Vec::new();
        let returns = self.analyse_stmt(raw, scope, &mut statements);
        (hir::CodeBlock { scope, statements }, returns)
    }

    fn analyse_condition(
        &mut self,
        raw: &ast::Expr<'_>,
        context: ConditionContext,
        scope: ScopeId,
    ) -> hir::Expr {
        let condition = self.analyse_expr(raw, scope);
        let Some(ty) = condition.ty() else {
            return condition;
        };
        if self
            .registry
            .is_implicitly_convertible(ty, self.builtins.bool_type)
        {
            return self.coerce(condition, self.builtins.bool_type);
        }
        self.issue(
            IssueKind::InvalidConditionType {
                context,
                actual: self.registry.display_type(ty),
            },
            raw.span(),
        );
        condition
    }

    fn analyse_return(
        &mut self,
        stmt: &ast::ReturnStmt<'_>,
        scope: ScopeId,
        out: &mut Vec<hir::Stmt>,
    ) {
        if self.applicable == co_core::ApplicableKind::Constructor {
            self.issue(IssueKind::ReturnFromConstructor, stmt.span);
        }

        let value = match stmt.value {
            Some(raw) => {
                let value = self.analyse_expr(raw, scope);
                let value = match value.ty() {
                    Some(ty)
                        if !self
                            .registry
                            .is_implicitly_convertible(ty, self.expected_return) =>
                    {
                        self.issue(
                            IssueKind::IncompatibleReturnType {
                                expected: self.registry.display_type(self.expected_return),
                                actual: self.registry.display_type(ty),
                            },
                            raw.span(),
                        );
                        value
                    }
                    _ => {
                        let target = self.expected_return;
                        self.coerce(value, target)
                    }
                };
                Some(value)
            }
            None => {
                if self.expected_return != self.builtins.void_type
                    && self.expected_return != self.registry.unknown_type
                    && self.applicable != co_core::ApplicableKind::Constructor
                {
                    self.issue(
                        IssueKind::ReturnWithoutValue {
                            expected: self.registry.display_type(self.expected_return),
                        },
                        stmt.span,
                    );
                }
                None
            }
        };

        out.push(hir::Stmt::Return {
            value,
            span: stmt.span,
        });
    }

    // =========================================================================
    // Variable definitions
    // =========================================================================

    /// `T a = e, b;` — one variable plus one synthesised constructor call
    /// per declarator.
    fn analyse_variables(
        &mut self,
        def: &ast::VariablesDef<'_>,
        scope: ScopeId,
        out: &mut Vec<hir::Stmt>,
    ) {
        let ty = resolve_type(self.registry, scope, &def.ty, self.issues);

        for decl in def.variables {
            let var = self.registry.alloc_variable(Variable {
                name: decl.name.name.to_string(),
                ty,
                owner: VarOwner::Local,
                definition: Some(decl.name.span),
            });
            if let Err(issue) =
                self.registry
                    .add_symbol(scope, decl.name.name, Symbol::Variable(var), decl.name.span)
            {
                self.issues.push(issue);
            }

            if let Some(init) =
                self.analyse_variable_init(var, decl.initializer, scope, decl.span)
            {
                out.push(hir::Stmt::VariableInit(init));
            }
        }
    }

    /// Select the constructor for a definition site and synthesise the
    /// `VariableConstructorCall`. Shared by locals and globals.
    ///
    /// With an initialiser the best-matching constructor over the single
    /// initialiser type is chosen; without one the type must be plain (have
    /// a default constructor).
    pub(crate) fn analyse_variable_init(
        &mut self,
        var: crate::ids::VarId,
        initializer: Option<&ast::Expr<'_>>,
        scope: ScopeId,
        span: Span,
    ) -> Option<hir::VariableInit> {
        let ty = self.registry.var(var).ty;
        if ty == self.registry.unknown_type {
            // The type already failed to resolve; analyse the initialiser
            // for its own errors and stop.
            if let Some(raw) = initializer {
                self.analyse_expr(raw, scope);
            }
            return None;
        }

        match initializer {
            Some(raw) => {
                let value = self.analyse_expr(raw, scope);
                let value_ty = value.ty()?;
                if value_ty == self.registry.unknown_type {
                    return None;
                }

                if self.registry.is_reference(ty) {
                    // Reference variables bind; the initialiser must already
                    // be a reference to the referenced type.
                    if value_ty != ty {
                        self.report_incompatible_initializer(var, value_ty, span);
                        return None;
                    }
                    return Some(hir::VariableInit {
                        variable: var,
                        constructor: None,
                        args: vec![value],
                        span,
                    });
                }

                let candidates = self.registry.ty(ty).constructors.clone();
                match overload::resolve_overload(self.registry, &candidates, &[value_ty]) {
                    Ok(ctor) => {
                        let param = self.registry.param_types(ctor)[0];
                        let value = self.coerce(value, param);
                        Some(hir::VariableInit {
                            variable: var,
                            constructor: Some(ctor),
                            args: vec![value],
                            span,
                        })
                    }
                    Err(_) => {
                        self.report_incompatible_initializer(var, value_ty, span);
                        None
                    }
                }
            }
            None => {
                let base = self.registry.referenced(ty).unwrap_or(ty);
                let candidates = self.registry.ty(base).constructors.clone();
                let default = candidates
                    .iter()
                    .copied()
                    .find(|&ctor| self.registry.func(ctor).params.is_empty());
                match (default, self.registry.is_reference(ty)) {
                    (Some(ctor), false) => Some(hir::VariableInit {
                        variable: var,
                        constructor: Some(ctor),
                        args: Vec::new(),
                        span,
                    }),
                    _ => {
                        // A reference variable has nothing to bind to; a
                        // non-plain type has nothing to construct with.
                        let name = self.registry.var(var).name.clone();
                        self.issue(
                            IssueKind::NonPlainVariableWithoutInitializer {
                                name,
                                type_name: self.registry.display_type(ty),
                            },
                            span,
                        );
                        None
                    }
                }
            }
        }
    }

    fn report_incompatible_initializer(
        &mut self,
        var: crate::ids::VarId,
        value_ty: crate::ids::TypeId,
        span: Span,
    ) {
        let name = self.registry.var(var).name.clone();
        let type_name = self.registry.display_type(self.registry.var(var).ty);
        self.issue(
            IssueKind::IncompatibleVariableInitializer {
                name,
                type_name,
                actual: self.registry.display_type(value_ty),
            },
            span,
        );
    }
}
