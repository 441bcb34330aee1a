//! Expression analysis.
//!
//! Every entry point returns a typed [`hir::Expr`]; failures return
//! [`hir::Expr::Invalid`] after reporting, and operands that are already
//! invalid or `unknownType` short-circuit silently so one root cause yields
//! one diagnostic.

use co_core::{ApplicableKind, IssueKind, NoteText, Span};
use co_parser::ast::{self, Expr as RawExpr};

use crate::hir;
use crate::ids::{FuncId, ScopeId, TypeId};
use crate::operators;
use crate::overload::{self, ResolutionFailure};
use crate::registry::{FunctionKind, Symbol, VarOwner};

use super::BodyAnalyzer;

impl BodyAnalyzer<'_> {
    /// Analyse an expression in value position.
    pub(crate) fn analyse_expr(&mut self, raw: &RawExpr<'_>, scope: ScopeId) -> hir::Expr {
        match raw {
            RawExpr::Paren(paren) => self.analyse_expr(paren.inner, scope),
            RawExpr::IntLiteral(literal) => self.analyse_int_literal(literal),
            RawExpr::DoubleLiteral(literal) => self.analyse_double_literal(literal),
            RawExpr::BoolLiteral(value, span) => hir::Expr::BoolLiteral {
                value: *value,
                ty: self.builtins.bool_type,
                span: *span,
            },
            RawExpr::This(span) => self.analyse_this(*span),
            RawExpr::Symbol(ident) => self.analyse_symbol(ident, scope),
            RawExpr::Member(member) => self.analyse_member(member, scope),
            RawExpr::Call(call) => self.analyse_call(call, scope),
            RawExpr::Infix(infix) => self.analyse_infix(infix, scope),
            RawExpr::Prefix(prefix) => self.analyse_prefix(prefix, scope),
            // The parser already reported whatever made this node; stay
            // silent and let unknownType swallow the rest.
            RawExpr::Missing(span) => self.invalid(*span),
        }
    }

    // =========================================================================
    // Literals
    // =========================================================================

    fn analyse_int_literal(&mut self, literal: &ast::LiteralExpr<'_>) -> hir::Expr {
        match literal.text.parse::<i64>() {
            Ok(value) if value <= i32::MAX as i64 => hir::Expr::IntLiteral {
                value: value as i32,
                ty: self.builtins.int_type,
                span: literal.span,
            },
            _ => {
                self.issue(
                    IssueKind::NumericLiteralTooBig {
                        literal: literal.text.to_string(),
                        target: self.registry.display_type(self.builtins.int_type),
                    },
                    literal.span,
                );
                self.invalid(literal.span)
            }
        }
    }

    fn analyse_double_literal(&mut self, literal: &ast::LiteralExpr<'_>) -> hir::Expr {
        let target = self.registry.display_type(self.builtins.double_type);
        match literal.text.parse::<f64>() {
            Ok(value) if value.is_infinite() => {
                self.issue(
                    IssueKind::NumericLiteralTooBig {
                        literal: literal.text.to_string(),
                        target,
                    },
                    literal.span,
                );
                self.invalid(literal.span)
            }
            Ok(value) if value == 0.0 && has_nonzero_mantissa(literal.text) => {
                self.issue(
                    IssueKind::NumericLiteralTooSmall {
                        literal: literal.text.to_string(),
                        target,
                    },
                    literal.span,
                );
                self.invalid(literal.span)
            }
            Ok(value) => hir::Expr::DoubleLiteral {
                value,
                ty: self.builtins.double_type,
                span: literal.span,
            },
            Err(_) => {
                self.issue(
                    IssueKind::MalformedNumber {
                        literal: literal.text.to_string(),
                    },
                    literal.span,
                );
                self.invalid(literal.span)
            }
        }
    }

    // =========================================================================
    // Names
    // =========================================================================

    fn analyse_this(&mut self, span: Span) -> hir::Expr {
        match self.this_expr(span) {
            Some(expr) => expr,
            None => {
                self.issue(IssueKind::ThisReferenceOutsideMethod, span);
                self.invalid(span)
            }
        }
    }

    fn analyse_symbol(&mut self, ident: &ast::Ident<'_>, scope: ScopeId) -> hir::Expr {
        let span = ident.span;
        match self.registry.resolve(scope, ident.name) {
            None => {
                self.issue(
                    IssueKind::UnknownName {
                        name: ident.name.to_string(),
                    },
                    span,
                );
                self.invalid(span)
            }
            Some(Symbol::Variable(var)) => self.variable_expr(var, span),
            Some(symbol @ (Symbol::Function(_) | Symbol::Overloaded(_) | Symbol::Type(_))) => {
                let description = self.registry.describe(&symbol);
                self.issue(
                    IssueKind::InvalidReferenceAsExpression {
                        name: ident.name.to_string(),
                        description,
                    },
                    span,
                );
                self.invalid(span)
            }
        }
    }

    /// Reading a variable: value-typed storage reads as its reference type,
    /// reference-typed storage reads as itself, and a bare field name inside
    /// a method reads as `this.field`.
    fn variable_expr(&mut self, var: crate::ids::VarId, span: Span) -> hir::Expr {
        let ty = self.registry.var(var).ty;
        if ty == self.registry.unknown_type {
            return self.invalid(span);
        }

        if let VarOwner::Field(_) = self.registry.var(var).owner {
            let Some(instance) = self.this_expr(span) else {
                self.issue(IssueKind::ThisReferenceOutsideMethod, span);
                return self.invalid(span);
            };
            let field_ty = self.field_access_type(ty, true);
            return hir::Expr::FieldAccess {
                instance: Box::new(instance),
                field: var,
                ty: field_ty,
                span,
            };
        }

        if self.registry.is_reference(ty) {
            hir::Expr::ReferenceVariableReference {
                variable: var,
                ty,
                span,
            }
        } else {
            let reference = self.registry.reference_type(ty);
            hir::Expr::VariableReference {
                variable: var,
                ty: reference,
                span,
            }
        }
    }

    /// The result type of accessing a field: a reference to the field's type
    /// when the instance is a reference (without ever stacking references),
    /// the plain field type otherwise.
    fn field_access_type(&mut self, field_ty: TypeId, instance_is_reference: bool) -> TypeId {
        if !instance_is_reference || self.registry.is_reference(field_ty) {
            field_ty
        } else {
            self.registry.reference_type(field_ty)
        }
    }

    // =========================================================================
    // Member access
    // =========================================================================

    /// `object.name` in value position: fields only. Methods are callees,
    /// not values.
    fn analyse_member(&mut self, member: &ast::MemberExpr<'_>, scope: ScopeId) -> hir::Expr {
        let span = member.span;

        if let Some(ty) = self.static_receiver(member.object, scope) {
            self.issue(
                IssueKind::UnknownStaticMemberName {
                    name: member.name.name.to_string(),
                    type_name: self.registry.display_type(ty),
                },
                member.name.span,
            );
            return self.invalid(span);
        }

        let instance = self.analyse_expr(member.object, scope);
        let Some(receiver) = instance.ty() else {
            return self.invalid(span);
        };
        if receiver == self.registry.unknown_type {
            return self.invalid(span);
        }

        if let Some(field) = self.registry.field_of(receiver, member.name.name) {
            let is_reference = self.registry.is_reference(receiver);
            let ty = self.field_access_type(self.registry.var(field).ty, is_reference);
            return hir::Expr::FieldAccess {
                instance: Box::new(instance),
                field,
                ty,
                span,
            };
        }

        if !self.registry.methods_of(receiver, member.name.name).is_empty() {
            self.issue(
                IssueKind::InvalidReferenceAsExpression {
                    name: member.name.name.to_string(),
                    description: co_core::SymbolDescription::Method,
                },
                member.name.span,
            );
            return self.invalid(span);
        }

        self.report_unknown_member(receiver, member.name.name, member.name.span);
        self.invalid(span)
    }

    /// `object` of a member access / method call when it names a type
    /// directly (static access).
    fn static_receiver(&self, object: &RawExpr<'_>, scope: ScopeId) -> Option<TypeId> {
        if let RawExpr::Symbol(ident) = object {
            if let Some(Symbol::Type(ty)) = self.registry.resolve(scope, ident.name) {
                return Some(ty);
            }
        }
        None
    }

    /// No member under this name at all: distinguish a reference-only method
    /// reached through a non-reference receiver from a plain unknown member.
    fn report_unknown_member(&mut self, receiver: TypeId, name: &str, span: Span) {
        if !self.registry.is_reference(receiver) {
            if let Some(reference) = self.registry.ty(receiver).reference {
                if !self.registry.ty(reference).methods.get(name).map_or(true, Vec::is_empty) {
                    self.issue(
                        IssueKind::ReferenceMethodAccessFromNonReference {
                            name: name.to_string(),
                            type_name: self.registry.display_type(reference),
                        },
                        span,
                    );
                    return;
                }
            }
        }
        self.issue(
            IssueKind::UnknownObjectMember {
                name: name.to_string(),
                type_name: self.registry.display_type(receiver),
            },
            span,
        );
    }

    // =========================================================================
    // Calls
    // =========================================================================

    fn analyse_call(&mut self, call: &ast::CallExpr<'_>, scope: ScopeId) -> hir::Expr {
        let span = call.span;
        let args: Vec<hir::Expr> = call
            .args
            .iter()
            .map(|arg| self.analyse_expr(arg, scope))
            .collect();

        match call.callee {
            RawExpr::Symbol(ident) => {
                let callee_span = ident.span;
                match self.registry.resolve(scope, ident.name) {
                    None => {
                        self.issue(
                            IssueKind::UnknownName {
                                name: ident.name.to_string(),
                            },
                            callee_span,
                        );
                        self.invalid(span)
                    }
                    Some(Symbol::Type(target)) => self.analyse_construction(target, args, span),
                    Some(Symbol::Function(func)) => {
                        let callee = hir::Expr::FunctionReference {
                            function: func,
                            span: callee_span,
                        };
                        self.dispatch_named_call(callee, args, ident.name, span)
                    }
                    Some(Symbol::Overloaded(set)) => {
                        let callee = hir::Expr::OverloadedFunctionReference {
                            functions: set,
                            span: callee_span,
                        };
                        self.dispatch_named_call(callee, args, ident.name, span)
                    }
                    Some(Symbol::Variable(_)) => {
                        self.issue(IssueKind::ExpressionIsNotCallable, callee_span);
                        self.invalid(span)
                    }
                }
            }
            RawExpr::Member(member) => self.analyse_method_call(member, args, span, scope),
            other => {
                let callee = self.analyse_expr(other, scope);
                if !callee.is_invalid() {
                    self.issue(IssueKind::ExpressionIsNotCallable, other.span());
                }
                self.invalid(span)
            }
        }
    }

    /// A call through a bare name. Methods found through the enclosing
    /// type's scope bind the implicit `this`.
    fn dispatch_named_call(
        &mut self,
        callee: hir::Expr,
        args: Vec<hir::Expr>,
        name: &str,
        span: Span,
    ) -> hir::Expr {
        let candidates = match callee {
            hir::Expr::FunctionReference { function, .. } => vec![function],
            hir::Expr::OverloadedFunctionReference { functions, .. } => functions,
            _ => unreachable!("dispatch_named_call takes callee references"),
        };

        let is_method = self
            .registry
            .func(candidates[0])
            .kind
            == FunctionKind::Method;
        if is_method {
            let Some(instance) = self.this_expr(span) else {
                self.issue(IssueKind::ThisReferenceOutsideMethod, span);
                return self.invalid(span);
            };
            return self.build_method_call(instance, candidates, args, name, span);
        }

        let Some(arg_types) = self.known_arg_types(&args) else {
            return self.invalid(span);
        };
        match overload::resolve_overload(self.registry, &candidates, &arg_types) {
            Ok(func) => self.finish_function_call(func, args, span),
            Err(failure) => {
                self.report_resolution_failure(failure, &candidates, &arg_types, name, span);
                self.invalid(span)
            }
        }
    }

    fn analyse_method_call(
        &mut self,
        member: &ast::MemberExpr<'_>,
        args: Vec<hir::Expr>,
        span: Span,
        scope: ScopeId,
    ) -> hir::Expr {
        if let Some(ty) = self.static_receiver(member.object, scope) {
            self.issue(
                IssueKind::UnknownStaticMemberName {
                    name: member.name.name.to_string(),
                    type_name: self.registry.display_type(ty),
                },
                member.name.span,
            );
            return self.invalid(span);
        }

        let instance = self.analyse_expr(member.object, scope);
        let Some(receiver) = instance.ty() else {
            return self.invalid(span);
        };
        if receiver == self.registry.unknown_type {
            return self.invalid(span);
        }

        let candidates = self.registry.methods_of(receiver, member.name.name);
        if candidates.is_empty() {
            if self.registry.field_of(receiver, member.name.name).is_some() {
                // A field in callee position: the access itself is fine but
                // the resulting value is not callable.
                self.issue(IssueKind::ExpressionIsNotCallable, member.name.span);
            } else {
                self.report_unknown_member(receiver, member.name.name, member.name.span);
            }
            return self.invalid(span);
        }

        self.build_method_call(instance, candidates, args, member.name.name, span)
    }

    /// Shared tail of every method-call shape (explicit receiver, bare name,
    /// operator desugaring).
    pub(crate) fn build_method_call(
        &mut self,
        instance: hir::Expr,
        candidates: Vec<FuncId>,
        args: Vec<hir::Expr>,
        name: &str,
        span: Span,
    ) -> hir::Expr {
        let Some(arg_types) = self.known_arg_types(&args) else {
            return self.invalid(span);
        };

        match overload::resolve_overload(self.registry, &candidates, &arg_types) {
            Ok(method) => {
                let args = self.coerce_args(method, args);
                let ty = self.registry.func(method).return_type;
                hir::Expr::MethodCall {
                    method,
                    instance: Box::new(instance),
                    args,
                    ty,
                    span,
                }
            }
            Err(failure) => {
                self.report_resolution_failure(failure, &candidates, &arg_types, name, span);
                self.invalid(span)
            }
        }
    }

    fn finish_function_call(
        &mut self,
        func: FuncId,
        args: Vec<hir::Expr>,
        span: Span,
    ) -> hir::Expr {
        let args = self.coerce_args(func, args);
        let ty = self.registry.func(func).return_type;
        hir::Expr::FunctionCall {
            function: func,
            args,
            ty,
            span,
        }
    }

    fn coerce_args(&mut self, func: FuncId, args: Vec<hir::Expr>) -> Vec<hir::Expr> {
        let params = self.registry.param_types(func);
        args.into_iter()
            .zip(params)
            .map(|(arg, param)| self.coerce(arg, param))
            .collect()
    }

    /// Argument types, or `None` when any argument is already invalid or
    /// unknown — resolution against the sentinel would only manufacture a
    /// second diagnostic for the same root cause.
    fn known_arg_types(&self, args: &[hir::Expr]) -> Option<Vec<TypeId>> {
        let mut types = Vec::with_capacity(args.len());
        for arg in args {
            let ty = arg.ty()?;
            if ty == self.registry.unknown_type {
                return None;
            }
            types.push(ty);
        }
        Some(types)
    }

    fn report_resolution_failure(
        &mut self,
        failure: ResolutionFailure,
        candidates: &[FuncId],
        arg_types: &[TypeId],
        name: &str,
        span: Span,
    ) {
        let applicable = self.applicable_of(candidates[0]);
        match failure {
            ResolutionFailure::NoMatch => {
                let arguments = self.render_types(arg_types);
                self.issue(
                    IssueKind::InvalidCallArguments {
                        applicable,
                        name: name.to_string(),
                        arguments,
                    },
                    span,
                );
            }
            ResolutionFailure::Ambiguous(winners) => {
                let mut issue = co_core::Issue::new(
                    IssueKind::AmbiguousOverloadedCall {
                        applicable,
                        name: name.to_string(),
                    },
                    span,
                );
                for winner in winners {
                    let signature = self.registry.signature(winner);
                    issue = issue.with_note(
                        self.registry.func(winner).definition,
                        NoteText::Candidate { signature },
                    );
                }
                self.issues.push(issue);
            }
        }
    }

    fn applicable_of(&self, func: FuncId) -> ApplicableKind {
        match self.registry.func(func).kind {
            FunctionKind::Function => ApplicableKind::Function,
            FunctionKind::Method => ApplicableKind::Method,
            FunctionKind::Constructor => ApplicableKind::Constructor,
        }
    }

    pub(crate) fn render_types(&self, types: &[TypeId]) -> String {
        types
            .iter()
            .map(|&ty| self.registry.display_type(ty))
            .collect::<Vec<_>>()
            .join(", ")
    }

    // =========================================================================
    // Construction and casts
    // =========================================================================

    /// `T(args)`. One argument is a cast: the candidates are `T`'s
    /// constructors plus conversion methods named `T` on the argument's
    /// type. Other arities resolve over the constructors alone.
    fn analyse_construction(
        &mut self,
        target: TypeId,
        args: Vec<hir::Expr>,
        span: Span,
    ) -> hir::Expr {
        let Some(arg_types) = self.known_arg_types(&args) else {
            return self.invalid(span);
        };

        if args.len() == 1 {
            return self.analyse_cast(target, args, arg_types[0], span);
        }

        let candidates = self.registry.ty(target).constructors.clone();
        match overload::resolve_overload(self.registry, &candidates, &arg_types) {
            Ok(ctor) => self.finish_function_call(ctor, args, span),
            Err(failure) => {
                let name = self.registry.display_type(target);
                self.report_constructor_failure(failure, &arg_types, &name, span);
                self.invalid(span)
            }
        }
    }

    fn analyse_cast(
        &mut self,
        target: TypeId,
        args: Vec<hir::Expr>,
        arg_ty: TypeId,
        span: Span,
    ) -> hir::Expr {
        let target_name = self.registry.display_type(target);
        let ctors = self.registry.ty(target).constructors.clone();
        let viable_ctors = overload::viable_candidates(self.registry, &ctors, &[arg_ty]);
        let conversions: Vec<FuncId> = self
            .registry
            .methods_of(arg_ty, &target_name)
            .into_iter()
            .filter(|&method| self.registry.func(method).params.is_empty())
            .collect();

        let total = viable_ctors.len() + conversions.len();
        if total == 0 {
            self.issue(
                IssueKind::NoTypeConversionFunction {
                    from: self.registry.display_type(arg_ty),
                    to: target_name,
                },
                span,
            );
            return self.invalid(span);
        }
        if total > 1 {
            self.issue(
                IssueKind::AmbiguousTypeConversion {
                    from: self.registry.display_type(arg_ty),
                    to: target_name,
                },
                span,
            );
            return self.invalid(span);
        }

        if let Some(&ctor) = viable_ctors.first() {
            return self.finish_function_call(ctor, args, span);
        }

        let method = conversions[0];
        let return_type = self.registry.func(method).return_type;
        if return_type != target {
            self.issue(
                IssueKind::InvalidConversionFunctionReturnType {
                    expected: target_name,
                    actual: self.registry.display_type(return_type),
                },
                span,
            );
            return self.invalid(span);
        }
        let instance = args.into_iter().next().expect("cast has one argument");
        hir::Expr::MethodCall {
            method,
            instance: Box::new(instance),
            args: Vec::new(),
            ty: return_type,
            span,
        }
    }

    pub(crate) fn report_constructor_failure(
        &mut self,
        failure: ResolutionFailure,
        arg_types: &[TypeId],
        type_name: &str,
        span: Span,
    ) {
        match failure {
            ResolutionFailure::NoMatch => {
                let arguments = self.render_types(arg_types);
                self.issue(
                    IssueKind::InvalidCallArguments {
                        applicable: ApplicableKind::Constructor,
                        name: type_name.to_string(),
                        arguments,
                    },
                    span,
                );
            }
            ResolutionFailure::Ambiguous(winners) => {
                let mut issue = co_core::Issue::new(
                    IssueKind::AmbiguousOverloadedCall {
                        applicable: ApplicableKind::Constructor,
                        name: type_name.to_string(),
                    },
                    span,
                );
                for winner in winners {
                    let signature = self.registry.signature(winner);
                    issue = issue.with_note(
                        self.registry.func(winner).definition,
                        NoteText::Candidate { signature },
                    );
                }
                self.issues.push(issue);
            }
        }
    }

    // =========================================================================
    // Operators
    // =========================================================================

    fn analyse_infix(&mut self, infix: &ast::InfixExpr<'_>, scope: ScopeId) -> hir::Expr {
        let left = self.analyse_expr(infix.left, scope);

        if let RawExpr::Missing(_) = infix.right {
            self.issue(
                IssueKind::MissingRightOperand {
                    operator: infix.op.symbol().to_string(),
                },
                infix.op_span.after(),
            );
            return self.invalid(infix.span);
        }
        let right = self.analyse_expr(infix.right, scope);

        let Some(left_ty) = left.ty() else {
            return self.invalid(infix.span);
        };
        if left_ty == self.registry.unknown_type {
            return self.invalid(infix.span);
        }

        let method = operators::infix_method(infix.op);
        let candidates = self.registry.methods_of(left_ty, method);
        if candidates.is_empty() {
            self.issue(
                IssueKind::UndefinedOperator {
                    operator: infix.op.symbol().to_string(),
                    operand_type: self.registry.display_type(left_ty),
                },
                infix.op_span,
            );
            return self.invalid(infix.span);
        }

        self.build_method_call(left, candidates, vec![right], method, infix.span)
    }

    fn analyse_prefix(&mut self, prefix: &ast::PrefixExpr<'_>, scope: ScopeId) -> hir::Expr {
        let operand = self.analyse_expr(prefix.operand, scope);
        let Some(operand_ty) = operand.ty() else {
            return self.invalid(prefix.span);
        };
        if operand_ty == self.registry.unknown_type {
            return self.invalid(prefix.span);
        }

        let method = operators::prefix_method(prefix.op);
        let candidates = self.registry.methods_of(operand_ty, method);
        if candidates.is_empty() {
            self.issue(
                IssueKind::UndefinedOperator {
                    operator: prefix.op.symbol().to_string(),
                    operand_type: self.registry.display_type(operand_ty),
                },
                prefix.span,
            );
            return self.invalid(prefix.span);
        }

        self.build_method_call(operand, candidates, Vec::new(), method, prefix.span)
    }
}

/// Whether a numeric literal's text contains a nonzero digit before the
/// exponent, i.e. parsing it to exactly `0.0` means underflow.
fn has_nonzero_mantissa(text: &str) -> bool {
    text.split(['e', 'E'])
        .next()
        .unwrap_or("")
        .chars()
        .any(|c| ('1'..='9').contains(&c))
}
