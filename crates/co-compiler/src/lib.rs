//! Semantic analysis for CO.
//!
//! ## Architecture
//!
//! Analysis runs in four ordered passes over the raw tree:
//!
//! 1. **Register types** — every type name becomes resolvable.
//! 2. **Register members** — fields, methods and constructors as stubs with
//!    full signatures and empty bodies.
//! 3. **Register globals** — free functions and global variables.
//! 4. **Analyse bodies** — expression and statement checking against the
//!    fully-populated symbol tables, so forward references among top-level
//!    definitions need no ordering.
//!
//! Afterwards the entry point is validated. Analysers never fail: they
//! accumulate [`co_core::Issue`]s and leave `unknownType` /
//! `Invalid` placeholders behind, which satisfy every conversion silently so
//! one root cause produces one diagnostic.

pub mod body;
pub mod builtins;
pub mod entry;
pub mod hir;
pub mod ids;
pub mod operators;
pub mod overload;
pub mod passes;
pub mod registry;
pub mod type_resolver;

pub use builtins::Builtins;
pub use ids::{FuncId, ScopeId, TypeId, VarId};
pub use registry::{Function, FunctionKind, Scope, Symbol, SymbolRegistry, Type, Variable, VarOwner};

use co_core::Issue;
use co_parser::ast::Program;

use body::BodyAnalyzer;

/// The result of analysing a program: the populated registry (with typed
/// bodies attached), the entry point, and the global-variable initialisation
/// sequence the backend runs before `main`.
pub struct Analysis {
    pub registry: SymbolRegistry,
    pub builtins: Builtins,
    pub main: Option<FuncId>,
    /// Global variables in source order.
    pub globals: Vec<VarId>,
    /// Their synthesised constructor calls, in source order.
    pub global_inits: Vec<hir::VariableInit>,
}

/// Analyse a raw program.
///
/// Always returns an `Analysis` — possibly a partial one containing
/// `unknownType` placeholders — plus every issue in deterministic order.
pub fn analyze(program: &Program<'_>) -> (Analysis, Vec<Issue>) {
    let mut registry = SymbolRegistry::new();
    let builtins = builtins::install(&mut registry);
    let mut issues = Vec::new();

    let registration = passes::run(&mut registry, builtins, program);
    issues.extend(registration.issues);

    // Pass 4: bodies, in registration order.
    tracing::debug!(bodies = registration.pending_bodies.len(), "analysing bodies");
    for pending in &registration.pending_bodies {
        BodyAnalyzer::for_function(&mut registry, builtins, &mut issues, pending.func)
            .run(pending.func, &pending.body);
    }

    // Global initialisers run in the root scope.
    let mut global_inits = Vec::new();
    {
        let root = registry.root_scope();
        let mut analyzer = BodyAnalyzer::for_globals(&mut registry, builtins, &mut issues);
        for pending in &registration.pending_global_inits {
            if let Some(init) =
                analyzer.analyse_variable_init(pending.var, pending.initializer, root, pending.span)
            {
                global_inits.push(init);
            }
        }
    }

    let main = entry::validate_main(&registry, builtins, program.span, &mut issues);

    (
        Analysis {
            registry,
            builtins,
            main,
            globals: registration.global_variables,
            global_inits,
        },
        issues,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use bumpalo::Bump;
    use co_core::Severity;

    fn analyse_source(source: &str) -> (Analysis, Vec<Issue>) {
        let arena = Bump::new();
        let (program, parse_issues) = co_parser::parse(&arena, source);
        assert!(parse_issues.is_empty(), "parse issues: {parse_issues:?}");
        analyze(&program)
    }

    fn error_codes(issues: &[Issue]) -> Vec<&'static str> {
        issues.iter().map(|issue| issue.code()).collect()
    }

    #[test]
    fn happy_path_has_no_issues() {
        let (analysis, issues) = analyse_source("void main() { int x = 5; writeIntLn(x); }");
        assert!(issues.is_empty(), "{issues:?}");
        assert!(analysis.main.is_some());
        let main = analysis.registry.func(analysis.main.unwrap());
        assert!(main.body.is_some());
    }

    #[test]
    fn unknown_name_is_reported_once() {
        // The call itself must not add a second diagnostic on top of the
        // unknown argument.
        let (_, issues) = analyse_source("void main() { println(y); }");
        assert_eq!(error_codes(&issues), vec!["E0017"]);
    }

    #[test]
    fn overload_resolution_picks_double() {
        let (_, issues) = analyse_source(
            "native void f(int value);
             native void f(double value);
             void main() { f(1.0); }",
        );
        assert!(issues.is_empty(), "{issues:?}");
    }

    #[test]
    fn rvalue_does_not_convert_to_reference() {
        // g takes int&; a literal has no storage to reference.
        let (_, issues) = analyse_source(
            "native void g(int& target);
             void main() { g(1); }",
        );
        assert_eq!(error_codes(&issues), vec!["E0013"]);
    }

    #[test]
    fn duplicate_function_definition_notes_the_first() {
        let (_, issues) = analyse_source(
            "int foo() { return 1; }
             int foo() { return 2; }
             void main() { }",
        );
        assert_eq!(error_codes(&issues), vec!["E0030"]);
        assert_eq!(issues[0].notes.len(), 1);
        assert_eq!(issues[0].notes[0].span.unwrap().start_line, 1);
    }

    #[test]
    fn missing_return_on_one_branch() {
        let (_, issues) = analyse_source(
            "int f() { if (true) return 1; }
             void main() { f(); }",
        );
        assert_eq!(error_codes(&issues), vec!["E0020"]);
    }

    #[test]
    fn both_branches_returning_satisfies_the_checker() {
        let (_, issues) = analyse_source(
            "int sign(int x) { if (x < 0) { return 0 - 1; } else { return 1; } }
             void main() { sign(3); }",
        );
        assert!(issues.is_empty(), "{issues:?}");
    }

    #[test]
    fn assignment_desugars_to_assign_on_the_reference() {
        let (analysis, issues) = analyse_source("void main() { int x = 3; x = 5; }");
        assert!(issues.is_empty(), "{issues:?}");

        let main = analysis.registry.func(analysis.main.unwrap());
        let body = main.body.as_ref().unwrap();
        let hir::Stmt::Expr(hir::Expr::MethodCall { method, instance, args, .. }) =
            &body.statements[1]
        else {
            panic!("expected a method call, got {:?}", body.statements[1]);
        };
        assert_eq!(analysis.registry.func(*method).name, "assign");
        // No dereference on the left.
        assert!(matches!(**instance, hir::Expr::VariableReference { .. }));
        // The right side is an exact int already.
        assert!(matches!(args[0], hir::Expr::IntLiteral { .. }));
    }

    #[test]
    fn assigning_a_variable_dereferences_the_right_side() {
        let (analysis, issues) = analyse_source("void main() { int x = 3; int y = 0; x = y; }");
        assert!(issues.is_empty(), "{issues:?}");

        let main = analysis.registry.func(analysis.main.unwrap());
        let body = main.body.as_ref().unwrap();
        let hir::Stmt::Expr(hir::Expr::MethodCall { args, .. }) = &body.statements[2] else {
            panic!("expected a method call");
        };
        assert!(matches!(args[0], hir::Expr::ImplicitDereferencing { .. }));
    }

    #[test]
    fn unreachable_code_is_a_single_warning() {
        let (_, issues) = analyse_source(
            "int f() { return 1; f(); f(); }
             void main() { f(); }",
        );
        assert_eq!(error_codes(&issues), vec!["E0019"]);
        assert_eq!(issues[0].severity, Severity::Warning);
    }

    #[test]
    fn class_members_and_forward_references() {
        let (_, issues) = analyse_source(
            "void main() { Vector2 v = origin(); writeIntLn(v.lengthSquared()); }
             Vector2 origin() { return Vector2(0, 0); }
             class Vector2 {
                 int x;
                 int y;
                 Vector2(int px, int py) { this.x = px; this.y = py; }
                 int lengthSquared() { return x * x + y * y; }
             }",
        );
        assert!(issues.is_empty(), "{issues:?}");
    }

    #[test]
    fn user_copy_constructor_is_rejected() {
        let (_, issues) = analyse_source(
            "class Box { int v; Box(Box other) { } }
             void main() { }",
        );
        assert_eq!(error_codes(&issues), vec!["E0033"]);
    }

    #[test]
    fn this_outside_method_is_rejected() {
        let (_, issues) = analyse_source("void main() { this; }");
        assert_eq!(error_codes(&issues), vec!["E0043"]);
    }

    #[test]
    fn condition_must_be_bool() {
        let (_, issues) = analyse_source("void main() { if (1) { } }");
        assert_eq!(error_codes(&issues), vec!["E0024"]);
    }

    #[test]
    fn return_from_constructor_is_rejected() {
        let (_, issues) = analyse_source(
            "class Box { int v; Box(int x) { return; } }
             void main() { }",
        );
        assert_eq!(error_codes(&issues), vec!["E0023"]);
    }

    #[test]
    fn missing_main_is_reported() {
        let (_, issues) = analyse_source("int helper() { return 1; }");
        assert_eq!(error_codes(&issues), vec!["E0027"]);
    }

    #[test]
    fn wrong_main_signature_is_reported() {
        let (_, issues) = analyse_source("int main() { return 1; }");
        assert_eq!(error_codes(&issues), vec!["E0029"]);
    }

    #[test]
    fn main_must_be_a_function() {
        let (_, issues) = analyse_source("int main = 0;");
        assert_eq!(error_codes(&issues), vec!["E0028"]);
    }

    #[test]
    fn casts_pick_conversion_methods() {
        let (_, issues) = analyse_source("void main() { double d = double(3); int i = int(d); }");
        assert!(issues.is_empty(), "{issues:?}");
    }

    #[test]
    fn cast_without_conversion_is_reported() {
        let (_, issues) = analyse_source("void main() { int i = int(true); }");
        assert_eq!(error_codes(&issues), vec!["E0052"]);
    }

    #[test]
    fn global_initialisers_are_collected() {
        let (analysis, issues) = analyse_source(
            "int counter = 10;
             void main() { writeIntLn(counter); }",
        );
        assert!(issues.is_empty(), "{issues:?}");
        assert_eq!(analysis.globals.len(), 1);
        assert_eq!(analysis.global_inits.len(), 1);
    }

    #[test]
    fn undefined_operator_is_reported() {
        let (_, issues) = analyse_source("void main() { bool b = true + false; }");
        assert_eq!(error_codes(&issues), vec!["E0044"]);
    }

    #[test]
    fn reference_only_method_needs_reference_receiver() {
        let (_, issues) = analyse_source(
            "class Counter {
                 int n;
                 Counter(int start) { this.n = start; }
                 void bump&() { }
             }
             Counter make() { return Counter(0); }
             void main() { make().bump(); }",
        );
        assert_eq!(error_codes(&issues), vec!["E0047"]);
    }

    #[test]
    fn reference_marker_methods_work_on_reference_receivers() {
        let (_, issues) = analyse_source(
            "class Counter {
                 int n;
                 Counter(int start) { this.n = start; }
                 void bump&() { n = n + 1; }
             }
             void main() { Counter c = Counter(0); c.bump(); }",
        );
        assert!(issues.is_empty(), "{issues:?}");
    }

    #[test]
    fn ambiguous_overloaded_call_carries_candidate_notes() {
        let (_, issues) = analyse_source(
            "native void amb(int a, int& b);
             native void amb(int& a, int b);
             void main() { int x = 1; amb(x, x); }",
        );
        assert_eq!(error_codes(&issues), vec!["E0015"]);
        assert_eq!(issues[0].notes.len(), 2);
    }

    #[test]
    fn non_plain_type_requires_initializer() {
        let (_, issues) = analyse_source(
            "native class Handle { }
             void main() { Handle h; }",
        );
        assert_eq!(error_codes(&issues), vec!["E0026"]);
    }

    #[test]
    fn incompatible_initializer_is_reported() {
        let (_, issues) = analyse_source("void main() { int x = true; }");
        assert_eq!(error_codes(&issues), vec!["E0025"]);
    }

    #[test]
    fn ambiguous_call_lists_candidates() {
        let (_, issues) = analyse_source(
            "native void h(int a, double b);
             native void h(double a, int b);
             void main() { int x = 1; int y = 2; h(x, y); }",
        );
        // Both candidates cost one dereference... neither is viable: an int
        // argument converts to neither double parameter. This call fails as
        // no-match instead.
        assert_eq!(error_codes(&issues), vec!["E0013"]);
    }

    #[test]
    fn true_ambiguity_between_value_and_reference_overloads() {
        let (_, issues) = analyse_source(
            "native void k(int value);
             native void k(int& target);
             void main() { int x = 1; k(x); }",
        );
        // `x` reads as int&: exact for k(int&), one dereference for k(int).
        // The reference overload wins outright.
        assert!(issues.is_empty(), "{issues:?}");
    }

    #[test]
    fn typed_tree_has_no_invalid_nodes_on_success() {
        let (analysis, issues) = analyse_source(
            "int add(int a, int b) { return a + b; }
             void main() { writeIntLn(add(2, 3)); }",
        );
        assert!(issues.is_empty());
        for id in 0..analysis.registry.type_count() {
            let _ = analysis.registry.ty(TypeId(id as u32));
        }
        let main = analysis.registry.func(analysis.main.unwrap());
        let mut stack: Vec<&hir::Stmt> = main.body.as_ref().unwrap().statements.iter().collect();
        while let Some(stmt) = stack.pop() {
            if let hir::Stmt::Expr(expr) = stmt {
                assert!(!expr.is_invalid());
            }
        }
    }
}
