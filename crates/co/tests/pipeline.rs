//! End-to-end pipeline tests: source text in, diagnostics and C out.

use co::{compile_to_c, Locale, Severity};

fn codes(output: &co::CompileOutput) -> Vec<&'static str> {
    output.issues.iter().map(|issue| issue.code()).collect()
}

#[test]
fn happy_path_compiles_and_exits_zero() {
    let output = compile_to_c("void main() { int x = 5; writeIntLn(x); }");
    assert!(output.issues.is_empty(), "{:?}", output.issues);
    assert_eq!(output.exit_code(), 0);

    let c = output.c_source.expect("C emitted");
    assert!(c.contains("static void co_main(void)"), "{c}");
    assert!(c.contains("_writeIntLn((*(&x)))"), "{c}");
    assert!(c.contains("co_main();"), "{c}");
}

#[test]
fn unknown_name_produces_exactly_one_error() {
    // The unknown argument must not cascade into a call-resolution error.
    let output = compile_to_c("void main() { println(y); }");
    assert_eq!(codes(&output), vec!["E0017"]);
    assert_eq!(output.exit_code(), 1);
    assert!(output.c_source.is_none());

    let rendered = output.issues[0].render(Locale::En);
    assert!(rendered.message.contains('y'), "{rendered}");
    assert_eq!(rendered.span.start_line, 1);
}

#[test]
fn overloads_resolve_without_reference_conversions() {
    // f(1.0) picks f(double); the literal cannot convert to int.
    let output = compile_to_c(
        "native void f(int value);
         native void f(double value);
         void main() { f(1.0); }",
    );
    assert!(output.issues.is_empty(), "{:?}", output.issues);

    // An int rvalue never converts to int&, so the reference overload does
    // not compete for literals and the call stays unambiguous.
    let output = compile_to_c(
        "native void g(int value);
         native void g(int& target);
         void main() { g(7); }",
    );
    assert!(output.issues.is_empty(), "{:?}", output.issues);
}

#[test]
fn duplicate_definition_notes_the_first_occurrence() {
    let output = compile_to_c(
        "int foo() { return 1; }
         int foo() { return 2; }
         void main() { }",
    );
    assert_eq!(codes(&output), vec!["E0030"]);
    let issue = &output.issues[0];
    assert_eq!(issue.span.start_line, 2);
    assert_eq!(issue.notes.len(), 1);
    assert_eq!(issue.notes[0].span.unwrap().start_line, 1);
}

#[test]
fn missing_return_path_is_an_error() {
    let output = compile_to_c(
        "int f() { if (true) return 1; }
         void main() { f(); }",
    );
    assert_eq!(codes(&output), vec!["E0020"]);
}

#[test]
fn assignment_emits_assign_semantics() {
    let output = compile_to_c("void main() { int x = 3; x = 5; }");
    assert!(output.issues.is_empty(), "{:?}", output.issues);
    let c = output.c_source.unwrap();
    assert!(c.contains("int32_t x = 3;"), "{c}");
    assert!(c.contains("_assign((&x), 5)"), "{c}");
}

#[test]
fn nested_scopes_shadow_and_same_scope_collides() {
    let output = compile_to_c(
        "void main() { int x = 1; { int x = 2; writeIntLn(x); } writeIntLn(x); }",
    );
    assert!(output.issues.is_empty(), "{:?}", output.issues);

    let output = compile_to_c("void main() { int x = 1; int x = 2; }");
    assert_eq!(codes(&output), vec!["E0018"]);
}

#[test]
fn ambiguous_call_reports_each_candidate() {
    let output = compile_to_c(
        "native void h(int a, int& b);
         native void h(int& a, int b);
         void main() { int x = 1; h(x, x); }",
    );
    assert_eq!(codes(&output), vec!["E0015"]);
    assert_eq!(output.issues[0].notes.len(), 2);
}

#[test]
fn diagnostics_are_deterministic() {
    let source = "void main() { println(y); int b = true; unknown(); }";
    let first = compile_to_c(source);
    let second = compile_to_c(source);
    assert_eq!(first.issues, second.issues);
    // Source order within the pass.
    let spans: Vec<_> = first.issues.iter().map(|i| i.span.start_col).collect();
    let mut sorted = spans.clone();
    sorted.sort_unstable();
    assert_eq!(spans, sorted);
}

#[test]
fn messages_render_in_all_locales() {
    let output = compile_to_c("void main() { println(y); }");
    let issue = &output.issues[0];
    assert_eq!(issue.message(Locale::En), "unknown name 'y'");
    assert_eq!(issue.message(Locale::Be), "невядомае імя 'y'");
    assert_eq!(issue.message(Locale::Ru), "неизвестное имя 'y'");
}

#[test]
fn warnings_do_not_block_emission() {
    let output = compile_to_c(
        "int f() { return 1; f(); }
         void main() { writeIntLn(f()); }",
    );
    assert_eq!(codes(&output), vec!["E0019"]);
    assert_eq!(output.issues[0].severity, Severity::Warning);
    assert_eq!(output.exit_code(), 0);
    assert!(output.c_source.is_some());
}

#[test]
fn value_types_methods_and_loops_compile_end_to_end() {
    let source = "
        int limit = 5;

        class Vector2 {
            int x;
            int y;
            Vector2(int px, int py) { this.x = px; this.y = py; }
            int lengthSquared() { return x * x + y * y; }
            Vector2 plus(Vector2 other) {
                return Vector2(x + other.x, y + other.y);
            }
        }

        void main() {
            Vector2 v = Vector2(1, 2);
            Vector2 w = v.plus(Vector2(3, 4));
            int i = 0;
            while (i < limit) {
                i = i + 1;
            }
            assert(w.lengthSquared() == 52);
            writeIntLn(i);
            writeDoubleLn(double(i) / 2.0);
        }
    ";
    let output = compile_to_c(source);
    assert!(output.issues.is_empty(), "{:?}", output.issues);
    let c = output.c_source.unwrap();
    assert!(c.contains("typedef struct co_Vector2"), "{c}");
    assert!(c.contains("while ("), "{c}");
    assert!(c.contains("_assert("), "{c}");
    assert!(c.contains("co_limit = 5;"), "{c}");
    // Operator sugar became native helpers.
    assert!(c.contains("_lt("), "{c}");
    assert!(c.contains("_eq("), "{c}");
}

#[test]
fn lexer_and_parser_issues_flow_through() {
    let output = compile_to_c("void main() { int x = 1 $ 2; }");
    assert!(codes(&output).contains(&"E0004"), "{:?}", output.issues);
    assert_eq!(output.exit_code(), 1);
}

#[test]
fn reference_parameters_mutate_the_caller() {
    let output = compile_to_c(
        "void bump(int& target) { target = target + 1; }
         void main() { int x = 0; bump(x); writeIntLn(x); }",
    );
    assert!(output.issues.is_empty(), "{:?}", output.issues);
    let c = output.c_source.unwrap();
    // The parameter is a pointer, and the call passes the address through.
    assert!(c.contains("static void co_bump(int32_t* target)"), "{c}");
    assert!(c.contains("co_bump((&x))"), "{c}");
    assert!(c.contains("_assign(target, "), "{c}");
}

#[test]
fn casts_and_conversion_errors() {
    let output = compile_to_c("void main() { writeDoubleLn(double(21)); }");
    assert!(output.issues.is_empty(), "{:?}", output.issues);
    assert!(output.c_source.unwrap().contains("_dbl(21)"));

    let output = compile_to_c("void main() { int i = int(true); }");
    assert_eq!(codes(&output), vec!["E0052"]);
}
