//! C99 back-end for CO.
//!
//! Consumes a finished [`co_compiler::Analysis`] — which the driver only
//! hands over when no error-severity issues exist — and produces one
//! self-contained translation unit. The walk is purely mechanical: all
//! semantic decisions, including implicit dereferences, were made explicit
//! in the typed tree.
//!
//! Failures here are internal compiler errors (exit code 2 territory), not
//! user diagnostics: a native entity without a mapping, a cyclic value-type
//! layout, or an `Invalid` node that slipped through.

mod emit;
mod names;
mod native;
mod reach;

pub use names::NameGenerator;
pub use native::{lookup as native_lookup, NativeCall};
pub use reach::{collect as collect_reachable, Reachable};

use co_compiler::Analysis;

/// An internal error during code generation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BackendError {
    #[error("cyclic field layout involving type '{type_name}'")]
    CyclicTypeLayout { type_name: String },
    #[error("no native mapping for '{signature}'")]
    MissingNative { signature: String },
    #[error("invalid expression reached the backend")]
    InvalidExpression,
}

/// Emit the C translation unit for an analysed program.
pub fn process(analysis: &Analysis) -> Result<String, BackendError> {
    let reachable = reach::collect(analysis);
    emit::CEmitter::new(analysis, &reachable).emit()
}

#[cfg(test)]
mod tests {
    use super::*;
    use bumpalo::Bump;

    fn emit(source: &str) -> String {
        let arena = Bump::new();
        let (program, parse_issues) = co_parser::parse(&arena, source);
        assert!(parse_issues.is_empty(), "{parse_issues:?}");
        let (analysis, issues) = co_compiler::analyze(&program);
        assert!(issues.is_empty(), "{issues:?}");
        process(&analysis).expect("backend should succeed on a clean program")
    }

    #[test]
    fn emits_main_calling_co_main() {
        let c = emit("void main() { int x = 5; writeIntLn(x); }");
        assert!(c.contains("static void co_main(void)"), "{c}");
        assert!(c.contains("int main(void)"), "{c}");
        assert!(c.contains("co_main();"), "{c}");
        // The write goes through the native helper on the dereferenced
        // reference.
        assert!(c.contains("_writeIntLn((*(&x)))"), "{c}");
    }

    #[test]
    fn assignment_emits_assign_on_the_address() {
        let c = emit("void main() { int x = 3; x = 5; }");
        assert!(c.contains("_assign((&x), 5)"), "{c}");
    }

    #[test]
    fn structs_are_emitted_with_fields() {
        let c = emit(
            "class Vector2 {
                 int x;
                 int y;
                 Vector2(int px, int py) { this.x = px; this.y = py; }
                 int lengthSquared() { return x * x + y * y; }
             }
             void main() { Vector2 v = Vector2(1, 2); writeIntLn(v.lengthSquared()); }",
        );
        assert!(c.contains("typedef struct co_Vector2 {"), "{c}");
        assert!(c.contains("int32_t x;"), "{c}");
        assert!(c.contains("static co_Vector2 co_Vector2_Vector2(int32_t px, int32_t py)"), "{c}");
        assert!(c.contains("static int32_t co_Vector2_lengthSquared(co_Vector2* co_this)"), "{c}");
        // The constructor builds and returns a value.
        assert!(c.contains("co_Vector2 co_self"), "{c}");
        assert!(c.contains("return co_self;"), "{c}");
    }

    #[test]
    fn unreachable_functions_are_not_emitted() {
        let c = emit(
            "int unused() { return 1; }
             void main() { }",
        );
        assert!(!c.contains("co_unused"), "{c}");
    }

    #[test]
    fn global_initialisers_run_before_co_main() {
        let c = emit(
            "int counter = 10;
             void main() { writeIntLn(counter); }",
        );
        assert!(c.contains("static int32_t co_counter;"), "{c}");
        let init_pos = c.find("co_counter = 10;").expect("init emitted");
        let call_pos = c.find("co_main();").expect("main call emitted");
        assert!(init_pos < call_pos, "{c}");
    }

    #[test]
    fn processing_twice_is_identical() {
        let arena = Bump::new();
        let (program, _) = co_parser::parse(
            &arena,
            "int twice(int v) { return v + v; } void main() { writeIntLn(twice(21)); }",
        );
        let (analysis, issues) = co_compiler::analyze(&program);
        assert!(issues.is_empty());
        let first = process(&analysis).unwrap();
        let second = process(&analysis).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn overloaded_functions_get_distinct_names() {
        let c = emit(
            "int pick(int a) { return a; }
             int pick(double a) { return int(a); }
             void main() { writeIntLn(pick(1)); writeIntLn(pick(2.0)); }",
        );
        assert!(c.contains("co_pick("), "{c}");
        assert!(c.contains("co_pick_1("), "{c}");
    }

    #[test]
    fn cyclic_field_layout_is_fatal() {
        let arena = Bump::new();
        let (program, _) = co_parser::parse(
            &arena,
            "class A { B b; }
             class B { A a; }
             void main() { A x = A(); }",
        );
        let (analysis, issues) = co_compiler::analyze(&program);
        // The cycle is a layout problem, not a semantic one.
        assert!(issues.is_empty(), "{issues:?}");
        match process(&analysis) {
            Err(BackendError::CyclicTypeLayout { .. }) => {}
            other => panic!("expected a cyclic layout error, got {other:?}"),
        }
    }
}
