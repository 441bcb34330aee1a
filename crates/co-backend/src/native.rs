//! Mapping native entities to C helpers.
//!
//! Named natives (primitive operator methods, conversions, the I/O
//! functions) are looked up by their signature string in a fixed table.
//! Synthesised entities — default and copy constructors, `assign` on
//! reference types — are matched structurally, since their signatures
//! mention user type names the table cannot enumerate.

use co_compiler::{FuncId, FunctionKind, SymbolRegistry};

/// How a native callable is rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NativeCall {
    /// A helper applied to the receiver's value (if any) and the argument
    /// values: `_add(a, b)`, `_writeIntLn(v)`.
    Invoke(&'static str),
    /// `assign` on a reference type: `_assign(pointer, value)`.
    Assign,
    /// A zero-argument constructor: the type's zero value.
    DefaultConstructor,
    /// The one-argument same-type constructor: the argument itself.
    CopyConstructor,
}

/// Resolve a native callable, or `None` when no mapping exists (an internal
/// error the caller reports).
pub fn lookup(registry: &SymbolRegistry, func: FuncId) -> Option<NativeCall> {
    let function = registry.func(func);
    debug_assert!(function.native, "native lookup on a non-native callable");

    if function.kind == FunctionKind::Constructor {
        let container = function.container?;
        if function.params.is_empty() {
            return Some(NativeCall::DefaultConstructor);
        }
        if registry.param_types(func) == vec![container] {
            return Some(NativeCall::CopyConstructor);
        }
        return None;
    }

    if function.name == "assign" {
        let container = function.container?;
        if registry.is_reference(container) {
            return Some(NativeCall::Assign);
        }
    }

    table(&registry.signature(func)).map(NativeCall::Invoke)
}

fn table(signature: &str) -> Option<&'static str> {
    Some(match signature {
        // int arithmetic
        "int int.plus(int)" => "_add",
        "int int.minus(int)" => "_sub",
        "int int.times(int)" => "_mul",
        "int int.div(int)" => "_div",
        "int int.unaryMinus()" => "_neg",
        "int int.power(int)" => "_powInt",
        // int comparisons
        "bool int.lessThan(int)" => "_lt",
        "bool int.greaterThan(int)" => "_gt",
        "bool int.lessThanOrEqual(int)" => "_le",
        "bool int.greaterThanOrEqual(int)" => "_ge",
        "bool int.equals(int)" => "_eq",
        "bool int.notEquals(int)" => "_ne",
        // double arithmetic
        "double double.plus(double)" => "_add",
        "double double.minus(double)" => "_sub",
        "double double.times(double)" => "_mul",
        "double double.div(double)" => "_div",
        "double double.unaryMinus()" => "_neg",
        "double double.power(double)" => "_powDbl",
        // double comparisons
        "bool double.lessThan(double)" => "_lt",
        "bool double.greaterThan(double)" => "_gt",
        "bool double.lessThanOrEqual(double)" => "_le",
        "bool double.greaterThanOrEqual(double)" => "_ge",
        "bool double.equals(double)" => "_eq",
        "bool double.notEquals(double)" => "_ne",
        // logic
        "bool bool.and(bool)" => "_and",
        "bool bool.or(bool)" => "_or",
        "bool bool.not()" => "_not",
        "bool bool.equals(bool)" => "_eq",
        "bool bool.notEquals(bool)" => "_ne",
        // conversions
        "double int.double()" => "_dbl",
        "int double.int()" => "_int",
        // I/O and assertions
        "void print(int)" => "_writeInt",
        "void println(int)" => "_writeIntLn",
        "void print(double)" => "_writeDbl",
        "void println(double)" => "_writeDblLn",
        "void print(bool)" => "_writeBool",
        "void println(bool)" => "_writeBoolLn",
        "void writeInt(int)" => "_writeInt",
        "void writeIntLn(int)" => "_writeIntLn",
        "void writeDouble(double)" => "_writeDbl",
        "void writeDoubleLn(double)" => "_writeDblLn",
        "void assert(bool)" => "_assert",
        _ => return None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use co_compiler::builtins;

    #[test]
    fn primitive_operators_resolve() {
        let mut registry = SymbolRegistry::new();
        let builtins = builtins::install(&mut registry);

        let plus = registry.methods_of(builtins.int_type, "plus")[0];
        assert_eq!(lookup(&registry, plus), Some(NativeCall::Invoke("_add")));

        let less = registry.methods_of(builtins.int_type, "lessThan")[0];
        assert_eq!(lookup(&registry, less), Some(NativeCall::Invoke("_lt")));
    }

    #[test]
    fn primitive_constructors_are_structural() {
        let mut registry = SymbolRegistry::new();
        let builtins = builtins::install(&mut registry);
        let ctors = registry.ty(builtins.int_type).constructors.clone();

        let kinds: Vec<_> = ctors
            .iter()
            .map(|&ctor| lookup(&registry, ctor).unwrap())
            .collect();
        assert!(kinds.contains(&NativeCall::DefaultConstructor));
        assert!(kinds.contains(&NativeCall::CopyConstructor));
    }

    #[test]
    fn assign_is_structural() {
        let mut registry = SymbolRegistry::new();
        let builtins = builtins::install(&mut registry);
        let int_ref = registry.reference_type(builtins.int_type);
        let assign = registry.methods_of(int_ref, "assign")[0];
        assert_eq!(lookup(&registry, assign), Some(NativeCall::Assign));
    }
}
