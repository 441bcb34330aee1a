//! Primitive types and the native standard library.
//!
//! CO operators are method calls, so `int`, `double` and `bool` arrive here
//! with their operator methods pre-registered (`plus`, `lessThan`, …), along
//! with the numeric conversion methods used by casts and the native I/O
//! functions. The backend maps each of these to a C helper by its signature
//! string; nothing here has a body.

use co_core::Span;
use rustc_hash::FxHashMap;

use crate::ids::{FuncId, TypeId, VarId};
use crate::registry::{Function, FunctionKind, Symbol, SymbolRegistry, Type, Variable, VarOwner};

/// Handles to the primitive types.
#[derive(Debug, Clone, Copy)]
pub struct Builtins {
    pub void_type: TypeId,
    pub int_type: TypeId,
    pub double_type: TypeId,
    pub bool_type: TypeId,
}

/// Install the primitives and native functions into a fresh registry.
pub fn install(registry: &mut SymbolRegistry) -> Builtins {
    let void_type = primitive(registry, "void");
    let int_type = primitive(registry, "int");
    let double_type = primitive(registry, "double");
    let bool_type = primitive(registry, "bool");

    // Value primitives get native default and copy constructors, so
    // `int x;` zero-initialises and `int x = 5;` copies.
    for ty in [int_type, double_type, bool_type] {
        constructor(registry, ty, &[]);
        constructor(registry, ty, &[ty]);
    }

    // Arithmetic and comparisons.
    for ty in [int_type, double_type] {
        for name in ["plus", "minus", "times", "div"] {
            method(registry, ty, name, &[ty], ty);
        }
        method(registry, ty, "unaryMinus", &[], ty);
        method(registry, ty, "power", &[ty], ty);
        for name in [
            "lessThan",
            "greaterThan",
            "lessThanOrEqual",
            "greaterThanOrEqual",
            "equals",
            "notEquals",
        ] {
            method(registry, ty, name, &[ty], bool_type);
        }
    }

    // Logic.
    method(registry, bool_type, "and", &[bool_type], bool_type);
    method(registry, bool_type, "or", &[bool_type], bool_type);
    method(registry, bool_type, "not", &[], bool_type);
    method(registry, bool_type, "equals", &[bool_type], bool_type);
    method(registry, bool_type, "notEquals", &[bool_type], bool_type);

    // Conversion methods, named after their target type: `double(i)`
    // resolves to `i.double()`.
    method(registry, int_type, "double", &[], double_type);
    method(registry, double_type, "int", &[], int_type);

    // Native I/O and assertions.
    for ty in [int_type, double_type, bool_type] {
        global(registry, "print", &[ty], void_type);
        global(registry, "println", &[ty], void_type);
    }
    global(registry, "writeInt", &[int_type], void_type);
    global(registry, "writeIntLn", &[int_type], void_type);
    global(registry, "writeDouble", &[double_type], void_type);
    global(registry, "writeDoubleLn", &[double_type], void_type);
    global(registry, "assert", &[bool_type], void_type);

    Builtins {
        void_type,
        int_type,
        double_type,
        bool_type,
    }
}

fn primitive(registry: &mut SymbolRegistry, name: &str) -> TypeId {
    let root = registry.root_scope();
    let scope = registry.alloc_scope(Some(root));
    let ty = registry.alloc_type(Type {
        name: name.to_string(),
        native: true,
        definition: None,
        scope,
        fields: Vec::new(),
        methods: FxHashMap::default(),
        constructors: Vec::new(),
        referenced: None,
        reference: None,
    });
    registry
        .add_symbol(root, name, Symbol::Type(ty), Span::default())
        .expect("primitive names are registered first");
    ty
}

fn params(registry: &mut SymbolRegistry, types: &[TypeId]) -> Vec<VarId> {
    types
        .iter()
        .enumerate()
        .map(|(index, &ty)| {
            registry.alloc_variable(Variable {
                name: format!("arg{index}"),
                ty,
                owner: VarOwner::Param,
                definition: None,
            })
        })
        .collect()
}

fn method(
    registry: &mut SymbolRegistry,
    container: TypeId,
    name: &str,
    param_types: &[TypeId],
    return_type: TypeId,
) -> FuncId {
    let scope = registry.alloc_scope(Some(registry.ty(container).scope));
    let params = params(registry, param_types);
    let func = registry.alloc_function(Function {
        name: name.to_string(),
        kind: FunctionKind::Method,
        container: Some(container),
        return_type,
        params,
        this_var: None,
        scope,
        native: true,
        definition: None,
        body: None,
    });
    registry
        .add_method(container, func, Span::default())
        .expect("builtin method signatures are distinct");
    func
}

fn constructor(registry: &mut SymbolRegistry, container: TypeId, param_types: &[TypeId]) -> FuncId {
    let scope = registry.alloc_scope(Some(registry.ty(container).scope));
    let params = params(registry, param_types);
    let name = registry.ty(container).name.clone();
    let func = registry.alloc_function(Function {
        name,
        kind: FunctionKind::Constructor,
        container: Some(container),
        return_type: container,
        params,
        this_var: None,
        scope,
        native: true,
        definition: None,
        body: None,
    });
    registry
        .add_constructor(container, func, Span::default())
        .expect("builtin constructor signatures are distinct");
    func
}

fn global(
    registry: &mut SymbolRegistry,
    name: &str,
    param_types: &[TypeId],
    return_type: TypeId,
) -> FuncId {
    let root = registry.root_scope();
    let scope = registry.alloc_scope(Some(root));
    let params = params(registry, param_types);
    let func = registry.alloc_function(Function {
        name: name.to_string(),
        kind: FunctionKind::Function,
        container: None,
        return_type,
        params,
        this_var: None,
        scope,
        native: true,
        definition: None,
        body: None,
    });
    registry
        .add_symbol(root, name, Symbol::Function(func), Span::default())
        .expect("builtin function signatures are distinct");
    func
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn primitives_resolve_in_root() {
        let mut registry = SymbolRegistry::new();
        let builtins = install(&mut registry);
        let root = registry.root_scope();
        assert_eq!(
            registry.resolve(root, "int"),
            Some(Symbol::Type(builtins.int_type))
        );
        assert_eq!(
            registry.resolve(root, "void"),
            Some(Symbol::Type(builtins.void_type))
        );
    }

    #[test]
    fn int_has_operator_methods() {
        let mut registry = SymbolRegistry::new();
        let builtins = install(&mut registry);
        let plus = registry.methods_of(builtins.int_type, "plus");
        assert_eq!(plus.len(), 1);
        assert_eq!(registry.signature(plus[0]), "int int.plus(int)");

        let less = registry.methods_of(builtins.int_type, "lessThan");
        assert_eq!(registry.signature(less[0]), "bool int.lessThan(int)");
    }

    #[test]
    fn primitives_are_plain_and_copyable() {
        let mut registry = SymbolRegistry::new();
        let builtins = install(&mut registry);
        let ctors = &registry.ty(builtins.int_type).constructors;
        assert_eq!(ctors.len(), 2);
        assert!(ctors
            .iter()
            .any(|&c| registry.param_types(c).is_empty()));
        assert!(ctors
            .iter()
            .any(|&c| registry.param_types(c) == vec![builtins.int_type]));
    }

    #[test]
    fn println_is_an_overload_set() {
        let mut registry = SymbolRegistry::new();
        install(&mut registry);
        let root = registry.root_scope();
        match registry.resolve(root, "println") {
            Some(Symbol::Overloaded(set)) => assert_eq!(set.len(), 3),
            other => panic!("expected overload set, got {other:?}"),
        }
    }

    #[test]
    fn conversion_methods_exist() {
        let mut registry = SymbolRegistry::new();
        let builtins = install(&mut registry);
        let to_double = registry.methods_of(builtins.int_type, "double");
        assert_eq!(registry.signature(to_double[0]), "double int.double()");
        let to_int = registry.methods_of(builtins.double_type, "int");
        assert_eq!(registry.signature(to_int[0]), "int double.int()");
    }
}
