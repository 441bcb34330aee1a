//! The symbol registry: every named entity of a compilation, arena-style.
//!
//! Types, callables, variables and scopes live in flat vectors and refer to
//! each other by [`TypeId`]/[`FuncId`]/[`VarId`]/[`ScopeId`] handles. Scopes
//! form a tree rooted at the root namespace (`ScopeId(0)`); each type owns a
//! member scope hanging off the root so method bodies see fields and sibling
//! methods by bare name.
//!
//! The registry grows monotonically during the registration passes and body
//! analysis; nothing is ever removed or rewritten afterwards.

use rustc_hash::FxHashMap;

use co_core::{Issue, IssueKind, NoteText, Span, SymbolDescription};

use crate::hir::CodeBlock;
use crate::ids::{FuncId, ScopeId, TypeId, VarId};

// ============================================================================
// Entities
// ============================================================================

/// A value type (or the reference type derived from one).
#[derive(Debug)]
pub struct Type {
    pub name: String,
    pub native: bool,
    pub definition: Option<Span>,
    /// Member lookup scope; parent is the root namespace (or, for a
    /// reference type, the referenced type's scope).
    pub scope: ScopeId,
    /// Ordered by-value fields.
    pub fields: Vec<VarId>,
    /// Methods grouped by name, in registration order.
    pub methods: FxHashMap<String, Vec<FuncId>>,
    pub constructors: Vec<FuncId>,
    /// `Some(T)` when this type is `T&`.
    pub referenced: Option<TypeId>,
    /// The lazily-built `Self&`, unique per type.
    pub reference: Option<TypeId>,
}

/// What flavour of callable a [`Function`] is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FunctionKind {
    Function,
    Method,
    Constructor,
}

/// A function, method or constructor.
#[derive(Debug)]
pub struct Function {
    pub name: String,
    pub kind: FunctionKind,
    /// The enclosing type of a method or constructor.
    pub container: Option<TypeId>,
    pub return_type: TypeId,
    /// Ordered parameters; `this` is not among them.
    pub params: Vec<VarId>,
    /// The implicit `this` of methods and constructors, typed `container&`.
    pub this_var: Option<VarId>,
    /// Scope holding the parameters; body blocks nest under it.
    pub scope: ScopeId,
    pub native: bool,
    pub definition: Option<Span>,
    /// Typed body, attached after body analysis.
    pub body: Option<CodeBlock>,
}

/// Where a variable lives; drives both name diagnostics and code emission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VarOwner {
    Global,
    Field(TypeId),
    Param,
    Local,
}

/// A variable of any flavour.
#[derive(Debug)]
pub struct Variable {
    pub name: String,
    pub ty: TypeId,
    pub owner: VarOwner,
    pub definition: Option<Span>,
}

/// What a name in a scope denotes.
#[derive(Debug, Clone, PartialEq)]
pub enum Symbol {
    Variable(VarId),
    Function(FuncId),
    Overloaded(Vec<FuncId>),
    Type(TypeId),
}

/// A name-lookup environment.
#[derive(Debug, Default)]
pub struct Scope {
    pub parent: Option<ScopeId>,
    symbols: FxHashMap<String, Symbol>,
}

// ============================================================================
// Registry
// ============================================================================

/// All entities of one compilation.
#[derive(Debug)]
pub struct SymbolRegistry {
    types: Vec<Type>,
    functions: Vec<Function>,
    variables: Vec<Variable>,
    scopes: Vec<Scope>,
    /// The sentinel type that silently satisfies every conversion.
    pub unknown_type: TypeId,
}

impl SymbolRegistry {
    /// An empty registry with a root scope and the `unknownType` sentinel.
    /// Use [`crate::builtins::install`] to add the primitive types and
    /// native functions.
    pub fn new() -> Self {
        let mut registry = Self {
            types: Vec::new(),
            functions: Vec::new(),
            variables: Vec::new(),
            scopes: vec![Scope::default()],
            unknown_type: TypeId(0),
        };
        // Not registered in any scope: the sentinel is unnameable.
        let scope = registry.alloc_scope(Some(ScopeId(0)));
        registry.unknown_type = registry.alloc_type(Type {
            name: "<unknown>".to_string(),
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
    }

    /// The root namespace.
    pub fn root_scope(&self) -> ScopeId {
        ScopeId(0)
    }

    // =========================================================================
    // Allocation and access
    // =========================================================================

    pub fn alloc_type(&mut self, ty: Type) -> TypeId {
        let id = TypeId(self.types.len() as u32);
        self.types.push(ty);
        id
    }

    pub fn alloc_function(&mut self, func: Function) -> FuncId {
        let id = FuncId(self.functions.len() as u32);
        self.functions.push(func);
        id
    }

    pub fn alloc_variable(&mut self, var: Variable) -> VarId {
        let id = VarId(self.variables.len() as u32);
        self.variables.push(var);
        id
    }

    pub fn alloc_scope(&mut self, parent: Option<ScopeId>) -> ScopeId {
        let id = ScopeId(self.scopes.len() as u32);
        self.scopes.push(Scope {
            parent,
            symbols: FxHashMap::default(),
        });
        id
    }

    pub fn ty(&self, id: TypeId) -> &Type {
        &self.types[id.index()]
    }

    pub fn ty_mut(&mut self, id: TypeId) -> &mut Type {
        &mut self.types[id.index()]
    }

    pub fn func(&self, id: FuncId) -> &Function {
        &self.functions[id.index()]
    }

    pub fn func_mut(&mut self, id: FuncId) -> &mut Function {
        &mut self.functions[id.index()]
    }

    pub fn var(&self, id: VarId) -> &Variable {
        &self.variables[id.index()]
    }

    pub fn type_count(&self) -> usize {
        self.types.len()
    }

    pub fn all_types(&self) -> impl Iterator<Item = TypeId> + '_ {
        (0..self.types.len() as u32).map(TypeId)
    }

    // =========================================================================
    // Scope operations
    // =========================================================================

    /// Look a name up in a scope chain.
    pub fn resolve(&self, scope: ScopeId, name: &str) -> Option<Symbol> {
        let mut current = Some(scope);
        while let Some(id) = current {
            let scope = &self.scopes[id.index()];
            if let Some(symbol) = scope.symbols.get(name) {
                return Some(symbol.clone());
            }
            current = scope.parent;
        }
        None
    }

    /// Look a name up in one scope only (no parent walk).
    pub fn resolve_here(&self, scope: ScopeId, name: &str) -> Option<Symbol> {
        self.scopes[scope.index()].symbols.get(name).cloned()
    }

    /// Add a symbol to a scope.
    ///
    /// A callable colliding with a callable of the same name merges into an
    /// overload set, unless the parameter-type tuple is already present: that
    /// is a duplicate definition (the issue kind depends on the callable's
    /// flavour, with a note at the first definition). Any other collision is
    /// `EntityNameTaken`.
    pub fn add_symbol(
        &mut self,
        scope: ScopeId,
        name: &str,
        symbol: Symbol,
        span: Span,
    ) -> Result<(), Issue> {
        let existing = self.scopes[scope.index()].symbols.get(name).cloned();
        match (existing, symbol) {
            (None, symbol) => {
                self.scopes[scope.index()]
                    .symbols
                    .insert(name.to_string(), symbol);
                Ok(())
            }
            (Some(Symbol::Function(old)), Symbol::Function(new)) => {
                if let Some(previous) = self.find_same_signature(&[old], new) {
                    return Err(self.duplicate_callable_issue(previous, new, span));
                }
                self.scopes[scope.index()]
                    .symbols
                    .insert(name.to_string(), Symbol::Overloaded(vec![old, new]));
                Ok(())
            }
            (Some(Symbol::Overloaded(mut set)), Symbol::Function(new)) => {
                if let Some(previous) = self.find_same_signature(&set, new) {
                    return Err(self.duplicate_callable_issue(previous, new, span));
                }
                set.push(new);
                self.scopes[scope.index()]
                    .symbols
                    .insert(name.to_string(), Symbol::Overloaded(set));
                Ok(())
            }
            (Some(_), _) => Err(Issue::new(
                IssueKind::EntityNameTaken {
                    name: name.to_string(),
                },
                span,
            )),
        }
    }

    fn find_same_signature(&self, set: &[FuncId], new: FuncId) -> Option<FuncId> {
        let new_params = self.param_types(new);
        set.iter()
            .copied()
            .find(|&old| self.param_types(old) == new_params)
    }

    fn duplicate_callable_issue(&self, previous: FuncId, new: FuncId, span: Span) -> Issue {
        let func = self.func(new);
        let kind = match func.kind {
            FunctionKind::Function => IssueKind::DuplicateFunctionDefinition {
                name: func.name.clone(),
            },
            FunctionKind::Method => IssueKind::DuplicateMethodDefinition {
                name: func.name.clone(),
                type_name: self.display_type(func.container.expect("method has container")),
            },
            FunctionKind::Constructor => IssueKind::DuplicateConstructorDefinition {
                type_name: self.display_type(func.container.expect("constructor has container")),
            },
        };
        Issue::new(kind, span)
            .with_note(self.func(previous).definition, NoteText::FirstDefinitionHere)
    }

    // =========================================================================
    // Type members
    // =========================================================================

    /// Add a field; the field also becomes a symbol in the type's member
    /// scope so method bodies see it by bare name.
    pub fn add_field(&mut self, ty: TypeId, field: VarId, span: Span) -> Result<(), Issue> {
        let scope = self.ty(ty).scope;
        let name = self.var(field).name.clone();
        self.add_symbol(scope, &name, Symbol::Variable(field), span)?;
        self.ty_mut(ty).fields.push(field);
        Ok(())
    }

    /// Add a method to a type (and to its member scope for bare-name calls).
    pub fn add_method(&mut self, ty: TypeId, method: FuncId, span: Span) -> Result<(), Issue> {
        let scope = self.ty(ty).scope;
        let name = self.func(method).name.clone();
        self.add_symbol(scope, &name, Symbol::Function(method), span)?;
        self.ty_mut(ty)
            .methods
            .entry(name)
            .or_default()
            .push(method);
        Ok(())
    }

    /// Add a constructor, enforcing signature uniqueness.
    pub fn add_constructor(&mut self, ty: TypeId, ctor: FuncId, span: Span) -> Result<(), Issue> {
        let existing = self.ty(ty).constructors.clone();
        if let Some(previous) = self.find_same_signature(&existing, ctor) {
            return Err(self.duplicate_callable_issue(previous, ctor, span));
        }
        self.ty_mut(ty).constructors.push(ctor);
        Ok(())
    }

    /// The methods a receiver of type `ty` can reach under `name`: the base
    /// type's set, plus the reference type's own set when `ty` is `T&`.
    pub fn methods_of(&self, ty: TypeId, name: &str) -> Vec<FuncId> {
        let mut result = Vec::new();
        let base = self.ty(ty).referenced.unwrap_or(ty);
        if let Some(set) = self.ty(base).methods.get(name) {
            result.extend(set.iter().copied());
        }
        if base != ty {
            if let Some(set) = self.ty(ty).methods.get(name) {
                result.extend(set.iter().copied());
            }
        }
        result
    }

    /// Find a field by name on the base of `ty`.
    pub fn field_of(&self, ty: TypeId, name: &str) -> Option<VarId> {
        let base = self.ty(ty).referenced.unwrap_or(ty);
        self.ty(base)
            .fields
            .iter()
            .copied()
            .find(|&field| self.var(field).name == name)
    }

    // =========================================================================
    // Reference types
    // =========================================================================

    /// Whether `ty` is a `T&`.
    pub fn is_reference(&self, ty: TypeId) -> bool {
        self.ty(ty).referenced.is_some()
    }

    /// The `T` of a `T&`.
    pub fn referenced(&self, ty: TypeId) -> Option<TypeId> {
        self.ty(ty).referenced
    }

    /// The unique `T&` of a non-reference type, built on first use.
    ///
    /// The reference type owns a native `assign` method taking the
    /// referenced type and returning the reference type itself. Its member
    /// scope chains to the referenced type's, so reference receivers still
    /// see fields and base methods.
    ///
    /// Callers must reject reference operands first (`OverreferencedType`);
    /// asking for the reference of a reference is a logic error.
    pub fn reference_type(&mut self, ty: TypeId) -> TypeId {
        debug_assert!(
            !self.is_reference(ty),
            "reference_type on a reference type"
        );
        if let Some(reference) = self.ty(ty).reference {
            return reference;
        }

        let base_scope = self.ty(ty).scope;
        let scope = self.alloc_scope(Some(base_scope));
        let name = format!("{}&", self.ty(ty).name);
        let reference = self.alloc_type(Type {
            name,
            native: true,
            definition: None,
            scope,
            fields: Vec::new(),
            methods: FxHashMap::default(),
            constructors: Vec::new(),
            referenced: Some(ty),
            reference: None,
        });
        self.ty_mut(ty).reference = Some(reference);

        // `assign(T) -> T&`, the desugaring target of `=`.
        let func_scope = self.alloc_scope(Some(scope));
        let value = self.alloc_variable(Variable {
            name: "value".to_string(),
            ty,
            owner: VarOwner::Param,
            definition: None,
        });
        let this_var = self.alloc_variable(Variable {
            name: "this".to_string(),
            ty: reference,
            owner: VarOwner::Param,
            definition: None,
        });
        let assign = self.alloc_function(Function {
            name: "assign".to_string(),
            kind: FunctionKind::Method,
            container: Some(reference),
            return_type: reference,
            params: vec![value],
            this_var: Some(this_var),
            scope: func_scope,
            native: true,
            definition: None,
            body: None,
        });
        self.add_method(reference, assign, Span::default())
            .expect("fresh reference type cannot collide on 'assign'");

        reference
    }

    // =========================================================================
    // Conversions
    // =========================================================================

    /// `T -> T`, `T& -> T`, and `unknownType` in either position.
    /// `T -> T&` never holds: the analyser cannot invent storage.
    pub fn is_implicitly_convertible(&self, from: TypeId, to: TypeId) -> bool {
        if from == to || from == self.unknown_type || to == self.unknown_type {
            return true;
        }
        self.referenced(from) == Some(to)
    }

    /// The least upper bound under implicit convertibility, if any.
    pub fn least_upper_bound(&self, a: TypeId, b: TypeId) -> Option<TypeId> {
        if self.is_implicitly_convertible(b, a) {
            Some(a)
        } else if self.is_implicitly_convertible(a, b) {
            Some(b)
        } else {
            None
        }
    }

    // =========================================================================
    // Rendering
    // =========================================================================

    /// The display name of a type (`int`, `Vector2&`, …).
    pub fn display_type(&self, ty: TypeId) -> String {
        self.ty(ty).name.clone()
    }

    /// The parameter-type tuple that identifies a callable in an overload
    /// set.
    pub fn param_types(&self, func: FuncId) -> Vec<TypeId> {
        self.func(func)
            .params
            .iter()
            .map(|&param| self.var(param).ty)
            .collect()
    }

    /// The signature string, e.g. `bool int.lessThan(int)`. Also the key of
    /// the backend's native-entity tables.
    pub fn signature(&self, func: FuncId) -> String {
        let function = self.func(func);
        let params = function
            .params
            .iter()
            .map(|&param| self.display_type(self.var(param).ty))
            .collect::<Vec<_>>()
            .join(", ");
        let ret = self.display_type(function.return_type);
        match function.container {
            Some(container) => format!(
                "{ret} {}.{}({params})",
                self.display_type(container),
                function.name
            ),
            None => format!("{ret} {}({params})", function.name),
        }
    }

    /// What kind of thing a symbol is, for diagnostics.
    pub fn describe(&self, symbol: &Symbol) -> SymbolDescription {
        match symbol {
            Symbol::Variable(_) => SymbolDescription::Variable,
            Symbol::Function(func) => match self.func(*func).kind {
                FunctionKind::Function => SymbolDescription::Function,
                FunctionKind::Method => SymbolDescription::Method,
                FunctionKind::Constructor => SymbolDescription::Constructor,
            },
            Symbol::Overloaded(_) => SymbolDescription::OverloadedFunction,
            Symbol::Type(_) => SymbolDescription::Type,
        }
    }
}

impl Default for SymbolRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn value_type(registry: &mut SymbolRegistry, name: &str) -> TypeId {
        let root = registry.root_scope();
        let scope = registry.alloc_scope(Some(root));
        let ty = registry.alloc_type(Type {
            name: name.to_string(),
            native: false,
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
            .unwrap();
        ty
    }

    fn function(registry: &mut SymbolRegistry, name: &str, params: &[TypeId]) -> FuncId {
        let root = registry.root_scope();
        let scope = registry.alloc_scope(Some(root));
        let params = params
            .iter()
            .map(|&ty| {
                registry.alloc_variable(Variable {
                    name: "p".to_string(),
                    ty,
                    owner: VarOwner::Param,
                    definition: None,
                })
            })
            .collect();
        registry.alloc_function(Function {
            name: name.to_string(),
            kind: FunctionKind::Function,
            container: None,
            return_type: registry.unknown_type,
            params,
            this_var: None,
            scope,
            native: false,
            definition: Some(Span::point(1, 1)),
            body: None,
        })
    }

    #[test]
    fn resolve_walks_parents() {
        let mut registry = SymbolRegistry::new();
        let ty = value_type(&mut registry, "Thing");
        let inner = registry.alloc_scope(Some(registry.root_scope()));
        assert_eq!(
            registry.resolve(inner, "Thing"),
            Some(Symbol::Type(ty))
        );
        assert_eq!(registry.resolve_here(inner, "Thing"), None);
    }

    #[test]
    fn shadowing_resolves_to_innermost() {
        let mut registry = SymbolRegistry::new();
        let root = registry.root_scope();
        let outer_var = registry.alloc_variable(Variable {
            name: "x".to_string(),
            ty: registry.unknown_type,
            owner: VarOwner::Global,
            definition: None,
        });
        registry
            .add_symbol(root, "x", Symbol::Variable(outer_var), Span::default())
            .unwrap();

        let inner = registry.alloc_scope(Some(root));
        let inner_var = registry.alloc_variable(Variable {
            name: "x".to_string(),
            ty: registry.unknown_type,
            owner: VarOwner::Local,
            definition: None,
        });
        registry
            .add_symbol(inner, "x", Symbol::Variable(inner_var), Span::default())
            .unwrap();

        assert_eq!(
            registry.resolve(inner, "x"),
            Some(Symbol::Variable(inner_var))
        );
        assert_eq!(
            registry.resolve(root, "x"),
            Some(Symbol::Variable(outer_var))
        );
    }

    #[test]
    fn callables_merge_into_overload_sets() {
        let mut registry = SymbolRegistry::new();
        let root = registry.root_scope();
        let a = value_type(&mut registry, "A");
        let b = value_type(&mut registry, "B");
        let f1 = function(&mut registry, "f", &[a]);
        let f2 = function(&mut registry, "f", &[b]);

        registry
            .add_symbol(root, "f", Symbol::Function(f1), Span::default())
            .unwrap();
        registry
            .add_symbol(root, "f", Symbol::Function(f2), Span::default())
            .unwrap();

        assert_eq!(
            registry.resolve(root, "f"),
            Some(Symbol::Overloaded(vec![f1, f2]))
        );
    }

    #[test]
    fn duplicate_signature_is_rejected_with_note() {
        let mut registry = SymbolRegistry::new();
        let root = registry.root_scope();
        let a = value_type(&mut registry, "A");
        let f1 = function(&mut registry, "f", &[a]);
        let f2 = function(&mut registry, "f", &[a]);

        registry
            .add_symbol(root, "f", Symbol::Function(f1), Span::default())
            .unwrap();
        let err = registry
            .add_symbol(root, "f", Symbol::Function(f2), Span::point(2, 1))
            .unwrap_err();
        assert_eq!(err.code(), "E0030");
        assert_eq!(err.notes.len(), 1);
    }

    #[test]
    fn non_callable_collision_is_name_taken() {
        let mut registry = SymbolRegistry::new();
        let root = registry.root_scope();
        let ty = value_type(&mut registry, "A");
        let err = registry
            .add_symbol(root, "A", Symbol::Type(ty), Span::default())
            .unwrap_err();
        assert_eq!(err.code(), "E0018");
    }

    #[test]
    fn reference_type_is_unique_and_has_assign() {
        let mut registry = SymbolRegistry::new();
        let ty = value_type(&mut registry, "A");
        let first = registry.reference_type(ty);
        let second = registry.reference_type(ty);
        assert_eq!(first, second);
        assert_eq!(registry.referenced(first), Some(ty));
        assert_eq!(registry.display_type(first), "A&");

        let assign = registry.methods_of(first, "assign");
        assert_eq!(assign.len(), 1);
        let assign = registry.func(assign[0]);
        assert!(assign.native);
        assert_eq!(assign.return_type, first);
    }

    #[test]
    fn conversion_rules() {
        let mut registry = SymbolRegistry::new();
        let a = value_type(&mut registry, "A");
        let b = value_type(&mut registry, "B");
        let a_ref = registry.reference_type(a);
        let unknown = registry.unknown_type;

        assert!(registry.is_implicitly_convertible(a, a));
        assert!(registry.is_implicitly_convertible(a_ref, a));
        assert!(!registry.is_implicitly_convertible(a, a_ref));
        assert!(!registry.is_implicitly_convertible(a, b));
        assert!(registry.is_implicitly_convertible(unknown, b));
        assert!(registry.is_implicitly_convertible(b, unknown));
    }

    #[test]
    fn least_upper_bound_prefers_the_value_type() {
        let mut registry = SymbolRegistry::new();
        let a = value_type(&mut registry, "A");
        let b = value_type(&mut registry, "B");
        let a_ref = registry.reference_type(a);

        assert_eq!(registry.least_upper_bound(a, a), Some(a));
        assert_eq!(registry.least_upper_bound(a_ref, a), Some(a));
        assert_eq!(registry.least_upper_bound(a, a_ref), Some(a));
        assert_eq!(registry.least_upper_bound(a, b), None);
    }

    #[test]
    fn signatures_render_like_native_keys() {
        let mut registry = SymbolRegistry::new();
        let a = value_type(&mut registry, "A");
        let f = function(&mut registry, "f", &[a, a]);
        assert_eq!(registry.signature(f), "<unknown> f(A, A)");
    }
}
