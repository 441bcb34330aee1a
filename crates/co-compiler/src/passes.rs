//! Passes 1–3: symbol registration.
//!
//! 1. Register type names, so every later type expression can resolve.
//! 2. Register fields, methods and constructors as stubs — full signatures,
//!    empty bodies.
//! 3. Register free functions and global variables.
//!
//! Bodies are only collected here; pass 4 (body analysis) runs afterwards,
//! when every global entity is already nameable. That is what makes forward
//! references among top-level definitions work without ordering rules.

use co_core::{Issue, IssueKind, Span};
use co_parser::ast::{self, GlobalDef, Member, Program};
use rustc_hash::FxHashMap;

use crate::builtins::Builtins;
use crate::ids::{FuncId, TypeId, VarId};
use crate::registry::{
    Function, FunctionKind, Symbol, SymbolRegistry, Type, Variable, VarOwner,
};
use crate::type_resolver::resolve_type;

/// A body collected for pass 4, in registration order.
pub struct PendingBody<'ast> {
    pub func: FuncId,
    pub body: ast::CodeBlock<'ast>,
}

/// A global initialiser collected for pass 4.
pub struct PendingGlobalInit<'ast> {
    pub var: VarId,
    pub initializer: Option<&'ast ast::Expr<'ast>>,
    pub span: Span,
}

/// Everything registration leaves behind for body analysis.
pub struct Registration<'ast> {
    pub pending_bodies: Vec<PendingBody<'ast>>,
    pub global_variables: Vec<VarId>,
    pub pending_global_inits: Vec<PendingGlobalInit<'ast>>,
    pub issues: Vec<Issue>,
}

/// Run passes 1–3 over a program.
pub fn run<'ast>(
    registry: &mut SymbolRegistry,
    builtins: Builtins,
    program: &Program<'ast>,
) -> Registration<'ast> {
    let mut pass = RegistrationPass {
        registry,
        builtins,
        issues: Vec::new(),
        user_types: Vec::new(),
        pending_bodies: Vec::new(),
        global_variables: Vec::new(),
        pending_global_inits: Vec::new(),
    };

    // Pass 1: type names.
    for def in program.definitions {
        if let GlobalDef::Type(type_def) = def {
            pass.register_type(type_def);
        }
    }
    tracing::debug!(types = pass.user_types.len(), "registered type names");

    // Pass 2: members.
    let user_types = std::mem::take(&mut pass.user_types);
    for (ty, def) in &user_types {
        pass.register_members(*ty, def);
    }

    // Pass 3: free functions and globals.
    for def in program.definitions {
        match def {
            GlobalDef::Function(func) => pass.register_function(func),
            GlobalDef::Variables(vars) => pass.register_globals(vars),
            GlobalDef::Type(_) => {}
        }
    }
    tracing::debug!(
        bodies = pass.pending_bodies.len(),
        globals = pass.global_variables.len(),
        "registration complete"
    );

    Registration {
        pending_bodies: pass.pending_bodies,
        global_variables: pass.global_variables,
        pending_global_inits: pass.pending_global_inits,
        issues: pass.issues,
    }
}

struct RegistrationPass<'ast, 'r> {
    registry: &'r mut SymbolRegistry,
    builtins: Builtins,
    issues: Vec<Issue>,
    user_types: Vec<(TypeId, &'ast ast::TypeDef<'ast>)>,
    pending_bodies: Vec<PendingBody<'ast>>,
    global_variables: Vec<VarId>,
    pending_global_inits: Vec<PendingGlobalInit<'ast>>,
}

impl<'ast> RegistrationPass<'ast, '_> {
    // =========================================================================
    // Pass 1
    // =========================================================================

    fn register_type(&mut self, def: &'ast ast::TypeDef<'ast>) {
        let root = self.registry.root_scope();
        let scope = self.registry.alloc_scope(Some(root));
        let ty = self.registry.alloc_type(Type {
            name: def.name.name.to_string(),
            native: def.is_native,
            definition: Some(def.name.span),
            scope,
            fields: Vec::new(),
            methods: FxHashMap::default(),
            constructors: Vec::new(),
            referenced: None,
            reference: None,
        });

        if let Err(issue) =
            self.registry
                .add_symbol(root, def.name.name, Symbol::Type(ty), def.name.span)
        {
            self.issues.push(issue);
            return;
        }

        // Non-native types receive their default and copy constructors at
        // construction; users may not redefine the copy constructor.
        if !def.is_native {
            self.synthesise_constructor(ty, &[]);
            self.synthesise_constructor(ty, &[ty]);
        }

        self.user_types.push((ty, def));
    }

    fn synthesise_constructor(&mut self, container: TypeId, param_types: &[TypeId]) {
        let scope = self
            .registry
            .alloc_scope(Some(self.registry.ty(container).scope));
        let params = param_types
            .iter()
            .map(|&ty| {
                self.registry.alloc_variable(Variable {
                    name: "value".to_string(),
                    ty,
                    owner: VarOwner::Param,
                    definition: None,
                })
            })
            .collect();
        let name = self.registry.ty(container).name.clone();
        let ctor = self.registry.alloc_function(Function {
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
        self.registry
            .add_constructor(container, ctor, Span::default())
            .expect("synthesised constructors are registered first");
    }

    // =========================================================================
    // Pass 2
    // =========================================================================

    fn register_members(&mut self, ty: TypeId, def: &'ast ast::TypeDef<'ast>) {
        for member in def.members {
            match member {
                Member::Field(field) => self.register_fields(ty, field),
                Member::Method(method) => self.register_method(ty, method),
                Member::Constructor(ctor) => self.register_constructor(ty, ctor),
            }
        }
    }

    fn register_fields(&mut self, ty: TypeId, def: &'ast ast::VariablesDef<'ast>) {
        let scope = self.registry.ty(ty).scope;
        let field_ty = resolve_type(self.registry, scope, &def.ty, &mut self.issues);
        for decl in def.variables {
            let field = self.registry.alloc_variable(Variable {
                name: decl.name.name.to_string(),
                ty: field_ty,
                owner: VarOwner::Field(ty),
                definition: Some(decl.name.span),
            });
            if let Err(issue) = self.registry.add_field(ty, field, decl.name.span) {
                self.issues.push(issue);
            }
        }
    }

    fn register_method(&mut self, ty: TypeId, def: &'ast ast::FunctionDef<'ast>) {
        // `name&` places the method on the reference type.
        let container = if def.ref_marker {
            self.registry.reference_type(ty)
        } else {
            ty
        };

        if def.is_native && def.body.is_some() {
            self.issues.push(Issue::new(
                IssueKind::NativeMethodWithBody {
                    name: def.name.name.to_string(),
                },
                def.name.span,
            ));
        }
        if !def.is_native && def.body.is_none() {
            self.issues.push(Issue::new(
                IssueKind::MethodDefinitionWithoutBody {
                    name: def.name.name.to_string(),
                },
                def.name.span,
            ));
        }

        let func = self.build_callable(
            def.name.name,
            FunctionKind::Method,
            Some(container),
            Some(&def.return_type),
            def.params,
            def.is_native,
            def.name.span,
        );

        if let Err(issue) = self.registry.add_method(container, func, def.name.span) {
            self.issues.push(issue);
            return;
        }
        if let (false, Some(body)) = (def.is_native, def.body) {
            self.pending_bodies.push(PendingBody { func, body });
        }
    }

    fn register_constructor(&mut self, ty: TypeId, def: &'ast ast::ConstructorDef<'ast>) {
        // The copy constructor is synthesised; a user-defined one is
        // rejected outright. Type names are global, so matching the spelled
        // parameter type against the type's name is exact.
        let is_copy_shape = match def.params {
            [param] => param.ty.name.name == def.name.name && !param.ty.is_reference,
            _ => false,
        };
        if is_copy_shape {
            self.issues.push(Issue::new(
                IssueKind::CopyConstructorDefinition {
                    type_name: self.registry.display_type(ty),
                },
                def.name.span,
            ));
            return;
        }

        if def.is_native && def.body.is_some() {
            self.issues.push(Issue::new(
                IssueKind::NativeConstructorWithBody {
                    type_name: self.registry.display_type(ty),
                },
                def.name.span,
            ));
        }
        if !def.is_native && def.body.is_none() {
            self.issues.push(Issue::new(
                IssueKind::ConstructorDefinitionWithoutBody {
                    type_name: self.registry.display_type(ty),
                },
                def.name.span,
            ));
        }

        let func = self.build_callable(
            def.name.name,
            FunctionKind::Constructor,
            Some(ty),
            None,
            def.params,
            def.is_native,
            def.name.span,
        );

        if let Err(issue) = self.registry.add_constructor(ty, func, def.name.span) {
            self.issues.push(issue);
            return;
        }
        if let (false, Some(body)) = (def.is_native, def.body) {
            self.pending_bodies.push(PendingBody { func, body });
        }
    }

    // =========================================================================
    // Pass 3
    // =========================================================================

    fn register_function(&mut self, def: &'ast ast::FunctionDef<'ast>) {
        if def.ref_marker {
            self.issues.push(Issue::new(
                IssueKind::ReferenceMarkerInFunctionDefinition {
                    name: def.name.name.to_string(),
                },
                def.name.span,
            ));
        }
        if def.is_native && def.body.is_some() {
            self.issues.push(Issue::new(
                IssueKind::NativeFunctionWithBody {
                    name: def.name.name.to_string(),
                },
                def.name.span,
            ));
        }
        if !def.is_native && def.body.is_none() {
            self.issues.push(Issue::new(
                IssueKind::FunctionDefinitionWithoutBody {
                    name: def.name.name.to_string(),
                },
                def.name.span,
            ));
        }

        let func = self.build_callable(
            def.name.name,
            FunctionKind::Function,
            None,
            Some(&def.return_type),
            def.params,
            def.is_native,
            def.name.span,
        );

        let root = self.registry.root_scope();
        if let Err(issue) =
            self.registry
                .add_symbol(root, def.name.name, Symbol::Function(func), def.name.span)
        {
            self.issues.push(issue);
            return;
        }
        if let (false, Some(body)) = (def.is_native, def.body) {
            self.pending_bodies.push(PendingBody { func, body });
        }
    }

    fn register_globals(&mut self, def: &'ast ast::VariablesDef<'ast>) {
        let root = self.registry.root_scope();
        let ty = resolve_type(self.registry, root, &def.ty, &mut self.issues);
        for decl in def.variables {
            let var = self.registry.alloc_variable(Variable {
                name: decl.name.name.to_string(),
                ty,
                owner: VarOwner::Global,
                definition: Some(decl.name.span),
            });
            match self
                .registry
                .add_symbol(root, decl.name.name, Symbol::Variable(var), decl.name.span)
            {
                Ok(()) => {
                    self.global_variables.push(var);
                    self.pending_global_inits.push(PendingGlobalInit {
                        var,
                        initializer: decl.initializer,
                        span: decl.span,
                    });
                }
                Err(issue) => self.issues.push(issue),
            }
        }
    }

    // =========================================================================
    // Shared
    // =========================================================================

    /// Allocate a callable with resolved signature, its parameter scope and
    /// (for members) the implicit `this`.
    #[allow(clippy::too_many_arguments)]
    fn build_callable(
        &mut self,
        name: &str,
        kind: FunctionKind,
        container: Option<TypeId>,
        return_type: Option<&ast::TypeExpr<'ast>>,
        params: &'ast [ast::Param<'ast>],
        native: bool,
        span: Span,
    ) -> FuncId {
        let lookup_scope = match container {
            Some(container) => self.registry.ty(container).scope,
            None => self.registry.root_scope(),
        };
        let return_type = match (return_type, container) {
            (Some(expr), _) => resolve_type(self.registry, lookup_scope, expr, &mut self.issues),
            // Constructors produce their container.
            (None, Some(container)) => container,
            (None, None) => self.builtins.void_type,
        };

        let func_scope = self.registry.alloc_scope(Some(lookup_scope));
        let mut param_vars = Vec::with_capacity(params.len());
        for param in params {
            let param_ty =
                resolve_type(self.registry, lookup_scope, &param.ty, &mut self.issues);
            let var = self.registry.alloc_variable(Variable {
                name: param.name.name.to_string(),
                ty: param_ty,
                owner: VarOwner::Param,
                definition: Some(param.name.span),
            });
            if let Err(issue) =
                self.registry
                    .add_symbol(func_scope, param.name.name, Symbol::Variable(var), param.name.span)
            {
                self.issues.push(issue);
            }
            param_vars.push(var);
        }

        let this_var = container.map(|container| {
            let this_ty = if self.registry.is_reference(container) {
                container
            } else {
                self.registry.reference_type(container)
            };
            self.registry.alloc_variable(Variable {
                name: "this".to_string(),
                ty: this_ty,
                owner: VarOwner::Param,
                definition: None,
            })
        });

        self.registry.alloc_function(Function {
            name: name.to_string(),
            kind,
            container,
            return_type,
            params: param_vars,
            this_var,
            scope: func_scope,
            native,
            definition: Some(span),
            body: None,
        })
    }
}
