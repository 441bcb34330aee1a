//! Reachability walk over the typed tree.
//!
//! Starting from `main` and the global initialisers, collects every
//! callable, global variable and value type the emitted C must contain.
//! Orders are first-seen and therefore deterministic.

use rustc_hash::FxHashSet;

use co_compiler::hir::{CodeBlock, Expr, Stmt, VariableInit};
use co_compiler::{Analysis, FuncId, TypeId, VarId, VarOwner};

/// Everything the backend emits.
#[derive(Debug, Default)]
pub struct Reachable {
    /// Non-native value types, in first-seen order (layout sorting happens
    /// later).
    pub types: Vec<TypeId>,
    /// Callables with bodies, in first-seen order.
    pub functions: Vec<FuncId>,
    /// Global variables, in source order.
    pub globals: Vec<VarId>,
}

struct Walker<'a> {
    analysis: &'a Analysis,
    seen_funcs: FxHashSet<FuncId>,
    seen_types: FxHashSet<TypeId>,
    seen_globals: FxHashSet<VarId>,
    out: Reachable,
    worklist: Vec<FuncId>,
}

/// Collect the reachable program slice.
///
/// Global variables are roots: their initialisers run before `main`, so the
/// functions and types they mention are live even if nothing else names
/// them.
pub fn collect(analysis: &Analysis) -> Reachable {
    let mut walker = Walker {
        analysis,
        seen_funcs: FxHashSet::default(),
        seen_types: FxHashSet::default(),
        seen_globals: FxHashSet::default(),
        out: Reachable::default(),
        worklist: Vec::new(),
    };

    for &global in &analysis.globals {
        walker.visit_global(global);
    }
    for init in &analysis.global_inits {
        walker.visit_variable_init(init);
    }
    if let Some(main) = analysis.main {
        walker.visit_func(main);
    }

    while let Some(func) = walker.worklist.pop() {
        walker.visit_body(func);
    }

    tracing::debug!(
        types = walker.out.types.len(),
        functions = walker.out.functions.len(),
        globals = walker.out.globals.len(),
        "reachability walk complete"
    );
    walker.out
}

impl Walker<'_> {
    fn visit_func(&mut self, func: FuncId) {
        if !self.seen_funcs.insert(func) {
            return;
        }
        let registry = &self.analysis.registry;
        let function = registry.func(func);

        self.visit_type(function.return_type);
        for &param in &function.params {
            self.visit_type(registry.var(param).ty);
        }
        if let Some(container) = function.container {
            self.visit_type(container);
        }

        if !function.native {
            self.out.functions.push(func);
            self.worklist.push(func);
        }
    }

    fn visit_body(&mut self, func: FuncId) {
        // The body is cloned out to keep the borrow on the registry short;
        // bodies are small relative to a compilation.
        if let Some(body) = self.analysis.registry.func(func).body.clone() {
            self.visit_block(&body);
        }
    }

    fn visit_block(&mut self, block: &CodeBlock) {
        for stmt in &block.statements {
            self.visit_stmt(stmt);
        }
    }

    fn visit_stmt(&mut self, stmt: &Stmt) {
        match stmt {
            Stmt::Expr(expr) => self.visit_expr(expr),
            Stmt::Block(block) => self.visit_block(block),
            Stmt::VariableInit(init) => self.visit_variable_init(init),
            Stmt::IfElse {
                condition,
                then_block,
                else_block,
                ..
            } => {
                self.visit_expr(condition);
                self.visit_block(then_block);
                if let Some(block) = else_block {
                    self.visit_block(block);
                }
            }
            Stmt::While {
                condition, body, ..
            } => {
                self.visit_expr(condition);
                self.visit_block(body);
            }
            Stmt::Return { value, .. } => {
                if let Some(value) = value {
                    self.visit_expr(value);
                }
            }
        }
    }

    fn visit_variable_init(&mut self, init: &VariableInit) {
        self.visit_type(self.analysis.registry.var(init.variable).ty);
        if let Some(ctor) = init.constructor {
            self.visit_func(ctor);
        }
        for arg in &init.args {
            self.visit_expr(arg);
        }
    }

    fn visit_expr(&mut self, expr: &Expr) {
        if let Some(ty) = expr.ty() {
            self.visit_type(ty);
        }
        match expr {
            Expr::VariableReference { variable, .. }
            | Expr::ReferenceVariableReference { variable, .. } => {
                self.visit_var(*variable);
            }
            Expr::FunctionCall { function, args, .. } => {
                self.visit_func(*function);
                for arg in args {
                    self.visit_expr(arg);
                }
            }
            Expr::MethodCall {
                method,
                instance,
                args,
                ..
            } => {
                self.visit_func(*method);
                self.visit_expr(instance);
                for arg in args {
                    self.visit_expr(arg);
                }
            }
            Expr::FieldAccess { instance, .. } => self.visit_expr(instance),
            Expr::ImplicitDereferencing { inner, .. } => self.visit_expr(inner),
            Expr::IntLiteral { .. }
            | Expr::DoubleLiteral { .. }
            | Expr::BoolLiteral { .. }
            | Expr::FunctionReference { .. }
            | Expr::OverloadedFunctionReference { .. }
            | Expr::Invalid { .. } => {}
        }
    }

    fn visit_var(&mut self, var: VarId) {
        let variable = self.analysis.registry.var(var);
        self.visit_type(variable.ty);
        if variable.owner == VarOwner::Global {
            self.visit_global(var);
        }
    }

    fn visit_global(&mut self, var: VarId) {
        if self.seen_globals.insert(var) {
            self.out.globals.push(var);
            self.visit_type(self.analysis.registry.var(var).ty);
        }
    }

    fn visit_type(&mut self, ty: TypeId) {
        let registry = &self.analysis.registry;
        let base = registry.referenced(ty).unwrap_or(ty);
        if !self.seen_types.insert(base) {
            return;
        }
        if registry.ty(base).native {
            return;
        }
        self.out.types.push(base);
        // Field types keep the layout walk going.
        for &field in &registry.ty(base).fields {
            self.visit_type(registry.var(field).ty);
        }
    }
}
