//! The C emitter.
//!
//! Emits one self-contained C99 translation unit: prelude (includes, the
//! `_op` helper macros, native I/O), struct `typedef`s in field-dependency
//! order, global variables, prototypes, definitions, and a `main` that runs
//! the global initialisers and calls `co_main`.
//!
//! References are C pointers throughout: `VariableReference` emits `&x`,
//! `ImplicitDereferencing` emits `*(...)`, `assign` emits the `_assign`
//! helper. Methods become functions with a leading `this` pointer; calling a
//! method on an rvalue receiver parks the value in a compound-literal array,
//! which C99 guarantees to be addressable.

use rustc_hash::FxHashMap;

use co_compiler::hir::{CodeBlock, Expr, Stmt, VariableInit};
use co_compiler::{Analysis, FuncId, FunctionKind, TypeId, VarId};

use crate::names::NameGenerator;
use crate::native::{self, NativeCall};
use crate::reach::Reachable;
use crate::BackendError;

const PRELUDE: &str = r#"#include <stdlib.h>
#include <stdio.h>
#include <math.h>
#include <stdint.h>

#define _add(a, b) ((a) + (b))
#define _sub(a, b) ((a) - (b))
#define _mul(a, b) ((a) * (b))
#define _div(a, b) ((a) / (b))
#define _neg(a) (-(a))
#define _lt(a, b) ((a) < (b))
#define _gt(a, b) ((a) > (b))
#define _le(a, b) ((a) <= (b))
#define _ge(a, b) ((a) >= (b))
#define _eq(a, b) ((a) == (b))
#define _ne(a, b) ((a) != (b))
#define _and(a, b) ((a) && (b))
#define _or(a, b) ((a) || (b))
#define _not(a) (!(a))
#define _dbl(a) ((double)(a))
#define _int(a) ((int32_t)(a))
#define _assign(p, v) (*(p) = (v), (p))

static void _assert(int32_t cond) {
    if (!cond) {
        fprintf(stderr, "assertion failed\n");
        exit(1);
    }
}

static int32_t _powInt(int32_t base, int32_t exp) {
    int32_t result = 1;
    while (exp > 0) {
        if (exp & 1) result *= base;
        base *= base;
        exp >>= 1;
    }
    return result;
}

static double _powDbl(double base, double exp) { return pow(base, exp); }

static void _writeInt(int32_t v) { printf("%d", v); }
static void _writeIntLn(int32_t v) { printf("%d\n", v); }
static void _writeDbl(double v) { printf("%g", v); }
static void _writeDblLn(double v) { printf("%g\n", v); }
static void _writeBool(int32_t v) { printf("%s", v ? "true" : "false"); }
static void _writeBoolLn(int32_t v) { printf("%s\n", v ? "true" : "false"); }
"#;

pub struct CEmitter<'a> {
    analysis: &'a Analysis,
    reachable: &'a Reachable,
    type_names: FxHashMap<TypeId, String>,
    func_names: FxHashMap<FuncId, String>,
    field_names: FxHashMap<VarId, String>,
    /// C expressions for variables in the function being emitted (params,
    /// locals, the `this` binding) and for globals.
    var_names: FxHashMap<VarId, String>,
    out: String,
}

impl<'a> CEmitter<'a> {
    pub fn new(analysis: &'a Analysis, reachable: &'a Reachable) -> Self {
        let registry = &analysis.registry;
        let mut names = NameGenerator::new();
        let mut type_names = FxHashMap::default();
        let mut func_names = FxHashMap::default();
        let mut field_names = FxHashMap::default();
        let mut var_names = FxHashMap::default();

        for &ty in &reachable.types {
            type_names.insert(ty, names.global(&registry.ty(ty).name));
            let mut fields = NameGenerator::new();
            for &field in &registry.ty(ty).fields {
                field_names.insert(field, fields.local(&registry.var(field).name));
            }
        }
        for &var in &reachable.globals {
            var_names.insert(var, names.global(&registry.var(var).name));
        }
        for &func in &reachable.functions {
            let function = registry.func(func);
            let qualified = match function.container {
                Some(container) => {
                    let base = registry.referenced(container).unwrap_or(container);
                    format!("{}.{}", registry.ty(base).name, function.name)
                }
                None => function.name.clone(),
            };
            func_names.insert(func, names.global(&qualified));
        }

        Self {
            analysis,
            reachable,
            type_names,
            func_names,
            field_names,
            var_names,
            out: String::new(),
        }
    }

    pub fn emit(mut self) -> Result<String, BackendError> {
        self.out.push_str(PRELUDE);
        self.out.push('\n');

        self.emit_typedefs()?;
        self.emit_globals();
        self.emit_prototypes();
        for index in 0..self.reachable.functions.len() {
            let func = self.reachable.functions[index];
            self.emit_definition(func)?;
        }
        self.emit_main()?;

        Ok(self.out)
    }

    // =========================================================================
    // Types
    // =========================================================================

    /// Value types sorted so every by-value field's type is defined first.
    /// A cycle in the field graph has no finite layout and is fatal.
    fn layout_order(&self) -> Result<Vec<TypeId>, BackendError> {
        #[derive(Clone, Copy, PartialEq)]
        enum Mark {
            White,
            Grey,
            Black,
        }

        let registry = &self.analysis.registry;
        let mut marks: FxHashMap<TypeId, Mark> = self
            .reachable
            .types
            .iter()
            .map(|&ty| (ty, Mark::White))
            .collect();
        let mut order = Vec::with_capacity(self.reachable.types.len());

        fn visit(
            ty: TypeId,
            registry: &co_compiler::SymbolRegistry,
            marks: &mut FxHashMap<TypeId, Mark>,
            order: &mut Vec<TypeId>,
        ) -> Result<(), BackendError> {
            match marks.get(&ty).copied() {
                None | Some(Mark::Black) => return Ok(()),
                Some(Mark::Grey) => {
                    return Err(BackendError::CyclicTypeLayout {
                        type_name: registry.ty(ty).name.clone(),
                    });
                }
                Some(Mark::White) => {}
            }
            marks.insert(ty, Mark::Grey);
            for &field in &registry.ty(ty).fields {
                let field_ty = registry.var(field).ty;
                // Reference fields are pointers; only by-value fields
                // constrain layout.
                if !registry.is_reference(field_ty) {
                    visit(field_ty, registry, marks, order)?;
                }
            }
            marks.insert(ty, Mark::Black);
            order.push(ty);
            Ok(())
        }

        for &ty in &self.reachable.types {
            visit(ty, registry, &mut marks, &mut order)?;
        }
        Ok(order)
    }

    fn emit_typedefs(&mut self) -> Result<(), BackendError> {
        let order = self.layout_order()?;
        for ty in order {
            let name = self.type_names[&ty].clone();
            self.out.push_str(&format!("typedef struct {name} {{\n"));
            let fields = self.analysis.registry.ty(ty).fields.clone();
            if fields.is_empty() {
                // C requires at least one member.
                self.out.push_str("    int32_t _empty;\n");
            }
            for field in fields {
                let field_ty = self.type_c(self.analysis.registry.var(field).ty);
                let field_name = self.field_names[&field].clone();
                self.out
                    .push_str(&format!("    {field_ty} {field_name};\n"));
            }
            self.out.push_str(&format!("}} {name};\n\n"));
        }
        Ok(())
    }

    fn type_c(&self, ty: TypeId) -> String {
        let registry = &self.analysis.registry;
        if let Some(base) = registry.referenced(ty) {
            return format!("{}*", self.type_c(base));
        }
        let builtins = self.analysis.builtins;
        if ty == builtins.void_type {
            "void".to_string()
        } else if ty == builtins.int_type || ty == builtins.bool_type {
            "int32_t".to_string()
        } else if ty == builtins.double_type {
            "double".to_string()
        } else {
            self.type_names
                .get(&ty)
                .cloned()
                .unwrap_or_else(|| "void".to_string())
        }
    }

    fn zero_value(&self, ty: TypeId) -> String {
        let builtins = self.analysis.builtins;
        if ty == builtins.double_type {
            "0.0".to_string()
        } else if ty == builtins.int_type || ty == builtins.bool_type {
            "0".to_string()
        } else {
            format!("({}){{0}}", self.type_c(ty))
        }
    }

    // =========================================================================
    // Globals and signatures
    // =========================================================================

    fn emit_globals(&mut self) {
        for &var in &self.reachable.globals {
            let ty = self.type_c(self.analysis.registry.var(var).ty);
            let name = self.var_names[&var].clone();
            self.out.push_str(&format!("static {ty} {name};\n"));
        }
        if !self.reachable.globals.is_empty() {
            self.out.push('\n');
        }
    }

    /// The return and parameter C types of a callable, with the implicit
    /// `this` pointer first for methods.
    fn signature_types(&self, func: FuncId) -> (String, Vec<String>) {
        let registry = &self.analysis.registry;
        let function = registry.func(func);
        let ret = self.type_c(function.return_type);

        let mut params = Vec::new();
        if function.kind == FunctionKind::Method {
            let container = function.container.expect("method has container");
            let base = registry.referenced(container).unwrap_or(container);
            params.push(format!("{}*", self.type_c(base)));
        }
        for &param in &function.params {
            params.push(self.type_c(registry.var(param).ty));
        }
        (ret, params)
    }

    fn emit_prototypes(&mut self) {
        for &func in &self.reachable.functions {
            let (ret, params) = self.signature_types(func);
            let name = self.func_names[&func].clone();
            let params = if params.is_empty() {
                "void".to_string()
            } else {
                params.join(", ")
            };
            self.out.push_str(&format!("static {ret} {name}({params});\n"));
        }
        if !self.reachable.functions.is_empty() {
            self.out.push('\n');
        }
    }

    // =========================================================================
    // Definitions
    // =========================================================================

    fn emit_definition(&mut self, func: FuncId) -> Result<(), BackendError> {
        let registry = &self.analysis.registry;
        let function = registry.func(func);
        let kind = function.kind;
        let name = self.func_names[&func].clone();
        let (ret, _) = self.signature_types(func);
        let params = function.params.clone();
        let this_var = function.this_var;
        let container = function.container;
        let body = function.body.clone();

        let mut locals = NameGenerator::new();
        let mut rendered_params = Vec::new();

        if kind == FunctionKind::Method {
            let container = container.expect("method has container");
            let base = registry.referenced(container).unwrap_or(container);
            rendered_params.push(format!("{}* co_this", self.type_c(base)));
            if let Some(this_var) = this_var {
                self.var_names.insert(this_var, "co_this".to_string());
            }
        }
        for &param in &params {
            let param_name = locals.local(&registry.var(param).name);
            rendered_params.push(format!(
                "{} {}",
                self.type_c(registry.var(param).ty),
                param_name
            ));
            self.var_names.insert(param, param_name);
        }

        let params_text = if rendered_params.is_empty() {
            "void".to_string()
        } else {
            rendered_params.join(", ")
        };
        self.out
            .push_str(&format!("static {ret} {name}({params_text}) {{\n"));

        if kind == FunctionKind::Constructor {
            let container = container.expect("constructor has container");
            let zero = self.zero_value(container);
            self.out.push_str(&format!(
                "    {} co_self = {zero};\n",
                self.type_c(container)
            ));
            if let Some(this_var) = this_var {
                self.var_names.insert(this_var, "(&co_self)".to_string());
            }
        }

        if let Some(body) = body {
            self.emit_block_statements(&body, 1, &mut locals)?;
        }

        if kind == FunctionKind::Constructor {
            self.out.push_str("    return co_self;\n");
        }
        self.out.push_str("}\n\n");
        Ok(())
    }

    fn emit_block_statements(
        &mut self,
        block: &CodeBlock,
        indent: usize,
        locals: &mut NameGenerator,
    ) -> Result<(), BackendError> {
        for stmt in &block.statements {
            self.emit_stmt(stmt, indent, locals)?;
        }
        Ok(())
    }

    fn emit_stmt(
        &mut self,
        stmt: &Stmt,
        indent: usize,
        locals: &mut NameGenerator,
    ) -> Result<(), BackendError> {
        let pad = "    ".repeat(indent);
        match stmt {
            Stmt::Expr(expr) => {
                let expr = self.emit_expr(expr)?;
                self.out.push_str(&format!("{pad}{expr};\n"));
            }
            Stmt::Block(block) => {
                self.out.push_str(&format!("{pad}{{\n"));
                self.emit_block_statements(block, indent + 1, locals)?;
                self.out.push_str(&format!("{pad}}}\n"));
            }
            Stmt::VariableInit(init) => {
                let var = init.variable;
                let ty = self.type_c(self.analysis.registry.var(var).ty);
                let name = locals.local(&self.analysis.registry.var(var).name);
                self.var_names.insert(var, name.clone());
                let value = self.init_value(init)?;
                self.out.push_str(&format!("{pad}{ty} {name} = {value};\n"));
            }
            Stmt::IfElse {
                condition,
                then_block,
                else_block,
                ..
            } => {
                let condition = self.emit_expr(condition)?;
                self.out.push_str(&format!("{pad}if ({condition}) {{\n"));
                self.emit_block_statements(then_block, indent + 1, locals)?;
                match else_block {
                    Some(block) => {
                        self.out.push_str(&format!("{pad}}} else {{\n"));
                        self.emit_block_statements(block, indent + 1, locals)?;
                        self.out.push_str(&format!("{pad}}}\n"));
                    }
                    None => self.out.push_str(&format!("{pad}}}\n")),
                }
            }
            Stmt::While {
                condition, body, ..
            } => {
                let condition = self.emit_expr(condition)?;
                self.out.push_str(&format!("{pad}while ({condition}) {{\n"));
                self.emit_block_statements(body, indent + 1, locals)?;
                self.out.push_str(&format!("{pad}}}\n"));
            }
            Stmt::Return { value, .. } => match value {
                Some(value) => {
                    let value = self.emit_expr(value)?;
                    self.out.push_str(&format!("{pad}return {value};\n"));
                }
                None => self.out.push_str(&format!("{pad}return;\n")),
            },
        }
        Ok(())
    }

    /// The C initialiser expression of a `VariableConstructorCall`.
    fn init_value(&mut self, init: &VariableInit) -> Result<String, BackendError> {
        let registry = &self.analysis.registry;
        let var_ty = registry.var(init.variable).ty;

        // A reference variable binds: its initialiser is already a pointer.
        let Some(ctor) = init.constructor else {
            return self.emit_expr(&init.args[0]);
        };
        debug_assert!(!registry.is_reference(var_ty));
        if registry.func(ctor).native {
            return match native::lookup(registry, ctor) {
                Some(NativeCall::DefaultConstructor) => Ok(self.zero_value(var_ty)),
                Some(NativeCall::CopyConstructor) => self.emit_expr(&init.args[0]),
                _ => Err(BackendError::MissingNative {
                    signature: registry.signature(ctor),
                }),
            };
        }

        let args = self.emit_args(&init.args)?;
        let name = self
            .func_names
            .get(&ctor)
            .cloned()
            .ok_or_else(|| BackendError::MissingNative {
                signature: registry.signature(ctor),
            })?;
        Ok(format!("{name}({args})"))
    }

    // =========================================================================
    // Expressions
    // =========================================================================

    fn emit_args(&mut self, args: &[Expr]) -> Result<String, BackendError> {
        let mut rendered = Vec::with_capacity(args.len());
        for arg in args {
            rendered.push(self.emit_expr(arg)?);
        }
        Ok(rendered.join(", "))
    }

    fn emit_expr(&mut self, expr: &Expr) -> Result<String, BackendError> {
        let registry = &self.analysis.registry;
        match expr {
            Expr::IntLiteral { value, .. } => Ok(value.to_string()),
            Expr::DoubleLiteral { value, .. } => Ok(format!("{value:?}")),
            Expr::BoolLiteral { value, .. } => Ok(if *value { "1" } else { "0" }.to_string()),
            Expr::VariableReference { variable, .. } => {
                let name = self.var_expr(*variable)?;
                Ok(format!("(&{name})"))
            }
            Expr::ReferenceVariableReference { variable, .. } => self.var_expr(*variable),
            Expr::ImplicitDereferencing { inner, .. } => {
                let inner = self.emit_expr(inner)?;
                Ok(format!("(*{inner})"))
            }
            Expr::FieldAccess {
                instance, field, ..
            } => {
                let field_name =
                    self.field_names
                        .get(field)
                        .cloned()
                        .ok_or(BackendError::InvalidExpression)?;
                let instance_is_ref = instance
                    .ty()
                    .map(|t| registry.is_reference(t))
                    .unwrap_or(false);
                let field_is_ref = registry.is_reference(registry.var(*field).ty);
                let instance = self.emit_expr(instance)?;
                if !instance_is_ref {
                    // A by-value receiver yields the field by value.
                    Ok(format!("({instance}).{field_name}"))
                } else if field_is_ref {
                    // The field already holds a pointer; no extra level.
                    Ok(format!("({instance})->{field_name}"))
                } else {
                    Ok(format!("(&({instance})->{field_name})"))
                }
            }
            Expr::FunctionCall { function, args, .. } => {
                let args_text = self.emit_args(args)?;
                if registry.func(*function).native {
                    return match native::lookup(registry, *function) {
                        Some(NativeCall::Invoke(symbol)) => Ok(format!("{symbol}({args_text})")),
                        Some(NativeCall::DefaultConstructor) => {
                            Ok(self.zero_value(registry.func(*function).return_type))
                        }
                        Some(NativeCall::CopyConstructor) => self.emit_expr(&args[0]),
                        _ => Err(BackendError::MissingNative {
                            signature: registry.signature(*function),
                        }),
                    };
                }
                let name = self
                    .func_names
                    .get(function)
                    .cloned()
                    .ok_or_else(|| BackendError::MissingNative {
                        signature: registry.signature(*function),
                    })?;
                Ok(format!("{name}({args_text})"))
            }
            Expr::MethodCall {
                method,
                instance,
                args,
                ..
            } => self.emit_method_call(*method, instance, args),
            Expr::FunctionReference { .. }
            | Expr::OverloadedFunctionReference { .. }
            | Expr::Invalid { .. } => Err(BackendError::InvalidExpression),
        }
    }

    fn emit_method_call(
        &mut self,
        method: FuncId,
        instance: &Expr,
        args: &[Expr],
    ) -> Result<String, BackendError> {
        let registry = &self.analysis.registry;
        let instance_is_ref = instance
            .ty()
            .map(|t| registry.is_reference(t))
            .unwrap_or(false);

        if registry.func(method).native {
            return match native::lookup(registry, method) {
                Some(NativeCall::Assign) => {
                    let pointer = self.emit_expr(instance)?;
                    let value = self.emit_expr(&args[0])?;
                    Ok(format!("_assign({pointer}, {value})"))
                }
                Some(NativeCall::Invoke(symbol)) => {
                    let receiver = self.emit_expr(instance)?;
                    let receiver = if instance_is_ref {
                        format!("(*{receiver})")
                    } else {
                        receiver
                    };
                    let mut all = vec![receiver];
                    for arg in args {
                        all.push(self.emit_expr(arg)?);
                    }
                    Ok(format!("{symbol}({})", all.join(", ")))
                }
                _ => Err(BackendError::MissingNative {
                    signature: registry.signature(method),
                }),
            };
        }

        let name = self
            .func_names
            .get(&method)
            .cloned()
            .ok_or_else(|| BackendError::MissingNative {
                signature: registry.signature(method),
            })?;
        let receiver = self.emit_expr(instance)?;
        let receiver = if instance_is_ref {
            receiver
        } else {
            // Park the rvalue in an addressable compound literal.
            let base = instance.ty().ok_or(BackendError::InvalidExpression)?;
            format!("(({}[]){{ {receiver} }})", self.type_c(base))
        };
        let mut all = vec![receiver];
        for arg in args {
            all.push(self.emit_expr(arg)?);
        }
        Ok(format!("{name}({})", all.join(", ")))
    }

    fn var_expr(&self, var: VarId) -> Result<String, BackendError> {
        if let Some(name) = self.var_names.get(&var) {
            return Ok(name.clone());
        }
        debug_assert!(
            false,
            "variable '{}' emitted before its definition",
            self.analysis.registry.var(var).name
        );
        Err(BackendError::InvalidExpression)
    }

    // =========================================================================
    // Entry point
    // =========================================================================

    fn emit_main(&mut self) -> Result<(), BackendError> {
        self.out.push_str("int main(void) {\n");
        let inits = self.analysis.global_inits.clone();
        for init in &inits {
            let name = self
                .var_names
                .get(&init.variable)
                .cloned()
                .ok_or(BackendError::InvalidExpression)?;
            let value = self.init_value(init)?;
            self.out.push_str(&format!("    {name} = {value};\n"));
        }
        if let Some(main) = self.analysis.main {
            let name = self
                .func_names
                .get(&main)
                .cloned()
                .ok_or(BackendError::InvalidExpression)?;
            self.out.push_str(&format!("    {name}();\n"));
        }
        self.out.push_str("    return 0;\n}\n");
        Ok(())
    }
}
