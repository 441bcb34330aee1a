//! Program entry validation: `main` must exist, be a single function, take
//! nothing and return nothing.

use co_core::{Issue, IssueKind, Span};

use crate::builtins::Builtins;
use crate::ids::FuncId;
use crate::registry::{Symbol, SymbolRegistry};

/// Validate the entry point after all bodies are analysed.
pub fn validate_main(
    registry: &SymbolRegistry,
    builtins: Builtins,
    program_span: Span,
    issues: &mut Vec<Issue>,
) -> Option<FuncId> {
    let root = registry.root_scope();
    match registry.resolve_here(root, "main") {
        None => {
            issues.push(Issue::new(IssueKind::MissingMainFunction, program_span));
            None
        }
        Some(Symbol::Function(func)) => {
            let function = registry.func(func);
            if function.params.is_empty() && function.return_type == builtins.void_type {
                Some(func)
            } else {
                issues.push(Issue::new(
                    IssueKind::InvalidMainFunctionSignature,
                    function.definition.unwrap_or(program_span),
                ));
                None
            }
        }
        Some(Symbol::Overloaded(set)) => {
            // An overload set cannot be the entry point, whichever member
            // has the right shape.
            let span = set
                .first()
                .and_then(|&func| registry.func(func).definition)
                .unwrap_or(program_span);
            issues.push(Issue::new(IssueKind::InvalidMainFunctionSignature, span));
            None
        }
        Some(symbol @ (Symbol::Variable(_) | Symbol::Type(_))) => {
            let span = match symbol {
                Symbol::Variable(var) => registry.var(var).definition,
                Symbol::Type(ty) => registry.ty(ty).definition,
                _ => None,
            };
            issues.push(Issue::new(
                IssueKind::MainIsNotFunction,
                span.unwrap_or(program_span),
            ));
            None
        }
    }
}
