//! Overload resolution.
//!
//! A candidate is viable when every argument type converts implicitly to the
//! corresponding parameter type. Viable candidates are ranked by total
//! conversion cost (an exact match is free, an implicit dereference costs
//! one); the unique cheapest candidate wins. Cost ties are ambiguous, not
//! first-wins: the caller turns them into a diagnostic with one note per
//! candidate.
//!
//! Callers are expected to have handled `unknownType` arguments already —
//! the sentinel converts to everything, so resolving against it would report
//! a phantom ambiguity on top of the root cause.

use crate::ids::{FuncId, TypeId};
use crate::registry::SymbolRegistry;

/// Why resolution failed.
#[derive(Debug, Clone, PartialEq)]
pub enum ResolutionFailure {
    /// No candidate accepts the argument types.
    NoMatch,
    /// More than one candidate ties on cost; the winners, for notes.
    Ambiguous(Vec<FuncId>),
}

/// Pick the best candidate for the given argument types.
pub fn resolve_overload(
    registry: &SymbolRegistry,
    candidates: &[FuncId],
    arg_types: &[TypeId],
) -> Result<FuncId, ResolutionFailure> {
    let mut viable: Vec<(FuncId, u32)> = Vec::new();

    for &candidate in candidates {
        if let Some(cost) = match_cost(registry, candidate, arg_types) {
            viable.push((candidate, cost));
        }
    }

    let Some(&(_, best_cost)) = viable.iter().min_by_key(|&&(_, cost)| cost) else {
        return Err(ResolutionFailure::NoMatch);
    };

    let best: Vec<FuncId> = viable
        .iter()
        .filter(|&&(_, cost)| cost == best_cost)
        .map(|&(func, _)| func)
        .collect();

    match best.as_slice() {
        [single] => Ok(*single),
        _ => Err(ResolutionFailure::Ambiguous(best)),
    }
}

/// The subset of `candidates` the argument types can call at all. Used by
/// cast analysis, which pools constructors and conversion methods before
/// judging ambiguity.
pub fn viable_candidates(
    registry: &SymbolRegistry,
    candidates: &[FuncId],
    arg_types: &[TypeId],
) -> Vec<FuncId> {
    candidates
        .iter()
        .copied()
        .filter(|&candidate| match_cost(registry, candidate, arg_types).is_some())
        .collect()
}

/// Total conversion cost of calling `candidate` with `arg_types`, or `None`
/// when any argument fails to convert.
fn match_cost(
    registry: &SymbolRegistry,
    candidate: FuncId,
    arg_types: &[TypeId],
) -> Option<u32> {
    let params = registry.param_types(candidate);
    if params.len() != arg_types.len() {
        return None;
    }

    let mut total = 0;
    for (&arg, &param) in arg_types.iter().zip(&params) {
        if arg == param {
            continue;
        }
        if registry.referenced(arg) == Some(param) {
            total += 1;
            continue;
        }
        if arg == registry.unknown_type || param == registry.unknown_type {
            continue;
        }
        return None;
    }
    Some(total)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builtins;
    use crate::registry::{Function, FunctionKind, Variable, VarOwner};
    use co_core::Span;

    struct Fixture {
        registry: SymbolRegistry,
        int_type: TypeId,
        double_type: TypeId,
        int_ref: TypeId,
    }

    impl Fixture {
        fn new() -> Self {
            let mut registry = SymbolRegistry::new();
            let builtins = builtins::install(&mut registry);
            let int_ref = registry.reference_type(builtins.int_type);
            Self {
                int_type: builtins.int_type,
                double_type: builtins.double_type,
                int_ref,
                registry,
            }
        }

        fn function(&mut self, name: &str, param_types: &[TypeId]) -> FuncId {
            let root = self.registry.root_scope();
            let scope = self.registry.alloc_scope(Some(root));
            let params = param_types
                .iter()
                .map(|&ty| {
                    self.registry.alloc_variable(Variable {
                        name: "p".to_string(),
                        ty,
                        owner: VarOwner::Param,
                        definition: None,
                    })
                })
                .collect();
            let void = self
                .registry
                .resolve(root, "void")
                .and_then(|s| match s {
                    crate::registry::Symbol::Type(t) => Some(t),
                    _ => None,
                })
                .unwrap();
            self.registry.alloc_function(Function {
                name: name.to_string(),
                kind: FunctionKind::Function,
                container: None,
                return_type: void,
                params,
                this_var: None,
                scope,
                native: false,
                definition: Some(Span::point(1, 1)),
                body: None,
            })
        }
    }

    #[test]
    fn picks_the_only_viable_candidate() {
        let mut fx = Fixture::new();
        let f_int = fx.function("f", &[fx.int_type]);
        let f_dbl = fx.function("f", &[fx.double_type]);

        let result = resolve_overload(&fx.registry, &[f_int, f_dbl], &[fx.double_type]);
        assert_eq!(result, Ok(f_dbl));
    }

    #[test]
    fn exact_match_beats_dereference() {
        let mut fx = Fixture::new();
        let f_val = fx.function("f", &[fx.int_type]);
        let f_ref = fx.function("f", &[fx.int_ref]);

        // An int& argument fits both, but f(int&) takes it without a
        // conversion.
        let result = resolve_overload(&fx.registry, &[f_val, f_ref], &[fx.int_ref]);
        assert_eq!(result, Ok(f_ref));
    }

    #[test]
    fn rvalues_never_match_reference_parameters() {
        let mut fx = Fixture::new();
        let f_ref = fx.function("f", &[fx.int_ref]);

        let result = resolve_overload(&fx.registry, &[f_ref], &[fx.int_type]);
        assert_eq!(result, Err(ResolutionFailure::NoMatch));
    }

    #[test]
    fn cost_ties_are_ambiguous() {
        let mut fx = Fixture::new();
        let f_a = fx.function("f", &[fx.int_type]);
        let f_b = fx.function("f", &[fx.int_type]);

        match resolve_overload(&fx.registry, &[f_a, f_b], &[fx.int_type]) {
            Err(ResolutionFailure::Ambiguous(winners)) => {
                assert_eq!(winners, vec![f_a, f_b]);
            }
            other => panic!("expected ambiguity, got {other:?}"),
        }
    }

    #[test]
    fn arity_mismatch_is_no_match() {
        let mut fx = Fixture::new();
        let f = fx.function("f", &[fx.int_type, fx.int_type]);
        let result = resolve_overload(&fx.registry, &[f], &[fx.int_type]);
        assert_eq!(result, Err(ResolutionFailure::NoMatch));
    }
}
