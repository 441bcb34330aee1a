//! Resolution of raw type expressions to [`TypeId`]s.

use co_core::{Issue, IssueKind};
use co_parser::ast::TypeExpr;

use crate::ids::{ScopeId, TypeId};
use crate::registry::{Symbol, SymbolRegistry};

/// Resolve a raw type expression in a scope.
///
/// Failures produce `unknownType` and an issue: an unresolved name is
/// `UnknownName`, a name bound to something other than a type is
/// `InvalidReferenceAsType`. The `&` marker yields the base type's unique
/// reference type; a reference of a reference is `OverreferencedType`.
pub fn resolve_type(
    registry: &mut SymbolRegistry,
    scope: ScopeId,
    type_expr: &TypeExpr<'_>,
    issues: &mut Vec<Issue>,
) -> TypeId {
    let name = type_expr.name.name;
    let base = match registry.resolve(scope, name) {
        None => {
            issues.push(Issue::new(
                IssueKind::UnknownName {
                    name: name.to_string(),
                },
                type_expr.name.span,
            ));
            return registry.unknown_type;
        }
        Some(Symbol::Type(ty)) => ty,
        Some(symbol) => {
            issues.push(Issue::new(
                IssueKind::InvalidReferenceAsType {
                    name: name.to_string(),
                    description: registry.describe(&symbol),
                },
                type_expr.name.span,
            ));
            return registry.unknown_type;
        }
    };

    if !type_expr.is_reference {
        return base;
    }
    if registry.is_reference(base) {
        issues.push(Issue::new(
            IssueKind::OverreferencedType {
                type_name: registry.display_type(base),
            },
            type_expr.span,
        ));
        return registry.unknown_type;
    }
    registry.reference_type(base)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builtins;
    use co_core::Span;
    use co_parser::ast::Ident;

    fn type_expr(name: &str, is_reference: bool) -> TypeExpr<'_> {
        TypeExpr {
            name: Ident::new(name, Span::point(1, 1)),
            is_reference,
            span: Span::point(1, 1),
        }
    }

    #[test]
    fn resolves_primitives() {
        let mut registry = SymbolRegistry::new();
        let builtins = builtins::install(&mut registry);
        let root = registry.root_scope();
        let mut issues = Vec::new();

        let ty = resolve_type(&mut registry, root, &type_expr("int", false), &mut issues);
        assert_eq!(ty, builtins.int_type);
        assert!(issues.is_empty());
    }

    #[test]
    fn builds_reference_types() {
        let mut registry = SymbolRegistry::new();
        let builtins = builtins::install(&mut registry);
        let root = registry.root_scope();
        let mut issues = Vec::new();

        let ty = resolve_type(&mut registry, root, &type_expr("int", true), &mut issues);
        assert!(issues.is_empty());
        assert_eq!(registry.referenced(ty), Some(builtins.int_type));
        // Identity-equal across uses.
        let again = resolve_type(&mut registry, root, &type_expr("int", true), &mut issues);
        assert_eq!(ty, again);
    }

    #[test]
    fn unknown_name_reports_and_propagates() {
        let mut registry = SymbolRegistry::new();
        builtins::install(&mut registry);
        let root = registry.root_scope();
        let mut issues = Vec::new();

        let ty = resolve_type(&mut registry, root, &type_expr("Missing", false), &mut issues);
        assert_eq!(ty, registry.unknown_type);
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].code(), "E0017");
    }

    #[test]
    fn non_type_symbol_is_rejected() {
        let mut registry = SymbolRegistry::new();
        builtins::install(&mut registry);
        let root = registry.root_scope();
        let mut issues = Vec::new();

        let ty = resolve_type(&mut registry, root, &type_expr("println", false), &mut issues);
        assert_eq!(ty, registry.unknown_type);
        assert_eq!(issues[0].code(), "E0041");
    }
}
