//! Operator-to-method desugaring table.
//!
//! CO operators are sugar for method calls on the left (or only) operand:
//! `a + b` is `a.plus(b)`, `-a` is `a.unaryMinus()`, `a = b` is
//! `a.assign(b)`. The analyser resolves these like any other method call, so
//! a user type gains operators by defining the methods.

use co_parser::ast::{InfixOp, PrefixOp};

/// The method name an infix operator desugars to.
pub fn infix_method(op: InfixOp) -> &'static str {
    match op {
        InfixOp::Mul => "times",
        InfixOp::Div => "div",
        InfixOp::Add => "plus",
        InfixOp::Sub => "minus",
        InfixOp::Less => "lessThan",
        InfixOp::Greater => "greaterThan",
        InfixOp::LessEqual => "lessThanOrEqual",
        InfixOp::GreaterEqual => "greaterThanOrEqual",
        InfixOp::Equal => "equals",
        InfixOp::NotEqual => "notEquals",
        InfixOp::And => "and",
        InfixOp::Or => "or",
        InfixOp::Assign => "assign",
    }
}

/// The method name a prefix operator desugars to.
pub fn prefix_method(op: PrefixOp) -> &'static str {
    match op {
        PrefixOp::Not => "not",
        PrefixOp::Minus => "unaryMinus",
    }
}
