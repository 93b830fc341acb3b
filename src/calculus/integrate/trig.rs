use crate::expr::Expr;
use crate::simplify::{rewrite_trig_squares, simplify, simplify_neg};

use super::common::linear_parts;
use super::steps::{IntegralStep, Rule};

/// `sin`, `cos` and `tan` of the bare variable.
pub fn integrate(expr: &Expr, var: &str) -> Option<IntegralStep> {
    let arg = expr.function_arg()?;
    if arg.as_variable() != Some(var) {
        return None;
    }
    let x = arg.clone().boxed();
    let (result, rule) = match expr {
        Expr::Sin(_) => (simplify_neg(Expr::Cos(x)), Rule::Sin),
        Expr::Cos(_) => (Expr::Sin(x), Rule::Cos),
        Expr::Tan(_) => (
            simplify_neg(Expr::Log(Expr::Cos(x).boxed())),
            Rule::Tan,
        ),
        _ => return None,
    };
    Some(IntegralStep::new(expr.clone(), var, result, rule))
}

/// Power reduction for `sin(u)**2` and `cos(u)**2` with `u` linear in `var`:
/// the integrand rewritten over `cos(2*u)`.
pub fn power_reduction(expr: &Expr, var: &str) -> Option<Expr> {
    let Expr::Pow(base, _) = expr else {
        return None;
    };
    let arg = base.function_arg()?;
    if !matches!(**base, Expr::Sin(_) | Expr::Cos(_)) {
        return None;
    }
    linear_parts(arg, var)?;
    let rewritten = rewrite_trig_squares(expr);
    (rewritten != *expr).then(|| simplify(rewritten))
}

pub fn is_trig(expr: &Expr) -> bool {
    matches!(expr, Expr::Sin(_) | Expr::Cos(_) | Expr::Tan(_))
}
