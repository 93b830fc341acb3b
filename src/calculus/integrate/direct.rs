use crate::expr::Expr;
use crate::simplify::{
    flatten_sum, replace, simplify, simplify_add, simplify_div, simplify_mul, substitute,
};

use super::common::{fresh_variable, linear_parts, split_constant_factors};
use super::steps::{IntegralStep, Rule};
use super::{exponential, integrate_traced, polynomial, rational, trig};

/// Table lookup plus linearity: constants, sums, constant factors and `f(a*x + b)`.
pub(super) fn integrate_direct(expr: &Expr, var: &str, depth: usize) -> Option<IntegralStep> {
    if !expr.contains_var(var) {
        let result = simplify_mul(expr.clone(), Expr::Variable(var.to_string()));
        return Some(IntegralStep::new(expr.clone(), var, result, Rule::Constant));
    }

    let terms = flatten_sum(expr);
    if terms.len() > 1 {
        let substeps = terms
            .iter()
            .map(|term| integrate_traced(term, var, depth))
            .collect::<Option<Vec<_>>>()?;
        let result = substeps
            .iter()
            .fold(Expr::integer(0), |acc, s| simplify_add(acc, s.result.clone()));
        return Some(IntegralStep::new(
            expr.clone(),
            var,
            result,
            Rule::Sum { substeps },
        ));
    }

    let (constant, rest) = split_constant_factors(expr, var);
    if !constant.is_one() {
        let substep = integrate_traced(&rest, var, depth)?;
        let result = simplify_mul(constant.clone(), substep.result.clone());
        return Some(IntegralStep::new(
            expr.clone(),
            var,
            result,
            Rule::ConstantTimes {
                constant,
                substep: Box::new(substep),
            },
        ));
    }

    integrate_known(expr, var)
        .or_else(|| integrate_linear_argument(expr, var, depth))
        .or_else(|| integrate_power_reduction(expr, var, depth))
}

fn integrate_known(expr: &Expr, var: &str) -> Option<IntegralStep> {
    polynomial::integrate(expr, var)
        .or_else(|| rational::integrate(expr, var))
        .or_else(|| trig::integrate(expr, var))
        .or_else(|| exponential::integrate(expr, var))
}

/// `sin(u)**2 = (1 - cos(2*u))/2`, `cos(u)**2 = (1 + cos(2*u))/2`.
fn integrate_power_reduction(expr: &Expr, var: &str, depth: usize) -> Option<IntegralStep> {
    let rewritten = trig::power_reduction(expr, var)?;
    let substep = integrate_direct(&rewritten, var, depth)?;
    Some(IntegralStep::new(
        expr.clone(),
        var,
        substep.result.clone(),
        Rule::Rewrite {
            rewritten,
            substep: Box::new(substep),
        },
    ))
}

/// The slot of `expr` that may hold a linear argument: function argument, power base or
/// exponent of a constant base.
fn linear_slot(expr: &Expr) -> Option<&Expr> {
    match expr {
        Expr::Pow(base, exp) if matches!(**base, Expr::Constant(_)) => Some(exp),
        Expr::Pow(base, exp) if matches!(**exp, Expr::Constant(_)) => Some(base),
        Expr::Exp(_) | Expr::Sin(_) | Expr::Cos(_) | Expr::Tan(_) => expr.function_arg(),
        _ => None,
    }
}

/// `∫ f(a*x + b) dx = (1/a) ∫ f(u) du` with `u = a*x + b`.
fn integrate_linear_argument(expr: &Expr, var: &str, depth: usize) -> Option<IntegralStep> {
    let inner = linear_slot(expr)?;
    if inner.as_variable() == Some(var) {
        return None;
    }
    let (a, _) = linear_parts(inner, var)?;
    let u_var = fresh_variable(expr, var);
    let u = Expr::Variable(u_var.clone());
    let rewritten = simplify(replace(expr, inner, &u));
    if rewritten.contains_var(var) {
        return None;
    }
    let scaled = simplify_div(rewritten, Expr::Constant(a.clone()));
    let substep = integrate_direct(&scaled, &u_var, depth)?;
    let result = simplify(substitute(&substep.result, &u_var, inner));
    Some(IntegralStep::new(
        expr.clone(),
        var,
        result,
        Rule::Substitution {
            u_var,
            u: inner.clone(),
            du: Expr::Constant(a),
            substep: Box::new(substep),
        },
    ))
}
