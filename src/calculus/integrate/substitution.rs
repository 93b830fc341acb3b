use tracing::trace;

use crate::calculus::differentiate;
use crate::expr::Expr;
use crate::simplify::{replace, simplify_div, simplify_fully, substitute};

use super::common::fresh_variable;
use super::steps::{IntegralStep, Rule};
use super::{integrate_traced, TRANSFORM_SIZE_LIMIT};

const SUBSTITUTION_CANDIDATE_LIMIT: usize = 16;

/// u-substitution: pick `u = g(x)` from the integrand, and succeed when
/// `f / g'` rewritten in `u` no longer mentions `x`.
pub(super) fn integrate_by_substitution(
    expr: &Expr,
    var: &str,
    depth: usize,
) -> Option<IntegralStep> {
    let u_var = fresh_variable(expr, var);
    let u = Expr::Variable(u_var.clone());

    for candidate in candidates(expr, var) {
        let derivative = simplify_fully(differentiate(var, &candidate));
        if derivative.is_zero() {
            continue;
        }
        let ratio = simplify_fully(simplify_div(expr.clone(), derivative.clone()));
        if ratio.size() > TRANSFORM_SIZE_LIMIT {
            trace!(candidate = %candidate, size = ratio.size(), "substitution ratio too large");
            continue;
        }
        let rewritten = simplify_fully(replace(&ratio, &candidate, &u));
        if rewritten.contains_var(var) {
            continue;
        }
        trace!(candidate = %candidate, rewritten = %rewritten, "substitution candidate accepted");
        let Some(substep) = integrate_traced(&rewritten, &u_var, depth + 1) else {
            continue;
        };
        let result = simplify_fully(substitute(&substep.result, &u_var, &candidate));
        return Some(IntegralStep::new(
            expr.clone(),
            var,
            result,
            Rule::Substitution {
                u_var,
                u: candidate,
                du: derivative,
                substep: Box::new(substep),
            },
        ));
    }

    None
}

/// Function arguments, power bases and exponents, and function nodes themselves,
/// larger candidates first.
fn candidates(expr: &Expr, var: &str) -> Vec<Expr> {
    let mut out = Vec::new();
    collect_candidates(expr, var, &mut out);
    out.retain(|c| c != expr && c.as_variable() != Some(var));
    out.sort_by_key(|c| std::cmp::Reverse(c.size()));
    out.truncate(SUBSTITUTION_CANDIDATE_LIMIT);
    out
}

fn collect_candidates(expr: &Expr, var: &str, out: &mut Vec<Expr>) {
    if !expr.contains_var(var) {
        return;
    }
    match expr {
        Expr::Variable(_) | Expr::Constant(_) => {}
        Expr::Add(a, b) | Expr::Sub(a, b) | Expr::Mul(a, b) | Expr::Div(a, b) => {
            collect_candidates(a, var, out);
            collect_candidates(b, var, out);
        }
        Expr::Pow(base, exp) => {
            push_candidate(expr, var, out);
            push_candidate(base, var, out);
            push_candidate(exp, var, out);
            collect_candidates(base, var, out);
            collect_candidates(exp, var, out);
        }
        Expr::Neg(a) => collect_candidates(a, var, out),
        f => {
            push_candidate(f, var, out);
            if let Some(arg) = f.function_arg() {
                push_candidate(arg, var, out);
                collect_candidates(arg, var, out);
            }
        }
    }
}

fn push_candidate(expr: &Expr, var: &str, out: &mut Vec<Expr>) {
    if expr.contains_var(var) && !out.contains(expr) {
        out.push(expr.clone());
    }
}
