use crate::expr::{Expr, Rational};
use crate::simplify::{flatten_sum, product_factors, simplify_fully};

use super::common::{linear_parts, split_constant_factors};
use super::integrate_traced;

/// Closed form for the parts cycle `exp(a*x+b)*sin(c*x+d)` / `exp(a*x+b)*cos(c*x+d)`:
///
/// `∫ e*sin = e*(a*sin - c*cos)/(a**2 + c**2)`, `∫ e*cos = e*(a*cos + c*sin)/(a**2 + c**2)`.
///
/// Other summands go through the traced rules. No trace is produced.
pub(super) fn integrate_cyclic(expr: &Expr, var: &str) -> Option<Expr> {
    let mut results = Vec::new();
    let mut used_cycle = false;
    for term in flatten_sum(expr) {
        if let Some(step) = integrate_traced(&term, var, 0) {
            results.push(step.result);
        } else {
            results.push(cyclic_term(&term, var)?);
            used_cycle = true;
        }
    }
    if !used_cycle {
        return None;
    }
    let sum = results
        .into_iter()
        .reduce(|a, b| Expr::Add(a.boxed(), b.boxed()))?;
    Some(simplify_fully(sum))
}

fn cyclic_term(term: &Expr, var: &str) -> Option<Expr> {
    let (constant, rest) = split_constant_factors(term, var);
    let factors = product_factors(&rest);
    let [first, second] = factors.as_slice() else {
        return None;
    };
    let (exp_node, trig) = match (first, second) {
        (e @ Expr::Exp(_), t) | (t, e @ Expr::Exp(_)) => (e, t),
        _ => return None,
    };
    let (a, _) = linear_parts(exp_node.function_arg()?, var)?;
    let (trig_arg, is_sin) = match trig {
        Expr::Sin(arg) => (arg.clone(), true),
        Expr::Cos(arg) => (arg.clone(), false),
        _ => return None,
    };
    let (c, _) = linear_parts(&trig_arg, var)?;

    let denom = &a * &a + &c * &c;
    let sin = Expr::Sin(trig_arg.clone());
    let cos = Expr::Cos(trig_arg);
    let scaled = |k: &Rational, e: Expr| Expr::Mul(Expr::Constant(k.clone()).boxed(), e.boxed());
    let inner = if is_sin {
        Expr::Sub(scaled(&a, sin).boxed(), scaled(&c, cos).boxed())
    } else {
        Expr::Add(scaled(&a, cos).boxed(), scaled(&c, sin).boxed())
    };
    Some(simplify_fully(Expr::Div(
        Expr::Mul(
            constant.boxed(),
            Expr::Mul(exp_node.clone().boxed(), inner.boxed()).boxed(),
        )
        .boxed(),
        Expr::Constant(denom).boxed(),
    )))
}
