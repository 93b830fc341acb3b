use tracing::trace;

use crate::calculus::differentiate;
use crate::expr::{Expr, one};
use crate::simplify::{mul_chain, product_factors, simplify_fully, simplify_mul, simplify_sub};

use super::common::{is_polynomial, split_constant_factors};
use super::steps::{IntegralStep, Rule};
use super::{integrate_traced, TRANSFORM_SIZE_LIMIT};

/// Nesting cap for repeated integration by parts (`x**3*exp(x)` needs three levels).
pub(super) const IBP_RECURSION_LIMIT: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum LiateRank {
    Log,
    InverseTrig,
    Algebraic,
    Trig,
    Exponential,
}

fn factor_rank(expr: &Expr, var: &str) -> Option<LiateRank> {
    match expr {
        Expr::Log(_) => Some(LiateRank::Log),
        Expr::Atan(_) | Expr::Asin(_) | Expr::Acos(_) => Some(LiateRank::InverseTrig),
        e if is_polynomial(e, var) => Some(LiateRank::Algebraic),
        Expr::Pow(base, exp) if base.as_variable() == Some(var) && exp.as_constant().is_some() => {
            Some(LiateRank::Algebraic)
        }
        Expr::Sin(_) | Expr::Cos(_) | Expr::Tan(_) => Some(LiateRank::Trig),
        Expr::Exp(_) => Some(LiateRank::Exponential),
        Expr::Pow(base, _) if matches!(**base, Expr::Constant(_)) => Some(LiateRank::Exponential),
        Expr::Pow(base, _) => factor_rank(base, var),
        _ => None,
    }
}

/// `∫ u dv = u*v - ∫ v du`, choosing `u` by LIATE order.
///
/// A lone `log`/inverse-trig factor is taken as `u` with `dv = dx`.
pub(super) fn integration_by_parts(expr: &Expr, var: &str, depth: usize) -> Option<IntegralStep> {
    if depth >= IBP_RECURSION_LIMIT {
        return None;
    }

    let (constant, rest) = split_constant_factors(expr, var);
    if !constant.is_one() {
        let substep = integration_by_parts(&rest, var, depth)?;
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

    let factors = product_factors(&rest);
    if factors.len() == 1 {
        return match factor_rank(&factors[0], var) {
            Some(LiateRank::Log | LiateRank::InverseTrig) => {
                apply_parts(expr, &factors[0], &one(), var, depth)
            }
            _ => None,
        };
    }

    let mut candidates: Vec<(usize, LiateRank)> = factors
        .iter()
        .enumerate()
        .filter_map(|(i, f)| factor_rank(f, var).map(|r| (i, r)))
        .collect();
    candidates.sort_by_key(|(_, rank)| *rank);

    for (u_idx, u_kind) in candidates {
        let u = &factors[u_idx];
        let dv = mul_chain(
            factors
                .iter()
                .enumerate()
                .filter_map(|(i, f)| if i == u_idx { None } else { Some(f.clone()) })
                .collect(),
        );
        trace!(u = %u, dv = %dv, rank = ?u_kind, depth, "integration by parts candidate");
        if let Some(step) = apply_parts(expr, u, &dv, var, depth) {
            return Some(step);
        }
    }

    None
}

fn apply_parts(expr: &Expr, u: &Expr, dv: &Expr, var: &str, depth: usize) -> Option<IntegralStep> {
    let v_step = integrate_traced(dv, var, depth + 1)?;
    let v = v_step.result.clone();
    let du = simplify_fully(differentiate(var, u));
    let second = simplify_fully(simplify_mul(v.clone(), du.clone()));
    if second.size() > TRANSFORM_SIZE_LIMIT {
        trace!(size = second.size(), "v*du too large");
        return None;
    }
    let second_step = integrate_traced(&second, var, depth + 1)?;
    let result = simplify_fully(simplify_sub(
        simplify_mul(u.clone(), v),
        second_step.result.clone(),
    ));
    Some(IntegralStep::new(
        expr.clone(),
        var,
        result,
        Rule::Parts {
            u: u.clone(),
            dv: dv.clone(),
            du,
            v_step: Box::new(v_step),
            second_step: Box::new(second_step),
        },
    ))
}
