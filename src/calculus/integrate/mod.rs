mod classify;
mod common;
mod cyclic;
mod direct;
mod exponential;
mod partial_fractions;
mod parts;
mod polynomial;
mod rational;
mod report;
mod steps;
mod substitution;
mod trig;
mod types;

use tracing::debug;

use crate::expr::Expr;
use crate::format::pretty;
use crate::simplify::simplify_fully;

pub(crate) use classify::detect_non_elementary;
pub use common::{degree, is_polynomial, linear_parts, poly_coeffs};
pub use report::describe_reason;
pub use steps::{IntegralStep, Rule};
pub use types::{
    AttemptStatus, IntegrandKind, IntegrandReport, IntegrationAttempt, IntegrationResult,
    NonElementaryKind, ReasonCode, Strategy,
};

use report::{default_reason, push_failed, push_hit_limit, push_not_applicable, push_succeeded};

/// Integrands larger than this (in nodes) are not handed to substitution or parts.
pub const TRANSFORM_SIZE_LIMIT: usize = 96;

/// Nesting cap for the traced rule search.
const SEARCH_DEPTH_LIMIT: usize = 6;

/// Antiderivative of `expr` with respect to `var`, without the constant of integration.
///
/// Strategies run in order: direct table/linearity, u-substitution, partial fractions,
/// integration by parts, and the closed form for `exp * sin/cos` cycles. The report
/// records every attempt.
pub fn integrate(var: &str, expr: &Expr) -> IntegrationResult {
    let canonical = simplify_fully(expr.clone());
    let kind = classify::classify_integrand(&canonical, var);
    let mut attempts = Vec::new();
    debug!(integrand = %canonical, ?kind, "integrating");

    if let Some(step) = direct::integrate_direct(&canonical, var, 0) {
        push_succeeded(&mut attempts, Strategy::Direct, None);
        return integrated(step.result, kind, attempts);
    }
    push_failed(&mut attempts, Strategy::Direct, default_reason(&kind));

    let size = canonical.size();
    if size > TRANSFORM_SIZE_LIMIT {
        push_hit_limit(&mut attempts, Strategy::Substitution, size, TRANSFORM_SIZE_LIMIT);
        push_hit_limit(&mut attempts, Strategy::PartialFractions, size, TRANSFORM_SIZE_LIMIT);
        push_hit_limit(&mut attempts, Strategy::IntegrationByParts, size, TRANSFORM_SIZE_LIMIT);
    } else {
        if let Some(step) = substitution::integrate_by_substitution(&canonical, var, 0) {
            let note = match &step.rule {
                Rule::Substitution { u, .. } => Some(format!("u={}", pretty(u))),
                _ => None,
            };
            push_succeeded(&mut attempts, Strategy::Substitution, note);
            return integrated(step.result, kind, attempts);
        }
        push_not_applicable(&mut attempts, Strategy::Substitution);

        if let Some(step) = partial_fractions::integrate_partial_fractions(&canonical, var, 0) {
            push_succeeded(&mut attempts, Strategy::PartialFractions, None);
            return integrated(step.result, kind, attempts);
        }
        push_not_applicable(&mut attempts, Strategy::PartialFractions);

        if let Some(step) = parts::integration_by_parts(&canonical, var, 0) {
            let note = parts_note(&step);
            push_succeeded(&mut attempts, Strategy::IntegrationByParts, note);
            return integrated(step.result, kind, attempts);
        }
        push_not_applicable(&mut attempts, Strategy::IntegrationByParts);
    }

    if let Some(result) = cyclic::integrate_cyclic(&canonical, var) {
        push_succeeded(&mut attempts, Strategy::CyclicParts, None);
        return integrated(result, kind, attempts);
    }
    push_not_applicable(&mut attempts, Strategy::CyclicParts);

    let (kind, reason) = match detect_non_elementary(&canonical, var) {
        Some(ne) => (
            IntegrandKind::NonElementary(ne.clone()),
            ReasonCode::NonElementary(ne),
        ),
        None if size > TRANSFORM_SIZE_LIMIT => (kind, ReasonCode::SizeLimit(size)),
        None => {
            let reason = default_reason(&kind);
            (kind, reason)
        }
    };
    debug!(integrand = %canonical, ?reason, "no antiderivative found");
    IntegrationResult::NotIntegrable(IntegrandReport {
        kind,
        reason: Some(reason),
        attempts,
    })
}

/// Derivation trace built by the traced strategies (direct, substitution, partial
/// fractions, parts).
///
/// `None` when those rules cannot integrate `expr`, even if [`integrate`] can.
pub fn integral_steps(var: &str, expr: &Expr) -> Option<IntegralStep> {
    let canonical = simplify_fully(expr.clone());
    let step = integrate_traced(&canonical, var, 0)?;
    if pretty(&canonical) == pretty(expr) {
        return Some(step);
    }
    Some(IntegralStep::new(
        expr.clone(),
        var,
        step.result.clone(),
        Rule::Rewrite {
            rewritten: canonical,
            substep: Box::new(step),
        },
    ))
}

/// Recursive traced search used by every strategy for its sub-integrals.
fn integrate_traced(expr: &Expr, var: &str, depth: usize) -> Option<IntegralStep> {
    if depth > SEARCH_DEPTH_LIMIT {
        return None;
    }
    direct::integrate_direct(expr, var, depth)
        .or_else(|| {
            if expr.size() > TRANSFORM_SIZE_LIMIT {
                return None;
            }
            substitution::integrate_by_substitution(expr, var, depth)
                .or_else(|| partial_fractions::integrate_partial_fractions(expr, var, depth))
                .or_else(|| parts::integration_by_parts(expr, var, depth))
        })
}

fn integrated(result: Expr, kind: IntegrandKind, attempts: Vec<IntegrationAttempt>) -> IntegrationResult {
    IntegrationResult::Integrated {
        result,
        report: IntegrandReport {
            kind,
            reason: None,
            attempts,
        },
    }
}

fn parts_note(step: &IntegralStep) -> Option<String> {
    match &step.rule {
        Rule::Parts { u, dv, .. } => Some(format!("u={}, dv={}", pretty(u), pretty(dv))),
        Rule::ConstantTimes { substep, .. } => parts_note(substep),
        _ => None,
    }
}
