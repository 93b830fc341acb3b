use super::{
    AttemptStatus, IntegrandKind, IntegrationAttempt, NonElementaryKind, ReasonCode, Strategy,
};

pub(super) fn attempt(
    strategy: Strategy,
    status: AttemptStatus,
    note: Option<String>,
) -> IntegrationAttempt {
    IntegrationAttempt {
        strategy,
        status,
        note,
    }
}

pub(super) fn push_succeeded(
    attempts: &mut Vec<IntegrationAttempt>,
    strategy: Strategy,
    note: Option<String>,
) {
    attempts.push(attempt(strategy, AttemptStatus::Succeeded, note));
}

pub(super) fn push_failed(
    attempts: &mut Vec<IntegrationAttempt>,
    strategy: Strategy,
    reason: ReasonCode,
) {
    attempts.push(attempt(strategy, AttemptStatus::Failed(reason), None));
}

pub(super) fn push_hit_limit(
    attempts: &mut Vec<IntegrationAttempt>,
    strategy: Strategy,
    size: usize,
    limit: usize,
) {
    attempts.push(attempt(
        strategy,
        AttemptStatus::HitLimit { size, limit },
        None,
    ));
}

pub(super) fn push_not_applicable(attempts: &mut Vec<IntegrationAttempt>, strategy: Strategy) {
    attempts.push(attempt(strategy, AttemptStatus::NotApplicable, None));
}

pub(super) fn default_reason(kind: &IntegrandKind) -> ReasonCode {
    match kind {
        IntegrandKind::Rational { .. } => ReasonCode::NonRational,
        IntegrandKind::Trig => ReasonCode::NonPolynomialTrig,
        IntegrandKind::NonElementary(ne) => ReasonCode::NonElementary(ne.clone()),
        _ => ReasonCode::UnknownStructure,
    }
}

/// Short human-readable reason, used in error messages.
pub fn describe_reason(reason: &ReasonCode) -> String {
    match reason {
        ReasonCode::NonRational => "rational function outside the supported forms".to_string(),
        ReasonCode::NonPolynomialTrig => "unsupported trigonometric form".to_string(),
        ReasonCode::NonElementary(kind) => match kind {
            NonElementaryKind::ExpOfPolynomial => {
                "exponential of a polynomial of degree two or more".to_string()
            }
            NonElementaryKind::TrigOverArgument => "trigonometric function over its argument".to_string(),
            NonElementaryKind::SpecialFunctionNeeded => "requires a special function".to_string(),
        },
        ReasonCode::UnknownStructure => "no applicable integration rule".to_string(),
        ReasonCode::SizeLimit(size) => format!("expression too large ({size} nodes)"),
    }
}
