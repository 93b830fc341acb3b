use crate::expr::Expr;
use crate::simplify::{flatten_sum, mul_chain, product_factors};
use num_traits::Signed;

use super::common::{degree, is_polynomial, split_constant_factors};
use super::types::{IntegrandKind, NonElementaryKind};
use super::{exponential, rational, trig};

pub(super) fn classify_integrand(expr: &Expr, var: &str) -> IntegrandKind {
    if !expr.contains_var(var) || is_polynomial(expr, var) {
        return IntegrandKind::Polynomial;
    }
    if flatten_sum(expr).len() > 1 {
        return IntegrandKind::Sum;
    }
    let (_, rest) = split_constant_factors(expr, var);
    if rational::is_rational(&rest, var) {
        let linear = product_factors(&rest).iter().all(|f| {
            let base = match f {
                Expr::Pow(base, _) => base,
                other => other,
            };
            degree(base, var).is_some_and(|d| d <= 1)
        });
        return IntegrandKind::Rational { linear };
    }
    match product_factors(&rest).as_slice() {
        [single] => classify_factor(single, var),
        [first, others @ ..] => IntegrandKind::Product(
            Box::new(classify_factor(first, var)),
            Box::new(classify_integrand(&mul_chain(others.to_vec()), var)),
        ),
        [] => IntegrandKind::Polynomial,
    }
}

fn classify_factor(expr: &Expr, var: &str) -> IntegrandKind {
    if is_polynomial(expr, var) {
        return IntegrandKind::Polynomial;
    }
    if trig::is_trig(expr) {
        return IntegrandKind::Trig;
    }
    if exponential::is_exp(expr) {
        return IntegrandKind::Exponential;
    }
    match expr {
        Expr::Log(_) => IntegrandKind::Logarithmic,
        Expr::Pow(base, exp) if exp.as_constant().is_some() => classify_factor(base, var),
        _ => IntegrandKind::Unknown,
    }
}

/// Recognise integrands with no elementary antiderivative:
/// `exp(p(x))` with `deg p >= 2`, `sin(x)/x`, `cos(x)/x`, `exp(x)/x`, `1/log(x)` and `x**x`.
pub(crate) fn detect_non_elementary(expr: &Expr, var: &str) -> Option<NonElementaryKind> {
    flatten_sum(expr)
        .iter()
        .find_map(|term| non_elementary_term(term, var))
}

fn non_elementary_term(term: &Expr, var: &str) -> Option<NonElementaryKind> {
    let (_, rest) = split_constant_factors(term, var);
    let factors = product_factors(&rest);
    let over_var = factors.iter().any(|f| match f {
        Expr::Pow(base, exp) => {
            base.as_variable() == Some(var) && exp.as_constant().is_some_and(Signed::is_negative)
        }
        _ => false,
    });
    let is_var = |e: &Expr| e.as_variable() == Some(var);

    factors.iter().find_map(|f| match f {
        Expr::Exp(arg) if degree(arg, var).is_some_and(|d| d >= 2) => {
            Some(NonElementaryKind::ExpOfPolynomial)
        }
        Expr::Sin(arg) | Expr::Cos(arg) if over_var && is_var(arg) => {
            Some(NonElementaryKind::TrigOverArgument)
        }
        Expr::Exp(arg) if over_var && is_var(arg) => Some(NonElementaryKind::SpecialFunctionNeeded),
        Expr::Pow(base, exp) if matches!(**base, Expr::Log(_)) && exp.as_constant().is_some() => {
            Some(NonElementaryKind::SpecialFunctionNeeded)
        }
        Expr::Pow(base, exp) if is_var(base) && exp.contains_var(var) => {
            Some(NonElementaryKind::SpecialFunctionNeeded)
        }
        _ => None,
    })
}
