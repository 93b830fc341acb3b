use crate::expr::{Expr, Rational};
use crate::simplify::simplify;
use num_traits::{Signed, Zero};

use super::common::quadratic_parts;
use super::steps::{IntegralStep, Rule};

/// `(a*x**2 + c)**-1 -> atan` and `(c - a*x**2)**(-1/2) -> asin`.
pub fn integrate(expr: &Expr, var: &str) -> Option<IntegralStep> {
    let Expr::Pow(base, exp) = expr else {
        return None;
    };
    let n = exp.as_constant()?;
    let (a, b, c) = quadratic_parts(base, var)?;
    if !b.is_zero() || c.is_zero() {
        return None;
    }
    let x = Expr::Variable(var.to_string());

    if *n == -Rational::from_integer(1.into()) {
        if a.is_positive() != c.is_positive() {
            return None;
        }
        // Both negative: pull out the sign.
        let sign = if a.is_positive() { 1 } else { -1 };
        let (pa, pc) = (a.abs(), c.abs());
        let result = simplify(Expr::Div(
            Expr::Mul(
                Expr::integer(sign).boxed(),
                Expr::Atan(Expr::Mul(x.boxed(), sqrt_of(&pa / &pc).boxed()).boxed()).boxed(),
            )
            .boxed(),
            sqrt_of(&pa * &pc).boxed(),
        ));
        return Some(IntegralStep::new(
            expr.clone(),
            var,
            result,
            Rule::Arctan { a, c },
        ));
    }

    if *n == Rational::new((-1).into(), 2.into()) && a.is_negative() && c.is_positive() {
        let pa = a.abs();
        let result = simplify(Expr::Div(
            Expr::Asin(Expr::Mul(x.boxed(), sqrt_of(&pa / &c).boxed()).boxed()).boxed(),
            sqrt_of(pa).boxed(),
        ));
        return Some(IntegralStep::new(
            expr.clone(),
            var,
            result,
            Rule::Arcsin { a, c },
        ));
    }

    None
}

pub(super) fn sqrt_of(value: Rational) -> Expr {
    Expr::Pow(Expr::Constant(value).boxed(), Expr::constant(1, 2).boxed())
}

/// Whether `expr` is a product of integer powers of polynomials in `var`.
pub fn is_rational(expr: &Expr, var: &str) -> bool {
    crate::simplify::product_factors(expr).iter().all(|f| match f {
        Expr::Pow(base, exp) => {
            exp.as_constant().is_some_and(|n| n.is_integer())
                && super::common::is_polynomial(base, var)
        }
        other => super::common::is_polynomial(other, var),
    })
}
