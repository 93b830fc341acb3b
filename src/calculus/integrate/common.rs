use crate::expr::{Expr, Rational};
use crate::simplify::{flatten_sum, mul_chain, product_factors, simplify, split_term};
use num_traits::{Signed, ToPrimitive, Zero};

/// Largest polynomial degree the coefficient extractor accepts.
const MAX_DEGREE: usize = 32;

/// Dense rational coefficients (index = degree) of a canonical polynomial in `var`.
///
/// Returns `None` for anything that is not a polynomial with rational coefficients.
pub fn poly_coeffs(expr: &Expr, var: &str) -> Option<Vec<Rational>> {
    let mut coeffs: Vec<Rational> = Vec::new();
    for term in flatten_sum(expr) {
        let (c, monomial) = split_term(&term);
        let degree = monomial_degree(&monomial, var)?;
        if degree > MAX_DEGREE {
            return None;
        }
        if coeffs.len() <= degree {
            coeffs.resize(degree + 1, Rational::zero());
        }
        coeffs[degree] += c;
    }
    while coeffs.len() > 1 && coeffs.last().is_some_and(Zero::is_zero) {
        coeffs.pop();
    }
    if coeffs.is_empty() {
        coeffs.push(Rational::zero());
    }
    Some(coeffs)
}

fn monomial_degree(monomial: &Expr, var: &str) -> Option<usize> {
    match monomial {
        Expr::Constant(_) => Some(0),
        Expr::Variable(name) if name == var => Some(1),
        Expr::Pow(base, exp) if base.as_variable() == Some(var) => {
            let n = exp.as_constant()?;
            if n.is_integer() && !n.is_negative() {
                n.to_integer().to_usize()
            } else {
                None
            }
        }
        _ => None,
    }
}

pub fn is_polynomial(expr: &Expr, var: &str) -> bool {
    poly_coeffs(expr, var).is_some()
}

pub fn degree(expr: &Expr, var: &str) -> Option<usize> {
    poly_coeffs(expr, var).map(|c| c.len() - 1)
}

/// `(a, b)` for `a*var + b` with `a != 0`.
pub fn linear_parts(expr: &Expr, var: &str) -> Option<(Rational, Rational)> {
    let coeffs = poly_coeffs(expr, var)?;
    if coeffs.len() != 2 {
        return None;
    }
    Some((coeffs[1].clone(), coeffs[0].clone()))
}

/// `(a, b, c)` for `a*var**2 + b*var + c` with `a != 0`.
pub fn quadratic_parts(expr: &Expr, var: &str) -> Option<(Rational, Rational, Rational)> {
    let coeffs = poly_coeffs(expr, var)?;
    if coeffs.len() != 3 {
        return None;
    }
    Some((coeffs[2].clone(), coeffs[1].clone(), coeffs[0].clone()))
}

/// Split a canonical term into the factor free of `var` and the factor depending on it.
pub fn split_constant_factors(expr: &Expr, var: &str) -> (Expr, Expr) {
    let (coeff, monomial) = split_term(expr);
    let mut constant = vec![Expr::Constant(coeff)];
    let mut dependent = Vec::new();
    for factor in product_factors(&monomial) {
        if factor.contains_var(var) {
            dependent.push(factor);
        } else {
            constant.push(factor);
        }
    }
    (simplify(mul_chain(constant)), mul_chain(dependent))
}

/// A variable name not occurring in `expr` and different from `var`.
pub fn fresh_variable(expr: &Expr, var: &str) -> String {
    let mut candidate = String::from("u");
    let mut n = 0;
    while candidate == var || expr.contains_var(&candidate) {
        n += 1;
        candidate = format!("u{n}");
    }
    candidate
}
