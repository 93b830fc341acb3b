use num_traits::{One, Signed, Zero};
use tracing::trace;

use crate::expr::{Expr, Rational};
use crate::polynomial::{Polynomial, RationalFunction};
use crate::simplify::{simplify, simplify_add};

use super::integrate_traced;
use super::rational::sqrt_of;
use super::steps::{IntegralStep, Rule};

/// Denominators above this degree are left to the other strategies.
const DENOMINATOR_DEGREE_LIMIT: usize = 8;

/// Irreducible factors of a monic denominator.
#[derive(Debug, Clone)]
enum Factor {
    /// `(x - root)**power`.
    Linear { root: Rational, power: usize },
    /// `x**2 + p*x + q` with `p**2 < 4*q`.
    Quadratic { p: Rational, q: Rational },
}

/// One term of the decomposition with its numerator coefficients.
enum Piece {
    Linear { root: Rational, power: usize, a: Rational },
    Quadratic { p: Rational, q: Rational, b: Rational, c: Rational },
}

/// `P/Q = S + sum A/(x - r)**k + sum (B*x + C)/(x**2 + p*x + q)`, integrated term by term.
///
/// Applies when `Q` splits into rational linear factors and at most one irreducible
/// quadratic.
pub(super) fn integrate_partial_fractions(
    expr: &Expr,
    var: &str,
    depth: usize,
) -> Option<IntegralStep> {
    let RationalFunction {
        numerator,
        denominator,
    } = RationalFunction::from_expr(expr, var)?;
    let degree = denominator.degree()?;
    if degree == 0 || degree > DENOMINATOR_DEGREE_LIMIT {
        return None;
    }
    let numerator = numerator.scale(&denominator.leading_coeff().recip());
    let denominator = denominator.monic();
    let (quotient, remainder) = numerator.div_rem(&denominator);
    let factors = factor(&denominator)?;
    let pieces = decompose(&remainder, &denominator, &factors)?;
    trace!(integrand = %expr, pieces = pieces.len(), "partial fractions");

    let mut terms = Vec::new();
    let mut substeps = Vec::new();
    if !quotient.is_zero() {
        let polynomial = quotient.to_expr(var);
        substeps.push(integrate_traced(&polynomial, var, depth + 1)?);
        terms.push(polynomial);
    }
    for piece in &pieces {
        let (term, step) = match piece {
            Piece::Linear { root, power, a } => {
                let term = linear_term(root, *power, a, var);
                let step = integrate_traced(&term, var, depth + 1)?;
                (term, step)
            }
            Piece::Quadratic { p, q, b, c } => quadratic_term(p, q, b, c, var),
        };
        terms.push(term);
        substeps.push(step);
    }

    let result = substeps
        .iter()
        .fold(Expr::integer(0), |acc, s| simplify_add(acc, s.result.clone()));
    let decomposition = terms
        .into_iter()
        .reduce(|a, b| Expr::Add(a.boxed(), b.boxed()))
        .unwrap_or_else(|| Expr::integer(0));
    Some(IntegralStep::new(
        expr.clone(),
        var,
        result,
        Rule::PartialFractions {
            decomposition,
            substeps,
        },
    ))
}

fn factor(denominator: &Polynomial) -> Option<Vec<Factor>> {
    let mut rest = denominator.clone();
    let mut factors = Vec::new();
    for root in denominator.rational_roots() {
        let linear = Polynomial::linear_factor(&root);
        let mut power = 0;
        while let Some(quotient) = rest.div_exact(&linear) {
            rest = quotient;
            power += 1;
        }
        factors.push(Factor::Linear { root, power });
    }
    match rest.degree()? {
        0 => {}
        2 => {
            let (p, q) = (rest.coeff(1), rest.coeff(0));
            if !discriminant(&p, &q).is_positive() {
                return None;
            }
            factors.push(Factor::Quadratic { p, q });
        }
        _ => return None,
    }
    Some(factors)
}

fn monic_quadratic(p: &Rational, q: &Rational) -> Polynomial {
    let leading = &Polynomial::monomial(Rational::one(), 2) + &Polynomial::monomial(p.clone(), 1);
    &leading + &Polynomial::from_constant(q.clone())
}

/// `4*q - p**2`, positive exactly when `x**2 + p*x + q` has no real root.
fn discriminant(p: &Rational, q: &Rational) -> Rational {
    Rational::from_integer(4.into()) * q - p * p
}

/// Solve `remainder = sum coeff_i * denominator / factor_i` for the numerator coefficients.
fn decompose(
    remainder: &Polynomial,
    denominator: &Polynomial,
    factors: &[Factor],
) -> Option<Vec<Piece>> {
    let mut columns = Vec::new();
    for f in factors {
        match f {
            Factor::Linear { root, power } => {
                let linear = Polynomial::linear_factor(root);
                for k in 1..=*power {
                    columns.push(denominator.div_exact(&linear.pow(k as u32))?);
                }
            }
            Factor::Quadratic { p, q } => {
                let cofactor = denominator.div_exact(&monic_quadratic(p, q))?;
                columns.push(&cofactor * &Polynomial::monomial(Rational::one(), 1));
                columns.push(cofactor);
            }
        }
    }

    let n = columns.len();
    let matrix = (0..n)
        .map(|row| columns.iter().map(|col| col.coeff(row)).collect())
        .collect();
    let rhs = (0..n).map(|row| remainder.coeff(row)).collect();
    let mut solution = solve_linear(matrix, rhs)?.into_iter();

    let mut pieces = Vec::new();
    for f in factors {
        match f {
            Factor::Linear { root, power } => {
                for k in 1..=*power {
                    let a = solution.next()?;
                    if !a.is_zero() {
                        pieces.push(Piece::Linear {
                            root: root.clone(),
                            power: k,
                            a,
                        });
                    }
                }
            }
            Factor::Quadratic { p, q } => {
                let (b, c) = (solution.next()?, solution.next()?);
                if !(b.is_zero() && c.is_zero()) {
                    pieces.push(Piece::Quadratic {
                        p: p.clone(),
                        q: q.clone(),
                        b,
                        c,
                    });
                }
            }
        }
    }
    Some(pieces)
}

/// Gaussian elimination over the rationals. `None` for a singular system.
fn solve_linear(mut matrix: Vec<Vec<Rational>>, mut rhs: Vec<Rational>) -> Option<Vec<Rational>> {
    let n = rhs.len();
    for col in 0..n {
        let pivot = (col..n).find(|&row| !matrix[row][col].is_zero())?;
        matrix.swap(col, pivot);
        rhs.swap(col, pivot);
        let lead = matrix[col][col].clone();
        for row in 0..n {
            if row == col || matrix[row][col].is_zero() {
                continue;
            }
            let factor = &matrix[row][col] / &lead;
            for k in col..n {
                let delta = &factor * &matrix[col][k];
                matrix[row][k] -= delta;
            }
            let delta = &factor * &rhs[col];
            rhs[row] -= delta;
        }
    }
    Some(
        rhs.into_iter()
            .zip(matrix.iter().enumerate())
            .map(|(value, (i, row))| value / &row[i])
            .collect(),
    )
}

/// `a/(x - root)**power`.
fn linear_term(root: &Rational, power: usize, a: &Rational, var: &str) -> Expr {
    let base = Polynomial::linear_factor(root).to_expr(var);
    simplify(Expr::Mul(
        Expr::Constant(a.clone()).boxed(),
        Expr::Pow(base.boxed(), Expr::integer(-(power as i64)).boxed()).boxed(),
    ))
}

/// `∫ (b*x + c)/(x**2 + p*x + q) dx
///   = (b/2)*log(x**2 + p*x + q) + (2*c - b*p)/sqrt(d) * atan((2*x + p)/sqrt(d))`
/// with `d = 4*q - p**2`.
fn quadratic_term(
    p: &Rational,
    q: &Rational,
    b: &Rational,
    c: &Rational,
    var: &str,
) -> (Expr, IntegralStep) {
    let quadratic = monic_quadratic(p, q).to_expr(var);
    let numerator =
        (&Polynomial::monomial(b.clone(), 1) + &Polynomial::from_constant(c.clone())).to_expr(var);
    let term = simplify(Expr::Mul(
        numerator.boxed(),
        Expr::Pow(quadratic.clone().boxed(), Expr::integer(-1).boxed()).boxed(),
    ));

    let two = Rational::from_integer(2.into());
    let d = discriminant(p, q);
    let x = Expr::Variable(var.to_string());
    let log_part = Expr::Mul(
        Expr::Constant(b / &two).boxed(),
        Expr::Log(quadratic.boxed()).boxed(),
    );
    let atan_arg = Expr::Div(
        Expr::Add(
            Expr::Mul(Expr::Constant(two.clone()).boxed(), x.boxed()).boxed(),
            Expr::Constant(p.clone()).boxed(),
        )
        .boxed(),
        sqrt_of(d.clone()).boxed(),
    );
    let atan_part = Expr::Div(
        Expr::Mul(
            Expr::Constant(&two * c - b * p).boxed(),
            Expr::Atan(atan_arg.boxed()).boxed(),
        )
        .boxed(),
        sqrt_of(d).boxed(),
    );
    let result = simplify(Expr::Add(log_part.boxed(), atan_part.boxed()));
    let step = IntegralStep::new(
        term.clone(),
        var,
        result,
        Rule::QuadraticDenominator {
            p: p.clone(),
            q: q.clone(),
        },
    );
    (term, step)
}
