//! Dense univariate polynomials with exact rational coefficients, and rational
//! functions built from them.

use std::collections::btree_map::Entry;
use std::collections::BTreeMap;
use std::ops::{Add, Mul, Neg, Sub};

use num_bigint::BigInt;
use num_integer::Integer;
use num_traits::{One, Signed, ToPrimitive, Zero};

use crate::expr::{Expr, Rational};
use crate::simplify::simplify;

/// Degree cap for rational-function normal forms.
pub const RATIONAL_DEGREE_LIMIT: usize = 64;

/// Largest |constant term| or |leading coefficient| whose divisors are searched for
/// rational roots.
const ROOT_SEARCH_LIMIT: u64 = 1_000_000;

/// Largest integer exponent expanded when normalising `p**k`.
const POWER_LIMIT: u32 = 16;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Polynomial {
    coeffs: BTreeMap<usize, Rational>,
}

impl Polynomial {
    pub fn zero() -> Self {
        Polynomial {
            coeffs: BTreeMap::new(),
        }
    }

    pub fn one() -> Self {
        Polynomial::from_constant(Rational::one())
    }

    pub fn from_constant(c: Rational) -> Self {
        Polynomial::monomial(c, 0)
    }

    pub fn monomial(c: Rational, power: usize) -> Self {
        let mut coeffs = BTreeMap::new();
        if !c.is_zero() {
            coeffs.insert(power, c);
        }
        Polynomial { coeffs }
    }

    /// `x - root`.
    pub fn linear_factor(root: &Rational) -> Self {
        &Polynomial::monomial(Rational::one(), 1) - &Polynomial::from_constant(root.clone())
    }

    pub fn degree(&self) -> Option<usize> {
        self.coeffs.keys().next_back().copied()
    }

    pub fn leading_coeff(&self) -> Rational {
        self.coeffs
            .values()
            .next_back()
            .cloned()
            .unwrap_or_else(Rational::zero)
    }

    pub fn coeff(&self, power: usize) -> Rational {
        self.coeffs
            .get(&power)
            .cloned()
            .unwrap_or_else(Rational::zero)
    }

    pub fn is_zero(&self) -> bool {
        self.coeffs.is_empty()
    }

    pub fn pow(&self, exp: u32) -> Self {
        let mut result = Polynomial::one();
        let mut base = self.clone();
        let mut n = exp;
        while n > 0 {
            if n % 2 == 1 {
                result = &result * &base;
            }
            base = &base * &base;
            n /= 2;
        }
        result
    }

    pub fn scale(&self, k: &Rational) -> Self {
        if k.is_zero() {
            return Polynomial::zero();
        }
        let coeffs = self
            .coeffs
            .iter()
            .map(|(exp, coeff)| (*exp, coeff * k))
            .collect();
        Polynomial { coeffs }
    }

    pub fn monic(&self) -> Self {
        let lc = self.leading_coeff();
        if lc.is_zero() {
            return self.clone();
        }
        self.scale(&lc.recip())
    }

    pub fn evaluate(&self, x: &Rational) -> Rational {
        // Horner from the leading coefficient down.
        let Some(top) = self.degree() else {
            return Rational::zero();
        };
        (0..=top)
            .rev()
            .fold(Rational::zero(), |acc, exp| acc * x + self.coeff(exp))
    }

    /// Long division: `self = q * divisor + r` with `deg r < deg divisor`.
    pub fn div_rem(&self, divisor: &Self) -> (Self, Self) {
        let Some(divisor_degree) = divisor.degree() else {
            return (Polynomial::zero(), self.clone());
        };
        let divisor_lc = divisor.leading_coeff();
        let mut quotient = Polynomial::zero();
        let mut remainder = self.clone();

        while let Some(r_deg) = remainder.degree() {
            if r_deg < divisor_degree {
                break;
            }
            let term = Polynomial::monomial(
                remainder.leading_coeff() / &divisor_lc,
                r_deg - divisor_degree,
            );
            remainder = &remainder - &(&term * divisor);
            quotient = &quotient + &term;
        }

        (quotient, remainder)
    }

    pub fn div_exact(&self, divisor: &Self) -> Option<Self> {
        let (q, r) = self.div_rem(divisor);
        r.is_zero().then_some(q)
    }

    /// Distinct rational roots, by the rational root theorem on the integer-scaled
    /// coefficients. Roots whose candidate divisors are too large to enumerate are missed.
    pub fn rational_roots(&self) -> Vec<Rational> {
        let mut roots = Vec::new();
        let Some(lowest) = self.coeffs.keys().next().copied() else {
            return roots;
        };
        if lowest > 0 {
            roots.push(Rational::zero());
        }

        let mut denominators = BigInt::one();
        for coeff in self.coeffs.values() {
            denominators = denominators.lcm(coeff.denom());
        }
        let scale = Rational::from_integer(denominators);
        let constant = (self.coeff(lowest) * &scale).to_integer();
        let leading = (self.leading_coeff() * &scale).to_integer();
        let (Some(constant), Some(leading)) = (constant.abs().to_u64(), leading.abs().to_u64())
        else {
            return roots;
        };
        if constant > ROOT_SEARCH_LIMIT || leading > ROOT_SEARCH_LIMIT {
            return roots;
        }

        for p in divisors(constant) {
            for q in divisors(leading) {
                for sign in [1i64, -1] {
                    let candidate = Rational::new(BigInt::from(p) * sign, BigInt::from(q));
                    if !roots.contains(&candidate) && self.evaluate(&candidate).is_zero() {
                        roots.push(candidate);
                    }
                }
            }
        }
        roots.sort();
        roots
    }

    /// Canonical expression `c_n*x**n + ... + c_0`.
    pub fn to_expr(&self, var: &str) -> Expr {
        let terms = self.coeffs.iter().map(|(exp, coeff)| {
            let power = Expr::Pow(
                Expr::Variable(var.to_string()).boxed(),
                Expr::integer(*exp as u64).boxed(),
            );
            Expr::Mul(Expr::Constant(coeff.clone()).boxed(), power.boxed())
        });
        let sum = terms
            .reduce(|a, b| Expr::Add(a.boxed(), b.boxed()))
            .unwrap_or_else(|| Expr::integer(0));
        simplify(sum)
    }
}

fn divisors(n: u64) -> Vec<u64> {
    let mut small = Vec::new();
    let mut large = Vec::new();
    let mut i = 1;
    while i * i <= n {
        if n % i == 0 {
            small.push(i);
            if i != n / i {
                large.push(n / i);
            }
        }
        i += 1;
    }
    small.extend(large.into_iter().rev());
    small
}

fn merge(coeffs: &mut BTreeMap<usize, Rational>, exp: usize, value: Rational) {
    if value.is_zero() {
        return;
    }
    match coeffs.entry(exp) {
        Entry::Vacant(entry) => {
            entry.insert(value);
        }
        Entry::Occupied(mut entry) => {
            let updated = entry.get() + value;
            if updated.is_zero() {
                entry.remove();
            } else {
                *entry.get_mut() = updated;
            }
        }
    }
}

impl Add for &Polynomial {
    type Output = Polynomial;
    fn add(self, rhs: &Polynomial) -> Polynomial {
        let mut coeffs = self.coeffs.clone();
        for (exp, coeff) in &rhs.coeffs {
            merge(&mut coeffs, *exp, coeff.clone());
        }
        Polynomial { coeffs }
    }
}

impl Sub for &Polynomial {
    type Output = Polynomial;
    fn sub(self, rhs: &Polynomial) -> Polynomial {
        let mut coeffs = self.coeffs.clone();
        for (exp, coeff) in &rhs.coeffs {
            merge(&mut coeffs, *exp, -coeff.clone());
        }
        Polynomial { coeffs }
    }
}

impl Mul for &Polynomial {
    type Output = Polynomial;
    fn mul(self, rhs: &Polynomial) -> Polynomial {
        let mut coeffs = BTreeMap::new();
        for (exp_a, coeff_a) in &self.coeffs {
            for (exp_b, coeff_b) in &rhs.coeffs {
                merge(&mut coeffs, exp_a + exp_b, coeff_a * coeff_b);
            }
        }
        Polynomial { coeffs }
    }
}

impl Neg for &Polynomial {
    type Output = Polynomial;
    fn neg(self) -> Polynomial {
        self.scale(&-Rational::one())
    }
}

/// `numerator / denominator`, both polynomials in one variable. The denominator is never zero.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RationalFunction {
    pub numerator: Polynomial,
    pub denominator: Polynomial,
}

impl RationalFunction {
    fn polynomial(p: Polynomial) -> Self {
        RationalFunction {
            numerator: p,
            denominator: Polynomial::one(),
        }
    }

    /// Normal form of `expr` over `var`: sums, products, quotients and integer powers of
    /// rational constants and `var`. `None` for anything else (other symbols, functions,
    /// fractional powers), for a division by zero, or past [`RATIONAL_DEGREE_LIMIT`].
    pub fn from_expr(expr: &Expr, var: &str) -> Option<Self> {
        let result = match expr {
            Expr::Constant(c) => Self::polynomial(Polynomial::from_constant(c.clone())),
            Expr::Variable(v) if v == var => {
                Self::polynomial(Polynomial::monomial(Rational::one(), 1))
            }
            Expr::Add(a, b) => Self::from_expr(a, var)?.add(&Self::from_expr(b, var)?),
            Expr::Sub(a, b) => Self::from_expr(a, var)?.add(&Self::from_expr(b, var)?.neg()),
            Expr::Mul(a, b) => Self::from_expr(a, var)?.mul(&Self::from_expr(b, var)?),
            Expr::Div(a, b) => Self::from_expr(a, var)?.mul(&Self::from_expr(b, var)?.recip()?),
            Expr::Neg(inner) => Self::from_expr(inner, var)?.neg(),
            Expr::Pow(base, exp) => {
                let k = exp.as_constant().filter(|k| k.is_integer())?.to_integer();
                let n = k.abs().to_u32().filter(|n| *n <= POWER_LIMIT)?;
                let base = Self::from_expr(base, var)?;
                let widest = base.numerator.degree().max(base.denominator.degree());
                if widest.unwrap_or(0) * n as usize > RATIONAL_DEGREE_LIMIT {
                    return None;
                }
                let base = if k.is_negative() { base.recip()? } else { base };
                RationalFunction {
                    numerator: base.numerator.pow(n),
                    denominator: base.denominator.pow(n),
                }
            }
            _ => return None,
        };
        let within = |p: &Polynomial| p.degree().unwrap_or(0) <= RATIONAL_DEGREE_LIMIT;
        (within(&result.numerator) && within(&result.denominator)).then_some(result)
    }

    pub fn is_zero(&self) -> bool {
        self.numerator.is_zero()
    }

    fn add(&self, other: &Self) -> Self {
        if self.denominator == other.denominator {
            return RationalFunction {
                numerator: &self.numerator + &other.numerator,
                denominator: self.denominator.clone(),
            };
        }
        RationalFunction {
            numerator: &(&self.numerator * &other.denominator)
                + &(&other.numerator * &self.denominator),
            denominator: &self.denominator * &other.denominator,
        }
    }

    fn mul(&self, other: &Self) -> Self {
        RationalFunction {
            numerator: &self.numerator * &other.numerator,
            denominator: &self.denominator * &other.denominator,
        }
    }

    fn neg(&self) -> Self {
        RationalFunction {
            numerator: -&self.numerator,
            denominator: self.denominator.clone(),
        }
    }

    fn recip(&self) -> Option<Self> {
        if self.numerator.is_zero() {
            return None;
        }
        Some(RationalFunction {
            numerator: self.denominator.clone(),
            denominator: self.numerator.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_expr;

    fn poly(coeffs: &[i64]) -> Polynomial {
        let mut p = Polynomial::zero();
        for (exp, c) in coeffs.iter().enumerate() {
            p = &p + &Polynomial::monomial(Rational::from_integer((*c).into()), exp);
        }
        p
    }

    #[test]
    fn long_division() {
        // x^3 + 1 = (x^2 - 1) * x + (x + 1)
        let (q, r) = poly(&[1, 0, 0, 1]).div_rem(&poly(&[-1, 0, 1]));
        assert_eq!(q, poly(&[0, 1]));
        assert_eq!(r, poly(&[1, 1]));
        assert!(poly(&[-1, 0, 1]).div_exact(&poly(&[1, 1])).is_some());
        assert!(poly(&[1, 0, 1]).div_exact(&poly(&[1, 1])).is_none());
    }

    #[test]
    fn finds_rational_roots() {
        // 2x^3 - 3x^2 - 2x = x(2x + 1)(x - 2)
        let roots = poly(&[0, -2, -3, 2]).rational_roots();
        assert_eq!(
            roots,
            vec![rational_of(-1, 2), rational_of(0, 1), rational_of(2, 1)]
        );
        assert!(poly(&[1, 0, 1]).rational_roots().is_empty());
        assert!(poly(&[-2, 0, 1]).rational_roots().is_empty());
    }

    fn rational_of(n: i64, d: i64) -> Rational {
        Rational::new(n.into(), d.into())
    }

    #[test]
    fn normal_form_cancels() {
        let expr = parse_expr("1/(x - 1) - 1/(x + 1) - 2/(x**2 - 1)").unwrap();
        assert!(RationalFunction::from_expr(&expr, "x").unwrap().is_zero());
        let expr = parse_expr("1/(x - 1) - 1/(x + 1)").unwrap();
        assert!(!RationalFunction::from_expr(&expr, "x").unwrap().is_zero());
    }

    #[test]
    fn normal_form_rejects_other_atoms() {
        for text in ["sin(x)", "a*x", "x**(1/2)", "1/(x - x)"] {
            let expr = parse_expr(text).unwrap();
            assert_eq!(RationalFunction::from_expr(&expr, "x"), None, "{text}");
        }
    }

    #[test]
    fn to_expr_is_canonical() {
        assert_eq!(poly(&[1, 0, 1]).to_expr("x"), simplify(parse_expr("x**2 + 1").unwrap()));
        assert_eq!(Polynomial::zero().to_expr("x"), Expr::integer(0));
    }
}
