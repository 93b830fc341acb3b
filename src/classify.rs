//! Structural checks that decide whether to print the integration-by-parts advisory.
//!
//! Containment works like a computer-algebra `has`: a subtree equal to the pattern, or a
//! product whose factor multiset contains every factor of the pattern (so `2*x*exp(x)`
//! contains `x*exp(x)`, but `x**2*exp(x)` does not).

use std::collections::BTreeMap;

use num_traits::{One, Zero};
use tracing::debug;

use crate::expr::{Expr, Rational};

/// Product forms that usually call for integration by parts, in evaluation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PartsPattern {
    XExp,
    XSin,
    XCos,
    Log,
    XSquaredExp,
    XLog,
    ExpSin,
    ExpCos,
}

impl PartsPattern {
    pub const ALL: [PartsPattern; 8] = [
        PartsPattern::XExp,
        PartsPattern::XSin,
        PartsPattern::XCos,
        PartsPattern::Log,
        PartsPattern::XSquaredExp,
        PartsPattern::XLog,
        PartsPattern::ExpSin,
        PartsPattern::ExpCos,
    ];

    /// The pattern as an expression in `var`.
    pub fn expr(self, var: &str) -> Expr {
        let x = || Expr::Variable(var.to_string());
        let mul = |a: Expr, b: Expr| Expr::Mul(a.boxed(), b.boxed());
        match self {
            PartsPattern::XExp => mul(x(), Expr::Exp(x().boxed())),
            PartsPattern::XSin => mul(x(), Expr::Sin(x().boxed())),
            PartsPattern::XCos => mul(x(), Expr::Cos(x().boxed())),
            PartsPattern::Log => Expr::Log(x().boxed()),
            PartsPattern::XSquaredExp => mul(
                Expr::Pow(x().boxed(), Expr::integer(2).boxed()),
                Expr::Exp(x().boxed()),
            ),
            PartsPattern::XLog => mul(x(), Expr::Log(x().boxed())),
            PartsPattern::ExpSin => mul(Expr::Exp(x().boxed()), Expr::Sin(x().boxed())),
            PartsPattern::ExpCos => mul(Expr::Exp(x().boxed()), Expr::Cos(x().boxed())),
        }
    }

    pub fn matches(self, expr: &Expr, var: &str) -> bool {
        has(expr, &self.expr(var))
    }
}

/// A canned `u`/`dv` choice printed when no derivation trace is available.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SuggestedChoice {
    pub pattern: PartsPattern,
    pub u: &'static str,
    pub dv: &'static str,
    pub du: &'static str,
    pub v: &'static str,
}

impl SuggestedChoice {
    /// The two display lines, `dv` and `v` aligned in a column after the `u` cell.
    ///
    /// ```text
    ///   u = x,     dv = exp(x) dx
    ///   du = dx,   v = exp(x)
    /// ```
    pub fn lines(&self) -> [String; 2] {
        let u_cell = format!("u = {},", self.u);
        let du_cell = format!("du = {},", self.du);
        let width = u_cell.chars().count() + 5;
        [
            format!("  {u_cell:<width$}dv = {}", self.dv),
            format!("  {du_cell:<width$}v = {}", self.v),
        ]
    }
}

/// Hints in lookup order; only the first match is shown.
pub const SUGGESTED_CHOICES: [SuggestedChoice; 4] = [
    SuggestedChoice {
        pattern: PartsPattern::XExp,
        u: "x",
        dv: "exp(x) dx",
        du: "dx",
        v: "exp(x)",
    },
    SuggestedChoice {
        pattern: PartsPattern::XSin,
        u: "x",
        dv: "sin(x) dx",
        du: "dx",
        v: "-cos(x)",
    },
    SuggestedChoice {
        pattern: PartsPattern::XCos,
        u: "x",
        dv: "cos(x) dx",
        du: "dx",
        v: "sin(x)",
    },
    SuggestedChoice {
        pattern: PartsPattern::Log,
        u: "log(x)",
        dv: "dx",
        du: "1/x dx",
        v: "x",
    },
];

/// Whether any of the eight patterns occurs in `expr`.
pub fn needs_parts(expr: &Expr, var: &str) -> bool {
    let hit = PartsPattern::ALL.iter().find(|p| p.matches(expr, var));
    if let Some(pattern) = hit {
        debug!(?pattern, "integration by parts pattern matched");
    }
    hit.is_some()
}

/// All patterns occurring in `expr`, in evaluation order.
pub fn matching_patterns(expr: &Expr, var: &str) -> Vec<PartsPattern> {
    PartsPattern::ALL
        .into_iter()
        .filter(|p| p.matches(expr, var))
        .collect()
}

/// First hint whose pattern occurs in `expr`.
pub fn suggested_choice(expr: &Expr, var: &str) -> Option<&'static SuggestedChoice> {
    SUGGESTED_CHOICES
        .iter()
        .find(|choice| choice.pattern.matches(expr, var))
}

/// Subtree containment with product-subset matching.
pub fn has(expr: &Expr, pattern: &Expr) -> bool {
    let pattern_factors = is_product(pattern).then(|| factor_counts(pattern));
    contains(expr, pattern, pattern_factors.as_ref())
}

fn contains(
    expr: &Expr,
    pattern: &Expr,
    pattern_factors: Option<&BTreeMap<Expr, usize>>,
) -> bool {
    if expr == pattern {
        return true;
    }
    if is_product(expr) {
        let factors = factor_counts(expr);
        if let Some(wanted) = pattern_factors {
            let subset = wanted
                .iter()
                .all(|(f, n)| factors.get(f).is_some_and(|have| have >= n));
            if subset {
                return true;
            }
        }
        return factors
            .keys()
            .any(|f| f != expr && contains(f, pattern, pattern_factors));
    }
    children(expr)
        .into_iter()
        .any(|c| contains(c, pattern, pattern_factors))
}

fn is_product(expr: &Expr) -> bool {
    matches!(expr, Expr::Mul(_, _) | Expr::Div(_, _) | Expr::Neg(_))
}

fn children(expr: &Expr) -> Vec<&Expr> {
    match expr {
        Expr::Variable(_) | Expr::Constant(_) => Vec::new(),
        Expr::Add(a, b)
        | Expr::Sub(a, b)
        | Expr::Mul(a, b)
        | Expr::Div(a, b)
        | Expr::Pow(a, b) => vec![a, b],
        Expr::Neg(a) => vec![a],
        other => other.function_arg().into_iter().collect(),
    }
}

/// Factors of a product chain after light flattening: numeric factors fold into one
/// coefficient (dropped when it is 1), repeated bases merge into a single power.
fn factor_counts(expr: &Expr) -> BTreeMap<Expr, usize> {
    let mut coeff = Rational::one();
    let mut powers: BTreeMap<Expr, Rational> = BTreeMap::new();
    let mut opaque: Vec<Expr> = Vec::new();
    collect_factors(expr, false, &mut coeff, &mut powers, &mut opaque);

    let mut counts = BTreeMap::new();
    if !coeff.is_one() {
        *counts.entry(Expr::Constant(coeff)).or_insert(0) += 1;
    }
    for (base, exp) in powers {
        if exp.is_zero() {
            continue;
        }
        let factor = if exp.is_one() {
            base
        } else {
            Expr::Pow(base.boxed(), Expr::Constant(exp).boxed())
        };
        *counts.entry(factor).or_insert(0) += 1;
    }
    for factor in opaque {
        *counts.entry(factor).or_insert(0) += 1;
    }
    counts
}

fn collect_factors(
    expr: &Expr,
    invert: bool,
    coeff: &mut Rational,
    powers: &mut BTreeMap<Expr, Rational>,
    opaque: &mut Vec<Expr>,
) {
    match expr {
        Expr::Mul(a, b) => {
            collect_factors(a, invert, coeff, powers, opaque);
            collect_factors(b, invert, coeff, powers, opaque);
        }
        Expr::Div(a, b) => {
            collect_factors(a, invert, coeff, powers, opaque);
            collect_factors(b, !invert, coeff, powers, opaque);
        }
        Expr::Neg(a) => {
            *coeff = -coeff.clone();
            collect_factors(a, invert, coeff, powers, opaque);
        }
        Expr::Constant(c) if !c.is_zero() => {
            if invert {
                *coeff /= c;
            } else {
                *coeff *= c;
            }
        }
        Expr::Pow(base, exp) if exp.as_constant().is_some() => {
            let e = exp.as_constant().cloned().unwrap_or_else(Rational::one);
            let e = if invert { -e } else { e };
            *powers.entry((**base).clone()).or_insert_with(Rational::zero) += e;
        }
        Expr::Constant(_) => opaque.push(expr.clone()),
        other => {
            let e = if invert { -Rational::one() } else { Rational::one() };
            *powers.entry(other.clone()).or_insert_with(Rational::zero) += e;
        }
    }
}
