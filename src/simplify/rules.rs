use std::cmp::{Ordering, Reverse};
use std::collections::{BTreeMap, HashMap};

use crate::expr::{Expr, Rational, one, zero};
use num_bigint::BigInt;
use num_traits::{One, Signed, ToPrimitive, Zero};

const DISTRIBUTE_TERM_LIMIT: usize = 64;
const EXPAND_POWER_LIMIT: u32 = 4;
const CONSTANT_POWER_LIMIT: u32 = 1024;
const ROOT_INDEX_LIMIT: u32 = 16;
const SIMPLIFY_ITERATION_LIMIT: usize = 64;

/// One bottom-up canonicalising pass.
pub fn simplify(expr: Expr) -> Expr {
    let mut cache = HashMap::new();
    simplify_cached(expr, &mut cache)
}

fn simplify_cached(expr: Expr, cache: &mut HashMap<Expr, Expr>) -> Expr {
    if let Some(hit) = cache.get(&expr) {
        return hit.clone();
    }

    let key = expr.clone();
    let result = match expr {
        Expr::Add(a, b) => simplify_add(simplify_cached(*a, cache), simplify_cached(*b, cache)),
        Expr::Sub(a, b) => simplify_sub(simplify_cached(*a, cache), simplify_cached(*b, cache)),
        Expr::Mul(a, b) => simplify_mul(simplify_cached(*a, cache), simplify_cached(*b, cache)),
        Expr::Div(a, b) => simplify_div(simplify_cached(*a, cache), simplify_cached(*b, cache)),
        Expr::Pow(a, b) => simplify_pow(simplify_cached(*a, cache), simplify_cached(*b, cache)),
        Expr::Neg(a) => simplify_neg(simplify_cached(*a, cache)),
        e @ (Expr::Variable(_) | Expr::Constant(_)) => e,
        f => match f.function_arg() {
            Some(arg) => {
                let arg = simplify_cached(arg.clone(), cache);
                simplify_function(f.with_function_arg(arg))
            }
            None => f,
        },
    };

    cache.insert(key, result.clone());
    result
}

/// Apply simplification passes until the expression stops changing or we hit the iteration cap.
pub fn simplify_fully(expr: Expr) -> Expr {
    simplify_with_limit(expr, SIMPLIFY_ITERATION_LIMIT)
}

/// Apply simplification passes up to `max_iters`, returning the last value if convergence is not reached.
pub fn simplify_with_limit(expr: Expr, max_iters: usize) -> Expr {
    let mut cache = HashMap::new();
    let mut current = expr;
    for _ in 0..max_iters {
        let next = simplify_pythagorean_once(&simplify_cached(current.clone(), &mut cache), &mut cache);
        if next == current {
            return current;
        }
        current = next;
    }
    current
}

pub fn simplify_add(x: Expr, y: Expr) -> Expr {
    let mut terms = flatten_sum(&x);
    terms.extend(flatten_sum(&y));
    build_sum(terms)
}

pub fn simplify_sub(x: Expr, y: Expr) -> Expr {
    simplify_add(x, simplify_neg(y))
}

pub fn simplify_mul(x: Expr, y: Expr) -> Expr {
    build_product(vec![(x, false), (y, false)])
}

pub fn simplify_div(x: Expr, y: Expr) -> Expr {
    build_product(vec![(x, false), (y, true)])
}

pub fn simplify_neg(expr: Expr) -> Expr {
    match expr {
        Expr::Constant(c) => Expr::Constant(-c),
        other => build_product(vec![(Expr::Constant(-Rational::one()), false), (other, false)]),
    }
}

pub fn simplify_pow(base: Expr, exp: Expr) -> Expr {
    let e = match exp {
        Expr::Constant(e) => e,
        exp => {
            if base == Expr::Exp(one().boxed()) {
                return simplify_function(Expr::Exp(exp.boxed()));
            }
            if base.is_one() {
                return one();
            }
            return Expr::Pow(base.boxed(), exp.boxed());
        }
    };

    if e.is_zero() {
        return one();
    }
    if e.is_one() {
        return base;
    }

    match base {
        Expr::Constant(b) => constant_pow(b, e),
        Expr::Pow(inner, inner_exp) => match *inner_exp {
            Expr::Constant(e0) if e.is_integer() => simplify_pow(*inner, Expr::Constant(e0 * e)),
            other => Expr::Pow(Expr::Pow(inner, other.boxed()).boxed(), Expr::Constant(e).boxed()),
        },
        Expr::Exp(arg) if e.is_integer() => {
            simplify_function(Expr::Exp(simplify_mul(Expr::Constant(e), *arg).boxed()))
        }
        product @ (Expr::Mul(_, _) | Expr::Neg(_)) if e.is_integer() => {
            let factors = product_factors(&product);
            build_product(
                factors
                    .into_iter()
                    .map(|f| (simplify_pow(f, Expr::Constant(e.clone())), false))
                    .collect(),
            )
        }
        sum @ Expr::Add(_, _) if is_small_positive_integer(&e) => {
            let n = e.to_integer().to_u32().unwrap_or(0);
            let terms = count_sum_terms(&sum);
            if terms.saturating_pow(n) > DISTRIBUTE_TERM_LIMIT {
                return Expr::Pow(sum.boxed(), Expr::Constant(e).boxed());
            }
            let mut acc = sum.clone();
            for _ in 1..n {
                acc = simplify_mul(acc, sum.clone());
            }
            acc
        }
        other => Expr::Pow(other.boxed(), Expr::Constant(e).boxed()),
    }
}

fn is_small_positive_integer(e: &Rational) -> bool {
    e.is_integer()
        && e.is_positive()
        && e.to_integer().to_u32().is_some_and(|n| n <= EXPAND_POWER_LIMIT)
}

fn constant_pow(b: Rational, e: Rational) -> Expr {
    if b.is_one() {
        return one();
    }
    if b.is_zero() {
        return if e.is_positive() {
            zero()
        } else {
            Expr::Pow(Expr::Constant(b).boxed(), Expr::Constant(e).boxed())
        };
    }

    let p = e.numer().abs();
    let q = e.denom().clone();
    let root = if q.is_one() {
        Some(b.clone())
    } else {
        exact_root(&b, &q)
    };
    match (root, p.to_u32()) {
        (Some(r), Some(k)) if k <= CONSTANT_POWER_LIMIT => {
            let value = Rational::new(r.numer().pow(k), r.denom().pow(k));
            if e.is_negative() {
                Expr::Constant(value.recip())
            } else {
                Expr::Constant(value)
            }
        }
        _ => Expr::Pow(Expr::Constant(b).boxed(), Expr::Constant(e).boxed()),
    }
}

fn exact_root(value: &Rational, index: &BigInt) -> Option<Rational> {
    let n = index.to_u32().filter(|n| *n <= ROOT_INDEX_LIMIT)?;
    if value.is_negative() {
        return None;
    }
    let num_root = value.numer().nth_root(n);
    let den_root = value.denom().nth_root(n);
    if num_root.pow(n) == *value.numer() && den_root.pow(n) == *value.denom() {
        Some(Rational::new(num_root, den_root))
    } else {
        None
    }
}

/// Evaluate and normalise a function node whose argument is already simplified.
pub fn simplify_function(expr: Expr) -> Expr {
    match expr {
        Expr::Exp(arg) => match *arg {
            x if x.is_zero() => one(),
            Expr::Log(inner) => *inner,
            x => Expr::Exp(x.boxed()),
        },
        Expr::Log(arg) => match *arg {
            x if x.is_one() => zero(),
            Expr::Exp(inner) => *inner,
            x => Expr::Log(x.boxed()),
        },
        Expr::Sin(arg) => odd_function(*arg, Expr::Sin),
        Expr::Tan(arg) => odd_function(*arg, Expr::Tan),
        Expr::Asin(arg) => odd_function(*arg, Expr::Asin),
        Expr::Atan(arg) => odd_function(*arg, Expr::Atan),
        Expr::Cos(arg) => match *arg {
            x if x.is_zero() => one(),
            x if has_negative_lead(&x) => Expr::Cos(simplify_neg(x).boxed()),
            x => Expr::Cos(x.boxed()),
        },
        other => other,
    }
}

fn odd_function(arg: Expr, build: fn(Box<Expr>) -> Expr) -> Expr {
    if arg.is_zero() {
        return zero();
    }
    if has_negative_lead(&arg) {
        return simplify_neg(build(simplify_neg(arg).boxed()));
    }
    build(arg.boxed())
}

fn has_negative_lead(expr: &Expr) -> bool {
    let terms = flatten_sum(expr);
    terms
        .first()
        .is_some_and(|lead| split_term(lead).0.is_negative())
}

pub(crate) fn flatten_sum(expr: &Expr) -> Vec<Expr> {
    match expr {
        Expr::Add(a, b) => {
            let mut out = flatten_sum(a);
            out.extend(flatten_sum(b));
            out
        }
        Expr::Sub(a, b) => {
            let mut out = flatten_sum(a);
            out.extend(flatten_sum(b).into_iter().map(negate_term));
            out
        }
        Expr::Neg(inner) if matches!(**inner, Expr::Add(_, _) | Expr::Sub(_, _)) => {
            flatten_sum(inner).into_iter().map(negate_term).collect()
        }
        other => vec![other.clone()],
    }
}

fn count_sum_terms(expr: &Expr) -> usize {
    match expr {
        Expr::Add(a, b) | Expr::Sub(a, b) => count_sum_terms(a) + count_sum_terms(b),
        _ => 1,
    }
}

fn negate_term(term: Expr) -> Expr {
    let (c, m) = split_term(&term);
    term_from(&-c, m)
}

/// Split a term into its rational coefficient and the remaining monomial.
pub(crate) fn split_term(expr: &Expr) -> (Rational, Expr) {
    match expr {
        Expr::Constant(c) => (c.clone(), one()),
        Expr::Neg(e) => {
            let (c, m) = split_term(e);
            (-c, m)
        }
        Expr::Mul(_, _) => {
            let mut coeff = Rational::one();
            let mut rest = Vec::new();
            for factor in product_factors(expr) {
                match factor {
                    Expr::Constant(c) => coeff *= c,
                    Expr::Neg(inner) => {
                        coeff = -coeff;
                        rest.push(*inner);
                    }
                    other => rest.push(other),
                }
            }
            (coeff, mul_chain(rest))
        }
        other => (Rational::one(), other.clone()),
    }
}

/// Flattened factors of a product chain (`Neg` becomes a `-1` factor).
pub(crate) fn product_factors(expr: &Expr) -> Vec<Expr> {
    match expr {
        Expr::Mul(a, b) => {
            let mut out = product_factors(a);
            out.extend(product_factors(b));
            out
        }
        Expr::Neg(inner) => {
            let mut out = vec![Expr::Constant(-Rational::one())];
            out.extend(product_factors(inner));
            out
        }
        other => vec![other.clone()],
    }
}

pub(crate) fn mul_chain(factors: Vec<Expr>) -> Expr {
    let mut iter = factors.into_iter().filter(|f| !f.is_one());
    let Some(first) = iter.next() else {
        return one();
    };
    iter.fold(first, |acc, item| Expr::Mul(acc.boxed(), item.boxed()))
}

fn add_chain(terms: Vec<Expr>) -> Expr {
    let mut iter = terms.into_iter();
    let Some(first) = iter.next() else {
        return zero();
    };
    iter.fold(first, |acc, item| Expr::Add(acc.boxed(), item.boxed()))
}

fn term_from(coef: &Rational, monomial: Expr) -> Expr {
    if coef.is_zero() {
        return zero();
    }
    if monomial.is_one() {
        return Expr::Constant(coef.clone());
    }
    if coef.is_one() {
        return monomial;
    }
    if *coef == -Rational::one() {
        return Expr::Neg(monomial.boxed());
    }
    Expr::Mul(Expr::Constant(coef.clone()).boxed(), monomial.boxed())
}

/// Total power of plain variables in a monomial, used to order sums.
fn variable_degree(monomial: &Expr) -> Rational {
    product_factors(monomial)
        .iter()
        .map(|f| match f {
            Expr::Variable(_) => Rational::one(),
            Expr::Pow(base, exp) if matches!(**base, Expr::Variable(_)) => {
                exp.as_constant().cloned().unwrap_or_else(Rational::zero)
            }
            _ => Rational::zero(),
        })
        .fold(Rational::zero(), |acc, d| acc + d)
}

fn term_order(a: &Expr, b: &Expr) -> Ordering {
    let key = |m: &Expr| (Reverse(variable_degree(m)), Reverse(m.size()));
    key(a).cmp(&key(b)).then_with(|| a.cmp(b))
}

fn build_sum(terms: Vec<Expr>) -> Expr {
    let mut constant = Rational::zero();
    let mut collected: BTreeMap<Expr, Rational> = BTreeMap::new();
    for term in terms {
        let (c, m) = split_term(&term);
        if c.is_zero() {
            continue;
        }
        if m.is_one() {
            constant += c;
            continue;
        }
        collected
            .entry(m)
            .and_modify(|acc| *acc += &c)
            .or_insert(c);
    }

    let mut items: Vec<(Expr, Rational)> = collected
        .into_iter()
        .filter(|(_, c)| !c.is_zero())
        .collect();
    items.sort_by(|(a, _), (b, _)| term_order(a, b));

    let mut out: Vec<Expr> = items.into_iter().map(|(m, c)| term_from(&c, m)).collect();
    if !constant.is_zero() {
        out.push(Expr::Constant(constant));
    }
    add_chain(out)
}

struct ProductAccumulator {
    coeff: Rational,
    powers: BTreeMap<Expr, Rational>,
    symbolic: Vec<Expr>,
}

impl ProductAccumulator {
    fn new() -> Self {
        Self {
            coeff: Rational::one(),
            powers: BTreeMap::new(),
            symbolic: Vec::new(),
        }
    }

    fn absorb(&mut self, expr: Expr, invert: bool) {
        match expr {
            Expr::Mul(a, b) => {
                self.absorb(*a, invert);
                self.absorb(*b, invert);
            }
            Expr::Div(a, b) => {
                self.absorb(*a, invert);
                self.absorb(*b, !invert);
            }
            Expr::Neg(a) => {
                self.coeff = -self.coeff.clone();
                self.absorb(*a, invert);
            }
            Expr::Constant(c) => {
                if !invert {
                    self.coeff *= c;
                } else if c.is_zero() {
                    self.add_power(Expr::Constant(c), -Rational::one());
                } else {
                    self.coeff /= c;
                }
            }
            Expr::Pow(base, exp) => match *exp {
                Expr::Constant(e) => {
                    let e = if invert { -e } else { e };
                    self.add_power(*base, e);
                }
                other if invert => {
                    self.symbolic
                        .push(Expr::Pow(base, simplify_neg(other).boxed()));
                }
                other => self.symbolic.push(Expr::Pow(base, other.boxed())),
            },
            other => {
                let e = if invert { -Rational::one() } else { Rational::one() };
                self.add_power(other, e);
            }
        }
    }

    fn add_power(&mut self, base: Expr, e: Rational) {
        if let Expr::Constant(c) = &base {
            if e.is_integer() && !(c.is_zero() && e.is_negative()) {
                if let Expr::Constant(value) = constant_pow(c.clone(), e.clone()) {
                    self.coeff *= value;
                    return;
                }
            }
        }
        self.powers
            .entry(base)
            .and_modify(|acc| *acc += &e)
            .or_insert(e);
    }

    /// Merge `exp(a)**k * exp(b)**m` into `exp(k*a + m*b)`.
    fn merge_exponentials(&mut self) {
        let exp_bases: Vec<Expr> = self
            .powers
            .iter()
            .filter(|(base, e)| matches!(base, Expr::Exp(_)) && e.is_integer())
            .map(|(base, _)| base.clone())
            .collect();
        let single_plain = exp_bases.len() == 1
            && self.powers.get(&exp_bases[0]).is_some_and(|e| e.is_one());
        if exp_bases.is_empty() || single_plain {
            return;
        }
        let mut args = Vec::new();
        for base in exp_bases {
            let e = self.powers.remove(&base).unwrap_or_else(Rational::zero);
            if let Expr::Exp(arg) = base {
                args.push(simplify_mul(Expr::Constant(e), *arg));
            }
        }
        let merged = simplify_function(Expr::Exp(build_sum(args).boxed()));
        match merged {
            Expr::Constant(c) => self.coeff *= c,
            other => self.add_power(other, Rational::one()),
        }
    }

    fn finish(mut self) -> Expr {
        self.merge_exponentials();
        if self.coeff.is_zero() {
            return zero();
        }

        let mut factors = Vec::new();
        for (base, e) in std::mem::take(&mut self.powers) {
            if e.is_zero() {
                continue;
            }
            if let (Expr::Constant(c), true) = (&base, e.is_integer()) {
                if let Expr::Constant(value) = constant_pow(c.clone(), e.clone()) {
                    self.coeff *= value;
                    continue;
                }
            }
            if e.is_one() {
                factors.push(base);
            } else {
                factors.push(Expr::Pow(base.boxed(), Expr::Constant(e).boxed()));
            }
        }
        factors.extend(self.symbolic);
        factors.sort();

        if let Some(idx) = factors.iter().position(|f| matches!(f, Expr::Add(_, _))) {
            let sum = factors.remove(idx);
            let terms = flatten_sum(&sum);
            let others_terms: usize = factors
                .iter()
                .filter(|f| matches!(f, Expr::Add(_, _)))
                .map(count_sum_terms)
                .product();
            if terms.len().saturating_mul(others_terms.max(1)) <= DISTRIBUTE_TERM_LIMIT {
                let coeff = Expr::Constant(self.coeff);
                let distributed = terms
                    .into_iter()
                    .map(|term| {
                        let mut items: Vec<(Expr, bool)> =
                            factors.iter().cloned().map(|f| (f, false)).collect();
                        items.push((coeff.clone(), false));
                        items.push((term, false));
                        build_product(items)
                    })
                    .collect();
                return build_sum(distributed);
            }
            factors.insert(idx, sum);
        }

        term_from(&self.coeff, mul_chain(factors))
    }
}

fn build_product(items: Vec<(Expr, bool)>) -> Expr {
    let mut acc = ProductAccumulator::new();
    for (item, invert) in items {
        acc.absorb(item, invert);
    }
    acc.finish()
}

fn simplify_pythagorean_once(expr: &Expr, cache: &mut HashMap<Expr, Expr>) -> Expr {
    let terms = flatten_sum(expr);
    if terms.len() < 2 {
        return expr.clone();
    }
    let Some((merged, (i, j))) = find_pythagorean_pair(&terms) else {
        return expr.clone();
    };
    let rest: Vec<Expr> = terms
        .into_iter()
        .enumerate()
        .filter_map(|(idx, t)| if idx == i || idx == j { None } else { Some(t) })
        .collect();
    simplify_cached(
        add_chain(std::iter::once(merged).chain(rest).collect()),
        cache,
    )
}

/// `c*A*sin(u)**2 + c*A*cos(u)**2` collapses to `c*A`.
fn find_pythagorean_pair(terms: &[Expr]) -> Option<(Expr, (usize, usize))> {
    let split: Vec<(Rational, Option<(Expr, Vec<Expr>, bool)>)> = terms
        .iter()
        .map(|t| {
            let (c, m) = split_term(t);
            (c, squared_trig(&m))
        })
        .collect();

    for (i, (ci, si)) in split.iter().enumerate() {
        let Some((arg_i, rest_i, true)) = si else {
            continue;
        };
        for (j, (cj, sj)) in split.iter().enumerate() {
            let Some((arg_j, rest_j, false)) = sj else {
                continue;
            };
            if ci == cj && arg_i == arg_j && rest_i == rest_j {
                let rest = mul_chain(rest_i.clone());
                return Some((term_from(ci, rest), (i, j)));
            }
        }
    }
    None
}

/// For a monomial containing `sin(u)**2` or `cos(u)**2`, return `(u, other factors, is_sin)`.
fn squared_trig(monomial: &Expr) -> Option<(Expr, Vec<Expr>, bool)> {
    let factors = product_factors(monomial);
    let two = Rational::from_integer(2.into());
    for (idx, factor) in factors.iter().enumerate() {
        if let Expr::Pow(base, exp) = factor {
            if exp.as_constant() != Some(&two) {
                continue;
            }
            let (arg, is_sin) = match &**base {
                Expr::Sin(arg) => ((**arg).clone(), true),
                Expr::Cos(arg) => ((**arg).clone(), false),
                _ => continue,
            };
            let mut rest = factors.clone();
            rest.remove(idx);
            rest.sort();
            return Some((arg, rest, is_sin));
        }
    }
    None
}
