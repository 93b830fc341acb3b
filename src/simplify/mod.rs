//! Canonicalising simplifier and substitution utilities.

mod rules;
mod substitute;

pub use rules::{
    simplify, simplify_add, simplify_div, simplify_fully, simplify_function, simplify_mul,
    simplify_neg, simplify_pow, simplify_sub, simplify_with_limit,
};
pub(crate) use rules::{flatten_sum, mul_chain, product_factors, split_term};
pub use substitute::{
    has_zero_denominator, map_children, replace, rewrite_tan, rewrite_trig_squares, substitute,
};

use crate::expr::Expr;
use crate::polynomial::RationalFunction;

/// Zero test used for verification.
///
/// `tan` is rewritten in terms of `sin`/`cos` first so that trigonometric identities can
/// cancel. A remainder that is still nonzero gets two more chances: squares of `sin`/`cos`
/// are reduced to double angles, and a rational function of a single variable is brought
/// over a common denominator. Anything dividing by an exact zero is never zero.
pub fn is_zero_after_simplification(expr: &Expr) -> bool {
    let rewritten = rewrite_tan(expr);
    if has_zero_denominator(&rewritten) {
        return false;
    }
    let simplified = simplify_fully(rewritten);
    if has_zero_denominator(&simplified) {
        return false;
    }
    if simplified.is_zero() {
        return true;
    }

    let reduced = simplify_fully(rewrite_trig_squares(&simplified));
    if reduced.is_zero() {
        return true;
    }
    let names = substitute::variables(&reduced);
    match names.iter().next() {
        Some(var) if names.len() == 1 => {
            RationalFunction::from_expr(&reduced, var).is_some_and(|f| f.is_zero())
        }
        _ => false,
    }
}
