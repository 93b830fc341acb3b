use std::collections::BTreeSet;

use num_traits::Signed;

use crate::expr::{Expr, Rational};

/// Substitute variable `var` with `replacement` throughout `expr`.
pub fn substitute(expr: &Expr, var: &str, replacement: &Expr) -> Expr {
    match expr {
        Expr::Variable(name) if name == var => replacement.clone(),
        _ => map_children(expr, |child| substitute(child, var, replacement)),
    }
}

/// Replace every occurrence of the subtree `target` with `replacement`, outermost match first.
pub fn replace(expr: &Expr, target: &Expr, replacement: &Expr) -> Expr {
    if expr == target {
        return replacement.clone();
    }
    map_children(expr, |child| replace(child, target, replacement))
}

/// Rewrite `tan(u)` as `sin(u)/cos(u)` everywhere.
pub fn rewrite_tan(expr: &Expr) -> Expr {
    match expr {
        Expr::Tan(arg) => {
            let arg = rewrite_tan(arg);
            Expr::Div(Expr::Sin(arg.clone().boxed()).boxed(), Expr::Cos(arg.boxed()).boxed())
        }
        _ => map_children(expr, rewrite_tan),
    }
}

/// Rewrite `sin(u)**2` as `(1 - cos(2*u))/2` and `cos(u)**2` as `(1 + cos(2*u))/2`.
pub fn rewrite_trig_squares(expr: &Expr) -> Expr {
    if let Expr::Pow(base, exp) = expr {
        if exp.as_constant().is_some_and(|e| *e == Rational::from_integer(2.into())) {
            let sign = match **base {
                Expr::Sin(_) => Some(-1),
                Expr::Cos(_) => Some(1),
                _ => None,
            };
            if let (Some(sign), Some(arg)) = (sign, base.function_arg()) {
                let arg = rewrite_trig_squares(arg);
                let double = Expr::Cos(Expr::Mul(Expr::integer(2).boxed(), arg.boxed()).boxed());
                return Expr::Div(
                    Expr::Add(
                        Expr::integer(1).boxed(),
                        Expr::Mul(Expr::integer(sign).boxed(), double.boxed()).boxed(),
                    )
                    .boxed(),
                    Expr::integer(2).boxed(),
                );
            }
        }
    }
    map_children(expr, rewrite_trig_squares)
}

/// Whether `expr` divides by an exact zero anywhere (`a/0`, `0**-n`).
pub fn has_zero_denominator(expr: &Expr) -> bool {
    let here = match expr {
        Expr::Div(_, d) => d.is_zero(),
        Expr::Pow(base, exp) => {
            base.is_zero() && exp.as_constant().is_some_and(|e| e.is_negative())
        }
        _ => false,
    };
    here || children(expr).into_iter().any(has_zero_denominator)
}

/// Names of the variables occurring in `expr`.
pub(crate) fn variables(expr: &Expr) -> BTreeSet<String> {
    let mut names = BTreeSet::new();
    let mut stack = vec![expr];
    while let Some(node) = stack.pop() {
        if let Expr::Variable(name) = node {
            names.insert(name.clone());
        }
        stack.extend(children(node));
    }
    names
}

fn children(expr: &Expr) -> Vec<&Expr> {
    match expr {
        Expr::Add(a, b) | Expr::Sub(a, b) | Expr::Mul(a, b) | Expr::Div(a, b) | Expr::Pow(a, b) => {
            vec![a.as_ref(), b.as_ref()]
        }
        Expr::Neg(a) => vec![a.as_ref()],
        other => other.function_arg().into_iter().collect(),
    }
}

/// Rebuild `expr` with `f` applied to each direct child.
pub fn map_children(expr: &Expr, mut f: impl FnMut(&Expr) -> Expr) -> Expr {
    match expr {
        Expr::Variable(_) | Expr::Constant(_) => expr.clone(),
        Expr::Add(a, b) => Expr::Add(f(a).boxed(), f(b).boxed()),
        Expr::Sub(a, b) => Expr::Sub(f(a).boxed(), f(b).boxed()),
        Expr::Mul(a, b) => Expr::Mul(f(a).boxed(), f(b).boxed()),
        Expr::Div(a, b) => Expr::Div(f(a).boxed(), f(b).boxed()),
        Expr::Pow(a, b) => Expr::Pow(f(a).boxed(), f(b).boxed()),
        Expr::Neg(a) => Expr::Neg(f(a).boxed()),
        other => match other.function_arg() {
            Some(arg) => other.with_function_arg(f(arg)),
            None => other.clone(),
        },
    }
}
