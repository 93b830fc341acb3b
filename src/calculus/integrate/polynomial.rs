use crate::expr::{Expr, Rational};
use crate::simplify::simplify;
use num_traits::One;

use super::steps::{IntegralStep, Rule};

/// Power rule for `var**n` (`n` rational), with `var**-1 -> log(var)`.
pub fn integrate(expr: &Expr, var: &str) -> Option<IntegralStep> {
    let exponent = match expr {
        Expr::Variable(name) if name == var => Rational::one(),
        Expr::Pow(base, exp) if base.as_variable() == Some(var) => exp.as_constant()?.clone(),
        _ => return None,
    };
    let x = Expr::Variable(var.to_string());

    if exponent == -Rational::one() {
        let result = Expr::Log(x.boxed());
        return Some(IntegralStep::new(expr.clone(), var, result, Rule::Reciprocal));
    }

    let raised = &exponent + Rational::one();
    let result = simplify(Expr::Div(
        Expr::Pow(x.boxed(), Expr::Constant(raised.clone()).boxed()).boxed(),
        Expr::Constant(raised).boxed(),
    ));
    Some(IntegralStep::new(
        expr.clone(),
        var,
        result,
        Rule::Power { exponent },
    ))
}
