use crate::expr::Expr;
use crate::simplify::simplify;
use num_traits::{One, Signed};

use super::steps::{IntegralStep, Rule};

/// `exp(var)` and `c**var` for a positive constant `c != 1`.
pub fn integrate(expr: &Expr, var: &str) -> Option<IntegralStep> {
    match expr {
        Expr::Exp(arg) if arg.as_variable() == Some(var) => Some(IntegralStep::new(
            expr.clone(),
            var,
            expr.clone(),
            Rule::Exp,
        )),
        Expr::Pow(base, exp) if exp.as_variable() == Some(var) => {
            let c = base.as_constant()?;
            if !c.is_positive() || c.is_one() {
                return None;
            }
            let result = simplify(Expr::Div(
                expr.clone().boxed(),
                Expr::Log(base.clone()).boxed(),
            ));
            Some(IntegralStep::new(
                expr.clone(),
                var,
                result,
                Rule::ExpBase {
                    base: (**base).clone(),
                },
            ))
        }
        _ => None,
    }
}

pub fn is_exp(expr: &Expr) -> bool {
    match expr {
        Expr::Exp(_) => true,
        Expr::Pow(base, _) => matches!(**base, Expr::Constant(_)),
        _ => false,
    }
}
