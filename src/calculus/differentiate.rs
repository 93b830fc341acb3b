use crate::expr::{Expr, Rational, one};
use crate::simplify::{simplify, simplify_add, simplify_mul, simplify_neg, simplify_sub};
use num_traits::{One, Zero};

pub fn differentiate(var: &str, expr: &Expr) -> Expr {
    Differentiator { var }.derive(expr)
}

struct Differentiator<'a> {
    var: &'a str,
}

impl<'a> Differentiator<'a> {
    fn derive(&self, expr: &Expr) -> Expr {
        if !expr.contains_var(self.var) {
            return Expr::Constant(Rational::zero());
        }
        match expr {
            Expr::Variable(_) => Expr::Constant(Rational::one()),
            Expr::Constant(_) => Expr::Constant(Rational::zero()),

            Expr::Add(a, b) => simplify_add(self.derive(a), self.derive(b)),
            Expr::Sub(a, b) => simplify_sub(self.derive(a), self.derive(b)),
            Expr::Mul(a, b) => self.product_rule(a, b),
            Expr::Div(a, b) => self.quotient_rule(a, b),
            Expr::Pow(a, b) => self.power_rule(a, b),
            Expr::Neg(a) => simplify_neg(self.derive(a)),

            Expr::Sin(a) => self.chain_rule(a, Expr::Cos(a.clone())),
            Expr::Cos(a) => simplify_neg(self.chain_rule(a, Expr::Sin(a.clone()))),
            Expr::Tan(a) => self.chain_rule(a, reciprocal(square(Expr::Cos(a.clone())))),
            Expr::Exp(a) => self.chain_rule(a, Expr::Exp(a.clone())),
            Expr::Log(a) => self.chain_rule(a, reciprocal((**a).clone())),

            Expr::Asin(a) => self.chain_rule(a, reciprocal(sqrt(one_minus_square(a)))),
            Expr::Acos(a) => {
                simplify_neg(self.chain_rule(a, reciprocal(sqrt(one_minus_square(a)))))
            }
            Expr::Atan(a) => self.chain_rule(
                a,
                reciprocal(Expr::Add(one().boxed(), square((**a).clone()).boxed())),
            ),
        }
    }

    fn product_rule(&self, a: &Expr, b: &Expr) -> Expr {
        let da = self.derive(a);
        let db = self.derive(b);
        simplify_add(
            simplify_mul(da, b.clone()),
            simplify_mul(a.clone(), db),
        )
    }

    fn quotient_rule(&self, a: &Expr, b: &Expr) -> Expr {
        simplify(Expr::Div(
            Expr::Sub(
                Expr::Mul(self.derive(a).boxed(), b.clone().boxed()).boxed(),
                Expr::Mul(a.clone().boxed(), self.derive(b).boxed()).boxed(),
            )
            .boxed(),
            square(b.clone()).boxed(),
        ))
    }

    fn power_rule(&self, base: &Expr, exp: &Expr) -> Expr {
        if !exp.contains_var(self.var) {
            let db = self.derive(base);
            return simplify(Expr::Mul(
                Expr::Mul(
                    exp.clone().boxed(),
                    Expr::Pow(
                        base.clone().boxed(),
                        Expr::Sub(exp.clone().boxed(), one().boxed()).boxed(),
                    )
                    .boxed(),
                )
                .boxed(),
                db.boxed(),
            ));
        }

        // d(f^g) = f^g * (g' * log(f) + g * f' / f)
        let f = Expr::Pow(base.clone().boxed(), exp.clone().boxed());
        let da = self.derive(base);
        let db = self.derive(exp);
        simplify(Expr::Mul(
            f.boxed(),
            Expr::Add(
                Expr::Mul(db.boxed(), Expr::Log(base.clone().boxed()).boxed()).boxed(),
                Expr::Div(
                    Expr::Mul(exp.clone().boxed(), da.boxed()).boxed(),
                    base.clone().boxed(),
                )
                .boxed(),
            )
            .boxed(),
        ))
    }

    fn chain_rule(&self, arg: &Expr, outer: Expr) -> Expr {
        let da = self.derive(arg);
        simplify_mul(da, simplify(outer))
    }
}

fn square(expr: Expr) -> Expr {
    Expr::Pow(expr.boxed(), Expr::integer(2).boxed())
}

fn sqrt(expr: Expr) -> Expr {
    Expr::Pow(expr.boxed(), Expr::constant(1, 2).boxed())
}

fn reciprocal(expr: Expr) -> Expr {
    Expr::Pow(expr.boxed(), Expr::integer(-1).boxed())
}

fn one_minus_square(arg: &Expr) -> Expr {
    Expr::Sub(one().boxed(), square(arg.clone()).boxed())
}
