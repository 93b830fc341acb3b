use crate::expr::{Expr, Rational};
use num_traits::{One, Signed, Zero};

const ADD: u8 = 1;
const MUL: u8 = 2;
const POW: u8 = 3;

/// Render an expression in Python/SymPy notation (`x**3/3 + 3*x**2/2 + x`).
pub fn pretty(expr: &Expr) -> String {
    pp(0, expr)
}

fn pp(ctx: u8, expr: &Expr) -> String {
    match expr {
        Expr::Variable(v) => v.clone(),
        Expr::Constant(r) => show_constant(ctx, r),
        Expr::Add(_, _) | Expr::Sub(_, _) => bracket(ctx, ADD, show_sum(expr)),
        Expr::Mul(_, _) | Expr::Div(_, _) | Expr::Neg(_) => show_product(ctx, expr),
        Expr::Pow(base, exp) => match exp.as_constant() {
            Some(r) if *r == Rational::new(1.into(), 2.into()) => {
                format!("sqrt({})", pp(0, base))
            }
            Some(r) if r.is_negative() => show_product(ctx, expr),
            _ => bracket(
                ctx,
                POW,
                format!("{}**{}", pp(POW + 1, base), show_exponent(exp)),
            ),
        },
        other => {
            let name = other.function_name().unwrap_or("?");
            let arg = other.function_arg().map(|a| pp(0, a)).unwrap_or_default();
            format!("{name}({arg})")
        }
    }
}

fn show_exponent(exp: &Expr) -> String {
    match exp {
        Expr::Constant(r) if r.is_integer() && !r.is_negative() => r.numer().to_string(),
        Expr::Constant(r) => format!("({})", show_rational(r)),
        other => pp(POW + 1, other),
    }
}

fn show_sum(expr: &Expr) -> String {
    let mut terms = Vec::new();
    collect_terms(expr, false, &mut terms);
    let mut out = String::new();
    for (idx, (negated, term)) in terms.iter().enumerate() {
        let (negative, body) = signed_term(term, *negated);
        if idx == 0 {
            if negative {
                out.push('-');
            }
        } else {
            out.push_str(if negative { " - " } else { " + " });
        }
        out.push_str(&body);
    }
    out
}

fn collect_terms(expr: &Expr, negated: bool, out: &mut Vec<(bool, Expr)>) {
    match expr {
        Expr::Add(a, b) => {
            collect_terms(a, negated, out);
            collect_terms(b, negated, out);
        }
        Expr::Sub(a, b) => {
            collect_terms(a, negated, out);
            collect_terms(b, !negated, out);
        }
        other => out.push((negated, other.clone())),
    }
}

/// Split a summand into its sign and the text of its magnitude.
fn signed_term(term: &Expr, negated: bool) -> (bool, String) {
    match term {
        Expr::Mul(_, _) | Expr::Div(_, _) | Expr::Neg(_) => {
            let mut parts = ProductParts::collect(term);
            let negative = parts.negative ^ negated;
            parts.negative = false;
            (negative, parts.render(ADD))
        }
        Expr::Pow(_, exp) if exp.as_constant().is_some_and(|r| r.is_negative()) => {
            let parts = ProductParts::collect(term);
            (negated, parts.render(ADD))
        }
        Expr::Constant(r) if r.is_negative() => (!negated, show_constant(ADD, &-r.clone())),
        other => (negated, pp(ADD, other)),
    }
}

/// A product split into sign, rational coefficient, numerator and denominator factors.
struct ProductParts {
    negative: bool,
    coeff: Rational,
    num: Vec<Expr>,
    den: Vec<Expr>,
}

impl ProductParts {
    fn collect(expr: &Expr) -> Self {
        let mut parts = ProductParts {
            negative: false,
            coeff: Rational::one(),
            num: Vec::new(),
            den: Vec::new(),
        };
        parts.push(expr, false);
        parts
    }

    fn push(&mut self, expr: &Expr, invert: bool) {
        match expr {
            Expr::Mul(a, b) => {
                self.push(a, invert);
                self.push(b, invert);
            }
            Expr::Div(a, b) => {
                self.push(a, invert);
                self.push(b, !invert);
            }
            Expr::Neg(a) => {
                self.negative = !self.negative;
                self.push(a, invert);
            }
            Expr::Constant(c) => {
                if c.is_negative() {
                    self.negative = !self.negative;
                }
                let c = c.abs();
                if invert {
                    if c.is_zero() {
                        self.den.push(Expr::Constant(c));
                    } else {
                        self.coeff /= c;
                    }
                } else {
                    self.coeff *= c;
                }
            }
            Expr::Pow(base, exp) if exp.as_constant().is_some_and(|r| r.is_negative()) => {
                let flipped = match exp.as_constant() {
                    Some(r) if (-r).is_one() => (**base).clone(),
                    Some(r) => Expr::Pow(base.clone(), Expr::Constant(-r).boxed()),
                    None => expr.clone(),
                };
                if invert {
                    self.num.push(flipped);
                } else {
                    self.den.push(flipped);
                }
            }
            other => {
                if invert {
                    self.den.push(other.clone());
                } else {
                    self.num.push(other.clone());
                }
            }
        }
    }

    fn render(&self, ctx: u8) -> String {
        let simple = !self.negative && self.coeff.is_one() && self.den.is_empty();
        if simple && self.num.len() == 1 {
            return pp(ctx, &self.num[0]);
        }

        let mut num_items = Vec::new();
        if !self.coeff.numer().is_one() || self.num.is_empty() {
            num_items.push(self.coeff.numer().to_string());
        }
        num_items.extend(self.num.iter().map(|f| pp(MUL, f)));

        let mut den_items = Vec::new();
        if !self.coeff.denom().is_one() {
            den_items.push(self.coeff.denom().to_string());
        }
        den_items.extend(self.den.iter().map(|f| pp(MUL, f)));

        let mut body = num_items.join("*");
        match den_items.len() {
            0 => {}
            1 => {
                body.push('/');
                body.push_str(&den_items[0]);
            }
            _ => {
                body.push_str("/(");
                body.push_str(&den_items.join("*"));
                body.push(')');
            }
        }
        if self.negative {
            body.insert(0, '-');
        }

        let single = num_items.len() == 1 && den_items.is_empty() && !self.negative;
        if single {
            body
        } else {
            bracket(ctx, MUL, body)
        }
    }
}

fn show_product(ctx: u8, expr: &Expr) -> String {
    ProductParts::collect(expr).render(ctx)
}

fn bracket(ctx: u8, prec: u8, body: String) -> String {
    if prec < ctx {
        format!("({body})")
    } else {
        body
    }
}

fn show_constant(ctx: u8, r: &Rational) -> String {
    let body = show_rational(r);
    if ctx > MUL && (r.is_negative() || !r.is_integer()) {
        format!("({body})")
    } else {
        body
    }
}

fn show_rational(r: &Rational) -> String {
    if r.is_integer() {
        format!("{}", r.numer())
    } else {
        format!("{}/{}", r.numer(), r.denom())
    }
}
