//! Expression tree definitions and helpers.

use std::fmt;

use num_bigint::BigInt;
use num_rational::BigRational;
use num_traits::{One, Zero};

pub type Rational = BigRational;

/// Parsed formula over exact rationals.
///
/// The derived `Ord` is the canonical order the simplifier sorts terms and
/// factors by, so the variant order below is significant.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub enum Expr {
    Variable(String),
    Constant(Rational),
    Add(Box<Expr>, Box<Expr>),
    Sub(Box<Expr>, Box<Expr>),
    Mul(Box<Expr>, Box<Expr>),
    Div(Box<Expr>, Box<Expr>),
    Pow(Box<Expr>, Box<Expr>),
    Neg(Box<Expr>),
    Exp(Box<Expr>),
    Log(Box<Expr>),
    Sin(Box<Expr>),
    Cos(Box<Expr>),
    Tan(Box<Expr>),
    Asin(Box<Expr>),
    Acos(Box<Expr>),
    Atan(Box<Expr>),
}

impl Expr {
    pub fn var(name: impl Into<String>) -> Self {
        Expr::Variable(name.into())
    }

    pub fn constant(num: impl Into<BigInt>, den: impl Into<BigInt>) -> Self {
        Expr::Constant(Rational::new(num.into(), den.into()))
    }

    pub fn integer(value: impl Into<BigInt>) -> Self {
        Expr::Constant(Rational::from_integer(value.into()))
    }

    pub fn rational(value: Rational) -> Self {
        Expr::Constant(value)
    }

    pub fn negate(self) -> Self {
        match self {
            Expr::Constant(r) => Expr::Constant(-r),
            Expr::Neg(inner) => *inner,
            other => Expr::Neg(Box::new(other)),
        }
    }

    pub fn is_zero(&self) -> bool {
        matches!(self, Expr::Constant(r) if r.is_zero())
    }

    pub fn is_one(&self) -> bool {
        matches!(self, Expr::Constant(r) if r.is_one())
    }

    pub fn as_variable(&self) -> Option<&str> {
        if let Expr::Variable(name) = self {
            Some(name)
        } else {
            None
        }
    }

    pub fn as_constant(&self) -> Option<&Rational> {
        if let Expr::Constant(c) = self {
            Some(c)
        } else {
            None
        }
    }

    pub fn boxed(self) -> Box<Self> {
        Box::new(self)
    }

    /// Argument of a unary function node (`exp`, `log`, trig and inverse trig).
    pub fn function_arg(&self) -> Option<&Expr> {
        match self {
            Expr::Exp(a)
            | Expr::Log(a)
            | Expr::Sin(a)
            | Expr::Cos(a)
            | Expr::Tan(a)
            | Expr::Asin(a)
            | Expr::Acos(a)
            | Expr::Atan(a) => Some(a),
            _ => None,
        }
    }

    /// Rebuild a unary function node of the same kind around `arg`.
    ///
    /// Non-function nodes are returned unchanged.
    pub fn with_function_arg(&self, arg: Expr) -> Expr {
        match self {
            Expr::Exp(_) => Expr::Exp(arg.boxed()),
            Expr::Log(_) => Expr::Log(arg.boxed()),
            Expr::Sin(_) => Expr::Sin(arg.boxed()),
            Expr::Cos(_) => Expr::Cos(arg.boxed()),
            Expr::Tan(_) => Expr::Tan(arg.boxed()),
            Expr::Asin(_) => Expr::Asin(arg.boxed()),
            Expr::Acos(_) => Expr::Acos(arg.boxed()),
            Expr::Atan(_) => Expr::Atan(arg.boxed()),
            other => other.clone(),
        }
    }

    pub fn function_name(&self) -> Option<&'static str> {
        match self {
            Expr::Exp(_) => Some("exp"),
            Expr::Log(_) => Some("log"),
            Expr::Sin(_) => Some("sin"),
            Expr::Cos(_) => Some("cos"),
            Expr::Tan(_) => Some("tan"),
            Expr::Asin(_) => Some("asin"),
            Expr::Acos(_) => Some("acos"),
            Expr::Atan(_) => Some("atan"),
            _ => None,
        }
    }

    pub fn contains_var(&self, var: &str) -> bool {
        match self {
            Expr::Variable(name) => name == var,
            Expr::Constant(_) => false,
            Expr::Add(a, b)
            | Expr::Sub(a, b)
            | Expr::Mul(a, b)
            | Expr::Div(a, b)
            | Expr::Pow(a, b) => a.contains_var(var) || b.contains_var(var),
            Expr::Neg(a) => a.contains_var(var),
            other => other.function_arg().is_some_and(|a| a.contains_var(var)),
        }
    }

    /// Node count, used to bound transformation work.
    pub fn size(&self) -> usize {
        match self {
            Expr::Variable(_) | Expr::Constant(_) => 1,
            Expr::Add(a, b)
            | Expr::Sub(a, b)
            | Expr::Mul(a, b)
            | Expr::Div(a, b)
            | Expr::Pow(a, b) => 1 + a.size() + b.size(),
            Expr::Neg(a) => 1 + a.size(),
            other => 1 + other.function_arg().map_or(0, Expr::size),
        }
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", crate::format::pretty(self))
    }
}

pub fn zero() -> Expr {
    Expr::Constant(Rational::zero())
}

pub fn one() -> Expr {
    Expr::Constant(Rational::one())
}

pub fn rational(num: i64, den: i64) -> Rational {
    Rational::new(num.into(), den.into())
}

pub fn pow(base: Expr, exp: Expr) -> Expr {
    Expr::Pow(base.boxed(), exp.boxed())
}

pub fn add(a: Expr, b: Expr) -> Expr {
    Expr::Add(a.boxed(), b.boxed())
}

pub fn sub(a: Expr, b: Expr) -> Expr {
    Expr::Sub(a.boxed(), b.boxed())
}

pub fn mul(a: Expr, b: Expr) -> Expr {
    Expr::Mul(a.boxed(), b.boxed())
}

pub fn div(a: Expr, b: Expr) -> Expr {
    Expr::Div(a.boxed(), b.boxed())
}

pub fn neg(a: Expr) -> Expr {
    Expr::Neg(a.boxed())
}
