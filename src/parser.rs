//! Text to [`Expr`] parser for Python-style notation (`x**2`, `exp(x)`, `sqrt(x)`).

use crate::error::{CasError, Result};
use crate::expr::{Expr, Rational};
use nom::branch::alt;
use nom::bytes::complete::tag;
use nom::character::complete::{
    alpha1, alphanumeric0, char, digit0, digit1, multispace0, one_of,
};
use nom::combinator::{all_consuming, map_opt, not, opt, recognize};
use nom::error::{ErrorKind, ParseError, VerboseError};
use nom::multi::fold_many0;
use nom::sequence::{delimited, pair, preceded, terminated, tuple};
use nom::IResult;
use num_bigint::BigInt;
use num_traits::{Num, One};

type ParseResult<'a, O> = IResult<&'a str, O, VerboseError<&'a str>>;

/// Names accepted in call position.
pub const FUNCTIONS: [&str; 13] = [
    "sin", "cos", "tan", "asin", "acos", "atan", "arcsin", "arccos", "arctan", "exp", "log",
    "ln", "sqrt",
];

/// Longest accepted input, in characters.
pub const MAX_INPUT_LEN: usize = 2000;

/// Deepest accepted parenthesis nesting; also caps runs of unary signs and the number of
/// power operators, which nest the same way.
pub const MAX_NESTING: usize = 100;

/// Largest |k| accepted in scientific notation `1e<k>`.
const MAX_DECIMAL_EXPONENT: u32 = 1000;

pub fn parse_expr(input: &str) -> Result<Expr> {
    if input.trim().is_empty() {
        return Err(CasError::Parse("empty expression".to_string()));
    }
    check_tokens(input)?;
    match all_consuming(ws(parse_add_sub))(input) {
        Ok((_, expr)) => Ok(expr),
        Err(nom::Err::Error(e)) | Err(nom::Err::Failure(e)) => {
            Err(CasError::Parse(describe_error(input, &e)))
        }
        Err(nom::Err::Incomplete(_)) => {
            Err(CasError::Parse("unexpected end of input".to_string()))
        }
    }
}

/// Lexical checks that give better messages than the combinator errors, and the size
/// limits that keep the recursive parser and simplifier off the end of the stack.
fn check_tokens(input: &str) -> Result<()> {
    let chars: Vec<char> = input.chars().collect();
    if chars.len() > MAX_INPUT_LEN {
        return Err(CasError::Parse(format!(
            "expression too long (more than {MAX_INPUT_LEN} characters)"
        )));
    }
    let too_deep = || Err(CasError::Parse("expression nested too deeply".to_string()));
    let mut depth: i64 = 0;
    let mut signs = 0;
    let mut powers = 0;
    let mut i = 0;
    while i < chars.len() {
        let c = chars[i];
        match c {
            '+' | '-' => signs += 1,
            c if c.is_whitespace() => {}
            _ => signs = 0,
        }
        if signs > MAX_NESTING {
            return too_deep();
        }
        match c {
            '(' => {
                depth += 1;
                if depth > MAX_NESTING as i64 {
                    return too_deep();
                }
            }
            '^' => powers += 1,
            '*' if chars.get(i + 1) == Some(&'*') => {
                powers += 1;
                i += 1;
            }
            ')' => {
                depth -= 1;
                if depth < 0 {
                    return Err(CasError::Parse("unbalanced parentheses".to_string()));
                }
            }
            c if c.is_ascii_alphabetic() => {
                let start = i;
                while i + 1 < chars.len() && chars[i + 1].is_ascii_alphanumeric() {
                    i += 1;
                }
                let name: String = chars[start..=i].iter().collect();
                let mut j = i + 1;
                while j < chars.len() && chars[j].is_whitespace() {
                    j += 1;
                }
                let called = j < chars.len() && chars[j] == '(';
                if called && !FUNCTIONS.contains(&name.as_str()) {
                    return Err(CasError::Parse(format!("unknown function `{name}`")));
                }
            }
            _ => {}
        }
        i += 1;
    }
    if depth != 0 {
        return Err(CasError::Parse("unbalanced parentheses".to_string()));
    }
    if powers > MAX_NESTING {
        return too_deep();
    }
    Ok(())
}

fn describe_error(input: &str, err: &VerboseError<&str>) -> String {
    let Some((rest, _)) = err.errors.iter().min_by_key(|(rest, _)| rest.len()) else {
        return "invalid expression".to_string();
    };
    let trimmed = rest.trim_start();
    match trimmed.chars().next() {
        None => "unexpected end of input".to_string(),
        Some(c) => {
            let column = input.len() - trimmed.len() + 1;
            format!("unexpected `{c}` at column {column}")
        }
    }
}

fn parse_add_sub(input: &str) -> ParseResult<'_, Expr> {
    let (rest, init) = parse_mul_div(input)?;
    fold_many0(
        pair(ws(alt((char('+'), char('-')))), parse_mul_div),
        move || init.clone(),
        |acc, (op, rhs)| match op {
            '+' => Expr::Add(acc.boxed(), rhs.boxed()),
            _ => Expr::Sub(acc.boxed(), rhs.boxed()),
        },
    )(rest)
}

fn parse_mul_div(input: &str) -> ParseResult<'_, Expr> {
    let (rest, init) = parse_unary(input)?;
    fold_many0(
        pair(
            ws(alt((terminated(char('*'), not(char('*'))), char('/')))),
            parse_unary,
        ),
        move || init.clone(),
        |acc, (op, rhs)| match op {
            '*' => Expr::Mul(acc.boxed(), rhs.boxed()),
            _ => Expr::Div(acc.boxed(), rhs.boxed()),
        },
    )(rest)
}

fn parse_unary(input: &str) -> ParseResult<'_, Expr> {
    if let Ok((rest, expr)) = preceded(ws(char('-')), parse_unary)(input) {
        Ok((rest, Expr::Neg(expr.boxed())))
    } else if let Ok((rest, expr)) = preceded(ws(char('+')), parse_unary)(input) {
        Ok((rest, expr))
    } else {
        parse_pow(input)
    }
}

// Right associative, and binds tighter than a leading minus: -x**2 == -(x**2).
fn parse_pow(input: &str) -> ParseResult<'_, Expr> {
    let (rest, base) = parse_primary(input)?;
    if let Ok((next, exp)) = preceded(ws(alt((tag("**"), tag("^")))), parse_unary)(rest) {
        Ok((next, Expr::Pow(base.boxed(), exp.boxed())))
    } else {
        Ok((rest, base))
    }
}

fn parse_primary(input: &str) -> ParseResult<'_, Expr> {
    alt((parse_parens, parse_number, parse_name))(input)
}

fn parse_parens(input: &str) -> ParseResult<'_, Expr> {
    delimited(ws(char('(')), parse_add_sub, ws(char(')')))(input)
}

fn parse_number(input: &str) -> ParseResult<'_, Expr> {
    let decimal = alt((
        recognize(pair(digit1, opt(pair(char('.'), digit0)))),
        recognize(pair(char('.'), digit1)),
    ));
    let exponent = recognize(tuple((one_of("eE"), opt(one_of("+-")), digit1)));
    let number = recognize(pair(decimal, opt(exponent)));
    map_opt(ws(number), |s: &str| number_to_rational(s).map(Expr::Constant))(input)
}

/// Exact value of `123`, `1.25`, `.5` or `2.5e-3`.
fn number_to_rational(text: &str) -> Option<Rational> {
    let (mantissa, exponent) = match text.find(|c: char| c == 'e' || c == 'E') {
        Some(at) => (&text[..at], text[at + 1..].parse::<i64>().ok()?),
        None => (text, 0),
    };
    let value = decimal_to_rational(mantissa)?;
    let magnitude = u32::try_from(exponent.unsigned_abs())
        .ok()
        .filter(|k| *k <= MAX_DECIMAL_EXPONENT)?;
    let scale = Rational::from_integer(num_traits::pow(BigInt::from(10), magnitude as usize));
    Some(if exponent < 0 { value / scale } else { value * scale })
}

fn decimal_to_rational(text: &str) -> Option<Rational> {
    let (int_part, frac_part) = text.split_once('.').unwrap_or((text, ""));
    let int_digits = if int_part.is_empty() { "0" } else { int_part };
    let whole = BigInt::from_str_radix(int_digits, 10).ok()?;
    if frac_part.is_empty() {
        return Some(Rational::from_integer(whole));
    }
    let frac = BigInt::from_str_radix(frac_part, 10).ok()?;
    let scale = num_traits::pow(BigInt::from(10), frac_part.len());
    Some(Rational::from_integer(whole) + Rational::new(frac, scale))
}

fn parse_name(input: &str) -> ParseResult<'_, Expr> {
    let (rest, name) = ws(recognize(pair(alpha1, alphanumeric0)))(input)?;
    let call = delimited(char('('), parse_add_sub, ws(char(')')))(rest);
    match call {
        Ok((after, arg)) => match apply_function(name, arg) {
            Some(expr) => Ok((after, expr)),
            None => Err(nom::Err::Failure(VerboseError::from_error_kind(
                input,
                ErrorKind::Verify,
            ))),
        },
        Err(_) if FUNCTIONS.contains(&name) => Err(nom::Err::Failure(
            VerboseError::from_error_kind(rest, ErrorKind::Char),
        )),
        Err(_) if name == "E" => Ok((rest, Expr::Exp(Expr::Constant(Rational::one()).boxed()))),
        Err(_) => Ok((rest, Expr::Variable(name.to_string()))),
    }
}

fn apply_function(name: &str, arg: Expr) -> Option<Expr> {
    let expr = match name {
        "sin" => Expr::Sin(arg.boxed()),
        "cos" => Expr::Cos(arg.boxed()),
        "tan" => Expr::Tan(arg.boxed()),
        "asin" | "arcsin" => Expr::Asin(arg.boxed()),
        "acos" | "arccos" => Expr::Acos(arg.boxed()),
        "atan" | "arctan" => Expr::Atan(arg.boxed()),
        "exp" => Expr::Exp(arg.boxed()),
        "log" | "ln" => Expr::Log(arg.boxed()),
        "sqrt" => Expr::Pow(arg.boxed(), Expr::constant(1, 2).boxed()),
        _ => return None,
    };
    Some(expr)
}

fn ws<'a, F, O>(inner: F) -> impl FnMut(&'a str) -> ParseResult<'a, O>
where
    F: FnMut(&'a str) -> ParseResult<'a, O>,
{
    delimited(multispace0, inner, multispace0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decimals_become_exact() {
        assert_eq!(decimal_to_rational("0.25"), Some(Rational::new(1.into(), 4.into())));
        assert_eq!(decimal_to_rational(".5"), Some(Rational::new(1.into(), 2.into())));
        assert_eq!(decimal_to_rational("3."), Some(Rational::from_integer(3.into())));
    }

    #[test]
    fn scientific_notation_is_exact() {
        let r = |n: i64, d: i64| Rational::new(n.into(), d.into());
        assert_eq!(number_to_rational("1e3"), Some(r(1000, 1)));
        assert_eq!(number_to_rational("2.5e-1"), Some(r(1, 4)));
        assert_eq!(number_to_rational("1.5E+2"), Some(r(150, 1)));
        assert_eq!(number_to_rational("1e100000"), None);
    }

    #[test]
    fn nesting_is_capped() {
        let deep = |n: usize| format!("{}x{}", "(".repeat(n), ")".repeat(n));
        assert!(check_tokens(&deep(MAX_NESTING)).is_ok());
        assert!(matches!(
            check_tokens(&deep(MAX_NESTING + 1)),
            Err(CasError::Parse(msg)) if msg.contains("nested too deeply")
        ));
        assert!(check_tokens(&format!("{}x", "- ".repeat(MAX_NESTING))).is_ok());
        assert!(check_tokens(&format!("{}x", "-".repeat(MAX_NESTING + 1))).is_err());
        assert!(check_tokens(&format!("x{}", "**x".repeat(MAX_NESTING + 1))).is_err());
        assert!(check_tokens(&"x+".repeat(MAX_INPUT_LEN)).is_err());
    }

    #[test]
    fn token_check_flags_unknown_calls_only() {
        assert!(check_tokens("y*sin(x)").is_ok());
        assert!(matches!(check_tokens("foo(x)"), Err(CasError::Parse(msg)) if msg.contains("foo")));
        assert!(matches!(check_tokens("(x+1"), Err(CasError::Parse(msg)) if msg.contains("unbalanced")));
        assert!(matches!(check_tokens("x)+("), Err(CasError::Parse(_))));
    }
}
