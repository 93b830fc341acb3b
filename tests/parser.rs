use intcalc::{CasError, Expr, parse_expr, pretty};

fn round_trip(input: &str) -> String {
    pretty(&parse_expr(input).expect("parse input"))
}

#[test]
fn python_notation_is_accepted() {
    assert_eq!(round_trip("x**2 + 3*x + 1"), "x**2 + 3*x + 1");
    assert_eq!(round_trip("x*exp(x)"), "x*exp(x)");
    assert_eq!(round_trip("1/(x**2 + 1)"), "1/(x**2 + 1)");
    assert_eq!(round_trip("x*sqrt(x)"), "x*sqrt(x)");
    assert_eq!(round_trip("exp(x)*sin(x)"), "exp(x)*sin(x)");
}

#[test]
fn power_binds_tighter_than_unary_minus() {
    let expr = parse_expr("-x**2").expect("parse");
    assert_eq!(
        expr,
        Expr::Neg(Expr::Pow(Expr::var("x").boxed(), Expr::integer(2).boxed()).boxed())
    );
}

#[test]
fn power_is_right_associative() {
    let expr = parse_expr("2**x**2").expect("parse");
    let Expr::Pow(base, exp) = expr else {
        panic!("expected a power");
    };
    assert_eq!(*base, Expr::integer(2));
    assert!(matches!(*exp, Expr::Pow(_, _)));
}

#[test]
fn function_aliases() {
    assert_eq!(parse_expr("ln(x)").unwrap(), parse_expr("log(x)").unwrap());
    assert_eq!(parse_expr("arctan(x)").unwrap(), parse_expr("atan(x)").unwrap());
    assert_eq!(
        parse_expr("sqrt(x)").unwrap(),
        Expr::Pow(Expr::var("x").boxed(), Expr::constant(1, 2).boxed())
    );
}

#[test]
fn unknown_names_are_symbols() {
    assert_eq!(parse_expr("a*x").unwrap(), Expr::Mul(Expr::var("a").boxed(), Expr::var("x").boxed()));
}

#[test]
fn malformed_input_is_rejected() {
    for input in ["", "   ", "x**", "(x + 1", "x + 1)", "2*/x", "foo(x)", "sin x", "x $ 2"] {
        let err = parse_expr(input).expect_err(input);
        assert!(matches!(err, CasError::Parse(_)), "{input}: {err:?}");
    }
}

#[test]
fn parse_errors_name_the_problem() {
    let err = parse_expr("foo(x)").unwrap_err();
    assert!(err.to_string().contains("unknown function `foo`"), "{err}");
}

#[test]
fn scientific_notation_is_exact() {
    assert_eq!(
        parse_expr("1e3*x").unwrap(),
        Expr::Mul(Expr::integer(1000).boxed(), Expr::var("x").boxed())
    );
    assert_eq!(parse_expr("2.5e-1").unwrap(), Expr::constant(1, 4));
    assert_eq!(parse_expr("3E2").unwrap(), Expr::integer(300));
}

#[test]
fn deep_nesting_is_a_parse_error() {
    for input in [
        format!("{}x{}", "(".repeat(10_000), ")".repeat(10_000)),
        format!("{}x", "-".repeat(20_000)),
        format!("{}x", "-".repeat(500)),
        format!("{}x{}", "sin(".repeat(200), ")".repeat(200)),
    ] {
        let err = parse_expr(&input).expect_err("too deep");
        assert!(matches!(err, CasError::Parse(_)), "{err:?}");
    }
    let err = parse_expr(&format!("{}x", "-".repeat(500))).unwrap_err();
    assert!(err.to_string().contains("nested too deeply"), "{err}");
}
