use intcalc::{Expr, differentiate, is_zero_after_simplification, parse_expr, pretty, simplify_fully};

fn assert_diff_eq(input: &str, expected: &str) {
    let expr = parse_expr(input).expect("parse input");
    let got = differentiate("x", &expr);
    let expected_expr = parse_expr(expected).expect("parse expected");
    let difference = Expr::Sub(got.clone().boxed(), expected_expr.boxed());
    assert!(
        is_zero_after_simplification(&difference),
        "d/dx {input}: got {}, expected {expected}",
        pretty(&simplify_fully(got))
    );
}

#[test]
fn basic_vars_and_constants() {
    assert_diff_eq("x", "1");
    assert_diff_eq("y", "0");
    assert_diff_eq("5", "0");
    assert_diff_eq("a*x", "a");
}

#[test]
fn polynomials_and_products() {
    assert_diff_eq("x**3", "3*x**2");
    assert_diff_eq("2*x**2 + 3*x", "4*x + 3");
    assert_diff_eq("x**3/3 + 3*x**2/2 + x", "x**2 + 3*x + 1");
    assert_diff_eq("x*exp(x)", "exp(x) + x*exp(x)");
    assert_diff_eq("2*x**(5/2)/5", "x*sqrt(x)");
}

#[test]
fn trig_and_exponentials() {
    assert_diff_eq("sin(x)", "cos(x)");
    assert_diff_eq("cos(x)", "-sin(x)");
    assert_diff_eq("exp(x**2)", "2*x*exp(x**2)");
    assert_diff_eq("-log(cos(x))", "tan(x)");
    assert_diff_eq("sin(x) - x*cos(x)", "x*sin(x)");
}

#[test]
fn inverse_trig_and_logs() {
    assert_diff_eq("atan(x)", "1/(x**2 + 1)");
    assert_diff_eq("asin(x)", "1/sqrt(1 - x**2)");
    assert_diff_eq("acos(x)", "-1/sqrt(1 - x**2)");
    assert_diff_eq("x*log(x) - x", "log(x)");
}

#[test]
fn quotients() {
    assert_diff_eq("1/x", "-1/x**2");
    assert_diff_eq("x/(x + 1)", "1/(x + 1)**2");
}

#[test]
fn derivative_is_canonical() {
    let expr = parse_expr("x**2 + 3*x + 1").unwrap();
    assert_eq!(pretty(&simplify_fully(differentiate("x", &expr))), "2*x + 3");
}
