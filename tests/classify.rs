use intcalc::classify::SUGGESTED_CHOICES;
use intcalc::{PartsPattern, has, needs_parts, parse_expr, suggested_choice};

fn parts(input: &str) -> bool {
    needs_parts(&parse_expr(input).expect("parse input"), "x")
}

#[test]
fn product_patterns_trigger_the_advisory() {
    for input in [
        "x*exp(x)",
        "exp(x)*x",
        "2*x*exp(x)",
        "x*sin(x)",
        "x*cos(x)",
        "log(x)",
        "x**2*exp(x)",
        "x*log(x)",
        "exp(x)*sin(x)",
        "exp(x)*cos(x)",
        "x*sin(x) + 1",
        "log(x) + x**2",
    ] {
        assert!(parts(input), "{input} should need parts");
    }
}

#[test]
fn other_shapes_do_not() {
    for input in [
        "x**2 + 3*x + 1",
        "sin(x)",
        "exp(x)",
        "1/(x**2 + 1)",
        "x*sqrt(x)",
        "x**3*exp(x)",
        "x*exp(2*x)",
        "sin(x)*cos(x)",
    ] {
        assert!(!parts(input), "{input} should not need parts");
    }
}

#[test]
fn containment_matches_subtrees_and_factor_subsets() {
    let pattern = parse_expr("x*exp(x)").unwrap();
    assert!(has(&parse_expr("3*x*exp(x)*sin(x)").unwrap(), &pattern));
    assert!(has(&parse_expr("cos(x*exp(x))").unwrap(), &pattern));
    assert!(!has(&parse_expr("x**2*exp(x)").unwrap(), &pattern));
}

#[test]
fn suggested_choice_follows_lookup_order() {
    let choice = |input: &str| suggested_choice(&parse_expr(input).unwrap(), "x").map(|c| c.pattern);
    assert_eq!(choice("x*exp(x)"), Some(PartsPattern::XExp));
    assert_eq!(choice("x*sin(x)"), Some(PartsPattern::XSin));
    assert_eq!(choice("x*cos(x)"), Some(PartsPattern::XCos));
    assert_eq!(choice("log(x)"), Some(PartsPattern::Log));
    assert_eq!(choice("x*log(x)"), Some(PartsPattern::Log));
    assert_eq!(choice("exp(x)*sin(x)"), None);

    let hint = suggested_choice(&parse_expr("x*exp(x)").unwrap(), "x").unwrap();
    assert_eq!(hint.lines(), ["  u = x,     dv = exp(x) dx", "  du = dx,   v = exp(x)"]);
}

#[test]
fn hint_lines_are_built_from_the_choice() {
    let lines: Vec<[String; 2]> = SUGGESTED_CHOICES.iter().map(|c| c.lines()).collect();
    assert_eq!(lines[1], ["  u = x,     dv = sin(x) dx", "  du = dx,   v = -cos(x)"]);
    assert_eq!(lines[2], ["  u = x,     dv = cos(x) dx", "  du = dx,   v = sin(x)"]);
    assert_eq!(lines[3], ["  u = log(x),     dv = dx", "  du = 1/x dx,    v = x"]);
    for choice in &SUGGESTED_CHOICES {
        let [first, second] = choice.lines();
        assert!(first.contains(&format!("u = {},", choice.u)));
        assert!(first.ends_with(&format!("dv = {}", choice.dv)));
        assert!(second.contains(&format!("du = {},", choice.du)));
        assert!(second.ends_with(&format!("v = {}", choice.v)));
        assert_eq!(first.find("dv = "), second.find("v = "));
    }
}

#[test]
fn all_matching_patterns_are_listed_in_order() {
    let expr = parse_expr("x*log(x) + x*exp(x)").unwrap();
    assert_eq!(
        intcalc::classify::matching_patterns(&expr, "x"),
        vec![PartsPattern::XExp, PartsPattern::Log, PartsPattern::XLog]
    );
}
