use crate::calculus::integrate::{IntegralStep, Rule};
use crate::expr::Expr;
use crate::format::expr::pretty;

const INDENT: &str = "  ";

/// Render a derivation trace, one rule per line, sub-derivations indented below their parent.
///
/// ```text
/// Integration by parts: ∫ x*exp(x) dx = x*exp(x) - exp(x)
///   u = x
///   dv = exp(x) dx
///   du = dx
///   v = exp(x)
///   Exponential rule: ∫ exp(x) dx = exp(x)
///   Exponential rule: ∫ exp(x) dx = exp(x)
/// ```
pub fn pretty_steps(step: &IntegralStep) -> String {
    let mut lines = Vec::new();
    write_step(step, 0, &mut lines);
    lines.join("\n")
}

fn write_step(step: &IntegralStep, depth: usize, lines: &mut Vec<String>) {
    let pad = INDENT.repeat(depth);
    let detail = format!("{pad}{INDENT}");
    lines.push(format!(
        "{pad}{}: {} = {}",
        step.rule_name(),
        integral(&step.integrand, &step.variable),
        pretty(&step.result)
    ));

    match &step.rule {
        Rule::Substitution { u_var, u, du, .. } => {
            lines.push(format!("{detail}{u_var} = {}", pretty(u)));
            lines.push(format!("{detail}d{u_var} = {}", differential(du, &step.variable)));
        }
        Rule::Parts { u, dv, du, v_step, .. } => {
            lines.push(format!("{detail}u = {}", pretty(u)));
            lines.push(format!("{detail}dv = {}", differential(dv, &step.variable)));
            lines.push(format!("{detail}du = {}", differential(du, &step.variable)));
            lines.push(format!("{detail}v = {}", pretty(&v_step.result)));
        }
        Rule::Rewrite { rewritten, .. } => {
            lines.push(format!("{detail}rewrite as {}", pretty(rewritten)));
        }
        Rule::PartialFractions { decomposition, .. } => {
            lines.push(format!("{detail}decompose as {}", pretty(decomposition)));
        }
        _ => {}
    }

    for child in step.children() {
        write_step(child, depth + 1, lines);
    }
}

fn integral(integrand: &Expr, var: &str) -> String {
    match integrand {
        Expr::Add(_, _) | Expr::Sub(_, _) => format!("∫ ({}) d{var}", pretty(integrand)),
        other => format!("∫ {} d{var}", pretty(other)),
    }
}

fn differential(expr: &Expr, var: &str) -> String {
    if expr.is_one() {
        format!("d{var}")
    } else {
        match expr {
            Expr::Add(_, _) | Expr::Sub(_, _) => format!("({}) d{var}", pretty(expr)),
            other => format!("{} d{var}", pretty(other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculus::integral_steps;
    use crate::parser::parse_expr;

    #[test]
    fn parts_trace_lists_choices() {
        let expr = parse_expr("x*exp(x)").unwrap();
        let text = pretty_steps(&integral_steps("x", &expr).unwrap());
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(
            lines[..5],
            [
                "Integration by parts: ∫ x*exp(x) dx = x*exp(x) - exp(x)",
                "  u = x",
                "  dv = exp(x) dx",
                "  du = dx",
                "  v = exp(x)",
            ]
        );
        assert_eq!(lines[5], "  Exponential rule: ∫ exp(x) dx = exp(x)");
    }

    #[test]
    fn sums_are_parenthesised() {
        let expr = parse_expr("x + 1").unwrap();
        let text = pretty_steps(&integral_steps("x", &expr).unwrap());
        assert!(text.starts_with("Sum rule: ∫ (x + 1) dx = x**2/2 + x\n"));
        assert!(text.contains("\n  Power rule: ∫ x dx = x**2/2"));
        assert!(text.contains("\n  Constant rule: ∫ 1 dx = x"));
    }

    #[test]
    fn partial_fraction_trace_shows_the_decomposition() {
        let expr = parse_expr("1/(x**2 - 1)").unwrap();
        let text = pretty_steps(&integral_steps("x", &expr).unwrap());
        assert!(text.starts_with("Partial fractions: ∫ 1/(x**2 - 1) dx = "), "{text}");
        assert!(text.contains("\n  decompose as "), "{text}");
    }
}
