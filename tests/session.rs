use intcalc::session::text::{MENU_PROMPT, PROMPT};
use intcalc::{
    CasError, Config, Exit, Expr, Input, IntegralStep, NativeEngine, Result, Scripted, Session,
    SymbolicEngine, solve,
};

fn run_script(inputs: Vec<Input>) -> (Exit, String, Vec<String>) {
    let source = Scripted::from_inputs(inputs);
    let mut session = Session::new(NativeEngine::new(), source, Vec::new(), &Config::default());
    let exit = session.run().expect("session runs");
    let (_, source, out) = session.into_parts();
    (exit, String::from_utf8(out).expect("utf-8 output"), source.prompts)
}

fn lines(lines: &[&str]) -> Vec<Input> {
    lines.iter().map(|l| Input::Line(l.to_string())).collect()
}

fn solve_text(input: &str) -> String {
    let mut out = Vec::new();
    solve(&NativeEngine::new(), input, "x", &mut out).expect("solve writes");
    String::from_utf8(out).expect("utf-8 output")
}

#[test]
fn header_and_quit() {
    let (exit, out, prompts) = run_script(lines(&["quit"]));
    assert_eq!(exit, Exit::Quit);
    let rule = "=".repeat(70);
    assert!(out.starts_with(&format!(
        "{rule}\n               INDEFINITE INTEGRAL CALCULATOR\n{rule}\n\n"
    )));
    assert!(out.contains("Welcome! Type 'help' for instructions, 'examples' for sample problems.\n"));
    assert!(out.ends_with("\nThank you for using the Indefinite Integral Calculator!\n"));
    assert_eq!(prompts, vec![PROMPT.to_string()]);
}

#[test]
fn quit_words_are_case_insensitive() {
    for word in ["QUIT", "Exit", "q", "  quit  "] {
        let (exit, _, _) = run_script(lines(&[word]));
        assert_eq!(exit, Exit::Quit, "{word}");
    }
}

#[test]
fn blank_lines_are_ignored() {
    let (exit, out, prompts) = run_script(lines(&["", "   ", "exit"]));
    assert_eq!(exit, Exit::Quit);
    assert_eq!(prompts.len(), 3);
    assert!(!out.contains("SOLVING"));
}

#[test]
fn end_of_input_says_goodbye() {
    let (exit, out, _) = run_script(Vec::new());
    assert_eq!(exit, Exit::EndOfInput);
    assert!(out.ends_with("\nThank you for using the Indefinite Integral Calculator!\n"));
}

#[test]
fn interrupt_says_short_goodbye() {
    let (exit, out, _) = run_script(vec![Input::Interrupted]);
    assert_eq!(exit, Exit::Interrupted);
    assert!(out.ends_with("\n\nThank you for using!\n"));
}

#[test]
fn help_is_shown() {
    let (_, out, _) = run_script(lines(&["HELP", "q"]));
    assert!(out.contains("\nHOW TO USE:\n"));
    assert!(out.contains("  2. x*exp(x)           (integration by parts)\n"));
    assert!(out.contains("  • 'quit' or 'exit' - Exit the calculator\n"));
}

#[test]
fn example_menu_solves_the_chosen_problem() {
    let (exit, out, prompts) = run_script(lines(&["examples", "4", "quit"]));
    assert_eq!(exit, Exit::Quit);
    assert!(out.contains("\nEXAMPLE PROBLEMS:\n"));
    assert!(out.contains(" 4. x*exp(x)                  - Integration by parts\n"));
    assert!(out.contains("SOLVING: ∫ (x*exp(x)) dx"));
    assert!(out.contains("∫ (x*exp(x)) dx = x*exp(x) - exp(x) + C"));
    assert_eq!(prompts, vec![PROMPT, MENU_PROMPT, PROMPT]);
}

#[test]
fn example_menu_skips_invalid_choices() {
    for choice in ["", "9", "0", "two"] {
        let (exit, out, _) = run_script(lines(&["examples", choice, "quit"]));
        assert_eq!(exit, Exit::Quit);
        assert!(!out.contains("SOLVING"), "{choice:?}");
    }
}

#[test]
fn end_of_input_inside_the_menu_ends_the_session() {
    let (exit, out, _) = run_script(lines(&["examples"]));
    assert_eq!(exit, Exit::EndOfInput);
    assert!(out.ends_with("Thank you for using the Indefinite Integral Calculator!\n"));

    let mut inputs = lines(&["examples"]);
    inputs.push(Input::Interrupted);
    let (exit, _, _) = run_script(inputs);
    assert_eq!(exit, Exit::Interrupted);
}

#[test]
fn polynomial_report() {
    let out = solve_text("x**2 + 3*x + 1");
    let rule = "-".repeat(70);
    assert!(out.starts_with(&format!("\nSOLVING: ∫ (x**2 + 3*x + 1) dx\n{rule}\n\nRESULT:\n")));
    assert!(out.contains("∫ (x**2 + 3*x + 1) dx = x**3/3 + 3*x**2/2 + x + C\n\n"));
    assert!(out.contains("STEPS:\n"));
    assert!(out.contains("d/dx [x**3/3 + 3*x**2/2 + x] = x**2 + 3*x + 1\n"));
    assert!(out.contains("Verified: derivative matches original integrand\n"));
    assert!(out.ends_with(&format!("{rule}\n")));
    assert!(!out.contains("INTEGRATION BY PARTS"));
}

#[test]
fn parts_report_has_advisory_and_trace() {
    let out = solve_text("x*sin(x)");
    assert!(out.contains("→ This integral likely requires INTEGRATION BY PARTS\n\n"));
    assert!(out.contains("∫ (x*sin(x)) dx = -x*cos(x) + sin(x) + C"));
    assert!(out.contains("STEPS:\n"));
    assert!(out.contains("Integration by parts"));
    assert!(!out.contains("TECHNIQUE USED"));
    assert!(out.contains("Verified: derivative matches original integrand"));
}

#[test]
fn untraced_parts_integral_falls_back_to_the_formula() {
    let out = solve_text("exp(x)*sin(x)");
    assert!(out.contains("→ This integral likely requires INTEGRATION BY PARTS"));
    assert!(!out.contains("STEPS:"));
    assert!(out.contains("TECHNIQUE USED: Integration by Parts\nFormula: ∫ u dv = uv - ∫ v du\n\n"));
    assert!(!out.contains("Suggested choice:"));
    assert!(out.contains("Verified: derivative matches original integrand"));
}

/// Delegates to `NativeEngine` but can never produce a derivation trace.
struct NoTraceEngine(NativeEngine);

impl SymbolicEngine for NoTraceEngine {
    fn parse(&self, text: &str) -> Result<Expr> {
        self.0.parse(text)
    }

    fn integrate(&self, expr: &Expr, var: &str) -> Result<Expr> {
        self.0.integrate(expr, var)
    }

    fn differentiate(&self, expr: &Expr, var: &str) -> Result<Expr> {
        self.0.differentiate(expr, var)
    }

    fn simplify(&self, expr: &Expr) -> Result<Expr> {
        self.0.simplify(expr)
    }

    fn is_zero_after_simplification(&self, expr: &Expr) -> Result<bool> {
        self.0.is_zero_after_simplification(expr)
    }

    fn render_steps(&self, _expr: &Expr, _var: &str) -> Result<Option<IntegralStep>> {
        Err(CasError::Unsupported("no derivation traces".to_string()))
    }

    fn pretty_print(&self, steps: &IntegralStep) -> String {
        self.0.pretty_print(steps)
    }

    fn display(&self, expr: &Expr) -> String {
        self.0.display(expr)
    }

    fn self_check(&self) -> Result<()> {
        self.0.self_check()
    }
}

fn solve_without_trace(input: &str) -> String {
    let mut out = Vec::new();
    solve(&NoTraceEngine(NativeEngine::new()), input, "x", &mut out).expect("solve writes");
    String::from_utf8(out).expect("utf-8 output")
}

#[test]
fn failed_trace_prints_the_suggested_choice() {
    let out = solve_without_trace("x*sin(x)");
    assert!(!out.contains("STEPS:"));
    assert!(out.contains(concat!(
        "TECHNIQUE USED: Integration by Parts\n",
        "Formula: ∫ u dv = uv - ∫ v du\n",
        "\n",
        "Suggested choice:\n",
        "  u = x,     dv = sin(x) dx\n",
        "  du = dx,   v = -cos(x)\n",
        "\n",
    )));
    assert!(out.contains("∫ (x*sin(x)) dx = -x*cos(x) + sin(x) + C"));
    assert!(out.contains("Verified: derivative matches original integrand"));
}

#[test]
fn log_choice_wins_for_x_log_x() {
    let out = solve_without_trace("x*log(x)");
    assert!(out.contains("Suggested choice:\n  u = log(x),     dv = dx\n  du = 1/x dx,    v = x\n\n"));
    assert!(!out.contains("u = x,"));
}

#[test]
fn failed_trace_without_a_pattern_prints_nothing_extra() {
    let out = solve_without_trace("x**2");
    assert!(out.contains("∫ (x**2) dx = x**3/3 + C"));
    assert!(!out.contains("STEPS:"));
    assert!(!out.contains("TECHNIQUE USED"));
    assert!(!out.contains("Suggested choice:"));
    assert!(out.contains("Verified: derivative matches original integrand"));
}

#[test]
fn bad_input_prints_the_error_block() {
    let out = solve_text("x**");
    assert!(out.starts_with("\nERROR: Could not solve integral\nDetails: parse error"));
    assert!(out.contains("Please check your expression syntax.\nType 'help' for usage instructions.\n"));
    assert!(!out.contains("SOLVING"));
}

#[test]
fn non_elementary_integral_is_an_error() {
    let out = solve_text("exp(x**2)");
    assert!(out.contains("SOLVING: ∫ (exp(x**2)) dx"));
    assert!(out.contains("ERROR: Could not solve integral"));
    assert!(!out.contains("RESULT:"));
}

#[test]
fn solving_in_the_loop_adds_a_blank_line() {
    let (_, out, _) = run_script(lines(&["sin(x)", "quit"]));
    let rule = "-".repeat(70);
    assert!(out.contains(&format!("{rule}\n\n\nThank you for using the Indefinite Integral Calculator!\n")));
    assert!(out.contains("∫ (sin(x)) dx = -cos(x) + C"));
}

#[test]
fn menu_selection_matches_typing_the_expression() {
    for (i, example) in intcalc::session::EXAMPLES.iter().enumerate() {
        let index = (i + 1).to_string();
        let (_, by_menu, _) = run_script(lines(&["examples", index.as_str(), "quit"]));
        let (_, typed, _) = run_script(lines(&[example.expr, "quit"]));
        let block = solve_text(example.expr);
        assert!(by_menu.contains(&block), "example {index}");
        assert!(typed.contains(&block), "example {index}");
        assert!(block.contains("Verified: derivative matches original integrand"), "{block}");
    }
}

#[test]
fn division_by_zero_is_not_verified() {
    let out = solve_text("1/0");
    assert!(out.contains("RESULT:"));
    assert!(out.contains("Simplified: "));
    assert!(!out.contains("Verified"));
}

#[test]
fn deeply_nested_input_is_rejected_and_the_loop_continues() {
    let nested = format!("{}x{}", "(".repeat(10_000), ")".repeat(10_000));
    let signs = format!("{}x", "-".repeat(20_000));
    let (exit, out, prompts) = run_script(lines(&[nested.as_str(), signs.as_str(), "x", "quit"]));
    assert_eq!(exit, Exit::Quit);
    assert_eq!(out.matches("\nERROR: Could not solve integral\nDetails: parse error").count(), 2);
    assert!(out.contains("∫ (x) dx = x**2/2 + C"));
    assert_eq!(prompts.len(), 4);
}

#[test]
fn nesting_error_is_explained() {
    let nested = format!("{}x{}", "(".repeat(300), ")".repeat(300));
    let out = solve_text(&nested);
    assert!(out.contains("nested too deeply"), "{out}");
}
