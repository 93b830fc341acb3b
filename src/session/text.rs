//! Fixed presentation text: header, help screen, example menu and farewells.

use std::io::Write;

use crate::error::Result;

pub const RULE_WIDTH: usize = 70;

pub const PROMPT: &str = "Enter integrand (∫ ___ dx): ";
pub const MENU_PROMPT: &str = "Enter example number to try (or press Enter to skip): ";

pub const QUIT_WORDS: [&str; 3] = ["quit", "exit", "q"];
pub const HELP_WORD: &str = "help";
pub const EXAMPLES_WORD: &str = "examples";

pub const FAREWELL: &str = "Thank you for using the Indefinite Integral Calculator!";
pub const INTERRUPT_FAREWELL: &str = "Thank you for using!";

/// A built-in example problem: integrand text and a short description.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Example {
    pub expr: &'static str,
    pub description: &'static str,
}

pub const EXAMPLES: [Example; 7] = [
    Example { expr: "x**2 + 3*x + 1", description: "Basic polynomial" },
    Example { expr: "sin(x)", description: "Trig function" },
    Example { expr: "exp(x)", description: "Exponential function" },
    Example { expr: "x*exp(x)", description: "Integration by parts" },
    Example { expr: "x*sin(x)", description: "Integration by parts" },
    Example { expr: "1/(x**2 + 1)", description: "Inverse trigonometric" },
    Example { expr: "x*sqrt(x)", description: "Power rule" },
];

const HELP: &str = "
HOW TO USE:
{rule}
Enter the expression using standard Python mathematical notation:
  - Powers: x**2, x**3
  - Trigonometric: sin(x), cos(x), tan(x)
  - Exponential: exp(x) for e^x
  - Logarithm: log(x) for ln(x)
  - Square root: sqrt(x)
  - Multiplication: x*sin(x), 2*x

EXAMPLES:
  1. x**2 + 3*x + 1
  2. x*exp(x)           (integration by parts)
  3. x*sin(x)           (integration by parts)
  4. log(x)             (integration by parts)
  5. exp(x)*sin(x)
  6. 1/(x**2 + 1)

COMMANDS:
  • 'help' - Show this help message
  • 'examples' - Load example problems
  • 'quit' or 'exit' - Exit the calculator
{rule}
";

pub fn rule() -> String {
    "-".repeat(RULE_WIDTH)
}

pub fn write_header(out: &mut impl Write) -> Result<()> {
    let banner = "=".repeat(RULE_WIDTH);
    writeln!(out, "{banner}")?;
    writeln!(out, "{}INDEFINITE INTEGRAL CALCULATOR", " ".repeat(15))?;
    writeln!(out, "{banner}")?;
    writeln!(out)?;
    writeln!(
        out,
        "Welcome! Type 'help' for instructions, 'examples' for sample problems."
    )?;
    writeln!(out, "Type 'quit' or 'exit' to close the calculator.\n")?;
    Ok(())
}

pub fn write_help(out: &mut impl Write) -> Result<()> {
    write!(out, "{}", HELP.replace("{rule}", &rule()))?;
    writeln!(out)?;
    Ok(())
}

pub fn write_menu(out: &mut impl Write) -> Result<()> {
    writeln!(out, "\nEXAMPLE PROBLEMS:")?;
    writeln!(out, "{}", rule())?;
    for (i, example) in EXAMPLES.iter().enumerate() {
        writeln!(
            out,
            "{:2}. {:<25} - {}",
            i + 1,
            example.expr,
            example.description
        )?;
    }
    writeln!(out, "{}", rule())?;
    Ok(())
}

/// Map the menu answer to an example; anything but a number in `1..=7` selects nothing.
pub fn select_example(choice: &str) -> Option<&'static Example> {
    let choice = choice.trim();
    if choice.is_empty() || !choice.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    let index: usize = choice.parse().ok()?;
    index.checked_sub(1).and_then(|i| EXAMPLES.get(i))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn menu_lines_are_padded() {
        let mut out = Vec::new();
        write_menu(&mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains(" 1. x**2 + 3*x + 1            - Basic polynomial\n"));
        assert!(text.contains(" 7. x*sqrt(x)                 - Power rule\n"));
    }

    #[test]
    fn help_ends_with_blank_line() {
        let mut out = Vec::new();
        write_help(&mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.starts_with("\nHOW TO USE:\n"));
        assert!(text.ends_with(&format!("{}\n\n", rule())));
    }

    #[test]
    fn selection_accepts_only_listed_numbers() {
        assert_eq!(select_example("4").map(|e| e.expr), Some("x*exp(x)"));
        assert_eq!(select_example(" 7 ").map(|e| e.expr), Some("x*sqrt(x)"));
        assert!(select_example("0").is_none());
        assert!(select_example("8").is_none());
        assert!(select_example("-1").is_none());
        assert!(select_example("two").is_none());
        assert!(select_example("").is_none());
        assert!(select_example("99999999999999999999999").is_none());
    }
}
