//! The solve pipeline for one integrand: parse, integrate, explain, verify.

use std::io::Write;

use tracing::{debug, info};

use crate::classify::{needs_parts, suggested_choice};
use crate::engine::SymbolicEngine;
use crate::error::{CasError, Result};
use crate::expr::Expr;

use super::text::rule;

/// Solve `∫ text d(var)` and write the report to `out`.
///
/// Engine failures are reported in an error block and the call still succeeds; only write
/// errors on `out` are returned.
pub fn solve<E, W>(engine: &E, text: &str, var: &str, out: &mut W) -> Result<()>
where
    E: SymbolicEngine + ?Sized,
    W: Write,
{
    match solve_report(engine, text, var, out) {
        Err(CasError::Io(err)) => Err(CasError::Io(err)),
        Err(err) => {
            debug!(input = text, error = %err, "solve failed");
            writeln!(out, "\nERROR: Could not solve integral")?;
            writeln!(out, "Details: {err}")?;
            writeln!(out, "Please check your expression syntax.")?;
            writeln!(out, "Type 'help' for usage instructions.")?;
            Ok(())
        }
        Ok(()) => Ok(()),
    }
}

fn solve_report<E, W>(engine: &E, text: &str, var: &str, out: &mut W) -> Result<()>
where
    E: SymbolicEngine + ?Sized,
    W: Write,
{
    let expr = engine.parse(text)?;
    let shown = engine.display(&expr);
    info!(integrand = %shown, "solving");

    writeln!(out, "\nSOLVING: ∫ ({shown}) d{var}")?;
    writeln!(out, "{}", rule())?;

    let by_parts = needs_parts(&expr, var);
    if by_parts {
        writeln!(out, "→ This integral likely requires INTEGRATION BY PARTS")?;
        writeln!(out)?;
    }

    let result = engine.integrate(&expr, var)?;
    let result_text = engine.display(&result);
    writeln!(out, "\nRESULT:")?;
    writeln!(out, "∫ ({shown}) d{var} = {result_text} + C")?;
    writeln!(out)?;

    match engine.render_steps(&expr, var) {
        Ok(Some(steps)) => {
            writeln!(out, "STEPS:")?;
            writeln!(out, "{}", engine.pretty_print(&steps))?;
            writeln!(out)?;
        }
        outcome => {
            if let Err(err) = outcome {
                debug!(error = %err, "no derivation trace");
            }
            if by_parts {
                write_parts_hint(&expr, var, out)?;
            }
        }
    }

    writeln!(out, "VERIFICATION (derivative of result):")?;
    let derivative = engine.differentiate(&result, var)?;
    let simplified = engine.simplify(&derivative)?;
    let simplified_text = engine.display(&simplified);
    writeln!(out, "d/d{var} [{result_text}] = {simplified_text}")?;

    let difference = Expr::Sub(simplified.boxed(), expr.boxed());
    if engine.is_zero_after_simplification(&difference)? {
        writeln!(out, "Verified: derivative matches original integrand")?;
    } else {
        writeln!(out, "Simplified: {simplified_text}")?;
    }
    writeln!(out, "{}", rule())?;
    Ok(())
}

fn write_parts_hint(expr: &Expr, var: &str, out: &mut impl Write) -> Result<()> {
    writeln!(out, "TECHNIQUE USED: Integration by Parts")?;
    writeln!(out, "Formula: ∫ u dv = uv - ∫ v du")?;
    writeln!(out)?;
    if let Some(choice) = suggested_choice(expr, var) {
        writeln!(out, "Suggested choice:")?;
        for line in choice.lines() {
            writeln!(out, "{line}")?;
        }
    }
    writeln!(out)?;
    Ok(())
}
