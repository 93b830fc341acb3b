//! The symbolic capabilities the calculator needs, behind one narrow trait.

use tracing::{debug, trace};

use crate::calculus::{IntegralStep, IntegrationResult, ReasonCode, differentiate, integral_steps};
use crate::calculus::integrate::describe_reason;
use crate::error::{CasError, Result};
use crate::expr::Expr;
use crate::format::{pretty, pretty_integration_result, pretty_steps};
use crate::parser::parse_expr;
use crate::simplify::{is_zero_after_simplification, simplify_fully};

/// Parse, integrate, differentiate, simplify, zero-test and trace expressions.
///
/// The session only talks to this trait, so a different algebra backend can be plugged in
/// without touching the command loop.
pub trait SymbolicEngine {
    fn parse(&self, text: &str) -> Result<Expr>;
    fn integrate(&self, expr: &Expr, var: &str) -> Result<Expr>;
    fn differentiate(&self, expr: &Expr, var: &str) -> Result<Expr>;
    fn simplify(&self, expr: &Expr) -> Result<Expr>;
    fn is_zero_after_simplification(&self, expr: &Expr) -> Result<bool>;
    /// Derivation trace for `∫ expr d(var)`; `Ok(None)` when none can be produced.
    fn render_steps(&self, expr: &Expr, var: &str) -> Result<Option<IntegralStep>>;
    fn pretty_print(&self, steps: &IntegralStep) -> String;
    fn display(&self, expr: &Expr) -> String;
    /// Startup check that the engine is usable at all.
    fn self_check(&self) -> Result<()>;
}

/// The in-process engine built on this crate's parser, simplifier and calculus modules.
#[derive(Debug, Default, Clone, Copy)]
pub struct NativeEngine;

impl NativeEngine {
    pub fn new() -> Self {
        Self
    }
}

impl SymbolicEngine for NativeEngine {
    fn parse(&self, text: &str) -> Result<Expr> {
        parse_expr(text)
    }

    fn integrate(&self, expr: &Expr, var: &str) -> Result<Expr> {
        let outcome = crate::calculus::integrate(var, expr);
        for line in pretty_integration_result(&outcome) {
            trace!("{line}");
        }
        match outcome {
            IntegrationResult::Integrated { result, .. } => Ok(result),
            IntegrationResult::NotIntegrable(report) => {
                let reason = report.reason.unwrap_or(ReasonCode::UnknownStructure);
                debug!(integrand = %expr, ?reason, "integration failed");
                Err(CasError::NotIntegrable {
                    expr: pretty(expr),
                    reason: describe_reason(&reason),
                })
            }
        }
    }

    fn differentiate(&self, expr: &Expr, var: &str) -> Result<Expr> {
        Ok(differentiate(var, expr))
    }

    fn simplify(&self, expr: &Expr) -> Result<Expr> {
        Ok(simplify_fully(expr.clone()))
    }

    fn is_zero_after_simplification(&self, expr: &Expr) -> Result<bool> {
        Ok(is_zero_after_simplification(expr))
    }

    fn render_steps(&self, expr: &Expr, var: &str) -> Result<Option<IntegralStep>> {
        Ok(integral_steps(var, expr))
    }

    fn pretty_print(&self, steps: &IntegralStep) -> String {
        pretty_steps(steps)
    }

    fn display(&self, expr: &Expr) -> String {
        pretty(expr)
    }

    fn self_check(&self) -> Result<()> {
        let sample = self.parse("x**2")?;
        let antiderivative = self.integrate(&sample, "x")?;
        let derivative = self.differentiate(&antiderivative, "x")?;
        let difference = Expr::Sub(derivative.boxed(), sample.boxed());
        if self.is_zero_after_simplification(&difference)? {
            Ok(())
        } else {
            Err(CasError::Unsupported(
                "symbolic engine failed its startup self-check".to_string(),
            ))
        }
    }
}
