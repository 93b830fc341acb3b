//! Interactive indefinite-integral calculator: a small computer algebra core (parser,
//! simplifier, differentiation, traced integration) and the command loop around it.

pub mod calculus;
pub mod classify;
pub mod config;
pub mod engine;
pub mod error;
pub mod expr;
pub mod format;
pub mod parser;
pub mod polynomial;
pub mod session;
pub mod simplify;

pub use calculus::{
    AttemptStatus, IntegralStep, IntegrandKind, IntegrandReport, IntegrationAttempt,
    IntegrationResult, NonElementaryKind, ReasonCode, Rule, Strategy, differentiate,
    integral_steps, integrate,
};
pub use classify::{PartsPattern, SuggestedChoice, has, needs_parts, suggested_choice};
pub use config::Config;
pub use engine::{NativeEngine, SymbolicEngine};
pub use error::{CasError, Result};
pub use expr::{Expr, Rational, add, div, mul, neg, one, pow, rational, sub, zero};
pub use format::{pretty, pretty_integration_result, pretty_steps};
pub use parser::parse_expr;
pub use session::{Exit, Input, LineSource, Scripted, Session, Terminal, solve};
pub use simplify::{
    is_zero_after_simplification, simplify, simplify_fully, simplify_with_limit, substitute,
};
