//! Calculus routines (differentiation and integration).

pub mod differentiate;
pub mod integrate;

pub use differentiate::differentiate;
pub use integrate::{
    AttemptStatus, IntegralStep, IntegrandKind, IntegrandReport, IntegrationAttempt,
    IntegrationResult, NonElementaryKind, ReasonCode, Rule, Strategy, integral_steps, integrate,
};
