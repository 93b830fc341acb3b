//! Formatting helpers for rendering expressions, integration reports and derivation traces.

pub mod expr;
pub mod integrate;
pub mod steps;

pub use expr::pretty;
pub use integrate::pretty_integration_result;
pub use steps::pretty_steps;
