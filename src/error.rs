use thiserror::Error;

pub type Result<T> = std::result::Result<T, CasError>;

#[derive(Debug, Error)]
pub enum CasError {
    #[error("parse error: {0}")]
    Parse(String),
    #[error("unsupported operation: {0}")]
    Unsupported(String),
    #[error("no elementary antiderivative found for {expr} ({reason})")]
    NotIntegrable { expr: String, reason: String },
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
