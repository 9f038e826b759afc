use thiserror::Error;

/// Error type for identifier and bearer token generation.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TokenError {
    #[error("Entropy source unavailable: {0}")]
    EntropyUnavailable(String),
}
