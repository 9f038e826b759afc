use auth::AuthenticationError;
use auth::PasswordError;
use auth::TokenError;
use thiserror::Error;

use crate::context::ContextError;

/// Validation rule that a candidate field violated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rule {
    Required,
    Email,
    Alphanumeric,
    Min(usize),
    Max(usize),
}

impl Rule {
    /// Short rule tag, as used in validation rule lists.
    pub fn tag(&self) -> &'static str {
        match self {
            Rule::Required => "required",
            Rule::Email => "email",
            Rule::Alphanumeric => "alphanum",
            Rule::Min(_) => "min",
            Rule::Max(_) => "max",
        }
    }

    /// Human-readable message for a violation of this rule on `field`.
    ///
    /// Rules without a dedicated message fall back to "validation failed".
    pub fn describe(&self, field: &str) -> String {
        match self {
            Rule::Required => format!("{} is required", field),
            Rule::Email => format!("{} must be a valid email address", field),
            Rule::Min(min) => format!("{} must be at least {} characters long", field, min),
            Rule::Max(max) => format!("{} must be no more than {} characters long", field, max),
            Rule::Alphanumeric => "validation failed".to_string(),
        }
    }

    /// Whether `describe` produces a field-specific message.
    pub fn has_message(&self) -> bool {
        !matches!(self, Rule::Alphanumeric)
    }
}

/// Structural validation failure for a single field.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
#[error("{}", .rule.describe(.field))]
pub struct ValidationError {
    pub field: &'static str,
    pub rule: Rule,
}

impl ValidationError {
    pub fn new(field: &'static str, rule: Rule) -> Self {
        Self { field, rule }
    }
}

/// Error surfaced by the user store.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("Record not found")]
    NotFound,

    #[error("Unique constraint violated on {0}")]
    Conflict(String),

    #[error("Store operation aborted: {0}")]
    Aborted(#[from] ContextError),

    #[error("Stored record is invalid: {0}")]
    InvalidRecord(String),

    #[error("Database error: {0}")]
    Database(String),
}

/// Outcome class of a failed operation, for the transport to map onto its own
/// status codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    /// Caller-correctable input problem
    Invalid,
    /// Duplicate email or username
    Conflict,
    /// Login refused; deliberately uniform
    Unauthorized,
    /// Request cancelled or out of time
    Aborted,
    /// Store or crypto failure
    Internal,
}

/// Top-level error for all authentication use case operations
#[derive(Debug, Clone, Error)]
pub enum UserError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("An account with the given email or username already exists")]
    AlreadyExists,

    #[error("Invalid credentials")]
    InvalidCredentials,

    // Infrastructure errors
    #[error("Password error: {0}")]
    Password(PasswordError),

    #[error("Token error: {0}")]
    Token(#[from] TokenError),

    #[error("Request aborted: {0}")]
    Aborted(#[from] ContextError),

    #[error("Store error: {0}")]
    Store(StoreError),
}

impl UserError {
    pub fn class(&self) -> ErrorClass {
        match self {
            UserError::Validation(_) => ErrorClass::Invalid,
            UserError::AlreadyExists => ErrorClass::Conflict,
            UserError::InvalidCredentials => ErrorClass::Unauthorized,
            UserError::Aborted(_) => ErrorClass::Aborted,
            UserError::Password(_) | UserError::Token(_) | UserError::Store(_) => {
                ErrorClass::Internal
            }
        }
    }
}

impl From<StoreError> for UserError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Conflict(_) => UserError::AlreadyExists,
            StoreError::Aborted(e) => UserError::Aborted(e),
            other => UserError::Store(other),
        }
    }
}

impl From<PasswordError> for UserError {
    fn from(err: PasswordError) -> Self {
        match err {
            PasswordError::Mismatch => UserError::InvalidCredentials,
            other => UserError::Password(other),
        }
    }
}

impl From<AuthenticationError> for UserError {
    fn from(err: AuthenticationError) -> Self {
        match err {
            AuthenticationError::InvalidCredentials => UserError::InvalidCredentials,
            AuthenticationError::PasswordError(e) => UserError::from(e),
            AuthenticationError::TokenError(e) => UserError::Token(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_messages() {
        let cases = [
            (
                ValidationError::new("username", Rule::Required),
                "username is required",
            ),
            (
                ValidationError::new("email", Rule::Email),
                "email must be a valid email address",
            ),
            (
                ValidationError::new("password", Rule::Min(8)),
                "password must be at least 8 characters long",
            ),
            (
                ValidationError::new("username", Rule::Max(20)),
                "username must be no more than 20 characters long",
            ),
            (
                ValidationError::new("username", Rule::Alphanumeric),
                "validation failed",
            ),
        ];

        for (error, expected) in cases {
            assert_eq!(error.to_string(), expected);
        }
    }

    #[test]
    fn test_rule_tags() {
        let cases = [
            (Rule::Required, "required"),
            (Rule::Email, "email"),
            (Rule::Alphanumeric, "alphanum"),
            (Rule::Min(3), "min"),
            (Rule::Max(20), "max"),
        ];

        for (rule, tag) in cases {
            assert_eq!(rule.tag(), tag);
            assert_eq!(rule.has_message(), rule != Rule::Alphanumeric);
        }
    }

    #[test]
    fn test_store_conflict_maps_to_already_exists() {
        let err = UserError::from(StoreError::Conflict("email".to_string()));
        assert!(matches!(err, UserError::AlreadyExists));
        assert_eq!(err.class(), ErrorClass::Conflict);
    }

    #[test]
    fn test_store_abort_maps_to_aborted() {
        let err = UserError::from(StoreError::Aborted(ContextError::DeadlineExceeded));
        assert!(matches!(
            err,
            UserError::Aborted(ContextError::DeadlineExceeded)
        ));
        assert_eq!(err.class(), ErrorClass::Aborted);
    }

    #[test]
    fn test_store_failure_is_internal() {
        let err = UserError::from(StoreError::Database("disk I/O error".to_string()));
        assert_eq!(err.class(), ErrorClass::Internal);
        assert!(err.to_string().contains("disk I/O error"));
    }

    #[test]
    fn test_authentication_errors() {
        let mismatch = UserError::from(AuthenticationError::InvalidCredentials);
        assert!(matches!(mismatch, UserError::InvalidCredentials));
        assert_eq!(mismatch.class(), ErrorClass::Unauthorized);

        let corrupt = UserError::from(AuthenticationError::PasswordError(
            PasswordError::VerificationFailed("bad hash".to_string()),
        ));
        assert_eq!(corrupt.class(), ErrorClass::Internal);

        let entropy = UserError::from(AuthenticationError::TokenError(
            TokenError::EntropyUnavailable("no rng".to_string()),
        ));
        assert_eq!(entropy.class(), ErrorClass::Internal);
    }

    #[test]
    fn test_validation_error_is_transparent() {
        let err = UserError::from(ValidationError::new("password", Rule::Min(8)));
        assert_eq!(err.to_string(), "password must be at least 8 characters long");
        assert_eq!(err.class(), ErrorClass::Invalid);
    }
}
