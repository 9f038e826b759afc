use uuid::Uuid;

use crate::password::PasswordError;
use crate::password::PasswordHasher;
use crate::token::TokenError;
use crate::token::TokenGenerator;

/// Authentication coordinator combining password verification and token issuance.
///
/// Provides high-level authentication operations by coordinating
/// password hashing and bearer token generation.
#[derive(Debug, Clone, Default)]
pub struct Authenticator {
    password_hasher: PasswordHasher,
    token_generator: TokenGenerator,
}

/// Result of successful authentication.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticationResult {
    /// Freshly issued bearer token
    pub access_token: String,
}

/// Authentication operation errors.
#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum AuthenticationError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Password error: {0}")]
    PasswordError(PasswordError),

    #[error("Token error: {0}")]
    TokenError(#[from] TokenError),
}

impl From<PasswordError> for AuthenticationError {
    fn from(err: PasswordError) -> Self {
        match err {
            PasswordError::Mismatch => AuthenticationError::InvalidCredentials,
            other => AuthenticationError::PasswordError(other),
        }
    }
}

impl Authenticator {
    /// Create a new authenticator from its primitives.
    ///
    /// # Arguments
    /// * `password_hasher` - One-way credential hasher
    /// * `token_generator` - Identifier and bearer token source
    pub fn new(password_hasher: PasswordHasher, token_generator: TokenGenerator) -> Self {
        Self {
            password_hasher,
            token_generator,
        }
    }

    /// Hash a password for storage.
    ///
    /// # Errors
    /// * `HashingFailed` - Hashing operation failed
    pub fn hash_password(&self, password: &str) -> Result<String, PasswordError> {
        self.password_hasher.hash(password)
    }

    /// Verify credentials and issue a new bearer token.
    ///
    /// # Arguments
    /// * `password` - Plaintext password to verify
    /// * `stored_hash` - Stored password hash
    ///
    /// # Returns
    /// AuthenticationResult with a fresh access token
    ///
    /// # Errors
    /// * `InvalidCredentials` - Password does not match
    /// * `PasswordError` - Stored hash could not be used for verification
    /// * `TokenError` - Token generation failed
    pub fn authenticate(
        &self,
        password: &str,
        stored_hash: &str,
    ) -> Result<AuthenticationResult, AuthenticationError> {
        self.password_hasher.verify(password, stored_hash)?;

        let access_token = self.token_generator.generate_bearer_token()?;

        Ok(AuthenticationResult { access_token })
    }

    /// Generate a new unique identifier for an account.
    ///
    /// # Errors
    /// * `EntropyUnavailable` - Random source failed
    pub fn generate_identifier(&self) -> Result<Uuid, TokenError> {
        self.token_generator.generate_identifier()
    }
}
