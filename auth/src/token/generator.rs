use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use rand::rngs::OsRng;
use rand::RngCore;
use uuid::Builder;
use uuid::Uuid;

use super::errors::TokenError;

/// Number of random bytes behind every bearer token.
pub const BEARER_TOKEN_BYTES: usize = 128;

/// Generator for opaque bearer tokens and random identifiers.
///
/// Both draw from the operating system's CSPRNG. Tokens carry no structure,
/// claims, or signature: possession of the string is the whole capability.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokenGenerator;

impl TokenGenerator {
    pub fn new() -> Self {
        Self
    }

    /// Generate a new bearer token.
    ///
    /// # Returns
    /// `BEARER_TOKEN_BYTES` random bytes encoded with the standard base64 alphabet
    ///
    /// # Errors
    /// * `EntropyUnavailable` - The OS random source failed
    pub fn generate_bearer_token(&self) -> Result<String, TokenError> {
        let bytes = Self::random_bytes::<BEARER_TOKEN_BYTES>()?;
        Ok(STANDARD.encode(bytes))
    }

    /// Generate a new random (version 4) UUID.
    ///
    /// # Errors
    /// * `EntropyUnavailable` - The OS random source failed
    pub fn generate_identifier(&self) -> Result<Uuid, TokenError> {
        let bytes = Self::random_bytes::<16>()?;
        Ok(Builder::from_random_bytes(bytes).into_uuid())
    }

    fn random_bytes<const N: usize>() -> Result<[u8; N], TokenError> {
        let mut bytes = [0u8; N];
        OsRng
            .try_fill_bytes(&mut bytes)
            .map_err(|e| TokenError::EntropyUnavailable(e.to_string()))?;
        Ok(bytes)
    }
}
