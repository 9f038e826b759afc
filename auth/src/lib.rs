//! Credential primitives
//!
//! Provides the building blocks an account service needs to handle credentials:
//! - Password hashing and verification (Argon2id)
//! - Opaque bearer token and random identifier generation (OS CSPRNG)
//! - Authentication coordination
//!
//! Nothing here performs I/O; persistence and request handling belong to the service
//! that composes these pieces.
//!
//! # Examples
//!
//! ## Password Hashing
//! ```
//! use auth::PasswordHasher;
//!
//! let hasher = PasswordHasher::new();
//! let hash = hasher.hash("my_password").unwrap();
//! assert!(hasher.verify("my_password", &hash).is_ok());
//! ```
//!
//! ## Bearer Tokens
//! ```
//! use auth::TokenGenerator;
//!
//! let generator = TokenGenerator::new();
//! let token = generator.generate_bearer_token().unwrap();
//! assert_eq!(token.len(), 172);
//! ```
//!
//! ## Complete Authentication Flow
//! ```
//! use auth::Authenticator;
//!
//! let auth = Authenticator::default();
//!
//! // Register: hash password
//! let hash = auth.hash_password("password123").unwrap();
//!
//! // Login: verify and issue token
//! let result = auth.authenticate("password123", &hash).unwrap();
//! println!("Token: {}", result.access_token);
//! ```

pub mod authenticator;
pub mod password;
pub mod token;

// Re-export commonly used items
pub use authenticator::AuthenticationError;
pub use authenticator::AuthenticationResult;
pub use authenticator::Authenticator;
pub use password::PasswordError;
pub use password::PasswordHasher;
pub use token::TokenError;
pub use token::TokenGenerator;
pub use token::BEARER_TOKEN_BYTES;
