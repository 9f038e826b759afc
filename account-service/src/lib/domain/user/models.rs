use std::fmt;
use std::str::FromStr;

use chrono::DateTime;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;
use uuid::Uuid;

use crate::user::errors::Rule;
use crate::user::errors::ValidationError;

/// User aggregate entity.
///
/// Identity plus credential record. `password_hash` is always a one-way hash;
/// the plaintext submitted at registration never reaches this type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: UserId,
    pub username: Username,
    pub email: EmailAddress,
    pub password_hash: String,
    pub token: Option<String>,
    pub token_expires_at: Option<DateTime<Utc>>,
    pub metadata: Metadata,
}

impl User {
    /// Build a freshly registered user with no token.
    pub fn new(
        id: UserId,
        username: Username,
        email: EmailAddress,
        password_hash: String,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            username,
            email,
            password_hash,
            token: None,
            token_expires_at: None,
            metadata: Metadata::new(now),
        }
    }

    /// Record a successful login: replace the token and stamp the login time.
    pub fn record_login(&mut self, token: String, expires_at: DateTime<Utc>, now: DateTime<Utc>) {
        self.token = Some(token);
        self.token_expires_at = Some(expires_at);
        self.metadata.last_login_at = Some(now);
        self.metadata.updated_at = now;
    }
}

/// Record timestamps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Metadata {
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub last_login_at: Option<DateTime<Utc>>,
}

impl Metadata {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            created_at: now,
            updated_at: now,
            last_login_at: None,
        }
    }
}

/// User unique identifier type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UserId(pub Uuid);

impl UserId {
    /// Parse a user ID from string.
    ///
    /// # Errors
    /// * `uuid::Error` - String is not a valid UUID
    pub fn from_string(s: &str) -> Result<Self, uuid::Error> {
        Uuid::parse_str(s).map(UserId)
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Username value type
///
/// Ensures username is present, ASCII alphanumeric, and 3-20 characters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Username(String);

impl Username {
    pub const FIELD: &'static str = "username";
    pub const MIN_LENGTH: usize = 3;
    pub const MAX_LENGTH: usize = 20;

    /// Create a new valid username.
    ///
    /// Rules are checked in order: required, alphanum, min, max.
    ///
    /// # Errors
    /// * `ValidationError` - The first rule the username violates
    pub fn new(username: String) -> Result<Self, ValidationError> {
        if username.is_empty() {
            return Err(ValidationError::new(Self::FIELD, Rule::Required));
        }
        if !username.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(ValidationError::new(Self::FIELD, Rule::Alphanumeric));
        }

        let length = username.chars().count();
        if length < Self::MIN_LENGTH {
            Err(ValidationError::new(Self::FIELD, Rule::Min(Self::MIN_LENGTH)))
        } else if length > Self::MAX_LENGTH {
            Err(ValidationError::new(Self::FIELD, Rule::Max(Self::MAX_LENGTH)))
        } else {
            Ok(Self(username))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Username {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Email address type
///
/// Validates email format using RFC 5322 compliant parser.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailAddress(String);

impl EmailAddress {
    pub const FIELD: &'static str = "email";

    /// Create a new validated email address.
    ///
    /// # Errors
    /// * `ValidationError` - Email is missing or does not parse
    pub fn new(email: String) -> Result<Self, ValidationError> {
        if email.is_empty() {
            return Err(ValidationError::new(Self::FIELD, Rule::Required));
        }
        email_address::EmailAddress::from_str(&email)
            .map(|_| EmailAddress(email))
            .map_err(|_| ValidationError::new(Self::FIELD, Rule::Email))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Registration candidate as submitted by a client.
///
/// Nothing here has been validated yet; see `Validator::validate`.
#[derive(Clone, Deserialize)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub password: String,
}

impl NewUser {
    pub fn new(
        username: impl Into<String>,
        email: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            username: username.into(),
            email: email.into(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for NewUser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NewUser")
            .field("username", &self.username)
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Registration candidate that passed validation.
///
/// Still holds the plaintext password, which the use case consumes when hashing.
pub struct ValidatedUser {
    pub username: Username,
    pub email: EmailAddress,
    pub password: String,
}

/// Credential check request. Never persisted.
#[derive(Clone, Deserialize)]
pub struct UserLogin {
    pub email: String,
    pub password: String,
}

impl UserLogin {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for UserLogin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UserLogin")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Public projection of a user, without credentials.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserProfile {
    pub id: String,
    pub username: String,
    pub email: String,
    pub metadata: Metadata,
}

impl From<&User> for UserProfile {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.to_string(),
            username: user.username.as_str().to_string(),
            email: user.email.as_str().to_string(),
            metadata: user.metadata,
        }
    }
}

/// Bearer token handed back by a successful login.
///
/// `expires_at` is advisory for the transport (e.g. cookie lifetime); this layer
/// records it but does not validate presented tokens.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IssuedToken {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_username_rules() {
        assert!(Username::new("alice123".to_string()).is_ok());
        assert!(Username::new("abc".to_string()).is_ok());
        assert!(Username::new("a".repeat(20)).is_ok());

        assert_eq!(
            Username::new(String::new()),
            Err(ValidationError::new("username", Rule::Required))
        );
        assert_eq!(
            Username::new("al".to_string()),
            Err(ValidationError::new("username", Rule::Min(3)))
        );
        assert_eq!(
            Username::new("a".repeat(21)),
            Err(ValidationError::new("username", Rule::Max(20)))
        );
        assert_eq!(
            Username::new("alice_123".to_string()),
            Err(ValidationError::new("username", Rule::Alphanumeric))
        );
        assert_eq!(
            Username::new("ålice".to_string()),
            Err(ValidationError::new("username", Rule::Alphanumeric))
        );
    }

    #[test]
    fn test_email_rules() {
        assert!(EmailAddress::new("a@x.com".to_string()).is_ok());
        assert_eq!(
            EmailAddress::new(String::new()),
            Err(ValidationError::new("email", Rule::Required))
        );
        assert_eq!(
            EmailAddress::new("not-an-email".to_string()),
            Err(ValidationError::new("email", Rule::Email))
        );
    }

    #[test]
    fn test_record_login_updates_metadata() {
        let created = Utc::now();
        let mut user = User::new(
            UserId(Uuid::new_v4()),
            Username::new("alice123".to_string()).unwrap(),
            EmailAddress::new("a@x.com".to_string()).unwrap(),
            "$argon2id$hash".to_string(),
            created,
        );
        assert_eq!(user.metadata.last_login_at, None);

        let now = created + chrono::Duration::seconds(5);
        let expires = now + chrono::Duration::minutes(60);
        user.record_login("token".to_string(), expires, now);

        assert_eq!(user.token.as_deref(), Some("token"));
        assert_eq!(user.token_expires_at, Some(expires));
        assert_eq!(user.metadata.created_at, created);
        assert_eq!(user.metadata.updated_at, now);
        assert_eq!(user.metadata.last_login_at, Some(now));
    }

    #[test]
    fn test_debug_redacts_passwords() {
        let candidate = NewUser::new("alice123", "a@x.com", "secret123");
        let login = UserLogin::new("a@x.com", "secret123");

        assert!(!format!("{:?}", candidate).contains("secret123"));
        assert!(!format!("{:?}", login).contains("secret123"));
    }

    #[test]
    fn test_profile_excludes_credentials() {
        let mut user = User::new(
            UserId(Uuid::new_v4()),
            Username::new("alice123".to_string()).unwrap(),
            EmailAddress::new("a@x.com".to_string()).unwrap(),
            "$argon2id$hash".to_string(),
            Utc::now(),
        );
        user.token = Some("opaque".to_string());

        let json = serde_json::to_value(UserProfile::from(&user)).unwrap();
        assert_eq!(json["username"], "alice123");
        assert!(json.get("password_hash").is_none());
        assert!(json.get("token").is_none());
        assert!(json["metadata"]["created_at"].is_string());
    }
}
