use async_trait::async_trait;

use crate::context::RequestContext;
use crate::domain::user::models::IssuedToken;
use crate::domain::user::models::NewUser;
use crate::domain::user::models::User;
use crate::domain::user::models::UserId;
use crate::domain::user::models::UserLogin;
use crate::domain::user::models::UserProfile;
use crate::user::errors::StoreError;
use crate::user::errors::UserError;

/// Port for authentication use case operations, as invoked by a transport layer.
#[async_trait]
pub trait AuthServicePort: Send + Sync + 'static {
    /// Register a new account.
    ///
    /// # Arguments
    /// * `ctx` - Request-scoped context
    /// * `candidate` - Unvalidated registration request
    ///
    /// # Returns
    /// Profile of the created account
    ///
    /// # Errors
    /// * `Validation` - Candidate violates a field rule
    /// * `AlreadyExists` - Email or username is already registered
    /// * `Password` / `Token` - Crypto primitive failed
    /// * `Aborted` - Request cancelled or past its deadline
    /// * `Store` - Store operation failed
    async fn register(
        &self,
        ctx: &RequestContext,
        candidate: NewUser,
    ) -> Result<UserProfile, UserError>;

    /// Check credentials and issue a new bearer token.
    ///
    /// # Arguments
    /// * `ctx` - Request-scoped context
    /// * `credentials` - Email and plaintext password
    ///
    /// # Returns
    /// The newly issued token, already recorded against the account
    ///
    /// # Errors
    /// * `Validation` - Login request is malformed
    /// * `InvalidCredentials` - Unknown email or wrong password (indistinguishable)
    /// * `Password` / `Token` - Crypto primitive failed
    /// * `Aborted` - Request cancelled or past its deadline
    /// * `Store` - Store operation failed
    async fn login(
        &self,
        ctx: &RequestContext,
        credentials: UserLogin,
    ) -> Result<IssuedToken, UserError>;

    /// List every stored account, without credential fields.
    ///
    /// # Errors
    /// * `Aborted` - Request cancelled or past its deadline
    /// * `Store` - Store operation failed
    async fn get_all(&self, ctx: &RequestContext) -> Result<Vec<UserProfile>, UserError>;
}

/// Persistence operations for user aggregate.
///
/// Implementations must enforce email and username uniqueness themselves and
/// report a violation as `StoreError::Conflict`; the use case's existence check
/// alone cannot prevent two concurrent registrations from racing.
#[async_trait]
pub trait UserRepository: Send + Sync + 'static {
    /// Persist new user to storage.
    ///
    /// # Errors
    /// * `Conflict` - Email or username is already taken
    /// * `Aborted` - Request context ended first
    /// * `Database` - Database operation failed
    async fn create(&self, ctx: &RequestContext, user: User) -> Result<(), StoreError>;

    /// Retrieve user by identifier.
    ///
    /// # Errors
    /// * `NotFound` - No user with this ID
    /// * `Aborted` - Request context ended first
    /// * `Database` - Database operation failed
    async fn read(&self, ctx: &RequestContext, id: &UserId) -> Result<User, StoreError>;

    /// Retrieve user by email address.
    ///
    /// # Errors
    /// * `NotFound` - No user with this email
    /// * `Aborted` - Request context ended first
    /// * `Database` - Database operation failed
    async fn read_by_email(&self, ctx: &RequestContext, email: &str) -> Result<User, StoreError>;

    /// Retrieve user by username.
    ///
    /// # Errors
    /// * `NotFound` - No user with this username
    /// * `Aborted` - Request context ended first
    /// * `Database` - Database operation failed
    async fn read_by_username(
        &self,
        ctx: &RequestContext,
        username: &str,
    ) -> Result<User, StoreError>;

    /// Update existing user in storage.
    ///
    /// # Errors
    /// * `NotFound` - User does not exist
    /// * `Conflict` - New email or username is already taken
    /// * `Aborted` - Request context ended first
    /// * `Database` - Database operation failed
    async fn update(&self, ctx: &RequestContext, user: User) -> Result<(), StoreError>;

    /// Remove user from storage.
    ///
    /// # Errors
    /// * `NotFound` - User does not exist
    /// * `Aborted` - Request context ended first
    /// * `Database` - Database operation failed
    async fn delete(&self, ctx: &RequestContext, id: &UserId) -> Result<(), StoreError>;

    /// Retrieve all users from storage.
    ///
    /// # Errors
    /// * `Aborted` - Request context ended first
    /// * `Database` - Database operation failed
    async fn read_all(&self, ctx: &RequestContext) -> Result<Vec<User>, StoreError>;

    /// Check whether any user holds this email or this username.
    ///
    /// # Errors
    /// * `Aborted` - Request context ended first
    /// * `Database` - Database operation failed
    async fn check_user_exists(
        &self,
        ctx: &RequestContext,
        email: &str,
        username: &str,
    ) -> Result<bool, StoreError>;
}
