use std::sync::Arc;

use async_trait::async_trait;
use auth::Authenticator;
use chrono::Duration;
use chrono::Utc;

use crate::context::RequestContext;
use crate::domain::user::models::IssuedToken;
use crate::domain::user::models::NewUser;
use crate::domain::user::models::User;
use crate::domain::user::models::UserId;
use crate::domain::user::models::UserLogin;
use crate::domain::user::models::UserProfile;
use crate::domain::user::validation::Validator;
use crate::user::errors::StoreError;
use crate::user::errors::UserError;
use crate::user::ports::AuthServicePort;
use crate::user::ports::UserRepository;

/// Authentication use case: registration, login, and account listing.
///
/// Holds no mutable state of its own, so concurrent calls only interact through
/// the repository.
pub struct AuthService<UR>
where
    UR: UserRepository,
{
    repository: Arc<UR>,
    authenticator: Arc<Authenticator>,
    validator: Validator,
    token_ttl: Duration,
}

impl<UR> AuthService<UR>
where
    UR: UserRepository,
{
    /// Create a new auth service with injected dependencies.
    ///
    /// # Arguments
    /// * `repository` - User store implementation
    /// * `authenticator` - Password hashing and token issuance
    /// * `validator` - Structural validation rules
    /// * `token_ttl` - Lifetime recorded alongside every issued token
    pub fn new(
        repository: Arc<UR>,
        authenticator: Arc<Authenticator>,
        validator: Validator,
        token_ttl: Duration,
    ) -> Self {
        Self {
            repository,
            authenticator,
            validator,
            token_ttl,
        }
    }

    async fn find_login_account(
        &self,
        ctx: &RequestContext,
        email: &str,
    ) -> Result<User, UserError> {
        match self.repository.read_by_email(ctx, email).await {
            Ok(user) => Ok(user),
            Err(StoreError::NotFound) => {
                tracing::debug!("Login rejected: no account for email");
                Err(UserError::InvalidCredentials)
            }
            Err(e) => Err(e.into()),
        }
    }
}

#[async_trait]
impl<UR> AuthServicePort for AuthService<UR>
where
    UR: UserRepository,
{
    async fn register(
        &self,
        ctx: &RequestContext,
        candidate: NewUser,
    ) -> Result<UserProfile, UserError> {
        ctx.check()?;
        let candidate = self.validator.validate(candidate).map_err(|e| {
            tracing::debug!(field = e.field, rule = e.rule.tag(), "Registration rejected");
            e
        })?;

        match self
            .repository
            .check_user_exists(ctx, candidate.email.as_str(), candidate.username.as_str())
            .await
        {
            Ok(false) | Err(StoreError::NotFound) => {}
            Ok(true) => {
                tracing::debug!(username = %candidate.username, "Registration conflict");
                return Err(UserError::AlreadyExists);
            }
            Err(e) => return Err(e.into()),
        }

        ctx.check()?;
        let id = UserId(self.authenticator.generate_identifier()?);
        let password_hash = self.authenticator.hash_password(&candidate.password)?;

        let user = User::new(
            id,
            candidate.username,
            candidate.email,
            password_hash,
            Utc::now(),
        );

        ctx.check()?;
        // A unique violation here means a concurrent registration won the race
        // after our existence check; it converts to AlreadyExists.
        self.repository.create(ctx, user.clone()).await?;

        tracing::info!(
            user_id = %user.id,
            username = %user.username,
            "User registered"
        );

        Ok(UserProfile::from(&user))
    }

    async fn login(
        &self,
        ctx: &RequestContext,
        credentials: UserLogin,
    ) -> Result<IssuedToken, UserError> {
        ctx.check()?;
        self.validator.validate_login(&credentials)?;

        let mut user = self.find_login_account(ctx, &credentials.email).await?;

        ctx.check()?;
        let result = self
            .authenticator
            .authenticate(&credentials.password, &user.password_hash)
            .map_err(|e| {
                let err = UserError::from(e);
                if matches!(err, UserError::InvalidCredentials) {
                    tracing::warn!(user_id = %user.id, "Login rejected: password mismatch");
                }
                err
            })?;

        let now = Utc::now();
        let expires_at = now + self.token_ttl;
        user.record_login(result.access_token.clone(), expires_at, now);

        ctx.check()?;
        self.repository.update(ctx, user.clone()).await?;

        tracing::info!(user_id = %user.id, "User logged in");

        Ok(IssuedToken {
            token: result.access_token,
            expires_at,
        })
    }

    async fn get_all(&self, ctx: &RequestContext) -> Result<Vec<UserProfile>, UserError> {
        ctx.check()?;
        let users = self.repository.read_all(ctx).await?;
        Ok(users.iter().map(UserProfile::from).collect())
    }
}
