use async_trait::async_trait;
use chrono::DateTime;
use chrono::Utc;
use sqlx::FromRow;
use sqlx::SqlitePool;

use crate::context::RequestContext;
use crate::domain::user::models::EmailAddress;
use crate::domain::user::models::Metadata;
use crate::domain::user::models::User;
use crate::domain::user::models::UserId;
use crate::domain::user::models::Username;
use crate::domain::user::ports::UserRepository;
use crate::user::errors::StoreError;

pub struct SqliteUserRepository {
    pool: SqlitePool,
}

impl SqliteUserRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct UserRecord {
    id: String,
    username: String,
    email: String,
    password_hash: String,
    token: Option<String>,
    token_expires_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    last_login_at: Option<DateTime<Utc>>,
}

impl TryFrom<UserRecord> for User {
    type Error = StoreError;

    fn try_from(r: UserRecord) -> Result<Self, Self::Error> {
        let invalid = |e: &dyn std::fmt::Display| StoreError::InvalidRecord(e.to_string());

        Ok(User {
            id: UserId::from_string(&r.id).map_err(|e| invalid(&e))?,
            username: Username::new(r.username).map_err(|e| invalid(&e))?,
            email: EmailAddress::new(r.email).map_err(|e| invalid(&e))?,
            password_hash: r.password_hash,
            token: r.token,
            token_expires_at: r.token_expires_at,
            metadata: Metadata {
                created_at: r.created_at,
                updated_at: r.updated_at,
                last_login_at: r.last_login_at,
            },
        })
    }
}

fn database_error(e: sqlx::Error) -> StoreError {
    StoreError::Database(e.to_string())
}

/// Map a write failure, recognising SQLite unique constraint violations.
///
/// SQLite reports the offending column as `UNIQUE constraint failed: users.<column>`.
fn write_error(e: sqlx::Error) -> StoreError {
    if let Some(db_err) = e.as_database_error() {
        if db_err.is_unique_violation() {
            let message = db_err.message();
            let field = if message.contains("users.email") {
                "email"
            } else if message.contains("users.username") {
                "username"
            } else {
                "email or username"
            };
            return StoreError::Conflict(field.to_string());
        }
    }
    database_error(e)
}

#[async_trait]
impl UserRepository for SqliteUserRepository {
    async fn create(&self, ctx: &RequestContext, user: User) -> Result<(), StoreError> {
        let query = sqlx::query(
            r#"
            INSERT INTO users (
                id, username, email, password_hash, token, token_expires_at,
                created_at, updated_at, last_login_at
            )
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(user.id.to_string())
        .bind(user.username.as_str())
        .bind(user.email.as_str())
        .bind(&user.password_hash)
        .bind(&user.token)
        .bind(user.token_expires_at)
        .bind(user.metadata.created_at)
        .bind(user.metadata.updated_at)
        .bind(user.metadata.last_login_at);

        ctx.run(query.execute(&self.pool))
            .await?
            .map_err(write_error)?;

        Ok(())
    }

    async fn read(&self, ctx: &RequestContext, id: &UserId) -> Result<User, StoreError> {
        let query = sqlx::query_as::<_, UserRecord>(
            r#"
            SELECT id, username, email, password_hash, token, token_expires_at,
                   created_at, updated_at, last_login_at
            FROM users
            WHERE id = ?
            "#,
        )
        .bind(id.to_string());

        ctx.run(query.fetch_optional(&self.pool))
            .await?
            .map_err(database_error)?
            .ok_or(StoreError::NotFound)?
            .try_into()
    }

    async fn read_by_email(&self, ctx: &RequestContext, email: &str) -> Result<User, StoreError> {
        let query = sqlx::query_as::<_, UserRecord>(
            r#"
            SELECT id, username, email, password_hash, token, token_expires_at,
                   created_at, updated_at, last_login_at
            FROM users
            WHERE email = ?
            "#,
        )
        .bind(email);

        ctx.run(query.fetch_optional(&self.pool))
            .await?
            .map_err(database_error)?
            .ok_or(StoreError::NotFound)?
            .try_into()
    }

    async fn read_by_username(
        &self,
        ctx: &RequestContext,
        username: &str,
    ) -> Result<User, StoreError> {
        let query = sqlx::query_as::<_, UserRecord>(
            r#"
            SELECT id, username, email, password_hash, token, token_expires_at,
                   created_at, updated_at, last_login_at
            FROM users
            WHERE username = ?
            "#,
        )
        .bind(username);

        ctx.run(query.fetch_optional(&self.pool))
            .await?
            .map_err(database_error)?
            .ok_or(StoreError::NotFound)?
            .try_into()
    }

    async fn update(&self, ctx: &RequestContext, user: User) -> Result<(), StoreError> {
        let query = sqlx::query(
            r#"
            UPDATE users
            SET username = ?, email = ?, password_hash = ?, token = ?,
                token_expires_at = ?, updated_at = ?, last_login_at = ?
            WHERE id = ?
            "#,
        )
        .bind(user.username.as_str())
        .bind(user.email.as_str())
        .bind(&user.password_hash)
        .bind(&user.token)
        .bind(user.token_expires_at)
        .bind(user.metadata.updated_at)
        .bind(user.metadata.last_login_at)
        .bind(user.id.to_string());

        let result = ctx
            .run(query.execute(&self.pool))
            .await?
            .map_err(write_error)?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }

        Ok(())
    }

    async fn delete(&self, ctx: &RequestContext, id: &UserId) -> Result<(), StoreError> {
        let query = sqlx::query(
            r#"
            DELETE FROM users
            WHERE id = ?
            "#,
        )
        .bind(id.to_string());

        let result = ctx
            .run(query.execute(&self.pool))
            .await?
            .map_err(database_error)?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }

        Ok(())
    }

    async fn read_all(&self, ctx: &RequestContext) -> Result<Vec<User>, StoreError> {
        let query = sqlx::query_as::<_, UserRecord>(
            r#"
            SELECT id, username, email, password_hash, token, token_expires_at,
                   created_at, updated_at, last_login_at
            FROM users
            ORDER BY created_at ASC
            "#,
        );

        ctx.run(query.fetch_all(&self.pool))
            .await?
            .map_err(database_error)?
            .into_iter()
            .map(User::try_from)
            .collect()
    }

    async fn check_user_exists(
        &self,
        ctx: &RequestContext,
        email: &str,
        username: &str,
    ) -> Result<bool, StoreError> {
        let query = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*)
            FROM users
            WHERE email = ? OR username = ?
            "#,
        )
        .bind(email)
        .bind(username);

        let count = ctx
            .run(query.fetch_one(&self.pool))
            .await?
            .map_err(database_error)?;

        Ok(count > 0)
    }
}
