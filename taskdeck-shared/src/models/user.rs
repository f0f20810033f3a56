/// User model and credential store operations
///
/// Users are the owners of tasks and the subjects of authentication.
/// The password is stored only as an Argon2id digest, and the full row
/// (including that digest) never crosses the HTTP boundary: responses use
/// [`PublicUser`] and the request authenticator uses [`Principal`].
///
/// # Schema
///
/// ```sql
/// CREATE TABLE users (
///     id BIGSERIAL PRIMARY KEY,
///     email TEXT NOT NULL UNIQUE,
///     name TEXT NOT NULL,
///     password_hash TEXT NOT NULL,
///     is_active BOOLEAN NOT NULL DEFAULT TRUE,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```
///
/// Email matching is exact and case-sensitive: the column is `TEXT`, not
/// `CITEXT`, and lookups use `=`.
use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::PgPool;

/// A user row as stored in the credential store.
///
/// Deliberately not `Serialize`: the password digest must never be
/// serialized to clients. Convert with [`User::to_public`] first.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct User {
    /// Unique user id
    pub id: i64,

    /// Email address, the unique login key (case-sensitive)
    pub email: String,

    /// Display name
    pub name: String,

    /// Argon2id password digest
    pub password_hash: String,

    /// Deactivation flag; inactive users cannot authenticate
    pub is_active: bool,

    /// When the account was created
    pub created_at: DateTime<Utc>,

    /// When the account was last updated
    pub updated_at: DateTime<Utc>,
}

/// The user shape returned to clients: no password digest.
#[derive(Debug, Clone, Serialize)]
pub struct PublicUser {
    pub id: i64,
    pub email: String,
    pub name: String,
}

/// The authenticated principal attached to a request.
///
/// Loaded from non-secret columns only; the password digest is never
/// selected on this path.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Principal {
    pub id: i64,
    pub email: String,
    pub name: String,
    pub is_active: bool,
}

/// Input for creating a new user
#[derive(Debug, Clone)]
pub struct CreateUser {
    /// Email address
    pub email: String,

    /// Display name
    pub name: String,

    /// Argon2id password digest (NOT the plaintext password)
    pub password_hash: String,
}

impl User {
    /// Inserts a new user.
    ///
    /// # Errors
    ///
    /// Surfaces the `users_email_key` unique violation when the email is
    /// already registered, and any other database error as-is.
    pub async fn create(pool: &PgPool, data: CreateUser) -> Result<Self, sqlx::Error> {
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (email, name, password_hash)
            VALUES ($1, $2, $3)
            RETURNING id, email, name, password_hash, is_active, created_at, updated_at
            "#,
        )
        .bind(data.email)
        .bind(data.name)
        .bind(data.password_hash)
        .fetch_one(pool)
        .await?;

        Ok(user)
    }

    /// Finds a user by exact email match.
    ///
    /// This is the login path, so the full row (digest included) is
    /// selected.
    pub async fn find_by_email(pool: &PgPool, email: &str) -> Result<Option<Self>, sqlx::Error> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, email, name, password_hash, is_active, created_at, updated_at
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(pool)
        .await?;

        Ok(user)
    }

    /// Loads the principal view of a user by id.
    ///
    /// Used by the request authenticator after token validation. Selects
    /// non-secret columns only.
    pub async fn find_principal(pool: &PgPool, id: i64) -> Result<Option<Principal>, sqlx::Error> {
        let principal = sqlx::query_as::<_, Principal>(
            r#"
            SELECT id, email, name, is_active
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(principal)
    }

    /// Returns the client-facing view of this user.
    pub fn to_public(&self) -> PublicUser {
        PublicUser {
            id: self.id,
            email: self.email.clone(),
            name: self.name.clone(),
        }
    }
}
