/// Authentication endpoints
///
/// # Endpoints
///
/// - `POST /auth/register` - Create an account and get a token
/// - `POST /auth/login` - Verify credentials and get a token
///
/// Both succeed with `{token, user}` where `user` is the public view
/// (no password digest). Login failure is deliberately uniform: an
/// unknown email and a wrong password produce the identical response,
/// so the API does not reveal which half of the credentials failed.
use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
};
use axum::{extract::State, http::StatusCode, Json};
use taskdeck_shared::{
    auth::{jwt, password},
    models::user::{CreateUser, PublicUser, User},
};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Register request
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    /// Email address
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    /// Password
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,

    /// Display name
    #[validate(length(min = 1, max = 100, message = "Name must be 1-100 characters"))]
    pub name: String,
}

/// Login request
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    /// Email address
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    /// Password
    pub password: String,
}

/// Response for both register and login
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    /// Bearer token, valid for 24 hours
    pub token: String,

    /// The authenticated user, password stripped
    pub user: PublicUser,
}

/// Register a new user
///
/// # Endpoint
///
/// ```text
/// POST /auth/register
/// Content-Type: application/json
///
/// {
///   "email": "user@example.com",
///   "password": "securePassword123",
///   "name": "John Doe"
/// }
/// ```
///
/// # Errors
///
/// - `409 Conflict`: email already registered
/// - `422 Unprocessable Entity`: validation failed
pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> ApiResult<(StatusCode, Json<AuthResponse>)> {
    req.validate().map_err(ApiError::from_validation)?;

    // Existence check and insert are two statements, not a transaction;
    // the unique constraint on users.email is the backstop for the race
    // between concurrent registrations.
    let existing = User::find_by_email(&state.db, &req.email).await?;
    if existing.is_some() {
        return Err(ApiError::Conflict("User already exists".to_string()));
    }

    let password_hash = password::hash_password(&req.password)?;

    let user = User::create(
        &state.db,
        CreateUser {
            email: req.email,
            name: req.name,
            password_hash,
        },
    )
    .await?;

    let claims = jwt::Claims::new(user.id, user.email.clone());
    let token = jwt::create_token(&claims, state.jwt_secret())?;

    tracing::info!(user_id = user.id, "User registered");

    Ok((
        StatusCode::CREATED,
        Json(AuthResponse {
            token,
            user: user.to_public(),
        }),
    ))
}

/// Login
///
/// # Endpoint
///
/// ```text
/// POST /auth/login
/// Content-Type: application/json
///
/// {
///   "email": "user@example.com",
///   "password": "securePassword123"
/// }
/// ```
///
/// # Errors
///
/// - `401 Unauthorized`: unknown email or wrong password (same response
///   for both)
/// - `422 Unprocessable Entity`: validation failed
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> ApiResult<Json<AuthResponse>> {
    req.validate().map_err(ApiError::from_validation)?;

    let user = User::find_by_email(&state.db, &req.email)
        .await?
        .ok_or_else(|| ApiError::Unauthorized("Invalid credentials".to_string()))?;

    if !password::verify_password(&req.password, &user.password_hash) {
        return Err(ApiError::Unauthorized("Invalid credentials".to_string()));
    }

    let claims = jwt::Claims::new(user.id, user.email.clone());
    let token = jwt::create_token(&claims, state.jwt_secret())?;

    tracing::info!(user_id = user.id, "User logged in");

    Ok(Json(AuthResponse {
        token,
        user: user.to_public(),
    }))
}
