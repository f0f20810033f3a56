/// Request authentication middleware for Axum
///
/// Every protected route passes through [`auth_middleware`], which walks a
/// request from `Unauthenticated` to either `Authenticated` (the loaded
/// [`Principal`] is attached to request extensions) or a terminal
/// `Rejected` response. The steps, in order:
///
/// 1. extract the bearer token from the `Authorization` header — absent
///    means rejection with reason "missing token";
/// 2. validate the token — a bad signature or malformed token rejects
///    with "invalid token", an expired one with "token expired";
/// 3. load the user named by the verified claims from the credential
///    store (non-secret columns only) — absent means "user not found";
/// 4. a deactivated account rejects with "inactive user";
/// 5. otherwise the principal is attached and the request proceeds.
///
/// There is no retry and no partial success: a request runs on behalf of
/// an identity or not at all. Handlers downstream extract the principal
/// with Axum's `Extension` extractor.
///
/// # Example
///
/// ```no_run
/// use axum::{middleware, routing::get, Extension, Router};
/// use sqlx::PgPool;
/// use taskdeck_shared::auth::middleware::require_auth;
/// use taskdeck_shared::models::user::Principal;
///
/// async fn whoami(Extension(principal): Extension<Principal>) -> String {
///     principal.email
/// }
///
/// fn protected(pool: PgPool) -> Router {
///     Router::new()
///         .route("/whoami", get(whoami))
///         .layer(middleware::from_fn(require_auth(pool, "jwt-secret")))
/// }
/// ```
use axum::{
    extract::Request,
    http::{header, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use sqlx::PgPool;

use super::jwt::{validate_token, JwtError};
use crate::models::user::User;

/// Rejection reasons for the request authenticator.
///
/// Every variant except `Database` surfaces to the caller as an
/// authorization failure with a distinct message.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// No bearer token in the Authorization header
    #[error("missing token")]
    MissingToken,

    /// Token is malformed or its signature does not verify
    #[error("invalid token")]
    InvalidToken,

    /// Token is past its expiry
    #[error("token expired")]
    TokenExpired,

    /// Verified claims name a user that no longer exists
    #[error("user not found")]
    UserNotFound,

    /// The account carries the deactivation flag
    #[error("inactive user")]
    InactiveUser,

    /// Credential store failure while loading the principal
    #[error("database error: {0}")]
    Database(String),
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            AuthError::Database(cause) => {
                tracing::error!("Auth principal lookup failed: {}", cause);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An internal error occurred".to_string(),
                )
            }
            rejection => (StatusCode::UNAUTHORIZED, rejection.to_string()),
        };

        let error_code = if status == StatusCode::UNAUTHORIZED {
            "unauthorized"
        } else {
            "internal_error"
        };

        let body = Json(serde_json::json!({
            "error": error_code,
            "message": message,
        }));

        (status, body).into_response()
    }
}

/// The authenticator itself: bearer extraction, token validation,
/// principal load, deactivation check, extension insert.
pub async fn auth_middleware(
    pool: PgPool,
    secret: String,
    mut req: Request,
    next: Next,
) -> Result<Response, AuthError> {
    let auth_header = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or(AuthError::MissingToken)?;

    let token = auth_header
        .strip_prefix("Bearer ")
        .ok_or(AuthError::MissingToken)?;

    let claims = validate_token(token, &secret).map_err(|e| match e {
        JwtError::Expired => AuthError::TokenExpired,
        _ => AuthError::InvalidToken,
    })?;

    let principal = User::find_principal(&pool, claims.id)
        .await
        .map_err(|e| AuthError::Database(e.to_string()))?
        .ok_or(AuthError::UserNotFound)?;

    if !principal.is_active {
        return Err(AuthError::InactiveUser);
    }

    req.extensions_mut().insert(principal);

    Ok(next.run(req).await)
}

/// Creates an authentication middleware closure for `middleware::from_fn`.
///
/// Captures the pool and signing secret so the router does not need to
/// thread them through per-request state.
pub fn require_auth(
    pool: PgPool,
    secret: impl Into<String>,
) -> impl Fn(
    Request,
    Next,
) -> std::pin::Pin<
    Box<dyn std::future::Future<Output = Result<Response, AuthError>> + Send>,
> + Clone {
    let secret = secret.into();
    move |req, next| {
        let pool = pool.clone();
        let secret = secret.clone();
        Box::pin(auth_middleware(pool, secret, req, next))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejections_map_to_unauthorized() {
        for err in [
            AuthError::MissingToken,
            AuthError::InvalidToken,
            AuthError::TokenExpired,
            AuthError::UserNotFound,
            AuthError::InactiveUser,
        ] {
            let response = err.into_response();
            assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        }
    }

    #[test]
    fn test_database_error_maps_to_internal() {
        let response = AuthError::Database("connection reset".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_rejection_reasons_are_distinct() {
        assert_eq!(AuthError::MissingToken.to_string(), "missing token");
        assert_eq!(AuthError::InvalidToken.to_string(), "invalid token");
        assert_eq!(AuthError::TokenExpired.to_string(), "token expired");
        assert_eq!(AuthError::UserNotFound.to_string(), "user not found");
        assert_eq!(AuthError::InactiveUser.to_string(), "inactive user");
    }
}
