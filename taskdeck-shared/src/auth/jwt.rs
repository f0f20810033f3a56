/// JWT token generation and validation
///
/// Bearer tokens are signed with HS256 and carry the authenticated user's
/// id and email. Tokens are stateless: validity is determined entirely by
/// the signature and the expiry claim, and expiry is fixed at 24 hours
/// from issuance. There is no revocation list; logout is client-side
/// token deletion.
///
/// # Example
///
/// ```
/// use taskdeck_shared::auth::jwt::{create_token, validate_token, Claims};
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let claims = Claims::new(42, "user@example.com".to_string());
/// let token = create_token(&claims, "your-secret-key-at-least-32-bytes")?;
///
/// let validated = validate_token(&token, "your-secret-key-at-least-32-bytes")?;
/// assert_eq!(validated.id, 42);
/// assert_eq!(validated.email, "user@example.com");
/// # Ok(())
/// # }
/// ```
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

/// Fixed token lifetime: 24 hours from issuance.
pub const TOKEN_TTL_HOURS: i64 = 24;

/// Error type for JWT operations
#[derive(Debug, thiserror::Error)]
pub enum JwtError {
    /// Failed to create token
    #[error("Failed to create token: {0}")]
    CreateError(String),

    /// Token has expired
    #[error("Token has expired")]
    Expired,

    /// Token is structurally malformed or its signature does not verify
    #[error("Invalid token: {0}")]
    Invalid(String),
}

/// Token claims
///
/// The custom payload is `{id, email}`; `iat` and `exp` are the standard
/// issued-at and expiry timestamps.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Authenticated user's id
    pub id: i64,

    /// Authenticated user's email
    pub email: String,

    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// Expiration time (Unix timestamp)
    pub exp: i64,
}

impl Claims {
    /// Creates claims for a user with the fixed 24-hour expiry.
    pub fn new(user_id: i64, email: String) -> Self {
        Self::with_ttl(user_id, email, Duration::hours(TOKEN_TTL_HOURS))
    }

    /// Creates claims with a custom time-to-live.
    ///
    /// Production tokens always use [`Claims::new`]; this exists so expiry
    /// handling can be exercised without waiting a day.
    pub fn with_ttl(user_id: i64, email: String, ttl: Duration) -> Self {
        let now = Utc::now();

        Self {
            id: user_id,
            email,
            iat: now.timestamp(),
            exp: (now + ttl).timestamp(),
        }
    }

    /// Checks if the token has expired
    pub fn is_expired(&self) -> bool {
        Utc::now().timestamp() >= self.exp
    }
}

/// Signs claims into a compact token string using HS256.
///
/// # Errors
///
/// Returns `JwtError::CreateError` if encoding fails.
pub fn create_token(claims: &Claims, secret: &str) -> Result<String, JwtError> {
    let header = Header::new(Algorithm::HS256);
    let key = EncodingKey::from_secret(secret.as_bytes());

    encode(&header, claims, &key)
        .map_err(|e| JwtError::CreateError(format!("Token encoding failed: {}", e)))
}

/// Validates a token and extracts its claims.
///
/// The two failure modes are distinct so callers can surface different
/// rejection reasons: `JwtError::Expired` for an otherwise-valid token
/// past its expiry, `JwtError::Invalid` for a bad signature or a
/// malformed token.
pub fn validate_token(token: &str, secret: &str) -> Result<Claims, JwtError> {
    let key = DecodingKey::from_secret(secret.as_bytes());

    let mut validation = Validation::new(Algorithm::HS256);
    validation.validate_exp = true;

    let token_data = decode::<Claims>(token, &key, &validation).map_err(|e| match e.kind() {
        jsonwebtoken::errors::ErrorKind::ExpiredSignature => JwtError::Expired,
        _ => JwtError::Invalid(format!("Token validation failed: {}", e)),
    })?;

    Ok(token_data.claims)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test-secret-key-at-least-32-bytes-long";

    #[test]
    fn test_claims_creation() {
        let claims = Claims::new(7, "user@example.com".to_string());

        assert_eq!(claims.id, 7);
        assert_eq!(claims.email, "user@example.com");
        assert_eq!(claims.exp - claims.iat, TOKEN_TTL_HOURS * 3600);
        assert!(!claims.is_expired());
    }

    #[test]
    fn test_create_and_validate_token() {
        let claims = Claims::new(42, "a@x.com".to_string());
        let token = create_token(&claims, SECRET).expect("Should create token");

        let validated = validate_token(&token, SECRET).expect("Should validate token");
        assert_eq!(validated.id, 42);
        assert_eq!(validated.email, "a@x.com");
    }

    #[test]
    fn test_validate_with_wrong_secret() {
        let claims = Claims::new(1, "a@x.com".to_string());
        let token = create_token(&claims, "secret-one").expect("Should create token");

        let result = validate_token(&token, "a-different-secret");
        assert!(matches!(result, Err(JwtError::Invalid(_))));
    }

    #[test]
    fn test_validate_malformed_token() {
        let result = validate_token("not.a.token", SECRET);
        assert!(matches!(result, Err(JwtError::Invalid(_))));

        let result = validate_token("", SECRET);
        assert!(matches!(result, Err(JwtError::Invalid(_))));
    }

    #[test]
    fn test_validate_expired_token() {
        // Expired one hour ago
        let claims = Claims::with_ttl(1, "a@x.com".to_string(), Duration::seconds(-3600));
        assert!(claims.is_expired());

        let token = create_token(&claims, SECRET).expect("Should create token");
        let result = validate_token(&token, SECRET);

        assert!(matches!(result, Err(JwtError::Expired)));
    }

    #[test]
    fn test_expired_and_invalid_are_distinct() {
        let expired = Claims::with_ttl(1, "a@x.com".to_string(), Duration::seconds(-60));
        let expired_token = create_token(&expired, SECRET).unwrap();

        let fresh = Claims::new(1, "a@x.com".to_string());
        let tampered_token = format!("{}x", create_token(&fresh, SECRET).unwrap());

        assert!(matches!(
            validate_token(&expired_token, SECRET),
            Err(JwtError::Expired)
        ));
        assert!(matches!(
            validate_token(&tampered_token, SECRET),
            Err(JwtError::Invalid(_))
        ));
    }

    #[test]
    fn test_token_authenticates_only_its_subject() {
        let token_a = create_token(&Claims::new(1, "a@x.com".to_string()), SECRET).unwrap();
        let token_b = create_token(&Claims::new(2, "b@x.com".to_string()), SECRET).unwrap();

        assert_eq!(validate_token(&token_a, SECRET).unwrap().id, 1);
        assert_eq!(validate_token(&token_b, SECRET).unwrap().id, 2);
    }
}
