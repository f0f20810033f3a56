/// Authentication primitives
///
/// # Modules
///
/// - [`password`]: Argon2id password hashing and verification
/// - [`jwt`]: bearer token issuance and validation (HS256, 24h expiry)
/// - [`middleware`]: the per-request authenticator for protected routes
///
/// The pieces compose left to right: registration and login hash/verify
/// via [`password`] and issue via [`jwt`]; every protected request is
/// then walked through [`middleware`], which validates the token and
/// loads the principal from the credential store.

pub mod jwt;
pub mod middleware;
pub mod password;
