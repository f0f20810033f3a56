/// API route handlers
///
/// Organized by resource:
///
/// - `health`: health check endpoint
/// - `auth`: authentication endpoints (register, login)
/// - `tasks`: task CRUD endpoints (authenticated)

pub mod auth;
pub mod health;
pub mod tasks;
