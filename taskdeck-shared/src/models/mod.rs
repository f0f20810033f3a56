/// Database models
///
/// # Models
///
/// - `user`: user accounts, the credential store behind authentication
/// - `task`: per-user tasks with owner-scoped queries

pub mod task;
pub mod user;
