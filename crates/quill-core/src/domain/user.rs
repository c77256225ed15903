use chrono::{DateTime, Utc};
use uuid::Uuid;

/// User entity - a registered account.
///
/// Deliberately not serializable: the password hash must never reach the
/// wire, so API responses are built from explicit response types instead.
#[derive(Debug, Clone)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Create a new user with a generated ID.
    pub fn new(username: String, password_hash: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            username,
            password_hash,
            created_at: Utc::now(),
        }
    }
}
