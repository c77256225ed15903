//! Authentication ports: session tokens and password hashing.

use uuid::Uuid;

/// Claims carried by a session token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenClaims {
    pub user_id: Uuid,
    pub username: String,
    pub issued_at: i64,
    pub expires_at: i64,
}

impl TokenClaims {
    /// Seconds of validity left at `now` (unix seconds). Negative once the
    /// token has expired.
    pub fn remaining_seconds(&self, now: i64) -> i64 {
        self.expires_at - now
    }
}

/// Token service trait for session token operations.
pub trait TokenService: Send + Sync {
    /// Issue a token for a user with the full configured lifetime.
    fn issue_token(&self, user_id: Uuid, username: &str) -> Result<String, AuthError>;

    /// Verify a token's signature and expiry and decode its claims.
    fn verify_token(&self, token: &str) -> Result<TokenClaims, AuthError>;

    /// Full token lifetime in seconds. Doubles as the cookie max-age.
    fn lifetime_seconds(&self) -> i64;

    /// Remaining validity below which a verified token gets reissued.
    fn renewal_threshold_seconds(&self) -> i64;
}

/// Password hashing service.
pub trait PasswordService: Send + Sync {
    /// Hash a plain text password.
    fn hash(&self, password: &str) -> Result<String, AuthError>;

    /// Verify a password against a hash.
    fn verify(&self, password: &str, hash: &str) -> Result<bool, AuthError>;
}

/// Authentication errors.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("Token expired")]
    TokenExpired,

    #[error("Invalid token: {0}")]
    InvalidToken(String),

    #[error("Hashing error: {0}")]
    HashingError(String),
}
