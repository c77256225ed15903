//! Authentication implementations.

mod jwt;
mod password;

pub use jwt::{JwtTokenService, RENEWAL_THRESHOLD_SECS, TOKEN_LIFETIME_SECS};
pub use password::Argon2PasswordService;
