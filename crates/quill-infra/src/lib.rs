//! # Quill Infrastructure
//!
//! Concrete implementations of the ports defined in `quill-core`:
//! token signing, password hashing, and persistence.
//!
//! ## Feature Flags
//!
//! - `postgres` (default) - PostgreSQL persistence via SeaORM. Without it
//!   the in-memory repositories are the only backends.

pub mod auth;
pub mod database;

pub use auth::{Argon2PasswordService, JwtTokenService};
pub use database::{InMemoryPostRepository, InMemoryUserRepository};

#[cfg(feature = "postgres")]
pub use database::{PostgresPostRepository, PostgresUserRepository};
