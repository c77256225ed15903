//! Middleware modules.

pub mod auth;
pub mod error;
pub mod load;
pub mod session;
