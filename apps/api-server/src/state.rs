//! Application state - shared across all handlers.

use std::sync::Arc;

use quill_core::ports::{PasswordService, PostRepository, TokenService, UserRepository};
use quill_infra::auth::{Argon2PasswordService, JwtTokenService};
use quill_infra::database::{InMemoryPostRepository, InMemoryUserRepository};

#[cfg(feature = "postgres")]
use quill_infra::database::{PostgresPostRepository, PostgresUserRepository, connect};

use crate::config::AppConfig;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub users: Arc<dyn UserRepository>,
    pub posts: Arc<dyn PostRepository>,
    pub tokens: Arc<dyn TokenService>,
    pub passwords: Arc<dyn PasswordService>,
}

impl AppState {
    /// Build the application state with appropriate implementations.
    pub async fn new(config: &AppConfig) -> Self {
        let tokens: Arc<dyn TokenService> = Arc::new(JwtTokenService::new(&config.jwt_secret));
        let passwords: Arc<dyn PasswordService> = Arc::new(Argon2PasswordService::new());

        #[cfg(feature = "postgres")]
        let (users, posts): (Arc<dyn UserRepository>, Arc<dyn PostRepository>) = {
            if let Some(db_config) = &config.database {
                match connect(db_config).await {
                    Ok(conn) => {
                        // Both repositories ride the same pool handle.
                        let conn = Arc::new(conn);
                        (
                            Arc::new(PostgresUserRepository::new(conn.clone())),
                            Arc::new(PostgresPostRepository::new(conn)),
                        )
                    }
                    Err(e) => {
                        tracing::error!(
                            "Failed to connect to database: {}. Using in-memory fallback.",
                            e
                        );
                        memory_repos()
                    }
                }
            } else {
                tracing::warn!("DATABASE_URL not set. Running without database (in-memory mode).");
                memory_repos()
            }
        };

        #[cfg(not(feature = "postgres"))]
        let (users, posts): (Arc<dyn UserRepository>, Arc<dyn PostRepository>) = {
            tracing::info!("Running without postgres feature - using in-memory repositories");
            memory_repos()
        };

        tracing::info!("Application state initialized");

        Self {
            users,
            posts,
            tokens,
            passwords,
        }
    }
}

fn memory_repos() -> (Arc<dyn UserRepository>, Arc<dyn PostRepository>) {
    (
        Arc::new(InMemoryUserRepository::new()),
        Arc::new(InMemoryPostRepository::new()),
    )
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;

    pub(crate) const TEST_SECRET: &str = "test-signing-secret";

    /// State backed entirely by in-memory implementations.
    pub(crate) fn memory_state() -> AppState {
        let (users, posts) = memory_repos();
        AppState {
            users,
            posts,
            tokens: Arc::new(JwtTokenService::new(TEST_SECRET)),
            passwords: Arc::new(Argon2PasswordService::new()),
        }
    }

    /// Full application with routing and the session middleware, as wired
    /// in `main`.
    macro_rules! init_app {
        ($state:expr) => {
            actix_web::test::init_service(
                actix_web::App::new()
                    .wrap(crate::middleware::session::SessionMiddleware::new(
                        $state.tokens.clone(),
                        $state.users.clone(),
                    ))
                    .app_data(actix_web::web::Data::new($state.clone()))
                    .configure(crate::handlers::configure_routes),
            )
        };
    }

    pub(crate) use init_app;
}
