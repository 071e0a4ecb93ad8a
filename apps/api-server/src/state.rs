//! Application state - shared across all handlers.

use std::sync::Arc;

use chirp_core::ports::{AccountRepository, PasswordService, PostRepository, TokenService};
use chirp_core::{AccountService, PostService};
use chirp_infra::{Argon2PasswordService, DatabaseConnections, InMemoryStore, JwtTokenService};

#[cfg(feature = "postgres")]
use chirp_infra::{PostgresAccountRepository, PostgresPostRepository};

use crate::config::AppConfig;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub accounts: AccountService,
    pub posts: PostService,
    pub tokens: Arc<dyn TokenService>,
    pub db: Option<Arc<DatabaseConnections>>,
}

impl AppState {
    /// Build the application state with appropriate implementations.
    pub async fn new(config: &AppConfig) -> Self {
        let tokens: Arc<dyn TokenService> = Arc::new(JwtTokenService::new(config.jwt.clone()));

        #[cfg(feature = "postgres")]
        if let Some(db_config) = config.database.as_ref() {
            match DatabaseConnections::init(db_config).await {
                Ok(connections) => {
                    let conn = Arc::new(connections);
                    let accounts: Arc<dyn AccountRepository> =
                        Arc::new(PostgresAccountRepository::new(conn.main.clone()));
                    let posts: Arc<dyn PostRepository> =
                        Arc::new(PostgresPostRepository::new(conn.main.clone()));

                    tracing::info!("Application state initialized (postgres)");
                    return Self::assemble(accounts, posts, tokens, Some(conn));
                }
                Err(e) => {
                    tracing::error!(
                        "Failed to connect to database: {}. Using in-memory fallback.",
                        e
                    );
                }
            }
        } else {
            tracing::warn!("DATABASE_URL not set. Running without database (in-memory mode).");
        }

        #[cfg(not(feature = "postgres"))]
        if config.database.is_some() {
            tracing::warn!("Built without postgres feature - ignoring DATABASE_URL");
        }

        tracing::info!("Application state initialized (in-memory)");
        Self::in_memory(tokens)
    }

    /// State backed by a fresh in-memory store.
    pub fn in_memory(tokens: Arc<dyn TokenService>) -> Self {
        let store = InMemoryStore::new();
        Self::assemble(
            Arc::new(store.accounts()),
            Arc::new(store.posts()),
            tokens,
            None,
        )
    }

    pub(crate) fn assemble(
        accounts: Arc<dyn AccountRepository>,
        posts: Arc<dyn PostRepository>,
        tokens: Arc<dyn TokenService>,
        db: Option<Arc<DatabaseConnections>>,
    ) -> Self {
        let passwords: Arc<dyn PasswordService> = Arc::new(Argon2PasswordService::new());

        Self {
            accounts: AccountService::new(accounts.clone(), passwords),
            posts: PostService::new(posts, accounts),
            tokens,
            db,
        }
    }
}
