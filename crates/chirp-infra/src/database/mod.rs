//! Persistence: connection management, SeaORM repositories and the
//! in-memory fallback store.

mod connections;
mod memory;

#[cfg(feature = "postgres")]
pub mod entity;
#[cfg(feature = "postgres")]
pub mod postgres_repo;

pub use connections::{DatabaseConfig, DatabaseConnections};
pub use memory::{InMemoryAccountRepository, InMemoryPostRepository, InMemoryStore};

#[cfg(feature = "postgres")]
pub use postgres_repo::{PostgresAccountRepository, PostgresPostRepository};
