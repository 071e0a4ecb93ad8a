//! # Chirp Infrastructure
//!
//! Concrete implementations of the ports defined in `chirp-core`:
//! account/post storage, credential hashing and session tokens.
//!
//! ## Feature Flags
//!
//! - `postgres` (default) - PostgreSQL repositories via SeaORM
//!
//! Without `postgres` only the in-memory store is available.

pub mod auth;
pub mod database;

pub use auth::{Argon2PasswordService, JwtConfig, JwtTokenService};
pub use database::{DatabaseConfig, DatabaseConnections, InMemoryStore};

#[cfg(feature = "postgres")]
pub use database::{PostgresAccountRepository, PostgresPostRepository};
