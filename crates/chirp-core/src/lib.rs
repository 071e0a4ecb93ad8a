//! # Chirp Core
//!
//! The domain layer of the Chirp microblog.
//! This crate contains the account and post model, their validation rules,
//! the ports infrastructure must implement, and the services built on them.
//! It has zero infrastructure dependencies.

pub mod domain;
pub mod error;
pub mod ports;
pub mod services;

pub use error::{DomainError, RepoError};
pub use services::{AccountService, PostService};
