//! Use cases composed from the domain rules and the repository ports.

mod accounts;
mod posts;

#[cfg(test)]
mod fakes;

pub use accounts::AccountService;
pub use posts::PostService;
