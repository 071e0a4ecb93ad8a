use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{Account, Post};
use crate::error::RepoError;

/// Account storage.
///
/// Implementations must perform the handle/email uniqueness check and the
/// write as one atomic step.
#[async_trait]
pub trait AccountRepository: Send + Sync {
    /// Insert a new account. Fails with [`RepoError::DuplicateKey`] when the
    /// handle or email is taken.
    async fn create(&self, account: Account) -> Result<Account, RepoError>;

    /// Replace a stored account. Same uniqueness rules as `create`, ignoring
    /// the account's own row.
    async fn update(&self, account: Account) -> Result<Account, RepoError>;

    /// Delete an account and every post it authored.
    async fn delete(&self, id: Uuid) -> Result<(), RepoError>;

    /// Find an account by its unique ID.
    async fn get(&self, id: Uuid) -> Result<Option<Account>, RepoError>;

    async fn find_by_handle(&self, handle: &str) -> Result<Option<Account>, RepoError>;

    async fn find_by_email(&self, email: &str) -> Result<Option<Account>, RepoError>;

    /// All accounts in registration order.
    async fn list(&self) -> Result<Vec<Account>, RepoError>;
}

/// Post storage.
#[async_trait]
pub trait PostRepository: Send + Sync {
    /// Insert a post. Fails with [`RepoError::InvalidReference`] when the
    /// author is not a live account.
    async fn create(&self, post: Post) -> Result<Post, RepoError>;

    async fn get(&self, id: Uuid) -> Result<Option<Post>, RepoError>;

    /// Posts by one author, newest first.
    async fn list_by_author(&self, author_id: Uuid) -> Result<Vec<Post>, RepoError>;

    /// Every post, newest first.
    async fn list_all(&self) -> Result<Vec<Post>, RepoError>;
}
