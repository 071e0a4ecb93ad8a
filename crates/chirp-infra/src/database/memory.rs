//! In-memory account and post store - used when no database is configured
//! and in tests.
//!
//! Both repositories share one lock over both tables, so uniqueness checks
//! and inserts are atomic and deleting an account removes its posts in the
//! same step. Data is lost on process restart.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use chirp_core::domain::{Account, Post};
use chirp_core::error::RepoError;
use chirp_core::ports::{AccountRepository, PostRepository};

#[derive(Default)]
struct Tables {
    // Registration order.
    accounts: Vec<Account>,
    posts: Vec<Post>,
}

impl Tables {
    /// A handle clash with any row wins over an email clash.
    fn clash(&self, candidate: &Account) -> Option<&'static str> {
        let mut others = self.accounts.iter().filter(|a| a.id != candidate.id);
        if others.clone().any(|other| other.handle == candidate.handle) {
            Some("handle")
        } else if others.any(|other| other.email == candidate.email) {
            Some("email")
        } else {
            None
        }
    }
}

/// Shared storage behind [`InMemoryAccountRepository`] and [`InMemoryPostRepository`].
#[derive(Clone, Default)]
pub struct InMemoryStore {
    tables: Arc<RwLock<Tables>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn accounts(&self) -> InMemoryAccountRepository {
        InMemoryAccountRepository {
            store: self.clone(),
        }
    }

    pub fn posts(&self) -> InMemoryPostRepository {
        InMemoryPostRepository {
            store: self.clone(),
        }
    }
}

pub struct InMemoryAccountRepository {
    store: InMemoryStore,
}

pub struct InMemoryPostRepository {
    store: InMemoryStore,
}

fn newest_first(mut posts: Vec<Post>) -> Vec<Post> {
    // Stable sort keeps later inserts first among equal timestamps.
    posts.reverse();
    posts.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    posts
}

#[async_trait]
impl AccountRepository for InMemoryAccountRepository {
    async fn create(&self, account: Account) -> Result<Account, RepoError> {
        let mut tables = self.store.tables.write().await;

        if tables.accounts.iter().any(|a| a.id == account.id) {
            return Err(RepoError::Query(format!("account {} already stored", account.id)));
        }
        if let Some(field) = tables.clash(&account) {
            return Err(RepoError::DuplicateKey { field });
        }

        tables.accounts.push(account.clone());
        Ok(account)
    }

    async fn update(&self, account: Account) -> Result<Account, RepoError> {
        let mut tables = self.store.tables.write().await;

        if let Some(field) = tables.clash(&account) {
            return Err(RepoError::DuplicateKey { field });
        }

        let slot = tables
            .accounts
            .iter_mut()
            .find(|a| a.id == account.id)
            .ok_or(RepoError::NotFound)?;
        *slot = account.clone();
        Ok(account)
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        let mut tables = self.store.tables.write().await;

        let before = tables.accounts.len();
        tables.accounts.retain(|a| a.id != id);
        if tables.accounts.len() == before {
            return Err(RepoError::NotFound);
        }

        tables.posts.retain(|p| p.author_id != id);
        Ok(())
    }

    async fn get(&self, id: Uuid) -> Result<Option<Account>, RepoError> {
        let tables = self.store.tables.read().await;
        Ok(tables.accounts.iter().find(|a| a.id == id).cloned())
    }

    async fn find_by_handle(&self, handle: &str) -> Result<Option<Account>, RepoError> {
        let tables = self.store.tables.read().await;
        Ok(tables.accounts.iter().find(|a| a.handle == handle).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Account>, RepoError> {
        let tables = self.store.tables.read().await;
        Ok(tables.accounts.iter().find(|a| a.email == email).cloned())
    }

    async fn list(&self) -> Result<Vec<Account>, RepoError> {
        let tables = self.store.tables.read().await;
        Ok(tables.accounts.clone())
    }
}

#[async_trait]
impl PostRepository for InMemoryPostRepository {
    async fn create(&self, post: Post) -> Result<Post, RepoError> {
        let mut tables = self.store.tables.write().await;

        if !tables.accounts.iter().any(|a| a.id == post.author_id) {
            return Err(RepoError::InvalidReference(post.author_id));
        }

        tables.posts.push(post.clone());
        Ok(post)
    }

    async fn get(&self, id: Uuid) -> Result<Option<Post>, RepoError> {
        let tables = self.store.tables.read().await;
        Ok(tables.posts.iter().find(|p| p.id == id).cloned())
    }

    async fn list_by_author(&self, author_id: Uuid) -> Result<Vec<Post>, RepoError> {
        let tables = self.store.tables.read().await;
        let posts = tables
            .posts
            .iter()
            .filter(|p| p.author_id == author_id)
            .cloned()
            .collect();
        Ok(newest_first(posts))
    }

    async fn list_all(&self) -> Result<Vec<Post>, RepoError> {
        let tables = self.store.tables.read().await;
        Ok(newest_first(tables.posts.clone()))
    }
}
