//! Minimal port implementations for service tests.

use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{Account, Post};
use crate::error::RepoError;
use crate::ports::{AccountRepository, AuthError, PasswordService, PostRepository};

#[derive(Default)]
pub struct FakeAccounts {
    rows: Mutex<Vec<Account>>,
}

impl FakeAccounts {
    pub fn remove(&self, id: Uuid) {
        self.rows.lock().unwrap().retain(|a| a.id != id);
    }
}

#[async_trait]
impl AccountRepository for FakeAccounts {
    async fn create(&self, account: Account) -> Result<Account, RepoError> {
        self.rows.lock().unwrap().push(account.clone());
        Ok(account)
    }

    async fn update(&self, account: Account) -> Result<Account, RepoError> {
        let mut rows = self.rows.lock().unwrap();
        let slot = rows
            .iter_mut()
            .find(|a| a.id == account.id)
            .ok_or(RepoError::NotFound)?;
        *slot = account.clone();
        Ok(account)
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        self.remove(id);
        Ok(())
    }

    async fn get(&self, id: Uuid) -> Result<Option<Account>, RepoError> {
        Ok(self.rows.lock().unwrap().iter().find(|a| a.id == id).cloned())
    }

    async fn find_by_handle(&self, handle: &str) -> Result<Option<Account>, RepoError> {
        let rows = self.rows.lock().unwrap();
        Ok(rows.iter().find(|a| a.handle == handle).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Account>, RepoError> {
        let rows = self.rows.lock().unwrap();
        Ok(rows.iter().find(|a| a.email == email).cloned())
    }

    async fn list(&self) -> Result<Vec<Account>, RepoError> {
        Ok(self.rows.lock().unwrap().clone())
    }
}

#[derive(Default)]
pub struct FakePosts {
    rows: Mutex<Vec<Post>>,
}

#[async_trait]
impl PostRepository for FakePosts {
    async fn create(&self, post: Post) -> Result<Post, RepoError> {
        self.rows.lock().unwrap().push(post.clone());
        Ok(post)
    }

    async fn get(&self, id: Uuid) -> Result<Option<Post>, RepoError> {
        Ok(self.rows.lock().unwrap().iter().find(|p| p.id == id).cloned())
    }

    async fn list_by_author(&self, author_id: Uuid) -> Result<Vec<Post>, RepoError> {
        let rows = self.rows.lock().unwrap();
        Ok(rows.iter().filter(|p| p.author_id == author_id).cloned().collect())
    }

    async fn list_all(&self) -> Result<Vec<Post>, RepoError> {
        Ok(self.rows.lock().unwrap().clone())
    }
}

/// Reversible "hashing" that counts its calls.
#[derive(Default)]
pub struct CountingPasswords {
    pub hashed: AtomicUsize,
    pub verified: AtomicUsize,
}

impl PasswordService for CountingPasswords {
    fn hash(&self, credential: &str) -> Result<String, AuthError> {
        self.hashed.fetch_add(1, Ordering::SeqCst);
        Ok(format!("plain:{credential}"))
    }

    fn verify(&self, credential: &str, hash: &str) -> Result<bool, AuthError> {
        self.verified.fetch_add(1, Ordering::SeqCst);
        Ok(hash == format!("plain:{credential}"))
    }
}
