//! Publishing and reading posts.

use std::sync::Arc;

use uuid::Uuid;

use crate::domain::{Post, PostDraft};
use crate::error::DomainError;
use crate::ports::{AccountRepository, PostRepository};

#[derive(Clone)]
pub struct PostService {
    posts: Arc<dyn PostRepository>,
    accounts: Arc<dyn AccountRepository>,
}

impl PostService {
    pub fn new(posts: Arc<dyn PostRepository>, accounts: Arc<dyn AccountRepository>) -> Self {
        Self { posts, accounts }
    }

    /// Publish `body` as `author_id`, the account bound to the caller's session.
    pub async fn publish(
        &self,
        author_id: Option<Uuid>,
        body: String,
    ) -> Result<Post, DomainError> {
        let draft = PostDraft { author_id, body };
        draft.validate()?;

        let post = draft
            .into_post()
            .ok_or_else(|| DomainError::Internal("validated draft has no author".to_string()))?;
        let saved = self.posts.create(post).await?;

        tracing::info!(post_id = %saved.id, author_id = %saved.author_id, "Post published");
        Ok(saved)
    }

    /// Field rules, then whether the author is still a live account.
    pub async fn validate(&self, post: &Post) -> Result<(), DomainError> {
        post.validate()?;

        if self.accounts.get(post.author_id).await?.is_none() {
            return Err(DomainError::InvalidReference {
                author_id: post.author_id,
            });
        }
        Ok(())
    }

    pub async fn get(&self, id: Uuid) -> Result<Post, DomainError> {
        self.posts
            .get(id)
            .await?
            .ok_or(DomainError::NotFound {
                entity_type: "post",
                id,
            })
    }

    /// Posts by one author, newest first.
    pub async fn list_by_author(&self, author_id: Uuid) -> Result<Vec<Post>, DomainError> {
        if self.accounts.get(author_id).await?.is_none() {
            return Err(DomainError::NotFound {
                entity_type: "account",
                id: author_id,
            });
        }
        Ok(self.posts.list_by_author(author_id).await?)
    }

    /// Every post, newest first.
    pub async fn feed(&self) -> Result<Vec<Post>, DomainError> {
        Ok(self.posts.list_all().await?)
    }
}
