//! PostgreSQL repository implementations.

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseTransaction, DbConn, DbErr, EntityTrait,
    QueryFilter, QueryOrder, SqlErr, TransactionTrait,
};
use uuid::Uuid;

use chirp_core::domain::{Account, Post};
use chirp_core::error::RepoError;
use chirp_core::ports::{AccountRepository, PostRepository};

use super::entity::account::{self, Entity as AccountEntity};
use super::entity::post::{self, Entity as PostEntity};

/// Translate a SeaORM failure, recognising constraint violations raised by
/// the unique indexes on `accounts`.
fn storage_error(err: DbErr) -> RepoError {
    if let Some(SqlErr::UniqueConstraintViolation(detail)) = err.sql_err() {
        let field = if detail.contains("email") {
            "email"
        } else {
            "handle"
        };
        return RepoError::DuplicateKey { field };
    }

    match err {
        DbErr::Conn(e) => RepoError::Connection(e.to_string()),
        DbErr::ConnectionAcquire(e) => RepoError::Connection(e.to_string()),
        DbErr::RecordNotUpdated => RepoError::NotFound,
        other => RepoError::Query(other.to_string()),
    }
}

fn mask_email(email: &str) -> String {
    match email.find('@') {
        Some(at_pos) => {
            let (local, domain) = email.split_at(at_pos);
            let masked_local = match local.chars().next() {
                Some(first) if local.chars().count() > 1 => format!("{first}***"),
                _ => "***".to_string(),
            };
            format!("{masked_local}{domain}")
        }
        None => "***".to_string(),
    }
}

/// Look for another account already holding `candidate`'s handle or email.
async fn find_clash(
    txn: &DatabaseTransaction,
    candidate: &Account,
) -> Result<Option<&'static str>, RepoError> {
    let clashes = AccountEntity::find()
        .filter(
            Condition::any()
                .add(account::Column::Handle.eq(candidate.handle.as_str()))
                .add(account::Column::Email.eq(candidate.email.as_str())),
        )
        .filter(account::Column::Id.ne(candidate.id))
        .all(txn)
        .await
        .map_err(storage_error)?;

    // A handle clash on any row wins over an email clash.
    let field = if clashes.iter().any(|other| other.handle == candidate.handle) {
        Some("handle")
    } else if clashes.iter().any(|other| other.email == candidate.email) {
        Some("email")
    } else {
        None
    };
    Ok(field)
}

/// PostgreSQL account repository.
pub struct PostgresAccountRepository {
    db: DbConn,
}

impl PostgresAccountRepository {
    pub fn new(db: DbConn) -> Self {
        Self { db }
    }
}

#[async_trait]
impl AccountRepository for PostgresAccountRepository {
    async fn create(&self, account: Account) -> Result<Account, RepoError> {
        let txn = self.db.begin().await.map_err(storage_error)?;

        if let Some(field) = find_clash(&txn, &account).await? {
            return Err(RepoError::DuplicateKey { field });
        }

        let active_model: account::ActiveModel = account.into();
        let model = active_model.insert(&txn).await.map_err(storage_error)?;
        txn.commit().await.map_err(storage_error)?;

        Ok(model.into())
    }

    async fn update(&self, account: Account) -> Result<Account, RepoError> {
        let txn = self.db.begin().await.map_err(storage_error)?;

        if let Some(field) = find_clash(&txn, &account).await? {
            return Err(RepoError::DuplicateKey { field });
        }

        let active_model: account::ActiveModel = account.into();
        let model = active_model.update(&txn).await.map_err(storage_error)?;
        txn.commit().await.map_err(storage_error)?;

        Ok(model.into())
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        // Posts go with the account through ON DELETE CASCADE.
        let result = AccountEntity::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(storage_error)?;

        if result.rows_affected == 0 {
            return Err(RepoError::NotFound);
        }

        Ok(())
    }

    async fn get(&self, id: Uuid) -> Result<Option<Account>, RepoError> {
        let result = AccountEntity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(storage_error)?;

        Ok(result.map(Into::into))
    }

    async fn find_by_handle(&self, handle: &str) -> Result<Option<Account>, RepoError> {
        tracing::debug!(handle, "Finding account by handle");

        let result = AccountEntity::find()
            .filter(account::Column::Handle.eq(handle))
            .one(&self.db)
            .await
            .map_err(storage_error)?;

        Ok(result.map(Into::into))
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Account>, RepoError> {
        // Mask email for logging to avoid PII in logs
        tracing::debug!(account_email = %mask_email(email), "Finding account by email");

        let result = AccountEntity::find()
            .filter(account::Column::Email.eq(email))
            .one(&self.db)
            .await
            .map_err(storage_error)?;

        Ok(result.map(Into::into))
    }

    async fn list(&self) -> Result<Vec<Account>, RepoError> {
        let result = AccountEntity::find()
            .order_by_asc(account::Column::CreatedAt)
            .order_by_asc(account::Column::Id)
            .all(&self.db)
            .await
            .map_err(storage_error)?;

        Ok(result.into_iter().map(Into::into).collect())
    }
}

/// PostgreSQL post repository.
pub struct PostgresPostRepository {
    db: DbConn,
}

impl PostgresPostRepository {
    pub fn new(db: DbConn) -> Self {
        Self { db }
    }
}

#[async_trait]
impl PostRepository for PostgresPostRepository {
    async fn create(&self, post: Post) -> Result<Post, RepoError> {
        let author_id = post.author_id;
        let txn = self.db.begin().await.map_err(storage_error)?;

        let author = AccountEntity::find_by_id(author_id)
            .one(&txn)
            .await
            .map_err(storage_error)?;
        if author.is_none() {
            return Err(RepoError::InvalidReference(author_id));
        }

        let active_model: post::ActiveModel = post.into();
        let model = active_model.insert(&txn).await.map_err(|e| {
            // The author can vanish between the lookup and the insert.
            if let Some(SqlErr::ForeignKeyConstraintViolation(_)) = e.sql_err() {
                RepoError::InvalidReference(author_id)
            } else {
                storage_error(e)
            }
        })?;
        txn.commit().await.map_err(storage_error)?;

        Ok(model.into())
    }

    async fn get(&self, id: Uuid) -> Result<Option<Post>, RepoError> {
        let result = PostEntity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(storage_error)?;

        Ok(result.map(Into::into))
    }

    async fn list_by_author(&self, author_id: Uuid) -> Result<Vec<Post>, RepoError> {
        let result = PostEntity::find()
            .filter(post::Column::AuthorId.eq(author_id))
            .order_by_desc(post::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(storage_error)?;

        Ok(result.into_iter().map(Into::into).collect())
    }

    async fn list_all(&self) -> Result<Vec<Post>, RepoError> {
        let result = PostEntity::find()
            .order_by_desc(post::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(storage_error)?;

        Ok(result.into_iter().map(Into::into).collect())
    }
}
