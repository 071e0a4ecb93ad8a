//! Account entity for SeaORM.

use sea_orm::Set;
use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "accounts")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub handle: String,
    pub given_name: String,
    pub family_name: String,
    #[sea_orm(unique)]
    pub email: String,
    pub bio: String,
    #[sea_orm(column_type = "Text")]
    pub credential_hash: String,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::post::Entity")]
    Post,
}

impl Related<super::post::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Post.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Conversion from SeaORM Model to Domain Account.
impl From<Model> for chirp_core::domain::Account {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            handle: model.handle,
            given_name: model.given_name,
            family_name: model.family_name,
            email: model.email,
            bio: model.bio,
            credential_hash: model.credential_hash,
            created_at: model.created_at.into(),
            updated_at: model.updated_at.into(),
        }
    }
}

/// Conversion from Domain Account to SeaORM ActiveModel.
impl From<chirp_core::domain::Account> for ActiveModel {
    fn from(account: chirp_core::domain::Account) -> Self {
        Self {
            id: Set(account.id),
            handle: Set(account.handle),
            given_name: Set(account.given_name),
            family_name: Set(account.family_name),
            email: Set(account.email),
            bio: Set(account.bio),
            credential_hash: Set(account.credential_hash),
            created_at: Set(account.created_at.into()),
            updated_at: Set(account.updated_at.into()),
        }
    }
}
