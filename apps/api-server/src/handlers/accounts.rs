//! Account handlers.

use actix_web::{HttpResponse, web};
use uuid::Uuid;

use chirp_core::domain::{Account, ProfileChanges};
use chirp_shared::dto::{AccountResponse, UpdateProfileRequest};

use super::posts::post_response;
use crate::middleware::auth::Identity;
use crate::middleware::error::AppResult;
use crate::state::AppState;

pub(super) fn account_response(account: Account) -> AccountResponse {
    AccountResponse {
        id: account.id,
        handle: account.handle,
        given_name: account.given_name,
        family_name: account.family_name,
        email: account.email,
        bio: account.bio,
        created_at: account.created_at,
    }
}

/// GET /api/accounts
pub async fn list(state: web::Data<AppState>) -> AppResult<HttpResponse> {
    let accounts: Vec<AccountResponse> = state
        .accounts
        .list()
        .await?
        .into_iter()
        .map(account_response)
        .collect();

    Ok(HttpResponse::Ok().json(accounts))
}

/// GET /api/accounts/{id}
pub async fn show(state: web::Data<AppState>, path: web::Path<Uuid>) -> AppResult<HttpResponse> {
    let account = state.accounts.get(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(account_response(account)))
}

/// PATCH /api/accounts/me
pub async fn update_me(
    state: web::Data<AppState>,
    identity: Identity,
    body: web::Json<UpdateProfileRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();
    let changes = ProfileChanges {
        handle: req.handle,
        given_name: req.given_name,
        family_name: req.family_name,
        email: req.email,
        bio: req.bio,
    };

    let account = state
        .accounts
        .update_profile(identity.account_id, changes)
        .await?;

    Ok(HttpResponse::Ok().json(account_response(account)))
}

/// DELETE /api/accounts/me
///
/// Removes the account and every post it authored.
pub async fn delete_me(state: web::Data<AppState>, identity: Identity) -> AppResult<HttpResponse> {
    state.accounts.delete(identity.account_id).await?;
    Ok(HttpResponse::NoContent().finish())
}

/// GET /api/accounts/{id}/posts
pub async fn posts_by_account(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let posts: Vec<_> = state
        .posts
        .list_by_author(path.into_inner())
        .await?
        .into_iter()
        .map(post_response)
        .collect();

    Ok(HttpResponse::Ok().json(posts))
}
