//! Post handlers.

use actix_web::{HttpResponse, web};
use uuid::Uuid;

use chirp_core::domain::Post;
use chirp_shared::dto::{PostResponse, PublishPostRequest};

use crate::middleware::auth::Identity;
use crate::middleware::error::AppResult;
use crate::state::AppState;

pub(super) fn post_response(post: Post) -> PostResponse {
    PostResponse {
        id: post.id,
        author_id: post.author_id,
        body: post.body,
        created_at: post.created_at,
    }
}

/// GET /api/posts
pub async fn feed(state: web::Data<AppState>) -> AppResult<HttpResponse> {
    let posts: Vec<PostResponse> = state
        .posts
        .feed()
        .await?
        .into_iter()
        .map(post_response)
        .collect();

    Ok(HttpResponse::Ok().json(posts))
}

/// GET /api/posts/{id}
pub async fn show(state: web::Data<AppState>, path: web::Path<Uuid>) -> AppResult<HttpResponse> {
    let post = state.posts.get(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(post_response(post)))
}

/// POST /api/posts
///
/// The author is always the session's account.
pub async fn publish(
    state: web::Data<AppState>,
    identity: Identity,
    body: web::Json<PublishPostRequest>,
) -> AppResult<HttpResponse> {
    tracing::debug!(handle = %identity.handle, "Publishing post");

    let post = state
        .posts
        .publish(Some(identity.account_id), body.into_inner().body)
        .await?;

    Ok(HttpResponse::Created().json(post_response(post)))
}
