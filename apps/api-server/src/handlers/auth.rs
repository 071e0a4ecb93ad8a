//! Authentication handlers.

use actix_web::{HttpResponse, web};

use chirp_core::DomainError;
use chirp_core::domain::{Account, Profile, RegisterAccount};
use chirp_shared::dto::{AuthResponse, LoginRequest, RegisterAccountRequest};

use super::accounts::account_response;
use crate::middleware::auth::Identity;
use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

fn issue_session(state: &AppState, account: &Account) -> AppResult<AuthResponse> {
    let token = state
        .tokens
        .generate_token(account.id, &account.handle)
        .map_err(|e| AppError::Internal(e.to_string()))?;

    Ok(AuthResponse {
        access_token: token,
        token_type: "Bearer".to_string(),
        expires_in: state.tokens.expiration_seconds().max(0) as u64,
    })
}

/// POST /api/auth/register
pub async fn register(
    state: web::Data<AppState>,
    body: web::Json<RegisterAccountRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();

    let account = state
        .accounts
        .register(RegisterAccount {
            profile: Profile {
                handle: req.handle,
                given_name: req.given_name,
                family_name: req.family_name,
                email: req.email,
                bio: req.bio.unwrap_or_default(),
            },
            credential: req.credential,
        })
        .await?;

    Ok(HttpResponse::Created().json(issue_session(&state, &account)?))
}

/// POST /api/auth/login
pub async fn login(
    state: web::Data<AppState>,
    body: web::Json<LoginRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();

    let account = state
        .accounts
        .authenticate(&req.handle, &req.credential)
        .await?;

    Ok(HttpResponse::Ok().json(issue_session(&state, &account)?))
}

/// GET /api/auth/me
pub async fn me(state: web::Data<AppState>, identity: Identity) -> AppResult<HttpResponse> {
    // A token can outlive its account.
    let account = state
        .accounts
        .get(identity.account_id)
        .await
        .map_err(|e| match e {
            DomainError::NotFound { .. } => AppError::Unauthorized,
            other => AppError::from(other),
        })?;

    Ok(HttpResponse::Ok().json(account_response(account)))
}
