//! HTTP handlers and route configuration.

mod accounts;
mod auth;
mod health;
mod posts;


use actix_web::{HttpResponse, error::InternalError, web};
use chirp_shared::ErrorResponse;

/// Configure all application routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.app_data(json_config()).service(
        web::scope("/api")
            // Public routes
            .route("/health", web::get().to(health::health_check))
            // Auth routes
            .service(
                web::scope("/auth")
                    .route("/register", web::post().to(auth::register))
                    .route("/login", web::post().to(auth::login))
                    .route("/me", web::get().to(auth::me)),
            )
            // `/me` must be registered ahead of `/{id}`
            .service(
                web::scope("/accounts")
                    .route("", web::get().to(accounts::list))
                    .route("/me", web::patch().to(accounts::update_me))
                    .route("/me", web::delete().to(accounts::delete_me))
                    .route("/{id}", web::get().to(accounts::show))
                    .route("/{id}/posts", web::get().to(accounts::posts_by_account)),
            )
            .service(
                web::scope("/posts")
                    .route("", web::get().to(posts::feed))
                    .route("", web::post().to(posts::publish))
                    .route("/{id}", web::get().to(posts::show)),
            ),
    );
}

/// Malformed JSON bodies become problem documents instead of plain text.
fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, _req| {
        let detail = err.to_string();
        InternalError::from_response(
            err,
            HttpResponse::BadRequest().json(ErrorResponse::bad_request(detail)),
        )
        .into()
    })
}
