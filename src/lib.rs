//! Team health check: engineers rate their team on a fixed set of cards
//! each session, leaders read the results at the scope their role allows.

pub mod auth;
pub mod config;
pub mod db;
pub mod errors;
pub mod handlers;
pub mod models;
pub mod templates_structs;

use actix_web::web;

use crate::auth::middleware::require_auth;

/// Every route of the application, shared by `main` and the HTTP tests.
pub fn routes(cfg: &mut web::ServiceConfig) {
    cfg
        // Public routes
        .route("/login", web::get().to(handlers::auth_handlers::login_page))
        .route("/login", web::post().to(handlers::auth_handlers::login_submit))
        .route("/register", web::get().to(handlers::register_handlers::register_page))
        .route("/register", web::post().to(handlers::register_handlers::register_submit))
        // Root redirect
        .route("/", web::get().to(|| async { errors::redirect("/dashboard") }))
        // JSON API has its own session guard
        .service(web::scope("/api/v1").configure(handlers::api_v1::configure))
        // Protected routes
        .service(
            web::scope("")
                .wrap(actix_web::middleware::from_fn(require_auth))
                .route("/dashboard", web::get().to(handlers::dashboard::index))
                .route("/dashboard/team", web::get().to(handlers::dashboard::team))
                .route("/dashboard/department", web::get().to(handlers::dashboard::department))
                .route("/vote", web::get().to(handlers::vote_handlers::vote_form))
                .route("/vote", web::post().to(handlers::vote_handlers::vote_submit))
                .route("/account", web::get().to(handlers::account_handlers::form))
                .route("/account", web::post().to(handlers::account_handlers::submit))
                .route("/account/profile", web::post().to(handlers::account_handlers::update_profile))
                .route("/logout", web::post().to(handlers::auth_handlers::logout))
                .default_service(web::to(not_found)),
        );
}

/// Default 404 page.
async fn not_found() -> actix_web::HttpResponse {
    let html = include_str!("../templates/errors/404.html");
    actix_web::HttpResponse::NotFound()
        .content_type("text/html; charset=utf-8")
        .body(html)
}
