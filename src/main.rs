use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::{App, HttpServer, middleware, web};

use healthcheck::auth::rate_limit::RateLimiter;
use healthcheck::config::{AppConfig, SiteInfo};
use healthcheck::db;

fn io_error(e: impl std::fmt::Display) -> std::io::Error {
    std::io::Error::other(e.to_string())
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init();

    let config = AppConfig::from_env().map_err(io_error)?;

    // Initialize database
    let pool = db::init_pool(&config.database_url).await.map_err(io_error)?;
    db::run_migrations(&pool).await.map_err(io_error)?;

    if config.seed_demo {
        db::seed_demo(&pool).await.map_err(io_error)?;
    }

    let secret_key = config.cookie_key();
    let site = web::Data::new(SiteInfo { app_name: config.app_name.clone() });
    let limiter = web::Data::new(RateLimiter::new());

    log::info!("Starting server at http://{}", config.bind_addr);

    HttpServer::new(move || {
        let session_mw = SessionMiddleware::builder(
            CookieSessionStore::default(),
            secret_key.clone(),
        )
        .cookie_secure(false)
        .cookie_http_only(true)
        .build();

        App::new()
            .wrap(session_mw)
            .wrap(middleware::Logger::default())
            .app_data(web::Data::new(pool.clone()))
            .app_data(site.clone())
            .app_data(limiter.clone())
            // Static files
            .service(actix_files::Files::new("/static", "./static"))
            .configure(healthcheck::routes)
    })
    .bind(config.bind_addr.as_str())?
    .run()
    .await
}
