use actix_session::Session;
use actix_web::{web, HttpRequest, HttpResponse};
use serde::Deserialize;
use sqlx::PgPool;

use crate::auth::middleware::safe_next;
use crate::auth::session::{get_user_id, log_in};
use crate::auth::{csrf, password, rate_limit::RateLimiter};
use crate::config::SiteInfo;
use crate::errors::{AppError, redirect, render};
use crate::models::user;
use crate::templates_structs::LoginTemplate;

#[derive(Deserialize)]
pub struct LoginQuery {
    pub next: Option<String>,
}

#[derive(Deserialize)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
    pub csrf_token: String,
    #[serde(default)]
    pub next: String,
}

#[derive(Deserialize)]
pub struct CsrfOnly {
    pub csrf_token: String,
}

fn login_page_with(
    session: &Session,
    site: &SiteInfo,
    error: Option<&str>,
    next: &str,
    username: &str,
) -> Result<HttpResponse, AppError> {
    render(LoginTemplate {
        error: error.map(str::to_string),
        app_name: site.app_name.clone(),
        csrf_token: csrf::get_or_create_token(session),
        next: next.to_string(),
        username: username.to_string(),
    })
}

pub async fn login_page(
    pool: web::Data<PgPool>,
    site: web::Data<SiteInfo>,
    session: Session,
    query: web::Query<LoginQuery>,
) -> Result<HttpResponse, AppError> {
    let next = safe_next(query.next.as_deref());
    if let Some(user_id) = get_user_id(&session) {
        // Already logged in, unless the account has since been deleted
        if user::find_profile(&pool, user_id).await?.is_some() {
            return Ok(redirect(next));
        }
        log::warn!("Dropping session of deleted user {user_id}");
        session.clear();
        session.renew();
    }
    login_page_with(&session, &site, None, next, "")
}

pub async fn login_submit(
    req: HttpRequest,
    pool: web::Data<PgPool>,
    site: web::Data<SiteInfo>,
    session: Session,
    form: web::Form<LoginForm>,
    limiter: web::Data<RateLimiter>,
) -> Result<HttpResponse, AppError> {
    csrf::validate_csrf(&session, &form.csrf_token)?;
    let next = safe_next(Some(form.next.as_str()));

    // Rate-limit check before any database access
    let ip = req.peer_addr()
        .map(|addr| addr.ip())
        .unwrap_or_else(|| std::net::IpAddr::V4(std::net::Ipv4Addr::UNSPECIFIED));

    if limiter.is_blocked(ip) {
        log::warn!("Login blocked for {ip}: too many failed attempts");
        return login_page_with(
            &session,
            &site,
            Some("Too many failed login attempts. Please try again later."),
            next,
            &form.username,
        );
    }

    let found = user::find_by_username(&pool, form.username.trim()).await?;
    let verified = match &found {
        Some(u) => password::verify_password(&form.password, &u.password_hash)?,
        None => false,
    };

    match found {
        Some(u) if verified => {
            limiter.clear(ip);
            log_in(&session, u.id, &u.username, u.role)?;
            log::info!("User {} logged in", u.username);
            Ok(redirect(next))
        }
        _ => {
            limiter.record_failure(ip);
            log::info!("Failed login for '{}' from {ip}", form.username.trim());
            login_page_with(&session, &site, Some("Invalid username or password"), next, &form.username)
        }
    }
}

pub async fn logout(
    session: Session,
    form: web::Form<CsrfOnly>,
) -> Result<HttpResponse, AppError> {
    csrf::validate_csrf(&session, &form.csrf_token)?;
    session.purge();
    Ok(redirect("/login"))
}
