use actix_session::Session;
use actix_web::{web, HttpResponse};
use serde::Deserialize;
use sqlx::PgPool;

use crate::models::{membership, user};
use crate::models::user::ProfileForm;
use crate::auth::{csrf, password, validate};
use crate::auth::session::{require_user_id, set_flash, set_username};
use crate::config::SiteInfo;
use crate::errors::{AppError, redirect, render};
use crate::templates_structs::{PageContext, AccountTemplate};

#[derive(Deserialize)]
pub struct ChangePasswordForm {
    pub current_password: String,
    pub new_password: String,
    pub confirm_password: String,
    pub csrf_token: String,
}

/// What a rejected submission sends back to the page.
#[derive(Default)]
struct AccountState {
    profile_form: Option<ProfileForm>,
    profile_errors: Vec<String>,
    password_errors: Vec<String>,
}

async fn render_account(
    pool: &PgPool,
    session: &Session,
    site: &SiteInfo,
    user_id: i64,
    state: AccountState,
) -> Result<HttpResponse, AppError> {
    let ctx = PageContext::build(session, site, "/account")?;
    let profile = user::find_profile(pool, user_id).await?
        .ok_or_else(|| AppError::Session(format!("User {user_id} no longer exists")))?;
    let memberships = membership::find_for_user(pool, user_id).await?;
    let profile_form = state.profile_form.unwrap_or_else(|| ProfileForm::from_profile(&profile));
    render(AccountTemplate {
        ctx,
        profile,
        memberships,
        profile_form,
        profile_errors: state.profile_errors,
        password_errors: state.password_errors,
    })
}

/// Field checks for the profile form.
pub fn validate_profile(form: &ProfileForm) -> Vec<String> {
    let mut errors = Vec::new();
    errors.extend(validate::validate_username(&form.username));
    errors.extend(validate::validate_required(&form.first_name, "First name", 100));
    errors.extend(validate::validate_required(&form.last_name, "Last name", 100));
    errors
}

pub async fn form(
    pool: web::Data<PgPool>,
    site: web::Data<SiteInfo>,
    session: Session,
) -> Result<HttpResponse, AppError> {
    let user_id = require_user_id(&session)?;
    render_account(&pool, &session, &site, user_id, AccountState::default()).await
}

/// POST /account/profile: rename; email and role stay as they are.
pub async fn update_profile(
    pool: web::Data<PgPool>,
    site: web::Data<SiteInfo>,
    session: Session,
    form: web::Form<ProfileForm>,
) -> Result<HttpResponse, AppError> {
    csrf::validate_csrf(&session, &form.csrf_token)?;
    let user_id = require_user_id(&session)?;
    let form = form.into_inner();

    let current = user::find_profile(&pool, user_id).await?
        .ok_or_else(|| AppError::Session(format!("User {user_id} no longer exists")))?;
    let username = form.username.trim();

    let mut errors = validate_profile(&form);
    if errors.is_empty() && username != current.username && user::username_exists(&pool, username).await? {
        errors.push("That username is already taken".to_string());
    }
    if !errors.is_empty() {
        let state = AccountState { profile_form: Some(form), profile_errors: errors, ..Default::default() };
        return render_account(&pool, &session, &site, user_id, state).await;
    }

    user::update_names(&pool, user_id, username, form.first_name.trim(), form.last_name.trim()).await?;
    set_username(&session, username)?;
    log::info!("User {user_id} updated their profile");

    set_flash(&session, "Your profile has been updated.");
    Ok(redirect("/account"))
}

pub async fn submit(
    pool: web::Data<PgPool>,
    site: web::Data<SiteInfo>,
    session: Session,
    form: web::Form<ChangePasswordForm>,
) -> Result<HttpResponse, AppError> {
    csrf::validate_csrf(&session, &form.csrf_token)?;
    let user_id = require_user_id(&session)?;

    let errors = validate::validate_new_password(&form.new_password, &form.confirm_password);
    if !errors.is_empty() {
        let state = AccountState { password_errors: errors, ..Default::default() };
        return render_account(&pool, &session, &site, user_id, state).await;
    }

    let stored_hash = user::find_password_hash_by_id(&pool, user_id).await?
        .ok_or_else(|| AppError::Session("Could not verify current password".to_string()))?;

    if !password::verify_password(&form.current_password, &stored_hash)? {
        let state = AccountState {
            password_errors: vec!["Current password is incorrect".to_string()],
            ..Default::default()
        };
        return render_account(&pool, &session, &site, user_id, state).await;
    }

    let new_hash = password::hash_password(&form.new_password)?;
    user::update_password(&pool, user_id, &new_hash).await?;
    log::info!("User {user_id} changed their password");

    set_flash(&session, "Password changed successfully");
    Ok(redirect("/account"))
}
