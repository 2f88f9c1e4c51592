//! Typed access to the login cookie.
//!
//! Keys: `user_id`, `username`, `role`, `flash`, `flash_error`, `csrf_token`.

use actix_session::Session;

use crate::errors::AppError;
use crate::models::user::Role;

pub fn get_user_id(session: &Session) -> Option<i64> {
    session.get::<i64>("user_id").unwrap_or(None)
}

/// Current user id, or a session error (which redirects to /login).
pub fn require_user_id(session: &Session) -> Result<i64, AppError> {
    get_user_id(session).ok_or_else(|| AppError::Session("Not logged in".to_string()))
}

pub fn get_username(session: &Session) -> Result<String, String> {
    match session.get::<String>("username") {
        Ok(Some(username)) => Ok(username),
        Ok(None) => Err("No username in session".to_string()),
        Err(e) => Err(format!("Session error: {}", e)),
    }
}

/// The role cached at login. Handlers that enforce anything reload it
/// from the database; this one is for display.
pub fn get_role(session: &Session) -> Option<Role> {
    session
        .get::<String>("role")
        .unwrap_or(None)
        .and_then(|r| Role::parse(&r))
}

/// Remember the identity of a freshly authenticated user.
pub fn log_in(session: &Session, user_id: i64, username: &str, role: Role) -> Result<(), AppError> {
    session.renew();
    session
        .insert("user_id", user_id)
        .and_then(|_| session.insert("username", username))
        .and_then(|_| session.insert("role", role.as_str()))
        .map_err(|e| AppError::Session(format!("Failed to store login: {e}")))
}

/// Keep the cached username in step after a rename.
pub fn set_username(session: &Session, username: &str) -> Result<(), AppError> {
    session
        .insert("username", username)
        .map_err(|e| AppError::Session(format!("Failed to store username: {e}")))
}

pub fn set_flash(session: &Session, message: &str) {
    let _ = session.insert("flash", message);
}

/// Error-styled flash, shown in red.
pub fn set_flash_error(session: &Session, message: &str) {
    let _ = session.insert("flash_error", message);
}

pub fn take_flash(session: &Session) -> Option<String> {
    take(session, "flash")
}

pub fn take_flash_error(session: &Session) -> Option<String> {
    take(session, "flash_error")
}

fn take(session: &Session, key: &str) -> Option<String> {
    let value = session.get::<String>(key).unwrap_or(None);
    if value.is_some() {
        session.remove(key);
    }
    value
}
