// Template context structures for Askama templates, organized by page.

use actix_session::Session;

use crate::auth::csrf;
use crate::auth::session::{get_role, get_username, take_flash, take_flash_error};
use crate::config::SiteInfo;
use crate::errors::AppError;

mod api;
mod common;
mod dashboard;
mod vote;

pub use self::api::{ApiDepartmentDashboard, ApiErrorResponse, ApiTeamDashboard};
pub use self::common::{AccountTemplate, LoginTemplate, RegisterTemplate};
pub use self::dashboard::{DepartmentDashboardTemplate, SessionOption, TeamDashboardTemplate};
pub use self::vote::{CardFormRow, Choice, VoteFormTemplate, progress_choices, vote_choices};

/// Common context shared by all authenticated pages.
/// Templates access these as `ctx.username`, `ctx.csrf_token`, etc.
pub struct PageContext {
    pub username: String,
    pub avatar_initial: String,
    pub role_label: String,
    pub can_vote: bool,
    pub flash: Option<String>,
    pub flash_error: Option<String>,
    pub app_name: String,
    pub csrf_token: String,
    pub current_path: String,
}

impl PageContext {
    pub fn build(session: &Session, site: &SiteInfo, current_path: &str) -> Result<Self, AppError> {
        let username = get_username(session)
            .map_err(|e| AppError::Session(format!("Failed to get username: {}", e)))?;
        let role = get_role(session);
        let avatar_initial = username.chars().next().unwrap_or('?').to_uppercase().to_string();
        Ok(Self {
            username,
            avatar_initial,
            role_label: role.map(|r| r.label().to_string()).unwrap_or_default(),
            can_vote: role.is_some_and(|r| r.can_vote()),
            flash: take_flash(session),
            flash_error: take_flash_error(session),
            app_name: site.app_name.clone(),
            csrf_token: csrf::get_or_create_token(session),
            current_path: current_path.to_string(),
        })
    }

    /// Append a message to the error banner, after anything flashed earlier.
    pub fn push_error(&mut self, message: String) {
        self.flash_error = Some(match self.flash_error.take() {
            Some(existing) => format!("{existing} {message}"),
            None => message,
        });
    }
}
