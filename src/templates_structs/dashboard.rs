use askama::Template;

use crate::models::dashboard::CategoryRow;
use crate::models::department::Department;
use crate::models::health_session::HealthSession;
use crate::models::team::Team;
use crate::models::vote::DepartmentSummary;
use super::PageContext;

/// A session in the selector.
pub struct SessionOption {
    pub id: i64,
    pub label: String,
    pub open: bool,
}

impl SessionOption {
    pub fn from_session(s: &HealthSession, today: chrono::NaiveDate) -> Self {
        SessionOption { id: s.id, label: s.display_name(), open: s.is_open_on(today) }
    }
}

#[derive(Template)]
#[template(path = "dashboard/team.html")]
pub struct TeamDashboardTemplate {
    pub ctx: PageContext,
    pub departments: Vec<Department>,
    pub teams: Vec<Team>,
    pub sessions: Vec<SessionOption>,
    // 0 when nothing is selected
    pub department_id: i64,
    pub team_id: i64,
    pub session_id: i64,
    pub team_name: String,
    pub session_name: String,
    pub only_mine: bool,
    pub rows: Vec<CategoryRow>,
    pub total_votes: i64,
    pub chart_json: String,
    pub warning: Option<String>,
}

#[derive(Template)]
#[template(path = "dashboard/department.html")]
pub struct DepartmentDashboardTemplate {
    pub ctx: PageContext,
    pub departments: Vec<Department>,
    pub sessions: Vec<SessionOption>,
    pub department_id: i64,
    pub session_id: i64,
    pub department_name: String,
    pub session_name: String,
    pub teams: Vec<Team>,
    pub rows: Vec<CategoryRow>,
    pub total_votes: i64,
    pub chart_json: String,
    pub summaries: Vec<DepartmentSummary>,
    pub warning: Option<String>,
}
