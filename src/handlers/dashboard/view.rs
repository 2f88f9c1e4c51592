//! Data behind the two dashboards, shared by the HTML pages and the JSON API.

use chrono::NaiveDate;
use serde::Deserialize;
use sqlx::PgPool;

use crate::auth::scope::{self, Scope, Viewer};
use crate::errors::AppError;
use crate::models::card::CARD_CATEGORIES;
use crate::models::dashboard::{self, CategoryRow};
use crate::models::department::Department;
use crate::models::health_session::{self, HealthSession};
use crate::models::team::Team;
use crate::models::vote::{DepartmentSummary, aggregate};

/// Query string of both dashboards. Everything is optional and validated
/// against the viewer's scope.
#[derive(Debug, Default, Deserialize)]
pub struct DashboardQuery {
    pub department: Option<String>,
    pub team: Option<String>,
    pub session: Option<String>,
    pub mine: Option<String>,
}

impl DashboardQuery {
    pub fn only_mine(&self) -> bool {
        matches!(self.mine.as_deref(), Some("1" | "true" | "on"))
    }
}

pub struct TeamView {
    pub departments: Vec<Department>,
    pub department: Option<Department>,
    pub teams: Vec<Team>,
    pub team: Option<Team>,
    pub sessions: Vec<HealthSession>,
    pub session: Option<HealthSession>,
    pub only_mine: bool,
    pub rows: Vec<CategoryRow>,
    pub warning: Option<String>,
    pub errors: Vec<String>,
}

pub struct DepartmentView {
    pub departments: Vec<Department>,
    pub department: Option<Department>,
    pub teams: Vec<Team>,
    pub sessions: Vec<HealthSession>,
    pub session: Option<HealthSession>,
    pub rows: Vec<CategoryRow>,
    pub summaries: Vec<DepartmentSummary>,
    pub warning: Option<String>,
    pub errors: Vec<String>,
}

/// Pick the requested session, or the default one. An unknown id is
/// refused like an out-of-scope team.
pub fn select_session<'a>(
    sessions: &'a [HealthSession],
    requested: Option<&str>,
    today: NaiveDate,
) -> (Option<&'a HealthSession>, Option<String>) {
    let explicit = requested.map(str::trim).filter(|s| !s.is_empty());
    if explicit.is_none() {
        return (health_session::pick_default(sessions, today), None);
    }
    let selection = scope::select(sessions, explicit, |s| s.id, "session");
    match selection.error {
        Some(error) => (health_session::pick_default(sessions, today), Some(error)),
        None => (selection.chosen, None),
    }
}

/// When only a team is requested, open its department.
fn department_hint(scope: &Scope, query: &DashboardQuery) -> Option<String> {
    if query.department.as_deref().is_some_and(|d| !d.trim().is_empty()) {
        return query.department.clone();
    }
    let team_id = query.team.as_deref()?.trim().parse::<i64>().ok()?;
    scope
        .teams
        .iter()
        .find(|t| t.id == team_id)
        .and_then(|t| t.department_id)
        .map(|id| id.to_string())
}

/// The requested team, if it is visible and belongs to no department.
fn requested_detached_team<'a>(scope: &'a Scope, query: &DashboardQuery) -> Option<&'a Team> {
    let team_id = query.team.as_deref()?.trim().parse::<i64>().ok()?;
    scope
        .teams
        .iter()
        .find(|t| t.id == team_id && t.department_id.is_none())
}

/// Resolve selections for the team dashboard and load its tallies.
pub async fn load_team_view(
    pool: &PgPool,
    viewer: &Viewer,
    scope: &Scope,
    query: &DashboardQuery,
    today: NaiveDate,
) -> Result<TeamView, AppError> {
    let mut errors = Vec::new();

    let (department, teams) = match requested_detached_team(scope, query) {
        // A team outside any department is listed with its peers.
        Some(_) => (None, scope.teams.iter().filter(|t| t.department_id.is_none()).cloned().collect::<Vec<_>>()),
        None => {
            let hint = department_hint(scope, query);
            let department_sel = scope.select_department(hint.as_deref());
            errors.extend(department_sel.error);
            let department = department_sel.chosen.cloned();
            let teams = if scope.departments.is_empty() {
                scope.teams.clone()
            } else {
                scope.teams_in(department.as_ref().map(|d| d.id))
            };
            (department, teams)
        }
    };
    let team_sel = scope::select(&teams, query.team.as_deref(), |t| t.id, "team");
    errors.extend(team_sel.error);
    let team = team_sel.chosen.cloned();

    let sessions = health_session::find_all(pool).await?;
    let (session, session_error) = select_session(&sessions, query.session.as_deref(), today);
    errors.extend(session_error);
    let session = session.cloned();

    let only_mine = query.only_mine();
    let aggregates = match (&team, &session) {
        (Some(t), Some(s)) => {
            let only_user = only_mine.then_some(viewer.user_id);
            aggregate::for_team(pool, t.id, s.id, only_user).await?
        }
        _ => Default::default(),
    };

    Ok(TeamView {
        departments: scope.departments.clone(),
        department,
        teams,
        team,
        sessions,
        session,
        only_mine,
        rows: dashboard::present(&CARD_CATEGORIES, &aggregates),
        warning: scope.warning.clone(),
        errors,
    })
}

/// Resolve selections for the department dashboard and load its tallies
/// plus the comparison with every other department.
pub async fn load_department_view(
    pool: &PgPool,
    scope: &Scope,
    query: &DashboardQuery,
    today: NaiveDate,
) -> Result<DepartmentView, AppError> {
    let mut errors = Vec::new();

    let department_sel = scope.select_department(query.department.as_deref());
    errors.extend(department_sel.error);
    let department = department_sel.chosen.cloned();

    let sessions = health_session::find_all(pool).await?;
    let (session, session_error) = select_session(&sessions, query.session.as_deref(), today);
    errors.extend(session_error);
    let session = session.cloned();

    let (aggregates, summaries) = match (&department, &session) {
        (Some(d), Some(s)) => (
            aggregate::for_department(pool, d.id, s.id).await?,
            aggregate::other_department_summaries(pool, s.id, Some(d.id)).await?,
        ),
        _ => Default::default(),
    };

    Ok(DepartmentView {
        departments: scope.departments.clone(),
        teams: scope.teams_in(department.as_ref().map(|d| d.id)),
        department,
        sessions,
        session,
        rows: dashboard::present(&CARD_CATEGORIES, &aggregates),
        summaries,
        warning: scope.warning.clone(),
        errors,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, m, d).unwrap()
    }

    fn sessions() -> Vec<HealthSession> {
        vec![
            HealthSession { id: 2, name: "Q2-2024".into(), start_date: day(4, 1), end_date: day(6, 30) },
            HealthSession { id: 1, name: "Q1-2024".into(), start_date: day(1, 1), end_date: day(3, 31) },
        ]
    }

    #[test]
    fn session_defaults_to_running_one() {
        let all = sessions();
        let (chosen, error) = select_session(&all, None, day(2, 10));
        assert_eq!(chosen.map(|s| s.id), Some(1));
        assert!(error.is_none());
    }

    #[test]
    fn explicit_session_is_honoured() {
        let all = sessions();
        let (chosen, error) = select_session(&all, Some("2"), day(2, 10));
        assert_eq!(chosen.map(|s| s.id), Some(2));
        assert!(error.is_none());
    }

    #[test]
    fn unknown_session_falls_back_with_error() {
        let all = sessions();
        let (chosen, error) = select_session(&all, Some("99"), day(2, 10));
        assert_eq!(chosen.map(|s| s.id), Some(1));
        assert!(error.is_some());
    }

    #[test]
    fn mine_flag_parsing() {
        let mut q = DashboardQuery::default();
        assert!(!q.only_mine());
        q.mine = Some("1".into());
        assert!(q.only_mine());
        q.mine = Some("no".into());
        assert!(!q.only_mine());
    }
}
