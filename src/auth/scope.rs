//! Role-scoped visibility of departments and teams.
//!
//! Every role has one `VisibilityPolicy`. A policy is a pure function of
//! the viewer and the organisation directory, so handlers load both once
//! and then ask the policy what the user may see:
//!
//! ```text
//! engineer / teamLeader  -> departments of their teams, teams in those departments
//! departmentLeader       -> their department (nothing if unassigned)
//! seniorManager          -> everything
//! ```
//!
//! Explicit `?department=` / `?team=` selections go through `select`, which
//! only honours ids inside the resolved scope.

use sqlx::PgPool;

use crate::errors::AppError;
use crate::models::department::{self, Department};
use crate::models::membership;
use crate::models::team::{self, Team};
use crate::models::user::{self, Role};

/// The user a scope is resolved for.
#[derive(Debug, Clone)]
pub struct Viewer {
    pub user_id: i64,
    pub role: Role,
    pub department_id: Option<i64>,
    pub team_ids: Vec<i64>,
}

/// Every department and team, in display order.
#[derive(Debug, Clone, Default)]
pub struct Directory {
    pub departments: Vec<Department>,
    pub teams: Vec<Team>,
}

/// What a viewer may look at.
#[derive(Debug, Clone, Default)]
pub struct Scope {
    pub departments: Vec<Department>,
    pub teams: Vec<Team>,
    /// Set when the scope is empty for a reason the user should know about.
    pub warning: Option<String>,
}

pub trait VisibilityPolicy: Sync {
    fn resolve(&self, viewer: &Viewer, directory: &Directory) -> Scope;
}

/// Engineers and team leaders: their teams' departments and everything in them.
struct TeamMemberPolicy;

impl VisibilityPolicy for TeamMemberPolicy {
    fn resolve(&self, viewer: &Viewer, directory: &Directory) -> Scope {
        let department_ids: Vec<i64> = directory
            .teams
            .iter()
            .filter(|t| viewer.team_ids.contains(&t.id))
            .filter_map(|t| t.department_id)
            .collect();

        let departments = directory
            .departments
            .iter()
            .filter(|d| department_ids.contains(&d.id))
            .cloned()
            .collect();
        let teams = directory
            .teams
            .iter()
            .filter(|t| {
                viewer.team_ids.contains(&t.id)
                    || t.department_id.is_some_and(|d| department_ids.contains(&d))
            })
            .cloned()
            .collect::<Vec<_>>();

        let warning = teams
            .is_empty()
            .then(|| "You are not a member of any team yet.".to_string());
        Scope { departments, teams, warning }
    }
}

/// Department leaders: exactly their own department.
struct DepartmentLeaderPolicy;

impl VisibilityPolicy for DepartmentLeaderPolicy {
    fn resolve(&self, viewer: &Viewer, directory: &Directory) -> Scope {
        let Some(own) = viewer
            .department_id
            .and_then(|id| directory.departments.iter().find(|d| d.id == id))
        else {
            return Scope {
                warning: Some("You are not assigned to a department.".to_string()),
                ..Scope::default()
            };
        };

        let teams = directory
            .teams
            .iter()
            .filter(|t| t.department_id == Some(own.id))
            .cloned()
            .collect();
        Scope { departments: vec![own.clone()], teams, warning: None }
    }
}

/// Senior managers: the whole organisation.
struct SeniorManagerPolicy;

impl VisibilityPolicy for SeniorManagerPolicy {
    fn resolve(&self, _viewer: &Viewer, directory: &Directory) -> Scope {
        Scope {
            departments: directory.departments.clone(),
            teams: directory.teams.clone(),
            warning: None,
        }
    }
}

pub fn policy_for(role: Role) -> &'static dyn VisibilityPolicy {
    match role {
        Role::Engineer | Role::TeamLeader => &TeamMemberPolicy,
        Role::DepartmentLeader => &DepartmentLeaderPolicy,
        Role::SeniorManager => &SeniorManagerPolicy,
    }
}

pub fn resolve(viewer: &Viewer, directory: &Directory) -> Scope {
    policy_for(viewer.role).resolve(viewer, directory)
}

/// Outcome of honouring (or refusing) an explicit selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection<'a, T> {
    pub chosen: Option<&'a T>,
    pub error: Option<String>,
}

/// Pick `requested` from `candidates` if it is one of them, otherwise the
/// first candidate. A missing or empty request is not an error; a
/// malformed or out-of-scope one is.
pub fn select<'a, T>(
    candidates: &'a [T],
    requested: Option<&str>,
    id_of: impl Fn(&T) -> i64,
    what: &str,
) -> Selection<'a, T> {
    let requested = requested.map(str::trim).filter(|s| !s.is_empty());
    let Some(raw) = requested else {
        return Selection { chosen: candidates.first(), error: None };
    };

    match raw.parse::<i64>().ok().and_then(|id| candidates.iter().find(|c| id_of(*c) == id)) {
        Some(found) => Selection { chosen: Some(found), error: None },
        None => {
            log::warn!("Rejected {what} selection '{raw}' outside the user's scope");
            Selection {
                chosen: candidates.first(),
                error: Some(format!("You do not have access to that {what}.")),
            }
        }
    }
}

impl Scope {
    pub fn contains_team(&self, team_id: i64) -> bool {
        self.teams.iter().any(|t| t.id == team_id)
    }

    /// Teams of one department, or every visible team when no department
    /// is selected.
    pub fn teams_in(&self, department_id: Option<i64>) -> Vec<Team> {
        match department_id {
            Some(id) => self.teams.iter().filter(|t| t.department_id == Some(id)).cloned().collect(),
            None => self.teams.clone(),
        }
    }

    pub fn select_department(&self, requested: Option<&str>) -> Selection<'_, Department> {
        select(&self.departments, requested, |d| d.id, "department")
    }

    pub fn select_team(&self, requested: Option<&str>) -> Selection<'_, Team> {
        select(&self.teams, requested, |t| t.id, "team")
    }
}

/// Load the viewer for a logged-in user. `None` if the user vanished.
pub async fn load_viewer(pool: &PgPool, user_id: i64) -> Result<Option<Viewer>, AppError> {
    let Some(profile) = user::find_profile(pool, user_id).await? else {
        return Ok(None);
    };
    let team_ids = if profile.role.is_team_member() {
        membership::find_team_ids_for_user(pool, user_id).await?
    } else {
        Vec::new()
    };
    Ok(Some(Viewer {
        user_id,
        role: profile.role,
        department_id: profile.department_id,
        team_ids,
    }))
}

pub async fn load_directory(pool: &PgPool) -> Result<Directory, AppError> {
    let departments = department::find_all(pool).await?;
    let teams = team::find_all(pool).await?;
    Ok(Directory { departments, teams })
}

/// Viewer and resolved scope in one go; the common entry point for handlers.
pub async fn resolve_for_user(pool: &PgPool, user_id: i64) -> Result<(Viewer, Scope), AppError> {
    let viewer = load_viewer(pool, user_id)
        .await?
        .ok_or_else(|| AppError::Session(format!("User {user_id} no longer exists")))?;
    let directory = load_directory(pool).await?;
    let scope = resolve(&viewer, &directory);
    Ok((viewer, scope))
}
