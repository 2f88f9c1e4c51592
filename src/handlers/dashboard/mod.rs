pub mod view;

use actix_session::Session;
use actix_web::{HttpResponse, web};
use chrono::Local;
use sqlx::PgPool;

use crate::auth::scope;
use crate::auth::session::require_user_id;
use crate::config::SiteInfo;
use crate::errors::{AppError, redirect, render};
use crate::models::dashboard::{self as presenter, ChartSeries};
use crate::templates_structs::{
    DepartmentDashboardTemplate, PageContext, SessionOption, TeamDashboardTemplate,
};
use self::view::DashboardQuery;

/// GET /dashboard: team members land on their team, leaders on their department.
pub async fn index(
    pool: web::Data<PgPool>,
    session: Session,
) -> Result<HttpResponse, AppError> {
    let user_id = require_user_id(&session)?;
    let viewer = scope::load_viewer(&pool, user_id)
        .await?
        .ok_or_else(|| AppError::Session(format!("User {user_id} no longer exists")))?;

    let target = if viewer.role.is_team_member() { "/dashboard/team" } else { "/dashboard/department" };
    Ok(redirect(target))
}

/// GET /dashboard/team?department=&team=&session=&mine=
pub async fn team(
    pool: web::Data<PgPool>,
    site: web::Data<SiteInfo>,
    session: Session,
    query: web::Query<DashboardQuery>,
) -> Result<HttpResponse, AppError> {
    let user_id = require_user_id(&session)?;
    let (viewer, scope) = scope::resolve_for_user(&pool, user_id).await?;
    let today = Local::now().date_naive();
    let view = view::load_team_view(&pool, &viewer, &scope, &query, today).await?;

    let mut ctx = PageContext::build(&session, &site, "/dashboard/team")?;
    for error in view.errors {
        ctx.push_error(error);
    }

    let tmpl = TeamDashboardTemplate {
        ctx,
        department_id: view.department.as_ref().map(|d| d.id).unwrap_or(0),
        team_id: view.team.as_ref().map(|t| t.id).unwrap_or(0),
        session_id: view.session.as_ref().map(|s| s.id).unwrap_or(0),
        team_name: view.team.map(|t| t.name).unwrap_or_default(),
        session_name: view.session.as_ref().map(|s| s.display_name()).unwrap_or_default(),
        sessions: view.sessions.iter().map(|s| SessionOption::from_session(s, today)).collect(),
        departments: view.departments,
        teams: view.teams,
        only_mine: view.only_mine,
        total_votes: presenter::total_votes(&view.rows),
        chart_json: ChartSeries::from_rows(&view.rows).to_json(),
        rows: view.rows,
        warning: view.warning,
    };
    render(tmpl)
}

/// GET /dashboard/department?department=&session=
pub async fn department(
    pool: web::Data<PgPool>,
    site: web::Data<SiteInfo>,
    session: Session,
    query: web::Query<DashboardQuery>,
) -> Result<HttpResponse, AppError> {
    let user_id = require_user_id(&session)?;
    let (_viewer, scope) = scope::resolve_for_user(&pool, user_id).await?;
    let today = Local::now().date_naive();
    let view = view::load_department_view(&pool, &scope, &query, today).await?;

    let mut ctx = PageContext::build(&session, &site, "/dashboard/department")?;
    for error in view.errors {
        ctx.push_error(error);
    }

    let tmpl = DepartmentDashboardTemplate {
        ctx,
        department_id: view.department.as_ref().map(|d| d.id).unwrap_or(0),
        session_id: view.session.as_ref().map(|s| s.id).unwrap_or(0),
        department_name: view.department.map(|d| d.name).unwrap_or_default(),
        session_name: view.session.as_ref().map(|s| s.display_name()).unwrap_or_default(),
        sessions: view.sessions.iter().map(|s| SessionOption::from_session(s, today)).collect(),
        departments: view.departments,
        teams: view.teams,
        total_votes: presenter::total_votes(&view.rows),
        chart_json: ChartSeries::from_rows(&view.rows).to_json(),
        rows: view.rows,
        summaries: view.summaries,
        warning: view.warning,
    };
    render(tmpl)
}
