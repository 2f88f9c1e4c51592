use actix_session::Session;
use actix_web::{web, HttpResponse};
use chrono::Local;
use sqlx::PgPool;

use crate::auth::scope;
use crate::auth::session::require_user_id;
use crate::errors::AppError;
use crate::handlers::dashboard::view::{self, DashboardQuery};
use crate::models::dashboard::ChartSeries;
use crate::templates_structs::{ApiDepartmentDashboard, ApiTeamDashboard};

/// GET /api/v1/dashboard/team?department=&team=&session=&mine=
pub async fn team(
    pool: web::Data<PgPool>,
    session: Session,
    query: web::Query<DashboardQuery>,
) -> Result<HttpResponse, AppError> {
    let user_id = require_user_id(&session)?;
    let (viewer, scope) = scope::resolve_for_user(&pool, user_id).await?;
    let view = view::load_team_view(&pool, &viewer, &scope, &query, Local::now().date_naive()).await?;

    let response = ApiTeamDashboard {
        team: view.team,
        session: view.session,
        only_mine: view.only_mine,
        chart: ChartSeries::from_rows(&view.rows),
        categories: view.rows,
        warning: view.warning,
        errors: view.errors,
    };
    Ok(HttpResponse::Ok().json(response))
}

/// GET /api/v1/dashboard/department?department=&session=
pub async fn department(
    pool: web::Data<PgPool>,
    session: Session,
    query: web::Query<DashboardQuery>,
) -> Result<HttpResponse, AppError> {
    let user_id = require_user_id(&session)?;
    let (_viewer, scope) = scope::resolve_for_user(&pool, user_id).await?;
    let view = view::load_department_view(&pool, &scope, &query, Local::now().date_naive()).await?;

    let response = ApiDepartmentDashboard {
        department: view.department,
        session: view.session,
        chart: ChartSeries::from_rows(&view.rows),
        categories: view.rows,
        other_departments: view.summaries,
        warning: view.warning,
        errors: view.errors,
    };
    Ok(HttpResponse::Ok().json(response))
}
