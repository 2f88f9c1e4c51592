use sqlx::PgPool;

use crate::errors::AppError;

/// A team together with the name of the department it sits in.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, sqlx::FromRow)]
pub struct Team {
    pub id: i64,
    pub name: String,
    pub department_id: Option<i64>,
    pub department_name: Option<String>,
}

const TEAM_SELECT: &str = "SELECT t.id, t.name, t.department_id, d.name AS department_name \
     FROM teams t \
     LEFT JOIN departments d ON t.department_id = d.id";

/// All teams, ordered by department name then team name.
pub async fn find_all(pool: &PgPool) -> Result<Vec<Team>, AppError> {
    let sql = format!("{TEAM_SELECT} ORDER BY d.name NULLS LAST, t.name, t.id");
    let rows = sqlx::query_as::<_, Team>(&sql).fetch_all(pool).await?;
    Ok(rows)
}

pub async fn find_by_id(pool: &PgPool, id: i64) -> Result<Option<Team>, AppError> {
    let sql = format!("{TEAM_SELECT} WHERE t.id = $1");
    let row = sqlx::query_as::<_, Team>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

pub async fn create(pool: &PgPool, name: &str, department_id: Option<i64>) -> Result<i64, AppError> {
    let id: i64 = sqlx::query_scalar(
        "INSERT INTO teams (name, department_id) VALUES ($1, $2) RETURNING id",
    )
    .bind(name.trim())
    .bind(department_id)
    .fetch_one(pool)
    .await?;
    Ok(id)
}
