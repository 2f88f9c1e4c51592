use sqlx::PgPool;

use crate::errors::AppError;

/// One user-in-team row, as listed on the account page.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Membership {
    pub team_id: i64,
    pub team_name: String,
    pub department_name: Option<String>,
    pub username: String,
    pub date_joined: chrono::DateTime<chrono::Utc>,
}

/// Add a user to a team. Joining twice is a no-op.
pub async fn join(pool: &PgPool, user_id: i64, team_id: i64) -> Result<(), AppError> {
    sqlx::query(
        "INSERT INTO team_memberships (user_id, team_id) VALUES ($1, $2) \
         ON CONFLICT (user_id, team_id) DO NOTHING",
    )
    .bind(user_id)
    .bind(team_id)
    .execute(pool)
    .await?;
    Ok(())
}

/// Team ids the user belongs to.
pub async fn find_team_ids_for_user(pool: &PgPool, user_id: i64) -> Result<Vec<i64>, AppError> {
    let ids: Vec<i64> = sqlx::query_scalar(
        "SELECT team_id FROM team_memberships WHERE user_id = $1 ORDER BY team_id",
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;
    Ok(ids)
}

/// Memberships of one user, ordered by department name, team name, username.
pub async fn find_for_user(pool: &PgPool, user_id: i64) -> Result<Vec<Membership>, AppError> {
    let rows = sqlx::query_as::<_, Membership>(
        "SELECT t.id AS team_id, t.name AS team_name, d.name AS department_name, \
                u.username, m.date_joined \
         FROM team_memberships m \
         JOIN teams t ON t.id = m.team_id \
         JOIN users u ON u.id = m.user_id \
         LEFT JOIN departments d ON d.id = t.department_id \
         WHERE m.user_id = $1 \
         ORDER BY d.name NULLS LAST, t.name, u.username",
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}
