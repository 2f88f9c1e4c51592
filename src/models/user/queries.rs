use sqlx::PgPool;

use crate::errors::AppError;
use super::types::*;

/// Find a user by username, for login.
pub async fn find_by_username(pool: &PgPool, username: &str) -> Result<Option<User>, AppError> {
    let row = sqlx::query_as::<_, User>(
        "SELECT u.id, u.username, u.password_hash, p.role \
         FROM users u \
         JOIN user_profiles p ON p.user_id = u.id \
         WHERE u.username = $1",
    )
    .bind(username.trim())
    .fetch_optional(pool)
    .await?;
    Ok(row)
}

/// Load a user with role and department.
pub async fn find_profile(pool: &PgPool, user_id: i64) -> Result<Option<UserProfile>, AppError> {
    let row = sqlx::query_as::<_, UserProfile>(
        "SELECT u.id AS user_id, u.username, u.first_name, u.last_name, u.email, \
                p.role, p.department_id, d.name AS department_name \
         FROM users u \
         JOIN user_profiles p ON p.user_id = u.id \
         LEFT JOIN departments d ON d.id = p.department_id \
         WHERE u.id = $1",
    )
    .bind(user_id)
    .fetch_optional(pool)
    .await?;
    Ok(row)
}

pub async fn username_exists(pool: &PgPool, username: &str) -> Result<bool, AppError> {
    let exists: bool = sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM users WHERE username = $1)")
        .bind(username.trim())
        .fetch_one(pool)
        .await?;
    Ok(exists)
}

/// Create the user, their profile and (for team roles) their first team
/// membership. All or nothing.
pub async fn create(pool: &PgPool, new: &NewUser) -> Result<i64, AppError> {
    let mut tx = pool.begin().await?;

    let user_id: i64 = sqlx::query_scalar(
        "INSERT INTO users (username, password_hash, first_name, last_name, email) \
         VALUES ($1, $2, $3, $4, $5) RETURNING id",
    )
    .bind(&new.username)
    .bind(&new.password_hash)
    .bind(&new.first_name)
    .bind(&new.last_name)
    .bind(&new.email)
    .fetch_one(&mut *tx)
    .await?;

    sqlx::query("INSERT INTO user_profiles (user_id, role, department_id) VALUES ($1, $2, $3)")
        .bind(user_id)
        .bind(new.role.as_str())
        .bind(new.department_id)
        .execute(&mut *tx)
        .await?;

    if let Some(team_id) = new.team_id {
        sqlx::query("INSERT INTO team_memberships (user_id, team_id) VALUES ($1, $2)")
            .bind(user_id)
            .bind(team_id)
            .execute(&mut *tx)
            .await?;
    } else if new.role.is_team_member() {
        log::warn!("No team provided for {} user {}", new.role.as_str(), new.username);
    }

    tx.commit().await?;
    log::info!("Registered user {} ({})", new.username, new.role.as_str());
    Ok(user_id)
}

pub async fn find_password_hash_by_id(pool: &PgPool, id: i64) -> Result<Option<String>, AppError> {
    let hash: Option<String> = sqlx::query_scalar("SELECT password_hash FROM users WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(hash)
}

pub async fn update_password(pool: &PgPool, id: i64, password_hash: &str) -> Result<(), AppError> {
    sqlx::query("UPDATE users SET password_hash = $1 WHERE id = $2")
        .bind(password_hash)
        .bind(id)
        .execute(pool)
        .await?;
    Ok(())
}

/// Rename a user. Email and role are not editable here.
pub async fn update_names(
    pool: &PgPool,
    id: i64,
    username: &str,
    first_name: &str,
    last_name: &str,
) -> Result<(), AppError> {
    sqlx::query("UPDATE users SET username = $1, first_name = $2, last_name = $3 WHERE id = $4")
        .bind(username)
        .bind(first_name)
        .bind(last_name)
        .bind(id)
        .execute(pool)
        .await?;
    Ok(())
}
