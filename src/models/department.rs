use sqlx::PgPool;

use crate::errors::AppError;

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, sqlx::FromRow)]
pub struct Department {
    pub id: i64,
    pub name: String,
}

/// All departments, ordered by name.
pub async fn find_all(pool: &PgPool) -> Result<Vec<Department>, AppError> {
    let rows = sqlx::query_as::<_, Department>("SELECT id, name FROM departments ORDER BY name")
        .fetch_all(pool)
        .await?;
    Ok(rows)
}

pub async fn find_by_id(pool: &PgPool, id: i64) -> Result<Option<Department>, AppError> {
    let row = sqlx::query_as::<_, Department>("SELECT id, name FROM departments WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

/// Create a department. Names are unique.
pub async fn create(pool: &PgPool, name: &str) -> Result<i64, AppError> {
    let id: i64 = sqlx::query_scalar("INSERT INTO departments (name) VALUES ($1) RETURNING id")
        .bind(name.trim())
        .fetch_one(pool)
        .await?;
    Ok(id)
}

/// Delete a department. Fails while any team still belongs to it;
/// staff profiles pointing at it are detached by the store.
pub async fn delete(pool: &PgPool, id: i64) -> Result<(), AppError> {
    let result = sqlx::query("DELETE FROM departments WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    if result.rows_affected() == 0 {
        return Err(AppError::NotFound);
    }
    Ok(())
}
