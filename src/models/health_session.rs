use chrono::NaiveDate;
use sqlx::PgPool;

use crate::errors::AppError;

/// A voting window. Every vote belongs to exactly one.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, sqlx::FromRow)]
pub struct HealthSession {
    pub id: i64,
    pub name: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

impl HealthSession {
    pub fn is_open_on(&self, day: NaiveDate) -> bool {
        self.start_date <= day && day <= self.end_date
    }

    /// "Q1-2024 (2024-01-01 - 2024-03-31)"
    pub fn display_name(&self) -> String {
        format!("{} ({} - {})", self.name, self.start_date, self.end_date)
    }
}

/// All sessions, most recently started first.
pub async fn find_all(pool: &PgPool) -> Result<Vec<HealthSession>, AppError> {
    let rows = sqlx::query_as::<_, HealthSession>(
        "SELECT id, name, start_date, end_date FROM health_sessions \
         ORDER BY start_date DESC, id DESC",
    )
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

pub async fn find_by_id(pool: &PgPool, id: i64) -> Result<Option<HealthSession>, AppError> {
    let row = sqlx::query_as::<_, HealthSession>(
        "SELECT id, name, start_date, end_date FROM health_sessions WHERE id = $1",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;
    Ok(row)
}

pub async fn create(
    pool: &PgPool,
    name: &str,
    start_date: NaiveDate,
    end_date: NaiveDate,
) -> Result<i64, AppError> {
    let id: i64 = sqlx::query_scalar(
        "INSERT INTO health_sessions (name, start_date, end_date) VALUES ($1, $2, $3) RETURNING id",
    )
    .bind(name.trim())
    .bind(start_date)
    .bind(end_date)
    .fetch_one(pool)
    .await?;
    Ok(id)
}

/// The session a dashboard opens on: the one running today, otherwise the
/// most recently started one. `sessions` must be ordered as `find_all` returns them.
pub fn pick_default(sessions: &[HealthSession], today: NaiveDate) -> Option<&HealthSession> {
    sessions
        .iter()
        .find(|s| s.is_open_on(today))
        .or_else(|| sessions.first())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn session(id: i64, start: NaiveDate, end: NaiveDate) -> HealthSession {
        HealthSession { id, name: format!("S{id}"), start_date: start, end_date: end }
    }

    #[test]
    fn default_is_the_running_session() {
        let sessions = vec![
            session(3, day(2024, 7, 1), day(2024, 9, 30)),
            session(2, day(2024, 4, 1), day(2024, 6, 30)),
            session(1, day(2024, 1, 1), day(2024, 3, 31)),
        ];
        let picked = pick_default(&sessions, day(2024, 5, 15)).unwrap();
        assert_eq!(picked.id, 2);
    }

    #[test]
    fn default_falls_back_to_latest_started() {
        let sessions = vec![
            session(2, day(2024, 4, 1), day(2024, 6, 30)),
            session(1, day(2024, 1, 1), day(2024, 3, 31)),
        ];
        let picked = pick_default(&sessions, day(2025, 1, 1)).unwrap();
        assert_eq!(picked.id, 2);
    }

    #[test]
    fn no_sessions_no_default() {
        assert!(pick_default(&[], day(2024, 1, 1)).is_none());
    }

    #[test]
    fn window_bounds_are_inclusive() {
        let s = session(1, day(2024, 1, 1), day(2024, 3, 31));
        assert!(s.is_open_on(day(2024, 1, 1)));
        assert!(s.is_open_on(day(2024, 3, 31)));
        assert!(!s.is_open_on(day(2024, 4, 1)));
        assert_eq!(s.display_name(), "S1 (2024-01-01 - 2024-03-31)");
    }
}
