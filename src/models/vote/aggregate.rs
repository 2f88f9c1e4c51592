//! Vote tallies per category.
//!
//! Counting is done by Postgres (`COUNT(*) FILTER`), one row per card type.
//! Percentages are derived here: good and neutral are rounded to one
//! decimal, needs-improvement is whatever is left of 100.0.

use std::collections::HashMap;

use sqlx::PgPool;

use crate::errors::AppError;
use super::types::*;

/// Round `100 * count / total` to tenths of a percent, half up.
fn share_tenths(count: i64, total: i64) -> i64 {
    (2000 * count + total) / (2 * total)
}

impl VoteShares {
    pub fn from_counts(good: i64, neutral: i64, total: i64) -> Self {
        if total <= 0 {
            return VoteShares::default();
        }
        let good_tenths = share_tenths(good, total);
        // Two half-up roundings can overshoot 100.0 by a tenth.
        let neutral_tenths = share_tenths(neutral, total).min(1000 - good_tenths);
        VoteShares {
            good_percentage: Percent::from_tenths(good_tenths),
            neutral_percentage: Percent::from_tenths(neutral_tenths),
            needs_improvement_percentage: Percent::from_tenths(1000 - good_tenths - neutral_tenths),
        }
    }
}

impl From<CategoryCounts> for CategoryAggregate {
    fn from(c: CategoryCounts) -> Self {
        let shares = VoteShares::from_counts(c.good_count, c.neutral_count, c.total_votes);
        CategoryAggregate {
            card_type: c.card_type,
            total_votes: c.total_votes,
            good_count: c.good_count,
            neutral_count: c.neutral_count,
            needs_improvement_count: c.needs_improvement_count,
            improving_count: c.improving_count,
            stable_count: c.stable_count,
            declining_count: c.declining_count,
            shares,
        }
    }
}

const COUNT_COLUMNS: &str = "v.card_type, \
     COUNT(*) AS total_votes, \
     COUNT(*) FILTER (WHERE v.vote = 'good') AS good_count, \
     COUNT(*) FILTER (WHERE v.vote = 'neutral') AS neutral_count, \
     COUNT(*) FILTER (WHERE v.vote = 'needs_improvement') AS needs_improvement_count, \
     COUNT(*) FILTER (WHERE v.progress = 'improving') AS improving_count, \
     COUNT(*) FILTER (WHERE v.progress = 'stable') AS stable_count, \
     COUNT(*) FILTER (WHERE v.progress = 'declining') AS declining_count";

fn into_map(rows: Vec<CategoryCounts>) -> HashMap<String, CategoryAggregate> {
    rows.into_iter()
        .map(|row| (row.card_type.clone(), CategoryAggregate::from(row)))
        .collect()
}

/// Per-category tallies for one team in one session. With `only_user`,
/// only that user's votes are counted ("my votes").
pub async fn for_team(
    pool: &PgPool,
    team_id: i64,
    session_id: i64,
    only_user: Option<i64>,
) -> Result<HashMap<String, CategoryAggregate>, AppError> {
    let sql = format!(
        "SELECT {COUNT_COLUMNS} \
         FROM votes v \
         WHERE v.team_id = $1 AND v.session_id = $2 \
           AND ($3::BIGINT IS NULL OR v.user_id = $3) \
         GROUP BY v.card_type"
    );
    let rows = sqlx::query_as::<_, CategoryCounts>(&sql)
        .bind(team_id)
        .bind(session_id)
        .bind(only_user)
        .fetch_all(pool)
        .await?;
    Ok(into_map(rows))
}

/// Per-category tallies across every team of a department in one session.
pub async fn for_department(
    pool: &PgPool,
    department_id: i64,
    session_id: i64,
) -> Result<HashMap<String, CategoryAggregate>, AppError> {
    let sql = format!(
        "SELECT {COUNT_COLUMNS} \
         FROM votes v \
         JOIN teams t ON t.id = v.team_id \
         WHERE t.department_id = $1 AND v.session_id = $2 \
         GROUP BY v.card_type"
    );
    let rows = sqlx::query_as::<_, CategoryCounts>(&sql)
        .bind(department_id)
        .bind(session_id)
        .fetch_all(pool)
        .await?;
    Ok(into_map(rows))
}

/// Session totals for every department except `exclude`, ordered by name.
/// Departments without votes are listed with zero counts.
pub async fn other_department_summaries(
    pool: &PgPool,
    session_id: i64,
    exclude: Option<i64>,
) -> Result<Vec<DepartmentSummary>, AppError> {
    #[derive(sqlx::FromRow)]
    struct Row {
        department_id: i64,
        department_name: String,
        total_votes: i64,
        good_count: i64,
        neutral_count: i64,
        needs_improvement_count: i64,
    }

    let rows = sqlx::query_as::<_, Row>(
        "SELECT d.id AS department_id, d.name AS department_name, \
                COUNT(v.id) AS total_votes, \
                COUNT(v.id) FILTER (WHERE v.vote = 'good') AS good_count, \
                COUNT(v.id) FILTER (WHERE v.vote = 'neutral') AS neutral_count, \
                COUNT(v.id) FILTER (WHERE v.vote = 'needs_improvement') AS needs_improvement_count \
         FROM departments d \
         LEFT JOIN teams t ON t.department_id = d.id \
         LEFT JOIN votes v ON v.team_id = t.id AND v.session_id = $1 \
         WHERE ($2::BIGINT IS NULL OR d.id <> $2) \
         GROUP BY d.id, d.name \
         ORDER BY d.name",
    )
    .bind(session_id)
    .bind(exclude)
    .fetch_all(pool)
    .await?;

    let summaries = rows
        .into_iter()
        .map(|r| DepartmentSummary {
            shares: VoteShares::from_counts(r.good_count, r.neutral_count, r.total_votes),
            department_id: r.department_id,
            department_name: r.department_name,
            total_votes: r.total_votes,
            good_count: r.good_count,
            neutral_count: r.neutral_count,
            needs_improvement_count: r.needs_improvement_count,
        })
        .collect();
    Ok(summaries)
}
