use sqlx::PgPool;

use crate::errors::AppError;
use super::types::*;

/// Store a validated card form. Each card is inserted, or overwrites the
/// user's earlier vote for the same team, session and card type. The
/// whole form commits or nothing does.
pub async fn upsert_cards(
    pool: &PgPool,
    user_id: i64,
    team_id: i64,
    session_id: i64,
    entries: &[CardEntry],
) -> Result<usize, AppError> {
    let mut tx = pool.begin().await?;

    for entry in entries {
        sqlx::query(
            "INSERT INTO votes (user_id, team_id, session_id, card_type, vote, progress, comments) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) \
             ON CONFLICT (user_id, team_id, session_id, card_type) DO UPDATE \
             SET vote = EXCLUDED.vote, \
                 progress = EXCLUDED.progress, \
                 comments = EXCLUDED.comments, \
                 updated_at = NOW()",
        )
        .bind(user_id)
        .bind(team_id)
        .bind(session_id)
        .bind(entry.category.code)
        .bind(entry.vote.as_str())
        .bind(entry.progress.as_str())
        .bind(entry.comment.as_deref())
        .execute(&mut *tx)
        .await?;
    }

    tx.commit().await?;
    log::info!(
        "Stored {} cards for user {user_id}, team {team_id}, session {session_id}",
        entries.len()
    );
    Ok(entries.len())
}

/// The user's own votes for a team and session.
pub async fn find_choices(
    pool: &PgPool,
    user_id: i64,
    team_id: i64,
    session_id: i64,
) -> Result<Vec<VoteChoice>, AppError> {
    let rows = sqlx::query_as::<_, VoteChoice>(
        "SELECT card_type, vote, progress, comments \
         FROM votes \
         WHERE user_id = $1 AND team_id = $2 AND session_id = $3",
    )
    .bind(user_id)
    .bind(team_id)
    .bind(session_id)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}
