//! Vote storage and per-team tallies against a real database.

mod common;

use common::*;
use healthcheck::models::card::CARD_CATEGORIES;
use healthcheck::models::dashboard;
use healthcheck::models::user::Role;
use healthcheck::models::vote::{self, Percent, aggregate, form};
use sqlx::PgPool;

#[sqlx::test]
async fn two_engineers_voting_good_give_full_marks(pool: PgPool) {
    let eng = create_department(&pool, "Eng").await;
    let alpha = create_team(&pool, "Alpha", Some(eng)).await;
    let q1 = create_session(&pool, "Q1-2024").await;
    let ann = create_user(&pool, "ann", Role::Engineer, Some(eng), Some(alpha)).await;
    let bob = create_user(&pool, "bob", Role::Engineer, Some(eng), Some(alpha)).await;

    let entries = form::parse_cards(&full_form("good", "improving")).expect("complete form");
    vote::upsert_cards(&pool, ann, alpha, q1, &entries).await.expect("ann votes");
    vote::upsert_cards(&pool, bob, alpha, q1, &entries).await.expect("bob votes");

    let tallies = aggregate::for_team(&pool, alpha, q1, None).await.expect("tally");
    let code_quality = &tallies["code_quality"];
    assert_eq!(code_quality.total_votes, 2);
    assert_eq!(code_quality.good_count, 2);
    assert_eq!(code_quality.improving_count, 2);
    assert_eq!(code_quality.shares.good_percentage, Percent::HUNDRED);
    assert_eq!(code_quality.shares.neutral_percentage, Percent::ZERO);
    assert_eq!(code_quality.shares.needs_improvement_percentage, Percent::ZERO);
}

#[sqlx::test]
async fn resubmitting_overwrites_instead_of_duplicating(pool: PgPool) {
    let alpha = create_team(&pool, "Alpha", None).await;
    let q1 = create_session(&pool, "Q1-2024").await;
    let ann = create_user(&pool, "ann", Role::Engineer, None, Some(alpha)).await;

    let first = form::parse_cards(&full_form("good", "stable")).expect("first form");
    vote::upsert_cards(&pool, ann, alpha, q1, &first).await.expect("first save");

    let mut fields = full_form("needs_improvement", "declining");
    fields.insert(form::comment_field("code_quality"), "builds are slow".into());
    let second = form::parse_cards(&fields).expect("second form");
    vote::upsert_cards(&pool, ann, alpha, q1, &second).await.expect("second save");

    assert_eq!(count_votes(&pool).await, CARD_CATEGORIES.len() as i64);

    let choices = vote::find_choices(&pool, ann, alpha, q1).await.expect("choices");
    assert_eq!(choices.len(), CARD_CATEGORIES.len());
    let code_quality = choices.iter().find(|c| c.card_type == "code_quality").expect("stored");
    assert_eq!(code_quality.vote, "needs_improvement");
    assert_eq!(code_quality.progress, "declining");
    assert_eq!(code_quality.comments.as_deref(), Some("builds are slow"));
}

#[sqlx::test]
async fn store_rejects_cards_outside_the_catalog(pool: PgPool) {
    let alpha = create_team(&pool, "Alpha", None).await;
    let q1 = create_session(&pool, "Q1-2024").await;
    let ann = create_user(&pool, "ann", Role::Engineer, None, Some(alpha)).await;

    let result = sqlx::query(
        "INSERT INTO votes (user_id, team_id, session_id, card_type, vote, progress) \
         VALUES ($1, $2, $3, 'team_morale', 'good', 'stable')",
    )
    .bind(ann)
    .bind(alpha)
    .bind(q1)
    .execute(&pool)
    .await;
    assert!(result.is_err());
    assert_eq!(count_votes(&pool).await, 0);
}

#[sqlx::test]
async fn my_votes_filter_counts_only_the_viewer(pool: PgPool) {
    let alpha = create_team(&pool, "Alpha", None).await;
    let q1 = create_session(&pool, "Q1-2024").await;
    let ann = create_user(&pool, "ann", Role::Engineer, None, Some(alpha)).await;
    let bob = create_user(&pool, "bob", Role::TeamLeader, None, Some(alpha)).await;

    let good = form::parse_cards(&full_form("good", "improving")).expect("form");
    let poor = form::parse_cards(&full_form("needs_improvement", "declining")).expect("form");
    vote::upsert_cards(&pool, ann, alpha, q1, &good).await.expect("ann");
    vote::upsert_cards(&pool, bob, alpha, q1, &poor).await.expect("bob");

    let everyone = aggregate::for_team(&pool, alpha, q1, None).await.expect("all");
    assert_eq!(everyone["workload_balance"].total_votes, 2);
    assert_eq!(everyone["workload_balance"].shares.good_percentage, Percent::from_tenths(500));

    let mine = aggregate::for_team(&pool, alpha, q1, Some(ann)).await.expect("mine");
    assert_eq!(mine["workload_balance"].total_votes, 1);
    assert_eq!(mine["workload_balance"].needs_improvement_count, 0);
}

#[sqlx::test]
async fn empty_team_still_lists_every_card(pool: PgPool) {
    let alpha = create_team(&pool, "Alpha", None).await;
    let q1 = create_session(&pool, "Q1-2024").await;

    let tallies = aggregate::for_team(&pool, alpha, q1, None).await.expect("tally");
    assert!(tallies.is_empty());

    let rows = dashboard::present(&CARD_CATEGORIES, &tallies);
    assert_eq!(rows.len(), CARD_CATEGORIES.len());
    assert!(rows.iter().all(|r| r.aggregate.is_none()));
    assert_eq!(dashboard::total_votes(&rows), 0);
}
