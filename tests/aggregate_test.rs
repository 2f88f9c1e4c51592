//! Department-level tallies and the comparison table.

mod common;

use common::*;
use healthcheck::models::user::Role;
use healthcheck::models::vote::{self, Percent, aggregate, form};
use sqlx::PgPool;

#[sqlx::test]
async fn department_tally_spans_its_teams_only(pool: PgPool) {
    let eng = create_department(&pool, "Eng").await;
    let ops = create_department(&pool, "Ops").await;
    let alpha = create_team(&pool, "Alpha", Some(eng)).await;
    let beta = create_team(&pool, "Beta", Some(eng)).await;
    let gamma = create_team(&pool, "Gamma", Some(ops)).await;
    let q1 = create_session(&pool, "Q1-2024").await;

    let a = create_user(&pool, "a", Role::Engineer, Some(eng), Some(alpha)).await;
    let b = create_user(&pool, "b", Role::Engineer, Some(eng), Some(beta)).await;
    let c = create_user(&pool, "c", Role::Engineer, Some(ops), Some(gamma)).await;

    let good = form::parse_cards(&full_form("good", "stable")).expect("form");
    let neutral = form::parse_cards(&full_form("neutral", "stable")).expect("form");
    let poor = form::parse_cards(&full_form("needs_improvement", "declining")).expect("form");
    vote::upsert_cards(&pool, a, alpha, q1, &good).await.expect("a");
    vote::upsert_cards(&pool, b, beta, q1, &neutral).await.expect("b");
    vote::upsert_cards(&pool, c, gamma, q1, &poor).await.expect("c");

    let eng_tally = aggregate::for_department(&pool, eng, q1).await.expect("eng");
    let row = &eng_tally["deployment_process"];
    assert_eq!(row.total_votes, 2);
    assert_eq!(row.good_count, 1);
    assert_eq!(row.neutral_count, 1);
    assert_eq!(row.needs_improvement_count, 0);
    assert_eq!(row.stable_count, 2);
    assert_eq!(row.shares.good_percentage, Percent::from_tenths(500));
}

#[sqlx::test]
async fn other_departments_are_listed_even_without_votes(pool: PgPool) {
    let eng = create_department(&pool, "Eng").await;
    let ops = create_department(&pool, "Ops").await;
    let _sales = create_department(&pool, "Sales").await;
    let alpha = create_team(&pool, "Alpha", Some(eng)).await;
    let gamma = create_team(&pool, "Gamma", Some(ops)).await;
    let q1 = create_session(&pool, "Q1-2024").await;

    let a = create_user(&pool, "a", Role::Engineer, Some(eng), Some(alpha)).await;
    let c = create_user(&pool, "c", Role::Engineer, Some(ops), Some(gamma)).await;
    let good = form::parse_cards(&full_form("good", "improving")).expect("form");
    let neutral = form::parse_cards(&full_form("neutral", "stable")).expect("form");
    vote::upsert_cards(&pool, a, alpha, q1, &good).await.expect("a");
    vote::upsert_cards(&pool, c, gamma, q1, &neutral).await.expect("c");

    let others = aggregate::other_department_summaries(&pool, q1, Some(eng)).await.expect("others");
    let names: Vec<&str> = others.iter().map(|s| s.department_name.as_str()).collect();
    assert_eq!(names, vec!["Ops", "Sales"]);

    assert_eq!(others[0].total_votes, 10);
    assert_eq!(others[0].neutral_count, 10);
    assert_eq!(others[0].shares.neutral_percentage, Percent::HUNDRED);

    assert_eq!(others[1].total_votes, 0);
    assert_eq!(others[1].shares.good_percentage, Percent::ZERO);
}

#[sqlx::test]
async fn sessions_do_not_mix(pool: PgPool) {
    let alpha = create_team(&pool, "Alpha", None).await;
    let q1 = create_session(&pool, "Q1-2024").await;
    let q2 = healthcheck::models::health_session::create(&pool, "Q2-2024", day(2024, 4, 1), day(2024, 6, 30))
        .await
        .expect("q2");
    let a = create_user(&pool, "a", Role::Engineer, None, Some(alpha)).await;

    let good = form::parse_cards(&full_form("good", "improving")).expect("form");
    vote::upsert_cards(&pool, a, alpha, q1, &good).await.expect("q1 vote");

    assert_eq!(aggregate::for_team(&pool, alpha, q1, None).await.expect("q1").len(), 10);
    assert!(aggregate::for_team(&pool, alpha, q2, None).await.expect("q2").is_empty());
}
