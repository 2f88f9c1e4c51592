//! Role-scoped visibility, end to end through the dashboard loaders.

mod common;

use common::*;
use healthcheck::auth::scope;
use healthcheck::handlers::dashboard::view::{self, DashboardQuery};
use healthcheck::models::user::Role;
use healthcheck::models::vote::{self, form};
use sqlx::PgPool;

struct Org {
    eng: i64,
    ops: i64,
    alpha: i64,
    beta: i64,
    gamma: i64,
    q1: i64,
}

/// Eng has Alpha and Beta, Ops has Gamma. Gamma has votes in Q1.
async fn org(pool: &PgPool) -> Org {
    let eng = create_department(pool, "Eng").await;
    let ops = create_department(pool, "Ops").await;
    let alpha = create_team(pool, "Alpha", Some(eng)).await;
    let beta = create_team(pool, "Beta", Some(eng)).await;
    let gamma = create_team(pool, "Gamma", Some(ops)).await;
    let q1 = create_session(pool, "Q1-2024").await;

    let voter = create_user(pool, "gamma_eng", Role::Engineer, Some(ops), Some(gamma)).await;
    let entries = form::parse_cards(&full_form("good", "improving")).expect("form");
    vote::upsert_cards(pool, voter, gamma, q1, &entries).await.expect("vote");

    Org { eng, ops, alpha, beta, gamma, q1 }
}

fn query(department: Option<i64>, team: Option<i64>, session: i64) -> DashboardQuery {
    DashboardQuery {
        department: department.map(|d| d.to_string()),
        team: team.map(|t| t.to_string()),
        session: Some(session.to_string()),
        mine: None,
    }
}

#[sqlx::test]
async fn department_leader_asking_for_another_department_gets_their_own(pool: PgPool) {
    let org = org(&pool).await;
    let lead = create_user(&pool, "eng_lead", Role::DepartmentLeader, Some(org.eng), None).await;

    let (_viewer, scope) = scope::resolve_for_user(&pool, lead).await.expect("scope");
    let today = day(2024, 2, 1);
    let view = view::load_department_view(&pool, &scope, &query(Some(org.ops), None, org.q1), today)
        .await
        .expect("view");

    assert_eq!(view.department.as_ref().map(|d| d.id), Some(org.eng));
    assert_eq!(view.errors, vec!["You do not have access to that department.".to_string()]);
    // Ops has votes, Eng has none: nothing of Ops may leak into the rows.
    assert!(view.rows.iter().all(|r| r.aggregate.is_none()));
    assert!(view.summaries.iter().any(|s| s.department_id == org.ops));
}

#[sqlx::test]
async fn unassigned_department_leader_sees_nothing(pool: PgPool) {
    let org = org(&pool).await;
    let lead = create_user(&pool, "floating_lead", Role::DepartmentLeader, None, None).await;

    let (_viewer, scope) = scope::resolve_for_user(&pool, lead).await.expect("scope");
    assert!(scope.departments.is_empty());
    assert!(scope.teams.is_empty());
    assert!(scope.warning.is_some());

    let view = view::load_department_view(&pool, &scope, &query(Some(org.ops), None, org.q1), day(2024, 2, 1))
        .await
        .expect("view");
    assert!(view.department.is_none());
    assert!(view.rows.iter().all(|r| r.aggregate.is_none()));
    assert!(view.summaries.is_empty());
}

#[sqlx::test]
async fn engineer_sees_teams_of_their_departments(pool: PgPool) {
    let org = org(&pool).await;
    let ann = create_user(&pool, "ann", Role::Engineer, Some(org.eng), Some(org.alpha)).await;

    let (viewer, scope) = scope::resolve_for_user(&pool, ann).await.expect("scope");
    let mut visible: Vec<i64> = scope.teams.iter().map(|t| t.id).collect();
    visible.sort();
    assert_eq!(visible, vec![org.alpha, org.beta]);

    // Asking for Gamma falls back to the first visible team.
    let view = view::load_team_view(&pool, &viewer, &scope, &query(None, Some(org.gamma), org.q1), day(2024, 2, 1))
        .await
        .expect("view");
    assert_ne!(view.team.as_ref().map(|t| t.id), Some(org.gamma));
    assert!(view.errors.iter().any(|e| e.contains("team")));
    assert!(view.rows.iter().all(|r| r.aggregate.is_none()));
}

#[sqlx::test]
async fn senior_manager_sees_every_team(pool: PgPool) {
    let org = org(&pool).await;
    let boss = create_user(&pool, "boss", Role::SeniorManager, None, None).await;

    let (viewer, scope) = scope::resolve_for_user(&pool, boss).await.expect("scope");
    assert_eq!(scope.departments.len(), 2);
    assert_eq!(scope.teams.len(), 3);

    let view = view::load_team_view(&pool, &viewer, &scope, &query(None, Some(org.gamma), org.q1), day(2024, 2, 1))
        .await
        .expect("view");
    assert_eq!(view.team.as_ref().map(|t| t.id), Some(org.gamma));
    assert_eq!(view.department.as_ref().map(|d| d.id), Some(org.ops));
    assert!(view.errors.is_empty());
    assert!(view.rows.iter().all(|r| r.aggregate.is_some()));
}

#[sqlx::test]
async fn member_of_a_team_without_department_still_sees_it(pool: PgPool) {
    let org = org(&pool).await;
    let skunk = create_team(&pool, "Skunkworks", None).await;
    let ann = create_user(&pool, "ann", Role::TeamLeader, None, Some(skunk)).await;
    join_team(&pool, ann, org.alpha).await;

    let (viewer, scope) = scope::resolve_for_user(&pool, ann).await.expect("scope");
    assert!(scope.contains_team(skunk));
    assert!(scope.contains_team(org.beta));
    assert!(!scope.contains_team(org.gamma));

    let view = view::load_team_view(&pool, &viewer, &scope, &query(None, Some(skunk), org.q1), day(2024, 2, 1))
        .await
        .expect("view");
    assert_eq!(view.team.as_ref().map(|t| t.id), Some(skunk));
    assert!(view.department.is_none());
    assert!(view.errors.is_empty());
}
