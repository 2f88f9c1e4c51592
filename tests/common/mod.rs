//! Shared fixtures for the database tests.
//!
//! Every `#[sqlx::test]` gets a fresh database with the migrations
//! applied; these helpers fill it with just what a test needs.

#![allow(dead_code)]

use std::collections::HashMap;

use chrono::NaiveDate;
use sqlx::PgPool;

use healthcheck::auth::password;
use healthcheck::models::card::CARD_CATEGORIES;
use healthcheck::models::user::{self, NewUser, Role};
use healthcheck::models::vote::form::{comment_field, progress_field, vote_field};
use healthcheck::models::{department, health_session, membership, team};

pub const TEST_PASSWORD: &str = "correct-horse";

pub fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
}

pub async fn create_department(pool: &PgPool, name: &str) -> i64 {
    department::create(pool, name).await.expect("create department")
}

pub async fn create_team(pool: &PgPool, name: &str, department_id: Option<i64>) -> i64 {
    team::create(pool, name, department_id).await.expect("create team")
}

/// A session covering Q1 2024.
pub async fn create_session(pool: &PgPool, name: &str) -> i64 {
    health_session::create(pool, name, day(2024, 1, 1), day(2024, 3, 31))
        .await
        .expect("create session")
}

/// A user with the given role. Team roles join `team_id`.
pub async fn create_user(
    pool: &PgPool,
    username: &str,
    role: Role,
    department_id: Option<i64>,
    team_id: Option<i64>,
) -> i64 {
    let new = NewUser {
        username: username.to_string(),
        password_hash: password::hash_password(TEST_PASSWORD).expect("hash"),
        first_name: "Test".to_string(),
        last_name: username.to_string(),
        email: format!("{username}@example.com"),
        role,
        department_id,
        team_id,
    };
    user::create(pool, &new).await.expect("create user")
}

pub async fn join_team(pool: &PgPool, user_id: i64, team_id: i64) {
    membership::join(pool, user_id, team_id).await.expect("join team");
}

/// A complete card form giving every category the same answer.
pub fn full_form(vote: &str, progress: &str) -> HashMap<String, String> {
    let mut fields = HashMap::new();
    for category in CARD_CATEGORIES.iter() {
        fields.insert(vote_field(category.code), vote.to_string());
        fields.insert(progress_field(category.code), progress.to_string());
        fields.insert(comment_field(category.code), String::new());
    }
    fields
}

pub async fn count_votes(pool: &PgPool) -> i64 {
    sqlx::query_scalar("SELECT COUNT(*) FROM votes")
        .fetch_one(pool)
        .await
        .expect("count votes")
}
