use chrono::{Datelike, Local, NaiveDate};
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;

use crate::auth::password;
use crate::errors::AppError;
use crate::models::user::{self, NewUser, Role};
use crate::models::{department, health_session, team};

const DEMO_PASSWORD: &str = "healthcheck";
const ENGINEERS_PER_TEAM: usize = 5;

/// Demo organisation: (department, teams).
const DEMO_ORG: &[(&str, &[&str])] = &[
    ("Engineering", &["Alpha", "Bravo", "Charlie"]),
    ("Platform", &["Delta", "Echo"]),
    ("Product", &["Foxtrot"]),
];

pub async fn init_pool(database_url: &str) -> Result<PgPool, AppError> {
    let pool = PgPoolOptions::new()
        .max_connections(8)
        .connect(database_url)
        .await?;
    Ok(pool)
}

pub async fn run_migrations(pool: &PgPool) -> Result<(), AppError> {
    sqlx::migrate!("./migrations").run(pool).await?;
    log::info!("Database migrations complete");
    Ok(())
}

/// Seed a demo organisation: departments, teams, the current quarter's
/// session, engineers in every team and one leader per role. Does nothing
/// if any department exists.
pub async fn seed_demo(pool: &PgPool) -> Result<(), AppError> {
    let existing: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM departments")
        .fetch_one(pool)
        .await?;
    if existing > 0 {
        log::info!("Database already has {existing} departments, skipping demo seed");
        return Ok(());
    }

    let password_hash = password::hash_password(DEMO_PASSWORD)?;
    let mut engineer_counter = 1;
    let mut first_department = None;

    for (department_name, team_names) in DEMO_ORG {
        let department_id = department::create(pool, department_name).await?;
        first_department.get_or_insert(department_id);

        for team_name in team_names.iter() {
            let team_id = team::create(pool, team_name, Some(department_id)).await?;
            for _ in 0..ENGINEERS_PER_TEAM {
                let username = format!("eng{engineer_counter}");
                user::create(pool, &NewUser {
                    email: format!("{username}@example.com"),
                    first_name: format!("Eng{engineer_counter}"),
                    last_name: "User".to_string(),
                    username,
                    password_hash: password_hash.clone(),
                    role: Role::Engineer,
                    department_id: Some(department_id),
                    team_id: Some(team_id),
                })
                .await?;
                engineer_counter += 1;
            }
        }
    }

    let leaders = [
        ("deptlead", Role::DepartmentLeader, first_department),
        ("senior", Role::SeniorManager, None),
    ];
    for (username, role, department_id) in leaders {
        user::create(pool, &NewUser {
            username: username.to_string(),
            password_hash: password_hash.clone(),
            first_name: role.label().to_string(),
            last_name: "Demo".to_string(),
            email: format!("{username}@example.com"),
            role,
            department_id,
            team_id: None,
        })
        .await?;
    }

    let (name, start, end) = current_quarter(Local::now().date_naive());
    health_session::create(pool, &name, start, end).await?;

    log::info!(
        "Demo seed complete: {} engineers, password '{DEMO_PASSWORD}'",
        engineer_counter - 1
    );
    Ok(())
}

/// Name and bounds of the calendar quarter containing `day`, e.g. "Q1-2024".
fn current_quarter(day: NaiveDate) -> (String, NaiveDate, NaiveDate) {
    let quarter = (day.month0() / 3) + 1;
    let start_month = (quarter - 1) * 3 + 1;
    let start = NaiveDate::from_ymd_opt(day.year(), start_month, 1).unwrap_or(day);
    let end = if quarter == 4 {
        NaiveDate::from_ymd_opt(day.year(), 12, 31)
    } else {
        NaiveDate::from_ymd_opt(day.year(), start_month + 3, 1).and_then(|d| d.pred_opt())
    }
    .unwrap_or(day);
    (format!("Q{quarter}-{}", day.year()), start, end)
}
