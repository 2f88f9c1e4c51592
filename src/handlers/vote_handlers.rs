use std::collections::HashMap;

use actix_session::Session;
use actix_web::{HttpResponse, web};
use chrono::Local;
use serde::Deserialize;
use sqlx::PgPool;

use crate::auth::csrf;
use crate::auth::scope::{self, Scope, Viewer};
use crate::auth::session::{require_user_id, set_flash, set_flash_error};
use crate::config::SiteInfo;
use crate::errors::{AppError, redirect, render};
use crate::handlers::dashboard::view::select_session;
use crate::models::card::CARD_CATEGORIES;
use crate::models::health_session::{self, HealthSession};
use crate::models::vote::{self, form};
use crate::templates_structs::{
    CardFormRow, PageContext, SessionOption, VoteFormTemplate, progress_choices, vote_choices,
};

const NOT_ALLOWED: &str = "Department leaders and senior managers cannot vote.";

#[derive(Debug, Default, Deserialize)]
pub struct VoteQuery {
    pub team: Option<String>,
    pub session: Option<String>,
}

/// Voting roles only; the role comes from the database, not the cookie.
async fn load_voter(pool: &PgPool, session: &Session) -> Result<Option<(Viewer, Scope)>, AppError> {
    let user_id = require_user_id(session)?;
    let (viewer, scope) = scope::resolve_for_user(pool, user_id).await?;
    if !viewer.role.can_vote() {
        log::warn!("User {user_id} ({}) tried to vote", viewer.role.as_str());
        set_flash_error(session, NOT_ALLOWED);
        return Ok(None);
    }
    Ok(Some((viewer, scope)))
}

struct FormState {
    team_id: i64,
    session_id: i64,
    rows: Vec<CardFormRow>,
    errors: Vec<String>,
    has_existing: bool,
}

fn render_form(
    session: &Session,
    site: &SiteInfo,
    scope: &Scope,
    sessions: &[HealthSession],
    state: FormState,
) -> Result<HttpResponse, AppError> {
    let mut ctx = PageContext::build(session, site, "/vote")?;
    if let Some(warning) = &scope.warning {
        ctx.push_error(warning.clone());
    }
    let today = Local::now().date_naive();
    render(VoteFormTemplate {
        ctx,
        teams: scope.teams.clone(),
        sessions: sessions.iter().map(|s| SessionOption::from_session(s, today)).collect(),
        team_id: state.team_id,
        session_id: state.session_id,
        rows: state.rows,
        errors: state.errors,
        vote_choices: vote_choices(),
        progress_choices: progress_choices(),
        has_existing: state.has_existing,
    })
}

/// GET /vote?team=&session=
pub async fn vote_form(
    pool: web::Data<PgPool>,
    site: web::Data<SiteInfo>,
    session: Session,
    query: web::Query<VoteQuery>,
) -> Result<HttpResponse, AppError> {
    let Some((viewer, scope)) = load_voter(&pool, &session).await? else {
        return Ok(redirect("/dashboard"));
    };

    let mut errors = Vec::new();
    let team_sel = scope.select_team(query.team.as_deref());
    errors.extend(team_sel.error);
    let team_id = team_sel.chosen.map(|t| t.id);

    let sessions = health_session::find_all(&pool).await?;
    let (chosen_session, session_error) =
        select_session(&sessions, query.session.as_deref(), Local::now().date_naive());
    errors.extend(session_error);
    let session_id = chosen_session.map(|s| s.id);

    let choices = match (team_id, session_id) {
        (Some(t), Some(s)) => vote::find_choices(&pool, viewer.user_id, t, s).await?,
        _ => Vec::new(),
    };

    let state = FormState {
        team_id: team_id.unwrap_or(0),
        session_id: session_id.unwrap_or(0),
        rows: CardFormRow::from_choices(&CARD_CATEGORIES, &choices),
        errors,
        has_existing: !choices.is_empty(),
    };
    render_form(&session, &site, &scope, &sessions, state)
}

/// POST /vote: the whole card form is stored, or none of it.
pub async fn vote_submit(
    pool: web::Data<PgPool>,
    site: web::Data<SiteInfo>,
    session: Session,
    form: web::Form<HashMap<String, String>>,
) -> Result<HttpResponse, AppError> {
    let fields = form.into_inner();
    let Some((viewer, scope)) = load_voter(&pool, &session).await? else {
        return Ok(redirect("/dashboard"));
    };

    let token = fields.get("csrf_token").map(String::as_str).unwrap_or("");
    csrf::validate_csrf(&session, token)?;

    let team_id = fields
        .get("team")
        .and_then(|t| t.trim().parse::<i64>().ok())
        .filter(|id| scope.contains_team(*id));
    let Some(team_id) = team_id else {
        log::warn!("User {} submitted votes for a team outside their scope", viewer.user_id);
        set_flash_error(&session, "You do not have access to that team.");
        return Ok(redirect("/vote"));
    };

    let session_id = fields.get("session").and_then(|s| s.trim().parse::<i64>().ok());
    let round = match session_id {
        Some(id) => health_session::find_by_id(&pool, id).await?,
        None => None,
    };
    let Some(round) = round else {
        set_flash_error(&session, "That session does not exist.");
        return Ok(redirect(&format!("/vote?team={team_id}")));
    };

    match form::parse_cards(&fields) {
        Ok(entries) => {
            vote::upsert_cards(&pool, viewer.user_id, team_id, round.id, &entries).await?;
            set_flash(&session, "Your votes have been saved.");
            Ok(redirect(&format!(
                "/dashboard/team?team={team_id}&session={}",
                round.id
            )))
        }
        Err(problems) => {
            log::info!(
                "Rejected vote form from user {}: {} incomplete cards",
                viewer.user_id,
                problems.len()
            );
            let sessions = health_session::find_all(&pool).await?;
            let state = FormState {
                team_id,
                session_id: round.id,
                rows: CardFormRow::from_submission(&CARD_CATEGORIES, &fields, &problems),
                errors: problems.iter().map(|p| p.message.clone()).collect(),
                has_existing: false,
            };
            render_form(&session, &site, &scope, &sessions, state)
        }
    }
}
