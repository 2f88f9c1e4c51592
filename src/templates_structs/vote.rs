use std::collections::HashMap;

use askama::Template;

use crate::models::card::{CardCategory, Progress, VoteValue};
use crate::models::team::Team;
use crate::models::vote::VoteChoice;
use crate::models::vote::form::{CardProblem, comment_field, progress_field, vote_field};
use super::{PageContext, SessionOption};

/// A radio button value.
pub struct Choice {
    pub value: &'static str,
    pub label: &'static str,
}

/// One card on the vote form, with whatever the user entered or stored.
pub struct CardFormRow {
    pub code: &'static str,
    pub label: &'static str,
    pub vote: String,
    pub progress: String,
    pub comment: String,
    pub error: Option<String>,
}

impl CardFormRow {
    /// Rows prefilled from stored votes.
    pub fn from_choices(catalog: &[CardCategory], choices: &[VoteChoice]) -> Vec<Self> {
        catalog
            .iter()
            .map(|category| {
                let stored = choices.iter().find(|c| c.card_type == category.code);
                CardFormRow {
                    code: category.code,
                    label: category.label,
                    vote: stored.map(|c| c.vote.clone()).unwrap_or_default(),
                    progress: stored.map(|c| c.progress.clone()).unwrap_or_default(),
                    comment: stored.and_then(|c| c.comments.clone()).unwrap_or_default(),
                    error: None,
                }
            })
            .collect()
    }

    /// Rows echoing a rejected submission, with per-card errors.
    pub fn from_submission(
        catalog: &[CardCategory],
        fields: &HashMap<String, String>,
        problems: &[CardProblem],
    ) -> Vec<Self> {
        let get = |name: String| fields.get(&name).cloned().unwrap_or_default();
        catalog
            .iter()
            .map(|category| CardFormRow {
                code: category.code,
                label: category.label,
                vote: get(vote_field(category.code)),
                progress: get(progress_field(category.code)),
                comment: get(comment_field(category.code)),
                error: problems
                    .iter()
                    .find(|p| p.category.code == category.code)
                    .map(|p| p.message.clone()),
            })
            .collect()
    }
}

pub fn vote_choices() -> Vec<Choice> {
    VoteValue::ALL
        .iter()
        .map(|v| Choice { value: v.as_str(), label: v.label() })
        .collect()
}

pub fn progress_choices() -> Vec<Choice> {
    Progress::ALL
        .iter()
        .map(|p| Choice { value: p.as_str(), label: p.label() })
        .collect()
}

#[derive(Template)]
#[template(path = "vote/form.html")]
pub struct VoteFormTemplate {
    pub ctx: PageContext,
    pub teams: Vec<Team>,
    pub sessions: Vec<SessionOption>,
    pub team_id: i64,
    pub session_id: i64,
    pub rows: Vec<CardFormRow>,
    pub errors: Vec<String>,
    pub vote_choices: Vec<Choice>,
    pub progress_choices: Vec<Choice>,
    pub has_existing: bool,
}
