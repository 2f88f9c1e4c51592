//! Validation of the card form.
//!
//! Each catalog category posts three fields: `vote_<code>`,
//! `progress_<code>` and an optional `comment_<code>`. A submission is
//! accepted only when every category has a valid vote and progress.

use std::collections::HashMap;

use crate::models::card::{CARD_CATEGORIES, CardCategory, Progress, VoteValue};
use super::types::CardEntry;

pub const MAX_COMMENT_LEN: usize = 1000;

/// Why one category of a submission was refused.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardProblem {
    pub category: &'static CardCategory,
    pub message: String,
}

pub fn vote_field(code: &str) -> String {
    format!("vote_{code}")
}

pub fn progress_field(code: &str) -> String {
    format!("progress_{code}")
}

pub fn comment_field(code: &str) -> String {
    format!("comment_{code}")
}

fn field<'a>(fields: &'a HashMap<String, String>, name: &str) -> &'a str {
    fields.get(name).map(|v| v.trim()).unwrap_or("")
}

/// Validate a full card form. On failure, returns one problem per
/// offending category, in catalog order.
pub fn parse_cards(fields: &HashMap<String, String>) -> Result<Vec<CardEntry>, Vec<CardProblem>> {
    let mut entries = Vec::with_capacity(CARD_CATEGORIES.len());
    let mut problems = Vec::new();

    for category in CARD_CATEGORIES.iter() {
        let vote = VoteValue::parse(field(fields, &vote_field(category.code)));
        let progress = Progress::parse(field(fields, &progress_field(category.code)));
        let comment = field(fields, &comment_field(category.code));

        match (vote, progress) {
            (Some(vote), Some(progress)) => {
                if comment.chars().count() > MAX_COMMENT_LEN {
                    problems.push(CardProblem {
                        category,
                        message: format!(
                            "{}: comment must be at most {MAX_COMMENT_LEN} characters",
                            category.label
                        ),
                    });
                    continue;
                }
                entries.push(CardEntry {
                    category,
                    vote,
                    progress,
                    comment: (!comment.is_empty()).then(|| comment.to_string()),
                });
            }
            (vote, progress) => {
                let missing = match (vote.is_none(), progress.is_none()) {
                    (true, true) => "vote and progress",
                    (true, false) => "vote",
                    _ => "progress",
                };
                problems.push(CardProblem {
                    category,
                    message: format!("{}: please select a {missing}", category.label),
                });
            }
        }
    }

    if problems.is_empty() { Ok(entries) } else { Err(problems) }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn complete_form() -> HashMap<String, String> {
        let mut fields = HashMap::new();
        for c in CARD_CATEGORIES.iter() {
            fields.insert(vote_field(c.code), "good".to_string());
            fields.insert(progress_field(c.code), "improving".to_string());
        }
        fields
    }

    #[test]
    fn complete_form_yields_entry_per_category_in_order() {
        let entries = parse_cards(&complete_form()).unwrap();
        assert_eq!(entries.len(), CARD_CATEGORIES.len());
        for (entry, category) in entries.iter().zip(CARD_CATEGORIES.iter()) {
            assert_eq!(entry.category.code, category.code);
            assert_eq!(entry.vote, VoteValue::Good);
            assert_eq!(entry.progress, Progress::Improving);
            assert_eq!(entry.comment, None);
        }
    }

    #[test]
    fn missing_progress_names_the_category() {
        let mut fields = complete_form();
        fields.remove(&progress_field("testing_coverage"));
        let problems = parse_cards(&fields).unwrap_err();
        assert_eq!(problems.len(), 1);
        assert_eq!(problems[0].category.code, "testing_coverage");
        assert!(problems[0].message.contains("progress"));
    }

    #[test]
    fn invalid_value_counts_as_missing() {
        let mut fields = complete_form();
        fields.insert(vote_field("code_quality"), "excellent".to_string());
        fields.insert(progress_field("workload_balance"), "   ".to_string());
        let problems = parse_cards(&fields).unwrap_err();
        let codes: Vec<&str> = problems.iter().map(|p| p.category.code).collect();
        assert_eq!(codes, vec!["code_quality", "workload_balance"]);
    }

    #[test]
    fn empty_form_reports_every_category() {
        let problems = parse_cards(&HashMap::new()).unwrap_err();
        assert_eq!(problems.len(), CARD_CATEGORIES.len());
        assert!(problems[0].message.contains("vote and progress"));
    }

    #[test]
    fn comments_are_trimmed_and_limited() {
        let mut fields = complete_form();
        fields.insert(comment_field("code_quality"), "  reviews are quick  ".to_string());
        let entries = parse_cards(&fields).unwrap();
        assert_eq!(entries[0].comment.as_deref(), Some("reviews are quick"));

        fields.insert(comment_field("knowledge_sharing"), "x".repeat(MAX_COMMENT_LEN + 1));
        let problems = parse_cards(&fields).unwrap_err();
        assert_eq!(problems[0].category.code, "knowledge_sharing");
    }
}
