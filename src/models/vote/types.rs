use std::fmt;

use serde::{Serialize, Serializer};

use crate::models::card::{CardCategory, Progress, VoteValue};

/// A percentage with one decimal, stored as tenths of a percent so sums
/// stay exact.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord)]
pub struct Percent(i64);

impl Percent {
    pub const ZERO: Percent = Percent(0);
    pub const HUNDRED: Percent = Percent(1000);

    pub fn from_tenths(tenths: i64) -> Self {
        Percent(tenths)
    }

    pub fn tenths(&self) -> i64 {
        self.0
    }

    pub fn as_f64(&self) -> f64 {
        self.0 as f64 / 10.0
    }
}

impl fmt::Display for Percent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.0 / 10, self.0 % 10)
    }
}

impl Serialize for Percent {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(self.as_f64())
    }
}

/// Good / neutral / needs-improvement split of a vote count.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct VoteShares {
    pub good_percentage: Percent,
    pub neutral_percentage: Percent,
    pub needs_improvement_percentage: Percent,
}

/// Raw per-category counts as the GROUP BY query returns them.
#[derive(Debug, Clone, Default, PartialEq, Eq, sqlx::FromRow)]
pub struct CategoryCounts {
    pub card_type: String,
    pub total_votes: i64,
    pub good_count: i64,
    pub neutral_count: i64,
    pub needs_improvement_count: i64,
    pub improving_count: i64,
    pub stable_count: i64,
    pub declining_count: i64,
}

/// Tally for one category in one team (or department) and session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryAggregate {
    pub card_type: String,
    pub total_votes: i64,
    pub good_count: i64,
    pub neutral_count: i64,
    pub needs_improvement_count: i64,
    pub improving_count: i64,
    pub stable_count: i64,
    pub declining_count: i64,
    #[serde(flatten)]
    pub shares: VoteShares,
}

/// Session totals for a whole department, used for the comparison table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DepartmentSummary {
    pub department_id: i64,
    pub department_name: String,
    pub total_votes: i64,
    pub good_count: i64,
    pub neutral_count: i64,
    pub needs_improvement_count: i64,
    #[serde(flatten)]
    pub shares: VoteShares,
}

/// A stored vote of the current user, used to prefill the card form.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct VoteChoice {
    pub card_type: String,
    pub vote: String,
    pub progress: String,
    pub comments: Option<String>,
}

/// One validated card from a submitted form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardEntry {
    pub category: &'static CardCategory,
    pub vote: VoteValue,
    pub progress: Progress,
    pub comment: Option<String>,
}
