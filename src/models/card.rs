//! The fixed card catalog and the two rating scales.
//!
//! `CARD_CATEGORIES` is the one ordered list of categories. The vote form
//! validator and the dashboard presenter both walk it, so a category can
//! never be validated but not displayed, or the other way round.

use serde::Serialize;

/// One card on the health check board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CardCategory {
    pub code: &'static str,
    pub label: &'static str,
}

pub const CARD_CATEGORIES: [CardCategory; 10] = [
    CardCategory { code: "code_quality", label: "Code Quality" },
    CardCategory { code: "requirements_clarity", label: "Requirements Clarity" },
    CardCategory { code: "testing_coverage", label: "Testing Coverage" },
    CardCategory { code: "deployment_process", label: "Deployment Process" },
    CardCategory { code: "tooling_infrastructure", label: "Tooling & Infrastructure" },
    CardCategory { code: "team_collaboration", label: "Team Collaboration" },
    CardCategory { code: "delivery_predictability", label: "Delivery Predictability" },
    CardCategory { code: "stakeholder_communication", label: "Stakeholder Communication" },
    CardCategory { code: "knowledge_sharing", label: "Knowledge Sharing" },
    CardCategory { code: "workload_balance", label: "Workload Balance" },
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum VoteValue {
    Good,
    Neutral,
    NeedsImprovement,
}

impl VoteValue {
    pub const ALL: [VoteValue; 3] = [VoteValue::Good, VoteValue::Neutral, VoteValue::NeedsImprovement];

    pub fn as_str(&self) -> &'static str {
        match self {
            VoteValue::Good => "good",
            VoteValue::Neutral => "neutral",
            VoteValue::NeedsImprovement => "needs_improvement",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            VoteValue::Good => "Good",
            VoteValue::Neutral => "Neutral",
            VoteValue::NeedsImprovement => "Needs Improvement",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "good" => Some(VoteValue::Good),
            "neutral" => Some(VoteValue::Neutral),
            "needs_improvement" => Some(VoteValue::NeedsImprovement),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Progress {
    Improving,
    Stable,
    Declining,
}

impl Progress {
    pub const ALL: [Progress; 3] = [Progress::Improving, Progress::Stable, Progress::Declining];

    pub fn as_str(&self) -> &'static str {
        match self {
            Progress::Improving => "improving",
            Progress::Stable => "stable",
            Progress::Declining => "declining",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Progress::Improving => "Improving",
            Progress::Stable => "Stable",
            Progress::Declining => "Declining",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "improving" => Some(Progress::Improving),
            "stable" => Some(Progress::Stable),
            "declining" => Some(Progress::Declining),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_codes_are_unique() {
        let mut codes: Vec<&str> = CARD_CATEGORIES.iter().map(|c| c.code).collect();
        codes.sort_unstable();
        codes.dedup();
        assert_eq!(codes.len(), CARD_CATEGORIES.len());
    }

    #[test]
    fn catalog_order_is_stable() {
        assert_eq!(CARD_CATEGORIES[0].code, "code_quality");
        assert_eq!(CARD_CATEGORIES[2].code, "testing_coverage");
        assert_eq!(CARD_CATEGORIES[9].code, "workload_balance");
    }

    #[test]
    fn rating_values_parse_their_own_codes() {
        for v in VoteValue::ALL {
            assert_eq!(VoteValue::parse(v.as_str()), Some(v));
        }
        for p in Progress::ALL {
            assert_eq!(Progress::parse(p.as_str()), Some(p));
        }
        assert_eq!(VoteValue::parse("bad"), None);
        assert_eq!(Progress::parse(""), None);
    }
}
