use std::collections::HashMap;

use serde::Serialize;

use crate::models::card::CardCategory;
use crate::models::vote::{CategoryAggregate, Percent};

// ---------- Types ----------

/// One line of a dashboard: a catalog category and its tally, if any.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryRow {
    pub code: &'static str,
    pub name: &'static str,
    pub aggregate: Option<CategoryAggregate>,
}

/// Percentage arrays in catalog order, for the stacked bar chart.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ChartSeries {
    pub labels: Vec<&'static str>,
    pub good: Vec<f64>,
    pub neutral: Vec<f64>,
    pub needs_improvement: Vec<f64>,
}

// ---------- Presenter ----------

/// Merge sparse aggregates into the full catalog. Every category appears,
/// in catalog order; categories without votes carry `None`.
pub fn present(
    catalog: &[CardCategory],
    aggregates: &HashMap<String, CategoryAggregate>,
) -> Vec<CategoryRow> {
    catalog
        .iter()
        .map(|category| CategoryRow {
            code: category.code,
            name: category.label,
            aggregate: aggregates.get(category.code).cloned(),
        })
        .collect()
}

impl ChartSeries {
    pub fn from_rows(rows: &[CategoryRow]) -> Self {
        let pick = |f: fn(&CategoryAggregate) -> Percent| -> Vec<f64> {
            rows.iter()
                .map(|r| r.aggregate.as_ref().map(f).unwrap_or(Percent::ZERO).as_f64())
                .collect()
        };
        ChartSeries {
            labels: rows.iter().map(|r| r.name).collect(),
            good: pick(|a| a.shares.good_percentage),
            neutral: pick(|a| a.shares.neutral_percentage),
            needs_improvement: pick(|a| a.shares.needs_improvement_percentage),
        }
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| "{}".to_string())
    }
}

/// Total votes across all rows.
pub fn total_votes(rows: &[CategoryRow]) -> i64 {
    rows.iter()
        .filter_map(|r| r.aggregate.as_ref())
        .map(|a| a.total_votes)
        .sum()
}
