use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::nutrition::aggregate::{MacroDistribution, NutrientTotal, VitaminTotal};
use crate::time_range::TimeRange;

#[derive(Debug, Deserialize)]
pub struct DashboardQuery {
    #[serde(default)]
    pub range: TimeRange,
    /// Comma-separated nutrient names for the trend chart.
    pub nutrients: Option<String>,
}

impl DashboardQuery {
    pub fn trend_nutrients(&self) -> Vec<String> {
        let parsed: Vec<String> = self
            .nutrients
            .as_deref()
            .unwrap_or_default()
            .split(',')
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .map(str::to_string)
            .collect();
        if parsed.is_empty() {
            DEFAULT_TREND.iter().map(|n| n.to_string()).collect()
        } else {
            parsed
        }
    }
}

pub const DEFAULT_TREND: [&str; 2] = ["Calories", "Protein"];

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendPoint {
    pub date: String,
    pub nutrient_name: String,
    pub amount: f64,
}

#[derive(Debug, Serialize)]
pub struct DashboardResponse {
    pub range: TimeRange,
    #[serde(with = "time::serde::rfc3339")]
    pub since: OffsetDateTime,
    pub has_data: bool,
    pub meal_count: usize,
    pub macros: Option<MacroDistribution>,
    pub vitamins: Vec<VitaminTotal>,
    pub key_totals: Vec<NutrientTotal>,
    pub trend: Vec<TrendPoint>,
    pub available_nutrients: Vec<String>,
}
