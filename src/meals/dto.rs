use serde::{Deserialize, Serialize};
use time::{format_description::FormatItem, macros::format_description, OffsetDateTime, UtcOffset};
use uuid::Uuid;

use crate::nutrition::{normalize_readings, sanitize_title, MealAnalysis, NutrientReading};
use crate::time_range::TimeRange;

use super::repo_types::Meal;

const DATE_FMT: &[FormatItem<'static>] = format_description!("[year]-[month]-[day]");
const TIME_FMT: &[FormatItem<'static>] = format_description!("[hour]:[minute]");

/// What the analyzer shows after one model call.
#[derive(Debug, Serialize)]
pub struct AnalysisResponse {
    pub title: String,
    pub display_title: String,
    pub advisory_text: String,
    pub full_text: String,
    pub has_nutrients: bool,
    pub nutrients: Vec<NutrientReading>,
    pub nutrient_table: Vec<NutrientReading>,
}

impl From<MealAnalysis> for AnalysisResponse {
    fn from(a: MealAnalysis) -> Self {
        Self {
            display_title: sanitize_title(&a.title),
            advisory_text: a.advisory_text(),
            has_nutrients: a.has_nutrients(),
            nutrient_table: normalize_readings(&a.nutrients),
            title: a.title,
            full_text: a.full_text,
            nutrients: a.nutrients,
        }
    }
}

/// The client sends back the model text it was shown; the server re-parses it.
#[derive(Debug, Deserialize)]
pub struct SaveMealRequest {
    pub full_text: String,
}

#[derive(Debug, Serialize)]
pub struct SavedMealResponse {
    pub id: Uuid,
    pub title: String,
    pub nutrient_count: usize,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

#[derive(Debug, Deserialize)]
pub struct HistoryQuery {
    #[serde(default)]
    pub range: TimeRange,
}

#[derive(Debug, Serialize)]
pub struct MealListItem {
    pub id: Uuid,
    pub title: String,
    pub date: String,
    pub time: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

impl MealListItem {
    pub fn from_meal(m: Meal, offset: UtcOffset) -> Self {
        let local = m.created_at.to_offset(offset);
        Self {
            id: m.id,
            title: sanitize_title(&m.title),
            date: local.format(DATE_FMT).unwrap_or_default(),
            time: local.format(TIME_FMT).unwrap_or_default(),
            created_at: m.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct MealDetails {
    pub id: Uuid,
    pub title: String,
    pub raw_title: String,
    pub analysis_text: Option<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    pub nutrients: Vec<NutrientReading>,
}

pub fn format_date(date: time::Date) -> String {
    date.format(DATE_FMT).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::{datetime, offset};

    #[test]
    fn list_item_uses_clean_title_and_local_clock() {
        let meal = Meal {
            id: Uuid::new_v4(),
            title: "1. Meal Title: **Shakshuka**".into(),
            analysis_text: None,
            created_at: datetime!(2024-06-01 23:45 UTC),
        };
        let item = MealListItem::from_meal(meal, offset!(+2));
        assert_eq!(item.title, "Shakshuka");
        assert_eq!(item.date, "2024-06-02");
        assert_eq!(item.time, "01:45");
    }

    #[test]
    fn analysis_response_carries_both_tables() {
        let a = crate::nutrition::parse_response(
            "Meal Title: Toast\n\nCrunchy.\n\n```json\n[{\"nutrient\":\"Calories\",\"amount\":120,\"unit\":\"kcal\"}]\n```",
        );
        let resp = AnalysisResponse::from(a);
        assert_eq!(resp.display_title, "Toast");
        assert_eq!(resp.advisory_text, "Crunchy.");
        assert!(resp.has_nutrients);
        assert_eq!(resp.nutrients.len(), 1);
        assert_eq!(resp.nutrient_table.len(), crate::nutrition::catalog::CATALOG.len());
    }

    #[test]
    fn history_query_defaults_to_week() {
        let q: HistoryQuery = serde_json::from_str("{}").unwrap();
        assert_eq!(q.range, TimeRange::Last7Days);
    }
}
