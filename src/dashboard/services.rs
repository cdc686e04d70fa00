use std::collections::HashSet;

use time::{OffsetDateTime, UtcOffset};
use tracing::{debug, instrument};
use uuid::Uuid;

use super::dto::{DashboardResponse, TrendPoint};
use crate::meals::{format_date, nutrient_history, repo_types::NutrientHistoryRow};
use crate::nutrition::aggregate::{
    available_nutrients, daily_totals, keyed_totals, macro_distribution, vitamin_distribution,
};
use crate::nutrition::catalog::KEY_NUTRIENTS;
use crate::state::AppState;
use crate::time_range::TimeRange;

/// Fold one user's history rows into every dashboard section.
pub fn build_dashboard(
    range: TimeRange,
    since: OffsetDateTime,
    history: Vec<NutrientHistoryRow>,
    trend_nutrients: &[String],
    offset: UtcOffset,
) -> DashboardResponse {
    let meal_count = history
        .iter()
        .map(|r| r.meal_id)
        .collect::<HashSet<_>>()
        .len();
    let rows: Vec<_> = history.into_iter().map(|r| r.into_local(offset)).collect();

    if rows.is_empty() {
        return DashboardResponse {
            range,
            since,
            has_data: false,
            meal_count,
            macros: None,
            vitamins: Vec::new(),
            key_totals: Vec::new(),
            trend: Vec::new(),
            available_nutrients: Vec::new(),
        };
    }

    let trend = daily_totals(&rows, trend_nutrients)
        .into_iter()
        .map(|d| TrendPoint {
            date: format_date(d.date),
            nutrient_name: d.nutrient_name,
            amount: d.amount,
        })
        .collect();

    DashboardResponse {
        range,
        since,
        has_data: true,
        meal_count,
        macros: macro_distribution(&rows),
        vitamins: vitamin_distribution(&rows),
        key_totals: keyed_totals(&rows, &KEY_NUTRIENTS),
        trend,
        available_nutrients: available_nutrients(&rows),
    }
}

#[instrument(skip(st, trend_nutrients))]
pub async fn load_dashboard(
    st: &AppState,
    user_id: Uuid,
    range: TimeRange,
    trend_nutrients: &[String],
) -> anyhow::Result<DashboardResponse> {
    let offset = st.config.reporting_offset;
    let since = range.start(OffsetDateTime::now_utc(), offset);
    let history = nutrient_history(&st.db, user_id, since).await?;
    debug!(rows = history.len(), "dashboard history loaded");
    Ok(build_dashboard(range, since, history, trend_nutrients, offset))
}
