use axum::{
    extract::{Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use tracing::{error, instrument};

use super::dto::{DashboardQuery, DashboardResponse};
use super::services::load_dashboard;
use crate::{auth::AuthUser, state::AppState};

pub fn routes() -> Router<AppState> {
    Router::new().route("/dashboard", get(get_dashboard))
}

/// GET /dashboard?range=last_30_days&nutrients=Calories,Sodium
#[instrument(skip(state))]
pub async fn get_dashboard(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Query(q): Query<DashboardQuery>,
) -> Result<Json<DashboardResponse>, (StatusCode, String)> {
    let trend = q.trend_nutrients();
    load_dashboard(&state, user_id, q.range, &trend)
        .await
        .map(Json)
        .map_err(|e| {
            error!(error = %e, %user_id, "dashboard failed");
            (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
        })
}
