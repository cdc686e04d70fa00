mod dto;
pub mod handlers;
mod repo;
pub mod repo_types;
mod services;

pub(crate) use repo::nutrient_history;
pub(crate) use dto::format_date;

use crate::state::AppState;
use axum::Router;

pub fn router() -> Router<AppState> {
    Router::new()
        .merge(handlers::read_routes())
        .merge(handlers::write_routes())
}
