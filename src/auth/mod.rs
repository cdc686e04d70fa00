use crate::state::AppState;
use axum::Router;

mod claims;
mod dto;
pub mod handlers;
mod repo;
pub mod repo_types;
pub mod services;

pub use services::AuthUser;

pub fn router() -> Router<AppState> {
    Router::new()
        .merge(handlers::auth_routes())
        .merge(handlers::me_routes())
}
