pub mod dto;
pub mod handlers;
pub mod repo;
pub mod repo_types;
pub mod sampler;
pub mod services;

use crate::state::AppState;
use axum::Router;

pub fn router() -> Router<AppState> {
    Router::new()
        .merge(handlers::set_routes())
        .merge(handlers::history_routes())
        .merge(handlers::question_routes())
}
