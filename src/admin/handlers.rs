use axum::{extract::State, routing::get, Json, Router};
use tracing::instrument;

use super::{dto::DashboardStats, services};
use crate::{auth::AdminUser, error::AppResult, state::AppState};

pub fn admin_routes() -> Router<AppState> {
    Router::new().route("/admin/dashboard/stats", get(dashboard_stats))
}

#[instrument(skip(state))]
pub async fn dashboard_stats(
    State(state): State<AppState>,
    _admin: AdminUser,
) -> AppResult<Json<DashboardStats>> {
    Ok(Json(services::dashboard_stats(&state).await?))
}
