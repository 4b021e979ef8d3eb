use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, patch},
    Json, Router,
};
use tracing::instrument;
use uuid::Uuid;

use super::{
    dto::{SetAdminRequest, UpdatePreferencesRequest, UpdateUserRequest},
    repo_types::UserPreferences,
    services,
};
use crate::{
    auth::{repo_types::User, AdminUser, AuthUser},
    error::AppResult,
    extract::{ApiJson, ApiPath, ApiQuery},
    state::AppState,
    types::Pagination,
};

pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/users", get(list_users))
        .route(
            "/users/:id",
            get(get_user).patch(update_user).delete(delete_user),
        )
        .route(
            "/users/:id/preferences",
            get(get_preferences).patch(update_preferences),
        )
        .route("/users/:id/set-admin", patch(set_admin))
}

#[instrument(skip(state))]
pub async fn list_users(
    State(state): State<AppState>,
    _admin: AdminUser,
    ApiQuery(page): ApiQuery<Pagination>,
) -> AppResult<Json<Vec<User>>> {
    Ok(Json(services::list(&state, page).await?))
}

#[instrument(skip(state))]
pub async fn get_user(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiPath(id): ApiPath<Uuid>,
) -> AppResult<Json<User>> {
    Ok(Json(services::get(&state, &auth, id).await?))
}

#[instrument(skip(state, payload))]
pub async fn update_user(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(payload): ApiJson<UpdateUserRequest>,
) -> AppResult<Json<User>> {
    Ok(Json(services::update(&state, &auth, id, payload).await?))
}

#[instrument(skip(state))]
pub async fn delete_user(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiPath(id): ApiPath<Uuid>,
) -> AppResult<StatusCode> {
    services::delete(&state, &auth, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[instrument(skip(state))]
pub async fn get_preferences(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiPath(id): ApiPath<Uuid>,
) -> AppResult<Json<UserPreferences>> {
    Ok(Json(services::preferences(&state, &auth, id).await?))
}

#[instrument(skip(state, payload))]
pub async fn update_preferences(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(payload): ApiJson<UpdatePreferencesRequest>,
) -> AppResult<Json<UserPreferences>> {
    Ok(Json(
        services::update_preferences(&state, &auth, id, payload).await?,
    ))
}

#[instrument(skip(state, payload))]
pub async fn set_admin(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(payload): ApiJson<SetAdminRequest>,
) -> AppResult<Json<User>> {
    Ok(Json(
        services::set_admin(&state, &admin, id, payload.is_admin).await?,
    ))
}
