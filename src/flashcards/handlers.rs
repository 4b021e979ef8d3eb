use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post, put},
    Json, Router,
};
use tracing::instrument;
use uuid::Uuid;

use super::{
    dto::{
        CategoryRequest, CreateFlashcardRequest, ListFlashcardsQuery, ReviewRequest,
        UpdateFlashcardRequest,
    },
    repo_types::{Category, Flashcard},
    services,
};
use crate::{
    auth::{AdminUser, AuthUser},
    error::AppResult,
    extract::{ApiJson, ApiPath, ApiQuery},
    state::AppState,
};

pub fn flashcard_routes() -> Router<AppState> {
    Router::new()
        .route("/flashcards", get(list_flashcards).post(create_flashcard))
        .route(
            "/flashcards/:id",
            get(get_flashcard).put(update_flashcard).delete(delete_flashcard),
        )
        .route("/flashcards/:id/review", post(review_flashcard))
}

pub fn category_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/flashcards/categories",
            get(list_categories).post(create_category),
        )
        .route(
            "/flashcards/categories/:id",
            put(rename_category).delete(delete_category),
        )
}

#[instrument(skip(state))]
pub async fn list_flashcards(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiQuery(q): ApiQuery<ListFlashcardsQuery>,
) -> AppResult<Json<Vec<Flashcard>>> {
    Ok(Json(services::list(&state, &auth, q).await?))
}

#[instrument(skip(state, payload))]
pub async fn create_flashcard(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiJson(payload): ApiJson<CreateFlashcardRequest>,
) -> AppResult<(StatusCode, Json<Flashcard>)> {
    let card = services::create(&state, &auth, payload).await?;
    Ok((StatusCode::CREATED, Json(card)))
}

#[instrument(skip(state))]
pub async fn get_flashcard(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiPath(id): ApiPath<Uuid>,
) -> AppResult<Json<Flashcard>> {
    Ok(Json(services::get(&state, &auth, id).await?))
}

#[instrument(skip(state, payload))]
pub async fn update_flashcard(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(payload): ApiJson<UpdateFlashcardRequest>,
) -> AppResult<Json<Flashcard>> {
    Ok(Json(services::update(&state, &auth, id, payload).await?))
}

#[instrument(skip(state))]
pub async fn delete_flashcard(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiPath(id): ApiPath<Uuid>,
) -> AppResult<StatusCode> {
    services::delete(&state, &auth, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[instrument(skip(state, payload))]
pub async fn review_flashcard(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(payload): ApiJson<ReviewRequest>,
) -> AppResult<Json<Flashcard>> {
    Ok(Json(
        services::review(&state, &auth, id, payload.is_correct).await?,
    ))
}

#[instrument(skip(state))]
pub async fn list_categories(
    State(state): State<AppState>,
    _auth: AuthUser,
) -> AppResult<Json<Vec<Category>>> {
    Ok(Json(services::list_categories(&state).await?))
}

#[instrument(skip(state, payload))]
pub async fn create_category(
    State(state): State<AppState>,
    _admin: AdminUser,
    ApiJson(payload): ApiJson<CategoryRequest>,
) -> AppResult<(StatusCode, Json<Category>)> {
    let category = services::create_category(&state, &payload.name).await?;
    Ok((StatusCode::CREATED, Json(category)))
}

#[instrument(skip(state, payload))]
pub async fn rename_category(
    State(state): State<AppState>,
    _admin: AdminUser,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(payload): ApiJson<CategoryRequest>,
) -> AppResult<Json<Category>> {
    Ok(Json(
        services::rename_category(&state, id, &payload.name).await?,
    ))
}

#[instrument(skip(state))]
pub async fn delete_category(
    State(state): State<AppState>,
    _admin: AdminUser,
    ApiPath(id): ApiPath<Uuid>,
) -> AppResult<StatusCode> {
    services::delete_category(&state, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
