use axum::{
    extract::State,
    http::StatusCode,
    routing::get,
    Json, Router,
};
use tracing::instrument;
use uuid::Uuid;

use super::{
    dto::{
        CreateQuestionRequest, CreateSetRequest, HistoryQuery, ListQuestionsQuery, ListSetsQuery,
        PracticeSetWithQuestions, RandomQuery, RecordResultRequest, UpdateQuestionRequest,
        UpdateSetRequest,
    },
    repo_types::{PracticeHistory, PracticeQuestion, PracticeSet},
    services,
};
use crate::{
    auth::{AdminUser, AuthUser},
    error::AppResult,
    extract::{ApiJson, ApiPath, ApiQuery},
    state::AppState,
};

pub fn question_routes() -> Router<AppState> {
    Router::new()
        .route("/practice", get(list_questions).post(create_question))
        .route("/practice/random", get(random_questions))
        .route(
            "/practice/:id",
            get(get_question)
                .patch(update_question)
                .delete(delete_question),
        )
}

pub fn set_routes() -> Router<AppState> {
    Router::new()
        .route("/practice/sets", get(list_sets).post(create_set))
        .route(
            "/practice/sets/:id",
            get(get_set).patch(update_set).delete(delete_set),
        )
        .route("/practice/sets/:id/with-questions", get(get_set_with_questions))
}

pub fn history_routes() -> Router<AppState> {
    Router::new().route("/practice/history", get(list_history).post(record_result))
}

#[instrument(skip(state))]
pub async fn list_questions(
    State(state): State<AppState>,
    _auth: AuthUser,
    ApiQuery(q): ApiQuery<ListQuestionsQuery>,
) -> AppResult<Json<Vec<PracticeQuestion>>> {
    Ok(Json(services::list_questions(&state, q).await?))
}

#[instrument(skip(state))]
pub async fn random_questions(
    State(state): State<AppState>,
    _auth: AuthUser,
    ApiQuery(q): ApiQuery<RandomQuery>,
) -> AppResult<Json<Vec<PracticeQuestion>>> {
    Ok(Json(
        services::random_questions(&state, q.count, q.category).await?,
    ))
}

#[instrument(skip(state))]
pub async fn get_question(
    State(state): State<AppState>,
    _auth: AuthUser,
    ApiPath(id): ApiPath<Uuid>,
) -> AppResult<Json<PracticeQuestion>> {
    Ok(Json(services::get_question(&state, id).await?))
}

#[instrument(skip(state, payload))]
pub async fn create_question(
    State(state): State<AppState>,
    _admin: AdminUser,
    ApiJson(payload): ApiJson<CreateQuestionRequest>,
) -> AppResult<(StatusCode, Json<PracticeQuestion>)> {
    let question = services::create_question(&state, payload).await?;
    Ok((StatusCode::CREATED, Json(question)))
}

#[instrument(skip(state, payload))]
pub async fn update_question(
    State(state): State<AppState>,
    _admin: AdminUser,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(payload): ApiJson<UpdateQuestionRequest>,
) -> AppResult<Json<PracticeQuestion>> {
    Ok(Json(services::update_question(&state, id, payload).await?))
}

#[instrument(skip(state))]
pub async fn delete_question(
    State(state): State<AppState>,
    _admin: AdminUser,
    ApiPath(id): ApiPath<Uuid>,
) -> AppResult<StatusCode> {
    services::delete_question(&state, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[instrument(skip(state))]
pub async fn list_sets(
    State(state): State<AppState>,
    _auth: AuthUser,
    ApiQuery(q): ApiQuery<ListSetsQuery>,
) -> AppResult<Json<Vec<PracticeSet>>> {
    Ok(Json(services::list_sets(&state, q).await?))
}

#[instrument(skip(state))]
pub async fn get_set(
    State(state): State<AppState>,
    _auth: AuthUser,
    ApiPath(id): ApiPath<Uuid>,
) -> AppResult<Json<PracticeSet>> {
    Ok(Json(services::get_set(&state, id).await?))
}

#[instrument(skip(state))]
pub async fn get_set_with_questions(
    State(state): State<AppState>,
    _auth: AuthUser,
    ApiPath(id): ApiPath<Uuid>,
) -> AppResult<Json<PracticeSetWithQuestions>> {
    Ok(Json(services::get_set_with_questions(&state, id).await?))
}

#[instrument(skip(state, payload))]
pub async fn create_set(
    State(state): State<AppState>,
    _admin: AdminUser,
    ApiJson(payload): ApiJson<CreateSetRequest>,
) -> AppResult<(StatusCode, Json<PracticeSet>)> {
    let set = services::create_set(&state, payload).await?;
    Ok((StatusCode::CREATED, Json(set)))
}

#[instrument(skip(state, payload))]
pub async fn update_set(
    State(state): State<AppState>,
    _admin: AdminUser,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(payload): ApiJson<UpdateSetRequest>,
) -> AppResult<Json<PracticeSet>> {
    Ok(Json(services::update_set(&state, id, payload).await?))
}

#[instrument(skip(state))]
pub async fn delete_set(
    State(state): State<AppState>,
    _admin: AdminUser,
    ApiPath(id): ApiPath<Uuid>,
) -> AppResult<StatusCode> {
    services::delete_set(&state, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[instrument(skip(state, payload))]
pub async fn record_result(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiJson(payload): ApiJson<RecordResultRequest>,
) -> AppResult<(StatusCode, Json<PracticeHistory>)> {
    let entry = services::record_result(&state, auth.id, payload).await?;
    Ok((StatusCode::CREATED, Json(entry)))
}

#[instrument(skip(state))]
pub async fn list_history(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiQuery(q): ApiQuery<HistoryQuery>,
) -> AppResult<Json<Vec<PracticeHistory>>> {
    Ok(Json(services::history(&state, auth.id, q.limit).await?))
}
