use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use tracing::instrument;

use super::{
    dto::{
        AuthResponse, ChangePasswordRequest, ForgotPasswordRequest, LoginRequest,
        MessageResponse, RefreshRequest, RegisterRequest, ResetPasswordRequest,
    },
    extractors::AuthUser,
    repo_types::User,
    services,
};
use crate::{error::AppResult, extract::ApiJson, state::AppState};

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
        .route("/auth/refresh", post(refresh))
        .route("/auth/profile", get(profile))
        .route("/auth/forgot-password", post(forgot_password))
        .route("/auth/reset-password", post(reset_password))
        .route("/auth/change-password", post(change_password))
}

#[instrument(skip(state, payload))]
pub async fn register(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<RegisterRequest>,
) -> AppResult<(StatusCode, Json<AuthResponse>)> {
    let res = services::register(&state, payload).await?;
    Ok((StatusCode::CREATED, Json(res)))
}

#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<LoginRequest>,
) -> AppResult<Json<AuthResponse>> {
    Ok(Json(services::login(&state, payload).await?))
}

#[instrument(skip(state, payload))]
pub async fn refresh(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<RefreshRequest>,
) -> AppResult<Json<AuthResponse>> {
    Ok(Json(services::refresh(&state, &payload.refresh_token).await?))
}

#[instrument(skip(state))]
pub async fn profile(State(state): State<AppState>, auth: AuthUser) -> AppResult<Json<User>> {
    Ok(Json(services::profile(&state, auth.id).await?))
}

#[instrument(skip(state, payload))]
pub async fn forgot_password(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<ForgotPasswordRequest>,
) -> AppResult<Json<MessageResponse>> {
    services::forgot_password(&state, &payload.email).await?;
    Ok(Json(MessageResponse::new(
        "If the email is registered, a reset link has been sent",
    )))
}

#[instrument(skip(state, payload))]
pub async fn reset_password(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<ResetPasswordRequest>,
) -> AppResult<Json<MessageResponse>> {
    services::reset_password(&state, &payload.token, &payload.password).await?;
    Ok(Json(MessageResponse::new("Password has been reset")))
}

#[instrument(skip(state, payload))]
pub async fn change_password(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiJson(payload): ApiJson<ChangePasswordRequest>,
) -> AppResult<Json<MessageResponse>> {
    services::change_password(
        &state,
        auth.id,
        &payload.current_password,
        &payload.new_password,
    )
    .await?;
    Ok(Json(MessageResponse::new("Password changed")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::OffsetDateTime;

    #[test]
    fn user_serialization_hides_secrets() {
        let mut user = User::new(
            "test@example.com".into(),
            "Test".into(),
            "$argon2id$fake".into(),
            crate::types::Role::User,
        );
        user.reset_token = Some("reset-secret".into());
        user.reset_token_expires = Some(OffsetDateTime::now_utc());

        let json = serde_json::to_string(&user).unwrap();
        assert!(json.contains("test@example.com"));
        assert!(json.contains("\"role\":\"user\""));
        assert!(json.contains("lastLoginAt"));
        assert!(!json.contains("argon2"));
        assert!(!json.contains("reset-secret"));
    }
}
