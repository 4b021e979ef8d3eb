use axum::extract::FromRef;
use lazy_static::lazy_static;
use rand::{distributions::Alphanumeric, Rng};
use regex::Regex;
use time::{Duration, OffsetDateTime};
use tracing::{error, info, warn};
use uuid::Uuid;

use super::{
    dto::{AuthResponse, LoginRequest, RegisterRequest},
    jwt::JwtKeys,
    password::{hash_password, validate_password, verify_password},
    repo_types::User,
};
use crate::{
    error::{AppError, AppResult},
    state::AppState,
    types::Role,
};

const RESET_TOKEN_LEN: usize = 48;

pub(crate) fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

/// Trims, lower-cases and validates an email address.
pub(crate) fn normalize_email(raw: &str) -> AppResult<String> {
    let email = raw.trim().to_lowercase();
    if !is_valid_email(&email) {
        warn!(email = %email, "invalid email");
        return Err(AppError::bad_request("Invalid email"));
    }
    Ok(email)
}

fn generate_reset_token() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(RESET_TOKEN_LEN)
        .map(char::from)
        .collect()
}

fn issue_tokens(st: &AppState, user: User) -> AppResult<AuthResponse> {
    let keys = JwtKeys::from_ref(st);
    let pair = keys.sign_pair(user.id, user.role).map_err(|e| {
        error!(error = %e, "jwt sign failed");
        AppError::Internal(e)
    })?;
    Ok(AuthResponse {
        access_token: pair.access_token,
        refresh_token: pair.refresh_token,
        user,
    })
}

/// Creates an account with role `user` and returns a fresh token pair.
pub async fn register(st: &AppState, req: RegisterRequest) -> AppResult<AuthResponse> {
    let email = normalize_email(&req.email)?;
    let name = crate::types::non_empty(&req.name, "name")?;
    validate_password(&req.password)?;

    if st.store.users.find_by_email(&email).await?.is_some() {
        warn!(email = %email, "email already registered");
        return Err(AppError::conflict("Email already registered"));
    }

    let hash = hash_password(&req.password)?;
    // The unique index still catches a concurrent registration.
    let user = st
        .store
        .users
        .insert(&User::new(email, name, hash, Role::User))
        .await
        .map_err(|e| match e {
            AppError::Conflict(_) => AppError::conflict("Email already registered"),
            other => other,
        })?;

    info!(user_id = %user.id, email = %user.email, "user registered");
    issue_tokens(st, user)
}

pub async fn login(st: &AppState, req: LoginRequest) -> AppResult<AuthResponse> {
    let email = normalize_email(&req.email)?;

    let Some(mut user) = st.store.users.find_by_email(&email).await? else {
        warn!(email = %email, "login unknown email");
        return Err(AppError::unauthorized("Invalid credentials"));
    };

    if !verify_password(&req.password, &user.password_hash)? {
        warn!(email = %email, user_id = %user.id, "login invalid password");
        return Err(AppError::unauthorized("Invalid credentials"));
    }

    let now = OffsetDateTime::now_utc();
    st.store.users.record_login(user.id, now).await?;
    user.last_login_at = Some(now);

    info!(user_id = %user.id, email = %user.email, "user logged in");
    issue_tokens(st, user)
}

/// Exchanges a refresh token for a new pair carrying the user's current role.
pub async fn refresh(st: &AppState, refresh_token: &str) -> AppResult<AuthResponse> {
    let keys = JwtKeys::from_ref(st);
    let claims = keys
        .verify_refresh(refresh_token)
        .map_err(|e| AppError::unauthorized(e.to_string()))?;

    let user = st
        .store
        .users
        .find_by_id(claims.sub)
        .await?
        .ok_or_else(|| AppError::unauthorized("User not found"))?;
    issue_tokens(st, user)
}

pub async fn profile(st: &AppState, user_id: Uuid) -> AppResult<User> {
    st.store
        .users
        .find_by_id(user_id)
        .await?
        .ok_or_else(|| AppError::unauthorized("User not found"))
}

/// Issues a reset token for a known email. Unknown emails succeed silently.
pub async fn forgot_password(st: &AppState, raw_email: &str) -> AppResult<()> {
    let email = normalize_email(raw_email)?;
    let Some(user) = st.store.users.find_by_email(&email).await? else {
        info!("password reset requested for unknown email");
        return Ok(());
    };

    let token = generate_reset_token();
    let expires =
        OffsetDateTime::now_utc() + Duration::minutes(st.config.reset_token_ttl_minutes);
    st.store
        .users
        .set_reset_token(user.id, &token, expires)
        .await?;

    let link = format!(
        "{}/reset-password?token={}",
        st.config.frontend_url.trim_end_matches('/'),
        token
    );
    st.notifier.send_reset_link(&user, &link).await?;
    info!(user_id = %user.id, "password reset token issued");
    Ok(())
}

pub async fn reset_password(st: &AppState, token: &str, new_password: &str) -> AppResult<()> {
    validate_password(new_password)?;
    let token = token.trim();
    if token.is_empty() {
        return Err(AppError::unauthorized("Invalid or expired reset token"));
    }

    let user = st
        .store
        .users
        .find_by_reset_token(token)
        .await?
        .ok_or_else(|| AppError::unauthorized("Invalid or expired reset token"))?;

    let expired = user
        .reset_token_expires
        .map_or(true, |at| at <= OffsetDateTime::now_utc());
    if expired {
        warn!(user_id = %user.id, "expired reset token used");
        return Err(AppError::unauthorized("Invalid or expired reset token"));
    }

    let hash = hash_password(new_password)?;
    st.store.users.set_password(user.id, &hash).await?;
    info!(user_id = %user.id, "password reset");
    Ok(())
}

pub async fn change_password(
    st: &AppState,
    user_id: Uuid,
    current: &str,
    new_password: &str,
) -> AppResult<()> {
    validate_password(new_password)?;
    let user = profile(st, user_id).await?;
    if !verify_password(current, &user.password_hash)? {
        warn!(user_id = %user.id, "change password with wrong current password");
        return Err(AppError::unauthorized("Current password is incorrect"));
    }
    let hash = hash_password(new_password)?;
    st.store.users.set_password(user.id, &hash).await?;
    info!(user_id = %user.id, "password changed");
    Ok(())
}

/// Creates the configured admin account unless the email already exists.
pub async fn ensure_admin(st: &AppState) -> anyhow::Result<()> {
    let Some(seed) = st.config.admin_seed.clone() else {
        return Ok(());
    };
    let email = seed.email.trim().to_lowercase();
    if st.store.users.find_by_email(&email).await?.is_some() {
        tracing::debug!("admin account already exists");
        return Ok(());
    }
    let hash = hash_password(&seed.password)?;
    let admin = st
        .store
        .users
        .insert(&User::new(email, seed.name, hash, Role::Admin))
        .await?;
    info!(user_id = %admin.id, "seeded admin account");
    Ok(())
}
