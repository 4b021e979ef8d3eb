use std::ops::RangeInclusive;

use time::OffsetDateTime;
use tracing::info;
use uuid::Uuid;

use super::{
    dto::{UpdatePreferencesRequest, UpdateUserRequest},
    repo_types::UserPreferences,
};
use crate::{
    auth::{repo::UserChanges, repo_types::User, services::normalize_email, AuthUser},
    error::{AppError, AppResult},
    state::AppState,
    types::{non_empty, Pagination, Role},
};

pub const DAILY_GOAL_RANGE: RangeInclusive<i32> = 1..=500;

fn user_not_found() -> AppError {
    AppError::not_found("User not found")
}

pub async fn list(st: &AppState, page: Pagination) -> AppResult<Vec<User>> {
    st.store.users.list(page.clamped()).await
}

async fn find(st: &AppState, id: Uuid) -> AppResult<User> {
    st.store.users.find_by_id(id).await?.ok_or_else(user_not_found)
}

pub async fn get(st: &AppState, auth: &AuthUser, id: Uuid) -> AppResult<User> {
    auth.ensure_can_access(id)?;
    find(st, id).await
}

pub async fn update(
    st: &AppState,
    auth: &AuthUser,
    id: Uuid,
    req: UpdateUserRequest,
) -> AppResult<User> {
    auth.ensure_can_access(id)?;
    let changes = UserChanges {
        name: req.name.as_deref().map(|n| non_empty(n, "name")).transpose()?,
        email: req.email.as_deref().map(normalize_email).transpose()?,
    };
    let user = st
        .store
        .users
        .update_profile(id, &changes)
        .await
        .map_err(|e| match e {
            AppError::Conflict(_) => AppError::conflict("Email already registered"),
            other => other,
        })?
        .ok_or_else(user_not_found)?;
    info!(user_id = %id, by = %auth.id, "user profile updated");
    Ok(user)
}

/// Deletes the account along with its cards and preferences. Practice history
/// is kept with the user reference cleared.
pub async fn delete(st: &AppState, auth: &AuthUser, id: Uuid) -> AppResult<()> {
    auth.ensure_can_access(id)?;
    if !st.store.users.delete(id).await? {
        return Err(user_not_found());
    }
    info!(user_id = %id, by = %auth.id, "user deleted");
    Ok(())
}

/// Stored preferences, or freshly saved defaults on first access.
pub async fn preferences(st: &AppState, auth: &AuthUser, id: Uuid) -> AppResult<UserPreferences> {
    auth.ensure_can_access(id)?;
    if let Some(prefs) = st.store.preferences.get(id).await? {
        return Ok(prefs);
    }
    find(st, id).await?;
    st.store
        .preferences
        .upsert(&UserPreferences::defaults_for(id))
        .await
}

pub async fn update_preferences(
    st: &AppState,
    auth: &AuthUser,
    id: Uuid,
    req: UpdatePreferencesRequest,
) -> AppResult<UserPreferences> {
    let mut prefs = preferences(st, auth, id).await?;
    if let Some(level) = req.level {
        prefs.level = non_empty(&level, "level")?;
    }
    if let Some(language) = req.target_language {
        prefs.target_language = non_empty(&language, "targetLanguage")?;
    }
    if let Some(goal) = req.daily_goal {
        if !DAILY_GOAL_RANGE.contains(&goal) {
            return Err(AppError::bad_request(format!(
                "dailyGoal must be between {} and {}",
                DAILY_GOAL_RANGE.start(),
                DAILY_GOAL_RANGE.end()
            )));
        }
        prefs.daily_goal = goal;
    }
    if let Some(theme) = req.theme {
        prefs.theme = non_empty(&theme, "theme")?;
    }
    if let Some(notifications) = req.notifications {
        prefs.notifications = notifications;
    }
    if let Some(sound_effects) = req.sound_effects {
        prefs.sound_effects = sound_effects;
    }
    prefs.updated_at = OffsetDateTime::now_utc();
    st.store.preferences.upsert(&prefs).await
}

/// Grants or revokes the admin role. Existing tokens keep their old role
/// until they expire.
pub async fn set_admin(
    st: &AppState,
    admin: &AuthUser,
    id: Uuid,
    is_admin: bool,
) -> AppResult<User> {
    let role = if is_admin { Role::Admin } else { Role::User };
    let user = st
        .store
        .users
        .set_role(id, role)
        .await?
        .ok_or_else(user_not_found)?;
    info!(user_id = %id, by = %admin.id, ?role, "user role changed");
    Ok(user)
}
