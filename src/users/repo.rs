use async_trait::async_trait;
use uuid::Uuid;

use super::repo_types::UserPreferences;
use crate::{db::PgStore, error::AppResult};

#[async_trait]
pub trait PreferencesRepo: Send + Sync {
    async fn get(&self, user_id: Uuid) -> AppResult<Option<UserPreferences>>;
    async fn upsert(&self, prefs: &UserPreferences) -> AppResult<UserPreferences>;
}

#[async_trait]
impl PreferencesRepo for PgStore {
    async fn get(&self, user_id: Uuid) -> AppResult<Option<UserPreferences>> {
        let row = sqlx::query_as::<_, UserPreferences>(
            r#"
            SELECT user_id, level, target_language, daily_goal, theme, notifications,
                   sound_effects, created_at, updated_at
              FROM user_preferences
             WHERE user_id = $1
            "#,
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    async fn upsert(&self, prefs: &UserPreferences) -> AppResult<UserPreferences> {
        let row = sqlx::query_as::<_, UserPreferences>(
            r#"
            INSERT INTO user_preferences
                (user_id, level, target_language, daily_goal, theme, notifications,
                 sound_effects, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            ON CONFLICT (user_id) DO UPDATE
               SET level = EXCLUDED.level,
                   target_language = EXCLUDED.target_language,
                   daily_goal = EXCLUDED.daily_goal,
                   theme = EXCLUDED.theme,
                   notifications = EXCLUDED.notifications,
                   sound_effects = EXCLUDED.sound_effects,
                   updated_at = EXCLUDED.updated_at
            RETURNING user_id, level, target_language, daily_goal, theme, notifications,
                      sound_effects, created_at, updated_at
            "#,
        )
        .bind(prefs.user_id)
        .bind(&prefs.level)
        .bind(&prefs.target_language)
        .bind(prefs.daily_goal)
        .bind(&prefs.theme)
        .bind(prefs.notifications)
        .bind(prefs.sound_effects)
        .bind(prefs.created_at)
        .bind(prefs.updated_at)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }
}
