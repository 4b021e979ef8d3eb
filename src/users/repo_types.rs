use serde::Serialize;
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

pub const DEFAULT_LEVEL: &str = "beginner";
pub const DEFAULT_TARGET_LANGUAGE: &str = "en";
pub const DEFAULT_DAILY_GOAL: i32 = 10;
pub const DEFAULT_THEME: &str = "light";

#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct UserPreferences {
    pub user_id: Uuid,
    pub level: String,
    pub target_language: String,
    pub daily_goal: i32,
    pub theme: String,
    pub notifications: bool,
    pub sound_effects: bool,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

impl UserPreferences {
    pub fn defaults_for(user_id: Uuid) -> Self {
        let now = OffsetDateTime::now_utc();
        Self {
            user_id,
            level: DEFAULT_LEVEL.into(),
            target_language: DEFAULT_TARGET_LANGUAGE.into(),
            daily_goal: DEFAULT_DAILY_GOAL,
            theme: DEFAULT_THEME.into(),
            notifications: true,
            sound_effects: true,
            created_at: now,
            updated_at: now,
        }
    }
}
