use serde::Serialize;
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::types::Difficulty;

#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Flashcard {
    pub id: Uuid,
    pub front: String,
    pub back: String,
    pub category: String,
    pub difficulty: Difficulty,
    pub image_url: Option<String>,
    #[serde(with = "time::serde::rfc3339::option")]
    pub last_reviewed: Option<OffsetDateTime>,
    #[serde(with = "time::serde::rfc3339::option")]
    pub next_review: Option<OffsetDateTime>,
    pub owner_user_id: Option<Uuid>, // None for public cards
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

impl Flashcard {
    pub fn is_public(&self) -> bool {
        self.owner_user_id.is_none()
    }

    pub fn is_visible_to(&self, user_id: Uuid) -> bool {
        self.owner_user_id.map_or(true, |owner| owner == user_id)
    }

    pub fn is_due(&self, now: OffsetDateTime) -> bool {
        self.next_review.map_or(true, |at| at <= now)
    }
}

#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: Uuid,
    pub name: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

/// Listing filter; `viewer` restricts to own and public cards.
#[derive(Debug, Clone, Default)]
pub struct FlashcardFilter {
    pub viewer: Option<Uuid>,
    pub category: Option<String>,
    pub difficulty: Option<Difficulty>,
    pub due_before: Option<OffsetDateTime>,
    pub limit: i64,
    pub offset: i64,
}

impl FlashcardFilter {
    pub fn matches(&self, card: &Flashcard) -> bool {
        self.viewer.map_or(true, |v| card.is_visible_to(v))
            && self.category.as_deref().map_or(true, |c| card.category == c)
            && self.difficulty.map_or(true, |d| card.difficulty == d)
            && self.due_before.map_or(true, |now| card.is_due(now))
    }
}
