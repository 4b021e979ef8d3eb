use serde::Deserialize;

use crate::types::Difficulty;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListFlashcardsQuery {
    pub category: Option<String>,
    pub difficulty: Option<Difficulty>,
    /// Only cards whose next review is unset or already passed.
    #[serde(default)]
    pub due: bool,
    #[serde(default = "default_limit")]
    pub limit: i64,
    #[serde(default)]
    pub offset: i64,
}

fn default_limit() -> i64 {
    50
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateFlashcardRequest {
    pub front: String,
    pub back: String,
    pub category: String,
    #[serde(default)]
    pub difficulty: Difficulty,
    pub image_url: Option<String>,
    /// Admin only: create a card without an owner.
    #[serde(default)]
    pub is_public: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateFlashcardRequest {
    pub front: Option<String>,
    pub back: Option<String>,
    pub category: Option<String>,
    pub difficulty: Option<Difficulty>,
    pub image_url: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewRequest {
    pub is_correct: bool,
}

#[derive(Debug, Deserialize)]
pub struct CategoryRequest {
    pub name: String,
}
