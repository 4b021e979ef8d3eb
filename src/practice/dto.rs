use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::repo_types::{PracticeQuestion, PracticeSet, QuestionType, SetType};
use crate::types::Difficulty;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListQuestionsQuery {
    pub category: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<QuestionType>,
    pub difficulty: Option<Difficulty>,
    #[serde(default = "default_limit")]
    pub limit: i64,
    #[serde(default)]
    pub offset: i64,
}

fn default_limit() -> i64 {
    50
}

#[derive(Debug, Deserialize)]
pub struct RandomQuery {
    pub count: Option<usize>,
    pub category: Option<String>,
}

/// Flat question payload. Which of the shape fields are required depends on `type`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateQuestionRequest {
    #[serde(rename = "type")]
    pub kind: QuestionType,
    pub word: Option<String>,
    pub image_url: Option<String>,
    pub fill_prompt: Option<String>,
    pub answer: Option<String>,
    #[serde(default)]
    pub options: Vec<String>,
    pub translation: String,
    #[serde(default)]
    pub difficulty: Difficulty,
    pub category: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateQuestionRequest {
    #[serde(rename = "type")]
    pub kind: Option<QuestionType>,
    pub word: Option<String>,
    pub image_url: Option<String>,
    pub fill_prompt: Option<String>,
    pub answer: Option<String>,
    pub options: Option<Vec<String>>,
    pub translation: Option<String>,
    pub difficulty: Option<Difficulty>,
    pub category: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListSetsQuery {
    pub category: Option<String>,
    #[serde(rename = "type")]
    pub set_type: Option<SetType>,
    pub difficulty: Option<Difficulty>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSetRequest {
    pub name: String,
    pub description: Option<String>,
    #[serde(default)]
    pub question_ids: Vec<Uuid>,
    #[serde(default)]
    pub difficulty: Difficulty,
    pub category: String,
    #[serde(rename = "type")]
    pub set_type: SetType,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSetRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub question_ids: Option<Vec<Uuid>>,
    pub difficulty: Option<Difficulty>,
    pub category: Option<String>,
    #[serde(rename = "type")]
    pub set_type: Option<SetType>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PracticeSetWithQuestions {
    #[serde(flatten)]
    pub set: PracticeSet,
    pub questions: Vec<PracticeQuestion>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordResultRequest {
    pub practice_set_id: Option<Uuid>,
    pub category: Option<String>,
    pub total_questions: i32,
    pub correct_answers: i32,
    pub score: f64,
    /// Seconds.
    pub time_taken: Option<i32>,
}

#[derive(Debug, Deserialize)]
pub struct HistoryQuery {
    #[serde(default = "default_history_limit")]
    pub limit: i64,
}

fn default_history_limit() -> i64 {
    20
}
