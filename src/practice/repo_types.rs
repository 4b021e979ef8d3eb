use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::types::Difficulty;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "question_type", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum QuestionType {
    Text,
    Image,
    Fill,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "set_type", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum SetType {
    Text,
    Image,
    Fill,
    Mixed,
}

/// Shape-specific part of a practice question, keyed by `type`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum QuestionBody {
    Text {
        word: String,
        options: Vec<String>,
    },
    Image {
        #[serde(rename = "imageUrl")]
        image_url: String,
        options: Vec<String>,
    },
    Fill {
        #[serde(rename = "fillPrompt")]
        fill_prompt: String,
        answer: String,
    },
}

impl QuestionBody {
    pub fn kind(&self) -> QuestionType {
        match self {
            Self::Text { .. } => QuestionType::Text,
            Self::Image { .. } => QuestionType::Image,
            Self::Fill { .. } => QuestionType::Fill,
        }
    }

    /// Builds a body from flat columns, requiring the fields of `kind`.
    pub fn from_parts(
        kind: QuestionType,
        word: Option<String>,
        image_url: Option<String>,
        fill_prompt: Option<String>,
        answer: Option<String>,
        options: Vec<String>,
    ) -> Result<Self, String> {
        fn required(v: Option<String>, field: &str, kind: &str) -> Result<String, String> {
            match v.map(|s| s.trim().to_string()) {
                Some(s) if !s.is_empty() => Ok(s),
                _ => Err(format!("{field} is required for {kind} questions")),
            }
        }
        match kind {
            QuestionType::Text => Ok(Self::Text {
                word: required(word, "word", "text")?,
                options,
            }),
            QuestionType::Image => Ok(Self::Image {
                image_url: required(image_url, "imageUrl", "image")?,
                options,
            }),
            QuestionType::Fill => Ok(Self::Fill {
                fill_prompt: required(fill_prompt, "fillPrompt", "fill")?,
                answer: required(answer, "answer", "fill")?,
            }),
        }
    }

    pub fn word(&self) -> Option<&str> {
        match self {
            Self::Text { word, .. } => Some(word),
            _ => None,
        }
    }

    pub fn image_url(&self) -> Option<&str> {
        match self {
            Self::Image { image_url, .. } => Some(image_url),
            _ => None,
        }
    }

    pub fn fill_prompt(&self) -> Option<&str> {
        match self {
            Self::Fill { fill_prompt, .. } => Some(fill_prompt),
            _ => None,
        }
    }

    pub fn answer(&self) -> Option<&str> {
        match self {
            Self::Fill { answer, .. } => Some(answer),
            _ => None,
        }
    }

    pub fn options(&self) -> &[String] {
        match self {
            Self::Text { options, .. } | Self::Image { options, .. } => options,
            Self::Fill { .. } => &[],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PracticeQuestion {
    pub id: Uuid,
    #[serde(flatten)]
    pub body: QuestionBody,
    pub translation: String,
    pub difficulty: Difficulty,
    pub category: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

/// Flat `practice_questions` row.
#[derive(Debug, FromRow)]
pub struct PracticeQuestionRow {
    pub id: Uuid,
    #[sqlx(rename = "type")]
    pub kind: QuestionType,
    pub word: Option<String>,
    pub image_url: Option<String>,
    pub fill_prompt: Option<String>,
    pub answer: Option<String>,
    pub translation: String,
    pub options: Vec<String>,
    pub difficulty: Difficulty,
    pub category: String,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

impl TryFrom<PracticeQuestionRow> for PracticeQuestion {
    type Error = anyhow::Error;

    fn try_from(r: PracticeQuestionRow) -> Result<Self, Self::Error> {
        let body = QuestionBody::from_parts(
            r.kind,
            r.word,
            r.image_url,
            r.fill_prompt,
            r.answer,
            r.options,
        )
        .map_err(|e| anyhow::anyhow!("practice question {} is malformed: {e}", r.id))?;
        Ok(Self {
            id: r.id,
            body,
            translation: r.translation,
            difficulty: r.difficulty,
            category: r.category,
            created_at: r.created_at,
            updated_at: r.updated_at,
        })
    }
}

#[derive(Debug, Clone, Default)]
pub struct QuestionFilter {
    pub category: Option<String>,
    pub kind: Option<QuestionType>,
    pub difficulty: Option<Difficulty>,
    pub limit: i64,
    pub offset: i64,
}

impl QuestionFilter {
    pub fn matches(&self, q: &PracticeQuestion) -> bool {
        self.category.as_deref().map_or(true, |c| q.category == c)
            && self.kind.map_or(true, |k| q.body.kind() == k)
            && self.difficulty.map_or(true, |d| q.difficulty == d)
    }
}

#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct PracticeSet {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub question_ids: Vec<Uuid>,
    pub difficulty: Difficulty,
    pub category: String,
    #[sqlx(rename = "type")]
    #[serde(rename = "type")]
    pub set_type: SetType,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

#[derive(Debug, Clone, Default)]
pub struct SetFilter {
    pub category: Option<String>,
    pub set_type: Option<SetType>,
    pub difficulty: Option<Difficulty>,
}

impl SetFilter {
    pub fn matches(&self, s: &PracticeSet) -> bool {
        self.category.as_deref().map_or(true, |c| s.category == c)
            && self.set_type.map_or(true, |t| s.set_type == t)
            && self.difficulty.map_or(true, |d| s.difficulty == d)
    }
}

/// One completed practice session. Never updated after insert.
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct PracticeHistory {
    pub id: Uuid,
    pub user_id: Option<Uuid>,
    pub practice_set_id: Option<Uuid>,
    pub category: Option<String>,
    pub total_questions: i32,
    pub correct_answers: i32,
    pub score: f64,
    pub time_taken: Option<i32>, // seconds
    #[serde(with = "time::serde::rfc3339")]
    pub completed_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}
