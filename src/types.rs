use serde::{Deserialize, Serialize};

/// Difficulty tag shared by flashcards, questions and sets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "difficulty", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Default for Difficulty {
    fn default() -> Self {
        Self::Medium
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "user_role", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Admin,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct Pagination {
    #[serde(default = "default_limit")]
    pub limit: i64,
    #[serde(default)]
    pub offset: i64,
}

fn default_limit() -> i64 {
    20
}

pub const MAX_PAGE_SIZE: i64 = 100;

impl Default for Pagination {
    fn default() -> Self {
        Self {
            limit: default_limit(),
            offset: 0,
        }
    }
}

impl Pagination {
    pub fn clamped(self) -> Self {
        Self {
            limit: self.limit.clamp(1, MAX_PAGE_SIZE),
            offset: self.offset.max(0),
        }
    }
}

/// Trims and rejects empty strings.
pub fn non_empty(value: &str, field: &str) -> crate::error::AppResult<String> {
    let v = value.trim();
    if v.is_empty() {
        return Err(crate::error::AppError::bad_request(format!(
            "{field} must not be empty"
        )));
    }
    Ok(v.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pagination_is_clamped() {
        let p = Pagination { limit: 1000, offset: -5 }.clamped();
        assert_eq!(p.limit, MAX_PAGE_SIZE);
        assert_eq!(p.offset, 0);
        let p = Pagination { limit: 0, offset: 3 }.clamped();
        assert_eq!(p.limit, 1);
        assert_eq!(p.offset, 3);
    }

    #[test]
    fn difficulty_uses_lowercase_names() {
        assert_eq!(serde_json::to_string(&Difficulty::Hard).unwrap(), "\"hard\"");
        let d: Difficulty = serde_json::from_str("\"easy\"").unwrap();
        assert_eq!(d, Difficulty::Easy);
        assert_eq!(Difficulty::default(), Difficulty::Medium);
    }

    #[test]
    fn non_empty_trims() {
        assert_eq!(non_empty("  hola ", "word").unwrap(), "hola");
        assert!(non_empty("   ", "word").is_err());
    }
}
