//! In-process store used by tests and `STORAGE_BACKEND=memory`.
//!
//! Mirrors the Postgres schema constraints that matter to callers: unique
//! user emails and category names, user deletion cascading to owned cards
//! and preferences, and history rows surviving user or set deletion with
//! the reference cleared.

use std::collections::HashMap;

use async_trait::async_trait;
use time::OffsetDateTime;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::{
    auth::{
        repo::{UserChanges, UserRepo},
        repo_types::User,
    },
    error::{AppError, AppResult},
    flashcards::{
        repo::FlashcardRepo,
        repo_types::{Category, Flashcard, FlashcardFilter},
    },
    practice::{
        repo::{HistoryRepo, PracticeRepo},
        repo_types::{PracticeHistory, PracticeQuestion, PracticeSet, QuestionFilter, SetFilter},
    },
    types::{Pagination, Role},
    users::{repo::PreferencesRepo, repo_types::UserPreferences},
};

#[derive(Default)]
struct Tables {
    // Vecs keep insertion order; "newest first" walks them in reverse.
    users: Vec<User>,
    preferences: HashMap<Uuid, UserPreferences>,
    flashcards: Vec<Flashcard>,
    categories: Vec<Category>,
    questions: Vec<PracticeQuestion>,
    sets: Vec<PracticeSet>,
    history: Vec<PracticeHistory>,
}

#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn page<T: Clone>(items: impl Iterator<Item = T>, limit: i64, offset: i64) -> Vec<T> {
    items
        .skip(offset.max(0) as usize)
        .take(limit.max(0) as usize)
        .collect()
}

#[async_trait]
impl UserRepo for MemoryStore {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>> {
        let t = self.tables.read().await;
        Ok(t.users.iter().find(|u| u.id == id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        let t = self.tables.read().await;
        Ok(t.users.iter().find(|u| u.email == email).cloned())
    }

    async fn find_by_reset_token(&self, token: &str) -> AppResult<Option<User>> {
        let t = self.tables.read().await;
        Ok(t
            .users
            .iter()
            .find(|u| u.reset_token.as_deref() == Some(token))
            .cloned())
    }

    async fn insert(&self, user: &User) -> AppResult<User> {
        let mut t = self.tables.write().await;
        if t.users.iter().any(|u| u.email == user.email) {
            return Err(AppError::conflict("Resource already exists"));
        }
        t.users.push(user.clone());
        Ok(user.clone())
    }

    async fn update_profile(&self, id: Uuid, changes: &UserChanges) -> AppResult<Option<User>> {
        let mut t = self.tables.write().await;
        if let Some(email) = &changes.email {
            if t.users.iter().any(|u| u.id != id && &u.email == email) {
                return Err(AppError::conflict("Resource already exists"));
            }
        }
        let Some(user) = t.users.iter_mut().find(|u| u.id == id) else {
            return Ok(None);
        };
        if let Some(name) = &changes.name {
            user.name = name.clone();
        }
        if let Some(email) = &changes.email {
            user.email = email.clone();
        }
        user.updated_at = OffsetDateTime::now_utc();
        Ok(Some(user.clone()))
    }

    async fn set_password(&self, id: Uuid, password_hash: &str) -> AppResult<()> {
        let mut t = self.tables.write().await;
        if let Some(user) = t.users.iter_mut().find(|u| u.id == id) {
            user.password_hash = password_hash.to_string();
            user.reset_token = None;
            user.reset_token_expires = None;
            user.updated_at = OffsetDateTime::now_utc();
        }
        Ok(())
    }

    async fn set_reset_token(
        &self,
        id: Uuid,
        token: &str,
        expires: OffsetDateTime,
    ) -> AppResult<()> {
        let mut t = self.tables.write().await;
        if let Some(user) = t.users.iter_mut().find(|u| u.id == id) {
            user.reset_token = Some(token.to_string());
            user.reset_token_expires = Some(expires);
        }
        Ok(())
    }

    async fn record_login(&self, id: Uuid, at: OffsetDateTime) -> AppResult<()> {
        let mut t = self.tables.write().await;
        if let Some(user) = t.users.iter_mut().find(|u| u.id == id) {
            user.last_login_at = Some(at);
        }
        Ok(())
    }

    async fn set_role(&self, id: Uuid, role: Role) -> AppResult<Option<User>> {
        let mut t = self.tables.write().await;
        let Some(user) = t.users.iter_mut().find(|u| u.id == id) else {
            return Ok(None);
        };
        user.role = role;
        user.updated_at = OffsetDateTime::now_utc();
        Ok(Some(user.clone()))
    }

    async fn delete(&self, id: Uuid) -> AppResult<bool> {
        let mut t = self.tables.write().await;
        let before = t.users.len();
        t.users.retain(|u| u.id != id);
        if t.users.len() == before {
            return Ok(false);
        }
        t.preferences.remove(&id);
        t.flashcards.retain(|c| c.owner_user_id != Some(id));
        for h in t.history.iter_mut().filter(|h| h.user_id == Some(id)) {
            h.user_id = None;
        }
        Ok(true)
    }

    async fn list(&self, page_req: Pagination) -> AppResult<Vec<User>> {
        let t = self.tables.read().await;
        Ok(page(
            t.users.iter().rev().cloned(),
            page_req.limit,
            page_req.offset,
        ))
    }

    async fn count(&self, role: Option<Role>) -> AppResult<i64> {
        let t = self.tables.read().await;
        Ok(t
            .users
            .iter()
            .filter(|u| role.map_or(true, |r| u.role == r))
            .count() as i64)
    }
}

#[async_trait]
impl PreferencesRepo for MemoryStore {
    async fn get(&self, user_id: Uuid) -> AppResult<Option<UserPreferences>> {
        let t = self.tables.read().await;
        Ok(t.preferences.get(&user_id).cloned())
    }

    async fn upsert(&self, prefs: &UserPreferences) -> AppResult<UserPreferences> {
        let mut t = self.tables.write().await;
        let created_at = t
            .preferences
            .get(&prefs.user_id)
            .map_or(prefs.created_at, |p| p.created_at);
        let stored = UserPreferences {
            created_at,
            ..prefs.clone()
        };
        t.preferences.insert(prefs.user_id, stored.clone());
        Ok(stored)
    }
}

#[async_trait]
impl FlashcardRepo for MemoryStore {
    async fn list(&self, filter: &FlashcardFilter) -> AppResult<Vec<Flashcard>> {
        let t = self.tables.read().await;
        Ok(page(
            t.flashcards.iter().rev().filter(|c| filter.matches(c)).cloned(),
            filter.limit,
            filter.offset,
        ))
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Flashcard>> {
        let t = self.tables.read().await;
        Ok(t.flashcards.iter().find(|c| c.id == id).cloned())
    }

    async fn find_owned(&self, id: Uuid, owner: Uuid) -> AppResult<Option<Flashcard>> {
        let t = self.tables.read().await;
        Ok(t
            .flashcards
            .iter()
            .find(|c| c.id == id && c.owner_user_id == Some(owner))
            .cloned())
    }

    async fn insert(&self, card: &Flashcard) -> AppResult<Flashcard> {
        let mut t = self.tables.write().await;
        t.flashcards.push(card.clone());
        Ok(card.clone())
    }

    async fn update(&self, card: &Flashcard) -> AppResult<Option<Flashcard>> {
        let mut t = self.tables.write().await;
        let Some(stored) = t.flashcards.iter_mut().find(|c| c.id == card.id) else {
            return Ok(None);
        };
        stored.front = card.front.clone();
        stored.back = card.back.clone();
        stored.category = card.category.clone();
        stored.difficulty = card.difficulty;
        stored.image_url = card.image_url.clone();
        stored.updated_at = card.updated_at;
        Ok(Some(stored.clone()))
    }

    async fn save_review(
        &self,
        id: Uuid,
        last_reviewed: OffsetDateTime,
        next_review: OffsetDateTime,
    ) -> AppResult<bool> {
        let mut t = self.tables.write().await;
        let Some(card) = t.flashcards.iter_mut().find(|c| c.id == id) else {
            return Ok(false);
        };
        card.last_reviewed = Some(last_reviewed);
        card.next_review = Some(next_review);
        card.updated_at = last_reviewed;
        Ok(true)
    }

    async fn delete(&self, id: Uuid) -> AppResult<bool> {
        let mut t = self.tables.write().await;
        let before = t.flashcards.len();
        t.flashcards.retain(|c| c.id != id);
        Ok(t.flashcards.len() != before)
    }

    async fn count(&self) -> AppResult<i64> {
        Ok(self.tables.read().await.flashcards.len() as i64)
    }

    async fn list_categories(&self) -> AppResult<Vec<Category>> {
        let t = self.tables.read().await;
        let mut out = t.categories.clone();
        out.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(out)
    }

    async fn insert_category(&self, category: &Category) -> AppResult<Category> {
        let mut t = self.tables.write().await;
        if t.categories.iter().any(|c| c.name == category.name) {
            return Err(AppError::conflict("Resource already exists"));
        }
        t.categories.push(category.clone());
        Ok(category.clone())
    }

    async fn rename_category(&self, id: Uuid, name: &str) -> AppResult<Option<Category>> {
        let mut t = self.tables.write().await;
        if t.categories.iter().any(|c| c.id != id && c.name == name) {
            return Err(AppError::conflict("Resource already exists"));
        }
        let Some(cat) = t.categories.iter_mut().find(|c| c.id == id) else {
            return Ok(None);
        };
        cat.name = name.to_string();
        Ok(Some(cat.clone()))
    }

    async fn delete_category(&self, id: Uuid) -> AppResult<bool> {
        let mut t = self.tables.write().await;
        let before = t.categories.len();
        t.categories.retain(|c| c.id != id);
        Ok(t.categories.len() != before)
    }

    async fn count_categories(&self) -> AppResult<i64> {
        Ok(self.tables.read().await.categories.len() as i64)
    }
}

#[async_trait]
impl PracticeRepo for MemoryStore {
    async fn list_questions(&self, filter: &QuestionFilter) -> AppResult<Vec<PracticeQuestion>> {
        let t = self.tables.read().await;
        Ok(page(
            t.questions.iter().rev().filter(|q| filter.matches(q)).cloned(),
            filter.limit,
            filter.offset,
        ))
    }

    async fn questions_in_category(
        &self,
        category: Option<&str>,
    ) -> AppResult<Vec<PracticeQuestion>> {
        let t = self.tables.read().await;
        Ok(t
            .questions
            .iter()
            .rev()
            .filter(|q| category.map_or(true, |c| q.category == c))
            .cloned()
            .collect())
    }

    async fn questions_outside_category(
        &self,
        category: &str,
        limit: i64,
    ) -> AppResult<Vec<PracticeQuestion>> {
        let t = self.tables.read().await;
        Ok(page(
            t.questions.iter().rev().filter(|q| q.category != category).cloned(),
            limit,
            0,
        ))
    }

    async fn find_question(&self, id: Uuid) -> AppResult<Option<PracticeQuestion>> {
        let t = self.tables.read().await;
        Ok(t.questions.iter().find(|q| q.id == id).cloned())
    }

    async fn find_questions(&self, ids: &[Uuid]) -> AppResult<Vec<PracticeQuestion>> {
        let t = self.tables.read().await;
        Ok(t
            .questions
            .iter()
            .filter(|q| ids.contains(&q.id))
            .cloned()
            .collect())
    }

    async fn insert_question(&self, q: &PracticeQuestion) -> AppResult<PracticeQuestion> {
        let mut t = self.tables.write().await;
        t.questions.push(q.clone());
        Ok(q.clone())
    }

    async fn update_question(&self, q: &PracticeQuestion) -> AppResult<Option<PracticeQuestion>> {
        let mut t = self.tables.write().await;
        let Some(stored) = t.questions.iter_mut().find(|s| s.id == q.id) else {
            return Ok(None);
        };
        *stored = PracticeQuestion {
            created_at: stored.created_at,
            ..q.clone()
        };
        Ok(Some(stored.clone()))
    }

    async fn delete_question(&self, id: Uuid) -> AppResult<bool> {
        let mut t = self.tables.write().await;
        let before = t.questions.len();
        t.questions.retain(|q| q.id != id);
        Ok(t.questions.len() != before)
    }

    async fn count_questions(&self) -> AppResult<i64> {
        Ok(self.tables.read().await.questions.len() as i64)
    }

    async fn list_sets(&self, filter: &SetFilter) -> AppResult<Vec<PracticeSet>> {
        let t = self.tables.read().await;
        Ok(t
            .sets
            .iter()
            .rev()
            .filter(|s| filter.matches(s))
            .cloned()
            .collect())
    }

    async fn find_set(&self, id: Uuid) -> AppResult<Option<PracticeSet>> {
        let t = self.tables.read().await;
        Ok(t.sets.iter().find(|s| s.id == id).cloned())
    }

    async fn insert_set(&self, set: &PracticeSet) -> AppResult<PracticeSet> {
        let mut t = self.tables.write().await;
        t.sets.push(set.clone());
        Ok(set.clone())
    }

    async fn update_set(&self, set: &PracticeSet) -> AppResult<Option<PracticeSet>> {
        let mut t = self.tables.write().await;
        let Some(stored) = t.sets.iter_mut().find(|s| s.id == set.id) else {
            return Ok(None);
        };
        *stored = PracticeSet {
            created_at: stored.created_at,
            ..set.clone()
        };
        Ok(Some(stored.clone()))
    }

    async fn delete_set(&self, id: Uuid) -> AppResult<bool> {
        let mut t = self.tables.write().await;
        let before = t.sets.len();
        t.sets.retain(|s| s.id != id);
        if t.sets.len() == before {
            return Ok(false);
        }
        for h in t.history.iter_mut().filter(|h| h.practice_set_id == Some(id)) {
            h.practice_set_id = None;
        }
        Ok(true)
    }

    async fn count_sets(&self) -> AppResult<i64> {
        Ok(self.tables.read().await.sets.len() as i64)
    }
}

#[async_trait]
impl HistoryRepo for MemoryStore {
    async fn insert(&self, entry: &PracticeHistory) -> AppResult<PracticeHistory> {
        let mut t = self.tables.write().await;
        t.history.push(entry.clone());
        Ok(entry.clone())
    }

    async fn list_for_user(&self, user_id: Uuid, limit: i64) -> AppResult<Vec<PracticeHistory>> {
        let t = self.tables.read().await;
        let mut rows: Vec<PracticeHistory> = t
            .history
            .iter()
            .rev()
            .filter(|h| h.user_id == Some(user_id))
            .cloned()
            .collect();
        // Stable sort keeps later inserts first among equal timestamps.
        rows.sort_by(|a, b| b.completed_at.cmp(&a.completed_at));
        rows.truncate(limit.max(0) as usize);
        Ok(rows)
    }

    async fn count(&self) -> AppResult<i64> {
        Ok(self.tables.read().await.history.len() as i64)
    }
}
