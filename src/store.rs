use std::sync::Arc;

use crate::{
    auth::repo::UserRepo,
    db::PgStore,
    flashcards::repo::FlashcardRepo,
    memory::MemoryStore,
    practice::repo::{HistoryRepo, PracticeRepo},
    users::repo::PreferencesRepo,
};

/// Repository handles shared by every request.
#[derive(Clone)]
pub struct Store {
    pub users: Arc<dyn UserRepo>,
    pub preferences: Arc<dyn PreferencesRepo>,
    pub flashcards: Arc<dyn FlashcardRepo>,
    pub practice: Arc<dyn PracticeRepo>,
    pub history: Arc<dyn HistoryRepo>,
}

impl Store {
    pub fn postgres(pg: PgStore) -> Self {
        let pg = Arc::new(pg);
        Self {
            users: pg.clone(),
            preferences: pg.clone(),
            flashcards: pg.clone(),
            practice: pg.clone(),
            history: pg,
        }
    }

    pub fn memory() -> Self {
        let mem = Arc::new(MemoryStore::new());
        Self {
            users: mem.clone(),
            preferences: mem.clone(),
            flashcards: mem.clone(),
            practice: mem.clone(),
            history: mem,
        }
    }
}
