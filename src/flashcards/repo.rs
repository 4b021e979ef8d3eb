use async_trait::async_trait;
use time::OffsetDateTime;
use uuid::Uuid;

use super::repo_types::{Category, Flashcard, FlashcardFilter};
use crate::{db::PgStore, error::AppResult};

#[async_trait]
pub trait FlashcardRepo: Send + Sync {
    /// Matching cards, newest first.
    async fn list(&self, filter: &FlashcardFilter) -> AppResult<Vec<Flashcard>>;
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Flashcard>>;
    /// Lookup by `id AND owner_user_id`; public and foreign cards are absent.
    async fn find_owned(&self, id: Uuid, owner: Uuid) -> AppResult<Option<Flashcard>>;
    async fn insert(&self, card: &Flashcard) -> AppResult<Flashcard>;
    /// Overwrites the editable fields of an existing card.
    async fn update(&self, card: &Flashcard) -> AppResult<Option<Flashcard>>;
    async fn save_review(
        &self,
        id: Uuid,
        last_reviewed: OffsetDateTime,
        next_review: OffsetDateTime,
    ) -> AppResult<bool>;
    async fn delete(&self, id: Uuid) -> AppResult<bool>;
    async fn count(&self) -> AppResult<i64>;

    async fn list_categories(&self) -> AppResult<Vec<Category>>;
    /// Fails with `Conflict` when the name is taken.
    async fn insert_category(&self, category: &Category) -> AppResult<Category>;
    async fn rename_category(&self, id: Uuid, name: &str) -> AppResult<Option<Category>>;
    async fn delete_category(&self, id: Uuid) -> AppResult<bool>;
    async fn count_categories(&self) -> AppResult<i64>;
}

const CARD_COLUMNS: &str = "id, front, back, category, difficulty, image_url, last_reviewed, \
     next_review, owner_user_id, created_at, updated_at";

#[async_trait]
impl FlashcardRepo for PgStore {
    async fn list(&self, filter: &FlashcardFilter) -> AppResult<Vec<Flashcard>> {
        let rows = sqlx::query_as::<_, Flashcard>(&format!(
            r#"
            SELECT {CARD_COLUMNS}
              FROM flashcards
             WHERE ($1::uuid IS NULL OR owner_user_id = $1 OR owner_user_id IS NULL)
               AND ($2::text IS NULL OR category = $2)
               AND ($3::difficulty IS NULL OR difficulty = $3)
               AND ($4::timestamptz IS NULL OR next_review IS NULL OR next_review <= $4)
             ORDER BY created_at DESC
             LIMIT $5 OFFSET $6
            "#
        ))
        .bind(filter.viewer)
        .bind(filter.category.as_deref())
        .bind(filter.difficulty)
        .bind(filter.due_before)
        .bind(filter.limit)
        .bind(filter.offset)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Flashcard>> {
        let card = sqlx::query_as::<_, Flashcard>(&format!(
            "SELECT {CARD_COLUMNS} FROM flashcards WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(card)
    }

    async fn find_owned(&self, id: Uuid, owner: Uuid) -> AppResult<Option<Flashcard>> {
        let card = sqlx::query_as::<_, Flashcard>(&format!(
            "SELECT {CARD_COLUMNS} FROM flashcards WHERE id = $1 AND owner_user_id = $2"
        ))
        .bind(id)
        .bind(owner)
        .fetch_optional(&self.pool)
        .await?;
        Ok(card)
    }

    async fn insert(&self, card: &Flashcard) -> AppResult<Flashcard> {
        let row = sqlx::query_as::<_, Flashcard>(&format!(
            r#"
            INSERT INTO flashcards
                (id, front, back, category, difficulty, image_url, owner_user_id,
                 created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING {CARD_COLUMNS}
            "#
        ))
        .bind(card.id)
        .bind(&card.front)
        .bind(&card.back)
        .bind(&card.category)
        .bind(card.difficulty)
        .bind(card.image_url.as_deref())
        .bind(card.owner_user_id)
        .bind(card.created_at)
        .bind(card.updated_at)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    async fn update(&self, card: &Flashcard) -> AppResult<Option<Flashcard>> {
        let row = sqlx::query_as::<_, Flashcard>(&format!(
            r#"
            UPDATE flashcards
               SET front = $2, back = $3, category = $4, difficulty = $5, image_url = $6,
                   updated_at = $7
             WHERE id = $1
            RETURNING {CARD_COLUMNS}
            "#
        ))
        .bind(card.id)
        .bind(&card.front)
        .bind(&card.back)
        .bind(&card.category)
        .bind(card.difficulty)
        .bind(card.image_url.as_deref())
        .bind(card.updated_at)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    async fn save_review(
        &self,
        id: Uuid,
        last_reviewed: OffsetDateTime,
        next_review: OffsetDateTime,
    ) -> AppResult<bool> {
        let res = sqlx::query(
            r#"
            UPDATE flashcards
               SET last_reviewed = $2, next_review = $3, updated_at = $2
             WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(last_reviewed)
        .bind(next_review)
        .execute(&self.pool)
        .await?;
        Ok(res.rows_affected() > 0)
    }

    async fn delete(&self, id: Uuid) -> AppResult<bool> {
        let res = sqlx::query("DELETE FROM flashcards WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(res.rows_affected() > 0)
    }

    async fn count(&self) -> AppResult<i64> {
        let n: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM flashcards")
            .fetch_one(&self.pool)
            .await?;
        Ok(n)
    }

    async fn list_categories(&self) -> AppResult<Vec<Category>> {
        let rows = sqlx::query_as::<_, Category>(
            "SELECT id, name, created_at FROM categories ORDER BY name ASC",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn insert_category(&self, category: &Category) -> AppResult<Category> {
        let row = sqlx::query_as::<_, Category>(
            r#"
            INSERT INTO categories (id, name, created_at)
            VALUES ($1, $2, $3)
            RETURNING id, name, created_at
            "#,
        )
        .bind(category.id)
        .bind(&category.name)
        .bind(category.created_at)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    async fn rename_category(&self, id: Uuid, name: &str) -> AppResult<Option<Category>> {
        let row = sqlx::query_as::<_, Category>(
            "UPDATE categories SET name = $2 WHERE id = $1 RETURNING id, name, created_at",
        )
        .bind(id)
        .bind(name)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    async fn delete_category(&self, id: Uuid) -> AppResult<bool> {
        let res = sqlx::query("DELETE FROM categories WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(res.rows_affected() > 0)
    }

    async fn count_categories(&self) -> AppResult<i64> {
        let n: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM categories")
            .fetch_one(&self.pool)
            .await?;
        Ok(n)
    }
}
