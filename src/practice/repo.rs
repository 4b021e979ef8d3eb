use async_trait::async_trait;
use uuid::Uuid;

use super::repo_types::{
    PracticeHistory, PracticeQuestion, PracticeQuestionRow, PracticeSet, QuestionFilter, SetFilter,
};
use crate::{db::PgStore, error::AppResult};

#[async_trait]
pub trait PracticeRepo: Send + Sync {
    /// Matching questions, newest first.
    async fn list_questions(&self, filter: &QuestionFilter) -> AppResult<Vec<PracticeQuestion>>;
    /// Every question in `category` (or all questions), newest first.
    async fn questions_in_category(&self, category: Option<&str>)
        -> AppResult<Vec<PracticeQuestion>>;
    /// Up to `limit` questions from categories other than `category`, newest first.
    async fn questions_outside_category(
        &self,
        category: &str,
        limit: i64,
    ) -> AppResult<Vec<PracticeQuestion>>;
    async fn find_question(&self, id: Uuid) -> AppResult<Option<PracticeQuestion>>;
    /// Questions with the given ids, in no particular order. Unknown ids are skipped.
    async fn find_questions(&self, ids: &[Uuid]) -> AppResult<Vec<PracticeQuestion>>;
    async fn insert_question(&self, q: &PracticeQuestion) -> AppResult<PracticeQuestion>;
    async fn update_question(&self, q: &PracticeQuestion) -> AppResult<Option<PracticeQuestion>>;
    async fn delete_question(&self, id: Uuid) -> AppResult<bool>;
    async fn count_questions(&self) -> AppResult<i64>;

    async fn list_sets(&self, filter: &SetFilter) -> AppResult<Vec<PracticeSet>>;
    async fn find_set(&self, id: Uuid) -> AppResult<Option<PracticeSet>>;
    async fn insert_set(&self, set: &PracticeSet) -> AppResult<PracticeSet>;
    async fn update_set(&self, set: &PracticeSet) -> AppResult<Option<PracticeSet>>;
    async fn delete_set(&self, id: Uuid) -> AppResult<bool>;
    async fn count_sets(&self) -> AppResult<i64>;
}

#[async_trait]
pub trait HistoryRepo: Send + Sync {
    async fn insert(&self, entry: &PracticeHistory) -> AppResult<PracticeHistory>;
    /// The user's sessions, most recently completed first.
    async fn list_for_user(&self, user_id: Uuid, limit: i64) -> AppResult<Vec<PracticeHistory>>;
    async fn count(&self) -> AppResult<i64>;
}

const QUESTION_COLUMNS: &str = "id, type, word, image_url, fill_prompt, answer, translation, \
     options, difficulty, category, created_at, updated_at";

const SET_COLUMNS: &str =
    "id, name, description, question_ids, difficulty, category, type, created_at, updated_at";

const HISTORY_COLUMNS: &str = "id, user_id, practice_set_id, category, total_questions, \
     correct_answers, score, time_taken, completed_at, created_at, updated_at";

fn into_questions(rows: Vec<PracticeQuestionRow>) -> AppResult<Vec<PracticeQuestion>> {
    rows.into_iter()
        .map(|r| PracticeQuestion::try_from(r).map_err(Into::into))
        .collect()
}

#[async_trait]
impl PracticeRepo for PgStore {
    async fn list_questions(&self, filter: &QuestionFilter) -> AppResult<Vec<PracticeQuestion>> {
        let rows = sqlx::query_as::<_, PracticeQuestionRow>(&format!(
            r#"
            SELECT {QUESTION_COLUMNS}
              FROM practice_questions
             WHERE ($1::text IS NULL OR category = $1)
               AND ($2::question_type IS NULL OR type = $2)
               AND ($3::difficulty IS NULL OR difficulty = $3)
             ORDER BY created_at DESC
             LIMIT $4 OFFSET $5
            "#
        ))
        .bind(filter.category.as_deref())
        .bind(filter.kind)
        .bind(filter.difficulty)
        .bind(filter.limit)
        .bind(filter.offset)
        .fetch_all(&self.pool)
        .await?;
        into_questions(rows)
    }

    async fn questions_in_category(
        &self,
        category: Option<&str>,
    ) -> AppResult<Vec<PracticeQuestion>> {
        let rows = sqlx::query_as::<_, PracticeQuestionRow>(&format!(
            r#"
            SELECT {QUESTION_COLUMNS}
              FROM practice_questions
             WHERE ($1::text IS NULL OR category = $1)
             ORDER BY created_at DESC
            "#
        ))
        .bind(category)
        .fetch_all(&self.pool)
        .await?;
        into_questions(rows)
    }

    async fn questions_outside_category(
        &self,
        category: &str,
        limit: i64,
    ) -> AppResult<Vec<PracticeQuestion>> {
        let rows = sqlx::query_as::<_, PracticeQuestionRow>(&format!(
            r#"
            SELECT {QUESTION_COLUMNS}
              FROM practice_questions
             WHERE category <> $1
             ORDER BY created_at DESC
             LIMIT $2
            "#
        ))
        .bind(category)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;
        into_questions(rows)
    }

    async fn find_question(&self, id: Uuid) -> AppResult<Option<PracticeQuestion>> {
        let row = sqlx::query_as::<_, PracticeQuestionRow>(&format!(
            "SELECT {QUESTION_COLUMNS} FROM practice_questions WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(PracticeQuestion::try_from).transpose()?)
    }

    async fn find_questions(&self, ids: &[Uuid]) -> AppResult<Vec<PracticeQuestion>> {
        let rows = sqlx::query_as::<_, PracticeQuestionRow>(&format!(
            "SELECT {QUESTION_COLUMNS} FROM practice_questions WHERE id = ANY($1)"
        ))
        .bind(ids)
        .fetch_all(&self.pool)
        .await?;
        into_questions(rows)
    }

    async fn insert_question(&self, q: &PracticeQuestion) -> AppResult<PracticeQuestion> {
        let row = sqlx::query_as::<_, PracticeQuestionRow>(&format!(
            r#"
            INSERT INTO practice_questions
                (id, type, word, image_url, fill_prompt, answer, translation, options,
                 difficulty, category, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            RETURNING {QUESTION_COLUMNS}
            "#
        ))
        .bind(q.id)
        .bind(q.body.kind())
        .bind(q.body.word())
        .bind(q.body.image_url())
        .bind(q.body.fill_prompt())
        .bind(q.body.answer())
        .bind(&q.translation)
        .bind(q.body.options())
        .bind(q.difficulty)
        .bind(&q.category)
        .bind(q.created_at)
        .bind(q.updated_at)
        .fetch_one(&self.pool)
        .await?;
        Ok(PracticeQuestion::try_from(row)?)
    }

    async fn update_question(&self, q: &PracticeQuestion) -> AppResult<Option<PracticeQuestion>> {
        let row = sqlx::query_as::<_, PracticeQuestionRow>(&format!(
            r#"
            UPDATE practice_questions
               SET type = $2, word = $3, image_url = $4, fill_prompt = $5, answer = $6,
                   translation = $7, options = $8, difficulty = $9, category = $10,
                   updated_at = $11
             WHERE id = $1
            RETURNING {QUESTION_COLUMNS}
            "#
        ))
        .bind(q.id)
        .bind(q.body.kind())
        .bind(q.body.word())
        .bind(q.body.image_url())
        .bind(q.body.fill_prompt())
        .bind(q.body.answer())
        .bind(&q.translation)
        .bind(q.body.options())
        .bind(q.difficulty)
        .bind(&q.category)
        .bind(q.updated_at)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(PracticeQuestion::try_from).transpose()?)
    }

    async fn delete_question(&self, id: Uuid) -> AppResult<bool> {
        let res = sqlx::query("DELETE FROM practice_questions WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(res.rows_affected() > 0)
    }

    async fn count_questions(&self) -> AppResult<i64> {
        let n: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM practice_questions")
            .fetch_one(&self.pool)
            .await?;
        Ok(n)
    }

    async fn list_sets(&self, filter: &SetFilter) -> AppResult<Vec<PracticeSet>> {
        let rows = sqlx::query_as::<_, PracticeSet>(&format!(
            r#"
            SELECT {SET_COLUMNS}
              FROM practice_sets
             WHERE ($1::text IS NULL OR category = $1)
               AND ($2::set_type IS NULL OR type = $2)
               AND ($3::difficulty IS NULL OR difficulty = $3)
             ORDER BY created_at DESC
            "#
        ))
        .bind(filter.category.as_deref())
        .bind(filter.set_type)
        .bind(filter.difficulty)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn find_set(&self, id: Uuid) -> AppResult<Option<PracticeSet>> {
        let row = sqlx::query_as::<_, PracticeSet>(&format!(
            "SELECT {SET_COLUMNS} FROM practice_sets WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    async fn insert_set(&self, set: &PracticeSet) -> AppResult<PracticeSet> {
        let row = sqlx::query_as::<_, PracticeSet>(&format!(
            r#"
            INSERT INTO practice_sets
                (id, name, description, question_ids, difficulty, category, type,
                 created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING {SET_COLUMNS}
            "#
        ))
        .bind(set.id)
        .bind(&set.name)
        .bind(set.description.as_deref())
        .bind(&set.question_ids)
        .bind(set.difficulty)
        .bind(&set.category)
        .bind(set.set_type)
        .bind(set.created_at)
        .bind(set.updated_at)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    async fn update_set(&self, set: &PracticeSet) -> AppResult<Option<PracticeSet>> {
        let row = sqlx::query_as::<_, PracticeSet>(&format!(
            r#"
            UPDATE practice_sets
               SET name = $2, description = $3, question_ids = $4, difficulty = $5,
                   category = $6, type = $7, updated_at = $8
             WHERE id = $1
            RETURNING {SET_COLUMNS}
            "#
        ))
        .bind(set.id)
        .bind(&set.name)
        .bind(set.description.as_deref())
        .bind(&set.question_ids)
        .bind(set.difficulty)
        .bind(&set.category)
        .bind(set.set_type)
        .bind(set.updated_at)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    async fn delete_set(&self, id: Uuid) -> AppResult<bool> {
        let res = sqlx::query("DELETE FROM practice_sets WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(res.rows_affected() > 0)
    }

    async fn count_sets(&self) -> AppResult<i64> {
        let n: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM practice_sets")
            .fetch_one(&self.pool)
            .await?;
        Ok(n)
    }
}

#[async_trait]
impl HistoryRepo for PgStore {
    async fn insert(&self, entry: &PracticeHistory) -> AppResult<PracticeHistory> {
        let row = sqlx::query_as::<_, PracticeHistory>(&format!(
            r#"
            INSERT INTO practice_history
                (id, user_id, practice_set_id, category, total_questions, correct_answers,
                 score, time_taken, completed_at, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            RETURNING {HISTORY_COLUMNS}
            "#
        ))
        .bind(entry.id)
        .bind(entry.user_id)
        .bind(entry.practice_set_id)
        .bind(entry.category.as_deref())
        .bind(entry.total_questions)
        .bind(entry.correct_answers)
        .bind(entry.score)
        .bind(entry.time_taken)
        .bind(entry.completed_at)
        .bind(entry.created_at)
        .bind(entry.updated_at)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    async fn list_for_user(&self, user_id: Uuid, limit: i64) -> AppResult<Vec<PracticeHistory>> {
        let rows = sqlx::query_as::<_, PracticeHistory>(&format!(
            r#"
            SELECT {HISTORY_COLUMNS}
              FROM practice_history
             WHERE user_id = $1
             ORDER BY completed_at DESC, created_at DESC
             LIMIT $2
            "#
        ))
        .bind(user_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn count(&self) -> AppResult<i64> {
        let n: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM practice_history")
            .fetch_one(&self.pool)
            .await?;
        Ok(n)
    }
}
