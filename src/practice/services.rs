use std::collections::{HashMap, HashSet};

use time::OffsetDateTime;
use tracing::{debug, info};
use uuid::Uuid;

use super::{
    dto::{
        CreateQuestionRequest, CreateSetRequest, ListQuestionsQuery, ListSetsQuery,
        PracticeSetWithQuestions, RecordResultRequest, UpdateQuestionRequest, UpdateSetRequest,
    },
    repo_types::{
        PracticeHistory, PracticeQuestion, PracticeSet, QuestionBody, QuestionFilter, SetFilter,
    },
    sampler::{sample_questions, DEFAULT_SAMPLE_SIZE},
};
use crate::{
    error::{AppError, AppResult},
    state::AppState,
    types::{non_empty, Pagination},
};

pub const MAX_HISTORY_LIMIT: i64 = 100;

fn question_not_found() -> AppError {
    AppError::not_found("Practice question not found")
}

fn set_not_found() -> AppError {
    AppError::not_found("Practice set not found")
}

fn clean_options(options: Vec<String>) -> Vec<String> {
    options
        .into_iter()
        .map(|o| o.trim().to_string())
        .filter(|o| !o.is_empty())
        .collect()
}

fn blank_to_none(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

pub async fn list_questions(
    st: &AppState,
    q: ListQuestionsQuery,
) -> AppResult<Vec<PracticeQuestion>> {
    let page = Pagination {
        limit: q.limit,
        offset: q.offset,
    }
    .clamped();
    let filter = QuestionFilter {
        category: blank_to_none(q.category),
        kind: q.kind,
        difficulty: q.difficulty,
        limit: page.limit,
        offset: page.offset,
    };
    st.store.practice.list_questions(&filter).await
}

pub async fn get_question(st: &AppState, id: Uuid) -> AppResult<PracticeQuestion> {
    st.store
        .practice
        .find_question(id)
        .await?
        .ok_or_else(question_not_found)
}

pub async fn create_question(
    st: &AppState,
    req: CreateQuestionRequest,
) -> AppResult<PracticeQuestion> {
    let body = QuestionBody::from_parts(
        req.kind,
        req.word,
        req.image_url,
        req.fill_prompt,
        req.answer,
        clean_options(req.options),
    )
    .map_err(AppError::BadRequest)?;

    let now = OffsetDateTime::now_utc();
    let question = PracticeQuestion {
        id: Uuid::new_v4(),
        body,
        translation: non_empty(&req.translation, "translation")?,
        difficulty: req.difficulty,
        category: non_empty(&req.category, "category")?,
        created_at: now,
        updated_at: now,
    };
    let created = st.store.practice.insert_question(&question).await?;
    info!(question_id = %created.id, kind = ?created.body.kind(), "practice question created");
    Ok(created)
}

/// Applies a partial update. The merged shape fields are re-validated against
/// the (possibly new) type, so switching to `fill` without a prompt fails.
pub async fn update_question(
    st: &AppState,
    id: Uuid,
    req: UpdateQuestionRequest,
) -> AppResult<PracticeQuestion> {
    let mut question = get_question(st, id).await?;
    let current = &question.body;

    let kind = req.kind.unwrap_or_else(|| current.kind());
    let options = match req.options {
        Some(options) => clean_options(options),
        None => current.options().to_vec(),
    };
    question.body = QuestionBody::from_parts(
        kind,
        req.word.or_else(|| current.word().map(str::to_string)),
        req.image_url.or_else(|| current.image_url().map(str::to_string)),
        req.fill_prompt
            .or_else(|| current.fill_prompt().map(str::to_string)),
        req.answer.or_else(|| current.answer().map(str::to_string)),
        options,
    )
    .map_err(AppError::BadRequest)?;

    if let Some(translation) = req.translation {
        question.translation = non_empty(&translation, "translation")?;
    }
    if let Some(difficulty) = req.difficulty {
        question.difficulty = difficulty;
    }
    if let Some(category) = req.category {
        question.category = non_empty(&category, "category")?;
    }
    question.updated_at = OffsetDateTime::now_utc();

    st.store
        .practice
        .update_question(&question)
        .await?
        .ok_or_else(question_not_found)
}

/// Deletes a question. Sets that list its id keep the dangling reference.
pub async fn delete_question(st: &AppState, id: Uuid) -> AppResult<()> {
    if !st.store.practice.delete_question(id).await? {
        return Err(question_not_found());
    }
    info!(question_id = %id, "practice question deleted");
    Ok(())
}

pub async fn random_questions(
    st: &AppState,
    count: Option<usize>,
    category: Option<String>,
) -> AppResult<Vec<PracticeQuestion>> {
    let count = count.unwrap_or(DEFAULT_SAMPLE_SIZE);
    let category = blank_to_none(category);
    let questions = sample_questions(st.store.practice.as_ref(), count, category.as_deref()).await?;
    debug!(requested = count, returned = questions.len(), ?category, "random questions drawn");
    Ok(questions)
}

pub async fn list_sets(st: &AppState, q: ListSetsQuery) -> AppResult<Vec<PracticeSet>> {
    let filter = SetFilter {
        category: blank_to_none(q.category),
        set_type: q.set_type,
        difficulty: q.difficulty,
    };
    st.store.practice.list_sets(&filter).await
}

pub async fn get_set(st: &AppState, id: Uuid) -> AppResult<PracticeSet> {
    st.store.practice.find_set(id).await?.ok_or_else(set_not_found)
}

/// The set and its questions in `questionIds` order. Ids whose question was
/// deleted are skipped.
pub async fn get_set_with_questions(
    st: &AppState,
    id: Uuid,
) -> AppResult<PracticeSetWithQuestions> {
    let set = get_set(st, id).await?;
    let by_id: HashMap<Uuid, PracticeQuestion> = st
        .store
        .practice
        .find_questions(&set.question_ids)
        .await?
        .into_iter()
        .map(|q| (q.id, q))
        .collect();
    let questions = set
        .question_ids
        .iter()
        .filter_map(|qid| by_id.get(qid).cloned())
        .collect();
    Ok(PracticeSetWithQuestions { set, questions })
}

/// Rejects ids that do not name an existing question.
async fn ensure_questions_exist(st: &AppState, ids: &[Uuid]) -> AppResult<()> {
    if ids.is_empty() {
        return Ok(());
    }
    let found: HashSet<Uuid> = st
        .store
        .practice
        .find_questions(ids)
        .await?
        .into_iter()
        .map(|q| q.id)
        .collect();
    let missing: Vec<String> = ids
        .iter()
        .filter(|id| !found.contains(id))
        .map(Uuid::to_string)
        .collect();
    if missing.is_empty() {
        Ok(())
    } else {
        Err(AppError::bad_request(format!(
            "Unknown question ids: {}",
            missing.join(", ")
        )))
    }
}

pub async fn create_set(st: &AppState, req: CreateSetRequest) -> AppResult<PracticeSet> {
    let name = non_empty(&req.name, "name")?;
    let category = non_empty(&req.category, "category")?;
    ensure_questions_exist(st, &req.question_ids).await?;

    let now = OffsetDateTime::now_utc();
    let set = PracticeSet {
        id: Uuid::new_v4(),
        name,
        description: blank_to_none(req.description),
        question_ids: req.question_ids,
        difficulty: req.difficulty,
        category,
        set_type: req.set_type,
        created_at: now,
        updated_at: now,
    };
    let created = st.store.practice.insert_set(&set).await?;
    info!(set_id = %created.id, questions = created.question_ids.len(), "practice set created");
    Ok(created)
}

pub async fn update_set(st: &AppState, id: Uuid, req: UpdateSetRequest) -> AppResult<PracticeSet> {
    let mut set = get_set(st, id).await?;
    if let Some(name) = req.name {
        set.name = non_empty(&name, "name")?;
    }
    if req.description.is_some() {
        set.description = blank_to_none(req.description);
    }
    if let Some(ids) = req.question_ids {
        ensure_questions_exist(st, &ids).await?;
        set.question_ids = ids;
    }
    if let Some(difficulty) = req.difficulty {
        set.difficulty = difficulty;
    }
    if let Some(category) = req.category {
        set.category = non_empty(&category, "category")?;
    }
    if let Some(set_type) = req.set_type {
        set.set_type = set_type;
    }
    set.updated_at = OffsetDateTime::now_utc();

    st.store
        .practice
        .update_set(&set)
        .await?
        .ok_or_else(set_not_found)
}

pub async fn delete_set(st: &AppState, id: Uuid) -> AppResult<()> {
    if !st.store.practice.delete_set(id).await? {
        return Err(set_not_found());
    }
    info!(set_id = %id, "practice set deleted");
    Ok(())
}

/// Appends a completed session to the caller's history. Counts and score are
/// stored as submitted; only the referenced set must exist.
pub async fn record_result(
    st: &AppState,
    user_id: Uuid,
    req: RecordResultRequest,
) -> AppResult<PracticeHistory> {
    if let Some(set_id) = req.practice_set_id {
        if st.store.practice.find_set(set_id).await?.is_none() {
            return Err(AppError::bad_request("Unknown practice set"));
        }
    }
    let now = OffsetDateTime::now_utc();
    let entry = PracticeHistory {
        id: Uuid::new_v4(),
        user_id: Some(user_id),
        practice_set_id: req.practice_set_id,
        category: blank_to_none(req.category),
        total_questions: req.total_questions,
        correct_answers: req.correct_answers,
        score: req.score,
        time_taken: req.time_taken,
        completed_at: now,
        created_at: now,
        updated_at: now,
    };
    let saved = st.store.history.insert(&entry).await?;
    info!(
        history_id = %saved.id,
        user_id = %user_id,
        correct = saved.correct_answers,
        total = saved.total_questions,
        "practice result recorded"
    );
    Ok(saved)
}

pub async fn history(st: &AppState, user_id: Uuid, limit: i64) -> AppResult<Vec<PracticeHistory>> {
    st.store
        .history
        .list_for_user(user_id, limit.clamp(1, MAX_HISTORY_LIMIT))
        .await
}
