use time::OffsetDateTime;
use tracing::{info, warn};
use uuid::Uuid;

use super::{
    dto::{CreateFlashcardRequest, ListFlashcardsQuery, UpdateFlashcardRequest},
    repo_types::{Category, Flashcard, FlashcardFilter},
    scheduler::schedule_next_review,
};
use crate::{
    auth::AuthUser,
    error::{AppError, AppResult},
    state::AppState,
    types::{non_empty, Pagination},
};

fn card_not_found() -> AppError {
    AppError::not_found("Flashcard not found")
}

fn clean_url(url: Option<String>) -> Option<String> {
    url.map(|u| u.trim().to_string()).filter(|u| !u.is_empty())
}

pub async fn list(
    st: &AppState,
    auth: &AuthUser,
    q: ListFlashcardsQuery,
) -> AppResult<Vec<Flashcard>> {
    let page = Pagination {
        limit: q.limit,
        offset: q.offset,
    }
    .clamped();
    let filter = FlashcardFilter {
        viewer: Some(auth.id),
        category: q.category.filter(|c| !c.trim().is_empty()),
        difficulty: q.difficulty,
        due_before: q.due.then(OffsetDateTime::now_utc),
        limit: page.limit,
        offset: page.offset,
    };
    st.store.flashcards.list(&filter).await
}

pub async fn get(st: &AppState, auth: &AuthUser, id: Uuid) -> AppResult<Flashcard> {
    st.store
        .flashcards
        .find_by_id(id)
        .await?
        .filter(|c| c.is_visible_to(auth.id))
        .ok_or_else(card_not_found)
}

pub async fn create(
    st: &AppState,
    auth: &AuthUser,
    req: CreateFlashcardRequest,
) -> AppResult<Flashcard> {
    if req.is_public && !auth.is_admin() {
        warn!(user_id = %auth.id, "non-admin tried to create a public card");
        return Err(AppError::forbidden("Only admins can create public flashcards"));
    }
    let now = OffsetDateTime::now_utc();
    let card = Flashcard {
        id: Uuid::new_v4(),
        front: non_empty(&req.front, "front")?,
        back: non_empty(&req.back, "back")?,
        category: non_empty(&req.category, "category")?,
        difficulty: req.difficulty,
        image_url: clean_url(req.image_url),
        last_reviewed: None,
        next_review: None,
        owner_user_id: (!req.is_public).then_some(auth.id),
        created_at: now,
        updated_at: now,
    };
    let card = st.store.flashcards.insert(&card).await?;
    info!(card_id = %card.id, user_id = %auth.id, public = card.is_public(), "flashcard created");
    Ok(card)
}

/// Own cards, or public cards for admins. Anything else looks absent.
async fn find_writable(st: &AppState, auth: &AuthUser, id: Uuid) -> AppResult<Flashcard> {
    st.store
        .flashcards
        .find_by_id(id)
        .await?
        .filter(|c| c.owner_user_id == Some(auth.id) || (c.is_public() && auth.is_admin()))
        .ok_or_else(card_not_found)
}

pub async fn update(
    st: &AppState,
    auth: &AuthUser,
    id: Uuid,
    req: UpdateFlashcardRequest,
) -> AppResult<Flashcard> {
    let mut card = find_writable(st, auth, id).await?;
    if let Some(front) = req.front {
        card.front = non_empty(&front, "front")?;
    }
    if let Some(back) = req.back {
        card.back = non_empty(&back, "back")?;
    }
    if let Some(category) = req.category {
        card.category = non_empty(&category, "category")?;
    }
    if let Some(difficulty) = req.difficulty {
        card.difficulty = difficulty;
    }
    if req.image_url.is_some() {
        card.image_url = clean_url(req.image_url);
    }
    card.updated_at = OffsetDateTime::now_utc();
    st.store
        .flashcards
        .update(&card)
        .await?
        .ok_or_else(card_not_found)
}

pub async fn delete(st: &AppState, auth: &AuthUser, id: Uuid) -> AppResult<()> {
    let card = find_writable(st, auth, id).await?;
    if !st.store.flashcards.delete(card.id).await? {
        return Err(card_not_found());
    }
    info!(card_id = %id, user_id = %auth.id, "flashcard deleted");
    Ok(())
}

/// Records a review of one of the caller's own cards and schedules the next one.
pub async fn review(
    st: &AppState,
    auth: &AuthUser,
    id: Uuid,
    is_correct: bool,
) -> AppResult<Flashcard> {
    let mut card = st
        .store
        .flashcards
        .find_owned(id, auth.id)
        .await?
        .ok_or_else(card_not_found)?;

    let schedule = schedule_next_review(card.difficulty, is_correct, OffsetDateTime::now_utc());
    let saved = st
        .store
        .flashcards
        .save_review(card.id, schedule.last_reviewed, schedule.next_review)
        .await?;
    if !saved {
        // Deleted between lookup and update.
        return Err(card_not_found());
    }

    card.last_reviewed = Some(schedule.last_reviewed);
    card.next_review = Some(schedule.next_review);
    card.updated_at = schedule.last_reviewed;
    info!(card_id = %id, user_id = %auth.id, is_correct, "flashcard reviewed");
    Ok(card)
}

pub async fn list_categories(st: &AppState) -> AppResult<Vec<Category>> {
    st.store.flashcards.list_categories().await
}

pub async fn create_category(st: &AppState, name: &str) -> AppResult<Category> {
    let category = Category {
        id: Uuid::new_v4(),
        name: non_empty(name, "name")?,
        created_at: OffsetDateTime::now_utc(),
    };
    let created = st
        .store
        .flashcards
        .insert_category(&category)
        .await
        .map_err(|e| match e {
            AppError::Conflict(_) => AppError::conflict("Category already exists"),
            other => other,
        })?;
    info!(category_id = %created.id, name = %created.name, "category created");
    Ok(created)
}

/// Renames a category. Cards and questions keep the old name string.
pub async fn rename_category(st: &AppState, id: Uuid, name: &str) -> AppResult<Category> {
    let name = non_empty(name, "name")?;
    st.store
        .flashcards
        .rename_category(id, &name)
        .await
        .map_err(|e| match e {
            AppError::Conflict(_) => AppError::conflict("Category already exists"),
            other => other,
        })?
        .ok_or_else(|| AppError::not_found("Category not found"))
}

/// Deletes a category. Cards and questions referencing it by name are left as they are.
pub async fn delete_category(st: &AppState, id: Uuid) -> AppResult<()> {
    if !st.store.flashcards.delete_category(id).await? {
        return Err(AppError::not_found("Category not found"));
    }
    info!(category_id = %id, "category deleted");
    Ok(())
}

#[cfg(test)]
mod tests {
    use time::Duration;

    use super::*;
    use crate::types::{Difficulty, Role};

    fn user() -> AuthUser {
        AuthUser {
            id: Uuid::new_v4(),
            role: Role::User,
        }
    }

    fn admin() -> AuthUser {
        AuthUser {
            id: Uuid::new_v4(),
            role: Role::Admin,
        }
    }

    fn new_card(front: &str, difficulty: Difficulty) -> CreateFlashcardRequest {
        CreateFlashcardRequest {
            front: front.into(),
            back: "back".into(),
            category: "Greetings".into(),
            difficulty,
            image_url: None,
            is_public: false,
        }
    }

    fn query() -> ListFlashcardsQuery {
        ListFlashcardsQuery {
            category: None,
            difficulty: None,
            due: false,
            limit: 50,
            offset: 0,
        }
    }

    #[tokio::test]
    async fn new_card_has_no_review_schedule() {
        let st = AppState::in_memory();
        let me = user();
        let card = create(&st, &me, new_card("hola", Difficulty::Easy)).await.unwrap();
        assert_eq!(card.owner_user_id, Some(me.id));
        assert!(card.last_reviewed.is_none());
        assert!(card.next_review.is_none());
    }

    #[tokio::test]
    async fn review_sets_both_timestamps() {
        let st = AppState::in_memory();
        let me = user();
        let card = create(&st, &me, new_card("hola", Difficulty::Easy)).await.unwrap();

        let reviewed = review(&st, &me, card.id, true).await.unwrap();
        let last = reviewed.last_reviewed.unwrap();
        assert_eq!(reviewed.next_review.unwrap() - last, Duration::days(7));

        let stored = st.store.flashcards.find_by_id(card.id).await.unwrap().unwrap();
        assert_eq!(stored.last_reviewed, reviewed.last_reviewed);
        assert_eq!(stored.next_review, reviewed.next_review);

        let missed = review(&st, &me, card.id, false).await.unwrap();
        assert_eq!(
            missed.next_review.unwrap() - missed.last_reviewed.unwrap(),
            Duration::hours(4)
        );
    }

    #[tokio::test]
    async fn reviewing_foreign_card_is_not_found() {
        let st = AppState::in_memory();
        let owner = user();
        let other = user();
        let card = create(&st, &owner, new_card("hola", Difficulty::Hard)).await.unwrap();

        let err = review(&st, &other, card.id, true).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));

        let stored = st.store.flashcards.find_by_id(card.id).await.unwrap().unwrap();
        assert!(stored.next_review.is_none());
    }

    #[tokio::test]
    async fn save_review_reports_missing_card() {
        let st = AppState::in_memory();
        let me = user();
        let card = create(&st, &me, new_card("hola", Difficulty::Easy)).await.unwrap();
        let now = OffsetDateTime::now_utc();
        let repo = &st.store.flashcards;

        assert!(repo.save_review(card.id, now, now + Duration::days(7)).await.unwrap());
        repo.delete(card.id).await.unwrap();
        assert!(!repo.save_review(card.id, now, now + Duration::days(7)).await.unwrap());
    }

    #[tokio::test]
    async fn reviewing_missing_card_is_not_found() {
        let st = AppState::in_memory();
        let err = review(&st, &user(), Uuid::new_v4(), true).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn public_cards_are_visible_but_only_admins_edit_them() {
        let st = AppState::in_memory();
        let boss = admin();
        let me = user();
        let mut req = new_card("adiós", Difficulty::Medium);
        req.is_public = true;
        let public = create(&st, &boss, req).await.unwrap();
        assert!(public.is_public());

        assert_eq!(get(&st, &me, public.id).await.unwrap().id, public.id);
        let listed = list(&st, &me, query()).await.unwrap();
        assert!(listed.iter().any(|c| c.id == public.id));

        let err = delete(&st, &me, public.id).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
        delete(&st, &boss, public.id).await.unwrap();
    }

    #[tokio::test]
    async fn users_cannot_create_public_cards() {
        let st = AppState::in_memory();
        let mut req = new_card("hola", Difficulty::Easy);
        req.is_public = true;
        let err = create(&st, &user(), req).await.unwrap_err();
        assert!(matches!(err, AppError::Forbidden(_)));
    }

    #[tokio::test]
    async fn list_hides_other_users_cards_and_filters() {
        let st = AppState::in_memory();
        let me = user();
        let other = user();
        create(&st, &me, new_card("uno", Difficulty::Easy)).await.unwrap();
        create(&st, &me, new_card("dos", Difficulty::Hard)).await.unwrap();
        create(&st, &other, new_card("tres", Difficulty::Easy)).await.unwrap();

        let mine = list(&st, &me, query()).await.unwrap();
        assert_eq!(mine.len(), 2);
        assert_eq!(mine[0].front, "dos", "newest first");

        let mut q = query();
        q.difficulty = Some(Difficulty::Easy);
        let easy = list(&st, &me, q).await.unwrap();
        assert_eq!(easy.len(), 1);
        assert_eq!(easy[0].front, "uno");
    }

    #[tokio::test]
    async fn due_filter_skips_recently_reviewed_cards() {
        let st = AppState::in_memory();
        let me = user();
        let a = create(&st, &me, new_card("uno", Difficulty::Easy)).await.unwrap();
        create(&st, &me, new_card("dos", Difficulty::Easy)).await.unwrap();
        review(&st, &me, a.id, true).await.unwrap();

        let mut q = query();
        q.due = true;
        let due = list(&st, &me, q).await.unwrap();
        assert_eq!(due.len(), 1);
        assert_eq!(due[0].front, "dos");
    }

    #[tokio::test]
    async fn update_rejects_blank_front() {
        let st = AppState::in_memory();
        let me = user();
        let card = create(&st, &me, new_card("hola", Difficulty::Easy)).await.unwrap();
        let err = update(
            &st,
            &me,
            card.id,
            UpdateFlashcardRequest {
                front: Some("  ".into()),
                back: None,
                category: None,
                difficulty: None,
                image_url: None,
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));

        let updated = update(
            &st,
            &me,
            card.id,
            UpdateFlashcardRequest {
                front: None,
                back: Some("hello".into()),
                category: None,
                difficulty: Some(Difficulty::Hard),
                image_url: None,
            },
        )
        .await
        .unwrap();
        assert_eq!(updated.back, "hello");
        assert_eq!(updated.difficulty, Difficulty::Hard);
        assert_eq!(updated.front, "hola");
    }

    #[tokio::test]
    async fn duplicate_category_conflicts() {
        let st = AppState::in_memory();
        create_category(&st, "Greetings").await.unwrap();
        let err = create_category(&st, " Greetings ").await.unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
    }

    #[tokio::test]
    async fn deleting_category_leaves_cards_untouched() {
        let st = AppState::in_memory();
        let me = user();
        let cat = create_category(&st, "Greetings").await.unwrap();
        let card = create(&st, &me, new_card("hola", Difficulty::Easy)).await.unwrap();

        delete_category(&st, cat.id).await.unwrap();
        let stored = get(&st, &me, card.id).await.unwrap();
        assert_eq!(stored.category, "Greetings");

        let err = delete_category(&st, cat.id).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn rename_category_checks_existence_and_uniqueness() {
        let st = AppState::in_memory();
        let a = create_category(&st, "Food").await.unwrap();
        create_category(&st, "Travel").await.unwrap();

        let err = rename_category(&st, a.id, "Travel").await.unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
        let err = rename_category(&st, Uuid::new_v4(), "Other").await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));

        let renamed = rename_category(&st, a.id, "Cooking").await.unwrap();
        assert_eq!(renamed.name, "Cooking");
        let names: Vec<String> = list_categories(&st)
            .await
            .unwrap()
            .into_iter()
            .map(|c| c.name)
            .collect();
        assert_eq!(names, vec!["Cooking", "Travel"]);
    }
}
