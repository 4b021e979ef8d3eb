//! Random practice-question selection.

use rand::{seq::SliceRandom, Rng};

use super::{repo::PracticeRepo, repo_types::PracticeQuestion};
use crate::error::AppResult;

pub const DEFAULT_SAMPLE_SIZE: usize = 10;

/// Shuffles `pool` uniformly (Fisher-Yates) and keeps the first `count` items.
pub fn shuffle_and_take<T, R>(mut pool: Vec<T>, count: usize, rng: &mut R) -> Vec<T>
where
    R: Rng + ?Sized,
{
    pool.shuffle(rng);
    pool.truncate(count);
    pool
}

/// Fetches the candidate pool for a random draw of `count` questions.
///
/// With a category, every matching question is taken; when there are fewer
/// than `count`, the newest questions from other categories fill the gap.
pub async fn candidate_pool(
    repo: &dyn PracticeRepo,
    count: usize,
    category: Option<&str>,
) -> AppResult<Vec<PracticeQuestion>> {
    let mut pool = repo.questions_in_category(category).await?;
    if let Some(category) = category {
        if pool.len() < count {
            let missing = i64::try_from(count - pool.len()).unwrap_or(i64::MAX);
            pool.extend(repo.questions_outside_category(category, missing).await?);
        }
    }
    Ok(pool)
}

/// Up to `count` distinct questions in random order.
///
/// Result length is `min(count, available)`. Backfilled questions are mixed
/// in with the category's own, not appended after them.
pub async fn sample_questions(
    repo: &dyn PracticeRepo,
    count: usize,
    category: Option<&str>,
) -> AppResult<Vec<PracticeQuestion>> {
    let pool = candidate_pool(repo, count, category).await?;
    Ok(shuffle_and_take(pool, count, &mut rand::thread_rng()))
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use rand::{rngs::StdRng, SeedableRng};
    use time::OffsetDateTime;
    use uuid::Uuid;

    use super::*;
    use crate::{memory::MemoryStore, practice::repo_types::QuestionBody, types::Difficulty};

    fn question(word: &str, category: &str) -> PracticeQuestion {
        let now = OffsetDateTime::now_utc();
        PracticeQuestion {
            id: Uuid::new_v4(),
            body: QuestionBody::Text {
                word: word.into(),
                options: vec!["a".into(), "b".into()],
            },
            translation: "a".into(),
            difficulty: Difficulty::Easy,
            category: category.into(),
            created_at: now,
            updated_at: now,
        }
    }

    /// 20 questions: 2 "Greetings", 18 spread over two other categories.
    async fn seeded_store() -> MemoryStore {
        let store = MemoryStore::new();
        for i in 0..20 {
            let category = match i {
                3 | 11 => "Greetings",
                n if n % 2 == 0 => "Food",
                _ => "Travel",
            };
            store
                .insert_question(&question(&format!("w{i}"), category))
                .await
                .unwrap();
        }
        store
    }

    #[test]
    fn shuffle_and_take_truncates_without_duplicates() {
        let mut rng = StdRng::seed_from_u64(7);
        let out = shuffle_and_take((0..20).collect::<Vec<_>>(), 5, &mut rng);
        assert_eq!(out.len(), 5);
        let unique: HashSet<_> = out.iter().collect();
        assert_eq!(unique.len(), 5);
        assert!(out.iter().all(|n| (0..20).contains(n)));
    }

    #[test]
    fn shuffle_and_take_returns_everything_when_count_exceeds_pool() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut out = shuffle_and_take(vec![1, 2, 3], 10, &mut rng);
        out.sort();
        assert_eq!(out, vec![1, 2, 3]);
    }

    #[test]
    fn shuffle_order_varies_between_draws() {
        let mut rng = StdRng::seed_from_u64(42);
        let pool: Vec<u32> = (0..10).collect();
        let orders: HashSet<Vec<u32>> = (0..50)
            .map(|_| shuffle_and_take(pool.clone(), 10, &mut rng))
            .collect();
        assert!(orders.len() > 1, "50 shuffles all produced the same order");
    }

    #[test]
    fn every_position_is_reachable() {
        // Each element should land first at least once over many trials.
        let mut rng = StdRng::seed_from_u64(3);
        let mut firsts = HashSet::new();
        for _ in 0..500 {
            firsts.insert(shuffle_and_take(vec![0, 1, 2, 3, 4], 5, &mut rng)[0]);
        }
        assert_eq!(firsts.len(), 5);
    }

    #[tokio::test]
    async fn backfills_under_supplied_category() {
        let store = seeded_store().await;
        let all: HashSet<Uuid> = store
            .questions_in_category(None)
            .await
            .unwrap()
            .into_iter()
            .map(|q| q.id)
            .collect();

        let out = sample_questions(&store, 5, Some("Greetings")).await.unwrap();
        assert_eq!(out.len(), 5);
        assert_eq!(out.iter().filter(|q| q.category == "Greetings").count(), 2);
        let ids: HashSet<Uuid> = out.iter().map(|q| q.id).collect();
        assert_eq!(ids.len(), 5, "no duplicates");
        assert!(ids.is_subset(&all));
    }

    #[tokio::test]
    async fn no_backfill_when_category_has_enough() {
        let store = seeded_store().await;
        let out = sample_questions(&store, 3, Some("Food")).await.unwrap();
        assert_eq!(out.len(), 3);
        assert!(out.iter().all(|q| q.category == "Food"));
    }

    #[tokio::test]
    async fn count_larger_than_pool_returns_everything() {
        let store = seeded_store().await;
        let out = sample_questions(&store, 100, None).await.unwrap();
        assert_eq!(out.len(), 20);
        let out = sample_questions(&store, 100, Some("Greetings")).await.unwrap();
        assert_eq!(out.len(), 20);
    }

    #[tokio::test]
    async fn unknown_category_is_filled_from_others() {
        let store = seeded_store().await;
        let out = sample_questions(&store, 4, Some("Nope")).await.unwrap();
        assert_eq!(out.len(), 4);
    }

    #[tokio::test]
    async fn repeated_draws_are_not_always_identical() {
        let store = seeded_store().await;
        let mut orders = HashSet::new();
        for _ in 0..20 {
            let ids: Vec<Uuid> = sample_questions(&store, DEFAULT_SAMPLE_SIZE, None)
                .await
                .unwrap()
                .into_iter()
                .map(|q| q.id)
                .collect();
            assert_eq!(ids.len(), DEFAULT_SAMPLE_SIZE);
            orders.insert(ids);
        }
        assert!(orders.len() > 1);
    }

    #[tokio::test]
    async fn empty_store_yields_empty_sample() {
        let store = MemoryStore::new();
        assert!(sample_questions(&store, 10, Some("Greetings"))
            .await
            .unwrap()
            .is_empty());
    }
}
