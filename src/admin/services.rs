use tracing::debug;

use super::dto::DashboardStats;
use crate::{error::AppResult, state::AppState, types::Role};

pub async fn dashboard_stats(st: &AppState) -> AppResult<DashboardStats> {
    let store = &st.store;
    let (users, admins, flashcards, categories, questions, sets, sessions) = tokio::try_join!(
        store.users.count(None),
        store.users.count(Some(Role::Admin)),
        store.flashcards.count(),
        store.flashcards.count_categories(),
        store.practice.count_questions(),
        store.practice.count_sets(),
        store.history.count(),
    )?;
    debug!(users, flashcards, questions, "dashboard stats computed");
    Ok(DashboardStats {
        total_users: users,
        total_admins: admins,
        total_flashcards: flashcards,
        total_categories: categories,
        total_practice_questions: questions,
        total_practice_sets: sets,
        total_practice_sessions: sessions,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        auth::{dto::RegisterRequest, services::register},
        flashcards::services::create_category,
    };

    #[tokio::test]
    async fn empty_store_has_zero_counts() {
        let st = AppState::in_memory();
        let stats = dashboard_stats(&st).await.unwrap();
        assert_eq!(stats.total_users, 0);
        assert_eq!(stats.total_practice_sessions, 0);
    }

    #[tokio::test]
    async fn counts_follow_inserts() {
        let st = AppState::in_memory();
        for email in ["a@example.com", "b@example.com"] {
            register(
                &st,
                RegisterRequest {
                    email: email.into(),
                    name: "A".into(),
                    password: "secret-pass".into(),
                },
            )
            .await
            .unwrap();
        }
        create_category(&st, "Food").await.unwrap();

        let stats = dashboard_stats(&st).await.unwrap();
        assert_eq!(stats.total_users, 2);
        assert_eq!(stats.total_admins, 0);
        assert_eq!(stats.total_categories, 1);
        assert_eq!(stats.total_flashcards, 0);
    }

    #[test]
    fn stats_serialize_camel_case() {
        let v = serde_json::to_value(DashboardStats {
            total_users: 1,
            total_admins: 1,
            total_flashcards: 0,
            total_categories: 0,
            total_practice_questions: 0,
            total_practice_sets: 0,
            total_practice_sessions: 0,
        })
        .unwrap();
        assert_eq!(v["totalUsers"], 1);
        assert_eq!(v["totalPracticeSessions"], 0);
    }
}
