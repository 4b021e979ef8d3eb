use serde::Serialize;

/// Platform-wide counts for the admin dashboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub total_users: i64,
    pub total_admins: i64,
    pub total_flashcards: i64,
    pub total_categories: i64,
    pub total_practice_questions: i64,
    pub total_practice_sets: i64,
    pub total_practice_sessions: i64,
}
