use serde::Deserialize;

#[derive(Debug, Default, Deserialize)]
pub struct UpdateUserRequest {
    pub name: Option<String>,
    pub email: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePreferencesRequest {
    pub level: Option<String>,
    pub target_language: Option<String>,
    pub daily_goal: Option<i32>,
    pub theme: Option<String>,
    pub notifications: Option<bool>,
    pub sound_effects: Option<bool>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetAdminRequest {
    pub is_admin: bool,
}
