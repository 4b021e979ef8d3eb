use axum::http::{Method, StatusCode};
use serde_json::json;

mod common;

use common::TestApp;

#[tokio::test]
async fn health_is_public() {
    let app = TestApp::new();
    let (status, _) = app.request(Method::GET, "/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn protected_routes_require_a_token() {
    let app = TestApp::new();
    let (status, body) = app.request(Method::GET, "/flashcards", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "UNAUTHORIZED");
}

#[tokio::test]
async fn duplicate_registration_conflicts() {
    let app = TestApp::new();
    let first = app.register("ana@example.com").await;
    let (status, body) = app
        .post(
            "/auth/register",
            None,
            json!({ "email": "ana@example.com", "name": "Other", "password": "another-pass" }),
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "CONFLICT");

    let (status, profile) = app.get("/auth/profile", &first.token).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(profile["name"], "Test User");
    assert!(profile.get("passwordHash").is_none());
}

#[tokio::test]
async fn review_flow_schedules_next_review() {
    let app = TestApp::new();
    let me = app.register("ana@example.com").await;
    let (status, card) = app
        .post(
            "/flashcards",
            Some(me.token.as_str()),
            json!({ "front": "hola", "back": "hello", "category": "Greetings", "difficulty": "hard" }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED, "{card}");
    assert!(card["nextReview"].is_null());
    let id = card["id"].as_str().unwrap();

    let (status, reviewed) = app
        .post(
            &format!("/flashcards/{id}/review"),
            Some(me.token.as_str()),
            json!({ "isCorrect": true }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert!(reviewed["lastReviewed"].is_string());
    assert!(reviewed["nextReview"].is_string());
}

#[tokio::test]
async fn reviewing_someone_elses_card_is_not_found() {
    let app = TestApp::new();
    let owner = app.register("ana@example.com").await;
    let other = app.register("bo@example.com").await;
    let (_, card) = app
        .post(
            "/flashcards",
            Some(owner.token.as_str()),
            json!({ "front": "hola", "back": "hello", "category": "Greetings" }),
        )
        .await;
    let id = card["id"].as_str().unwrap();

    let (status, _) = app
        .post(
            &format!("/flashcards/{id}/review"),
            Some(other.token.as_str()),
            json!({ "isCorrect": false }),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn cross_user_access_is_forbidden() {
    let app = TestApp::new();
    let ana = app.register("ana@example.com").await;
    let bo = app.register("bo@example.com").await;

    let (status, _) = app.get(&format!("/users/{}", ana.id), &bo.token).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    let (status, prefs) = app
        .get(&format!("/users/{}/preferences", ana.id), &ana.token)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(prefs["dailyGoal"], 10);
}

#[tokio::test]
async fn admin_routes_reject_regular_users() {
    let app = TestApp::new();
    let me = app.register("ana@example.com").await;
    let (status, _) = app.get("/admin/dashboard/stats", &me.token).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    let (status, _) = app
        .post("/flashcards/categories", Some(me.token.as_str()), json!({ "name": "Food" }))
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn practice_round_trip_records_history() {
    let app = TestApp::new();
    let boss = app.admin("boss@example.com").await;
    let me = app.register("ana@example.com").await;

    let mut ids = Vec::new();
    for word in ["hola", "adiós", "gracias"] {
        let (status, q) = app
            .post(
                "/practice",
                Some(boss.token.as_str()),
                json!({
                    "type": "text",
                    "word": word,
                    "options": ["hello", "bye", "thanks"],
                    "translation": "hello",
                    "category": "Greetings",
                    "difficulty": "easy"
                }),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "{q}");
        assert_eq!(q["type"], "text");
        ids.push(q["id"].as_str().unwrap().to_string());
    }

    let (status, bad) = app
        .post(
            "/practice",
            Some(boss.token.as_str()),
            json!({ "type": "fill", "fillPrompt": "___ amigo", "translation": "x", "category": "Greetings" }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST, "{bad}");

    let (status, drawn) = app
        .get("/practice/random?count=2&category=Greetings", &me.token)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(drawn.as_array().unwrap().len(), 2);

    let (status, set) = app
        .post(
            "/practice/sets",
            Some(boss.token.as_str()),
            json!({
                "name": "Basics",
                "questionIds": [ids[2], ids[0]],
                "category": "Greetings",
                "type": "text"
            }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED, "{set}");
    let set_id = set["id"].as_str().unwrap();

    let (status, full) = app
        .get(&format!("/practice/sets/{set_id}/with-questions"), &me.token)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(full["questions"][0]["id"], ids[2].as_str());
    assert_eq!(full["questions"][1]["id"], ids[0].as_str());

    let (status, entry) = app
        .post(
            "/practice/history",
            Some(me.token.as_str()),
            json!({
                "practiceSetId": set_id,
                "totalQuestions": 2,
                "correctAnswers": 1,
                "score": 50.0,
                "timeTaken": 42
            }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED, "{entry}");

    let (status, history) = app.get("/practice/history", &me.token).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(history[0]["id"], entry["id"]);

    let (status, stats) = app.get("/admin/dashboard/stats", &boss.token).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(stats["totalUsers"], 2);
    assert_eq!(stats["totalAdmins"], 1);
    assert_eq!(stats["totalPracticeQuestions"], 3);
    assert_eq!(stats["totalPracticeSets"], 1);
    assert_eq!(stats["totalPracticeSessions"], 1);
}

#[tokio::test]
async fn set_admin_takes_effect_on_next_login() {
    let app = TestApp::new();
    let boss = app.admin("boss@example.com").await;
    let me = app.register("ana@example.com").await;

    let (status, user) = app
        .patch(
            &format!("/users/{}/set-admin", me.id),
            &boss.token,
            json!({ "isAdmin": true }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(user["role"], "admin");

    let (status, _) = app.get("/admin/dashboard/stats", &me.token).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED, "old token keeps the old role");
}

#[tokio::test]
async fn token_of_deleted_user_is_rejected() {
    let app = TestApp::new();
    let boss = app.admin("boss@example.com").await;
    let me = app.register("ana@example.com").await;

    let (status, _) = app
        .request(Method::DELETE, &format!("/users/{}", me.id), Some(me.token.as_str()), None)
        .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, body) = app
        .post(
            "/flashcards",
            Some(me.token.as_str()),
            json!({ "front": "hola", "back": "hello", "category": "Greetings" }),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED, "{body}");
    assert_eq!(body["error"], "UNAUTHORIZED");

    let (status, _) = app
        .post(
            "/practice/history",
            Some(me.token.as_str()),
            json!({ "totalQuestions": 2, "correctAnswers": 1, "score": 50.0 }),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, stats) = app.get("/admin/dashboard/stats", &boss.token).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(stats["totalUsers"], 1);
    assert_eq!(stats["totalFlashcards"], 0);
    assert_eq!(stats["totalPracticeSessions"], 0);
}

#[tokio::test]
async fn malformed_input_gets_json_error_body() {
    let app = TestApp::new();
    let me = app.register("ana@example.com").await;

    let (status, body) = app.get("/practice/random?count=-1", &me.token).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "BAD_REQUEST");
    assert!(body["message"].is_string());

    let (status, body) = app.get("/flashcards/not-a-uuid", &me.token).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "BAD_REQUEST");

    let (status, body) = app
        .post("/flashcards", Some(me.token.as_str()), json!({ "front": 42 }))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "BAD_REQUEST");
}
