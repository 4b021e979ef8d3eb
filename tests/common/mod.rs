#![allow(dead_code)]

use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use serde_json::Value;
use tower::ServiceExt;
use uuid::Uuid;
use wordbook::{app::build_app, state::AppState, types::Role};

pub struct TestApp {
    pub router: Router,
    pub state: AppState,
}

pub struct Session {
    pub id: Uuid,
    pub token: String,
}

impl TestApp {
    pub fn new() -> Self {
        let state = AppState::in_memory();
        Self {
            router: build_app(state.clone()),
            state,
        }
    }

    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder()
            .method(method)
            .uri(format!("/api/v1{uri}"));
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        let req = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let res = self.router.clone().oneshot(req).await.unwrap();
        let status = res.status();
        let bytes = to_bytes(res.into_body(), usize::MAX).await.unwrap();
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        (status, json)
    }

    pub async fn get(&self, uri: &str, token: &str) -> (StatusCode, Value) {
        self.request(Method::GET, uri, Some(token), None).await
    }

    pub async fn post(&self, uri: &str, token: Option<&str>, body: Value) -> (StatusCode, Value) {
        self.request(Method::POST, uri, token, Some(body)).await
    }

    pub async fn patch(&self, uri: &str, token: &str, body: Value) -> (StatusCode, Value) {
        self.request(Method::PATCH, uri, Some(token), Some(body)).await
    }

    pub async fn register(&self, email: &str) -> Session {
        let (status, body) = self
            .post(
                "/auth/register",
                None,
                serde_json::json!({
                    "email": email,
                    "name": "Test User",
                    "password": "secret-pass",
                }),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "{body}");
        Session {
            id: body["user"]["id"].as_str().unwrap().parse().unwrap(),
            token: body["accessToken"].as_str().unwrap().to_string(),
        }
    }

    /// Registers a user, promotes them and logs in again so the token carries the admin role.
    pub async fn admin(&self, email: &str) -> Session {
        let user = self.register(email).await;
        self.state
            .store
            .users
            .set_role(user.id, Role::Admin)
            .await
            .unwrap();
        let (status, body) = self
            .post(
                "/auth/login",
                None,
                serde_json::json!({ "email": email, "password": "secret-pass" }),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "{body}");
        Session {
            id: user.id,
            token: body["accessToken"].as_str().unwrap().to_string(),
        }
    }
}
