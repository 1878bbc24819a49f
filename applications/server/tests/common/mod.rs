/// Common test utilities and fixtures
use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use cadence_core::{SubscriptionTier, User};
use cadence_providers::MockProvider;
use cadence_server::{create_router, AppState, AuthService, ResponseCache};
use cadence_storage::{
    users::{self, NewUser},
    Database,
};
use serde_json::Value;
use std::sync::Arc;
use tower::util::ServiceExt;

pub const TEST_PASSWORD: &str = "TestPassword123!";

/// Router over an in-memory database and a seeded mock catalogue
pub struct TestApp {
    pub router: Router,
    pub state: AppState,
}

impl TestApp {
    pub async fn new() -> Self {
        let db = Database::connect("sqlite::memory:")
            .await
            .expect("Failed to create test database");

        let auth_service =
            Arc::new(AuthService::new("test-secret-key".to_string(), 15, 7).with_bcrypt_cost(4));

        let state = AppState::new(
            db,
            auth_service,
            Arc::new(MockProvider::with_seed(42)),
            Arc::new(ResponseCache::new(64)),
        );
        let router = create_router(state.clone(), None);

        Self { router, state }
    }

    /// Register a user directly in storage and return an access token
    pub async fn create_user(&self, email: &str) -> (User, String) {
        let password_hash = self.state.auth_service.hash_password(TEST_PASSWORD).unwrap();
        let user = users::create(
            self.state.db.pool(),
            NewUser {
                email: email.to_string(),
                password_hash,
                display_name: email.split('@').next().unwrap().to_string(),
                avatar: None,
            },
        )
        .await
        .unwrap();

        let token = self.state.auth_service.create_access_token(&user.id).unwrap();
        (user, token)
    }

    pub async fn make_premium(&self, user: &User) {
        users::set_subscription_tier(self.state.db.pool(), &user.id, SubscriptionTier::Premium)
            .await
            .unwrap();
    }

    /// Send a request and decode the JSON response body (`Null` when empty)
    pub async fn send(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(serde_json::to_vec(&json).unwrap()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        (status, json)
    }

    pub async fn get(&self, uri: &str, token: Option<&str>) -> (StatusCode, Value) {
        self.send(Method::GET, uri, token, None).await
    }

    pub async fn post(&self, uri: &str, token: Option<&str>, body: Value) -> (StatusCode, Value) {
        self.send(Method::POST, uri, token, Some(body)).await
    }
}
