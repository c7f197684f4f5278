#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::{
    Router,
    body::Body,
    http::{Method, Request, StatusCode, header},
};
use http_body_util::BodyExt;
use order_tracking_api::{
    middleware::auth::JwtKeys,
    models::{NewUser, User},
    notify::{Notifier, OrderStatusChanged},
    repository::{MemoryOrderRepository, MemoryUserRepository, UserRepository},
    routes::create_router,
    state::AppState,
};
use serde_json::Value;
use tower::ServiceExt; // oneshot

#[derive(Default)]
pub struct RecordingNotifier {
    sent: Mutex<Vec<OrderStatusChanged>>,
}

impl RecordingNotifier {
    pub fn sent(&self) -> Vec<OrderStatusChanged> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn order_status_changed(&self, event: &OrderStatusChanged) -> anyhow::Result<()> {
        self.sent.lock().unwrap().push(event.clone());
        Ok(())
    }
}

pub struct TestApp {
    pub router: Router,
    pub orders: Arc<MemoryOrderRepository>,
    pub users: Arc<MemoryUserRepository>,
    pub notifier: Arc<RecordingNotifier>,
    pub jwt: JwtKeys,
}

impl TestApp {
    pub fn new() -> Self {
        let orders = Arc::new(MemoryOrderRepository::new());
        let users = Arc::new(MemoryUserRepository::new());
        let notifier = Arc::new(RecordingNotifier::default());
        let jwt = JwtKeys::new("integration-test-secret", chrono::Duration::hours(1));

        let state = AppState {
            orders: orders.clone(),
            users: users.clone(),
            notifier: notifier.clone(),
            jwt: jwt.clone(),
        };

        Self {
            router: create_router(state),
            orders,
            users,
            notifier,
            jwt,
        }
    }

    /// Creates a user directly in the store and returns it with a bearer token.
    pub async fn user(&self, email: &str) -> (User, String) {
        let user = self
            .users
            .create(NewUser {
                email: email.to_string(),
                password_hash: "not-used".to_string(),
            })
            .await
            .expect("create user");
        let token = self.jwt.issue(user.id).expect("issue token").token;
        (user, token)
    }

    pub async fn call(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
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

        let resp = self.router.clone().oneshot(req).await.expect("oneshot failed");
        let status = resp.status();
        let bytes = resp
            .into_body()
            .collect()
            .await
            .expect("body collect failed")
            .to_bytes();
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).expect("body is not valid JSON")
        };
        (status, json)
    }

    pub async fn get(&self, uri: &str, token: &str) -> (StatusCode, Value) {
        self.call(Method::GET, uri, Some(token), None).await
    }

    pub async fn post(&self, uri: &str, token: &str, body: Value) -> (StatusCode, Value) {
        self.call(Method::POST, uri, Some(token), Some(body)).await
    }
}
