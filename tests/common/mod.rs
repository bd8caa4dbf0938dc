#![allow(dead_code)]

use anyhow::{Context, Result};
use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;

use timesheet::app::{self, AppState};
use timesheet::config::AppConfig;
use timesheet::testing;

pub const ADMIN: (&str, &str) = ("admin", "admin123");

/// The full router over a private in-memory database
pub struct TestApp {
    router: Router,
    pub state: AppState,
}

pub struct TestResponse {
    pub status: StatusCode,
    pub body: Value,
    pub set_cookie: Option<String>,
}

impl TestResponse {
    /// `name=value` part of the Set-Cookie header, ready for a Cookie header
    pub fn cookie(&self) -> Option<String> {
        self.set_cookie
            .as_deref()
            .and_then(|c| c.split(';').next())
            .map(str::to_string)
    }
}

impl TestApp {
    pub async fn spawn() -> Self {
        Self::spawn_with(AppConfig::testing()).await
    }

    pub async fn spawn_with(config: AppConfig) -> Self {
        let state = testing::test_state_with(config).await;
        let router = app::router(state.clone());
        Self { router, state }
    }

    pub async fn send(&self, method: Method, path: &str, cookie: Option<&str>, body: Option<Body>) -> Result<TestResponse> {
        let mut builder = Request::builder().method(method).uri(path);
        if let Some(cookie) = cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        let request = match body {
            Some(body) => builder.header(header::CONTENT_TYPE, "application/json").body(body)?,
            None => builder.body(Body::empty())?,
        };

        let response = self.router.clone().oneshot(request).await.context("router call")?;
        let status = response.status();
        let set_cookie = response
            .headers()
            .get(header::SET_COOKIE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await?;
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).context("response body is not JSON")?
        };

        Ok(TestResponse { status, body, set_cookie })
    }

    pub async fn get(&self, path: &str, cookie: Option<&str>) -> Result<TestResponse> {
        self.send(Method::GET, path, cookie, None).await
    }

    pub async fn post(&self, path: &str, cookie: Option<&str>, body: Value) -> Result<TestResponse> {
        self.send(Method::POST, path, cookie, Some(Body::from(body.to_string()))).await
    }

    pub async fn put(&self, path: &str, cookie: Option<&str>, body: Value) -> Result<TestResponse> {
        self.send(Method::PUT, path, cookie, Some(Body::from(body.to_string()))).await
    }

    pub async fn delete(&self, path: &str, cookie: Option<&str>) -> Result<TestResponse> {
        self.send(Method::DELETE, path, cookie, None).await
    }

    /// Log in and return the session cookie
    pub async fn login(&self, username: &str, password: &str) -> Result<String> {
        let res = self
            .post("/api/auth/login", None, json!({ "username": username, "password": password }))
            .await?;
        anyhow::ensure!(res.status == StatusCode::OK, "login failed: {} {}", res.status, res.body);
        res.cookie().context("login did not set a cookie")
    }

    pub async fn login_admin(&self) -> Result<String> {
        self.login(ADMIN.0, ADMIN.1).await
    }

    /// Create an account through the API and log in as it
    pub async fn employee(&self, admin: &str, username: &str) -> Result<(i64, String)> {
        let res = self
            .post(
                "/api/users",
                Some(admin),
                json!({
                    "username": username,
                    "password": "password1",
                    "fullName": format!("{} Tester", username),
                    "role": "employee"
                }),
            )
            .await?;
        anyhow::ensure!(res.status == StatusCode::CREATED, "create user failed: {}", res.body);
        let id = res.body["id"].as_i64().context("user id")?;
        Ok((id, self.login(username, "password1").await?))
    }

    pub async fn task(&self, admin: &str, name: &str) -> Result<i64> {
        let res = self.post("/api/tasks", Some(admin), json!({ "taskName": name })).await?;
        anyhow::ensure!(res.status == StatusCode::CREATED, "create task failed: {}", res.body);
        res.body["id"].as_i64().context("task id")
    }

    pub async fn entry(&self, cookie: &str, task_id: i64, hours: f64, date: &str) -> Result<i64> {
        let res = self
            .post(
                "/api/timesheet",
                Some(cookie),
                json!({ "taskId": task_id, "hoursSpent": hours, "entryDate": date }),
            )
            .await?;
        anyhow::ensure!(res.status == StatusCode::CREATED, "create entry failed: {}", res.body);
        res.body["id"].as_i64().context("entry id")
    }
}
