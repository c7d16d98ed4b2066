//! Shared harness for HTTP integration tests
#![allow(dead_code)]

use axum::Router;
use axum::body::Body;
use chrono::{Datelike, Months, NaiveDate};
use http::{Method, Request, StatusCode, header};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use shared::models::{DayOfWeek, Role, User};
use tower::ServiceExt;

use escala_server::{AppState, Config, create_router, db, util};

pub const PASSWORD: &str = "senha-segura";

pub struct TestApp {
    pub router: Router,
    pub state: AppState,
}

impl TestApp {
    pub async fn new() -> Self {
        Self::with_config(Config::for_tests()).await
    }

    pub async fn with_config(config: Config) -> Self {
        let pool = db::connect("sqlite::memory:").await.unwrap();
        let state = AppState::with_pool(pool, config);
        let router = create_router(state.clone());
        Self { router, state }
    }

    pub async fn create_user(&self, login: &str, role: Role) -> User {
        let hash = util::hash_password(PASSWORD).unwrap();
        db::users::create(
            &self.state.pool,
            db::users::NewUser {
                name: &format!("Usuário {login}"),
                login,
                password_hash: &hash,
                role,
            },
        )
        .await
        .unwrap()
    }

    /// Log in with the shared test password and return the bearer token
    pub async fn login(&self, login: &str) -> String {
        let (status, body) = self
            .send(
                Method::POST,
                "/api/auth/login",
                None,
                Some(json!({ "login": login, "password": PASSWORD })),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "login failed: {body}");
        body["token"].as_str().unwrap().to_owned()
    }

    /// Create a user and log them in
    pub async fn user_with_token(&self, login: &str, role: Role) -> (User, String) {
        let user = self.create_user(login, role).await;
        let token = self.login(login).await;
        (user, token)
    }

    /// Open the submission window for every day of the week
    pub async fn open_window(&self, admin_id: i64) {
        db::settings::update(
            &self.state.pool,
            DayOfWeek::Domingo,
            DayOfWeek::Sabado,
            admin_id,
        )
        .await
        .unwrap();
    }

    /// Login attempt carrying an `X-Forwarded-For` header.
    pub async fn login_forwarded_for(&self, forwarded: &str, body: Value) -> (StatusCode, Value) {
        let request = Request::builder()
            .method(Method::POST)
            .uri("/api/auth/login")
            .header(header::CONTENT_TYPE, "application/json")
            .header("x-forwarded-for", forwarded)
            .body(Body::from(body.to_string()))
            .unwrap();
        self.dispatch(request).await
    }

    pub async fn send(
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
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };
        self.dispatch(request).await
    }

    /// Run a prebuilt request (custom headers) through the router.
    pub async fn dispatch(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or_else(|_| {
                Value::String(String::from_utf8_lossy(&bytes).into_owned())
            })
        };
        (status, value)
    }

    pub async fn get(&self, uri: &str, token: &str) -> (StatusCode, Value) {
        self.send(Method::GET, uri, Some(token), None).await
    }

    pub async fn post(&self, uri: &str, token: &str, body: Value) -> (StatusCode, Value) {
        self.send(Method::POST, uri, Some(token), Some(body)).await
    }

    pub async fn patch(&self, uri: &str, token: &str, body: Value) -> (StatusCode, Value) {
        self.send(Method::PATCH, uri, Some(token), Some(body)).await
    }

    pub async fn put(&self, uri: &str, token: &str, body: Value) -> (StatusCode, Value) {
        self.send(Method::PUT, uri, Some(token), Some(body)).await
    }

    pub async fn delete(&self, uri: &str, token: &str) -> (StatusCode, Value) {
        self.send(Method::DELETE, uri, Some(token), None).await
    }

    /// Today in the configured business timezone
    pub fn today(&self) -> NaiveDate {
        self.state.today()
    }

    /// Valid swap/payback dates: the 10th and 20th of next month
    pub fn next_month_dates(&self) -> (NaiveDate, NaiveDate) {
        let today = self.today();
        let first = NaiveDate::from_ymd_opt(today.year(), today.month(), 1).unwrap()
            + Months::new(1);
        (first.with_day(10).unwrap(), first.with_day(20).unwrap())
    }

    pub fn request_body(&self, event_type: &str, out: &str, inn: &str) -> Value {
        let (swap, payback) = self.next_month_dates();
        json!({
            "employeeIdOut": out,
            "employeeIdIn": inn,
            "swapDate": swap,
            "paybackDate": payback,
            "employeeFunction": "MOTORISTA",
            "groupOut": "A",
            "groupIn": "B",
            "eventType": event_type,
        })
    }
}
