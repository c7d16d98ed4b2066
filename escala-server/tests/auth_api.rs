mod common;

use common::{PASSWORD, TestApp};
use escala_server::Config;
use http::{Method, StatusCode};
use serde_json::json;
use shared::models::Role;

#[tokio::test]
async fn test_health_is_public() {
    let app = TestApp::new().await;
    let (status, body) = app.send(Method::GET, "/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["service"], "escala-server");
}

#[tokio::test]
async fn test_login_trims_and_ignores_case() {
    let app = TestApp::new().await;
    let user = app.create_user("Joao.Silva", Role::Encarregado).await;

    let (status, body) = app
        .send(
            Method::POST,
            "/api/auth/login",
            None,
            Some(json!({ "login": "  joao.silva ", "password": PASSWORD })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["token"].as_str().is_some_and(|t| !t.is_empty()));
    assert_eq!(body["user"]["id"], user.id);
    assert_eq!(body["user"]["role"], "ENCARREGADO");
    assert!(body["user"].get("passwordHash").is_none());

    let token = body["token"].as_str().unwrap();
    let (status, me) = app.get("/api/auth/me", token).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(me["login"], "Joao.Silva");
}

#[tokio::test]
async fn test_login_failures_share_one_error() {
    let app = TestApp::new().await;
    app.create_user("4001", Role::Encarregado).await;

    for login in ["4001", "nao-existe"] {
        let (status, body) = app
            .send(
                Method::POST,
                "/api/auth/login",
                None,
                Some(json!({ "login": login, "password": "errada" })),
            )
            .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["code"], 1002);
    }

    let failures: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM audit_logs WHERE action = 'LOGIN_FAILED'")
            .fetch_one(&app.state.pool)
            .await
            .unwrap();
    assert_eq!(failures, 2);
}

#[tokio::test]
async fn test_inactive_user_cannot_login_or_use_token() {
    let app = TestApp::new().await;
    let (user, token) = app.user_with_token("4002", Role::Encarregado).await;
    escala_server::db::users::set_active(&app.state.pool, user.id, false)
        .await
        .unwrap();

    let (status, body) = app
        .send(
            Method::POST,
            "/api/auth/login",
            None,
            Some(json!({ "login": "4002", "password": PASSWORD })),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], 1005);

    let (user_id, details): (Option<i64>, String) =
        sqlx::query_as("SELECT user_id, details FROM audit_logs WHERE action = 'LOGIN_FAILED'")
            .fetch_one(&app.state.pool)
            .await
            .unwrap();
    let details: serde_json::Value = serde_json::from_str(&details).unwrap();
    assert_eq!(user_id, Some(user.id));
    assert_eq!(details["reason"], "account_disabled");

    let (status, body) = app.get("/api/auth/me", &token).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], 1005);
}

#[tokio::test]
async fn test_missing_or_bad_token() {
    let app = TestApp::new().await;

    let (status, body) = app.send(Method::GET, "/api/auth/me", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], 1001);

    let (status, _) = app.get("/api/auth/me", "not-a-jwt").await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_register_requires_admin() {
    let app = TestApp::new().await;
    let (_, admin) = app.user_with_token("9000", Role::Administrador).await;
    let (_, enc) = app.user_with_token("4003", Role::Encarregado).await;

    let payload = json!({
        "name": "Maria Lima",
        "login": "4004",
        "password": "segredo123",
        "role": "ENCARREGADO",
    });

    let (status, body) = app.post("/api/auth/register", &enc, payload.clone()).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["code"], 2002);

    let (status, body) = app.post("/api/auth/register", &admin, payload.clone()).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["login"], "4004");
    assert_eq!(body["isActive"], true);

    let (status, body) = app.post("/api/auth/register", &admin, payload).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], 3002);

    // New account can log in with the password it was registered with
    let (status, body) = app
        .send(
            Method::POST,
            "/api/auth/login",
            None,
            Some(json!({ "login": "4004", "password": "segredo123" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user"]["login"], "4004");
}

#[tokio::test]
async fn test_register_validation() {
    let app = TestApp::new().await;
    let (_, admin) = app.user_with_token("9000", Role::Administrador).await;

    let (status, body) = app
        .post(
            "/api/auth/register",
            &admin,
            json!({ "name": "   ", "login": "4005", "password": "123", "role": "ENCARREGADO" }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], 2);
    assert!(body["details"]["fields"]["password"].is_array());
}

#[tokio::test]
async fn test_login_rate_limited() {
    let config = Config {
        login_rate_limit: 2,
        ..Config::for_tests()
    };
    let app = TestApp::with_config(config).await;

    let attempt = json!({ "login": "ninguem", "password": "x" });
    for _ in 0..2 {
        let (status, _) = app
            .send(Method::POST, "/api/auth/login", None, Some(attempt.clone()))
            .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    let (status, body) = app
        .send(Method::POST, "/api/auth/login", None, Some(attempt))
        .await;
    assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);
    assert_eq!(body["code"], 6);
}

#[tokio::test]
async fn test_forwarded_for_ignored_without_trusted_proxy() {
    let config = Config {
        login_rate_limit: 2,
        ..Config::for_tests()
    };
    let app = TestApp::with_config(config).await;

    let attempt = json!({ "login": "ninguem", "password": "x" });
    let mut limited = 0;
    for i in 0..20 {
        let (status, _) = app
            .login_forwarded_for(&format!("10.9.9.{i}"), attempt.clone())
            .await;
        if status == StatusCode::TOO_MANY_REQUESTS {
            limited += 1;
        }
    }
    assert_eq!(limited, 18);
}

#[tokio::test]
async fn test_forwarded_for_used_behind_trusted_proxy() {
    let config = Config {
        login_rate_limit: 2,
        trust_proxy: true,
        ..Config::for_tests()
    };
    let app = TestApp::with_config(config).await;

    let attempt = json!({ "login": "ninguem", "password": "x" });
    for i in 0..5 {
        let (status, _) = app
            .login_forwarded_for(&format!("10.9.9.{i}"), attempt.clone())
            .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    let (status, _) = app.login_forwarded_for("10.9.9.1", attempt.clone()).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    let (status, _) = app.login_forwarded_for("10.9.9.1", attempt).await;
    assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);
}
