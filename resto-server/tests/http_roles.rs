//! HTTP 层认证和角色门禁集成测试
//!
//! 通过 `tower::ServiceExt::oneshot` 直接驱动完整的中间件栈，不监听端口。

use axum::Router;
use axum::body::{Body, to_bytes};
use http::{Request, StatusCode, header};
use serde_json::{Value, json};
use std::sync::Arc;
use tower::ServiceExt;

use resto_server::core::server::build_app;
use resto_server::{Config, ServerState};
use shared::{JwtConfig, JwtService};
use surrealdb::Surreal;
use surrealdb::engine::local::Mem;

async fn test_app() -> Router {
    let db = Surreal::new::<Mem>(()).await.expect("mem engine");
    db.use_ns("resto").use_db("test").await.expect("ns/db");
    resto_server::db::define_schema(&db).await.expect("schema");

    let jwt = JwtConfig {
        secret: "integration-test-secret-key-0123456789abcdef".into(),
        expiration_minutes: 60,
        issuer: "resto-server".into(),
        audience: "api-clients".into(),
    };
    let config = Config {
        work_dir: "unused".into(),
        http_port: 0,
        jwt: jwt.clone(),
        environment: "test".into(),
    };
    let state = ServerState::new(config, db, Arc::new(JwtService::with_config(jwt)));
    build_app(state)
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.expect("body");
    serde_json::from_slice(&bytes).expect("json body")
}

fn json_request(method: &str, uri: &str, token: Option<&str>, body: Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    builder.body(Body::from(body.to_string())).expect("request")
}

/// 注册并登录，返回 token
async fn login_as(app: &Router, name: &str, role: &str) -> String {
    let email = format!("{}@example.com", name);
    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/users/register",
            None,
            json!({
                "name": name,
                "email": email,
                "password": "secret123",
                "role": role
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/users/login",
            None,
            json!({"email": email, "password": "secret123"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    body["token"].as_str().expect("token").to_string()
}

#[tokio::test]
async fn health_is_public() {
    let app = test_app().await;
    let response = app
        .oneshot(Request::get("/api/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn protected_routes_require_token() {
    let app = test_app().await;
    let response = app
        .oneshot(Request::get("/api/menu").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let body = body_json(response).await;
    assert_eq!(body["code"], "E1001");
}

#[tokio::test]
async fn waiter_cannot_manage_menu() {
    let app = test_app().await;
    let token = login_as(&app, "maria", "waiter").await;

    // 读菜单可以
    let response = app
        .clone()
        .oneshot(
            Request::get("/api/menu")
                .header(header::AUTHORIZATION, format!("Bearer {}", token))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    // 写菜单被角色门禁挡下
    let response = app
        .oneshot(json_request(
            "POST",
            "/api/menu",
            Some(&token),
            json!({"name": "Burger", "category": "main", "price": 10.0}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    let body = body_json(response).await;
    assert_eq!(body["code"], "E2001");
}

#[tokio::test]
async fn admin_can_manage_menu() {
    let app = test_app().await;
    let token = login_as(&app, "boss", "admin").await;

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/menu",
            Some(&token),
            json!({"name": "Burger", "category": "main", "price": 10.0}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["name"], "Burger");
    assert_eq!(body["available"], true);
}

#[tokio::test]
async fn reports_are_manager_only() {
    let app = test_app().await;
    let waiter_token = login_as(&app, "maria", "waiter").await;
    let manager_token = login_as(&app, "sam", "manager").await;

    let response = app
        .clone()
        .oneshot(
            Request::get("/api/reports/daily-sales")
                .header(header::AUTHORIZATION, format!("Bearer {}", waiter_token))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = app
        .oneshot(
            Request::get("/api/reports/daily-sales")
                .header(header::AUTHORIZATION, format!("Bearer {}", manager_token))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["total_orders"], 0);
}

#[tokio::test]
async fn login_refreshes_last_login() {
    let app = test_app().await;
    let token = login_as(&app, "maria", "waiter").await;

    let response = app
        .oneshot(
            Request::get("/api/users/me")
                .header(header::AUTHORIZATION, format!("Bearer {}", token))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["email"], "maria@example.com");
    assert!(body.get("hash_pass").is_none());
    assert!(body["last_login"].is_i64());
}
