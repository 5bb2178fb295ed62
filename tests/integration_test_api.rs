mod common;

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
};
use common::{parse_body, TestApp, TEST_PASSWORD};
use serde_json::json;
use setlist_backend::{
    domain::models::user::Permission,
    infra::factory::sqlite_repositories,
    seed_admin,
    state::AppState,
};
use tower::ServiceExt;

#[tokio::test]
async fn test_health() {
    let app = TestApp::new().await;

    let response = app.request("GET", "/health", None, None).await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_registration_always_yields_guest() {
    let app = TestApp::new().await;

    let payload = json!({
        "email": "new@example.com",
        "password": "hunter22",
        "first_name": "New",
        "last_name": "Member",
        "permission": "ADMIN"
    });

    let response = app.request("POST", "/api/v1/users", None, Some(payload)).await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let body = parse_body(response).await;
    assert_eq!(body["user"]["email"], "new@example.com");
    assert_eq!(body["user"]["permission"], "GUEST");
    assert!(body["user"].get("password_hash").is_none());
}

#[tokio::test]
async fn test_duplicate_email_is_rejected() {
    let app = TestApp::new().await;
    app.create_user("dup@example.com", Permission::Member).await;

    let payload = json!({
        "email": "dup@example.com",
        "password": "hunter22",
        "first_name": "Dup",
        "last_name": "Licate"
    });

    let response = app.request("POST", "/api/v1/users", None, Some(payload)).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_login_me_and_token_lifecycle() {
    let app = TestApp::new().await;
    let user = app.create_user("singer@example.com", Permission::Member).await;

    let login = app.request("POST", "/api/v1/users/login", None, Some(json!({
        "email": "singer@example.com",
        "password": TEST_PASSWORD
    }))).await;
    assert_eq!(login.status(), StatusCode::OK);

    let body = parse_body(login).await;
    let access = body["access"].as_str().unwrap().to_string();
    let refresh = body["refresh"].as_str().unwrap().to_string();
    assert_eq!(body["user"]["id"], user.id);

    // Presenting a live refresh token on login reuses it
    let again = app.request("POST", "/api/v1/users/login", None, Some(json!({
        "email": "singer@example.com",
        "password": TEST_PASSWORD,
        "refresh": refresh
    }))).await;
    let again = parse_body(again).await;
    assert_eq!(again["refresh"], refresh.as_str());

    let me = app.request("GET", "/api/v1/me", Some(access.as_str()), None).await;
    assert_eq!(me.status(), StatusCode::OK);
    let me = parse_body(me).await;
    assert_eq!(me["user"]["email"], "singer@example.com");
    assert_eq!(me["user"]["permission"], "MEMBER");

    let renewed = app.request("POST", "/api/v1/tokens/renew", None, Some(json!({"refresh": refresh}))).await;
    assert_eq!(renewed.status(), StatusCode::OK);
    let renewed = parse_body(renewed).await;
    assert!(!renewed["access"].as_str().unwrap().is_empty());

    let logout = app.request("POST", "/api/v1/me/logout", Some(access.as_str()), Some(json!({"refresh": refresh}))).await;
    assert_eq!(logout.status(), StatusCode::OK);

    let revoked = app.request("POST", "/api/v1/tokens/renew", None, Some(json!({"refresh": refresh}))).await;
    assert_eq!(revoked.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_wrong_password_and_unknown_email_fail_alike() {
    let app = TestApp::new().await;
    app.create_user("known@example.com", Permission::Member).await;

    let wrong_password = app.request("POST", "/api/v1/users/login", None, Some(json!({
        "email": "known@example.com",
        "password": "nope"
    }))).await;
    let unknown_email = app.request("POST", "/api/v1/users/login", None, Some(json!({
        "email": "unknown@example.com",
        "password": TEST_PASSWORD
    }))).await;

    assert_eq!(wrong_password.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(unknown_email.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(parse_body(wrong_password).await, parse_body(unknown_email).await);
}

#[tokio::test]
async fn test_renew_without_token_is_bad_request() {
    let app = TestApp::new().await;

    let response = app.request("POST", "/api/v1/tokens/renew", None, Some(json!({"refresh": ""}))).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_authorization_header_errors() {
    let app = TestApp::new().await;

    let missing = app.request("GET", "/api/v1/me", None, None).await;
    assert_eq!(missing.status(), StatusCode::UNAUTHORIZED);

    for value in ["Token abc", "Bearer", "Bearer a b"] {
        let response = app.router.clone().oneshot(
            Request::builder()
                .method("GET")
                .uri("/api/v1/me")
                .header(header::AUTHORIZATION, value)
                .body(Body::empty())
                .unwrap()
        ).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "header {:?}", value);
    }

    let garbage = app.request("GET", "/api/v1/me", Some("not.a.jwt"), None).await;
    assert_eq!(garbage.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_update_and_delete_me() {
    let app = TestApp::new().await;
    let (_, token) = app.user_with_token("leaving@example.com", Permission::Member).await;

    let updated = app.request("PUT", "/api/v1/me", Some(token.as_str()), Some(json!({
        "first_name": "Renamed",
        "last_name": "Person",
        "profile_color": "#ff0000",
        "password": "a-new-password"
    }))).await;
    assert_eq!(updated.status(), StatusCode::OK);
    let updated = parse_body(updated).await;
    assert_eq!(updated["user"]["first_name"], "Renamed");

    app.login("leaving@example.com", "a-new-password").await;

    let deleted = app.request("DELETE", "/api/v1/me", Some(token.as_str()), None).await;
    assert_eq!(deleted.status(), StatusCode::OK);

    let gone = app.request("GET", "/api/v1/me", Some(token.as_str()), None).await;
    assert_eq!(gone.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_tokens_of_removed_users_are_refused() {
    let app = TestApp::new().await;
    let (_, token) = app.user_with_token("gone-editor@example.com", Permission::Editor).await;

    let deleted = app.request("DELETE", "/api/v1/me", Some(token.as_str()), None).await;
    assert_eq!(deleted.status(), StatusCode::OK);

    let created = app.request("POST", "/api/v1/bundles", Some(token.as_str()), Some(json!({
        "name": "Left Behind",
        "parent_id": 0
    }))).await;
    assert_eq!(created.status(), StatusCode::UNAUTHORIZED);

    let bundles: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM bundles")
        .fetch_one(&app.pool)
        .await
        .unwrap();
    assert_eq!(bundles, 0);
}

#[tokio::test]
async fn test_demotion_applies_to_existing_tokens() {
    let app = TestApp::new().await;
    let (_, admin_token) = app.user_with_token("admin@example.com", Permission::Admin).await;
    let (editor, editor_token) = app.user_with_token("editor@example.com", Permission::Editor).await;

    let demoted = app.request(
        "PUT",
        &format!("/api/v1/users/{}/permission", editor.id),
        Some(admin_token.as_str()),
        Some(json!({"permission": "GUEST"})),
    ).await;
    assert_eq!(demoted.status(), StatusCode::OK);

    let created = app.request("POST", "/api/v1/bundles", Some(editor_token.as_str()), Some(json!({
        "name": "Hymns",
        "parent_id": 0
    }))).await;
    assert_eq!(created.status(), StatusCode::UNAUTHORIZED);

    let me = app.request("GET", "/api/v1/me", Some(editor_token.as_str()), None).await;
    assert_eq!(me.status(), StatusCode::OK);
    assert_eq!(parse_body(me).await["user"]["permission"], "GUEST");
}

#[tokio::test]
async fn test_admin_seed_runs_once() {
    let app = TestApp::new().await;

    let mut config = app.state.config.clone();
    config.admin_email = Some("root@example.com".to_string());
    config.admin_password = Some(TEST_PASSWORD.to_string());
    let state = AppState::new(config, sqlite_repositories(app.pool.clone()));

    assert!(seed_admin(&state).await.unwrap());
    assert!(!seed_admin(&state).await.unwrap());

    let token = app.login("root@example.com", TEST_PASSWORD).await;
    let me = app.request("GET", "/api/v1/me", Some(token.as_str()), None).await;
    assert_eq!(me.status(), StatusCode::OK);
    assert_eq!(parse_body(me).await["user"]["permission"], "ADMIN");

    let admins: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users WHERE email = 'root@example.com'")
        .fetch_one(&app.pool)
        .await
        .unwrap();
    assert_eq!(admins, 1);
}

#[tokio::test]
async fn test_admin_seed_without_credentials_is_skipped() {
    let app = TestApp::new().await;
    assert!(!seed_admin(&app.state).await.unwrap());
}

#[tokio::test]
async fn test_permission_changes_require_admin() {
    let app = TestApp::new().await;
    let (_, admin_token) = app.user_with_token("admin@example.com", Permission::Admin).await;
    let (member, member_token) = app.user_with_token("member@example.com", Permission::Member).await;

    let uri = format!("/api/v1/users/{}/permission", member.id);

    let denied = app.request("PUT", &uri, Some(member_token.as_str()), Some(json!({"permission": "ADMIN"}))).await;
    assert_eq!(denied.status(), StatusCode::UNAUTHORIZED);

    let granted = app.request("PUT", &uri, Some(admin_token.as_str()), Some(json!({"permission": "EDITOR"}))).await;
    assert_eq!(granted.status(), StatusCode::OK);
    let body = parse_body(granted).await;
    assert_eq!(body["user"]["permission"], "EDITOR");

    let other_delete = app.request("DELETE", &format!("/api/v1/users/{}", member.id + 100), Some(member_token.as_str()), None).await;
    assert_eq!(other_delete.status(), StatusCode::UNAUTHORIZED);
}
