mod common;

use axum::http::StatusCode;
use chrono::{Duration, Utc};
use common::{body_text, location, session_cookie, TestApp};
use eventflow::domain::models::{session::Session, user::Role};

#[tokio::test]
async fn test_anonymous_root_redirects_to_login() {
    let app = TestApp::new().await;

    let res = app.get("/", None).await;
    assert_eq!(res.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&res), "/auth/login");
}

#[tokio::test]
async fn test_root_routes_by_role() {
    let app = TestApp::new().await;
    let attendee = app.attendee().await;
    let organizer = app.organizer().await;
    app.seed_admin("root", "root-pass").await;
    let admin = app.login("root", "root-pass").await;

    assert_eq!(location(&app.get("/", Some(&attendee)).await), "/attendees");
    assert_eq!(location(&app.get("/", Some(&organizer)).await), "/organizer");
    assert_eq!(location(&app.get("/", Some(&admin)).await), "/organizer");
}

#[tokio::test]
async fn test_register_logs_in_as_attendee() {
    let app = TestApp::new().await;

    let res = app.post_form(
        "/auth/register",
        None,
        "user_name=newbie&email=newbie%40example.com&password=pw123&confirm_password=pw123",
    ).await;
    assert_eq!(res.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&res), "/");
    let cookie = session_cookie(&res).expect("registration should start a session");

    let user = app.state.user_repo.find_by_username("newbie").await.unwrap().unwrap();
    assert_eq!(user.role(), Role::Attendee);
    assert_ne!(user.password_hash, "pw123");

    assert_eq!(location(&app.get("/", Some(&cookie)).await), "/attendees");
}

#[tokio::test]
async fn test_register_validation() {
    let app = TestApp::new().await;

    let res = app.post_form(
        "/auth/register",
        None,
        "user_name=x&email=x%40example.com&password=a&confirm_password=b",
    ).await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    assert!(body_text(res).await.contains("Passwords do not match"));

    let res = app.post_form(
        "/auth/register",
        None,
        "user_name=x&email=not-an-email&password=a&confirm_password=a",
    ).await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    assert!(body_text(res).await.contains("Valid email is required"));

    let res = app.post_form("/auth/register", None, "email=x%40example.com&password=a&confirm_password=a").await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    assert!(body_text(res).await.contains("Username is required"));

    assert!(app.state.user_repo.list().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_register_duplicate_username() {
    let app = TestApp::new().await;
    app.seed_user("taken", "pw", Role::Attendee).await;

    let res = app.post_form(
        "/auth/register",
        None,
        "user_name=taken&email=t%40example.com&password=pw&confirm_password=pw",
    ).await;
    assert_eq!(res.status(), StatusCode::CONFLICT);
    assert!(body_text(res).await.contains("Username already exists"));
}

#[tokio::test]
async fn test_login_failures() {
    let app = TestApp::new().await;
    app.seed_user("ann", "right", Role::Attendee).await;

    let res = app.post_form("/auth/login", None, "user_name=ann&password=wrong").await;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    assert!(body_text(res).await.contains("Invalid username or password"));

    let res = app.post_form("/auth/login", None, "user_name=ghost&password=whatever").await;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    assert!(body_text(res).await.contains("User not found"));

    let res = app.post_form("/auth/login", None, "user_name=ann").await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    assert!(body_text(res).await.contains("Password is required"));
}

#[tokio::test]
async fn test_login_returns_to_requested_page() {
    let app = TestApp::new().await;
    app.seed_user("org", "org-pass", Role::Organizer).await;

    let res = app.get("/organizer/settings", None).await;
    assert_eq!(res.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&res), "/auth/login");
    let anonymous = session_cookie(&res).expect("anonymous session cookie");

    let res = app.post_form("/auth/login", Some(&anonymous), "user_name=org&password=org-pass").await;
    assert_eq!(res.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&res), "/organizer/settings");

    let fresh = session_cookie(&res).expect("login issues a new session");
    assert_ne!(fresh, anonymous);

    // The anonymous session is gone after login.
    let res = app.get("/", Some(&anonymous)).await;
    assert_eq!(location(&res), "/auth/login");
}

#[tokio::test]
async fn test_login_page_redirects_when_logged_in() {
    let app = TestApp::new().await;
    let cookie = app.attendee().await;

    let res = app.get("/auth/login", Some(&cookie)).await;
    assert_eq!(res.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&res), "/");

    let res = app.get("/auth/login", None).await;
    assert_eq!(res.status(), StatusCode::OK);
    assert!(body_text(res).await.contains("Login"));
}

#[tokio::test]
async fn test_attendee_cannot_reach_organizer_pages() {
    let app = TestApp::new().await;
    let cookie = app.attendee().await;

    let res = app.get("/organizer", Some(&cookie)).await;
    assert_eq!(res.status(), StatusCode::FORBIDDEN);
    assert!(body_text(res).await.contains("Access Denied"));

    let res = app.post_form("/organizer/create-event", Some(&cookie), "").await;
    assert_eq!(res.status(), StatusCode::FORBIDDEN);
    assert_eq!(app.state.event_repo.stats().await.unwrap().total_events, 0);
}

#[tokio::test]
async fn test_logout_ends_session() {
    let app = TestApp::new().await;
    let cookie = app.attendee().await;

    assert_eq!(app.get("/attendees", Some(&cookie)).await.status(), StatusCode::OK);

    let res = app.get("/auth/logout", Some(&cookie)).await;
    assert_eq!(res.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&res), "/auth/login");

    let res = app.get("/attendees", Some(&cookie)).await;
    assert_eq!(res.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&res), "/auth/login");
}

#[tokio::test]
async fn test_deleted_user_session_is_destroyed() {
    let app = TestApp::new().await;
    let user = app.seed_user("gone", "pw", Role::Attendee).await;
    let cookie = app.login("gone", "pw").await;

    sqlx::query("DELETE FROM users WHERE id = ?")
        .bind(&user.id)
        .execute(&app.pool)
        .await
        .unwrap();

    let res = app.get("/attendees", Some(&cookie)).await;
    assert_eq!(location(&res), "/auth/login");

    let token = cookie.trim_start_matches("eventflow_sid=");
    let hash = app.state.auth_service.hash_token(token);
    assert!(app.state.session_repo.find(&hash).await.unwrap().is_none());
}

#[tokio::test]
async fn test_expired_sessions_are_swept() {
    let app = TestApp::new().await;
    let now = Utc::now();

    for (hash, expires_at) in [("stale", now - Duration::hours(1)), ("live", now + Duration::hours(1))] {
        app.state.session_repo.create(&Session {
            token_hash: hash.to_string(),
            user_id: None,
            user_name: None,
            role: None,
            return_to: Some("/attendees".to_string()),
            expires_at,
            created_at: now - Duration::hours(2),
        }).await.unwrap();
    }

    let removed = app.state.auth_service.sweep_expired(now).await.unwrap();
    assert_eq!(removed, 1);
    assert!(app.state.session_repo.find("stale").await.unwrap().is_none());
    assert!(app.state.session_repo.find("live").await.unwrap().is_some());
}

#[tokio::test]
async fn test_health_check() {
    let app = TestApp::new().await;

    let res = app.get("/health", None).await;
    assert_eq!(res.status(), StatusCode::OK);
    assert!(body_text(res).await.contains("\"status\":\"ok\""));
}

#[tokio::test]
async fn test_startup_admin_reaches_organizer_pages() {
    let app = TestApp::new().await;
    let admin = app.seed_admin("root", "root-pass").await;
    assert!(admin.is_admin);
    assert_eq!(admin.role(), Role::Attendee);

    // A second startup leaves the existing account alone.
    let again = eventflow::infra::factory::ensure_admin(&app.state, "root", "other-pass").await.unwrap();
    assert!(again.is_none());
    assert_eq!(app.state.user_repo.list().await.unwrap().len(), 1);

    let cookie = app.login("root", "root-pass").await;
    let res = app.get("/organizer", Some(&cookie)).await;
    assert_eq!(res.status(), StatusCode::OK);
    let res = app.get("/organizer/settings", Some(&cookie)).await;
    assert_eq!(res.status(), StatusCode::OK);
}
