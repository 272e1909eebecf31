mod common;

use axum::http::StatusCode;
use common::{body_text, location, TestApp};
use eventflow::domain::models::{
    booking::{Booking, TicketType},
    event::EventStatus,
};
use axum::{body::Body, http::{header, Request}};
use chrono::Utc;
use serde_json::Value;
use tower::ServiceExt;

#[tokio::test]
async fn test_create_event_starts_as_draft_with_defaults() {
    let app = TestApp::new().await;
    let cookie = app.organizer().await;

    let res = app.post_form("/organizer/create-event", Some(&cookie), "").await;
    assert_eq!(res.status(), StatusCode::SEE_OTHER);
    let target = location(&res);
    let id = target.strip_prefix("/organizer/edit-event/").expect("redirects to the edit page");

    let event = app.state.event_repo.find_by_id(id).await.unwrap().unwrap();
    assert_eq!(event.status(), Some(EventStatus::Draft));
    assert_eq!(event.title, "New Event");
    assert_eq!((event.tickets_general, event.tickets_vip), (50, 10));
    assert!(event.published_at.is_none());

    let res = app.get(&target, Some(&cookie)).await;
    assert_eq!(res.status(), StatusCode::OK);
    assert!(body_text(res).await.contains("New Event"));
}

#[tokio::test]
async fn test_edit_event_updates_fields() {
    let app = TestApp::new().await;
    let cookie = app.organizer().await;
    let res = app.post_form("/organizer/create-event", Some(&cookie), "").await;
    let target = location(&res);
    let id = target.trim_start_matches("/organizer/edit-event/").to_string();

    let res = app.post_form(
        &target,
        Some(&cookie),
        "title=Rust+Meetup&description=Talks&date=2026-10-23T18%3A00&tickets_general=120&tickets_vip=-4",
    ).await;
    assert_eq!(res.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&res), "/organizer");

    let event = app.state.event_repo.find_by_id(&id).await.unwrap().unwrap();
    assert_eq!(event.title, "Rust Meetup");
    assert_eq!(event.description, "Talks");
    assert_eq!(event.date.format("%Y-%m-%dT%H:%M").to_string(), "2026-10-23T18:00");
    assert_eq!(event.tickets_general, 120);
    assert_eq!(event.tickets_vip, 0);
    assert_eq!(event.status(), Some(EventStatus::Draft));
}

#[tokio::test]
async fn test_edit_event_non_numeric_capacity_is_zero() {
    let app = TestApp::new().await;
    let cookie = app.organizer().await;
    let target = location(&app.post_form("/organizer/create-event", Some(&cookie), "").await);
    let id = target.trim_start_matches("/organizer/edit-event/").to_string();

    let res = app.post_form(
        &target,
        Some(&cookie),
        "title=Gala&date=2026-12-31T20%3A00&tickets_general=lots&tickets_vip=5",
    ).await;
    assert_eq!(res.status(), StatusCode::SEE_OTHER);

    let event = app.state.event_repo.find_by_id(&id).await.unwrap().unwrap();
    assert_eq!((event.tickets_general, event.tickets_vip), (0, 5));
}

#[tokio::test]
async fn test_edit_event_rejects_invalid_input() {
    let app = TestApp::new().await;
    let cookie = app.organizer().await;
    let target = location(&app.post_form("/organizer/create-event", Some(&cookie), "").await);
    let id = target.trim_start_matches("/organizer/edit-event/").to_string();

    let res = app.post_form(&target, Some(&cookie), "title=+++&date=2026-10-23T18%3A00").await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    assert!(body_text(res).await.contains("Title is required"));

    let res = app.post_form(&target, Some(&cookie), "title=Gala&date=next+friday").await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    assert!(body_text(res).await.contains("A valid date and time is required"));

    let event = app.state.event_repo.find_by_id(&id).await.unwrap().unwrap();
    assert_eq!(event.title, "New Event");
}

#[tokio::test]
async fn test_edit_unknown_event_is_not_found() {
    let app = TestApp::new().await;
    let cookie = app.organizer().await;

    let res = app.get("/organizer/edit-event/missing", Some(&cookie)).await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    let res = app.post_form("/organizer/edit-event/missing", Some(&cookie), "title=X&date=2026-10-23T18%3A00").await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_publish_is_one_way_and_idempotent() {
    let app = TestApp::new().await;
    let cookie = app.organizer().await;
    let target = location(&app.post_form("/organizer/create-event", Some(&cookie), "").await);
    let id = target.trim_start_matches("/organizer/edit-event/").to_string();

    let res = app.post_form(&format!("/organizer/publish-event/{id}"), Some(&cookie), "").await;
    assert_eq!(res.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&res), "/organizer");

    let first = app.state.event_repo.find_by_id(&id).await.unwrap().unwrap();
    assert_eq!(first.status(), Some(EventStatus::Published));
    let published_at = first.published_at.expect("publish sets published_at");

    let res = app.post_form(&format!("/organizer/publish-event/{id}"), Some(&cookie), "").await;
    assert_eq!(res.status(), StatusCode::SEE_OTHER);

    let second = app.state.event_repo.find_by_id(&id).await.unwrap().unwrap();
    assert_eq!(second.published_at, Some(published_at));
}

#[tokio::test]
async fn test_delete_event_removes_bookings() {
    let app = TestApp::new().await;
    let cookie = app.organizer().await;
    let event = app.published_event("Doomed", 10, 2).await;

    let booking = Booking::new(event.id.clone(), "Ann".into(), TicketType::General, 3, None, Utc::now());
    app.state.booking_repo.create(&booking).await.unwrap();

    let res = app.post_form(&format!("/organizer/delete-event/{}", event.id), Some(&cookie), "").await;
    assert_eq!(res.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&res), "/organizer");

    assert!(app.state.event_repo.find_by_id(&event.id).await.unwrap().is_none());
    assert!(app.state.booking_repo.list_by_event(&event.id).await.unwrap().is_empty());

    let res = app.post_form(&format!("/organizer/delete-event/{}", event.id), Some(&cookie), "").await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_dashboard_lists_published_and_drafts() {
    let app = TestApp::new().await;
    let cookie = app.organizer().await;
    app.published_event("Live Show", 5, 1).await;
    app.post_form("/organizer/create-event", Some(&cookie), "").await;

    let res = app.get("/organizer", Some(&cookie)).await;
    assert_eq!(res.status(), StatusCode::OK);
    let html = body_text(res).await;
    assert!(html.contains("Live Show"));
    assert!(html.contains("New Event"));

    // Trailing slash variant.
    assert_eq!(app.get("/organizer/", Some(&cookie)).await.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_drafts_are_hidden_from_attendees() {
    let app = TestApp::new().await;
    let organizer = app.organizer().await;
    let attendee = app.attendee().await;

    let target = location(&app.post_form("/organizer/create-event", Some(&organizer), "").await);
    let draft_id = target.trim_start_matches("/organizer/edit-event/").to_string();
    app.post_form(&target, Some(&organizer), "title=Secret+Draft&date=2026-11-01T10%3A00").await;
    app.published_event("Open Day", 10, 0).await;

    let html = body_text(app.get("/attendees", Some(&attendee)).await).await;
    assert!(html.contains("Open Day"));
    assert!(!html.contains("Secret Draft"));

    let res = app.get(&format!("/attendees/event/{draft_id}"), Some(&attendee)).await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    assert!(body_text(res).await.contains("Event Not Found"));
}

#[tokio::test]
async fn test_sharing_link() {
    let app = TestApp::new().await;
    let cookie = app.organizer().await;
    let event = app.published_event("Shared", 10, 0).await;

    let res = app.router.clone().oneshot(
        Request::builder()
            .uri(format!("/organizer/sharing-link/{}", event.id))
            .header(header::COOKIE, &cookie)
            .header(header::HOST, "events.example.test")
            .body(Body::empty())
            .unwrap()
    ).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = serde_json::from_str(&body_text(res).await).unwrap();
    assert_eq!(body["eventId"], event.id.as_str());
    assert_eq!(body["title"], "Shared");
    assert_eq!(
        body["sharingLink"],
        format!("http://events.example.test/attendees/event/{}", event.id)
    );

    let target = location(&app.post_form("/organizer/create-event", Some(&cookie), "").await);
    let draft_id = target.trim_start_matches("/organizer/edit-event/");
    let res = app.get(&format!("/organizer/sharing-link/{draft_id}"), Some(&cookie)).await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    let body: Value = serde_json::from_str(&body_text(res).await).unwrap();
    assert_eq!(body["error"], "Event not found or not published");
}
