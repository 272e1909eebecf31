use axum::{
    body::Body,
    extract::Request,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use std::time::Duration;
use crate::state::AppState;
use crate::api::handlers::{auth, booking, event, health, home, member, settings};
use tower_http::{
    trace::TraceLayer,
    classify::ServerErrorsFailureClass,
};
use tower_cookies::CookieManagerLayer;
use tracing::{info_span, Span, error, info};
use uuid::Uuid;

pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health::health_check))
        .route("/", get(home::index))

        // Auth
        .route("/auth/login", get(auth::login_page).post(auth::login))
        .route("/auth/register", get(auth::register_page).post(auth::register))
        .route("/auth/logout", get(auth::logout).post(auth::logout))

        // Attendees
        .route("/attendees", get(booking::list_events))
        .route("/attendees/", get(booking::list_events))
        .route("/attendees/event/{id}", get(booking::get_event))
        .route("/attendees/event/{id}/book", post(booking::create_booking))

        // Organizer
        .route("/organizer", get(event::dashboard))
        .route("/organizer/", get(event::dashboard))
        .route("/organizer/create-event", post(event::create_event))
        .route("/organizer/edit-event/{id}", get(event::edit_event_page).post(event::edit_event))
        .route("/organizer/publish-event/{id}", post(event::publish_event))
        .route("/organizer/delete-event/{id}", post(event::delete_event))
        .route("/organizer/sharing-link/{id}", get(event::sharing_link))
        .route("/organizer/settings", get(settings::settings_page).post(settings::save_settings))

        // Users
        .route("/users/list-users", get(member::list_users))
        .route("/users/add-user", get(member::add_user_page).post(member::add_user))

        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &Request<Body>| {
                    let request_id = Uuid::new_v4().to_string();
                    info_span!(
                        "http_request",
                        request_id = %request_id,
                        method = ?request.method(),
                        uri = ?request.uri(),
                        user_id = tracing::field::Empty,
                    )
                })
                .on_request(|request: &Request<Body>, _span: &Span| {
                    info!("started processing request: {} {}", request.method(), request.uri().path());
                })
                .on_response(|response: &axum::http::Response<Body>, latency: Duration, _span: &Span| {
                    info!(
                        status = response.status().as_u16(),
                        latency_ms = latency.as_millis(),
                        "finished processing request"
                    );
                })
                .on_failure(|error: ServerErrorsFailureClass, _latency: Duration, _span: &Span| {
                    error!("request failed: {:?}", error);
                })
        )
        .layer(CookieManagerLayer::new())
        .with_state(state)
}
