use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use chrono::{DateTime, Utc};
use tera::{Context, Tera};
use tracing::error;

use crate::domain::models::settings::{SiteInfo, SiteSettings};
use crate::error::AppError;
use crate::state::AppState;

pub fn load_templates() -> Result<Tera, tera::Error> {
    let mut tera = Tera::default();
    tera.add_raw_templates(vec![
        ("base.html", include_str!("../../templates/base.html")),
        ("error.html", include_str!("../../templates/error.html")),
        ("auth/login.html", include_str!("../../templates/auth/login.html")),
        ("auth/register.html", include_str!("../../templates/auth/register.html")),
        ("attendee/home.html", include_str!("../../templates/attendee/home.html")),
        ("attendee/event.html", include_str!("../../templates/attendee/event.html")),
        ("attendee/booking_success.html", include_str!("../../templates/attendee/booking_success.html")),
        ("organizer/home.html", include_str!("../../templates/organizer/home.html")),
        ("organizer/edit_event.html", include_str!("../../templates/organizer/edit_event.html")),
        ("organizer/settings.html", include_str!("../../templates/organizer/settings.html")),
        ("users/list_users.html", include_str!("../../templates/users/list_users.html")),
        ("users/add_user.html", include_str!("../../templates/users/add_user.html")),
    ])?;
    Ok(tera)
}

pub fn render(state: &AppState, template: &str, context: &Context) -> Result<Html<String>, AppError> {
    Ok(Html(state.templates.render(template, context)?))
}

pub fn render_with_status(
    state: &AppState,
    status: StatusCode,
    template: &str,
    context: &Context,
) -> Result<Response, AppError> {
    Ok((status, render(state, template, context)?).into_response())
}

/// Renders the shared error page. Falls back to the JSON error body if the
/// template itself cannot be rendered.
pub fn error_page(state: &AppState, status: StatusCode, message: &str, detail: &str) -> Response {
    let mut context = Context::new();
    context.insert("title", message);
    context.insert("message", message);
    context.insert("error", detail);

    match render(state, "error.html", &context) {
        Ok(html) => (status, html).into_response(),
        Err(e) => {
            error!("Failed to render error page: {:?}", e);
            e.into_response()
        }
    }
}

/// Base context every page shares: title and site header.
pub fn page_context(title: &str, settings: &SiteSettings) -> Context {
    let mut context = Context::new();
    context.insert("title", title);
    context.insert("site_info", &SiteInfo::from(settings));
    context
}

pub async fn current_settings(state: &AppState) -> Result<SiteSettings, AppError> {
    Ok(state.settings_repo.current().await?.unwrap_or_default())
}

pub fn format_event_date(date: DateTime<Utc>) -> String {
    date.format("%A, %B %-d, %Y").to_string()
}

pub fn format_event_time(date: DateTime<Utc>) -> String {
    date.format("%-I:%M %p").to_string()
}

pub fn format_timestamp(date: DateTime<Utc>) -> String {
    date.format("%B %-d, %Y at %-I:%M %p").to_string()
}

/// Value for an `<input type="datetime-local">`.
pub fn format_input_date(date: DateTime<Utc>) -> String {
    date.format("%Y-%m-%dT%H:%M").to_string()
}
