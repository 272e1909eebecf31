use axum::{
    extract::{Path, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Redirect, Response},
    Form, Json,
};
use crate::api::dtos::{
    requests::{non_blank, EditEventForm},
    responses::{EventRow, SharingLinkResponse},
};
use crate::api::extractors::auth::OrganizerUser;
use crate::api::views::{
    current_settings, error_page, format_event_date, format_input_date, format_timestamp,
    page_context, render, render_with_status,
};
use crate::domain::models::event::{Event, EventDetails};
use crate::domain::services::booking_service::parse_quantity;
use crate::error::AppError;
use crate::state::AppState;
use chrono::{DateTime, NaiveDateTime, Utc};
use serde_json::json;
use std::sync::Arc;
use tracing::info;

const INPUT_DATE_FORMAT: &str = "%Y-%m-%dT%H:%M";

fn event_row(event: Event) -> EventRow {
    EventRow {
        formatted_date: format_event_date(event.date),
        formatted_created_at: format_timestamp(event.created_at),
        formatted_published_at: event.published_at.map(format_timestamp),
        event,
    }
}

fn event_missing(state: &AppState) -> Response {
    error_page(state, StatusCode::NOT_FOUND, "Event Not Found", "This event does not exist.")
}

/// `datetime-local` input value, read as UTC.
pub fn parse_input_date(raw: &str) -> Option<DateTime<Utc>> {
    NaiveDateTime::parse_from_str(raw.trim(), INPUT_DATE_FORMAT)
        .ok()
        .map(|naive| naive.and_utc())
}

/// Form capacity: lenient integer, negatives become zero.
fn parse_capacity(raw: Option<&str>) -> i32 {
    i32::try_from(parse_quantity(raw)).unwrap_or(i32::MAX)
}

pub async fn dashboard(
    State(state): State<Arc<AppState>>,
    _organizer: OrganizerUser,
) -> Result<Response, AppError> {
    let published: Vec<EventRow> = state.event_repo.list_published().await?
        .into_iter().map(event_row).collect();
    let drafts: Vec<EventRow> = state.event_repo.list_drafts().await?
        .into_iter().map(event_row).collect();
    let settings = current_settings(&state).await?;

    let mut context = page_context("Organizer Home Page", &settings);
    context.insert("published_events", &published);
    context.insert("draft_events", &drafts);
    context.insert("settings", &settings);

    Ok(render(&state, "organizer/home.html", &context)?.into_response())
}

pub async fn create_event(
    State(state): State<Arc<AppState>>,
    OrganizerUser(auth): OrganizerUser,
) -> Result<impl IntoResponse, AppError> {
    let settings = current_settings(&state).await?;
    let draft = Event::new_draft(settings.default_general_tickets, settings.default_vip_tickets);
    let created = state.event_repo.create(&draft).await?;

    info!("Draft event {} created by {}", created.id, auth.user.id);

    Ok(Redirect::to(&format!("/organizer/edit-event/{}", created.id)))
}

async fn edit_form(
    state: &AppState,
    status: StatusCode,
    event: &Event,
    error: Option<&str>,
    form: serde_json::Value,
) -> Result<Response, AppError> {
    let settings = current_settings(state).await?;
    let mut context = page_context("Edit Event", &settings);
    context.insert("event", event);
    context.insert("form", &form);
    context.insert("error", &error);
    render_with_status(state, status, "organizer/edit_event.html", &context)
}

pub async fn edit_event_page(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    _organizer: OrganizerUser,
) -> Result<Response, AppError> {
    let Some(event) = state.event_repo.find_by_id(&id).await? else {
        return Ok(event_missing(&state));
    };

    let form = json!({
        "title": event.title,
        "description": event.description,
        "date": format_input_date(event.date),
        "tickets_general": event.tickets_general,
        "tickets_vip": event.tickets_vip,
    });
    edit_form(&state, StatusCode::OK, &event, None, form).await
}

pub async fn edit_event(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    _organizer: OrganizerUser,
    Form(form): Form<EditEventForm>,
) -> Result<Response, AppError> {
    let Some(event) = state.event_repo.find_by_id(&id).await? else {
        return Ok(event_missing(&state));
    };

    let echo = json!({
        "title": form.title,
        "description": form.description,
        "date": form.date,
        "tickets_general": form.tickets_general,
        "tickets_vip": form.tickets_vip,
    });

    let Some(title) = non_blank(&form.title) else {
        return edit_form(&state, StatusCode::BAD_REQUEST, &event, Some("Title is required"), echo).await;
    };
    let Some(date) = form.date.as_deref().and_then(parse_input_date) else {
        return edit_form(&state, StatusCode::BAD_REQUEST, &event, Some("A valid date and time is required"), echo).await;
    };

    let details = EventDetails {
        title: title.to_string(),
        description: form.description.clone().unwrap_or_default(),
        date,
        tickets_general: parse_capacity(form.tickets_general.as_deref()),
        tickets_vip: parse_capacity(form.tickets_vip.as_deref()),
    };

    let updated = state.event_repo.update_details(&id, &details).await?;
    info!("Event {} updated", updated.id);

    Ok(Redirect::to("/organizer").into_response())
}

pub async fn publish_event(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    OrganizerUser(auth): OrganizerUser,
) -> Result<impl IntoResponse, AppError> {
    if state.event_repo.publish(&id, Utc::now()).await? {
        info!("Event {} published by {}", id, auth.user.id);
    } else {
        info!("Publish of {} ignored, no such draft", id);
    }

    Ok(Redirect::to("/organizer"))
}

pub async fn delete_event(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    OrganizerUser(auth): OrganizerUser,
) -> Result<Response, AppError> {
    match state.event_repo.delete(&id).await {
        Ok(()) => {
            info!("Event {} deleted by {}", id, auth.user.id);
            Ok(Redirect::to("/organizer").into_response())
        }
        Err(AppError::NotFound(_)) => Ok(event_missing(&state)),
        Err(e) => Err(e),
    }
}

pub async fn sharing_link(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    headers: HeaderMap,
    _organizer: OrganizerUser,
) -> Result<impl IntoResponse, AppError> {
    let event = state.event_repo.find_published(&id).await?
        .ok_or_else(|| AppError::NotFound("Event not found or not published".into()))?;

    let base = match &state.config.public_base_url {
        Some(base) => base.clone(),
        None => {
            let host = headers.get(header::HOST)
                .and_then(|h| h.to_str().ok())
                .unwrap_or("localhost");
            format!("http://{}", host)
        }
    };

    Ok(Json(SharingLinkResponse {
        sharing_link: format!("{}/attendees/event/{}", base, event.id),
        event_id: event.id,
        title: event.title,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};

    #[test]
    fn input_date_is_read_as_utc() {
        let date = parse_input_date("2026-10-23T18:00").expect("valid date");
        assert_eq!((date.year(), date.month(), date.day()), (2026, 10, 23));
        assert_eq!((date.hour(), date.minute()), (18, 0));
    }

    #[test]
    fn malformed_input_date_is_rejected() {
        assert!(parse_input_date("").is_none());
        assert!(parse_input_date("23/10/2026 18:00").is_none());
        assert!(parse_input_date("2026-13-01T10:00").is_none());
    }

    #[test]
    fn capacities_are_lenient() {
        assert_eq!(parse_capacity(Some("120")), 120);
        assert_eq!(parse_capacity(Some("-5")), 0);
        assert_eq!(parse_capacity(Some("abc")), 0);
        assert_eq!(parse_capacity(None), 0);
        assert_eq!(parse_capacity(Some("99999999999")), i32::MAX);
    }
}
