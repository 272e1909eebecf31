use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Form,
};
use crate::api::dtos::{requests::BookingForm, responses::EventCard};
use crate::api::extractors::auth::AuthUser;
use crate::api::views::{
    current_settings, error_page, format_event_date, format_event_time, format_timestamp,
    page_context, render, render_with_status,
};
use crate::domain::models::event::Event;
use crate::domain::services::availability::{displayed_remaining, Availability, TicketCounts};
use crate::domain::services::booking_service::{BookingError, BookingRequest, MSG_NOT_ENOUGH_TICKETS};
use crate::error::AppError;
use crate::state::AppState;
use futures::future::try_join_all;
use serde_json::json;
use std::sync::Arc;
use tracing::info;

pub async fn list_events(
    State(state): State<Arc<AppState>>,
    _auth: AuthUser,
) -> Result<Response, AppError> {
    let events = state.event_repo.list_published().await?;
    let settings = current_settings(&state).await?;

    let totals = try_join_all(events.iter().map(|e| state.booking_repo.booked_totals(&e.id))).await?;

    let cards: Vec<EventCard> = events
        .into_iter()
        .zip(totals)
        .map(|(event, booked)| EventCard {
            formatted_date: format_event_date(event.date),
            formatted_time: format_event_time(event.date),
            availability: Availability::compute(&event, booked),
            event,
        })
        .collect();

    let mut context = page_context("Attendee Home Page", &settings);
    context.insert("events", &cards);
    context.insert("settings", &settings);

    Ok(render(&state, "attendee/home.html", &context)?.into_response())
}

/// Event page with the booking form, optionally re-rendered after a
/// rejected submission.
async fn event_page(
    state: &AppState,
    status: StatusCode,
    event: &Event,
    remaining: TicketCounts,
    error: Option<&str>,
    form: serde_json::Value,
) -> Result<Response, AppError> {
    let settings = current_settings(state).await?;
    let mut context = page_context(&format!("{} - Event Details", event.title), &settings);
    context.insert("event", event);
    context.insert("formatted_event_date", &format_event_date(event.date));
    context.insert("formatted_event_time", &format_event_time(event.date));
    context.insert("formatted_published_at", &event.published_at.map(format_timestamp));
    context.insert("remaining", &remaining);
    context.insert("settings", &settings);
    context.insert("error", &error);
    context.insert("form", &form);
    render_with_status(state, status, "attendee/event.html", &context)
}

fn not_available(state: &AppState, detail: &str) -> Response {
    error_page(state, StatusCode::NOT_FOUND, "Event Not Found", detail)
}

pub async fn get_event(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    auth: AuthUser,
) -> Result<Response, AppError> {
    let Some(event) = state.event_repo.find_published(&id).await? else {
        return Ok(not_available(&state, "This event does not exist or is not available for booking."));
    };

    let booked = state.booking_repo.booked_totals(&event.id).await?;
    let form = json!({ "attendee_name": auth.user.username });

    event_page(&state, StatusCode::OK, &event, displayed_remaining(&event, &booked), None, form).await
}

pub async fn create_booking(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    auth: AuthUser,
    Form(form): Form<BookingForm>,
) -> Result<Response, AppError> {
    let request = BookingRequest::from_form(
        form.attendee_name.as_deref(),
        form.general_tickets.as_deref(),
        form.vip_tickets.as_deref(),
        form.notes.as_deref(),
    );
    let echo = json!({
        "attendee_name": form.attendee_name,
        "general_tickets": form.general_tickets,
        "vip_tickets": form.vip_tickets,
        "notes": form.notes,
    });

    match state.booking_service.book(&id, &request).await {
        Ok(receipt) => {
            info!("Booking by user {} for event {}", auth.user.id, receipt.event.id);

            let settings = current_settings(&state).await?;
            let mut context = page_context("Booking Confirmed", &settings);
            context.insert("event", &receipt.event);
            context.insert("formatted_event_date", &format_event_date(receipt.event.date));
            context.insert("booking", &json!({
                "attendee_name": request.attendee_name,
                "general_tickets": request.general_tickets,
                "vip_tickets": request.vip_tickets,
                "notes": request.notes,
                "booked_at": format_timestamp(receipt.booked_at),
                "rows": receipt.bookings.len(),
            }));
            Ok(render(&state, "attendee/booking_success.html", &context)?.into_response())
        }
        Err(BookingError::Validation(msg)) => {
            let Some(event) = state.event_repo.find_published(&id).await? else {
                return Ok(not_available(&state, "This event is not available for booking."));
            };
            let booked = state.booking_repo.booked_totals(&event.id).await?;
            let remaining = displayed_remaining(&event, &booked);
            event_page(&state, StatusCode::BAD_REQUEST, &event, remaining, Some(msg), echo).await
        }
        Err(BookingError::NotFound) => {
            Ok(not_available(&state, "This event is not available for booking."))
        }
        Err(BookingError::Capacity { event, remaining }) => {
            event_page(&state, StatusCode::BAD_REQUEST, &event, remaining, Some(MSG_NOT_ENOUGH_TICKETS), echo).await
        }
        Err(BookingError::Storage(e)) => Err(e),
    }
}
