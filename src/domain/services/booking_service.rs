use std::sync::Arc;
use chrono::{DateTime, Utc};
use futures::future::try_join_all;
use thiserror::Error;
use tracing::{info, warn};

use crate::domain::models::{
    booking::{Booking, TicketType},
    event::Event,
};
use crate::domain::ports::{BookingRepository, EventRepository, SettingsRepository};
use crate::domain::services::availability::{raw_remaining, TicketCounts};
use crate::error::AppError;

pub const MSG_NAME_REQUIRED: &str = "Please enter your name.";
pub const MSG_NO_TICKETS: &str = "Please select at least one ticket.";
pub const MSG_NOTES_REQUIRED: &str = "Please provide booking notes - they are required for this event.";
pub const MSG_NOT_ENOUGH_TICKETS: &str = "Not enough tickets available. Please select fewer tickets.";

#[derive(Error, Debug)]
pub enum BookingError {
    #[error("{0}")]
    Validation(&'static str),
    #[error("Event not found or not published")]
    NotFound,
    #[error("Not enough tickets available")]
    Capacity {
        event: Box<Event>,
        /// Clamped for display.
        remaining: TicketCounts,
    },
    #[error(transparent)]
    Storage(#[from] AppError),
}

/// Booking form after lenient parsing.
#[derive(Debug, Clone, Default)]
pub struct BookingRequest {
    pub attendee_name: String,
    pub general_tickets: i64,
    pub vip_tickets: i64,
    pub notes: Option<String>,
}

impl BookingRequest {
    pub fn from_form(
        attendee_name: Option<&str>,
        general_tickets: Option<&str>,
        vip_tickets: Option<&str>,
        notes: Option<&str>,
    ) -> Self {
        Self {
            attendee_name: attendee_name.unwrap_or_default().trim().to_string(),
            general_tickets: parse_quantity(general_tickets),
            vip_tickets: parse_quantity(vip_tickets),
            notes: notes
                .map(str::trim)
                .filter(|n| !n.is_empty())
                .map(str::to_string),
        }
    }

    fn quantity(&self, ticket_type: TicketType) -> i64 {
        match ticket_type {
            TicketType::General => self.general_tickets,
            TicketType::Vip => self.vip_tickets,
        }
    }
}

/// Accepted booking: the inserted rows share one `booked_at`.
#[derive(Debug, Clone)]
pub struct BookingReceipt {
    pub event: Event,
    pub bookings: Vec<Booking>,
    pub booked_at: DateTime<Utc>,
}

/// Parses a ticket quantity the way a browser form is usually read:
/// leading whitespace and sign, then as many digits as present.
/// Anything unparsable, and any negative value, counts as zero. A digit run
/// too long for `i64` saturates so admission still rejects it.
pub fn parse_quantity(raw: Option<&str>) -> i64 {
    let Some(raw) = raw else { return 0 };
    let s = raw.trim_start();
    let (negative, digits) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };
    let end = digits
        .char_indices()
        .find(|(_, c)| !c.is_ascii_digit())
        .map(|(i, _)| i)
        .unwrap_or(digits.len());

    if negative || end == 0 {
        return 0;
    }
    digits[..end].bytes().fold(0i64, |n, d| {
        n.saturating_mul(10).saturating_add(i64::from(d - b'0'))
    })
}

pub struct BookingService {
    events: Arc<dyn EventRepository>,
    bookings: Arc<dyn BookingRepository>,
    settings: Arc<dyn SettingsRepository>,
}

impl BookingService {
    pub fn new(
        events: Arc<dyn EventRepository>,
        bookings: Arc<dyn BookingRepository>,
        settings: Arc<dyn SettingsRepository>,
    ) -> Self {
        Self { events, bookings, settings }
    }

    /// Admits or rejects a booking.
    ///
    /// The availability read and the inserts are separate statements with no
    /// transaction or lock around them: two concurrent requests for the last
    /// tickets can both pass the check and oversell the event. The inserts for
    /// the two categories are also independent, so a failure after the first
    /// insert leaves that row in place.
    pub async fn book(&self, event_id: &str, request: &BookingRequest) -> Result<BookingReceipt, BookingError> {
        let require_notes = self.settings.current().await?
            .map(|s| s.require_booking_notes)
            .unwrap_or(false);

        if request.attendee_name.is_empty() {
            return Err(BookingError::Validation(MSG_NAME_REQUIRED));
        }
        if request.general_tickets <= 0 && request.vip_tickets <= 0 {
            return Err(BookingError::Validation(MSG_NO_TICKETS));
        }
        if require_notes && request.notes.is_none() {
            return Err(BookingError::Validation(MSG_NOTES_REQUIRED));
        }

        let event = self.events.find_published(event_id).await?
            .ok_or(BookingError::NotFound)?;

        let booked = self.bookings.booked_totals(&event.id).await?;
        let remaining = raw_remaining(&event, &booked);

        if request.general_tickets > remaining.general || request.vip_tickets > remaining.vip {
            warn!(
                event_id = %event.id,
                requested_general = request.general_tickets,
                requested_vip = request.vip_tickets,
                remaining_general = remaining.general,
                remaining_vip = remaining.vip,
                "Booking rejected: not enough tickets"
            );
            return Err(BookingError::Capacity {
                event: Box::new(event),
                remaining: remaining.clamped(),
            });
        }

        let booked_at = Utc::now();
        let rows: Vec<Booking> = [TicketType::General, TicketType::Vip]
            .into_iter()
            .filter(|t| request.quantity(*t) > 0)
            .map(|t| {
                let quantity = i32::try_from(request.quantity(t)).unwrap_or(i32::MAX);
                Booking::new(
                    event.id.clone(),
                    request.attendee_name.clone(),
                    t,
                    quantity,
                    request.notes.clone(),
                    booked_at,
                )
            })
            .collect();

        let bookings = try_join_all(rows.iter().map(|b| self.bookings.create(b))).await?;

        info!(
            event_id = %event.id,
            general = request.general_tickets,
            vip = request.vip_tickets,
            rows = bookings.len(),
            "Booking accepted"
        );

        Ok(BookingReceipt { event, bookings, booked_at })
    }
}
