use serde::Serialize;
use sqlx::FromRow;
use crate::domain::models::event::Event;

/// Sum of booked quantities per ticket category.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, FromRow)]
pub struct BookedTotals {
    pub general: i64,
    pub vip: i64,
}

/// Per-category ticket counts. May be negative when produced by
/// [`raw_remaining`] for an oversold event.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TicketCounts {
    pub general: i64,
    pub vip: i64,
}

impl TicketCounts {
    pub fn clamped(self) -> Self {
        Self {
            general: self.general.max(0),
            vip: self.vip.max(0),
        }
    }
}

/// Capacity minus booked, without clamping. This is the value admission
/// is checked against.
pub fn raw_remaining(event: &Event, booked: &BookedTotals) -> TicketCounts {
    TicketCounts {
        general: i64::from(event.tickets_general) - booked.general,
        vip: i64::from(event.tickets_vip) - booked.vip,
    }
}

/// Remaining tickets as shown to attendees, never below zero.
pub fn displayed_remaining(event: &Event, booked: &BookedTotals) -> TicketCounts {
    raw_remaining(event, booked).clamped()
}

#[derive(Debug, Clone, Serialize)]
pub struct Availability {
    pub remaining: TicketCounts,
    pub booked: BookedTotals,
    pub is_available: bool,
    pub is_sold_out: bool,
}

impl Availability {
    pub fn compute(event: &Event, booked: BookedTotals) -> Self {
        let remaining = displayed_remaining(event, &booked);
        Self {
            remaining,
            booked,
            is_available: remaining.general > 0 || remaining.vip > 0,
            is_sold_out: remaining.general == 0 && remaining.vip == 0,
        }
    }
}
