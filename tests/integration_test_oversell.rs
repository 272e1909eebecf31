mod common;

use async_trait::async_trait;
use common::TestApp;
use eventflow::domain::models::booking::{Booking, TicketType};
use eventflow::domain::ports::BookingRepository;
use eventflow::domain::services::availability::{displayed_remaining, raw_remaining, BookedTotals};
use eventflow::domain::services::booking_service::{BookingError, BookingRequest, BookingService};
use eventflow::error::AppError;
use std::sync::Arc;
use tokio::sync::{Barrier, Notify};

/// Holds every availability read until all participants have read, forcing
/// the interleaving where both requests see the same remaining count.
struct GatedBookings {
    inner: Arc<dyn BookingRepository>,
    gate: Arc<Barrier>,
}

#[async_trait]
impl BookingRepository for GatedBookings {
    async fn create(&self, booking: &Booking) -> Result<Booking, AppError> {
        self.inner.create(booking).await
    }

    async fn list_by_event(&self, event_id: &str) -> Result<Vec<Booking>, AppError> {
        self.inner.list_by_event(event_id).await
    }

    async fn booked_totals(&self, event_id: &str) -> Result<BookedTotals, AppError> {
        let totals = self.inner.booked_totals(event_id).await?;
        self.gate.wait().await;
        Ok(totals)
    }
}

/// Lets the general insert land, then fails the VIP insert.
struct FailingVipBookings {
    inner: Arc<dyn BookingRepository>,
    general_written: Notify,
}

#[async_trait]
impl BookingRepository for FailingVipBookings {
    async fn create(&self, booking: &Booking) -> Result<Booking, AppError> {
        if booking.ticket_type() == Some(TicketType::Vip) {
            self.general_written.notified().await;
            return Err(AppError::InternalWithMsg("disk full".into()));
        }
        let created = self.inner.create(booking).await?;
        self.general_written.notify_one();
        Ok(created)
    }

    async fn list_by_event(&self, event_id: &str) -> Result<Vec<Booking>, AppError> {
        self.inner.list_by_event(event_id).await
    }

    async fn booked_totals(&self, event_id: &str) -> Result<BookedTotals, AppError> {
        self.inner.booked_totals(event_id).await
    }
}

fn one_general(name: &str) -> BookingRequest {
    BookingRequest {
        attendee_name: name.to_string(),
        general_tickets: 1,
        vip_tickets: 0,
        notes: None,
    }
}

#[tokio::test]
async fn test_interleaved_bookings_oversell_last_ticket() {
    let app = TestApp::new().await;
    let event = app.published_event("Last Seat", 1, 2).await;

    let gated = Arc::new(GatedBookings {
        inner: app.state.booking_repo.clone(),
        gate: Arc::new(Barrier::new(2)),
    });
    let service = BookingService::new(app.state.event_repo.clone(), gated, app.state.settings_repo.clone());

    let ann = one_general("Ann");
    let bob = one_general("Bob");
    let (first, second) = tokio::join!(
        service.book(&event.id, &ann),
        service.book(&event.id, &bob),
    );
    assert!(first.is_ok());
    assert!(second.is_ok());

    let booked = app.state.booking_repo.booked_totals(&event.id).await.unwrap();
    assert_eq!(booked.general, 2);

    let raw = raw_remaining(&event, &booked);
    assert_eq!(raw.general, -1);
    assert_eq!(displayed_remaining(&event, &booked).general, 0);
}

#[tokio::test]
async fn test_oversold_category_blocks_other_category() {
    let app = TestApp::new().await;
    let event = app.published_event("Oversold", 1, 2).await;

    for name in ["Ann", "Bob"] {
        app.state.booking_repo
            .create(&Booking::new(
                event.id.clone(),
                name.into(),
                TicketType::General,
                1,
                None,
                chrono::Utc::now(),
            ))
            .await
            .unwrap();
    }

    // Zero requested general tickets still exceeds a negative remaining count.
    let request = BookingRequest {
        attendee_name: "Cara".into(),
        general_tickets: 0,
        vip_tickets: 1,
        notes: None,
    };
    match app.state.booking_service.book(&event.id, &request).await {
        Err(BookingError::Capacity { remaining, .. }) => {
            assert_eq!(remaining.general, 0);
            assert_eq!(remaining.vip, 2);
        }
        other => panic!("expected a capacity rejection, got {:?}", other.map(|r| r.bookings.len())),
    }
}

#[tokio::test]
async fn test_sequential_bookings_respect_capacity() {
    let app = TestApp::new().await;
    let event = app.published_event("Orderly", 1, 0).await;

    assert!(app.state.booking_service.book(&event.id, &one_general("Ann")).await.is_ok());
    assert!(matches!(
        app.state.booking_service.book(&event.id, &one_general("Bob")).await,
        Err(BookingError::Capacity { .. })
    ));
}

#[tokio::test]
async fn test_failed_second_insert_keeps_first_row() {
    let app = TestApp::new().await;
    let event = app.published_event("Half Written", 10, 5).await;

    let failing = Arc::new(FailingVipBookings {
        inner: app.state.booking_repo.clone(),
        general_written: Notify::new(),
    });
    let service = BookingService::new(app.state.event_repo.clone(), failing, app.state.settings_repo.clone());

    let request = BookingRequest {
        attendee_name: "Dee".into(),
        general_tickets: 2,
        vip_tickets: 1,
        notes: None,
    };
    assert!(matches!(
        service.book(&event.id, &request).await,
        Err(BookingError::Storage(_))
    ));

    // No rollback: the general row stays.
    let rows = app.state.booking_repo.list_by_event(&event.id).await.unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].ticket_type(), Some(TicketType::General));
    assert_eq!(rows[0].quantity, 2);
    assert_eq!(
        app.state.booking_repo.booked_totals(&event.id).await.unwrap(),
        BookedTotals { general: 2, vip: 0 }
    );
}
