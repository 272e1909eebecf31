use crate::domain::{models::booking::Booking, ports::BookingRepository};
use crate::domain::services::availability::BookedTotals;
use crate::error::AppError;
use async_trait::async_trait;
use sqlx::SqlitePool;

pub struct SqliteBookingRepo {
    pool: SqlitePool,
}

impl SqliteBookingRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BookingRepository for SqliteBookingRepo {
    async fn create(&self, booking: &Booking) -> Result<Booking, AppError> {
        sqlx::query_as::<_, Booking>(
            "INSERT INTO bookings (id, event_id, attendee_name, ticket_type, quantity, notes, booked_at)
             VALUES (?, ?, ?, ?, ?, ?, ?)
             RETURNING *"
        )
            .bind(&booking.id).bind(&booking.event_id).bind(&booking.attendee_name)
            .bind(&booking.ticket_type).bind(booking.quantity).bind(&booking.notes).bind(booking.booked_at)
            .fetch_one(&self.pool).await.map_err(AppError::Database)
    }

    async fn list_by_event(&self, event_id: &str) -> Result<Vec<Booking>, AppError> {
        sqlx::query_as::<_, Booking>("SELECT * FROM bookings WHERE event_id = ? ORDER BY booked_at ASC")
            .bind(event_id).fetch_all(&self.pool).await.map_err(AppError::Database)
    }

    async fn booked_totals(&self, event_id: &str) -> Result<BookedTotals, AppError> {
        sqlx::query_as::<_, BookedTotals>(
            "SELECT
                COALESCE(SUM(CASE WHEN ticket_type = 'general' THEN quantity ELSE 0 END), 0) AS general,
                COALESCE(SUM(CASE WHEN ticket_type = 'vip' THEN quantity ELSE 0 END), 0) AS vip
             FROM bookings WHERE event_id = ?"
        )
            .bind(event_id).fetch_one(&self.pool).await.map_err(AppError::Database)
    }
}
