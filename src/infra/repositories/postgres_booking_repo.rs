use crate::domain::{models::booking::Booking, ports::BookingRepository};
use crate::domain::services::availability::BookedTotals;
use crate::error::AppError;
use async_trait::async_trait;
use sqlx::PgPool;

pub struct PostgresBookingRepo {
    pool: PgPool,
}

impl PostgresBookingRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BookingRepository for PostgresBookingRepo {
    async fn create(&self, booking: &Booking) -> Result<Booking, AppError> {
        sqlx::query_as::<_, Booking>(
            "INSERT INTO bookings (id, event_id, attendee_name, ticket_type, quantity, notes, booked_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING *"
        )
            .bind(&booking.id).bind(&booking.event_id).bind(&booking.attendee_name)
            .bind(&booking.ticket_type).bind(booking.quantity).bind(&booking.notes).bind(booking.booked_at)
            .fetch_one(&self.pool).await.map_err(AppError::Database)
    }

    async fn list_by_event(&self, event_id: &str) -> Result<Vec<Booking>, AppError> {
        sqlx::query_as::<_, Booking>("SELECT * FROM bookings WHERE event_id = $1 ORDER BY booked_at ASC")
            .bind(event_id).fetch_all(&self.pool).await.map_err(AppError::Database)
    }

    async fn booked_totals(&self, event_id: &str) -> Result<BookedTotals, AppError> {
        // SUM over INTEGER yields BIGINT in Postgres, matching i64.
        sqlx::query_as::<_, BookedTotals>(
            "SELECT
                COALESCE(SUM(CASE WHEN ticket_type = 'general' THEN quantity ELSE 0 END), 0)::BIGINT AS general,
                COALESCE(SUM(CASE WHEN ticket_type = 'vip' THEN quantity ELSE 0 END), 0)::BIGINT AS vip
             FROM bookings WHERE event_id = $1"
        )
            .bind(event_id).fetch_one(&self.pool).await.map_err(AppError::Database)
    }
}
