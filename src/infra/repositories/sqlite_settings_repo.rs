use crate::domain::{
    models::settings::{SettingsUpdate, SiteSettings},
    ports::SettingsRepository,
};
use crate::error::AppError;
use async_trait::async_trait;
use chrono::Utc;
use sqlx::SqlitePool;

pub struct SqliteSettingsRepo {
    pool: SqlitePool,
}

impl SqliteSettingsRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SettingsRepository for SqliteSettingsRepo {
    async fn current(&self) -> Result<Option<SiteSettings>, AppError> {
        sqlx::query_as::<_, SiteSettings>("SELECT * FROM site_settings ORDER BY id DESC LIMIT 1")
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn save(&self, update: &SettingsUpdate) -> Result<SiteSettings, AppError> {
        let now = Utc::now();
        let mut tx = self.pool.begin().await.map_err(AppError::Database)?;

        let updated = sqlx::query_as::<_, SiteSettings>(
            r#"UPDATE site_settings SET
                site_name = ?, site_description = ?,
                default_general_tickets = ?, default_vip_tickets = ?,
                contact_email = ?, contact_phone = ?, booking_instructions = ?,
                require_booking_notes = ?, show_remaining_tickets = ?, updated_at = ?
               WHERE id = (SELECT id FROM site_settings ORDER BY id DESC LIMIT 1)
               RETURNING *"#
        )
            .bind(&update.site_name)
            .bind(&update.site_description)
            .bind(update.default_general_tickets)
            .bind(update.default_vip_tickets)
            .bind(&update.contact_email)
            .bind(&update.contact_phone)
            .bind(&update.booking_instructions)
            .bind(update.require_booking_notes)
            .bind(update.show_remaining_tickets)
            .bind(now)
            .fetch_optional(&mut *tx)
            .await
            .map_err(AppError::Database)?;

        let saved = match updated {
            Some(row) => row,
            None => sqlx::query_as::<_, SiteSettings>(
                r#"INSERT INTO site_settings (
                    site_name, site_description, default_general_tickets, default_vip_tickets,
                    contact_email, contact_phone, booking_instructions, require_booking_notes,
                    show_remaining_tickets, updated_at
                ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
                RETURNING *"#
            )
                .bind(&update.site_name)
                .bind(&update.site_description)
                .bind(update.default_general_tickets)
                .bind(update.default_vip_tickets)
                .bind(&update.contact_email)
                .bind(&update.contact_phone)
                .bind(&update.booking_instructions)
                .bind(update.require_booking_notes)
                .bind(update.show_remaining_tickets)
                .bind(now)
                .fetch_one(&mut *tx)
                .await
                .map_err(AppError::Database)?,
        };

        tx.commit().await.map_err(AppError::Database)?;
        Ok(saved)
    }
}
