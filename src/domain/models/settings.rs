use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};
use sqlx::FromRow;

pub const DEFAULT_SITE_NAME: &str = "EventFlow Manager";
pub const DEFAULT_SITE_DESCRIPTION: &str = "Professional event management for all your needs";
pub const DEFAULT_BOOKING_INSTRUCTIONS: &str =
    "Please review the event details carefully before booking. Bring a valid ID to the event.";
pub const DEFAULT_GENERAL_TICKETS: i32 = 50;
pub const DEFAULT_VIP_TICKETS: i32 = 10;

#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct SiteSettings {
    pub id: i64,
    pub site_name: String,
    pub site_description: String,
    pub default_general_tickets: i32,
    pub default_vip_tickets: i32,
    pub contact_email: String,
    pub contact_phone: String,
    pub booking_instructions: String,
    pub require_booking_notes: bool,
    pub show_remaining_tickets: bool,
    pub updated_at: DateTime<Utc>,
}

impl Default for SiteSettings {
    /// Values used while the `site_settings` table is still empty.
    fn default() -> Self {
        Self {
            id: 0,
            site_name: DEFAULT_SITE_NAME.to_string(),
            site_description: DEFAULT_SITE_DESCRIPTION.to_string(),
            default_general_tickets: DEFAULT_GENERAL_TICKETS,
            default_vip_tickets: DEFAULT_VIP_TICKETS,
            contact_email: String::new(),
            contact_phone: String::new(),
            booking_instructions: DEFAULT_BOOKING_INSTRUCTIONS.to_string(),
            require_booking_notes: false,
            show_remaining_tickets: true,
            updated_at: Utc::now(),
        }
    }
}

/// Site name and tagline shown in every page header.
#[derive(Debug, Serialize, Clone)]
pub struct SiteInfo {
    pub name: String,
    pub description: String,
}

impl From<&SiteSettings> for SiteInfo {
    fn from(settings: &SiteSettings) -> Self {
        Self {
            name: settings.site_name.clone(),
            description: settings.site_description.clone(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct SettingsUpdate {
    pub site_name: String,
    pub site_description: String,
    pub default_general_tickets: i32,
    pub default_vip_tickets: i32,
    pub contact_email: String,
    pub contact_phone: String,
    pub booking_instructions: String,
    pub require_booking_notes: bool,
    pub show_remaining_tickets: bool,
}
