use serde::Deserialize;

// Browser forms omit empty fields and send everything as text, so every
// field is an optional string and parsed leniently by the handler.

#[derive(Deserialize, Default)]
pub struct LoginForm {
    pub user_name: Option<String>,
    pub password: Option<String>,
}

#[derive(Deserialize, Default)]
pub struct RegisterForm {
    pub user_name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub confirm_password: Option<String>,
}

#[derive(Deserialize, Default)]
pub struct BookingForm {
    pub attendee_name: Option<String>,
    pub general_tickets: Option<String>,
    pub vip_tickets: Option<String>,
    pub notes: Option<String>,
}

#[derive(Deserialize, Default)]
pub struct EditEventForm {
    pub title: Option<String>,
    pub description: Option<String>,
    pub date: Option<String>,
    pub tickets_general: Option<String>,
    pub tickets_vip: Option<String>,
}

#[derive(Deserialize, Default)]
pub struct SettingsForm {
    pub site_name: Option<String>,
    pub site_description: Option<String>,
    pub default_general_tickets: Option<String>,
    pub default_vip_tickets: Option<String>,
    pub contact_email: Option<String>,
    pub contact_phone: Option<String>,
    pub booking_instructions: Option<String>,
    /// Checkbox: present means on.
    pub require_booking_notes: Option<String>,
    pub show_remaining_tickets: Option<String>,
}

#[derive(Deserialize, Default)]
pub struct SettingsQuery {
    pub saved: Option<String>,
}

#[derive(Deserialize, Default)]
pub struct AddUserForm {
    pub user_name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub role: Option<String>,
}

/// Trimmed, non-empty value of an optional form field.
pub fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}
