use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
    Form,
};
use crate::api::dtos::requests::{non_blank, SettingsForm, SettingsQuery};
use crate::api::extractors::auth::OrganizerUser;
use crate::api::views::{current_settings, page_context, render_with_status};
use crate::domain::models::settings::{
    SettingsUpdate, SiteSettings, DEFAULT_BOOKING_INSTRUCTIONS, DEFAULT_GENERAL_TICKETS,
    DEFAULT_VIP_TICKETS,
};
use crate::domain::services::booking_service::parse_quantity;
use crate::error::AppError;
use crate::state::AppState;
use serde_json::json;
use std::sync::Arc;
use tracing::info;

/// Zero or unparsable falls back to the default.
fn default_capacity(raw: Option<&str>, fallback: i32) -> i32 {
    match parse_quantity(raw) {
        0 => fallback,
        n => i32::try_from(n).unwrap_or(i32::MAX),
    }
}

fn text(value: &Option<String>) -> String {
    value.as_deref().map(str::trim).unwrap_or_default().to_string()
}

impl From<&SettingsForm> for SettingsUpdate {
    fn from(form: &SettingsForm) -> Self {
        Self {
            site_name: text(&form.site_name),
            site_description: text(&form.site_description),
            default_general_tickets: default_capacity(form.default_general_tickets.as_deref(), DEFAULT_GENERAL_TICKETS),
            default_vip_tickets: default_capacity(form.default_vip_tickets.as_deref(), DEFAULT_VIP_TICKETS),
            contact_email: text(&form.contact_email),
            contact_phone: text(&form.contact_phone),
            booking_instructions: non_blank(&form.booking_instructions)
                .unwrap_or(DEFAULT_BOOKING_INSTRUCTIONS)
                .to_string(),
            require_booking_notes: form.require_booking_notes.is_some(),
            show_remaining_tickets: form.show_remaining_tickets.is_some(),
        }
    }
}

async fn settings_form(
    state: &AppState,
    status: StatusCode,
    settings: &SiteSettings,
    form: serde_json::Value,
    saved: bool,
    error: Option<&str>,
) -> Result<Response, AppError> {
    let stats = state.event_repo.stats().await?;
    let mut context = page_context("Site Settings", settings);
    context.insert("settings", settings);
    context.insert("form", &form);
    context.insert("stats", &stats);
    context.insert("saved", &saved);
    context.insert("error", &error);
    render_with_status(state, status, "organizer/settings.html", &context)
}

pub async fn settings_page(
    State(state): State<Arc<AppState>>,
    Query(query): Query<SettingsQuery>,
    _organizer: OrganizerUser,
) -> Result<Response, AppError> {
    let settings = current_settings(&state).await?;
    let form = serde_json::to_value(&settings).map_err(|e| AppError::InternalWithMsg(e.to_string()))?;
    let saved = query.saved.as_deref() == Some("true");

    settings_form(&state, StatusCode::OK, &settings, form, saved, None).await
}

pub async fn save_settings(
    State(state): State<Arc<AppState>>,
    OrganizerUser(auth): OrganizerUser,
    Form(form): Form<SettingsForm>,
) -> Result<Response, AppError> {
    if non_blank(&form.site_name).is_none() {
        let settings = current_settings(&state).await?;
        let echo = json!({
            "site_name": form.site_name,
            "site_description": form.site_description,
            "default_general_tickets": form.default_general_tickets,
            "default_vip_tickets": form.default_vip_tickets,
            "contact_email": form.contact_email,
            "contact_phone": form.contact_phone,
            "booking_instructions": form.booking_instructions,
            "require_booking_notes": form.require_booking_notes.is_some(),
            "show_remaining_tickets": form.show_remaining_tickets.is_some(),
        });
        return settings_form(&state, StatusCode::BAD_REQUEST, &settings, echo, false, Some("Site name is required")).await;
    }

    let saved = state.settings_repo.save(&SettingsUpdate::from(&form)).await?;
    info!("Site settings {} saved by {}", saved.id, auth.user.id);

    Ok(Redirect::to("/organizer/settings?saved=true").into_response())
}
