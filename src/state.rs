use std::sync::Arc;
use crate::domain::ports::{
    BookingRepository, EventRepository, SessionRepository, SettingsRepository, UserRepository,
};
use crate::domain::services::{auth_service::AuthService, booking_service::BookingService};
use crate::config::Config;
use tera::Tera;

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub user_repo: Arc<dyn UserRepository>,
    pub event_repo: Arc<dyn EventRepository>,
    pub booking_repo: Arc<dyn BookingRepository>,
    pub settings_repo: Arc<dyn SettingsRepository>,
    pub session_repo: Arc<dyn SessionRepository>,
    pub auth_service: Arc<AuthService>,
    pub booking_service: Arc<BookingService>,
    pub templates: Arc<Tera>,
}

impl AppState {
    /// Wires services on top of the given repositories.
    pub fn new(
        config: Config,
        user_repo: Arc<dyn UserRepository>,
        event_repo: Arc<dyn EventRepository>,
        booking_repo: Arc<dyn BookingRepository>,
        settings_repo: Arc<dyn SettingsRepository>,
        session_repo: Arc<dyn SessionRepository>,
        templates: Arc<Tera>,
    ) -> Self {
        let auth_service = Arc::new(AuthService::new(
            session_repo.clone(),
            chrono::Duration::hours(config.session_ttl_hours),
        ));
        let booking_service = Arc::new(BookingService::new(
            event_repo.clone(),
            booking_repo.clone(),
            settings_repo.clone(),
        ));

        Self {
            config,
            user_repo,
            event_repo,
            booking_repo,
            settings_repo,
            session_repo,
            auth_service,
            booking_service,
            templates,
        }
    }
}
