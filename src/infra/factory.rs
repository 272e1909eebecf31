use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;
use sqlx::{postgres::{PgPoolOptions, PgConnectOptions}, sqlite::{SqlitePoolOptions, SqliteJournalMode, SqliteConnectOptions}};
use sqlx::{PgPool, SqlitePool, ConnectOptions};
use tracing::{info, warn};
use tracing::log::LevelFilter;

use crate::api::views::load_templates;
use crate::config::Config;
use crate::domain::models::user::{Role, User};
use crate::error::AppError;
use crate::state::AppState;
use crate::infra::repositories::{
    postgres_booking_repo::PostgresBookingRepo, postgres_event_repo::PostgresEventRepo,
    postgres_user_repo::PostgresUserRepo, postgres_settings_repo::PostgresSettingsRepo,
    postgres_session_repo::PostgresSessionRepo,
    sqlite_booking_repo::SqliteBookingRepo, sqlite_event_repo::SqliteEventRepo,
    sqlite_user_repo::SqliteUserRepo, sqlite_settings_repo::SqliteSettingsRepo,
    sqlite_session_repo::SqliteSessionRepo,
};

pub fn is_postgres_url(database_url: &str) -> bool {
    database_url.starts_with("postgres://") || database_url.starts_with("postgresql://")
}

pub async fn bootstrap_state(config: &Config) -> Result<AppState, AppError> {
    let database_url = &config.database_url;
    let templates = Arc::new(load_templates()?);

    if is_postgres_url(database_url) {
        info!("Initializing PostgreSQL connection...");

        let opts = PgConnectOptions::from_str(database_url)
            .map_err(AppError::Database)?
            .log_statements(LevelFilter::Debug)
            .log_slow_statements(LevelFilter::Warn, Duration::from_millis(500));

        let pool = PgPoolOptions::new()
            .max_connections(10)
            .connect_with(opts)
            .await?;

        run_postgres_migrations(&pool).await?;

        Ok(AppState::new(
            config.clone(),
            Arc::new(PostgresUserRepo::new(pool.clone())),
            Arc::new(PostgresEventRepo::new(pool.clone())),
            Arc::new(PostgresBookingRepo::new(pool.clone())),
            Arc::new(PostgresSettingsRepo::new(pool.clone())),
            Arc::new(PostgresSessionRepo::new(pool)),
            templates,
        ))
    } else {
        info!("Initializing SQLite connection with WAL Mode...");

        let opts = SqliteConnectOptions::from_str(database_url)?
            .create_if_missing(true)
            .foreign_keys(true)
            .journal_mode(SqliteJournalMode::Wal)
            .busy_timeout(Duration::from_secs(5))
            .log_statements(LevelFilter::Debug)
            .log_slow_statements(LevelFilter::Warn, Duration::from_millis(500));

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(opts)
            .await?;

        run_sqlite_migrations(&pool).await?;

        Ok(sqlite_state(config.clone(), pool, templates))
    }
}

/// Creates the admin account unless the username is already taken.
/// Returns the new user, or `None` when it already existed.
pub async fn ensure_admin(state: &AppState, username: &str, password: &str) -> Result<Option<User>, AppError> {
    if let Some(existing) = state.user_repo.find_by_username(username).await? {
        if !existing.is_admin {
            warn!(username, "Admin username belongs to a non-admin account, leaving it unchanged");
        }
        return Ok(None);
    }

    let password_hash = state.auth_service.hash_password(password)?;
    let mut admin = User::new(username.to_string(), None, password_hash, Role::Attendee);
    admin.is_admin = true;
    let admin = state.user_repo.create(&admin).await?;

    info!(user_id = %admin.id, username, "Admin account created");
    Ok(Some(admin))
}

/// State backed entirely by one SQLite pool.
pub fn sqlite_state(config: Config, pool: SqlitePool, templates: Arc<tera::Tera>) -> AppState {
    AppState::new(
        config,
        Arc::new(SqliteUserRepo::new(pool.clone())),
        Arc::new(SqliteEventRepo::new(pool.clone())),
        Arc::new(SqliteBookingRepo::new(pool.clone())),
        Arc::new(SqliteSettingsRepo::new(pool.clone())),
        Arc::new(SqliteSessionRepo::new(pool)),
        templates,
    )
}

async fn run_postgres_migrations(pool: &PgPool) -> Result<(), AppError> {
    sqlx::migrate!("./migrations/postgres")
        .run(pool)
        .await
        .map_err(|e| AppError::InternalWithMsg(format!("Postgres migrations failed: {e}")))
}

pub async fn run_sqlite_migrations(pool: &SqlitePool) -> Result<(), AppError> {
    sqlx::migrate!("./migrations/sqlite")
        .run(pool)
        .await
        .map_err(|e| AppError::InternalWithMsg(format!("SQLite migrations failed: {e}")))
}
