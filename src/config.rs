use std::env;

#[derive(Clone)]
pub struct Config {
    pub database_url: String,
    pub port: u16,
    pub session_ttl_hours: i64,
    pub session_cookie_secure: bool,
    pub session_sweep_interval_secs: u64,
    /// Base for sharing links; falls back to the request's Host header.
    pub public_base_url: Option<String>,
    /// Admin account created at startup when both are set.
    pub admin_username: Option<String>,
    pub admin_password: Option<String>,
}

impl Config {
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        Self {
            database_url: env::var("DATABASE_URL").expect("DATABASE_URL must be set"),
            port: env::var("PORT").unwrap_or_else(|_| "3000".to_string()).parse().expect("PORT must be a number"),
            session_ttl_hours: env::var("SESSION_TTL_HOURS").unwrap_or_else(|_| "24".to_string()).parse().expect("SESSION_TTL_HOURS must be a number"),
            session_cookie_secure: env::var("SESSION_COOKIE_SECURE").map(|v| v == "true" || v == "1").unwrap_or(false),
            session_sweep_interval_secs: env::var("SESSION_SWEEP_INTERVAL_SECS").unwrap_or_else(|_| "300".to_string()).parse().expect("SESSION_SWEEP_INTERVAL_SECS must be a number"),
            public_base_url: env::var("PUBLIC_BASE_URL").ok()
                .map(|u| u.trim_end_matches('/').to_string())
                .filter(|u| !u.is_empty()),
            admin_username: env::var("ADMIN_USERNAME").ok().filter(|v| !v.trim().is_empty()),
            admin_password: env::var("ADMIN_PASSWORD").ok().filter(|v| !v.is_empty()),
        }
    }
}
