use eventflow::{
    api::{router::create_router, views::load_templates},
    config::Config,
    domain::models::{
        event::{Event, EventDetails},
        user::{Role, User},
    },
    infra::factory::{ensure_admin, run_sqlite_migrations, sqlite_state},
    state::AppState,
};
use sqlx::{sqlite::{SqliteConnectOptions, SqlitePoolOptions}, Pool, Sqlite};
use std::sync::Arc;
use uuid::Uuid;
use axum::{
    body::Body,
    http::{Request, header},
    response::Response,
    Router,
};
use chrono::{Duration, Utc};
use std::str::FromStr;
use tower::ServiceExt;

#[allow(dead_code)]
pub struct TestApp {
    pub router: Router,
    pub pool: Pool<Sqlite>,
    pub db_filename: String,
    pub state: Arc<AppState>,
}

#[allow(dead_code)]
impl TestApp {
    pub async fn new() -> Self {
        let db_filename = format!("test_{}.db", Uuid::new_v4());
        let db_url = format!("sqlite://{}?mode=rwc", db_filename);

        let connection_options = SqliteConnectOptions::from_str(&db_url)
            .unwrap()
            .create_if_missing(true)
            .foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .connect_with(connection_options)
            .await
            .expect("Failed to connect to test db");

        run_sqlite_migrations(&pool)
            .await
            .expect("Failed to migrate test db");

        let templates = Arc::new(load_templates().expect("templates should parse"));

        let config = Config {
            database_url: db_url.clone(),
            port: 0,
            session_ttl_hours: 24,
            session_cookie_secure: false,
            session_sweep_interval_secs: 300,
            public_base_url: None,
            admin_username: None,
            admin_password: None,
        };

        let state = Arc::new(sqlite_state(config, pool.clone(), templates));
        let router = create_router(state.clone());

        Self {
            router,
            pool,
            db_filename,
            state,
        }
    }

    pub async fn seed_user(&self, username: &str, password: &str, role: Role) -> User {
        let hash = self.state.auth_service.hash_password(password).unwrap();
        let user = User::new(username.to_string(), Some(format!("{username}@example.com")), hash, role);
        self.state.user_repo.create(&user).await.unwrap()
    }

    pub async fn seed_admin(&self, username: &str, password: &str) -> User {
        ensure_admin(&self.state, username, password).await.unwrap().expect("admin should be new")
    }

    /// Logs in through the form and returns a `Cookie` header value.
    pub async fn login(&self, username: &str, password: &str) -> String {
        let response = self.post_form(
            "/auth/login",
            None,
            &format!("user_name={username}&password={password}"),
        ).await;

        if !response.status().is_redirection() {
            panic!("Login failed in test helper: status {}", response.status());
        }

        session_cookie(&response).expect("No session cookie returned")
    }

    pub async fn organizer(&self) -> String {
        self.seed_user("org", "org-pass", Role::Organizer).await;
        self.login("org", "org-pass").await
    }

    pub async fn attendee(&self) -> String {
        self.seed_user("ann", "ann-pass", Role::Attendee).await;
        self.login("ann", "ann-pass").await
    }

    pub async fn get(&self, uri: &str, cookie: Option<&str>) -> Response {
        let mut builder = Request::builder().method("GET").uri(uri);
        if let Some(cookie) = cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        self.router.clone().oneshot(builder.body(Body::empty()).unwrap()).await.unwrap()
    }

    pub async fn post_form(&self, uri: &str, cookie: Option<&str>, body: &str) -> Response {
        let mut builder = Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
        if let Some(cookie) = cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        self.router.clone().oneshot(builder.body(Body::from(body.to_string())).unwrap()).await.unwrap()
    }

    /// A published event with the given capacities, bypassing the organizer UI.
    pub async fn published_event(&self, title: &str, general: i32, vip: i32) -> Event {
        let draft = self.state.event_repo.create(&Event::new_draft(general, vip)).await.unwrap();
        self.state.event_repo.update_details(&draft.id, &EventDetails {
            title: title.to_string(),
            description: format!("{title} description"),
            date: Utc::now() + Duration::days(14),
            tickets_general: general,
            tickets_vip: vip,
        }).await.unwrap();
        assert!(self.state.event_repo.publish(&draft.id, Utc::now()).await.unwrap());
        self.state.event_repo.find_by_id(&draft.id).await.unwrap().unwrap()
    }
}

impl Drop for TestApp {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.db_filename);
        let _ = std::fs::remove_file(format!("{}-wal", self.db_filename));
        let _ = std::fs::remove_file(format!("{}-shm", self.db_filename));
    }
}

#[allow(dead_code)]
pub fn session_cookie(response: &Response) -> Option<String> {
    response.headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .filter_map(|h| h.to_str().ok())
        .filter(|c| c.starts_with("eventflow_sid=") && !c.starts_with("eventflow_sid=;"))
        .last()
        .map(|c| c.split(';').next().unwrap_or_default().to_string())
}

#[allow(dead_code)]
pub fn location(response: &Response) -> String {
    response.headers()
        .get(header::LOCATION)
        .expect("response should redirect")
        .to_str()
        .unwrap()
        .to_string()
}

#[allow(dead_code)]
pub async fn body_text(response: Response) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}
