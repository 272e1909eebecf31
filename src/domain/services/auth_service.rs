use std::sync::Arc;
use crate::domain::{
    models::{session::Session, user::User},
    ports::SessionRepository,
};
use crate::error::AppError;
use argon2::{
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use chrono::{DateTime, Duration, Utc};
use rand::{distributions::Alphanumeric, rngs::OsRng, Rng};
use sha2::{Digest, Sha256};

/// Issues, resolves and destroys server-side sessions. The browser only ever
/// holds the raw token; rows are keyed by its SHA-256.
pub struct AuthService {
    repo: Arc<dyn SessionRepository>,
    ttl: Duration,
}

impl AuthService {
    pub fn new(repo: Arc<dyn SessionRepository>, ttl: Duration) -> Self {
        Self { repo, ttl }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Anonymous session that only remembers where to go after login.
    pub async fn start_anonymous(&self, return_to: &str) -> Result<String, AppError> {
        let (raw, session) = self.new_session(None, Some(return_to.to_string()));
        self.repo.create(&session).await?;
        Ok(raw)
    }

    /// Creates an authenticated session and retires the previous one,
    /// returning the new token and the stored redirect target, if any.
    pub async fn login(&self, user: &User, previous_token: Option<&str>) -> Result<(String, Option<String>), AppError> {
        let mut return_to = None;
        if let Some(previous) = previous_token {
            let hash = self.hash_token(previous);
            if let Some(old) = self.repo.find(&hash).await? {
                return_to = old.return_to;
            }
            self.repo.delete(&hash).await?;
        }

        let (raw, session) = self.new_session(Some(user), None);
        self.repo.create(&session).await?;
        Ok((raw, return_to))
    }

    /// Looks up a live session. Expired rows are removed on sight.
    pub async fn resolve(&self, raw_token: &str) -> Result<Option<Session>, AppError> {
        let hash = self.hash_token(raw_token);
        match self.repo.find(&hash).await? {
            Some(session) if session.is_expired(Utc::now()) => {
                self.repo.delete(&hash).await?;
                Ok(None)
            }
            other => Ok(other),
        }
    }

    pub async fn remember_return_to(&self, raw_token: &str, return_to: &str) -> Result<(), AppError> {
        self.repo.set_return_to(&self.hash_token(raw_token), Some(return_to)).await
    }

    pub async fn logout(&self, raw_token: &str) -> Result<(), AppError> {
        self.repo.delete(&self.hash_token(raw_token)).await
    }

    pub async fn sweep_expired(&self, now: DateTime<Utc>) -> Result<u64, AppError> {
        self.repo.delete_expired(now).await
    }

    pub fn hash_token(&self, token: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(token.as_bytes());
        hex::encode(hasher.finalize())
    }

    pub fn hash_password(&self, password: &str) -> Result<String, AppError> {
        let salt = SaltString::generate(&mut OsRng);
        Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map(|h| h.to_string())
            .map_err(|e| AppError::InternalWithMsg(format!("password hashing failed: {e}")))
    }

    pub fn verify_password(&self, password: &str, password_hash: &str) -> bool {
        match PasswordHash::new(password_hash) {
            Ok(parsed) => Argon2::default().verify_password(password.as_bytes(), &parsed).is_ok(),
            Err(_) => false,
        }
    }

    fn new_session(&self, user: Option<&User>, return_to: Option<String>) -> (String, Session) {
        let raw: String = rand::thread_rng().sample_iter(&Alphanumeric).take(48).map(char::from).collect();
        let now = Utc::now();
        let session = Session {
            token_hash: self.hash_token(&raw),
            user_id: user.map(|u| u.id.clone()),
            user_name: user.map(|u| u.username.clone()),
            role: user.map(|u| u.role.clone()),
            return_to,
            expires_at: now + self.ttl,
            created_at: now,
        };
        (raw, session)
    }
}
