use axum::{
    extract::FromRequestParts,
    http::request::Parts,
};
use crate::api::extractors::session_cookie::SESSION_COOKIE;
use crate::domain::models::user::User;
use crate::state::AppState;
use std::convert::Infallible;
use std::sync::Arc;
use tower_cookies::Cookies;
use tracing::debug;

/// The logged-in user if there is one. Never rejects; storage errors and
/// stale sessions are treated as a guest.
pub struct MaybeAuthUser {
    pub user: Option<User>,
    pub token: Option<String>,
}

impl FromRequestParts<Arc<AppState>> for MaybeAuthUser {
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &Arc<AppState>) -> Result<Self, Self::Rejection> {
        let token = parts.extensions.get::<Cookies>()
            .and_then(|cookies| cookies.get(SESSION_COOKIE))
            .map(|c| c.value().to_string());

        let Some(token) = token else {
            return Ok(MaybeAuthUser { user: None, token: None });
        };

        let session = match state.auth_service.resolve(&token).await {
            Ok(session) => session,
            Err(e) => {
                debug!("MaybeAuth: session lookup failed: {:?}", e);
                None
            }
        };

        let user = match session.and_then(|s| s.user_id) {
            Some(user_id) => state.user_repo.find_by_id(&user_id).await.ok().flatten(),
            None => None,
        };

        Ok(MaybeAuthUser { user, token: Some(token) })
    }
}
