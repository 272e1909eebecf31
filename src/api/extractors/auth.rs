use axum::{
    extract::FromRequestParts,
    http::{request::Parts, Method, StatusCode},
    response::{IntoResponse, Redirect, Response},
};
use crate::api::extractors::session_cookie::{clear_session_cookie, set_session_cookie, SESSION_COOKIE};
use crate::api::views::error_page;
use crate::domain::models::{session::Session, user::User};
use crate::state::AppState;
use std::sync::Arc;
use tower_cookies::Cookies;
use tracing::{debug, Span};

/// An authenticated request. Rejects by redirecting to the login page,
/// remembering the requested path for GET requests.
pub struct AuthUser {
    pub user: User,
    pub session: Session,
    pub token: String,
}

impl FromRequestParts<Arc<AppState>> for AuthUser {
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, state: &Arc<AppState>) -> Result<Self, Self::Rejection> {
        let cookies = parts.extensions.get::<Cookies>()
            .cloned()
            .ok_or_else(|| StatusCode::INTERNAL_SERVER_ERROR.into_response())?;

        let token = cookies.get(SESSION_COOKIE).map(|c| c.value().to_string());

        let mut anonymous = None;
        if let Some(token) = token {
            match state.auth_service.resolve(&token).await.map_err(IntoResponse::into_response)? {
                Some(session) if session.is_authenticated() => {
                    let user_id = session.user_id.clone().unwrap_or_default();
                    match state.user_repo.find_by_id(&user_id).await.map_err(IntoResponse::into_response)? {
                        Some(user) => {
                            Span::current().record("user_id", user.id.as_str());
                            return Ok(AuthUser { user, session, token });
                        }
                        None => {
                            debug!("Session points at a deleted user, destroying it");
                            state.auth_service.logout(&token).await.map_err(IntoResponse::into_response)?;
                            clear_session_cookie(&cookies);
                        }
                    }
                }
                Some(_) => anonymous = Some(token),
                None => clear_session_cookie(&cookies),
            }
        }

        if parts.method == Method::GET {
            let return_to = parts.uri.path_and_query()
                .map(|pq| pq.as_str().to_string())
                .unwrap_or_else(|| "/".to_string());

            match anonymous {
                Some(token) => state.auth_service.remember_return_to(&token, &return_to).await
                    .map_err(IntoResponse::into_response)?,
                None => {
                    let token = state.auth_service.start_anonymous(&return_to).await
                        .map_err(IntoResponse::into_response)?;
                    set_session_cookie(&cookies, &token, &state.config, state.auth_service.ttl());
                }
            }
        }

        Err(Redirect::to("/auth/login").into_response())
    }
}

/// Organizer pages: an authenticated user holding the organizer role or the
/// admin flag. Other users get a 403 page.
pub struct OrganizerUser(pub AuthUser);

impl FromRequestParts<Arc<AppState>> for OrganizerUser {
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, state: &Arc<AppState>) -> Result<Self, Self::Rejection> {
        let auth = AuthUser::from_request_parts(parts, state).await?;

        if !auth.user.can_organize() {
            return Err(error_page(
                state,
                StatusCode::FORBIDDEN,
                "Access Denied",
                "You need organizer privileges to access this resource.",
            ));
        }

        Ok(OrganizerUser(auth))
    }
}
