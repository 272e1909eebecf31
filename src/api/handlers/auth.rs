use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
    Form,
};
use crate::api::dtos::requests::{non_blank, LoginForm, RegisterForm};
use crate::api::extractors::{
    maybe_auth::MaybeAuthUser,
    session_cookie::{clear_session_cookie, set_session_cookie, SESSION_COOKIE},
};
use crate::api::views::{current_settings, page_context, render_with_status};
use crate::domain::models::user::{Role, User};
use crate::error::AppError;
use crate::state::AppState;
use regex::Regex;
use std::sync::{Arc, LazyLock};
use tower_cookies::Cookies;
use tracing::{info, warn};

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern is valid")
});

pub fn is_valid_email(email: &str) -> bool {
    EMAIL_RE.is_match(email)
}

/// Only same-site absolute paths are honoured as post-login targets.
fn safe_return_to(return_to: Option<String>) -> String {
    return_to
        .filter(|p| p.starts_with('/') && !p.starts_with("//"))
        .unwrap_or_else(|| "/".to_string())
}

async fn auth_form(
    state: &AppState,
    status: StatusCode,
    template: &str,
    title: &str,
    error: Option<&str>,
    user_name: Option<&str>,
    email: Option<&str>,
) -> Result<Response, AppError> {
    let settings = current_settings(state).await?;
    let mut context = page_context(title, &settings);
    context.insert("error", &error);
    context.insert("user_name", &user_name.unwrap_or_default());
    context.insert("email", &email.unwrap_or_default());
    render_with_status(state, status, template, &context)
}

async fn login_failed(
    state: &AppState,
    status: StatusCode,
    error: &str,
    user_name: Option<&str>,
) -> Result<Response, AppError> {
    auth_form(state, status, "auth/login.html", "Login", Some(error), user_name, None).await
}

pub async fn login_page(
    State(state): State<Arc<AppState>>,
    maybe: MaybeAuthUser,
) -> Result<Response, AppError> {
    if maybe.user.is_some() {
        return Ok(Redirect::to("/").into_response());
    }
    auth_form(&state, StatusCode::OK, "auth/login.html", "Login", None, None, None).await
}

pub async fn login(
    State(state): State<Arc<AppState>>,
    cookies: Cookies,
    maybe: MaybeAuthUser,
    Form(form): Form<LoginForm>,
) -> Result<Response, AppError> {
    if maybe.user.is_some() {
        return Ok(Redirect::to("/").into_response());
    }

    let Some(user_name) = non_blank(&form.user_name) else {
        return login_failed(&state, StatusCode::BAD_REQUEST, "Username is required", None).await;
    };
    let Some(password) = form.password.as_deref().filter(|p| !p.trim().is_empty()) else {
        return login_failed(&state, StatusCode::BAD_REQUEST, "Password is required", Some(user_name)).await;
    };

    let Some(user) = state.user_repo.find_by_username(user_name).await? else {
        return login_failed(&state, StatusCode::UNAUTHORIZED, "User not found", Some(user_name)).await;
    };

    if !state.auth_service.verify_password(password, &user.password_hash) {
        warn!("Password mismatch for user: {}", user.username);
        return login_failed(&state, StatusCode::UNAUTHORIZED, "Invalid username or password", Some(user_name)).await;
    }

    let (token, return_to) = state.auth_service.login(&user, maybe.token.as_deref()).await?;
    set_session_cookie(&cookies, &token, &state.config, state.auth_service.ttl());

    info!("User logged in: {}", user.id);

    Ok(Redirect::to(&safe_return_to(return_to)).into_response())
}

pub async fn register_page(
    State(state): State<Arc<AppState>>,
    maybe: MaybeAuthUser,
) -> Result<Response, AppError> {
    if maybe.user.is_some() {
        return Ok(Redirect::to("/").into_response());
    }
    auth_form(&state, StatusCode::OK, "auth/register.html", "Register", None, None, None).await
}

pub async fn register(
    State(state): State<Arc<AppState>>,
    cookies: Cookies,
    maybe: MaybeAuthUser,
    Form(form): Form<RegisterForm>,
) -> Result<Response, AppError> {
    if maybe.user.is_some() {
        return Ok(Redirect::to("/").into_response());
    }

    let user_name = non_blank(&form.user_name);
    let email = non_blank(&form.email);
    let password = form.password.as_deref().unwrap_or_default();

    let validation = if !email.is_some_and(is_valid_email) {
        Some("Valid email is required")
    } else if password.is_empty() {
        Some("Password is required")
    } else if form.password != form.confirm_password {
        Some("Passwords do not match")
    } else {
        None
    };

    let Some(user_name) = user_name else {
        return auth_form(&state, StatusCode::BAD_REQUEST, "auth/register.html", "Register", Some("Username is required"), None, email).await;
    };
    if let Some(msg) = validation {
        return auth_form(&state, StatusCode::BAD_REQUEST, "auth/register.html", "Register", Some(msg), Some(user_name), email).await;
    }

    if state.user_repo.find_by_username(user_name).await?.is_some() {
        return auth_form(
            &state, StatusCode::CONFLICT, "auth/register.html", "Register",
            Some("Username already exists"), Some(user_name), email,
        ).await;
    }

    let password_hash = state.auth_service.hash_password(password)?;
    let user = User::new(user_name.to_string(), email.map(str::to_string), password_hash, Role::Attendee);
    let created = state.user_repo.create(&user).await?;

    let (token, _) = state.auth_service.login(&created, maybe.token.as_deref()).await?;
    set_session_cookie(&cookies, &token, &state.config, state.auth_service.ttl());

    info!("Registered user: {}", created.id);

    Ok(Redirect::to("/").into_response())
}

pub async fn logout(
    State(state): State<Arc<AppState>>,
    cookies: Cookies,
) -> Result<impl IntoResponse, AppError> {
    if let Some(cookie) = cookies.get(SESSION_COOKIE) {
        if let Err(e) = state.auth_service.logout(cookie.value()).await {
            warn!("Session destruction error: {:?}", e);
        }
    }

    clear_session_cookie(&cookies);

    info!("User logged out");

    Ok(Redirect::to("/auth/login"))
}
