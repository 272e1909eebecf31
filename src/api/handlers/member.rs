use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
    Form,
};
use crate::api::dtos::requests::{non_blank, AddUserForm};
use crate::api::extractors::auth::AuthUser;
use crate::api::handlers::auth::is_valid_email;
use crate::api::views::{current_settings, format_timestamp, page_context, render, render_with_status};
use crate::domain::models::user::{Role, User};
use crate::error::AppError;
use crate::state::AppState;
use serde_json::json;
use std::sync::Arc;
use tracing::info;

pub async fn list_users(
    State(state): State<Arc<AppState>>,
    _auth: AuthUser,
) -> Result<Response, AppError> {
    let users = state.user_repo.list().await?;
    let rows: Vec<_> = users.iter().map(|u| json!({
        "id": u.id,
        "username": u.username,
        "email": u.email,
        "role": u.role,
        "is_admin": u.is_admin,
        "created_at": format_timestamp(u.created_at),
    })).collect();

    let settings = current_settings(&state).await?;
    let mut context = page_context("Users", &settings);
    context.insert("users", &rows);

    Ok(render(&state, "users/list_users.html", &context)?.into_response())
}

async fn add_user_form(
    state: &AppState,
    status: StatusCode,
    error: Option<&str>,
    form: serde_json::Value,
) -> Result<Response, AppError> {
    let settings = current_settings(state).await?;
    let mut context = page_context("Add User", &settings);
    context.insert("error", &error);
    context.insert("form", &form);
    context.insert("roles", &[Role::Attendee.as_str(), Role::Organizer.as_str()]);
    render_with_status(state, status, "users/add_user.html", &context)
}

pub async fn add_user_page(
    State(state): State<Arc<AppState>>,
    _auth: AuthUser,
) -> Result<Response, AppError> {
    add_user_form(&state, StatusCode::OK, None, json!({ "role": Role::Attendee.as_str() })).await
}

pub async fn add_user(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    Form(form): Form<AddUserForm>,
) -> Result<Response, AppError> {
    let user_name = non_blank(&form.user_name);
    let email = non_blank(&form.email);
    let role = form.role.as_deref().and_then(Role::parse).unwrap_or(Role::Attendee);
    let echo = json!({
        "user_name": user_name,
        "email": email,
        "role": role.as_str(),
    });

    let Some(user_name) = user_name else {
        return add_user_form(&state, StatusCode::BAD_REQUEST, Some("Username is required"), echo).await;
    };
    if email.is_some_and(|e| !is_valid_email(e)) {
        return add_user_form(&state, StatusCode::BAD_REQUEST, Some("Email address is not valid"), echo).await;
    }
    let Some(password) = form.password.as_deref().filter(|p| !p.is_empty()) else {
        return add_user_form(&state, StatusCode::BAD_REQUEST, Some("Password is required"), echo).await;
    };

    if state.user_repo.find_by_username(user_name).await?.is_some() {
        return add_user_form(&state, StatusCode::CONFLICT, Some("Username already exists"), echo).await;
    }

    let password_hash = state.auth_service.hash_password(password)?;
    let user = User::new(user_name.to_string(), email.map(str::to_string), password_hash, role);
    let created = state.user_repo.create(&user).await?;

    info!("User {} ({}) added by {}", created.id, created.role, auth.user.id);

    Ok(Redirect::to("/users/list-users").into_response())
}
