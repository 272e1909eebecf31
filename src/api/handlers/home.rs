use axum::response::Redirect;
use crate::api::extractors::auth::AuthUser;

/// Sends organizers to their dashboard and everyone else to the event list.
pub async fn index(auth: AuthUser) -> Redirect {
    if auth.user.can_organize() {
        Redirect::to("/organizer")
    } else {
        Redirect::to("/attendees")
    }
}
