pub mod account;
pub mod social;
pub mod titles;

use axum::response::{IntoResponse, Redirect, Response};

use crate::{AppState, auth::Viewer, templates::Layout};

fn layout<'a>(state: &'a AppState, viewer: &'a Viewer) -> Layout<'a> {
    Layout { viewer: viewer.profile(), default_avatar: &state.config.default_avatar_url }
}

/// Where signed-out visitors of private pages end up.
fn to_login() -> Response {
    Redirect::to("/").into_response()
}
