use std::sync::Arc;

use axum::{
    extract::{Form, Path, State},
    response::{Html, IntoResponse, Redirect, Response},
};
use serde::Deserialize;

use super::{layout, to_login};
use crate::{
    AppState,
    auth::Viewer,
    error::{AppError, AppResult},
    social::{self, Direction},
    templates::{self, profile_href},
};

#[derive(Debug, Deserialize)]
pub struct RemoveForm {
    kind: String,
    user_id: String,
}

pub async fn profile(
    State(state): State<Arc<AppState>>,
    viewer: Viewer,
    Path(username): Path<String>,
) -> AppResult<Html<String>> {
    let db = state.store.db();
    let Some(profile) = social::find_profile(db, &username).await? else {
        return Err(AppError::not_found(format!("No user named {username}.")));
    };

    let is_stalking = match viewer.profile() {
        Some(me) if me.id != profile.id => social::is_stalking(db, &me.id, &profile.id).await?,
        _ => false,
    };

    Ok(Html(templates::profile_page(layout(&state, &viewer), &profile, is_stalking)))
}

pub async fn stalk(
    State(state): State<Arc<AppState>>,
    viewer: Viewer,
    Path(username): Path<String>,
) -> AppResult<Response> {
    let Viewer::Authenticated(me) = viewer else {
        return Ok(to_login());
    };

    let db = state.store.db();
    let Some(target) = social::find_profile(db, &username).await? else {
        return Err(AppError::not_found(format!("No user named {username}.")));
    };
    if target.id != me.id {
        social::stalk(db, &me.id, &target.id).await?;
    }

    Ok(Redirect::to(&profile_href(&target.username)).into_response())
}

pub async fn connections(
    State(state): State<Arc<AppState>>,
    viewer: Viewer,
) -> AppResult<Response> {
    let Viewer::Authenticated(me) = &viewer else {
        return Ok(to_login());
    };

    let db = state.store.db();
    let (stalking, stalkers) = futures::try_join!(
        social::connections(db, &me.id, Direction::Stalking),
        social::connections(db, &me.id, Direction::Stalkers),
    )?;

    let body = templates::connections_page(layout(&state, &viewer), me, &stalking, &stalkers);
    Ok(Html(body).into_response())
}

pub async fn remove(
    State(state): State<Arc<AppState>>,
    viewer: Viewer,
    Form(form): Form<RemoveForm>,
) -> AppResult<Response> {
    let Viewer::Authenticated(me) = viewer else {
        return Ok(to_login());
    };

    let db = state.store.db();
    match form.kind.as_str() {
        "stalked" => social::unstalk(db, &me.id, &form.user_id).await?,
        "stalker" => social::unstalk(db, &form.user_id, &me.id).await?,
        other => return Err(AppError::bad_request(format!("unknown connection kind {other:?}"))),
    }

    Ok(Redirect::to("/connections").into_response())
}
