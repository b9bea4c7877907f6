use std::sync::Arc;

use axum::{
    extract::{Form, Path, State},
    http::HeaderValue,
    response::{Html, IntoResponse, Redirect, Response},
};
use tracing::debug;

use super::{layout, to_login};
use crate::{
    AppState,
    auth::{Viewer, now_sec},
    coordinator::{self, CreateOutcome},
    draft::{TitleDraft, TitleForm},
    error::AppResult,
    templates::{self, TITLE_FORM_ID},
};

const LISTING_LIMIT: u64 = 100;

pub async fn list(State(state): State<Arc<AppState>>, viewer: Viewer) -> AppResult<Response> {
    if matches!(viewer, Viewer::Anonymous) {
        return Ok(to_login());
    }

    let titles = state.store.recent_titles(LISTING_LIMIT).await?;
    Ok(Html(templates::titles_page(layout(&state, &viewer), &titles)).into_response())
}

pub async fn show(
    State(state): State<Arc<AppState>>,
    viewer: Viewer,
    Path(short_id): Path<String>,
) -> AppResult<Response> {
    if matches!(viewer, Viewer::Anonymous) {
        return Ok(to_login());
    }

    let Ok(short_id) = short_id.parse::<i32>() else {
        return Ok(Redirect::to("/titles").into_response());
    };
    let Some(title) = state.store.find_title_by_short_id(short_id).await? else {
        debug!(short_id, "unknown title");
        return Ok(Redirect::to("/titles").into_response());
    };

    Ok(Html(templates::title_page(layout(&state, &viewer), &title)).into_response())
}

pub async fn add_form(State(state): State<Arc<AppState>>, viewer: Viewer) -> Response {
    let Viewer::Authenticated(me) = &viewer else {
        return to_login();
    };
    let body = templates::add_title_page(layout(&state, &viewer), me, &TitleDraft::default(), None);
    Html(body).into_response()
}

/// Re-renders the form after the media type or cover changes, so the end
/// date and cover rotation follow the current selection.
pub async fn draft(viewer: Viewer, Form(form): Form<TitleForm>) -> AppResult<Response> {
    if matches!(viewer, Viewer::Anonymous) {
        return Ok(to_login());
    }

    let draft = TitleDraft::from_form(form)?;
    let mut resp = Html(templates::title_form_fragment(&draft, None)).into_response();
    resp.headers_mut().insert(
        "datastar-selector",
        HeaderValue::from_str(&format!("#{TITLE_FORM_ID}")).map_err(anyhow::Error::from)?,
    );
    resp.headers_mut().insert("datastar-mode", HeaderValue::from_static("outer"));
    Ok(resp)
}

pub async fn create(
    State(state): State<Arc<AppState>>,
    viewer: Viewer,
    Form(form): Form<TitleForm>,
) -> AppResult<Response> {
    let Viewer::Authenticated(me) = &viewer else {
        return Ok(to_login());
    };

    let draft = TitleDraft::from_form(form)?;
    let rerender = |error: String| {
        let body = templates::add_title_page(layout(&state, &viewer), me, &draft, Some(&error));
        Html(body).into_response()
    };

    if let Err(err) = draft.validate() {
        return Ok(rerender(err.to_string()));
    }
    let title = match draft.to_new_title(me, now_sec()) {
        Ok(title) => title,
        Err(err) => return Ok(rerender(err.to_string())),
    };

    let outcome = coordinator::create_title(&state.store, title).await;
    match outcome {
        CreateOutcome::Created(created) => {
            Ok(Redirect::to(&format!("/titles/{}", created.short_id)).into_response())
        },
        failed => Ok(rerender(failed.error_message().unwrap_or_default())),
    }
}
