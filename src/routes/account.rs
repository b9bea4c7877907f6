use std::sync::Arc;

use axum::{
    extract::{Form, State},
    response::{Html, IntoResponse, Redirect, Response},
};
use axum_extra::extract::CookieJar;
use serde::Deserialize;

use super::{layout, to_login};
use crate::{
    AppState,
    auth::{self, AuthError, SESSION_COOKIE, Viewer},
    error::AppResult,
    templates,
};

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct LoginForm {
    username: String,
    password: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct RegisterForm {
    username: String,
    email: String,
    password: String,
}

pub async fn index(viewer: Viewer) -> Response {
    match viewer {
        Viewer::Authenticated(_) => Redirect::to("/dashboard").into_response(),
        Viewer::Anonymous => Html(templates::login_page(None, "")).into_response(),
    }
}

pub async fn login(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Form(form): Form<LoginForm>,
) -> AppResult<Response> {
    let result =
        auth::login(state.store.db(), &form.username, &form.password, state.config.session_ttl_days)
            .await;

    match result {
        Ok(token) => Ok(signed_in(&state, jar, token)),
        Err(err @ (AuthError::MissingCredentials | AuthError::BadCredentials)) => {
            let message = err.to_string();
            Ok(Html(templates::login_page(Some(&message), form.username.trim())).into_response())
        },
        Err(err) => Err(err.into()),
    }
}

pub async fn register_form(viewer: Viewer) -> Response {
    match viewer {
        Viewer::Authenticated(_) => Redirect::to("/dashboard").into_response(),
        Viewer::Anonymous => Html(templates::register_page(None, "", "")).into_response(),
    }
}

pub async fn register(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Form(form): Form<RegisterForm>,
) -> AppResult<Response> {
    let db = state.store.db();
    let result = auth::register(
        db,
        &form.username,
        &form.email,
        &form.password,
        state.config.min_password_length,
    )
    .await;

    match result {
        Ok(profile) => {
            let token =
                auth::login(db, &profile.username, &form.password, state.config.session_ttl_days)
                    .await?;
            Ok(signed_in(&state, jar, token))
        },
        Err(err @ (AuthError::Invalid(_) | AuthError::Taken)) => {
            let message = err.to_string();
            let body =
                templates::register_page(Some(&message), form.username.trim(), form.email.trim());
            Ok(Html(body).into_response())
        },
        Err(err) => Err(err.into()),
    }
}

pub async fn logout(State(state): State<Arc<AppState>>, jar: CookieJar) -> AppResult<Response> {
    if let Some(cookie) = jar.get(SESSION_COOKIE) {
        auth::logout(state.store.db(), cookie.value()).await?;
    }
    let jar = jar.remove(auth::expired_session_cookie());
    Ok((jar, Redirect::to("/")).into_response())
}

pub async fn dashboard(State(state): State<Arc<AppState>>, viewer: Viewer) -> Response {
    let Viewer::Authenticated(me) = &viewer else {
        return to_login();
    };
    Html(templates::dashboard_page(layout(&state, &viewer), me)).into_response()
}

fn signed_in(state: &AppState, jar: CookieJar, token: String) -> Response {
    let cookie =
        auth::session_cookie(token, state.config.session_ttl_days, state.config.secure_cookies);
    (jar.add(cookie), Redirect::to("/dashboard")).into_response()
}
