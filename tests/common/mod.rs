use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    http::{Request, Response, header},
};
use http_body_util::BodyExt;
use sea_orm::DatabaseConnection;
use tower::ServiceExt;

use catalogd::{AppState, config::Config, db, store::DbStore};

/// Full application router over a fresh in-memory database.
pub async fn build_test_app() -> Router {
    build_test_app_with_db().await.0
}

/// Like [`build_test_app`], also handing back the database so a test can
/// tamper with the schema underneath the router.
pub async fn build_test_app_with_db() -> (Router, DatabaseConnection) {
    let config = Config::local("sqlite::memory:");
    let db = db::connect_and_migrate(&config.database_url).await.unwrap();
    let state = AppState { config: Arc::new(config), store: DbStore::new(db.clone()) };
    (catalogd::app(Arc::new(state)), db)
}

pub async fn get(app: &Router, uri: &str, cookie: Option<&str>) -> Response<Body> {
    let mut req = Request::get(uri);
    if let Some(cookie) = cookie {
        req = req.header(header::COOKIE, cookie);
    }
    app.clone().oneshot(req.body(Body::empty()).unwrap()).await.unwrap()
}

pub async fn post_form(
    app: &Router,
    uri: &str,
    fields: &[(&str, &str)],
    cookie: Option<&str>,
) -> Response<Body> {
    let body = fields
        .iter()
        .map(|(k, v)| format!("{k}={}", urlencoding::encode(v)))
        .collect::<Vec<_>>()
        .join("&");

    let mut req =
        Request::post(uri).header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
    if let Some(cookie) = cookie {
        req = req.header(header::COOKIE, cookie);
    }
    app.clone().oneshot(req.body(Body::from(body)).unwrap()).await.unwrap()
}

pub async fn body_text(resp: Response<Body>) -> String {
    let bytes = resp.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}

pub fn location(resp: &Response<Body>) -> &str {
    resp.headers().get(header::LOCATION).unwrap().to_str().unwrap()
}

/// `name=value` pair from the response's `Set-Cookie` header.
pub fn session_cookie(resp: &Response<Body>) -> String {
    let raw = resp.headers().get(header::SET_COOKIE).unwrap().to_str().unwrap();
    raw.split(';').next().unwrap().to_string()
}

/// Registers `username` and returns the session cookie it was signed in with.
pub async fn sign_up(app: &Router, username: &str) -> String {
    let email = format!("{username}@example.com");
    let resp = post_form(
        app,
        "/register",
        &[("username", username), ("email", &email), ("password", "correct horse")],
        None,
    )
    .await;
    assert_eq!(location(&resp), "/dashboard");
    session_cookie(&resp)
}
