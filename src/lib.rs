pub mod auth;
pub mod config;
pub mod coordinator;
pub mod db;
pub mod draft;
pub mod entities;
pub mod error;
pub mod extras;
pub mod models;
pub mod reconcile;
pub mod routes;
pub mod social;
pub mod store;
pub mod templates;

#[cfg(test)]
mod testing;

use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post},
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::{config::Config, store::DbStore};

pub struct AppState {
    pub config: Arc<Config>,
    pub store: DbStore,
}

pub fn app(state: Arc<AppState>) -> Router {
    use routes::{account, social, titles};

    Router::new()
        .route("/", get(account::index))
        .route("/login", post(account::login))
        .route("/register", get(account::register_form).post(account::register))
        .route("/logout", post(account::logout))
        .route("/dashboard", get(account::dashboard))
        .route("/profile/{username}", get(social::profile))
        .route("/profile/{username}/stalk", post(social::stalk))
        .route("/connections", get(social::connections))
        .route("/connections/remove", post(social::remove))
        .route("/titles", get(titles::list))
        .route("/titles/add", get(titles::add_form).post(titles::create))
        .route("/titles/add/draft", post(titles::draft))
        .route("/titles/{short_id}", get(titles::show))
        .with_state(state)
        .layer(CorsLayer::new().allow_origin(Any).allow_headers(Any))
        .layer(TraceLayer::new_for_http())
}
