use axum::{
    Router,
    http::Method,
    middleware,
    routing::get,
};
use std::error::Error;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::handler::{AppState, healthcheck};

pub mod api;
pub mod auth;
pub mod bookmarks;
pub mod config;
pub mod db;
pub mod error;
pub mod handler;
pub mod model;

pub fn unpack_error(err: &dyn Error) -> String {
    let mut parts = Vec::new();
    parts.push(err.to_string());
    let mut current = err.source();
    while let Some(source) = current {
        parts.push(source.to_string());
        current = source.source();
    }
    parts.join(": ")
}

/// Builds the full service: public healthcheck plus the token-gated bookmark routes,
/// mounted under the configured base path.
pub fn app(state: AppState) -> Router {
    let protected = bookmarks::routes().route_layer(middleware::from_fn_with_state(
        state.clone(),
        auth::require_bearer_token,
    ));

    let api = match &*state.base_path {
        "" => protected,
        base => Router::new().nest(base, protected),
    };

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::PATCH, Method::DELETE])
        .allow_headers(Any);

    Router::new()
        .route("/", get(healthcheck))
        .merge(api)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
