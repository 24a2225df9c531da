//! Bearer-token gate in front of the bookmark routes.

use axum::{
    Json,
    extract::{Request, State},
    http::{StatusCode, header},
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::api::UnauthorizedResponse;
use crate::handler::AppState;

/// Pulls the token out of an `Authorization: Bearer <token>` header value.
pub fn bearer_token(header_value: &str) -> Option<&str> {
    let (scheme, token) = header_value.trim().split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }
    Some(token.trim()).filter(|token| !token.is_empty())
}

pub async fn require_bearer_token(State(state): State<AppState>, request: Request, next: Next) -> Response {
    let authorized = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(bearer_token)
        .is_some_and(|token| token == &*state.api_token);

    if !authorized {
        tracing::warn!(path = %request.uri().path(), "unauthorized request");
        return (StatusCode::UNAUTHORIZED, Json(UnauthorizedResponse::default())).into_response();
    }

    next.run(request).await
}
