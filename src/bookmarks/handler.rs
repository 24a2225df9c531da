//! HTTP handlers for `/bookmarks`.

use axum::{
    Json,
    body::Bytes,
    extract::{Path, State, rejection::BytesRejection},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use serde_json::{Map, Value};

use super::{Bookmarks, ValidationError, sanitize_bookmark, validate_create, validate_update};
use crate::error::HandlerError;
use crate::handler::AppState;
use crate::model::Bookmark;

/// Request bodies are parsed by hand so that every rejection uses the `{error:{message}}`
/// shape. An empty body reads as `{}`.
fn parse_body(body: &Bytes) -> Result<Value, ValidationError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(Value::Object(Map::new()));
    }
    serde_json::from_slice(body).map_err(|_| ValidationError::NotAnObject)
}

/// A path segment that is not an integer cannot name a stored bookmark.
fn parse_id(raw: &str) -> Result<i64, HandlerError> {
    raw.parse::<i64>().map_err(|_| HandlerError::UnknownId(raw.to_string()))
}

pub async fn list_bookmarks(State(state): State<AppState>) -> Result<Response, HandlerError> {
    let repo = Bookmarks::new(state.db.connection());

    let bookmarks: Vec<Bookmark> = repo.list().await?.into_iter().map(sanitize_bookmark).collect();

    tracing::info!(count = bookmarks.len(), "listed bookmarks");
    Ok((StatusCode::OK, Json(bookmarks)).into_response())
}

pub async fn get_bookmark(State(state): State<AppState>, Path(id): Path<String>) -> Result<Response, HandlerError> {
    let id = parse_id(&id)?;
    let repo = Bookmarks::new(state.db.connection());

    let bookmark = repo.get_by_id(id).await?;

    Ok((StatusCode::OK, Json(sanitize_bookmark(bookmark))).into_response())
}

pub async fn create_bookmark(
    State(state): State<AppState>,
    body: Result<Bytes, BytesRejection>,
) -> Result<Response, HandlerError> {
    let body = body?;
    let payload = validate_create(&parse_body(&body)?)?;
    let repo = Bookmarks::new(state.db.connection());

    let bookmark = repo.create(payload).await?;

    tracing::info!(id = bookmark.id, "bookmark created");
    let location = format!("{}/bookmarks/{}", state.base_path, bookmark.id);
    Ok((StatusCode::CREATED, [(header::LOCATION, location)], Json(bookmark)).into_response())
}

pub async fn update_bookmark(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Result<Bytes, BytesRejection>,
) -> Result<Response, HandlerError> {
    let body = body?;
    let patch = validate_update(&parse_body(&body)?)?;
    let id = parse_id(&id)?;
    let repo = Bookmarks::new(state.db.connection());

    repo.update(id, patch).await?;

    tracing::info!(id, "bookmark updated");
    Ok(StatusCode::NO_CONTENT.into_response())
}

pub async fn delete_bookmark(State(state): State<AppState>, Path(id): Path<String>) -> Result<Response, HandlerError> {
    let id = parse_id(&id)?;
    let repo = Bookmarks::new(state.db.connection());

    repo.delete(id).await?;

    tracing::info!(id, "bookmark deleted");
    Ok(StatusCode::NO_CONTENT.into_response())
}
