//! Request-body validation for create and partial update.
//!
//! Bodies arrive as raw JSON so that "absent", "null" and "wrong type" can be told apart.
//! `rating` is never coerced: only a JSON integer in `RATING_MIN..=RATING_MAX` passes.

use serde_json::{Map, Value};
use thiserror::Error;

use crate::model::{BookmarkPatch, NewBookmark};

pub const RATING_MIN: i64 = 1;
pub const RATING_MAX: i64 = 5;

const UPDATABLE_FIELDS: [&str; 4] = ["title", "url", "description", "rating"];

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Missing '{0}' in request body")]
    MissingField(&'static str),
    #[error("'rating' must be a number between 1 and 5")]
    InvalidRange,
    #[error("Request body must contain either 'title', 'url', 'description' or 'rating'")]
    EmptyUpdate,
    #[error("'{0}' must be a string")]
    InvalidType(&'static str),
    #[error("Request body must be a JSON object")]
    NotAnObject,
}

pub fn validate_create(body: &Value) -> Result<NewBookmark, ValidationError> {
    let fields = as_object(body)?;

    let title = required_text(fields, "title")?;
    let url = required_text(fields, "url")?;
    let rating = match fields.get("rating") {
        None | Some(Value::Null) => return Err(ValidationError::MissingField("rating")),
        Some(value) => parse_rating(value)?,
    };
    let description = optional_text(fields, "description")?.flatten();

    Ok(NewBookmark {
        title,
        url,
        description,
        rating,
    })
}

pub fn validate_update(body: &Value) -> Result<BookmarkPatch, ValidationError> {
    let fields = as_object(body)?;

    if !UPDATABLE_FIELDS.iter().any(|field| fields.contains_key(*field)) {
        return Err(ValidationError::EmptyUpdate);
    }

    let mut patch = BookmarkPatch::default();
    if fields.contains_key("title") {
        patch.title = Some(required_text(fields, "title")?);
    }
    if fields.contains_key("url") {
        patch.url = Some(required_text(fields, "url")?);
    }
    patch.description = optional_text(fields, "description")?;
    if let Some(value) = fields.get("rating") {
        patch.rating = Some(parse_rating(value)?);
    }

    Ok(patch)
}

fn as_object(body: &Value) -> Result<&Map<String, Value>, ValidationError> {
    body.as_object().ok_or(ValidationError::NotAnObject)
}

fn required_text(fields: &Map<String, Value>, field: &'static str) -> Result<String, ValidationError> {
    match fields.get(field) {
        None | Some(Value::Null) => Err(ValidationError::MissingField(field)),
        Some(Value::String(s)) if s.is_empty() => Err(ValidationError::MissingField(field)),
        Some(Value::String(s)) => Ok(s.clone()),
        Some(_) => Err(ValidationError::InvalidType(field)),
    }
}

/// `None` when absent, `Some(None)` for an explicit null.
fn optional_text(fields: &Map<String, Value>, field: &'static str) -> Result<Option<Option<String>>, ValidationError> {
    match fields.get(field) {
        None => Ok(None),
        Some(Value::Null) => Ok(Some(None)),
        Some(Value::String(s)) => Ok(Some(Some(s.clone()))),
        Some(_) => Err(ValidationError::InvalidType(field)),
    }
}

fn parse_rating(value: &Value) -> Result<i64, ValidationError> {
    value
        .as_i64()
        .filter(|rating| (RATING_MIN..=RATING_MAX).contains(rating))
        .ok_or(ValidationError::InvalidRange)
}
