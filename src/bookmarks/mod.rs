//! Bookmarks Module
//!
//! Saved links with a title, URL, optional description and a 1–5 rating.
//!
//! - [`validate`] turns raw JSON bodies into [`NewBookmark`](crate::model::NewBookmark)
//!   and [`BookmarkPatch`](crate::model::BookmarkPatch) values
//! - [`Bookmarks`] is the only owner of bookmark state (the `bookmarks` table)
//! - [`sanitize`] neutralizes markup in text fields on the way out; stored values are raw
//!
//! # Usage
//!
//! ```rust,ignore
//! use bookmarks::bookmarks;
//!
//! for (name, sql) in bookmarks::migrations() {
//!     // Run migration...
//! }
//!
//! let app = Router::new()
//!     .merge(bookmarks::routes())
//!     .with_state(app_state);
//! ```

mod handler;
mod repository;
mod routes;
pub mod sanitize;
pub mod validate;

pub use repository::{Bookmarks, RepositoryError};
pub use routes::routes;
pub use sanitize::sanitize_bookmark;
pub use validate::{ValidationError, validate_create, validate_update};

pub fn migrations() -> &'static [(&'static str, &'static str)] {
    &[("bookmarks_001_schema.sql", include_str!("migrations/001_schema.sql"))]
}
