use libsql::Connection;
use thiserror::Error;

use crate::model::{Bookmark, BookmarkPatch, NewBookmark};

#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("bookmark {0} not found")]
    NotFound(i64),
    #[error("database error")]
    Database(#[from] libsql::Error),
    #[error("insert returned no row")]
    NothingReturned,
}

pub type Result<T> = std::result::Result<T, RepositoryError>;

const COLUMNS: &str = "id, title, url, description, rating";

/// CRUD over the `bookmarks` table. Every operation is a single statement.
pub struct Bookmarks<'a> {
    conn: &'a Connection,
}

impl<'a> Bookmarks<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    pub async fn list(&self) -> Result<Vec<Bookmark>> {
        let query = format!("SELECT {COLUMNS} FROM bookmarks ORDER BY id");
        let mut rows = self.conn.query(&query, ()).await?;

        let mut bookmarks = Vec::new();
        while let Some(row) = rows.next().await? {
            bookmarks.push(Self::row_to_bookmark(&row)?);
        }
        Ok(bookmarks)
    }

    pub async fn get_by_id(&self, id: i64) -> Result<Bookmark> {
        let query = format!("SELECT {COLUMNS} FROM bookmarks WHERE id = ?");
        let mut rows = self.conn.query(&query, libsql::params![id]).await?;

        match rows.next().await? {
            Some(row) => Self::row_to_bookmark(&row),
            None => Err(RepositoryError::NotFound(id)),
        }
    }

    pub async fn create(&self, input: NewBookmark) -> Result<Bookmark> {
        let query = format!(
            "INSERT INTO bookmarks (title, url, description, rating) VALUES (?, ?, ?, ?) RETURNING {COLUMNS}"
        );

        let mut rows = self
            .conn
            .query(
                &query,
                libsql::params![input.title, input.url, input.description, input.rating],
            )
            .await?;

        match rows.next().await? {
            Some(row) => Self::row_to_bookmark(&row),
            None => Err(RepositoryError::NothingReturned),
        }
    }

    /// Merges the present fields of `patch` into the stored row. An empty patch only
    /// checks that the row exists.
    pub async fn update(&self, id: i64, patch: BookmarkPatch) -> Result<()> {
        if patch.is_empty() {
            return self.get_by_id(id).await.map(|_| ());
        }

        let mut updates = Vec::new();
        let mut params: Vec<libsql::Value> = Vec::new();

        if let Some(title) = patch.title {
            updates.push("title = ?");
            params.push(title.into());
        }
        if let Some(url) = patch.url {
            updates.push("url = ?");
            params.push(url.into());
        }
        if let Some(description) = patch.description {
            updates.push("description = ?");
            params.push(description.map_or(libsql::Value::Null, libsql::Value::from));
        }
        if let Some(rating) = patch.rating {
            updates.push("rating = ?");
            params.push(rating.into());
        }

        params.push(id.into());
        let query = format!("UPDATE bookmarks SET {} WHERE id = ?", updates.join(", "));

        match self.conn.execute(&query, params).await? {
            0 => Err(RepositoryError::NotFound(id)),
            _ => Ok(()),
        }
    }

    pub async fn delete(&self, id: i64) -> Result<()> {
        let affected = self
            .conn
            .execute("DELETE FROM bookmarks WHERE id = ?", libsql::params![id])
            .await?;

        match affected {
            0 => Err(RepositoryError::NotFound(id)),
            _ => Ok(()),
        }
    }

    fn row_to_bookmark(row: &libsql::Row) -> Result<Bookmark> {
        Ok(Bookmark {
            id: row.get(0)?,
            title: row.get(1)?,
            url: row.get(2)?,
            description: row.get::<Option<String>>(3)?,
            rating: row.get(4)?,
        })
    }
}
