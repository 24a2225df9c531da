use serde::{Deserialize, Serialize};

/// A saved link as stored in the `bookmarks` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bookmark {
    pub id: i64,
    pub title: String,
    pub url: String,
    pub description: Option<String>,
    pub rating: i64,
}

/// A validated create payload; the store assigns the id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewBookmark {
    pub title: String,
    pub url: String,
    pub description: Option<String>,
    pub rating: i64,
}

/// The recognized fields of a partial update. `description: Some(None)` clears it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookmarkPatch {
    pub title: Option<String>,
    pub url: Option<String>,
    pub description: Option<Option<String>>,
    pub rating: Option<i64>,
}

impl BookmarkPatch {
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.url.is_none() && self.description.is_none() && self.rating.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_patch_emptiness() {
        assert!(BookmarkPatch::default().is_empty());

        let clear_description = BookmarkPatch {
            description: Some(None),
            ..Default::default()
        };
        assert!(!clear_description.is_empty());

        let rating = BookmarkPatch {
            rating: Some(3),
            ..Default::default()
        };
        assert!(!rating.is_empty());
    }
}
