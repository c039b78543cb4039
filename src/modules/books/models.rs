use serde::{Deserialize, Serialize};
use stacks_http::{field_error, Validate};

use crate::utils::{double_option, require_text};

/// A catalogued title and its shelf stock.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Book {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub author_id: i64,
    /// Copies not currently borrowed; never negative
    pub available_copies: i64,
}

/// Request model for creating a book.
#[derive(Debug, Clone, Deserialize)]
pub struct NewBook {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub author_id: i64,
    #[serde(default)]
    pub available_copies: i64,
}

impl NewBook {
    pub fn normalized(self) -> Self {
        Self {
            title: self.title.trim().to_string(),
            ..self
        }
    }
}

impl Validate for NewBook {
    fn validate(&self) -> Result<(), Vec<serde_json::Value>> {
        let mut details = Vec::new();
        require_text("title", &self.title, &mut details);
        if self.available_copies < 0 {
            details.push(field_error("available_copies", "must not be negative"));
        }
        if details.is_empty() {
            Ok(())
        } else {
            Err(details)
        }
    }
}

/// Partial update of the descriptive fields.
///
/// Stock is not part of this payload: copies move only through borrows and
/// returns, so `available_copies` is rejected as an unknown field.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BookPatch {
    pub title: Option<String>,
    /// `null` clears the description; omitting it keeps the stored value
    #[serde(default, deserialize_with = "double_option")]
    pub description: Option<Option<String>>,
}

impl BookPatch {
    pub fn normalized(self) -> Self {
        Self {
            title: self.title.map(|title| title.trim().to_string()),
            ..self
        }
    }
}

impl Validate for BookPatch {
    fn validate(&self) -> Result<(), Vec<serde_json::Value>> {
        let mut details = Vec::new();
        if let Some(title) = &self.title {
            require_text("title", title, &mut details);
        }
        if details.is_empty() {
            Ok(())
        } else {
            Err(details)
        }
    }
}
