use serde::{Deserialize, Serialize};
use stacks_http::Validate;
use time::Date;

use crate::utils::require_text;

/// A person who wrote one or more books.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Author {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    /// Serialized as `YYYY-MM-DD`
    pub birth_date: Date,
}

/// Request model for creating an author.
#[derive(Debug, Clone, Deserialize)]
pub struct NewAuthor {
    pub first_name: String,
    pub last_name: String,
    pub birth_date: Date,
}

impl NewAuthor {
    /// Trim surrounding whitespace so equality checks compare what readers see.
    pub fn normalized(self) -> Self {
        Self {
            first_name: self.first_name.trim().to_string(),
            last_name: self.last_name.trim().to_string(),
            birth_date: self.birth_date,
        }
    }
}

impl Validate for NewAuthor {
    fn validate(&self) -> Result<(), Vec<serde_json::Value>> {
        let mut details = Vec::new();
        require_text("first_name", &self.first_name, &mut details);
        require_text("last_name", &self.last_name, &mut details);
        if details.is_empty() {
            Ok(())
        } else {
            Err(details)
        }
    }
}

/// Partial update; omitted fields keep their stored value. An empty patch
/// changes nothing.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AuthorPatch {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub birth_date: Option<Date>,
}

impl AuthorPatch {
    pub fn normalized(self) -> Self {
        Self {
            first_name: self.first_name.map(|s| s.trim().to_string()),
            last_name: self.last_name.map(|s| s.trim().to_string()),
            birth_date: self.birth_date,
        }
    }
}

impl Validate for AuthorPatch {
    fn validate(&self) -> Result<(), Vec<serde_json::Value>> {
        let mut details = Vec::new();
        if let Some(first_name) = &self.first_name {
            require_text("first_name", first_name, &mut details);
        }
        if let Some(last_name) = &self.last_name {
            require_text("last_name", last_name, &mut details);
        }
        if details.is_empty() {
            Ok(())
        } else {
            Err(details)
        }
    }
}
