//! Article images

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// An image attached to an article. Ordering within an article follows
/// `position`, lowest first.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "database", derive(sqlx::FromRow))]
pub struct ArticleImage {
    pub id: Uuid,
    pub article_id: Option<Uuid>,
    pub url: String,
    pub position: i32,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl ArticleImage {
    /// Create an unsaved image with a fresh id.
    pub fn new(url: impl Into<String>, position: i32) -> Self {
        Self {
            id: Uuid::new_v4(),
            article_id: None,
            url: url.into(),
            position,
            created_at: None,
            updated_at: None,
        }
    }
}
