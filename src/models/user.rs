//! Seller accounts
//!
//! The acting seller scopes every article lookup: processing only ever sees
//! articles owned by the seller it was handed.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A marketplace seller account.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "database", derive(sqlx::FromRow))]
pub struct User {
    pub id: Uuid,
    pub nickname: String,
    pub email: String,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl User {
    /// Create an unsaved user with a fresh id.
    pub fn new(nickname: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            nickname: nickname.into(),
            email: email.into(),
            created_at: None,
            updated_at: None,
        }
    }
}
