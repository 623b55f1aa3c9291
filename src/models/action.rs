//! Action vocabulary for dynamic article processing
//!
//! A closed enum replaces the raw token matching: one parsing function maps
//! the short and long token forms onto [`ArticleAction`], and a separate
//! pure default covers rows that carry no action at all. Because the default
//! is always `Create` or `Update`, resolution is a single step and can never
//! loop back into itself.

use serde::{Deserialize, Serialize};

use super::attributes::AttributeMap;

/// Processing action resolved from the `action` column of an upload row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArticleAction {
    Create,
    Update,
    /// Requested via the `x`/`delete` token; articles are closed, never erased.
    Close,
    Activate,
    Deactivate,
}

impl ArticleAction {
    /// Parse a raw action token. Unknown tokens yield `None`.
    pub fn parse(token: &str) -> Option<Self> {
        match token.trim() {
            "c" | "create" => Some(Self::Create),
            "u" | "update" => Some(Self::Update),
            "x" | "delete" => Some(Self::Close),
            "a" | "activate" => Some(Self::Activate),
            "d" | "deactivate" => Some(Self::Deactivate),
            _ => None,
        }
    }

    /// Default for rows without an action: update when the row names an id,
    /// create otherwise.
    pub fn default_for(attributes: &AttributeMap) -> Self {
        if attributes.has_id() {
            Self::Update
        } else {
            Self::Create
        }
    }
}
