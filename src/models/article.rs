//! Article model and its processing-facing state
//!
//! Articles are the records a seller manages through mass upload. Besides
//! the persisted columns they carry two transient fields the processor works
//! with: an error list that accumulates row problems, and the requested
//! lifecycle transition the next commit should perform. Neither is written
//! to the database.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::attributes::{self, AttributeMap, CUSTOM_IDENTIFIER_KEY};
use super::image::ArticleImage;
use super::user::User;

/// Lifecycle state of an article.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "database", derive(sqlx::Type))]
#[cfg_attr(
    feature = "database",
    sqlx(type_name = "article_state", rename_all = "lowercase")
)]
#[serde(rename_all = "lowercase")]
pub enum ArticleState {
    #[default]
    Preview,
    Active,
    Locked,
    Closed,
}

/// Lifecycle transition requested by an upload row, applied by the next
/// commit. Transient: dispatch sets it, commit consumes it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RequestedTransition {
    #[default]
    None,
    Close,
    Activate,
    Deactivate,
}

/// A marketplace article.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "database", derive(sqlx::FromRow))]
pub struct Article {
    /// Primary key; `None` until persisted and on error placeholders.
    pub id: Option<Uuid>,
    pub seller_id: Option<Uuid>,
    /// Seller-supplied secondary key, unique per seller.
    pub custom_seller_identifier: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub price: Option<Decimal>,
    pub quantity: Option<i32>,
    pub condition: Option<String>,
    pub state: ArticleState,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,

    /// Row problems collected during processing; empty on success.
    #[serde(skip)]
    #[cfg_attr(feature = "database", sqlx(skip))]
    pub errors: Vec<String>,

    #[serde(skip)]
    #[cfg_attr(feature = "database", sqlx(skip))]
    pub requested_transition: RequestedTransition,

    #[serde(default)]
    #[cfg_attr(feature = "database", sqlx(skip))]
    pub images: Vec<ArticleImage>,
}

impl Article {
    /// Build a new unsaved article from one upload row, owned by `seller`.
    pub fn from_attributes(attributes: &AttributeMap, seller: &User) -> Self {
        let mut article = Self {
            seller_id: Some(seller.id),
            ..Self::default()
        };
        article.merge_attributes(attributes);
        article
    }

    /// Placeholder carried back to the upload list when a row cannot be
    /// resolved. Never has an id.
    pub fn error_placeholder(message: impl Into<String>) -> Self {
        let mut article = Self::default();
        article.errors.push(message.into());
        article
    }

    /// Merge the content columns of a row into this article. Columns not
    /// present in the row keep their current value; unknown columns are
    /// recorded as row errors rather than dropped silently.
    pub fn merge_attributes(&mut self, attributes: &AttributeMap) {
        for (key, value) in attributes.content_entries() {
            match key {
                "title" => self.title = attributes::as_text(value),
                "description" => self.description = attributes::as_text(value),
                "condition" => self.condition = attributes::as_text(value),
                CUSTOM_IDENTIFIER_KEY => {
                    self.custom_seller_identifier = attributes::as_text(value)
                }
                "price" => match attributes::as_decimal(value) {
                    Some(price) => self.price = Some(price),
                    None if value.is_null() => self.price = None,
                    None => self.add_error("Invalid value for 'price'"),
                },
                "quantity" => match attributes::as_int(value) {
                    Some(quantity) => self.quantity = Some(quantity),
                    None if value.is_null() => self.quantity = None,
                    None => self.add_error("Invalid value for 'quantity'"),
                },
                unknown => self.add_error(format!("Unknown attribute '{}'", unknown)),
            }
        }
    }

    pub fn add_error(&mut self, message: impl Into<String>) {
        self.errors.push(message.into());
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Validation run before a plain persist. Returns human-readable
    /// messages for the upload list; empty means the article may be saved.
    pub fn validation_errors(&self) -> Vec<String> {
        let mut problems = Vec::new();

        match &self.title {
            None => problems.push("Title is required".to_string()),
            Some(title) if title.chars().count() > 200 => {
                problems.push("Title is too long (maximum 200 characters)".to_string())
            }
            _ => {}
        }

        match self.price {
            None => problems.push("Price is required".to_string()),
            Some(price) if price < Decimal::ZERO => {
                problems.push("Price must not be negative".to_string())
            }
            _ => {}
        }

        if let Some(quantity) = self.quantity {
            if quantity < 1 {
                problems.push("Quantity must be at least 1".to_string());
            }
        }

        if let Some(identifier) = &self.custom_seller_identifier {
            let format = regex::Regex::new(r"^[A-Za-z0-9._-]{1,64}$").unwrap();
            if !format.is_match(identifier) {
                problems.push(format!(
                    "Custom seller identifier '{}' is not a valid identifier",
                    identifier
                ));
            }
        }

        problems
    }

    /// The image shown in listings: the first one, if any.
    pub fn title_image(&self) -> Option<&ArticleImage> {
        self.images.first()
    }
}
