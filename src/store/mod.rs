//! Persistence seam for article processing
//!
//! The processor talks to storage through [`ArticleStore`] only. Two
//! implementations ship with the crate: an in-memory store used by tests
//! and a Postgres store behind the `database` feature.

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::ProcessingResult;
use crate::models::Article;

#[cfg(feature = "database")]
pub mod database;
pub mod memory;
#[cfg(feature = "database")]
pub mod postgres;

#[cfg(feature = "database")]
pub use database::{DatabaseConfig, DatabaseManager};
pub use memory::MemoryArticleStore;
#[cfg(feature = "database")]
pub use postgres::PgArticleStore;

/// Owner-scoped article persistence.
///
/// Lookups never cross seller boundaries: callers pass the acting seller's
/// id and only that seller's articles are visible. Transition operations
/// are absolute state writes, so re-running one is harmless.
#[async_trait]
pub trait ArticleStore: Send + Sync {
    async fn find_owned_by_id(
        &self,
        seller_id: Uuid,
        id: Uuid,
    ) -> ProcessingResult<Option<Article>>;

    /// First match wins when legacy data holds duplicate identifiers.
    async fn find_owned_by_custom_identifier(
        &self,
        seller_id: Uuid,
        identifier: &str,
    ) -> ProcessingResult<Option<Article>>;

    /// Insert or update attribute state, filling in id and timestamps.
    /// Enforces per-seller uniqueness of `custom_seller_identifier`.
    async fn persist(&self, article: &mut Article) -> ProcessingResult<()>;

    async fn activate(&self, article: &mut Article) -> ProcessingResult<()>;

    async fn deactivate(&self, article: &mut Article) -> ProcessingResult<()>;

    /// Closing is terminal for listing purposes; rows are kept, not erased.
    async fn close(&self, article: &mut Article) -> ProcessingResult<()>;
}
