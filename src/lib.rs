//! fairmarkt - marketplace article records and dynamic processing
//!
//! A fragment of an online marketplace backend: database-backed article,
//! image, and user models plus the processing core behind seller mass
//! uploads. Each upload row carries an optional action code deciding
//! whether the row creates an article, updates one, or requests a
//! lifecycle transition; dispatch resolves the row, commit persists it.
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use fairmarkt::models::{AttributeMap, User};
//! use fairmarkt::processing::ArticleProcessor;
//! use fairmarkt::store::MemoryArticleStore;
//!
//! # async fn run() {
//! let processor = ArticleProcessor::new(MemoryArticleStore::new());
//! let seller = User::new("bookworm", "seller@example.com");
//!
//! let row = AttributeMap::new()
//!     .with("action", "c")
//!     .with("title", "Used paperback")
//!     .with("price", "4.50");
//!
//! let mut article = processor.dispatch(&row, &seller).await;
//! assert!(!article.has_errors());
//! processor.commit(&mut article).await.unwrap();
//! # }
//! ```
//!
//! Database persistence lives behind the `database` cargo feature; without
//! it the crate compiles with the in-memory store only.

// Core error handling
pub mod error;

// Record models and processing vocabulary
pub mod models;

// The dispatch/commit core
pub mod processing;

// Mass upload on top of the core
pub mod services;

// Persistence seam and its implementations
pub mod store;

// Public re-exports
pub use error::{ProcessingError, ProcessingResult};
pub use models::{
    Article, ArticleAction, ArticleImage, ArticleState, AttributeMap, RequestedTransition, User,
};
pub use processing::ArticleProcessor;
pub use services::{MassUploadReport, MassUploadService, RowOutcome};
pub use store::{ArticleStore, MemoryArticleStore};

// Database integration re-exports (when the database feature is enabled)
#[cfg(feature = "database")]
pub use store::{DatabaseConfig, DatabaseManager, PgArticleStore};
