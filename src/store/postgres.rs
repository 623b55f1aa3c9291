//! Postgres article store
//!
//! sqlx implementation of [`ArticleStore`] over the `articles` table. All
//! lookups are owner-scoped in SQL; transition operations are absolute
//! state writes.

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::{ProcessingError, ProcessingResult};
use crate::models::{Article, ArticleState};
use crate::store::ArticleStore;

const ARTICLE_COLUMNS: &str = "id, seller_id, custom_seller_identifier, title, description, \
     price, quantity, condition, state, created_at, updated_at";

/// Article store over a Postgres connection pool.
pub struct PgArticleStore {
    pool: PgPool,
}

impl PgArticleStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Per-seller uniqueness pre-check so callers get a typed error instead
    /// of a raw constraint violation from the partial unique index.
    async fn identifier_taken(
        &self,
        seller_id: Uuid,
        identifier: &str,
        own_id: Option<Uuid>,
    ) -> ProcessingResult<bool> {
        let existing: Option<Uuid> = sqlx::query_scalar(
            r#"
            SELECT id FROM articles
            WHERE seller_id = $1
              AND custom_seller_identifier = $2
              AND ($3::uuid IS NULL OR id <> $3)
            LIMIT 1
            "#,
        )
        .bind(seller_id)
        .bind(identifier)
        .bind(own_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(existing.is_some())
    }

    async fn write_state(
        &self,
        article: &mut Article,
        state: ArticleState,
    ) -> ProcessingResult<()> {
        let id = article
            .id
            .ok_or_else(|| ProcessingError::NotFound("article has no id".to_string()))?;
        let seller_id = article
            .seller_id
            .ok_or_else(|| ProcessingError::NotFound("article has no seller".to_string()))?;

        let updated = sqlx::query_as::<_, Article>(&format!(
            r#"
            UPDATE articles
            SET state = $3, updated_at = NOW()
            WHERE id = $1 AND seller_id = $2
            RETURNING {ARTICLE_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(seller_id)
        .bind(state)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| ProcessingError::NotFound(id.to_string()))?;

        article.state = updated.state;
        article.updated_at = updated.updated_at;
        debug!("Article {} moved to state {:?}", id, article.state);
        Ok(())
    }
}

#[async_trait]
impl ArticleStore for PgArticleStore {
    async fn find_owned_by_id(
        &self,
        seller_id: Uuid,
        id: Uuid,
    ) -> ProcessingResult<Option<Article>> {
        let article = sqlx::query_as::<_, Article>(&format!(
            r#"
            SELECT {ARTICLE_COLUMNS}
            FROM articles
            WHERE id = $1 AND seller_id = $2
            "#
        ))
        .bind(id)
        .bind(seller_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(article)
    }

    async fn find_owned_by_custom_identifier(
        &self,
        seller_id: Uuid,
        identifier: &str,
    ) -> ProcessingResult<Option<Article>> {
        // deterministic first match for legacy duplicates
        let article = sqlx::query_as::<_, Article>(&format!(
            r#"
            SELECT {ARTICLE_COLUMNS}
            FROM articles
            WHERE seller_id = $1 AND custom_seller_identifier = $2
            ORDER BY created_at, id
            LIMIT 1
            "#
        ))
        .bind(seller_id)
        .bind(identifier)
        .fetch_optional(&self.pool)
        .await?;

        Ok(article)
    }

    async fn persist(&self, article: &mut Article) -> ProcessingResult<()> {
        let seller_id = article.seller_id.ok_or_else(|| {
            ProcessingError::Validation("article has no seller".to_string())
        })?;

        if let Some(identifier) = article.custom_seller_identifier.as_deref() {
            if self.identifier_taken(seller_id, identifier, article.id).await? {
                return Err(ProcessingError::UniquenessViolation(format!(
                    "custom_seller_identifier '{}' is already taken",
                    identifier
                )));
            }
        }

        let saved = match article.id {
            None => {
                let id = Uuid::new_v4();
                sqlx::query_as::<_, Article>(&format!(
                    r#"
                    INSERT INTO articles (
                        id, seller_id, custom_seller_identifier, title, description,
                        price, quantity, condition, state, created_at, updated_at
                    ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, NOW(), NOW())
                    RETURNING {ARTICLE_COLUMNS}
                    "#
                ))
                .bind(id)
                .bind(seller_id)
                .bind(&article.custom_seller_identifier)
                .bind(&article.title)
                .bind(&article.description)
                .bind(article.price)
                .bind(article.quantity)
                .bind(&article.condition)
                .bind(article.state)
                .fetch_one(&self.pool)
                .await?
            }
            Some(id) => sqlx::query_as::<_, Article>(&format!(
                r#"
                UPDATE articles
                SET custom_seller_identifier = $3,
                    title = $4,
                    description = $5,
                    price = $6,
                    quantity = $7,
                    condition = $8,
                    updated_at = NOW()
                WHERE id = $1 AND seller_id = $2
                RETURNING {ARTICLE_COLUMNS}
                "#
            ))
            .bind(id)
            .bind(seller_id)
            .bind(&article.custom_seller_identifier)
            .bind(&article.title)
            .bind(&article.description)
            .bind(article.price)
            .bind(article.quantity)
            .bind(&article.condition)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| ProcessingError::NotFound(id.to_string()))?,
        };

        info!(
            "Persisted article {} for seller {}",
            saved.id.map(|id| id.to_string()).unwrap_or_default(),
            seller_id
        );

        article.id = saved.id;
        article.state = saved.state;
        article.created_at = saved.created_at;
        article.updated_at = saved.updated_at;
        Ok(())
    }

    async fn activate(&self, article: &mut Article) -> ProcessingResult<()> {
        self.write_state(article, ArticleState::Active).await
    }

    async fn deactivate(&self, article: &mut Article) -> ProcessingResult<()> {
        self.write_state(article, ArticleState::Locked).await
    }

    async fn close(&self, article: &mut Article) -> ProcessingResult<()> {
        self.write_state(article, ArticleState::Closed).await
    }
}
