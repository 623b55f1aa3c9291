//! In-memory article store
//!
//! HashMap-backed [`ArticleStore`] used by unit and integration tests; no
//! database required. Shares its state across clones so tests can keep a
//! handle after moving the store into a processor. Also records the order
//! of transition calls, which the transition tests assert on.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use crate::error::{ProcessingError, ProcessingResult};
use crate::models::{Article, ArticleState};
use crate::store::ArticleStore;

#[derive(Default)]
struct MemoryState {
    articles: HashMap<Uuid, Article>,
    // insertion order; custom-identifier lookups take the first match
    order: Vec<Uuid>,
    transition_log: Vec<String>,
}

/// Article store over process memory.
#[derive(Clone, Default)]
pub struct MemoryArticleStore {
    state: Arc<Mutex<MemoryState>>,
}

impl MemoryArticleStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Transition operations applied so far, in call order.
    pub fn transition_log(&self) -> Vec<String> {
        self.state.lock().unwrap().transition_log.clone()
    }

    /// Number of stored articles.
    pub fn len(&self) -> usize {
        self.state.lock().unwrap().articles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn apply_transition(
        &self,
        article: &mut Article,
        operation: &'static str,
        state: ArticleState,
    ) -> ProcessingResult<()> {
        let id = article
            .id
            .ok_or_else(|| ProcessingError::NotFound("article has no id".to_string()))?;

        let mut guard = self.state.lock().unwrap();
        let stored = guard
            .articles
            .get_mut(&id)
            .ok_or_else(|| ProcessingError::NotFound(id.to_string()))?;
        stored.state = state;
        stored.updated_at = Some(Utc::now());
        article.state = state;
        article.updated_at = stored.updated_at;
        guard.transition_log.push(operation.to_string());
        Ok(())
    }
}

#[async_trait]
impl ArticleStore for MemoryArticleStore {
    async fn find_owned_by_id(
        &self,
        seller_id: Uuid,
        id: Uuid,
    ) -> ProcessingResult<Option<Article>> {
        let guard = self.state.lock().unwrap();
        Ok(guard
            .articles
            .get(&id)
            .filter(|article| article.seller_id == Some(seller_id))
            .cloned())
    }

    async fn find_owned_by_custom_identifier(
        &self,
        seller_id: Uuid,
        identifier: &str,
    ) -> ProcessingResult<Option<Article>> {
        let guard = self.state.lock().unwrap();
        for id in &guard.order {
            if let Some(article) = guard.articles.get(id) {
                if article.seller_id == Some(seller_id)
                    && article.custom_seller_identifier.as_deref() == Some(identifier)
                {
                    return Ok(Some(article.clone()));
                }
            }
        }
        Ok(None)
    }

    async fn persist(&self, article: &mut Article) -> ProcessingResult<()> {
        let mut guard = self.state.lock().unwrap();

        if let (Some(seller_id), Some(identifier)) =
            (article.seller_id, article.custom_seller_identifier.as_deref())
        {
            let taken = guard.articles.values().any(|existing| {
                existing.id != article.id
                    && existing.seller_id == Some(seller_id)
                    && existing.custom_seller_identifier.as_deref() == Some(identifier)
            });
            if taken {
                return Err(ProcessingError::UniquenessViolation(format!(
                    "custom_seller_identifier '{}' is already taken",
                    identifier
                )));
            }
        }

        let now = Utc::now();
        match article.id {
            Some(id) => {
                if !guard.articles.contains_key(&id) {
                    return Err(ProcessingError::NotFound(id.to_string()));
                }
                article.updated_at = Some(now);
                guard.articles.insert(id, article.clone());
            }
            None => {
                let id = Uuid::new_v4();
                article.id = Some(id);
                article.created_at = Some(now);
                article.updated_at = Some(now);
                guard.articles.insert(id, article.clone());
                guard.order.push(id);
            }
        }
        Ok(())
    }

    async fn activate(&self, article: &mut Article) -> ProcessingResult<()> {
        self.apply_transition(article, "activate", ArticleState::Active)
    }

    async fn deactivate(&self, article: &mut Article) -> ProcessingResult<()> {
        self.apply_transition(article, "deactivate", ArticleState::Locked)
    }

    async fn close(&self, article: &mut Article) -> ProcessingResult<()> {
        self.apply_transition(article, "close", ArticleState::Closed)
    }
}
