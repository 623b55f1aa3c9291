//! Dynamic article processing for seller mass uploads
//!
//! Maps the `action` column of one upload row to a create, update, or
//! state-transition operation on an article. Dispatch only reads from the
//! store; nothing is written until [`ArticleProcessor::commit`] runs, so a
//! caller can resolve a whole upload before committing any row.
//!
//! Each dispatch performs exactly one of: construct a new article, merge
//! row columns into an existing one, or flag a requested transition on an
//! existing one. Row problems come back inline on the article rather than
//! as errors, which keeps one bad row from aborting a batch.

use tracing::{debug, warn};

use crate::error::{ProcessingError, ProcessingResult};
use crate::models::{Article, ArticleAction, AttributeMap, RequestedTransition, User};
use crate::store::ArticleStore;

/// Processes upload rows against a persistence store.
pub struct ArticleProcessor<S> {
    store: S,
}

impl<S: ArticleStore> ArticleProcessor<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Resolve one upload row into an article ready for [`commit`](Self::commit).
    ///
    /// Rows without an action default to update when they name an id and
    /// create otherwise. Resolution failures (unknown action, missing
    /// identifier, lookup miss) are recorded on the returned placeholder
    /// article; the caller must check [`Article::has_errors`] before
    /// committing.
    pub async fn dispatch(&self, attributes: &AttributeMap, seller: &User) -> Article {
        let action = match attributes.action() {
            Some(token) => match ArticleAction::parse(&token) {
                Some(action) => action,
                None => {
                    warn!("Unknown action token '{}' in upload row", token);
                    return Article::error_placeholder("Unknown action");
                }
            },
            None => ArticleAction::default_for(attributes),
        };
        debug!("Dispatching upload row as {:?}", action);

        match action {
            ArticleAction::Create => Article::from_attributes(attributes, seller),
            ArticleAction::Update => {
                let mut article = self.find_by_id_or_custom_identifier(attributes, seller).await;
                if !article.has_errors() {
                    article.merge_attributes(attributes);
                }
                article
            }
            ArticleAction::Close => {
                self.flag_transition(attributes, seller, RequestedTransition::Close)
                    .await
            }
            ArticleAction::Activate => {
                self.flag_transition(attributes, seller, RequestedTransition::Activate)
                    .await
            }
            ArticleAction::Deactivate => {
                self.flag_transition(attributes, seller, RequestedTransition::Deactivate)
                    .await
            }
        }
    }

    /// Persist the outcome of a dispatched row.
    ///
    /// The requested transition decides what happens: close runs deactivate
    /// and then close, activate/deactivate run the matching state change,
    /// and a row without a transition is validated and persisted as
    /// attribute state.
    pub async fn commit(&self, article: &mut Article) -> ProcessingResult<()> {
        if article.has_errors() {
            return Err(ProcessingError::Validation(article.errors.join(", ")));
        }

        match article.requested_transition {
            RequestedTransition::Close => {
                self.store.deactivate(article).await?;
                self.store.close(article).await
            }
            RequestedTransition::Activate => self.store.activate(article).await,
            RequestedTransition::Deactivate => self.store.deactivate(article).await,
            RequestedTransition::None => {
                let problems = article.validation_errors();
                if !problems.is_empty() {
                    return Err(ProcessingError::Validation(problems.join(", ")));
                }
                self.store.persist(article).await
            }
        }
    }

    /// Sellers may address rows by their own identifier column, but the
    /// primary key wins when both are present.
    async fn find_by_id_or_custom_identifier(
        &self,
        attributes: &AttributeMap,
        seller: &User,
    ) -> Article {
        let lookup = if attributes.has_id() {
            match attributes.id() {
                Some(id) => self.store.find_owned_by_id(seller.id, id).await,
                // id column present but not a usable key
                None => Ok(None),
            }
        } else if let Some(identifier) = attributes.custom_seller_identifier() {
            self.store
                .find_owned_by_custom_identifier(seller.id, &identifier)
                .await
        } else {
            return Article::error_placeholder("No unique identifier");
        };

        match lookup {
            Ok(Some(article)) => article,
            Ok(None) => Article::error_placeholder("Couldn't be found"),
            Err(err) => {
                warn!("Article lookup failed: {}", err);
                Article::error_placeholder(format!("Lookup failed: {}", err))
            }
        }
    }

    async fn flag_transition(
        &self,
        attributes: &AttributeMap,
        seller: &User,
        transition: RequestedTransition,
    ) -> Article {
        let mut article = self.find_by_id_or_custom_identifier(attributes, seller).await;
        if !article.has_errors() {
            article.requested_transition = transition;
        }
        article
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ArticleState;
    use crate::store::MemoryArticleStore;
    use rust_decimal::Decimal;

    fn processor() -> ArticleProcessor<MemoryArticleStore> {
        ArticleProcessor::new(MemoryArticleStore::new())
    }

    fn create_row(title: &str) -> AttributeMap {
        AttributeMap::new()
            .with("action", "c")
            .with("title", title)
            .with("price", "4.50")
    }

    async fn seeded_article(
        processor: &ArticleProcessor<MemoryArticleStore>,
        seller: &User,
        title: &str,
    ) -> Article {
        let mut article = processor.dispatch(&create_row(title), seller).await;
        processor.commit(&mut article).await.unwrap();
        article
    }

    #[tokio::test]
    async fn create_returns_an_unsaved_article_with_row_fields() {
        let processor = processor();
        let seller = User::new("bookworm", "seller@example.com");

        let article = processor.dispatch(&create_row("Used paperback"), &seller).await;

        assert!(article.id.is_none());
        assert!(!article.has_errors());
        assert_eq!(article.title.as_deref(), Some("Used paperback"));
        assert_eq!(article.price, Some(Decimal::new(450, 2)));
        assert_eq!(article.seller_id, Some(seller.id));
        assert_eq!(article.state, ArticleState::Preview);
    }

    #[tokio::test]
    async fn update_merges_row_into_owned_article() {
        let processor = processor();
        let seller = User::new("bookworm", "seller@example.com");
        let existing = seeded_article(&processor, &seller, "Used paperback").await;

        let row = AttributeMap::new()
            .with("action", "u")
            .with("id", existing.id.unwrap().to_string())
            .with("title", "Signed paperback");
        let article = processor.dispatch(&row, &seller).await;

        assert_eq!(article.id, existing.id);
        assert_eq!(article.title.as_deref(), Some("Signed paperback"));
        assert_eq!(article.requested_transition, RequestedTransition::None);
        assert!(!article.has_errors());
    }

    #[tokio::test]
    async fn absent_action_with_id_behaves_like_update() {
        let processor = processor();
        let seller = User::new("bookworm", "seller@example.com");
        let existing = seeded_article(&processor, &seller, "Used paperback").await;

        let row = AttributeMap::new()
            .with("id", existing.id.unwrap().to_string())
            .with("title", "Signed paperback");
        let article = processor.dispatch(&row, &seller).await;

        assert_eq!(article.id, existing.id);
        assert_eq!(article.title.as_deref(), Some("Signed paperback"));
    }

    #[tokio::test]
    async fn absent_action_without_id_behaves_like_create() {
        let processor = processor();
        let seller = User::new("bookworm", "seller@example.com");

        let row = AttributeMap::new()
            .with("title", "Used paperback")
            .with("price", "4.50");
        let article = processor.dispatch(&row, &seller).await;

        assert!(article.id.is_none());
        assert!(!article.has_errors());
        assert_eq!(article.title.as_deref(), Some("Used paperback"));
    }

    #[tokio::test]
    async fn delete_flags_close_and_commit_deactivates_then_closes() {
        let processor = processor();
        let seller = User::new("bookworm", "seller@example.com");
        let existing = seeded_article(&processor, &seller, "Used paperback").await;

        let row = AttributeMap::new()
            .with("action", "x")
            .with("id", existing.id.unwrap().to_string());
        let mut article = processor.dispatch(&row, &seller).await;
        assert_eq!(article.requested_transition, RequestedTransition::Close);

        processor.commit(&mut article).await.unwrap();
        assert_eq!(article.state, ArticleState::Closed);
        assert_eq!(
            processor.store().transition_log(),
            vec!["deactivate".to_string(), "close".to_string()]
        );
    }

    #[tokio::test]
    async fn activate_and_deactivate_flag_their_transitions() {
        let processor = processor();
        let seller = User::new("bookworm", "seller@example.com");
        let existing = seeded_article(&processor, &seller, "Used paperback").await;
        let id = existing.id.unwrap().to_string();

        let row = AttributeMap::new().with("action", "a").with("id", id.clone());
        let mut article = processor.dispatch(&row, &seller).await;
        assert_eq!(article.requested_transition, RequestedTransition::Activate);
        processor.commit(&mut article).await.unwrap();
        assert_eq!(article.state, ArticleState::Active);

        let row = AttributeMap::new().with("action", "d").with("id", id);
        let mut article = processor.dispatch(&row, &seller).await;
        assert_eq!(article.requested_transition, RequestedTransition::Deactivate);
        processor.commit(&mut article).await.unwrap();
        assert_eq!(article.state, ArticleState::Locked);
    }

    #[tokio::test]
    async fn unknown_action_returns_placeholder() {
        let processor = processor();
        let seller = User::new("bookworm", "seller@example.com");

        let row = AttributeMap::new().with("action", "zzz");
        let article = processor.dispatch(&row, &seller).await;

        assert!(article.id.is_none());
        assert_eq!(article.errors, vec!["Unknown action".to_string()]);
    }

    #[tokio::test]
    async fn non_create_without_identifier_reports_missing_identifier() {
        let processor = processor();
        let seller = User::new("bookworm", "seller@example.com");

        let row = AttributeMap::new().with("action", "u").with("title", "New title");
        let article = processor.dispatch(&row, &seller).await;

        assert_eq!(article.errors, vec!["No unique identifier".to_string()]);
    }

    #[tokio::test]
    async fn unmatched_custom_identifier_reports_not_found() {
        let processor = processor();
        let seller = User::new("bookworm", "seller@example.com");

        let row = AttributeMap::new()
            .with("action", "u")
            .with("custom_seller_identifier", "sku-1");
        let article = processor.dispatch(&row, &seller).await;

        assert!(article.id.is_none());
        assert_eq!(article.errors, vec!["Couldn't be found".to_string()]);
    }

    #[tokio::test]
    async fn lookup_by_custom_identifier_finds_owned_article() {
        let processor = processor();
        let seller = User::new("bookworm", "seller@example.com");

        let mut article = processor
            .dispatch(
                &create_row("Used paperback").with("custom_seller_identifier", "sku-1"),
                &seller,
            )
            .await;
        processor.commit(&mut article).await.unwrap();

        let row = AttributeMap::new()
            .with("action", "u")
            .with("custom_seller_identifier", "sku-1")
            .with("title", "Signed paperback");
        let updated = processor.dispatch(&row, &seller).await;

        assert_eq!(updated.id, article.id);
        assert_eq!(updated.title.as_deref(), Some("Signed paperback"));
    }

    #[tokio::test]
    async fn lookups_never_cross_seller_boundaries() {
        let processor = processor();
        let owner = User::new("bookworm", "seller@example.com");
        let other = User::new("intruder", "other@example.com");
        let existing = seeded_article(&processor, &owner, "Used paperback").await;

        let row = AttributeMap::new()
            .with("action", "u")
            .with("id", existing.id.unwrap().to_string())
            .with("title", "Hijacked");
        let article = processor.dispatch(&row, &other).await;

        assert_eq!(article.errors, vec!["Couldn't be found".to_string()]);
    }

    #[tokio::test]
    async fn commit_rejects_articles_with_dispatch_errors() {
        let processor = processor();
        let mut placeholder = Article::error_placeholder("Unknown action");

        let err = processor.commit(&mut placeholder).await.unwrap_err();
        assert!(matches!(err, ProcessingError::Validation(_)));
    }

    #[tokio::test]
    async fn commit_validates_plain_persists() {
        let processor = processor();
        let seller = User::new("bookworm", "seller@example.com");

        let row = AttributeMap::new().with("action", "c").with("title", "No price");
        let mut article = processor.dispatch(&row, &seller).await;

        let err = processor.commit(&mut article).await.unwrap_err();
        match err {
            ProcessingError::Validation(message) => {
                assert!(message.contains("Price is required"))
            }
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn committing_the_same_transition_twice_is_safe() {
        let processor = processor();
        let seller = User::new("bookworm", "seller@example.com");
        let existing = seeded_article(&processor, &seller, "Used paperback").await;

        let row = AttributeMap::new()
            .with("action", "a")
            .with("id", existing.id.unwrap().to_string());
        let mut article = processor.dispatch(&row, &seller).await;

        processor.commit(&mut article).await.unwrap();
        processor.commit(&mut article).await.unwrap();
        assert_eq!(article.state, ArticleState::Active);
    }
}
