//! Mass upload of articles
//!
//! Runs decoded upload rows through dispatch and commit, one row at a time,
//! and collects a per-row outcome for the upload list. Rows are independent:
//! a failing row is reported and the batch continues. Spreadsheet/CSV
//! decoding happens upstream; rows arrive here as [`AttributeMap`]s.

use serde::Serialize;
use tracing::{debug, info};

use crate::models::{Article, AttributeMap, User};
use crate::processing::ArticleProcessor;
use crate::store::ArticleStore;

/// Outcome of a single upload row.
#[derive(Debug, Clone, Serialize)]
pub struct RowOutcome {
    /// Zero-based row index within the upload.
    pub row: usize,
    /// The resolved article; on failure its error list says why.
    pub article: Article,
    pub committed: bool,
}

impl RowOutcome {
    pub fn succeeded(&self) -> bool {
        self.committed && !self.article.has_errors()
    }
}

/// Per-row outcomes of one upload.
#[derive(Debug, Clone, Default, Serialize)]
pub struct MassUploadReport {
    pub outcomes: Vec<RowOutcome>,
}

impl MassUploadReport {
    pub fn processed(&self) -> usize {
        self.outcomes.len()
    }

    pub fn committed(&self) -> usize {
        self.outcomes.iter().filter(|o| o.committed).count()
    }

    pub fn failed(&self) -> usize {
        self.outcomes.iter().filter(|o| !o.succeeded()).count()
    }
}

/// Processes whole uploads on behalf of one seller at a time.
pub struct MassUploadService<S> {
    processor: ArticleProcessor<S>,
}

impl<S: ArticleStore> MassUploadService<S> {
    pub fn new(processor: ArticleProcessor<S>) -> Self {
        Self { processor }
    }

    pub fn processor(&self) -> &ArticleProcessor<S> {
        &self.processor
    }

    /// Dispatch and commit every row, reporting per row.
    pub async fn process_rows(&self, rows: &[AttributeMap], seller: &User) -> MassUploadReport {
        info!("Processing mass upload of {} rows", rows.len());
        let mut report = MassUploadReport::default();

        for (row, attributes) in rows.iter().enumerate() {
            let mut article = self.processor.dispatch(attributes, seller).await;

            let committed = if article.has_errors() {
                debug!("Row {} failed during dispatch: {:?}", row, article.errors);
                false
            } else {
                match self.processor.commit(&mut article).await {
                    Ok(()) => true,
                    Err(err) => {
                        debug!("Row {} failed during commit: {}", row, err);
                        article.add_error(err.to_string());
                        false
                    }
                }
            };

            report.outcomes.push(RowOutcome {
                row,
                article,
                committed,
            });
        }

        info!(
            "Mass upload finished: {} committed, {} failed",
            report.committed(),
            report.failed()
        );
        report
    }
}
