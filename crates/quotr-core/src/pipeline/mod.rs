//! Per-trigger flow: ingest → aggregate → prompt → model.

pub mod builder;
pub mod builtin;
pub mod step;

use std::sync::Arc;
use std::time::Duration;

use quotr_document::{DocumentLoader, ProcessedDocument, TextSplitter, UploadedDocument};
use quotr_llm::LlmProvider;
use tokio::sync::mpsc;

pub use builder::{Chain, Pipeline, Runnable, Start};
pub use step::Step;

use crate::error::ValidationError;
use crate::prompt::PromptTemplate;
use builtin::{AggregateStep, IngestStep, LlmStep, PromptStep};

/// Receives one status line per processed document.
pub type StatusTx = mpsc::UnboundedSender<String>;

/// Everything a single trigger submits.
#[derive(Debug)]
pub struct RecommendationRequest {
    pub query: String,
    pub documents: Vec<UploadedDocument>,
    pub status: Option<StatusTx>,
}

impl RecommendationRequest {
    #[must_use]
    pub fn new(query: impl Into<String>, documents: Vec<UploadedDocument>) -> Self {
        Self {
            query: query.into(),
            documents,
            status: None,
        }
    }

    #[must_use]
    pub fn with_status(mut self, tx: StatusTx) -> Self {
        self.status = Some(tx);
        self
    }

    /// # Errors
    ///
    /// Returns a [`ValidationError`] when no documents were given or the query is blank.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.documents.is_empty() {
            return Err(ValidationError::NoDocuments);
        }
        if self.query.trim().is_empty() {
            return Err(ValidationError::EmptyQuery);
        }
        Ok(())
    }
}

#[derive(Debug)]
pub struct PreparedRequest {
    pub query: String,
    pub documents: Vec<ProcessedDocument>,
}

/// The query and the combined text of all documents.
#[derive(Debug)]
pub struct Corpus {
    pub query: String,
    pub text: String,
}

pub type RecommendPipeline<L, P> =
    Pipeline<Chain<Chain<Chain<Start<IngestStep<L>>, AggregateStep>, PromptStep>, LlmStep<P>>>;

#[must_use]
pub fn recommend_pipeline<L: DocumentLoader, P: LlmProvider>(
    loader: L,
    splitter: TextSplitter,
    template: PromptTemplate,
    provider: Arc<P>,
    timeout: Duration,
) -> RecommendPipeline<L, P> {
    Pipeline::start(IngestStep::new(loader, splitter))
        .step(AggregateStep)
        .step(PromptStep::new(template))
        .step(LlmStep::new(provider, timeout))
}
