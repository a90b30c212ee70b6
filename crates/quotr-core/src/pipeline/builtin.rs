use std::sync::Arc;
use std::time::Duration;

use quotr_document::{DocumentLoader, ProcessedDocument, TextSplitter, combine_documents};
use quotr_llm::LlmError;
use quotr_llm::provider::{LlmProvider, Message};

use super::step::Step;
use super::{Corpus, PreparedRequest, RecommendationRequest};
use crate::error::RecommendError;
use crate::prompt::PromptTemplate;

/// Extracts and chunks every uploaded document, in upload order.
pub struct IngestStep<L> {
    loader: L,
    splitter: TextSplitter,
}

impl<L> IngestStep<L> {
    #[must_use]
    pub fn new(loader: L, splitter: TextSplitter) -> Self {
        Self { loader, splitter }
    }
}

impl<L: DocumentLoader> Step for IngestStep<L> {
    type Input = RecommendationRequest;
    type Output = PreparedRequest;

    const NAME: &'static str = "ingest";

    async fn run(&self, input: Self::Input) -> Result<Self::Output, RecommendError> {
        input.validate()?;
        let RecommendationRequest {
            query,
            documents,
            status,
        } = input;

        let mut processed = Vec::with_capacity(documents.len());
        for upload in documents {
            let file = upload.name.clone();
            let extracted = self
                .loader
                .load(upload)
                .await
                .map_err(|source| RecommendError::Parse {
                    file: file.clone(),
                    source,
                })?;
            let chunks = self.splitter.split_pages(&extracted.pages);
            let doc = ProcessedDocument {
                name: extracted.name,
                page_count: extracted.pages.len(),
                chunks,
            };

            tracing::info!(
                file = %doc.name,
                pages = doc.page_count,
                chunks = doc.chunks.len(),
                "document processed"
            );
            if let Some(tx) = &status {
                let line = format!(
                    "Loaded {} pages and split into {} chunks from '{}'",
                    doc.page_count,
                    doc.chunks.len(),
                    doc.name
                );
                if tx.send(line).is_err() {
                    tracing::debug!(file = %doc.name, "status receiver closed, line dropped");
                }
            }
            processed.push(doc);
        }

        Ok(PreparedRequest {
            query,
            documents: processed,
        })
    }
}

/// Joins chunks per document, then documents, into the model context.
pub struct AggregateStep;

impl Step for AggregateStep {
    type Input = PreparedRequest;
    type Output = Corpus;

    const NAME: &'static str = "aggregate";

    async fn run(&self, input: Self::Input) -> Result<Self::Output, RecommendError> {
        let text = combine_documents(input.documents.iter().map(ProcessedDocument::text));
        tracing::debug!(chars = text.chars().count(), "corpus assembled");
        Ok(Corpus {
            query: input.query,
            text,
        })
    }
}

pub struct PromptStep {
    template: PromptTemplate,
}

impl PromptStep {
    #[must_use]
    pub fn new(template: PromptTemplate) -> Self {
        Self { template }
    }
}

impl Step for PromptStep {
    type Input = Corpus;
    type Output = String;

    const NAME: &'static str = "prompt";

    async fn run(&self, input: Self::Input) -> Result<Self::Output, RecommendError> {
        Ok(self.template.format(&input.query, &input.text))
    }
}

/// Sends the prompt as a single user message, bounded by `timeout`.
pub struct LlmStep<P> {
    provider: Arc<P>,
    timeout: Duration,
}

impl<P> LlmStep<P> {
    #[must_use]
    pub fn new(provider: Arc<P>, timeout: Duration) -> Self {
        Self { provider, timeout }
    }
}

impl<P: LlmProvider> Step for LlmStep<P> {
    type Input = String;
    type Output = String;

    const NAME: &'static str = "llm";

    async fn run(&self, input: Self::Input) -> Result<Self::Output, RecommendError> {
        tracing::info!(
            provider = self.provider.name(),
            model = self.provider.model(),
            prompt_chars = input.chars().count(),
            "requesting recommendation"
        );
        let messages = [Message::user(input)];
        let response = tokio::time::timeout(self.timeout, self.provider.chat(&messages))
            .await
            .map_err(|_| LlmError::Timeout(self.timeout))?;

        match response {
            Ok(text) => {
                tracing::info!(chars = text.chars().count(), "recommendation received");
                Ok(text)
            }
            Err(e) => {
                tracing::warn!("model call failed: {e}");
                Err(e.into())
            }
        }
    }
}
