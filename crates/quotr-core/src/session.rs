use quotr_document::UploadedDocument;
use tokio::sync::mpsc;

use crate::channel::{Channel, ChannelError};
use crate::error::{RecommendError, ValidationError};
use crate::pipeline::{Pipeline, RecommendationRequest, Runnable};

/// Where a session is within one trigger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Idle,
    Validating,
    Processing,
    Done,
    Failed,
}

/// Result of one trigger as rendered to the channel.
#[derive(Debug)]
pub enum TriggerOutcome {
    Recommendation(String),
    Warning(ValidationError),
    Failed(RecommendError),
}

/// Drives triggers against a fixed set of uploaded documents.
///
/// Triggers run one at a time and share nothing but the documents, so each
/// query is answered independently.
pub struct Session<C, S> {
    channel: C,
    pipeline: Pipeline<S>,
    state: RunState,
}

impl<C, S> Session<C, S>
where
    C: Channel,
    S: Runnable<Input = RecommendationRequest, Output = String>,
{
    #[must_use]
    pub fn new(channel: C, pipeline: Pipeline<S>) -> Self {
        Self {
            channel,
            pipeline,
            state: RunState::Idle,
        }
    }

    #[must_use]
    pub fn state(&self) -> RunState {
        self.state
    }

    #[must_use]
    pub fn channel(&self) -> &C {
        &self.channel
    }

    pub fn into_channel(self) -> C {
        self.channel
    }

    /// Run one query against `documents` and render the outcome.
    ///
    /// Validation and pipeline failures are rendered and returned as outcomes.
    /// The session is back in [`RunState::Idle`] when this returns, whatever happened.
    ///
    /// # Errors
    ///
    /// Returns an error only if the channel fails to render.
    pub async fn trigger(
        &mut self,
        documents: &[UploadedDocument],
        query: &str,
    ) -> Result<TriggerOutcome, ChannelError> {
        self.state = RunState::Validating;
        let request = RecommendationRequest::new(query, documents.to_vec());
        if let Err(warning) = request.validate() {
            tracing::debug!("trigger rejected: {warning:?}");
            let rendered = self.channel.send_warning(&warning.to_string()).await;
            self.state = RunState::Idle;
            rendered?;
            return Ok(TriggerOutcome::Warning(warning));
        }

        self.state = RunState::Processing;
        tracing::info!(
            documents = documents.len(),
            stages = ?self.pipeline.stages(),
            "processing trigger"
        );

        let (tx, mut rx) = mpsc::unbounded_channel::<String>();
        let request = request.with_status(tx);
        let channel = &mut self.channel;
        let drain = async {
            while let Some(line) = rx.recv().await {
                channel.send_status(&line).await?;
            }
            Ok::<(), ChannelError>(())
        };
        let (result, drained) = tokio::join!(self.pipeline.run(request), drain);

        let (outcome, rendered) = match result {
            Ok(text) => {
                self.state = RunState::Done;
                let rendered = self.channel.send_recommendation(&text).await;
                (TriggerOutcome::Recommendation(text), rendered)
            }
            Err(RecommendError::Validation(warning)) => {
                self.state = RunState::Failed;
                let rendered = self.channel.send_warning(&warning.to_string()).await;
                (TriggerOutcome::Warning(warning), rendered)
            }
            Err(e) => {
                self.state = RunState::Failed;
                tracing::error!(kind = ?e.kind(), "trigger failed: {e}");
                let rendered = self.channel.send_error(&e.to_string()).await;
                (TriggerOutcome::Failed(e), rendered)
            }
        };

        self.state = RunState::Idle;
        drained?;
        rendered?;
        Ok(outcome)
    }

    /// Answer queries from the channel until it is closed.
    ///
    /// # Errors
    ///
    /// Returns an error if the channel fails.
    pub async fn run(&mut self, documents: &[UploadedDocument]) -> Result<(), ChannelError> {
        while let Some(msg) = self.channel.recv().await? {
            self.trigger(documents, &msg.text).await?;
        }
        tracing::debug!("input closed, leaving session");
        Ok(())
    }
}
