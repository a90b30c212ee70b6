use quotr_document::DocumentError;
use quotr_llm::LlmError;

use crate::prompt::TemplateError;

/// Inputs rejected before any work is done. Shown as a warning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Please upload at least one PDF document and enter your query.")]
    NoDocuments,
    #[error("Please upload at least one PDF document and enter your query.")]
    EmptyQuery,
}

/// Broad classification of a [`RecommendError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    Parse,
    Configuration,
    RemoteService,
}

/// Failure of a single recommendation trigger.
#[derive(Debug, thiserror::Error)]
pub enum RecommendError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Could not read '{file}': {source}")]
    Parse {
        file: String,
        #[source]
        source: DocumentError,
    },

    #[error("The prompt template is invalid: {0}")]
    Template(#[from] TemplateError),

    #[error("The model service rejected the credentials ({0}). Check QUOTR_API_KEY or GROQ_API_KEY.")]
    Auth(#[source] LlmError),

    #[error("The model service is rate limiting requests. Wait a moment and try again.")]
    RateLimit(#[source] LlmError),

    #[error("Could not reach the model service ({0}). Check your connection and try again.")]
    Network(#[source] LlmError),

    #[error("The model service returned an unusable response: {0}")]
    Model(#[source] LlmError),
}

impl RecommendError {
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Validation(_) => ErrorKind::Validation,
            Self::Parse { .. } => ErrorKind::Parse,
            Self::Template(_) | Self::Auth(_) => ErrorKind::Configuration,
            Self::RateLimit(_) | Self::Network(_) | Self::Model(_) => ErrorKind::RemoteService,
        }
    }
}

impl From<LlmError> for RecommendError {
    fn from(err: LlmError) -> Self {
        if err.is_transport() {
            return Self::Network(err);
        }
        match err {
            LlmError::MissingApiKey { .. } | LlmError::Unauthorized { .. } => Self::Auth(err),
            LlmError::RateLimited => Self::RateLimit(err),
            _ => Self::Model(err),
        }
    }
}
