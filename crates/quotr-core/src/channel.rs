use std::future::Future;

/// Typed error for channel operations.
#[derive(Debug, thiserror::Error)]
pub enum ChannelError {
    /// Underlying I/O failure.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Input source closed while a read was pending.
    #[error("channel closed")]
    ChannelClosed,

    #[error("{0}")]
    Other(String),
}

/// A query typed by the user.
#[derive(Debug, Clone)]
pub struct ChannelMessage {
    pub text: String,
}

/// Front end that collects queries and renders trigger results.
pub trait Channel: Send {
    /// Receive the next query. Returns `None` when the user is done.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying I/O fails.
    fn recv(&mut self)
    -> impl Future<Output = Result<Option<ChannelMessage>, ChannelError>> + Send;

    /// Show a progress line, such as the per-document load summary.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying I/O fails.
    fn send_status(&mut self, text: &str)
    -> impl Future<Output = Result<(), ChannelError>> + Send;

    /// Show a non-fatal notice about rejected input.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying I/O fails.
    fn send_warning(&mut self, text: &str)
    -> impl Future<Output = Result<(), ChannelError>> + Send;

    /// Show a failed trigger.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying I/O fails.
    fn send_error(&mut self, text: &str) -> impl Future<Output = Result<(), ChannelError>> + Send;

    /// Render the recommendation section. Called even when `text` is empty.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying I/O fails.
    fn send_recommendation(
        &mut self,
        text: &str,
    ) -> impl Future<Output = Result<(), ChannelError>> + Send;
}
