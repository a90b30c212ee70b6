//! Configuration, prompt building, the recommendation pipeline, and the
//! per-trigger session state for Quotr.

pub mod bootstrap;
pub mod channel;
pub mod config;
pub mod error;
pub mod pipeline;
pub mod prompt;
pub mod session;
pub mod vault;

pub use channel::{Channel, ChannelError, ChannelMessage};
pub use error::{ErrorKind, RecommendError, ValidationError};
pub use session::{RunState, Session, TriggerOutcome};
