//! Chat-completion provider abstraction and OpenAI-compatible backends.

pub mod any;
pub mod compatible;
pub mod error;
pub mod http;
#[cfg(feature = "mock")]
pub mod mock;
pub mod openai;
pub mod provider;

pub use error::LlmError;
pub use provider::LlmProvider;
pub use reqwest::StatusCode;
