//! Document handling: PDF page extraction, chunking, and aggregation.

pub mod aggregate;
pub mod error;
pub mod loader;
pub mod splitter;
pub mod types;

pub use aggregate::{CHUNK_SEPARATOR, DOCUMENT_SEPARATOR, combine_documents, join_chunks};
pub use error::DocumentError;
pub use loader::{DocumentLoader, PdfLoader};
pub use splitter::{SplitterConfig, TextSplitter};
pub use types::{Chunk, ExtractedDocument, ProcessedDocument, UploadedDocument};

/// Default maximum file size: 50 MiB.
pub const DEFAULT_MAX_FILE_SIZE: u64 = 50 * 1024 * 1024;
