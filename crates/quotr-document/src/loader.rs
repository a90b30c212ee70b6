use std::future::Future;
use std::pin::Pin;

use crate::{DEFAULT_MAX_FILE_SIZE, DocumentError, ExtractedDocument, UploadedDocument};

pub type LoadFuture<'a> =
    Pin<Box<dyn Future<Output = Result<ExtractedDocument, DocumentError>> + Send + 'a>>;

/// Turns an uploaded file into page texts.
pub trait DocumentLoader: Send + Sync {
    fn load(&self, document: UploadedDocument) -> LoadFuture<'_>;

    fn supported_extensions(&self) -> &[&str];
}

/// Extracts page texts from PDF bytes in memory with `pdf-extract`.
#[derive(Debug, Clone)]
pub struct PdfLoader {
    pub max_file_size: u64,
}

impl Default for PdfLoader {
    fn default() -> Self {
        Self {
            max_file_size: DEFAULT_MAX_FILE_SIZE,
        }
    }
}

impl DocumentLoader for PdfLoader {
    fn load(&self, document: UploadedDocument) -> LoadFuture<'_> {
        let max_size = self.max_file_size;
        Box::pin(async move {
            let ext = document.extension().unwrap_or_default();
            if !self.supported_extensions().contains(&ext.as_str()) {
                return Err(DocumentError::UnsupportedFormat(format!(
                    "expected a .pdf file, got '{}'",
                    document.name
                )));
            }

            let size = document.bytes.len() as u64;
            if size > max_size {
                return Err(DocumentError::FileTooLarge {
                    size,
                    limit: max_size,
                });
            }

            let UploadedDocument { name, bytes } = document;
            let pages = tokio::task::spawn_blocking(move || extract_pages(&bytes))
                .await
                .map_err(|e| DocumentError::Io(std::io::Error::other(e)))??;

            tracing::debug!(file = %name, pages = pages.len(), "extracted PDF text");
            Ok(ExtractedDocument { name, pages })
        })
    }

    fn supported_extensions(&self) -> &[&str] {
        &["pdf"]
    }
}

fn extract_pages(bytes: &[u8]) -> Result<Vec<String>, DocumentError> {
    // pdf-extract can panic on malformed input
    let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
        pdf_extract::extract_text_from_mem_by_pages(bytes)
    }));

    match result {
        Ok(Ok(pages)) if pages.is_empty() => Err(DocumentError::NoPages),
        Ok(Ok(pages)) => Ok(pages),
        Ok(Err(e)) => Err(DocumentError::Pdf(e.to_string())),
        Err(_) => Err(DocumentError::ParserPanic),
    }
}
