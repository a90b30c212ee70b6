use std::path::Path;

use crate::DocumentError;
use crate::aggregate::join_chunks;

/// A user-supplied file: its display name and raw bytes.
#[derive(Clone)]
pub struct UploadedDocument {
    pub name: String,
    pub bytes: Vec<u8>,
}

impl std::fmt::Debug for UploadedDocument {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UploadedDocument")
            .field("name", &self.name)
            .field("len", &self.bytes.len())
            .finish()
    }
}

impl UploadedDocument {
    #[must_use]
    pub fn new(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            bytes,
        }
    }

    /// Read a file from disk, naming it after its final path component.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read.
    pub async fn from_path(path: &Path) -> Result<Self, DocumentError> {
        let bytes = tokio::fs::read(path).await?;
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .map_or_else(|| path.display().to_string(), str::to_owned);
        Ok(Self { name, bytes })
    }

    /// Lowercased file extension, if any.
    #[must_use]
    pub fn extension(&self) -> Option<String> {
        Path::new(&self.name)
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase)
    }
}

/// Page texts of one document, in page order.
#[derive(Debug, Clone)]
pub struct ExtractedDocument {
    pub name: String,
    pub pages: Vec<String>,
}

/// A contiguous piece of one page. `start..end` is the character span within that page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chunk {
    pub content: String,
    pub page: usize,
    pub chunk_index: usize,
    pub start: usize,
    pub end: usize,
}

impl Chunk {
    #[must_use]
    pub fn char_len(&self) -> usize {
        self.end - self.start
    }
}

#[derive(Debug, Clone)]
pub struct ProcessedDocument {
    pub name: String,
    pub page_count: usize,
    pub chunks: Vec<Chunk>,
}

impl ProcessedDocument {
    /// Chunk texts joined into this document's share of the corpus.
    #[must_use]
    pub fn text(&self) -> String {
        join_chunks(&self.chunks)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extension_is_lowercased() {
        let doc = UploadedDocument::new("Quote-A.PDF", vec![]);
        assert_eq!(doc.extension().as_deref(), Some("pdf"));
    }

    #[test]
    fn extension_missing() {
        let doc = UploadedDocument::new("quote", vec![]);
        assert!(doc.extension().is_none());
    }

    #[test]
    fn debug_omits_bytes() {
        let doc = UploadedDocument::new("a.pdf", vec![1, 2, 3]);
        let debug = format!("{doc:?}");
        assert!(debug.contains("len: 3"));
    }

    #[tokio::test]
    async fn from_path_uses_file_name() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("vendor-a.pdf");
        std::fs::write(&file, b"%PDF-1.4").unwrap();

        let doc = UploadedDocument::from_path(&file).await.unwrap();
        assert_eq!(doc.name, "vendor-a.pdf");
        assert_eq!(doc.bytes, b"%PDF-1.4");
    }

    #[tokio::test]
    async fn from_path_missing_file() {
        let result = UploadedDocument::from_path(Path::new("/nonexistent/q.pdf")).await;
        assert!(matches!(result, Err(DocumentError::Io(_))));
    }
}
