#[derive(Debug, thiserror::Error)]
pub enum DocumentError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("unsupported format: {0}")]
    UnsupportedFormat(String),

    #[error("file too large: {size} bytes (limit {limit})")]
    FileTooLarge { size: u64, limit: u64 },

    #[error("PDF error: {0}")]
    Pdf(String),

    #[error("PDF contains no pages")]
    NoPages,

    #[error("PDF parser crashed on malformed input")]
    ParserPanic,
}
