use crate::types::Chunk;

/// Separator between chunk texts of one document.
pub const CHUNK_SEPARATOR: &str = " ";
/// Separator between documents in the combined corpus.
pub const DOCUMENT_SEPARATOR: &str = "\n\n";

#[must_use]
pub fn join_chunks(chunks: &[Chunk]) -> String {
    chunks
        .iter()
        .map(|c| c.content.as_str())
        .collect::<Vec<_>>()
        .join(CHUNK_SEPARATOR)
}

/// Combine per-document texts in the given order.
#[must_use]
pub fn combine_documents<I, S>(texts: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut corpus = String::new();
    for (i, text) in texts.into_iter().enumerate() {
        if i > 0 {
            corpus.push_str(DOCUMENT_SEPARATOR);
        }
        corpus.push_str(text.as_ref());
    }
    corpus
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chunk(content: &str, idx: usize) -> Chunk {
        Chunk {
            content: content.into(),
            page: 0,
            chunk_index: idx,
            start: 0,
            end: content.chars().count(),
        }
    }

    #[test]
    fn chunks_joined_with_space() {
        let chunks = [chunk("alpha", 0), chunk("beta", 1)];
        assert_eq!(join_chunks(&chunks), "alpha beta");
    }

    #[test]
    fn no_chunks_is_empty() {
        assert_eq!(join_chunks(&[]), "");
    }

    #[test]
    fn documents_joined_with_blank_line() {
        assert_eq!(combine_documents(["A", "B", "C"]), "A\n\nB\n\nC");
    }

    #[test]
    fn single_document_has_no_separator() {
        assert_eq!(combine_documents(vec!["only".to_owned()]), "only");
    }

    #[test]
    fn order_is_preserved() {
        let corpus = combine_documents(["vendor-a total 100", "vendor-b total 90"]);
        let a = corpus.find("vendor-a").unwrap();
        let b = corpus.find("vendor-b").unwrap();
        assert!(a < b);
    }

    #[test]
    fn empty_documents_keep_their_slot() {
        assert_eq!(combine_documents(["", "B"]), "\n\nB");
    }
}
