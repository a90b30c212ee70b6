use crate::types::Chunk;

#[derive(Debug, Clone)]
pub struct SplitterConfig {
    /// Maximum chunk length in characters.
    pub chunk_size: usize,
    /// Maximum number of characters a chunk repeats from its predecessor.
    pub chunk_overlap: usize,
}

impl Default for SplitterConfig {
    fn default() -> Self {
        Self {
            chunk_size: 1000,
            chunk_overlap: 100,
        }
    }
}

/// Splits page texts into bounded, overlapping chunks.
///
/// Every chunk is an exact substring of its page. Within a page, chunk `n + 1`
/// starts no earlier than `chunk_overlap` characters before the end of chunk `n`
/// and no later than that end, so the page can be rebuilt from the spans.
pub struct TextSplitter {
    config: SplitterConfig,
}

type BreakFn = fn(&[char], usize) -> bool;

/// Break candidates by priority. Each takes the would-be exclusive end of a chunk.
const BREAKS: [BreakFn; 4] = [
    is_paragraph_break,
    is_line_break,
    is_sentence_break,
    is_word_break,
];

impl TextSplitter {
    #[must_use]
    pub fn new(config: SplitterConfig) -> Self {
        Self { config }
    }

    #[must_use]
    pub fn config(&self) -> &SplitterConfig {
        &self.config
    }

    /// Split every page and number the chunks sequentially across the document.
    /// Blank pages contribute no chunks.
    #[must_use]
    pub fn split_pages(&self, pages: &[String]) -> Vec<Chunk> {
        let mut chunks = Vec::new();
        for (page, text) in pages.iter().enumerate() {
            if text.trim().is_empty() {
                continue;
            }
            let chars: Vec<char> = text.chars().collect();
            let offsets: Vec<usize> = text
                .char_indices()
                .map(|(i, _)| i)
                .chain(std::iter::once(text.len()))
                .collect();

            for (start, end) in spans(&chars, self.config.chunk_size, self.config.chunk_overlap) {
                chunks.push(Chunk {
                    content: text[offsets[start]..offsets[end]].to_owned(),
                    page,
                    chunk_index: chunks.len(),
                    start,
                    end,
                });
            }
        }
        chunks
    }
}

fn spans(chars: &[char], chunk_size: usize, overlap: usize) -> Vec<(usize, usize)> {
    let chunk_size = chunk_size.max(1);
    let overlap = overlap.min(chunk_size - 1);
    let len = chars.len();

    let mut spans = Vec::new();
    let mut start = 0;
    while start < len {
        if len - start <= chunk_size {
            spans.push((start, len));
            break;
        }
        let limit = start + chunk_size;
        // Breaks are only taken from the upper half of the window, and always
        // past the overlap so the next chunk makes progress.
        let floor = start + (chunk_size / 2).max(overlap + 1);
        let end = find_break(chars, floor, limit).unwrap_or(limit);
        spans.push((start, end));
        start = next_start(chars, end, overlap);
    }
    spans
}

fn find_break(chars: &[char], lo: usize, hi: usize) -> Option<usize> {
    BREAKS
        .iter()
        .find_map(|is_break| (lo..=hi).rev().find(|&p| is_break(chars, p)))
}

fn next_start(chars: &[char], end: usize, overlap: usize) -> usize {
    if overlap == 0 {
        return end;
    }
    let from = end - overlap;
    (from..end)
        .find(|&q| chars[q - 1].is_whitespace() && !chars[q].is_whitespace())
        .unwrap_or(from)
}

fn is_paragraph_break(chars: &[char], p: usize) -> bool {
    p >= 2 && chars[p - 1] == '\n' && chars[p - 2] == '\n'
}

fn is_line_break(chars: &[char], p: usize) -> bool {
    chars[p - 1] == '\n'
}

fn is_sentence_break(chars: &[char], p: usize) -> bool {
    p >= 2 && chars[p - 1].is_whitespace() && matches!(chars[p - 2], '.' | '?' | '!')
}

fn is_word_break(chars: &[char], p: usize) -> bool {
    chars[p - 1].is_whitespace()
}
