//! Transcript chunking.
//!
//! Splits transcript text into overlapping chunks for embedding and
//! retrieval. The splitter works recursively through a separator hierarchy
//! (paragraphs, lines, words, characters) so chunk boundaries land on
//! natural breaks where possible.

use crate::config::ChunkingSettings;

/// Recursive character splitter with fixed chunk size and overlap.
///
/// Lengths are counted in characters, not bytes, so chunk boundaries never
/// split a UTF-8 code point.
pub struct RecursiveSplitter {
    chunk_size: usize,
    chunk_overlap: usize,
    separators: Vec<String>,
}

impl RecursiveSplitter {
    /// Create a splitter from chunking settings.
    pub fn new(settings: &ChunkingSettings) -> Self {
        Self {
            chunk_size: settings.chunk_size,
            chunk_overlap: settings.chunk_overlap.min(settings.chunk_size / 2),
            separators: vec![
                "\n\n".to_string(),
                "\n".to_string(),
                " ".to_string(),
                String::new(),
            ],
        }
    }

    /// Split text into overlapping chunks.
    ///
    /// Deterministic for identical input. Every chunk is at most
    /// `chunk_size` characters; consecutive chunks share up to
    /// `chunk_overlap` trailing/leading characters.
    pub fn split(&self, text: &str) -> Vec<String> {
        self.split_recursive(text, &self.separators)
    }

    fn split_recursive(&self, text: &str, separators: &[String]) -> Vec<String> {
        // Pick the first separator that occurs in the text; the final
        // fallback is the empty separator (character-level split).
        let (index, separator) = separators
            .iter()
            .enumerate()
            .find(|(_, sep)| sep.is_empty() || text.contains(sep.as_str()))
            .map(|(i, sep)| (i, sep.clone()))
            .unwrap_or((separators.len() - 1, String::new()));
        let remaining = &separators[index + 1..];

        let splits: Vec<String> = if separator.is_empty() {
            text.chars().map(|c| c.to_string()).collect()
        } else {
            text.split(separator.as_str()).map(|s| s.to_string()).collect()
        };

        let mut chunks = Vec::new();
        let mut good_splits: Vec<String> = Vec::new();

        for piece in splits {
            if piece.chars().count() < self.chunk_size {
                good_splits.push(piece);
            } else {
                // Flush what we have, then break the oversized piece down
                // with the finer separators.
                if !good_splits.is_empty() {
                    chunks.extend(self.merge_splits(&good_splits, &separator));
                    good_splits.clear();
                }
                if remaining.is_empty() {
                    chunks.push(piece);
                } else {
                    chunks.extend(self.split_recursive(&piece, remaining));
                }
            }
        }

        if !good_splits.is_empty() {
            chunks.extend(self.merge_splits(&good_splits, &separator));
        }

        chunks
    }

    /// Greedily merge small splits into chunks of at most `chunk_size`
    /// characters, carrying a sliding window of trailing splits into the
    /// next chunk as overlap.
    fn merge_splits(&self, splits: &[String], separator: &str) -> Vec<String> {
        let separator_len = separator.chars().count();

        let mut chunks = Vec::new();
        let mut window: Vec<&String> = Vec::new();
        let mut total = 0usize;

        for piece in splits {
            let piece_len = piece.chars().count();

            let joined_len = total + piece_len + if window.is_empty() { 0 } else { separator_len };
            if joined_len > self.chunk_size && !window.is_empty() {
                if let Some(chunk) = Self::join(&window, separator) {
                    chunks.push(chunk);
                }

                // Slide the window until it fits within the overlap and
                // leaves room for the incoming piece.
                while total > self.chunk_overlap
                    || (total + piece_len + separator_len > self.chunk_size && total > 0)
                {
                    let dropped = window.remove(0);
                    total -= dropped.chars().count()
                        + if window.is_empty() { 0 } else { separator_len };
                }
            }

            if !window.is_empty() {
                total += separator_len;
            }
            total += piece_len;
            window.push(piece);
        }

        if let Some(chunk) = Self::join(&window, separator) {
            chunks.push(chunk);
        }

        chunks
    }

    fn join(pieces: &[&String], separator: &str) -> Option<String> {
        let joined = pieces
            .iter()
            .map(|s| s.as_str())
            .collect::<Vec<_>>()
            .join(separator)
            .trim()
            .to_string();

        if joined.is_empty() {
            None
        } else {
            Some(joined)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn splitter() -> RecursiveSplitter {
        RecursiveSplitter::new(&ChunkingSettings::default())
    }

    /// Longest suffix of `prev` that `next` starts with, in characters.
    fn shared_overlap(prev: &str, next: &str) -> usize {
        let mut best = 0;
        for (idx, _) in next.char_indices().skip(1) {
            if prev.ends_with(&next[..idx]) {
                best = next[..idx].chars().count();
            }
        }
        best
    }

    #[test]
    fn test_short_text_is_single_chunk() {
        let chunks = splitter().split("just a short transcript");
        assert_eq!(chunks, vec!["just a short transcript".to_string()]);
    }

    #[test]
    fn test_empty_text_yields_no_chunks() {
        assert!(splitter().split("").is_empty());
        assert!(splitter().split("   \n\n  ").is_empty());
    }

    #[test]
    fn test_chunks_respect_size_limit() {
        let text = (0..3000)
            .map(|i| format!("word{}", i))
            .collect::<Vec<_>>()
            .join(" ");

        let chunks = splitter().split(&text);
        assert!(chunks.len() > 1);
        for chunk in &chunks {
            assert!(chunk.chars().count() <= 1000, "chunk too long: {}", chunk.len());
        }
    }

    #[test]
    fn test_split_is_deterministic() {
        let text = (0..2000)
            .map(|i| format!("token{}", i))
            .collect::<Vec<_>>()
            .join(" ");

        let first = splitter().split(&text);
        let second = splitter().split(&text);
        assert_eq!(first, second);
    }

    #[test]
    fn test_consecutive_chunks_overlap() {
        let text = (0..2000)
            .map(|i| format!("w{}", i))
            .collect::<Vec<_>>()
            .join(" ");

        let chunks = splitter().split(&text);
        assert!(chunks.len() > 2);

        for pair in chunks.windows(2) {
            let overlap = shared_overlap(&pair[0], &pair[1]);
            assert!(overlap > 0, "expected overlap between consecutive chunks");
            assert!(overlap <= 200, "overlap too large: {}", overlap);
        }
    }

    #[test]
    fn test_prefers_paragraph_boundaries() {
        let para_a = "alpha ".repeat(100).trim().to_string();
        let para_b = "bravo ".repeat(100).trim().to_string();
        let text = format!("{}\n\n{}", para_a, para_b);

        let chunks = splitter().split(&text);
        assert_eq!(chunks.len(), 2);
        assert!(chunks[0].starts_with("alpha"));
        assert!(chunks[1].starts_with("bravo"));
    }

    #[test]
    fn test_unbroken_text_splits_at_character_level() {
        let text = "x".repeat(2500);

        let chunks = splitter().split(&text);
        assert!(chunks.len() > 1);
        for chunk in &chunks {
            assert!(chunk.chars().count() <= 1000);
        }
    }

    #[test]
    fn test_multibyte_text_never_panics() {
        let text = "ü".repeat(2500);

        let chunks = splitter().split(&text);
        for chunk in &chunks {
            assert!(chunk.chars().count() <= 1000);
        }
    }
}
