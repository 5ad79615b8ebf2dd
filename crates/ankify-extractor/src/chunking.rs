//! Overlapping word-window chunking for long study texts

use crate::normalize::normalize_text;

/// Smallest accepted chunk size in words
pub const MIN_CHUNK_WORDS: usize = 300;

/// Default chunk size in words
pub const DEFAULT_CHUNK_WORDS: usize = 700;

/// Words shared by consecutive chunks
pub const CHUNK_OVERLAP_WORDS: usize = 120;

/// One window of the normalized text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chunk {
    /// Zero-based position in chunk order
    pub index: usize,
    /// Offset of the first word
    pub start_word: usize,
    /// Offset one past the last word
    pub end_word: usize,
    /// Words of the window joined by single spaces
    pub text: String,
}

impl Chunk {
    /// Number of words in the chunk
    pub fn word_count(&self) -> usize {
        self.end_word - self.start_word
    }
}

/// Splits text into overlapping word windows
#[derive(Debug, Clone, Copy)]
pub struct Chunker {
    target_words: usize,
    overlap: usize,
}

impl Chunker {
    /// Create a chunker; `target_words` below [`MIN_CHUNK_WORDS`] is raised
    pub fn new(target_words: usize) -> Self {
        Self::with_overlap(target_words, CHUNK_OVERLAP_WORDS)
    }

    /// Create a chunker with a non-default overlap
    pub fn with_overlap(target_words: usize, overlap: usize) -> Self {
        Self {
            target_words: target_words.max(MIN_CHUNK_WORDS),
            overlap,
        }
    }

    /// Effective window size
    pub fn target_words(&self) -> usize {
        self.target_words
    }

    /// Distance between consecutive window starts
    pub fn step(&self) -> usize {
        self.target_words.saturating_sub(self.overlap).max(1)
    }

    /// Normalize `text` and prepare its windows
    pub fn chunk(&self, text: &str) -> ChunkSet {
        let words = normalize_text(text)
            .split(' ')
            .filter(|w| !w.is_empty())
            .map(str::to_string)
            .collect();
        ChunkSet {
            words,
            target_words: self.target_words,
            step: self.step(),
        }
    }
}

impl Default for Chunker {
    fn default() -> Self {
        Self::new(DEFAULT_CHUNK_WORDS)
    }
}

/// Normalized words of a text plus the window geometry
///
/// Chunks are built on demand; [`ChunkSet::iter`] can be called any number of
/// times and always yields the same sequence.
#[derive(Debug, Clone)]
pub struct ChunkSet {
    words: Vec<String>,
    target_words: usize,
    step: usize,
}

impl ChunkSet {
    /// Total normalized words
    pub fn total_words(&self) -> usize {
        self.words.len()
    }

    /// Whether the text had no words
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Number of chunks [`iter`](Self::iter) yields
    pub fn len(&self) -> usize {
        self.words.len().div_ceil(self.step)
    }

    /// Lazily iterate the chunks in source order
    pub fn iter(&self) -> ChunkIter<'_> {
        ChunkIter {
            set: self,
            next_start: 0,
            index: 0,
        }
    }

    /// Materialize all chunks
    pub fn to_vec(&self) -> Vec<Chunk> {
        self.iter().collect()
    }
}

impl<'a> IntoIterator for &'a ChunkSet {
    type Item = Chunk;
    type IntoIter = ChunkIter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Iterator over the chunks of a [`ChunkSet`]
#[derive(Debug, Clone)]
pub struct ChunkIter<'a> {
    set: &'a ChunkSet,
    next_start: usize,
    index: usize,
}

impl Iterator for ChunkIter<'_> {
    type Item = Chunk;

    fn next(&mut self) -> Option<Chunk> {
        let total = self.set.words.len();
        if self.next_start >= total {
            return None;
        }

        let start = self.next_start;
        let end = (start + self.set.target_words).min(total);
        self.next_start = start + self.set.step;

        let chunk = Chunk {
            index: self.index,
            start_word: start,
            end_word: end,
            text: self.set.words[start..end].join(" "),
        };
        self.index += 1;
        Some(chunk)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn words(n: usize) -> String {
        (0..n).map(|i| format!("w{}", i)).collect::<Vec<_>>().join(" ")
    }

    #[test]
    fn test_empty_text_has_no_chunks() {
        let set = Chunker::default().chunk("  [3]  ");
        assert!(set.is_empty());
        assert_eq!(set.len(), 0);
        assert_eq!(set.iter().count(), 0);
    }

    #[test]
    fn test_short_text_is_one_chunk() {
        let set = Chunker::default().chunk(&words(50));
        let chunks = set.to_vec();
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].word_count(), 50);
        assert_eq!(chunks[0].start_word, 0);
    }

    #[test]
    fn test_target_is_clamped() {
        assert_eq!(Chunker::new(10).target_words(), MIN_CHUNK_WORDS);
        assert_eq!(Chunker::new(900).target_words(), 900);
        assert_eq!(Chunker::new(300).step(), 180);
    }

    #[test]
    fn test_window_geometry() {
        let set = Chunker::new(700).chunk(&words(2000));
        let chunks = set.to_vec();

        assert_eq!(chunks.len(), set.len());
        let starts: Vec<usize> = chunks.iter().map(|c| c.start_word).collect();
        assert_eq!(starts, vec![0, 580, 1160, 1740]);
        assert_eq!(chunks[2].end_word, 1860);
        assert_eq!(chunks[3].end_word, 2000);
        assert!(chunks[1].text.starts_with("w580 "));
    }

    #[test]
    fn test_iteration_is_restartable() {
        let set = Chunker::new(300).chunk(&words(1000));
        let first: Vec<Chunk> = set.iter().collect();
        let second: Vec<Chunk> = (&set).into_iter().collect();
        assert_eq!(first, second);
    }

    #[test]
    fn test_chunks_are_normalized() {
        let set = Chunker::default().chunk("Alpha [1]\u{a0} beta\n\ngamma");
        assert_eq!(set.to_vec()[0].text, "Alpha beta gamma");
    }
}
