use crate::models::{ChunkMetadata, DocumentChunk, DocumentPage};
use shared::error::RagError;
use shared::types::Result;

pub const DEFAULT_CHUNK_SIZE: usize = 1000;
pub const DEFAULT_CHUNK_OVERLAP: usize = 150;

/// Window geometry, measured in characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkingConfig {
    pub chunk_size: usize,
    pub chunk_overlap: usize,
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
            chunk_overlap: DEFAULT_CHUNK_OVERLAP,
        }
    }
}

impl ChunkingConfig {
    pub fn new(chunk_size: usize, chunk_overlap: usize) -> Result<Self> {
        if chunk_size == 0 {
            return Err(RagError::config("chunk size must be positive"));
        }
        if chunk_overlap >= chunk_size {
            return Err(RagError::config(format!(
                "chunk overlap ({chunk_overlap}) must be smaller than chunk size ({chunk_size})"
            )));
        }
        Ok(Self {
            chunk_size,
            chunk_overlap,
        })
    }

    pub fn stride(&self) -> usize {
        self.chunk_size - self.chunk_overlap
    }

    /// Number of windows `split` yields for `chars` characters of text.
    pub fn expected_chunks(&self, chars: usize) -> usize {
        if chars == 0 {
            0
        } else if chars <= self.chunk_size {
            1
        } else {
            1 + (chars - self.chunk_size).div_ceil(self.stride())
        }
    }
}

/// Fixed-size sliding window splitter. Neighbouring windows share exactly
/// `chunk_overlap` characters so no sentence is lost at a boundary.
pub struct TextSplitter {
    config: ChunkingConfig,
}

impl TextSplitter {
    pub fn new(config: ChunkingConfig) -> Self {
        Self { config }
    }

    pub fn split(&self, text: &str, source: &str) -> Vec<DocumentChunk> {
        let mut chunks = Vec::with_capacity(self.config.expected_chunks(text.chars().count()));
        self.split_into(text, source, None, &mut chunks);
        chunks
    }

    /// Windows never cross a page; `start_index` restarts at each page and
    /// `chunk_index` runs over the whole document.
    pub fn split_pages(&self, pages: &[DocumentPage], source: &str) -> Vec<DocumentChunk> {
        let mut chunks = Vec::new();
        for page in pages {
            self.split_into(&page.text, source, page.page, &mut chunks);
        }
        chunks
    }

    fn split_into(&self, text: &str, source: &str, page: Option<usize>, chunks: &mut Vec<DocumentChunk>) {
        // Byte offset of every char start, plus the end of the text, so
        // windows can be cut in characters without splitting a code point.
        let bounds: Vec<usize> = text
            .char_indices()
            .map(|(i, _)| i)
            .chain(std::iter::once(text.len()))
            .collect();
        let total = bounds.len() - 1;

        let mut start = 0;
        while start < total {
            let end = (start + self.config.chunk_size).min(total);
            chunks.push(DocumentChunk {
                text: text[bounds[start]..bounds[end]].to_string(),
                metadata: ChunkMetadata {
                    source: source.to_string(),
                    page,
                    chunk_index: chunks.len(),
                    start_index: start,
                },
            });
            if end == total {
                break;
            }
            start = end - self.config.chunk_overlap;
        }
    }
}
