//! Greedy packing of blocks into size-bounded, kind-homogeneous chunks.
//!
//! The packer walks blocks in document order, concatenating consecutive
//! blocks of the same kind (math or non-math) with a blank-line
//! separator until the character budget would be exceeded, then flushes.
//! A block is never split: a single block larger than the budget rides
//! alone in an over-budget chunk.
//!
//! Guarantees:
//! - math and non-math content never share a chunk
//! - a chunk exceeds the budget only when it holds exactly one block
//! - original document order is preserved

use tiletex_syntax::Block;

/// Blank-line separator between packed blocks.
const SEPARATOR: &str = "\n\n";

/// A merged, kind-homogeneous run of blocks destined for a single tile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chunk {
    /// Concatenated block contents, blank-line separated, trimmed.
    pub content: String,
    /// Whether every member block was math.
    pub is_math: bool,
    /// Number of blocks merged into this chunk.
    pub block_count: usize,
}

/// Packs blocks into chunks of at most `char_limit` characters.
pub fn pack_blocks(blocks: &[Block], char_limit: usize) -> Vec<Chunk> {
    let mut chunks = Vec::new();
    let mut current = String::new();
    let mut current_math = false;
    let mut block_count = 0;

    for block in blocks {
        let same_kind = current_math == block.is_math();
        let fits =
            current.len() + SEPARATOR.len() + block.content.len() <= char_limit;

        if !current.is_empty() && same_kind && fits {
            current.push_str(SEPARATOR);
            current.push_str(&block.content);
            block_count += 1;
            continue;
        }

        if !current.is_empty() {
            chunks.push(Chunk {
                content: std::mem::take(&mut current).trim().to_string(),
                is_math: current_math,
                block_count,
            });
        }
        current = block.content.clone();
        current_math = block.is_math();
        block_count = 1;
    }

    if !current.is_empty() {
        chunks.push(Chunk {
            content: current.trim().to_string(),
            is_math: current_math,
            block_count,
        });
    }
    chunks
}
