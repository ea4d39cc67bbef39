//! Text-side front end of the tiletex pipeline: delimiter normalization
//! and structural block segmentation.
//!
//! The pipeline consumes raw assistant answers mixing Markdown prose and
//! LaTeX math. This crate turns such text into an ordered sequence of
//! typed [`Block`]s:
//!
//! 1. [`normalize`](normalize::normalize) rewrites alternate math
//!    delimiters (`\(..\)`, `\[..\]`) into canonical `$`/`$$` form and,
//!    when no full TeX toolchain is available, patches macros the
//!    lightweight math mode cannot display.
//! 2. [`segment`](segment::segment) tokenizes the normalized text into
//!    blocks (code, display math, inline math, heading, rule, text line)
//!    using priority-ordered matchers tried at each position.
//!
//! Downstream crates pack blocks into size-bounded chunks and rasterize
//! them; nothing in this crate performs I/O.

pub mod normalize;
pub mod segment;

pub use normalize::{DEFAULT_MACRO_TABLE, NormalizeOptions, normalize};
pub use segment::{Segmenter, segment};

/// The structural kind assigned to a [`Block`] by segmentation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BlockKind {
    /// Fenced code block, fences included.
    Code,
    /// Display math, `$$ .. $$` delimiters included.
    MathDisplay,
    /// Inline math standing on its own, `$ .. $` delimiters included.
    MathInline,
    /// Markdown heading line (1-6 leading `#`).
    Heading,
    /// Horizontal rule line.
    Rule,
    /// One literal line of anything else.
    Text,
}

/// An atomic structural unit of the normalized answer text.
///
/// Blocks are immutable: produced once by [`segment`], consumed by the
/// packer. Document order is preserved and whitespace-only spans are
/// never turned into blocks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
    /// The matched span, stripped of trailing newlines.
    pub content: String,
    /// The structural kind of the matched span.
    pub kind: BlockKind,
}

impl Block {
    pub fn new(content: impl Into<String>, kind: BlockKind) -> Self {
        Self {
            content: content.into(),
            kind,
        }
    }

    /// Whether this block is math content.
    ///
    /// True exactly for blocks whose whole span is delimited math
    /// (`$$..$$` or a single `$..$` pair); a text line that merely
    /// *contains* inline math is not a math block.
    pub fn is_math(&self) -> bool {
        matches!(self.kind, BlockKind::MathDisplay | BlockKind::MathInline)
    }
}

#[cfg(test)]
mod coverage_tests;
