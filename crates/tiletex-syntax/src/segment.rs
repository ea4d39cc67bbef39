//! Block segmentation: a tokenizer over normalized answer text.
//!
//! ## Overview
//!
//! The segmenter performs **position-based scanning** of normalized
//! text, producing a stream of typed [`Block`]s. At each position a
//! fixed priority order of matchers is tried:
//!
//! 1. **Fenced code** — ` ``` ` through the next ` ``` `, inclusive
//! 2. **Display math** — `$$ .. $$`
//! 3. **Inline math** — `$ .. $` with a non-empty body
//! 4. **Heading** — line start, optional indent, 1-6 `#` plus a space
//! 5. **Horizontal rule** — a line of three or more dashes
//! 6. **Default** — one literal line up to the next `\n` or EOF
//!
//! The earliest, highest-priority match wins and scanning advances past
//! the matched span. Code fences outrank math so a `$` inside code is
//! never misclassified as a delimiter.
//!
//! ## Degradation
//!
//! An unterminated fence or math delimiter simply fails to match and
//! falls through to the default line rule; malformed markup degrades to
//! literal text instead of erroring.
//!
//! ## Characteristics
//!
//! - **Single-pass**: O(n) over the input, no backtracking past a match
//! - **Lazy**: implemented as an iterator, blocks produced on demand
//! - **Lossy only for blanks**: whitespace-only matches are discarded,
//!   everything else is carried through verbatim (trailing newlines
//!   trimmed)
//!
//! ## Examples
//!
//! ```
//! use tiletex_syntax::{BlockKind, segment};
//!
//! let blocks = segment("# Title\n$$x$$\nplain line\n");
//! assert_eq!(blocks[0].kind, BlockKind::Heading);
//! assert_eq!(blocks[1].kind, BlockKind::MathDisplay);
//! assert_eq!(blocks[2].kind, BlockKind::Text);
//! ```

use crate::{Block, BlockKind};

const FENCE: &str = "```";

/// A tokenizer producing [`Block`]s from normalized text.
pub struct Segmenter<'a> {
    /// The input text being segmented.
    input: &'a str,
    /// Current byte position in the input.
    position: usize,
}

impl<'a> Segmenter<'a> {
    /// Creates a new `Segmenter` over the given input.
    pub fn new(input: &'a str) -> Self {
        Self { input, position: 0 }
    }

    /// Returns the next non-blank block, or `None` at end of input.
    pub fn next_block(&mut self) -> Option<Block> {
        while self.position < self.input.len() {
            let (kind, span) = self.match_at_position();
            debug_assert!(!span.is_empty(), "matcher must consume input");
            self.position += span.len();
            if span.trim().is_empty() {
                continue;
            }
            return Some(Block::new(span.trim_end_matches(['\n', '\r']), kind));
        }
        None
    }

    /// Tries each matcher at the current position in priority order.
    fn match_at_position(&self) -> (BlockKind, &'a str) {
        let rest = &self.input[self.position..];

        if let Some(span) = match_code_fence(rest) {
            return (BlockKind::Code, span);
        }
        if let Some(span) = match_display_math(rest) {
            return (BlockKind::MathDisplay, span);
        }
        if let Some(span) = match_inline_math(rest) {
            return (BlockKind::MathInline, span);
        }
        if self.at_line_start() {
            if let Some(span) = match_heading(rest) {
                return (BlockKind::Heading, span);
            }
            if let Some(span) = match_rule(rest) {
                return (BlockKind::Rule, span);
            }
        }
        (BlockKind::Text, take_line(rest))
    }

    /// Whether the current position sits at the start of a line.
    fn at_line_start(&self) -> bool {
        self.position == 0 || self.input[..self.position].ends_with('\n')
    }
}

impl Iterator for Segmenter<'_> {
    type Item = Block;

    fn next(&mut self) -> Option<Block> {
        self.next_block()
    }
}

/// Segments the whole input into an ordered block list.
pub fn segment(input: &str) -> Vec<Block> {
    Segmenter::new(input).collect()
}

/// ` ``` .. ``` `, both fences included. Unterminated fences fail.
fn match_code_fence(rest: &str) -> Option<&str> {
    let body = rest.strip_prefix(FENCE)?;
    match body.find(FENCE) {
        Some(end) => Some(&rest[..FENCE.len() + end + FENCE.len()]),
        None => {
            log::warn!("unterminated code fence, treating as literal text");
            None
        }
    }
}

/// `$$ .. $$`, delimiters included. Unterminated pairs fail.
fn match_display_math(rest: &str) -> Option<&str> {
    let body = rest.strip_prefix("$$")?;
    let end = body.find("$$")?;
    Some(&rest[..2 + end + 2])
}

/// `$ .. $` with a non-empty body, delimiters included.
fn match_inline_math(rest: &str) -> Option<&str> {
    let body = rest.strip_prefix('$')?;
    let end = body.find('$').filter(|&end| end > 0)?;
    Some(&rest[..1 + end + 1])
}

/// A line of optional indent, 1-6 `#`, then a space.
fn match_heading(rest: &str) -> Option<&str> {
    let line = take_line(rest);
    let trimmed = line.trim_start_matches([' ', '\t']);
    let hashes = trimmed.len() - trimmed.trim_start_matches('#').len();
    ((1..=6).contains(&hashes) && trimmed[hashes..].starts_with(' ')).then_some(line)
}

/// A line consisting of three or more dashes.
fn match_rule(rest: &str) -> Option<&str> {
    let line = take_line(rest);
    let trimmed = line.trim();
    (trimmed.len() >= 3 && trimmed.chars().all(|c| c == '-')).then_some(line)
}

/// One line including its terminating newline (or the rest of the input).
fn take_line(rest: &str) -> &str {
    match rest.find('\n') {
        Some(end) => &rest[..=end],
        None => rest,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(input: &str) -> Vec<BlockKind> {
        segment(input).into_iter().map(|b| b.kind).collect()
    }

    #[test]
    fn test_empty_input() {
        assert!(segment("").is_empty());
    }

    #[test]
    fn test_whitespace_only_discarded() {
        assert!(segment("  \n\n\t\n").is_empty());
    }

    #[test]
    fn test_single_text_line() {
        let blocks = segment("Hello world");
        assert_eq!(blocks, vec![Block::new("Hello world", BlockKind::Text)]);
    }

    #[test]
    fn test_inline_math_inside_sentence_is_text() {
        // The default rule consumes the whole line; the embedded span
        // does not promote the line to a math block.
        let blocks = segment("The answer is $x^2$.");
        assert_eq!(
            blocks,
            vec![Block::new("The answer is $x^2$.", BlockKind::Text)]
        );
    }

    #[test]
    fn test_standalone_inline_math() {
        let blocks = segment("$x^2$\n");
        assert_eq!(blocks, vec![Block::new("$x^2$", BlockKind::MathInline)]);
    }

    #[test]
    fn test_display_math_block() {
        let blocks = segment("$$E = mc^2$$\nprose after");
        assert_eq!(blocks[0], Block::new("$$E = mc^2$$", BlockKind::MathDisplay));
        assert_eq!(blocks[1], Block::new("prose after", BlockKind::Text));
    }

    #[test]
    fn test_code_fence_protects_dollars() {
        let blocks = segment("```\nprice = $5\ntotal = $6\n```\n");
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].kind, BlockKind::Code);
        assert!(blocks[0].content.contains("$5"));
    }

    #[test]
    fn test_unterminated_fence_falls_through_to_lines() {
        let blocks = segment("```python\nx = 1\n");
        assert_eq!(
            kinds("```python\nx = 1\n"),
            vec![BlockKind::Text, BlockKind::Text]
        );
        assert_eq!(blocks[0].content, "```python");
    }

    #[test]
    fn test_unterminated_math_falls_through() {
        let blocks = segment("$broken\n");
        assert_eq!(blocks, vec![Block::new("$broken", BlockKind::Text)]);
    }

    #[test]
    fn test_empty_inline_body_is_not_math() {
        // `$$` at end of a line is not a valid inline pair.
        assert_eq!(kinds("cost: $$\n"), vec![BlockKind::Text]);
    }

    #[test]
    fn test_heading_levels() {
        assert_eq!(kinds("# one\n###### six\n"), vec![
            BlockKind::Heading,
            BlockKind::Heading
        ]);
        // Seven hashes or a missing space is just text.
        assert_eq!(kinds("####### seven\n"), vec![BlockKind::Text]);
        assert_eq!(kinds("#nospace\n"), vec![BlockKind::Text]);
    }

    #[test]
    fn test_heading_only_at_line_start() {
        let blocks = segment("$x$ # not a heading\n");
        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[0].kind, BlockKind::MathInline);
        assert_eq!(blocks[1].kind, BlockKind::Text);
    }

    #[test]
    fn test_horizontal_rule() {
        assert_eq!(kinds("---\n"), vec![BlockKind::Rule]);
        assert_eq!(kinds("-----\n"), vec![BlockKind::Rule]);
        assert_eq!(kinds("--\n"), vec![BlockKind::Text]);
    }

    #[test]
    fn test_document_order_preserved() {
        let input = "# Title\n\nSome prose.\n$$a + b$$\nmore prose\n---\n";
        assert_eq!(kinds(input), vec![
            BlockKind::Heading,
            BlockKind::Text,
            BlockKind::MathDisplay,
            BlockKind::Text,
            BlockKind::Rule,
        ]);
    }

    #[test]
    fn test_multibyte_text() {
        let blocks = segment("Émilie Noether: $\\alpha$\n");
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].kind, BlockKind::Text);
    }
}
