use crate::normalize::{NormalizeOptions, normalize};
use crate::segment::segment;
use crate::{Block, BlockKind};

#[test]
fn test_normalize_then_segment_inline_sentence() {
    // An inline \(..\) span inside a sentence normalizes to $..$ and the
    // sentence stays one text line.
    let normalized = normalize(r"The answer is \(x^2\).", &NormalizeOptions::new(false));
    assert_eq!(normalized, "The answer is $x^2$.");
    let blocks = segment(&normalized);
    assert_eq!(
        blocks,
        vec![Block::new("The answer is $x^2$.", BlockKind::Text)]
    );
}

#[test]
fn test_normalize_then_segment_display_block() {
    let input = "\\[ E=mc^2 \\]\nEinstein wrote this about mass and energy.\n";

    // With a full toolchain the display block survives as display math.
    let normalized = normalize(input, &NormalizeOptions::new(true));
    let blocks = segment(&normalized);
    assert_eq!(blocks[0].kind, BlockKind::MathDisplay);
    assert_eq!(blocks[1].kind, BlockKind::Text);
    assert!(blocks[0].is_math());
    assert!(!blocks[1].is_math());

    // Without one it is demoted to a standalone inline pair, still math.
    let normalized = normalize(input, &NormalizeOptions::new(false));
    let blocks = segment(&normalized);
    assert_eq!(blocks[0].kind, BlockKind::MathInline);
    assert!(blocks[0].is_math());
}

#[test]
fn test_no_block_dropped_or_duplicated() {
    let input = "# Heading\nfirst line\n$$a$$\nsecond line\n```\ncode\n```\nthird\n";
    let blocks = segment(input);
    let contents: Vec<&str> = blocks.iter().map(|b| b.content.as_str()).collect();
    assert_eq!(contents, vec![
        "# Heading",
        "first line",
        "$$a$$",
        "second line",
        "```\ncode\n```",
        "third",
    ]);
}

#[test]
fn test_dollar_inside_code_not_math() {
    let input = "```\nlet price = \"$5\";\n```\n$real$\n";
    let blocks = segment(input);
    assert_eq!(blocks[0].kind, BlockKind::Code);
    assert_eq!(blocks[1].kind, BlockKind::MathInline);
}
