//! Math-safe soft wrapping for non-math chunks.
//!
//! Reflows prose to a display-column budget while treating every inline
//! `$..$` span as an unbreakable token: a span may push a line over the
//! budget, but it is never split across a wrap boundary. Fence lines,
//! heading lines and indented literal lines pass through untouched.
//!
//! Column positions are measured in display columns via `unicode-width`,
//! not bytes, so CJK and combining content wraps sanely.

use unicode_width::UnicodeWidthStr;

/// Wraps every line of a non-math chunk to the column budget.
pub fn wrap_chunk(text: &str, width: usize) -> String {
    text.lines()
        .map(|line| wrap_line(line, width))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Lines that must never be reflowed: code fences, headings, and
/// explicitly indented literals.
fn is_literal_line(line: &str) -> bool {
    let trimmed = line.trim_start();
    trimmed.starts_with("```")
        || trimmed.starts_with('#')
        || line.starts_with('\t')
        || line.starts_with("    ")
}

/// Wraps a single line, keeping inline math spans intact.
fn wrap_line(line: &str, width: usize) -> String {
    if is_literal_line(line) {
        return line.to_string();
    }

    let mut out = String::with_capacity(line.len());
    let mut col = 0;
    for token in split_tokens(line) {
        let token_width = token.width();
        if col == 0 {
            out.push_str(token);
            col = token_width;
        } else if col + 1 + token_width <= width {
            out.push(' ');
            out.push_str(token);
            col += 1 + token_width;
        } else {
            out.push('\n');
            out.push_str(token);
            col = token_width;
        }
    }
    out
}

/// Splits a line at whitespace, except inside `$..$` spans.
///
/// A token is a maximal whitespace-free run where a complete math span
/// (non-empty body, closing `$` present) counts as a single unit, glued
/// to any directly adjacent text such as trailing punctuation. A `$`
/// with no closing partner is ordinary text.
fn split_tokens(line: &str) -> Vec<&str> {
    let mut tokens = Vec::new();
    let mut start = None;
    let mut in_math = false;

    for (i, c) in line.char_indices() {
        if c.is_whitespace() && !in_math {
            if let Some(s) = start.take() {
                tokens.push(&line[s..i]);
            }
            continue;
        }
        if start.is_none() {
            start = Some(i);
        }
        if c == '$' {
            if in_math {
                in_math = false;
            } else if line[i + 1..].find('$').is_some_and(|end| end > 0) {
                in_math = true;
            }
        }
    }
    if let Some(s) = start {
        tokens.push(&line[s..]);
    }
    tokens
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_line_untouched() {
        assert_eq!(wrap_line("a few words", 90), "a few words");
    }

    #[test]
    fn test_plain_wrap_at_width() {
        let wrapped = wrap_line("aaa bbb ccc ddd", 7);
        assert_eq!(wrapped, "aaa bbb\nccc ddd");
    }

    #[test]
    fn test_fence_and_heading_pass_through() {
        let fence = format!("```{}", "x".repeat(200));
        assert_eq!(wrap_line(&fence, 90), fence);
        let heading = format!("# {}", "word ".repeat(40));
        assert_eq!(wrap_line(&heading, 90), heading);
    }

    #[test]
    fn test_indented_literal_passes_through() {
        let line = format!("    {}", "indented code ".repeat(10));
        assert_eq!(wrap_line(&line, 90), line);
    }

    #[test]
    fn test_math_span_never_split() {
        let span = format!("${}$", "a + ".repeat(30).trim_end());
        let line = format!("lead in {span} tail");
        let wrapped = wrap_line(&line, 20);
        // The span survives on a single output line.
        assert!(wrapped.lines().any(|l| l.contains(&span)));
    }

    #[test]
    fn test_math_glued_to_punctuation() {
        let wrapped = wrap_line("so we get $x + y$, then more", 90);
        assert!(wrapped.contains("$x + y$,"));
    }

    #[test]
    fn test_unpaired_dollar_is_plain_text() {
        let wrapped = wrap_line("it costs $5 or so today", 10);
        assert_eq!(wrapped, "it costs\n$5 or so\ntoday");
    }

    #[test]
    fn test_wrap_chunk_multiline() {
        let chunk = "first paragraph line\n\n```\ncode $x\n```";
        let wrapped = wrap_chunk(chunk, 90);
        assert_eq!(wrapped, chunk);
    }

    #[test]
    fn test_no_math_split_across_lines() {
        let line = "word word word $a_1 + a_2 + a_3$ word word";
        for out_line in wrap_line(line, 18).lines() {
            let dollars = out_line.matches('$').count();
            assert_eq!(dollars % 2, 0, "line {out_line:?} splits a span");
        }
    }
}
