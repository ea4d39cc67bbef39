//! Delimiter normalization and macro compatibility patching.
//!
//! ## Overview
//!
//! Assistant answers use several spellings for the same math markup.
//! Normalization rewrites them into one canonical form so the segmenter
//! only ever has to recognize `$..$` and `$$..$$`:
//!
//! - `\( X \)` becomes `$X$`
//! - `\[ X \]` becomes `$$X$$` when a full TeX toolchain is available,
//!   otherwise `$X$` (display math is demoted to inline so the
//!   lightweight math mode can center it as a single run)
//! - embedded newlines inside `\[ .. \]` bodies are collapsed to spaces
//!
//! When no full toolchain is available, `\boxed{X}` is stripped down to
//! bare `X` and the macro compatibility table is substituted so the
//! lightweight mode never sees macros it cannot display.
//!
//! ## Degradation
//!
//! Unterminated `\(` or `\[` pairs are left untouched: malformed markup
//! falls through to literal-line treatment downstream and is never a
//! hard error here.

use once_cell::sync::Lazy;

/// Macros the lightweight math mode cannot display, mapped to safe
/// equivalents. Substituted only when no full TeX toolchain is present.
pub static DEFAULT_MACRO_TABLE: Lazy<Vec<(String, String)>> = Lazy::new(|| {
    [
        (r"\implies", r"\Rightarrow"),
        (r"\impliedby", r"\Leftarrow"),
        (r"\iff", r"\Leftrightarrow"),
        (r"\qquad", r"\;"),
        (r"\quad", r"\;"),
        (r"\enspace", r"\,"),
    ]
    .into_iter()
    .map(|(bad, good)| (bad.to_string(), good.to_string()))
    .collect()
});

/// Options controlling [`normalize`].
///
/// Resolved once at startup from the render configuration; immutable
/// for the lifetime of the process.
#[derive(Debug, Clone)]
pub struct NormalizeOptions {
    /// Whether a full TeX toolchain was detected at startup.
    pub full_latex: bool,
    /// Macro compatibility table applied when `full_latex` is false.
    pub macro_table: Vec<(String, String)>,
}

impl NormalizeOptions {
    /// Options with the default macro table and the given capability.
    pub fn new(full_latex: bool) -> Self {
        Self {
            full_latex,
            macro_table: DEFAULT_MACRO_TABLE.clone(),
        }
    }
}

/// Rewrites alternate LaTeX delimiters into canonical `$`/`$$` form and
/// patches unsupported macros per the options.
///
/// Normalizing already-canonical text is a no-op.
pub fn normalize(text: &str, opts: &NormalizeOptions) -> String {
    let text = rewrite_delimited(text, r"\(", r"\)", |body| format!("${}$", body.trim()));

    let text = rewrite_delimited(&text, r"\[", r"\]", |body| {
        let collapsed = collapse_lines(body);
        if opts.full_latex {
            format!("$${collapsed}$$")
        } else {
            format!("${collapsed}$")
        }
    });

    if opts.full_latex {
        return text;
    }

    let text = strip_boxed(&text);
    let mut text = text;
    for (bad, good) in &opts.macro_table {
        text = substitute_macro(&text, bad, good);
    }
    text
}

/// Joins the lines of a display-math body into one line, trimming each.
fn collapse_lines(body: &str) -> String {
    body.split('\n')
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Rewrites every terminated `open .. close` pair via `f`.
///
/// An `open` with no matching `close` is copied through verbatim, along
/// with everything after it.
fn rewrite_delimited(text: &str, open: &str, close: &str, f: impl Fn(&str) -> String) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(start) = rest.find(open) {
        let after_open = start + open.len();
        match rest[after_open..].find(close) {
            Some(body_len) => {
                out.push_str(&rest[..start]);
                out.push_str(&f(&rest[after_open..after_open + body_len]));
                rest = &rest[after_open + body_len + close.len()..];
            }
            None => {
                log::warn!("unterminated {open} at byte {start}, leaving as literal text");
                break;
            }
        }
    }
    out.push_str(rest);
    out
}

/// Strips `\boxed{X}` down to bare `X`.
///
/// Only non-nested bodies are handled; a `\boxed` whose argument
/// contains braces is left alone.
fn strip_boxed(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(start) = rest.find(r"\boxed") {
        let after = &rest[start + r"\boxed".len()..];
        let arg = after.trim_start();
        let consumed = after.len() - arg.len();
        let replaced = arg.strip_prefix('{').and_then(|inner| {
            let end = inner.find(['{', '}'])?;
            inner[end..].starts_with('}').then(|| &inner[..end])
        });
        match replaced {
            Some(body) => {
                out.push_str(&rest[..start]);
                out.push_str(body);
                rest = &arg[body.len() + 2..];
            }
            None => {
                out.push_str(&rest[..start + r"\boxed".len() + consumed]);
                rest = arg;
            }
        }
    }
    out.push_str(rest);
    out
}

/// Replaces `from` with `to` at macro boundaries only: an occurrence
/// followed by an ASCII letter belongs to a longer macro and is kept.
fn substitute_macro(text: &str, from: &str, to: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(i) = rest.find(from) {
        let after = &rest[i + from.len()..];
        let is_boundary = !after
            .chars()
            .next()
            .is_some_and(|c| c.is_ascii_alphabetic());
        out.push_str(&rest[..i]);
        out.push_str(if is_boundary { to } else { from });
        rest = after;
    }
    out.push_str(rest);
    out
}
