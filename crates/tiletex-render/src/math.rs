//! Lightweight math mode: flattens LaTeX math into displayable text.
//!
//! The render call is pure - it never shells out to a TeX engine - so
//! math is displayed by mapping LaTeX source onto Unicode: symbol
//! macros become their glyphs, `\frac`/`\sqrt` fold into linear form,
//! exponents and indices become super/subscript characters where the
//! repertoire allows, and grouping braces disappear. Alignment markers
//! (`&`) are dropped and `\\` row separators become real line breaks.
//!
//! A backslash macro with no mapping is a recoverable
//! [`TileError::UnsupportedMacro`]; the pipeline substitutes a
//! placeholder tile for the affected chunk.

use crate::error::TileError;

/// Converts one math expression (no `$` markers) into plain text.
pub fn math_to_text(src: &str) -> Result<String, TileError> {
    let mut parser = MathParser::new(src);
    parser.convert()
}

/// Strips the outer `$$`/`$` markers from a delimited math span.
pub fn strip_markers(span: &str) -> &str {
    let trimmed = span.trim();
    if let Some(inner) = trimmed
        .strip_prefix("$$")
        .and_then(|s| s.strip_suffix("$$"))
    {
        return inner.trim();
    }
    if trimmed.len() >= 2 {
        if let Some(inner) = trimmed.strip_prefix('$').and_then(|s| s.strip_suffix('$')) {
            return inner.trim();
        }
    }
    trimmed
}

struct MathParser<'a> {
    input: &'a str,
    position: usize,
}

impl<'a> MathParser<'a> {
    fn new(input: &'a str) -> Self {
        Self { input, position: 0 }
    }

    fn rest(&self) -> &'a str {
        &self.input[self.position..]
    }

    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.position += c.len_utf8();
        Some(c)
    }

    fn convert(&mut self) -> Result<String, TileError> {
        let mut out = String::with_capacity(self.input.len());
        while let Some(c) = self.bump() {
            match c {
                '\\' => self.convert_macro(&mut out)?,
                '^' => self.convert_script(&mut out, Script::Superscript)?,
                '_' => self.convert_script(&mut out, Script::Subscript)?,
                '{' | '}' | '&' => {}
                '~' => out.push(' '),
                _ => out.push(c),
            }
        }
        Ok(out)
    }

    fn convert_macro(&mut self, out: &mut String) -> Result<(), TileError> {
        // Row separator and single-symbol escapes first.
        match self.peek() {
            Some('\\') => {
                self.bump();
                out.push('\n');
                return Ok(());
            }
            Some(c @ ('{' | '}' | '$' | '%' | '&' | '_' | '#')) => {
                self.bump();
                out.push(c);
                return Ok(());
            }
            Some(',' | ';' | ':') => {
                self.bump();
                out.push(' ');
                return Ok(());
            }
            Some('!') => {
                self.bump();
                return Ok(());
            }
            _ => {}
        }

        let name = self.read_macro_name();
        if name.is_empty() {
            // A trailing lone backslash; keep it visible.
            out.push('\\');
            return Ok(());
        }

        if let Some(symbol) = symbol(name) {
            out.push_str(symbol);
            return Ok(());
        }
        if is_function_name(name) {
            out.push_str(name);
            return Ok(());
        }

        match name {
            "frac" | "dfrac" | "tfrac" => {
                let numerator = self.read_group()?;
                let denominator = self.read_group()?;
                out.push_str(&grouped(&numerator));
                out.push('/');
                out.push_str(&grouped(&denominator));
            }
            "sqrt" => {
                self.skip_optional_argument();
                let radicand = self.read_group()?;
                out.push('√');
                out.push('(');
                out.push_str(&radicand);
                out.push(')');
            }
            "text" | "textrm" | "textbf" | "textit" | "mathrm" | "mathbf" | "mathit"
            | "mathsf" | "mathtt" | "mathcal" | "mathbb" | "operatorname" => {
                let inner = self.read_group()?;
                out.push_str(&inner);
            }
            "boxed" => {
                let inner = self.read_group()?;
                out.push('[');
                out.push_str(&inner);
                out.push(']');
            }
            "left" | "right" | "big" | "Big" | "bigl" | "bigr" | "Bigl" | "Bigr"
            | "displaystyle" | "textstyle" | "limits" | "nolimits" => {
                // Sizing and style hints carry no glyphs of their own;
                // the following delimiter (if any) flows through.
                if matches!(self.peek(), Some('.')) {
                    self.bump();
                }
            }
            _ => {
                return Err(TileError::UnsupportedMacro {
                    name: name.to_string(),
                });
            }
        }
        Ok(())
    }

    /// Consumes `^`/`_` plus its argument, mapping to Unicode
    /// super/subscripts when the whole argument is representable and
    /// falling back to `^(..)` / `_(..)` notation otherwise.
    fn convert_script(&mut self, out: &mut String, script: Script) -> Result<(), TileError> {
        let body = self.read_group()?;
        let mapped: Option<String> = body.chars().map(|c| script.map_char(c)).collect();
        match mapped {
            Some(mapped) if !mapped.is_empty() => out.push_str(&mapped),
            _ => {
                out.push(script.ascii_marker());
                out.push_str(&grouped_always(&body));
            }
        }
        Ok(())
    }

    fn read_macro_name(&mut self) -> &'a str {
        let start = self.position;
        while self.peek().is_some_and(|c| c.is_ascii_alphabetic()) {
            self.bump();
        }
        &self.input[start..self.position]
    }

    /// Reads one argument: a brace-balanced `{..}` group (converted
    /// recursively), a `\macro` token, or a single character.
    fn read_group(&mut self) -> Result<String, TileError> {
        while self.peek().is_some_and(|c| c == ' ') {
            self.bump();
        }
        match self.peek() {
            Some('{') => {
                self.bump();
                let start = self.position;
                let mut depth = 1usize;
                while let Some(c) = self.bump() {
                    match c {
                        '{' => depth += 1,
                        '}' => {
                            depth -= 1;
                            if depth == 0 {
                                let body = &self.input[start..self.position - 1];
                                return math_to_text(body);
                            }
                        }
                        _ => {}
                    }
                }
                // Unclosed group: treat the rest as the body.
                math_to_text(&self.input[start..])
            }
            Some('\\') => {
                self.bump();
                let mut out = String::new();
                self.convert_macro(&mut out)?;
                Ok(out)
            }
            Some(_) => {
                let c = self.bump().expect("peeked");
                Ok(c.to_string())
            }
            None => Ok(String::new()),
        }
    }

    /// Skips a `[..]` optional argument if present (e.g. `\sqrt[3]`).
    fn skip_optional_argument(&mut self) {
        if self.peek() == Some('[') {
            while let Some(c) = self.bump() {
                if c == ']' {
                    break;
                }
            }
        }
    }
}

#[derive(Clone, Copy)]
enum Script {
    Superscript,
    Subscript,
}

impl Script {
    fn ascii_marker(self) -> char {
        match self {
            Script::Superscript => '^',
            Script::Subscript => '_',
        }
    }

    fn map_char(self, c: char) -> Option<char> {
        match self {
            Script::Superscript => match c {
                '0' => Some('⁰'),
                '1' => Some('¹'),
                '2' => Some('²'),
                '3' => Some('³'),
                '4' => Some('⁴'),
                '5' => Some('⁵'),
                '6' => Some('⁶'),
                '7' => Some('⁷'),
                '8' => Some('⁸'),
                '9' => Some('⁹'),
                '+' => Some('⁺'),
                '-' => Some('⁻'),
                '=' => Some('⁼'),
                '(' => Some('⁽'),
                ')' => Some('⁾'),
                'n' => Some('ⁿ'),
                'i' => Some('ⁱ'),
                _ => None,
            },
            Script::Subscript => match c {
                '0' => Some('₀'),
                '1' => Some('₁'),
                '2' => Some('₂'),
                '3' => Some('₃'),
                '4' => Some('₄'),
                '5' => Some('₅'),
                '6' => Some('₆'),
                '7' => Some('₇'),
                '8' => Some('₈'),
                '9' => Some('₉'),
                '+' => Some('₊'),
                '-' => Some('₋'),
                '=' => Some('₌'),
                '(' => Some('₍'),
                ')' => Some('₎'),
                'a' => Some('ₐ'),
                'e' => Some('ₑ'),
                'i' => Some('ᵢ'),
                'n' => Some('ₙ'),
                'o' => Some('ₒ'),
                'x' => Some('ₓ'),
                _ => None,
            },
        }
    }
}

/// Parenthesizes multi-character operands of a folded fraction.
fn grouped(operand: &str) -> String {
    if operand.chars().count() <= 1 {
        operand.to_string()
    } else {
        format!("({operand})")
    }
}

fn grouped_always(operand: &str) -> String {
    format!("({operand})")
}

/// Function names rendered as-is (upright in real TeX, plain here).
fn is_function_name(name: &str) -> bool {
    matches!(
        name,
        "sin" | "cos" | "tan" | "cot" | "sec" | "csc" | "sinh" | "cosh" | "tanh" | "log"
            | "ln" | "lg" | "exp" | "lim" | "max" | "min" | "sup" | "inf" | "arg" | "det"
            | "gcd" | "deg" | "dim" | "ker" | "hom" | "Pr" | "mod" | "bmod" | "pmod"
    )
}

/// Symbol macros mapped straight onto Unicode glyphs.
fn symbol(name: &str) -> Option<&'static str> {
    let glyph = match name {
        // Greek, lowercase
        "alpha" => "α",
        "beta" => "β",
        "gamma" => "γ",
        "delta" => "δ",
        "epsilon" | "varepsilon" => "ε",
        "zeta" => "ζ",
        "eta" => "η",
        "theta" | "vartheta" => "θ",
        "iota" => "ι",
        "kappa" => "κ",
        "lambda" => "λ",
        "mu" => "μ",
        "nu" => "ν",
        "xi" => "ξ",
        "pi" => "π",
        "rho" | "varrho" => "ρ",
        "sigma" => "σ",
        "tau" => "τ",
        "upsilon" => "υ",
        "phi" | "varphi" => "φ",
        "chi" => "χ",
        "psi" => "ψ",
        "omega" => "ω",
        // Greek, uppercase
        "Gamma" => "Γ",
        "Delta" => "Δ",
        "Theta" => "Θ",
        "Lambda" => "Λ",
        "Xi" => "Ξ",
        "Pi" => "Π",
        "Sigma" => "Σ",
        "Upsilon" => "Υ",
        "Phi" => "Φ",
        "Psi" => "Ψ",
        "Omega" => "Ω",
        // Arrows
        "to" | "rightarrow" => "→",
        "leftarrow" | "gets" => "←",
        "leftrightarrow" => "↔",
        "Rightarrow" | "implies" => "⇒",
        "Leftarrow" | "impliedby" => "⇐",
        "Leftrightarrow" | "iff" => "⇔",
        "mapsto" => "↦",
        "uparrow" => "↑",
        "downarrow" => "↓",
        // Relations
        "leq" | "le" => "≤",
        "geq" | "ge" => "≥",
        "neq" | "ne" => "≠",
        "approx" => "≈",
        "equiv" => "≡",
        "sim" => "∼",
        "simeq" => "≃",
        "cong" => "≅",
        "propto" => "∝",
        "ll" => "≪",
        "gg" => "≫",
        "subset" => "⊂",
        "supset" => "⊃",
        "subseteq" => "⊆",
        "supseteq" => "⊇",
        "in" => "∈",
        "notin" => "∉",
        "ni" => "∋",
        "perp" => "⊥",
        "parallel" => "∥",
        "mid" => "|",
        // Operators
        "times" => "×",
        "cdot" => "⋅",
        "div" => "÷",
        "pm" => "±",
        "mp" => "∓",
        "ast" => "∗",
        "star" => "⋆",
        "circ" => "∘",
        "bullet" => "•",
        "oplus" => "⊕",
        "ominus" => "⊖",
        "otimes" => "⊗",
        "cup" => "∪",
        "cap" => "∩",
        "setminus" => "∖",
        "wedge" | "land" => "∧",
        "vee" | "lor" => "∨",
        "neg" | "lnot" => "¬",
        "forall" => "∀",
        "exists" => "∃",
        "nexists" => "∄",
        "nabla" => "∇",
        "partial" => "∂",
        "infty" => "∞",
        "emptyset" | "varnothing" => "∅",
        "angle" => "∠",
        // Big operators
        "sum" => "∑",
        "prod" => "∏",
        "int" => "∫",
        "iint" => "∬",
        "oint" => "∮",
        "bigcup" => "⋃",
        "bigcap" => "⋂",
        // Dots and misc
        "ldots" | "dots" | "dotsc" | "dotso" => "…",
        "cdots" | "dotsb" => "⋯",
        "vdots" => "⋮",
        "ddots" => "⋱",
        "prime" => "′",
        "hbar" => "ℏ",
        "ell" => "ℓ",
        "Re" => "ℜ",
        "Im" => "ℑ",
        "aleph" => "ℵ",
        "degree" => "°",
        // Paired delimiters
        "langle" => "⟨",
        "rangle" => "⟩",
        "lfloor" => "⌊",
        "rfloor" => "⌋",
        "lceil" => "⌈",
        "rceil" => "⌉",
        _ => return None,
    };
    Some(glyph)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn convert(src: &str) -> String {
        math_to_text(src).expect("conversion should succeed")
    }

    #[test]
    fn test_strip_markers() {
        assert_eq!(strip_markers("$x^2$"), "x^2");
        assert_eq!(strip_markers("$$ E = mc^2 $$"), "E = mc^2");
        assert_eq!(strip_markers("bare"), "bare");
    }

    #[test]
    fn test_plain_passthrough() {
        assert_eq!(convert("a + b = c"), "a + b = c");
    }

    #[test]
    fn test_symbol_macros() {
        assert_eq!(convert(r"\alpha \to \infty"), "α → ∞");
        assert_eq!(convert(r"a \Rightarrow b"), "a ⇒ b");
        assert_eq!(convert(r"x \leq y \neq z"), "x ≤ y ≠ z");
    }

    #[test]
    fn test_superscripts_and_subscripts() {
        assert_eq!(convert("x^2"), "x²");
        assert_eq!(convert("x^{23}"), "x²³");
        assert_eq!(convert("a_1 + a_2"), "a₁ + a₂");
        assert_eq!(convert("e^{i\\pi}"), "e^(iπ)");
    }

    #[test]
    fn test_fraction_folding() {
        assert_eq!(convert(r"\frac{1}{2}"), "1/2");
        assert_eq!(convert(r"\frac{a+b}{c}"), "(a+b)/c");
    }

    #[test]
    fn test_sqrt() {
        assert_eq!(convert(r"\sqrt{x+1}"), "√(x+1)");
        assert_eq!(convert(r"\sqrt[3]{x}"), "√(x)");
    }

    #[test]
    fn test_text_wrappers_unwrapped() {
        assert_eq!(convert(r"\text{speed} = v"), "speed = v");
        assert_eq!(convert(r"\mathbb{R}"), "R");
    }

    #[test]
    fn test_row_separator_becomes_newline() {
        assert_eq!(convert(r"a \\ b"), "a \n b");
    }

    #[test]
    fn test_alignment_marker_dropped() {
        assert_eq!(convert(r"x &= y"), "x = y");
    }

    #[test]
    fn test_left_right_sizing_dropped() {
        assert_eq!(convert(r"\left( x \right)"), "( x )");
        assert_eq!(convert(r"\left. f \right|"), " f |");
    }

    #[test]
    fn test_function_names_kept() {
        assert_eq!(convert(r"\sin x + \log y"), "sin x + log y");
    }

    #[test]
    fn test_spacing_macros() {
        assert_eq!(convert(r"a\,b\;c\!d"), "a b cd");
    }

    #[test]
    fn test_escaped_symbols() {
        assert_eq!(convert(r"50\% \$5"), "50% $5");
    }

    #[test]
    fn test_unsupported_macro_is_error() {
        let err = math_to_text(r"\mysterymacro{2}").unwrap_err();
        match err {
            TileError::UnsupportedMacro { name } => assert_eq!(name, "mysterymacro"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_nested_groups() {
        assert_eq!(convert(r"\frac{\alpha}{\beta + 1}"), "α/(β + 1)");
        assert_eq!(convert(r"\sqrt{\frac{1}{2}}"), "√(1/2)");
    }
}
