//! Immutable render configuration and the startup capability probe.
//!
//! The source lineage kept these as module-level globals; here they are
//! an explicit [`RenderConfig`] constructed once at startup and passed
//! into the pipeline, so the core stays free of hidden state and every
//! stage is independently testable.

use log::info;
use serde::Serialize;
use tiletex_syntax::normalize::{NormalizeOptions, DEFAULT_MACRO_TABLE};

/// LaTeX engines whose presence enables full-typesetting normalization,
/// probed in this order.
const LATEX_ENGINES: [&str; 3] = ["pdflatex", "xelatex", "lualatex"];

/// Process-wide render configuration, immutable after startup.
///
/// The defaults reproduce the canonical tile geometry: an 800 px square
/// tile at 100 dpi (8 in x 8 in), 90-column soft wrap, a 550-character
/// greedy packing budget, and a 14 pt base font.
#[derive(Debug, Clone, Serialize)]
pub struct RenderConfig {
    /// Edge length of the canonical square tile, in pixels.
    pub tile_px: u32,
    /// Raster resolution in dots per inch.
    pub dpi: u32,
    /// Soft-wrap column budget for non-math chunks.
    pub wrap_width: usize,
    /// Greedy packing budget per tile, in characters.
    pub char_limit: usize,
    /// Base font size in points.
    pub font_size_pt: f32,
    /// Macro compatibility table for the lightweight math mode.
    pub macro_table: Vec<(String, String)>,
    /// Whether a full LaTeX toolchain was detected at startup.
    pub full_latex: bool,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            tile_px: 800,
            dpi: 100,
            wrap_width: 90,
            char_limit: 550,
            font_size_pt: 14.0,
            macro_table: DEFAULT_MACRO_TABLE.clone(),
            full_latex: false,
        }
    }
}

impl RenderConfig {
    /// Default configuration with the capability flag resolved by
    /// probing the system once. Call this at startup, not per render.
    pub fn detect() -> Self {
        Self {
            full_latex: detect_full_latex(),
            ..Self::default()
        }
    }

    /// Base font size converted to rasterization pixels.
    pub fn font_px(&self) -> f32 {
        self.font_size_pt * self.dpi as f32 / 72.0
    }

    /// Fixed padding added around cropped tile content (0.3 in).
    pub fn pad_px(&self) -> u32 {
        self.dpi * 3 / 10
    }

    /// Normalization options derived from this configuration.
    pub fn normalize_options(&self) -> NormalizeOptions {
        NormalizeOptions {
            full_latex: self.full_latex,
            macro_table: self.macro_table.clone(),
        }
    }
}

/// Probes for a full LaTeX toolchain on `PATH`.
///
/// Resolved once at process start; the flag never changes during a
/// process lifetime.
pub fn detect_full_latex() -> bool {
    for engine in LATEX_ENGINES {
        if let Ok(path) = which::which(engine) {
            info!("full LaTeX toolchain detected: {}", path.display());
            return true;
        }
    }
    info!("no LaTeX toolchain on PATH, using lightweight math mode");
    false
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_constants() {
        let cfg = RenderConfig::default();
        assert_eq!(cfg.tile_px, 800);
        assert_eq!(cfg.dpi, 100);
        assert_eq!(cfg.wrap_width, 90);
        assert_eq!(cfg.char_limit, 550);
        assert_eq!(cfg.font_size_pt, 14.0);
        assert!(!cfg.full_latex);
    }

    #[test]
    fn test_derived_geometry() {
        let cfg = RenderConfig::default();
        // 14 pt at 100 dpi is a hair over 19 px; padding is 30 px.
        assert!((cfg.font_px() - 19.44).abs() < 0.01);
        assert_eq!(cfg.pad_px(), 30);
    }

    #[test]
    fn test_normalize_options_carry_capability() {
        let mut cfg = RenderConfig::default();
        cfg.full_latex = true;
        assert!(cfg.normalize_options().full_latex);
        assert!(!cfg.normalize_options().macro_table.is_empty());
    }

    #[test]
    fn test_config_serializes() {
        let json = serde_json::to_string(&RenderConfig::default());
        assert!(json.is_ok());
    }
}
