//! # tiletex render
//!
//! Back half of the tiletex pipeline: turns packed chunks into
//! canonical square PNG tiles, and exposes the one-call
//! [`MarkdownTiler`] facade over the whole text-to-tiles transform.
//!
//! ## Overview
//!
//! ```text
//! raw answer text
//!   │ normalize          (tiletex-syntax)
//!   │ segment            (tiletex-syntax)
//!   │ pack               (tiletex-core)
//!   ▼
//! chunks ──► rasterize in parallel ──► ordered Vec<Tile>
//!              │ per-chunk error boundary
//!              └─► placeholder tile on failure
//! ```
//!
//! Rendering of distinct chunks is independent, so tiles are rasterized
//! across a `rayon` pool; the indexed collect keeps the returned
//! sequence in original chunk order. A failing chunk becomes a flagged
//! placeholder tile carrying its raw source - the caller always receives
//! the complete ordered sequence, never a partial one.
//!
//! ## Example
//!
//! ```no_run
//! use tiletex_core::RenderConfig;
//! use tiletex_render::MarkdownTiler;
//!
//! let tiler = MarkdownTiler::new(RenderConfig::detect())?;
//! for tile in tiler.render("The answer is \\(x^2\\).") {
//!     assert_eq!((tile.width, tile.height), (800, 800));
//! }
//! # Ok::<(), tiletex_render::TileError>(())
//! ```

pub mod canvas;
pub mod error;
pub mod font;
pub mod math;
pub mod tile;

pub use error::TileError;
pub use tile::{Tile, TileRenderer};

use log::{debug, warn};
use rayon::prelude::*;
use tiletex_core::{pack_blocks, RenderConfig};
use tiletex_syntax::{normalize, segment};

/// The full markdown-to-tiles pipeline behind a single `render` call.
///
/// Construct once at startup (font resolution happens here) and reuse:
/// a render call allocates only per-call state and shares nothing
/// mutable, so one tiler may serve concurrent callers.
pub struct MarkdownTiler {
    renderer: TileRenderer,
}

impl MarkdownTiler {
    pub fn new(cfg: RenderConfig) -> Result<Self, TileError> {
        Ok(Self {
            renderer: TileRenderer::new(cfg)?,
        })
    }

    /// The configuration this tiler was built with.
    pub fn config(&self) -> &RenderConfig {
        self.renderer.cfg()
    }

    /// Renders a raw answer into the ordered tile sequence.
    ///
    /// Infallible by construction: malformed markup degrades to literal
    /// text upstream, and rasterization failures are isolated per tile
    /// as placeholders. Empty or whitespace-only input yields an empty
    /// sequence.
    pub fn render(&self, markdown: &str) -> Vec<Tile> {
        let cfg = self.config();
        let normalized = normalize(markdown, &cfg.normalize_options());
        let blocks = segment(&normalized);
        let chunks = pack_blocks(&blocks, cfg.char_limit);
        debug!(
            "render: {} blocks packed into {} chunks",
            blocks.len(),
            chunks.len()
        );

        chunks
            .par_iter()
            .map(|chunk| match self.renderer.render_chunk(chunk) {
                Ok(tile) => tile,
                Err(err) => {
                    warn!("tile render failed ({err}), substituting placeholder");
                    self.renderer.placeholder(&chunk.content)
                }
            })
            .collect()
    }
}
