//! Chunk-to-tile rasterization.
//!
//! Math chunks render centered on both axes; text chunks render
//! left-aligned from the top-left margin with inline math spans drawn
//! through the lightweight conversion. Every path ends in
//! [`compose_tile`]: tight crop, fixed padding, center-paste onto the
//! white canonical square, PNG encode.

use std::io::Cursor;

use image::{DynamicImage, ImageOutputFormat};
use log::debug;
use tiletex_core::{wrap_chunk, Chunk, RenderConfig};

use crate::canvas::{compose_tile, Canvas};
use crate::error::TileError;
use crate::font::FontStore;
use crate::math::{math_to_text, strip_markers};

/// One fixed-size square raster image, the unit of rendered output.
#[derive(Debug, Clone)]
pub struct Tile {
    /// Lossless PNG bytes.
    pub png: Vec<u8>,
    /// Pixel width (always the canonical dimension).
    pub width: u32,
    /// Pixel height (always the canonical dimension).
    pub height: u32,
    /// Whether this tile is a failure placeholder rather than rendered
    /// content.
    pub placeholder: bool,
}

/// Horizontal alignment of rasterized lines.
#[derive(Clone, Copy, PartialEq)]
enum Align {
    Left,
    Center,
}

/// Rasterizes chunks into canonical square tiles.
pub struct TileRenderer {
    pub(crate) cfg: RenderConfig,
    fonts: FontStore,
}

impl TileRenderer {
    /// Resolves the default font and prepares a renderer. Fails only
    /// when no usable font face exists; a successful construction means
    /// rendering itself can always produce a tile.
    pub fn new(cfg: RenderConfig) -> Result<Self, TileError> {
        let fonts = FontStore::load_default()?;
        Ok(Self { cfg, fonts })
    }

    /// The configuration this renderer was built with.
    pub fn cfg(&self) -> &RenderConfig {
        &self.cfg
    }

    /// Renders one chunk to a tile.
    pub fn render_chunk(&self, chunk: &Chunk) -> Result<Tile, TileError> {
        let canvas = if chunk.is_math {
            self.raster_lines(&self.math_lines(&chunk.content)?, Align::Center)?
        } else {
            self.raster_lines(&self.text_lines(&chunk.content), Align::Left)?
        };
        self.encode(&canvas, false)
    }

    /// Builds a visible placeholder tile carrying the chunk's raw
    /// source. Never fails: a placeholder must always be producible.
    pub fn placeholder(&self, source: &str) -> Tile {
        let mut lines = vec!["[could not render this part]".to_string(), String::new()];
        lines.extend(wrap_chunk(source, self.cfg.wrap_width).lines().map(String::from));
        let canvas = self
            .raster_lines(&lines, Align::Left)
            .unwrap_or_else(|_| Canvas::new(1, 1));
        match self.encode(&canvas, true) {
            Ok(tile) => tile,
            Err(_) => Tile {
                png: Vec::new(),
                width: self.cfg.tile_px,
                height: self.cfg.tile_px,
                placeholder: true,
            },
        }
    }

    /// Display lines for a math chunk: markers stripped per packed
    /// paragraph, rows split on converted `\\` separators, paragraphs
    /// separated by a blank line.
    fn math_lines(&self, content: &str) -> Result<Vec<String>, TileError> {
        let mut lines = Vec::new();
        for paragraph in content.split("\n\n") {
            let paragraph = paragraph.trim();
            if paragraph.is_empty() {
                continue;
            }
            if !lines.is_empty() {
                lines.push(String::new());
            }
            let converted = math_to_text(strip_markers(paragraph))?;
            lines.extend(converted.split('\n').map(|row| row.trim().to_string()));
        }
        Ok(lines)
    }

    /// Display lines for a text chunk: soft-wrapped, with inline math
    /// spans drawn through the lightweight conversion. A span the
    /// conversion rejects stays as raw source - inside prose that is a
    /// degraded interpretation, not a failure.
    fn text_lines(&self, content: &str) -> Vec<String> {
        wrap_chunk(content, self.cfg.wrap_width)
            .lines()
            .map(render_inline_spans)
            .collect()
    }

    /// Rasterizes display lines onto a fresh working canvas.
    fn raster_lines(&self, lines: &[String], align: Align) -> Result<Canvas, TileError> {
        let px = self.cfg.font_px();
        let font = &self.fonts.font;
        let metrics = font
            .horizontal_line_metrics(px)
            .ok_or_else(|| TileError::Layout("font has no horizontal metrics".into()))?;
        let line_height = metrics.new_line_size.ceil();

        let widths: Vec<f32> = lines
            .iter()
            .map(|line| Canvas::measure(font, px, line))
            .collect();
        let max_width = widths.iter().copied().fold(0.0f32, f32::max);

        let slack = px.ceil() as usize;
        let canvas_w = max_width.ceil() as usize + 2 * slack;
        let canvas_h = (lines.len().max(1) as f32 * line_height).ceil() as usize + 2 * slack;
        let mut canvas = Canvas::new(canvas_w, canvas_h);

        for (i, line) in lines.iter().enumerate() {
            if line.is_empty() {
                continue;
            }
            let baseline = (slack as f32 + i as f32 * line_height + metrics.ascent).round() as i32;
            let origin_x = match align {
                Align::Left => slack as f32,
                Align::Center => slack as f32 + (max_width - widths[i]) / 2.0,
            };
            canvas.draw_line(font, px, line, origin_x, baseline);
        }
        Ok(canvas)
    }

    /// Composes and PNG-encodes the canonical square tile.
    fn encode(&self, canvas: &Canvas, placeholder: bool) -> Result<Tile, TileError> {
        let tile_img = compose_tile(canvas, self.cfg.tile_px, self.cfg.pad_px());
        let mut png = Vec::new();
        DynamicImage::ImageRgb8(tile_img)
            .write_to(&mut Cursor::new(&mut png), ImageOutputFormat::Png)?;
        debug!("encoded tile, {} bytes", png.len());
        Ok(Tile {
            png,
            width: self.cfg.tile_px,
            height: self.cfg.tile_px,
            placeholder,
        })
    }
}

/// Rewrites the inline `$..$` spans of one prose line through the math
/// conversion, leaving plain runs and unconvertible spans untouched.
fn render_inline_spans(line: &str) -> String {
    let mut out = String::with_capacity(line.len());
    let mut rest = line;
    while let Some(start) = rest.find('$') {
        let Some(body_len) = rest[start + 1..].find('$').filter(|&len| len > 0) else {
            break;
        };
        let span = &rest[start..start + body_len + 2];
        out.push_str(&rest[..start]);
        match math_to_text(strip_markers(span)) {
            Ok(converted) => out.push_str(&converted),
            Err(_) => out.push_str(span),
        }
        rest = &rest[start + body_len + 2..];
    }
    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_inline_spans() {
        assert_eq!(render_inline_spans("so $x^2$ holds"), "so x² holds");
        assert_eq!(render_inline_spans("no math here"), "no math here");
        // Unpaired and empty spans are left alone.
        assert_eq!(render_inline_spans("costs $5"), "costs $5");
    }

    #[test]
    fn test_render_inline_spans_degrades_on_bad_macro() {
        let line = r"see $\nosuchmacro$ here";
        assert_eq!(render_inline_spans(line), line);
    }
}
