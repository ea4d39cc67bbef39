//! Grayscale working canvas and tile composition.
//!
//! Glyph bitmaps from `fontdue` are alpha-coverage grids; the canvas
//! accumulates them with max blending (overlapping glyph edges must not
//! darken), is tight-cropped to the content bounding box, padded, and
//! finally center-pasted onto the white canonical square. Oversized
//! content is scaled down to fit, preserving aspect ratio, so nothing
//! is ever lost at the tile edge.

use fontdue::Font;
use image::{imageops, Rgb, RgbImage};

/// Accumulating coverage canvas (0 = blank, 255 = full ink).
pub struct Canvas {
    width: usize,
    height: usize,
    data: Vec<u8>,
}

impl Canvas {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            data: vec![0; width * height],
        }
    }

    /// Max-blends a glyph bitmap at the given top-left position,
    /// clipping to the canvas bounds.
    pub fn blit(&mut self, bitmap: &[u8], bw: usize, bh: usize, x: i32, y: i32) {
        for row in 0..bh {
            let dy = y + row as i32;
            if dy < 0 || dy >= self.height as i32 {
                continue;
            }
            for col in 0..bw {
                let dx = x + col as i32;
                if dx < 0 || dx >= self.width as i32 {
                    continue;
                }
                let src = bitmap[row * bw + col];
                let dst = &mut self.data[dy as usize * self.width + dx as usize];
                *dst = (*dst).max(src);
            }
        }
    }

    /// Rasterizes one text run with its left edge at `origin_x` and the
    /// given baseline, returning the pen position after the run.
    pub fn draw_line(&mut self, font: &Font, px: f32, text: &str, origin_x: f32, baseline: i32) -> f32 {
        let mut pen_x = origin_x;
        for c in text.chars() {
            let (metrics, bitmap) = font.rasterize(c, px);
            let x = pen_x.round() as i32 + metrics.xmin;
            let y = baseline - metrics.height as i32 - metrics.ymin;
            self.blit(&bitmap, metrics.width, metrics.height, x, y);
            pen_x += metrics.advance_width;
        }
        pen_x
    }

    /// Advance width of a text run without drawing it.
    pub fn measure(font: &Font, px: f32, text: &str) -> f32 {
        text.chars()
            .map(|c| font.metrics(c, px).advance_width)
            .sum()
    }

    /// Bounding box of inked pixels as `(x0, y0, x1, y1)`, exclusive on
    /// the high side. `None` when the canvas is blank.
    pub fn content_bounds(&self) -> Option<(usize, usize, usize, usize)> {
        let mut bounds: Option<(usize, usize, usize, usize)> = None;
        for y in 0..self.height {
            let row = &self.data[y * self.width..(y + 1) * self.width];
            for (x, &v) in row.iter().enumerate() {
                if v == 0 {
                    continue;
                }
                let (x0, y0, x1, y1) = bounds.unwrap_or((x, y, x + 1, y + 1));
                bounds = Some((x0.min(x), y0.min(y), x1.max(x + 1), y1.max(y + 1)));
            }
        }
        bounds
    }

    fn coverage_at(&self, x: usize, y: usize) -> u8 {
        self.data[y * self.width + x]
    }
}

/// Crops the canvas to its content, pads it, and centers it onto a
/// white `tile_px` square. Content larger than the square (after
/// padding) is scaled down to fit, aspect preserved.
pub fn compose_tile(canvas: &Canvas, tile_px: u32, pad_px: u32) -> RgbImage {
    let mut tile = RgbImage::from_pixel(tile_px, tile_px, Rgb([255, 255, 255]));

    let Some((x0, y0, x1, y1)) = canvas.content_bounds() else {
        return tile;
    };

    let content_w = (x1 - x0) as u32 + 2 * pad_px;
    let content_h = (y1 - y0) as u32 + 2 * pad_px;
    let mut content = RgbImage::from_pixel(content_w, content_h, Rgb([255, 255, 255]));
    for y in y0..y1 {
        for x in x0..x1 {
            let ink = 255 - canvas.coverage_at(x, y);
            let px = (x - x0) as u32 + pad_px;
            let py = (y - y0) as u32 + pad_px;
            content.put_pixel(px, py, Rgb([ink, ink, ink]));
        }
    }

    let content = if content_w > tile_px || content_h > tile_px {
        let scale = f64::min(
            tile_px as f64 / content_w as f64,
            tile_px as f64 / content_h as f64,
        );
        let w = ((content_w as f64 * scale) as u32).max(1);
        let h = ((content_h as f64 * scale) as u32).max(1);
        imageops::resize(&content, w, h, imageops::FilterType::Triangle)
    } else {
        content
    };

    let x_off = i64::from((tile_px - content.width()) / 2);
    let y_off = i64::from((tile_px - content.height()) / 2);
    imageops::replace(&mut tile, &content, x_off, y_off);
    tile
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_canvas_has_no_bounds() {
        assert!(Canvas::new(10, 10).content_bounds().is_none());
    }

    #[test]
    fn test_bounds_track_blits() {
        let mut canvas = Canvas::new(20, 20);
        canvas.blit(&[255, 255, 255, 255], 2, 2, 5, 7);
        assert_eq!(canvas.content_bounds(), Some((5, 7, 7, 9)));
    }

    #[test]
    fn test_blit_clips_at_edges() {
        let mut canvas = Canvas::new(4, 4);
        canvas.blit(&[255; 9], 3, 3, -1, -1);
        canvas.blit(&[255; 9], 3, 3, 3, 3);
        assert_eq!(canvas.content_bounds(), Some((0, 0, 4, 4)));
    }

    #[test]
    fn test_blank_canvas_composes_blank_tile() {
        let tile = compose_tile(&Canvas::new(10, 10), 64, 4);
        assert_eq!(tile.dimensions(), (64, 64));
        assert!(tile.pixels().all(|p| p.0 == [255, 255, 255]));
    }

    #[test]
    fn test_content_is_centered() {
        let mut canvas = Canvas::new(100, 100);
        canvas.blit(&[255, 255, 255, 255], 2, 2, 40, 40);
        let tile = compose_tile(&canvas, 64, 4);
        assert_eq!(tile.dimensions(), (64, 64));
        // 2x2 ink plus 4 px padding on each side -> 10x10 content block
        // centered at (27, 27); ink lands dead center.
        assert_eq!(tile.get_pixel(31, 31).0, [0, 0, 0]);
        assert_eq!(tile.get_pixel(0, 0).0, [255, 255, 255]);
    }

    #[test]
    fn test_oversized_content_scales_to_fit() {
        let mut canvas = Canvas::new(300, 80);
        for x in 0..300 {
            canvas.blit(&[255], 1, 1, x, 40);
        }
        let tile = compose_tile(&canvas, 64, 4);
        assert_eq!(tile.dimensions(), (64, 64));
        // The 300 px line was scaled into the tile, so some ink exists.
        assert!(tile.pixels().any(|p| p.0[0] < 255));
    }
}
