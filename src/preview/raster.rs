//! [`Canvas`] backed by a `tiny-skia` pixmap.
//!
//! Device coordinates follow Cairo: pixel `(x, y)` covers the unit square
//! starting at `(x, y)`. Anti-aliasing is off so every pixel is either one
//! of the layer colours or fully transparent.

use std::path::Path;

use glam::IVec2;
use image::{ImageFormat, Rgba, RgbaImage};
use tiny_skia::{FillRule, LineCap, Paint, Path as SkiaPath, PathBuilder, Pixmap, Rect, Stroke, Transform};

use crate::kicad::error::{KicadError, KicadResult};
use crate::preview::transform::{Canvas, Color};

/// A transparent RGBA drawing surface.
#[derive(Debug, Clone)]
pub struct RasterCanvas {
    pixmap: Pixmap,
}

impl RasterCanvas {
    /// Creates a fully transparent canvas.
    ///
    /// # Errors
    ///
    /// Returns [`KicadError::Empty`] for a zero-sized or unallocatable canvas.
    pub fn new(width: u32, height: u32) -> KicadResult<Self> {
        let pixmap = Pixmap::new(width, height)
            .ok_or_else(|| KicadError::empty(format!("cannot allocate a {width}x{height} canvas")))?;
        Ok(Self { pixmap })
    }

    /// Canvas width in pixels.
    #[must_use]
    pub fn width(&self) -> u32 {
        self.pixmap.width()
    }

    /// Canvas height in pixels.
    #[must_use]
    pub fn height(&self) -> u32 {
        self.pixmap.height()
    }

    /// Copies the pixels into an image with straight (non-premultiplied) alpha.
    #[must_use]
    pub fn to_image(&self) -> RgbaImage {
        let mut image = RgbaImage::new(self.width(), self.height());
        for (dst, src) in image.pixels_mut().zip(self.pixmap.pixels()) {
            let c = src.demultiply();
            *dst = Rgba([c.red(), c.green(), c.blue(), c.alpha()]);
        }
        image
    }

    /// Saves the canvas as PNG.
    ///
    /// # Errors
    ///
    /// Returns [`KicadError::Image`] if encoding or writing fails.
    pub fn save_png(&self, path: impl AsRef<Path>) -> KicadResult<()> {
        let path = path.as_ref();
        self.to_image()
            .save_with_format(path, ImageFormat::Png)
            .map_err(|e| KicadError::image(path, e))
    }

    fn stroke(&mut self, path: &SkiaPath, width: u32, color: Color) {
        #[allow(clippy::cast_precision_loss)] // Line widths are a few pixels
        let stroke = Stroke {
            width: width as f32,
            line_cap: LineCap::Round,
            ..Stroke::default()
        };
        self.pixmap
            .stroke_path(path, &paint(color), &stroke, Transform::identity(), None);
    }
}

fn paint(color: Color) -> Paint<'static> {
    let mut paint = Paint::default();
    paint.set_color_rgba8(color.r, color.g, color.b, 255);
    paint.anti_alias = false;
    paint
}

impl Canvas for RasterCanvas {
    fn draw_line(&mut self, from: IVec2, to: IVec2, width: u32, color: Color) {
        let (from, to) = (from.as_vec2(), to.as_vec2());
        let mut pb = PathBuilder::new();
        pb.move_to(from.x, from.y);
        pb.line_to(to.x, to.y);
        if let Some(path) = pb.finish() {
            self.stroke(&path, width, color);
        }
    }

    fn fill_polygon(&mut self, points: &[IVec2], color: Color) {
        let mut corners = points.iter().map(|p| p.as_vec2());
        let Some(first) = corners.next() else {
            return;
        };
        let mut pb = PathBuilder::new();
        pb.move_to(first.x, first.y);
        for p in corners {
            pb.line_to(p.x, p.y);
        }
        pb.close();
        if let Some(path) = pb.finish() {
            self.pixmap
                .fill_path(&path, &paint(color), FillRule::EvenOdd, Transform::identity(), None);
        }
    }

    fn draw_ellipse(&mut self, min: IVec2, max: IVec2, width: u32, color: Color) {
        let (lo, hi) = (min.as_vec2(), max.as_vec2());
        let oval = Rect::from_ltrb(lo.x, lo.y, hi.x, hi.y).and_then(PathBuilder::from_oval);
        match oval {
            Some(path) => self.stroke(&path, width, color),
            // Too small for an oval, mark the spot
            None => self.draw_line(min, max, width, color),
        }
    }
}
