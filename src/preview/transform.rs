//! Cairo-style drawing context over an affine matrix.
//!
//! [`TransformContext`] keeps the current transform and a save/restore stack,
//! and forwards device-space shapes to a [`Canvas`]. Transform calls
//! right-multiply the current matrix, so each one applies in the frame set
//! up by the calls before it.
//!
//! Drawing is immediate: `line_to`, `rectangle` and `arc` paint as soon as
//! they are called, and [`TransformContext::stroke`] / [`TransformContext::fill`]
//! only exist to keep call sites reading like Cairo code.

use glam::{DMat3, DVec2, IVec2};
use tracing::warn;

/// An opaque RGB colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Color {
    /// Red.
    pub r: u8,
    /// Green.
    pub g: u8,
    /// Blue.
    pub b: u8,
}

impl Color {
    /// Creates a colour from components in `0.0..=1.0`, truncating to 8 bits.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)] // Clamped to 0..=255
    #[must_use]
    pub fn from_unit(r: f64, g: f64, b: f64) -> Self {
        let channel = |v: f64| (v.clamp(0.0, 1.0) * 255.0) as u8;
        Self {
            r: channel(r),
            g: channel(g),
            b: channel(b),
        }
    }
}

/// Backend that paints shapes given in device pixels.
pub trait Canvas {
    /// Draws a straight line of the given pixel width.
    fn draw_line(&mut self, from: IVec2, to: IVec2, width: u32, color: Color);

    /// Fills a closed polygon.
    fn fill_polygon(&mut self, points: &[IVec2], color: Color);

    /// Strokes the outline of the ellipse inscribed in the box `min..max`.
    fn draw_ellipse(&mut self, min: IVec2, max: IVec2, width: u32, color: Color);
}

/// Drawing state: current transform, saved transforms, pen position,
/// colour and line width.
#[derive(Debug)]
pub struct TransformContext<C: Canvas> {
    canvas: C,
    matrix: DMat3,
    stack: Vec<DMat3>,
    position: IVec2,
    color: Color,
    line_width: u32,
}

impl<C: Canvas> TransformContext<C> {
    /// Creates a context with the identity transform.
    pub fn new(canvas: C) -> Self {
        Self {
            canvas,
            matrix: DMat3::IDENTITY,
            stack: Vec::new(),
            position: IVec2::ZERO,
            color: Color::default(),
            line_width: 1,
        }
    }

    /// Returns the current transform.
    #[must_use]
    pub const fn matrix(&self) -> DMat3 {
        self.matrix
    }

    /// Returns the backend.
    pub const fn canvas(&self) -> &C {
        &self.canvas
    }

    /// Consumes the context, returning the backend.
    pub fn into_canvas(self) -> C {
        self.canvas
    }

    /// Pushes the current transform.
    pub fn save(&mut self) {
        self.stack.push(self.matrix);
    }

    /// Pops the most recently saved transform.
    pub fn restore(&mut self) {
        match self.stack.pop() {
            Some(matrix) => self.matrix = matrix,
            None => warn!("restore() without matching save(), transform unchanged"),
        }
    }

    /// Scales subsequent drawing.
    pub fn scale(&mut self, x: f64, y: f64) {
        self.matrix *= DMat3::from_scale(DVec2::new(x, y));
    }

    /// Moves the origin of subsequent drawing.
    pub fn translate(&mut self, x: f64, y: f64) {
        self.matrix *= DMat3::from_translation(DVec2::new(x, y));
    }

    /// Rotates subsequent drawing by `radians`.
    pub fn rotate(&mut self, radians: f64) {
        self.matrix *= DMat3::from_angle(radians);
    }

    /// Projects a user-space point to the nearest device pixel.
    #[allow(clippy::cast_possible_truncation)] // Preview images are far smaller than i32::MAX
    #[must_use]
    pub fn device_coord(&self, x: f64, y: f64) -> IVec2 {
        let d = self.matrix.transform_point2(DVec2::new(x, y));
        IVec2::new(d.x.round() as i32, d.y.round() as i32)
    }

    /// Sets the colour for subsequent drawing.
    pub fn set_source_rgb(&mut self, r: f64, g: f64, b: f64) {
        self.color = Color::from_unit(r, g, b);
    }

    /// Sets the line width in user units, scaled to whole device pixels.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)] // Non-negative, small
    pub fn set_line_width(&mut self, width: f64) {
        let factor = self.matrix.x_axis.truncate().length();
        self.line_width = (width * factor).round().max(0.0) as u32;
    }

    /// Returns the current line width in device pixels.
    #[must_use]
    pub const fn line_width(&self) -> u32 {
        self.line_width
    }

    /// Moves the pen without drawing.
    pub fn move_to(&mut self, x: f64, y: f64) {
        self.position = self.device_coord(x, y);
    }

    /// Draws a line from the pen to `(x, y)` and moves the pen there.
    pub fn line_to(&mut self, x: f64, y: f64) {
        let to = self.device_coord(x, y);
        self.canvas
            .draw_line(self.position, to, self.line_width, self.color);
        self.position = to;
    }

    /// Fills the rectangle with corner `(x, y)` and size `w` by `h`.
    pub fn rectangle(&mut self, x: f64, y: f64, w: f64, h: f64) {
        let corners = [
            self.device_coord(x, y),
            self.device_coord(x + w, y),
            self.device_coord(x + w, y + h),
            self.device_coord(x, y + h),
        ];
        self.canvas.fill_polygon(&corners, self.color);
    }

    /// Draws a full circle outline of radius `r` around `(x, y)`.
    pub fn arc(&mut self, x: f64, y: f64, r: f64) {
        let min = self.device_coord(x - r, y - r);
        let max = self.device_coord(x + r, y + r);
        self.canvas
            .draw_ellipse(min.min(max), min.max(max), self.line_width, self.color);
    }

    /// No-op: lines are painted by [`Self::line_to`].
    pub const fn stroke(&self) {}

    /// No-op: shapes are painted by [`Self::rectangle`].
    pub const fn fill(&self) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::FRAC_PI_2;

    #[derive(Debug, Default)]
    struct Recorder {
        lines: Vec<(IVec2, IVec2, u32)>,
        polygons: Vec<Vec<IVec2>>,
        ellipses: Vec<(IVec2, IVec2, u32)>,
    }

    impl Canvas for Recorder {
        fn draw_line(&mut self, from: IVec2, to: IVec2, width: u32, _color: Color) {
            self.lines.push((from, to, width));
        }

        fn fill_polygon(&mut self, points: &[IVec2], _color: Color) {
            self.polygons.push(points.to_vec());
        }

        fn draw_ellipse(&mut self, min: IVec2, max: IVec2, width: u32, _color: Color) {
            self.ellipses.push((min, max, width));
        }
    }

    #[test]
    fn scale_then_translate_applies_in_scaled_frame() {
        let mut ctx = TransformContext::new(Recorder::default());
        ctx.scale(10.0, 10.0);
        ctx.translate(1.0, 2.0);
        assert_eq!(ctx.device_coord(0.0, 0.0), IVec2::new(10, 20));
        assert_eq!(ctx.device_coord(0.5, -0.26), IVec2::new(15, 17));
    }

    #[test]
    fn rotate_quarter_turn() {
        let mut ctx = TransformContext::new(Recorder::default());
        ctx.translate(100.0, 100.0);
        ctx.rotate(FRAC_PI_2);
        // Device Y points down, so positive angles turn clockwise on screen
        assert_eq!(ctx.device_coord(10.0, 0.0), IVec2::new(100, 110));
    }

    #[test]
    fn save_restore() {
        let mut ctx = TransformContext::new(Recorder::default());
        ctx.scale(2.0, 2.0);
        ctx.save();
        ctx.translate(5.0, 5.0);
        assert_eq!(ctx.device_coord(0.0, 0.0), IVec2::new(10, 10));
        ctx.restore();
        assert_eq!(ctx.device_coord(0.0, 0.0), IVec2::ZERO);

        // Unbalanced restore keeps the transform
        ctx.restore();
        assert_eq!(ctx.device_coord(1.0, 1.0), IVec2::new(2, 2));
    }

    #[test]
    fn line_width_follows_scale() {
        let mut ctx = TransformContext::new(Recorder::default());
        ctx.scale(20.0, 20.0);
        ctx.set_line_width(0.15);
        assert_eq!(ctx.line_width(), 3);

        ctx.move_to(0.0, 0.0);
        ctx.line_to(1.0, 0.0);
        ctx.stroke();
        ctx.line_to(1.0, 1.0);
        let canvas = ctx.into_canvas();
        assert_eq!(
            canvas.lines,
            vec![
                (IVec2::ZERO, IVec2::new(20, 0), 3),
                (IVec2::new(20, 0), IVec2::new(20, 20), 3),
            ]
        );
    }

    #[test]
    fn rectangle_and_arc() {
        let mut ctx = TransformContext::new(Recorder::default());
        ctx.scale(10.0, 10.0);
        ctx.rectangle(-1.0, -0.5, 2.0, 1.0);
        ctx.fill();
        ctx.set_line_width(0.2);
        ctx.arc(1.0, 1.0, 0.5);
        let canvas = ctx.into_canvas();
        assert_eq!(
            canvas.polygons[0],
            vec![
                IVec2::new(-10, -5),
                IVec2::new(10, -5),
                IVec2::new(10, 5),
                IVec2::new(-10, 5),
            ]
        );
        assert_eq!(canvas.ellipses[0], (IVec2::new(5, 5), IVec2::new(15, 15), 2));
    }

    #[test]
    fn color_truncates() {
        assert_eq!(Color::from_unit(0.52, 0.0, 0.7), Color { r: 132, g: 0, b: 178 });
    }
}
