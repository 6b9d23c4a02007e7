//! Package previews.
//!
//! Every primitive is drawn, package layer included, in the colours used by
//! the KiCad footprint editor: grey outlines, teal silkscreen and dark red
//! pads.

use std::path::Path;

use image::RgbaImage;
use tracing::debug;

use crate::ipc7351::geometry::{Circle, Layer, Line, Package, Pad, Primitive};
use crate::kicad::error::{KicadError, KicadResult, MAX_PREVIEW_PIXELS};
use crate::preview::raster::RasterCanvas;
use crate::preview::transform::{Canvas, TransformContext};

/// Blank border around the courtyard (mm).
pub const PREVIEW_MARGIN: f64 = 0.1;

const PACKAGE_RGB: (f64, f64, f64) = (0.7, 0.7, 0.7);
const SILKSCREEN_RGB: (f64, f64, f64) = (0.0, 0.52, 0.52);
const PAD_RGB: (f64, f64, f64) = (0.52, 0.0, 0.0);

/// Draws every primitive of a package in emission order.
pub fn draw_package<C: Canvas>(ctx: &mut TransformContext<C>, package: &Package) {
    for primitive in &package.primitives {
        draw_primitive(ctx, primitive);
    }
}

/// Draws one primitive in user space (mm).
pub fn draw_primitive<C: Canvas>(ctx: &mut TransformContext<C>, primitive: &Primitive) {
    match primitive {
        Primitive::Line(line) => draw_line(ctx, line),
        Primitive::Circle(circle) => draw_circle(ctx, circle),
        Primitive::Rectangle(rect) => {
            for edge in rect.edges() {
                draw_line(ctx, &edge);
            }
        }
        Primitive::Pad(pad) => draw_pad(ctx, pad),
    }
}

fn set_layer_color<C: Canvas>(ctx: &mut TransformContext<C>, layer: Layer) {
    let (r, g, b) = match layer {
        Layer::Package => PACKAGE_RGB,
        Layer::Silkscreen => SILKSCREEN_RGB,
        Layer::Copper => PAD_RGB,
    };
    ctx.set_source_rgb(r, g, b);
}

fn draw_line<C: Canvas>(ctx: &mut TransformContext<C>, line: &Line) {
    set_layer_color(ctx, line.layer);
    ctx.set_line_width(line.width);
    ctx.move_to(line.start.x, line.start.y);
    ctx.line_to(line.end.x, line.end.y);
    ctx.stroke();
}

fn draw_circle<C: Canvas>(ctx: &mut TransformContext<C>, circle: &Circle) {
    set_layer_color(ctx, circle.layer);
    ctx.set_line_width(circle.width);
    ctx.arc(circle.center.x, circle.center.y, circle.radius);
    ctx.stroke();
}

fn draw_pad<C: Canvas>(ctx: &mut TransformContext<C>, pad: &Pad) {
    ctx.save();
    set_layer_color(ctx, pad.layer);
    ctx.translate(pad.position.x, pad.position.y);
    ctx.rotate(pad.rotation.to_radians());
    ctx.rectangle(-pad.size_x / 2.0, -pad.size_y / 2.0, pad.size_x, pad.size_y);
    ctx.fill();
    ctx.restore();
}

/// Draws a package onto a fresh canvas, `scale` pixels per millimetre.
///
/// The canvas covers the courtyard plus [`PREVIEW_MARGIN`] on every side,
/// with the courtyard centre in the middle of the image.
///
/// # Errors
///
/// Returns [`KicadError::Empty`] if the image would have no pixels, or
/// [`KicadError::ImageTooLarge`] if it would exceed [`MAX_PREVIEW_PIXELS`].
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::cast_precision_loss)] // Bounded above
pub fn render_canvas(package: &Package, scale: f64) -> KicadResult<RasterCanvas> {
    let area = package.courtyard.inflated(PREVIEW_MARGIN);
    let width = area.width() * scale;
    let height = area.height() * scale;
    if !(width.is_finite() && height.is_finite() && width >= 1.0 && height >= 1.0) {
        return Err(KicadError::empty(format!(
            "{:.2}x{:.2}mm at {scale} px/mm is less than one pixel",
            area.width(),
            area.height()
        )));
    }
    if width * height > MAX_PREVIEW_PIXELS as f64 {
        return Err(KicadError::ImageTooLarge { width, height });
    }
    let (w, h) = (width.round() as u32, height.round() as u32);
    let centre = area.centre();

    let mut ctx = TransformContext::new(RasterCanvas::new(w, h)?);
    ctx.translate(f64::from(w) / 2.0, f64::from(h) / 2.0);
    ctx.scale(scale, scale);
    ctx.translate(-centre.x, -centre.y);
    draw_package(&mut ctx, package);

    debug!(width = w, height = h, primitives = package.primitives.len(), "Rendered preview");
    Ok(ctx.into_canvas())
}

/// Renders a package to an image, `scale` pixels per millimetre.
///
/// # Errors
///
/// See [`render_canvas`].
pub fn render_image(package: &Package, scale: f64) -> KicadResult<RgbaImage> {
    render_canvas(package, scale).map(|canvas| canvas.to_image())
}

/// Renders a package and saves it as PNG, returning the image size.
///
/// # Errors
///
/// Returns the errors of [`render_canvas`], or [`KicadError::Image`] if the
/// file cannot be written.
pub fn render_png(package: &Package, scale: f64, path: impl AsRef<Path>) -> KicadResult<(u32, u32)> {
    let canvas = render_canvas(package, scale)?;
    canvas.save_png(path)?;
    Ok((canvas.width(), canvas.height()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ipc7351::geometry::{BoundingBox, Point, Rectangle};

    fn single_pad() -> Package {
        Package::new(
            "pad",
            vec![
                Rectangle::new(Point::new(-1.0, -1.0), Point::new(1.0, 1.0), 0.05, Layer::Package).into(),
                Pad::new(1, Point::new(0.0, 0.0), 1.0, 0.5).into(),
            ],
            BoundingBox::centred(1.0, 1.0),
        )
    }

    #[test]
    fn image_size_includes_margin() {
        let image = render_image(&single_pad(), 10.0).unwrap();
        // 2mm courtyard + 2 * 0.1mm margin at 10 px/mm
        assert_eq!(image.dimensions(), (22, 22));
    }

    #[test]
    fn pad_is_filled_at_centre() {
        let image = render_image(&single_pad(), 10.0).unwrap();
        // Package origin lands at 1.1mm from the top-left corner
        assert_eq!(image.get_pixel(11, 11).0, [132, 0, 0, 255]);
        // Outside the pad but inside the courtyard is transparent
        assert_eq!(image.get_pixel(11, 5).0[3], 0);
    }

    #[test]
    fn rotated_pad() {
        let mut pad: Primitive = Pad::new(1, Point::new(0.0, 0.0), 1.6, 0.2).into();
        pad.rotate(90.0);
        let package = Package::new("rotated", vec![pad], BoundingBox::centred(1.0, 1.0));
        let image = render_image(&package, 10.0).unwrap();
        // Long axis now vertical
        assert_eq!(image.get_pixel(11, 4).0[3], 255);
        assert_eq!(image.get_pixel(4, 11).0[3], 0);
    }

    #[test]
    fn courtyard_outline_is_grey() {
        let image = render_image(&single_pad(), 10.0).unwrap();
        // One pixel line straddling x = 1
        let grey = [178, 178, 178, 255];
        assert!(image.get_pixel(0, 11).0 == grey || image.get_pixel(1, 11).0 == grey);
        assert_eq!(image.get_pixel(11, 11).0, [132, 0, 0, 255]);
    }

    #[test]
    fn off_centre_courtyard_is_centred() {
        let mut package = single_pad();
        package.courtyard = BoundingBox {
            min: Point::new(0.0, -1.0),
            max: Point::new(4.0, 1.0),
        };
        let image = render_image(&package, 10.0).unwrap();
        assert_eq!(image.dimensions(), (42, 22));
        // Origin sits 0.1mm in from the left edge, vertically centred
        assert_eq!(image.get_pixel(1, 11).0, [132, 0, 0, 255]);
        assert_eq!(image.get_pixel(40, 11).0[3], 0);
    }

    #[test]
    fn oversized_preview_rejected() {
        let err = render_image(&single_pad(), 1.0e6).unwrap_err();
        assert!(matches!(err, KicadError::ImageTooLarge { .. }), "{err}");
    }

    #[test]
    fn degenerate_scale_rejected() {
        let err = render_image(&single_pad(), 0.0).unwrap_err();
        assert!(matches!(err, KicadError::Empty { .. }));
        assert!(render_image(&single_pad(), f64::NAN).is_err());
    }

    #[test]
    fn png_written() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pad.png");
        let size = render_png(&single_pad(), 8.0, &path).unwrap();
        // 2.2mm * 8 = 17.6 rounds up
        assert_eq!(size, (18, 18));
        assert!(path.exists());
    }
}
