//! Land patterns for four-sided gull-wing packages (QFP, LQFP, TQFP).
//!
//! This package type is standardised in JEDEC MS-026. Only square bodies
//! are supported.
//!
//! Every side is drawn once in a canonical orientation and rotated into
//! place. Pin 1 sits at the lower-left corner (negative X, positive Y) and
//! numbering runs counter-clockwise.

use tracing::debug;

use crate::error::FootprintError;
use crate::ipc7351::geometry::{BoundingBox, Layer, Line, Package, Pad, Point, Primitive, Rectangle};
use crate::ipc7351::packages::{
    expect_family, PackageFamily, PackageGenerator, PackageParams, PACKAGE_LINE_WIDTH,
};

/// Corner chamfer drawn on the package body outline (mm).
const BODY_CHAMFER: f64 = 0.5;

/// Length of the diagonal pin 1 mark on the silkscreen (mm).
const ORIENTATION_MARK_LENGTH: f64 = 1.0;

/// Rotation that carries the canonical side onto side `side`.
///
/// Side 0 is the bottom row holding pin 1.
fn side_rotation(side: u32) -> f64 {
    f64::from((270 + side * 90) % 360)
}

/// Generator for QFP packages.
#[derive(Debug, Default, Clone, Copy)]
pub struct QfpGenerator;

impl QfpGenerator {
    /// Creates a new QFP generator.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl PackageGenerator for QfpGenerator {
    fn family(&self) -> PackageFamily {
        PackageFamily::Qfp
    }

    fn generate(&self, params: &PackageParams) -> Result<Package, FootprintError> {
        expect_family(params, PackageFamily::Qfp)?;
        if (params.span_x - params.span_y).abs() > f64::EPSILON {
            return Err(FootprintError::unsupported_shape(format!(
                "non-square QFP body ({:.2}mm x {:.2}mm)",
                params.span_x, params.span_y
            )));
        }
        let pins_per_side = params.pins_per_side()?;

        let span = params.span_x;
        let land = params.land(span);
        let first_pad_offset = f64::from(pins_per_side - 1) * params.pitch / 2.0;
        let courtyard_size = land.toe + params.tolerances.courtyard_excess;
        let body_size = span / 2.0 - params.terminal_length;
        let outline_size = body_size + params.silkscreen_width;

        let mut data: Vec<Primitive> = Vec::new();

        data.push(
            Rectangle::new(
                Point::new(-courtyard_size, -courtyard_size),
                Point::new(courtyard_size, courtyard_size),
                PACKAGE_LINE_WIDTH,
                Layer::Package,
            )
            .into(),
        );

        // Package body and lead blocks, one side at a time
        let lead_block_half_width = f64::from(pins_per_side) * params.pitch / 2.0;
        let lead_toe = span / 2.0;
        for side in 0..4 {
            let th = side_rotation(side);
            let body_edge = Line::new(
                Point::new(-body_size + BODY_CHAMFER, body_size),
                Point::new(body_size - BODY_CHAMFER, body_size),
                PACKAGE_LINE_WIDTH,
                Layer::Package,
            );
            let chamfer = Line::new(
                Point::new(body_size - BODY_CHAMFER, body_size),
                Point::new(body_size, body_size - BODY_CHAMFER),
                PACKAGE_LINE_WIDTH,
                Layer::Package,
            );
            let foot = Rectangle::new(
                Point::new(-lead_block_half_width, lead_toe),
                Point::new(lead_block_half_width, lead_toe - params.foot_length),
                PACKAGE_LINE_WIDTH,
                Layer::Package,
            );
            let shoulder = Rectangle::new(
                Point::new(-lead_block_half_width, lead_toe - params.foot_length),
                Point::new(lead_block_half_width, body_size),
                PACKAGE_LINE_WIDTH,
                Layer::Package,
            );
            let side_geometry: [Primitive; 4] =
                [body_edge.into(), chamfer.into(), foot.into(), shoulder.into()];
            data.extend(side_geometry.into_iter().map(|p| p.rotated(th)));
        }

        // Silkscreen corner brackets, stopping short of the outermost pads
        let bracket_length =
            outline_size - first_pad_offset - land.width / 2.0 - params.silkscreen_width * 1.5;
        if bracket_length > 0.0 {
            for side in 0..4 {
                let th = side_rotation(side);
                let corner = Point::new(-outline_size, outline_size);
                let along = Line::new(
                    corner,
                    Point::new(-outline_size + bracket_length, outline_size),
                    params.silkscreen_width,
                    Layer::Silkscreen,
                );
                let across = Line::new(
                    corner,
                    Point::new(-outline_size, outline_size - bracket_length),
                    params.silkscreen_width,
                    Layer::Silkscreen,
                );
                data.push(Primitive::from(along).rotated(th));
                data.push(Primitive::from(across).rotated(th));
            }
        } else {
            debug!(bracket_length, "Pads reach the body corners, omitting silkscreen brackets");
        }

        data.push(
            Line::new(
                Point::new(-outline_size, outline_size),
                Point::new(
                    -outline_size - ORIENTATION_MARK_LENGTH,
                    outline_size + ORIENTATION_MARK_LENGTH,
                ),
                params.silkscreen_width,
                Layer::Silkscreen,
            )
            .into(),
        );

        // Pads are laid out on the right-hand side from +Y towards -Y, then rotated into place
        let mut number = 1;
        for side in 0..4 {
            let th = side_rotation(side);
            let mut y = first_pad_offset;
            for _ in 0..pins_per_side {
                let pad = Pad::new(number, Point::new(land.center, y), land.length, land.width);
                data.push(Primitive::from(pad).rotated(th));
                number += 1;
                y -= params.pitch;
            }
        }

        debug!(
            pins = params.pin_count,
            pad_length = land.length,
            pad_width = land.width,
            courtyard = courtyard_size,
            "Generated QFP land pattern"
        );

        Ok(Package::new(
            format!("QFP-{}, {:.2}mm pitch", params.pin_count, params.pitch),
            data,
            BoundingBox::centred(courtyard_size, courtyard_size),
        ))
    }
}
