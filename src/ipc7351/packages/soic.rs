//! Land patterns for two-sided gull-wing packages (SOIC, SO, SOP, SSOP, TSSOP).
//!
//! This package type is defined in a lot of standards, for example:
//!
//! - SOIC: EIAJ - 5.3mm (208mil) body, 1.27mm pitch
//! - SOIC: JEDEC MS-012 - 3.9mm (150mil) body, 1.27mm pitch
//! - SOIC: JEDEC MS-013 - 7.5mm (300mil) body, 1.27mm pitch
//! - SSOP: JEDEC MO-150 - 5.3mm body, 0.65mm pitch
//! - TSSOP: JEDEC MO-153 - 4.4mm body, 0.65mm pitch
//!
//! Pads are drawn along the bottom edge and rotated 180 degrees for the top row.

use tracing::debug;

use crate::error::FootprintError;
use crate::ipc7351::geometry::{BoundingBox, Layer, Line, Package, Pad, Point, Primitive, Rectangle};
use crate::ipc7351::packages::{
    expect_family, PackageFamily, PackageGenerator, PackageParams, PACKAGE_LINE_WIDTH,
};

/// Half the body length along the pin rows (mm).
///
/// The IPC name does not carry the body length, so this is estimated from
/// the row length plus 0.5mm at either end. About right for small chips,
/// less so for long ones.
#[must_use]
pub fn soic_body_half_width(pins_per_side: u32, pitch: f64) -> f64 {
    f64::from(pins_per_side.saturating_sub(1)).mul_add(pitch, 1.0) / 2.0
}

/// Generator for SOIC/SOP packages.
#[derive(Debug, Default, Clone, Copy)]
pub struct SoicGenerator;

impl SoicGenerator {
    /// Creates a new SOIC generator.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl PackageGenerator for SoicGenerator {
    fn family(&self) -> PackageFamily {
        PackageFamily::Soic
    }

    fn generate(&self, params: &PackageParams) -> Result<Package, FootprintError> {
        expect_family(params, PackageFamily::Soic)?;
        let pins_per_side = params.pins_per_side()?;

        let span = params.span_x;
        let land = params.land(span);
        let first_pad_x = -f64::from(pins_per_side - 1) * params.pitch / 2.0;
        let body_w = soic_body_half_width(pins_per_side, params.pitch);
        let body_h = span / 2.0 - params.terminal_length;
        let excess = params.tolerances.courtyard_excess;
        // The body length is estimated, so the end pads can reach past it
        let courtyard_w = body_w.max(-first_pad_x + land.width / 2.0) + excess;
        let courtyard_h = land.toe + excess;
        let outline_w = body_w + params.silkscreen_width;
        let outline_h = body_h + params.silkscreen_width;

        let mut data: Vec<Primitive> = vec![
            Rectangle::new(
                Point::new(-courtyard_w, -courtyard_h),
                Point::new(courtyard_w, courtyard_h),
                PACKAGE_LINE_WIDTH,
                Layer::Package,
            )
            .into(),
            Rectangle::new(
                Point::new(-body_w, -body_h),
                Point::new(body_w, body_h),
                PACKAGE_LINE_WIDTH,
                Layer::Package,
            )
            .into(),
            Rectangle::new(
                Point::new(-outline_w, -outline_h),
                Point::new(outline_w, outline_h),
                params.silkscreen_width,
                Layer::Silkscreen,
            )
            .into(),
            // Pin 1 tick, continuing the left outline edge down beside the first pad
            Line::new(
                Point::new(-outline_w, outline_h),
                Point::new(-outline_w, land.center),
                params.silkscreen_width,
                Layer::Silkscreen,
            )
            .into(),
        ];

        let mut number = 1;
        for side in 0..2 {
            let th = f64::from(side * 180);
            let mut x = first_pad_x;
            for _ in 0..pins_per_side {
                let pad = Pad::new(number, Point::new(x, land.center), land.width, land.length);
                data.push(Primitive::from(pad).rotated(th));
                number += 1;
                x += params.pitch;
            }
        }

        debug!(
            pins = params.pin_count,
            pad_length = land.length,
            pad_width = land.width,
            courtyard_w,
            courtyard_h,
            "Generated SOIC land pattern"
        );

        Ok(Package::new(
            format!(
                "SOIC-{}, {:.2}mm pitch, {:.2}mm lead span",
                params.pin_count, params.pitch, span
            ),
            data,
            BoundingBox::centred(courtyard_w, courtyard_h),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn generate(name: &str) -> Package {
        let params = PackageParams::from_name(name).unwrap();
        SoicGenerator::new().generate(&params).unwrap()
    }

    #[test]
    fn soic14_pads() {
        let package = generate("SOIC127P600-14");
        let pads: Vec<&Pad> = package.pads().collect();
        assert_eq!(pads.len(), 14);
        assert_eq!(pads.first().map(|p| p.number), Some(1));
        assert_eq!(pads.last().map(|p| p.number), Some(14));

        // Pin 1 bottom-left, pin 7 bottom-right, pin 8 top-right
        assert!((pads[0].position.x + 3.81).abs() < 1e-9);
        assert!((pads[0].position.y - 2.5).abs() < 1e-9);
        assert!((pads[6].position.x - 3.81).abs() < 1e-9);
        assert!((pads[7].position.x - 3.81).abs() < 1e-9);
        assert!((pads[7].position.y + 2.5).abs() < 1e-9);
        assert!((pads[7].rotation - 180.0).abs() < f64::EPSILON);
    }

    #[test]
    fn soic14_pad_size() {
        let package = generate("SOIC127P600-14");
        let pin1 = package.pads().next().unwrap();
        // 0.51 lead + 0.03 side, 1.0 foot + 0.35 toe + 0.35 heel
        assert!((pin1.size_x - 0.54).abs() < 1e-9);
        assert!((pin1.size_y - 1.70).abs() < 1e-9);
    }

    #[test]
    fn courtyard_encloses_pads() {
        for name in ["SOIC127P600-8L", "SOIC127P600-14", "SOP65P640-20M"] {
            let package = generate(name);
            let c = package.courtyard;
            // Rows are only ever rotated by 0 or 180 degrees, so sizes stay axis-aligned
            for pad in package.pads() {
                let (half_x, half_y) = (pad.size_x / 2.0, pad.size_y / 2.0);
                assert!(pad.position.x - half_x > c.min.x, "{name}");
                assert!(pad.position.x + half_x < c.max.x, "{name}");
                assert!(pad.position.y - half_y > c.min.y, "{name}");
                assert!(pad.position.y + half_y < c.max.y, "{name}");
            }
        }
    }

    #[test]
    fn courtyard_is_rectangular() {
        let package = generate("SOIC127P600-8");
        let c = package.courtyard;
        // 4 pins per side: body half width (3 * 1.27 + 1) / 2 = 2.405
        assert!((c.max.x - 2.655).abs() < 1e-9);
        assert!((c.max.y - 3.6).abs() < 1e-9);
    }

    #[test]
    fn courtyard_width_follows_wide_end_pads() {
        use crate::ipc7351::density::DensityLevel;
        use crate::ipc7351::packages::{generate_from_name, ParamOverrides};

        let overrides = ParamOverrides {
            lead_width: Some(1.2),
            ..ParamOverrides::default()
        };
        let package = generate_from_name("SOIC127P600-8", &overrides, DensityLevel::Nominal).unwrap();
        let body_w = soic_body_half_width(4, 1.27);
        let outer_edge = package
            .pads()
            .map(|p| p.position.x.abs() + p.size_x / 2.0)
            .fold(0.0, f64::max);
        assert!(outer_edge > body_w);

        // Same excess over the pad edge as narrow pads get over the body
        let narrow = generate_from_name("SOIC127P600-8", &ParamOverrides::default(), DensityLevel::Nominal).unwrap();
        let excess = narrow.courtyard.max.x - body_w;
        assert!(excess > 0.0);
        assert!((package.courtyard.max.x - (outer_edge + excess)).abs() < 1e-9);
        assert!((package.courtyard.min.x + package.courtyard.max.x).abs() < 1e-9);
    }

    #[test]
    fn orientation_tick_beside_pin_one() {
        let package = generate("SOIC127P600-14");
        let tick = package
            .primitives
            .iter()
            .find_map(|p| match p {
                Primitive::Line(line) if line.layer == Layer::Silkscreen => Some(*line),
                _ => None,
            })
            .unwrap();
        let pin1 = package.pads().next().unwrap();
        assert!((tick.start.x - tick.end.x).abs() < f64::EPSILON);
        assert!(tick.start.x < pin1.position.x - pin1.size_x / 2.0);
        assert!(tick.end.y > 0.0);
    }

    #[test]
    fn body_width_heuristic() {
        assert!((soic_body_half_width(4, 1.27) - 2.405).abs() < 1e-9);
        assert!((soic_body_half_width(1, 1.27) - 0.5).abs() < 1e-9);
    }

    #[test]
    fn reject_odd_pin_count() {
        let params = PackageParams::from_name("SOIC127P600-9").unwrap();
        let err = SoicGenerator.generate(&params).unwrap_err();
        assert!(matches!(err, FootprintError::UnsupportedShape { .. }));
    }

    #[test]
    fn description_records_pins_and_pitch() {
        let package = generate("SOIC127P600-14");
        assert_eq!(package.description, "SOIC-14, 1.27mm pitch, 6.00mm lead span");
    }
}
