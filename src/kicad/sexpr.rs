//! Writer for the s-expression `.kicad_mod` footprint format.
//!
//! # Format
//!
//! ```text
//! (module QFP50P900X900-48 (layer F.Cu) (tedit 5A1B2C3D)
//!   (at 0 0)
//!   (descr "QFP-48, 0.50mm pitch")
//!   (tags qfp, lqfp, tqfp)
//!   (fp_text reference ...)
//!   (fp_text value ...)
//!   (fp_line (start -3.650 3.650) (end -3.100 3.650) (layer F.SilkS) (width 0.15))
//!   (pad 1 smd rect (at -2.75 4.20 270) (size 1.30 0.25) (layers F.Cu F.Paste F.Mask))
//! )
//! ```
//!
//! Package-layer geometry is not written.

use std::io::{self, Write};

use chrono::{DateTime, TimeZone};

use crate::ipc7351::geometry::{Circle, Line, Package, Pad, Primitive};

/// Tags written for a module, chosen from the name prefix.
#[must_use]
pub fn tags_for(name: &str) -> &'static str {
    if name.starts_with("QFP") {
        "qfp, lqfp, tqfp"
    } else {
        "soic, sop, ssop, tssop"
    }
}

/// Writes a complete `.kicad_mod` module.
///
/// # Errors
///
/// Returns any error from the underlying writer.
pub fn write_module<W: Write, Tz: TimeZone>(
    out: &mut W,
    name: &str,
    package: &Package,
    edited: &DateTime<Tz>,
) -> io::Result<()> {
    writeln!(out, "(module {name} (layer F.Cu) (tedit {:X})", edited.timestamp())?;
    writeln!(out, "  (at 0 0)")?;
    writeln!(out, "  (descr \"{}\")", package.description.replace('"', "'"))?;
    writeln!(out, "  (tags {})", tags_for(name))?;
    writeln!(out, "  (fp_text reference {name} (at 0 -1) (layer F.SilkS)")?;
    writeln!(out, "    (effects (font (size 1.5 1.5) (thickness 0.15))))")?;
    writeln!(out, "  (fp_text value VAL** (at 0 1) (layer F.SilkS) hide")?;
    writeln!(out, "    (effects (font (size 1.5 1.5) (thickness 0.15))))")?;

    for primitive in package.printed() {
        write_primitive(out, primitive)?;
    }

    writeln!(out, ")")
}

fn write_primitive<W: Write>(out: &mut W, primitive: &Primitive) -> io::Result<()> {
    match primitive {
        Primitive::Line(line) => write_line(out, line),
        Primitive::Circle(circle) => write_circle(out, circle),
        Primitive::Rectangle(rect) => {
            for edge in rect.edges() {
                write_line(out, &edge)?;
            }
            Ok(())
        }
        Primitive::Pad(pad) => write_pad(out, pad),
    }
}

fn write_line<W: Write>(out: &mut W, line: &Line) -> io::Result<()> {
    let Some(layer) = line.layer.kicad_name() else {
        return Ok(());
    };
    writeln!(
        out,
        "  (fp_line (start {:.3} {:.3}) (end {:.3} {:.3}) (layer {layer}) (width {:.2}))",
        line.start.x, line.start.y, line.end.x, line.end.y, line.width
    )
}

fn write_circle<W: Write>(out: &mut W, circle: &Circle) -> io::Result<()> {
    let Some(layer) = circle.layer.kicad_name() else {
        return Ok(());
    };
    writeln!(
        out,
        "  (fp_circle (center {:.2} {:.2}) (end {:.2} {:.2}) (layer {layer}) (width {:.2}))",
        circle.center.x,
        circle.center.y,
        circle.center.x + circle.radius,
        circle.center.y,
        circle.width
    )
}

fn write_pad<W: Write>(out: &mut W, pad: &Pad) -> io::Result<()> {
    writeln!(
        out,
        "  (pad {} smd rect (at {:.2} {:.2} {:.0}) (size {:.2} {:.2}) (layers F.Cu F.Paste F.Mask))",
        pad.number, pad.position.x, pad.position.y, pad.rotation, pad.size_x, pad.size_y
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    use crate::ipc7351::geometry::{BoundingBox, Layer, Point, Rectangle};

    fn sample() -> Package {
        let mut pad: Primitive = Pad::new(3, Point::new(1.25, 0.0), 1.5, 0.4).into();
        pad.rotate(90.0);
        Package::new(
            "test part",
            vec![
                Rectangle::new(Point::new(-2.0, -2.0), Point::new(2.0, 2.0), 0.05, Layer::Package).into(),
                Line::new(Point::new(-1.0, 1.0), Point::new(1.0, 1.0), 0.15, Layer::Silkscreen).into(),
                Circle {
                    center: Point::new(0.5, -0.5),
                    radius: 0.25,
                    width: 0.1,
                    layer: Layer::Silkscreen,
                }
                .into(),
                pad,
            ],
            BoundingBox::centred(2.0, 2.0),
        )
    }

    fn render(name: &str) -> String {
        let edited = Utc.timestamp_opt(0x5A00_0000, 0).unwrap();
        let mut buf = Vec::new();
        write_module(&mut buf, name, &sample(), &edited).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn header_and_footer() {
        let text = render("QFP50P900X900-48");
        assert!(text.starts_with("(module QFP50P900X900-48 (layer F.Cu) (tedit 5A000000)\n"));
        assert!(text.contains("  (descr \"test part\")\n"));
        assert!(text.contains("  (tags qfp, lqfp, tqfp)\n"));
        assert!(text.ends_with(")\n"));
    }

    #[test]
    fn primitive_records() {
        let text = render("SOIC127P600-8");
        assert!(text.contains(
            "  (fp_line (start -1.000 1.000) (end 1.000 1.000) (layer F.SilkS) (width 0.15))\n"
        ));
        assert!(text.contains(
            "  (fp_circle (center 0.50 -0.50) (end 0.75 -0.50) (layer F.SilkS) (width 0.10))\n"
        ));
        assert!(text.contains(
            "  (pad 3 smd rect (at 0.00 -1.25 90) (size 1.50 0.40) (layers F.Cu F.Paste F.Mask))\n"
        ));
        assert!(text.contains("(tags soic, sop, ssop, tssop)"));
    }

    #[test]
    fn package_layer_suppressed() {
        let text = render("QFP50P900X900-48");
        assert_eq!(text.matches("fp_line").count(), 1);
        assert!(!text.contains("0.05)"));
    }
}
