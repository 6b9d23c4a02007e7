//! Writer for the legacy `PCBNEW-LibModule-V1` module library format.
//!
//! # File Layout
//!
//! ```text
//! PCBNEW-LibModule-V1  Mon Jan  1 12:00:00 2018
//! $INDEX
//! QFP50P900X900-48N           // one line per module
//! $EndINDEX
//! $MODULE QFP50P900X900-48N
//! Po 0 0 0 15 5A4A22C0 00000000 ~~
//! ...                         // header, texts, DS/DC records, $PAD blocks
//! $EndMODULE QFP50P900X900-48N
//! $EndLIBRARY
//! ```
//!
//! All dimensions are integer units of 0.00256mm ("decimils"). Only the
//! silkscreen layer (21) is used for drawings.

use std::io::{self, Write};

use chrono::{DateTime, TimeZone};

use crate::ipc7351::geometry::{Circle, Line, Package, Pad, Primitive};
use crate::ipc7351::library::LibraryEntry;

/// Millimetres per legacy unit.
pub const MM_PER_DECIMIL: f64 = 0.00256;

/// Legacy layer number for front silkscreen.
const SILKSCREEN_LAYER: u32 = 21;

/// Converts millimetres to legacy units, rounding half away from zero.
#[allow(clippy::cast_possible_truncation)] // Footprint dimensions fit in i64
#[must_use]
pub fn to_decimil(mm: f64) -> i64 {
    (mm / MM_PER_DECIMIL).round() as i64
}

/// Converts legacy units to millimetres.
#[allow(clippy::cast_precision_loss)] // Footprint dimensions are far below 2^52
#[must_use]
pub fn from_decimil(units: i64) -> f64 {
    units as f64 * MM_PER_DECIMIL
}

/// Writes the library header and module index.
///
/// # Errors
///
/// Returns any error from the underlying writer.
pub fn write_library_header<'a, W: Write, Tz: TimeZone>(
    out: &mut W,
    names: impl IntoIterator<Item = &'a str>,
    created: &DateTime<Tz>,
) -> io::Result<()>
where
    Tz::Offset: std::fmt::Display,
{
    writeln!(out, "PCBNEW-LibModule-V1  {}", created.format("%a %b %e %H:%M:%S %Y"))?;
    writeln!(out, "$INDEX")?;
    for name in names {
        writeln!(out, "{name}")?;
    }
    writeln!(out, "$EndINDEX")
}

/// Writes the library terminator.
///
/// # Errors
///
/// Returns any error from the underlying writer.
pub fn write_library_footer<W: Write>(out: &mut W) -> io::Result<()> {
    writeln!(out, "$EndLIBRARY")
}

/// Writes one `$MODULE` block without library header or footer.
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
    let m = to_decimil;

    writeln!(out, "$MODULE {name}")?;
    writeln!(out, "Po 0 0 0 15 {:X} 00000000 ~~", edited.timestamp())?;
    writeln!(out, "Li {name}")?;
    writeln!(out, "Cd {}", package.description)?;
    writeln!(out, "Sc 0")?;
    writeln!(out, "AR ")?;
    writeln!(out, "Op 0 0 0")?;
    writeln!(
        out,
        "T0 {} {} {} {} {} {} N V {SILKSCREEN_LAYER} N \"{name}\"",
        m(0.0),
        m(-1.0),
        m(1.5),
        m(1.5),
        m(0.0),
        m(0.15)
    )?;
    writeln!(
        out,
        "T1 {} {} {} {} {} {} N I {SILKSCREEN_LAYER} N \"VAL**\"",
        m(0.0),
        m(1.0),
        m(1.5),
        m(1.5),
        m(0.0),
        m(0.15)
    )?;

    for primitive in package.printed() {
        match primitive {
            Primitive::Line(line) => write_line(out, line)?,
            Primitive::Circle(circle) => write_circle(out, circle)?,
            Primitive::Rectangle(rect) => {
                for edge in rect.edges() {
                    write_line(out, &edge)?;
                }
            }
            Primitive::Pad(pad) => write_pad(out, pad)?,
        }
    }

    writeln!(out, "$EndMODULE {name}")
}

/// Writes a library file holding a single module.
///
/// # Errors
///
/// Returns any error from the underlying writer.
pub fn write_standalone<W: Write, Tz: TimeZone>(
    out: &mut W,
    name: &str,
    package: &Package,
    created: &DateTime<Tz>,
) -> io::Result<()>
where
    Tz::Offset: std::fmt::Display,
{
    write_library_header(out, [name], created)?;
    write_module(out, name, package, created)?;
    write_library_footer(out)
}

/// Writes a library file holding every entry, with a shared header and index.
///
/// # Errors
///
/// Returns any error from the underlying writer.
pub fn write_library<W: Write, Tz: TimeZone>(
    out: &mut W,
    entries: &[LibraryEntry],
    created: &DateTime<Tz>,
) -> io::Result<()>
where
    Tz::Offset: std::fmt::Display,
{
    write_library_header(out, entries.iter().map(|e| e.name.as_str()), created)?;
    for entry in entries {
        write_module(out, &entry.name, &entry.package, created)?;
    }
    write_library_footer(out)
}

fn write_line<W: Write>(out: &mut W, line: &Line) -> io::Result<()> {
    writeln!(
        out,
        "DS {} {} {} {} {} {SILKSCREEN_LAYER}",
        to_decimil(line.start.x),
        to_decimil(line.start.y),
        to_decimil(line.end.x),
        to_decimil(line.end.y),
        to_decimil(line.width)
    )
}

fn write_circle<W: Write>(out: &mut W, circle: &Circle) -> io::Result<()> {
    writeln!(
        out,
        "DC {} {} {} {} {} {SILKSCREEN_LAYER}",
        to_decimil(circle.center.x),
        to_decimil(circle.center.y),
        to_decimil(circle.center.x + circle.radius),
        to_decimil(circle.center.y),
        to_decimil(circle.width)
    )
}

fn write_pad<W: Write>(out: &mut W, pad: &Pad) -> io::Result<()> {
    // Rotation is stored in tenths of a degree
    let rotation = (pad.rotation * 10.0).round();
    writeln!(out, "$PAD")?;
    writeln!(
        out,
        "Sh \"{}\" R {} {} 0 0 {rotation:.0}",
        pad.number,
        to_decimil(pad.size_x),
        to_decimil(pad.size_y)
    )?;
    writeln!(out, "Dr 0 0 0")?;
    writeln!(out, "At SMD N 00888000")?;
    writeln!(out, "Ne 0 \"\"")?;
    writeln!(out, "Po {} {}", to_decimil(pad.position.x), to_decimil(pad.position.y))?;
    writeln!(out, "$EndPAD")
}
