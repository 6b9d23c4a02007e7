//! IPC-7351 naming convention parser and generator.
//!
//! # Name Format
//!
//! - QFP: `QFP{PITCH}P{L1}X{L2}[X{HEIGHT}]-{PINS}[{DENSITY}]`
//! - SOIC/SOP: `{SOIC|SOP}{PITCH}P{L}[X{HEIGHT}]-{PINS}[{DENSITY}]`
//!
//! All dimensions are integers in 0.01mm units. `L1`, `L2` and `L` are
//! toe-to-toe lead spans, not body sizes.
//!
//! Examples:
//! - `QFP50P900X900-48` - 7x7mm LQFP-48, 0.5mm pitch, nominal density
//! - `SOIC127P600-14L` - SOIC-14, 1.27mm pitch, least density

use std::sync::LazyLock;

use regex::Regex;

use crate::error::FootprintError;
use crate::ipc7351::density::DensityLevel;
use crate::ipc7351::packages::PackageFamily;

static QFP_NAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^QFP(\d+)P(\d+)X(\d+)(?:X(\d+))?-(\d+)([A-Za-z])?$")
        .expect("QFP name pattern is valid")
});

static SOIC_NAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(SOIC|SOP)(\d+)P(\d+)(?:X(\d+))?-(\d+)([A-Za-z])?$")
        .expect("SOIC name pattern is valid")
});

/// Dimensions recovered from an IPC name.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedName {
    /// Package family selected by the prefix.
    pub family: PackageFamily,

    /// Lead pitch (mm).
    pub pitch: f64,

    /// Toe-to-toe lead span in X (mm).
    pub span_x: f64,

    /// Toe-to-toe lead span in Y (mm). Equal to `span_x` for SOIC.
    pub span_y: f64,

    /// Package height (mm), informational only.
    pub height: Option<f64>,

    /// Total pin count.
    pub pin_count: u32,

    /// Density suffix, when present.
    pub density: Option<DensityLevel>,
}

/// Parses an IPC package name into raw dimensions.
///
/// # Errors
///
/// Returns [`FootprintError::Parse`] when the name matches no supported
/// pattern, and [`FootprintError::Configuration`] when the density suffix is
/// not one of L, N or M.
pub fn parse_name(name: &str) -> Result<ParsedName, FootprintError> {
    if let Some(caps) = QFP_NAME.captures(name) {
        return Ok(ParsedName {
            family: PackageFamily::Qfp,
            pitch: hundredths(&caps[1], name)?,
            span_x: hundredths(&caps[2], name)?,
            span_y: hundredths(&caps[3], name)?,
            height: caps.get(4).map(|m| hundredths(m.as_str(), name)).transpose()?,
            pin_count: integer(&caps[5], name)?,
            density: caps.get(6).map(|m| density_suffix(m.as_str())).transpose()?,
        });
    }

    if let Some(caps) = SOIC_NAME.captures(name) {
        let span = hundredths(&caps[3], name)?;
        return Ok(ParsedName {
            family: PackageFamily::Soic,
            pitch: hundredths(&caps[2], name)?,
            span_x: span,
            span_y: span,
            height: caps.get(4).map(|m| hundredths(m.as_str(), name)).transpose()?,
            pin_count: integer(&caps[5], name)?,
            density: caps.get(6).map(|m| density_suffix(m.as_str())).transpose()?,
        });
    }

    Err(FootprintError::parse(name))
}

/// Density suffixes in names are single upper-case letters.
fn density_suffix(s: &str) -> Result<DensityLevel, FootprintError> {
    match s {
        "L" | "N" | "M" => DensityLevel::parse(s),
        _ => Err(FootprintError::configuration(format!(
            "invalid density suffix '{s}' (need L, N or M)"
        ))),
    }
}

fn integer(digits: &str, name: &str) -> Result<u32, FootprintError> {
    digits.parse().map_err(|_| FootprintError::parse(name))
}

fn hundredths(digits: &str, name: &str) -> Result<f64, FootprintError> {
    integer(digits, name).map(|units| f64::from(units) / 100.0)
}

/// Generates an IPC name for a square QFP.
///
/// Format: `QFP{PITCH}P{SPAN}X{SPAN}-{PINS}{DENSITY}`
///
/// # Examples
///
/// ```
/// use ipc_footprinter::ipc7351::naming::qfp_name;
/// use ipc_footprinter::ipc7351::density::DensityLevel;
///
/// let name = qfp_name(0.5, 9.0, 48, DensityLevel::Least);
/// assert_eq!(name, "QFP50P900X900-48L");
/// ```
#[must_use]
pub fn qfp_name(pitch: f64, span: f64, pin_count: u32, density: DensityLevel) -> String {
    let pitch_units = mm_to_hundredths(pitch);
    let span_units = mm_to_hundredths(span);

    format!(
        "QFP{pitch_units}P{span_units}X{span_units}-{pin_count}{density}",
        density = density.suffix()
    )
}

/// Converts millimetres to IPC naming units (0.01mm = 1 unit).
///
/// Values are rounded to nearest integer.
fn mm_to_hundredths(mm: f64) -> u32 {
    // All PCB component dimensions are positive and small, so cast is safe
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let units = (mm * 100.0).round() as u32;
    units
}
