//! IPC-7351 density levels and the gull-wing tolerance table.
//!
//! The standard defines three density levels for land patterns:
//!
//! - **Most (M)**: Maximum solder fillet, largest pads for best reliability
//! - **Nominal (N)**: Standard density, recommended for most applications
//! - **Least (L)**: Minimum solder fillet, smallest pads for high-density boards
//!
//! A fourth level, `0`, adds no protrusion at all. It is only useful for
//! debugging: the pads shrink to the raw lead footprint.

use std::fmt;

use crate::error::FootprintError;

/// Pitch above which the wider side fillet goals apply (mm).
const WIDE_PITCH_THRESHOLD: f64 = 0.625;

/// Density level per IPC-7351.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DensityLevel {
    /// Zero protrusion (debugging aid).
    Zero,

    /// Least (L) - Minimum land protrusion for high-density boards.
    Least,

    /// Nominal (N) - Standard density, recommended for most applications.
    #[default]
    Nominal,

    /// Most (M) - Maximum land protrusion for best solder fillet.
    Most,
}

impl DensityLevel {
    /// All density levels used when building libraries.
    pub const STANDARD: [Self; 3] = [Self::Least, Self::Nominal, Self::Most];

    /// Parses a density level from a string.
    ///
    /// Accepts: "0", "M", "Most", "N", "Nominal", "L", "Least" (case-insensitive).
    #[must_use]
    pub fn from_str_loose(s: &str) -> Option<Self> {
        match s.to_uppercase().as_str() {
            "0" => Some(Self::Zero),
            "M" | "MOST" => Some(Self::Most),
            "N" | "NOMINAL" => Some(Self::Nominal),
            "L" | "LEAST" => Some(Self::Least),
            _ => None,
        }
    }

    /// Parses a density level, failing with a configuration error.
    ///
    /// # Errors
    ///
    /// Returns [`FootprintError::Configuration`] for anything other than L, N, M or 0.
    pub fn parse(s: &str) -> Result<Self, FootprintError> {
        Self::from_str_loose(s).ok_or_else(|| {
            FootprintError::configuration(format!(
                "invalid density level '{s}' (need L, N, M or 0)"
            ))
        })
    }

    /// Returns the suffix character for IPC names.
    #[must_use]
    pub const fn suffix(&self) -> char {
        match self {
            Self::Zero => '0',
            Self::Least => 'L',
            Self::Nominal => 'N',
            Self::Most => 'M',
        }
    }
}

impl fmt::Display for DensityLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.suffix())
    }
}

/// Pad offsets derived from the density level (all values in millimetres).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tolerances {
    /// Toe protrusion (JT) - pad extension beyond the outer edge of the lead.
    pub toe: f64,

    /// Heel protrusion (JH) - pad extension beyond the inner edge of the lead.
    pub heel: f64,

    /// Side adjustment (JS) - added to the lead width to get the pad width.
    pub side: f64,

    /// Courtyard excess beyond the pad toe.
    pub courtyard_excess: f64,
}

impl Tolerances {
    /// Creates a new set of tolerances.
    #[must_use]
    pub const fn new(toe: f64, heel: f64, side: f64, courtyard_excess: f64) -> Self {
        Self {
            toe,
            heel,
            side,
            courtyard_excess,
        }
    }

    /// Returns a copy with the toe protrusion replaced.
    #[must_use]
    pub const fn with_toe(self, toe: f64) -> Self {
        Self { toe, ..self }
    }
}

/// Looks up the gull-wing tolerances for a density level and pitch.
///
/// Shared by every package generator. Fine-pitch parts (0.625mm and below)
/// get a narrower side fillet.
#[must_use]
pub fn resolve_tolerances(density: DensityLevel, pitch: f64) -> Tolerances {
    let wide = pitch > WIDE_PITCH_THRESHOLD;
    match density {
        DensityLevel::Zero => Tolerances::new(0.0, 0.0, 0.0, 0.0),
        DensityLevel::Least => Tolerances::new(0.15, 0.25, if wide { 0.01 } else { -0.04 }, 0.10),
        DensityLevel::Nominal => Tolerances::new(0.35, 0.35, if wide { 0.03 } else { -0.02 }, 0.25),
        DensityLevel::Most => Tolerances::new(0.55, 0.45, if wide { 0.05 } else { 0.01 }, 0.50),
    }
}

/// Default lead width from the pitch, per the JEDEC outlines.
///
/// `ceiling` is the width used above 0.90mm pitch, which differs between
/// package families (0.50mm for MS-026 QFP, 0.51mm for MS-012 SOIC).
#[must_use]
pub fn default_lead_width(pitch: f64, ceiling: f64) -> f64 {
    if pitch <= 0.45 {
        0.23
    } else if pitch <= 0.55 {
        0.27
    } else if pitch <= 0.70 {
        0.38
    } else if pitch <= 0.90 {
        0.45
    } else {
        ceiling
    }
}
