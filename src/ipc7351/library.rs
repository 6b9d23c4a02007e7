//! Batch generation of the JEDEC MS-026 QFP family.
//!
//! Every variant is named with a lead span 2mm larger than its body and
//! generated at a single density level, ready to be written as one legacy
//! library file.

use tracing::info;

use crate::error::FootprintError;
use crate::ipc7351::density::DensityLevel;
use crate::ipc7351::geometry::Package;
use crate::ipc7351::naming::qfp_name;
use crate::ipc7351::packages::PackageParams;
use crate::ipc7351::packages::{PackageGenerator, QfpGenerator};

/// Lead span beyond the body for MS-026 outlines (mm).
const MS026_LEAD_ALLOWANCE: f64 = 2.0;

/// A square QFP body variant from JEDEC MS-026.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ms026Variant {
    /// Body size (mm).
    pub body: f64,
    /// Lead pitch (mm).
    pub pitch: f64,
    /// Total pin count.
    pub pins: u32,
}

impl Ms026Variant {
    const fn new(body: f64, pitch: f64, pins: u32) -> Self {
        Self { body, pitch, pins }
    }

    /// Returns the IPC name for this variant at a density level.
    #[must_use]
    pub fn ipc_name(&self, density: DensityLevel) -> String {
        qfp_name(self.pitch, self.body + MS026_LEAD_ALLOWANCE, self.pins, density)
    }
}

/// Square packages specified in JEDEC MS-026D.
pub const MS026_VARIANTS: &[Ms026Variant] = &[
    // Variants AKA and BKA
    Ms026Variant::new(4.0, 0.65, 20),
    Ms026Variant::new(4.0, 0.50, 24),
    Ms026Variant::new(4.0, 0.40, 32),
    Ms026Variant::new(5.0, 0.50, 32),
    Ms026Variant::new(5.0, 0.40, 40),
    Ms026Variant::new(7.0, 0.80, 32),
    Ms026Variant::new(7.0, 0.65, 40),
    Ms026Variant::new(7.0, 0.50, 48),
    Ms026Variant::new(7.0, 0.40, 64),
    Ms026Variant::new(10.0, 1.00, 36),
    Ms026Variant::new(10.0, 0.80, 44),
    Ms026Variant::new(10.0, 0.65, 52),
    Ms026Variant::new(10.0, 0.50, 64),
    Ms026Variant::new(10.0, 0.40, 80),
    Ms026Variant::new(12.0, 1.00, 44),
    Ms026Variant::new(12.0, 0.80, 52),
    Ms026Variant::new(12.0, 0.65, 64),
    Ms026Variant::new(12.0, 0.50, 80),
    Ms026Variant::new(12.0, 0.40, 100),
    Ms026Variant::new(14.0, 1.00, 52),
    Ms026Variant::new(14.0, 0.80, 64),
    Ms026Variant::new(14.0, 0.65, 80),
    Ms026Variant::new(14.0, 0.50, 100),
    Ms026Variant::new(14.0, 0.40, 120),
    Ms026Variant::new(20.0, 0.65, 112),
    Ms026Variant::new(20.0, 0.50, 144),
    Ms026Variant::new(20.0, 0.40, 176),
    Ms026Variant::new(24.0, 0.50, 176),
    Ms026Variant::new(24.0, 0.40, 216),
    Ms026Variant::new(28.0, 0.65, 160),
    Ms026Variant::new(28.0, 0.50, 208),
    Ms026Variant::new(28.0, 0.40, 256),
];

/// A named package ready to be written to a library.
#[derive(Debug, Clone, PartialEq)]
pub struct LibraryEntry {
    /// Module name (the IPC name).
    pub name: String,
    /// Generated land pattern.
    pub package: Package,
}

/// Generates every MS-026 variant at one density level.
///
/// # Errors
///
/// Returns the first generation error encountered.
pub fn build_ms026_library(density: DensityLevel) -> Result<Vec<LibraryEntry>, FootprintError> {
    let entries = MS026_VARIANTS
        .iter()
        .map(|variant| {
            let name = variant.ipc_name(density);
            let params = PackageParams::from_name(&name)?;
            let package = QfpGenerator.generate(&params)?;
            let description = format!(
                "{:.0}x{:.0}mm body, {}, density {density}",
                variant.body, variant.body, package.description
            );
            Ok(LibraryEntry {
                package: package.with_description(description),
                name,
            })
        })
        .collect::<Result<Vec<_>, FootprintError>>()?;

    info!(%density, count = entries.len(), "Built MS-026 QFP library");
    Ok(entries)
}
