//! IPC-7351 package generators.
//!
//! Each package family has its own module. Both share the parameter
//! resolution below: a [`ParsedName`] plus any [`ParamOverrides`] become an
//! immutable [`PackageParams`], which a [`PackageGenerator`] turns into a
//! [`Package`].

pub mod qfp;
pub mod soic;

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::FootprintError;
use crate::ipc7351::density::{default_lead_width, resolve_tolerances, DensityLevel, Tolerances};
use crate::ipc7351::geometry::Package;
use crate::ipc7351::naming::{parse_name, ParsedName};

pub use qfp::QfpGenerator;
pub use soic::SoicGenerator;

/// Default silkscreen line width and clearance (mm).
pub const DEFAULT_SILKSCREEN_WIDTH: f64 = 0.15;

/// Line width for geometry on the package layer (mm).
pub const PACKAGE_LINE_WIDTH: f64 = 0.05;

/// Supported package families.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PackageFamily {
    /// Four-sided gull-wing packages (QFP, LQFP, TQFP), JEDEC MS-026.
    Qfp,
    /// Two-sided gull-wing packages (SOIC, SOP, SSOP, TSSOP).
    Soic,
}

impl PackageFamily {
    /// Number of sides carrying leads.
    #[must_use]
    pub const fn sides(&self) -> u32 {
        match self {
            Self::Qfp => 4,
            Self::Soic => 2,
        }
    }

    /// Default toe-to-package length, "L1" in the JEDEC drawings (mm).
    #[must_use]
    pub const fn default_terminal_length(&self) -> f64 {
        match self {
            Self::Qfp => 1.0,
            Self::Soic => 1.04,
        }
    }

    /// Default toe-to-heel length, "L" in the JEDEC drawings (mm).
    #[must_use]
    pub const fn default_foot_length(&self) -> f64 {
        match self {
            Self::Qfp => 0.6,
            Self::Soic => 1.0,
        }
    }

    /// Lead width used above 0.90mm pitch (mm).
    #[must_use]
    pub const fn lead_width_ceiling(&self) -> f64 {
        match self {
            // JEDEC MS-026
            Self::Qfp => 0.50,
            // 1.27 pitch, from MS-012F
            Self::Soic => 0.51,
        }
    }
}

impl fmt::Display for PackageFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Qfp => write!(f, "QFP"),
            Self::Soic => write!(f, "SOIC"),
        }
    }
}

/// User overrides applied on top of the values implied by the IPC name.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ParamOverrides {
    /// Density level, replacing the name suffix.
    pub density: Option<DensityLevel>,
    /// Maximum lead width, "b" in the JEDEC drawings (mm).
    pub lead_width: Option<f64>,
    /// Toe-to-heel length (mm).
    pub foot_length: Option<f64>,
    /// Toe-to-package length (mm).
    pub terminal_length: Option<f64>,
    /// Silkscreen line width (mm).
    pub silkscreen_width: Option<f64>,
    /// Toe protrusion, replacing the density table value (mm).
    pub toe_protrusion: Option<f64>,
}

/// Fully resolved generator input.
///
/// Built once from the name and overrides; the tolerances always match the
/// density and pitch stored alongside them.
#[derive(Debug, Clone, PartialEq)]
pub struct PackageParams {
    /// Package family.
    pub family: PackageFamily,
    /// Lead pitch (mm).
    pub pitch: f64,
    /// Toe-to-toe lead span in X (mm).
    pub span_x: f64,
    /// Toe-to-toe lead span in Y (mm).
    pub span_y: f64,
    /// Total pin count.
    pub pin_count: u32,
    /// Density level the tolerances were looked up for.
    pub density: DensityLevel,
    /// Lead width (mm).
    pub lead_width: f64,
    /// Toe-to-package length (mm).
    pub terminal_length: f64,
    /// Toe-to-heel length (mm).
    pub foot_length: f64,
    /// Silkscreen line width and clearance (mm).
    pub silkscreen_width: f64,
    /// Pad offsets for the density level.
    pub tolerances: Tolerances,
}

impl PackageParams {
    /// Resolves parameters from an IPC name using nominal density as the fallback.
    ///
    /// # Errors
    ///
    /// Returns an error if the name cannot be parsed.
    pub fn from_name(name: &str) -> Result<Self, FootprintError> {
        Self::resolve(&parse_name(name)?, &ParamOverrides::default(), DensityLevel::Nominal)
    }

    /// Resolves parameters from a parsed name and overrides.
    ///
    /// Density precedence: override, then name suffix, then `default_density`.
    ///
    /// # Errors
    ///
    /// Returns [`FootprintError::Configuration`] if a dimension or override is
    /// not a positive, finite number.
    pub fn resolve(
        parsed: &ParsedName,
        overrides: &ParamOverrides,
        default_density: DensityLevel,
    ) -> Result<Self, FootprintError> {
        let family = parsed.family;
        let density = overrides.density.or(parsed.density).unwrap_or(default_density);

        require_positive("pitch", parsed.pitch)?;
        require_positive("lead span", parsed.span_x)?;
        require_positive("lead span", parsed.span_y)?;

        let lead_width = match overrides.lead_width {
            Some(width) => require_positive("lead width", width)?,
            None => default_lead_width(parsed.pitch, family.lead_width_ceiling()),
        };
        let foot_length = overrides
            .foot_length
            .map_or(Ok(family.default_foot_length()), |v| require_positive("foot length", v))?;
        let terminal_length = overrides
            .terminal_length
            .map_or(Ok(family.default_terminal_length()), |v| {
                require_positive("terminal length", v)
            })?;
        let silkscreen_width = overrides
            .silkscreen_width
            .map_or(Ok(DEFAULT_SILKSCREEN_WIDTH), |v| require_positive("silkscreen width", v))?;

        let mut tolerances = resolve_tolerances(density, parsed.pitch);
        if let Some(toe) = overrides.toe_protrusion {
            if !toe.is_finite() {
                return Err(FootprintError::configuration("toe protrusion must be finite"));
            }
            tolerances = tolerances.with_toe(toe);
        }

        debug!(
            %family,
            pitch = parsed.pitch,
            pins = parsed.pin_count,
            %density,
            lead_width,
            "Resolved package parameters"
        );

        Ok(Self {
            family,
            pitch: parsed.pitch,
            span_x: parsed.span_x,
            span_y: parsed.span_y,
            pin_count: parsed.pin_count,
            density,
            lead_width,
            terminal_length,
            foot_length,
            silkscreen_width,
            tolerances,
        })
    }

    /// Returns the number of pins on each side, rejecting counts that do not
    /// divide evenly between the family's sides.
    ///
    /// # Errors
    ///
    /// Returns [`FootprintError::UnsupportedShape`] for zero pins or a
    /// remainder after division.
    pub fn pins_per_side(&self) -> Result<u32, FootprintError> {
        let sides = self.family.sides();
        if self.pin_count == 0 || self.pin_count % sides != 0 {
            return Err(FootprintError::unsupported_shape(format!(
                "{} pins cannot be split evenly over {sides} sides of a {}",
                self.pin_count, self.family
            )));
        }
        Ok(self.pin_count / sides)
    }

    /// Computes the pad placement along one side for a given lead span.
    #[must_use]
    pub fn land(&self, span: f64) -> LandGeometry {
        let t = &self.tolerances;
        let toe = span / 2.0 + t.toe;
        let heel = span / 2.0 - self.foot_length - t.heel;
        let length = toe - heel;
        LandGeometry {
            toe,
            heel,
            length,
            center: toe - length / 2.0,
            width: self.lead_width + t.side,
        }
    }
}

fn require_positive(what: &str, value: f64) -> Result<f64, FootprintError> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(FootprintError::configuration(format!(
            "{what} must be a positive number, got {value}"
        )))
    }
}

/// Pad placement relative to the package centre, measured along the lead axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LandGeometry {
    /// Distance from the centre to the outer pad edge (mm).
    pub toe: f64,
    /// Distance from the centre to the inner pad edge (mm).
    pub heel: f64,
    /// Pad length along the lead (mm).
    pub length: f64,
    /// Distance from the centre to the pad centre (mm).
    pub center: f64,
    /// Pad width across the lead (mm).
    pub width: f64,
}

/// Trait for package generators.
pub trait PackageGenerator {
    /// The family this generator draws.
    fn family(&self) -> PackageFamily;

    /// Generates the land pattern for resolved parameters.
    ///
    /// # Errors
    ///
    /// Returns an error if the parameters describe a shape the generator
    /// cannot draw.
    fn generate(&self, params: &PackageParams) -> Result<Package, FootprintError>;
}

/// Returns the generator for a package family.
#[must_use]
pub fn generator_for(family: PackageFamily) -> &'static dyn PackageGenerator {
    match family {
        PackageFamily::Qfp => &QfpGenerator,
        PackageFamily::Soic => &SoicGenerator,
    }
}

/// Generates a package with the generator matching the parameters' family.
///
/// # Errors
///
/// Propagates generator errors.
pub fn generate(params: &PackageParams) -> Result<Package, FootprintError> {
    generator_for(params.family).generate(params)
}

/// Parses a name, applies overrides, and generates the package.
///
/// # Errors
///
/// Returns parse, configuration, or shape errors.
pub fn generate_from_name(
    name: &str,
    overrides: &ParamOverrides,
    default_density: DensityLevel,
) -> Result<Package, FootprintError> {
    let parsed = parse_name(name)?;
    let params = PackageParams::resolve(&parsed, overrides, default_density)?;
    generate(&params)
}

/// Fails unless the parameters belong to the expected family.
fn expect_family(params: &PackageParams, family: PackageFamily) -> Result<(), FootprintError> {
    if params.family == family {
        Ok(())
    } else {
        Err(FootprintError::configuration(format!(
            "{family} generator cannot draw a {} package",
            params.family
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_defaults_from_name() {
        let params = PackageParams::from_name("QFP50P900X900-48").unwrap();
        assert_eq!(params.family, PackageFamily::Qfp);
        assert_eq!(params.density, DensityLevel::Nominal);
        assert!((params.lead_width - 0.27).abs() < f64::EPSILON);
        assert!((params.terminal_length - 1.0).abs() < f64::EPSILON);
        assert!((params.foot_length - 0.6).abs() < f64::EPSILON);
        assert!((params.tolerances.side + 0.02).abs() < f64::EPSILON);
    }

    #[test]
    fn soic_defaults_from_name() {
        let params = PackageParams::from_name("SOIC127P600-14").unwrap();
        assert_eq!(params.family, PackageFamily::Soic);
        assert!((params.lead_width - 0.51).abs() < f64::EPSILON);
        assert!((params.terminal_length - 1.04).abs() < f64::EPSILON);
        assert!((params.tolerances.side - 0.03).abs() < f64::EPSILON);
    }

    #[test]
    fn density_precedence() {
        let parsed = parse_name("QFP50P900X900-48L").unwrap();

        let params = PackageParams::resolve(&parsed, &ParamOverrides::default(), DensityLevel::Most).unwrap();
        assert_eq!(params.density, DensityLevel::Least);

        let overrides = ParamOverrides {
            density: Some(DensityLevel::Zero),
            ..ParamOverrides::default()
        };
        let params = PackageParams::resolve(&parsed, &overrides, DensityLevel::Most).unwrap();
        assert_eq!(params.density, DensityLevel::Zero);
        assert!(params.tolerances.courtyard_excess.abs() < f64::EPSILON);

        let parsed = parse_name("QFP50P900X900-48").unwrap();
        let params = PackageParams::resolve(&parsed, &ParamOverrides::default(), DensityLevel::Most).unwrap();
        assert_eq!(params.density, DensityLevel::Most);
    }

    #[test]
    fn explicit_lead_width_is_kept() {
        let parsed = parse_name("QFP80P900X900X100-32").unwrap();
        let overrides = ParamOverrides {
            lead_width: Some(0.37),
            ..ParamOverrides::default()
        };
        let params = PackageParams::resolve(&parsed, &overrides, DensityLevel::Nominal).unwrap();
        assert!((params.lead_width - 0.37).abs() < f64::EPSILON);
    }

    #[test]
    fn toe_override_replaces_table_value() {
        let parsed = parse_name("SOIC127P600-8").unwrap();
        let overrides = ParamOverrides {
            toe_protrusion: Some(0.9),
            ..ParamOverrides::default()
        };
        let params = PackageParams::resolve(&parsed, &overrides, DensityLevel::Nominal).unwrap();
        assert!((params.tolerances.toe - 0.9).abs() < f64::EPSILON);
        assert!((params.tolerances.heel - 0.35).abs() < f64::EPSILON);
    }

    #[test]
    fn reject_non_positive_override() {
        let parsed = parse_name("SOIC127P600-8").unwrap();
        let overrides = ParamOverrides {
            foot_length: Some(-1.0),
            ..ParamOverrides::default()
        };
        let err = PackageParams::resolve(&parsed, &overrides, DensityLevel::Nominal).unwrap_err();
        assert!(matches!(err, FootprintError::Configuration { .. }));
    }

    #[test]
    fn reject_uneven_pin_count() {
        let params = PackageParams::from_name("QFP50P900X900-46").unwrap();
        assert!(matches!(
            params.pins_per_side(),
            Err(FootprintError::UnsupportedShape { .. })
        ));

        let params = PackageParams::from_name("SOIC127P600-7").unwrap();
        assert!(params.pins_per_side().is_err());

        let params = PackageParams::from_name("SOIC127P600-0").unwrap();
        assert!(params.pins_per_side().is_err());
    }

    #[test]
    fn land_geometry_nominal() {
        let params = PackageParams::from_name("QFP50P900X900-48").unwrap();
        let land = params.land(params.span_x);
        assert!((land.toe - 4.85).abs() < 1e-9);
        assert!((land.heel - 3.55).abs() < 1e-9);
        assert!((land.length - 1.30).abs() < 1e-9);
        assert!((land.center - 4.20).abs() < 1e-9);
        assert!((land.width - 0.25).abs() < 1e-9);
    }

    #[test]
    fn generator_lookup() {
        assert_eq!(generator_for(PackageFamily::Qfp).family(), PackageFamily::Qfp);
        assert_eq!(generator_for(PackageFamily::Soic).family(), PackageFamily::Soic);
    }

    #[test]
    fn mismatched_generator_is_rejected() {
        let params = PackageParams::from_name("SOIC127P600-8").unwrap();
        assert!(QfpGenerator.generate(&params).is_err());
    }
}
