//! IPC-7351 land pattern generation.
//!
//! Land patterns are derived from the IPC name of a package, which encodes
//! pitch, lead span and pin count. The density level then sets how far the
//! pads protrude beyond the nominal lead footprint.
//!
//! # Density Levels
//!
//! - **Most (M)**: Maximum land protrusion, best solder fillet, for high reliability
//! - **Nominal (N)**: Standard density, recommended for most applications
//! - **Least (L)**: Minimum land protrusion, for high-density boards
//!
//! # Supported Package Types
//!
//! - [`packages::qfp`] - QFP, LQFP, TQFP (square bodies only)
//! - [`packages::soic`] - SOIC, SOP, SSOP, TSSOP
//!
//! # Example
//!
//! ```
//! use ipc_footprinter::ipc7351::{
//!     density::DensityLevel,
//!     packages::{generate_from_name, ParamOverrides},
//! };
//!
//! // Land pattern for a 7x7mm LQFP-48
//! let package = generate_from_name(
//!     "QFP50P900X900-48",
//!     &ParamOverrides::default(),
//!     DensityLevel::Nominal,
//! )
//! .unwrap();
//!
//! assert_eq!(package.pads().count(), 48);
//! println!("{}", package.description);
//! ```

pub mod density;
pub mod geometry;
pub mod library;
pub mod naming;
pub mod packages;

pub use density::{resolve_tolerances, DensityLevel, Tolerances};
pub use geometry::{BoundingBox, Layer, Package, Point, Primitive};
pub use packages::{PackageFamily, PackageGenerator, PackageParams, ParamOverrides};
