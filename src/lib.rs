//! ipc-footprinter: IPC-7351 land pattern generator for gull-wing packages
//!
//! Turns IPC-7351 package names such as `QFP50P900X900-48N` or
//! `SOIC127P600-14` into KiCad footprints and preview images.
//!
//! # Pipeline
//!
//! 1. The name is parsed into pitch, lead span, pin count and density
//! 2. Overrides are applied once, yielding immutable package parameters
//! 3. A generator lays out pads, silkscreen and package outline
//! 4. A serializer writes the result, or the previewer rasterises it
//!
//! # Modules
//!
//! - [`config`]: Configuration loading and validation
//! - [`error`]: Error types
//! - [`ipc7351`]: Density tables, name parsing and package generators
//! - [`kicad`]: `.kicad_mod`, legacy `.mod` and JSON reading and writing
//! - [`preview`]: PNG rendering

pub mod config;
pub mod error;
pub mod ipc7351;
pub mod kicad;
pub mod preview;
