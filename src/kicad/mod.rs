//! KiCad footprint file formats.
//!
//! - `.kicad_mod`: s-expression module, one footprint per file ([`sexpr`])
//! - `.mod` / `.emp`: legacy `PCBNEW-LibModule-V1` library, one or more
//!   modules per file ([`legacy`] writes, [`reader`] reads)
//! - `.json`: the full package geometry ([`json`])
//!
//! The KiCad writers only emit silkscreen and copper geometry. Package-layer
//! outlines exist for previews and are dropped on output.

pub mod error;
pub mod json;
pub mod legacy;
pub mod reader;
pub mod sexpr;

pub use error::{KicadError, KicadResult};
pub use reader::LegacyLibrary;

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use chrono::Local;
use tracing::info;

use crate::ipc7351::geometry::Package;
use crate::ipc7351::library::LibraryEntry;

/// Output format for a single footprint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FootprintFormat {
    /// S-expression `.kicad_mod`.
    #[default]
    KicadMod,
    /// Legacy single-module library.
    Legacy,
    /// JSON dump of the whole package.
    Json,
}

impl FootprintFormat {
    /// Writes a footprint in this format, stamped with the current time.
    ///
    /// # Errors
    ///
    /// Returns any error from the underlying writer.
    pub fn write<W: Write>(self, out: &mut W, name: &str, package: &Package) -> io::Result<()> {
        let now = Local::now();
        match self {
            Self::KicadMod => sexpr::write_module(out, name, package, &now),
            Self::Legacy => legacy::write_standalone(out, name, package, &now),
            Self::Json => json::write_package(out, package),
        }
    }
}

/// Writes one footprint to a file.
///
/// # Errors
///
/// Returns [`KicadError::FileWrite`] if the file cannot be created or written.
pub fn save_footprint(
    path: impl AsRef<Path>,
    format: FootprintFormat,
    name: &str,
    package: &Package,
) -> KicadResult<()> {
    let path = path.as_ref();
    write_file(path, |out| format.write(out, name, package))?;
    info!(path = %path.display(), name, ?format, "Wrote footprint");
    Ok(())
}

/// Writes a legacy library holding every entry.
///
/// # Errors
///
/// Returns [`KicadError::FileWrite`] if the file cannot be created or written.
pub fn save_library(path: impl AsRef<Path>, entries: &[LibraryEntry]) -> KicadResult<()> {
    let path = path.as_ref();
    let now = Local::now();
    write_file(path, |out| legacy::write_library(out, entries, &now))?;
    info!(path = %path.display(), modules = entries.len(), "Wrote legacy library");
    Ok(())
}

fn write_file(
    path: &Path,
    body: impl FnOnce(&mut BufWriter<File>) -> io::Result<()>,
) -> KicadResult<()> {
    let file = File::create(path).map_err(|e| KicadError::file_write(path, e))?;
    let mut out = BufWriter::new(file);
    body(&mut out)
        .and_then(|()| out.flush())
        .map_err(|e| KicadError::file_write(path, e))
}
