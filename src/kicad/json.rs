//! Package geometry as pretty-printed JSON.
//!
//! Unlike the KiCad formats this keeps every primitive, package layer
//! included, and the exact courtyard, so a dump previews identically to
//! the package it was written from.

use std::fs;
use std::io::{self, Write};
use std::path::Path;

use tracing::debug;

use crate::ipc7351::geometry::Package;
use crate::kicad::error::{KicadError, KicadResult};

/// Writes a package as JSON followed by a newline.
///
/// # Errors
///
/// Returns any error from the underlying writer.
pub fn write_package<W: Write>(out: &mut W, package: &Package) -> io::Result<()> {
    serde_json::to_writer_pretty(&mut *out, package)?;
    writeln!(out)
}

/// Reads a package written by [`write_package`].
///
/// # Errors
///
/// Returns [`KicadError::FileRead`] if the file cannot be read, or
/// [`KicadError::Json`] if it does not hold a package.
pub fn read_package(path: impl AsRef<Path>) -> KicadResult<Package> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path).map_err(|e| KicadError::file_read(path, e))?;
    let package: Package = serde_json::from_str(&contents).map_err(|e| KicadError::json(path, e))?;
    debug!(path = %path.display(), primitives = package.primitives.len(), "Read package JSON");
    Ok(package)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ipc7351::geometry::{BoundingBox, Layer, Line, Pad, Point, Primitive};

    fn sample() -> Package {
        let mut pad: Primitive = Pad::new(2, Point::new(1.0, 0.5), 0.6, 0.3).into();
        pad.rotate(90.0);
        Package::new(
            "dump",
            vec![
                Line::new(Point::new(-1.0, 1.0), Point::new(1.0, 1.0), 0.05, Layer::Package).into(),
                pad,
            ],
            BoundingBox::centred(1.5, 1.25),
        )
    }

    #[test]
    fn primitives_are_tagged() {
        let mut buf = Vec::new();
        write_package(&mut buf, &sample()).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert!(text.contains("\"kind\": \"line\""), "{text}");
        assert!(text.contains("\"kind\": \"pad\""), "{text}");
        assert!(text.contains("\"layer\": \"package\""), "{text}");
        assert!(text.ends_with("}\n"));
    }

    #[test]
    fn read_back_is_identical() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dump.json");
        let mut file = fs::File::create(&path).unwrap();
        write_package(&mut file, &sample()).unwrap();
        drop(file);

        assert_eq!(read_package(&path).unwrap(), sample());
    }

    #[test]
    fn malformed_json_names_the_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.json");
        fs::write(&path, "{\"description\": 3}").unwrap();

        let err = read_package(&path).unwrap_err();
        assert!(matches!(err, KicadError::Json { .. }), "{err}");
        assert!(err.to_string().contains("bad.json"));
    }
}
