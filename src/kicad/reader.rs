//! Reader for legacy `PCBNEW-LibModule-V1` libraries.
//!
//! Only the records needed to redraw a footprint are decoded: the module
//! index, `Cd` descriptions, `DS` segments, `DC` circles and `$PAD` blocks.
//! Everything else (texts, attributes, 3D shapes) is skipped.
//!
//! The file carries no courtyard, so each module gets the bounding box of
//! its drawings and pads instead.

use std::fs;
use std::iter::Enumerate;
use std::path::Path;
use std::str::Lines;

use tracing::{debug, warn};

use crate::ipc7351::geometry::{BoundingBox, Circle, Layer, Line, Package, Pad, Point, Primitive};
use crate::ipc7351::library::LibraryEntry;
use crate::kicad::error::{KicadError, KicadResult};
use crate::kicad::legacy::MM_PER_DECIMIL;

/// Legacy layer number for front silkscreen.
const SILKSCREEN_LAYER: u32 = 21;

/// Contents of a legacy library file.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LegacyLibrary {
    /// Module names listed in `$INDEX`.
    pub index: Vec<String>,
    /// Modules in file order.
    pub modules: Vec<LibraryEntry>,
}

impl LegacyLibrary {
    /// Reads a library from disk.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is malformed.
    pub fn read(path: impl AsRef<Path>) -> KicadResult<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|e| KicadError::file_read(path, e))?;
        let library = Self::parse(&text)?;
        debug!(
            path = %path.display(),
            modules = library.modules.len(),
            "Read legacy library"
        );
        Ok(library)
    }

    /// Parses library text.
    ///
    /// # Errors
    ///
    /// Returns [`KicadError::ParseError`] with the offending line number.
    pub fn parse(text: &str) -> KicadResult<Self> {
        Parser::new(text).parse()
    }

    /// Looks up a module by name.
    #[must_use]
    pub fn module(&self, name: &str) -> Option<&LibraryEntry> {
        self.modules.iter().find(|m| m.name == name)
    }
}

struct Parser<'a> {
    lines: Enumerate<Lines<'a>>,
    unit_is_mm: bool,
}

impl<'a> Parser<'a> {
    fn new(text: &'a str) -> Self {
        Self {
            lines: text.lines().enumerate(),
            unit_is_mm: false,
        }
    }

    /// Returns the next line, trimmed, with its 1-based line number.
    fn next_line(&mut self) -> Option<(usize, &'a str)> {
        self.lines.next().map(|(i, line)| (i + 1, line.trim()))
    }

    fn parse(mut self) -> KicadResult<LegacyLibrary> {
        let mut library = LegacyLibrary::default();

        while let Some((_, line)) = self.next_line() {
            if line == "$INDEX" {
                self.read_index(&mut library.index)?;
            } else if let Some(name) = line.strip_prefix("$MODULE") {
                let entry = self.read_module(name.trim())?;
                library.modules.push(entry);
            } else if line.starts_with("Units") {
                self.unit_is_mm = line.split_whitespace().nth(1) == Some("mm");
            }
        }

        if library.index.len() != library.modules.len() {
            warn!(
                indexed = library.index.len(),
                found = library.modules.len(),
                "Library index does not match module count"
            );
        }

        Ok(library)
    }

    fn read_index(&mut self, index: &mut Vec<String>) -> KicadResult<()> {
        let mut last = 0;
        while let Some((n, line)) = self.next_line() {
            if line == "$EndINDEX" {
                return Ok(());
            }
            if !line.is_empty() {
                index.push(line.to_string());
            }
            last = n;
        }
        Err(KicadError::parse_error(last, "unterminated $INDEX"))
    }

    fn read_module(&mut self, name: &str) -> KicadResult<LibraryEntry> {
        let mut description = String::new();
        let mut data = Vec::new();
        let mut last = 0;

        while let Some((n, line)) = self.next_line() {
            last = n;
            let fields: Vec<&str> = line.split_whitespace().collect();
            match fields.first().copied() {
                Some("$EndMODULE") => {
                    let courtyard = bounding_box(&data);
                    return Ok(LibraryEntry {
                        name: name.to_string(),
                        package: Package::new(description, data, courtyard),
                    });
                }
                Some("Cd") => {
                    description = line.strip_prefix("Cd").unwrap_or_default().trim().to_string();
                }
                Some("DS") => data.push(self.read_segment(n, &fields)?.into()),
                Some("DC") => data.push(self.read_circle(n, &fields)?.into()),
                Some("$PAD") => data.push(self.read_pad(n)?.into()),
                _ => {}
            }
        }

        Err(KicadError::parse_error(last, format!("unterminated $MODULE {name}")))
    }

    /// `DS x1 y1 x2 y2 width layer`
    fn read_segment(&self, n: usize, fields: &[&str]) -> KicadResult<Line> {
        let v = self.dims(n, fields, 5)?;
        Ok(Line::new(
            Point::new(v[0], v[1]),
            Point::new(v[2], v[3]),
            v[4],
            drawing_layer(n, fields.get(6).copied())?,
        ))
    }

    /// `DC cx cy ex ey width layer`, the end point lying on the circle.
    fn read_circle(&self, n: usize, fields: &[&str]) -> KicadResult<Circle> {
        let v = self.dims(n, fields, 5)?;
        Ok(Circle {
            center: Point::new(v[0], v[1]),
            radius: (v[2] - v[0]).hypot(v[3] - v[1]),
            width: v[4],
            layer: drawing_layer(n, fields.get(6).copied())?,
        })
    }

    fn read_pad(&mut self, start: usize) -> KicadResult<Pad> {
        let mut shape: Option<(u32, f64, f64, f64)> = None;
        let mut position: Option<Point> = None;
        let mut last = start;

        while let Some((n, line)) = self.next_line() {
            last = n;
            let fields: Vec<&str> = line.split_whitespace().collect();
            match fields.first().copied() {
                // Sh "NAME" SHAPE xsize ysize xdelta ydelta rotation
                Some("Sh") => {
                    if fields.len() < 8 {
                        return Err(KicadError::parse_error(n, "Sh record needs 7 values"));
                    }
                    let v = self.dims(n, &fields[2..], 2)?;
                    let rotation = parse_number(n, Some(fields[7]))? / 10.0;
                    shape = Some((pad_number(fields[1]), v[0], v[1], rotation));
                }
                Some("Po") => {
                    let v = self.dims(n, fields.as_slice(), 2)?;
                    position = Some(Point::new(v[0], v[1]));
                }
                Some("$EndPAD") => {
                    let Some((number, size_x, size_y, rotation)) = shape else {
                        return Err(KicadError::parse_error(start, "$PAD without Sh record"));
                    };
                    let Some(position) = position else {
                        return Err(KicadError::parse_error(start, "$PAD without Po record"));
                    };
                    let mut pad = Pad::new(number, position, size_x, size_y);
                    pad.rotation = rotation.rem_euclid(360.0);
                    return Ok(pad);
                }
                _ => {}
            }
        }

        Err(KicadError::parse_error(last, "unterminated $PAD"))
    }

    /// Parses `count` dimensions following the record keyword, in mm.
    fn dims(&self, n: usize, fields: &[&str], count: usize) -> KicadResult<Vec<f64>> {
        if fields.len() <= count {
            return Err(KicadError::parse_error(
                n,
                format!(
                    "{} record needs {count} values, found {}",
                    fields.first().copied().unwrap_or_default(),
                    fields.len().saturating_sub(1)
                ),
            ));
        }
        fields[1..=count]
            .iter()
            .map(|s| {
                let value = parse_number(n, Some(s))?;
                Ok(if self.unit_is_mm {
                    value
                } else {
                    value * MM_PER_DECIMIL
                })
            })
            .collect()
    }
}

fn parse_number(n: usize, field: Option<&str>) -> KicadResult<f64> {
    let field = field.ok_or_else(|| KicadError::parse_error(n, "missing value"))?;
    field
        .parse::<f64>()
        .map_err(|_| KicadError::parse_error(n, format!("invalid number '{field}'")))
}

fn drawing_layer(n: usize, field: Option<&str>) -> KicadResult<Layer> {
    match field {
        None => Ok(Layer::Silkscreen),
        Some(s) => match s.parse::<u32>() {
            Ok(SILKSCREEN_LAYER) => Ok(Layer::Silkscreen),
            // Other drawing layers are shown in previews but never written back
            Ok(_) => Ok(Layer::Package),
            Err(_) => Err(KicadError::parse_error(n, format!("invalid layer '{s}'"))),
        },
    }
}

fn pad_number(field: &str) -> u32 {
    let name = field.trim_matches('"');
    name.parse().unwrap_or_else(|_| {
        warn!(pad = name, "Non-numeric pad name, numbering it 0");
        0
    })
}

fn bounding_box(data: &[Primitive]) -> BoundingBox {
    let points = data.iter().flat_map(|p| -> Vec<Point> {
        match p {
            Primitive::Line(line) => vec![line.start, line.end],
            Primitive::Circle(c) => vec![
                Point::new(c.center.x - c.radius, c.center.y - c.radius),
                Point::new(c.center.x + c.radius, c.center.y + c.radius),
            ],
            Primitive::Rectangle(rect) => vec![rect.start, rect.end],
            Primitive::Pad(pad) => {
                let r = pad.max_half_extent();
                vec![
                    Point::new(pad.position.x - r, pad.position.y - r),
                    Point::new(pad.position.x + r, pad.position.y + r),
                ]
            }
        }
    });
    BoundingBox::enclosing(points).unwrap_or(BoundingBox::centred(0.0, 0.0))
}
