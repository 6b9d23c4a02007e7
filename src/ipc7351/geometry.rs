//! Geometric primitives emitted by the package generators.
//!
//! All coordinates are millimetres relative to the package centre. The Y
//! axis points down, as in the KiCad footprint formats, so [`rotate`]
//! compensates with a sign flip.

use serde::{Deserialize, Serialize};

/// A 2D point (mm).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    /// X coordinate (mm).
    pub x: f64,
    /// Y coordinate (mm).
    pub y: f64,
}

impl Point {
    /// Creates a new point.
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Rotates a point about the origin, compensating for the Y axis being upside down.
///
/// Quarter turns are exact, so a side drawn at 0 degrees lands on exactly
/// the same grid after 90, 180 or 270 degrees.
#[must_use]
pub fn rotate(p: Point, degrees: f64) -> Point {
    let (sin, cos) = sin_cos_degrees(degrees);
    Point::new(cos.mul_add(p.x, sin * p.y), cos.mul_add(p.y, -(sin * p.x)))
}

fn sin_cos_degrees(degrees: f64) -> (f64, f64) {
    let normalised = degrees.rem_euclid(360.0);
    if normalised.abs() < f64::EPSILON {
        (0.0, 1.0)
    } else if (normalised - 90.0).abs() < f64::EPSILON {
        (1.0, 0.0)
    } else if (normalised - 180.0).abs() < f64::EPSILON {
        (0.0, -1.0)
    } else if (normalised - 270.0).abs() < f64::EPSILON {
        (-1.0, 0.0)
    } else {
        normalised.to_radians().sin_cos()
    }
}

/// Drawing layer of a primitive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Layer {
    /// Front copper with paste and mask openings (pads).
    Copper,
    /// Front silkscreen.
    Silkscreen,
    /// Package outline and courtyard, only drawn in previews.
    Package,
}

impl Layer {
    /// Returns `false` for geometry that is suppressed from footprint files.
    #[must_use]
    pub const fn is_printed(&self) -> bool {
        !matches!(self, Self::Package)
    }

    /// Returns the KiCad layer name, if the layer is written to files.
    #[must_use]
    pub const fn kicad_name(&self) -> Option<&'static str> {
        match self {
            Self::Copper => Some("F.Cu"),
            Self::Silkscreen => Some("F.SilkS"),
            Self::Package => None,
        }
    }
}

/// A line segment.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Line {
    /// Start point.
    pub start: Point,
    /// End point.
    pub end: Point,
    /// Stroke width (mm).
    pub width: f64,
    /// Drawing layer.
    pub layer: Layer,
}

impl Line {
    /// Creates a new line segment.
    #[must_use]
    pub const fn new(start: Point, end: Point, width: f64, layer: Layer) -> Self {
        Self {
            start,
            end,
            width,
            layer,
        }
    }

    /// Returns the segment length.
    #[must_use]
    pub fn length(&self) -> f64 {
        (self.end.x - self.start.x).hypot(self.end.y - self.start.y)
    }
}

/// A circle outline.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Circle {
    /// Centre point.
    pub center: Point,
    /// Radius (mm).
    pub radius: f64,
    /// Stroke width (mm).
    pub width: f64,
    /// Drawing layer.
    pub layer: Layer,
}

/// An axis-aligned rectangle outline given by two opposite corners.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rectangle {
    /// First corner.
    pub start: Point,
    /// Opposite corner.
    pub end: Point,
    /// Stroke width (mm).
    pub width: f64,
    /// Drawing layer.
    pub layer: Layer,
}

impl Rectangle {
    /// Creates a new rectangle.
    #[must_use]
    pub const fn new(start: Point, end: Point, width: f64, layer: Layer) -> Self {
        Self {
            start,
            end,
            width,
            layer,
        }
    }

    /// Returns the four edges, clockwise from the start corner.
    #[must_use]
    pub fn edges(&self) -> [Line; 4] {
        let a = self.start;
        let b = Point::new(self.end.x, self.start.y);
        let c = self.end;
        let d = Point::new(self.start.x, self.end.y);
        [
            Line::new(a, b, self.width, self.layer),
            Line::new(b, c, self.width, self.layer),
            Line::new(c, d, self.width, self.layer),
            Line::new(d, a, self.width, self.layer),
        ]
    }
}

/// A rectangular SMD pad.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Pad {
    /// Pin number.
    pub number: u32,
    /// Pad centre.
    pub position: Point,
    /// Pad size in X before rotation (mm).
    pub size_x: f64,
    /// Pad size in Y before rotation (mm).
    pub size_y: f64,
    /// Rotation in degrees, normalised to [0, 360).
    pub rotation: f64,
    /// Drawing layer.
    pub layer: Layer,
}

impl Pad {
    /// Creates an unrotated copper pad.
    #[must_use]
    pub const fn new(number: u32, position: Point, size_x: f64, size_y: f64) -> Self {
        Self {
            number,
            position,
            size_x,
            size_y,
            rotation: 0.0,
            layer: Layer::Copper,
        }
    }

    /// Half of the larger pad dimension, enough to bound the pad at any rotation
    /// that is a multiple of 90 degrees.
    #[must_use]
    pub fn max_half_extent(&self) -> f64 {
        self.size_x.max(self.size_y) / 2.0
    }
}

/// A footprint primitive.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Primitive {
    /// Line segment.
    Line(Line),
    /// Circle outline.
    Circle(Circle),
    /// Rectangle outline.
    Rectangle(Rectangle),
    /// SMD pad.
    Pad(Pad),
}

impl Primitive {
    /// Returns the primitive's drawing layer.
    #[must_use]
    pub const fn layer(&self) -> Layer {
        match self {
            Self::Line(line) => line.layer,
            Self::Circle(circle) => circle.layer,
            Self::Rectangle(rect) => rect.layer,
            Self::Pad(pad) => pad.layer,
        }
    }

    /// Rotates the primitive about the package centre.
    ///
    /// Pads accumulate their rotation; every point is moved with [`rotate`].
    pub fn rotate(&mut self, degrees: f64) {
        match self {
            Self::Line(line) => {
                line.start = rotate(line.start, degrees);
                line.end = rotate(line.end, degrees);
            }
            Self::Circle(circle) => {
                circle.center = rotate(circle.center, degrees);
            }
            Self::Rectangle(rect) => {
                rect.start = rotate(rect.start, degrees);
                rect.end = rotate(rect.end, degrees);
            }
            Self::Pad(pad) => {
                pad.position = rotate(pad.position, degrees);
                pad.rotation = (pad.rotation + degrees).rem_euclid(360.0);
            }
        }
    }

    /// Returns a rotated copy.
    #[must_use]
    pub fn rotated(mut self, degrees: f64) -> Self {
        self.rotate(degrees);
        self
    }
}

impl From<Line> for Primitive {
    fn from(line: Line) -> Self {
        Self::Line(line)
    }
}

impl From<Circle> for Primitive {
    fn from(circle: Circle) -> Self {
        Self::Circle(circle)
    }
}

impl From<Rectangle> for Primitive {
    fn from(rect: Rectangle) -> Self {
        Self::Rectangle(rect)
    }
}

impl From<Pad> for Primitive {
    fn from(pad: Pad) -> Self {
        Self::Pad(pad)
    }
}

/// Axis-aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    /// Minimum corner.
    pub min: Point,
    /// Maximum corner.
    pub max: Point,
}

impl BoundingBox {
    /// Creates a box centred on the origin.
    #[must_use]
    pub const fn centred(half_width: f64, half_height: f64) -> Self {
        Self {
            min: Point::new(-half_width, -half_height),
            max: Point::new(half_width, half_height),
        }
    }

    /// Creates the smallest box enclosing all points, or `None` if there are none.
    #[must_use]
    pub fn enclosing(points: impl IntoIterator<Item = Point>) -> Option<Self> {
        points.into_iter().fold(None, |bbox, p| {
            Some(match bbox {
                None => Self { min: p, max: p },
                Some(b) => b.expanded_to(p),
            })
        })
    }

    /// Returns the box grown to include `p`.
    #[must_use]
    pub fn expanded_to(self, p: Point) -> Self {
        Self {
            min: Point::new(self.min.x.min(p.x), self.min.y.min(p.y)),
            max: Point::new(self.max.x.max(p.x), self.max.y.max(p.y)),
        }
    }

    /// Returns the box grown by `margin` on every side.
    #[must_use]
    pub fn inflated(self, margin: f64) -> Self {
        Self {
            min: Point::new(self.min.x - margin, self.min.y - margin),
            max: Point::new(self.max.x + margin, self.max.y + margin),
        }
    }

    /// Returns the box width.
    #[must_use]
    pub fn width(&self) -> f64 {
        self.max.x - self.min.x
    }

    /// Returns the box height.
    #[must_use]
    pub fn height(&self) -> f64 {
        self.max.y - self.min.y
    }

    /// Returns the centre of the box.
    #[must_use]
    pub fn centre(&self) -> Point {
        Point::new((self.min.x + self.max.x) / 2.0, (self.min.y + self.max.y) / 2.0)
    }
}

/// A generated land pattern.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Package {
    /// Human-readable description.
    pub description: String,

    /// Primitives in emission order.
    pub primitives: Vec<Primitive>,

    /// Courtyard boundary.
    pub courtyard: BoundingBox,
}

impl Package {
    /// Creates a package from its parts.
    #[must_use]
    pub fn new(description: impl Into<String>, primitives: Vec<Primitive>, courtyard: BoundingBox) -> Self {
        Self {
            description: description.into(),
            primitives,
            courtyard,
        }
    }

    /// Replaces the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Iterates over the pads in emission order.
    pub fn pads(&self) -> impl Iterator<Item = &Pad> {
        self.primitives.iter().filter_map(|p| match p {
            Primitive::Pad(pad) => Some(pad),
            _ => None,
        })
    }

    /// Iterates over the primitives that are written to footprint files.
    pub fn printed(&self) -> impl Iterator<Item = &Primitive> {
        self.primitives.iter().filter(|p| p.layer().is_printed())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx_eq(a: Point, b: Point) -> bool {
        (a.x - b.x).abs() < 1e-9 && (a.y - b.y).abs() < 1e-9
    }

    #[test]
    fn rotate_quarter_turn_flips_y() {
        // East becomes "up" on screen (negative Y) after a quarter turn.
        let p = rotate(Point::new(1.0, 0.0), 90.0);
        assert!(approx_eq(p, Point::new(0.0, -1.0)));

        let p = rotate(Point::new(1.0, 2.0), 270.0);
        assert!(approx_eq(p, Point::new(-2.0, 1.0)));
    }

    #[test]
    fn rotate_arbitrary_angle() {
        let p = rotate(Point::new(1.0, 0.0), 45.0);
        let h = std::f64::consts::FRAC_1_SQRT_2;
        assert!(approx_eq(p, Point::new(h, -h)));
    }

    #[test]
    fn four_quarter_turns_close() {
        let original: Primitive = Line::new(Point::new(1.3, -0.7), Point::new(2.5, 4.1), 0.15, Layer::Silkscreen).into();
        let mut line = original;
        for _ in 0..4 {
            line.rotate(90.0);
        }
        assert_eq!(line, original);

        let original: Primitive = Pad::new(7, Point::new(4.2, 1.25), 1.5, 0.3).into();
        let mut pad = original;
        for _ in 0..4 {
            pad.rotate(90.0);
        }
        assert_eq!(pad, original);
    }

    #[test]
    fn pad_rotation_accumulates() {
        let mut pad: Primitive = Pad::new(1, Point::new(1.0, 0.0), 1.0, 0.5).into();
        pad.rotate(270.0);
        pad.rotate(180.0);
        let Primitive::Pad(pad) = pad else { unreachable!() };
        assert!((pad.rotation - 90.0).abs() < f64::EPSILON);
        assert!(approx_eq(pad.position, Point::new(0.0, -1.0)));
    }

    #[test]
    fn rectangle_edges_close() {
        let rect = Rectangle::new(Point::new(-1.0, -2.0), Point::new(1.0, 2.0), 0.1, Layer::Silkscreen);
        let edges = rect.edges();
        assert_eq!(edges[0].start, edges[3].end);
        let perimeter: f64 = edges.iter().map(Line::length).sum();
        assert!((perimeter - 12.0).abs() < 1e-12);
    }

    #[test]
    fn package_layer_not_printed() {
        assert!(Layer::Copper.is_printed());
        assert!(Layer::Silkscreen.is_printed());
        assert!(!Layer::Package.is_printed());
        assert_eq!(Layer::Package.kicad_name(), None);
    }

    #[test]
    fn bounding_box_enclosing() {
        let bbox = BoundingBox::enclosing([
            Point::new(1.0, -3.0),
            Point::new(-2.0, 0.5),
            Point::new(0.0, 4.0),
        ])
        .unwrap();
        assert!((bbox.width() - 3.0).abs() < f64::EPSILON);
        assert!((bbox.height() - 7.0).abs() < f64::EPSILON);
        assert!(BoundingBox::enclosing([]).is_none());
    }
}
