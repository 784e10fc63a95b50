//! Geometric value types that property animations interpolate between.
//!
//! # Example
//!
//! ```rust
//! use choreo::{Path, Point, Vector};
//!
//! let p = Point::new(1.0, 2.0) + Vector::new(3.0, 4.0);
//! assert_eq!(p, Point::new(4.0, 6.0));
//!
//! let path = Path::new()
//!     .move_to(Point::origin())
//!     .line_to(Point::new(100.0, 0.0))
//!     .close();
//! assert_eq!(path.elements().len(), 3);
//! ```

use core::ops::{Add, AddAssign, Mul, Sub};

use serde::{Deserialize, Serialize};

/// A point in 2D space.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    /// X coordinate.
    pub x: f64,
    /// Y coordinate.
    pub y: f64,
}

impl Point {
    /// Creates a new point with the given coordinates.
    #[inline]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Returns the origin point (0, 0).
    #[inline]
    pub const fn origin() -> Self {
        Self { x: 0.0, y: 0.0 }
    }
}

impl Add<Vector> for Point {
    type Output = Point;

    #[inline]
    fn add(self, v: Vector) -> Point {
        Point {
            x: self.x + v.dx,
            y: self.y + v.dy,
        }
    }
}

impl AddAssign<Vector> for Point {
    #[inline]
    fn add_assign(&mut self, v: Vector) {
        self.x += v.dx;
        self.y += v.dy;
    }
}

impl Sub for Point {
    type Output = Vector;

    #[inline]
    fn sub(self, other: Point) -> Vector {
        Vector {
            dx: self.x - other.x,
            dy: self.y - other.y,
        }
    }
}

/// A displacement in 2D space.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Vector {
    /// Horizontal component.
    pub dx: f64,
    /// Vertical component.
    pub dy: f64,
}

impl Vector {
    /// Creates a new vector with the given components.
    #[inline]
    pub const fn new(dx: f64, dy: f64) -> Self {
        Self { dx, dy }
    }

    /// Returns the zero vector.
    #[inline]
    pub const fn zero() -> Self {
        Self { dx: 0.0, dy: 0.0 }
    }
}

impl Add for Vector {
    type Output = Vector;

    #[inline]
    fn add(self, other: Vector) -> Vector {
        Vector {
            dx: self.dx + other.dx,
            dy: self.dy + other.dy,
        }
    }
}

impl Mul<f64> for Vector {
    type Output = Vector;

    #[inline]
    fn mul(self, scalar: f64) -> Vector {
        Vector {
            dx: self.dx * scalar,
            dy: self.dy * scalar,
        }
    }
}

/// A width and height.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Size {
    /// Horizontal extent.
    pub width: f64,
    /// Vertical extent.
    pub height: f64,
}

impl Size {
    /// Creates a new size.
    #[inline]
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// An axis-aligned rectangle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    /// Top-left corner.
    pub origin: Point,
    /// Extent from the origin.
    pub size: Size,
}

impl Rect {
    /// Creates a rectangle from its origin and size components.
    #[inline]
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            origin: Point::new(x, y),
            size: Size::new(width, height),
        }
    }
}

/// A 2D affine transform `[a b 0; c d 0; tx ty 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[allow(clippy::many_single_char_names)]
pub struct AffineTransform {
    pub a: f64,
    pub b: f64,
    pub c: f64,
    pub d: f64,
    pub tx: f64,
    pub ty: f64,
}

impl AffineTransform {
    /// The identity transform.
    pub const IDENTITY: Self = Self {
        a: 1.0,
        b: 0.0,
        c: 0.0,
        d: 1.0,
        tx: 0.0,
        ty: 0.0,
    };

    /// A pure translation.
    pub const fn translation(tx: f64, ty: f64) -> Self {
        Self {
            tx,
            ty,
            ..Self::IDENTITY
        }
    }

    /// A pure scale.
    pub const fn scale(sx: f64, sy: f64) -> Self {
        Self {
            a: sx,
            d: sy,
            ..Self::IDENTITY
        }
    }

    /// A rotation by `radians`.
    pub fn rotation(radians: f64) -> Self {
        let (sin, cos) = radians.sin_cos();
        Self {
            a: cos,
            b: sin,
            c: -sin,
            d: cos,
            tx: 0.0,
            ty: 0.0,
        }
    }

    /// The six components in `a, b, c, d, tx, ty` order.
    pub const fn to_array(self) -> [f64; 6] {
        [self.a, self.b, self.c, self.d, self.tx, self.ty]
    }
}

impl Default for AffineTransform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// A 4x4 homogeneous transform, row-major.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform3D {
    /// Matrix rows.
    pub m: [[f64; 4]; 4],
}

impl Transform3D {
    /// The identity transform.
    pub const IDENTITY: Self = Self {
        m: [
            [1.0, 0.0, 0.0, 0.0],
            [0.0, 1.0, 0.0, 0.0],
            [0.0, 0.0, 1.0, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ],
    };

    /// A translation by `(tx, ty, tz)`.
    pub const fn translation(tx: f64, ty: f64, tz: f64) -> Self {
        let mut m = Self::IDENTITY.m;
        m[3][0] = tx;
        m[3][1] = ty;
        m[3][2] = tz;
        Self { m }
    }

    /// A scale by `(sx, sy, sz)`.
    pub const fn scale(sx: f64, sy: f64, sz: f64) -> Self {
        let mut m = Self::IDENTITY.m;
        m[0][0] = sx;
        m[1][1] = sy;
        m[2][2] = sz;
        Self { m }
    }
}

impl Default for Transform3D {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// Insets from each edge of a rectangle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct EdgeInsets {
    pub top: f64,
    pub left: f64,
    pub bottom: f64,
    pub right: f64,
}

impl EdgeInsets {
    /// Creates insets from each edge.
    pub const fn new(top: f64, left: f64, bottom: f64, right: f64) -> Self {
        Self {
            top,
            left,
            bottom,
            right,
        }
    }

    /// The same inset on every edge.
    pub const fn uniform(value: f64) -> Self {
        Self::new(value, value, value, value)
    }
}

/// An RGBA colour with components in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub r: f64,
    pub g: f64,
    pub b: f64,
    #[serde(default = "opaque")]
    pub a: f64,
}

const fn opaque() -> f64 {
    1.0
}

impl Color {
    /// Creates a colour from its components.
    pub const fn rgba(r: f64, g: f64, b: f64, a: f64) -> Self {
        Self { r, g, b, a }
    }

    /// Creates an opaque colour.
    pub const fn rgb(r: f64, g: f64, b: f64) -> Self {
        Self::rgba(r, g, b, 1.0)
    }

    /// Fully transparent black.
    pub const CLEAR: Self = Self::rgba(0.0, 0.0, 0.0, 0.0);
    /// Opaque black.
    pub const BLACK: Self = Self::rgb(0.0, 0.0, 0.0);
    /// Opaque white.
    pub const WHITE: Self = Self::rgb(1.0, 1.0, 1.0);
}

/// One drawing command of a [`Path`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PathElement {
    /// Starts a new subpath.
    MoveTo(Point),
    /// Straight line to a point.
    LineTo(Point),
    /// Quadratic curve through one control point.
    QuadTo {
        control: Point,
        to: Point,
    },
    /// Cubic curve through two control points.
    CurveTo {
        control1: Point,
        control2: Point,
        to: Point,
    },
    /// Closes the current subpath.
    Close,
}

/// An ordered list of drawing commands.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Path {
    elements: Vec<PathElement>,
}

impl Path {
    /// Creates an empty path.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a [`PathElement::MoveTo`].
    pub fn move_to(mut self, to: Point) -> Self {
        self.elements.push(PathElement::MoveTo(to));
        self
    }

    /// Appends a [`PathElement::LineTo`].
    pub fn line_to(mut self, to: Point) -> Self {
        self.elements.push(PathElement::LineTo(to));
        self
    }

    /// Appends a [`PathElement::QuadTo`].
    pub fn quad_to(mut self, control: Point, to: Point) -> Self {
        self.elements.push(PathElement::QuadTo { control, to });
        self
    }

    /// Appends a [`PathElement::CurveTo`].
    pub fn curve_to(mut self, control1: Point, control2: Point, to: Point) -> Self {
        self.elements.push(PathElement::CurveTo {
            control1,
            control2,
            to,
        });
        self
    }

    /// Appends a [`PathElement::Close`].
    pub fn close(mut self) -> Self {
        self.elements.push(PathElement::Close);
        self
    }

    /// The drawing commands in order.
    pub fn elements(&self) -> &[PathElement] {
        &self.elements
    }

    /// Returns `true` when the path has no commands.
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }
}

impl FromIterator<PathElement> for Path {
    fn from_iter<I: IntoIterator<Item = PathElement>>(iter: I) -> Self {
        Self {
            elements: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_point_vector_arithmetic() {
        let mut p = Point::new(1.0, 1.0);
        p += Vector::new(2.0, -1.0);
        assert_eq!(p, Point::new(3.0, 0.0));
        assert_eq!(p - Point::origin(), Vector::new(3.0, 0.0));
        assert_eq!(Vector::new(1.0, 2.0) * 3.0, Vector::new(3.0, 6.0));
    }

    #[test]
    fn test_rotation_quarter_turn() {
        let t = AffineTransform::rotation(core::f64::consts::FRAC_PI_2);
        assert!((t.a).abs() < 1e-12);
        assert!((t.b - 1.0).abs() < 1e-12);
        assert!((t.c + 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_transform3d_builders() {
        let t = Transform3D::translation(1.0, 2.0, 3.0);
        assert_eq!(t.m[3], [1.0, 2.0, 3.0, 1.0]);
        let s = Transform3D::scale(2.0, 2.0, 2.0);
        assert_eq!(s.m[0][0], 2.0);
        assert_eq!(s.m[3][3], 1.0);
    }

    #[test]
    fn test_color_alpha_defaults_to_opaque() {
        let c: Color = serde_json::from_str(r#"{"r":1.0,"g":0.5,"b":0.0}"#).unwrap();
        assert_eq!(c, Color::rgb(1.0, 0.5, 0.0));
    }

    #[test]
    fn test_path_serializes_as_list() {
        let path = Path::new().move_to(Point::origin()).close();
        let json = serde_json::to_string(&path).unwrap();
        assert_eq!(json, r#"[{"move-to":{"x":0.0,"y":0.0}},"close"]"#);
    }
}
