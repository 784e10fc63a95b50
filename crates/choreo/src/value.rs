//! Typed keyframe values and the encoder that turns them into engine payloads.
//!
//! The node algebra never looks inside a value: every `from`/`by`/`to`
//! endpoint and every keyframe is handed to a [`ValueEncoder`] exactly once
//! at construction, and the resulting [`EncodedValue`] is stored verbatim.
//! [`JsonEncoder`] is the encoder the combinator facade uses.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use thiserror::Error;

use crate::geometry::{
    AffineTransform, Color, EdgeInsets, Path, PathElement, Point, Rect, Size, Transform3D, Vector,
};

/// A value a property can be animated to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum KeyframeValue {
    Number(f64),
    Point(Point),
    Size(Size),
    Rect(Rect),
    Vector(Vector),
    AffineTransform(AffineTransform),
    #[serde(rename = "transform-3d")]
    Transform3D(Transform3D),
    EdgeInsets(EdgeInsets),
    Color(Color),
    Path(Path),
}

impl KeyframeValue {
    /// Short lowercase name of the value kind, used in error messages.
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Number(_) => "number",
            Self::Point(_) => "point",
            Self::Size(_) => "size",
            Self::Rect(_) => "rect",
            Self::Vector(_) => "vector",
            Self::AffineTransform(_) => "affine-transform",
            Self::Transform3D(_) => "transform-3d",
            Self::EdgeInsets(_) => "edge-insets",
            Self::Color(_) => "color",
            Self::Path(_) => "path",
        }
    }
}

macro_rules! impl_from_number {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for KeyframeValue {
                fn from(value: $ty) -> Self {
                    Self::Number(f64::from(value))
                }
            }
        )*
    };
}

impl_from_number!(f64, f32, i8, i16, i32, u8, u16, u32);

macro_rules! impl_from_variant {
    ($($ty:ident),*) => {
        $(
            impl From<$ty> for KeyframeValue {
                fn from(value: $ty) -> Self {
                    Self::$ty(value)
                }
            }
        )*
    };
}

impl_from_variant!(
    Point,
    Size,
    Rect,
    Vector,
    AffineTransform,
    Transform3D,
    EdgeInsets,
    Color,
    Path
);

/// An encoded payload in the format the animation engine expects.
///
/// Opaque to the node algebra; it is only carried through to the engine
/// description.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EncodedValue(Value);

impl EncodedValue {
    /// Wraps an already-encoded payload.
    pub const fn new(payload: Value) -> Self {
        Self(payload)
    }

    /// Borrows the payload.
    pub const fn as_json(&self) -> &Value {
        &self.0
    }

    /// Returns the payload.
    pub fn into_inner(self) -> Value {
        self.0
    }
}

/// Errors produced while encoding a [`KeyframeValue`].
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EncodeError {
    /// A component was NaN or infinite.
    #[error("{kind} value has a non-finite component")]
    NonFinite {
        /// The value kind.
        kind: &'static str,
    },

    /// A colour component was outside `[0, 1]`.
    #[error("color component {component} = {value} is outside [0, 1]")]
    ColorOutOfRange {
        /// Which channel (`r`, `g`, `b` or `a`).
        component: char,
        /// The offending value.
        value: f64,
    },

    /// A path had no elements.
    #[error("path is empty")]
    EmptyPath,

    /// A path was structurally invalid.
    #[error("malformed path: {0}")]
    MalformedPath(String),

    /// The encoder does not support this kind of value.
    #[error("unsupported value: {0}")]
    Unsupported(String),
}

/// Converts typed values into engine payloads.
///
/// Implement this to target an engine with its own payload format.
pub trait ValueEncoder {
    /// Encodes one value.
    ///
    /// # Errors
    /// Returns [`EncodeError`] when the value cannot be represented.
    fn encode(&self, value: &KeyframeValue) -> Result<EncodedValue, EncodeError>;
}

impl<E: ValueEncoder + ?Sized> ValueEncoder for &E {
    fn encode(&self, value: &KeyframeValue) -> Result<EncodedValue, EncodeError> {
        (**self).encode(value)
    }
}

/// Encodes values as JSON: bare numbers, and single-key objects holding a
/// component array for everything else (`{"point": [x, y]}`).
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonEncoder;

impl ValueEncoder for JsonEncoder {
    fn encode(&self, value: &KeyframeValue) -> Result<EncodedValue, EncodeError> {
        let payload = match value {
            KeyframeValue::Number(n) => {
                finite(value, &[*n])?;
                json!(n)
            }
            KeyframeValue::Point(p) => components(value, "point", &[p.x, p.y])?,
            KeyframeValue::Size(s) => components(value, "size", &[s.width, s.height])?,
            KeyframeValue::Rect(r) => components(
                value,
                "rect",
                &[r.origin.x, r.origin.y, r.size.width, r.size.height],
            )?,
            KeyframeValue::Vector(v) => components(value, "vector", &[v.dx, v.dy])?,
            KeyframeValue::AffineTransform(t) => components(value, "affine", &t.to_array())?,
            KeyframeValue::Transform3D(t) => {
                let flat: Vec<f64> = t.m.iter().flatten().copied().collect();
                components(value, "transform3d", &flat)?
            }
            KeyframeValue::EdgeInsets(e) => {
                components(value, "insets", &[e.top, e.left, e.bottom, e.right])?
            }
            KeyframeValue::Color(c) => {
                finite(value, &[c.r, c.g, c.b, c.a])?;
                for (component, channel) in [('r', c.r), ('g', c.g), ('b', c.b), ('a', c.a)] {
                    if !(0.0..=1.0).contains(&channel) {
                        return Err(EncodeError::ColorOutOfRange {
                            component,
                            value: channel,
                        });
                    }
                }
                json!({ "rgba": [c.r, c.g, c.b, c.a] })
            }
            KeyframeValue::Path(path) => encode_path(path)?,
        };
        Ok(EncodedValue(payload))
    }
}

fn finite(value: &KeyframeValue, parts: &[f64]) -> Result<(), EncodeError> {
    if parts.iter().all(|p| p.is_finite()) {
        Ok(())
    } else {
        Err(EncodeError::NonFinite { kind: value.kind() })
    }
}

fn components(value: &KeyframeValue, tag: &str, parts: &[f64]) -> Result<Value, EncodeError> {
    finite(value, parts)?;
    Ok(json!({ tag: parts }))
}

fn encode_path(path: &Path) -> Result<Value, EncodeError> {
    let elements = path.elements();
    match elements.first() {
        None => return Err(EncodeError::EmptyPath),
        Some(PathElement::MoveTo(_)) => {}
        Some(_) => {
            return Err(EncodeError::MalformedPath(
                "path must start with move-to".into(),
            ));
        }
    }

    let mut out = Vec::with_capacity(elements.len());
    for element in elements {
        let (op, points): (&str, Vec<Point>) = match *element {
            PathElement::MoveTo(p) => ("move", vec![p]),
            PathElement::LineTo(p) => ("line", vec![p]),
            PathElement::QuadTo { control, to } => ("quad", vec![control, to]),
            PathElement::CurveTo {
                control1,
                control2,
                to,
            } => ("cubic", vec![control1, control2, to]),
            PathElement::Close => {
                out.push(json!("close"));
                continue;
            }
        };
        let flat: Vec<f64> = points.iter().flat_map(|p| [p.x, p.y]).collect();
        if !flat.iter().all(|c| c.is_finite()) {
            return Err(EncodeError::NonFinite { kind: "path" });
        }
        out.push(json!({ op: flat }));
    }
    Ok(json!({ "path": out }))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encode(value: impl Into<KeyframeValue>) -> Result<Value, EncodeError> {
        JsonEncoder.encode(&value.into()).map(EncodedValue::into_inner)
    }

    #[test]
    fn test_numbers_are_bare() {
        assert_eq!(encode(0.5).unwrap(), json!(0.5));
        assert_eq!(encode(3_u8).unwrap(), json!(3.0));
    }

    #[test]
    fn test_geometry_shapes() {
        assert_eq!(encode(Point::new(1.0, 2.0)).unwrap(), json!({"point": [1.0, 2.0]}));
        assert_eq!(
            encode(Rect::new(0.0, 0.0, 10.0, 5.0)).unwrap(),
            json!({"rect": [0.0, 0.0, 10.0, 5.0]})
        );
        let t = encode(Transform3D::IDENTITY).unwrap();
        assert_eq!(t["transform3d"].as_array().unwrap().len(), 16);
    }

    #[test]
    fn test_non_finite_rejected() {
        assert_eq!(
            encode(Point::new(f64::NAN, 0.0)),
            Err(EncodeError::NonFinite { kind: "point" })
        );
        assert_eq!(
            encode(f64::INFINITY),
            Err(EncodeError::NonFinite { kind: "number" })
        );
    }

    #[test]
    fn test_color_range_checked() {
        assert!(encode(Color::rgba(0.2, 0.4, 0.6, 1.0)).is_ok());
        assert_eq!(
            encode(Color::rgb(1.5, 0.0, 0.0)),
            Err(EncodeError::ColorOutOfRange {
                component: 'r',
                value: 1.5
            })
        );
    }

    #[test]
    fn test_path_validation() {
        assert_eq!(encode(Path::new()), Err(EncodeError::EmptyPath));
        assert!(matches!(
            encode(Path::new().line_to(Point::origin())),
            Err(EncodeError::MalformedPath(_))
        ));
        let path = Path::new()
            .move_to(Point::origin())
            .quad_to(Point::new(1.0, 1.0), Point::new(2.0, 0.0))
            .close();
        assert_eq!(
            encode(path).unwrap(),
            json!({"path": [{"move": [0.0, 0.0]}, {"quad": [1.0, 1.0, 2.0, 0.0]}, "close"]})
        );
    }

    #[test]
    fn test_encoder_by_reference() {
        let encoder = JsonEncoder;
        let by_ref = &encoder;
        assert!(by_ref.encode(&KeyframeValue::Number(1.0)).is_ok());
    }

    #[test]
    fn test_value_serde_is_tagged() {
        let value: KeyframeValue = serde_json::from_str(r#"{"number": 2.0}"#).unwrap();
        assert_eq!(value, KeyframeValue::Number(2.0));
        let value: KeyframeValue = serde_json::from_str(r#"{"point": {"x": 1.0, "y": 2.0}}"#).unwrap();
        assert_eq!(value, KeyframeValue::Point(Point::new(1.0, 2.0)));
    }
}
