//! Property values: typed vectors, the `PropertyValue` tagged union, and the
//! `Animatable` arithmetic every keyframed type provides.

use serde::{Deserialize, Serialize};

/// 2D vector (positions, origins, scales, motion samples).
#[derive(Copy, Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Vec2 {
    pub x: f64,
    pub y: f64,
}

impl Vec2 {
    pub const ZERO: Vec2 = Vec2 { x: 0.0, y: 0.0 };

    #[inline]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Vec3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

/// RGBA color; channels are unclamped floats.
#[derive(Copy, Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Rgba {
    pub r: f64,
    pub g: f64,
    pub b: f64,
    pub a: f64,
}

/// Lightweight kind enum for error messages and quick dispatch.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ValueKind {
    Number,
    Vec2,
    Vec3,
    Color,
}

/// Dynamically typed property value.
///
/// Serialized untagged so persisted JSON keeps its natural shape:
/// `5`, `{x,y}`, `{x,y,z}` or `{r,g,b,a}`. Variant order matters for
/// deserialization: wider shapes are tried before narrower ones.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PropertyValue {
    Number(f64),
    Color(Rgba),
    Vec3(Vec3),
    Vec2(Vec2),
}

impl PropertyValue {
    #[inline]
    pub fn kind(&self) -> ValueKind {
        match self {
            PropertyValue::Number(_) => ValueKind::Number,
            PropertyValue::Vec2(_) => ValueKind::Vec2,
            PropertyValue::Vec3(_) => ValueKind::Vec3,
            PropertyValue::Color(_) => ValueKind::Color,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            PropertyValue::Number(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_vec2(&self) -> Option<Vec2> {
        match self {
            PropertyValue::Vec2(v) => Some(*v),
            _ => None,
        }
    }

    /// Apply `f` channel-wise to two values of the same kind.
    /// Mismatched kinds fail soft and return the left operand.
    fn zip_with(&self, other: &PropertyValue, f: impl Fn(f64, f64) -> f64) -> PropertyValue {
        match (self, other) {
            (PropertyValue::Number(a), PropertyValue::Number(b)) => PropertyValue::Number(f(*a, *b)),
            (PropertyValue::Vec2(a), PropertyValue::Vec2(b)) => {
                PropertyValue::Vec2(Vec2::new(f(a.x, b.x), f(a.y, b.y)))
            }
            (PropertyValue::Vec3(a), PropertyValue::Vec3(b)) => PropertyValue::Vec3(Vec3 {
                x: f(a.x, b.x),
                y: f(a.y, b.y),
                z: f(a.z, b.z),
            }),
            (PropertyValue::Color(a), PropertyValue::Color(b)) => PropertyValue::Color(Rgba {
                r: f(a.r, b.r),
                g: f(a.g, b.g),
                b: f(a.b, b.b),
                a: f(a.a, b.a),
            }),
            _ => self.clone(),
        }
    }

    fn map(&self, f: impl Fn(f64) -> f64) -> PropertyValue {
        match self {
            PropertyValue::Number(a) => PropertyValue::Number(f(*a)),
            PropertyValue::Vec2(a) => PropertyValue::Vec2(Vec2::new(f(a.x), f(a.y))),
            PropertyValue::Vec3(a) => PropertyValue::Vec3(Vec3 {
                x: f(a.x),
                y: f(a.y),
                z: f(a.z),
            }),
            PropertyValue::Color(c) => PropertyValue::Color(Rgba {
                r: f(c.r),
                g: f(c.g),
                b: f(c.b),
                a: f(c.a),
            }),
        }
    }
}

impl From<f64> for PropertyValue {
    fn from(v: f64) -> Self {
        PropertyValue::Number(v)
    }
}

impl From<Vec2> for PropertyValue {
    fn from(v: Vec2) -> Self {
        PropertyValue::Vec2(v)
    }
}

impl From<Vec3> for PropertyValue {
    fn from(v: Vec3) -> Self {
        PropertyValue::Vec3(v)
    }
}

impl From<Rgba> for PropertyValue {
    fn from(v: Rgba) -> Self {
        PropertyValue::Color(v)
    }
}

/// Arithmetic needed to interpolate, simplify and rove a keyframed value.
pub trait Animatable: Clone + PartialEq {
    fn add(&self, other: &Self) -> Self;
    fn sub(&self, other: &Self) -> Self;
    fn scale(&self, s: f64) -> Self;
    /// Euclidean length treating the value as a vector.
    fn length(&self) -> f64;
    /// Zero of the same shape as `self`.
    fn zero_like(&self) -> Self;
    fn to_value(&self) -> PropertyValue;
    fn from_value(value: &PropertyValue) -> Option<Self>;

    #[inline]
    fn lerp(&self, other: &Self, t: f64) -> Self {
        self.add(&other.sub(self).scale(t))
    }

    #[inline]
    fn distance(&self, other: &Self) -> f64 {
        other.sub(self).length()
    }
}

impl Animatable for f64 {
    #[inline]
    fn add(&self, other: &Self) -> Self {
        self + other
    }
    #[inline]
    fn sub(&self, other: &Self) -> Self {
        self - other
    }
    #[inline]
    fn scale(&self, s: f64) -> Self {
        self * s
    }
    #[inline]
    fn length(&self) -> f64 {
        self.abs()
    }
    #[inline]
    fn zero_like(&self) -> Self {
        0.0
    }
    fn to_value(&self) -> PropertyValue {
        PropertyValue::Number(*self)
    }
    fn from_value(value: &PropertyValue) -> Option<Self> {
        value.as_number()
    }
}

impl Animatable for Vec2 {
    #[inline]
    fn add(&self, other: &Self) -> Self {
        Vec2::new(self.x + other.x, self.y + other.y)
    }
    #[inline]
    fn sub(&self, other: &Self) -> Self {
        Vec2::new(self.x - other.x, self.y - other.y)
    }
    #[inline]
    fn scale(&self, s: f64) -> Self {
        Vec2::new(self.x * s, self.y * s)
    }
    #[inline]
    fn length(&self) -> f64 {
        self.x.hypot(self.y)
    }
    #[inline]
    fn zero_like(&self) -> Self {
        Vec2::ZERO
    }
    fn to_value(&self) -> PropertyValue {
        PropertyValue::Vec2(*self)
    }
    fn from_value(value: &PropertyValue) -> Option<Self> {
        value.as_vec2()
    }
}

impl Animatable for PropertyValue {
    fn add(&self, other: &Self) -> Self {
        self.zip_with(other, |a, b| a + b)
    }
    fn sub(&self, other: &Self) -> Self {
        self.zip_with(other, |a, b| a - b)
    }
    fn scale(&self, s: f64) -> Self {
        self.map(|a| a * s)
    }
    fn length(&self) -> f64 {
        match self {
            PropertyValue::Number(v) => v.abs(),
            PropertyValue::Vec2(v) => v.x.hypot(v.y),
            PropertyValue::Vec3(v) => (v.x * v.x + v.y * v.y + v.z * v.z).sqrt(),
            PropertyValue::Color(c) => (c.r * c.r + c.g * c.g + c.b * c.b + c.a * c.a).sqrt(),
        }
    }
    fn zero_like(&self) -> Self {
        self.map(|_| 0.0)
    }
    fn to_value(&self) -> PropertyValue {
        self.clone()
    }
    fn from_value(value: &PropertyValue) -> Option<Self> {
        Some(value.clone())
    }

    fn distance(&self, other: &Self) -> f64 {
        // Values of different kinds are never "close".
        if self.kind() != other.kind() {
            return f64::INFINITY;
        }
        other.sub(self).length()
    }
}
