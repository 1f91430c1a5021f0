use std::fmt;
use nalgebra::Point2;
use serde::{Deserialize, Serialize, Serializer};

/// Pixel coordinates in image space.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Point2D {
    pub x: f64,
    pub y: f64,
}

impl Point2D {
    pub fn new(x: f64, y: f64) -> Self {
        Point2D { x, y }
    }

    pub fn to_point(&self) -> Point2<f64> {
        Point2::new(self.x, self.y)
    }

    /// midpoint returns the arithmetic mean of two points.
    pub fn midpoint(&self, other: &Point2D) -> Point2D {
        Point2D::new((self.x + other.x) / 2.0, (self.y + other.y) / 2.0)
    }

    /// distance returns the planar Euclidean distance between two points.
    pub fn distance(&self, other: &Point2D) -> f64 {
        nalgebra::distance(&self.to_point(), &other.to_point())
    }
}

/// A detected point with its confidence, as produced by the detector.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Keypoint {
    #[serde(flatten)]
    pub position: Point2D,
    pub confidence: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl Keypoint {
    pub fn new(x: f64, y: f64, confidence: f64) -> Self {
        Keypoint {
            position: Point2D::new(x, y),
            confidence,
            name: None,
        }
    }
}

/// The role a landmark plays in the measured body.
///
/// Anatomical roles only exist in the full schema, ordinal roles only in the
/// fallback schema. The string forms are a contract with downstream consumers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LandmarkRole {
    Head,
    MidU,
    MidL,
    LegsMidpoint,
    Tail,
    /// 1-based position in the raw keypoint list.
    Ordinal(usize),
}

impl fmt::Display for LandmarkRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LandmarkRole::Head => f.write_str("Head"),
            LandmarkRole::MidU => f.write_str("midU"),
            LandmarkRole::MidL => f.write_str("midL"),
            LandmarkRole::LegsMidpoint => f.write_str("legs_midpoint"),
            LandmarkRole::Tail => f.write_str("Tail"),
            LandmarkRole::Ordinal(n) => write!(f, "Keypoint {n}"),
        }
    }
}

impl Serialize for LandmarkRole {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// A keypoint bound to a named role.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Landmark {
    pub name: LandmarkRole,
    pub x: f64,
    pub y: f64,
    pub confidence: f64,
}

impl Landmark {
    pub fn new(name: LandmarkRole, position: Point2D, confidence: f64) -> Self {
        Landmark {
            name,
            x: position.x,
            y: position.y,
            confidence,
        }
    }

    pub fn position(&self) -> Point2D {
        Point2D::new(self.x, self.y)
    }
}
