use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use crate::helper::landmark_helper::find_landmark;
use crate::utils::coordinate::{Landmark, LandmarkRole};

/// Consecutive landmark pairs along the body midline, head to tail.
pub const SEGMENTS: [(&str, LandmarkRole, LandmarkRole); 4] = [
    ("head_to_midU", LandmarkRole::Head, LandmarkRole::MidU),
    ("midU_to_midL", LandmarkRole::MidU, LandmarkRole::MidL),
    ("midL_to_legs_midpoint", LandmarkRole::MidL, LandmarkRole::LegsMidpoint),
    ("legs_midpoint_to_tail", LandmarkRole::LegsMidpoint, LandmarkRole::Tail),
];

pub const TOTAL_LENGTH: &str = "total_length";

/// Midline segment lengths in pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Measurements {
    pub head_to_mid_u: f64,
    pub mid_u_to_mid_l: f64,
    pub mid_l_to_legs_midpoint: f64,
    pub legs_midpoint_to_tail: f64,
    pub total_length: f64,
}

impl Measurements {
    /// from_segments derives the total as the sum of the four segments.
    pub fn from_segments(segments: [f64; 4]) -> Self {
        let [head_to_mid_u, mid_u_to_mid_l, mid_l_to_legs_midpoint, legs_midpoint_to_tail] = segments;
        Measurements {
            head_to_mid_u,
            mid_u_to_mid_l,
            mid_l_to_legs_midpoint,
            legs_midpoint_to_tail,
            total_length: segments.iter().sum(),
        }
    }

    pub fn segments(&self) -> [f64; 4] {
        [
            self.head_to_mid_u,
            self.mid_u_to_mid_l,
            self.mid_l_to_legs_midpoint,
            self.legs_midpoint_to_tail,
        ]
    }

    /// Named values in emission order.
    pub fn entries(&self) -> Vec<(&'static str, f64)> {
        let mut entries: Vec<(&'static str, f64)> = SEGMENTS
            .iter()
            .zip(self.segments())
            .map(|((name, _, _), value)| (*name, value))
            .collect();
        entries.push((TOTAL_LENGTH, self.total_length));
        entries
    }
}

/// Named distances for one detection; empty under the fallback schema.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct MeasurementSet(pub Option<Measurements>);

impl MeasurementSet {
    pub fn empty() -> Self {
        MeasurementSet(None)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_none()
    }

    pub fn get(&self, name: &str) -> Option<f64> {
        self.0?.entries().into_iter().find(|(n, _)| *n == name).map(|(_, v)| v)
    }
}

impl Serialize for MeasurementSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let entries = self.0.map(|m| m.entries()).unwrap_or_default();
        let mut map = serializer.serialize_map(Some(entries.len()))?;
        for (name, value) in entries {
            map.serialize_entry(name, &value)?;
        }
        map.end()
    }
}

/// measure computes the midline segment lengths of a full-schema landmark list.
///
/// Confidences are not used. Returns `None` when any anatomical landmark is missing,
/// which only happens for fallback-schema input.
pub fn measure(landmarks: &[Landmark]) -> Option<Measurements> {
    let mut segments = [0.0; 4];
    for (slot, (_, from, to)) in segments.iter_mut().zip(SEGMENTS.iter()) {
        let a = find_landmark(landmarks, *from)?;
        let b = find_landmark(landmarks, *to)?;
        *slot = a.position().distance(&b.position());
    }
    Some(Measurements::from_segments(segments))
}
