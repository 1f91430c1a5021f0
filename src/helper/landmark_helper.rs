use crate::utils::coordinate::{Keypoint, Landmark, LandmarkRole};
use crate::utils::keypoints::normalize_confidence;

/// Raw keypoint indices fixed by the detector's training labels.
///
/// This ordering is a contract with the upstream model and cannot be inferred from the data.
pub const TAIL_IDX: usize = 0;
pub const HEAD_IDX: usize = 1;
pub const MID_U_IDX: usize = 2;
pub const MID_L_IDX: usize = 3;
pub const LEG1_IDX: usize = 4;
pub const LEG2_IDX: usize = 5;

/// Minimum raw keypoint count for the anatomical schema.
pub const FULL_SCHEMA_MIN_KEYPOINTS: usize = 6;

/// Which landmark naming convention was applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Schema {
    Full,
    Fallback,
}

/// map_landmarks names raw keypoints.
///
/// With at least six raw points the anatomical schema is used and five landmarks are
/// emitted in display order `Head, midU, midL, legs_midpoint, Tail`; the legs midpoint is
/// the mean of the two leg keypoints. With fewer points each point becomes `Keypoint {i}`.
/// Confidences are normalized into [0, 1] regardless of which detector produced them.
///
/// # Arguments
/// * `raw_keypoints` - keypoints in detector order
///
/// # Returns
/// * `(Vec<Landmark>, Schema)`
pub fn map_landmarks(raw_keypoints: &[Keypoint]) -> (Vec<Landmark>, Schema) {
    if raw_keypoints.len() < FULL_SCHEMA_MIN_KEYPOINTS {
        return (map_ordinal(raw_keypoints), Schema::Fallback);
    }

    let anatomical = |role: LandmarkRole, idx: usize| {
        let kp = &raw_keypoints[idx];
        Landmark::new(role, kp.position, normalize_confidence(Some(kp.confidence)))
    };

    let leg1 = &raw_keypoints[LEG1_IDX];
    let leg2 = &raw_keypoints[LEG2_IDX];
    let legs_midpoint = Landmark::new(
        LandmarkRole::LegsMidpoint,
        leg1.position.midpoint(&leg2.position),
        (normalize_confidence(Some(leg1.confidence)) + normalize_confidence(Some(leg2.confidence))) / 2.0,
    );

    let landmarks = vec![
        anatomical(LandmarkRole::Head, HEAD_IDX),
        anatomical(LandmarkRole::MidU, MID_U_IDX),
        anatomical(LandmarkRole::MidL, MID_L_IDX),
        legs_midpoint,
        anatomical(LandmarkRole::Tail, TAIL_IDX),
    ];
    (landmarks, Schema::Full)
}

fn map_ordinal(raw_keypoints: &[Keypoint]) -> Vec<Landmark> {
    raw_keypoints
        .iter()
        .enumerate()
        .map(|(i, kp)| {
            Landmark::new(LandmarkRole::Ordinal(i + 1), kp.position, normalize_confidence(Some(kp.confidence)))
        })
        .collect()
}

/// find_landmark returns the landmark bound to `role`, if present.
pub fn find_landmark(landmarks: &[Landmark], role: LandmarkRole) -> Option<&Landmark> {
    landmarks.iter().find(|lm| lm.name == role)
}
