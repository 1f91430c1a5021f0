use std::path::Path;
use serde::{Deserialize, Serialize};
use crate::error::DetectionError;
use crate::utils::coordinate::Keypoint;
use crate::utils::keypoints::{convert_ndarray_to_keypoints, convert_rows_to_ndarray};

/// Bounding box in `[x1, y1, x2, y2]` order.
pub type BoundingBox = [f64; 4];

/// One organism instance found in one image.
#[derive(Debug, Clone, PartialEq)]
pub struct Detection {
    pub bounding_box: Option<BoundingBox>,
    pub raw_keypoints: Vec<Keypoint>,
}

/// Detection as it arrives on the wire from a detector backend.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct RawDetection {
    #[serde(default)]
    pub bounding_box: Option<Vec<f64>>,
    #[serde(default)]
    pub keypoints: Option<Vec<Vec<f64>>>,
}

impl TryFrom<RawDetection> for Detection {
    type Error = DetectionError;

    fn try_from(raw: RawDetection) -> Result<Self, Self::Error> {
        let bounding_box = raw
            .bounding_box
            .and_then(|b| <BoundingBox>::try_from(b.as_slice()).ok());

        let raw_keypoints = match raw.keypoints {
            Some(rows) => convert_ndarray_to_keypoints(&convert_rows_to_ndarray(&rows)?),
            None => vec![],
        };

        Ok(Detection { bounding_box, raw_keypoints })
    }
}

/// convert_raw_detections converts a backend response, failing on the first malformed detection.
pub fn convert_raw_detections(raw: Vec<RawDetection>) -> Result<Vec<Detection>, DetectionError> {
    raw.into_iter().map(Detection::try_from).collect()
}

/// Source of keypoint detections for a single image.
///
/// Implementations are constructed by the caller and shared across the workers of one batch.
pub trait Detector: Send + Sync {
    fn detect(&self, image: &Path) -> Result<Vec<Detection>, DetectionError>;
}

#[cfg(test)]
mod tests {
    use crate::modules::detector::{convert_raw_detections, Detection, RawDetection};
    use crate::utils::coordinate::Keypoint;

    #[test]
    fn test_raw_detection_conversion() {
        let raw: Vec<RawDetection> = serde_json::from_str(
            r#"[{"bounding_box": [1, 2, 30, 40], "keypoints": [[5, 6, 0.5], [7, 8]]}]"#,
        )
        .unwrap();
        let detections = convert_raw_detections(raw).unwrap();
        assert_eq!(
            detections,
            vec![Detection {
                bounding_box: Some([1.0, 2.0, 30.0, 40.0]),
                raw_keypoints: vec![Keypoint::new(5.0, 6.0, 0.5), Keypoint::new(7.0, 8.0, 0.0)],
            }]
        );
    }

    #[test]
    fn test_missing_fields_become_absent() {
        let raw: Vec<RawDetection> =
            serde_json::from_str(r#"[{"bounding_box": null}, {"bounding_box": [1, 2, 3]}]"#).unwrap();
        let detections = convert_raw_detections(raw).unwrap();
        assert_eq!(detections.len(), 2);
        assert!(detections.iter().all(|d| d.bounding_box.is_none() && d.raw_keypoints.is_empty()));
    }

    #[test]
    fn test_malformed_row_fails_detection() {
        let raw: Vec<RawDetection> =
            serde_json::from_str(r#"[{"bounding_box": [0, 0, 1, 1], "keypoints": [[1]]}]"#).unwrap();
        assert!(convert_raw_detections(raw).is_err());
    }
}
