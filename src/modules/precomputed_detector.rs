use std::collections::HashMap;
use std::fs;
use std::path::Path;
use anyhow::{Context, Error};
use crate::error::DetectionError;
use crate::modules::detector::{convert_raw_detections, Detection, Detector, RawDetection};
use crate::utils::image::image_name;

/// Replays detections recorded earlier, keyed by image file name.
#[derive(Debug, Clone, Default)]
pub struct PrecomputedDetector {
    detections: HashMap<String, Vec<RawDetection>>,
}

impl PrecomputedDetector {
    pub fn new(detections: HashMap<String, Vec<RawDetection>>) -> Self {
        PrecomputedDetector { detections }
    }

    /// from_file loads a JSON object of `image name -> [detection, ...]`.
    pub fn from_file(path: &Path) -> Result<Self, Error> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("cannot read detections {}", path.display()))?;
        let detections: HashMap<String, Vec<RawDetection>> = serde_json::from_str(&raw)
            .with_context(|| format!("invalid detections {}", path.display()))?;
        Ok(PrecomputedDetector::new(detections))
    }
}

impl Detector for PrecomputedDetector {
    fn detect(&self, image: &Path) -> Result<Vec<Detection>, DetectionError> {
        let name = image_name(image);
        match self.detections.get(&name) {
            Some(raw) => convert_raw_detections(raw.clone()),
            None => Err(DetectionError::UnknownImage(name)),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::path::Path;
    use crate::error::DetectionError;
    use crate::modules::detector::{Detector, RawDetection};
    use crate::modules::precomputed_detector::PrecomputedDetector;

    #[test]
    fn test_lookup_by_file_name() {
        let detections: HashMap<String, Vec<RawDetection>> = serde_json::from_str(
            r#"{"a.jpg": [{"bounding_box": [0, 0, 10, 10], "keypoints": [[1, 2, 0.9]]}], "b.jpg": []}"#,
        )
        .unwrap();
        let detector = PrecomputedDetector::new(detections);

        let found = detector.detect(Path::new("/photos/a.jpg")).unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].raw_keypoints.len(), 1);

        assert!(detector.detect(Path::new("b.jpg")).unwrap().is_empty());
        assert!(matches!(detector.detect(Path::new("c.jpg")), Err(DetectionError::UnknownImage(n)) if n == "c.jpg"));
    }
}
