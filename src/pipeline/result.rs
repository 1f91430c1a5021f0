use std::io::Write;
use anyhow::Error;
use serde::Serialize;
use crate::helper::measurement::MeasurementSet;
use crate::modules::detector::BoundingBox;
use crate::utils::coordinate::Landmark;

/// Measured landmarks for one detection in one image.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ImageResult {
    pub image_name: String,
    pub bounding_box: BoundingBox,
    pub keypoints: Vec<Landmark>,
    pub measurements: MeasurementSet,
}

/// Results in input image order.
pub type BatchResult = Vec<ImageResult>;

/// An image that contributed nothing to the batch, with the reason.
#[derive(Debug, Clone, PartialEq)]
pub struct SkippedImage {
    pub index: usize,
    pub image_name: String,
    pub reason: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct BatchOutcome {
    pub results: BatchResult,
    pub skipped: Vec<SkippedImage>,
}

/// serialize renders the batch as a single JSON line.
pub fn serialize(results: &[ImageResult]) -> Result<String, serde_json::Error> {
    serde_json::to_string(results)
}

/// emit writes the serialized batch with a single write and flushes.
///
/// Nothing else may ever be written to `writer`.
pub fn emit<W: Write>(results: &[ImageResult], writer: &mut W) -> Result<(), Error> {
    let mut payload = serialize(results)?;
    payload.push('\n');
    writer.write_all(payload.as_bytes())?;
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use crate::helper::measurement::MeasurementSet;
    use crate::pipeline::result::{emit, serialize, ImageResult};
    use crate::utils::coordinate::{Landmark, LandmarkRole, Point2D};

    fn fallback_result(name: &str) -> ImageResult {
        ImageResult {
            image_name: name.to_string(),
            bounding_box: [1.0, 2.0, 3.0, 4.0],
            keypoints: vec![Landmark::new(LandmarkRole::Ordinal(1), Point2D::new(5.0, 6.0), 0.0)],
            measurements: MeasurementSet::empty(),
        }
    }

    #[test]
    fn test_serialize_shape() {
        let json = serialize(&[fallback_result("a.jpg")]).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(
            value,
            serde_json::json!([{
                "image_name": "a.jpg",
                "bounding_box": [1.0, 2.0, 3.0, 4.0],
                "keypoints": [{"name": "Keypoint 1", "x": 5.0, "y": 6.0, "confidence": 0.0}],
                "measurements": {}
            }])
        );
    }

    #[test]
    fn test_emit_single_line() {
        let mut out: Vec<u8> = Vec::new();
        emit(&[fallback_result("a.jpg"), fallback_result("b.jpg")], &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.ends_with('\n'));
        assert_eq!(text.lines().count(), 1);

        let mut empty: Vec<u8> = Vec::new();
        emit(&[], &mut empty).unwrap();
        assert_eq!(empty, b"[]\n");
    }
}
