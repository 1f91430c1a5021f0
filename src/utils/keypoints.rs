use ndarray::{Array2, ArrayView1, Axis};
use crate::error::DetectionError;
use crate::utils::coordinate::Keypoint;

/// Columns of a keypoint tensor: x, y, confidence.
pub const KEYPOINT_COLUMNS: usize = 3;

/// normalize_confidence maps a raw confidence into [0, 1].
///
/// Missing or non-finite values become 0.0.
pub fn normalize_confidence(confidence: Option<f64>) -> f64 {
    match confidence {
        Some(c) if c.is_finite() => c.clamp(0.0, 1.0),
        _ => 0.0,
    }
}

/// convert_rows_to_ndarray packs raw detector rows into an `N x 3` tensor.
///
/// Each row is `[x, y]` or `[x, y, confidence]`; extra trailing values are ignored.
///
/// # Arguments
/// * `rows` - raw keypoint rows in detector order
///
/// # Returns
/// * `Result<Array2<f64>, DetectionError>`
pub fn convert_rows_to_ndarray(rows: &[Vec<f64>]) -> Result<Array2<f64>, DetectionError> {
    let mut result: Vec<f64> = Vec::with_capacity(rows.len() * KEYPOINT_COLUMNS);

    for (idx, row) in rows.iter().enumerate() {
        if row.len() < 2 {
            return Err(DetectionError::MalformedKeypoints {
                row: idx,
                reason: format!("expected at least 2 values, got {}", row.len()),
            });
        }
        let (x, y) = (row[0], row[1]);
        if !x.is_finite() || !y.is_finite() {
            return Err(DetectionError::MalformedKeypoints {
                row: idx,
                reason: "non-finite coordinate".to_string(),
            });
        }
        result.extend_from_slice(&[x, y, normalize_confidence(row.get(2).copied())]);
    }

    Array2::from_shape_vec((rows.len(), KEYPOINT_COLUMNS), result).map_err(|e| {
        DetectionError::MalformedKeypoints {
            row: 0,
            reason: e.to_string(),
        }
    })
}

fn row_to_keypoint(row: ArrayView1<f64>) -> Keypoint {
    Keypoint::new(row[0], row[1], row[2])
}

/// convert_ndarray_to_keypoints unpacks an `N x 3` tensor into keypoints, preserving row order.
pub fn convert_ndarray_to_keypoints(tensor: &Array2<f64>) -> Vec<Keypoint> {
    tensor.axis_iter(Axis(0)).map(row_to_keypoint).collect()
}
