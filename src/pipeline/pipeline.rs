use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use crate::error::DetectionError;
use crate::helper::landmark_helper::{map_landmarks, Schema};
use crate::helper::measurement::{measure, MeasurementSet};
use crate::modules::detector::{Detection, Detector};
use crate::pipeline::result::{BatchOutcome, ImageResult, SkippedImage};
use crate::utils::image::image_name;

/// Turns images into measured landmark sets through a caller-owned detector.
#[derive(Clone)]
pub struct MeasurementPipeline {
    detector: Arc<dyn Detector>,
    concurrency: usize,
}

impl MeasurementPipeline {

    /// new initializes a pipeline running at most `concurrency` detections at a time.
    pub fn new(detector: Arc<dyn Detector>, concurrency: usize) -> Self {
        MeasurementPipeline {
            detector,
            concurrency: concurrency.max(1),
        }
    }

    /// run processes every image and returns the results in input order.
    ///
    /// A failing image is logged once and skipped; it never aborts the batch.
    ///
    /// # Arguments
    /// * `images` - image paths in the order results should be emitted
    ///
    /// # Returns
    /// * `BatchOutcome`
    pub async fn run(&self, images: &[PathBuf]) -> BatchOutcome {
        let total = images.len();
        let permits = Arc::new(Semaphore::new(self.concurrency));
        let mut tasks = JoinSet::new();

        tracing::info!("processing {} images with {} workers", total, self.concurrency);

        for (index, image) in images.iter().cloned().enumerate() {
            let detector = Arc::clone(&self.detector);
            let permits = Arc::clone(&permits);
            tasks.spawn(async move {
                let outcome = match permits.acquire_owned().await {
                    Ok(_permit) => {
                        tokio::task::spawn_blocking(move || process_image(detector.as_ref(), &image))
                            .await
                            .unwrap_or_else(|e| Err(DetectionError::Task(e.to_string())))
                    }
                    Err(e) => Err(DetectionError::Task(e.to_string())),
                };
                (index, outcome)
            });
        }

        let mut slots: Vec<Option<Result<Vec<ImageResult>, DetectionError>>> = (0..total).map(|_| None).collect();
        let mut done = 0;
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((index, outcome)) => {
                    done += 1;
                    tracing::info!("{}/{} images processed", done, total);
                    slots[index] = Some(outcome);
                }
                Err(e) => tracing::debug!("detection task aborted: {}", e),
            }
        }

        let mut batch = BatchOutcome::default();
        for (index, (image, slot)) in images.iter().zip(slots).enumerate() {
            let name = image_name(image);
            let outcome = slot.unwrap_or_else(|| Err(DetectionError::Task("task aborted".to_string())));
            match outcome {
                Ok(results) if results.is_empty() => {
                    tracing::debug!(image = %name, "no complete detection");
                    batch.skipped.push(SkippedImage {
                        index,
                        image_name: name,
                        reason: "no complete detection".to_string(),
                    });
                }
                Ok(results) => {
                    tracing::debug!(image = %name, "{} results", results.len());
                    batch.results.extend(results);
                }
                Err(e) => {
                    tracing::warn!("skipping {}: {}", image.display(), e);
                    batch.skipped.push(SkippedImage {
                        index,
                        image_name: name,
                        reason: e.to_string(),
                    });
                }
            }
        }

        tracing::info!(
            "processing complete: {} results, {} of {} images skipped",
            batch.results.len(),
            batch.skipped.len(),
            total
        );
        batch
    }
}

/// process_image detects and measures every organism in one image.
pub fn process_image(detector: &dyn Detector, image: &Path) -> Result<Vec<ImageResult>, DetectionError> {
    let name = image_name(image);
    let detections = detector.detect(image)?;
    Ok(detections
        .into_iter()
        .filter_map(|detection| build_result(&name, detection))
        .collect())
}

/// build_result packages one detection, or `None` when the bounding box or keypoints are
/// missing or hold non-finite coordinates.
pub fn build_result(image_name: &str, detection: Detection) -> Option<ImageResult> {
    let bounding_box = detection.bounding_box?;
    if detection.raw_keypoints.is_empty() || !is_finite_detection(&bounding_box, &detection) {
        return None;
    }

    let (keypoints, schema) = map_landmarks(&detection.raw_keypoints);
    let measurements = match schema {
        Schema::Full => MeasurementSet(measure(&keypoints)),
        Schema::Fallback => MeasurementSet::empty(),
    };

    Some(ImageResult {
        image_name: image_name.to_string(),
        bounding_box,
        keypoints,
        measurements,
    })
}

fn is_finite_detection(bounding_box: &[f64], detection: &Detection) -> bool {
    bounding_box.iter().all(|v| v.is_finite())
        && detection
            .raw_keypoints
            .iter()
            .all(|kp| kp.position.x.is_finite() && kp.position.y.is_finite())
}
