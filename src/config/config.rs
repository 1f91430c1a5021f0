use std::fs;
use std::path::{Path, PathBuf};
use anyhow::{Context, Error};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DetectorConfig {
    pub program: String,
    pub args: Vec<String>,
    pub confidence: f32,
}

impl DetectorConfig {
    pub(crate) fn new() -> Self {
        DetectorConfig {
            program: "axolotl-pose".to_string(),
            args: vec![],
            confidence: 0.25,
        }
    }
}

impl Default for DetectorConfig {
    fn default() -> Self {
        DetectorConfig::new()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct MeasureConfig {
    pub models_dir: PathBuf,
    pub default_model: Option<String>,
    pub model_extensions: Vec<String>,
    pub image_extensions: Vec<String>,
    pub concurrency: usize,
    pub detector: DetectorConfig,
}

impl MeasureConfig {
    pub fn new() -> Self {
        MeasureConfig {
            models_dir: PathBuf::from("models"),
            default_model: None,
            model_extensions: vec!["pt".to_string(), "onnx".to_string()],
            image_extensions: ["jpg", "jpeg", "png", "bmp", "tiff", "tif", "webp"]
                .iter()
                .map(|e| e.to_string())
                .collect(),
            concurrency: std::thread::available_parallelism().map(|n| n.get()).unwrap_or(1),
            detector: DetectorConfig::new(),
        }
    }

    /// from_file loads a JSON configuration; absent fields keep their defaults.
    pub fn from_file(path: &Path) -> Result<Self, Error> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("cannot read config {}", path.display()))?;
        let config: MeasureConfig = serde_json::from_str(&raw)
            .with_context(|| format!("invalid config {}", path.display()))?;
        Ok(config)
    }

    /// Concurrency is never below one worker.
    pub fn workers(&self) -> usize {
        self.concurrency.max(1)
    }
}

impl Default for MeasureConfig {
    fn default() -> Self {
        MeasureConfig::new()
    }
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::path::PathBuf;
    use crate::config::config::MeasureConfig;
    use crate::utils::model::tests::scratch_dir;

    #[test]
    fn test_partial_config_keeps_defaults() {
        let config: MeasureConfig = serde_json::from_str(
            r#"{"models_dir": "/opt/weights", "detector": {"program": "python3", "args": ["predict.py"]}}"#,
        )
        .unwrap();
        assert_eq!(config.models_dir, PathBuf::from("/opt/weights"));
        assert_eq!(config.detector.program, "python3");
        assert_eq!(config.detector.args, vec!["predict.py"]);
        assert_eq!(config.detector.confidence, 0.25);
        assert_eq!(config.model_extensions, MeasureConfig::new().model_extensions);
        assert!(config.image_extensions.contains(&"webp".to_string()));
    }

    #[test]
    fn test_workers_never_zero() {
        let mut config = MeasureConfig::new();
        config.concurrency = 0;
        assert_eq!(config.workers(), 1);
    }

    #[test]
    fn test_from_file() {
        let dir = scratch_dir("config");
        let path = dir.join("measure.json");
        fs::write(&path, r#"{"default_model": "best.pt", "concurrency": 2}"#).unwrap();

        let config = MeasureConfig::from_file(&path).unwrap();
        assert_eq!(config.default_model.as_deref(), Some("best.pt"));
        assert_eq!(config.workers(), 2);

        fs::write(&path, "{not json").unwrap();
        assert!(MeasureConfig::from_file(&path).is_err());
        fs::remove_dir_all(&dir).unwrap();
    }
}
