use std::path::{Path, PathBuf};
use std::process::Command;
use crate::config::config::DetectorConfig;
use crate::error::DetectionError;
use crate::modules::detector::{convert_raw_detections, Detection, Detector, RawDetection};

/// Runs an external pose-estimation program once per image.
///
/// The program is invoked as `<program> <args...> --model <model> --conf <confidence> <image>`
/// and must print a JSON array of detections on stdout.
#[derive(Debug, Clone)]
pub struct CommandDetector {
    program: String,
    args: Vec<String>,
    model_path: PathBuf,
    confidence: f32,
}

impl CommandDetector {
    pub fn new(config: DetectorConfig, model_path: PathBuf) -> Self {
        CommandDetector {
            program: config.program,
            args: config.args,
            model_path,
            confidence: config.confidence,
        }
    }

    fn command(&self, image: &Path) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args)
            .arg("--model")
            .arg(&self.model_path)
            .arg("--conf")
            .arg(self.confidence.to_string())
            .arg(image);
        cmd
    }
}

impl Detector for CommandDetector {
    fn detect(&self, image: &Path) -> Result<Vec<Detection>, DetectionError> {
        let output = self.command(image).output()?;

        if !output.status.success() {
            return Err(DetectionError::Backend {
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        let raw: Vec<RawDetection> = serde_json::from_slice(&output.stdout)?;
        convert_raw_detections(raw)
    }
}

#[cfg(test)]
mod tests {
    use std::ffi::OsString;
    use std::path::{Path, PathBuf};
    use crate::config::config::DetectorConfig;
    use crate::error::DetectionError;
    use crate::modules::command_detector::CommandDetector;
    use crate::modules::detector::Detector;

    #[test]
    fn test_command_arguments() {
        let config = DetectorConfig {
            program: "python3".to_string(),
            args: vec!["predict.py".to_string()],
            confidence: 0.25,
        };
        let detector = CommandDetector::new(config, PathBuf::from("models/best.pt"));
        let cmd = detector.command(Path::new("img/a.jpg"));

        assert_eq!(cmd.get_program(), "python3");
        let args: Vec<OsString> = cmd.get_args().map(|a| a.to_os_string()).collect();
        assert_eq!(args, vec!["predict.py", "--model", "models/best.pt", "--conf", "0.25", "img/a.jpg"]);
    }

    #[test]
    fn test_missing_program_is_launch_error() {
        let config = DetectorConfig {
            program: "axolotl-measure-no-such-program".to_string(),
            args: vec![],
            confidence: 0.25,
        };
        let detector = CommandDetector::new(config, PathBuf::from("best.pt"));
        assert!(matches!(detector.detect(Path::new("a.jpg")), Err(DetectionError::Launch(_))));
    }
}
