use std::fs;
use std::path::{Path, PathBuf};
use anyhow::{Context, Error};
use crate::error::InvocationError;

/// validate_model_name checks that a model identifier is a bare file name.
///
/// Names that could escape the models directory are rejected.
pub fn validate_model_name(name: &str) -> Result<(), InvocationError> {
    if name.trim().is_empty() || name.contains("..") || name.contains('/') || name.contains('\\') {
        return Err(InvocationError::InvalidModelName(name.to_string()));
    }
    Ok(())
}

/// resolve_model validates `name` and returns its path inside `models_dir`.
///
/// # Arguments
/// * `models_dir` - directory holding model weight files
/// * `name` - model file name
///
/// # Returns
/// * `Result<PathBuf, InvocationError>`
pub fn resolve_model(models_dir: &Path, name: &str) -> Result<PathBuf, InvocationError> {
    validate_model_name(name)?;
    let path = models_dir.join(name);
    if !path.is_file() {
        return Err(InvocationError::ModelNotFound(path));
    }
    Ok(path)
}

/// has_extension compares the file extension case-insensitively against `extensions`.
pub fn has_extension(path: &Path, extensions: &[String]) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| extensions.iter().any(|e| e.eq_ignore_ascii_case(ext)))
        .unwrap_or(false)
}

/// list_models returns the sorted file names of the available models.
pub fn list_models(models_dir: &Path, extensions: &[String]) -> Result<Vec<String>, Error> {
    let entries = fs::read_dir(models_dir)
        .with_context(|| format!("cannot read models directory {}", models_dir.display()))?;

    let mut models = Vec::new();
    for entry in entries {
        let path = entry?.path();
        if path.is_file() && has_extension(&path, extensions) {
            if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
                models.push(name.to_string());
            }
        }
    }
    models.sort();
    Ok(models)
}

#[cfg(test)]
pub(crate) mod tests {
    use std::fs;
    use std::path::PathBuf;
    use crate::error::InvocationError;
    use crate::utils::model::{list_models, resolve_model, validate_model_name};

    pub(crate) fn scratch_dir(tag: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("axolotl-measure-{}-{}", tag, std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn test_validate_model_name() {
        assert!(validate_model_name("best.pt").is_ok());
        for bad in ["", "  ", "../best.pt", "weights/best.pt", "weights\\best.pt", "a..b"] {
            assert!(
                matches!(validate_model_name(bad), Err(InvocationError::InvalidModelName(_))),
                "{bad:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_resolve_and_list_models() {
        let dir = scratch_dir("models");
        fs::write(dir.join("b.pt"), b"").unwrap();
        fs::write(dir.join("a.ONNX"), b"").unwrap();
        fs::write(dir.join("notes.txt"), b"").unwrap();
        fs::create_dir(dir.join("sub.pt")).unwrap();

        let exts = vec!["pt".to_string(), "onnx".to_string()];
        assert_eq!(list_models(&dir, &exts).unwrap(), vec!["a.ONNX", "b.pt"]);

        assert_eq!(resolve_model(&dir, "b.pt").unwrap(), dir.join("b.pt"));
        assert!(matches!(resolve_model(&dir, "missing.pt"), Err(InvocationError::ModelNotFound(_))));
        assert!(matches!(resolve_model(&dir, "sub.pt"), Err(InvocationError::ModelNotFound(_))));

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_list_models_missing_dir() {
        let dir = std::env::temp_dir().join("axolotl-measure-does-not-exist");
        assert!(list_models(&dir, &["pt".to_string()]).is_err());
    }
}
