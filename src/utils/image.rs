use std::fs;
use std::path::{Path, PathBuf};
use anyhow::{Context, Error};
use crate::error::InvocationError;
use crate::utils::model::has_extension;

/// image_name returns the file name shown to consumers for an image path.
pub fn image_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_string_lossy().into_owned())
}

/// list_folder_images returns the image files directly inside `folder`, sorted by name.
pub fn list_folder_images(folder: &Path, extensions: &[String]) -> Result<Vec<PathBuf>, Error> {
    if !folder.is_dir() {
        return Err(InvocationError::NotADirectory(folder.to_path_buf()).into());
    }

    let mut images = Vec::new();
    for entry in fs::read_dir(folder).with_context(|| format!("cannot read folder {}", folder.display()))? {
        let path = entry?.path();
        if path.is_file() && has_extension(&path, extensions) {
            images.push(path);
        }
    }
    images.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(images)
}

/// collect_images expands the invocation input into the ordered image list.
///
/// Explicit paths keep the order given; folder contents follow them.
///
/// # Arguments
/// * `paths` - explicitly named images
/// * `folders` - folders to scan for images
/// * `extensions` - accepted image extensions
///
/// # Returns
/// * `Result<Vec<PathBuf>, Error>`
pub fn collect_images(paths: &[PathBuf], folders: &[PathBuf], extensions: &[String]) -> Result<Vec<PathBuf>, Error> {
    let mut images: Vec<PathBuf> = paths.to_vec();
    for folder in folders {
        images.extend(list_folder_images(folder, extensions)?);
    }

    if images.is_empty() {
        return Err(InvocationError::NoImages.into());
    }
    Ok(images)
}
