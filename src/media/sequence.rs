//! Image-sequence discovery.

use std::path::{Path, PathBuf};

use image::ImageFormat;
use walkdir::WalkDir;

/// Image files directly inside `dir`, sorted by file name.
///
/// Only files whose extension maps to a format `image` knows are taken;
/// subdirectories are not descended into.
pub fn list_images(dir: &Path) -> Vec<PathBuf> {
    WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
        .follow_links(true)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .map(|e| e.into_path())
        .filter(|p| ImageFormat::from_path(p).is_ok())
        .collect()
}
