use image::ImageFormat;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Whether the file extension names an image format we can decode
pub fn is_supported_image(path: &Path) -> bool {
    ImageFormat::from_path(path)
        .map(|format| format.reading_enabled())
        .unwrap_or(false)
}

/// List the image files directly inside `folder`, sorted by file name.
///
/// Subdirectories are not descended into; unreadable entries are skipped.
pub fn list_images(folder: &Path) -> Vec<PathBuf> {
    let images: Vec<PathBuf> = WalkDir::new(folder)
        .min_depth(1)
        .max_depth(1)
        .follow_links(true)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|e| e.ok())
        .map(|entry| entry.into_path())
        .filter(|path| path.is_file() && is_supported_image(path))
        .collect();

    log::info!("Found {} images in {}", images.len(), folder.display());
    images
}

/// `list_images` on tokio's blocking pool
pub async fn list_images_async(folder: PathBuf) -> Vec<PathBuf> {
    tokio::task::spawn_blocking(move || list_images(&folder))
        .await
        .unwrap_or_else(|e| {
            log::warn!("Folder listing task failed: {e}");
            Vec::new()
        })
}
