/// Image file loader
///
/// Reads a file from disk and decodes it into an RGBA bitmap. Decoding is
/// CPU-bound, so it runs on tokio's blocking pool and the UI only sees the
/// finished result.

use image::RgbaImage;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio::task;

/// Why a file could not become a layer
///
/// Errors carry rendered reasons rather than source errors so they can ride
/// inside UI messages, which must be `Clone`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error("could not read {}: {reason}", .path.display())]
    Read { path: PathBuf, reason: String },
    #[error("{} is not a supported image format", .path.display())]
    Unsupported { path: PathBuf },
    #[error("could not decode {}: {reason}", .path.display())]
    Corrupt { path: PathBuf, reason: String },
    #[error("decode task failed: {0}")]
    Task(String),
}

/// Load and decode an image file
///
/// # Returns
/// * `Ok(image)` - The decoded bitmap in RGBA8
/// * `Err(DecodeError)` - The file could not be read or decoded
pub async fn load_image(path: PathBuf) -> Result<RgbaImage, DecodeError> {
    let bytes = tokio::fs::read(&path).await.map_err(|e| DecodeError::Read {
        path: path.clone(),
        reason: e.to_string(),
    })?;

    // Spawn blocking because decoding is CPU-intensive
    task::spawn_blocking(move || decode_bytes(&path, &bytes))
        .await
        .map_err(|e| DecodeError::Task(e.to_string()))?
}

/// Decode in-memory file contents, sniffing the format from the bytes
pub fn decode_bytes(path: &Path, bytes: &[u8]) -> Result<RgbaImage, DecodeError> {
    let img = image::load_from_memory(bytes).map_err(|e| match e {
        image::ImageError::Unsupported(_) => DecodeError::Unsupported {
            path: path.to_path_buf(),
        },
        other => DecodeError::Corrupt {
            path: path.to_path_buf(),
            reason: other.to_string(),
        },
    })?;

    let rgba = img.to_rgba8();
    log::debug!(
        "Decoded {} ({}x{})",
        path.display(),
        rgba.width(),
        rgba.height()
    );
    Ok(rgba)
}
