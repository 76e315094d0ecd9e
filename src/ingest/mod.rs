/// Image ingestion module
///
/// This module handles:
/// - Reading and decoding image files off the UI thread (loader.rs)
/// - Listing the image files in a folder for bulk import (folder.rs)

pub mod folder;
pub mod loader;

pub use loader::{load_image, DecodeError};
