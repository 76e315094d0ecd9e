/// Application settings
///
/// Settings are read once at startup from a JSON file. Every field has a
/// default, so a partial file (or no file at all) is fine. Layer state is
/// never written here: sessions are not persisted.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

use super::layer::{CanvasSize, Pos};

/// Environment variable that overrides the settings file location
pub const SETTINGS_ENV: &str = "LAYER_CANVAS_SETTINGS";

/// Largest accepted canvas side in pixels
pub const MAX_CANVAS_SIDE: u32 = 8192;

/// Errors raised while loading settings
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to read settings file {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid settings file {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("canvas size must be non-zero, got {width}x{height}")]
    EmptyCanvas { width: u32, height: u32 },
    #[error("canvas size {width}x{height} exceeds the {max}px limit per side")]
    CanvasTooLarge { width: u32, height: u32, max: u32 },
}

/// Which layer wins when several overlap the pointer
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum HitTestOrder {
    /// Last-painted layer wins (what the user sees on top)
    #[default]
    Topmost,
    /// First layer in list order wins, even if it is painted underneath
    InsertionOrder,
}

/// All user-tunable settings
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct Settings {
    /// Canvas surface width in pixels
    pub canvas_width: u32,
    /// Canvas surface height in pixels
    pub canvas_height: u32,
    /// Background fill, RGBA
    pub background: [u8; 4],
    /// Resize grip fill, RGBA
    pub handle_color: [u8; 4],
    pub hit_test_order: HitTestOrder,
    /// Where newly imported layers are placed
    pub initial_origin: [f32; 2],
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            canvas_width: 800,
            canvas_height: 600,
            background: [255, 255, 255, 255],
            handle_color: [0, 0, 255, 255],
            hit_test_order: HitTestOrder::Topmost,
            initial_origin: [50.0, 50.0],
        }
    }
}

impl Settings {
    /// Parse from a JSON string
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Convert to a JSON string
    #[cfg(test)]
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Read and validate a settings file
    pub fn load_from(path: &Path) -> Result<Self, SettingsError> {
        let text = std::fs::read_to_string(path).map_err(|source| SettingsError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let settings = Self::from_json(&text).map_err(|source| SettingsError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

        settings.validate()?;
        Ok(settings)
    }

    /// Load settings from the default location, falling back to defaults.
    ///
    /// The file is looked up in `$LAYER_CANVAS_SETTINGS`, or else:
    /// - Linux: ~/.config/layer-canvas/settings.json
    /// - macOS: ~/Library/Application Support/layer-canvas/settings.json
    /// - Windows: %APPDATA%\layer-canvas\settings.json
    pub fn load() -> Self {
        let Some(path) = Self::settings_path() else {
            log::debug!("No config directory available, using default settings");
            return Self::default();
        };

        if !path.exists() {
            log::debug!("No settings file at {}, using defaults", path.display());
            return Self::default();
        }

        match Self::load_from(&path) {
            Ok(settings) => {
                log::info!("Loaded settings from {}", path.display());
                settings
            }
            Err(e) => {
                log::warn!("{e}; using default settings");
                Self::default()
            }
        }
    }

    fn settings_path() -> Option<PathBuf> {
        if let Some(path) = std::env::var_os(SETTINGS_ENV) {
            return Some(PathBuf::from(path));
        }

        let mut path = dirs::config_dir()?;
        path.push("layer-canvas");
        path.push("settings.json");
        Some(path)
    }

    fn validate(&self) -> Result<(), SettingsError> {
        if self.canvas_width == 0 || self.canvas_height == 0 {
            return Err(SettingsError::EmptyCanvas {
                width: self.canvas_width,
                height: self.canvas_height,
            });
        }
        if self.canvas_width > MAX_CANVAS_SIDE || self.canvas_height > MAX_CANVAS_SIDE {
            return Err(SettingsError::CanvasTooLarge {
                width: self.canvas_width,
                height: self.canvas_height,
                max: MAX_CANVAS_SIDE,
            });
        }
        Ok(())
    }

    pub fn canvas_size(&self) -> CanvasSize {
        CanvasSize::new(self.canvas_width, self.canvas_height)
    }

    pub fn origin(&self) -> Pos {
        Pos::new(self.initial_origin[0], self.initial_origin[1])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let s = Settings::default();
        assert_eq!(s.canvas_size(), CanvasSize::new(800, 600));
        assert_eq!(s.origin(), Pos::new(50.0, 50.0));
        assert_eq!(s.hit_test_order, HitTestOrder::Topmost);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let s = Settings::from_json(r#"{ "canvas_width": 1024, "hit_test_order": "insertion_order" }"#)
            .unwrap();
        assert_eq!(s.canvas_width, 1024);
        assert_eq!(s.canvas_height, 600);
        assert_eq!(s.hit_test_order, HitTestOrder::InsertionOrder);
        assert_eq!(s.background, [255, 255, 255, 255]);
    }

    #[test]
    fn test_serialization() {
        let mut s = Settings::default();
        s.handle_color = [255, 0, 0, 255];
        let restored = Settings::from_json(&s.to_json().unwrap()).unwrap();
        assert_eq!(s, restored);
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "canvas_height": 480 }}"#).unwrap();

        let s = Settings::load_from(file.path()).unwrap();
        assert_eq!(s.canvas_height, 480);
    }

    #[test]
    fn test_load_rejects_bad_json_and_empty_canvas() {
        let mut bad = tempfile::NamedTempFile::new().unwrap();
        write!(bad, "not json").unwrap();
        assert!(matches!(
            Settings::load_from(bad.path()),
            Err(SettingsError::Parse { .. })
        ));

        let mut empty = tempfile::NamedTempFile::new().unwrap();
        write!(empty, r#"{{ "canvas_width": 0 }}"#).unwrap();
        assert!(matches!(
            Settings::load_from(empty.path()),
            Err(SettingsError::EmptyCanvas { .. })
        ));
    }

    #[test]
    fn test_load_rejects_oversized_canvas() {
        let mut huge = tempfile::NamedTempFile::new().unwrap();
        write!(huge, r#"{{ "canvas_width": 100000, "canvas_height": 100000 }}"#).unwrap();
        assert!(matches!(
            Settings::load_from(huge.path()),
            Err(SettingsError::CanvasTooLarge { max: MAX_CANVAS_SIDE, .. })
        ));

        let mut tall = tempfile::NamedTempFile::new().unwrap();
        write!(tall, r#"{{ "canvas_height": 8193 }}"#).unwrap();
        assert!(Settings::load_from(tall.path()).is_err());

        let mut edge = tempfile::NamedTempFile::new().unwrap();
        write!(edge, r#"{{ "canvas_width": 8192, "canvas_height": 8192 }}"#).unwrap();
        assert_eq!(
            Settings::load_from(edge.path()).unwrap().canvas_size(),
            CanvasSize::new(8192, 8192)
        );
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = Settings::load_from(&dir.path().join("nope.json"));
        assert!(matches!(result, Err(SettingsError::Io { .. })));
    }
}
