/// A single image layer on the canvas
///
/// Layers own their decoded bitmap and carry their placement in canvas
/// pixel space. Interaction state (dragging/resizing) lives in the gesture
/// machine, not here, so a layer can never be both at once.
///
/// A layer shown at anything other than its native size keeps a resampled
/// copy, rebuilt only when the rounded display size changes. Moving a layer
/// never touches it.

use image::imageops::{self, FilterType};
use image::RgbaImage;
use std::borrow::Cow;

/// Side length (px) of the square resize grip at a layer's bottom-right corner
pub const RESIZE_HANDLE_SIZE: f32 = 10.0;

/// Unique layer id, assigned by the layer stack and never reused
pub type LayerId = u64;

/// A point in canvas-local pixel coordinates
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Pos {
    pub x: f32,
    pub y: f32,
}

impl Pos {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Size of the canvas surface in pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CanvasSize {
    pub width: u32,
    pub height: u32,
}

impl CanvasSize {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Whether a proposed layer size fits: strictly positive, at most the canvas
    pub fn accepts(&self, width: f32, height: f32) -> bool {
        width > 0.0
            && height > 0.0
            && width <= self.width as f32
            && height <= self.height as f32
    }
}

/// One imported image plus its position and size
#[derive(Debug, Clone)]
pub struct ImageLayer {
    pub id: LayerId,
    /// Decoded bitmap at its native resolution
    pub image: RgbaImage,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    /// Resampled copy at `display_size()`; `None` when shown at native size
    scaled: Option<RgbaImage>,
}

impl ImageLayer {
    /// Create a layer at `origin`, sized to the image but clamped to the canvas
    pub fn new(id: LayerId, image: RgbaImage, origin: Pos, canvas: CanvasSize) -> Self {
        let width = image.width().min(canvas.width) as f32;
        let height = image.height().min(canvas.height) as f32;

        let mut layer = Self {
            id,
            image,
            x: origin.x,
            y: origin.y,
            width,
            height,
            scaled: None,
        };
        layer.rescale();
        layer
    }

    /// Change the rendered size, resampling only if the pixel size changed
    pub fn set_size(&mut self, width: f32, height: f32) {
        let before = self.display_size();
        self.width = width;
        self.height = height;

        if self.display_size() != before {
            self.rescale();
        }
    }

    /// Rendered size in whole pixels
    pub fn display_size(&self) -> (u32, u32) {
        (self.width.round() as u32, self.height.round() as u32)
    }

    /// Pixels to paint at the current size.
    ///
    /// Borrows the native bitmap or the cached copy; only resamples on the
    /// spot if `width`/`height` were written without `set_size`.
    pub fn pixels(&self) -> Cow<'_, RgbaImage> {
        let (width, height) = self.display_size();

        if self.image.dimensions() == (width, height) {
            return Cow::Borrowed(&self.image);
        }

        match &self.scaled {
            Some(scaled) if scaled.dimensions() == (width, height) => Cow::Borrowed(scaled),
            _ => Cow::Owned(imageops::resize(&self.image, width, height, FilterType::Triangle)),
        }
    }

    /// The cached resampled copy, if the layer is not at native size
    #[cfg(test)]
    pub fn scaled(&self) -> Option<&RgbaImage> {
        self.scaled.as_ref()
    }

    fn rescale(&mut self) {
        let (width, height) = self.display_size();

        self.scaled = if width == 0 || height == 0 || self.image.dimensions() == (width, height) {
            None
        } else {
            Some(imageops::resize(&self.image, width, height, FilterType::Triangle))
        };
    }

    /// Whether `p` lies inside the layer's rect (edges inclusive)
    pub fn contains(&self, p: Pos) -> bool {
        p.x >= self.x
            && p.x <= self.x + self.width
            && p.y >= self.y
            && p.y <= self.y + self.height
    }

    /// Whether `p` lies inside the resize grip centred on the bottom-right corner
    pub fn on_resize_handle(&self, p: Pos) -> bool {
        let half = RESIZE_HANDLE_SIZE / 2.0;
        let (cx, cy) = self.bottom_right();

        p.x >= cx - half && p.x <= cx + half && p.y >= cy - half && p.y <= cy + half
    }

    pub fn bottom_right(&self) -> (f32, f32) {
        (self.x + self.width, self.y + self.height)
    }

    pub fn translate(&mut self, dx: f32, dy: f32) {
        self.x += dx;
        self.y += dy;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn layer(w: u32, h: u32) -> ImageLayer {
        ImageLayer::new(
            0,
            RgbaImage::new(w, h),
            Pos::new(50.0, 50.0),
            CanvasSize::new(800, 600),
        )
    }

    #[test]
    fn test_initial_size_clamped_to_canvas() {
        let l = layer(1000, 300);
        assert_eq!(l.width, 800.0);
        assert_eq!(l.height, 300.0);
        assert_eq!((l.x, l.y), (50.0, 50.0));
    }

    #[test]
    fn test_contains_is_edge_inclusive() {
        let l = layer(50, 50);
        assert!(l.contains(Pos::new(50.0, 50.0)));
        assert!(l.contains(Pos::new(100.0, 100.0)));
        assert!(!l.contains(Pos::new(100.5, 60.0)));
        assert!(!l.contains(Pos::new(49.0, 60.0)));
    }

    #[test]
    fn test_resize_handle_box() {
        let l = layer(50, 50);
        assert!(l.on_resize_handle(Pos::new(100.0, 100.0)));
        assert!(l.on_resize_handle(Pos::new(95.0, 95.0)));
        assert!(l.on_resize_handle(Pos::new(105.0, 105.0)));
        assert!(!l.on_resize_handle(Pos::new(94.0, 100.0)));
        assert!(!l.on_resize_handle(Pos::new(75.0, 75.0)));
    }

    #[test]
    fn test_scaled_copy_follows_size() {
        let mut l = layer(1000, 300);
        assert_eq!(l.scaled().map(|s| s.dimensions()), Some((800, 300)));
        assert_eq!(l.pixels().dimensions(), (800, 300));

        let before = l.scaled().unwrap().as_raw().as_ptr();
        // Sub-pixel change keeps the same rounded size
        l.set_size(800.2, 299.8);
        assert_eq!(l.scaled().unwrap().as_raw().as_ptr(), before);

        l.set_size(400.0, 150.0);
        assert_eq!(l.scaled().map(|s| s.dimensions()), Some((400, 150)));

        // Back to native size drops the copy
        l.set_size(1000.0, 300.0);
        assert!(l.scaled().is_none());
        assert!(matches!(l.pixels(), Cow::Borrowed(_)));
    }

    #[test]
    fn test_native_size_has_no_copy() {
        let l = layer(50, 50);
        assert!(l.scaled().is_none());
        assert!(matches!(l.pixels(), Cow::Borrowed(_)));
    }

    #[test]
    fn test_canvas_accepts() {
        let c = CanvasSize::new(800, 600);
        assert!(c.accepts(40.0, 40.0));
        assert!(c.accepts(800.0, 600.0));
        assert!(!c.accepts(0.0, 10.0));
        assert!(!c.accepts(10.0, -1.0));
        assert!(!c.accepts(801.0, 10.0));
        assert!(!c.accepts(10.0, 601.0));
    }
}
