/// Canvas session
///
/// Everything the canvas view owns while it is open: the layer stack, the
/// current pointer gesture and the settings they are interpreted against.
/// A session is created when the canvas view opens and dropped when it
/// closes; nothing in it is persisted.
///
/// Every mutating method returns `true` when the canvas needs a redraw.

use image::RgbaImage;

use super::gesture::Gesture;
use super::layer::{LayerId, Pos};
use super::settings::Settings;
use super::stack::LayerStack;
use crate::render;

#[derive(Debug)]
pub struct CanvasSession {
    stack: LayerStack,
    gesture: Gesture,
    settings: Settings,
}

impl CanvasSession {
    pub fn new(settings: Settings) -> Self {
        Self {
            stack: LayerStack::new(),
            gesture: Gesture::Idle,
            settings,
        }
    }

    /// Add a decoded image as the new topmost layer
    pub fn add_image(&mut self, image: RgbaImage) -> LayerId {
        let (w, h) = image.dimensions();
        let id = self
            .stack
            .add(image, self.settings.origin(), self.settings.canvas_size());

        log::info!("Added layer {id} ({w}x{h}), {} layers total", self.stack.len());
        id
    }

    pub fn delete(&mut self, id: LayerId) -> bool {
        if !self.stack.delete(id) {
            log::debug!("Delete ignored: no layer {id}");
            return false;
        }

        self.gesture.forget(id);
        log::info!("Deleted layer {id}");
        true
    }

    pub fn move_up(&mut self, id: LayerId) -> bool {
        let moved = self.stack.move_up(id);
        if moved {
            log::info!("Moved layer {id} up, order now {:?}", self.stack.ids());
        }
        moved
    }

    pub fn move_down(&mut self, id: LayerId) -> bool {
        let moved = self.stack.move_down(id);
        if moved {
            log::info!("Moved layer {id} down, order now {:?}", self.stack.ids());
        }
        moved
    }

    /// Pointer pressed. Grabbing a layer does not change the picture.
    pub fn pointer_down(&mut self, p: Pos) -> bool {
        self.gesture
            .pointer_down(&self.stack, p, self.settings.hit_test_order);
        false
    }

    pub fn pointer_move(&mut self, p: Pos) -> bool {
        self.gesture
            .pointer_move(&mut self.stack, p, self.settings.canvas_size())
    }

    pub fn pointer_up(&mut self) -> bool {
        self.gesture.pointer_up();
        false
    }

    /// Paint the current state
    pub fn redraw(&self) -> RgbaImage {
        render::redraw(&self.stack, &self.settings)
    }

    pub fn layers(&self) -> &LayerStack {
        &self.stack
    }

    pub fn gesture(&self) -> &Gesture {
        &self.gesture
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }
}
