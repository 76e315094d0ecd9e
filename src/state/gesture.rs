/// Pointer gesture state machine
///
/// `Idle -> (down on a layer) -> Dragging | Resizing -> (up) -> Idle`
///
/// Dragging tracks the pointer incrementally: each move translates the layer
/// by the delta since the previous move and then re-anchors.

use super::layer::{CanvasSize, LayerId, Pos};
use super::settings::HitTestOrder;
use super::stack::LayerStack;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Gesture {
    #[default]
    Idle,
    Dragging { layer: LayerId, anchor: Pos },
    Resizing { layer: LayerId },
}

impl Gesture {
    /// Start a gesture on the layer under `p`, if any.
    ///
    /// Returns the grabbed layer id.
    pub fn pointer_down(&mut self, stack: &LayerStack, p: Pos, order: HitTestOrder) -> Option<LayerId> {
        let id = stack.hit_test(p, order)?;
        let layer = stack.get(id)?;

        *self = if layer.on_resize_handle(p) {
            log::debug!("Resize started on layer {id} at ({:.1}, {:.1})", p.x, p.y);
            Gesture::Resizing { layer: id }
        } else {
            log::debug!("Drag started on layer {id} at ({:.1}, {:.1})", p.x, p.y);
            Gesture::Dragging { layer: id, anchor: p }
        };

        Some(id)
    }

    /// Apply a pointer move. Returns true if a layer moved or changed size.
    pub fn pointer_move(&mut self, stack: &mut LayerStack, p: Pos, canvas: CanvasSize) -> bool {
        match *self {
            Gesture::Idle => false,
            Gesture::Dragging { layer, anchor } => {
                let Some(target) = stack.get_mut(layer) else {
                    *self = Gesture::Idle;
                    return false;
                };

                target.translate(p.x - anchor.x, p.y - anchor.y);
                *self = Gesture::Dragging { layer, anchor: p };
                true
            }
            Gesture::Resizing { layer } => {
                let Some(target) = stack.get_mut(layer) else {
                    *self = Gesture::Idle;
                    return false;
                };

                let new_width = p.x - target.x;
                let new_height = p.y - target.y;

                // Out-of-range sizes are rejected, not clamped
                if !canvas.accepts(new_width, new_height) {
                    return false;
                }

                target.set_size(new_width, new_height);
                true
            }
        }
    }

    /// End the gesture. Returns the layer that was active, if any.
    pub fn pointer_up(&mut self) -> Option<LayerId> {
        let released = self.active();
        if let Some(id) = released {
            log::debug!("Gesture ended on layer {id}");
        }
        *self = Gesture::Idle;
        released
    }

    /// Drop the gesture if it targets `id` (used when a layer is deleted)
    pub fn forget(&mut self, id: LayerId) {
        if self.active() == Some(id) {
            *self = Gesture::Idle;
        }
    }

    pub fn active(&self) -> Option<LayerId> {
        match *self {
            Gesture::Idle => None,
            Gesture::Dragging { layer, .. } | Gesture::Resizing { layer } => Some(layer),
        }
    }

    #[cfg(test)]
    pub fn is_dragging(&self, id: LayerId) -> bool {
        matches!(*self, Gesture::Dragging { layer, .. } if layer == id)
    }

    #[cfg(test)]
    pub fn is_resizing(&self, id: LayerId) -> bool {
        matches!(*self, Gesture::Resizing { layer } if layer == id)
    }
}
