/// Ordered layer list
///
/// Layers are stored back-to-front: index 0 is painted first, the last
/// entry is painted on top. Ids come from a counter owned by the stack, so
/// they are unique and strictly increasing in insertion order.

use image::RgbaImage;

use super::layer::{CanvasSize, ImageLayer, LayerId, Pos};
use super::settings::HitTestOrder;

#[derive(Debug, Default)]
pub struct LayerStack {
    layers: Vec<ImageLayer>,
    next_id: LayerId,
}

impl LayerStack {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a new layer on top and return its id
    pub fn add(&mut self, image: RgbaImage, origin: Pos, canvas: CanvasSize) -> LayerId {
        let id = self.next_id;
        self.next_id += 1;

        self.layers.push(ImageLayer::new(id, image, origin, canvas));
        id
    }

    /// Remove the layer with `id`. Returns false if no such layer exists.
    pub fn delete(&mut self, id: LayerId) -> bool {
        let before = self.layers.len();
        self.layers.retain(|layer| layer.id != id);
        self.layers.len() != before
    }

    /// Swap the layer with its predecessor (one step towards the back)
    pub fn move_up(&mut self, id: LayerId) -> bool {
        match self.index_of(id) {
            Some(index) if index > 0 => {
                self.layers.swap(index, index - 1);
                true
            }
            _ => false,
        }
    }

    /// Swap the layer with its successor (one step towards the front)
    pub fn move_down(&mut self, id: LayerId) -> bool {
        match self.index_of(id) {
            Some(index) if index + 1 < self.layers.len() => {
                self.layers.swap(index, index + 1);
                true
            }
            _ => false,
        }
    }

    /// Find the layer under `p`
    pub fn hit_test(&self, p: Pos, order: HitTestOrder) -> Option<LayerId> {
        let hit = match order {
            HitTestOrder::Topmost => self.layers.iter().rev().find(|l| l.contains(p)),
            HitTestOrder::InsertionOrder => self.layers.iter().find(|l| l.contains(p)),
        };
        hit.map(|l| l.id)
    }

    pub fn index_of(&self, id: LayerId) -> Option<usize> {
        self.layers.iter().position(|layer| layer.id == id)
    }

    pub fn get(&self, id: LayerId) -> Option<&ImageLayer> {
        self.layers.iter().find(|layer| layer.id == id)
    }

    pub fn get_mut(&mut self, id: LayerId) -> Option<&mut ImageLayer> {
        self.layers.iter_mut().find(|layer| layer.id == id)
    }

    /// Layers in paint order (back to front)
    pub fn iter(&self) -> impl Iterator<Item = &ImageLayer> {
        self.layers.iter()
    }

    pub fn ids(&self) -> Vec<LayerId> {
        self.layers.iter().map(|layer| layer.id).collect()
    }

    pub fn len(&self) -> usize {
        self.layers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CANVAS: CanvasSize = CanvasSize { width: 800, height: 600 };

    fn stack_with(n: usize) -> LayerStack {
        let mut stack = LayerStack::new();
        for _ in 0..n {
            stack.add(RgbaImage::new(50, 50), Pos::new(50.0, 50.0), CANVAS);
        }
        stack
    }

    #[test]
    fn test_ids_strictly_increasing() {
        let stack = stack_with(5);
        let ids = stack.ids();
        assert_eq!(ids.len(), 5);
        assert!(ids.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_ids_not_reused_after_delete() {
        let mut stack = stack_with(3);
        assert!(stack.delete(2));
        let id = stack.add(RgbaImage::new(1, 1), Pos::default(), CANVAS);
        assert_eq!(id, 3);
    }

    #[test]
    fn test_delete_preserves_order() {
        let mut stack = stack_with(4);
        assert!(stack.delete(1));
        assert_eq!(stack.ids(), vec![0, 2, 3]);

        assert!(!stack.delete(42));
        assert_eq!(stack.ids(), vec![0, 2, 3]);
    }

    #[test]
    fn test_move_up_and_down() {
        let mut stack = stack_with(3);

        assert!(!stack.move_up(0));
        assert!(!stack.move_down(2));
        assert_eq!(stack.ids(), vec![0, 1, 2]);

        assert!(stack.move_up(2));
        assert_eq!(stack.ids(), vec![0, 2, 1]);

        assert!(stack.move_down(0));
        assert_eq!(stack.ids(), vec![2, 0, 1]);

        assert!(!stack.move_up(99));
        assert!(!stack.move_down(99));
        assert_eq!(stack.ids(), vec![2, 0, 1]);
    }

    #[test]
    fn test_hit_test_order() {
        let mut stack = LayerStack::new();
        let below = stack.add(RgbaImage::new(100, 100), Pos::new(0.0, 0.0), CANVAS);
        let above = stack.add(RgbaImage::new(100, 100), Pos::new(50.0, 50.0), CANVAS);

        let overlap = Pos::new(75.0, 75.0);
        assert_eq!(stack.hit_test(overlap, HitTestOrder::Topmost), Some(above));
        assert_eq!(stack.hit_test(overlap, HitTestOrder::InsertionOrder), Some(below));

        assert_eq!(stack.hit_test(Pos::new(10.0, 10.0), HitTestOrder::Topmost), Some(below));
        assert_eq!(stack.hit_test(Pos::new(500.0, 500.0), HitTestOrder::Topmost), None);
    }
}
