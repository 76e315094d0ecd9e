/// Canvas rendering module
///
/// The canvas is repainted in software after every state change:
/// - `compositor.rs` - clears the frame and paints layers plus resize grips
///
/// The resulting RGBA frame is handed to an iced image widget for display.

pub mod compositor;

pub use compositor::redraw;
