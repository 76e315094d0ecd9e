/// State management module
///
/// This module handles all canvas state, including:
/// - Image layers and canvas geometry (layer.rs)
/// - The back-to-front layer list (stack.rs)
/// - The pointer drag/resize state machine (gesture.rs)
/// - The per-view session tying them together (session.rs)
/// - User settings loaded from JSON (settings.rs)

pub mod gesture;
pub mod layer;
pub mod session;
pub mod settings;
pub mod stack;
