/// User interface components
///
/// - `sidebar.rs` - file list panel that emits `SidebarEvent`s
/// - `surface.rs` - canvas surface: rendered frame plus pointer input
/// - `landing.rs` - start screen shown before the canvas opens

pub mod landing;
pub mod sidebar;
pub mod surface;
