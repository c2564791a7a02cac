//! Coordinate and geometry types shared by the renderer, the UI layout engine
//! and the world.
//!
//! Canonical layout space:
//! - pixels
//! - origin top-left
//! - +X right, +Y down
//!
//! Renderers map layout space to clip space through a view-projection
//! [`Mat4`], usually [`Mat4::ortho`] over the target size.

mod color;
mod mat4;
mod rect;
mod vec2;
mod viewport;

pub use color::Color;
pub use mat4::Mat4;
pub use rect::Rect;
pub use vec2::Vec2;
pub use viewport::Viewport;
