//! Render-state tracking on top of a [`GraphicsDriver`](crate::device::GraphicsDriver).
//!
//! Convention:
//! - CPU geometry is in logical pixels (top-left origin, +Y down).
//! - Shader attributes carry the `a_` prefix; mesh attributes do not.
//! - A frame is `begin_rendering` → any number of `render` → `end_rendering`.

mod device;
mod drawable;
mod error;
mod mesh;
mod renderer;
mod shader;
mod target;
mod texture;

pub use device::{DrawableId, RenderDevice};
pub use drawable::{resolve_attributes, AttributeBinding, CleanStats, DirtyLevel, Drawable, TextureBinding};
pub use error::RenderError;
pub use mesh::{quad_vertices, Mesh, VertexAttribute};
pub use renderer::{FrameRenderer, FrameStats, PreRender, RendererId, UniformSink};
pub use shader::{Shader, ATTRIBUTE_PREFIX, MODEL_UNIFORM, VIEW_PROJECTION_UNIFORM};
pub use target::OffscreenTarget;
pub use texture::{Texture, TextureUnits};
