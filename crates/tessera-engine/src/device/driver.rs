use crate::coords::Mat4;

use super::error::DeviceError;
use super::handle::{
    BufferHandle, BufferKind, LayoutHandle, ShaderHandle, TargetHandle, TextureHandle,
};

/// Vertex + fragment source pair handed to the driver for compilation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShaderSource {
    pub vertex: String,
    pub fragment: String,
}

impl ShaderSource {
    pub fn new(vertex: impl Into<String>, fragment: impl Into<String>) -> Self {
        Self { vertex: vertex.into(), fragment: fragment.into() }
    }
}

/// An input attribute declared by a vertex shader.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReflectedAttribute {
    pub name: String,
    pub location: u32,
    /// Number of float components (1..=4).
    pub components: u8,
}

/// A uniform declared by either shader stage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReflectedUniform {
    pub name: String,
    pub location: u32,
}

/// Result of a successful compile + link, with reflection data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledShader {
    pub handle: ShaderHandle,
    pub attributes: Vec<ReflectedAttribute>,
    pub uniforms: Vec<ReflectedUniform>,
}

/// Values accepted by [`GraphicsDriver::set_uniform`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum UniformValue {
    Float(f32),
    Vec2([f32; 2]),
    Vec4([f32; 4]),
    Mat4(Mat4),
    /// Sampler uniform set to a texture unit index.
    Sampler(u32),
}

/// Narrow interface over the graphics-driver binding.
///
/// The engine never calls the platform API directly; everything goes through
/// this trait so that the render-state tracking above it is testable with
/// [`RecordingDriver`](super::RecordingDriver).
///
/// All methods must be called from the render thread.
pub trait GraphicsDriver: Send {
    fn create_buffer(&mut self, kind: BufferKind, data: &[u8]) -> BufferHandle;
    fn bind_buffer(&mut self, kind: BufferKind, handle: BufferHandle);
    /// Overwrites the contents of an existing buffer, reallocating if `data`
    /// is larger than the current storage.
    fn update_buffer_contents(&mut self, kind: BufferKind, handle: BufferHandle, data: &[u8]);
    fn delete_buffer(&mut self, handle: BufferHandle);

    fn create_vertex_layout(&mut self) -> LayoutHandle;
    fn bind_vertex_layout(&mut self, handle: LayoutHandle);
    /// Points attribute `location` of the bound layout at the bound vertex
    /// buffer. `stride` and `offset` are in bytes.
    fn set_attribute_pointer(&mut self, location: u32, components: u8, stride: usize, offset: usize);
    fn delete_vertex_layout(&mut self, handle: LayoutHandle);

    /// Draws `index_count` indices from `index_buffer` as triangles using the
    /// bound layout and shader.
    fn draw(&mut self, index_buffer: BufferHandle, index_count: usize);

    fn compile_shader(&mut self, source: &ShaderSource) -> Result<CompiledShader, DeviceError>;
    fn bind_shader(&mut self, handle: ShaderHandle);
    fn set_uniform(&mut self, shader: ShaderHandle, location: u32, value: UniformValue);
    fn delete_shader(&mut self, handle: ShaderHandle);

    fn upload_texture(&mut self, pixels: &[u8], width: u32, height: u32)
        -> Result<TextureHandle, DeviceError>;
    fn assign_texture_unit(&mut self, handle: TextureHandle, unit: u32);
    fn delete_texture(&mut self, handle: TextureHandle);

    /// Creates an offscreen target together with the texture it renders into.
    fn create_render_target(&mut self, width: u32, height: u32)
        -> Result<(TargetHandle, TextureHandle), DeviceError>;
    /// Binds `target`, or the default surface when `None`.
    fn bind_render_target(&mut self, target: Option<TargetHandle>);
    fn clear(&mut self, rgba: [f32; 4]);
    fn delete_render_target(&mut self, handle: TargetHandle);

    /// Number of hardware texture units.
    fn max_texture_units(&self) -> u32;
}
