use std::collections::HashMap;

use super::driver::{
    CompiledShader, GraphicsDriver, ReflectedAttribute, ReflectedUniform, ShaderSource,
    UniformValue,
};
use super::error::DeviceError;
use super::handle::{
    BufferHandle, BufferKind, LayoutHandle, ShaderHandle, TargetHandle, TextureHandle,
};

/// One call made against a [`RecordingDriver`].
#[derive(Debug, Clone, PartialEq)]
pub enum DriverCall {
    CreateBuffer(BufferKind, BufferHandle, usize),
    BindBuffer(BufferKind, BufferHandle),
    UpdateBuffer(BufferKind, BufferHandle, usize),
    DeleteBuffer(BufferHandle),
    CreateLayout(LayoutHandle),
    BindLayout(LayoutHandle),
    AttributePointer { location: u32, components: u8, stride: usize, offset: usize },
    DeleteLayout(LayoutHandle),
    Draw { index_buffer: BufferHandle, index_count: usize },
    CompileShader(ShaderHandle),
    BindShader(ShaderHandle),
    SetUniform(ShaderHandle, u32, UniformValue),
    DeleteShader(ShaderHandle),
    UploadTexture(TextureHandle, u32, u32),
    AssignTextureUnit(TextureHandle, u32),
    DeleteTexture(TextureHandle),
    CreateTarget(TargetHandle, TextureHandle),
    BindTarget(Option<TargetHandle>),
    Clear([f32; 4]),
    DeleteTarget(TargetHandle),
}

/// Headless driver that records every call instead of talking to a GPU.
///
/// Used by tests and by the headless demo. Shader reflection understands the
/// GLSL declaration forms `in <type> <name>;`, `attribute <type> <name>;` and
/// `uniform <type> <name>;`; a source containing `#error` fails to compile.
#[derive(Debug)]
pub struct RecordingDriver {
    calls: Vec<DriverCall>,
    next_handle: u32,
    buffers: HashMap<BufferHandle, Vec<u8>>,
    texture_units: u32,
}

impl Default for RecordingDriver {
    fn default() -> Self {
        Self::new(16)
    }
}

impl RecordingDriver {
    pub fn new(texture_units: u32) -> Self {
        Self { calls: Vec::new(), next_handle: 1, buffers: HashMap::new(), texture_units }
    }

    pub fn calls(&self) -> &[DriverCall] {
        &self.calls
    }

    /// Returns and clears the recorded calls.
    pub fn take_calls(&mut self) -> Vec<DriverCall> {
        std::mem::take(&mut self.calls)
    }

    /// Current bytes of a live buffer.
    pub fn buffer_contents(&self, handle: BufferHandle) -> Option<&[u8]> {
        self.buffers.get(&handle).map(Vec::as_slice)
    }

    pub fn live_buffers(&self) -> usize {
        self.buffers.len()
    }

    pub fn count(&self, pred: impl Fn(&DriverCall) -> bool) -> usize {
        self.calls.iter().filter(|c| pred(c)).count()
    }

    fn next(&mut self) -> u32 {
        let h = self.next_handle;
        self.next_handle += 1;
        h
    }
}

fn components_of(ty: &str) -> Option<u8> {
    match ty {
        "float" => Some(1),
        "vec2" => Some(2),
        "vec3" => Some(3),
        "vec4" => Some(4),
        _ => None,
    }
}

/// Splits `qualifier type name;` declarations out of a GLSL-like source.
fn declarations<'s>(src: &'s str, qualifiers: &'s [&'s str]) -> impl Iterator<Item = (&'s str, &'s str)> + 's {
    src.lines().filter_map(move |line| {
        let line = line.trim();
        // Drop a leading `layout(...)` qualifier if present.
        let line = match line.strip_prefix("layout") {
            Some(rest) => rest.split_once(')').map_or(rest, |(_, after)| after).trim(),
            None => line,
        };
        let decl = line.strip_suffix(';')?;
        let mut words = decl.split_whitespace();
        let qualifier = words.next()?;
        if !qualifiers.contains(&qualifier) {
            return None;
        }
        let ty = words.next()?;
        let name = words.next()?;
        Some((ty, name))
    })
}

impl GraphicsDriver for RecordingDriver {
    fn create_buffer(&mut self, kind: BufferKind, data: &[u8]) -> BufferHandle {
        let handle = BufferHandle(self.next());
        self.buffers.insert(handle, data.to_vec());
        self.calls.push(DriverCall::CreateBuffer(kind, handle, data.len()));
        handle
    }

    fn bind_buffer(&mut self, kind: BufferKind, handle: BufferHandle) {
        self.calls.push(DriverCall::BindBuffer(kind, handle));
    }

    fn update_buffer_contents(&mut self, kind: BufferKind, handle: BufferHandle, data: &[u8]) {
        self.buffers.insert(handle, data.to_vec());
        self.calls.push(DriverCall::UpdateBuffer(kind, handle, data.len()));
    }

    fn delete_buffer(&mut self, handle: BufferHandle) {
        self.buffers.remove(&handle);
        self.calls.push(DriverCall::DeleteBuffer(handle));
    }

    fn create_vertex_layout(&mut self) -> LayoutHandle {
        let handle = LayoutHandle(self.next());
        self.calls.push(DriverCall::CreateLayout(handle));
        handle
    }

    fn bind_vertex_layout(&mut self, handle: LayoutHandle) {
        self.calls.push(DriverCall::BindLayout(handle));
    }

    fn set_attribute_pointer(&mut self, location: u32, components: u8, stride: usize, offset: usize) {
        self.calls.push(DriverCall::AttributePointer { location, components, stride, offset });
    }

    fn delete_vertex_layout(&mut self, handle: LayoutHandle) {
        self.calls.push(DriverCall::DeleteLayout(handle));
    }

    fn draw(&mut self, index_buffer: BufferHandle, index_count: usize) {
        self.calls.push(DriverCall::Draw { index_buffer, index_count });
    }

    fn compile_shader(&mut self, source: &ShaderSource) -> Result<CompiledShader, DeviceError> {
        if source.vertex.trim().is_empty() || source.fragment.trim().is_empty() {
            return Err(DeviceError::ShaderCompile("empty shader stage".into()));
        }
        if source.vertex.contains("#error") || source.fragment.contains("#error") {
            return Err(DeviceError::ShaderCompile("#error directive".into()));
        }

        let mut attributes = Vec::new();
        for (ty, name) in declarations(&source.vertex, &["in", "attribute"]) {
            let components = components_of(ty)
                .ok_or_else(|| DeviceError::ShaderCompile(format!("unsupported attribute type {ty}")))?;
            let location = attributes.len() as u32;
            attributes.push(ReflectedAttribute { name: name.to_string(), location, components });
        }

        let mut uniforms: Vec<ReflectedUniform> = Vec::new();
        for src in [&source.vertex, &source.fragment] {
            for (_, name) in declarations(src, &["uniform"]) {
                if uniforms.iter().any(|u| u.name == name) {
                    continue;
                }
                let location = uniforms.len() as u32;
                uniforms.push(ReflectedUniform { name: name.to_string(), location });
            }
        }

        let handle = ShaderHandle(self.next());
        self.calls.push(DriverCall::CompileShader(handle));
        Ok(CompiledShader { handle, attributes, uniforms })
    }

    fn bind_shader(&mut self, handle: ShaderHandle) {
        self.calls.push(DriverCall::BindShader(handle));
    }

    fn set_uniform(&mut self, shader: ShaderHandle, location: u32, value: UniformValue) {
        self.calls.push(DriverCall::SetUniform(shader, location, value));
    }

    fn delete_shader(&mut self, handle: ShaderHandle) {
        self.calls.push(DriverCall::DeleteShader(handle));
    }

    fn upload_texture(&mut self, pixels: &[u8], width: u32, height: u32)
        -> Result<TextureHandle, DeviceError>
    {
        let expected = width as usize * height as usize * 4;
        if pixels.len() != expected {
            return Err(DeviceError::TextureUpload { width, height, len: pixels.len() });
        }
        let handle = TextureHandle(self.next());
        self.calls.push(DriverCall::UploadTexture(handle, width, height));
        Ok(handle)
    }

    fn assign_texture_unit(&mut self, handle: TextureHandle, unit: u32) {
        self.calls.push(DriverCall::AssignTextureUnit(handle, unit));
    }

    fn delete_texture(&mut self, handle: TextureHandle) {
        self.calls.push(DriverCall::DeleteTexture(handle));
    }

    fn create_render_target(&mut self, width: u32, height: u32)
        -> Result<(TargetHandle, TextureHandle), DeviceError>
    {
        if width == 0 || height == 0 {
            return Err(DeviceError::RenderTarget(format!("zero-sized target {width}x{height}")));
        }
        let target = TargetHandle(self.next());
        let texture = TextureHandle(self.next());
        self.calls.push(DriverCall::CreateTarget(target, texture));
        Ok((target, texture))
    }

    fn bind_render_target(&mut self, target: Option<TargetHandle>) {
        self.calls.push(DriverCall::BindTarget(target));
    }

    fn clear(&mut self, rgba: [f32; 4]) {
        self.calls.push(DriverCall::Clear(rgba));
    }

    fn delete_render_target(&mut self, handle: TargetHandle) {
        self.calls.push(DriverCall::DeleteTarget(handle));
    }

    fn max_texture_units(&self) -> u32 {
        self.texture_units
    }
}
