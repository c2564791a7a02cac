//! Dirty-tracked drawables.
//!
//! A [`Drawable`] pairs a [`Mesh`] with a [`Shader`] (and optional textures)
//! and owns the driver objects that feed them to the GPU. Changes are not
//! pushed to the driver immediately; they raise a [`DirtyLevel`] and the
//! renderer calls [`Drawable::clean`] right before the draw call.
//!
//! The levels are nested: a mesh rebuild re-resolves attributes and rewrites
//! buffer contents, a shader rebind rewrites buffer contents. Cleaning runs
//! only the path of the highest level set.

use std::sync::Arc;

use crate::device::{BufferHandle, BufferKind, GraphicsDriver, LayoutHandle};

use super::error::RenderError;
use super::mesh::Mesh;
use super::shader::{Shader, ATTRIBUTE_PREFIX};
use super::texture::{Texture, TextureUnits};

/// How much driver-side state is stale. Ordered: `Mesh ⊇ Shader ⊇ Data`.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Default)]
pub enum DirtyLevel {
    #[default]
    Clean,
    /// Vertex contents changed; buffer overwrite only.
    Data,
    /// Shader changed; re-resolve attributes and pointers, reuse buffers.
    Shader,
    /// Topology or attribute set changed; rebuild everything.
    Mesh,
}

/// Instrumentation counters: how many times each clean path ran.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub struct CleanStats {
    pub mesh_rebuilds: u64,
    pub shader_rebinds: u64,
    pub data_uploads: u64,
}

/// Where one shader attribute reads from inside the interleaved vertex.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct AttributeBinding {
    pub location: u32,
    pub components: u8,
    pub offset: usize,
}

#[derive(Debug)]
struct GpuBuffers {
    layout: LayoutHandle,
    vertex: BufferHandle,
    index: BufferHandle,
    index_count: usize,
}

/// A texture bound to a sampler uniform for every draw of a drawable.
#[derive(Debug, Clone)]
pub struct TextureBinding {
    pub uniform: String,
    pub texture: Arc<Texture>,
}

/// Matches every shader attribute against the mesh attributes.
///
/// `a_<name>` must match exactly one mesh attribute called `<name>`.
pub fn resolve_attributes(mesh: &Mesh, shader: &Shader) -> Result<Vec<AttributeBinding>, RenderError> {
    shader
        .attributes()
        .iter()
        .map(|attr| {
            let unresolved = || RenderError::UnresolvedAttribute { attribute: attr.name.clone() };
            let wanted = attr.name.strip_prefix(ATTRIBUTE_PREFIX).ok_or_else(unresolved)?;
            let mut matches = mesh.attribute_offsets(wanted);
            let (offset, found) = matches.next().ok_or_else(unresolved)?;
            let extra = matches.count();
            if extra > 0 {
                return Err(RenderError::AmbiguousAttribute {
                    attribute: attr.name.clone(),
                    candidates: extra + 1,
                });
            }
            Ok(AttributeBinding { location: attr.location, components: found.components, offset })
        })
        .collect()
}

#[derive(Debug)]
pub struct Drawable {
    label: String,
    mesh: Mesh,
    shader: Arc<Shader>,
    textures: Vec<TextureBinding>,
    dirty: DirtyLevel,
    gpu: Option<GpuBuffers>,
    bindings: Vec<AttributeBinding>,
    stats: CleanStats,
    disposed: bool,
}

impl Drawable {
    /// New drawables start mesh-dirty: nothing exists on the driver yet.
    pub fn new(label: impl Into<String>, mesh: Mesh, shader: Arc<Shader>) -> Self {
        Self {
            label: label.into(),
            mesh,
            shader,
            textures: Vec::new(),
            dirty: DirtyLevel::Mesh,
            gpu: None,
            bindings: Vec::new(),
            stats: CleanStats::default(),
            disposed: false,
        }
    }

    #[inline]
    pub fn label(&self) -> &str {
        &self.label
    }

    #[inline]
    pub fn mesh(&self) -> &Mesh {
        &self.mesh
    }

    #[inline]
    pub fn shader(&self) -> &Arc<Shader> {
        &self.shader
    }

    #[inline]
    pub fn textures(&self) -> &[TextureBinding] {
        &self.textures
    }

    #[inline]
    pub fn dirty_level(&self) -> DirtyLevel {
        self.dirty
    }

    /// Whether `level` (and therefore every level below it) needs work.
    #[inline]
    pub fn is_dirty(&self, level: DirtyLevel) -> bool {
        level != DirtyLevel::Clean && self.dirty >= level
    }

    #[inline]
    pub fn stats(&self) -> CleanStats {
        self.stats
    }

    #[inline]
    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    /// Raises the dirty level; never lowers it.
    #[inline]
    pub fn mark(&mut self, level: DirtyLevel) {
        self.dirty = self.dirty.max(level);
    }

    /// Replaces the mesh. Same shape → data-dirty, otherwise mesh-dirty.
    pub fn set_mesh(&mut self, mesh: Mesh) {
        let level = if self.mesh.same_shape(&mesh) { DirtyLevel::Data } else { DirtyLevel::Mesh };
        self.mesh = mesh;
        self.mark(level);
    }

    /// Replaces vertex contents only.
    pub fn set_vertices(&mut self, vertices: Vec<f32>) -> Result<(), RenderError> {
        self.mesh.set_vertices(vertices)?;
        self.mark(DirtyLevel::Data);
        Ok(())
    }

    pub fn set_shader(&mut self, shader: Arc<Shader>) {
        if shader.handle() == self.shader.handle() {
            return;
        }
        self.shader = shader;
        self.mark(DirtyLevel::Shader);
    }

    /// Binds `texture` to the sampler uniform `uniform` for every draw.
    /// Units are assigned per draw, so this does not dirty the drawable.
    pub fn set_texture(&mut self, uniform: impl Into<String>, texture: Arc<Texture>) {
        let uniform = uniform.into();
        match self.textures.iter_mut().find(|t| t.uniform == uniform) {
            Some(existing) => existing.texture = texture,
            None => self.textures.push(TextureBinding { uniform, texture }),
        }
    }

    pub fn clear_textures(&mut self) {
        self.textures.clear();
    }

    /// Brings driver state up to date, running only the highest dirty path.
    /// Returns the level that was executed.
    pub fn clean(&mut self, driver: &mut dyn GraphicsDriver) -> Result<DirtyLevel, RenderError> {
        if self.disposed {
            log::warn!("clean of disposed drawable `{}` ignored", self.label);
            return Ok(DirtyLevel::Clean);
        }

        // Without buffers there is nothing to overwrite; any level rebuilds.
        let level = match (self.dirty, self.gpu.is_some()) {
            (DirtyLevel::Clean, _) => return Ok(DirtyLevel::Clean),
            (_, false) => DirtyLevel::Mesh,
            (level, true) => level,
        };

        match level {
            DirtyLevel::Mesh => self.rebuild(driver)?,
            DirtyLevel::Shader => self.rebind(driver)?,
            DirtyLevel::Data => self.upload(driver),
            DirtyLevel::Clean => {}
        }

        self.dirty = DirtyLevel::Clean;
        Ok(level)
    }

    fn rebuild(&mut self, driver: &mut dyn GraphicsDriver) -> Result<(), RenderError> {
        let bindings = resolve_attributes(&self.mesh, &self.shader)?;

        if let Some(old) = self.gpu.take() {
            release(driver, &old);
        }

        let layout = driver.create_vertex_layout();
        driver.bind_vertex_layout(layout);
        let vertex = driver.create_buffer(BufferKind::Vertex, self.mesh.vertex_bytes());
        driver.bind_buffer(BufferKind::Vertex, vertex);
        let index = driver.create_buffer(BufferKind::Index, self.mesh.index_bytes());
        driver.bind_buffer(BufferKind::Index, index);
        self.point_attributes(driver, &bindings);

        self.gpu = Some(GpuBuffers { layout, vertex, index, index_count: self.mesh.index_count() });
        self.bindings = bindings;
        self.stats.mesh_rebuilds += 1;
        log::trace!("drawable `{}` rebuilt", self.label);
        Ok(())
    }

    fn rebind(&mut self, driver: &mut dyn GraphicsDriver) -> Result<(), RenderError> {
        let bindings = resolve_attributes(&self.mesh, &self.shader)?;
        let Some(gpu) = &self.gpu else { return Ok(()) };

        driver.bind_vertex_layout(gpu.layout);
        driver.bind_buffer(BufferKind::Vertex, gpu.vertex);
        driver.update_buffer_contents(BufferKind::Vertex, gpu.vertex, self.mesh.vertex_bytes());
        driver.bind_buffer(BufferKind::Index, gpu.index);
        driver.update_buffer_contents(BufferKind::Index, gpu.index, self.mesh.index_bytes());
        self.point_attributes(driver, &bindings);

        self.bindings = bindings;
        self.stats.shader_rebinds += 1;
        Ok(())
    }

    fn upload(&mut self, driver: &mut dyn GraphicsDriver) {
        let Some(gpu) = &self.gpu else { return };
        driver.update_buffer_contents(BufferKind::Vertex, gpu.vertex, self.mesh.vertex_bytes());
        driver.update_buffer_contents(BufferKind::Index, gpu.index, self.mesh.index_bytes());
        self.stats.data_uploads += 1;
    }

    fn point_attributes(&self, driver: &mut dyn GraphicsDriver, bindings: &[AttributeBinding]) {
        let stride = self.mesh.stride_bytes();
        for b in bindings {
            driver.set_attribute_pointer(b.location, b.components, stride, b.offset);
        }
    }

    /// Attribute bindings resolved by the last rebuild or rebind.
    #[inline]
    pub fn attribute_bindings(&self) -> &[AttributeBinding] {
        &self.bindings
    }

    /// Assigns this drawable's textures to consecutive units starting at 0
    /// and points their sampler uniforms at them. Expects the shader bound.
    pub fn bind_textures(
        &self,
        driver: &mut dyn GraphicsDriver,
        units: &mut TextureUnits,
    ) -> Result<(), RenderError> {
        for (unit, binding) in self.textures.iter().enumerate() {
            let unit = unit as u32;
            binding.texture.bind(units, driver, unit)?;
            self.shader.set_uniform(driver, &binding.uniform, crate::device::UniformValue::Sampler(unit))?;
        }
        Ok(())
    }

    /// Issues the draw call. Expects [`clean`](Self::clean) to have run.
    pub fn draw(&self, driver: &mut dyn GraphicsDriver) {
        if self.disposed {
            log::warn!("draw of disposed drawable `{}` ignored", self.label);
            return;
        }
        match &self.gpu {
            Some(gpu) if self.dirty == DirtyLevel::Clean => {
                driver.bind_vertex_layout(gpu.layout);
                driver.draw(gpu.index, gpu.index_count);
            }
            _ => log::warn!("draw of uncleaned drawable `{}` ignored", self.label),
        }
    }

    /// Releases driver buffers. Safe to call more than once.
    pub fn dispose(&mut self, driver: &mut dyn GraphicsDriver) {
        if self.disposed {
            return;
        }
        self.disposed = true;
        if let Some(gpu) = self.gpu.take() {
            release(driver, &gpu);
        }
    }
}

fn release(driver: &mut dyn GraphicsDriver, gpu: &GpuBuffers) {
    driver.delete_buffer(gpu.vertex);
    driver.delete_buffer(gpu.index);
    driver.delete_vertex_layout(gpu.layout);
}
