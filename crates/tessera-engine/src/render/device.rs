use std::sync::Arc;
use std::thread::{self, ThreadId};

use crate::coords::Mat4;
use crate::device::{GraphicsDriver, ShaderHandle};

use super::drawable::Drawable;
use super::renderer::RendererId;
use super::shader::Shader;
use super::texture::TextureUnits;

/// Stable reference to a drawable stored in a [`RenderDevice`].
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct DrawableId {
    index: u32,
    generation: u32,
}

#[derive(Debug)]
struct DrawableSlot {
    generation: u32,
    drawable: Option<Drawable>,
}

/// Why a renderer could not take the device for a pass.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub(crate) enum ClaimError {
    Busy(RendererId),
    WrongThread,
}

/// The single owner of the graphics context.
///
/// Holds the driver, every live [`Drawable`], the texture units and the
/// per-frame state a pass mutates (bound shader, transform stack). At most
/// one [`FrameRenderer`](super::FrameRenderer) may own the device at a time,
/// and only from the thread that ran the first pass.
#[derive(Debug)]
pub struct RenderDevice<D: GraphicsDriver> {
    driver: D,
    drawables: Vec<DrawableSlot>,
    free: Vec<u32>,
    units: TextureUnits,
    bound_shader: Option<ShaderHandle>,
    transforms: Vec<Mat4>,
    active_pass: Option<RendererId>,
    render_thread: Option<ThreadId>,
}

impl<D: GraphicsDriver> RenderDevice<D> {
    /// `max_texture_units` caps the driver-reported unit count.
    pub fn new(driver: D, max_texture_units: Option<u32>) -> Self {
        let reported = driver.max_texture_units();
        let units = max_texture_units.map_or(reported, |cap| cap.min(reported));
        log::debug!("render device created with {units} texture units");
        Self {
            driver,
            drawables: Vec::new(),
            free: Vec::new(),
            units: TextureUnits::new(units),
            bound_shader: None,
            transforms: Vec::new(),
            active_pass: None,
            render_thread: None,
        }
    }

    #[inline]
    pub fn driver(&self) -> &D {
        &self.driver
    }

    #[inline]
    pub fn driver_mut(&mut self) -> &mut D {
        &mut self.driver
    }

    #[inline]
    pub fn texture_units(&self) -> &TextureUnits {
        &self.units
    }

    /// Driver and texture units borrowed together.
    #[inline]
    pub fn driver_and_units(&mut self) -> (&mut D, &mut TextureUnits) {
        (&mut self.driver, &mut self.units)
    }

    // ── drawables ─────────────────────────────────────────────────────────

    pub fn insert(&mut self, drawable: Drawable) -> DrawableId {
        match self.free.pop() {
            Some(index) => {
                let slot = &mut self.drawables[index as usize];
                slot.drawable = Some(drawable);
                DrawableId { index, generation: slot.generation }
            }
            None => {
                let index = self.drawables.len() as u32;
                self.drawables.push(DrawableSlot { generation: 0, drawable: Some(drawable) });
                DrawableId { index, generation: 0 }
            }
        }
    }

    pub fn get(&self, id: DrawableId) -> Option<&Drawable> {
        self.drawables
            .get(id.index as usize)
            .filter(|s| s.generation == id.generation)
            .and_then(|s| s.drawable.as_ref())
    }

    pub fn get_mut(&mut self, id: DrawableId) -> Option<&mut Drawable> {
        self.drawables
            .get_mut(id.index as usize)
            .filter(|s| s.generation == id.generation)
            .and_then(|s| s.drawable.as_mut())
    }

    /// Disposes and frees a drawable. Stale ids are ignored.
    pub fn remove(&mut self, id: DrawableId) {
        let Some(slot) = self
            .drawables
            .get_mut(id.index as usize)
            .filter(|s| s.generation == id.generation)
        else {
            return;
        };
        if let Some(mut drawable) = slot.drawable.take() {
            drawable.dispose(&mut self.driver);
            slot.generation = slot.generation.wrapping_add(1);
            self.free.push(id.index);
        }
    }

    pub fn live_drawables(&self) -> usize {
        self.drawables.iter().filter(|s| s.drawable.is_some()).count()
    }

    // ── per-frame state ───────────────────────────────────────────────────

    /// Pushes `m` composed with the current transform.
    pub fn push_transform(&mut self, m: Mat4) {
        let top = self.current_transform();
        self.transforms.push(top * m);
    }

    pub fn pop_transform(&mut self) {
        if self.transforms.pop().is_none() {
            log::warn!("pop_transform on an empty transform stack ignored");
        }
    }

    pub fn current_transform(&self) -> Mat4 {
        self.transforms.last().copied().unwrap_or_default()
    }

    #[inline]
    pub fn bound_shader(&self) -> Option<ShaderHandle> {
        self.bound_shader
    }

    /// Binds `shader` unless it already is. Returns whether a bind happened.
    pub fn bind_shader(&mut self, shader: &Shader) -> bool {
        if self.bound_shader == Some(shader.handle()) {
            return false;
        }
        if shader.is_disposed() {
            log::warn!("bind of disposed shader `{}` ignored", shader.label());
            return false;
        }
        self.driver.bind_shader(shader.handle());
        self.bound_shader = Some(shader.handle());
        true
    }

    /// Resets bound shader, texture units and the transform stack.
    pub fn reset_frame_state(&mut self) {
        self.bound_shader = None;
        self.units.reset();
        self.transforms.clear();
    }

    /// Shader program of a drawable, for grouping.
    pub(crate) fn shader_of(&self, id: DrawableId) -> Option<Arc<Shader>> {
        self.get(id).map(|d| Arc::clone(d.shader()))
    }

    /// Splits the borrow so a drawable can be cleaned and drawn with the
    /// driver and texture units.
    pub(crate) fn drawable_with_driver(
        &mut self,
        id: DrawableId,
    ) -> Option<(&mut Drawable, &mut D, &mut TextureUnits)> {
        let drawable = self
            .drawables
            .get_mut(id.index as usize)
            .filter(|s| s.generation == id.generation)
            .and_then(|s| s.drawable.as_mut())?;
        Some((drawable, &mut self.driver, &mut self.units))
    }

    // ── pass ownership ────────────────────────────────────────────────────

    pub(crate) fn claim(&mut self, renderer: RendererId) -> Result<(), ClaimError> {
        let current = thread::current().id();
        match self.render_thread {
            Some(t) if t != current => return Err(ClaimError::WrongThread),
            Some(_) => {}
            None => self.render_thread = Some(current),
        }
        match self.active_pass {
            Some(owner) => Err(ClaimError::Busy(owner)),
            None => {
                self.active_pass = Some(renderer);
                Ok(())
            }
        }
    }

    pub(crate) fn release(&mut self, renderer: RendererId) {
        if self.active_pass == Some(renderer) {
            self.active_pass = None;
        }
    }

    #[inline]
    pub fn active_pass(&self) -> Option<RendererId> {
        self.active_pass
    }

    /// Disposes every drawable. The driver itself is dropped with the device.
    pub fn shutdown(&mut self) {
        for slot in &mut self.drawables {
            if let Some(mut d) = slot.drawable.take() {
                d.dispose(&mut self.driver);
            }
        }
        self.drawables.clear();
        self.free.clear();
        self.reset_frame_state();
    }
}
