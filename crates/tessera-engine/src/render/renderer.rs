use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::coords::Mat4;
use crate::device::{GraphicsDriver, UniformValue};
use crate::scene::{DrawQueue, ZIndex};

use super::device::{ClaimError, DrawableId, RenderDevice};
use super::error::RenderError;
use super::shader::{Shader, MODEL_UNIFORM, VIEW_PROJECTION_UNIFORM};

/// Identity of a [`FrameRenderer`], used for device pass ownership.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct RendererId(u64);

impl RendererId {
    pub(crate) fn next() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(1);
        Self(NEXT.fetch_add(1, Ordering::Relaxed))
    }
}

/// Just-in-time uniform injection, run immediately before its draw.
pub type PreRender = Box<dyn FnOnce(&mut UniformSink<'_>) -> Result<(), RenderError> + Send>;

/// The bound shader plus the driver, handed to a [`PreRender`] callback.
pub struct UniformSink<'a> {
    driver: &'a mut dyn GraphicsDriver,
    shader: &'a Shader,
}

impl UniformSink<'_> {
    #[inline]
    pub fn shader(&self) -> &Shader {
        self.shader
    }

    pub fn set(&mut self, name: &str, value: UniformValue) -> Result<(), RenderError> {
        self.shader.set_uniform(self.driver, name, value)
    }

    pub fn set_optional(&mut self, name: &str, value: UniformValue) -> bool {
        self.shader.set_optional_uniform(self.driver, name, value)
    }
}

/// Counters for one completed pass.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub struct FrameStats {
    pub submitted: usize,
    pub draws: usize,
    pub shader_binds: usize,
    pub skipped: usize,
}

struct PendingDraw {
    id: DrawableId,
    transform: Mat4,
    pre_render: Option<PreRender>,
}

impl fmt::Debug for PendingDraw {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PendingDraw")
            .field("id", &self.id)
            .field("transform", &self.transform)
            .field("pre_render", &self.pre_render.is_some())
            .finish()
    }
}

/// Collects draw requests between `begin_rendering` and `end_rendering` and
/// issues them sorted by z (descending), then by shader, then by submission.
///
/// Ordering mistakes (render outside a pass, double begin, a second renderer
/// on a busy device, a pass from a foreign thread) are logged and ignored.
#[derive(Debug)]
pub struct FrameRenderer {
    id: RendererId,
    queue: DrawQueue<PendingDraw>,
    view_projection: Mat4,
    active: bool,
}

impl Default for FrameRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameRenderer {
    pub fn new() -> Self {
        Self {
            id: RendererId::next(),
            queue: DrawQueue::new(),
            view_projection: Mat4::identity(),
            active: false,
        }
    }

    #[inline]
    pub fn id(&self) -> RendererId {
        self.id
    }

    #[inline]
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Starts a pass. Returns `false` (and does nothing) on misuse.
    pub fn begin_rendering<D: GraphicsDriver>(
        &mut self,
        device: &mut RenderDevice<D>,
        view_projection: Mat4,
    ) -> bool {
        if self.active {
            log::warn!("begin_rendering called twice without end_rendering");
            return false;
        }
        match device.claim(self.id) {
            Ok(()) => {}
            Err(ClaimError::Busy(owner)) => {
                log::error!("render device already owned by renderer {owner:?}; begin ignored");
                return false;
            }
            Err(ClaimError::WrongThread) => {
                log::error!("begin_rendering from a thread other than the render thread ignored");
                return false;
            }
        }
        self.active = true;
        self.view_projection = view_projection;
        self.queue.clear();
        true
    }

    /// Queues `drawable` with the device's current transform.
    pub fn render<D: GraphicsDriver>(
        &mut self,
        device: &RenderDevice<D>,
        drawable: DrawableId,
        z: impl Into<ZIndex>,
        pre_render: Option<PreRender>,
    ) -> bool {
        if !self.active || device.active_pass() != Some(self.id) {
            log::warn!("render called outside an active pass; request dropped");
            return false;
        }
        self.queue.push(
            z.into(),
            PendingDraw { id: drawable, transform: device.current_transform(), pre_render },
        );
        true
    }

    /// Issues every queued request and resets per-frame device state.
    ///
    /// The first configuration error aborts the remaining draws; state is
    /// reset and ownership released either way.
    pub fn end_rendering<D: GraphicsDriver>(
        &mut self,
        device: &mut RenderDevice<D>,
    ) -> Result<FrameStats, RenderError> {
        if !self.active {
            log::warn!("end_rendering without begin_rendering ignored");
            return Ok(FrameStats::default());
        }

        let pending = self
            .queue
            .drain_sorted(|p| device.shader_of(p.id).map(|s| s.handle()));
        let mut stats = FrameStats { submitted: pending.len(), ..FrameStats::default() };

        let result = pending
            .into_iter()
            .try_for_each(|p| self.issue(device, p, &mut stats));

        device.reset_frame_state();
        device.release(self.id);
        self.active = false;

        log::trace!(
            "frame: {} submitted, {} drawn, {} shader binds",
            stats.submitted,
            stats.draws,
            stats.shader_binds
        );
        result.map(|()| stats)
    }

    fn issue<D: GraphicsDriver>(
        &self,
        device: &mut RenderDevice<D>,
        pending: PendingDraw,
        stats: &mut FrameStats,
    ) -> Result<(), RenderError> {
        let Some(shader) = device.shader_of(pending.id) else {
            log::warn!("draw request for a removed drawable skipped");
            stats.skipped += 1;
            return Ok(());
        };
        if shader.is_disposed() {
            log::warn!("draw with disposed shader `{}` skipped", shader.label());
            stats.skipped += 1;
            return Ok(());
        }

        if device.bind_shader(&shader) {
            stats.shader_binds += 1;
            shader.set_optional_uniform(
                device.driver_mut(),
                VIEW_PROJECTION_UNIFORM,
                UniformValue::Mat4(self.view_projection),
            );
        }

        let Some((drawable, driver, units)) = device.drawable_with_driver(pending.id) else {
            stats.skipped += 1;
            return Ok(());
        };
        shader.set_optional_uniform(driver, MODEL_UNIFORM, UniformValue::Mat4(pending.transform));
        drawable.bind_textures(driver, units)?;
        if let Some(callback) = pending.pre_render {
            callback(&mut UniformSink { driver: &mut *driver, shader: &shader })?;
        }
        drawable.clean(driver)?;
        drawable.draw(driver);
        stats.draws += 1;
        Ok(())
    }
}
