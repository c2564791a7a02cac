use crate::coords::Viewport;
use crate::device::GraphicsDriver;
use crate::input::{InputFrame, InputState};
use crate::render::{FrameRenderer, RenderDevice};
use crate::resources::ResourceCache;
use crate::time::FrameTime;
use crate::world::World;

/// Per-tick context passed to [`App::on_update`](super::App::on_update).
pub struct UpdateCtx<'a> {
    pub input:       &'a InputState,
    pub input_frame: &'a InputFrame,
    pub time:        FrameTime,
    pub viewport:    Viewport,
    pub world:       &'a mut World,
}

/// Context passed to [`App::on_pre_render`](super::App::on_pre_render),
/// before the frame's main pass begins. Offscreen passes go here.
pub struct PreRenderCtx<'a, D: GraphicsDriver> {
    pub device:    &'a mut RenderDevice<D>,
    pub resources: &'a ResourceCache,
    pub time:      FrameTime,
    pub viewport:  Viewport,
}

/// Per-frame context passed to [`App::on_render`](super::App::on_render).
///
/// The renderer is already inside its pass; queue draws with
/// `ctx.renderer.render(ctx.device, ..)`.
pub struct FrameCtx<'a, D: GraphicsDriver> {
    pub device:    &'a mut RenderDevice<D>,
    pub renderer:  &'a mut FrameRenderer,
    pub resources: &'a ResourceCache,
    pub world:     &'a World,
    pub time:      FrameTime,
    pub viewport:  Viewport,
}
