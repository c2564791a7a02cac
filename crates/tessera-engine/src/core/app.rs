use crate::device::GraphicsDriver;
use crate::resources::ResourceLoaded;

use super::ctx::{FrameCtx, PreRenderCtx, UpdateCtx};

/// Control directive returned by app callbacks.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum AppControl {
    Continue,
    Exit,
}

/// Application contract implemented by higher layers.
pub trait App<D: GraphicsDriver> {
    /// Called once per update tick, inside an update pass.
    fn on_update(&mut self, ctx: &mut UpdateCtx<'_>) -> AppControl;

    /// Called once per rendered frame, before the main pass begins.
    fn on_pre_render(&mut self, ctx: &mut PreRenderCtx<'_, D>) {
        let _ = ctx;
    }

    /// Called once per rendered frame, between `begin_rendering` and
    /// `end_rendering`.
    fn on_render(&mut self, ctx: &mut FrameCtx<'_, D>) -> AppControl;

    /// Called for each queued resource that finished loading this frame.
    fn on_resource_loaded(&mut self, loaded: &ResourceLoaded) {
        let _ = loaded;
    }
}
