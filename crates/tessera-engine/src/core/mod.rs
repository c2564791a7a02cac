//! Core engine-facing contracts.
//!
//! [`EngineCtx`] is the one owner of engine state (render device, resources,
//! world, clocks, gate). It is built once at startup and passed by reference;
//! there are no engine globals. One host loop drives it with `update_frame`
//! and `render_frame`. Work on other threads (loaders, simulation) runs its
//! own passes through the handle from [`EngineCtx::gate`], which the
//! engine's frames then wait on.

mod app;
mod ctx;
mod engine;

pub use app::{App, AppControl};
pub use ctx::{FrameCtx, PreRenderCtx, UpdateCtx};
pub use engine::EngineCtx;
