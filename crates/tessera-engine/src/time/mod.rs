//! Time subsystem.
//!
//! One `FrameClock` per loop (update thread, render thread); call `tick()`
//! once per pass to obtain `FrameTime`.

mod frame_clock;

pub use frame_clock::{FrameClock, FrameTime};
