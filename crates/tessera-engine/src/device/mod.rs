//! Graphics driver boundary.
//!
//! This module is responsible for:
//! - the [`GraphicsDriver`] trait the rest of the engine talks to
//! - the opaque handle types the driver hands out
//! - a [`RecordingDriver`] for headless runs and tests

mod driver;
mod error;
mod handle;
mod recording;

pub use driver::{
    CompiledShader, GraphicsDriver, ReflectedAttribute, ReflectedUniform, ShaderSource,
    UniformValue,
};
pub use error::DeviceError;
pub use handle::{BufferHandle, BufferKind, LayoutHandle, ShaderHandle, TargetHandle, TextureHandle};
pub use recording::{DriverCall, RecordingDriver};
