use thiserror::Error;

/// Failures reported by a [`GraphicsDriver`](super::GraphicsDriver).
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DeviceError {
    #[error("shader compilation failed: {0}")]
    ShaderCompile(String),

    #[error("texture upload failed: {width}x{height} with {len} bytes of pixels")]
    TextureUpload { width: u32, height: u32, len: usize },

    #[error("render target creation failed: {0}")]
    RenderTarget(String),
}
