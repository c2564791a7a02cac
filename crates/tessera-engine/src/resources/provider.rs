use crate::device::ShaderSource;

use super::ResourceError;

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum ResourceKind {
    Texture,
    Shader,
    Font,
    Sound,
}

/// Font file contents. Glyph meshing happens outside the engine.
#[derive(Debug, Clone, PartialEq)]
pub struct FontData {
    pub family: String,
    pub bytes: Vec<u8>,
}

/// Decoded PCM samples, interleaved by channel.
#[derive(Debug, Clone, PartialEq)]
pub struct SoundData {
    pub sample_rate: u32,
    pub channels: u16,
    pub samples: Vec<f32>,
}

/// A decoded resource, ready to upload.
#[derive(Debug, Clone)]
pub enum ResourceData {
    /// Straight RGBA8 pixels, `width * height * 4` bytes.
    Texture { pixels: Vec<u8>, width: u32, height: u32 },
    Shader(ShaderSource),
    Font(FontData),
    Sound(SoundData),
}

impl ResourceData {
    pub fn kind(&self) -> ResourceKind {
        match self {
            ResourceData::Texture { .. } => ResourceKind::Texture,
            ResourceData::Shader(_) => ResourceKind::Shader,
            ResourceData::Font(_) => ResourceKind::Font,
            ResourceData::Sound(_) => ResourceKind::Sound,
        }
    }
}

/// Decodes resources by key. Implemented by the host (files, archives,
/// embedded assets).
pub trait ResourceProvider: Send {
    fn load(&self, key: &str, kind: ResourceKind) -> Result<ResourceData, ResourceError>;
}
