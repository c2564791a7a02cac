use thiserror::Error;

use crate::device::{DeviceError, TextureHandle};

/// Configuration errors raised by the render layer.
///
/// Render-state *misuse* (drawing outside a pass, double begin, touching a
/// disposed resource) is not represented here: it is logged and ignored.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RenderError {
    #[error("shader attribute `{attribute}` has no matching mesh attribute")]
    UnresolvedAttribute { attribute: String },

    #[error("shader attribute `{attribute}` matches {candidates} mesh attributes")]
    AmbiguousAttribute { attribute: String, candidates: usize },

    #[error("shader `{shader}` has no uniform `{name}`")]
    MissingUniform { shader: String, name: String },

    #[error("texture unit {unit} is occupied by texture {occupant:?}")]
    UnitOccupied { unit: u32, occupant: TextureHandle },

    #[error("texture unit {unit} out of range ({available} units available)")]
    UnitOutOfRange { unit: u32, available: u32 },

    #[error("invalid mesh: {0}")]
    InvalidMesh(String),

    #[error(transparent)]
    Device(#[from] DeviceError),
}
