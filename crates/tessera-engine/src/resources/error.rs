use thiserror::Error;

use crate::render::RenderError;

use super::ResourceKind;

#[derive(Debug, Error)]
pub enum ResourceError {
    #[error("resource `{0}` not found")]
    NotFound(String),
    #[error("resource `{key}` is a {found:?}, expected {expected:?}")]
    KindMismatch { key: String, expected: ResourceKind, found: ResourceKind },
    #[error("resource `{key}` could not be decoded: {reason}")]
    Decode { key: String, reason: String },
    #[error("resource `{key}` could not be uploaded: {source}")]
    Upload {
        key: String,
        #[source]
        source: RenderError,
    },
}
