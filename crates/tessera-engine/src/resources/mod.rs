//! Keyed textures, shaders, fonts and sounds.
//!
//! Decoding is delegated to a [`ResourceProvider`]. Requests are queued from
//! any thread and drained once per frame on the thread that owns the driver.

mod cache;
mod error;
mod provider;

pub use cache::{ResourceCache, ResourceLoaded, ResourceRequester};
pub use error::ResourceError;
pub use provider::{FontData, ResourceData, ResourceKind, ResourceProvider, SoundData};
