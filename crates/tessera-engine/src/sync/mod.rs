//! Cross-thread pass coordination.

mod gate;

pub use gate::{PassGuard, PassKind, RenderGate};
