//! The retained component tree.
//!
//! Components live in an arena addressed by generational [`ComponentId`]s.
//! Bounds are resolved lazily: getters recompute only when the component's
//! constraints, pivot or parent rectangle changed since the last call.

mod node;
mod traversal;
mod tree;

pub use node::Node;
pub use traversal::PointerInput;
pub use tree::{ComponentId, ComponentTree};
