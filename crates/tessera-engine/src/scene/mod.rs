//! Draw-request queue types.
//!
//! Responsibilities:
//! - queue per-frame draw requests with their z-index
//! - provide deterministic issue order (z descending, shader, submission)

mod key;
mod list;
mod z_index;

pub use key::SortKey;
pub use list::{DrawQueue, QueuedItem};
pub use z_index::ZIndex;
