//! Input subsystem.
//!
//! Platform-agnostic: the windowing layer (external) translates its events
//! into [`InputEvent`]s and feeds them to [`InputState::apply_event`].

mod frame;
mod state;
mod types;

pub use frame::InputFrame;
pub use state::InputState;
pub use types::{InputEvent, MouseButton, MouseButtonState, PointerButtonEvent};
