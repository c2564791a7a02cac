use tessera_engine::coords::Rect;

use crate::component::ComponentId;

/// Notifications raised by the component tree, drained by the caller with
/// [`ComponentTree::drain_events`](crate::component::ComponentTree::drain_events).
///
/// Each fires at most once per actual change.
#[derive(Debug, Clone, PartialEq)]
pub enum UiEvent {
    /// A component's resolved rectangle changed (including its first
    /// resolution).
    BoundsChanged { id: ComponentId, bounds: Rect },
    /// The union of a component's children rectangles changed.
    ChildBoundsChanged { id: ComponentId, child_bounds: Rect },
    HoverEntered { id: ComponentId },
    HoverExited { id: ComponentId },
    /// Primary button went down on the component and it claimed the press.
    Pressed { id: ComponentId },
    /// Press and release both happened over the component.
    Clicked { id: ComponentId },
    /// A checkbox changed state.
    Toggled { id: ComponentId, checked: bool },
    /// A scroll view moved; `offset` is the new vertical offset.
    Scrolled { id: ComponentId, offset: f32 },
}

impl UiEvent {
    pub fn id(&self) -> ComponentId {
        match *self {
            UiEvent::BoundsChanged { id, .. }
            | UiEvent::ChildBoundsChanged { id, .. }
            | UiEvent::HoverEntered { id }
            | UiEvent::HoverExited { id }
            | UiEvent::Pressed { id }
            | UiEvent::Clicked { id }
            | UiEvent::Toggled { id, .. }
            | UiEvent::Scrolled { id, .. } => id,
        }
    }
}
