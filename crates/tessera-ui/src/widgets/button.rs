use crate::component::ComponentId;
use crate::event::UiEvent;

use super::Widget;

// `Clicked` itself is emitted by the traversal; the button only repaints
// to leave its pressed colour.
pub(super) fn on_click(widget: &mut Widget, _id: ComponentId, _events: &mut Vec<UiEvent>) {
    widget.request_redraw();
}
