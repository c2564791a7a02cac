use tessera_engine::coords::Color;

use crate::component::ComponentId;
use crate::event::UiEvent;

use super::Widget;

/// Checked state of a checkbox and the fill used while checked.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ToggleState {
    pub checked: bool,
    pub check_color: Color,
}

impl ToggleState {
    pub fn new(checked: bool, check_color: Color) -> Self {
        Self { checked, check_color }
    }
}

pub(super) fn on_click(widget: &mut Widget, id: ComponentId, events: &mut Vec<UiEvent>) {
    let Some(toggle) = &mut widget.toggle else { return };
    toggle.checked = !toggle.checked;
    let checked = toggle.checked;
    widget.request_redraw();
    events.push(UiEvent::Toggled { id, checked });
}
