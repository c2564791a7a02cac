use tessera_engine::coords::Rect;

use crate::component::ComponentId;
use crate::event::UiEvent;

use super::Widget;

/// Vertical scroll position of a scroll view.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ScrollState {
    /// Content shift in pixels, in `0..=max_offset`.
    pub offset: f32,
    /// How far the children extend past the view's bottom edge.
    pub max_offset: f32,
    /// Pixels scrolled per wheel unit.
    pub line_height: f32,
}

impl Default for ScrollState {
    fn default() -> Self {
        Self { offset: 0.0, max_offset: 0.0, line_height: 24.0 }
    }
}

impl ScrollState {
    /// Moves by `delta` pixels. Returns whether the offset changed.
    pub fn scroll_by(&mut self, delta: f32) -> bool {
        let prev = self.offset;
        self.offset = (self.offset + delta).clamp(0.0, self.max_offset);
        self.offset != prev
    }

    /// Updates the scroll range from the view and content rectangles.
    /// Returns whether the offset had to move to stay in range.
    pub fn set_overflow(&mut self, bounds: Rect, child_bounds: Rect) -> bool {
        let content_h = child_bounds.max().y - bounds.origin.y;
        self.max_offset = (content_h - bounds.height()).max(0.0);
        self.scroll_by(0.0)
    }
}

// Positive delta scrolls down (reveals content below).
pub(super) fn on_scroll(widget: &mut Widget, id: ComponentId, delta: f32, events: &mut Vec<UiEvent>) -> bool {
    let Some(scroll) = &mut widget.scroll else { return false };
    if scroll.scroll_by(delta * scroll.line_height) {
        let offset = scroll.offset;
        widget.request_redraw();
        events.push(UiEvent::Scrolled { id, offset });
    }
    true
}

pub(super) fn on_child_bounds(
    widget: &mut Widget,
    id: ComponentId,
    bounds: Rect,
    child_bounds: Rect,
    events: &mut Vec<UiEvent>,
) {
    let Some(scroll) = &mut widget.scroll else { return };
    if scroll.set_overflow(bounds, child_bounds) {
        let offset = scroll.offset;
        widget.request_redraw();
        events.push(UiEvent::Scrolled { id, offset });
    }
}
