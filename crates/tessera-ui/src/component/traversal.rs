use tessera_engine::coords::Vec2;

use crate::error::UiError;
use crate::event::UiEvent;
use crate::interaction::{ButtonPhase, ClickState, HoverState};
use crate::widgets::{behavior, WidgetKind};

use super::{ComponentId, ComponentTree};

/// Pointer snapshot for one input frame, in layout pixels.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct PointerInput {
    /// `None` while the pointer is outside the surface.
    pub position: Option<Vec2>,
    pub button: ButtonPhase,
    /// Wheel delta in lines; positive scrolls content down.
    pub wheel: f32,
}

struct InputPass<'a> {
    button: ButtonPhase,
    wheel: f32,
    claimed: &'a mut bool,
    wheel_taken: bool,
}

impl ComponentTree {
    /// Advances every component's hover and click machines by one frame.
    ///
    /// Children are visited before their parent, siblings in child order, so
    /// the first component reached in that order may claim a press.
    /// `claimed` carries the claim across calls sharing one frame.
    pub fn update_input(&mut self, input: &PointerInput, claimed: &mut bool) -> Result<(), UiError> {
        let mut pass =
            InputPass { button: input.button, wheel: input.wheel, claimed, wheel_taken: input.wheel == 0.0 };
        for root in self.roots.clone() {
            self.input_visit(root, input.position, true, &mut pass)?;
        }
        Ok(())
    }

    fn input_visit(
        &mut self,
        id: ComponentId,
        pointer: Option<Vec2>,
        parent_active: bool,
        pass: &mut InputPass<'_>,
    ) -> Result<(), UiError> {
        let bounds = self.bounds(id)?;
        let node = self.node(id)?;
        let active = parent_active && node.visible && node.enabled && !node.destroyed;
        let over = pointer.is_some_and(|p| bounds.contains(p));

        // Scroll views clip their content and shift it by the scroll offset.
        let child_pointer = match node.widget.scroll {
            Some(scroll) => pointer.filter(|_| over).map(|p| p + Vec2::new(0.0, scroll.offset)),
            None => pointer,
        };

        for child in node.children.clone() {
            self.input_visit(child, child_pointer, active, pass)?;
        }

        let (node, events) = self.node_and_events(id)?;
        let b = behavior(node.widget.kind);
        let inside = active && b.interactive && over;
        let before = node.interaction;

        let hover = before.hover.next(inside);
        match hover {
            HoverState::Entered => events.push(UiEvent::HoverEntered { id }),
            HoverState::Exited => events.push(UiEvent::HoverExited { id }),
            _ => {}
        }

        let click = before.click.next(pass.button, inside && !*pass.claimed);
        match click {
            ClickState::Pressed => {
                *pass.claimed = true;
                events.push(UiEvent::Pressed { id });
            }
            ClickState::Released if inside => {
                events.push(UiEvent::Clicked { id });
                (b.on_click)(&mut node.widget, id, events);
            }
            _ => {}
        }

        if !pass.wheel_taken && inside && b.scrollable {
            pass.wheel_taken = (b.on_scroll)(&mut node.widget, id, pass.wheel, events);
        }

        node.interaction.hover = hover;
        node.interaction.click = click;
        if node.interaction != before {
            node.widget.request_redraw();
        }
        Ok(())
    }

    /// Runs per-tick widget hooks over visible components and refreshes
    /// scroll ranges. Returns whether anything needs redrawing.
    pub fn update(&mut self, dt: f32) -> bool {
        let mut redraw = self.structure_dirty;
        for root in self.roots.clone() {
            redraw |= self.update_visit(root, dt);
        }
        redraw
    }

    fn update_visit(&mut self, id: ComponentId, dt: f32) -> bool {
        let Some(node) = self.get_mut(id) else { return false };
        if !node.visible || node.destroyed {
            return false;
        }
        if (behavior(node.widget.kind).on_update)(&mut node.widget, dt) {
            node.widget.request_redraw();
        }
        let mut redraw = node.widget.needs_redraw();
        let is_scroll = node.widget.kind == WidgetKind::ScrollView;
        let children = node.children.clone();

        for child in children {
            redraw |= self.update_visit(child, dt);
        }

        if is_scroll {
            if let Err(e) = self.child_bounds(id) {
                log::warn!("scroll range of {id:?} not refreshed: {e}");
            }
            redraw |= self.get(id).is_some_and(|n| n.widget.needs_redraw());
        }
        redraw
    }
}
