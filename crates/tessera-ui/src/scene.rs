use tessera_engine::coords::{Vec2, Viewport};
use tessera_engine::device::GraphicsDriver;
use tessera_engine::input::{InputFrame, InputState, MouseButton};
use tessera_engine::render::{FrameRenderer, RenderDevice, RenderError};

use crate::component::{ComponentTree, PointerInput};
use crate::error::UiError;
use crate::event::UiEvent;
use crate::interaction::ButtonPhase;
use crate::painter::{Painter, TextMesher};

// ── input ─────────────────────────────────────────────────────────────────

/// Builds this frame's [`PointerInput`] from the engine's input state.
///
/// A press and release inside one frame reads as `JustPressed`; the release
/// is seen on the next frame.
pub fn pointer_input(state: &InputState, frame: &InputFrame) -> PointerInput {
    let button = if frame.buttons_pressed.contains(&MouseButton::Left) {
        ButtonPhase::JustPressed
    } else if frame.buttons_released.contains(&MouseButton::Left) {
        ButtonPhase::JustReleased
    } else if state.button_down(MouseButton::Left) {
        ButtonPhase::Held
    } else {
        ButtonPhase::Up
    };
    PointerInput { position: state.pointer_pos, button, wheel: frame.wheel_delta }
}

// ── UiScene ───────────────────────────────────────────────────────────────

/// A component tree together with the painter that draws it.
///
/// Call [`handle_input`](Self::handle_input) and [`update`](Self::update)
/// from the app's update pass, then [`pre_render`](Self::pre_render) and
/// [`render`](Self::render) from the matching render callbacks.
#[derive(Debug)]
pub struct UiScene {
    tree: ComponentTree,
    painter: Painter,
}

impl UiScene {
    pub fn new(
        driver: &mut dyn GraphicsDriver,
        viewport: Viewport,
        mesher: Box<dyn TextMesher>,
    ) -> Result<Self, RenderError> {
        Ok(Self { tree: ComponentTree::new(viewport), painter: Painter::new(driver, mesher)? })
    }

    #[inline]
    pub fn tree(&self) -> &ComponentTree {
        &self.tree
    }

    #[inline]
    pub fn tree_mut(&mut self) -> &mut ComponentTree {
        &mut self.tree
    }

    #[inline]
    pub fn painter_mut(&mut self) -> &mut Painter {
        &mut self.painter
    }

    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.tree.set_viewport(viewport);
    }

    /// Advances hover, click and scroll state. Returns whether a component
    /// claimed a press this frame.
    pub fn handle_input(&mut self, state: &InputState, frame: &InputFrame) -> Result<bool, UiError> {
        let mut claimed = false;
        self.tree.update_input(&pointer_input(state, frame), &mut claimed)?;
        Ok(claimed)
    }

    /// Per-tick widget work. Returns whether anything needs redrawing.
    pub fn update(&mut self, dt: f32) -> bool {
        self.tree.update(dt)
    }

    pub fn pre_render<D: GraphicsDriver>(&mut self, device: &mut RenderDevice<D>) -> Result<(), UiError> {
        self.painter.pre_render(&mut self.tree, device)
    }

    /// Queues the tree's draws on `renderer`, which must be inside its pass.
    pub fn render<D: GraphicsDriver>(
        &mut self,
        device: &mut RenderDevice<D>,
        renderer: &mut FrameRenderer,
    ) -> Result<(), UiError> {
        self.painter.render(&mut self.tree, device, renderer, Vec2::zero())
    }

    pub fn drain_events(&mut self) -> Vec<UiEvent> {
        self.tree.drain_events()
    }

    /// Frees destroyed components and their driver objects. Returns how many
    /// components were freed.
    pub fn purge<D: GraphicsDriver>(&mut self, device: &mut RenderDevice<D>) -> usize {
        let released = self.tree.purge_destroyed();
        let count = released.len();
        for mut slot in released {
            slot.release(device);
        }
        if count > 0 {
            log::debug!("purged {count} destroyed components");
        }
        count
    }

    /// Destroys every component and releases all driver objects.
    pub fn shutdown<D: GraphicsDriver>(&mut self, device: &mut RenderDevice<D>) {
        for root in self.tree.roots().to_vec() {
            if let Err(e) = self.tree.destroy(root) {
                log::warn!("destroying {root:?} at shutdown failed: {e}");
            }
        }
        self.purge(device);
        self.painter.dispose(device.driver_mut());
    }
}

#[cfg(test)]
mod tests {
    use tessera_engine::coords::Color;
    use tessera_engine::device::RecordingDriver;
    use tessera_engine::input::{InputEvent, MouseButtonState, PointerButtonEvent};

    use super::*;
    use crate::painter::FixedAdvanceMesher;
    use crate::widgets::{PanelStyle, Widget};

    fn button_event(state: MouseButtonState) -> InputEvent {
        InputEvent::PointerButton(PointerButtonEvent { button: MouseButton::Left, state, x: 5.0, y: 5.0 })
    }

    #[test]
    fn engine_input_maps_to_phases() {
        let mut state = InputState::default();
        let mut frame = InputFrame::default();
        assert_eq!(pointer_input(&state, &frame).button, ButtonPhase::Up);

        state.apply_event(&mut frame, button_event(MouseButtonState::Pressed));
        assert_eq!(pointer_input(&state, &frame).button, ButtonPhase::JustPressed);
        frame.clear();
        assert_eq!(pointer_input(&state, &frame).button, ButtonPhase::Held);

        state.apply_event(&mut frame, button_event(MouseButtonState::Released));
        let input = pointer_input(&state, &frame);
        assert_eq!(input.button, ButtonPhase::JustReleased);
        assert_eq!(input.position, Some(Vec2::new(5.0, 5.0)));
    }

    #[test]
    fn click_through_engine_input() {
        let mut device = RenderDevice::new(RecordingDriver::default(), None);
        let mut ui =
            UiScene::new(device.driver_mut(), Viewport::new(100.0, 100.0), Box::new(FixedAdvanceMesher::default()))
                .unwrap();
        let style = PanelStyle::interactive(Color::black(), Color::white(), Color::white());
        let b = ui
            .tree_mut()
            .spawn(None, "ok", Widget::button(style), "x:pixel:0 y:pixel:0 w:pixel:20 h:pixel:20")
            .unwrap();

        let mut state = InputState::default();
        let mut frame = InputFrame::default();
        state.apply_event(&mut frame, button_event(MouseButtonState::Pressed));
        assert!(ui.handle_input(&state, &frame).unwrap());
        frame.clear();
        state.apply_event(&mut frame, button_event(MouseButtonState::Released));
        assert!(!ui.handle_input(&state, &frame).unwrap());

        assert!(ui.drain_events().contains(&UiEvent::Clicked { id: b }));
    }

    #[test]
    fn hiding_or_destroying_a_drawn_panel_needs_redraw() {
        let mut device = RenderDevice::new(RecordingDriver::default(), None);
        let mut ui =
            UiScene::new(device.driver_mut(), Viewport::new(100.0, 100.0), Box::new(FixedAdvanceMesher::default()))
                .unwrap();
        let solid = || Widget::panel(PanelStyle::solid(Color::black()));
        let panel = ui.tree_mut().spawn(None, "panel", solid(), "x:pixel:0 y:pixel:0 w:fill:0 h:fill:0").unwrap();
        let inner = ui.tree_mut().spawn(Some(panel), "inner", solid(), "x:pixel:0 y:pixel:0 w:pixel:10 h:pixel:10").unwrap();

        let mut renderer = FrameRenderer::new();
        let mut frame = |ui: &mut UiScene, device: &mut RenderDevice<RecordingDriver>| {
            assert!(renderer.begin_rendering(device, tessera_engine::coords::Mat4::ortho(100.0, 100.0)));
            ui.render(device, &mut renderer).unwrap();
            renderer.end_rendering(device).unwrap();
        };

        frame(&mut ui, &mut device);
        assert!(!ui.update(0.016));

        ui.tree_mut().destroy(inner).unwrap();
        assert!(ui.update(0.016));
        frame(&mut ui, &mut device);
        assert!(!ui.update(0.016));

        ui.tree_mut().set_visible(panel, false).unwrap();
        assert!(ui.update(0.016));
        frame(&mut ui, &mut device);
        assert!(!ui.update(0.016));
    }

    #[test]
    fn shutdown_releases_everything() {
        let mut device = RenderDevice::new(RecordingDriver::default(), None);
        let mut ui =
            UiScene::new(device.driver_mut(), Viewport::new(100.0, 100.0), Box::new(FixedAdvanceMesher::default()))
                .unwrap();
        ui.tree_mut()
            .spawn(None, "p", Widget::panel(PanelStyle::solid(Color::black())), "x:pixel:0 y:pixel:0 w:fill:0 h:fill:0")
            .unwrap();

        let mut renderer = FrameRenderer::new();
        ui.pre_render(&mut device).unwrap();
        assert!(renderer.begin_rendering(&mut device, tessera_engine::coords::Mat4::ortho(100.0, 100.0)));
        ui.render(&mut device, &mut renderer).unwrap();
        renderer.end_rendering(&mut device).unwrap();

        ui.shutdown(&mut device);
        assert!(ui.tree().is_empty());
        assert_eq!(device.live_drawables(), 0);
        assert_eq!(device.driver().live_buffers(), 0);
    }
}
