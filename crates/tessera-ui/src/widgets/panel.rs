use tessera_engine::coords::Color;

use crate::interaction::{ClickState, HoverState};

/// Fill colours of a rectangular widget, per pointer state.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct PanelStyle {
    pub fill: Color,
    pub hover: Option<Color>,
    pub pressed: Option<Color>,
}

impl PanelStyle {
    pub fn solid(fill: Color) -> Self {
        Self { fill, hover: None, pressed: None }
    }

    pub fn interactive(fill: Color, hover: Color, pressed: Color) -> Self {
        Self { fill, hover: Some(hover), pressed: Some(pressed) }
    }

    /// Colour to draw with in the given states. Pressed wins over hovered.
    pub fn color_for(&self, hover: HoverState, click: ClickState) -> Color {
        if click.is_down() {
            if let Some(c) = self.pressed {
                return c;
            }
        }
        match self.hover {
            Some(c) if hover.is_hovered() => c,
            _ => self.fill,
        }
    }
}
