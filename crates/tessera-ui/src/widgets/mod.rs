//! Widget behaviours.
//!
//! A component carries a [`Widget`]: a [`WidgetKind`] tag plus the optional
//! capability structs its kind uses. Per-kind reactions live in a static
//! [`Behavior`] table looked up with [`behavior`].

mod button;
mod checkbox;
mod label;
mod panel;
mod scroll;

use tessera_engine::coords::Rect;

use crate::component::ComponentId;
use crate::event::UiEvent;
use crate::interaction::{ClickState, HoverState};

pub use label::LabelData;
pub use panel::PanelStyle;
pub use checkbox::ToggleState;
pub use scroll::ScrollState;

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum WidgetKind {
    /// Layout-only node; draws nothing.
    Container,
    Panel,
    Button,
    Label,
    Checkbox,
    ScrollView,
}

/// Hover and click state of one component.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub struct Interaction {
    pub hover: HoverState,
    pub click: ClickState,
}

/// Kind tag plus capability data of a component.
#[derive(Debug, Clone)]
pub struct Widget {
    pub kind: WidgetKind,
    pub panel: Option<PanelStyle>,
    pub label: Option<LabelData>,
    pub toggle: Option<ToggleState>,
    pub scroll: Option<ScrollState>,
    redraw: bool,
}

impl Widget {
    fn with_kind(kind: WidgetKind) -> Self {
        Self { kind, panel: None, label: None, toggle: None, scroll: None, redraw: true }
    }

    pub fn container() -> Self {
        Self::with_kind(WidgetKind::Container)
    }

    pub fn panel(style: PanelStyle) -> Self {
        Self { panel: Some(style), ..Self::with_kind(WidgetKind::Panel) }
    }

    pub fn button(style: PanelStyle) -> Self {
        Self { panel: Some(style), ..Self::with_kind(WidgetKind::Button) }
    }

    pub fn label(label: LabelData) -> Self {
        Self { label: Some(label), ..Self::with_kind(WidgetKind::Label) }
    }

    pub fn checkbox(style: PanelStyle, toggle: ToggleState) -> Self {
        Self { panel: Some(style), toggle: Some(toggle), ..Self::with_kind(WidgetKind::Checkbox) }
    }

    pub fn scroll_view(background: Option<PanelStyle>) -> Self {
        Self { panel: background, scroll: Some(ScrollState::default()), ..Self::with_kind(WidgetKind::ScrollView) }
    }

    /// Flags a visible change that needs re-issuing the drawable.
    #[inline]
    pub fn request_redraw(&mut self) {
        self.redraw = true;
    }

    #[inline]
    pub fn needs_redraw(&self) -> bool {
        self.redraw
    }

    /// Returns and clears the redraw flag.
    #[inline]
    pub(crate) fn take_redraw(&mut self) -> bool {
        std::mem::take(&mut self.redraw)
    }

    /// Changes the label text, if this widget has one.
    pub fn set_text(&mut self, text: impl Into<String>) {
        if let Some(label) = &mut self.label {
            if label.set_text(text) {
                self.redraw = true;
            }
        }
    }

    #[inline]
    pub fn is_checked(&self) -> bool {
        self.toggle.is_some_and(|t| t.checked)
    }

    #[inline]
    pub fn scroll_offset(&self) -> f32 {
        self.scroll.map_or(0.0, |s| s.offset)
    }
}

// ── Behaviour table ───────────────────────────────────────────────────────

/// Reactions of one widget kind. Plain fn pointers, no per-instance state.
pub struct Behavior {
    /// Whether the kind takes part in hover and click handling.
    pub interactive: bool,
    /// Whether the pointer wheel scrolls it.
    pub scrollable: bool,
    pub on_click: fn(&mut Widget, ComponentId, &mut Vec<UiEvent>),
    /// Returns whether the wheel delta was consumed.
    pub on_scroll: fn(&mut Widget, ComponentId, f32, &mut Vec<UiEvent>) -> bool,
    /// Per-tick animation hook; returns whether a redraw is needed.
    pub on_update: fn(&mut Widget, f32) -> bool,
    /// Called with (own bounds, children bounds) whenever the latter change.
    pub on_child_bounds: fn(&mut Widget, ComponentId, Rect, Rect, &mut Vec<UiEvent>),
}

fn no_click(_: &mut Widget, _: ComponentId, _: &mut Vec<UiEvent>) {}

fn no_scroll(_: &mut Widget, _: ComponentId, _: f32, _: &mut Vec<UiEvent>) -> bool {
    false
}

fn no_update(_: &mut Widget, _: f32) -> bool {
    false
}

fn no_child_bounds(_: &mut Widget, _: ComponentId, _: Rect, _: Rect, _: &mut Vec<UiEvent>) {}

const PASSIVE: Behavior = Behavior {
    interactive: false,
    scrollable: false,
    on_click: no_click,
    on_scroll: no_scroll,
    on_update: no_update,
    on_child_bounds: no_child_bounds,
};

static PASSIVE_KINDS: Behavior = PASSIVE;

static BUTTON: Behavior = Behavior {
    interactive: true,
    on_click: button::on_click,
    ..PASSIVE
};

static CHECKBOX: Behavior = Behavior {
    interactive: true,
    on_click: checkbox::on_click,
    ..PASSIVE
};

static SCROLL_VIEW: Behavior = Behavior {
    interactive: true,
    scrollable: true,
    on_scroll: scroll::on_scroll,
    on_child_bounds: scroll::on_child_bounds,
    ..PASSIVE
};

pub fn behavior(kind: WidgetKind) -> &'static Behavior {
    match kind {
        WidgetKind::Container | WidgetKind::Panel | WidgetKind::Label => &PASSIVE_KINDS,
        WidgetKind::Button => &BUTTON,
        WidgetKind::Checkbox => &CHECKBOX,
        WidgetKind::ScrollView => &SCROLL_VIEW,
    }
}
