//! Tessera UI: a retained component tree with constraint layout, on top of
//! `tessera-engine`.
//!
//! # Quick start
//!
//! ```rust,ignore
//! use tessera_ui::prelude::*;
//!
//! let mut ui = UiScene::new(device.driver_mut(), viewport, Box::new(FixedAdvanceMesher::default()))?;
//! let tree = ui.tree_mut();
//!
//! let panel = tree.spawn(None, "panel", Widget::panel(PanelStyle::solid(Color::black())),
//!     "x:center:0 y:center:0 w:relative:0.5 h:ratio:0.75")?;
//! let ok = tree.spawn(Some(panel), "ok",
//!     Widget::button(PanelStyle::interactive(grey, light, dark)),
//!     "x:pixel:8:right y:pixel:8:bottom w:pixel:80 h:pixel:24")?;
//!
//! // Update pass:
//! ui.handle_input(ctx.input, ctx.input_frame)?;
//! ui.update(ctx.time.dt);
//! for event in ui.drain_events() {
//!     if event == (UiEvent::Clicked { id: ok }) { /* ... */ }
//! }
//!
//! // Render callbacks:
//! ui.pre_render(ctx.device)?;            // App::on_pre_render
//! ui.render(ctx.device, ctx.renderer)?;  // App::on_render
//! ```
//!
//! # Constraint language
//!
//! Space-separated clauses of `:`-separated tokens: axis (`x`, `y`, `w` or
//! `width`, `h` or `height`), kind (`pixel`, `relative`, `center`, `fill`,
//! `ratio`), a number, and for positions an optional anchor edge (`left`,
//! `right`, `top`, `bottom`; near edge when omitted).

pub mod bounds;
pub mod component;
pub mod constraints;
pub mod error;
pub mod event;
pub mod interaction;
pub mod painter;
pub mod scene;
pub mod widgets;

pub use error::{ParseError, UiError};
pub use scene::UiScene;

/// Everything needed to build a UI.
pub mod prelude {
    pub use crate::component::{ComponentId, ComponentTree, PointerInput};
    pub use crate::constraints::{ConstraintSet, Edge, PositionConstraint, SizeConstraint};
    pub use crate::error::{ParseError, UiError};
    pub use crate::event::UiEvent;
    pub use crate::interaction::{ButtonPhase, ClickState, HoverState};
    pub use crate::painter::{FixedAdvanceMesher, TextMesher};
    pub use crate::scene::UiScene;
    pub use crate::widgets::{LabelData, PanelStyle, ScrollState, ToggleState, Widget, WidgetKind};

    pub use tessera_engine::coords::{Color, Rect, Vec2, Viewport};
}
