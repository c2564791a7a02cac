use tessera_engine::coords::{Rect, Vec2};

use crate::constraints::ConstraintSet;
use crate::painter::RenderSlot;
use crate::widgets::{Interaction, Widget};

use super::ComponentId;

/// One component: identity, flags, layout rules, cached rectangles, pointer
/// state and its widget.
#[derive(Debug)]
pub struct Node {
    pub(super) name: String,
    pub(super) enabled: bool,
    pub(super) visible: bool,
    pub(super) destroyed: bool,
    pub(super) constraints: ConstraintSet,
    pub(super) pivot: Vec2,
    /// Cached rectangle; `None` when it must be recomputed.
    pub(super) bounds: Option<Rect>,
    /// Last resolved rectangle, for change detection.
    pub(super) resolved: Option<Rect>,
    pub(super) child_bounds: Option<Rect>,
    pub(super) resolved_child_bounds: Option<Rect>,
    pub(super) bounds_computations: u64,
    pub(super) interaction: Interaction,
    pub(super) widget: Widget,
    pub(super) parent: Option<ComponentId>,
    pub(super) children: Vec<ComponentId>,
    pub(crate) render: RenderSlot,
}

impl Node {
    pub(super) fn new(name: String, widget: Widget) -> Self {
        Self {
            name,
            enabled: true,
            visible: true,
            destroyed: false,
            constraints: ConstraintSet::new(),
            pivot: Vec2::zero(),
            bounds: None,
            resolved: None,
            child_bounds: None,
            resolved_child_bounds: None,
            bounds_computations: 0,
            interaction: Interaction::default(),
            widget,
            parent: None,
            children: Vec::new(),
            render: RenderSlot::default(),
        }
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Own flag only; see
    /// [`ComponentTree::is_effectively_enabled`](super::ComponentTree::is_effectively_enabled).
    #[inline]
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    #[inline]
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    #[inline]
    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }

    #[inline]
    pub fn constraints(&self) -> &ConstraintSet {
        &self.constraints
    }

    #[inline]
    pub fn pivot(&self) -> Vec2 {
        self.pivot
    }

    /// How many times the bounds were actually resolved.
    #[inline]
    pub fn bounds_computations(&self) -> u64 {
        self.bounds_computations
    }

    #[inline]
    pub fn interaction(&self) -> Interaction {
        self.interaction
    }

    #[inline]
    pub fn widget(&self) -> &Widget {
        &self.widget
    }

    #[inline]
    pub fn widget_mut(&mut self) -> &mut Widget {
        &mut self.widget
    }

    #[inline]
    pub fn parent(&self) -> Option<ComponentId> {
        self.parent
    }

    #[inline]
    pub fn children(&self) -> &[ComponentId] {
        &self.children
    }

    /// Widget and render slot borrowed together for the painter.
    pub(crate) fn paint_parts(&mut self) -> (&str, &mut Widget, &mut RenderSlot) {
        (&self.name, &mut self.widget, &mut self.render)
    }
}
