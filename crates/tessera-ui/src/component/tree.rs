use tessera_engine::coords::{Rect, Vec2, Viewport};

use crate::bounds::resolve_bounds;
use crate::constraints::ConstraintSet;
use crate::error::UiError;
use crate::event::UiEvent;
use crate::painter::RenderSlot;
use crate::widgets::{behavior, Widget};

use super::Node;

/// Stable handle to a component. Stale handles never alias a new component.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct ComponentId {
    index: u32,
    generation: u32,
}

#[derive(Debug)]
struct Slot {
    generation: u32,
    node: Option<Node>,
}

/// Arena of components plus the ordered root list and pending events.
///
/// Roots are laid out inside the viewport rectangle.
#[derive(Debug)]
pub struct ComponentTree {
    slots: Vec<Slot>,
    free: Vec<u32>,
    pub(super) roots: Vec<ComponentId>,
    viewport: Viewport,
    pub(super) events: Vec<UiEvent>,
    // Set when a component is hidden, shown, moved or destroyed; cleared by a paint.
    pub(super) structure_dirty: bool,
}

impl ComponentTree {
    pub fn new(viewport: Viewport) -> Self {
        Self {
            slots: Vec::new(),
            free: Vec::new(),
            roots: Vec::new(),
            viewport,
            events: Vec::new(),
            structure_dirty: false,
        }
    }

    // ── lookup ────────────────────────────────────────────────────────────

    pub fn get(&self, id: ComponentId) -> Option<&Node> {
        self.slots
            .get(id.index as usize)
            .filter(|s| s.generation == id.generation)
            .and_then(|s| s.node.as_ref())
    }

    pub fn get_mut(&mut self, id: ComponentId) -> Option<&mut Node> {
        self.slots
            .get_mut(id.index as usize)
            .filter(|s| s.generation == id.generation)
            .and_then(|s| s.node.as_mut())
    }

    pub(super) fn node(&self, id: ComponentId) -> Result<&Node, UiError> {
        self.get(id).ok_or(UiError::NoSuchComponent(id))
    }

    pub(super) fn node_mut(&mut self, id: ComponentId) -> Result<&mut Node, UiError> {
        self.get_mut(id).ok_or(UiError::NoSuchComponent(id))
    }

    /// The node and the event queue, borrowed together.
    pub(super) fn node_and_events(&mut self, id: ComponentId) -> Result<(&mut Node, &mut Vec<UiEvent>), UiError> {
        let node = self
            .slots
            .get_mut(id.index as usize)
            .filter(|s| s.generation == id.generation)
            .and_then(|s| s.node.as_mut())
            .ok_or(UiError::NoSuchComponent(id))?;
        Ok((node, &mut self.events))
    }

    #[inline]
    pub fn roots(&self) -> &[ComponentId] {
        &self.roots
    }

    /// Live (not destroyed) components.
    pub fn len(&self) -> usize {
        self.slots.iter().filter_map(|s| s.node.as_ref()).filter(|n| !n.destroyed).count()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn drain_events(&mut self) -> Vec<UiEvent> {
        std::mem::take(&mut self.events)
    }

    // ── creation ──────────────────────────────────────────────────────────

    /// Creates a root component with an empty constraint set.
    pub fn create(&mut self, name: impl Into<String>, widget: Widget) -> ComponentId {
        let node = Node::new(name.into(), widget);
        let id = match self.free.pop() {
            Some(index) => {
                let slot = &mut self.slots[index as usize];
                slot.node = Some(node);
                ComponentId { index, generation: slot.generation }
            }
            None => {
                let index = self.slots.len() as u32;
                self.slots.push(Slot { generation: 0, node: Some(node) });
                ComponentId { index, generation: 0 }
            }
        };
        self.roots.push(id);
        id
    }

    /// Creates a component from constraint text and attaches it under
    /// `parent` (or as a root).
    pub fn spawn(
        &mut self,
        parent: Option<ComponentId>,
        name: impl Into<String>,
        widget: Widget,
        constraints: &str,
    ) -> Result<ComponentId, UiError> {
        let set: ConstraintSet = constraints.parse()?;
        if let Some(p) = parent {
            if self.node(p)?.destroyed {
                return Err(UiError::Destroyed(p));
            }
        }
        let id = self.create(name, widget);
        self.node_mut(id)?.constraints = set;
        if parent.is_some() {
            self.set_parent(id, parent)?;
        }
        Ok(id)
    }

    // ── mutation ──────────────────────────────────────────────────────────

    /// Mutable access to the constraint set. Changes are picked up by the
    /// next bounds query.
    pub fn constraints_mut(&mut self, id: ComponentId) -> Result<&mut ConstraintSet, UiError> {
        Ok(&mut self.node_mut(id)?.constraints)
    }

    /// Applies constraint text on top of the current set.
    pub fn apply_constraints(&mut self, id: ComponentId, text: &str) -> Result<(), UiError> {
        self.constraints_mut(id)?.apply_str(text)
    }

    pub fn set_pivot(&mut self, id: ComponentId, pivot: Vec2) -> Result<(), UiError> {
        let node = self.node_mut(id)?;
        if node.pivot != pivot {
            node.pivot = pivot;
            node.bounds = None;
        }
        Ok(())
    }

    pub fn set_visible(&mut self, id: ComponentId, visible: bool) -> Result<(), UiError> {
        let node = self.node_mut(id)?;
        if node.visible != visible {
            node.visible = visible;
            node.widget.request_redraw();
            self.structure_dirty = true;
        }
        Ok(())
    }

    pub fn set_enabled(&mut self, id: ComponentId, enabled: bool) -> Result<(), UiError> {
        let node = self.node_mut(id)?;
        if node.enabled != enabled {
            node.enabled = enabled;
            node.widget.request_redraw();
        }
        Ok(())
    }

    /// Own flag, not destroyed, and every ancestor enabled.
    pub fn is_effectively_enabled(&self, id: ComponentId) -> bool {
        let mut current = Some(id);
        while let Some(c) = current {
            match self.get(c) {
                Some(n) if n.enabled && !n.destroyed => current = n.parent,
                _ => return false,
            }
        }
        true
    }

    #[inline]
    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Changing the viewport invalidates every root.
    pub fn set_viewport(&mut self, viewport: Viewport) {
        if self.viewport == viewport {
            return;
        }
        self.viewport = viewport;
        for root in self.roots.clone() {
            if let Some(n) = self.get_mut(root) {
                n.bounds = None;
            }
        }
    }

    /// Moves `id` under `parent`, or makes it a root with `None`.
    pub fn set_parent(&mut self, id: ComponentId, parent: Option<ComponentId>) -> Result<(), UiError> {
        if self.node(id)?.destroyed {
            return Err(UiError::Destroyed(id));
        }
        if let Some(p) = parent {
            if self.node(p)?.destroyed {
                return Err(UiError::Destroyed(p));
            }
            if self.is_ancestor_or_self(id, p) {
                return Err(UiError::Cycle { child: id, parent: p });
            }
        }

        self.detach(id);

        match parent {
            Some(p) => {
                let pn = self.node_mut(p)?;
                pn.children.push(id);
                pn.child_bounds = None;
            }
            None => self.roots.push(id),
        }
        let node = self.node_mut(id)?;
        node.parent = parent;
        node.bounds = None;
        self.structure_dirty = true;
        Ok(())
    }

    fn is_ancestor_or_self(&self, ancestor: ComponentId, of: ComponentId) -> bool {
        let mut current = Some(of);
        while let Some(c) = current {
            if c == ancestor {
                return true;
            }
            current = self.get(c).and_then(|n| n.parent);
        }
        false
    }

    // Removes `id` from its parent's child list (or the roots).
    fn detach(&mut self, id: ComponentId) {
        match self.get(id).and_then(|n| n.parent) {
            Some(p) => {
                if let Some(pn) = self.get_mut(p) {
                    pn.children.retain(|c| *c != id);
                    pn.child_bounds = None;
                }
            }
            None => self.roots.retain(|r| *r != id),
        }
        if let Some(n) = self.get_mut(id) {
            n.parent = None;
        }
    }

    /// Detaches `id` and marks it and its whole subtree destroyed.
    ///
    /// Destroyed components keep their slots until
    /// [`purge_destroyed`](Self::purge_destroyed).
    pub fn destroy(&mut self, id: ComponentId) -> Result<(), UiError> {
        if self.node(id)?.destroyed {
            return Ok(());
        }
        self.detach(id);

        let mut stack = vec![id];
        while let Some(next) = stack.pop() {
            let Some(node) = self.get_mut(next) else { continue };
            node.destroyed = true;
            node.parent = None;
            let children = std::mem::take(&mut node.children);
            // Reverse so the first child is processed first.
            stack.extend(children.into_iter().rev());
        }
        self.structure_dirty = true;
        log::trace!("component {id:?} destroyed");
        Ok(())
    }

    /// Clears the pending hide/move/destroy redraw once the tree was drawn.
    pub(crate) fn mark_painted(&mut self) {
        self.structure_dirty = false;
    }

    /// Frees the slots of destroyed components, returning their render data
    /// so the caller can release driver objects.
    pub fn purge_destroyed(&mut self) -> Vec<RenderSlot> {
        let mut released = Vec::new();
        for (index, slot) in self.slots.iter_mut().enumerate() {
            if slot.node.as_ref().is_some_and(|n| n.destroyed) {
                if let Some(node) = slot.node.take() {
                    released.push(node.render);
                }
                slot.generation = slot.generation.wrapping_add(1);
                self.free.push(index as u32);
            }
        }
        released
    }

    // ── bounds ────────────────────────────────────────────────────────────

    /// Resolved rectangle of `id`, recomputed only if stale.
    pub fn bounds(&mut self, id: ComponentId) -> Result<Rect, UiError> {
        let parent = self.node(id)?.parent;
        // Resolving the parent first lets a changed parent invalidate us.
        let parent_rect = match parent {
            Some(p) => self.bounds(p)?,
            None => self.viewport.rect(),
        };

        let node = self.node_mut(id)?;
        if let Some(cached) = node.bounds {
            if !node.constraints.is_changed() {
                return Ok(cached);
            }
        }

        let rect = resolve_bounds(&node.constraints, parent_rect, node.pivot)?;
        node.bounds_computations += 1;
        node.constraints.clear_changed();
        node.bounds = Some(rect);
        if node.resolved == Some(rect) {
            return Ok(rect);
        }
        node.resolved = Some(rect);
        let children = node.children.clone();

        for c in children {
            if let Some(n) = self.get_mut(c) {
                n.bounds = None;
            }
        }
        if let Some(p) = parent {
            self.node_mut(p)?.child_bounds = None;
        }
        self.events.push(UiEvent::BoundsChanged { id, bounds: rect });
        Ok(rect)
    }

    /// Union of the children's rectangles. Without children, a zero-sized
    /// rectangle at the component's own origin.
    pub fn child_bounds(&mut self, id: ComponentId) -> Result<Rect, UiError> {
        let own = self.bounds(id)?;
        let children = self.node(id)?.children.clone();

        let mut union: Option<Rect> = None;
        for c in children {
            let r = self.bounds(c)?;
            union = Some(union.map_or(r, |u| u.union(r)));
        }

        let (node, events) = self.node_and_events(id)?;
        if let Some(cached) = node.child_bounds {
            return Ok(cached);
        }
        let rect = union.unwrap_or(Rect::from_origin_size(own.origin, Vec2::zero()));
        node.child_bounds = Some(rect);
        if node.resolved_child_bounds != Some(rect) {
            node.resolved_child_bounds = Some(rect);
            events.push(UiEvent::ChildBoundsChanged { id, child_bounds: rect });
            let b = behavior(node.widget.kind);
            (b.on_child_bounds)(&mut node.widget, id, own, rect, events);
        }
        Ok(rect)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tree() -> ComponentTree {
        ComponentTree::new(Viewport::new(200.0, 100.0))
    }

    fn boxed(tree: &mut ComponentTree, parent: Option<ComponentId>, c: &str) -> ComponentId {
        tree.spawn(parent, "box", Widget::container(), c).unwrap()
    }

    // ── bounds caching ────────────────────────────────────────────────────

    #[test]
    fn repeated_queries_do_not_recompute() {
        let mut t = tree();
        let id = boxed(&mut t, None, "x:pixel:10 y:pixel:10 w:pixel:50 h:pixel:20");
        let a = t.bounds(id).unwrap();
        let b = t.bounds(id).unwrap();
        assert_eq!(a.origin.x.to_bits(), b.origin.x.to_bits());
        assert_eq!(a, b);
        assert_eq!(t.get(id).unwrap().bounds_computations(), 1);
    }

    #[test]
    fn constraint_change_recomputes_lazily() {
        let mut t = tree();
        let id = boxed(&mut t, None, "x:pixel:10 y:pixel:10 w:pixel:50 h:pixel:20");
        t.bounds(id).unwrap();
        t.apply_constraints(id, "x:pixel:20").unwrap();
        assert_eq!(t.get(id).unwrap().bounds_computations(), 1);
        assert_eq!(t.bounds(id).unwrap().origin.x, 20.0);
        assert_eq!(t.get(id).unwrap().bounds_computations(), 2);
    }

    #[test]
    fn parent_change_reaches_children() {
        let mut t = tree();
        let parent = boxed(&mut t, None, "x:pixel:0 y:pixel:0 w:fill:0 h:fill:0");
        let child = boxed(&mut t, Some(parent), "x:pixel:10:right y:pixel:0 w:pixel:20 h:pixel:20");
        assert_eq!(t.bounds(child).unwrap().origin.x, 170.0);

        t.set_viewport(Viewport::new(100.0, 100.0));
        assert_eq!(t.bounds(child).unwrap().origin.x, 70.0);
        assert_eq!(t.get(child).unwrap().bounds_computations(), 2);
    }

    #[test]
    fn bounds_changed_fires_once_per_change() {
        let mut t = tree();
        let id = boxed(&mut t, None, "x:pixel:0 y:pixel:0 w:pixel:5 h:pixel:5");
        t.bounds(id).unwrap();
        t.bounds(id).unwrap();
        // Re-setting the same rule recomputes but does not change the rect.
        t.apply_constraints(id, "x:pixel:0").unwrap();
        t.bounds(id).unwrap();
        let changes = t.drain_events().into_iter().filter(|e| matches!(e, UiEvent::BoundsChanged { .. })).count();
        assert_eq!(changes, 1);
    }

    #[test]
    fn incomplete_set_is_an_error() {
        let mut t = tree();
        let id = boxed(&mut t, None, "x:pixel:0 y:pixel:0 w:pixel:5");
        assert!(matches!(t.bounds(id), Err(UiError::IncompleteConstraints(crate::constraints::Axis::Height))));
    }

    #[test]
    fn child_bounds_union_and_empty() {
        let mut t = tree();
        let parent = boxed(&mut t, None, "x:pixel:10 y:pixel:10 w:pixel:100 h:pixel:50");
        assert_eq!(t.child_bounds(parent).unwrap(), Rect::new(10.0, 10.0, 0.0, 0.0));

        boxed(&mut t, Some(parent), "x:pixel:0 y:pixel:0 w:pixel:10 h:pixel:10");
        boxed(&mut t, Some(parent), "x:pixel:20 y:pixel:60 w:pixel:10 h:pixel:10");
        assert_eq!(t.child_bounds(parent).unwrap(), Rect::new(10.0, 10.0, 40.0, 80.0));
    }

    // ── structure ─────────────────────────────────────────────────────────

    #[test]
    fn reparent_moves_between_lists() {
        let mut t = tree();
        let a = boxed(&mut t, None, "x:pixel:0 y:pixel:0 w:pixel:50 h:pixel:50");
        let b = boxed(&mut t, None, "x:pixel:100 y:pixel:0 w:pixel:50 h:pixel:50");
        let c = boxed(&mut t, Some(a), "x:pixel:5 y:pixel:5 w:pixel:5 h:pixel:5");
        assert_eq!(t.bounds(c).unwrap().origin.x, 5.0);

        t.set_parent(c, Some(b)).unwrap();
        assert!(t.get(a).unwrap().children().is_empty());
        assert_eq!(t.get(b).unwrap().children(), &[c]);
        assert_eq!(t.bounds(c).unwrap().origin.x, 105.0);
        assert!(matches!(t.set_parent(b, Some(c)), Err(UiError::Cycle { .. })));
    }

    #[test]
    fn destroying_parent_destroys_children() {
        let mut t = tree();
        let root = boxed(&mut t, None, "x:pixel:0 y:pixel:0 w:fill:0 h:fill:0");
        let parent = boxed(&mut t, Some(root), "x:pixel:0 y:pixel:0 w:fill:0 h:fill:0");
        let kids = [
            boxed(&mut t, Some(parent), "x:pixel:0 y:pixel:0 w:pixel:1 h:pixel:1"),
            boxed(&mut t, Some(parent), "x:pixel:0 y:pixel:0 w:pixel:1 h:pixel:1"),
        ];

        t.destroy(parent).unwrap();
        for k in kids {
            assert!(t.get(k).unwrap().is_destroyed());
            assert!(!t.is_effectively_enabled(k));
        }
        assert!(t.get(root).unwrap().children().is_empty());
        assert!(matches!(t.set_parent(kids[0], Some(root)), Err(UiError::Destroyed(_))));
        assert!(matches!(t.set_parent(root, Some(kids[1])), Err(UiError::Destroyed(_))));

        assert_eq!(t.purge_destroyed().len(), 3);
        assert!(t.get(kids[0]).is_none());
        assert_eq!(t.len(), 1);
    }

    #[test]
    fn disabled_ancestor_disables_subtree() {
        let mut t = tree();
        let root = boxed(&mut t, None, "x:pixel:0 y:pixel:0 w:fill:0 h:fill:0");
        let child = boxed(&mut t, Some(root), "x:pixel:0 y:pixel:0 w:fill:0 h:fill:0");
        t.set_enabled(root, false).unwrap();
        assert!(t.get(child).unwrap().is_enabled());
        assert!(!t.is_effectively_enabled(child));
    }
}
