use parking_lot::{Condvar, Mutex};

/// Kind of pass holding a [`PassGuard`].
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum PassKind {
    Render,
    Update,
    Structural,
}

#[derive(Debug, Default)]
struct GateState {
    render: bool,
    update: bool,
    structural: bool,
    structural_waiting: usize,
}

impl GateState {
    fn blocks(&self, kind: PassKind) -> bool {
        match kind {
            PassKind::Render => self.render || self.structural || self.structural_waiting > 0,
            PassKind::Update => self.update || self.structural || self.structural_waiting > 0,
            PassKind::Structural => self.render || self.update || self.structural,
        }
    }

    fn flag(&mut self, kind: PassKind) -> &mut bool {
        match kind {
            PassKind::Render => &mut self.render,
            PassKind::Update => &mut self.update,
            PassKind::Structural => &mut self.structural,
        }
    }
}

/// Rendezvous between the render thread, the update thread and structural
/// scene mutation.
///
/// A render pass and an update pass may overlap each other, but two passes of
/// the same kind never do. A structural pass waits until neither is in flight
/// and holds both off until its guard drops. Waiting structural passes take
/// priority over new render/update passes.
#[derive(Debug, Default)]
pub struct RenderGate {
    state: Mutex<GateState>,
    changed: Condvar,
}

impl RenderGate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn enter_render(&self) -> PassGuard<'_> {
        self.enter(PassKind::Render)
    }

    pub fn enter_update(&self) -> PassGuard<'_> {
        self.enter(PassKind::Update)
    }

    pub fn enter_structural(&self) -> PassGuard<'_> {
        self.enter(PassKind::Structural)
    }

    /// Non-blocking variant of the `enter_*` calls.
    pub fn try_enter(&self, kind: PassKind) -> Option<PassGuard<'_>> {
        let mut state = self.state.lock();
        if state.blocks(kind) {
            return None;
        }
        *state.flag(kind) = true;
        Some(PassGuard { gate: self, kind })
    }

    /// Whether a pass of `kind` is currently in flight.
    pub fn is_active(&self, kind: PassKind) -> bool {
        let mut state = self.state.lock();
        *state.flag(kind)
    }

    fn enter(&self, kind: PassKind) -> PassGuard<'_> {
        let mut state = self.state.lock();
        if kind == PassKind::Structural {
            state.structural_waiting += 1;
        }
        while state.blocks(kind) {
            self.changed.wait(&mut state);
        }
        if kind == PassKind::Structural {
            state.structural_waiting -= 1;
        }
        *state.flag(kind) = true;
        log::trace!("{kind:?} pass entered");
        PassGuard { gate: self, kind }
    }

    fn leave(&self, kind: PassKind) {
        let mut state = self.state.lock();
        *state.flag(kind) = false;
        drop(state);
        self.changed.notify_all();
        log::trace!("{kind:?} pass left");
    }
}

/// Holds a pass open until dropped.
#[derive(Debug)]
#[must_use = "the pass ends when the guard is dropped"]
pub struct PassGuard<'a> {
    gate: &'a RenderGate,
    kind: PassKind,
}

impl PassGuard<'_> {
    #[inline]
    pub fn kind(&self) -> PassKind {
        self.kind
    }
}

impl Drop for PassGuard<'_> {
    fn drop(&mut self) {
        self.gate.leave(self.kind);
    }
}
