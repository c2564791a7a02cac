//! Per-component pointer state machines.
//!
//! Both machines advance exactly once per input frame. They are pure: the
//! component tree decides what "inside" and "may claim" mean.

/// Pointer hover: `Off → Entered → Hovering → Exited → Off`.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Default)]
pub enum HoverState {
    #[default]
    Off,
    Entered,
    Hovering,
    Exited,
}

impl HoverState {
    pub fn next(self, inside: bool) -> Self {
        match (self, inside) {
            (HoverState::Off | HoverState::Exited, true) => HoverState::Entered,
            (HoverState::Off | HoverState::Exited, false) => HoverState::Off,
            (HoverState::Entered | HoverState::Hovering, true) => HoverState::Hovering,
            (HoverState::Entered | HoverState::Hovering, false) => HoverState::Exited,
        }
    }

    #[inline]
    pub fn is_hovered(self) -> bool {
        matches!(self, HoverState::Entered | HoverState::Hovering)
    }
}

/// Primary button phase for one frame, derived from this and last frame's
/// button state.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Default)]
pub enum ButtonPhase {
    #[default]
    Up,
    JustPressed,
    Held,
    JustReleased,
}

impl ButtonPhase {
    pub fn from_states(was_down: bool, is_down: bool) -> Self {
        match (was_down, is_down) {
            (false, false) => ButtonPhase::Up,
            (false, true) => ButtonPhase::JustPressed,
            (true, true) => ButtonPhase::Held,
            (true, false) => ButtonPhase::JustReleased,
        }
    }

    #[inline]
    pub fn is_down(self) -> bool {
        matches!(self, ButtonPhase::JustPressed | ButtonPhase::Held)
    }
}

/// Pointer click: `Up → Pressed → Down → Released → Up`.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Default)]
pub enum ClickState {
    #[default]
    Up,
    Pressed,
    Down,
    Released,
}

impl ClickState {
    /// `may_claim` is false when the component is not under the pointer, is
    /// not interactive this frame, or another component already claimed the
    /// press.
    pub fn next(self, button: ButtonPhase, may_claim: bool) -> Self {
        match self {
            ClickState::Up | ClickState::Released => {
                if button == ButtonPhase::JustPressed && may_claim {
                    ClickState::Pressed
                } else {
                    ClickState::Up
                }
            }
            ClickState::Pressed | ClickState::Down => {
                if button.is_down() {
                    ClickState::Down
                } else {
                    ClickState::Released
                }
            }
        }
    }

    #[inline]
    pub fn is_down(self) -> bool {
        matches!(self, ClickState::Pressed | ClickState::Down)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hover_cycle() {
        let mut s = HoverState::Off;
        let mut seen = Vec::new();
        for inside in [false, true, true, false, false] {
            s = s.next(inside);
            seen.push(s);
        }
        assert_eq!(
            seen,
            [HoverState::Off, HoverState::Entered, HoverState::Hovering, HoverState::Exited, HoverState::Off]
        );
    }

    #[test]
    fn click_cycle() {
        use ButtonPhase::*;
        let mut s = ClickState::Up;
        let mut seen = Vec::new();
        for phase in [Up, JustPressed, Held, JustReleased, Up] {
            s = s.next(phase, true);
            seen.push(s);
        }
        assert_eq!(
            seen,
            [ClickState::Up, ClickState::Pressed, ClickState::Down, ClickState::Released, ClickState::Up]
        );
    }

    #[test]
    fn press_needs_claim() {
        assert_eq!(ClickState::Up.next(ButtonPhase::JustPressed, false), ClickState::Up);
        assert_eq!(ClickState::Up.next(ButtonPhase::Held, true), ClickState::Up);
    }

    #[test]
    fn phase_from_states() {
        assert_eq!(ButtonPhase::from_states(false, true), ButtonPhase::JustPressed);
        assert_eq!(ButtonPhase::from_states(true, false), ButtonPhase::JustReleased);
    }
}
