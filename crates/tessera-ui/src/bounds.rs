use tessera_engine::coords::{Rect, Vec2};

use crate::constraints::{Axis, ConstraintSet};
use crate::error::UiError;

/// Resolves a component rectangle inside `parent`.
///
/// Sizes go first: an independent width, then the height (which may read the
/// width), then a width that reads the height. Positions are computed from
/// the resolved sizes, and `pivot` (fractions of the size) shifts the box so
/// that the pivot point lands on the computed position.
pub fn resolve_bounds(set: &ConstraintSet, parent: Rect, pivot: Vec2) -> Result<Rect, UiError> {
    let (Some(xc), Some(yc), Some(wc), Some(hc)) = (set.x(), set.y(), set.width(), set.height()) else {
        return Err(UiError::IncompleteConstraints(set.missing_axis().unwrap_or(Axis::X)));
    };

    let mut width = 0.0;
    if !wc.is_dependent_on_other() {
        width = wc.size(parent.width(), 0.0);
    }
    let height = hc.size(parent.height(), width);
    if wc.is_dependent_on_other() {
        width = wc.size(parent.width(), height);
    }

    let x = xc.position(parent.width(), width);
    let y = yc.position(parent.height(), height);

    Ok(Rect::new(
        parent.origin.x + x - width * pivot.x,
        parent.origin.y + y - height * pivot.y,
        width,
        height,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(text: &str) -> ConstraintSet {
        text.parse().unwrap()
    }

    #[test]
    fn any_missing_axis_fails() {
        let parent = Rect::new(0.0, 0.0, 100.0, 100.0);
        for (text, axis) in [
            ("y:pixel:0 w:pixel:1 h:pixel:1", Axis::X),
            ("x:pixel:0 w:pixel:1 h:pixel:1", Axis::Y),
            ("x:pixel:0 y:pixel:0 h:pixel:1", Axis::Width),
            ("x:pixel:0 y:pixel:0 w:pixel:1", Axis::Height),
        ] {
            let err = resolve_bounds(&set(text), parent, Vec2::zero()).unwrap_err();
            assert!(matches!(err, UiError::IncompleteConstraints(a) if a == axis), "{text}");
        }
    }

    #[test]
    fn fill_with_zero_delta_matches_parent() {
        let parent = Rect::new(12.0, 34.0, 320.0, 240.0);
        let r = resolve_bounds(&set("x:pixel:0 y:pixel:0 w:fill:0 h:fill:0"), parent, Vec2::zero()).unwrap();
        assert_eq!(r, parent);
    }

    #[test]
    fn far_edge_and_offset_parent() {
        let parent = Rect::new(50.0, 0.0, 100.0, 100.0);
        let near = resolve_bounds(&set("x:pixel:10:left y:pixel:0 w:pixel:20 h:pixel:5"), parent, Vec2::zero()).unwrap();
        let far = resolve_bounds(&set("x:pixel:10:right y:pixel:0 w:pixel:20 h:pixel:5"), parent, Vec2::zero()).unwrap();
        assert_eq!(near.origin.x, 60.0);
        assert_eq!(far.origin.x, 120.0);
    }

    #[test]
    fn width_may_follow_height() {
        let parent = Rect::new(0.0, 0.0, 200.0, 100.0);
        let r = resolve_bounds(&set("x:center:0 y:center:0 w:ratio:2 h:relative:0.5"), parent, Vec2::zero()).unwrap();
        assert_eq!(r, Rect::new(50.0, 25.0, 100.0, 50.0));
    }

    #[test]
    fn pivot_shifts_box() {
        let parent = Rect::new(0.0, 0.0, 100.0, 100.0);
        let r = resolve_bounds(&set("x:relative:0.5 y:relative:0.5 w:pixel:20 h:pixel:10"), parent, Vec2::splat(0.5)).unwrap();
        assert_eq!(r, Rect::new(40.0, 45.0, 20.0, 10.0));
    }
}
