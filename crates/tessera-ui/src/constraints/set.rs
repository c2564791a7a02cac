use std::fmt;
use std::str::FromStr;

use crate::error::UiError;

use super::parse::{parse_clause, Clause};
use super::{Axis, Edge, PositionConstraint, SizeConstraint};

/// The four layout rules of one component.
///
/// Every mutation raises `changed`; only bounds recomputation lowers it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConstraintSet {
    x: Option<PositionConstraint>,
    y: Option<PositionConstraint>,
    width: Option<SizeConstraint>,
    height: Option<SizeConstraint>,
    changed: bool,
}

impl ConstraintSet {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn x(&self) -> Option<PositionConstraint> {
        self.x
    }

    #[inline]
    pub fn y(&self) -> Option<PositionConstraint> {
        self.y
    }

    #[inline]
    pub fn width(&self) -> Option<SizeConstraint> {
        self.width
    }

    #[inline]
    pub fn height(&self) -> Option<SizeConstraint> {
        self.height
    }

    pub fn set_x(&mut self, c: PositionConstraint) {
        self.x = Some(c);
        self.changed = true;
    }

    pub fn set_y(&mut self, c: PositionConstraint) {
        self.y = Some(c);
        self.changed = true;
    }

    /// Fails if both sizes would then depend on each other.
    pub fn set_width(&mut self, c: SizeConstraint) -> Result<(), UiError> {
        if c.is_dependent_on_other() && self.height.is_some_and(|h| h.is_dependent_on_other()) {
            return Err(UiError::CircularSize(Axis::Width));
        }
        self.width = Some(c);
        self.changed = true;
        Ok(())
    }

    /// Fails if both sizes would then depend on each other.
    pub fn set_height(&mut self, c: SizeConstraint) -> Result<(), UiError> {
        if c.is_dependent_on_other() && self.width.is_some_and(|w| w.is_dependent_on_other()) {
            return Err(UiError::CircularSize(Axis::Height));
        }
        self.height = Some(c);
        self.changed = true;
        Ok(())
    }

    pub fn apply(&mut self, clause: Clause) -> Result<(), UiError> {
        match clause {
            Clause::Position(Axis::X, c) => self.set_x(c),
            Clause::Position(_, c) => self.set_y(c),
            Clause::Size(Axis::Width, c) => self.set_width(c)?,
            Clause::Size(_, c) => self.set_height(c)?,
        }
        Ok(())
    }

    /// Parses `text` and applies its clauses in order. On error the set is
    /// left as it was.
    pub fn apply_str(&mut self, text: &str) -> Result<(), UiError> {
        let clauses = text.split_whitespace().map(parse_clause).collect::<Result<Vec<_>, _>>()?;
        let mut next = self.clone();
        for clause in clauses {
            next.apply(clause)?;
        }
        *self = next;
        Ok(())
    }

    #[inline]
    pub fn is_complete(&self) -> bool {
        self.missing_axis().is_none()
    }

    /// First unset axis in x, y, width, height order.
    pub fn missing_axis(&self) -> Option<Axis> {
        if self.x.is_none() {
            Some(Axis::X)
        } else if self.y.is_none() {
            Some(Axis::Y)
        } else if self.width.is_none() {
            Some(Axis::Width)
        } else if self.height.is_none() {
            Some(Axis::Height)
        } else {
            None
        }
    }

    #[inline]
    pub fn is_changed(&self) -> bool {
        self.changed
    }

    pub(crate) fn clear_changed(&mut self) {
        self.changed = false;
    }
}

impl FromStr for ConstraintSet {
    type Err = UiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut set = ConstraintSet::new();
        set.apply_str(s)?;
        Ok(set)
    }
}

fn write_position(f: &mut fmt::Formatter<'_>, axis: Axis, c: PositionConstraint) -> fmt::Result {
    let edge = |e: Edge| match (axis, e) {
        (Axis::X, Edge::Near) => "left",
        (Axis::X, Edge::Far) => "right",
        (_, Edge::Near) => "top",
        (_, Edge::Far) => "bottom",
    };
    let axis = axis.token();
    match c {
        PositionConstraint::Pixel { offset, edge: e } => write!(f, "{axis}:pixel:{offset}:{}", edge(e)),
        PositionConstraint::Relative { fraction, edge: e } => {
            write!(f, "{axis}:relative:{fraction}:{}", edge(e))
        }
        PositionConstraint::Center { offset } => write!(f, "{axis}:center:{offset}"),
    }
}

fn write_size(f: &mut fmt::Formatter<'_>, axis: Axis, c: SizeConstraint) -> fmt::Result {
    let axis = axis.token();
    match c {
        SizeConstraint::Pixel(v) => write!(f, "{axis}:pixel:{v}"),
        SizeConstraint::Relative(v) => write!(f, "{axis}:relative:{v}"),
        SizeConstraint::Fill { delta } => write!(f, "{axis}:fill:{delta}"),
        SizeConstraint::Ratio(r) => write!(f, "{axis}:ratio:{r}"),
    }
}

impl fmt::Display for ConstraintSet {
    /// Canonical constraint-language text; parses back to an equal set.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut sep = "";
        if let Some(c) = self.x {
            write_position(f, Axis::X, c)?;
            sep = " ";
        }
        if let Some(c) = self.y {
            f.write_str(sep)?;
            write_position(f, Axis::Y, c)?;
            sep = " ";
        }
        if let Some(c) = self.width {
            f.write_str(sep)?;
            write_size(f, Axis::Width, c)?;
            sep = " ";
        }
        if let Some(c) = self.height {
            f.write_str(sep)?;
            write_size(f, Axis::Height, c)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn second_dependent_size_is_rejected() {
        let mut set = ConstraintSet::new();
        set.set_width(SizeConstraint::Ratio(2.0)).unwrap();
        let err = set.set_height(SizeConstraint::Ratio(0.5)).unwrap_err();
        assert!(matches!(err, UiError::CircularSize(Axis::Height)));
        assert_eq!(set.height(), None);

        set.set_height(SizeConstraint::Pixel(10.0)).unwrap();
        assert!(set.set_width(SizeConstraint::Ratio(3.0)).is_ok());
    }

    #[test]
    fn completeness_reports_first_gap() {
        let mut set = ConstraintSet::new();
        assert_eq!(set.missing_axis(), Some(Axis::X));
        set.set_x(PositionConstraint::pixel(0.0));
        set.set_y(PositionConstraint::pixel(0.0));
        assert_eq!(set.missing_axis(), Some(Axis::Width));
        set.set_width(SizeConstraint::fill()).unwrap();
        set.set_height(SizeConstraint::fill()).unwrap();
        assert!(set.is_complete());
        assert!(set.is_changed());
    }

    #[test]
    fn text_form_round_trips() {
        let text = "x:pixel:10:right y:center:-4 w:relative:0.5 h:ratio:0.75";
        let set: ConstraintSet = text.parse().unwrap();
        assert_eq!(set.x(), Some(PositionConstraint::Pixel { offset: 10.0, edge: Edge::Far }));
        assert_eq!(set.to_string(), text);
        assert_eq!(set.to_string().parse::<ConstraintSet>().unwrap(), set);
    }

    #[test]
    fn failed_apply_leaves_set_untouched() {
        let mut set: ConstraintSet = "x:pixel:1 y:pixel:2 w:ratio:1 h:pixel:3".parse().unwrap();
        let before = set.clone();
        assert!(set.apply_str("x:pixel:9 h:ratio:2").is_err());
        assert_eq!(set, before);
        assert!(set.apply_str("x:pixel:9 y:bogus:1").is_err());
        assert_eq!(set, before);
    }
}
