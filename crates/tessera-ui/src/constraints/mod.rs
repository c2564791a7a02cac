//! Constraint-based layout primitives.
//!
//! Every component owns a [`ConstraintSet`] with one rule per axis. Rules
//! compute a coordinate or an extent from the parent's extent and, for
//! dependent sizes, from the other resolved size. The textual form
//! (`"x:pixel:10:left y:center:0 w:relative:0.5 h:ratio:0.75"`) is parsed by
//! [`ConstraintSet::from_str`](std::str::FromStr).

mod parse;
mod position;
mod set;
mod size;

use std::fmt;

pub use parse::{parse_clause, Clause};
pub use position::{Edge, PositionConstraint};
pub use set::ConstraintSet;
pub use size::SizeConstraint;

/// One of the four constrained quantities.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Axis {
    X,
    Y,
    Width,
    Height,
}

impl Axis {
    #[inline]
    pub fn is_position(self) -> bool {
        matches!(self, Axis::X | Axis::Y)
    }

    /// Canonical token in the constraint language.
    pub fn token(self) -> &'static str {
        match self {
            Axis::X => "x",
            Axis::Y => "y",
            Axis::Width => "w",
            Axis::Height => "h",
        }
    }
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Axis::X => "x",
            Axis::Y => "y",
            Axis::Width => "width",
            Axis::Height => "height",
        })
    }
}
