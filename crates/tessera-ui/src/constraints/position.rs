/// Which parent edge a position is measured from.
///
/// `Near` is left for x and top for y; `Far` is right for x and bottom for y.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Default)]
pub enum Edge {
    #[default]
    Near,
    Far,
}

/// Rule for one coordinate of a component.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum PositionConstraint {
    /// `offset` pixels from `edge`.
    Pixel { offset: f32, edge: Edge },
    /// `fraction` of the parent extent from `edge`.
    Relative { fraction: f32, edge: Edge },
    /// Centered in the parent, shifted by `offset`.
    Center { offset: f32 },
}

impl PositionConstraint {
    #[inline]
    pub fn pixel(offset: f32) -> Self {
        Self::Pixel { offset, edge: Edge::Near }
    }

    #[inline]
    pub fn relative(fraction: f32) -> Self {
        Self::Relative { fraction, edge: Edge::Near }
    }

    #[inline]
    pub fn center() -> Self {
        Self::Center { offset: 0.0 }
    }

    /// Coordinate of the element's near edge relative to the parent's.
    ///
    /// A far-edge rule places the element's far edge `offset` (or
    /// `parent * fraction`) away from the parent's far edge.
    pub fn position(&self, parent_extent: f32, reference_extent: f32) -> f32 {
        match *self {
            Self::Pixel { offset, edge: Edge::Near } => offset,
            Self::Pixel { offset, edge: Edge::Far } => parent_extent - offset - reference_extent,
            Self::Relative { fraction, edge: Edge::Near } => parent_extent * fraction,
            Self::Relative { fraction, edge: Edge::Far } => {
                parent_extent - parent_extent * fraction - reference_extent
            }
            Self::Center { offset } => (parent_extent - reference_extent) / 2.0 + offset,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pixel_anchoring() {
        let left = PositionConstraint::Pixel { offset: 10.0, edge: Edge::Near };
        let right = PositionConstraint::Pixel { offset: 10.0, edge: Edge::Far };
        assert_eq!(left.position(100.0, 20.0), 10.0);
        assert_eq!(right.position(100.0, 20.0), 70.0);
    }

    #[test]
    fn relative_and_center() {
        assert_eq!(PositionConstraint::relative(0.25).position(200.0, 50.0), 50.0);
        let far = PositionConstraint::Relative { fraction: 0.25, edge: Edge::Far };
        assert_eq!(far.position(200.0, 50.0), 100.0);
        assert_eq!(PositionConstraint::center().position(200.0, 50.0), 75.0);
        assert_eq!(PositionConstraint::Center { offset: -5.0 }.position(200.0, 50.0), 70.0);
    }
}
