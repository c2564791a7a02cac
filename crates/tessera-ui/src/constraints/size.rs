/// Rule for one extent (width or height) of a component.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum SizeConstraint {
    Pixel(f32),
    /// Fraction of the parent extent.
    Relative(f32),
    /// Parent extent plus `delta`; a negative delta insets.
    Fill { delta: f32 },
    /// The other resolved extent times the ratio.
    Ratio(f32),
}

impl SizeConstraint {
    #[inline]
    pub fn fill() -> Self {
        Self::Fill { delta: 0.0 }
    }

    /// Whether this extent is computed from the other one.
    #[inline]
    pub fn is_dependent_on_other(&self) -> bool {
        matches!(self, Self::Ratio(_))
    }

    /// `reference_extent` is the other axis' resolved size; only
    /// [`Ratio`](Self::Ratio) reads it.
    pub fn size(&self, parent_extent: f32, reference_extent: f32) -> f32 {
        match *self {
            Self::Pixel(v) => v,
            Self::Relative(f) => parent_extent * f,
            Self::Fill { delta } => parent_extent + delta,
            Self::Ratio(r) => reference_extent * r,
        }
    }
}
