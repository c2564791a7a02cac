use super::Vec2;

/// Axis-aligned rectangle in layout pixels, origin at the top-left corner.
///
/// Layout never produces negative sizes on purpose; a rectangle whose width
/// or height is not positive is empty and contains no point.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Rect {
    pub origin: Vec2,
    pub size: Vec2,
}

impl Rect {
    #[inline]
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { origin: Vec2::new(x, y), size: Vec2::new(w, h) }
    }

    #[inline]
    pub const fn from_origin_size(origin: Vec2, size: Vec2) -> Self {
        Self { origin, size }
    }

    #[inline]
    pub fn from_min_max(min: Vec2, max: Vec2) -> Self {
        Self::from_origin_size(min, max - min)
    }

    #[inline]
    pub fn min(self) -> Vec2 {
        self.origin
    }

    #[inline]
    pub fn max(self) -> Vec2 {
        self.origin + self.size
    }

    #[inline]
    pub fn width(self) -> f32 {
        self.size.x
    }

    #[inline]
    pub fn height(self) -> f32 {
        self.size.y
    }

    #[inline]
    pub fn is_empty(self) -> bool {
        self.size.x <= 0.0 || self.size.y <= 0.0
    }

    /// Same rectangle moved by `delta`.
    #[inline]
    #[must_use]
    pub fn translate(self, delta: Vec2) -> Self {
        Self::from_origin_size(self.origin + delta, self.size)
    }

    /// Smallest rectangle enclosing both.
    #[must_use]
    pub fn union(self, other: Rect) -> Rect {
        let (a, b) = (self.max(), other.max());
        Rect::from_min_max(
            Vec2::new(self.origin.x.min(other.origin.x), self.origin.y.min(other.origin.y)),
            Vec2::new(a.x.max(b.x), a.y.max(b.y)),
        )
    }

    /// Overlapping area, or `None` when the two only touch or are apart.
    pub fn intersect(self, other: Rect) -> Option<Rect> {
        let (a, b) = (self.max(), other.max());
        let overlap = Rect::from_min_max(
            Vec2::new(self.origin.x.max(other.origin.x), self.origin.y.max(other.origin.y)),
            Vec2::new(a.x.min(b.x), a.y.min(b.y)),
        );
        (!overlap.is_empty()).then_some(overlap)
    }

    /// Hit test over `[min, max)`, so adjacent rectangles never both claim
    /// a point on their shared edge.
    #[inline]
    pub fn contains(self, p: Vec2) -> bool {
        let max = self.max();
        p.x >= self.origin.x && p.y >= self.origin.y && p.x < max.x && p.y < max.y
    }
}
