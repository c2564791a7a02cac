use core::cmp::Ordering;

use crate::device::ShaderHandle;

use super::ZIndex;

/// Issue-order key for queued draw requests.
///
/// Ordering rules:
/// 1) `z`: descending (background first)
/// 2) `shader`: ascending, so requests sharing a program are adjacent
/// 3) `order`: ascending (submission order)
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct SortKey {
    pub z: ZIndex,
    pub shader: Option<ShaderHandle>,
    /// Submission index, keeping equal keys stable.
    pub order: u32,
}

impl SortKey {
    #[inline]
    pub const fn new(z: ZIndex, shader: Option<ShaderHandle>, order: u32) -> Self {
        Self { z, shader, order }
    }
}

impl Ord for SortKey {
    #[inline]
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .z
            .cmp(&self.z)
            .then_with(|| self.shader.cmp(&other.shader))
            .then_with(|| self.order.cmp(&other.order))
    }
}

impl PartialOrd for SortKey {
    #[inline]
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
