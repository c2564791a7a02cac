use crate::device::ShaderHandle;

use super::{SortKey, ZIndex};

/// A queued request: its z-index, submission order and payload.
#[derive(Debug)]
pub struct QueuedItem<T> {
    pub z: ZIndex,
    pub order: u32,
    pub payload: T,
}

/// Per-frame draw request queue.
///
/// Performance characteristics:
/// - `push()` is O(1)
/// - draining sorts once; the item buffer keeps its capacity across frames
#[derive(Debug)]
pub struct DrawQueue<T> {
    items: Vec<QueuedItem<T>>,
    next_order: u32,
}

impl<T> Default for DrawQueue<T> {
    fn default() -> Self {
        Self { items: Vec::new(), next_order: 0 }
    }
}

impl<T> DrawQueue<T> {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Drops queued items. Keeps allocated capacity for reuse.
    #[inline]
    pub fn clear(&mut self) {
        self.items.clear();
        self.next_order = 0;
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Queued items in submission order.
    #[inline]
    pub fn items(&self) -> &[QueuedItem<T>] {
        &self.items
    }

    #[inline]
    pub fn push(&mut self, z: ZIndex, payload: T) {
        let order = self.next_order;
        self.next_order = self.next_order.wrapping_add(1);
        self.items.push(QueuedItem { z, order, payload });
    }

    /// Empties the queue, returning payloads in issue order.
    ///
    /// `shader_of` is consulted once per item to group equal-z requests by
    /// program; it is called at drain time because the program of a drawable
    /// can change between submission and issue.
    pub fn drain_sorted(&mut self, mut shader_of: impl FnMut(&T) -> Option<ShaderHandle>) -> Vec<T> {
        let mut keyed: Vec<(SortKey, T)> = self
            .items
            .drain(..)
            .map(|item| {
                let key = SortKey::new(item.z, shader_of(&item.payload), item.order);
                (key, item.payload)
            })
            .collect();
        self.next_order = 0;

        // Keys are unique (order), so an unstable sort is deterministic.
        keyed.sort_unstable_by(|a, b| a.0.cmp(&b.0));
        keyed.into_iter().map(|(_, payload)| payload).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drains_in_descending_z() {
        let mut q = DrawQueue::new();
        q.push(ZIndex(3), "three");
        q.push(ZIndex(1), "one");
        q.push(ZIndex(2), "two");
        assert_eq!(q.drain_sorted(|_| None), vec!["three", "two", "one"]);
        assert!(q.is_empty());
    }

    #[test]
    fn equal_z_keeps_submission_order_within_a_shader() {
        let mut q = DrawQueue::new();
        q.push(ZIndex(0), (1, "a"));
        q.push(ZIndex(0), (2, "b"));
        q.push(ZIndex(0), (1, "c"));
        let out = q.drain_sorted(|(s, _)| Some(ShaderHandle(*s)));
        assert_eq!(out, vec![(1, "a"), (1, "c"), (2, "b")]);
    }
}
