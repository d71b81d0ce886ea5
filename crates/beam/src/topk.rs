//! Bounded best-K selection.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

/// Keeps the `capacity` best (lowest-scoring) items seen so far.
///
/// Backed by a fixed-capacity worst-out max-heap: pushing into a full
/// selection evicts the current worst item when the newcomer beats it.
/// This is a bounded top-K selection, not a sorted queue; the full
/// candidate set is never sorted.
pub(crate) struct TopK<T> {
    capacity: usize,
    seq: u64,
    heap: BinaryHeap<Entry<T>>,
}

struct Entry<T> {
    score: i64,
    /// Insertion order; breaks score ties deterministically (earlier wins).
    seq: u64,
    value: T,
}

impl<T> PartialEq for Entry<T> {
    fn eq(&self, other: &Self) -> bool {
        self.score == other.score && self.seq == other.seq
    }
}

impl<T> Eq for Entry<T> {}

impl<T> PartialOrd for Entry<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<T> Ord for Entry<T> {
    fn cmp(&self, other: &Self) -> Ordering {
        // Max-heap on (score, seq): the root is the worst retained item.
        (self.score, self.seq).cmp(&(other.score, other.seq))
    }
}

impl<T> TopK<T> {
    pub(crate) fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "TopK capacity must be positive");
        Self {
            capacity,
            seq: 0,
            heap: BinaryHeap::with_capacity(capacity + 1),
        }
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    /// Offer an item; it is retained iff it ranks among the best `capacity`.
    pub(crate) fn push(&mut self, score: i64, value: T) {
        let entry = Entry {
            score,
            seq: self.seq,
            value,
        };
        self.seq += 1;

        if self.heap.len() < self.capacity {
            self.heap.push(entry);
            return;
        }

        if let Some(worst) = self.heap.peek()
            && (entry.score, entry.seq) < (worst.score, worst.seq)
        {
            self.heap.pop();
            self.heap.push(entry);
        }
    }

    /// Drain the retained items, best first.
    pub(crate) fn into_sorted(self) -> Vec<(i64, T)> {
        let mut items: Vec<Entry<T>> = self.heap.into_vec();
        items.sort_by_key(|entry| (entry.score, entry.seq));
        items
            .into_iter()
            .map(|entry| (entry.score, entry.value))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn retains_only_the_best() {
        let mut topk = TopK::new(3);
        for (score, value) in [(5, 'a'), (1, 'b'), (4, 'c'), (2, 'd'), (3, 'e')] {
            topk.push(score, value);
        }

        let kept = topk.into_sorted();
        assert_eq!(kept.len(), 3);
        assert_eq!(
            kept.iter().map(|(_, v)| *v).collect::<Vec<_>>(),
            vec!['b', 'd', 'e']
        );
    }

    #[test]
    fn ties_prefer_earlier_insertion() {
        let mut topk = TopK::new(2);
        topk.push(7, "first");
        topk.push(7, "second");
        topk.push(7, "third");

        let kept = topk.into_sorted();
        assert_eq!(
            kept.iter().map(|(_, v)| *v).collect::<Vec<_>>(),
            vec!["first", "second"]
        );
    }

    #[test]
    fn under_capacity_keeps_everything() {
        let mut topk = TopK::new(8);
        topk.push(2, 1);
        topk.push(1, 2);

        assert_eq!(topk.into_sorted().len(), 2);
    }
}
