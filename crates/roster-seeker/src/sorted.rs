//! The sorted view: stable permutation of the filtered view.

use std::cmp::Ordering;

use tracing::debug;

use crate::ordering::Comparator;

/// Returns `filtered` reordered by `comparator`, or unchanged when absent.
///
/// The sort is stable: records comparing `Equal` keep their input order.
/// Ties are never broken by any implicit secondary key.
pub fn sort<T: Clone>(filtered: &[T], comparator: Option<&Comparator<T>>) -> Vec<T> {
    match comparator {
        Some(comparator) => stable_order(filtered, comparator)
            .into_iter()
            .map(|index| filtered[index].clone())
            .collect(),
        None => filtered.to_vec(),
    }
}

// Bottom-up merge sort over indices. Accepts comparators that are not total
// orders; `slice::sort_by` may panic on those.
fn stable_order<T>(items: &[T], comparator: &Comparator<T>) -> Vec<usize> {
    let len = items.len();
    let mut order: Vec<usize> = (0..len).collect();
    let mut merged = vec![0; len];
    let mut width = 1;

    while width < len {
        for start in (0..len).step_by(2 * width) {
            let mid = (start + width).min(len);
            let end = (start + 2 * width).min(len);
            let (mut left, mut right, mut out) = (start, mid, start);

            while left < mid && right < end {
                // Take from the right run only when strictly smaller.
                if comparator.compare(&items[order[right]], &items[order[left]]) == Ordering::Less
                {
                    merged[out] = order[right];
                    right += 1;
                } else {
                    merged[out] = order[left];
                    left += 1;
                }
                out += 1;
            }

            let rest_left = mid - left;
            merged[out..out + rest_left].copy_from_slice(&order[left..mid]);
            out += rest_left;
            merged[out..end].copy_from_slice(&order[right..end]);
        }
        std::mem::swap(&mut order, &mut merged);
        width *= 2;
    }
    order
}

/// Derived view holding the result of the latest sort pass.
#[derive(Debug, Clone)]
pub struct SortedView<T> {
    items: Vec<T>,
    generation: u64,
}

impl<T: Clone> SortedView<T> {
    /// Creates an empty view that has not been computed yet.
    pub fn new() -> Self {
        SortedView {
            items: Vec::new(),
            generation: 0,
        }
    }

    /// Re-sorts `filtered` and returns the new contents.
    pub fn recompute(&mut self, filtered: &[T], comparator: Option<&Comparator<T>>) -> &[T] {
        self.items = sort(filtered, comparator);
        self.generation += 1;
        debug!(
            len = self.items.len(),
            sorted = comparator.is_some(),
            generation = self.generation,
            "sorted view recomputed"
        );
        &self.items
    }

    /// Current contents.
    pub fn items(&self) -> &[T] {
        &self.items
    }

    /// Number of records in the view.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns `true` if the view is empty.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// How many times the view has been recomputed.
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

impl<T: Clone> Default for SortedView<T> {
    fn default() -> Self {
        SortedView::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct Row {
        last: &'static str,
        tag: u32,
    }

    fn row(last: &'static str, tag: u32) -> Row {
        Row { last, tag }
    }

    fn by_last() -> Comparator<Row> {
        Comparator::by_key(|r: &Row| r.last)
    }

    #[test]
    fn sorts_ascending_by_last_name() {
        let filtered = vec![row("Smith", 0), row("Anders", 1)];
        let sorted = sort(&filtered, Some(&by_last()));
        assert_eq!(sorted, vec![row("Anders", 1), row("Smith", 0)]);
    }

    #[test]
    fn absent_comparator_is_identity() {
        let filtered = vec![row("b", 0), row("a", 1), row("c", 2)];
        assert_eq!(sort(&filtered, None), filtered);
    }

    #[test]
    fn equal_records_keep_input_order() {
        let filtered: Vec<Row> = (0..37)
            .map(|tag| row(if tag % 3 == 0 { "x" } else { "y" }, tag))
            .rev()
            .collect();
        let sorted = sort(&filtered, Some(&by_last()));

        let xs: Vec<u32> = sorted.iter().filter(|r| r.last == "x").map(|r| r.tag).collect();
        let ys: Vec<u32> = sorted.iter().filter(|r| r.last == "y").map(|r| r.tag).collect();
        assert!(xs.windows(2).all(|w| w[0] > w[1]));
        assert!(ys.windows(2).all(|w| w[0] > w[1]));
        assert_eq!(xs.len() + ys.len(), filtered.len());
        assert!(sorted[..xs.len()].iter().all(|r| r.last == "x"));
    }

    #[test]
    fn all_equal_comparator_is_identity() {
        let filtered = vec![row("c", 0), row("a", 1), row("b", 2)];
        let flat = Comparator::new(|_: &Row, _: &Row| Ordering::Equal);
        assert_eq!(sort(&filtered, Some(&flat)), filtered);
    }

    #[test]
    fn inconsistent_comparator_does_not_panic() {
        let filtered: Vec<Row> = (0..50).map(|tag| row("z", tag)).collect();
        let chaotic = Comparator::new(|a: &Row, b: &Row| {
            if (a.tag + b.tag) % 2 == 0 {
                Ordering::Less
            } else {
                Ordering::Greater
            }
        });
        let sorted = sort(&filtered, Some(&chaotic));
        let mut tags: Vec<u32> = sorted.iter().map(|r| r.tag).collect();
        tags.sort_unstable();
        assert_eq!(tags, (0..50).collect::<Vec<_>>());
    }

    #[test]
    fn handles_small_inputs() {
        assert!(sort::<Row>(&[], Some(&by_last())).is_empty());
        assert_eq!(sort(&[row("a", 0)], Some(&by_last())), vec![row("a", 0)]);
    }

    #[test]
    fn view_follows_comparator_changes() {
        let filtered = vec![row("b", 0), row("a", 1)];
        let mut view = SortedView::new();

        view.recompute(&filtered, Some(&by_last()));
        assert_eq!(view.items()[0], row("a", 1));

        view.recompute(&filtered, Some(&by_last().reversed()));
        assert_eq!(view.items()[0], row("b", 0));

        view.recompute(&filtered, None);
        assert_eq!(view.items(), filtered.as_slice());
        assert_eq!(view.generation(), 3);
    }
}
