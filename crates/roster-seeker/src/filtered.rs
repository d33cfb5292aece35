//! The filtered view: order-preserving subsequence of the source.

use tracing::debug;

use crate::error::Result;
use crate::set::{is_blank, StrategySet};

/// Returns the records of `source` that satisfy the query, in source order.
///
/// A blank query (empty or whitespace only) passes every record through
/// without consulting the strategies. Otherwise a record is kept when any
/// strategy in `strategies` matches it. The first strategy error aborts the
/// whole pass.
pub fn filter<'a, T>(
    source: &'a [T],
    query: &str,
    strategies: &StrategySet<T>,
) -> Result<Vec<&'a T>> {
    if is_blank(query) {
        return Ok(source.iter().collect());
    }

    let mut kept = Vec::new();
    for record in source {
        if strategies.matches_any(record, query)? {
            kept.push(record);
        }
    }
    Ok(kept)
}

/// Derived view holding the result of the latest filter pass.
#[derive(Debug, Clone)]
pub struct FilteredView<T> {
    items: Vec<T>,
    generation: u64,
}

impl<T: Clone> FilteredView<T> {
    /// Creates an empty view that has not been computed yet.
    pub fn new() -> Self {
        FilteredView {
            items: Vec::new(),
            generation: 0,
        }
    }

    /// Recomputes the view from scratch and returns the new contents.
    ///
    /// On error the previous contents are kept.
    pub fn recompute(
        &mut self,
        source: &[T],
        query: &str,
        strategies: &StrategySet<T>,
    ) -> Result<&[T]> {
        let kept = filter(source, query, strategies)?;
        self.items = kept.into_iter().cloned().collect();
        self.generation += 1;
        debug!(
            query,
            source = source.len(),
            kept = self.items.len(),
            generation = self.generation,
            "filtered view recomputed"
        );
        Ok(&self.items)
    }

    /// Current contents.
    pub fn items(&self) -> &[T] {
        &self.items
    }

    /// Number of records in the view.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns `true` if nothing matched.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// How many times the view has been recomputed.
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

impl<T: Clone> Default for FilteredView<T> {
    fn default() -> Self {
        FilteredView::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SeekerError;
    use crate::op::TextOp;
    use crate::strategy::FieldMatch;
    use crate::traits::Searchable;
    use crate::value::Value;

    #[derive(Debug, Clone, PartialEq)]
    struct Person {
        first: &'static str,
        last: &'static str,
    }

    impl Searchable for Person {
        fn field_value(&self, field: &str) -> Value<'_> {
            match field {
                "first" => Value::Text(self.first),
                "last" => Value::Text(self.last),
                _ => Value::None,
            }
        }
    }

    fn people() -> Vec<Person> {
        vec![
            Person {
                first: "Anna",
                last: "Smith",
            },
            Person {
                first: "Ben",
                last: "Anders",
            },
            Person {
                first: "Carl",
                last: "Jones",
            },
        ]
    }

    fn names() -> StrategySet<Person> {
        StrategySet::fields(["first", "last"], TextOp::Contains)
    }

    #[test]
    fn matches_on_either_field() {
        let source = people();
        let kept = filter(&source, "an", &names()).unwrap();
        assert_eq!(kept, vec![&source[0], &source[1]]);
    }

    #[test]
    fn no_match_is_empty_not_error() {
        let source = people();
        assert!(filter(&source, "zzz", &names()).unwrap().is_empty());
    }

    #[test]
    fn blank_query_passes_everything() {
        let source = people();
        for query in ["", "   ", "\t"] {
            let kept = filter(&source, query, &names()).unwrap();
            assert_eq!(kept.len(), source.len());
        }
    }

    #[test]
    fn blank_query_skips_strategies() {
        let source = people();
        let broken = StrategySet::fields(["missing"], TextOp::Contains);
        assert_eq!(filter(&source, " ", &broken).unwrap().len(), 3);
        assert_eq!(
            filter(&source, "a", &broken),
            Err(SeekerError::MissingField {
                field: "missing".into()
            })
        );
    }

    #[test]
    fn empty_strategy_set_filters_everything_out() {
        let source = people();
        assert!(filter(&source, "a", &StrategySet::new()).unwrap().is_empty());
    }

    #[test]
    fn view_tracks_generations() {
        let source = people();
        let mut view = FilteredView::new();
        assert_eq!(view.generation(), 0);

        view.recompute(&source, "jones", &names()).unwrap();
        assert_eq!(view.items(), &source[2..]);
        assert_eq!(view.generation(), 1);

        view.recompute(&source, "", &names()).unwrap();
        assert_eq!(view.len(), 3);
        assert_eq!(view.generation(), 2);
    }

    #[test]
    fn view_keeps_contents_on_error() {
        let source = people();
        let mut view = FilteredView::new();
        view.recompute(&source, "ben", &names()).unwrap();

        let broken = StrategySet::fields(["missing"], TextOp::Contains);
        assert!(view.recompute(&source, "ben", &broken).is_err());
        assert_eq!(view.items(), &source[1..2]);
        assert_eq!(view.generation(), 1);
    }
}
