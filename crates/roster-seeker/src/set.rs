//! OR-combination of match strategies.
//!
//! A [`StrategySet`] holds an ordered list of strategies and reports a match
//! when any of them matches. Order only affects how early evaluation stops,
//! never the result.

use std::fmt;

use crate::error::Result;
use crate::op::TextOp;
use crate::strategy::{FieldMatch, MatchStrategy};
use crate::traits::Searchable;

/// Returns `true` for queries that are empty or contain only whitespace.
///
/// Blank queries pass every record through the filter.
pub fn is_blank(query: &str) -> bool {
    query.trim().is_empty()
}

/// Ordered collection of strategies combined with logical OR.
///
/// # Example
///
/// ```
/// use roster_seeker::{FieldMatch, Searchable, StrategySet, Value};
///
/// struct Person { first: String, last: String }
///
/// impl Searchable for Person {
///     fn field_value(&self, field: &str) -> Value<'_> {
///         match field {
///             "first" => Value::Text(&self.first),
///             "last" => Value::Text(&self.last),
///             _ => Value::None,
///         }
///     }
/// }
///
/// let set = StrategySet::new()
///     .with(FieldMatch::contains("first"))
///     .with(FieldMatch::contains("last"));
///
/// let ben = Person { first: "Ben".into(), last: "Anders".into() };
/// assert!(set.matches_any(&ben, "an").unwrap());
/// assert!(!set.matches_any(&ben, "zzz").unwrap());
/// ```
pub struct StrategySet<T: ?Sized> {
    strategies: Vec<Box<dyn MatchStrategy<T>>>,
}

impl<T: ?Sized> StrategySet<T> {
    /// Creates an empty set. An empty set matches nothing.
    pub fn new() -> Self {
        StrategySet {
            strategies: Vec::new(),
        }
    }

    /// Appends a strategy, builder style.
    pub fn with(mut self, strategy: impl MatchStrategy<T> + 'static) -> Self {
        self.push(strategy);
        self
    }

    /// Appends a strategy.
    pub fn push(&mut self, strategy: impl MatchStrategy<T> + 'static) {
        self.strategies.push(Box::new(strategy));
    }

    /// Appends an already boxed strategy.
    pub fn push_boxed(&mut self, strategy: Box<dyn MatchStrategy<T>>) {
        self.strategies.push(strategy);
    }

    /// Number of strategies in the set.
    pub fn len(&self) -> usize {
        self.strategies.len()
    }

    /// Returns `true` if the set holds no strategies.
    pub fn is_empty(&self) -> bool {
        self.strategies.is_empty()
    }

    /// Strategy names in evaluation order.
    pub fn names(&self) -> Vec<&str> {
        self.strategies.iter().map(|s| s.name()).collect()
    }

    /// Returns `true` if any strategy matches, stopping at the first match.
    ///
    /// Returns `Ok(false)` for an empty set. The first strategy error is
    /// returned as-is.
    pub fn matches_any(&self, record: &T, query: &str) -> Result<bool> {
        for strategy in &self.strategies {
            if strategy.matches(record, query)? {
                return Ok(true);
            }
        }
        Ok(false)
    }
}

impl<T: Searchable + ?Sized + 'static> StrategySet<T> {
    /// Builds a set with one [`FieldMatch`] per field, all using `op`.
    pub fn fields<I, S>(fields: I, op: TextOp) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        fields
            .into_iter()
            .fold(StrategySet::new(), |set, field| {
                set.with(FieldMatch::new(field, op))
            })
    }
}

impl<T: ?Sized> Default for StrategySet<T> {
    fn default() -> Self {
        StrategySet::new()
    }
}

impl<T: ?Sized> fmt::Debug for StrategySet<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StrategySet")
            .field("strategies", &self.names())
            .finish()
    }
}
