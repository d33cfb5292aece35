//! Sort criteria and comparators.
//!
//! [`Dir`] and [`OrderBy`] describe a sort column. [`Comparator`] is the
//! shared, runtime-replaceable comparison function a display surface hands to
//! the sorted view.

use std::cmp::Ordering;
use std::fmt;
use std::rc::Rc;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::SeekerError;
use crate::traits::Searchable;
use crate::value::Value;

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dir {
    /// Ascending order (smallest first).
    #[default]
    Asc,
    /// Descending order (largest first).
    Desc,
}

impl Dir {
    /// Applies this direction to an ordering.
    ///
    /// For `Asc`, returns the ordering unchanged.
    /// For `Desc`, reverses the ordering.
    pub fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            Dir::Asc => ordering,
            Dir::Desc => ordering.reverse(),
        }
    }

    /// Returns the display name of this direction.
    pub fn as_str(self) -> &'static str {
        match self {
            Dir::Asc => "asc",
            Dir::Desc => "desc",
        }
    }
}

impl fmt::Display for Dir {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Dir {
    type Err = SeekerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "asc" | "ascending" => Ok(Dir::Asc),
            "desc" | "descending" => Ok(Dir::Desc),
            _ => Err(SeekerError::InvalidDirection(s.to_string())),
        }
    }
}

/// A single sort column: a field and a direction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderBy {
    /// The field to sort by.
    pub field: String,
    /// The sort direction.
    #[serde(default)]
    pub dir: Dir,
}

impl OrderBy {
    /// Creates a new ascending ordering for the given field.
    pub fn asc(field: impl Into<String>) -> Self {
        OrderBy::new(field, Dir::Asc)
    }

    /// Creates a new descending ordering for the given field.
    pub fn desc(field: impl Into<String>) -> Self {
        OrderBy::new(field, Dir::Desc)
    }

    /// Creates a new ordering with the given direction.
    pub fn new(field: impl Into<String>, dir: Dir) -> Self {
        OrderBy {
            field: field.into(),
            dir,
        }
    }

    /// Compares two values according to this ordering.
    pub fn compare(&self, a: &Value<'_>, b: &Value<'_>) -> Ordering {
        self.dir.apply(compare_values(a, b))
    }
}

/// Parses `field` or `field:dir`, e.g. `last_name:desc`.
impl FromStr for OrderBy {
    type Err = SeekerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (field, dir) = match s.split_once(':') {
            Some((field, dir)) => (field.trim(), dir.trim().parse()?),
            None => (s.trim(), Dir::Asc),
        };
        if field.is_empty() {
            return Err(SeekerError::EmptySortField(s.to_string()));
        }
        Ok(OrderBy::new(field, dir))
    }
}

impl fmt::Display for OrderBy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.field, self.dir)
    }
}

/// Compares two field values: text by code point, absent fields last.
pub fn compare_values(a: &Value<'_>, b: &Value<'_>) -> Ordering {
    match (a, b) {
        (Value::Text(a), Value::Text(b)) => a.cmp(b),
        (Value::None, Value::None) => Ordering::Equal,
        (Value::None, Value::Text(_)) => Ordering::Greater,
        (Value::Text(_), Value::None) => Ordering::Less,
    }
}

/// Shared comparison function over records.
///
/// Comparators are cheap to clone and are swapped at runtime by whoever owns
/// the current sort column. Two records that compare `Equal` keep their
/// relative order in the sorted view.
///
/// # Example
///
/// ```
/// use roster_seeker::Comparator;
///
/// let by_len = Comparator::by_key(|s: &String| s.len());
/// let longest_first = by_len.reversed();
///
/// let mut words = vec!["bb".to_string(), "a".to_string(), "ccc".to_string()];
/// words.sort_by(|a, b| longest_first.compare(a, b));
/// assert_eq!(words, ["ccc", "bb", "a"]);
/// ```
pub struct Comparator<T> {
    cmp: Rc<dyn Fn(&T, &T) -> Ordering>,
}

impl<T> Comparator<T> {
    /// Compares two records.
    pub fn compare(&self, a: &T, b: &T) -> Ordering {
        (self.cmp)(a, b)
    }

    /// Returns `true` if both handles share the same function.
    pub fn ptr_eq(&self, other: &Comparator<T>) -> bool {
        Rc::ptr_eq(&self.cmp, &other.cmp)
    }
}

impl<T: 'static> Comparator<T> {
    /// Wraps a comparison function.
    pub fn new(cmp: impl Fn(&T, &T) -> Ordering + 'static) -> Self {
        Comparator { cmp: Rc::new(cmp) }
    }

    /// Orders by a key extracted from each record.
    pub fn by_key<K: Ord>(key: impl Fn(&T) -> K + 'static) -> Self {
        Comparator::new(move |a, b| key(a).cmp(&key(b)))
    }

    /// Returns the opposite ordering.
    pub fn reversed(self) -> Self {
        Comparator::new(move |a, b| self.compare(a, b).reverse())
    }

    /// Uses `next` to break ties left by `self`.
    pub fn then(self, next: Comparator<T>) -> Self {
        Comparator::new(move |a, b| self.compare(a, b).then_with(|| next.compare(a, b)))
    }
}

impl<T: Searchable + 'static> Comparator<T> {
    /// Orders by one field of a [`Searchable`] record.
    pub fn by_field(order: OrderBy) -> Self {
        Comparator::new(move |a: &T, b: &T| {
            order.compare(&a.field_value(&order.field), &b.field_value(&order.field))
        })
    }

    /// Orders by several columns; later columns break ties of earlier ones.
    pub fn by_fields(orders: &[OrderBy]) -> Self {
        let orders = orders.to_vec();
        Comparator::new(move |a: &T, b: &T| compare_by_orderings(a, b, &orders))
    }
}

impl<T> Clone for Comparator<T> {
    fn clone(&self) -> Self {
        Comparator {
            cmp: Rc::clone(&self.cmp),
        }
    }
}

impl<T> fmt::Debug for Comparator<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Comparator")
            .field("ptr", &Rc::as_ptr(&self.cmp).cast::<()>())
            .finish()
    }
}

/// Compares two records using a list of ordering clauses.
///
/// Uses the first clause as the primary sort key, the second to break ties, etc.
/// If all clauses compare equal, returns `Equal`.
pub fn compare_by_orderings<T>(a: &T, b: &T, orderings: &[OrderBy]) -> Ordering
where
    T: Searchable + ?Sized,
{
    orderings
        .iter()
        .map(|order| order.compare(&a.field_value(&order.field), &b.field_value(&order.field)))
        .find(|ordering| ordering.is_ne())
        .unwrap_or(Ordering::Equal)
}
