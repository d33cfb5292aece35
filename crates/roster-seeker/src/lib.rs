//! Seeker - live search, filter, and sort over observable record collections.
//!
//! Seeker keeps a display surface consistent with three independently owned
//! inputs: a source collection of records, a query string, and the surface's
//! own sort comparator. It provides:
//!
//! - Field access through the [`Searchable`] trait
//! - Single-field [`MatchStrategy`] predicates, ORed by a [`StrategySet`]
//! - Observable primitives: [`Property`] and [`ObservableList`]
//! - Derived views: [`FilteredView`] (order preserving) and [`SortedView`] (stable)
//! - A [`Binding`] that recomputes both views on every change and publishes
//!   the result to a [`DisplaySurface`]
//!
//! # Quick Start
//!
//! ```rust
//! use std::rc::Rc;
//! use roster_seeker::{
//!     Binding, Comparator, MemorySurface, ObservableList, OrderBy, Property, Searchable,
//!     StrategySet, TextOp, Value,
//! };
//!
//! #[derive(Debug, Clone)]
//! struct Person {
//!     first: String,
//!     last: String,
//! }
//!
//! impl Searchable for Person {
//!     fn field_value(&self, field: &str) -> Value<'_> {
//!         match field {
//!             "first" => Value::Text(&self.first),
//!             "last" => Value::Text(&self.last),
//!             _ => Value::None,
//!         }
//!     }
//! }
//!
//! let person = |first: &str, last: &str| Person { first: first.into(), last: last.into() };
//!
//! let source = ObservableList::from(vec![person("Anna", "Smith"), person("Ben", "Anders")]);
//! let query = Property::new(String::new());
//! let table = Rc::new(MemorySurface::new());
//! let strategies = StrategySet::fields(["first", "last"], TextOp::Contains);
//!
//! let _binding = Binding::bind(&source, &query, Rc::clone(&table), strategies).unwrap();
//!
//! // Typing narrows the view; both records contain "an".
//! query.set("an".to_string()).unwrap();
//! assert_eq!(table.len(), 2);
//!
//! // Picking a sort column re-sorts the same rows.
//! table.sort_by(Comparator::by_field(OrderBy::asc("last"))).unwrap();
//! assert_eq!(table.visible()[0].last, "Anders");
//!
//! // New records show up without another query edit.
//! source.push(person("Dana", "Hansen")).unwrap();
//! assert_eq!(table.len(), 3);
//! ```
//!
//! # Pipeline Semantics
//!
//! ```text
//! filtered = [r in source | is_blank(query) ∨ ∃ s ∈ strategies: s.matches(r, query)]
//! sorted   = stable_sort(filtered, comparator)   (identity when no comparator)
//! ```
//!
//! - Filtering keeps source order; it never sorts.
//! - A whitespace-only query is the same as an empty one.
//! - Records comparing equal keep their filtered order.
//! - Every change runs a full, synchronous pass on the caller's thread.
//!
//! Everything here is single-threaded (`Rc`, `RefCell`); handles are not
//! `Send`.

mod binding;
mod error;
mod filtered;
mod observable;
mod op;
mod ordering;
mod set;
mod sorted;
mod strategy;
mod surface;
mod traits;
mod value;

// Re-export public API
pub use binding::{bind_live, Binding, PipelineStats, Trigger};
pub use error::{Result, SeekerError};
pub use filtered::{filter, FilteredView};
pub use observable::{ListChange, ListenerId, ObservableList, Property};
pub use op::TextOp;
pub use ordering::{compare_by_orderings, compare_values, Comparator, Dir, OrderBy};
pub use set::{is_blank, StrategySet};
pub use sorted::{sort, SortedView};
pub use strategy::{FieldMatch, FnMatch, MatchStrategy};
pub use surface::{DisplaySurface, MemorySurface};
pub use traits::Searchable;
pub use value::Value;
