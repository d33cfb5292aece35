//! Single-field match strategies.
//!
//! A [`MatchStrategy`] decides whether one record matches a query on one
//! semantic field. Strategies are stateless and never mutate the record or
//! the query; a [`StrategySet`](crate::StrategySet) ORs them together.

use std::fmt;

use crate::error::Result;
use crate::op::TextOp;
use crate::traits::Searchable;

/// Predicate testing one field of a record against the query text.
///
/// Implementations must be case-insensitive. An `Err` means the record is
/// malformed for this strategy (for example the bound field is missing); the
/// pipeline treats it as fatal for the recomputation in progress.
pub trait MatchStrategy<T: ?Sized> {
    /// Name used in logs and diagnostics, usually the bound field.
    fn name(&self) -> &str;

    /// Returns `true` if `record` matches `query` on this strategy's field.
    fn matches(&self, record: &T, query: &str) -> Result<bool>;
}

/// Generic strategy bound to one named field of a [`Searchable`] record.
///
/// # Example
///
/// ```
/// use roster_seeker::{FieldMatch, MatchStrategy, Searchable, Value};
///
/// struct Person { last_name: String }
///
/// impl Searchable for Person {
///     fn field_value(&self, field: &str) -> Value<'_> {
///         match field {
///             "last_name" => Value::Text(&self.last_name),
///             _ => Value::None,
///         }
///     }
/// }
///
/// let strategy = FieldMatch::contains("last_name");
/// let smith = Person { last_name: "Smith".into() };
/// assert!(strategy.matches(&smith, "MIT").unwrap());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldMatch {
    field: String,
    op: TextOp,
}

impl FieldMatch {
    /// Creates a strategy applying `op` to `field`.
    pub fn new(field: impl Into<String>, op: TextOp) -> Self {
        FieldMatch {
            field: field.into(),
            op,
        }
    }

    /// Case-insensitive substring strategy.
    pub fn contains(field: impl Into<String>) -> Self {
        FieldMatch::new(field, TextOp::Contains)
    }

    /// Case-insensitive prefix strategy.
    pub fn starts_with(field: impl Into<String>) -> Self {
        FieldMatch::new(field, TextOp::StartsWith)
    }

    /// The field this strategy is bound to.
    pub fn field(&self) -> &str {
        &self.field
    }

    /// The operator applied to the field.
    pub fn op(&self) -> TextOp {
        self.op
    }
}

impl<T: Searchable + ?Sized> MatchStrategy<T> for FieldMatch {
    fn name(&self) -> &str {
        &self.field
    }

    fn matches(&self, record: &T, query: &str) -> Result<bool> {
        let text = record.text_field(&self.field)?;
        Ok(self.op.eval(text, query))
    }
}

/// Strategy backed by a closure, for ad-hoc fields or computed text.
pub struct FnMatch<F> {
    name: String,
    f: F,
}

impl<F> FnMatch<F> {
    /// Wraps `f` as a named strategy.
    pub fn new(name: impl Into<String>, f: F) -> Self {
        FnMatch {
            name: name.into(),
            f,
        }
    }
}

impl<T: ?Sized, F> MatchStrategy<T> for FnMatch<F>
where
    F: Fn(&T, &str) -> bool,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn matches(&self, record: &T, query: &str) -> Result<bool> {
        Ok((self.f)(record, query))
    }
}

impl<F> fmt::Debug for FnMatch<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnMatch").field("name", &self.name).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SeekerError;
    use crate::value::Value;

    struct Person {
        first: String,
        last: String,
        nickname: Option<String>,
    }

    impl Searchable for Person {
        fn field_value(&self, field: &str) -> Value<'_> {
            match field {
                "first" => Value::Text(&self.first),
                "last" => Value::Text(&self.last),
                "nickname" => self.nickname.as_deref().into(),
                _ => Value::None,
            }
        }
    }

    fn anna() -> Person {
        Person {
            first: "Anna".into(),
            last: "Smith".into(),
            nickname: None,
        }
    }

    #[test]
    fn field_match_contains() {
        let strategy = FieldMatch::contains("first");
        assert!(strategy.matches(&anna(), "nn").unwrap());
        assert!(strategy.matches(&anna(), "AN").unwrap());
        assert!(!strategy.matches(&anna(), "smith").unwrap());
    }

    #[test]
    fn field_match_binds_one_field() {
        let strategy = FieldMatch::contains("last");
        assert!(strategy.matches(&anna(), "smi").unwrap());
        assert!(!strategy.matches(&anna(), "anna").unwrap());
    }

    #[test]
    fn field_match_starts_with() {
        let strategy = FieldMatch::starts_with("last");
        assert!(strategy.matches(&anna(), "sm").unwrap());
        assert!(!strategy.matches(&anna(), "ith").unwrap());
    }

    #[test]
    fn field_match_empty_query_is_defined() {
        let strategy = FieldMatch::contains("first");
        assert!(strategy.matches(&anna(), "").unwrap());
    }

    #[test]
    fn missing_field_is_an_error() {
        let strategy = FieldMatch::contains("patronymic");
        assert_eq!(
            MatchStrategy::<Person>::matches(&strategy, &anna(), "a"),
            Err(SeekerError::MissingField {
                field: "patronymic".into()
            })
        );
    }

    #[test]
    fn absent_optional_field_is_an_error() {
        let strategy = FieldMatch::contains("nickname");
        assert!(matches!(
            strategy.matches(&anna(), "an"),
            Err(SeekerError::MissingField { .. })
        ));

        let annie = Person {
            nickname: Some("Annie".into()),
            ..anna()
        };
        assert!(strategy.matches(&annie, "an").unwrap());
    }

    #[test]
    fn fn_match_delegates() {
        let strategy = FnMatch::new("initials", |p: &Person, q: &str| {
            let initials = format!("{}{}", &p.first[..1], &p.last[..1]);
            initials.eq_ignore_ascii_case(q)
        });
        assert_eq!(MatchStrategy::<Person>::name(&strategy), "initials");
        assert!(strategy.matches(&anna(), "as").unwrap());
        assert!(!strategy.matches(&anna(), "ab").unwrap());
    }
}
