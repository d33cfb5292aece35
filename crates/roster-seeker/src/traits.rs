//! Field access for searchable records.
//!
//! This module provides the [`Searchable`] trait, which record types
//! implement to expose their named fields to strategies and comparators.

use crate::error::{Result, SeekerError};
use crate::value::Value;

/// Trait for records that can be searched and sorted by field name.
///
/// # Example
///
/// ```
/// use roster_seeker::{Searchable, Value};
///
/// struct Person {
///     first_name: String,
///     last_name: String,
/// }
///
/// impl Searchable for Person {
///     fn field_value(&self, field: &str) -> Value<'_> {
///         match field {
///             "first_name" => Value::Text(&self.first_name),
///             "last_name" => Value::Text(&self.last_name),
///             _ => Value::None,
///         }
///     }
/// }
///
/// let anna = Person { first_name: "Anna".into(), last_name: "Smith".into() };
/// assert_eq!(anna.text_field("last_name").unwrap(), "Smith");
/// assert!(anna.text_field("nickname").is_err());
/// ```
pub trait Searchable {
    /// Returns the value of a field, or [`Value::None`] if the record has
    /// no such field.
    fn field_value(&self, field: &str) -> Value<'_>;

    /// Returns the text held by `field`.
    ///
    /// A missing field is [`SeekerError::MissingField`]: the record is
    /// malformed for the strategy that asked.
    fn text_field(&self, field: &str) -> Result<&str> {
        self.field_value(field)
            .as_str()
            .ok_or_else(|| SeekerError::MissingField {
                field: field.to_string(),
            })
    }

    /// Returns a static accessor function, handy where a plain
    /// `fn(&T, &str) -> Value` is expected.
    fn accessor<'a>(item: &'a Self, field: &str) -> Value<'a>
    where
        Self: Sized,
    {
        item.field_value(field)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct TestItem {
        name: String,
        alias: Option<String>,
    }

    impl Searchable for TestItem {
        fn field_value(&self, field: &str) -> Value<'_> {
            match field {
                "name" => Value::Text(&self.name),
                "alias" => self.alias.as_deref().into(),
                _ => Value::None,
            }
        }
    }

    fn item() -> TestItem {
        TestItem {
            name: "test".to_string(),
            alias: None,
        }
    }

    #[test]
    fn searchable_manual_impl() {
        let item = item();
        assert_eq!(item.field_value("name"), Value::Text("test"));
        assert_eq!(item.field_value("alias"), Value::None);
        assert_eq!(item.field_value("unknown"), Value::None);
    }

    #[test]
    fn searchable_accessor() {
        assert_eq!(TestItem::accessor(&item(), "name"), Value::Text("test"));
    }

    #[test]
    fn text_field_errors() {
        let item = item();
        assert_eq!(item.text_field("name"), Ok("test"));
        assert_eq!(
            item.text_field("missing"),
            Err(SeekerError::MissingField {
                field: "missing".into()
            })
        );
        assert_eq!(
            item.text_field("alias"),
            Err(SeekerError::MissingField {
                field: "alias".into()
            })
        );

        let named = TestItem {
            alias: Some("t".into()),
            ..item
        };
        assert_eq!(named.text_field("alias"), Ok("t"));
    }
}
