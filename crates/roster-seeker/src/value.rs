//! Borrowed field values.
//!
//! Records expose their searchable fields as text. A field the record does
//! not have reads as [`Value::None`].

/// Runtime value of a record field, borrowed from the record.
///
/// # Example
///
/// ```
/// use roster_seeker::Value;
///
/// struct Person {
///     last_name: String,
///     nickname: Option<String>,
/// }
///
/// fn accessor<'a>(person: &'a Person, field: &str) -> Value<'a> {
///     match field {
///         "last_name" => Value::Text(&person.last_name),
///         "nickname" => person.nickname.as_deref().into(),
///         _ => Value::None,
///     }
/// }
///
/// let p = Person { last_name: "Smith".into(), nickname: None };
/// assert_eq!(accessor(&p, "last_name").as_str(), Some("Smith"));
/// assert!(accessor(&p, "nickname").is_none());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Value<'a> {
    Text(&'a str),
    /// Field not present on this record.
    None,
}

impl<'a> Value<'a> {
    pub fn is_none(&self) -> bool {
        matches!(self, Value::None)
    }

    pub fn as_str(&self) -> Option<&'a str> {
        match self {
            Value::Text(s) => Some(s),
            Value::None => None,
        }
    }
}

impl<'a> From<&'a str> for Value<'a> {
    fn from(s: &'a str) -> Self {
        Value::Text(s)
    }
}

impl<'a> From<Option<&'a str>> for Value<'a> {
    fn from(s: Option<&'a str>) -> Self {
        s.map_or(Value::None, Value::Text)
    }
}
