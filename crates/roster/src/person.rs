//! The person record and its name strategies.

use std::fmt;

use roster_seeker::{MatchStrategy, Searchable, StrategySet, TextOp, Value};
use serde::{Deserialize, Serialize};

use crate::error::{Result, RosterError};

/// One entry in the roster.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Person {
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub patronymic: String,
}

impl Person {
    /// Field name constant for the first name.
    pub const FIRST_NAME: &'static str = "first_name";
    /// Field name constant for the last name.
    pub const LAST_NAME: &'static str = "last_name";
    /// Field name constant for the patronymic.
    pub const PATRONYMIC: &'static str = "patronymic";

    /// Every searchable field, in display order.
    pub const FIELDS: [&'static str; 3] = [Self::LAST_NAME, Self::FIRST_NAME, Self::PATRONYMIC];

    pub fn new(
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        patronymic: impl Into<String>,
    ) -> Self {
        Person {
            first_name: first_name.into(),
            last_name: last_name.into(),
            patronymic: patronymic.into(),
        }
    }

    /// Checks that `field` names one of [`Person::FIELDS`].
    pub fn check_field(field: &str) -> Result<()> {
        if Self::FIELDS.contains(&field) {
            Ok(())
        } else {
            Err(RosterError::UnknownField {
                field: field.to_string(),
                expected: Self::FIELDS.join(", "),
            })
        }
    }
}

impl Searchable for Person {
    fn field_value(&self, field: &str) -> Value<'_> {
        match field {
            Self::FIRST_NAME => Value::Text(&self.first_name),
            Self::LAST_NAME => Value::Text(&self.last_name),
            Self::PATRONYMIC => Value::Text(&self.patronymic),
            _ => Value::None,
        }
    }
}

impl fmt::Display for Person {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.last_name, self.first_name)?;
        if !self.patronymic.is_empty() {
            write!(f, " {}", self.patronymic)?;
        }
        Ok(())
    }
}

/// Substring strategies over the three name fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NameMatch {
    FirstName,
    LastName,
    Patronymic,
}

impl NameMatch {
    /// The default strategy set: first name, last name, patronymic.
    pub fn all() -> StrategySet<Person> {
        StrategySet::new()
            .with(NameMatch::FirstName)
            .with(NameMatch::LastName)
            .with(NameMatch::Patronymic)
    }

    /// Looks up the strategy bound to a field name.
    pub fn from_field(field: &str) -> Option<NameMatch> {
        match field {
            Person::FIRST_NAME => Some(NameMatch::FirstName),
            Person::LAST_NAME => Some(NameMatch::LastName),
            Person::PATRONYMIC => Some(NameMatch::Patronymic),
            _ => None,
        }
    }

    pub fn field(self) -> &'static str {
        match self {
            NameMatch::FirstName => Person::FIRST_NAME,
            NameMatch::LastName => Person::LAST_NAME,
            NameMatch::Patronymic => Person::PATRONYMIC,
        }
    }

    fn text(self, person: &Person) -> &str {
        match self {
            NameMatch::FirstName => &person.first_name,
            NameMatch::LastName => &person.last_name,
            NameMatch::Patronymic => &person.patronymic,
        }
    }
}

impl MatchStrategy<Person> for NameMatch {
    fn name(&self) -> &str {
        self.field()
    }

    fn matches(&self, record: &Person, query: &str) -> roster_seeker::Result<bool> {
        Ok(TextOp::Contains.eval(self.text(record), query))
    }
}
