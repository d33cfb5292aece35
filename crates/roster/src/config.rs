//! File configuration for search fields and default sort order.
//!
//! ```yaml
//! search:
//!   fields: [last_name, first_name]
//!   op: startswith
//! sort:
//!   - field: last_name
//!     dir: asc
//! ```
//!
//! Every key is optional; missing keys fall back to [`Config::default`].

use std::fs;
use std::path::Path;

use roster_seeker::{Comparator, FieldMatch, OrderBy, StrategySet, TextOp};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Result, RosterError};
use crate::person::{NameMatch, Person};

/// Top-level configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub search: SearchConfig,
    /// Initial sort columns; empty means source order.
    pub sort: Vec<OrderBy>,
}

/// Which fields the query is matched against, and how.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SearchConfig {
    pub fields: Vec<String>,
    pub op: TextOp,
}

impl Default for SearchConfig {
    fn default() -> Self {
        SearchConfig {
            fields: vec![
                Person::FIRST_NAME.to_string(),
                Person::LAST_NAME.to_string(),
                Person::PATRONYMIC.to_string(),
            ],
            op: TextOp::Contains,
        }
    }
}

impl Config {
    /// Reads and validates a YAML config file.
    pub fn load(path: &Path) -> Result<Config> {
        let text = fs::read_to_string(path).map_err(|source| RosterError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Config = serde_yaml::from_str(&text).map_err(|source| RosterError::Yaml {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        debug!(path = %path.display(), ?config, "loaded config");
        Ok(config)
    }

    /// Checks that every named field exists on [`Person`].
    pub fn validate(&self) -> Result<()> {
        self.search
            .fields
            .iter()
            .map(String::as_str)
            .chain(self.sort.iter().map(|order| order.field.as_str()))
            .try_for_each(Person::check_field)
    }

    /// Builds the strategy set for the configured fields.
    ///
    /// Substring search uses the [`NameMatch`] strategies; other operators use
    /// generic field strategies.
    pub fn strategies(&self) -> Result<StrategySet<Person>> {
        let mut set = StrategySet::new();
        for field in &self.search.fields {
            Person::check_field(field)?;
            match (self.search.op, NameMatch::from_field(field)) {
                (TextOp::Contains, Some(name)) => set.push(name),
                _ => set.push(FieldMatch::new(field.as_str(), self.search.op)),
            }
        }
        Ok(set)
    }

    /// Comparator for the configured sort columns, if any.
    pub fn comparator(&self) -> Option<Comparator<Person>> {
        if self.sort.is_empty() {
            None
        } else {
            Some(Comparator::by_fields(&self.sort))
        }
    }
}
