//! Text comparison operators for field strategies.
//!
//! Every [`TextOp`] compares case-insensitively: both the field text and the
//! query are lowercased (Unicode-aware) before comparison.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::SeekerError;

/// How a field strategy compares its field against the query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextOp {
    /// Field contains the query as a substring.
    #[default]
    Contains,
    /// Field starts with the query.
    StartsWith,
    /// Field ends with the query.
    EndsWith,
    /// Field equals the query.
    Equals,
}

impl TextOp {
    /// Evaluates the operator with `field` as haystack and `query` as needle.
    pub fn eval(self, field: &str, query: &str) -> bool {
        let field = field.to_lowercase();
        let query = query.to_lowercase();
        match self {
            TextOp::Contains => field.contains(&query),
            TextOp::StartsWith => field.starts_with(&query),
            TextOp::EndsWith => field.ends_with(&query),
            TextOp::Equals => field == query,
        }
    }

    /// Returns `true` if a longer query can only ever narrow the match set.
    pub fn is_narrowing(self) -> bool {
        matches!(self, TextOp::Contains | TextOp::StartsWith)
    }

    /// Returns the display name of this operator.
    pub fn as_str(self) -> &'static str {
        match self {
            TextOp::Contains => "contains",
            TextOp::StartsWith => "startswith",
            TextOp::EndsWith => "endswith",
            TextOp::Equals => "equals",
        }
    }
}

impl std::fmt::Display for TextOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for TextOp {
    type Err = SeekerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "contains" => Ok(TextOp::Contains),
            "startswith" | "prefix" => Ok(TextOp::StartsWith),
            "endswith" | "suffix" => Ok(TextOp::EndsWith),
            "equals" | "eq" => Ok(TextOp::Equals),
            _ => Err(SeekerError::InvalidOperator(s.to_string())),
        }
    }
}
