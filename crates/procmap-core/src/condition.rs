//! Typed filter conditions and their translation to and from the backend
//! query representation.
//!
//! The backend accepts a query as a list of JSON objects, each tagged with a
//! `type` discriminator. [`Condition`] is the typed mirror of those objects;
//! [`to_query`] and [`from_query`] convert between the two.

use crate::{ProcMapError, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Inclusion {
    #[default]
    Include,
    Exclude,
}

/// One filter restricting the case population.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Condition {
    /// Cases that contain (or avoid) any of the activities
    Activity {
        activities: Vec<String>,
        #[serde(default)]
        inclusion: Inclusion,
    },
    /// Cases whose attribute takes one of the values
    Attribute {
        attribute: String,
        #[serde(default)]
        values: Vec<String>,
    },
    /// Cases passing from `start` to `end`
    Path { start: String, end: String },
    /// Cases whose throughput time in seconds lies within the bounds
    Duration {
        #[serde(default)]
        min: Option<u64>,
        #[serde(default)]
        max: Option<u64>,
    },
    /// Cases following exactly this activity sequence
    Variant { variant: Vec<String> },
}

impl Condition {
    pub fn kind(&self) -> &'static str {
        match self {
            Condition::Activity { .. } => "activity",
            Condition::Attribute { .. } => "attribute",
            Condition::Path { .. } => "path",
            Condition::Duration { .. } => "duration",
            Condition::Variant { .. } => "variant",
        }
    }

    /// Reject conditions the backend cannot evaluate. Messages start with
    /// [`Condition::kind`], the same prefix [`condition_from_value`] uses.
    pub fn validate(&self) -> Result<()> {
        let problem = match self {
            Condition::Activity { activities, .. } if activities.is_empty() => {
                Some("no activities")
            }
            Condition::Attribute { attribute, .. } if attribute.is_empty() => {
                Some("no attribute")
            }
            Condition::Path { start, end } if start.is_empty() || end.is_empty() => {
                Some("needs both endpoints")
            }
            Condition::Duration {
                min: Some(min),
                max: Some(max),
            } if min > max => Some("min greater than max"),
            Condition::Variant { variant } if variant.is_empty() => Some("no activities"),
            _ => None,
        };
        match problem {
            Some(msg) => Err(ProcMapError::UnsupportedCondition(format!(
                "{}: {}",
                self.kind(),
                msg
            ))),
            None => Ok(()),
        }
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Condition::Activity {
                activities,
                inclusion,
            } => {
                let verb = match inclusion {
                    Inclusion::Include => "contains",
                    Inclusion::Exclude => "avoids",
                };
                write!(f, "{} {}", verb, activities.join(" | "))
            }
            Condition::Attribute { attribute, values } => {
                write!(f, "{} in [{}]", attribute, values.join(", "))
            }
            Condition::Path { start, end } => write!(f, "path {} -> {}", start, end),
            Condition::Duration { min, max } => match (min, max) {
                (Some(min), Some(max)) => write!(f, "duration {}s..{}s", min, max),
                (Some(min), None) => write!(f, "duration >= {}s", min),
                (None, Some(max)) => write!(f, "duration <= {}s", max),
                (None, None) => write!(f, "any duration"),
            },
            Condition::Variant { variant } => write!(f, "variant {}", variant.join(" > ")),
        }
    }
}

/// Opaque backend query: one JSON object per condition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Query {
    #[serde(default)]
    pub conditions: Vec<Value>,
}

impl Query {
    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
    }
}

pub fn to_query(conditions: &[Condition]) -> Result<Query> {
    let conditions = conditions
        .iter()
        .map(|condition| -> Result<Value> {
            condition.validate()?;
            Ok(serde_json::to_value(condition)?)
        })
        .collect::<Result<Vec<_>>>()?;
    Ok(Query { conditions })
}

pub fn from_query(query: &Query) -> Result<Vec<Condition>> {
    query.conditions.iter().map(condition_from_value).collect()
}

/// Parse a single backend condition object.
pub fn condition_from_value(value: &Value) -> Result<Condition> {
    let kind = value
        .get("type")
        .and_then(Value::as_str)
        .unwrap_or("<untagged>")
        .to_string();
    serde_json::from_value::<Condition>(value.clone())
        .map_err(|e| ProcMapError::UnsupportedCondition(format!("{}: {}", kind, e)))
}
