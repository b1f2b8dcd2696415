//! Competition, CompetitionState and the argument errors of the core algorithms.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use thiserror::Error;
use uuid::Uuid;

/// Errors raised by the grouping and bracket algorithms (and input checks around them).
#[derive(Clone, Debug, Eq, PartialEq, Error)]
pub enum CompetitionError {
    /// Group size must be at least 1.
    #[error("teamsPerGroup must be a positive integer (got {0})")]
    InvalidTeamsPerGroup(i64),
    /// More participants than first-round slots.
    #[error("{participants} participants do not fit into {slots} first-round slots")]
    SeedOutOfRange { participants: usize, slots: usize },
    /// A required name was blank.
    #[error("{0} must not be empty")]
    EmptyName(&'static str),
    /// An attribute tried to overwrite a field the document owns.
    #[error("field `{0}` is reserved and cannot be set")]
    ReservedField(String),
}

/// Attribute names owned by the competition document itself.
pub const RESERVED_COMPETITION_FIELDS: [&str; 4] = ["id", "name", "currentState", "createdAt"];

/// Unique identifier for a competition.
pub type CompetitionId = Uuid;

/// Lifecycle marker of a competition.
///
/// Kept open: any JSON value is accepted and stored as-is. There is no transition table.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CompetitionState(Value);

impl CompetitionState {
    pub fn new(state: impl Into<Value>) -> Self {
        Self(state.into())
    }

    /// The state as text, when it was given as a JSON string.
    pub fn as_str(&self) -> Option<&str> {
        self.0.as_str()
    }

    pub fn as_value(&self) -> &Value {
        &self.0
    }
}

impl fmt::Display for CompetitionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.0 {
            Value::String(state) => f.write_str(state),
            other => write!(f, "{other}"),
        }
    }
}

impl From<&str> for CompetitionState {
    fn from(state: &str) -> Self {
        Self::new(state)
    }
}

/// A competition document. Teams and matches live in its sub-collections.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Competition {
    pub id: CompetitionId,
    pub name: String,
    /// None until the first state update.
    pub current_state: Option<CompetitionState>,
    pub created_at: DateTime<Utc>,
    #[serde(flatten)]
    pub attributes: Map<String, Value>,
}

impl Competition {
    /// Create a competition with a fresh id and no state.
    pub fn new(details: NewCompetition) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: details.name,
            current_state: None,
            created_at: Utc::now(),
            attributes: details.attributes,
        }
    }
}

/// Payload for creating a competition.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct NewCompetition {
    pub name: String,
    #[serde(flatten)]
    pub attributes: Map<String, Value>,
}
