//! Change events delivered to collection subscribers.

use crate::models::{CompetitionId, StoredMatch, Team};
use chrono::{DateTime, Utc};
use futures_util::Stream;
use serde::{Deserialize, Serialize};
use std::pin::Pin;

/// Sub-collections of a competition that can be watched.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Collection {
    Teams,
    Matches,
}

/// What happened to the document.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeKind {
    Added,
    Modified,
}

/// Full current contents of the changed document.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Document {
    Team(Team),
    Match(StoredMatch),
}

impl Document {
    pub fn collection(&self) -> Collection {
        match self {
            Document::Team(_) => Collection::Teams,
            Document::Match(_) => Collection::Matches,
        }
    }
}

/// One document change inside a competition.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangeEvent {
    #[serde(rename = "type")]
    pub kind: ChangeKind,
    pub competition_id: CompetitionId,
    pub data: Document,
    pub at: DateTime<Utc>,
}

impl ChangeEvent {
    pub fn new(kind: ChangeKind, competition_id: CompetitionId, data: Document) -> Self {
        Self {
            kind,
            competition_id,
            data,
            at: Utc::now(),
        }
    }

    pub fn collection(&self) -> Collection {
        self.data.collection()
    }
}

/// Lazy, unbounded feed of change events for one collection.
pub type ChangeStream = Pin<Box<dyn Stream<Item = ChangeEvent> + Send>>;
