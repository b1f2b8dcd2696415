//! Bracket matches: the unsaved skeleton form and the stored form.

use crate::models::team::TeamId;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

/// Unique identifier for a stored match.
pub type MatchId = Uuid;

/// Result attributes recorded against a match (scores, winner, ...). Opaque to the core.
pub type MatchResult = Map<String, Value>;

/// Attribute names owned by the match document itself.
pub const RESERVED_MATCH_FIELDS: [&str; 4] = ["id", "team1", "team2", "round"];

/// The earliest round; the only one that receives seeded participants.
pub const FIRST_ROUND: u32 = 1;

/// One match slot in a single-elimination bracket.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BracketMatch {
    /// None is a bye (or a slot waiting on an earlier round).
    pub team_1: Option<TeamId>,
    pub team_2: Option<TeamId>,
    /// 1 = earliest round; the final is the highest.
    pub round: u32,
}

impl BracketMatch {
    /// An empty slot pair in the given round.
    pub fn empty(round: u32) -> Self {
        Self {
            team_1: None,
            team_2: None,
            round,
        }
    }
}

/// A match as persisted for a competition: bracket slot plus any recorded result.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredMatch {
    pub id: MatchId,
    pub team_1: Option<TeamId>,
    pub team_2: Option<TeamId>,
    pub round: u32,
    #[serde(flatten)]
    pub result: MatchResult,
}

impl StoredMatch {
    pub fn new(slot: BracketMatch) -> Self {
        Self {
            id: Uuid::new_v4(),
            team_1: slot.team_1,
            team_2: slot.team_2,
            round: slot.round,
            result: MatchResult::new(),
        }
    }

    /// The bracket slot this match was created from.
    pub fn slot(&self) -> BracketMatch {
        BracketMatch {
            team_1: self.team_1,
            team_2: self.team_2,
            round: self.round,
        }
    }

    /// Merge result attributes; later writes win per key.
    pub fn record_result(&mut self, result: MatchResult) {
        self.result.extend(result);
    }
}
