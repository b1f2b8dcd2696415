//! Team and Participant data structures.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

/// Unique identifier for a registered team (its stored-document id).
pub type TeamId = Uuid;

/// Attribute names owned by the team document itself.
pub const RESERVED_TEAM_FIELDS: [&str; 3] = ["id", "teamName", "group"];

/// A registered team.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Team {
    pub id: TeamId,
    /// Identity within a group: two teams with the same name never share a group.
    pub team_name: String,
    /// Group label ("Group 1", ...) once teams have been distributed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,
    /// Anything else the registration carried; passed through untouched.
    #[serde(flatten)]
    pub attributes: Map<String, Value>,
}

impl Team {
    /// Create a team with a fresh id and no extra attributes.
    pub fn new(team_name: impl Into<String>) -> Self {
        Self::from_registration(NewTeam {
            team_name: team_name.into(),
            attributes: Map::new(),
        })
    }

    /// Turn a registration payload into a stored team with a fresh id.
    pub fn from_registration(registration: NewTeam) -> Self {
        Self {
            id: Uuid::new_v4(),
            team_name: registration.team_name,
            group: None,
            attributes: registration.attributes,
        }
    }

    /// The bracket view of this team.
    pub fn participant(&self) -> Participant {
        Participant { id: self.id }
    }
}

/// Registration payload for a new team (the `participant` of `/addParticipant`).
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTeam {
    pub team_name: String,
    #[serde(flatten)]
    pub attributes: Map<String, Value>,
}

/// A bracket entrant. Order in a participant list is the seeding order.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
pub struct Participant {
    pub id: TeamId,
}

impl From<&Team> for Participant {
    fn from(team: &Team) -> Self {
        team.participant()
    }
}
