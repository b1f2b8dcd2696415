//! Data structures for a competition: teams, participants, bracket matches, competition state.

mod competition;
mod game;
mod team;

pub use competition::{
    Competition, CompetitionError, CompetitionId, CompetitionState, NewCompetition,
    RESERVED_COMPETITION_FIELDS,
};
pub use game::{
    BracketMatch, MatchId, MatchResult, StoredMatch, FIRST_ROUND, RESERVED_MATCH_FIELDS,
};
pub use team::{NewTeam, Participant, Team, TeamId, RESERVED_TEAM_FIELDS};
