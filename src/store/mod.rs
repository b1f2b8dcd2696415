//! Storage boundary: the document store the service reads teams from and writes results to.

mod events;
mod memory;

pub use events::{ChangeEvent, ChangeKind, ChangeStream, Collection, Document};
pub use memory::{MemoryStore, DEFAULT_EVENT_CAPACITY};

use crate::logic::GroupAssignment;
use crate::models::{
    BracketMatch, Competition, CompetitionId, CompetitionState, MatchId, MatchResult,
    NewCompetition, NewTeam, Participant, StoredMatch, Team, TeamId,
};
use async_trait::async_trait;
use thiserror::Error;

/// Persistence failures.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("competition {0} not found")]
    CompetitionNotFound(CompetitionId),

    #[error("team {0} not found")]
    TeamNotFound(TeamId),

    #[error("match {0} not found")]
    MatchNotFound(MatchId),

    /// A writer panicked while holding the store lock.
    #[error("store lock poisoned")]
    LockPoisoned,
}

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Competition documents with their team and match collections.
///
/// Reads of an unknown competition return empty collections; writes to one fail with
/// `CompetitionNotFound`. Batch writes are all-or-nothing.
#[async_trait]
pub trait CompetitionStore: Send + Sync {
    /// Create a competition document.
    async fn create_competition(&self, details: NewCompetition) -> StoreResult<Competition>;

    /// All competitions, oldest first.
    async fn list_competitions(&self) -> StoreResult<Vec<Competition>>;

    /// Overwrite `currentState`. Any value is accepted.
    async fn set_competition_state(
        &self,
        competition_id: CompetitionId,
        state: CompetitionState,
    ) -> StoreResult<()>;

    /// Register a team.
    async fn add_team(&self, competition_id: CompetitionId, team: NewTeam) -> StoreResult<Team>;

    /// Registered teams in registration order.
    async fn read_teams(&self, competition_id: CompetitionId) -> StoreResult<Vec<Team>>;

    /// Registered teams as bracket entrants, in registration order.
    async fn read_participants(
        &self,
        competition_id: CompetitionId,
    ) -> StoreResult<Vec<Participant>> {
        let teams = self.read_teams(competition_id).await?;
        Ok(teams.iter().map(Participant::from).collect())
    }

    /// Write every team's group label as one atomic batch.
    async fn write_group_assignments(
        &self,
        competition_id: CompetitionId,
        assignments: &[GroupAssignment],
    ) -> StoreResult<()>;

    /// Persist a bracket as new match documents, as one atomic batch.
    async fn create_matches(
        &self,
        competition_id: CompetitionId,
        matches: Vec<BracketMatch>,
    ) -> StoreResult<Vec<StoredMatch>>;

    /// Stored matches in creation order.
    async fn read_matches(&self, competition_id: CompetitionId) -> StoreResult<Vec<StoredMatch>>;

    /// Merge result attributes into a stored match.
    async fn update_match_result(
        &self,
        competition_id: CompetitionId,
        match_id: MatchId,
        result: MatchResult,
    ) -> StoreResult<StoredMatch>;

    /// Follow changes to one collection of one competition.
    ///
    /// The stream first replays the current documents as `added`, then yields live
    /// changes. It never ends on its own; drop it to unsubscribe. Subscribing again
    /// starts a fresh replay.
    async fn subscribe(
        &self,
        competition_id: CompetitionId,
        collection: Collection,
    ) -> StoreResult<ChangeStream>;
}
