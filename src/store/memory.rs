//! In-process document store: competitions, their teams and matches, and a change feed.

use super::{
    ChangeEvent, ChangeKind, ChangeStream, Collection, CompetitionStore, Document, StoreError,
    StoreResult,
};
use crate::logic::GroupAssignment;
use crate::models::{
    BracketMatch, Competition, CompetitionId, CompetitionState, MatchId, MatchResult,
    NewCompetition, NewTeam, StoredMatch, Team,
};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use tokio::sync::broadcast;
use tokio_stream::wrappers::errors::BroadcastStreamRecvError;
use tokio_stream::wrappers::BroadcastStream;
use tokio_stream::StreamExt;

/// Events buffered per subscriber before a slow one starts skipping.
pub const DEFAULT_EVENT_CAPACITY: usize = 256;

/// A competition document plus its sub-collections.
struct CompetitionRecord {
    competition: Competition,
    teams: Vec<Team>,
    matches: Vec<StoredMatch>,
}

type Records = HashMap<CompetitionId, CompetitionRecord>;

/// Store held entirely in memory.
///
/// Every write takes the single write lock, so a batch is applied completely or not at
/// all, and events are published while the lock is held.
pub struct MemoryStore {
    competitions: RwLock<Records>,
    events: broadcast::Sender<ChangeEvent>,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new(DEFAULT_EVENT_CAPACITY)
    }
}

impl MemoryStore {
    /// Create an empty store; `event_capacity` bounds each subscriber's backlog.
    pub fn new(event_capacity: usize) -> Self {
        let (events, _) = broadcast::channel(event_capacity.max(1));
        Self {
            competitions: RwLock::new(HashMap::new()),
            events,
        }
    }

    fn read(&self) -> StoreResult<RwLockReadGuard<'_, Records>> {
        self.competitions.read().map_err(|_| StoreError::LockPoisoned)
    }

    fn write(&self) -> StoreResult<RwLockWriteGuard<'_, Records>> {
        self.competitions.write().map_err(|_| StoreError::LockPoisoned)
    }

    /// Fire-and-forget: having no subscribers is not an error.
    fn publish(&self, kind: ChangeKind, competition_id: CompetitionId, data: Document) {
        let _ = self.events.send(ChangeEvent::new(kind, competition_id, data));
    }
}

fn record_mut(records: &mut Records, id: CompetitionId) -> StoreResult<&mut CompetitionRecord> {
    records.get_mut(&id).ok_or(StoreError::CompetitionNotFound(id))
}

#[async_trait]
impl CompetitionStore for MemoryStore {
    async fn create_competition(&self, details: NewCompetition) -> StoreResult<Competition> {
        let competition = Competition::new(details);
        let mut records = self.write()?;
        records.insert(
            competition.id,
            CompetitionRecord {
                competition: competition.clone(),
                teams: Vec::new(),
                matches: Vec::new(),
            },
        );
        Ok(competition)
    }

    async fn list_competitions(&self) -> StoreResult<Vec<Competition>> {
        let records = self.read()?;
        let mut competitions: Vec<Competition> =
            records.values().map(|r| r.competition.clone()).collect();
        competitions.sort_by_key(|c| c.created_at);
        Ok(competitions)
    }

    async fn set_competition_state(
        &self,
        competition_id: CompetitionId,
        state: CompetitionState,
    ) -> StoreResult<()> {
        let mut records = self.write()?;
        record_mut(&mut records, competition_id)?.competition.current_state = Some(state);
        Ok(())
    }

    async fn add_team(&self, competition_id: CompetitionId, team: NewTeam) -> StoreResult<Team> {
        let mut records = self.write()?;
        let record = record_mut(&mut records, competition_id)?;
        let team = Team::from_registration(team);
        record.teams.push(team.clone());
        self.publish(ChangeKind::Added, competition_id, Document::Team(team.clone()));
        Ok(team)
    }

    async fn read_teams(&self, competition_id: CompetitionId) -> StoreResult<Vec<Team>> {
        let records = self.read()?;
        Ok(records
            .get(&competition_id)
            .map(|r| r.teams.clone())
            .unwrap_or_default())
    }

    async fn write_group_assignments(
        &self,
        competition_id: CompetitionId,
        assignments: &[GroupAssignment],
    ) -> StoreResult<()> {
        let mut records = self.write()?;
        let record = record_mut(&mut records, competition_id)?;

        // Resolve the whole batch before touching any team.
        let positions = assignments
            .iter()
            .map(|a| {
                record
                    .teams
                    .iter()
                    .position(|t| t.id == a.team_id)
                    .ok_or(StoreError::TeamNotFound(a.team_id))
            })
            .collect::<StoreResult<Vec<usize>>>()?;

        for (position, assignment) in positions.into_iter().zip(assignments) {
            let team = &mut record.teams[position];
            team.group = Some(assignment.group.clone());
            self.publish(ChangeKind::Modified, competition_id, Document::Team(team.clone()));
        }
        Ok(())
    }

    async fn create_matches(
        &self,
        competition_id: CompetitionId,
        matches: Vec<BracketMatch>,
    ) -> StoreResult<Vec<StoredMatch>> {
        let mut records = self.write()?;
        let record = record_mut(&mut records, competition_id)?;
        let stored: Vec<StoredMatch> = matches.into_iter().map(StoredMatch::new).collect();
        record.matches.extend(stored.iter().cloned());
        for m in &stored {
            self.publish(ChangeKind::Added, competition_id, Document::Match(m.clone()));
        }
        Ok(stored)
    }

    async fn read_matches(&self, competition_id: CompetitionId) -> StoreResult<Vec<StoredMatch>> {
        let records = self.read()?;
        Ok(records
            .get(&competition_id)
            .map(|r| r.matches.clone())
            .unwrap_or_default())
    }

    async fn update_match_result(
        &self,
        competition_id: CompetitionId,
        match_id: MatchId,
        result: MatchResult,
    ) -> StoreResult<StoredMatch> {
        let mut records = self.write()?;
        let record = record_mut(&mut records, competition_id)?;
        let stored = record
            .matches
            .iter_mut()
            .find(|m| m.id == match_id)
            .ok_or(StoreError::MatchNotFound(match_id))?;
        stored.record_result(result);
        let updated = stored.clone();
        self.publish(ChangeKind::Modified, competition_id, Document::Match(updated.clone()));
        Ok(updated)
    }

    async fn subscribe(
        &self,
        competition_id: CompetitionId,
        collection: Collection,
    ) -> StoreResult<ChangeStream> {
        // Writers publish under the write lock, so subscribing under the read lock means
        // the replay and the live feed neither overlap nor leave a gap.
        let records = self.read()?;
        let receiver = self.events.subscribe();
        let current: Vec<Document> = match records.get(&competition_id) {
            None => Vec::new(),
            Some(record) => match collection {
                Collection::Teams => record.teams.iter().cloned().map(Document::Team).collect(),
                Collection::Matches => {
                    record.matches.iter().cloned().map(Document::Match).collect()
                }
            },
        };
        drop(records);

        let replay = tokio_stream::iter(
            current
                .into_iter()
                .map(move |doc| ChangeEvent::new(ChangeKind::Added, competition_id, doc)),
        );
        let live = BroadcastStream::new(receiver).filter_map(move |item| match item {
            Ok(event) if event.competition_id == competition_id && event.collection() == collection => {
                Some(event)
            }
            Ok(_) => None,
            Err(BroadcastStreamRecvError::Lagged(skipped)) => {
                log::warn!(
                    "Subscriber to {:?} of competition {} lagged; skipped {} event(s)",
                    collection,
                    competition_id,
                    skipped
                );
                None
            }
        });

        Ok(Box::pin(replay.chain(live)))
    }
}
