//! Competition operations: read from the store, run the pure logic, write results back.
//!
//! Every operation logs its failure before returning it; nothing is swallowed here.

use crate::logic::{
    build_bracket, group_assignments, group_label, partition_teams, teams_per_group, Group,
};
use crate::models::{
    Competition, CompetitionError, CompetitionId, CompetitionState, MatchId, MatchResult,
    NewCompetition, NewTeam, StoredMatch, Team, RESERVED_COMPETITION_FIELDS,
    RESERVED_MATCH_FIELDS, RESERVED_TEAM_FIELDS,
};
use crate::store::{ChangeStream, Collection, CompetitionStore, StoreError};
use serde_json::{Map, Value};
use thiserror::Error;

/// Failure of a competition operation.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// Rejected input; nothing was read or written.
    #[error(transparent)]
    Invalid(#[from] CompetitionError),
    /// The store failed; for batch writes nothing was applied.
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Result type for competition operations.
pub type ServiceResult<T> = Result<T, ServiceError>;

fn reject_reserved(attributes: &Map<String, Value>, reserved: &[&str]) -> Result<(), CompetitionError> {
    match reserved.iter().find(|field| attributes.contains_key(**field)) {
        Some(field) => Err(CompetitionError::ReservedField((*field).to_string())),
        None => Ok(()),
    }
}

/// Create a competition.
pub async fn create_competition(
    store: &dyn CompetitionStore,
    mut details: NewCompetition,
) -> ServiceResult<Competition> {
    let result: ServiceResult<Competition> = async {
        details.name = details.name.trim().to_string();
        if details.name.is_empty() {
            return Err(CompetitionError::EmptyName("name").into());
        }
        reject_reserved(&details.attributes, &RESERVED_COMPETITION_FIELDS)?;
        Ok(store.create_competition(details).await?)
    }
    .await;
    match &result {
        Ok(c) => log::info!("Created competition {} ({})", c.id, c.name),
        Err(e) => log::error!("Error creating competition: {}", e),
    }
    result
}

/// All competitions.
pub async fn list_competitions(store: &dyn CompetitionStore) -> ServiceResult<Vec<Competition>> {
    store
        .list_competitions()
        .await
        .inspect_err(|e| log::error!("Error reading competitions: {}", e))
        .map_err(Into::into)
}

/// Register a team. Duplicate names are allowed; grouping keeps them apart.
pub async fn add_participant(
    store: &dyn CompetitionStore,
    competition_id: CompetitionId,
    mut participant: NewTeam,
) -> ServiceResult<Team> {
    let result: ServiceResult<Team> = async {
        participant.team_name = participant.team_name.trim().to_string();
        if participant.team_name.is_empty() {
            return Err(CompetitionError::EmptyName("teamName").into());
        }
        reject_reserved(&participant.attributes, &RESERVED_TEAM_FIELDS)?;
        Ok(store.add_team(competition_id, participant).await?)
    }
    .await;
    match &result {
        Ok(team) => log::info!(
            "Added team {} ({}) to competition {}",
            team.id,
            team.team_name,
            competition_id
        ),
        Err(e) => log::error!("Error adding participant to competition {}: {}", competition_id, e),
    }
    result
}

/// Split the competition's teams into groups and label every team, as one batch.
///
/// Returns the groups with their labels applied.
pub async fn distribute_teams(
    store: &dyn CompetitionStore,
    competition_id: CompetitionId,
    requested_teams_per_group: i64,
) -> ServiceResult<Vec<Group>> {
    let result: ServiceResult<Vec<Group>> = async {
        let size = teams_per_group(requested_teams_per_group)?;
        let teams = store.read_teams(competition_id).await?;
        let mut groups = partition_teams(teams, size)?;
        store
            .write_group_assignments(competition_id, &group_assignments(&groups))
            .await?;
        for (index, group) in groups.iter_mut().enumerate() {
            let label = group_label(index);
            for team in group.iter_mut() {
                team.group = Some(label.clone());
            }
        }
        Ok(groups)
    }
    .await;
    match &result {
        Ok(groups) => log::info!(
            "Distributed teams of competition {} into {} group(s)",
            competition_id,
            groups.len()
        ),
        Err(e) => log::error!("Error distributing teams of competition {}: {}", competition_id, e),
    }
    result
}

/// Build the single-elimination bracket from the registered teams and store its matches.
pub async fn create_tournament(
    store: &dyn CompetitionStore,
    competition_id: CompetitionId,
) -> ServiceResult<Vec<StoredMatch>> {
    let result: ServiceResult<Vec<StoredMatch>> = async {
        let participants = store.read_participants(competition_id).await?;
        let matches = build_bracket(&participants)?;
        Ok(store.create_matches(competition_id, matches).await?)
    }
    .await;
    match &result {
        Ok(matches) => log::info!(
            "Created {} tournament match(es) for competition {}",
            matches.len(),
            competition_id
        ),
        Err(e) => log::error!(
            "Error creating tournament matches for competition {}: {}",
            competition_id,
            e
        ),
    }
    result
}

/// Overwrite the competition's lifecycle state. Any value is accepted.
pub async fn update_competition_state(
    store: &dyn CompetitionStore,
    competition_id: CompetitionId,
    new_state: CompetitionState,
) -> ServiceResult<()> {
    let state = new_state.to_string();
    let result = store.set_competition_state(competition_id, new_state).await;
    match &result {
        Ok(()) => log::info!("Competition {} is now `{}`", competition_id, state),
        Err(e) => log::error!("Error updating state of competition {}: {}", competition_id, e),
    }
    result.map_err(Into::into)
}

/// Record result attributes on a match; subscribers see a `modified` event.
pub async fn update_result(
    store: &dyn CompetitionStore,
    competition_id: CompetitionId,
    match_id: MatchId,
    result: MatchResult,
) -> ServiceResult<StoredMatch> {
    let outcome: ServiceResult<StoredMatch> = async {
        reject_reserved(&result, &RESERVED_MATCH_FIELDS)?;
        Ok(store
            .update_match_result(competition_id, match_id, result)
            .await?)
    }
    .await;
    if let Err(e) = &outcome {
        log::error!("Error updating result of match {}: {}", match_id, e);
    }
    outcome
}

/// Follow match changes (`added` on creation, `modified` on result updates).
pub async fn stream_results(
    store: &dyn CompetitionStore,
    competition_id: CompetitionId,
) -> ServiceResult<ChangeStream> {
    subscribe(store, competition_id, Collection::Matches).await
}

/// Follow team changes (`added` on registration, `modified` on group assignment).
pub async fn stream_participants(
    store: &dyn CompetitionStore,
    competition_id: CompetitionId,
) -> ServiceResult<ChangeStream> {
    subscribe(store, competition_id, Collection::Teams).await
}

async fn subscribe(
    store: &dyn CompetitionStore,
    competition_id: CompetitionId,
    collection: Collection,
) -> ServiceResult<ChangeStream> {
    let stream = store
        .subscribe(competition_id, collection)
        .await
        .inspect_err(|e| {
            log::error!(
                "Error subscribing to {:?} of competition {}: {}",
                collection,
                competition_id,
                e
            )
        })?;
    log::info!("New subscriber to {:?} of competition {}", collection, competition_id);
    Ok(stream)
}
