//! Integration tests for the competition operations against the in-memory store.

use competition_coordinator::service::{
    add_participant, create_competition, create_tournament, distribute_teams, list_competitions,
    stream_results, update_competition_state, update_result,
};
use competition_coordinator::{
    ChangeKind, CompetitionError, CompetitionId, CompetitionState, CompetitionStore, Document,
    MatchResult, MemoryStore, NewCompetition, NewTeam, ServiceError, StoreError, Team,
};
use futures_util::StreamExt;
use serde_json::json;
use std::time::Duration;
use tokio::time::timeout;
use uuid::Uuid;

async fn setup(store: &MemoryStore, names: &[&str]) -> (CompetitionId, Vec<Team>) {
    let competition = create_competition(
        store,
        NewCompetition {
            name: "Autumn League".to_string(),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    let mut teams = Vec::new();
    for name in names {
        let team = add_participant(
            store,
            competition.id,
            NewTeam {
                team_name: name.to_string(),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        teams.push(team);
    }
    (competition.id, teams)
}

#[tokio::test]
async fn distribute_teams_labels_stored_teams() {
    let store = MemoryStore::default();
    let (id, teams) = setup(&store, &["X", "X", "Y", "Z"]).await;

    let groups = distribute_teams(&store, id, 2).await.unwrap();

    assert_eq!(groups.len(), 2);
    assert!(groups[0].iter().all(|t| t.group.as_deref() == Some("Group 1")));
    let stored = store.read_teams(id).await.unwrap();
    let labels: Vec<_> = stored.iter().map(|t| t.group.as_deref()).collect();
    assert_eq!(
        labels,
        [Some("Group 1"), Some("Group 2"), Some("Group 1"), Some("Group 2")]
    );
    assert_eq!(stored[1].id, teams[1].id);
}

#[tokio::test]
async fn invalid_group_size_fails_before_any_write() {
    let store = MemoryStore::default();
    let (id, _) = setup(&store, &["A", "B"]).await;

    for size in [0, -1] {
        let err = distribute_teams(&store, id, size).await.unwrap_err();
        assert!(matches!(
            err,
            ServiceError::Invalid(CompetitionError::InvalidTeamsPerGroup(s)) if s == size
        ));
    }
    assert!(store
        .read_teams(id)
        .await
        .unwrap()
        .iter()
        .all(|t| t.group.is_none()));
}

#[tokio::test]
async fn distribute_for_unknown_competition_is_not_found() {
    let store = MemoryStore::default();
    let err = distribute_teams(&store, Uuid::new_v4(), 2).await.unwrap_err();
    assert!(matches!(
        err,
        ServiceError::Store(StoreError::CompetitionNotFound(_))
    ));
}

#[tokio::test]
async fn create_tournament_stores_seeded_bracket() {
    let store = MemoryStore::default();
    let (id, teams) = setup(&store, &["A", "B", "C"]).await;

    let created = create_tournament(&store, id).await.unwrap();

    assert_eq!(created.len(), 3);
    assert_eq!(created[0].team_1, Some(teams[0].id));
    assert_eq!(created[0].team_2, Some(teams[1].id));
    assert_eq!(created[1].team_1, Some(teams[2].id));
    assert_eq!(created[1].team_2, None);
    assert_eq!(created[2].round, 2);
    assert_eq!(store.read_matches(id).await.unwrap(), created);
}

#[tokio::test]
async fn lone_team_needs_no_matches() {
    let store = MemoryStore::default();
    let (id, _) = setup(&store, &["Solo"]).await;

    assert!(create_tournament(&store, id).await.unwrap().is_empty());
    assert!(store.read_matches(id).await.unwrap().is_empty());
}

#[tokio::test]
async fn participant_names_are_trimmed_and_required() {
    let store = MemoryStore::default();
    let (id, teams) = setup(&store, &["  Tigers "]).await;
    assert_eq!(teams[0].team_name, "Tigers");

    let err = add_participant(
        &store,
        id,
        NewTeam {
            team_name: "   ".to_string(),
            ..Default::default()
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(
        err,
        ServiceError::Invalid(CompetitionError::EmptyName("teamName"))
    ));
}

#[tokio::test]
async fn participant_attributes_cannot_shadow_document_fields() {
    let store = MemoryStore::default();
    let (id, _) = setup(&store, &[]).await;
    let mut participant = NewTeam {
        team_name: "A".to_string(),
        ..Default::default()
    };
    participant
        .attributes
        .insert("group".to_string(), json!("Group 9"));

    let err = add_participant(&store, id, participant).await.unwrap_err();

    assert!(matches!(
        err,
        ServiceError::Invalid(CompetitionError::ReservedField(ref f)) if f == "group"
    ));
    assert!(store.read_teams(id).await.unwrap().is_empty());
}

#[tokio::test]
async fn state_updates_pass_through() {
    let store = MemoryStore::default();
    let (id, _) = setup(&store, &[]).await;

    update_competition_state(&store, id, CompetitionState::new("finals"))
        .await
        .unwrap();

    let competitions = list_competitions(&store).await.unwrap();
    assert_eq!(competitions.len(), 1);
    assert_eq!(
        competitions[0].current_state.as_ref().and_then(|s| s.as_str()),
        Some("finals")
    );

    let phase = json!({ "phase": "groups", "round": 2 });
    update_competition_state(&store, id, CompetitionState::new(phase.clone()))
        .await
        .unwrap();

    let competitions = list_competitions(&store).await.unwrap();
    let state = competitions[0].current_state.as_ref().unwrap();
    assert_eq!(state.as_value(), &phase);
    assert_eq!(state.as_str(), None);
}

#[tokio::test]
async fn result_updates_reach_result_subscribers() {
    let store = MemoryStore::default();
    let (id, _) = setup(&store, &["A", "B"]).await;
    let created = create_tournament(&store, id).await.unwrap();
    let mut feed = stream_results(&store, id).await.unwrap();

    let replay = timeout(Duration::from_secs(1), feed.next())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(replay.kind, ChangeKind::Added);

    let mut result = MatchResult::new();
    result.insert("winner".to_string(), json!("A"));
    let updated = update_result(&store, id, created[0].id, result).await.unwrap();

    let event = timeout(Duration::from_secs(1), feed.next())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(event.kind, ChangeKind::Modified);
    assert_eq!(event.data, Document::Match(updated));
}

#[tokio::test]
async fn results_cannot_rewrite_bracket_slots() {
    let store = MemoryStore::default();
    let (id, _) = setup(&store, &["A", "B"]).await;
    let created = create_tournament(&store, id).await.unwrap();

    let mut result = MatchResult::new();
    result.insert("round".to_string(), json!(5));
    let err = update_result(&store, id, created[0].id, result)
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        ServiceError::Invalid(CompetitionError::ReservedField(ref f)) if f == "round"
    ));
    assert_eq!(store.read_matches(id).await.unwrap(), created);
}
