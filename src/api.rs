//! HTTP surface: one handler per competition operation, JSON in and out, SSE for feeds.

use crate::models::{
    CompetitionId, CompetitionState, MatchId, MatchResult, NewCompetition, NewTeam, TeamId,
};
use crate::service::{self, ServiceError};
use crate::store::{ChangeStream, CompetitionStore, StoreError};
use actix_web::{
    get, patch, post,
    http::StatusCode,
    web::{self, Bytes, Data, Json, Query},
    HttpResponse, Responder,
};
use futures_util::StreamExt;
use serde::{Deserialize, Serialize};

/// Shared store handle registered with the app.
pub type AppState = Data<dyn CompetitionStore>;

/// Body of every non-query response.
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiResponse {
    pub success: bool,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub participant_id: Option<TeamId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub competition_id: Option<CompetitionId>,
}

impl ApiResponse {
    fn ok(message: &str) -> Self {
        Self {
            success: true,
            message: message.to_string(),
            ..Self::default()
        }
    }

    fn failed(message: &str, error: &ServiceError) -> Self {
        Self {
            success: false,
            message: message.to_string(),
            error: Some(error.to_string()),
            ..Self::default()
        }
    }
}

#[derive(Serialize)]
struct HealthResponse {
    ok: bool,
    service: &'static str,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct DistributeTeamsBody {
    competition_id: CompetitionId,
    teams_per_group: i64,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CompetitionBody {
    competition_id: CompetitionId,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct UpdateStateBody {
    competition_id: CompetitionId,
    new_state: CompetitionState,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct AddParticipantBody {
    competition_id: CompetitionId,
    participant: NewTeam,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct UpdateResultBody {
    competition_id: CompetitionId,
    match_id: MatchId,
    result: MatchResult,
}

/// Query string of the feeds: `?competitionId=...`
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CompetitionQuery {
    competition_id: CompetitionId,
}

/// Bad input is the caller's fault, missing documents are 404, the rest is ours.
fn status_for(error: &ServiceError) -> StatusCode {
    match error {
        ServiceError::Invalid(_) => StatusCode::BAD_REQUEST,
        ServiceError::Store(
            StoreError::CompetitionNotFound(_)
            | StoreError::TeamNotFound(_)
            | StoreError::MatchNotFound(_),
        ) => StatusCode::NOT_FOUND,
        ServiceError::Store(StoreError::LockPoisoned) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn failure(message: &str, error: &ServiceError) -> HttpResponse {
    HttpResponse::build(status_for(error)).json(ApiResponse::failed(message, error))
}

/// Server-sent events: one `data:` line of JSON per change.
fn event_stream(events: ChangeStream) -> HttpResponse {
    let body = events.map(|event| {
        serde_json::to_string(&event).map(|json| Bytes::from(format!("data: {}\n\n", json)))
    });
    HttpResponse::Ok()
        .content_type("text/event-stream")
        .insert_header(("Cache-Control", "no-cache"))
        .streaming(body)
}

#[get("/api/health")]
async fn api_health() -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        ok: true,
        service: "competition-coordinator",
    })
}

#[post("/createCompetition")]
async fn create_competition(state: AppState, body: Json<NewCompetition>) -> HttpResponse {
    match service::create_competition(state.get_ref(), body.into_inner()).await {
        Ok(competition) => HttpResponse::Ok().json(ApiResponse {
            competition_id: Some(competition.id),
            ..ApiResponse::ok("Competition created successfully")
        }),
        Err(e) => failure("Failed to create competition", &e),
    }
}

/// List all competitions.
#[get("/getCompetition")]
async fn get_competitions(state: AppState) -> HttpResponse {
    match service::list_competitions(state.get_ref()).await {
        Ok(competitions) => HttpResponse::Ok().json(competitions),
        Err(e) => failure("Failed to read competitions", &e),
    }
}

/// Split the registered teams into groups and label them.
#[post("/distributeTeams")]
async fn distribute_teams(state: AppState, body: Json<DistributeTeamsBody>) -> HttpResponse {
    match service::distribute_teams(state.get_ref(), body.competition_id, body.teams_per_group).await
    {
        Ok(_) => HttpResponse::Ok().json(ApiResponse::ok("Teams distributed successfully")),
        Err(e) => failure("Failed to distribute teams", &e),
    }
}

/// Create the single-elimination bracket for the registered teams.
#[post("/createTournament")]
async fn create_tournament(state: AppState, body: Json<CompetitionBody>) -> HttpResponse {
    match service::create_tournament(state.get_ref(), body.competition_id).await {
        Ok(_) => HttpResponse::Ok().json(ApiResponse::ok("Tournament matches created successfully")),
        Err(e) => failure("Failed to create tournament matches", &e),
    }
}

#[patch("/updateCompetitionState")]
async fn update_competition_state(state: AppState, body: Json<UpdateStateBody>) -> HttpResponse {
    let body = body.into_inner();
    match service::update_competition_state(state.get_ref(), body.competition_id, body.new_state)
        .await
    {
        Ok(()) => HttpResponse::Ok().json(ApiResponse::ok("Competition state updated successfully")),
        Err(e) => failure("Failed to update competition state", &e),
    }
}

/// Register a team; responds with its id.
#[post("/addParticipant")]
async fn add_participant(state: AppState, body: Json<AddParticipantBody>) -> HttpResponse {
    let body = body.into_inner();
    match service::add_participant(state.get_ref(), body.competition_id, body.participant).await {
        Ok(team) => HttpResponse::Ok().json(ApiResponse {
            participant_id: Some(team.id),
            ..ApiResponse::ok("Participant added successfully")
        }),
        Err(e) => failure("Failed to add participant", &e),
    }
}

#[post("/updateResult")]
async fn update_result(state: AppState, body: Json<UpdateResultBody>) -> HttpResponse {
    let body = body.into_inner();
    match service::update_result(state.get_ref(), body.competition_id, body.match_id, body.result)
        .await
    {
        Ok(_) => HttpResponse::Ok().json(ApiResponse::ok("Match result updated successfully")),
        Err(e) => failure("Failed to update match result", &e),
    }
}

/// Live feed of match changes for one competition.
#[get("/streamResults")]
async fn stream_results(state: AppState, query: Query<CompetitionQuery>) -> HttpResponse {
    match service::stream_results(state.get_ref(), query.competition_id).await {
        Ok(events) => event_stream(events),
        Err(e) => failure("Failed to listen for results", &e),
    }
}

/// Live feed of team changes for one competition.
#[get("/streamParticipants")]
async fn stream_participants(state: AppState, query: Query<CompetitionQuery>) -> HttpResponse {
    match service::stream_participants(state.get_ref(), query.competition_id).await {
        Ok(events) => event_stream(events),
        Err(e) => failure("Failed to listen for participants", &e),
    }
}

/// Register every API route. The store must be added separately as `AppState`.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(api_health)
        .service(create_competition)
        .service(get_competitions)
        .service(distribute_teams)
        .service(create_tournament)
        .service(update_competition_state)
        .service(add_participant)
        .service(update_result)
        .service(stream_results)
        .service(stream_participants);
}
