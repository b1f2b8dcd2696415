//! Competition coordinator: team grouping, single-elimination brackets, result feeds.

pub mod api;
pub mod config;
pub mod logic;
pub mod models;
pub mod service;
pub mod store;

pub use config::{ConfigError, ServerConfig};
pub use logic::{
    assign_seeds, bracket_size, build_bracket, group_assignments, group_label, match_skeleton,
    partition_teams, rounds_for, teams_per_group, Group, GroupAssignment,
};
pub use models::{
    BracketMatch, Competition, CompetitionError, CompetitionId, CompetitionState, MatchId,
    MatchResult, NewCompetition, NewTeam, Participant, StoredMatch, Team, TeamId,
};
pub use service::{ServiceError, ServiceResult};
pub use store::{
    ChangeEvent, ChangeKind, ChangeStream, Collection, CompetitionStore, Document, MemoryStore,
    StoreError, StoreResult,
};
