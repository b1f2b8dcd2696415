//! Group stage: split registered teams into fixed-size groups.

use crate::models::{CompetitionError, Team, TeamId};

/// Teams sharing one group. Its position in the partition decides its label.
pub type Group = Vec<Team>;

/// Label persisted on every team of the group at `index` (0-based): "Group 1", "Group 2", ...
pub fn group_label(index: usize) -> String {
    format!("Group {}", index + 1)
}

/// Check a caller-supplied group size and turn it into a usable one.
pub fn teams_per_group(requested: i64) -> Result<usize, CompetitionError> {
    match usize::try_from(requested) {
        Ok(size) if size > 0 => Ok(size),
        _ => Err(CompetitionError::InvalidTeamsPerGroup(requested)),
    }
}

/// Partition `teams` into groups of at most `teams_per_group`.
///
/// 1. Start an empty group and scan the remaining teams in input order.
/// 2. Admit a team while the group has room and holds no team with the same `team_name`.
/// 3. Everything not admitted stays, in order, for the next group.
/// 4. Repeat until every team is placed.
///
/// Deterministic: the same input always yields the same groups. A team whose name
/// collides with all others simply lands in a later (possibly single-member) group.
pub fn partition_teams(
    teams: Vec<Team>,
    teams_per_group: usize,
) -> Result<Vec<Group>, CompetitionError> {
    if teams_per_group == 0 {
        return Err(CompetitionError::InvalidTeamsPerGroup(0));
    }

    let mut groups = Vec::new();
    let mut remaining = teams;

    while !remaining.is_empty() {
        let mut group: Group = Vec::with_capacity(teams_per_group);
        let mut deferred = Vec::new();

        for team in remaining {
            let has_room = group.len() < teams_per_group;
            if has_room && !group.iter().any(|t| t.team_name == team.team_name) {
                group.push(team);
            } else {
                deferred.push(team);
            }
        }

        // The first remaining team always fits an empty group, so every pass makes progress.
        groups.push(group);
        remaining = deferred;
    }

    Ok(groups)
}

/// One team's group label, ready to be written back to the store.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct GroupAssignment {
    pub team_id: TeamId,
    pub group: String,
}

/// Flatten a partition into per-team label writes, in group order.
pub fn group_assignments(groups: &[Group]) -> Vec<GroupAssignment> {
    groups
        .iter()
        .enumerate()
        .flat_map(|(index, group)| {
            let label = group_label(index);
            group.iter().map(move |team| GroupAssignment {
                team_id: team.id,
                group: label.clone(),
            })
        })
        .collect()
}
