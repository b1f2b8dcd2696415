//! Competition logic: team grouping and bracket construction. Pure, no I/O.

mod bracket;
mod grouping;

pub use bracket::{assign_seeds, bracket_size, build_bracket, match_skeleton, rounds_for};
pub use grouping::{
    group_assignments, group_label, partition_teams, teams_per_group, Group, GroupAssignment,
};
