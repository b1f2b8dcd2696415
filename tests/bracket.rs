//! Integration tests for the single-elimination bracket: round layout and seeding.

use competition_coordinator::{
    assign_seeds, bracket_size, build_bracket, match_skeleton, rounds_for, BracketMatch,
    CompetitionError, Participant, Team,
};

fn participants(n: usize) -> Vec<Participant> {
    (0..n)
        .map(|i| Team::new(format!("T{i}")).participant())
        .collect()
}

fn matches_in_round(matches: &[BracketMatch], round: u32) -> usize {
    matches.iter().filter(|m| m.round == round).count()
}

#[test]
fn no_matches_for_zero_or_one_participant() {
    assert_eq!(rounds_for(0), 0);
    assert!(match_skeleton(0).is_empty());
    assert_eq!(rounds_for(1), 0);
    assert!(match_skeleton(1).is_empty());
    assert_eq!(bracket_size(1), 0);
}

#[test]
fn five_participants_need_three_rounds() {
    let matches = match_skeleton(5);

    assert_eq!(rounds_for(5), 3);
    assert_eq!(bracket_size(5), 8);
    assert_eq!(matches.len(), 7);
    assert_eq!(matches_in_round(&matches, 1), 4);
    assert_eq!(matches_in_round(&matches, 2), 2);
    assert_eq!(matches_in_round(&matches, 3), 1);
    assert!(matches.iter().all(|m| m.team_1.is_none() && m.team_2.is_none()));
}

#[test]
fn skeleton_is_ordered_by_round_and_ends_with_the_final() {
    for n in 2..70 {
        let matches = match_skeleton(n);
        let rounds = rounds_for(n);
        assert!(matches.windows(2).all(|w| w[0].round <= w[1].round), "n = {n}");
        assert_eq!(matches.first().map(|m| m.round), Some(1), "n = {n}");
        assert_eq!(matches.last().map(|m| m.round), Some(rounds), "n = {n}");
        assert_eq!(matches_in_round(&matches, rounds), 1, "n = {n}");
        assert_eq!(2 * matches_in_round(&matches, 1), bracket_size(n), "n = {n}");
        assert!(bracket_size(n) >= n && bracket_size(n) < 2 * n, "n = {n}");
    }
}

#[test]
fn four_participants_fill_both_first_round_matches() {
    let entrants = participants(4);
    let mut matches = match_skeleton(4);

    assign_seeds(&mut matches, &entrants).unwrap();

    assert_eq!(matches[0].team_1, Some(entrants[0].id));
    assert_eq!(matches[0].team_2, Some(entrants[1].id));
    assert_eq!(matches[1].team_1, Some(entrants[2].id));
    assert_eq!(matches[1].team_2, Some(entrants[3].id));
    // The final waits on the first round.
    assert_eq!(matches[2], BracketMatch::empty(2));
}

#[test]
fn three_participants_leave_a_bye() {
    let entrants = participants(3);
    let mut matches = match_skeleton(3);

    assign_seeds(&mut matches, &entrants).unwrap();

    assert_eq!(matches[0].team_1, Some(entrants[0].id));
    assert_eq!(matches[0].team_2, Some(entrants[1].id));
    assert_eq!(matches[1].team_1, Some(entrants[2].id));
    assert_eq!(matches[1].team_2, None);
}

#[test]
fn too_many_participants_are_rejected_without_partial_seeding() {
    let entrants = participants(5);
    let mut matches = match_skeleton(4);

    let result = assign_seeds(&mut matches, &entrants);

    assert_eq!(
        result,
        Err(CompetitionError::SeedOutOfRange {
            participants: 5,
            slots: 4
        })
    );
    assert_eq!(matches, match_skeleton(4));
}

#[test]
fn seeding_into_an_empty_skeleton_is_out_of_range() {
    let mut matches = match_skeleton(1);
    assert!(matches!(
        assign_seeds(&mut matches, &participants(1)),
        Err(CompetitionError::SeedOutOfRange { slots: 0, .. })
    ));
}

#[test]
fn build_bracket_seeds_every_participant_once() {
    let entrants = participants(11);
    let matches = build_bracket(&entrants).unwrap();

    assert_eq!(matches.len(), 15);
    let seeded: Vec<_> = matches
        .iter()
        .filter(|m| m.round == 1)
        .flat_map(|m| [m.team_1, m.team_2])
        .flatten()
        .collect();
    let expected: Vec<_> = entrants.iter().map(|p| p.id).collect();
    assert_eq!(seeded, expected);
    assert!(matches
        .iter()
        .filter(|m| m.round > 1)
        .all(|m| m.team_1.is_none() && m.team_2.is_none()));
}

#[test]
fn build_bracket_for_a_lone_participant_is_empty() {
    assert_eq!(build_bracket(&participants(1)), Ok(Vec::new()));
    assert_eq!(build_bracket(&[]), Ok(Vec::new()));
}
