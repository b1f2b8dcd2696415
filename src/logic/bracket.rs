//! Single-elimination bracket: round structure and first-round seeding.

use crate::models::{BracketMatch, CompetitionError, Participant, FIRST_ROUND};

/// Rounds needed for `participant_count` entrants: `ceil(log2(n))`, and 0 for n <= 1.
pub fn rounds_for(participant_count: usize) -> u32 {
    participant_count
        .checked_next_power_of_two()
        .map_or(usize::BITS, |size| size.trailing_zeros())
}

/// First-round slot count (a power of two), or 0 when no match is needed.
///
/// Saturates at `usize::MAX` when the next power of two does not fit in a `usize`.
pub fn bracket_size(participant_count: usize) -> usize {
    match rounds_for(participant_count) {
        0 => 0,
        rounds => 1usize.checked_shl(rounds).unwrap_or(usize::MAX),
    }
}

/// Build every match of the bracket with empty slots.
///
/// Round `r` of `rounds` holds `2^(rounds - r)` matches; matches are ordered by round, so
/// the first-round matches come first and the final is last.
pub fn match_skeleton(participant_count: usize) -> Vec<BracketMatch> {
    let rounds = rounds_for(participant_count);
    (FIRST_ROUND..=rounds)
        .flat_map(|round| {
            let matches_in_round = 1usize.checked_shl(rounds - round).unwrap_or(usize::MAX);
            std::iter::repeat(BracketMatch::empty(round)).take(matches_in_round)
        })
        .collect()
}

/// Seed participants into the first-round matches in input order.
///
/// Participant `i` goes to first-round match `i / 2`: `team_1` for even `i`, `team_2` for
/// odd `i`. Slots left over stay `None` (byes). If the participants do not fit, nothing
/// is assigned.
pub fn assign_seeds(
    matches: &mut [BracketMatch],
    participants: &[Participant],
) -> Result<(), CompetitionError> {
    let slots = 2 * matches.iter().filter(|m| m.round == FIRST_ROUND).count();
    if participants.len() > slots {
        return Err(CompetitionError::SeedOutOfRange {
            participants: participants.len(),
            slots,
        });
    }

    let first_round = matches.iter_mut().filter(|m| m.round == FIRST_ROUND);
    for (slot, pair) in first_round.zip(participants.chunks(2)) {
        slot.team_1 = Some(pair[0].id);
        slot.team_2 = pair.get(1).map(|p| p.id);
    }
    Ok(())
}

/// Skeleton plus seeding for a whole participant list.
///
/// A field of zero or one participants needs no matches and yields an empty bracket.
pub fn build_bracket(participants: &[Participant]) -> Result<Vec<BracketMatch>, CompetitionError> {
    let mut matches = match_skeleton(participants.len());
    if !matches.is_empty() {
        assign_seeds(&mut matches, participants)?;
    }
    Ok(matches)
}
