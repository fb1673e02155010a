//! Round robin: schedule generation and completion bookkeeping.

use crate::models::{GameMatch, Team, Tournament, TournamentError};
use chrono::Utc;

/// Generate one match for every unordered pair of teams, in roster order.
///
/// 1. Completed tournaments cannot be rescheduled.
/// 2. Fewer than 2 teams: nothing to schedule, returns an empty list.
/// 3. Existing round-robin matches are only discarded when `replace_existing` is set.
/// 4. For teams `t[i]`, `t[j]` with `i < j`, push a 0-0 unplayed match; `n(n-1)/2` total.
///
/// Moves the tournament to Active when at least one match is produced.
pub fn generate_round_robin_matches(
    tournament: &mut Tournament,
    replace_existing: bool,
) -> Result<Vec<GameMatch>, TournamentError> {
    if tournament.is_completed() {
        return Err(TournamentError::InvalidState);
    }
    if tournament.teams.len() < 2 {
        return Ok(Vec::new());
    }
    if tournament.regular_matches().next().is_some() {
        if !replace_existing {
            return Err(TournamentError::MatchesAlreadyGenerated);
        }
        log::info!(
            "Replacing {} existing match(es) in tournament {}",
            tournament.regular_matches().count(),
            tournament.id
        );
        tournament.matches.retain(|m| m.is_grand_final);
    }

    let now = Utc::now();
    let teams = &tournament.teams;
    let mut generated = Vec::with_capacity(teams.len() * (teams.len() - 1) / 2);
    for (i, team_a) in teams.iter().enumerate() {
        for team_b in &teams[i + 1..] {
            generated.push(GameMatch::scheduled(tournament.id, team_a.id, team_b.id, false, now));
        }
    }

    tournament.matches.extend(generated.iter().cloned());
    if !generated.is_empty() {
        tournament.activate();
    }
    log::info!(
        "Generated {} round-robin match(es) for {} team(s) in tournament {}",
        generated.len(),
        tournament.teams.len(),
        tournament.id
    );
    Ok(generated)
}

/// Pairs of current teams that have no played round-robin match yet.
pub fn unplayed_pairings(tournament: &Tournament) -> Vec<(&Team, &Team)> {
    let teams = &tournament.teams;
    let mut missing = Vec::new();
    for (i, team_a) in teams.iter().enumerate() {
        for team_b in &teams[i + 1..] {
            let played = tournament
                .regular_matches()
                .any(|m| m.played && m.is_between(team_a.id, team_b.id));
            if !played {
                missing.push((team_a, team_b));
            }
        }
    }
    missing
}

/// True once every pair of (at least two) teams has a played round-robin match.
pub fn all_regular_matches_played(tournament: &Tournament) -> bool {
    tournament.teams.len() >= 2 && unplayed_pairings(tournament).is_empty()
}
