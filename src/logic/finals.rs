//! Grand final: finalist selection, the decisive match, and the champion.

use crate::logic::matches::create_match;
use crate::logic::standings::calculate_standings;
use crate::models::{GameMatch, Team, Tournament, TournamentError};

/// The two best-ranked teams from the standings (rank 1 and rank 2).
/// A slot is None when the tournament has fewer teams. Read-only.
pub fn select_finalists(tournament: &Tournament) -> (Option<&Team>, Option<&Team>) {
    let standings = calculate_standings(tournament);
    let mut top = standings.iter().filter_map(|s| tournament.team(s.team_id));
    (top.next(), top.next())
}

/// Play the grand final between the current finalists with the given score
/// (`score_first` belongs to the rank-1 team). Completes the tournament.
pub fn play_grand_final(
    tournament: &mut Tournament,
    score_first: u32,
    score_second: u32,
) -> Result<GameMatch, TournamentError> {
    if tournament.grand_final_played {
        return Err(TournamentError::GrandFinalAlreadyPlayed);
    }
    let (first, second) = match select_finalists(tournament) {
        (Some(a), Some(b)) => (a.id, b.id),
        _ => return Err(TournamentError::NotEnoughTeams),
    };
    create_match(tournament, first, second, Some((score_first, score_second)), true)
}

/// Winner of the recorded grand final, if any.
pub fn champion(tournament: &Tournament) -> Option<&Team> {
    let winner = tournament.grand_final()?.winner()?;
    tournament.team(winner)
}
