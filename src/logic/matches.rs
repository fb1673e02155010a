//! Manual match entry and score recording. Recording a grand final completes the tournament.

use crate::logic::finals::select_finalists;
use crate::models::{GameMatch, MatchId, TeamId, Tournament, TournamentError};
use chrono::Utc;

/// Add a match between two teams of the tournament, optionally with its result.
///
/// A grand final must be between the two current finalists (either order) and carry a
/// non-tied score; creating it completes the tournament.
/// Nothing can be added once the tournament is completed.
pub fn create_match(
    tournament: &mut Tournament,
    team_a_id: TeamId,
    team_b_id: TeamId,
    score: Option<(u32, u32)>,
    is_grand_final: bool,
) -> Result<GameMatch, TournamentError> {
    if tournament.grand_final_played {
        return Err(TournamentError::GrandFinalAlreadyPlayed);
    }
    if tournament.is_completed() {
        return Err(TournamentError::InvalidState);
    }
    if team_a_id == team_b_id {
        return Err(TournamentError::SameTeam(team_a_id));
    }
    for id in [team_a_id, team_b_id] {
        if !tournament.has_team(id) {
            return Err(TournamentError::TeamNotInTournament(id));
        }
    }
    if is_grand_final {
        let finalists = match select_finalists(tournament) {
            (Some(first), Some(second)) => [first.id, second.id],
            _ => return Err(TournamentError::NotEnoughTeams),
        };
        if !finalists.contains(&team_a_id) || !finalists.contains(&team_b_id) {
            return Err(TournamentError::NotFinalists);
        }
        match score {
            None => return Err(TournamentError::MissingScore),
            Some((a, b)) if a == b => return Err(TournamentError::TiedGrandFinal),
            Some(_) => {}
        }
    }

    let now = Utc::now();
    let mut game = GameMatch::scheduled(tournament.id, team_a_id, team_b_id, is_grand_final, now);
    if let Some((a, b)) = score {
        game.record_score(a, b);
    }
    tournament.matches.push(game.clone());

    if is_grand_final {
        tournament.complete(now);
        log::info!("Tournament {} completed by grand final {}", tournament.id, game.id);
    } else {
        tournament.activate();
    }
    Ok(game)
}

/// Set the result of an existing match (the generic update path).
///
/// Rejected once the tournament is completed. A grand final cannot be recorded as a tie.
pub fn record_match_score(
    tournament: &mut Tournament,
    match_id: MatchId,
    team_a_score: u32,
    team_b_score: u32,
) -> Result<GameMatch, TournamentError> {
    let is_grand_final = tournament
        .game_match(match_id)
        .ok_or(TournamentError::MatchNotFound(match_id))?
        .is_grand_final;
    if tournament.grand_final_played {
        return Err(TournamentError::GrandFinalAlreadyPlayed);
    }
    if tournament.is_completed() {
        return Err(TournamentError::InvalidState);
    }
    if is_grand_final && team_a_score == team_b_score {
        return Err(TournamentError::TiedGrandFinal);
    }

    let game = tournament
        .matches
        .iter_mut()
        .find(|m| m.id == match_id)
        .ok_or(TournamentError::MatchNotFound(match_id))?;
    game.record_score(team_a_score, team_b_score);
    let game = game.clone();

    if is_grand_final {
        tournament.complete(Utc::now());
        log::info!("Tournament {} completed by grand final {}", tournament.id, game.id);
    }
    Ok(game)
}
