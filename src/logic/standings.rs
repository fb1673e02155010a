//! Standings table computed from round-robin results.

use crate::models::{TeamStats, Tournament};

/// Compute ranked standings for the tournament's current teams.
///
/// 1. One zeroed row per team in roster order.
/// 2. Every played, non grand final match adds to the rows of the teams still present
///    (a removed team simply has no row; its opponents keep the result).
/// 3. Stable sort by wins, then total score, both descending.
/// 4. Rank is the 1-based position after sorting; equal rows keep roster order.
pub fn calculate_standings(tournament: &Tournament) -> Vec<TeamStats> {
    let mut stats: Vec<TeamStats> = tournament.teams.iter().map(TeamStats::for_team).collect();

    for m in tournament.regular_matches().filter(|m| m.played) {
        if let Some(row) = stats.iter_mut().find(|s| s.team_id == m.team_a_id) {
            row.add_result(m.team_a_score, m.team_b_score);
        }
        if let Some(row) = stats.iter_mut().find(|s| s.team_id == m.team_b_id) {
            row.add_result(m.team_b_score, m.team_a_score);
        }
    }

    stats.sort_by(|a, b| {
        b.matches_won
            .cmp(&a.matches_won)
            .then_with(|| b.total_score.cmp(&a.total_score))
    });
    for (i, row) in stats.iter_mut().enumerate() {
        row.rank = i + 1;
    }
    stats
}
