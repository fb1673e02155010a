//! Derived standings row.

use crate::models::team::{Team, TeamId};
use serde::{Deserialize, Serialize};

/// One row of the standings table. Computed from matches, never stored.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamStats {
    pub team_id: TeamId,
    pub team_name: String,
    pub matches_played: u32,
    pub matches_won: u32,
    /// Sum of own scores across played matches.
    pub total_score: u64,
    /// 1-based position in the sorted table.
    pub rank: usize,
}

impl TeamStats {
    /// Zeroed row for a team (rank is assigned after sorting).
    pub fn for_team(team: &Team) -> Self {
        Self {
            team_id: team.id,
            team_name: team.name.clone(),
            matches_played: 0,
            matches_won: 0,
            total_score: 0,
            rank: 0,
        }
    }

    /// Count one played match with this team's own score.
    pub fn add_result(&mut self, own_score: u32, opponent_score: u32) {
        self.matches_played += 1;
        self.total_score += u64::from(own_score);
        if own_score > opponent_score {
            self.matches_won += 1;
        }
    }
}
