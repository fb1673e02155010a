//! Match (game) between two teams of a tournament.

use crate::models::team::TeamId;
use crate::models::tournament::TournamentId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a match.
pub type MatchId = Uuid;

/// A single match: round-robin fixture or the grand final.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "StoredMatch")]
pub struct GameMatch {
    pub id: MatchId,
    pub tournament_id: TournamentId,
    pub team_a_id: TeamId,
    pub team_b_id: TeamId,
    pub team_a_score: u32,
    pub team_b_score: u32,
    pub is_grand_final: bool,
    /// False until a score has been recorded. A 0-0 result is a valid played match.
    pub played: bool,
    pub date: DateTime<Utc>,
}

/// On-disk shape. Older data has no `played` field and used 0-0 to mean "not yet played".
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredMatch {
    id: MatchId,
    tournament_id: TournamentId,
    team_a_id: TeamId,
    team_b_id: TeamId,
    #[serde(default)]
    team_a_score: u32,
    #[serde(default)]
    team_b_score: u32,
    #[serde(default)]
    is_grand_final: bool,
    played: Option<bool>,
    date: DateTime<Utc>,
}

impl From<StoredMatch> for GameMatch {
    fn from(m: StoredMatch) -> Self {
        let played = m
            .played
            .unwrap_or(m.team_a_score != 0 || m.team_b_score != 0);
        Self {
            id: m.id,
            tournament_id: m.tournament_id,
            team_a_id: m.team_a_id,
            team_b_id: m.team_b_id,
            team_a_score: m.team_a_score,
            team_b_score: m.team_b_score,
            is_grand_final: m.is_grand_final,
            played,
            date: m.date,
        }
    }
}

impl GameMatch {
    /// A fixture with no result yet (score 0-0, not played).
    pub fn scheduled(
        tournament_id: TournamentId,
        team_a_id: TeamId,
        team_b_id: TeamId,
        is_grand_final: bool,
        date: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            tournament_id,
            team_a_id,
            team_b_id,
            team_a_score: 0,
            team_b_score: 0,
            is_grand_final,
            played: false,
            date,
        }
    }

    /// Set both scores and mark the match as played.
    pub fn record_score(&mut self, team_a_score: u32, team_b_score: u32) {
        self.team_a_score = team_a_score;
        self.team_b_score = team_b_score;
        self.played = true;
    }

    pub fn involves(&self, team_id: TeamId) -> bool {
        self.team_a_id == team_id || self.team_b_id == team_id
    }

    /// True if this match is between `x` and `y`, in either order.
    pub fn is_between(&self, x: TeamId, y: TeamId) -> bool {
        (self.team_a_id == x && self.team_b_id == y) || (self.team_a_id == y && self.team_b_id == x)
    }

    /// Team with the strictly higher score; None if unplayed or tied.
    pub fn winner(&self) -> Option<TeamId> {
        if !self.played {
            return None;
        }
        match self.team_a_score.cmp(&self.team_b_score) {
            std::cmp::Ordering::Greater => Some(self.team_a_id),
            std::cmp::Ordering::Less => Some(self.team_b_id),
            std::cmp::Ordering::Equal => None,
        }
    }
}
