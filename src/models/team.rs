//! Two-player team.

use crate::models::player::{Player, PlayerId};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a team.
pub type TeamId = Uuid;

/// A doubles team. `players` is a snapshot taken when the team was formed;
/// later player edits do not reach it.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Team {
    pub id: TeamId,
    pub name: String,
    pub players: [Player; 2],
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photo_url: Option<String>,
}

impl Team {
    pub fn new(name: impl Into<String>, players: [Player; 2], photo_url: Option<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            players,
            photo_url,
        }
    }

    pub fn has_player(&self, player_id: PlayerId) -> bool {
        self.players.iter().any(|p| p.id == player_id)
    }
}
