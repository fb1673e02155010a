//! Player data structure.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a player (used in teams and lookups).
pub type PlayerId = Uuid;

/// A registered player. Teams copy players when they are formed.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photo_url: Option<String>,
}

impl Player {
    /// Create a new player with a fresh id.
    pub fn new(name: impl Into<String>, photo_url: Option<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            photo_url,
        }
    }
}
