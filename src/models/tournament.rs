//! Tournament, TournamentStatus and TournamentError.

use crate::models::game::{GameMatch, MatchId};
use crate::models::player::PlayerId;
use crate::models::team::{Team, TeamId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Errors that can occur during tournament operations.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum TournamentError {
    /// A required name was empty.
    EmptyName,
    /// A team needs exactly two players.
    WrongNumberOfPlayers { selected: usize },
    /// The same player was selected twice for one team.
    DuplicatePlayer(PlayerId),
    PlayerNotFound(PlayerId),
    TeamNotFound(TeamId),
    TournamentNotFound(TournamentId),
    MatchNotFound(MatchId),
    /// A match needs two different teams.
    SameTeam(TeamId),
    /// The team is not registered in this tournament.
    TeamNotInTournament(TeamId),
    /// Round-robin matches exist and replacement was not confirmed.
    MatchesAlreadyGenerated,
    /// Not enough teams for a grand final (need at least 2).
    NotEnoughTeams,
    /// A grand final must be played by the two current finalists.
    NotFinalists,
    /// A grand final needs a score when it is created.
    MissingScore,
    /// A grand final cannot end level.
    TiedGrandFinal,
    /// The grand final has already been played.
    GrandFinalAlreadyPlayed,
    /// Tournament is not in a state that allows this action.
    InvalidState,
}

impl std::fmt::Display for TournamentError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TournamentError::EmptyName => write!(f, "Name must not be empty"),
            TournamentError::WrongNumberOfPlayers { selected } => {
                write!(f, "A team must have exactly 2 players (selected {})", selected)
            }
            TournamentError::DuplicatePlayer(_) => write!(f, "The same player cannot be selected twice"),
            TournamentError::PlayerNotFound(id) => write!(f, "Player {} not found", id),
            TournamentError::TeamNotFound(id) => write!(f, "Team {} not found", id),
            TournamentError::TournamentNotFound(id) => write!(f, "Tournament {} not found", id),
            TournamentError::MatchNotFound(id) => write!(f, "Match {} not found", id),
            TournamentError::SameTeam(_) => write!(f, "A team cannot play against itself"),
            TournamentError::TeamNotInTournament(id) => {
                write!(f, "Team {} is not part of this tournament", id)
            }
            TournamentError::MatchesAlreadyGenerated => {
                write!(f, "Matches already exist; confirm replacement to regenerate")
            }
            TournamentError::NotEnoughTeams => write!(f, "Need at least 2 teams for the grand final"),
            TournamentError::NotFinalists => {
                write!(f, "The grand final must be played by the top two teams")
            }
            TournamentError::MissingScore => write!(f, "The grand final must be created with a score"),
            TournamentError::TiedGrandFinal => write!(f, "The grand final cannot end in a tie"),
            TournamentError::GrandFinalAlreadyPlayed => write!(f, "The grand final has already been played"),
            TournamentError::InvalidState => write!(f, "Invalid state for this action"),
        }
    }
}

impl std::error::Error for TournamentError {}

/// Unique identifier for a tournament.
pub type TournamentId = Uuid;

/// Lifecycle of a tournament. Only moves forward; `Completed` is terminal.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TournamentStatus {
    /// Created; no team or match yet.
    #[default]
    Upcoming,
    /// Teams registered and/or matches scheduled.
    Active,
    /// Grand final recorded.
    Completed,
}

/// A round-robin tournament followed by a single grand final.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tournament {
    pub id: TournamentId,
    pub name: String,
    /// Team snapshots, in registration order. No duplicate ids.
    #[serde(default)]
    pub teams: Vec<Team>,
    /// Round-robin matches plus at most one grand final.
    #[serde(default)]
    pub matches: Vec<GameMatch>,
    pub start_date: DateTime<Utc>,
    #[serde(default)]
    pub end_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub status: TournamentStatus,
    #[serde(default)]
    pub completed: bool,
    #[serde(default)]
    pub grand_final_played: bool,
    pub created_at: DateTime<Utc>,
}

impl Tournament {
    /// Create a new tournament in Upcoming state. Start date defaults to now.
    pub fn new(name: impl Into<String>, start_date: Option<DateTime<Utc>>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            teams: Vec::new(),
            matches: Vec::new(),
            start_date: start_date.unwrap_or(now),
            end_date: None,
            status: TournamentStatus::Upcoming,
            completed: false,
            grand_final_played: false,
            created_at: now,
        }
    }

    pub fn team(&self, team_id: TeamId) -> Option<&Team> {
        self.teams.iter().find(|t| t.id == team_id)
    }

    pub fn has_team(&self, team_id: TeamId) -> bool {
        self.team(team_id).is_some()
    }

    pub fn game_match(&self, match_id: MatchId) -> Option<&GameMatch> {
        self.matches.iter().find(|m| m.id == match_id)
    }

    /// Round-robin (non grand final) matches in schedule order.
    pub fn regular_matches(&self) -> impl Iterator<Item = &GameMatch> {
        self.matches.iter().filter(|m| !m.is_grand_final)
    }

    pub fn grand_final(&self) -> Option<&GameMatch> {
        self.matches.iter().find(|m| m.is_grand_final)
    }

    pub fn is_completed(&self) -> bool {
        self.status == TournamentStatus::Completed
    }

    /// Register a team snapshot. Returns false if a team with this id is already present
    /// or the tournament is completed.
    pub fn add_team(&mut self, team: Team) -> bool {
        if self.is_completed() || self.has_team(team.id) {
            return false;
        }
        self.teams.push(team);
        self.activate();
        true
    }

    /// Drop a team from the roster. Its matches stay as historical records.
    /// Returns false if the team is absent or the tournament is completed.
    pub fn remove_team(&mut self, team_id: TeamId) -> bool {
        if self.is_completed() {
            return false;
        }
        let before = self.teams.len();
        self.teams.retain(|t| t.id != team_id);
        self.teams.len() != before
    }

    /// Upcoming -> Active. No effect in any other state.
    pub fn activate(&mut self) {
        if self.status == TournamentStatus::Upcoming {
            self.status = TournamentStatus::Active;
        }
    }

    /// Mark the grand final as played and close the tournament.
    pub fn complete(&mut self, at: DateTime<Utc>) {
        self.status = TournamentStatus::Completed;
        self.completed = true;
        self.grand_final_played = true;
        self.end_date = Some(at);
    }
}
