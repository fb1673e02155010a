//! Entity store: players, teams, tournaments and matches over a pluggable backend.
//!
//! Matches live in two places that are kept identical: the flat `matches` collection
//! (indexed by id, persisted under its own key) and each tournament's nested `matches`.
//! On load the flat collection wins and the nested lists are rebuilt from it.

mod backend;

pub use backend::{FileStorage, MemoryStorage, StorageBackend, StorageError};

use crate::logic;
use crate::models::{
    GameMatch, MatchId, Player, PlayerId, Team, TeamId, TeamStats, Tournament, TournamentError,
    TournamentId, TournamentStatus,
};
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::Serialize;

const PLAYERS_KEY: &str = "players";
const TEAMS_KEY: &str = "teams";
const TOURNAMENTS_KEY: &str = "tournaments";
const MATCHES_KEY: &str = "matches";

/// Collections changed since the last flush.
#[derive(Clone, Copy, Debug, Default)]
struct Dirty {
    players: bool,
    teams: bool,
    tournaments: bool,
    matches: bool,
}

/// In-memory collections plus the backend they are flushed to.
/// Readers get copies; nothing outside the store holds a reference into it.
pub struct Store {
    backend: Box<dyn StorageBackend>,
    players: Vec<Player>,
    teams: Vec<Team>,
    tournaments: Vec<Tournament>,
    matches: Vec<GameMatch>,
    dirty: Dirty,
}

impl Store {
    /// Load all collections from the backend. Absent keys are empty collections.
    pub fn init(backend: Box<dyn StorageBackend>) -> Result<Self, StorageError> {
        let players: Vec<Player> = load_collection(backend.as_ref(), PLAYERS_KEY)?;
        let teams: Vec<Team> = load_collection(backend.as_ref(), TEAMS_KEY)?;
        let mut tournaments: Vec<Tournament> = load_collection(backend.as_ref(), TOURNAMENTS_KEY)?;
        let matches: Vec<GameMatch> = load_collection(backend.as_ref(), MATCHES_KEY)?;

        for t in &mut tournaments {
            t.matches = matches
                .iter()
                .filter(|m| m.tournament_id == t.id)
                .cloned()
                .collect();
        }

        log::info!(
            "Store loaded: {} player(s), {} team(s), {} tournament(s), {} match(es)",
            players.len(),
            teams.len(),
            tournaments.len(),
            matches.len()
        );
        Ok(Self {
            backend,
            players,
            teams,
            tournaments,
            matches,
            dirty: Dirty::default(),
        })
    }

    /// Write every collection changed since the last flush.
    pub fn flush(&mut self) -> Result<(), StorageError> {
        let dirty = self.dirty;
        if dirty.players {
            save_collection(self.backend.as_mut(), PLAYERS_KEY, &self.players)?;
        }
        if dirty.teams {
            save_collection(self.backend.as_mut(), TEAMS_KEY, &self.teams)?;
        }
        if dirty.tournaments {
            save_collection(self.backend.as_mut(), TOURNAMENTS_KEY, &self.tournaments)?;
        }
        if dirty.matches {
            save_collection(self.backend.as_mut(), MATCHES_KEY, &self.matches)?;
        }
        if dirty.players || dirty.teams || dirty.tournaments || dirty.matches {
            log::debug!("Store flushed ({:?})", dirty);
        }
        self.dirty = Dirty::default();
        Ok(())
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty() && self.teams.is_empty() && self.tournaments.is_empty()
    }

    // Players

    pub fn create_player(&mut self, name: impl Into<String>, photo_url: Option<String>) -> Player {
        let player = Player::new(name, photo_url);
        log::debug!("Created player {} ({})", player.name, player.id);
        self.players.push(player.clone());
        self.dirty.players = true;
        player
    }

    pub fn players(&self) -> Vec<Player> {
        self.players.clone()
    }

    pub fn player(&self, id: PlayerId) -> Option<Player> {
        self.players.iter().find(|p| p.id == id).cloned()
    }

    /// Change name and/or photo. Teams keep their earlier snapshot.
    pub fn update_player(
        &mut self,
        id: PlayerId,
        name: Option<String>,
        photo_url: Option<String>,
    ) -> Option<Player> {
        let player = self.players.iter_mut().find(|p| p.id == id)?;
        if let Some(name) = name {
            player.name = name;
        }
        if photo_url.is_some() {
            player.photo_url = photo_url;
        }
        self.dirty.players = true;
        Some(player.clone())
    }

    /// Teams holding this player keep their snapshot.
    pub fn delete_player(&mut self, id: PlayerId) -> bool {
        let before = self.players.len();
        self.players.retain(|p| p.id != id);
        let removed = self.players.len() != before;
        self.dirty.players |= removed;
        removed
    }

    // Teams

    /// Form a team from two distinct registered players.
    pub fn create_team(
        &mut self,
        name: &str,
        player_ids: &[PlayerId],
        photo_url: Option<String>,
    ) -> Result<Team, TournamentError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(TournamentError::EmptyName);
        }
        let &[first, second] = player_ids else {
            return Err(TournamentError::WrongNumberOfPlayers {
                selected: player_ids.len(),
            });
        };
        if first == second {
            return Err(TournamentError::DuplicatePlayer(first));
        }
        let first = self.player(first).ok_or(TournamentError::PlayerNotFound(first))?;
        let second = self.player(second).ok_or(TournamentError::PlayerNotFound(second))?;

        let team = Team::new(name, [first, second], photo_url);
        log::debug!("Created team {} ({})", team.name, team.id);
        self.teams.push(team.clone());
        self.dirty.teams = true;
        Ok(team)
    }

    pub fn teams(&self) -> Vec<Team> {
        self.teams.clone()
    }

    pub fn team(&self, id: TeamId) -> Option<Team> {
        self.teams.iter().find(|t| t.id == id).cloned()
    }

    /// Change name and/or photo of the catalog entry. Tournaments keep their snapshot.
    pub fn update_team(
        &mut self,
        id: TeamId,
        name: Option<String>,
        photo_url: Option<String>,
    ) -> Option<Team> {
        let team = self.teams.iter_mut().find(|t| t.id == id)?;
        if let Some(name) = name {
            team.name = name;
        }
        if photo_url.is_some() {
            team.photo_url = photo_url;
        }
        self.dirty.teams = true;
        Some(team.clone())
    }

    /// Removes the catalog entry only; tournaments keep the team they registered.
    pub fn delete_team(&mut self, id: TeamId) -> bool {
        let before = self.teams.len();
        self.teams.retain(|t| t.id != id);
        let removed = self.teams.len() != before;
        self.dirty.teams |= removed;
        removed
    }

    // Tournaments

    pub fn create_tournament(
        &mut self,
        name: impl Into<String>,
        start_date: Option<DateTime<Utc>>,
    ) -> Tournament {
        let tournament = Tournament::new(name, start_date);
        log::info!("Created tournament {} ({})", tournament.name, tournament.id);
        self.tournaments.push(tournament.clone());
        self.dirty.tournaments = true;
        tournament
    }

    pub fn tournaments(&self) -> Vec<Tournament> {
        self.tournaments.clone()
    }

    pub fn tournament(&self, id: TournamentId) -> Option<Tournament> {
        self.tournaments.iter().find(|t| t.id == id).cloned()
    }

    /// Most recently started active tournament, else the most recently started one.
    pub fn current_tournament(&self) -> Option<Tournament> {
        self.tournaments
            .iter()
            .filter(|t| t.status == TournamentStatus::Active)
            .max_by_key(|t| t.start_date)
            .or_else(|| self.tournaments.iter().max_by_key(|t| t.start_date))
            .cloned()
    }

    pub fn update_tournament(
        &mut self,
        id: TournamentId,
        name: Option<String>,
        start_date: Option<DateTime<Utc>>,
    ) -> Option<Tournament> {
        let tournament = self.tournaments.iter_mut().find(|t| t.id == id)?;
        if let Some(name) = name {
            tournament.name = name;
        }
        if let Some(start_date) = start_date {
            tournament.start_date = start_date;
        }
        self.dirty.tournaments = true;
        Some(tournament.clone())
    }

    /// Removes the tournament and all of its matches.
    pub fn delete_tournament(&mut self, id: TournamentId) -> bool {
        let before = self.tournaments.len();
        self.tournaments.retain(|t| t.id != id);
        if self.tournaments.len() == before {
            return false;
        }
        let matches_before = self.matches.len();
        self.matches.retain(|m| m.tournament_id != id);
        log::info!(
            "Deleted tournament {} and {} match(es)",
            id,
            matches_before - self.matches.len()
        );
        self.dirty.tournaments = true;
        self.dirty.matches = true;
        true
    }

    /// Register a snapshot of a catalog team. False if either is missing or the team is already in.
    pub fn add_team_to_tournament(&mut self, tournament_id: TournamentId, team_id: TeamId) -> bool {
        let Some(team) = self.team(team_id) else {
            return false;
        };
        let Some(tournament) = self.tournaments.iter_mut().find(|t| t.id == tournament_id) else {
            return false;
        };
        let added = tournament.add_team(team);
        self.dirty.tournaments |= added;
        added
    }

    /// Historical matches of the removed team are kept.
    pub fn remove_team_from_tournament(&mut self, tournament_id: TournamentId, team_id: TeamId) -> bool {
        let Some(tournament) = self.tournaments.iter_mut().find(|t| t.id == tournament_id) else {
            return false;
        };
        let removed = tournament.remove_team(team_id);
        self.dirty.tournaments |= removed;
        removed
    }

    // Matches

    /// Build the round robin for a tournament. See [`logic::generate_round_robin_matches`].
    pub fn generate_matches(
        &mut self,
        tournament_id: TournamentId,
        replace_existing: bool,
    ) -> Result<Vec<GameMatch>, TournamentError> {
        self.with_tournament(tournament_id, |t| {
            logic::generate_round_robin_matches(t, replace_existing)
        })
    }

    pub fn create_match(
        &mut self,
        tournament_id: TournamentId,
        team_a_id: TeamId,
        team_b_id: TeamId,
        score: Option<(u32, u32)>,
        is_grand_final: bool,
    ) -> Result<GameMatch, TournamentError> {
        self.with_tournament(tournament_id, |t| {
            logic::create_match(t, team_a_id, team_b_id, score, is_grand_final)
        })
    }

    pub fn record_match_score(
        &mut self,
        match_id: MatchId,
        team_a_score: u32,
        team_b_score: u32,
    ) -> Result<GameMatch, TournamentError> {
        let tournament_id = self
            .matches
            .iter()
            .find(|m| m.id == match_id)
            .map(|m| m.tournament_id)
            .ok_or(TournamentError::MatchNotFound(match_id))?;
        self.with_tournament(tournament_id, |t| {
            logic::record_match_score(t, match_id, team_a_score, team_b_score)
        })
    }

    /// All matches, or only those of one tournament (schedule order).
    pub fn matches(&self, tournament_id: Option<TournamentId>) -> Vec<GameMatch> {
        self.matches
            .iter()
            .filter(|m| tournament_id.map_or(true, |id| m.tournament_id == id))
            .cloned()
            .collect()
    }

    pub fn game_match(&self, id: MatchId) -> Option<GameMatch> {
        self.matches.iter().find(|m| m.id == id).cloned()
    }

    /// False if the match does not exist or its tournament is completed.
    pub fn delete_match(&mut self, id: MatchId) -> bool {
        let Some(tournament_id) = self.game_match(id).map(|m| m.tournament_id) else {
            return false;
        };
        if let Some(t) = self.tournaments.iter_mut().find(|t| t.id == tournament_id) {
            if t.is_completed() {
                log::warn!("Refusing to delete match {} of completed tournament {}", id, t.id);
                return false;
            }
            t.matches.retain(|m| m.id != id);
            self.dirty.tournaments = true;
        }
        self.matches.retain(|m| m.id != id);
        self.dirty.matches = true;
        true
    }

    // Results

    pub fn standings(&self, tournament_id: TournamentId) -> Option<Vec<TeamStats>> {
        self.tournaments
            .iter()
            .find(|t| t.id == tournament_id)
            .map(logic::calculate_standings)
    }

    pub fn finalists(&self, tournament_id: TournamentId) -> Option<(Option<Team>, Option<Team>)> {
        let tournament = self.tournaments.iter().find(|t| t.id == tournament_id)?;
        let (first, second) = logic::select_finalists(tournament);
        Some((first.cloned(), second.cloned()))
    }

    pub fn play_grand_final(
        &mut self,
        tournament_id: TournamentId,
        score_first: u32,
        score_second: u32,
    ) -> Result<GameMatch, TournamentError> {
        self.with_tournament(tournament_id, |t| {
            logic::play_grand_final(t, score_first, score_second)
        })
    }

    pub fn champion(&self, tournament_id: TournamentId) -> Option<Team> {
        let tournament = self.tournaments.iter().find(|t| t.id == tournament_id)?;
        logic::champion(tournament).cloned()
    }

    /// Sample players, teams and a scheduled tournament. Only seeds an empty store.
    pub fn load_demo_data(&mut self) -> Result<Option<TournamentId>, TournamentError> {
        if !self.is_empty() {
            return Ok(None);
        }
        let names = [
            ("Los Campeones", "Juan Pérez", "María García"),
            ("Padel Stars", "Carlos Rodríguez", "Ana Martínez"),
            ("Raqueta Veloz", "David López", "Laura Sánchez"),
        ];
        let tournament = self.create_tournament("Torneo Primavera", None);
        for (team_name, a, b) in names {
            let a = self.create_player(a, None).id;
            let b = self.create_player(b, None).id;
            let team = self.create_team(team_name, &[a, b], None)?;
            self.add_team_to_tournament(tournament.id, team.id);
        }
        self.generate_matches(tournament.id, false)?;
        log::info!("Loaded demo data into tournament {}", tournament.id);
        Ok(Some(tournament.id))
    }

    /// Run a logic step on one tournament, then mirror its matches into the flat index.
    fn with_tournament<T>(
        &mut self,
        tournament_id: TournamentId,
        f: impl FnOnce(&mut Tournament) -> Result<T, TournamentError>,
    ) -> Result<T, TournamentError> {
        let tournament = self
            .tournaments
            .iter_mut()
            .find(|t| t.id == tournament_id)
            .ok_or(TournamentError::TournamentNotFound(tournament_id))?;
        let out = f(tournament).map_err(|e| {
            log::warn!("Tournament {}: {}", tournament_id, e);
            e
        })?;
        self.sync_matches(tournament_id);
        self.dirty.tournaments = true;
        Ok(out)
    }

    fn sync_matches(&mut self, tournament_id: TournamentId) {
        let Some(tournament) = self.tournaments.iter().find(|t| t.id == tournament_id) else {
            return;
        };
        self.matches.retain(|m| m.tournament_id != tournament_id);
        self.matches.extend(tournament.matches.iter().cloned());
        self.dirty.matches = true;
    }
}

fn load_collection<T: DeserializeOwned>(
    backend: &dyn StorageBackend,
    key: &str,
) -> Result<Vec<T>, StorageError> {
    match backend.load(key)? {
        Some(raw) => Ok(serde_json::from_str(&raw)?),
        None => Ok(Vec::new()),
    }
}

fn save_collection<T: Serialize>(
    backend: &mut dyn StorageBackend,
    key: &str,
    items: &[T],
) -> Result<(), StorageError> {
    let raw = serde_json::to_string(items)?;
    backend.save(key, &raw)
}
