//! Data structures for the tournament: players, teams, matches, tournaments, standings.

mod game;
mod player;
mod stats;
mod team;
mod tournament;

pub use game::{GameMatch, MatchId};
pub use player::{Player, PlayerId};
pub use stats::TeamStats;
pub use team::{Team, TeamId};
pub use tournament::{Tournament, TournamentError, TournamentId, TournamentStatus};
