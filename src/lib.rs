//! Doubles tournament organizer: library with models, business logic and the entity store.

pub mod export;
pub mod logic;
pub mod models;
pub mod store;

pub use export::standings_csv;
pub use logic::{
    all_regular_matches_played, calculate_standings, champion, create_match,
    generate_round_robin_matches, play_grand_final, record_match_score, select_finalists,
    unplayed_pairings,
};
pub use models::{
    GameMatch, MatchId, Player, PlayerId, Team, TeamId, TeamStats, Tournament, TournamentError,
    TournamentId, TournamentStatus,
};
pub use store::{FileStorage, MemoryStorage, StorageBackend, StorageError, Store};
