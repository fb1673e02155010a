//! Tournament business logic: round robin, results, standings, grand final.

mod finals;
mod matches;
mod round_robin;
mod standings;

pub use finals::{champion, play_grand_final, select_finalists};
pub use matches::{create_match, record_match_score};
pub use round_robin::{all_regular_matches_played, generate_round_robin_matches, unplayed_pairings};
pub use standings::calculate_standings;
