//! Integration tests for the entity store: CRUD, persistence and match index consistency.

use chrono::{Duration, Utc};
use padel_tournament_web::{
    MemoryStorage, Store, TournamentError, TournamentId, TournamentStatus,
};
use std::collections::HashSet;

fn empty_store() -> (Store, MemoryStorage) {
    let storage = MemoryStorage::new();
    let store = Store::init(Box::new(storage.clone())).unwrap();
    (store, storage)
}

/// Store with three teams registered in one tournament.
fn store_with_tournament() -> (Store, MemoryStorage, TournamentId) {
    let (mut store, storage) = empty_store();
    let t = store.create_tournament("Spring", None);
    for i in 0..3 {
        let a = store.create_player(format!("P{i}a"), None).id;
        let b = store.create_player(format!("P{i}b"), None).id;
        let team = store.create_team(&format!("T{i}"), &[a, b], None).unwrap();
        assert!(store.add_team_to_tournament(t.id, team.id));
    }
    (store, storage, t.id)
}

fn assert_index_consistent(store: &Store, tournament_id: TournamentId) {
    let nested = store.tournament(tournament_id).unwrap().matches;
    assert_eq!(nested, store.matches(Some(tournament_id)));
}

#[test]
fn absent_keys_load_as_empty() {
    let (store, _) = empty_store();
    assert!(store.is_empty());
    assert!(store.players().is_empty());
    assert!(store.matches(None).is_empty());
    assert!(store.current_tournament().is_none());
}

#[test]
fn create_team_validation() {
    let (mut store, _) = empty_store();
    let a = store.create_player("Ana", None).id;
    let b = store.create_player("Luis", None).id;
    let ghost = uuid::Uuid::new_v4();

    assert_eq!(
        store.create_team("Solo", &[a], None),
        Err(TournamentError::WrongNumberOfPlayers { selected: 1 })
    );
    assert_eq!(
        store.create_team("Crowd", &[a, b, ghost], None),
        Err(TournamentError::WrongNumberOfPlayers { selected: 3 })
    );
    assert_eq!(store.create_team("Twins", &[a, a], None), Err(TournamentError::DuplicatePlayer(a)));
    assert_eq!(store.create_team("Ghost", &[a, ghost], None), Err(TournamentError::PlayerNotFound(ghost)));
    assert_eq!(store.create_team("  ", &[a, b], None), Err(TournamentError::EmptyName));
    assert!(store.teams().is_empty());

    let team = store.create_team("Duo", &[a, b], Some("duo.png".into())).unwrap();
    assert_eq!(team.players[0].name, "Ana");
    assert_eq!(team.players[1].name, "Luis");
    assert_eq!(store.team(team.id), Some(team));
}

#[test]
fn team_keeps_player_snapshot() {
    let (mut store, _) = empty_store();
    let a = store.create_player("Ana", None).id;
    let b = store.create_player("Luis", None).id;
    let team = store.create_team("Duo", &[a, b], None).unwrap();

    store.update_player(a, Some("Ana Maria".into()), None).unwrap();
    assert!(store.delete_player(b));
    let team = store.team(team.id).unwrap();
    assert_eq!(team.players[0].name, "Ana");
    assert!(team.has_player(b));
    assert!(!store.delete_player(b));
}

#[test]
fn reads_are_copies() {
    let (mut store, _) = empty_store();
    let p = store.create_player("Ana", None);
    let mut copy = store.player(p.id).unwrap();
    copy.name = "Changed".into();
    assert_eq!(store.player(p.id).unwrap().name, "Ana");
    assert!(store.player(uuid::Uuid::new_v4()).is_none());
}

#[test]
fn add_team_to_tournament_rules() {
    let (mut store, _, tid) = store_with_tournament();
    let existing = store.tournament(tid).unwrap().teams[0].id;
    assert!(!store.add_team_to_tournament(tid, existing));
    assert!(!store.add_team_to_tournament(uuid::Uuid::new_v4(), existing));
    assert!(!store.add_team_to_tournament(tid, uuid::Uuid::new_v4()));
    assert_eq!(store.tournament(tid).unwrap().teams.len(), 3);
    assert_eq!(store.tournament(tid).unwrap().status, TournamentStatus::Active);
}

#[test]
fn match_index_stays_consistent() {
    let (mut store, _, tid) = store_with_tournament();
    let matches = store.generate_matches(tid, false).unwrap();
    assert_eq!(matches.len(), 3);
    assert_index_consistent(&store, tid);

    store.record_match_score(matches[0].id, 6, 2).unwrap();
    assert_index_consistent(&store, tid);
    assert!(store.game_match(matches[0].id).unwrap().played);

    assert!(store.delete_match(matches[1].id));
    assert_index_consistent(&store, tid);
    assert!(store.game_match(matches[1].id).is_none());

    store.generate_matches(tid, true).unwrap();
    assert_index_consistent(&store, tid);
    assert_eq!(store.matches(Some(tid)).len(), 3);

    let ghost = uuid::Uuid::new_v4();
    assert_eq!(
        store.record_match_score(ghost, 1, 0),
        Err(TournamentError::MatchNotFound(ghost))
    );
}

#[test]
fn generation_on_missing_tournament_fails() {
    let (mut store, _) = empty_store();
    let id = uuid::Uuid::new_v4();
    assert_eq!(store.generate_matches(id, false), Err(TournamentError::TournamentNotFound(id)));
}

#[test]
fn flush_and_reload_round_trips() {
    let (mut store, storage, tid) = store_with_tournament();
    let matches = store.generate_matches(tid, false).unwrap();
    store.record_match_score(matches[0].id, 7, 5).unwrap();
    store.record_match_score(matches[1].id, 0, 0).unwrap();
    store.flush().unwrap();

    let reloaded = Store::init(Box::new(storage.clone())).unwrap();
    assert_eq!(reloaded.players(), store.players());
    assert_eq!(reloaded.teams(), store.teams());
    assert_eq!(reloaded.tournaments(), store.tournaments());
    assert_eq!(reloaded.matches(None), store.matches(None));
    assert_eq!(reloaded.standings(tid), store.standings(tid));
    assert!(reloaded.game_match(matches[1].id).unwrap().played);
    assert!(!reloaded.game_match(matches[2].id).unwrap().played);
}

#[test]
fn nothing_is_written_before_flush() {
    let (mut store, storage) = empty_store();
    store.create_player("Ana", None);
    assert!(storage.get("players").is_none());
    store.flush().unwrap();
    assert!(storage.get("players").is_some());
    assert!(storage.get("teams").is_none());
}

#[test]
fn legacy_matches_without_played_flag() {
    let (mut store, storage, tid) = store_with_tournament();
    let matches = store.generate_matches(tid, false).unwrap();
    store.flush().unwrap();

    let legacy: Vec<serde_json::Value> = matches
        .iter()
        .enumerate()
        .map(|(i, m)| {
            let (a, b) = if i == 0 { (0, 0) } else { (6, 3) };
            serde_json::json!({
                "id": m.id,
                "tournamentId": m.tournament_id,
                "teamAId": m.team_a_id,
                "teamBId": m.team_b_id,
                "teamAScore": a,
                "teamBScore": b,
                "isGrandFinal": false,
                "date": m.date,
            })
        })
        .collect();
    storage.insert("matches", serde_json::to_string(&legacy).unwrap());

    let reloaded = Store::init(Box::new(storage)).unwrap();
    assert!(!reloaded.game_match(matches[0].id).unwrap().played);
    assert!(reloaded.game_match(matches[1].id).unwrap().played);
    assert_eq!(reloaded.tournament(tid).unwrap().matches.len(), 3);
}

#[test]
fn delete_tournament_cascades_matches() {
    let (mut store, _, tid) = store_with_tournament();
    let other = store.create_tournament("Other", None);
    let team = store.teams()[0].id;
    let team2 = store.teams()[1].id;
    store.add_team_to_tournament(other.id, team);
    store.add_team_to_tournament(other.id, team2);
    store.generate_matches(tid, false).unwrap();
    store.generate_matches(other.id, false).unwrap();

    assert!(store.delete_tournament(tid));
    assert!(store.tournament(tid).is_none());
    assert!(store.matches(Some(tid)).is_empty());
    assert_eq!(store.matches(None).len(), 1);
    assert!(!store.delete_tournament(tid));
}

#[test]
fn deleting_a_catalog_team_keeps_tournament_history() {
    let (mut store, _, tid) = store_with_tournament();
    let matches = store.generate_matches(tid, false).unwrap();
    store.record_match_score(matches[0].id, 6, 4).unwrap();
    let team = matches[0].team_a_id;

    assert!(store.delete_team(team));
    assert!(store.team(team).is_none());
    let standings = store.standings(tid).unwrap();
    assert_eq!(standings.len(), 3);
    assert_eq!(standings[0].team_id, team);
    assert_eq!(standings[0].matches_won, 1);
}

#[test]
fn removing_team_from_tournament_keeps_matches() {
    let (mut store, _, tid) = store_with_tournament();
    let matches = store.generate_matches(tid, false).unwrap();
    store.record_match_score(matches[0].id, 6, 4).unwrap();
    let removed = matches[0].team_b_id;

    assert!(store.remove_team_from_tournament(tid, removed));
    assert!(!store.remove_team_from_tournament(tid, removed));
    assert_eq!(store.matches(Some(tid)).len(), 3);
    let standings = store.standings(tid).unwrap();
    assert_eq!(standings.len(), 2);
    assert!(standings.iter().all(|s| s.team_id != removed));
    assert_index_consistent(&store, tid);
}

#[test]
fn current_tournament_prefers_latest_active() {
    let (mut store, _) = empty_store();
    let now = Utc::now();
    let old_active = store.create_tournament("Old", Some(now - Duration::days(30)));
    let new_active = store.create_tournament("New", Some(now - Duration::days(1)));
    let upcoming = store.create_tournament("Future", Some(now + Duration::days(30)));

    assert_eq!(store.current_tournament().map(|t| t.id), Some(upcoming.id));

    let a = store.create_player("a", None).id;
    let b = store.create_player("b", None).id;
    let team = store.create_team("T", &[a, b], None).unwrap();
    store.add_team_to_tournament(old_active.id, team.id);
    store.add_team_to_tournament(new_active.id, team.id);
    assert_eq!(store.current_tournament().map(|t| t.id), Some(new_active.id));
}

#[test]
fn grand_final_through_the_store() {
    let (mut store, storage, tid) = store_with_tournament();
    let matches = store.generate_matches(tid, false).unwrap();
    for (m, (a, b)) in matches.iter().zip([(7, 5), (6, 4), (7, 6)]) {
        store.record_match_score(m.id, a, b).unwrap();
    }
    let (first, second) = store.finalists(tid).unwrap();
    let (first, second) = (first.unwrap(), second.unwrap());
    assert_ne!(first.id, second.id);

    let final_match = store.play_grand_final(tid, 6, 3).unwrap();
    assert_index_consistent(&store, tid);
    assert_eq!(store.champion(tid).map(|t| t.id), Some(first.id));
    assert_eq!(
        store.play_grand_final(tid, 6, 3),
        Err(TournamentError::GrandFinalAlreadyPlayed)
    );
    assert!(!store.delete_match(final_match.id));

    store.flush().unwrap();
    let reloaded = Store::init(Box::new(storage)).unwrap();
    let t = reloaded.tournament(tid).unwrap();
    assert!(t.grand_final_played);
    assert_eq!(t.status, TournamentStatus::Completed);
    assert_eq!(reloaded.champion(tid).map(|t| t.id), Some(first.id));
}

#[test]
fn demo_data_only_seeds_empty_store() {
    let (mut store, _) = empty_store();
    let tid = store.load_demo_data().unwrap().unwrap();
    assert_eq!(store.players().len(), 6);
    assert_eq!(store.teams().len(), 3);
    assert_eq!(store.matches(Some(tid)).len(), 3);
    assert_eq!(store.current_tournament().map(|t| t.id), Some(tid));

    assert_eq!(store.load_demo_data(), Ok(None));
    let names: HashSet<_> = store.teams().into_iter().map(|t| t.name).collect();
    assert_eq!(names.len(), 3);
}

#[test]
fn completed_tournament_keeps_its_teams() {
    let (mut store, _, tid) = store_with_tournament();
    let matches = store.generate_matches(tid, false).unwrap();
    for m in &matches {
        store.record_match_score(m.id, 6, 2).unwrap();
    }
    store.play_grand_final(tid, 6, 4).unwrap();
    let winner = store.champion(tid).unwrap().id;

    assert!(!store.remove_team_from_tournament(tid, winner));
    assert_eq!(store.tournament(tid).unwrap().teams.len(), 3);
    assert_eq!(store.champion(tid).map(|t| t.id), Some(winner));
}
