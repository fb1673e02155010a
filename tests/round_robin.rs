//! Integration tests for round-robin generation and completion bookkeeping.

use padel_tournament_web::{
    all_regular_matches_played, create_match, generate_round_robin_matches, record_match_score,
    unplayed_pairings, Player, Team, Tournament, TournamentError, TournamentStatus,
};
use std::collections::HashSet;

fn tournament_with_teams(n: usize) -> Tournament {
    let mut t = Tournament::new("Open", None);
    for i in 0..n {
        let players = [Player::new(format!("P{i}a"), None), Player::new(format!("P{i}b"), None)];
        t.teams.push(Team::new(format!("T{i}"), players, None));
    }
    t
}

#[test]
fn generates_every_pair_exactly_once() {
    for n in 2..=7 {
        let mut t = tournament_with_teams(n);
        let matches = generate_round_robin_matches(&mut t, false).unwrap();
        assert_eq!(matches.len(), n * (n - 1) / 2);
        assert_eq!(t.matches.len(), matches.len());

        let mut pairs = HashSet::new();
        for m in &matches {
            assert_ne!(m.team_a_id, m.team_b_id);
            assert!(!m.played && !m.is_grand_final);
            assert_eq!((m.team_a_score, m.team_b_score), (0, 0));
            let key = if m.team_a_id < m.team_b_id {
                (m.team_a_id, m.team_b_id)
            } else {
                (m.team_b_id, m.team_a_id)
            };
            assert!(pairs.insert(key), "pair scheduled twice");
        }
        assert_eq!(t.status, TournamentStatus::Active);
    }
}

#[test]
fn pairs_follow_roster_order() {
    let mut t = tournament_with_teams(3);
    let ids: Vec<_> = t.teams.iter().map(|team| team.id).collect();
    let matches = generate_round_robin_matches(&mut t, false).unwrap();
    let pairs: Vec<_> = matches.iter().map(|m| (m.team_a_id, m.team_b_id)).collect();
    assert_eq!(pairs, vec![(ids[0], ids[1]), (ids[0], ids[2]), (ids[1], ids[2])]);
}

#[test]
fn no_teams_produces_nothing_and_stays_upcoming() {
    let mut t = tournament_with_teams(0);
    assert!(generate_round_robin_matches(&mut t, false).unwrap().is_empty());
    assert_eq!(t.status, TournamentStatus::Upcoming);

    let mut t = tournament_with_teams(1);
    assert!(generate_round_robin_matches(&mut t, true).unwrap().is_empty());
    assert_eq!(t.status, TournamentStatus::Upcoming);
}

#[test]
fn regeneration_requires_confirmation() {
    let mut t = tournament_with_teams(4);
    let first = generate_round_robin_matches(&mut t, false).unwrap();
    assert_eq!(
        generate_round_robin_matches(&mut t, false),
        Err(TournamentError::MatchesAlreadyGenerated)
    );
    assert_eq!(t.matches, first);

    let second = generate_round_robin_matches(&mut t, true).unwrap();
    assert_eq!(second.len(), 6);
    assert_eq!(t.matches.len(), 6);
    assert!(first.iter().all(|m| t.game_match(m.id).is_none()));
}

#[test]
fn completed_tournament_cannot_be_rescheduled() {
    let mut t = tournament_with_teams(2);
    let (a, b) = (t.teams[0].id, t.teams[1].id);
    create_match(&mut t, a, b, Some((6, 2)), true).unwrap();
    assert_eq!(
        generate_round_robin_matches(&mut t, true),
        Err(TournamentError::InvalidState)
    );
}

#[test]
fn unplayed_pairings_shrink_as_results_come_in() {
    let mut t = tournament_with_teams(3);
    let matches = generate_round_robin_matches(&mut t, false).unwrap();
    assert_eq!(unplayed_pairings(&t).len(), 3);
    assert!(!all_regular_matches_played(&t));

    record_match_score(&mut t, matches[0].id, 6, 4).unwrap();
    record_match_score(&mut t, matches[1].id, 0, 0).unwrap();
    assert_eq!(unplayed_pairings(&t).len(), 1);

    record_match_score(&mut t, matches[2].id, 3, 6).unwrap();
    assert!(unplayed_pairings(&t).is_empty());
    assert!(all_regular_matches_played(&t));
}

#[test]
fn manual_match_validation() {
    let mut t = tournament_with_teams(2);
    let (a, b) = (t.teams[0].id, t.teams[1].id);
    let outsider = uuid::Uuid::new_v4();

    assert_eq!(create_match(&mut t, a, a, None, false), Err(TournamentError::SameTeam(a)));
    assert_eq!(
        create_match(&mut t, a, outsider, None, false),
        Err(TournamentError::TeamNotInTournament(outsider))
    );
    assert!(t.matches.is_empty());

    let m = create_match(&mut t, a, b, Some((7, 5)), false).unwrap();
    assert!(m.played);
    assert_eq!(m.winner(), Some(a));
    assert_eq!(t.status, TournamentStatus::Active);
}
