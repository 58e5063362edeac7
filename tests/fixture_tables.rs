use std::path::PathBuf;

use kicklogic::actions::load_actions;
use kicklogic::error::AnalyticsError;
use kicklogic::game_stats::{DEFAULT_STATISTICS, compute_game_stats};
use kicklogic::momentum::MomentumEngine;
use kicklogic::pitch_maps::{pass_map, shot_map};
use kicklogic::player_roles::{load_player_ranks, summarize_roles};
use kicklogic::teams::load_team_directory;

fn fixture(name: &str) -> PathBuf {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests");
    path.push("fixtures");
    path.push(name);
    path
}

#[test]
fn loads_sample_actions() {
    let table = load_actions(&fixture("actions_sample.csv")).expect("fixture should parse");
    assert_eq!(table.len(), 17);
    assert_eq!(table.game_ids(), vec![100, 200]);

    let game = table.game(100);
    let sides = game.sides().unwrap();
    assert_eq!(sides.teams(), ["10", "20"]);
    assert_eq!(game.team_name("20"), Some("Northvale"));
    assert_eq!(game.for_player("1003").count(), 2);

    let malformed = table.game(200).sides().unwrap_err();
    assert_eq!(malformed, AnalyticsError::SideCount { game_id: 200, found: 3 });
}

#[test]
fn sample_game_momentum_curve() {
    let table = load_actions(&fixture("actions_sample.csv")).unwrap();
    let report = MomentumEngine::default()
        .compute(&table.game(100), None)
        .unwrap();

    let buckets: Vec<i64> = report.samples.iter().map(|s| s.bucket).collect();
    assert_eq!(buckets, vec![0, 1, 2, 45, 46]);
    assert!((report.max_abs_momentum - 2.36).abs() < 1e-9);

    let peak = report.sample(2).unwrap();
    assert_eq!(peak.momentum, -1.0);
    assert_eq!(peak.leader, "20");

    // Only team 20 acted in minute 1, but its weak position reads as a
    // reference-side advantage, so the minute is labeled for team 10.
    let quiet = report.sample(1).unwrap();
    assert!((quiet.momentum - 0.5 / 2.36).abs() < 1e-9);
    assert_eq!(quiet.leader, "10");

    let first = report.sample(0).unwrap();
    assert!((first.raw_momentum - 1.349_333_333).abs() < 1e-6);

    assert_eq!(report.minutes_led("10"), 3);
    assert_eq!(report.minutes_led("20"), 2);

    let second_half = report
        .side_buckets
        .iter()
        .find(|b| b.team_id == "10" && b.bucket == 46)
        .unwrap();
    assert_eq!(second_half.actions, 2);
    assert_eq!(second_half.weighted_action_score, 3.0);
    assert!((second_half.avg_start_x - 78.5).abs() < 1e-12);
}

#[test]
fn malformed_game_yields_no_momentum() {
    let table = load_actions(&fixture("actions_sample.csv")).unwrap();
    let err = MomentumEngine::default()
        .compute(&table.game(200), None)
        .unwrap_err();
    assert!(matches!(err, AnalyticsError::SideCount { found: 3, .. }));
}

#[test]
fn sample_game_stats_and_maps() {
    let table = load_actions(&fixture("actions_sample.csv")).unwrap();
    let game = table.game(100);

    let stats = compute_game_stats(&game, DEFAULT_STATISTICS).unwrap();
    assert_eq!(stats.count("10", "shot"), 2);
    assert_eq!(stats.count("20", "shot"), 1);
    assert_eq!(stats.count("10", "pass"), 4);
    assert_eq!(stats.count("20", "pass"), 4);
    assert_eq!(stats.rows[0].statistic, "shot");
    assert_eq!(stats.rows[0].team_id, "10");

    let passes = pass_map(&game, "20");
    assert_eq!(passes.passes.len(), 4);
    assert_eq!(passes.completed(), 2);

    let shots = shot_map(&game, "20");
    assert_eq!(shots.shots.len(), 1);
    assert_eq!(shots.shots[0].result_name, "success");
}

#[test]
fn team_directory_labels_sides() {
    let table = load_actions(&fixture("actions_sample.csv")).unwrap();
    let directory = load_team_directory(&fixture("teams.csv")).unwrap();
    let game = table.game(200);
    assert_eq!(directory.label("10", None), "Harbour City FC");
    assert_eq!(directory.label("30", Some(&game)), "Eastmoor");
    assert_eq!(directory.label("99", Some(&game)), "99");
}

#[test]
fn player_roles_from_fixture() {
    let rows = load_player_ranks(&fixture("playerank.csv")).unwrap();
    let summary = summarize_roles(&rows);
    assert_eq!(summary.len(), 4);

    let forwards = summary.iter().find(|r| r.role == "central forward").unwrap();
    assert_eq!(forwards.goals, 15.0);
    assert_eq!(forwards.minutes_per_goal, 200.0);

    let keepers = summary.iter().find(|r| r.role == "goalkeeper").unwrap();
    assert_eq!(keepers.minutes_per_goal, 0.0);

    let backs = summary.iter().find(|r| r.role == "right back").unwrap();
    assert_eq!(backs.players, 2);
    assert_eq!(backs.minutes_per_goal, 3400.0);
}
