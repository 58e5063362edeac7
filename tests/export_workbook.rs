use std::path::PathBuf;

use kicklogic::actions::load_actions;
use kicklogic::export::{export_workbook, momentum_json};
use kicklogic::momentum::MomentumEngine;
use kicklogic::teams::TeamDirectory;

fn fixture(name: &str) -> PathBuf {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests");
    path.push("fixtures");
    path.push(name);
    path
}

#[test]
fn workbook_collects_rows_and_per_game_errors() {
    let table = load_actions(&fixture("actions_sample.csv")).unwrap();
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("momentum.xlsx");

    let mut progress = Vec::new();
    let report = export_workbook(
        &out,
        &table,
        &table.game_ids(),
        &MomentumEngine::default(),
        &TeamDirectory::default(),
        |p| progress.push((p.current, p.total)),
    )
    .expect("export should succeed");

    assert!(out.exists());
    assert_eq!(report.games, 2);
    assert_eq!(report.momentum_rows, 5);
    assert_eq!(report.side_bucket_rows, 6);
    assert_eq!(report.stat_rows, 4);
    assert_eq!(report.pass_rows, 8);
    assert_eq!(report.shot_rows, 3);
    // Game 200 has three teams: both momentum and stats are skipped.
    assert_eq!(report.errors.len(), 2);
    assert!(report.errors.iter().all(|e| e.contains("200")));
    assert_eq!(progress.first(), Some(&(0, 2)));
    assert_eq!(progress.last(), Some(&(2, 2)));
}

#[test]
fn momentum_json_names_both_sides() {
    let table = load_actions(&fixture("actions_sample.csv")).unwrap();
    let report = MomentumEngine::default()
        .compute(&table.game(100), Some("20"))
        .unwrap();
    let json = momentum_json(&report).unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(value["reference"], "20");
    assert_eq!(value["other"], "10");
    assert_eq!(value["samples"].as_array().map(|a| a.len()), Some(5));
    assert_eq!(value["samples"][2]["momentum"], 1.0);
}
