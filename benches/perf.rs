use criterion::{Criterion, criterion_group, criterion_main};
use std::hint::black_box;

use kicklogic::actions::{Action, ActionTable, read_actions};
use kicklogic::game_stats::{DEFAULT_STATISTICS, compute_game_stats};
use kicklogic::momentum::MomentumEngine;

const TYPES: &[&str] = &["pass", "pass", "pass", "shot", "tackle", "dribble", "clearance"];

fn synthetic_game(n: usize) -> ActionTable {
    let rows = (0..n)
        .map(|i| {
            let team = if i % 3 == 0 { "away" } else { "home" };
            Action {
                game_id: 1,
                period_id: if i < n / 2 { 1 } else { 2 },
                time_seconds: ((i * 37) % 2700) as f64,
                team_id: team.to_string(),
                team_name: None,
                player_id: Some(format!("{}", i % 22)),
                type_name: TYPES[i % TYPES.len()].to_string(),
                result_name: if i % 4 == 0 { "fail" } else { "success" }.to_string(),
                start_x: ((i * 13) % 105) as f64,
                start_y: ((i * 7) % 68) as f64,
                end_x: None,
                end_y: None,
            }
        })
        .collect();
    ActionTable::from_rows(rows)
}

fn bench_momentum(c: &mut Criterion) {
    let table = synthetic_game(3000);
    let engine = MomentumEngine::default();
    c.bench_function("momentum_3000_actions", |b| {
        b.iter(|| {
            let report = engine.compute(black_box(&table.game(1)), None).unwrap();
            black_box(report.samples.len());
        })
    });
}

fn bench_game_stats(c: &mut Criterion) {
    let table = synthetic_game(3000);
    c.bench_function("game_stats_3000_actions", |b| {
        b.iter(|| {
            let stats = compute_game_stats(black_box(&table.game(1)), DEFAULT_STATISTICS).unwrap();
            black_box(stats.rows.len());
        })
    });
}

fn bench_actions_parse(c: &mut Criterion) {
    c.bench_function("actions_csv_parse", |b| {
        b.iter(|| {
            let table = read_actions(black_box(ACTIONS_CSV.as_bytes())).unwrap();
            black_box(table.len());
        })
    });
}

criterion_group!(perf, bench_momentum, bench_game_stats, bench_actions_parse);
criterion_main!(perf);

static ACTIONS_CSV: &str = include_str!("../tests/fixtures/actions_sample.csv");
