use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::Utc;
use rust_xlsxwriter::{Workbook, Worksheet};
use tracing::warn;

use crate::actions::ActionTable;
use crate::game_stats::{DEFAULT_STATISTICS, compute_game_stats};
use crate::momentum::{MomentumEngine, MomentumReport};
use crate::pitch_maps::{pass_map, shot_map};
use crate::teams::TeamDirectory;

pub struct ExportReport {
    pub games: usize,
    pub momentum_rows: usize,
    pub side_bucket_rows: usize,
    pub stat_rows: usize,
    pub pass_rows: usize,
    pub shot_rows: usize,
    pub errors: Vec<String>,
}

pub struct ExportProgress {
    pub current: usize,
    pub total: usize,
    pub message: String,
}

enum Cell {
    Text(String),
    Number(f64),
}

impl From<&str> for Cell {
    fn from(value: &str) -> Self {
        Cell::Text(value.to_string())
    }
}

impl From<String> for Cell {
    fn from(value: String) -> Self {
        Cell::Text(value)
    }
}

impl From<f64> for Cell {
    fn from(value: f64) -> Self {
        Cell::Number(value)
    }
}

impl From<i64> for Cell {
    fn from(value: i64) -> Self {
        Cell::Number(value as f64)
    }
}

impl From<usize> for Cell {
    fn from(value: usize) -> Self {
        Cell::Number(value as f64)
    }
}

impl<T: Into<Cell>> From<Option<T>> for Cell {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(Cell::Text(String::new()))
    }
}

fn header(cols: &[&str]) -> Vec<Cell> {
    cols.iter().map(|c| Cell::from(*c)).collect()
}

/// Writes one workbook covering `game_ids`. Games that cannot be analysed are
/// listed in the report and on the Summary sheet; the rest are still written.
pub fn export_workbook(
    path: &Path,
    table: &ActionTable,
    game_ids: &[i64],
    engine: &MomentumEngine,
    directory: &TeamDirectory,
    mut on_progress: impl FnMut(ExportProgress),
) -> Result<ExportReport> {
    let total = game_ids.len();
    let mut errors = Vec::new();

    let mut momentum_rows = vec![header(&[
        "Game ID",
        "Minute",
        "Momentum",
        "Smoothed",
        "Raw Momentum",
        "Leader",
    ])];
    let mut bucket_rows = vec![header(&[
        "Game ID",
        "Minute",
        "Team ID",
        "Team",
        "Actions",
        "Weighted Actions",
        "Avg Start X",
        "Raw Momentum",
        "Momentum",
        "Smoothed",
    ])];
    let mut stat_rows = vec![header(&["Game ID", "Team ID", "Team", "Statistic", "Count"])];
    let mut pass_rows = vec![header(&[
        "Game ID", "Team ID", "Team", "Start X", "Start Y", "End X", "End Y", "Outcome",
    ])];
    let mut shot_rows = vec![header(&[
        "Game ID", "Team ID", "Team", "Start X", "Start Y", "Result",
    ])];

    for (idx, game_id) in game_ids.iter().copied().enumerate() {
        on_progress(ExportProgress {
            current: idx,
            total,
            message: format!("Game {game_id}"),
        });

        let game = table.game(game_id);
        let label = |team: &str| directory.label(team, Some(&game));

        match engine.compute(&game, None) {
            Ok(report) => {
                momentum_rows.extend(momentum_sheet_rows(&report, &label));
                bucket_rows.extend(report.side_buckets.iter().map(|row| {
                    vec![
                        Cell::from(game_id),
                        Cell::from(row.bucket),
                        Cell::from(row.team_id.clone()),
                        Cell::from(label(&row.team_id)),
                        Cell::from(row.actions),
                        Cell::from(row.weighted_action_score),
                        Cell::from(row.avg_start_x),
                        Cell::from(row.raw_momentum),
                        Cell::from(row.momentum),
                        Cell::from(row.smoothed_momentum),
                    ]
                }));
            }
            Err(err) => {
                warn!(game_id, %err, "momentum skipped");
                errors.push(format!("momentum {game_id}: {err}"));
            }
        }

        let sides = match game.sides() {
            Ok(sides) => sides,
            Err(err) => {
                errors.push(format!("stats {game_id}: {err}"));
                continue;
            }
        };

        match compute_game_stats(&game, DEFAULT_STATISTICS) {
            Ok(stats) => stat_rows.extend(stats.rows.iter().map(|row| {
                vec![
                    Cell::from(game_id),
                    Cell::from(row.team_id.clone()),
                    Cell::from(label(&row.team_id)),
                    Cell::from(row.statistic.clone()),
                    Cell::from(row.count),
                ]
            })),
            Err(err) => errors.push(format!("stats {game_id}: {err}")),
        }

        for team in sides.teams() {
            let team_label = label(team);
            for pass in pass_map(&game, team).passes {
                pass_rows.push(vec![
                    Cell::from(game_id),
                    Cell::from(team),
                    Cell::from(team_label.clone()),
                    Cell::from(pass.start_x),
                    Cell::from(pass.start_y),
                    Cell::from(pass.end_x),
                    Cell::from(pass.end_y),
                    Cell::from(pass.outcome.label()),
                ]);
            }
            for shot in shot_map(&game, team).shots {
                shot_rows.push(vec![
                    Cell::from(game_id),
                    Cell::from(team),
                    Cell::from(team_label.clone()),
                    Cell::from(shot.start_x),
                    Cell::from(shot.start_y),
                    Cell::from(shot.result_name),
                ]);
            }
        }
    }

    on_progress(ExportProgress {
        current: total,
        total,
        message: "Writing workbook".to_string(),
    });

    let mut summary_rows = vec![
        vec![Cell::from("Generated"), Cell::from(Utc::now().to_rfc3339())],
        vec![Cell::from("Games"), Cell::from(total)],
        vec![Cell::from("Span"), Cell::from(engine.span())],
        vec![Cell::from("Weights"), Cell::from(engine.weights().to_string())],
    ];
    summary_rows.extend(errors.iter().map(|e| vec![Cell::from("Error"), Cell::from(e.clone())]));

    let mut workbook = Workbook::new();
    for (name, rows) in [
        ("Summary", &summary_rows),
        ("Momentum", &momentum_rows),
        ("SideBuckets", &bucket_rows),
        ("GameStats", &stat_rows),
        ("Passes", &pass_rows),
        ("Shots", &shot_rows),
    ] {
        let sheet = workbook.add_worksheet();
        sheet.set_name(name)?;
        write_rows(sheet, rows)?;
    }

    workbook
        .save(path)
        .with_context(|| format!("failed writing workbook to {}", path.display()))?;

    Ok(ExportReport {
        games: total,
        momentum_rows: momentum_rows.len().saturating_sub(1),
        side_bucket_rows: bucket_rows.len().saturating_sub(1),
        stat_rows: stat_rows.len().saturating_sub(1),
        pass_rows: pass_rows.len().saturating_sub(1),
        shot_rows: shot_rows.len().saturating_sub(1),
        errors,
    })
}

fn momentum_sheet_rows(report: &MomentumReport, label: &dyn Fn(&str) -> String) -> Vec<Vec<Cell>> {
    report
        .samples
        .iter()
        .map(|s| {
            vec![
                Cell::from(report.game_id),
                Cell::from(s.bucket),
                Cell::from(s.momentum),
                Cell::from(s.smoothed_momentum),
                Cell::from(s.raw_momentum),
                Cell::from(label(&s.leader)),
            ]
        })
        .collect()
}

pub fn momentum_json(report: &MomentumReport) -> Result<String> {
    serde_json::to_string_pretty(report).context("serialize momentum report")
}

pub fn write_momentum_csv<W: Write>(writer: W, report: &MomentumReport) -> Result<()> {
    let mut out = csv::Writer::from_writer(writer);
    out.write_record(["game_id", "bucket", "momentum", "smoothed_momentum", "raw_momentum", "leader"])?;
    for s in &report.samples {
        out.write_record([
            report.game_id.to_string(),
            s.bucket.to_string(),
            s.momentum.to_string(),
            s.smoothed_momentum.to_string(),
            s.raw_momentum.to_string(),
            s.leader.clone(),
        ])?;
    }
    out.flush().context("flush momentum csv")?;
    Ok(())
}

fn write_rows(worksheet: &mut Worksheet, rows: &[Vec<Cell>]) -> Result<()> {
    for (row_idx, row) in rows.iter().enumerate() {
        for (col_idx, value) in row.iter().enumerate() {
            let (r, c) = (row_idx as u32, col_idx as u16);
            let written = match value {
                Cell::Text(text) => worksheet.write_string(r, c, text),
                Cell::Number(n) => worksheet.write_number(r, c, *n),
            };
            written.with_context(|| format!("write cell ({row_idx},{col_idx})"))?;
        }
    }
    Ok(())
}
