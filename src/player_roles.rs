use std::collections::BTreeMap;
use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::info;

/// One player-rank row. Only the columns used for role summaries are kept.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PlayerRankRow {
    #[serde(rename = "roleCluster")]
    pub role_cluster: String,
    #[serde(rename = "goalScored")]
    pub goal_scored: f64,
    #[serde(rename = "minutesPlayed")]
    pub minutes_played: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RoleSummary {
    pub role: String,
    pub players: usize,
    pub goals: f64,
    pub minutes: f64,
    /// Rounded to one decimal, halves to even; 0 when the role never scored.
    pub minutes_per_goal: f64,
}

pub fn load_player_ranks(path: &Path) -> Result<Vec<PlayerRankRow>> {
    let file = std::fs::File::open(path)
        .with_context(|| format!("open player rank table {}", path.display()))?;
    let rows = read_player_ranks(file).with_context(|| format!("parse {}", path.display()))?;
    info!(path = %path.display(), rows = rows.len(), "loaded player rank table");
    Ok(rows)
}

pub fn read_player_ranks<R: Read>(reader: R) -> Result<Vec<PlayerRankRow>> {
    let mut csv_reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
    let mut rows = Vec::new();
    for (idx, record) in csv_reader.deserialize::<PlayerRankRow>().enumerate() {
        rows.push(record.with_context(|| format!("player rank row {}", idx + 2))?);
    }
    Ok(rows)
}

pub fn summarize_roles(rows: &[PlayerRankRow]) -> Vec<RoleSummary> {
    let mut by_role: BTreeMap<&str, (usize, f64, f64)> = BTreeMap::new();
    for row in rows {
        let entry = by_role.entry(row.role_cluster.as_str()).or_insert((0, 0.0, 0.0));
        entry.0 += 1;
        entry.1 += row.goal_scored;
        entry.2 += row.minutes_played;
    }

    by_role
        .into_iter()
        .map(|(role, (players, goals, minutes))| RoleSummary {
            role: role.to_string(),
            players,
            goals,
            minutes,
            minutes_per_goal: minutes_per_goal(minutes, goals),
        })
        .collect()
}

fn minutes_per_goal(minutes: f64, goals: f64) -> f64 {
    if goals <= 0.0 {
        return 0.0;
    }
    let ratio = minutes / goals;
    if !ratio.is_finite() {
        return 0.0;
    }
    (ratio * 10.0).round_ties_even() / 10.0
}
