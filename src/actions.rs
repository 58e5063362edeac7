use std::collections::BTreeSet;
use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::AnalyticsError;
use crate::sides::MatchSides;

pub const PERIOD_MINUTES: i64 = 45;

/// One row of the SPADL-style actions table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Action {
    pub game_id: i64,
    pub period_id: i64,
    pub time_seconds: f64,
    pub team_id: String,
    #[serde(default)]
    pub team_name: Option<String>,
    #[serde(default)]
    pub player_id: Option<String>,
    pub type_name: String,
    pub result_name: String,
    pub start_x: f64,
    pub start_y: f64,
    #[serde(default)]
    pub end_x: Option<f64>,
    #[serde(default)]
    pub end_y: Option<f64>,
}

impl Action {
    /// Minute bucket with both periods laid end to end.
    pub fn time_bucket(&self) -> i64 {
        time_bucket(self.time_seconds, self.period_id)
    }
}

pub fn time_bucket(time_seconds: f64, period_id: i64) -> i64 {
    (time_seconds / 60.0).floor() as i64 + PERIOD_MINUTES * (period_id - 1)
}

#[derive(Debug, Clone, Default)]
pub struct ActionTable {
    rows: Vec<Action>,
}

impl ActionTable {
    pub fn from_rows(rows: Vec<Action>) -> Self {
        Self { rows }
    }

    pub fn rows(&self) -> &[Action] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn game_ids(&self) -> Vec<i64> {
        let ids: BTreeSet<i64> = self.rows.iter().map(|a| a.game_id).collect();
        ids.into_iter().collect()
    }

    pub fn game(&self, game_id: i64) -> GameActions<'_> {
        GameActions {
            game_id,
            rows: self.rows.iter().filter(|a| a.game_id == game_id).collect(),
        }
    }
}

/// The rows of a single game, in table order.
#[derive(Debug, Clone)]
pub struct GameActions<'a> {
    pub game_id: i64,
    rows: Vec<&'a Action>,
}

impl<'a> GameActions<'a> {
    pub fn new(game_id: i64, rows: Vec<&'a Action>) -> Self {
        Self { game_id, rows }
    }

    pub fn rows(&self) -> &[&'a Action] {
        &self.rows
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn sides(&self) -> Result<MatchSides, AnalyticsError> {
        MatchSides::from_actions(self.game_id, self.rows.iter().copied())
    }

    pub fn for_team<'b>(&'b self, team_id: &'b str) -> impl Iterator<Item = &'a Action> + 'b {
        self.rows.iter().copied().filter(move |a| a.team_id == team_id)
    }

    pub fn for_player<'b>(&'b self, player_id: &'b str) -> impl Iterator<Item = &'a Action> + 'b {
        self.rows
            .iter()
            .copied()
            .filter(move |a| a.player_id.as_deref() == Some(player_id))
    }

    pub fn of_type<'b>(&'b self, type_name: &'b str) -> impl Iterator<Item = &'a Action> + 'b {
        self.rows.iter().copied().filter(move |a| a.type_name == type_name)
    }

    /// Display name carried on the rows, if the table has a `team_name` column.
    pub fn team_name(&self, team_id: &str) -> Option<&'a str> {
        self.rows
            .iter()
            .find(|a| a.team_id == team_id && a.team_name.is_some())
            .and_then(|a| a.team_name.as_deref())
    }
}

pub fn load_actions(path: &Path) -> Result<ActionTable> {
    let file = std::fs::File::open(path)
        .with_context(|| format!("open actions table {}", path.display()))?;
    let table = read_actions(file).with_context(|| format!("parse {}", path.display()))?;
    info!(path = %path.display(), rows = table.len(), "loaded actions table");
    Ok(table)
}

pub fn read_actions<R: Read>(reader: R) -> Result<ActionTable> {
    let mut csv_reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
    let mut rows = Vec::new();
    for (idx, record) in csv_reader.deserialize::<Action>().enumerate() {
        // Header is line 1.
        let row = record.with_context(|| format!("actions row {}", idx + 2))?;
        rows.push(row);
    }
    Ok(ActionTable::from_rows(rows))
}
