use std::collections::BTreeMap;

use serde::Serialize;

use crate::actions::GameActions;

pub const FIELD_LENGTH_MIN: f64 = 0.0;
pub const FIELD_LENGTH_MAX: f64 = 105.0;
pub const FIELD_WIDTH_MIN: f64 = 0.0;
pub const FIELD_WIDTH_MAX: f64 = 68.0;

pub fn on_pitch(x: f64, y: f64) -> bool {
    (FIELD_LENGTH_MIN..=FIELD_LENGTH_MAX).contains(&x) && (FIELD_WIDTH_MIN..=FIELD_WIDTH_MAX).contains(&y)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PassOutcome {
    Success,
    Fail,
}

impl PassOutcome {
    pub fn from_result(result_name: &str) -> Self {
        if result_name == "success" {
            PassOutcome::Success
        } else {
            PassOutcome::Fail
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            PassOutcome::Success => "success",
            PassOutcome::Fail => "fail",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PassLine {
    pub start_x: f64,
    pub start_y: f64,
    pub end_x: Option<f64>,
    pub end_y: Option<f64>,
    pub outcome: PassOutcome,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ShotPoint {
    pub start_x: f64,
    pub start_y: f64,
    pub result_name: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct PassMap {
    pub game_id: i64,
    pub team_id: String,
    pub passes: Vec<PassLine>,
}

impl PassMap {
    pub fn completed(&self) -> usize {
        self.passes
            .iter()
            .filter(|p| p.outcome == PassOutcome::Success)
            .count()
    }

    /// Passes whose start or end point lies outside the field bounds.
    pub fn off_pitch(&self) -> usize {
        self.passes
            .iter()
            .filter(|p| {
                !on_pitch(p.start_x, p.start_y)
                    || matches!((p.end_x, p.end_y), (Some(x), Some(y)) if !on_pitch(x, y))
            })
            .count()
    }

    pub fn completion_rate(&self) -> Option<f64> {
        if self.passes.is_empty() {
            return None;
        }
        Some(self.completed() as f64 / self.passes.len() as f64)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ShotMap {
    pub game_id: i64,
    pub team_id: String,
    pub shots: Vec<ShotPoint>,
}

impl ShotMap {
    pub fn by_result(&self) -> BTreeMap<&str, usize> {
        let mut out = BTreeMap::new();
        for shot in &self.shots {
            *out.entry(shot.result_name.as_str()).or_insert(0) += 1;
        }
        out
    }
}

pub fn pass_map(game: &GameActions<'_>, team_id: &str) -> PassMap {
    let passes = game
        .for_team(team_id)
        .filter(|a| a.type_name == "pass")
        .map(|a| PassLine {
            start_x: a.start_x,
            start_y: a.start_y,
            end_x: a.end_x,
            end_y: a.end_y,
            outcome: PassOutcome::from_result(&a.result_name),
        })
        .collect();
    PassMap {
        game_id: game.game_id,
        team_id: team_id.to_string(),
        passes,
    }
}

pub fn shot_map(game: &GameActions<'_>, team_id: &str) -> ShotMap {
    let shots = game
        .for_team(team_id)
        .filter(|a| a.type_name == "shot")
        .map(|a| ShotPoint {
            start_x: a.start_x,
            start_y: a.start_y,
            result_name: a.result_name.clone(),
        })
        .collect();
    ShotMap {
        game_id: game.game_id,
        team_id: team_id.to_string(),
        shots,
    }
}
