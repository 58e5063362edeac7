//! Per-minute momentum for the two sides of a game.
//!
//! Each qualifying action contributes its weight to its (minute, team) group. A group's
//! momentum is `((avg_start_x - 50) / 50) * weighted_action_score`, so weighted activity
//! in the opponent's half pushes the signal toward the acting team. The non-reference
//! team's values are negated, both teams are summed per minute, and the result is scaled
//! by the largest absolute minute so the curve lies in [-1, 1].

use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;
use tracing::debug;

use crate::actions::{Action, GameActions};
use crate::error::AnalyticsError;
use crate::sides::{MatchSides, teams_by_first_minute};
use crate::weights::WeightTable;

pub const DEFAULT_SPAN: usize = 3;
pub const PITCH_MIDLINE_X: f64 = 50.0;

/// Aggregate of one team's qualifying actions within one minute.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SideBucket {
    pub bucket: i64,
    pub team_id: String,
    pub actions: usize,
    pub weighted_action_score: f64,
    pub avg_start_x: f64,
    /// Momentum from the acting team's own point of view.
    pub raw_momentum: f64,
    /// Momentum from the reference side's point of view.
    pub momentum: f64,
    pub smoothed_momentum: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MomentumSample {
    pub bucket: i64,
    pub momentum: f64,
    pub smoothed_momentum: f64,
    pub raw_momentum: f64,
    /// Reference side unless momentum is strictly negative.
    pub leader: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct MomentumReport {
    pub game_id: i64,
    pub reference: String,
    pub other: String,
    pub span: usize,
    pub max_abs_momentum: f64,
    pub side_buckets: Vec<SideBucket>,
    pub samples: Vec<MomentumSample>,
}

impl MomentumReport {
    pub fn total_momentum(&self) -> f64 {
        self.samples.iter().map(|s| s.momentum).sum()
    }

    /// Number of minutes labeled as led by `team_id`.
    pub fn minutes_led(&self, team_id: &str) -> usize {
        self.samples.iter().filter(|s| s.leader == team_id).count()
    }

    pub fn sample(&self, bucket: i64) -> Option<&MomentumSample> {
        self.samples.iter().find(|s| s.bucket == bucket)
    }
}

#[derive(Debug, Clone)]
pub struct MomentumEngine {
    weights: WeightTable,
    span: usize,
}

impl Default for MomentumEngine {
    fn default() -> Self {
        Self {
            weights: WeightTable::default(),
            span: DEFAULT_SPAN,
        }
    }
}

#[derive(Debug, Default)]
struct GroupAcc {
    weights: Vec<f64>,
    xs: Vec<f64>,
}

impl MomentumEngine {
    pub fn new(weights: WeightTable, span: usize) -> Result<Self, AnalyticsError> {
        if span == 0 {
            return Err(AnalyticsError::InvalidSpan(span));
        }
        Ok(Self { weights, span })
    }

    pub fn weights(&self) -> &WeightTable {
        &self.weights
    }

    pub fn span(&self) -> usize {
        self.span
    }

    /// Validates the game's two sides, then computes momentum relative to
    /// `reference`. With `None` the reference is the side with the earliest
    /// qualifying minute, ties going to the lower team id.
    pub fn compute(
        &self,
        game: &GameActions<'_>,
        reference: Option<&str>,
    ) -> Result<MomentumReport, AnalyticsError> {
        let sides = game.sides()?;
        let reference = match reference {
            Some(team) => Some(team),
            None => self.opening_side(game.rows().iter().copied()),
        };
        let sides = sides.with_reference(reference)?;
        self.compute_for_sides(&sides, game.rows().iter().copied())
    }

    fn opening_side<'a>(&self, rows: impl IntoIterator<Item = &'a Action>) -> Option<&'a str> {
        let qualifying = rows
            .into_iter()
            .filter(|action| self.weights.is_known_type(&action.type_name));
        teams_by_first_minute(qualifying).first().copied()
    }

    pub fn compute_for_sides<'a>(
        &self,
        sides: &MatchSides,
        rows: impl IntoIterator<Item = &'a Action>,
    ) -> Result<MomentumReport, AnalyticsError> {
        let game_id = sides.game_id();
        let mut groups: BTreeMap<(usize, i64), GroupAcc> = BTreeMap::new();
        let mut foreign: BTreeSet<&str> = BTreeSet::new();

        for action in rows {
            let side_idx = if sides.is_reference(&action.team_id) {
                0
            } else if sides.contains(&action.team_id) {
                1
            } else {
                foreign.insert(action.team_id.as_str());
                continue;
            };
            if !self.weights.is_known_type(&action.type_name) {
                continue;
            }
            let acc = groups.entry((side_idx, action.time_bucket())).or_default();
            acc.weights
                .push(self.weights.weight(&action.result_name, &action.type_name));
            acc.xs.push(action.start_x);
        }

        if !foreign.is_empty() {
            return Err(AnalyticsError::SideCount {
                game_id,
                found: 2 + foreign.len(),
            });
        }
        if groups.is_empty() {
            return Err(AnalyticsError::NoMomentumData { game_id });
        }

        let teams = sides.teams();
        let decay = 1.0 - 2.0 / (self.span as f64 + 1.0);
        let mut side_buckets = Vec::with_capacity(groups.len());
        let mut ema_side = usize::MAX;
        let (mut ema_num, mut ema_den) = (0.0_f64, 0.0_f64);

        // Keys iterate side-major then bucket ascending, which is the order the EMA needs.
        for ((side_idx, bucket), acc) in groups {
            if side_idx != ema_side {
                ema_side = side_idx;
                ema_num = 0.0;
                ema_den = 0.0;
            }
            let weighted_action_score = stable_sum(acc.weights);
            let actions = acc.xs.len();
            let avg_start_x = stable_sum(acc.xs) / actions as f64;
            let raw_momentum =
                ((avg_start_x - PITCH_MIDLINE_X) / PITCH_MIDLINE_X) * weighted_action_score;
            let momentum = if side_idx == 0 {
                raw_momentum
            } else {
                -raw_momentum
            };

            ema_num = momentum + decay * ema_num;
            ema_den = 1.0 + decay * ema_den;

            side_buckets.push(SideBucket {
                bucket,
                team_id: teams[side_idx].to_string(),
                actions,
                weighted_action_score,
                avg_start_x,
                raw_momentum,
                momentum,
                smoothed_momentum: ema_num / ema_den,
            });
        }

        let mut per_bucket: BTreeMap<i64, (f64, f64)> = BTreeMap::new();
        for row in &side_buckets {
            let entry = per_bucket.entry(row.bucket).or_insert((0.0, 0.0));
            entry.0 += row.momentum;
            entry.1 += row.smoothed_momentum;
        }

        let max_abs_momentum = per_bucket
            .values()
            .map(|(raw, _)| raw.abs())
            .fold(0.0_f64, f64::max);
        if max_abs_momentum == 0.0 || !max_abs_momentum.is_finite() {
            return Err(AnalyticsError::NoMomentumData { game_id });
        }

        let samples = per_bucket
            .into_iter()
            .map(|(bucket, (raw, smoothed))| {
                let momentum = raw / max_abs_momentum;
                let leader = if momentum >= 0.0 {
                    sides.reference()
                } else {
                    sides.other()
                };
                MomentumSample {
                    bucket,
                    momentum,
                    smoothed_momentum: (smoothed / max_abs_momentum).clamp(-1.0, 1.0),
                    raw_momentum: raw,
                    leader: leader.to_string(),
                }
            })
            .collect::<Vec<_>>();

        debug!(
            game_id,
            reference = sides.reference(),
            buckets = samples.len(),
            max_abs_momentum,
            "computed momentum"
        );

        Ok(MomentumReport {
            game_id,
            reference: sides.reference().to_string(),
            other: sides.other().to_string(),
            span: self.span,
            max_abs_momentum,
            side_buckets,
            samples,
        })
    }
}

/// Sums in sorted order so the result does not depend on row order.
fn stable_sum(mut values: Vec<f64>) -> f64 {
    values.sort_by(f64::total_cmp);
    values.iter().sum()
}
