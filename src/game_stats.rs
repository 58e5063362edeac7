use std::collections::HashMap;

use serde::Serialize;

use crate::actions::GameActions;
use crate::error::AnalyticsError;

pub const DEFAULT_STATISTICS: &[&str] = &["shot", "pass"];

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatRow {
    pub team_id: String,
    pub statistic: String,
    pub count: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct GameStats {
    pub game_id: i64,
    pub teams: [String; 2],
    pub rows: Vec<StatRow>,
}

impl GameStats {
    pub fn count(&self, team_id: &str, statistic: &str) -> usize {
        self.rows
            .iter()
            .find(|r| r.team_id == team_id && r.statistic == statistic)
            .map(|r| r.count)
            .unwrap_or(0)
    }
}

/// Action counts per team for each statistic, statistic order first, then by
/// descending count. Teams with no action of a type get no row for it.
pub fn compute_game_stats(
    game: &GameActions<'_>,
    statistics: &[&str],
) -> Result<GameStats, AnalyticsError> {
    let sides = game.sides()?;

    let mut rows = Vec::new();
    for stat in statistics {
        let mut counts: HashMap<&str, usize> = HashMap::new();
        for action in game.of_type(stat) {
            *counts.entry(action.team_id.as_str()).or_default() += 1;
        }
        let mut stat_rows: Vec<StatRow> = counts
            .into_iter()
            .map(|(team, count)| StatRow {
                team_id: team.to_string(),
                statistic: stat.to_string(),
                count,
            })
            .collect();
        stat_rows.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.team_id.cmp(&b.team_id)));
        rows.extend(stat_rows);
    }

    let [reference, other] = sides.teams();
    Ok(GameStats {
        game_id: game.game_id,
        teams: [reference.to_string(), other.to_string()],
        rows,
    })
}
