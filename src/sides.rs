use std::cmp::Ordering;

use serde::Serialize;

use crate::actions::Action;
use crate::error::AnalyticsError;

/// The two teams of a game. The first entry is the reference side.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MatchSides {
    game_id: i64,
    teams: [String; 2],
}

impl MatchSides {
    /// Collects distinct team ids ordered by the minute each first appears,
    /// ties broken by team id.
    pub fn from_actions<'a>(
        game_id: i64,
        rows: impl IntoIterator<Item = &'a Action>,
    ) -> Result<Self, AnalyticsError> {
        match teams_by_first_minute(rows).as_slice() {
            [first, second] => Ok(Self {
                game_id,
                teams: [first.to_string(), second.to_string()],
            }),
            seen => Err(AnalyticsError::SideCount {
                game_id,
                found: seen.len(),
            }),
        }
    }

    pub fn new(game_id: i64, reference: impl Into<String>, other: impl Into<String>) -> Self {
        Self {
            game_id,
            teams: [reference.into(), other.into()],
        }
    }

    /// Reorders so `team` is the reference side. `None` keeps the current order.
    pub fn with_reference(self, team: Option<&str>) -> Result<Self, AnalyticsError> {
        let Some(team) = team else {
            return Ok(self);
        };
        if self.teams[0] == team {
            return Ok(self);
        }
        if self.teams[1] == team {
            let [first, second] = self.teams;
            return Ok(Self {
                game_id: self.game_id,
                teams: [second, first],
            });
        }
        Err(AnalyticsError::UnknownSide {
            game_id: self.game_id,
            team: team.to_string(),
        })
    }

    pub fn game_id(&self) -> i64 {
        self.game_id
    }

    pub fn reference(&self) -> &str {
        &self.teams[0]
    }

    pub fn other(&self) -> &str {
        &self.teams[1]
    }

    pub fn teams(&self) -> [&str; 2] {
        [&self.teams[0], &self.teams[1]]
    }

    pub fn contains(&self, team: &str) -> bool {
        self.teams.iter().any(|t| t == team)
    }

    pub fn is_reference(&self, team: &str) -> bool {
        self.teams[0] == team
    }

    pub fn opponent_of(&self, team: &str) -> Option<&str> {
        if self.teams[0] == team {
            Some(&self.teams[1])
        } else if self.teams[1] == team {
            Some(&self.teams[0])
        } else {
            None
        }
    }
}

/// Distinct team ids sorted by their earliest minute bucket, then by team id.
/// The result does not depend on row order.
pub fn teams_by_first_minute<'a>(rows: impl IntoIterator<Item = &'a Action>) -> Vec<&'a str> {
    let mut first: Vec<(i64, &str)> = Vec::new();
    for row in rows {
        let bucket = row.time_bucket();
        match first.iter_mut().find(|entry| entry.1 == row.team_id) {
            Some(entry) => entry.0 = entry.0.min(bucket),
            None => first.push((bucket, row.team_id.as_str())),
        }
    }
    first.sort_by(|a, b| a.0.cmp(&b.0).then_with(|| cmp_team_ids(a.1, b.1)));
    first.into_iter().map(|(_, team)| team).collect()
}

/// Numeric ids compare as numbers, anything else lexically.
fn cmp_team_ids(a: &str, b: &str) -> Ordering {
    match (a.parse::<i64>(), b.parse::<i64>()) {
        (Ok(x), Ok(y)) => x.cmp(&y).then_with(|| a.cmp(b)),
        _ => a.cmp(b),
    }
}

#[cfg(test)]
mod tests {
    use super::{MatchSides, teams_by_first_minute};
    use crate::actions::Action;
    use crate::error::AnalyticsError;

    fn row(team: &str) -> Action {
        row_at(team, 0.0)
    }

    fn row_at(team: &str, secs: f64) -> Action {
        Action {
            game_id: 1,
            period_id: 1,
            time_seconds: secs,
            team_id: team.to_string(),
            team_name: None,
            player_id: None,
            type_name: "pass".to_string(),
            result_name: "success".to_string(),
            start_x: 50.0,
            start_y: 34.0,
            end_x: None,
            end_y: None,
        }
    }

    #[test]
    fn orders_by_first_minute_then_team_id() {
        let rows = vec![row_at("b", 30.0), row_at("a", 90.0), row_at("b", 200.0)];
        let sides = MatchSides::from_actions(1, &rows).unwrap();
        assert_eq!(sides.reference(), "b");
        assert_eq!(sides.other(), "a");
        assert_eq!(sides.opponent_of("a"), Some("b"));
        assert_eq!(sides.opponent_of("z"), None);

        let reversed: Vec<Action> = rows.into_iter().rev().collect();
        assert_eq!(MatchSides::from_actions(1, &reversed).unwrap(), sides);
    }

    #[test]
    fn same_minute_ties_use_numeric_team_order() {
        let rows = vec![row("10"), row("9"), row("10")];
        assert_eq!(teams_by_first_minute(&rows), vec!["9", "10"]);
        let rows = vec![row("b"), row("a")];
        assert_eq!(teams_by_first_minute(&rows), vec!["a", "b"]);
    }

    #[test]
    fn rejects_wrong_cardinality() {
        let one = vec![row("a")];
        assert_eq!(
            MatchSides::from_actions(1, &one),
            Err(AnalyticsError::SideCount { game_id: 1, found: 1 })
        );
        let three = vec![row("a"), row("b"), row("c")];
        assert_eq!(
            MatchSides::from_actions(1, &three),
            Err(AnalyticsError::SideCount { game_id: 1, found: 3 })
        );
    }

    #[test]
    fn explicit_reference_reorders() {
        let sides = MatchSides::new(1, "a", "b").with_reference(Some("b")).unwrap();
        assert_eq!(sides.teams(), ["b", "a"]);
        let err = MatchSides::new(1, "a", "b").with_reference(Some("c")).unwrap_err();
        assert!(matches!(err, AnalyticsError::UnknownSide { .. }));
    }
}
