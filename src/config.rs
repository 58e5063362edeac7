use std::path::PathBuf;

use tracing::warn;

use crate::momentum::DEFAULT_SPAN;
use crate::weights::WeightTable;

const DEFAULT_ACTIONS_PATH: &str = "actions_sample.csv";
const DEFAULT_PLAYERANK_PATH: &str = "playerank.csv";
const DEFAULT_LOG_LEVEL: &str = "info";
const MAX_SPAN: usize = 30;

#[derive(Debug, Clone)]
pub struct Settings {
    pub actions_path: PathBuf,
    pub playerank_path: PathBuf,
    pub teams_path: Option<PathBuf>,
    pub span: usize,
    pub weights: WeightTable,
    pub log_level: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            actions_path: PathBuf::from(DEFAULT_ACTIONS_PATH),
            playerank_path: PathBuf::from(DEFAULT_PLAYERANK_PATH),
            teams_path: None,
            span: DEFAULT_SPAN,
            weights: WeightTable::default(),
            log_level: DEFAULT_LOG_LEVEL.to_string(),
        }
    }
}

impl Settings {
    /// Loads `.env` when present, then reads the process environment.
    pub fn from_env() -> Self {
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };
        let defaults = Self::default();

        let span = get("MOMENTUM_SPAN")
            .and_then(|v| v.parse::<usize>().ok())
            .unwrap_or(defaults.span)
            .clamp(1, MAX_SPAN);

        let weights = match get("MOMENTUM_WEIGHTS") {
            Some(raw) => raw.parse::<WeightTable>().unwrap_or_else(|err| {
                warn!(%err, "ignoring MOMENTUM_WEIGHTS, using default weights");
                WeightTable::default()
            }),
            None => defaults.weights,
        };

        Self {
            actions_path: get("KICKLOGIC_ACTIONS")
                .map(PathBuf::from)
                .unwrap_or(defaults.actions_path),
            playerank_path: get("KICKLOGIC_PLAYERANK")
                .map(PathBuf::from)
                .unwrap_or(defaults.playerank_path),
            teams_path: get("KICKLOGIC_TEAMS").map(PathBuf::from),
            span,
            weights,
            log_level: get("KICKLOGIC_LOG").unwrap_or(defaults.log_level),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::path::PathBuf;

    use super::Settings;
    use crate::weights::WeightTable;

    fn settings(pairs: &[(&str, &str)]) -> Settings {
        let env: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Settings::from_lookup(|key| env.get(key).cloned())
    }

    #[test]
    fn empty_environment_uses_defaults() {
        let s = settings(&[]);
        assert_eq!(s.actions_path, PathBuf::from("actions_sample.csv"));
        assert_eq!(s.span, 3);
        assert_eq!(s.weights, WeightTable::default());
        assert!(s.teams_path.is_none());
    }

    #[test]
    fn span_is_clamped_and_bad_weights_fall_back() {
        let s = settings(&[
            ("MOMENTUM_SPAN", "0"),
            ("MOMENTUM_WEIGHTS", "pass"),
            ("KICKLOGIC_TEAMS", " teams.csv "),
        ]);
        assert_eq!(s.span, 1);
        assert_eq!(s.weights, WeightTable::default());
        assert_eq!(s.teams_path, Some(PathBuf::from("teams.csv")));

        let s = settings(&[("MOMENTUM_SPAN", "500"), ("MOMENTUM_WEIGHTS", "shot=4")]);
        assert_eq!(s.span, 30);
        assert_eq!(s.weights.weight("fail", "shot"), 4.0);
        assert!(!s.weights.is_known_type("pass"));
    }
}
