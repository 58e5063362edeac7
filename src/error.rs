use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum AnalyticsError {
    #[error("game {game_id} has {found} distinct teams, expected exactly 2")]
    SideCount { game_id: i64, found: usize },

    #[error("team {team} does not play in game {game_id}")]
    UnknownSide { game_id: i64, team: String },

    #[error("no momentum data for game {game_id}")]
    NoMomentumData { game_id: i64 },

    #[error("smoothing span must be a positive integer, got {0}")]
    InvalidSpan(usize),

    #[error("invalid weights entry '{0}'")]
    InvalidWeights(String),
}
