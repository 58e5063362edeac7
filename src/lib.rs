pub mod actions;
pub mod config;
pub mod error;
pub mod export;
pub mod game_stats;
pub mod logging;
pub mod momentum;
pub mod pitch_maps;
pub mod player_roles;
pub mod session;
pub mod sides;
pub mod table_cache;
pub mod teams;
pub mod weights;

pub use error::AnalyticsError;
