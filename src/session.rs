use std::sync::Arc;

use anyhow::Result;

use crate::actions::{ActionTable, load_actions};
use crate::config::Settings;
use crate::error::AnalyticsError;
use crate::momentum::MomentumEngine;
use crate::player_roles::{PlayerRankRow, load_player_ranks};
use crate::table_cache::TableCache;
use crate::teams::{TeamDirectory, load_team_directory};

/// Settings plus the tables they point at, each read at most once per path.
pub struct Session {
    settings: Settings,
    actions: TableCache<ActionTable>,
    teams: TableCache<TeamDirectory>,
    player_ranks: TableCache<Vec<PlayerRankRow>>,
}

impl Session {
    pub fn new(settings: Settings) -> Self {
        Self {
            settings,
            actions: TableCache::new(),
            teams: TableCache::new(),
            player_ranks: TableCache::new(),
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn actions(&self) -> Result<Arc<ActionTable>> {
        self.actions
            .get_or_load(&self.settings.actions_path, load_actions)
    }

    /// Empty directory when no team table is configured.
    pub fn team_directory(&self) -> Result<Arc<TeamDirectory>> {
        match &self.settings.teams_path {
            Some(path) => self.teams.get_or_load(path, load_team_directory),
            None => Ok(Arc::new(TeamDirectory::default())),
        }
    }

    pub fn player_ranks(&self) -> Result<Arc<Vec<PlayerRankRow>>> {
        self.player_ranks
            .get_or_load(&self.settings.playerank_path, load_player_ranks)
    }

    pub fn engine(&self) -> Result<MomentumEngine, AnalyticsError> {
        MomentumEngine::new(self.settings.weights.clone(), self.settings.span)
    }

    /// Drops every cached table so the next access rereads from disk.
    pub fn reload(&self) {
        self.actions.clear();
        self.teams.clear();
        self.player_ranks.clear();
    }
}
