use std::collections::HashMap;
use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::actions::GameActions;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamInfo {
    pub team_id: String,
    pub team_name: String,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub latitude: Option<f64>,
    #[serde(default)]
    pub longitude: Option<f64>,
}

/// Team metadata used only to label output.
#[derive(Debug, Clone, Default)]
pub struct TeamDirectory {
    teams: HashMap<String, TeamInfo>,
}

impl TeamDirectory {
    pub fn from_teams(teams: impl IntoIterator<Item = TeamInfo>) -> Self {
        Self {
            teams: teams.into_iter().map(|t| (t.team_id.clone(), t)).collect(),
        }
    }

    pub fn get(&self, team_id: &str) -> Option<&TeamInfo> {
        self.teams.get(team_id)
    }

    pub fn len(&self) -> usize {
        self.teams.len()
    }

    pub fn is_empty(&self) -> bool {
        self.teams.is_empty()
    }

    /// Directory name, else the name on the action rows, else the id itself.
    pub fn label(&self, team_id: &str, game: Option<&GameActions<'_>>) -> String {
        if let Some(info) = self.teams.get(team_id) {
            return info.team_name.clone();
        }
        game.and_then(|g| g.team_name(team_id))
            .map(str::to_string)
            .unwrap_or_else(|| team_id.to_string())
    }
}

pub fn load_team_directory(path: &Path) -> Result<TeamDirectory> {
    let file =
        std::fs::File::open(path).with_context(|| format!("open team table {}", path.display()))?;
    let directory = read_team_directory(file).with_context(|| format!("parse {}", path.display()))?;
    info!(path = %path.display(), teams = directory.len(), "loaded team directory");
    Ok(directory)
}

pub fn read_team_directory<R: Read>(reader: R) -> Result<TeamDirectory> {
    let mut csv_reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
    let mut teams = Vec::new();
    for (idx, record) in csv_reader.deserialize::<TeamInfo>().enumerate() {
        teams.push(record.with_context(|| format!("team row {}", idx + 2))?);
    }
    Ok(TeamDirectory::from_teams(teams))
}

#[cfg(test)]
mod tests {
    use super::read_team_directory;
    use crate::actions::read_actions;

    #[test]
    fn label_falls_back_to_rows_then_id() {
        let dir = read_team_directory(
            "team_id,team_name,city,latitude,longitude\n1,Lions,Lyon,45.76,4.83\n".as_bytes(),
        )
        .unwrap();
        assert_eq!(dir.get("1").and_then(|t| t.latitude), Some(45.76));

        let actions = read_actions(
            "game_id,period_id,time_seconds,team_id,team_name,type_name,result_name,start_x,start_y\n\
             5,1,0,2,Bears,pass,success,1,1\n"
                .as_bytes(),
        )
        .unwrap();
        let game = actions.game(5);
        assert_eq!(dir.label("1", Some(&game)), "Lions");
        assert_eq!(dir.label("2", Some(&game)), "Bears");
        assert_eq!(dir.label("3", Some(&game)), "3");
    }
}
