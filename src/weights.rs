use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use crate::error::AnalyticsError;

pub const DEFAULT_PASS_WEIGHT: f64 = 1.0;
pub const DEFAULT_SHOT_WEIGHT: f64 = 2.0;

/// Per-action weights keyed by `(result_name, type_name)`.
///
/// Pair entries are stored by type, then result. A type-level entry applies to every result of that type unless a pair entry
/// overrides it. Types with no entry at all are not part of the momentum signal.
#[derive(Debug, Clone, PartialEq)]
pub struct WeightTable {
    pairs: HashMap<String, HashMap<String, f64>>,
    types: HashMap<String, f64>,
}

impl Default for WeightTable {
    fn default() -> Self {
        let mut table = Self::empty();
        table.set_type("pass", DEFAULT_PASS_WEIGHT);
        table.set_type("shot", DEFAULT_SHOT_WEIGHT);
        table
    }
}

impl WeightTable {
    pub fn empty() -> Self {
        Self {
            pairs: HashMap::new(),
            types: HashMap::new(),
        }
    }

    pub fn set_type(&mut self, type_name: impl Into<String>, weight: f64) -> &mut Self {
        self.types.insert(type_name.into(), weight);
        self
    }

    pub fn set_pair(
        &mut self,
        result_name: impl Into<String>,
        type_name: impl Into<String>,
        weight: f64,
    ) -> &mut Self {
        self.pairs
            .entry(type_name.into())
            .or_default()
            .insert(result_name.into(), weight);
        self
    }

    pub fn weight(&self, result_name: &str, type_name: &str) -> f64 {
        self.pairs
            .get(type_name)
            .and_then(|results| results.get(result_name))
            .or_else(|| self.types.get(type_name))
            .copied()
            .unwrap_or(0.0)
    }

    pub fn is_known_type(&self, type_name: &str) -> bool {
        self.types.contains_key(type_name) || self.pairs.contains_key(type_name)
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty() && self.types.is_empty()
    }
}

/// Parses `type=w` and `result:type=w` entries separated by commas,
/// e.g. `pass=1,shot=2,success:shot=3`.
impl FromStr for WeightTable {
    type Err = AnalyticsError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let mut table = Self::empty();
        for entry in raw.split(',').map(str::trim).filter(|e| !e.is_empty()) {
            let invalid = || AnalyticsError::InvalidWeights(entry.to_string());
            let (key, value) = entry.split_once('=').ok_or_else(invalid)?;
            let weight = value.trim().parse::<f64>().map_err(|_| invalid())?;
            if !weight.is_finite() {
                return Err(invalid());
            }
            match key.trim().split_once(':') {
                Some((result, type_name)) => {
                    let (result, type_name) = (result.trim(), type_name.trim());
                    if result.is_empty() || type_name.is_empty() {
                        return Err(invalid());
                    }
                    table.set_pair(result, type_name, weight);
                }
                None => {
                    let type_name = key.trim();
                    if type_name.is_empty() {
                        return Err(invalid());
                    }
                    table.set_type(type_name, weight);
                }
            }
        }
        if table.is_empty() {
            return Err(AnalyticsError::InvalidWeights(raw.to_string()));
        }
        Ok(table)
    }
}

impl fmt::Display for WeightTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut entries: Vec<String> = self
            .types
            .iter()
            .map(|(t, w)| format!("{t}={w}"))
            .chain(self.pairs.iter().flat_map(|(t, results)| {
                results.iter().map(move |(r, w)| format!("{r}:{t}={w}"))
            }))
            .collect();
        entries.sort();
        write!(f, "{}", entries.join(","))
    }
}
