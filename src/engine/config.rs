//! Tuning knobs for the cost model and the search.

use std::path::Path;

use log::info;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Remaining-cost estimate used to order the open set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HeuristicKind {
    /// Chebyshev distance times the cheapest possible move in the field.
    ScaledChebyshev,
    /// No estimate; the search degrades to uniform-cost.
    Dijkstra,
}

/// Which cell's wind speed prices a move. The attack angle, like the no-go
/// check, always comes from the departure cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CostSampling {
    /// Wind speed at the cell the move leaves.
    Departure,
    /// Wind speed at the cell the move enters.
    Arrival,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RoutingConfig {
    /// Time to cross one cell at unit boat speed.
    pub base_time: f64,
    /// Added to boat speed before dividing.
    pub epsilon: f64,
    /// Node expansions allowed before a search gives up.
    pub max_iterations: usize,
    pub heuristic: HeuristicKind,
    pub cost_sampling: CostSampling,
    /// Expansions between progress log lines.
    pub progress_interval: usize,
}

impl Default for RoutingConfig {
    fn default() -> Self {
        Self {
            base_time: 10.0,
            epsilon: 1e-5,
            max_iterations: 100_000,
            heuristic: HeuristicKind::ScaledChebyshev,
            cost_sampling: CostSampling::Arrival,
            progress_interval: 5_000,
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

impl RoutingConfig {
    /// Parses a JSON object holding any subset of the fields.
    pub fn from_json_str(text: &str) -> Result<Self, ConfigError> {
        let config: RoutingConfig = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        info!("Loading routing config from {:?}", path.as_ref());
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.base_time.is_finite() && self.base_time > 0.0) {
            return Err(ConfigError::Invalid(format!("base_time must be positive, got {}", self.base_time)));
        }
        if !(self.epsilon.is_finite() && self.epsilon > 0.0) {
            return Err(ConfigError::Invalid(format!("epsilon must be positive, got {}", self.epsilon)));
        }
        if self.max_iterations == 0 {
            return Err(ConfigError::Invalid("max_iterations must be at least 1".to_string()));
        }
        Ok(())
    }
}
